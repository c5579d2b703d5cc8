//! Syntax tree for the Cyrus language
//!
//! The tree is produced by the parser and consumed whole by code generation.
//! Every composite node owns its children; optional slots are `Option<Box<_>>`.

#![allow(
    clippy::multiple_inherent_impl,
    reason = "tree printing lives apart from the node model"
)]

pub mod ast;
pub mod ops;
pub mod pretty;
pub mod types;

pub use ast::{
    EnumDefinition, EnumVariant, EnumVariantItem, FunctionDeclaration, FunctionDefinition,
    FunctionParameter, FunctionParameters, GlobalVariableDeclaration, Node, NodeKind, NodeType,
    Program, StructDefinition, StructField, VariableDeclaration,
};
pub use ops::{AccessSpecifier, AssignmentOp, BinaryOp, StorageClass, UnaryOp};
pub use types::{AstError, PrimitiveType, TypeKind, TypeSpecifier};
