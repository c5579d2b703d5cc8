//! Type lowering from source type specifiers to LLVM types

use crate::error::{ErrorKind, Result};
use cy_syntax::{PrimitiveType, TypeSpecifier};
use indexmap::IndexMap;
use inkwell::AddressSpace;
use inkwell::context::Context;
use inkwell::types::{BasicType as _, BasicTypeEnum, PointerType};
use std::fmt;

/// What a [`CodegenType`] describes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodegenKind {
    /// A built-in scalar, `string` or `void`
    Primitive(PrimitiveType),
    /// A named struct
    Struct(String),
    /// Lowered to an `i32` discriminant
    Enum(String),
    /// Address of a function symbol
    Function,
    /// `*T`
    Pointer,
    /// `&T`
    Reference,
}

/// A resolved type: its kind, LLVM representation and constness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenType<'ctx> {
    /// Source-level kind
    pub kind: CodegenKind,
    /// LLVM type; `None` only for `void`
    pub ir: Option<BasicTypeEnum<'ctx>>,
    /// Pointee of a pointer or reference
    pub inner: Option<Box<CodegenType<'ctx>>>,
    /// Set by `const T`
    pub is_const: bool,
}

impl<'ctx> CodegenType<'ctx> {
    /// A built-in type lowered in `context`
    pub fn primitive(context: &'ctx Context, primitive: PrimitiveType) -> Self {
        Self {
            kind: CodegenKind::Primitive(primitive),
            ir: primitive_ir(context, primitive),
            inner: None,
            is_const: false,
        }
    }

    /// The `void` return type
    pub fn void() -> Self {
        Self {
            kind: CodegenKind::Primitive(PrimitiveType::Void),
            ir: None,
            inner: None,
            is_const: false,
        }
    }

    /// `*inner`; a pointer to `void` is an `i8*`
    pub fn pointer_to(context: &'ctx Context, inner: Self) -> Self {
        Self::indirect(CodegenKind::Pointer, pointer_type(context, inner.ir), inner)
    }

    /// `&inner`, represented like a pointer
    pub fn reference_to(context: &'ctx Context, inner: Self) -> Self {
        Self::indirect(CodegenKind::Reference, pointer_type(context, inner.ir), inner)
    }

    /// Pointer-to-`inner` for an existing slot of pointer type `pointer`
    pub(crate) fn slot(pointer: PointerType<'ctx>, inner: Self) -> Self {
        Self::indirect(CodegenKind::Pointer, pointer, inner)
    }

    fn indirect(kind: CodegenKind, pointer: PointerType<'ctx>, inner: Self) -> Self {
        Self {
            kind,
            ir: Some(pointer.into()),
            inner: Some(Box::new(inner)),
            is_const: false,
        }
    }

    /// Address of a function whose LLVM function pointer type is `pointer`
    pub fn function(pointer: PointerType<'ctx>) -> Self {
        Self {
            kind: CodegenKind::Function,
            ir: Some(pointer.into()),
            inner: None,
            is_const: false,
        }
    }

    /// Whether this is `void`
    pub fn is_void(&self) -> bool {
        self.kind == CodegenKind::Primitive(PrimitiveType::Void)
    }

    /// Whether this is `bool`
    pub fn is_bool(&self) -> bool {
        self.kind == CodegenKind::Primitive(PrimitiveType::Bool)
    }

    /// Integer-valued primitives and enums; `bool` is excluded
    pub fn is_integer(&self) -> bool {
        self.int_width().is_some_and(|bits| bits > 1)
            && matches!(self.kind, CodegenKind::Primitive(_) | CodegenKind::Enum(_))
    }

    /// `uint*` kinds and `byte`
    pub fn is_unsigned(&self) -> bool {
        matches!(
            self.kind,
            CodegenKind::Primitive(
                PrimitiveType::UInt
                    | PrimitiveType::UInt8
                    | PrimitiveType::UInt16
                    | PrimitiveType::UInt32
                    | PrimitiveType::UInt64
                    | PrimitiveType::UInt128
                    | PrimitiveType::Byte
            )
        )
    }

    /// Whether the LLVM type is a floating-point type
    pub fn is_float(&self) -> bool {
        matches!(self.ir, Some(BasicTypeEnum::FloatType(_)))
    }

    /// Bit width of an integer LLVM type
    pub fn int_width(&self) -> Option<u32> {
        match self.ir {
            Some(BasicTypeEnum::IntType(int)) => Some(int.get_bit_width()),
            _ => None,
        }
    }

    /// Same type ignoring constness at every level
    pub fn same_shape(&self, other: &Self) -> bool {
        if self.kind != other.kind || self.ir != other.ir {
            return false;
        }
        match (&self.inner, &other.inner) {
            (Some(lhs), Some(rhs)) => lhs.same_shape(rhs),
            (None, None) => true,
            _ => false,
        }
    }

    fn with_const(mut self) -> Self {
        self.is_const = true;
        self
    }
}

impl fmt::Display for CodegenType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            f.write_str("const ")?;
        }
        match &self.kind {
            CodegenKind::Primitive(primitive) => write!(f, "{primitive}"),
            CodegenKind::Struct(name) | CodegenKind::Enum(name) => f.write_str(name),
            CodegenKind::Function => f.write_str("fn"),
            CodegenKind::Pointer | CodegenKind::Reference => {
                let sigil = if self.kind == CodegenKind::Pointer { "*" } else { "&" };
                match &self.inner {
                    Some(inner) => write!(f, "{sigil}{inner}"),
                    None => f.write_str(sigil),
                }
            }
        }
    }
}

fn pointer_type<'ctx>(context: &'ctx Context, pointee: Option<BasicTypeEnum<'ctx>>) -> PointerType<'ctx> {
    match pointee {
        Some(pointee) => pointee.ptr_type(AddressSpace::default()),
        None => context.i8_type().ptr_type(AddressSpace::default()),
    }
}

/// LLVM representation of a primitive; `None` for `void`
pub fn primitive_ir(context: &Context, primitive: PrimitiveType) -> Option<BasicTypeEnum<'_>> {
    let ty: BasicTypeEnum<'_> = match primitive {
        PrimitiveType::Int | PrimitiveType::Int32 | PrimitiveType::UInt | PrimitiveType::UInt32 => {
            context.i32_type().into()
        }
        PrimitiveType::Int8 | PrimitiveType::UInt8 | PrimitiveType::Char | PrimitiveType::Byte => {
            context.i8_type().into()
        }
        PrimitiveType::Int16 | PrimitiveType::UInt16 => context.i16_type().into(),
        PrimitiveType::Int64 | PrimitiveType::UInt64 => context.i64_type().into(),
        PrimitiveType::Int128 | PrimitiveType::UInt128 => context.i128_type().into(),
        PrimitiveType::Float32 => context.f32_type().into(),
        PrimitiveType::Float64 => context.f64_type().into(),
        PrimitiveType::Float128 => context.f128_type().into(),
        PrimitiveType::Bool => context.bool_type().into(),
        PrimitiveType::String => context.i8_type().ptr_type(AddressSpace::default()).into(),
        PrimitiveType::Void => return None,
        // Error values travel as an error code.
        PrimitiveType::Error => context.i32_type().into(),
    };
    Some(ty)
}

/// Module-level table of named types: aliases, structs and enums
#[derive(Debug)]
pub struct TypeTable<'ctx> {
    context: &'ctx Context,
    named: IndexMap<String, CodegenType<'ctx>>,
}

impl<'ctx> TypeTable<'ctx> {
    /// An empty table lowering into `context`
    pub fn new(context: &'ctx Context) -> Self {
        Self {
            context,
            named: IndexMap::new(),
        }
    }

    /// The type registered as `name`
    pub fn get(&self, name: &str) -> Option<&CodegenType<'ctx>> {
        self.named.get(name)
    }

    /// Register `name`; a second definition is fatal
    pub fn define(&mut self, name: &str, ty: CodegenType<'ctx>, line: u32) -> Result<()> {
        if self.named.contains_key(name) {
            return Err(ErrorKind::DuplicateType {
                name: name.to_string(),
            }
            .at(line));
        }
        self.named.insert(name.to_string(), ty);
        Ok(())
    }

    /// Named types in definition order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CodegenType<'ctx>)> {
        self.named.iter()
    }

    /// Resolve a source type, looking identifiers up in this table
    pub fn resolve(&self, spec: &TypeSpecifier, line: u32) -> Result<CodegenType<'ctx>> {
        match spec {
            TypeSpecifier::Primitive(primitive) => {
                Ok(CodegenType::primitive(self.context, *primitive))
            }
            TypeSpecifier::Pointer(inner) => Ok(CodegenType::pointer_to(
                self.context,
                self.resolve(inner, line)?,
            )),
            TypeSpecifier::Reference(inner) => Ok(CodegenType::reference_to(
                self.context,
                self.resolve(inner, line)?,
            )),
            TypeSpecifier::Const(inner) => Ok(self.resolve(inner, line)?.with_const()),
            TypeSpecifier::Identifier(name) => self
                .named
                .get(name)
                .cloned()
                .ok_or_else(|| ErrorKind::UndefinedType { name: name.clone() }.at(line)),
        }
    }
}
