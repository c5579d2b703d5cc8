//! AST node model
//!
//! `Node` pairs a source line with a [`NodeKind`]. The set of kinds is closed;
//! consumers dispatch with an exhaustive `match`.

use crate::ops::{AccessSpecifier, AssignmentOp, BinaryOp, StorageClass, UnaryOp};
use crate::types::TypeSpecifier;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Discriminant tag of every syntax node, including the sub-nodes that only
/// appear inside declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeType {
    /// Root of a translation unit
    Program,
    /// Braced block
    StatementList,
    /// Local `let`
    VariableDeclaration,
    /// Module-level variable
    GlobalVariableDeclaration,
    /// Integer constant
    IntegerLiteral,
    /// Boolean constant
    BoolLiteral,
    /// Floating constant
    FloatLiteral,
    /// String constant
    StringLiteral,
    /// Name reference
    Identifier,
    /// Explicit conversion
    CastExpression,
    /// Binary operator application
    BinaryExpression,
    /// Unary operator application
    UnaryExpression,
    /// Written type
    TypeSpecifier,
    /// Module import
    ImportStatement,
    /// Function with a body
    FunctionDefinition,
    /// Function signature only
    FunctionDeclaration,
    /// One parameter
    FunctionParameter,
    /// Parameter list
    FunctionParameters,
    /// Type alias
    TypeDefStatement,
    /// Struct type
    StructDefinition,
    /// Struct or enum field
    StructField,
    /// Struct literal
    StructInitialization,
    /// Ternary `?:`
    ConditionalExpression,
    /// Store into an lvalue
    AssignmentExpression,
    /// Path into an imported module
    ImportedSymbolAccess,
    /// Call
    FunctionCall,
    /// `.` member
    FieldAccess,
    /// `->` member
    PointerFieldAccess,
    /// Enum case
    EnumVariant,
    /// Payload of an enum case
    EnumVariantItem,
    /// Enum type
    EnumDefinition,
    /// `return`
    ReturnStatement,
    /// `continue`
    ContinueStatement,
    /// `break`
    BreakStatement,
    /// `for` loop
    ForStatement,
    /// `if` with optional `else`
    IfStatement,
}

/// Root of a translation unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Top-level statements in source order
    pub statements: Vec<Node>,
}

impl Program {
    /// Program made of `statements`
    pub fn new(statements: Vec<Node>) -> Self {
        Self { statements }
    }

    /// Always [`NodeType::Program`]
    pub fn node_type(&self) -> NodeType {
        NodeType::Program
    }
}

/// A statement or expression with the 1-based line it starts on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Source line; 0 when unknown
    #[serde(default)]
    pub line: u32,
    /// What the node is
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    /// Node of `kind` starting on `line`
    pub fn new(line: u32, kind: NodeKind) -> Self {
        Self { line, kind }
    }

    /// Heap-allocated [`Node::new`], for child slots
    pub fn boxed(line: u32, kind: NodeKind) -> Box<Self> {
        Box::new(Self::new(line, kind))
    }

    /// Tag of the node's kind
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }
}

/// Every statement and expression form
///
/// Serialized with an internal `type` tag naming the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// A braced block; order is significant
    StatementList {
        /// Statements in source order
        statements: Vec<Node>,
    },

    /// Integer constant as written
    IntegerLiteral {
        /// The value
        value: i64,
    },
    /// Floating constant as written
    FloatLiteral {
        /// The value
        value: f64,
    },
    /// `true` or `false`
    BoolLiteral {
        /// The value
        value: bool,
    },
    /// String constant, escapes already resolved
    StringLiteral {
        /// The bytes, without the terminating NUL
        value: String,
    },
    /// Reference to a variable or function
    Identifier {
        /// The referenced name
        name: String,
    },

    /// `left op right`
    BinaryExpression {
        /// The operator
        op: BinaryOp,
        /// Left operand
        left: Box<Node>,
        /// Right operand
        right: Box<Node>,
    },
    /// Prefix or postfix operator
    UnaryExpression {
        /// The operator
        op: UnaryOp,
        /// The operand
        operand: Box<Node>,
    },
    /// `(T) expr`
    CastExpression {
        /// Type converted to
        target: TypeSpecifier,
        /// Value converted
        expr: Box<Node>,
    },
    /// `condition ? then_expr : else_expr`
    ConditionalExpression {
        /// Selector
        condition: Box<Node>,
        /// Value when true
        then_expr: Box<Node>,
        /// Value when false
        else_expr: Box<Node>,
    },
    /// `target op value`
    AssignmentExpression {
        /// `=` or a compound operator
        op: AssignmentOp,
        /// Storage written
        target: Box<Node>,
        /// Value stored
        value: Box<Node>,
    },
    /// `callee(arguments)`
    FunctionCall {
        /// Called expression
        callee: Box<Node>,
        /// Arguments in order
        arguments: Vec<Node>,
    },
    /// `base.field`
    FieldAccess {
        /// Aggregate accessed
        base: Box<Node>,
        /// Member name
        field: String,
    },
    /// `base->field`
    PointerFieldAccess {
        /// Pointer to the aggregate
        base: Box<Node>,
        /// Member name
        field: String,
    },
    /// `Name { field: value, .. }`
    StructInitialization {
        /// Struct type name
        name: String,
        /// Field initializers in source order
        fields: Vec<(String, Node)>,
    },
    /// `a::b::c` used as a value
    ImportedSymbolAccess {
        /// Path segments
        path: Vec<String>,
    },

    /// `import a::b;`
    ImportStatement {
        /// Path segments
        path: Vec<String>,
    },
    /// `type name = ty;`
    TypeDefStatement {
        /// Alias name
        name: String,
        /// Aliased type
        ty: TypeSpecifier,
    },

    /// Function with a body
    FunctionDefinition(FunctionDefinition),
    /// Function signature only
    FunctionDeclaration(FunctionDeclaration),
    /// Local variable
    VariableDeclaration(VariableDeclaration),
    /// Module-level variable
    GlobalVariableDeclaration(GlobalVariableDeclaration),
    /// Struct type
    StructDefinition(StructDefinition),
    /// Enum type
    EnumDefinition(EnumDefinition),

    /// `return` with an optional value
    ReturnStatement {
        /// Returned value
        value: Option<Box<Node>>,
    },
    /// `break`
    BreakStatement,
    /// `continue`
    ContinueStatement,
    /// `for (init; condition; increment) body`
    ForStatement {
        /// Runs once before the loop
        init: Option<Box<Node>>,
        /// Checked before each iteration; absent means forever
        condition: Option<Box<Node>>,
        /// Runs after each iteration
        increment: Option<Box<Node>>,
        /// Loop body
        body: Box<Node>,
    },
    /// `if` with an optional `else`
    IfStatement {
        /// Must be `bool`
        condition: Box<Node>,
        /// Taken when true
        then_branch: Box<Node>,
        /// Taken when false
        else_branch: Option<Box<Node>>,
    },
}

impl NodeKind {
    /// Tag of this kind
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::StatementList { .. } => NodeType::StatementList,
            Self::IntegerLiteral { .. } => NodeType::IntegerLiteral,
            Self::FloatLiteral { .. } => NodeType::FloatLiteral,
            Self::BoolLiteral { .. } => NodeType::BoolLiteral,
            Self::StringLiteral { .. } => NodeType::StringLiteral,
            Self::Identifier { .. } => NodeType::Identifier,
            Self::BinaryExpression { .. } => NodeType::BinaryExpression,
            Self::UnaryExpression { .. } => NodeType::UnaryExpression,
            Self::CastExpression { .. } => NodeType::CastExpression,
            Self::ConditionalExpression { .. } => NodeType::ConditionalExpression,
            Self::AssignmentExpression { .. } => NodeType::AssignmentExpression,
            Self::FunctionCall { .. } => NodeType::FunctionCall,
            Self::FieldAccess { .. } => NodeType::FieldAccess,
            Self::PointerFieldAccess { .. } => NodeType::PointerFieldAccess,
            Self::StructInitialization { .. } => NodeType::StructInitialization,
            Self::ImportedSymbolAccess { .. } => NodeType::ImportedSymbolAccess,
            Self::ImportStatement { .. } => NodeType::ImportStatement,
            Self::TypeDefStatement { .. } => NodeType::TypeDefStatement,
            Self::FunctionDefinition(_) => NodeType::FunctionDefinition,
            Self::FunctionDeclaration(_) => NodeType::FunctionDeclaration,
            Self::VariableDeclaration(_) => NodeType::VariableDeclaration,
            Self::GlobalVariableDeclaration(_) => NodeType::GlobalVariableDeclaration,
            Self::StructDefinition(_) => NodeType::StructDefinition,
            Self::EnumDefinition(_) => NodeType::EnumDefinition,
            Self::ReturnStatement { .. } => NodeType::ReturnStatement,
            Self::BreakStatement => NodeType::BreakStatement,
            Self::ContinueStatement => NodeType::ContinueStatement,
            Self::ForStatement { .. } => NodeType::ForStatement,
            Self::IfStatement { .. } => NodeType::IfStatement,
        }
    }
}

/// One named parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionParameter {
    /// Parameter name
    pub name: String,
    /// Declared type
    pub ty: TypeSpecifier,
    /// Value used when the argument is omitted
    #[serde(default)]
    pub default_value: Option<Box<Node>>,
}

/// Parameter list of a function signature
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionParameters {
    /// Fixed parameters in order
    #[serde(default)]
    pub list: Vec<FunctionParameter>,
    /// Element type of a typed variadic tail (`...T`)
    #[serde(default)]
    pub variadic_type: Option<TypeSpecifier>,
    /// Whether the list ends in `...`
    #[serde(default)]
    pub is_variadic: bool,
}

impl FunctionParameters {
    /// Non-variadic list of `list`
    pub fn new(list: Vec<FunctionParameter>) -> Self {
        Self {
            list,
            ..Self::default()
        }
    }
}

/// A function with a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Symbol name
    pub name: String,
    /// Parameters
    #[serde(default)]
    pub params: FunctionParameters,
    /// Absent for `void`
    #[serde(default)]
    pub return_type: Option<TypeSpecifier>,
    /// Statements of the body
    pub body: Vec<Node>,
    /// Visibility
    #[serde(default)]
    pub access: AccessSpecifier,
    /// `extern` or `inline`
    #[serde(default)]
    pub storage: Option<StorageClass>,
}

/// A signature without a body (`fn puts(s string) int;`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    /// Symbol name
    pub name: String,
    /// Parameters
    #[serde(default)]
    pub params: FunctionParameters,
    /// Absent for `void`
    #[serde(default)]
    pub return_type: Option<TypeSpecifier>,
    /// Visibility
    #[serde(default)]
    pub access: AccessSpecifier,
    /// `extern` or `inline`
    #[serde(default)]
    pub storage: Option<StorageClass>,
}

/// `let name: ty = initializer;` inside a function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    /// Variable name
    pub name: String,
    /// Declared type; inferred from the initializer when absent
    #[serde(default)]
    pub ty: Option<TypeSpecifier>,
    /// Initial value
    #[serde(default)]
    pub initializer: Option<Box<Node>>,
}

/// A module-level variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalVariableDeclaration {
    /// Symbol name
    pub name: String,
    /// Declared type; inferred from the initializer when absent
    #[serde(default)]
    pub ty: Option<TypeSpecifier>,
    /// Constant initial value
    #[serde(default)]
    pub initializer: Option<Box<Node>>,
    /// Visibility
    #[serde(default)]
    pub access: AccessSpecifier,
    /// `extern` only
    #[serde(default)]
    pub storage: Option<StorageClass>,
}

impl From<VariableDeclaration> for GlobalVariableDeclaration {
    /// A plain `name = value;` at module level carries default access and
    /// no storage class.
    fn from(decl: VariableDeclaration) -> Self {
        Self {
            name: decl.name,
            ty: decl.ty,
            initializer: decl.initializer,
            access: AccessSpecifier::Default,
            storage: None,
        }
    }
}

/// A named member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    /// Member name
    pub name: String,
    /// Member type
    pub ty: TypeSpecifier,
}

/// `struct Name { fields; methods }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDefinition {
    /// Anonymous structs have no name
    #[serde(default)]
    pub name: Option<String>,
    /// Members in layout order
    #[serde(default)]
    pub fields: Vec<StructField>,
    /// Member functions
    #[serde(default)]
    pub methods: Vec<FunctionDefinition>,
    /// Visibility
    #[serde(default)]
    pub access: AccessSpecifier,
}

/// One payload element of an enum case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumVariantItem {
    /// Absent for positional payloads
    #[serde(default)]
    pub name: Option<String>,
    /// Payload type
    pub ty: TypeSpecifier,
}

/// An enum case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumVariant {
    /// Case name
    pub name: String,
    /// Payload; empty for a plain tag
    #[serde(default)]
    pub items: Vec<EnumVariantItem>,
}

/// `enum Name { variants }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDefinition {
    /// Anonymous enums have no name
    #[serde(default)]
    pub name: Option<String>,
    /// Cases in declaration order
    pub variants: Vec<EnumVariant>,
    /// Members shared by every case
    #[serde(default)]
    pub fields: Vec<StructField>,
    /// Member functions
    #[serde(default)]
    pub methods: Vec<FunctionDefinition>,
}
