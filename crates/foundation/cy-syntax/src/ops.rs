//! Operators and declaration specifiers

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Binary operator of a `BinaryExpression`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum BinaryOp {
    /// Addition
    #[display("+")]
    Add,
    /// Subtraction
    #[display("-")]
    Subtract,
    /// Multiplication
    #[display("*")]
    Multiply,
    /// Division
    #[display("/")]
    Divide,
    /// Remainder of a division
    #[display("%")]
    Remainder,
    /// Equality
    #[display("==")]
    Equal,
    /// Inequality
    #[display("!=")]
    NotEqual,
    /// Strictly less
    #[display("<")]
    LessThan,
    /// Less or equal
    #[display("<=")]
    LessEqual,
    /// Strictly greater
    #[display(">")]
    GreaterThan,
    /// Greater or equal
    #[display(">=")]
    GreaterEqual,
    /// Shift left
    #[display("<<")]
    LeftShift,
    /// Shift right
    #[display(">>")]
    RightShift,
    /// Bitwise and
    #[display("&")]
    BitwiseAnd,
    /// Bitwise exclusive or
    #[display("^")]
    BitwiseXor,
    /// Bitwise or
    #[display("|")]
    BitwiseOr,
    /// Short-circuit and
    #[display("&&")]
    LogicalAnd,
    /// Short-circuit or
    #[display("||")]
    LogicalOr,
}

/// Prefix or postfix operator of a `UnaryExpression`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum UnaryOp {
    /// Unary plus
    #[display("+")]
    Plus,
    /// Arithmetic negation
    #[display("-")]
    Negate,
    /// Boolean not
    #[display("!")]
    LogicalNot,
    /// Bitwise complement
    #[display("~")]
    BitwiseNot,
    /// Address of an lvalue
    #[display("&")]
    AddressOf,
    /// Load through a pointer
    #[display("*")]
    Dereference,
    /// `++x`
    #[display("++ (pre)")]
    PreIncrement,
    /// `--x`
    #[display("-- (pre)")]
    PreDecrement,
    /// `x++`
    #[display("++ (post)")]
    PostIncrement,
    /// `x--`
    #[display("-- (post)")]
    PostDecrement,
}

/// Operator of an `AssignmentExpression`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum AssignmentOp {
    /// Plain store
    #[display("=")]
    Assign,
    /// `+=`
    #[display("+=")]
    AddAssign,
    /// `-=`
    #[display("-=")]
    SubtractAssign,
    /// `*=`
    #[display("*=")]
    MultiplyAssign,
    /// `/=`
    #[display("/=")]
    DivideAssign,
    /// `%=`
    #[display("%=")]
    RemainderAssign,
    /// `<<=`
    #[display("<<=")]
    LeftShiftAssign,
    /// `>>=`
    #[display(">>=")]
    RightShiftAssign,
    /// `&=`
    #[display("&=")]
    BitwiseAndAssign,
    /// `^=`
    #[display("^=")]
    BitwiseXorAssign,
    /// `|=`
    #[display("|=")]
    BitwiseOrAssign,
}

/// Visibility keyword in front of a declaration
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
pub enum AccessSpecifier {
    /// No keyword; module-private
    #[default]
    #[display("default")]
    Default,
    /// Exported from the module
    #[display("public")]
    Public,
    /// Module-private
    #[display("private")]
    Private,
    /// Visible to derived types
    #[display("protected")]
    Protected,
    /// Declared without a body
    #[display("abstract")]
    Abstract,
    /// Overridable method
    #[display("virtual")]
    Virtual,
    /// Replaces a virtual method
    #[display("override")]
    Override,
}

/// Storage keyword in front of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum StorageClass {
    /// Defined in another module
    #[display("Extern")]
    Extern,
    /// Body is inlined at call sites
    #[display("Inline")]
    Inline,
}
