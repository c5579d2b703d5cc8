//! Code generation errors
//!
//! Every error is fatal and carries the 1-based source line it was raised
//! on. The driver renders it with the source panel and stops.

use cy_syntax::{AccessSpecifier, AssignmentOp, NodeType};
use inkwell::builder::BuilderError;
use miette::Diagnostic;
use thiserror::Error;

/// Result alias used throughout code generation
pub type Result<T, E = CodegenError> = std::result::Result<T, E>;

/// A fatal diagnostic at a source line
#[derive(Debug, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic(forward(kind))]
pub struct CodegenError {
    /// 1-based line of the offending statement
    pub line: u32,
    /// What went wrong
    pub kind: ErrorKind,
}

impl CodegenError {
    /// Line the error was raised on
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The error without its position
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

/// Everything that can stop code generation
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ErrorKind {
    /// A statement list at module level
    #[error("Invalid program.")]
    #[diagnostic(
        code(codegen::invalid_program),
        help("blocks are only allowed inside function bodies")
    )]
    InvalidProgram,

    /// A function-body construct compiled without a scope
    #[error("Scope is required to compile this instruction.")]
    #[diagnostic(code(codegen::scope_required))]
    ScopeRequired,

    /// Second global with the same name
    #[error("Global variable '{name}' is already defined in this module.")]
    #[diagnostic(code(codegen::duplicate_global))]
    DuplicateGlobal {
        /// The global's name
        name: String,
    },

    /// Second function with the same name
    #[error("Function '{name}' is already defined in this module.")]
    #[diagnostic(code(codegen::duplicate_function))]
    DuplicateFunction {
        /// The function's name
        name: String,
    },

    /// Second type alias, struct or enum with the same name
    #[error("Type '{name}' is already defined in this module.")]
    #[diagnostic(code(codegen::duplicate_type))]
    DuplicateType {
        /// The type's name
        name: String,
    },

    /// Redeclaration at the same scope level
    #[error("Variable '{name}' is already declared in the current scope.")]
    #[diagnostic(code(codegen::duplicate_variable))]
    DuplicateVariable {
        /// The variable's name
        name: String,
    },

    /// Two parameters of one function share a name
    #[error("Parameter '{name}' is declared more than once in function '{function}'.")]
    #[diagnostic(code(codegen::duplicate_parameter))]
    DuplicateParameter {
        /// Function being declared
        function: String,
        /// The repeated parameter
        name: String,
    },

    /// `protected` and other specifiers globals cannot take
    #[error("Unsupported access specifier for global variable: {access}")]
    #[diagnostic(code(codegen::unsupported_access))]
    UnsupportedGlobalAccess {
        /// The rejected specifier
        access: AccessSpecifier,
    },

    /// `extern` global with an initializer
    #[error("Extern storage class specifier cannot have an initializer.")]
    #[diagnostic(code(codegen::extern_initializer))]
    ExternWithInitializer,

    /// `inline` on a global
    #[error("Inline storage class specifier is not supported for global variables.")]
    #[diagnostic(code(codegen::inline_global))]
    InlineGlobal,

    /// `inline` on a body-less declaration
    #[error("Inline storage class specifier is not supported for function declarations.")]
    #[diagnostic(code(codegen::inline_declaration))]
    InlineDeclaration,

    /// `extern` on a function with a body
    #[error("Function definition cannot get an extern storage class.")]
    #[diagnostic(code(codegen::extern_definition))]
    ExternDefinition,

    /// Global with neither a type nor an initializer
    #[error("Global variable type is not specified and initializer is not a constant.")]
    #[diagnostic(code(codegen::missing_type))]
    MissingGlobalType,

    /// Local with neither a type nor an initializer
    #[error("Variable type is not specified and initializer is not a constant.")]
    #[diagnostic(code(codegen::missing_type))]
    MissingVariableType,

    /// Global initializer that folds to no constant
    #[error("Global variable initializer is not a constant.")]
    #[diagnostic(code(codegen::non_constant_initializer))]
    NonConstantInitializer,

    /// Reference, void or error type without an initializer
    #[error("{what} cannot be zero-initialized.")]
    #[diagnostic(code(codegen::zero_initialization))]
    NotZeroInitializable {
        /// Human name of the kind
        what: &'static str,
    },

    /// Identifier type with no table entry
    #[error("Type '{name}' is not defined in this module.")]
    #[diagnostic(code(codegen::undefined_type))]
    UndefinedType {
        /// The unknown name
        name: String,
    },

    /// A struct field whose type is the struct itself
    #[error("Struct '{name}' cannot contain itself by value.")]
    #[diagnostic(
        code(codegen::recursive_struct),
        help("use a pointer to '{name}' for the field instead")
    )]
    RecursiveStruct {
        /// The struct being defined
        name: String,
    },

    /// Struct or enum definition without a name
    #[error("Anonymous {what} definitions are not supported here.")]
    #[diagnostic(code(codegen::anonymous_type))]
    AnonymousType {
        /// `struct` or `enum`
        what: &'static str,
    },

    /// Parameter typed `void`
    #[error("Parameter '{name}' cannot have type void.")]
    #[diagnostic(code(codegen::void_parameter))]
    VoidParameter {
        /// The parameter's name
        name: String,
    },

    /// Local or field typed `void`
    #[error("Variable '{name}' cannot have type void.")]
    #[diagnostic(code(codegen::void_variable))]
    VoidVariable {
        /// The variable's name
        name: String,
    },

    /// Name bound in no scope, global or function table
    #[error("Undefined identifier '{name}'.")]
    #[diagnostic(code(codegen::undefined_identifier))]
    UndefinedIdentifier {
        /// The unknown name
        name: String,
    },

    /// Expression kind with no lowering
    #[error("Unknown expression type.")]
    #[diagnostic(
        code(codegen::unknown_expression),
        help("'{node}' expressions cannot be compiled yet")
    )]
    UnknownExpression {
        /// Kind of the rejected node
        node: NodeType,
    },

    /// Statement that is not allowed at this nesting level
    #[error("Statement '{node}' is not allowed here.")]
    #[diagnostic(code(codegen::unexpected_statement))]
    UnexpectedStatement {
        /// Kind of the rejected node
        node: NodeType,
    },

    /// Integer literal outside the range of the type it is stored as
    #[error("Integer literal {value} does not fit in type '{ty}'.")]
    #[diagnostic(code(codegen::integer_overflow))]
    IntegerOutOfRange {
        /// The literal as written
        value: i64,
        /// Type it had to fit
        ty: String,
    },

    /// Value of one type used where another is required
    #[error("Type mismatch: expected '{expected}' but found '{found}'.")]
    #[diagnostic(code(codegen::type_mismatch))]
    TypeMismatch {
        /// Required type
        expected: String,
        /// Type of the value
        found: String,
    },

    /// `return x;` in a void function
    #[error("Cannot return a value from a function returning void.")]
    #[diagnostic(code(codegen::return_type))]
    ReturnValueInVoid,

    /// `return;` in a non-void function
    #[error("Function '{function}' must return a value of type '{expected}'.")]
    #[diagnostic(code(codegen::return_type))]
    MissingReturnValue {
        /// The enclosing function
        function: String,
        /// Its declared return type
        expected: String,
    },

    /// `break` or `continue` with no enclosing loop
    #[error("'{keyword}' used outside of a loop.")]
    #[diagnostic(code(codegen::outside_loop))]
    OutsideLoop {
        /// The offending keyword
        keyword: &'static str,
    },

    /// Store into a `const` binding
    #[error("Cannot assign to constant '{name}'.")]
    #[diagnostic(code(codegen::assign_to_constant))]
    AssignToConstant {
        /// The constant's name
        name: String,
    },

    /// Store into something that is not an lvalue
    #[error("Left side of an assignment must be a variable.")]
    #[diagnostic(code(codegen::invalid_assignment_target))]
    InvalidAssignmentTarget,

    /// Compound assignment such as `+=`
    #[error("Unsupported assignment operator '{op}'.")]
    #[diagnostic(code(codegen::unsupported_assignment))]
    UnsupportedAssignment {
        /// The rejected operator
        op: AssignmentOp,
    },

    /// The LLVM builder refused an instruction
    #[error("LLVM builder error: {0}")]
    #[diagnostic(code(codegen::backend))]
    Backend(String),
}

impl ErrorKind {
    /// Attach the source line the error was raised on
    pub fn at(self, line: u32) -> CodegenError {
        CodegenError { line, kind: self }
    }
}

impl From<BuilderError> for ErrorKind {
    fn from(err: BuilderError) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Positions builder failures at the statement that triggered them
pub(crate) trait BuilderResultExt<T> {
    fn at_line(self, line: u32) -> Result<T>;
}

impl<T> BuilderResultExt<T> for std::result::Result<T, BuilderError> {
    fn at_line(self, line: u32) -> Result<T> {
        self.map_err(|err| ErrorKind::from(err).at(line))
    }
}
