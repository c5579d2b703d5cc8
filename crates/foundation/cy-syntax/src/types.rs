//! Source-level type specifiers

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building syntax nodes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstError {
    /// A primitive kind was given an inner type
    #[error("Internal type {kind} cannot have a inner value.")]
    InnerNotAllowed {
        /// The primitive kind
        kind: TypeKind,
    },

    /// A nested kind was built without its inner type
    #[error("Internal type {kind} requires an inner value.")]
    InnerRequired {
        /// The nested kind
        kind: TypeKind,
    },
}

/// Built-in scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// Platform `int`, 32 bits
    #[display("int")]
    Int,
    /// Signed 8-bit
    #[display("int8")]
    Int8,
    /// Signed 16-bit
    #[display("int16")]
    Int16,
    /// Signed 32-bit
    #[display("int32")]
    Int32,
    /// Signed 64-bit
    #[display("int64")]
    Int64,
    /// Signed 128-bit
    #[display("int128")]
    Int128,
    /// Platform `uint`, 32 bits
    #[display("uint")]
    UInt,
    /// Unsigned 8-bit
    #[display("uint8")]
    UInt8,
    /// Unsigned 16-bit
    #[display("uint16")]
    UInt16,
    /// Unsigned 32-bit
    #[display("uint32")]
    UInt32,
    /// Unsigned 64-bit
    #[display("uint64")]
    UInt64,
    /// Unsigned 128-bit
    #[display("uint128")]
    UInt128,
    /// IEEE single
    #[display("float32")]
    Float32,
    /// IEEE double
    #[display("float64")]
    Float64,
    /// IEEE quad
    #[display("float128")]
    Float128,
    /// `true` or `false`
    #[display("bool")]
    Bool,
    /// A single byte character
    #[display("char")]
    Char,
    /// Unsigned 8-bit data
    #[display("byte")]
    Byte,
    /// Pointer to NUL-terminated bytes
    #[display("string")]
    String,
    /// No value
    #[display("void")]
    Void,
    /// Placeholder for a type that failed to resolve
    #[display("error")]
    Error,
}

/// Discriminant of a [`TypeSpecifier`]
///
/// Covers every primitive plus the four constructors that wrap another
/// element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TypeKind {
    /// A primitive
    #[display("{_0}")]
    Primitive(PrimitiveType),
    /// Pointer to the inner type
    #[display("PointerOf")]
    Pointer,
    /// Reference to the inner type
    #[display("Reference")]
    Reference,
    /// Read-only inner type
    #[display("Const")]
    Const,
    /// User-defined name
    #[display("Identifier")]
    Identifier,
}

impl From<PrimitiveType> for TypeKind {
    fn from(primitive: PrimitiveType) -> Self {
        Self::Primitive(primitive)
    }
}

/// A type as written in source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSpecifier {
    /// A built-in scalar
    Primitive(PrimitiveType),
    /// `*T`
    Pointer(Box<TypeSpecifier>),
    /// `&T`
    Reference(Box<TypeSpecifier>),
    /// `const T`
    Const(Box<TypeSpecifier>),
    /// A user-defined name (type alias, struct or enum)
    Identifier(String),
}

impl TypeSpecifier {
    /// Build a specifier from a kind that carries no inner element
    pub fn simple(kind: TypeKind) -> Result<Self, AstError> {
        match kind {
            TypeKind::Primitive(primitive) => Ok(Self::Primitive(primitive)),
            nested => Err(AstError::InnerRequired { kind: nested }),
        }
    }

    /// Wrap `inner` in a nested constructor
    ///
    /// Fails for primitive kinds. [`TypeKind::Identifier`] wraps nothing but
    /// a name, so it is built with [`TypeSpecifier::named`] instead.
    pub fn nested(kind: TypeKind, inner: TypeSpecifier) -> Result<Self, AstError> {
        let inner = Box::new(inner);
        match kind {
            TypeKind::Pointer => Ok(Self::Pointer(inner)),
            TypeKind::Reference => Ok(Self::Reference(inner)),
            TypeKind::Const => Ok(Self::Const(inner)),
            TypeKind::Primitive(_) | TypeKind::Identifier => {
                Err(AstError::InnerNotAllowed { kind })
            }
        }
    }

    /// A user-defined type name
    pub fn named(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// Discriminant of this specifier
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Primitive(primitive) => TypeKind::Primitive(*primitive),
            Self::Pointer(_) => TypeKind::Pointer,
            Self::Reference(_) => TypeKind::Reference,
            Self::Const(_) => TypeKind::Const,
            Self::Identifier(_) => TypeKind::Identifier,
        }
    }

    /// The wrapped specifier of a pointer, reference or const
    pub fn inner(&self) -> Option<&TypeSpecifier> {
        match self {
            Self::Pointer(inner) | Self::Reference(inner) | Self::Const(inner) => Some(inner),
            Self::Primitive(_) | Self::Identifier(_) => None,
        }
    }
}

impl std::fmt::Display for TypeSpecifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::Identifier(name) => write!(f, "Identifier({name})"),
            Self::Pointer(inner) | Self::Reference(inner) | Self::Const(inner) => {
                write!(f, "{} {inner}", self.kind())
            }
        }
    }
}
