//! Emitted values, literal coercion and zero initialization

use crate::error::{ErrorKind, Result};
use crate::types::{CodegenKind, CodegenType};
use cy_syntax::PrimitiveType;
use inkwell::types::BasicTypeEnum;
use inkwell::values::{BasicValueEnum, PointerValue};
use std::rc::Rc;

/// Whether an [`EValue`] names storage or holds a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCategory {
    /// An addressable slot; the value is a pointer to the storage
    LValue,
    /// A plain value
    RValue,
}

/// Source value of a literal, kept so it can be re-emitted at another width
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    /// Integer literal as written
    Int(i64),
    /// Float literal as written
    Float(f64),
}

/// An LLVM value together with its source-level type
///
/// An lvalue is typed as pointer-to-T and holds the address of its storage.
#[derive(Debug, Clone, PartialEq)]
pub struct EValue<'ctx> {
    /// The LLVM value
    pub value: BasicValueEnum<'ctx>,
    /// Its source-level type
    pub ty: CodegenType<'ctx>,
    /// Slot or value
    pub category: ValueCategory,
    /// Name of the binding, for lvalues created from declarations
    pub name: Option<String>,
    /// Set for values produced directly by a literal
    pub literal: Option<Literal>,
}

/// Shared handle stored in scopes
pub type EValueRef<'ctx> = Rc<EValue<'ctx>>;

impl<'ctx> EValue<'ctx> {
    /// A plain value of type `ty`
    pub fn rvalue(value: impl Into<BasicValueEnum<'ctx>>, ty: CodegenType<'ctx>) -> Self {
        Self {
            value: value.into(),
            ty,
            category: ValueCategory::RValue,
            name: None,
            literal: None,
        }
    }

    /// A constant produced by `literal`
    pub fn literal(
        value: impl Into<BasicValueEnum<'ctx>>,
        ty: CodegenType<'ctx>,
        literal: Literal,
    ) -> Self {
        Self {
            literal: Some(literal),
            ..Self::rvalue(value, ty)
        }
    }

    /// Address `slot` of a binding called `name` holding a `pointee`
    pub fn lvalue(slot: PointerValue<'ctx>, pointee: CodegenType<'ctx>, name: impl Into<String>) -> Self {
        Self {
            value: slot.into(),
            ty: CodegenType::slot(slot.get_type(), pointee),
            category: ValueCategory::LValue,
            name: Some(name.into()),
            literal: None,
        }
    }

    /// Whether this names storage
    pub fn is_lvalue(&self) -> bool {
        self.category == ValueCategory::LValue
    }

    /// Type of the stored value: the pointee for lvalues, `ty` otherwise
    pub fn value_type(&self) -> &CodegenType<'ctx> {
        match (&self.category, &self.ty.inner) {
            (ValueCategory::LValue, Some(inner)) => inner,
            _ => &self.ty,
        }
    }
}

/// Whether `value` is an LLVM constant
pub fn is_constant(value: BasicValueEnum<'_>) -> bool {
    match value {
        BasicValueEnum::IntValue(int) => int.is_const(),
        BasicValueEnum::FloatValue(float) => float.is_const(),
        BasicValueEnum::PointerValue(pointer) => pointer.is_const(),
        BasicValueEnum::StructValue(aggregate) => aggregate.is_const(),
        BasicValueEnum::ArrayValue(array) => array.is_const(),
        _ => false,
    }
}

/// Constant zero of `ty`
pub fn zero_value<'ctx>(ty: &CodegenType<'ctx>, line: u32) -> Result<BasicValueEnum<'ctx>> {
    let refuse = |what| Err(ErrorKind::NotZeroInitializable { what }.at(line));
    match (&ty.kind, ty.ir) {
        (CodegenKind::Reference, _) => refuse("Reference"),
        (CodegenKind::Primitive(PrimitiveType::Error), _) => refuse("Error type"),
        (_, None) => refuse("Void type"),
        (_, Some(ir)) => Ok(ir.const_zero()),
    }
}

/// Address a reference of type `target` binds to
///
/// Only an lvalue whose stored type has the referenced shape can be bound;
/// its slot address becomes the reference's value.
pub fn reference_binding<'ctx>(
    value: &EValue<'ctx>,
    target: &CodegenType<'ctx>,
) -> Option<BasicValueEnum<'ctx>> {
    let pointee = target.inner.as_deref()?;
    (target.kind == CodegenKind::Reference
        && value.is_lvalue()
        && value.value_type().same_shape(pointee))
    .then_some(value.value)
}

/// Whether `value` is representable in `bits` bits of the given signedness
fn literal_fits(value: i64, bits: u32, unsigned: bool) -> bool {
    let value = i128::from(value);
    if unsigned && value < 0 {
        return false;
    }
    if bits > 64 {
        return true;
    }
    let max = if unsigned {
        (1_i128 << bits) - 1
    } else {
        (1_i128 << (bits - 1)) - 1
    };
    let min = if unsigned { 0 } else { -(1_i128 << (bits - 1)) };
    (min..=max).contains(&value)
}

/// Convert `value` to `target` for a store, a return or an initializer
///
/// Values of the same shape pass through. Integer and float literals are
/// re-emitted at the target width, and an integer literal must fit the
/// target's width and signedness. Numeric values with the same LLVM type
/// (`int` and `int32`) are interchangeable.
pub fn coerce<'ctx>(
    value: &EValue<'ctx>,
    target: &CodegenType<'ctx>,
    line: u32,
) -> Result<BasicValueEnum<'ctx>> {
    let source = value.value_type();
    let mismatch = || {
        ErrorKind::TypeMismatch {
            expected: target.to_string(),
            found: source.to_string(),
        }
        .at(line)
    };
    if value.is_lvalue() {
        return Err(mismatch());
    }

    match (value.literal, target.ir) {
        (Some(Literal::Int(literal)), Some(BasicTypeEnum::IntType(int)))
            if source.is_integer() && target.is_integer() =>
        {
            if !literal_fits(literal, int.get_bit_width(), target.is_unsigned()) {
                return Err(ErrorKind::IntegerOutOfRange {
                    value: literal,
                    ty: target.to_string(),
                }
                .at(line));
            }
            return Ok(int.const_int(literal as u64, literal < 0).into());
        }
        (Some(Literal::Float(literal)), Some(BasicTypeEnum::FloatType(float)))
            if source.is_float() =>
        {
            return Ok(float.const_float(literal).into());
        }
        _ => {}
    }

    let numeric = |ty: &CodegenType<'_>| {
        matches!(ty.kind, CodegenKind::Primitive(_)) && (ty.is_integer() || ty.is_float())
    };
    if source.same_shape(target) || (numeric(source) && numeric(target) && source.ir == target.ir) {
        return Ok(value.value);
    }
    Err(mismatch())
}
