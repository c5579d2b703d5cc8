//! Expression lowering
//!
//! Only literals, identifiers and plain `=` assignment are compiled so far.
//! Every other expression kind is rejected with
//! [`ErrorKind::UnknownExpression`].

use crate::error::{ErrorKind, Result};
use crate::generator::{CodeGenerator, Scope};
use crate::types::CodegenType;
use crate::values::{EValue, Literal, coerce};
use cy_syntax::{AssignmentOp, Node, NodeKind, PrimitiveType};
use inkwell::module::Linkage;
use inkwell::values::{BasicValueEnum, PointerValue};

impl<'ctx> CodeGenerator<'ctx> {
    /// Lower an expression; `scope` is `None` for global initializers
    pub(crate) fn build_expression(
        &mut self,
        node: Node,
        scope: Option<Scope<'ctx>>,
    ) -> Result<EValue<'ctx>> {
        let line = node.line;
        match node.kind {
            NodeKind::IntegerLiteral { value } => {
                let int = CodegenType::primitive(self.context, PrimitiveType::Int);
                if i32::try_from(value).is_err() {
                    return Err(ErrorKind::IntegerOutOfRange {
                        value,
                        ty: int.to_string(),
                    }
                    .at(line));
                }
                let constant = self.context.i32_type().const_int(value as u64, value < 0);
                Ok(EValue::literal(constant, int, Literal::Int(value)))
            }
            NodeKind::FloatLiteral { value } => Ok(EValue::literal(
                self.context.f32_type().const_float(value),
                CodegenType::primitive(self.context, PrimitiveType::Float32),
                Literal::Float(value),
            )),
            NodeKind::BoolLiteral { value } => Ok(EValue::rvalue(
                self.context.bool_type().const_int(u64::from(value), false),
                CodegenType::primitive(self.context, PrimitiveType::Bool),
            )),
            NodeKind::StringLiteral { value } => Ok(EValue::rvalue(
                self.string_constant(&value),
                CodegenType::primitive(self.context, PrimitiveType::String),
            )),
            NodeKind::Identifier { name } => self.lookup(name, scope, line),
            NodeKind::AssignmentExpression { op, target, value } => {
                if op != AssignmentOp::Assign {
                    return Err(ErrorKind::UnsupportedAssignment { op }.at(line));
                }
                let scope = Self::require_scope(scope, line)?;
                self.build_assignment(*target, *value, scope, line)
            }
            kind => Err(ErrorKind::UnknownExpression {
                node: kind.node_type(),
            }
            .at(line)),
        }
    }

    /// Pointer to the first byte of a private, NUL-terminated `.str` global
    #[expect(unsafe_code, reason = "constant GEP into a global created here")]
    fn string_constant(&self, value: &str) -> PointerValue<'ctx> {
        let bytes = self.context.const_string(value.as_bytes(), true);
        let global = self.module.add_global(bytes.get_type(), None, ".str");
        global.set_linkage(Linkage::Private);
        global.set_constant(true);
        global.set_unnamed_addr(true);
        global.set_alignment(1);
        global.set_initializer(&bytes);

        let zero = self.context.i32_type().const_zero();
        // SAFETY: indices 0, 0 address the first element of the array global.
        unsafe {
            global.as_pointer_value().const_in_bounds_gep(&[zero, zero])
        }
    }

    /// Locals shadow globals, which shadow functions
    fn lookup(&self, name: String, scope: Option<Scope<'ctx>>, line: u32) -> Result<EValue<'ctx>> {
        let local = scope
            .zip(self.current.as_ref())
            .and_then(|(scope, state)| state.scopes.get(scope, &name));
        if let Some(binding) = local {
            return Ok(EValue::clone(binding));
        }
        if let Some(global) = self.globals.get(&name) {
            return Ok(EValue::lvalue(global.handle.as_pointer_value(), global.ty.clone(), name));
        }
        if let Some(function) = self.functions.get(&name) {
            let pointer = function.handle.as_global_value().as_pointer_value();
            return Ok(EValue::rvalue(pointer, CodegenType::function(pointer.get_type())));
        }
        Err(ErrorKind::UndefinedIdentifier { name }.at(line))
    }

    fn build_assignment(
        &mut self,
        target: Node,
        value: Node,
        scope: Scope<'ctx>,
        line: u32,
    ) -> Result<EValue<'ctx>> {
        let target = self.build_expression(target, Some(scope))?;
        let slot = match target.value {
            BasicValueEnum::PointerValue(slot) if target.is_lvalue() => slot,
            _ => return Err(ErrorKind::InvalidAssignmentTarget.at(line)),
        };
        let slot_type = target.value_type().clone();
        if slot_type.is_const {
            let name = target.name.clone().unwrap_or_default();
            return Err(ErrorKind::AssignToConstant { name }.at(line));
        }

        let value = self.build_expression(value, Some(scope))?;
        let value = self.load(value, line)?;
        let stored = coerce(&value, &slot_type, line)?;
        self.emit_store(slot, stored, line)?;
        Ok(EValue::rvalue(stored, slot_type))
    }

    /// Read the value stored behind an lvalue; rvalues pass through
    pub(crate) fn load(&mut self, value: EValue<'ctx>, line: u32) -> Result<EValue<'ctx>> {
        let slot = match value.value {
            BasicValueEnum::PointerValue(slot) if value.is_lvalue() => slot,
            _ => return Ok(value),
        };
        let pointee = value.value_type().clone();
        let hint = format!("{}.val", value.name.as_deref().unwrap_or("tmp"));
        let loaded = self.emit_load(slot, &hint, line)?;
        Ok(EValue::rvalue(loaded, pointee))
    }
}
