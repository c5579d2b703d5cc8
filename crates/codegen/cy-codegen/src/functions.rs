//! Function definitions and declarations

use crate::error::{ErrorKind, Result};
use crate::generator::{CodeGenerator, FunctionRecord, FunctionState, Scope, Variadic};
use crate::scope::ScopeTree;
use crate::types::CodegenType;
use crate::values::EValue;
use cy_syntax::{
    AccessSpecifier, FunctionDeclaration, FunctionDefinition, FunctionParameters, Node, NodeType,
    StorageClass, TypeSpecifier,
};
use inkwell::attributes::{Attribute, AttributeLoc};
use inkwell::context::Context;
use inkwell::module::Linkage;
use inkwell::types::{BasicMetadataTypeEnum, BasicType as _, FunctionType};
use inkwell::values::FunctionValue;
use std::rc::Rc;

/// Lowered signature of a function
struct Signature<'ctx> {
    params: Vec<(String, CodegenType<'ctx>)>,
    variadic: Variadic<'ctx>,
    return_type: CodegenType<'ctx>,
}

impl<'ctx> Signature<'ctx> {
    fn fn_type(&self, context: &'ctx Context) -> FunctionType<'ctx> {
        let params: Vec<BasicMetadataTypeEnum<'ctx>> = self
            .params
            .iter()
            .filter_map(|(_, ty)| ty.ir)
            .map(Into::into)
            .collect();
        let variadic = self.variadic != Variadic::No;
        match self.return_type.ir {
            Some(ret) => ret.fn_type(&params, variadic),
            None => context.void_type().fn_type(&params, variadic),
        }
    }
}

impl<'ctx> CodeGenerator<'ctx> {
    fn ensure_function_name_free(&self, name: &str, line: u32) -> Result<()> {
        if self.functions.contains_key(name) || self.has_symbol(name) {
            return Err(ErrorKind::DuplicateFunction {
                name: name.to_string(),
            }
            .at(line));
        }
        Ok(())
    }

    fn lower_signature(
        &self,
        function: &str,
        params: &FunctionParameters,
        return_type: Option<&TypeSpecifier>,
        line: u32,
    ) -> Result<Signature<'ctx>> {
        let return_type = match return_type {
            Some(ty) => self.types.resolve(ty, line)?,
            None => CodegenType::void(),
        };

        let mut lowered: Vec<(String, CodegenType<'ctx>)> = Vec::with_capacity(params.list.len());
        for param in &params.list {
            if lowered.iter().any(|(name, _)| *name == param.name) {
                return Err(ErrorKind::DuplicateParameter {
                    function: function.to_string(),
                    name: param.name.clone(),
                }
                .at(line));
            }
            let ty = self.types.resolve(&param.ty, line)?;
            if ty.is_void() {
                return Err(ErrorKind::VoidParameter {
                    name: param.name.clone(),
                }
                .at(line));
            }
            lowered.push((param.name.clone(), ty));
        }

        let variadic = match (&params.variadic_type, params.is_variadic) {
            (Some(ty), _) => Variadic::Typed(self.types.resolve(ty, line)?),
            (None, true) => Variadic::Untyped,
            (None, false) => Variadic::No,
        };

        Ok(Signature {
            params: lowered,
            variadic,
            return_type,
        })
    }

    /// Lower a function definition; `symbol` overrides the emitted name
    /// (used for methods)
    pub(crate) fn build_function(
        &mut self,
        def: FunctionDefinition,
        symbol: Option<String>,
        line: u32,
    ) -> Result<()> {
        if self.current.is_some() {
            return Err(ErrorKind::UnexpectedStatement {
                node: NodeType::FunctionDefinition,
            }
            .at(line));
        }

        let name = symbol.unwrap_or_else(|| def.name.clone());
        self.ensure_function_name_free(&name, line)?;
        let signature = self.lower_signature(&name, &def.params, def.return_type.as_ref(), line)?;

        let inline = match def.storage {
            Some(StorageClass::Extern) => return Err(ErrorKind::ExternDefinition.at(line)),
            Some(StorageClass::Inline) => true,
            None => false,
        };
        let public = def.access == AccessSpecifier::Public;
        let exported = public && !inline;
        let linkage = match (inline, public) {
            (true, true) => Linkage::AvailableExternally,
            (false, true) => Linkage::External,
            // The program entry point must stay visible to the linker.
            (false, false) if name == "main" => Linkage::External,
            _ => Linkage::Internal,
        };

        let function = self
            .module
            .add_function(&name, signature.fn_type(self.context), Some(linkage));
        if inline {
            let kind = Attribute::get_named_enum_kind_id("alwaysinline");
            function.add_attribute(AttributeLoc::Function, self.context.create_enum_attribute(kind, 0));
        }
        for (value, (param, _)) in function.get_param_iter().zip(&signature.params) {
            value.set_name(param);
        }

        self.functions.insert(
            name.clone(),
            FunctionRecord {
                handle: function,
                params: signature.params.clone(),
                variadic: signature.variadic.clone(),
                return_type: signature.return_type.clone(),
                exported,
                defined: true,
            },
        );
        log::debug!("function '{name}' ({} params, {linkage:?})", signature.params.len());

        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);

        let mut scopes = ScopeTree::new();
        let root = scopes.create_root();
        self.current = Some(FunctionState {
            name,
            function,
            scopes,
            return_type: signature.return_type,
            loops: Vec::new(),
        });
        let outcome = self
            .bind_parameters(function, &signature.params, root, line)
            .and_then(|()| self.build_body(def.body, root));
        let state = self.current.take();
        outcome?;

        match state {
            Some(state) => self.finish_function(&state, line),
            None => Ok(()),
        }
    }

    /// Spill each parameter to a `<name>.addr` slot and bind it in `root`
    fn bind_parameters(
        &mut self,
        function: FunctionValue<'ctx>,
        params: &[(String, CodegenType<'ctx>)],
        root: Scope<'ctx>,
        line: u32,
    ) -> Result<()> {
        for (value, (name, ty)) in function.get_param_iter().zip(params) {
            let slot = self.emit_alloca(value.get_type(), &format!("{name}.addr"), line)?;
            self.emit_store(slot, value, line)?;
            let binding = Rc::new(EValue::lvalue(slot, ty.clone(), name.clone()));
            self.state(line)?.scopes.set(root, name.clone(), binding);
        }
        Ok(())
    }

    fn build_body(&mut self, body: Vec<Node>, root: Scope<'ctx>) -> Result<()> {
        for statement in body {
            self.build_statement(statement, Some(root))?;
        }
        Ok(())
    }

    /// A body-less signature; always external so the linker can resolve it
    pub(crate) fn build_function_declaration(
        &mut self,
        decl: FunctionDeclaration,
        line: u32,
    ) -> Result<()> {
        self.ensure_function_name_free(&decl.name, line)?;
        let signature =
            self.lower_signature(&decl.name, &decl.params, decl.return_type.as_ref(), line)?;
        if decl.storage == Some(StorageClass::Inline) {
            return Err(ErrorKind::InlineDeclaration.at(line));
        }

        let function = self.module.add_function(
            &decl.name,
            signature.fn_type(self.context),
            Some(Linkage::External),
        );
        log::debug!("declared function '{}'", decl.name);
        self.functions.insert(
            decl.name,
            FunctionRecord {
                handle: function,
                params: signature.params,
                variadic: signature.variadic,
                return_type: signature.return_type,
                exported: decl.access == AccessSpecifier::Public,
                defined: false,
            },
        );
        Ok(())
    }
}
