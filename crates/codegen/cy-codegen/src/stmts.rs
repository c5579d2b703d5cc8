//! Statements, local variables and control flow

use crate::error::{ErrorKind, Result};
use crate::generator::{CodeGenerator, LoopTargets, Scope};
use crate::types::{CodegenKind, CodegenType};
use crate::values::{EValue, coerce, reference_binding, zero_value};
use cy_syntax::{
    EnumDefinition, FunctionDefinition, Node, NodeKind, NodeType, StructDefinition,
    VariableDeclaration,
};
use inkwell::types::BasicTypeEnum;
use inkwell::values::{BasicValueEnum, IntValue};
use std::rc::Rc;

impl<'ctx> CodeGenerator<'ctx> {
    /// Lower one statement; `scope` is `None` at module level
    pub(crate) fn build_statement(&mut self, node: Node, scope: Option<Scope<'ctx>>) -> Result<()> {
        let line = node.line;
        match node.kind {
            NodeKind::VariableDeclaration(decl) => self.build_local(decl, scope, line),
            NodeKind::StatementList { statements } => {
                let parent = Self::require_scope(scope, line)?;
                let block = self.state(line)?.scopes.create_child(parent);
                for statement in statements {
                    self.build_statement(statement, Some(block))?;
                }
                Ok(())
            }
            NodeKind::TypeDefStatement { name, ty } => {
                let resolved = self.types.resolve(&ty, line)?;
                log::debug!("type alias '{name}' = {resolved}");
                self.types.define(&name, resolved, line)
            }
            NodeKind::StructDefinition(def) => self.build_struct(def, scope, line),
            NodeKind::EnumDefinition(def) => self.build_enum(def, scope, line),
            NodeKind::FunctionDeclaration(decl) if scope.is_none() => {
                self.build_function_declaration(decl, line)
            }
            NodeKind::ImportStatement { path } => {
                log::debug!("import {}", path.join("::"));
                self.imports.push(path);
                Ok(())
            }
            NodeKind::ReturnStatement { value } => self.build_return(value.map(|v| *v), scope, line),
            NodeKind::BreakStatement => self.build_loop_jump(true, scope, line),
            NodeKind::ContinueStatement => self.build_loop_jump(false, scope, line),
            NodeKind::IfStatement {
                condition,
                then_branch,
                else_branch,
            } => self.build_if(*condition, *then_branch, else_branch.map(|b| *b), scope, line),
            NodeKind::ForStatement {
                init,
                condition,
                increment,
                body,
            } => {
                let clauses = [init, condition, increment].map(|clause| clause.map(|c| *c));
                self.build_for(clauses, *body, scope, line)
            }
            kind @ (NodeKind::FunctionDefinition(_)
            | NodeKind::FunctionDeclaration(_)
            | NodeKind::GlobalVariableDeclaration(_)) => Err(ErrorKind::UnexpectedStatement {
                node: kind.node_type(),
            }
            .at(line)),
            expression => {
                // Expression statement: evaluated for its effects, result dropped.
                let scope = Self::require_scope(scope, line)?;
                self.build_expression(Node::new(line, expression), Some(scope))?;
                Ok(())
            }
        }
    }

    fn build_local(
        &mut self,
        decl: VariableDeclaration,
        scope: Option<Scope<'ctx>>,
        line: u32,
    ) -> Result<()> {
        let scope = Self::require_scope(scope, line)?;
        let VariableDeclaration {
            name,
            ty,
            initializer,
        } = decl;

        if self.state(line)?.scopes.contains_local(scope, &name) {
            return Err(ErrorKind::DuplicateVariable { name }.at(line));
        }

        let declared = ty.map(|ty| self.types.resolve(&ty, line)).transpose()?;
        let initializer = initializer
            .map(|expr| self.build_expression(*expr, Some(scope)))
            .transpose()?;

        let codegen_type = match (declared, &initializer) {
            (Some(declared), _) => declared,
            (None, Some(init)) => CodegenType {
                is_const: false,
                ..init.value_type().clone()
            },
            (None, None) => return Err(ErrorKind::MissingVariableType.at(line)),
        };
        let Some(ir) = codegen_type.ir else {
            return Err(ErrorKind::VoidVariable { name }.at(line));
        };

        let value = match initializer {
            Some(init) => match reference_binding(&init, &codegen_type) {
                Some(address) => address,
                None => {
                    let init = self.load(init, line)?;
                    coerce(&init, &codegen_type, line)?
                }
            },
            None => zero_value(&codegen_type, line)?,
        };

        let slot = self.emit_alloca(ir, &name, line)?;
        self.emit_store(slot, value, line)?;
        log::trace!("local '{name}': {codegen_type}");
        let binding = EValue::lvalue(slot, codegen_type, name.clone());
        self.state(line)?.scopes.set(scope, name, Rc::new(binding));
        Ok(())
    }

    fn build_return(&mut self, value: Option<Node>, scope: Option<Scope<'ctx>>, line: u32) -> Result<()> {
        let scope = Self::require_scope(scope, line)?;
        let state = self.state(line)?;
        let return_type = state.return_type.clone();
        let function = state.name.clone();

        let value = match (value, return_type.is_void()) {
            (None, true) => None,
            (None, false) => {
                return Err(ErrorKind::MissingReturnValue {
                    function,
                    expected: return_type.to_string(),
                }
                .at(line));
            }
            (Some(_), true) => return Err(ErrorKind::ReturnValueInVoid.at(line)),
            (Some(expr), false) => {
                let value = self.build_expression(expr, Some(scope))?;
                let value = self.load(value, line)?;
                Some(coerce(&value, &return_type, line)?)
            }
        };
        self.emit_return(value, line)
    }

    /// Evaluate a loop or branch condition, which must be `bool`
    fn build_condition(
        &mut self,
        condition: Node,
        scope: Scope<'ctx>,
        line: u32,
    ) -> Result<IntValue<'ctx>> {
        let value = self.build_expression(condition, Some(scope))?;
        let value = self.load(value, line)?;
        match value.value {
            BasicValueEnum::IntValue(flag) if value.value_type().is_bool() => Ok(flag),
            _ => Err(ErrorKind::TypeMismatch {
                expected: "bool".to_string(),
                found: value.value_type().to_string(),
            }
            .at(line)),
        }
    }

    fn build_if(
        &mut self,
        condition: Node,
        then_branch: Node,
        else_branch: Option<Node>,
        scope: Option<Scope<'ctx>>,
        line: u32,
    ) -> Result<()> {
        let scope = Self::require_scope(scope, line)?;
        let cond = self.build_condition(condition, scope, line)?;

        let then_block = self.append_block("if.then", line)?;
        let else_block = match else_branch {
            Some(_) => Some(self.append_block("if.else", line)?),
            None => None,
        };
        let end_block = self.append_block("if.end", line)?;
        self.emit_cond_branch(cond, then_block, else_block.unwrap_or(end_block), line)?;

        let branches = [(then_block, Some(then_branch)), (else_block.unwrap_or(end_block), else_branch)];
        for (block, branch) in branches {
            let Some(branch) = branch else { continue };
            self.builder.position_at_end(block);
            let inner = self.state(line)?.scopes.create_child(scope);
            self.build_statement(branch, Some(inner))?;
            if !self.is_terminated() {
                self.emit_branch(end_block, line)?;
            }
        }

        self.builder.position_at_end(end_block);
        Ok(())
    }

    fn build_for(
        &mut self,
        [init, condition, increment]: [Option<Node>; 3],
        body: Node,
        scope: Option<Scope<'ctx>>,
        line: u32,
    ) -> Result<()> {
        let scope = Self::require_scope(scope, line)?;
        let loop_scope = self.state(line)?.scopes.create_child(scope);
        if let Some(init) = init {
            self.build_statement(init, Some(loop_scope))?;
        }

        let cond_block = self.append_block("for.cond", line)?;
        let body_block = self.append_block("for.body", line)?;
        let inc_block = self.append_block("for.inc", line)?;
        let end_block = self.append_block("for.end", line)?;
        self.emit_branch(cond_block, line)?;
        self.builder.position_at_end(cond_block);

        match condition {
            Some(condition) => {
                let cond = self.build_condition(condition, loop_scope, line)?;
                self.emit_cond_branch(cond, body_block, end_block, line)?;
            }
            None => self.emit_branch(body_block, line)?,
        }

        self.builder.position_at_end(body_block);
        let state = self.state(line)?;
        state.loops.push(LoopTargets {
            break_to: end_block,
            continue_to: inc_block,
        });
        let body_scope = state.scopes.create_child(loop_scope);
        let outcome = self.build_statement(body, Some(body_scope));
        self.state(line)?.loops.pop();
        outcome?;

        if !self.is_terminated() {
            self.emit_branch(inc_block, line)?;
        }
        self.builder.position_at_end(inc_block);
        if let Some(increment) = increment {
            self.build_statement(increment, Some(loop_scope))?;
        }

        self.emit_branch(cond_block, line)?;
        self.builder.position_at_end(end_block);
        Ok(())
    }

    fn build_loop_jump(&mut self, is_break: bool, scope: Option<Scope<'ctx>>, line: u32) -> Result<()> {
        Self::require_scope(scope, line)?;
        let keyword = if is_break { "break" } else { "continue" };
        let targets = self
            .state(line)?
            .loops
            .last()
            .copied()
            .ok_or_else(|| ErrorKind::OutsideLoop { keyword }.at(line))?;
        let target = if is_break {
            targets.break_to
        } else {
            targets.continue_to
        };
        self.emit_branch(target, line)
    }

    fn build_methods(
        &mut self,
        owner: &str,
        methods: Vec<FunctionDefinition>,
        scope: Option<Scope<'ctx>>,
        line: u32,
    ) -> Result<()> {
        if scope.is_some() && !methods.is_empty() {
            return Err(ErrorKind::UnexpectedStatement {
                node: NodeType::FunctionDefinition,
            }
            .at(line));
        }
        for method in methods {
            let symbol = format!("{owner}.{}", method.name);
            self.build_function(method, Some(symbol), line)?;
        }
        Ok(())
    }

    /// Named struct: registered before its fields resolve, so fields may
    /// point to the struct itself
    fn build_struct(&mut self, def: StructDefinition, scope: Option<Scope<'ctx>>, line: u32) -> Result<()> {
        let name = def
            .name
            .ok_or_else(|| ErrorKind::AnonymousType { what: "struct" }.at(line))?;
        if self.types.get(&name).is_some() {
            return Err(ErrorKind::DuplicateType { name }.at(line));
        }
        let struct_ir = self.context.opaque_struct_type(&name);
        let struct_type = CodegenType {
            kind: CodegenKind::Struct(name.clone()),
            ir: Some(struct_ir.into()),
            inner: None,
            is_const: false,
        };
        self.types.define(&name, struct_type.clone(), line)?;

        let mut fields: Vec<BasicTypeEnum<'ctx>> = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            let ty = self.types.resolve(&field.ty, line)?;
            if ty.same_shape(&struct_type) {
                return Err(ErrorKind::RecursiveStruct { name }.at(line));
            }
            let Some(ir) = ty.ir else {
                return Err(ErrorKind::VoidVariable {
                    name: field.name.clone(),
                }
                .at(line));
            };
            fields.push(ir);
        }
        struct_ir.set_body(&fields, false);
        log::debug!("struct '{name}' with {} fields", def.fields.len());

        self.build_methods(&name, def.methods, scope, line)
    }

    /// Enums lower to an `i32` discriminant; variant payloads are not
    /// materialized
    fn build_enum(&mut self, def: EnumDefinition, scope: Option<Scope<'ctx>>, line: u32) -> Result<()> {
        let name = def
            .name
            .ok_or_else(|| ErrorKind::AnonymousType { what: "enum" }.at(line))?;
        let enum_type = CodegenType {
            kind: CodegenKind::Enum(name.clone()),
            ir: Some(self.context.i32_type().into()),
            inner: None,
            is_const: false,
        };
        self.types.define(&name, enum_type, line)?;
        for item in def.variants.iter().flat_map(|variant| &variant.items) {
            self.types.resolve(&item.ty, line)?;
        }
        log::debug!("enum '{name}' with {} variants", def.variants.len());

        self.build_methods(&name, def.methods, scope, line)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::*;
    use cy_syntax::{AccessSpecifier, PrimitiveType};
    use expect_test::expect;
    use inkwell::context::Context;

    #[test]
    fn test_local_requires_scope() {
        let context = Context::create();
        let (_, err) = compile_err(&context, vec![ret(None)]);
        assert_eq!(err.to_string(), "Scope is required to compile this instruction.");
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn test_local_type_inference_and_zero_init() {
        let context = Context::create();
        let generator = compile(
            &context,
            vec![function(
                "f",
                vec![],
                None,
                vec![
                    local_decl("a", None, Some(int_lit(5))),
                    local_decl("b", Some(prim(PrimitiveType::Float64)), None),
                    local_decl("c", Some(prim(PrimitiveType::Int64)), Some(int_lit(7))),
                    local_decl("s", None, Some(string_lit("ok"))),
                ],
            )],
        )
        .unwrap();

        expect![[r#"
            define internal void @f() {
            entry:
              %a = alloca i32, align 4
              store i32 5, i32* %a, align 4
              %b = alloca double, align 8
              store double 0.000000e+00, double* %b, align 8
              %c = alloca i64, align 8
              store i64 7, i64* %c, align 4
              %s = alloca i8*, align 8
              store i8* getelementptr inbounds ([3 x i8], [3 x i8]* @.str, i32 0, i32 0), i8** %s, align 8
              ret void
            }
        "#]]
        .assert_eq(&function_ir(&generator, "f"));
    }

    #[test]
    fn test_local_without_type_or_initializer_fails() {
        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![function("f", vec![], None, vec![local_decl("x", None, None)])],
        );
        assert_eq!(
            err.to_string(),
            "Variable type is not specified and initializer is not a constant."
        );

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![function(
                "f",
                vec![],
                None,
                vec![local_decl("small", Some(prim(PrimitiveType::Int8)), Some(int_lit(300)))],
            )],
        );
        assert_eq!(err.to_string(), "Integer literal 300 does not fit in type 'int8'.");
    }

    #[test]
    fn test_shadowing_and_redeclaration() {
        // fn f() int { x = 1; { x = 2; return x; } }
        let context = Context::create();
        let generator = compile(
            &context,
            vec![function(
                "f",
                vec![],
                Some(int_ty()),
                vec![
                    local_decl("x", None, Some(int_lit(1))),
                    block(vec![local_decl("x", None, Some(int_lit(2))), ret(Some(ident("x")))]),
                ],
            )],
        )
        .unwrap();
        expect![[r#"
            define internal i32 @f() {
            entry:
              %x = alloca i32, align 4
              store i32 1, i32* %x, align 4
              %x1 = alloca i32, align 4
              store i32 2, i32* %x1, align 4
              %x.val = load i32, i32* %x1, align 4
              ret i32 %x.val
            }
        "#]]
        .assert_eq(&function_ir(&generator, "f"));

        // After the block, `x` is the outer binding again.
        let context = Context::create();
        let generator = compile(
            &context,
            vec![function(
                "g",
                vec![],
                Some(int_ty()),
                vec![
                    local_decl("x", None, Some(int_lit(1))),
                    block(vec![local_decl("x", None, Some(int_lit(2)))]),
                    ret(Some(ident("x"))),
                ],
            )],
        )
        .unwrap();
        assert!(function_ir(&generator, "g").contains("%x.val = load i32, i32* %x, align 4\n"));

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![function(
                "h",
                vec![],
                None,
                vec![local_decl("x", None, Some(int_lit(1))), local_decl("x", None, Some(int_lit(2)))],
            )],
        );
        assert_eq!(err.to_string(), "Variable 'x' is already declared in the current scope.");
    }

    #[test]
    fn test_reference_local_binds_address() {
        // fn f() { x = 1; y &int = x; }
        let context = Context::create();
        let generator = compile(
            &context,
            vec![function(
                "f",
                vec![],
                None,
                vec![
                    local_decl("x", None, Some(int_lit(1))),
                    local_decl("y", Some(reference(int_ty())), Some(ident("x"))),
                ],
            )],
        )
        .unwrap();
        expect![[r#"
            define internal void @f() {
            entry:
              %x = alloca i32, align 4
              store i32 1, i32* %x, align 4
              %y = alloca i32*, align 8
              store i32* %x, i32** %y, align 8
              ret void
            }
        "#]]
        .assert_eq(&function_ir(&generator, "f"));

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![function("f", vec![], None, vec![local_decl("r", Some(reference(int_ty())), None)])],
        );
        assert_eq!(err.to_string(), "Reference cannot be zero-initialized.");

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![function(
                "f",
                vec![],
                None,
                vec![local_decl("r", Some(reference(int_ty())), Some(int_lit(1)))],
            )],
        );
        assert_eq!(err.to_string(), "Type mismatch: expected '&int' but found 'int'.");

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![function(
                "f",
                vec![],
                None,
                vec![
                    local_decl("b", None, Some(bool_lit(true))),
                    local_decl("r", Some(reference(int_ty())), Some(ident("b"))),
                ],
            )],
        );
        assert_eq!(err.to_string(), "Type mismatch: expected '&int' but found 'bool'.");
    }

    #[test]
    fn test_nested_block_at_top_level_is_invalid() {
        let context = Context::create();
        let (_, err) = compile_err(&context, vec![block(vec![])]);
        assert_eq!(err.to_string(), "Invalid program.");
    }

    #[test]
    fn test_if_else_and_assignment() {
        // fn sign(flag bool) int { r = 0; if flag { r = 1; } else { return 2; } return r; }
        let context = Context::create();
        let generator = compile(
            &context,
            vec![function(
                "sign",
                vec![param("flag", prim(PrimitiveType::Bool))],
                Some(int_ty()),
                vec![
                    local_decl("r", None, Some(int_lit(0))),
                    if_stmt(
                        ident("flag"),
                        block(vec![assign(ident("r"), int_lit(1))]),
                        Some(block(vec![ret(Some(int_lit(2)))])),
                    ),
                    ret(Some(ident("r"))),
                ],
            )],
        )
        .unwrap();

        expect![[r#"
            define internal i32 @sign(i1 %flag) {
            entry:
              %flag.addr = alloca i1, align 1
              store i1 %flag, i1* %flag.addr, align 1
              %r = alloca i32, align 4
              store i32 0, i32* %r, align 4
              %flag.val = load i1, i1* %flag.addr, align 1
              br i1 %flag.val, label %if.then, label %if.else

            if.then:                                          ; preds = %entry
              store i32 1, i32* %r, align 4
              br label %if.end

            if.else:                                          ; preds = %entry
              ret i32 2

            if.end:                                           ; preds = %if.then
              %r.val = load i32, i32* %r, align 4
              ret i32 %r.val
            }
        "#]]
        .assert_eq(&function_ir(&generator, "sign"));
    }

    #[test]
    fn test_for_loop_with_break_and_continue() {
        // fn spin() { for (i = 0; true; i = 1) { continue; break; } }
        let context = Context::create();
        let generator = compile(
            &context,
            vec![function(
                "spin",
                vec![],
                None,
                vec![for_stmt(
                    Some(local_decl("i", None, Some(int_lit(0)))),
                    Some(bool_lit(true)),
                    Some(assign(ident("i"), int_lit(1))),
                    block(vec![continue_stmt(), break_stmt()]),
                )],
            )],
        )
        .unwrap();

        expect![[r#"
            define internal void @spin() {
            entry:
              %i = alloca i32, align 4
              store i32 0, i32* %i, align 4
              br label %for.cond

            for.cond:                                         ; preds = %for.inc, %entry
              br i1 true, label %for.body, label %for.end

            for.body:                                         ; preds = %for.cond
              br label %for.inc

            for.inc:                                          ; preds = %for.body
              store i32 1, i32* %i, align 4
              br label %for.cond

            for.end:                                          ; preds = %cont, %for.cond
              ret void

            cont:                                             ; No predecessors!
              br label %for.end
            }
        "#]]
        .assert_eq(&function_ir(&generator, "spin"));
    }

    #[test]
    fn test_control_flow_errors() {
        let context = Context::create();
        let (_, err) = compile_err(&context, vec![function("f", vec![], None, vec![break_stmt()])]);
        assert_eq!(err.to_string(), "'break' used outside of a loop.");

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![function("f", vec![], None, vec![if_stmt(int_lit(1), block(vec![]), None)])],
        );
        assert_eq!(err.to_string(), "Type mismatch: expected 'bool' but found 'int'.");

        let context = Context::create();
        let (_, err) = compile_err(&context, vec![function("f", vec![], Some(int_ty()), vec![ret(None)])]);
        assert_eq!(err.to_string(), "Function 'f' must return a value of type 'int'.");

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![function("f", vec![], None, vec![ret(Some(int_lit(1)))])],
        );
        assert_eq!(err.to_string(), "Cannot return a value from a function returning void.");
    }

    #[test]
    fn test_types_structs_and_enums() {
        let context = Context::create();
        let generator = compile(
            &context,
            vec![
                struct_def("Node", vec![("value", int_ty()), ("next", ptr(named("Node")))]),
                enum_def("Color", &["Red", "Green"]),
                typedef("Size", prim(PrimitiveType::UInt64)),
                global("head", Some(named("Node")), None, AccessSpecifier::Default, None),
                global("color", Some(named("Color")), None, AccessSpecifier::Default, None),
                global("size", Some(named("Size")), Some(int_lit(3)), AccessSpecifier::Default, None),
            ],
        )
        .unwrap();

        expect![[r#"
            ; ModuleID = 'test'
            source_filename = "test.cyr"

            %Node = type { i32, %Node* }

            @head = internal global %Node zeroinitializer
            @color = internal global i32 0
            @size = internal global i64 3
        "#]]
        .assert_eq(&module_ir(&generator));
        let names: Vec<_> = generator.types().iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["Node", "Color", "Size"]);

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![global("p", Some(named("Point")), None, AccessSpecifier::Default, None)],
        );
        assert_eq!(err.to_string(), "Type 'Point' is not defined in this module.");

        let context = Context::create();
        let (_, err) = compile_err(&context, vec![struct_def("Loop", vec![("inner", named("Loop"))])]);
        assert_eq!(err.to_string(), "Struct 'Loop' cannot contain itself by value.");

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![struct_def("Pair", vec![]), struct_def("Pair", vec![])],
        );
        assert_eq!(err.to_string(), "Type 'Pair' is already defined in this module.");
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_imports_are_recorded() {
        let context = Context::create();
        let generator = compile(&context, vec![import(&["std", "io"]), import(&["math"])]).unwrap();
        assert_eq!(generator.imports(), vec!["std::io".to_string(), "math".to_string()]);
    }
}
