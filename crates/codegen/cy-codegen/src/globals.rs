//! Module-level variables

use crate::error::{ErrorKind, Result};
use crate::generator::{CodeGenerator, GlobalRecord};
use crate::types::CodegenType;
use crate::values::{EValue, coerce, is_constant, reference_binding, zero_value};
use cy_syntax::{AccessSpecifier, GlobalVariableDeclaration, StorageClass};
use inkwell::module::Linkage;
use inkwell::values::BasicValueEnum;

impl<'ctx> CodeGenerator<'ctx> {
    pub(crate) fn build_global(&mut self, decl: GlobalVariableDeclaration, line: u32) -> Result<()> {
        let GlobalVariableDeclaration {
            name,
            ty,
            initializer,
            access,
            storage,
        } = decl;

        if self.globals.contains_key(&name) || self.has_symbol(&name) {
            return Err(ErrorKind::DuplicateGlobal { name }.at(line));
        }

        let declared = ty.map(|ty| self.types.resolve(&ty, line)).transpose()?;
        let initializer = initializer
            .map(|expr| self.build_expression(*expr, None))
            .transpose()?;

        let codegen_type = match (&declared, &initializer) {
            (Some(declared), _) => declared.clone(),
            (None, Some(init)) => init.value_type().clone(),
            (None, None) => return Err(ErrorKind::MissingGlobalType.at(line)),
        };

        let (mut linkage, exported) = match access {
            AccessSpecifier::Default | AccessSpecifier::Private => (Linkage::Internal, false),
            AccessSpecifier::Public => (Linkage::External, true),
            other => return Err(ErrorKind::UnsupportedGlobalAccess { access: other }.at(line)),
        };

        let is_extern = match storage {
            Some(StorageClass::Extern) if initializer.is_some() => {
                return Err(ErrorKind::ExternWithInitializer.at(line));
            }
            Some(StorageClass::Extern) => {
                linkage = Linkage::External;
                true
            }
            Some(StorageClass::Inline) => return Err(ErrorKind::InlineGlobal.at(line)),
            None => false,
        };

        let value = match initializer {
            Some(init) => Some(constant_initializer(&init, &codegen_type, line)?),
            None if is_extern => None,
            None => Some(zero_value(&codegen_type, line)?),
        };
        let Some(ir) = codegen_type.ir else {
            return Err(ErrorKind::VoidVariable { name }.at(line));
        };

        let global = self.module.add_global(ir, None, &name);
        global.set_linkage(linkage);
        global.set_constant(codegen_type.is_const);
        if let Some(value) = value {
            global.set_initializer(&value);
        }

        log::debug!("global '{name}': {codegen_type} ({linkage:?})");
        self.globals.insert(
            name,
            GlobalRecord {
                handle: global,
                ty: codegen_type,
                exported,
            },
        );
        Ok(())
    }
}

/// Initializer of a global: a constant of the global's type, or the address
/// of another global when the global is a reference
fn constant_initializer<'ctx>(
    init: &EValue<'ctx>,
    ty: &CodegenType<'ctx>,
    line: u32,
) -> Result<BasicValueEnum<'ctx>> {
    if let Some(address) = reference_binding(init, ty) {
        return Ok(address);
    }
    if init.is_lvalue() || !is_constant(init.value) {
        return Err(ErrorKind::NonConstantInitializer.at(line));
    }
    coerce(init, ty, line)
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::test_utils::*;
    use cy_syntax::{AccessSpecifier, PrimitiveType, StorageClass};
    use expect_test::expect;
    use inkwell::context::Context;
    use inkwell::module::Linkage;

    #[test]
    fn test_linkage_follows_access() {
        let context = Context::create();
        let generator = compile(
            &context,
            vec![
                global("a", Some(int_ty()), None, AccessSpecifier::Default, None),
                global("b", Some(int_ty()), None, AccessSpecifier::Private, None),
                global("c", Some(int_ty()), None, AccessSpecifier::Public, None),
            ],
        )
        .unwrap();

        let linkage = |name: &str| generator.globals()[name].handle.get_linkage();
        assert_eq!(linkage("a"), Linkage::Internal);
        assert_eq!(linkage("b"), Linkage::Internal);
        assert_eq!(linkage("c"), Linkage::External);
        assert!(!generator.globals()["a"].exported);
        assert!(!generator.globals()["b"].exported);
        assert!(generator.globals()["c"].exported);
    }

    #[test]
    fn test_duplicate_global_keeps_first() {
        let context = Context::create();
        let (generator, err) = compile_err(
            &context,
            vec![
                global("x", None, Some(int_lit(1)), AccessSpecifier::Public, None),
                global("x", None, Some(int_lit(2)), AccessSpecifier::Default, None),
            ],
        );

        assert_eq!(err.to_string(), "Global variable 'x' is already defined in this module.");
        assert_eq!(generator.globals().len(), 1);
        assert!(generator.globals()["x"].exported);
        assert_eq!(global_ir(&generator, "x"), "@x = global i32 1");
    }

    #[test]
    fn test_zero_initialized_globals() {
        let context = Context::create();
        let generator = compile(
            &context,
            vec![
                global("i", Some(int_ty()), None, AccessSpecifier::Default, None),
                global("f", Some(prim(PrimitiveType::Float32)), None, AccessSpecifier::Default, None),
                global("b", Some(prim(PrimitiveType::Bool)), None, AccessSpecifier::Default, None),
                global("s", Some(prim(PrimitiveType::String)), None, AccessSpecifier::Default, None),
                global("p", Some(ptr(int_ty())), None, AccessSpecifier::Default, None),
            ],
        )
        .unwrap();

        expect![[r#"
            ; ModuleID = 'test'
            source_filename = "test.cyr"

            @i = internal global i32 0
            @f = internal global float 0.000000e+00
            @b = internal global i1 false
            @s = internal global i8* null
            @p = internal global i32* null
        "#]]
        .assert_eq(&module_ir(&generator));
    }

    #[test]
    fn test_plain_declaration_takes_global_path() {
        // my_var = 1 + 2; is not constant-foldable yet
        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![local_decl("my_var", None, Some(add(int_lit(1), int_lit(2))))],
        );
        assert_eq!(err.to_string(), "Unknown expression type.");

        let context = Context::create();
        let generator = compile(&context, vec![local_decl("answer", None, Some(int_lit(42)))]).unwrap();
        assert_eq!(global_ir(&generator, "answer"), "@answer = internal global i32 42");
    }

    #[test]
    fn test_global_type_rules() {
        let context = Context::create();
        let (_, err) = compile_err(&context, vec![global("x", None, None, AccessSpecifier::Default, None)]);
        assert_eq!(
            err.to_string(),
            "Global variable type is not specified and initializer is not a constant."
        );

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![global("r", Some(reference(int_ty())), None, AccessSpecifier::Default, None)],
        );
        assert_eq!(err.to_string(), "Reference cannot be zero-initialized.");

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![global("e", Some(prim(PrimitiveType::Error)), None, AccessSpecifier::Default, None)],
        );
        assert_eq!(err.to_string(), "Error type cannot be zero-initialized.");

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![global(
                "flag",
                Some(prim(PrimitiveType::Bool)),
                Some(int_lit(1)),
                AccessSpecifier::Default,
                None,
            )],
        );
        assert_eq!(err.to_string(), "Type mismatch: expected 'bool' but found 'int'.");
    }

    #[test]
    fn test_storage_and_access_rules() {
        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![global("x", Some(int_ty()), None, AccessSpecifier::Protected, None)],
        );
        assert_eq!(err.to_string(), "Unsupported access specifier for global variable: protected");
        assert_eq!(
            *err.kind(),
            ErrorKind::UnsupportedGlobalAccess {
                access: AccessSpecifier::Protected
            }
        );

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![global(
                "x",
                None,
                Some(int_lit(1)),
                AccessSpecifier::Default,
                Some(StorageClass::Extern),
            )],
        );
        assert_eq!(err.to_string(), "Extern storage class specifier cannot have an initializer.");

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![global(
                "x",
                Some(int_ty()),
                None,
                AccessSpecifier::Default,
                Some(StorageClass::Inline),
            )],
        );
        assert_eq!(
            err.to_string(),
            "Inline storage class specifier is not supported for global variables."
        );
    }

    #[test]
    fn test_extern_const_and_string_globals() {
        let context = Context::create();
        let generator = compile(
            &context,
            vec![
                global(
                    "errno",
                    Some(int_ty()),
                    None,
                    AccessSpecifier::Default,
                    Some(StorageClass::Extern),
                ),
                global(
                    "limit",
                    Some(constant(prim(PrimitiveType::Int64))),
                    Some(int_lit(10)),
                    AccessSpecifier::Public,
                    None,
                ),
                global("greeting", None, Some(string_lit("hi")), AccessSpecifier::Default, None),
            ],
        )
        .unwrap();

        expect![[r#"
            ; ModuleID = 'test'
            source_filename = "test.cyr"

            @errno = external global i32
            @limit = constant i64 10
            @.str = private unnamed_addr constant [3 x i8] c"hi\00", align 1
            @greeting = internal global i8* getelementptr inbounds ([3 x i8], [3 x i8]* @.str, i32 0, i32 0)
        "#]]
        .assert_eq(&module_ir(&generator));
        assert!(generator.globals()["limit"].ty.is_const);
        assert!(generator.globals()["errno"].handle.is_declaration());
    }

    #[test]
    fn test_global_cannot_copy_another_global() {
        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![
                global("a", Some(int_ty()), None, AccessSpecifier::Default, None),
                global("b", None, Some(ident("a")), AccessSpecifier::Default, None),
            ],
        );
        assert_eq!(err.to_string(), "Global variable initializer is not a constant.");
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_reference_global_binds_address() {
        let context = Context::create();
        let generator = compile(
            &context,
            vec![
                global("counter", Some(int_ty()), Some(int_lit(3)), AccessSpecifier::Default, None),
                global("alias", Some(reference(int_ty())), Some(ident("counter")), AccessSpecifier::Default, None),
            ],
        )
        .unwrap();
        assert_eq!(global_ir(&generator, "alias"), "@alias = internal global i32* @counter");
        assert_eq!(generator.globals()["alias"].ty.to_string(), "&int");

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![
                global("flag", Some(prim(PrimitiveType::Bool)), None, AccessSpecifier::Default, None),
                global("alias", Some(reference(int_ty())), Some(ident("flag")), AccessSpecifier::Default, None),
            ],
        );
        assert_eq!(err.to_string(), "Global variable initializer is not a constant.");
    }

    #[test]
    fn test_integer_literal_range_checked_against_declared_type() {
        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![global("small", Some(prim(PrimitiveType::Int8)), Some(int_lit(300)), AccessSpecifier::Default, None)],
        );
        assert_eq!(err.to_string(), "Integer literal 300 does not fit in type 'int8'.");

        let context = Context::create();
        let (_, err) = compile_err(
            &context,
            vec![global("u", Some(prim(PrimitiveType::UInt8)), Some(int_lit(-1)), AccessSpecifier::Default, None)],
        );
        assert_eq!(err.to_string(), "Integer literal -1 does not fit in type 'uint8'.");

        let context = Context::create();
        let generator = compile(
            &context,
            vec![
                global("low", Some(prim(PrimitiveType::Int8)), Some(int_lit(-128)), AccessSpecifier::Default, None),
                global("high", Some(prim(PrimitiveType::UInt8)), Some(int_lit(255)), AccessSpecifier::Default, None),
            ],
        )
        .unwrap();
        assert_eq!(global_ir(&generator, "low"), "@low = internal global i8 -128");
        assert_eq!(global_ir(&generator, "high"), "@high = internal global i8 -1");
    }
}
