//! AST builders shared by the unit tests

use crate::error::CodegenError;
use crate::generator::CodeGenerator;
use cy_syntax::{
    AccessSpecifier, AssignmentOp, BinaryOp, EnumDefinition, EnumVariant, FunctionDeclaration,
    FunctionDefinition, FunctionParameter, FunctionParameters, GlobalVariableDeclaration, Node,
    NodeKind, PrimitiveType, Program, StorageClass, StructDefinition, StructField, TypeSpecifier,
    VariableDeclaration,
};
use inkwell::context::Context;
use inkwell::values::AnyValue as _;

pub fn prim(primitive: PrimitiveType) -> TypeSpecifier {
    TypeSpecifier::Primitive(primitive)
}

pub fn int_ty() -> TypeSpecifier {
    prim(PrimitiveType::Int)
}

pub fn ptr(inner: TypeSpecifier) -> TypeSpecifier {
    TypeSpecifier::Pointer(Box::new(inner))
}

pub fn reference(inner: TypeSpecifier) -> TypeSpecifier {
    TypeSpecifier::Reference(Box::new(inner))
}

pub fn constant(inner: TypeSpecifier) -> TypeSpecifier {
    TypeSpecifier::Const(Box::new(inner))
}

pub fn named(name: &str) -> TypeSpecifier {
    TypeSpecifier::Identifier(name.to_string())
}

/// Nodes built here carry line 0; `compile` numbers top-level statements
fn node(kind: NodeKind) -> Node {
    Node::new(0, kind)
}

pub fn int_lit(value: i64) -> Node {
    node(NodeKind::IntegerLiteral { value })
}

pub fn float_lit(value: f64) -> Node {
    node(NodeKind::FloatLiteral { value })
}

pub fn bool_lit(value: bool) -> Node {
    node(NodeKind::BoolLiteral { value })
}

pub fn string_lit(value: &str) -> Node {
    node(NodeKind::StringLiteral {
        value: value.to_string(),
    })
}

pub fn ident(name: &str) -> Node {
    node(NodeKind::Identifier {
        name: name.to_string(),
    })
}

pub fn add(left: Node, right: Node) -> Node {
    node(NodeKind::BinaryExpression {
        op: BinaryOp::Add,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn assign_op(op: AssignmentOp, target: Node, value: Node) -> Node {
    node(NodeKind::AssignmentExpression {
        op,
        target: Box::new(target),
        value: Box::new(value),
    })
}

pub fn assign(target: Node, value: Node) -> Node {
    assign_op(AssignmentOp::Assign, target, value)
}

pub fn global(
    name: &str,
    ty: Option<TypeSpecifier>,
    initializer: Option<Node>,
    access: AccessSpecifier,
    storage: Option<StorageClass>,
) -> Node {
    node(NodeKind::GlobalVariableDeclaration(GlobalVariableDeclaration {
        name: name.to_string(),
        ty,
        initializer: initializer.map(Box::new),
        access,
        storage,
    }))
}

pub fn local_decl(name: &str, ty: Option<TypeSpecifier>, initializer: Option<Node>) -> Node {
    node(NodeKind::VariableDeclaration(VariableDeclaration {
        name: name.to_string(),
        ty,
        initializer: initializer.map(Box::new),
    }))
}

pub fn param(name: &str, ty: TypeSpecifier) -> FunctionParameter {
    FunctionParameter {
        name: name.to_string(),
        ty,
        default_value: None,
    }
}

pub fn function_def(
    name: &str,
    params: Vec<FunctionParameter>,
    return_type: Option<TypeSpecifier>,
    body: Vec<Node>,
) -> FunctionDefinition {
    FunctionDefinition {
        name: name.to_string(),
        params: FunctionParameters::new(params),
        return_type,
        body,
        access: AccessSpecifier::Default,
        storage: None,
    }
}

pub fn def_node(def: FunctionDefinition) -> Node {
    node(NodeKind::FunctionDefinition(def))
}

pub fn function(
    name: &str,
    params: Vec<FunctionParameter>,
    return_type: Option<TypeSpecifier>,
    body: Vec<Node>,
) -> Node {
    def_node(function_def(name, params, return_type, body))
}

pub fn declaration(
    name: &str,
    params: Vec<FunctionParameter>,
    return_type: Option<TypeSpecifier>,
    is_variadic: bool,
    variadic_type: Option<TypeSpecifier>,
) -> Node {
    node(NodeKind::FunctionDeclaration(FunctionDeclaration {
        name: name.to_string(),
        params: FunctionParameters {
            list: params,
            variadic_type,
            is_variadic,
        },
        return_type,
        access: AccessSpecifier::Default,
        storage: None,
    }))
}

pub fn ret(value: Option<Node>) -> Node {
    node(NodeKind::ReturnStatement {
        value: value.map(Box::new),
    })
}

pub fn block(statements: Vec<Node>) -> Node {
    node(NodeKind::StatementList { statements })
}

pub fn if_stmt(condition: Node, then_branch: Node, else_branch: Option<Node>) -> Node {
    node(NodeKind::IfStatement {
        condition: Box::new(condition),
        then_branch: Box::new(then_branch),
        else_branch: else_branch.map(Box::new),
    })
}

pub fn for_stmt(
    init: Option<Node>,
    condition: Option<Node>,
    increment: Option<Node>,
    body: Node,
) -> Node {
    node(NodeKind::ForStatement {
        init: init.map(Box::new),
        condition: condition.map(Box::new),
        increment: increment.map(Box::new),
        body: Box::new(body),
    })
}

pub fn break_stmt() -> Node {
    node(NodeKind::BreakStatement)
}

pub fn continue_stmt() -> Node {
    node(NodeKind::ContinueStatement)
}

pub fn struct_def(name: &str, fields: Vec<(&str, TypeSpecifier)>) -> Node {
    node(NodeKind::StructDefinition(StructDefinition {
        name: Some(name.to_string()),
        fields: fields
            .into_iter()
            .map(|(name, ty)| StructField {
                name: name.to_string(),
                ty,
            })
            .collect(),
        methods: Vec::new(),
        access: AccessSpecifier::Default,
    }))
}

pub fn enum_def(name: &str, variants: &[&str]) -> Node {
    node(NodeKind::EnumDefinition(EnumDefinition {
        name: Some(name.to_string()),
        variants: variants
            .iter()
            .map(|variant| EnumVariant {
                name: variant.to_string(),
                items: Vec::new(),
            })
            .collect(),
        fields: Vec::new(),
        methods: Vec::new(),
    }))
}

pub fn typedef(name: &str, ty: TypeSpecifier) -> Node {
    node(NodeKind::TypeDefStatement {
        name: name.to_string(),
        ty,
    })
}

pub fn import(path: &[&str]) -> Node {
    node(NodeKind::ImportStatement {
        path: path.iter().map(|segment| segment.to_string()).collect(),
    })
}

fn program(statements: Vec<Node>) -> Program {
    let statements = statements
        .into_iter()
        .enumerate()
        .map(|(index, mut statement)| {
            statement.line = index as u32 + 1;
            statement
        })
        .collect();
    Program { statements }
}

/// Compile `statements` as module `test`, numbering them from line 1
pub fn compile(context: &Context, statements: Vec<Node>) -> Result<CodeGenerator<'_>, CodegenError> {
    let mut generator = CodeGenerator::new(context, "test").with_source_filename("test.cyr");
    generator.build_program(program(statements))?;
    Ok(generator)
}

/// Like [`compile`], but the program must fail; returns the partial state
pub fn compile_err(context: &Context, statements: Vec<Node>) -> (CodeGenerator<'_>, CodegenError) {
    let mut generator = CodeGenerator::new(context, "test").with_source_filename("test.cyr");
    match generator.build_program(program(statements)) {
        Ok(()) => panic!("expected compilation to fail"),
        Err(err) => (generator, err),
    }
}

/// Printed module text
pub fn module_ir(generator: &CodeGenerator<'_>) -> String {
    generator.module().print_to_string().to_string()
}

/// Printed definition of one global
pub fn global_ir(generator: &CodeGenerator<'_>, name: &str) -> String {
    generator.globals()[name].handle.print_to_string().to_string()
}

/// Printed definition or declaration of one function
pub fn function_ir(generator: &CodeGenerator<'_>, name: &str) -> String {
    generator.functions()[name].handle.print_to_string().to_string()
}
