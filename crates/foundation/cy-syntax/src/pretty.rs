//! Structural dump of the syntax tree
//!
//! Each nesting level indents by two spaces. Output is meant for humans
//! debugging the parser hand-off; it is not parsed back.

use crate::ast::{
    EnumDefinition, FunctionDeclaration, FunctionDefinition, FunctionParameters,
    GlobalVariableDeclaration, Node, NodeKind, Program, StructDefinition, StructField,
    VariableDeclaration,
};
use crate::ops::{AccessSpecifier, StorageClass};
use crate::types::TypeSpecifier;
use std::fmt::Display;

struct Printer {
    out: String,
}

impl Printer {
    fn line(&mut self, indent: usize, text: impl Display) {
        self.out.push_str(&"  ".repeat(indent));
        self.out.push_str(&text.to_string());
        self.out.push('\n');
    }

    fn node(&mut self, node: &Node, indent: usize) {
        match &node.kind {
            NodeKind::StatementList { statements } => {
                self.line(indent, "StatementList:");
                self.nodes(statements, indent + 1);
            }
            NodeKind::IntegerLiteral { value } => self.line(indent, format!("IntegerLiteral: {value}")),
            NodeKind::FloatLiteral { value } => self.line(indent, format!("FloatLiteral: {value}")),
            NodeKind::BoolLiteral { value } => self.line(indent, format!("BoolLiteral: {value}")),
            NodeKind::StringLiteral { value } => {
                self.line(indent, format!("StringLiteral: {value:?}"));
            }
            NodeKind::Identifier { name } => self.line(indent, format!("Identifier: {name}")),
            NodeKind::BinaryExpression { op, left, right } => {
                self.line(indent, format!("BinaryExpression: {op}"));
                self.node(left, indent + 1);
                self.node(right, indent + 1);
            }
            NodeKind::UnaryExpression { op, operand } => {
                self.line(indent, format!("UnaryExpression: {op}"));
                self.node(operand, indent + 1);
            }
            NodeKind::CastExpression { target, expr } => {
                self.line(indent, "CastExpression:");
                self.line(indent + 1, format!("Target Type: {target}"));
                self.line(indent + 1, "Expression:");
                self.node(expr, indent + 2);
            }
            NodeKind::ConditionalExpression { condition, then_expr, else_expr } => {
                self.line(indent, "ConditionalExpression:");
                self.labeled("Condition:", condition, indent + 1);
                self.labeled("True Expression:", then_expr, indent + 1);
                self.labeled("False Expression:", else_expr, indent + 1);
            }
            NodeKind::AssignmentExpression { op, target, value } => {
                self.line(indent, "AssignmentExpression:");
                self.line(indent + 1, format!("Operator: {op}"));
                self.node(target, indent + 1);
                self.node(value, indent + 1);
            }
            NodeKind::FunctionCall { callee, arguments } => {
                self.line(indent, "FunctionCall:");
                self.labeled("Function Expr:", callee, indent + 1);
                self.line(indent + 1, "Arguments:");
                self.nodes(arguments, indent + 2);
            }
            NodeKind::FieldAccess { base, field } => {
                self.line(indent, format!("FieldAccess: {field}"));
                self.node(base, indent + 1);
            }
            NodeKind::PointerFieldAccess { base, field } => {
                self.line(indent, format!("PointerFieldAccess: {field}"));
                self.node(base, indent + 1);
            }
            NodeKind::StructInitialization { name, fields } => {
                self.line(indent, "StructInitialization:");
                self.line(indent + 1, format!("Struct Name: {name}"));
                self.line(indent + 1, "Field Initializers:");
                for (field, value) in fields {
                    self.labeled(format!("Field Name: {field}"), value, indent + 2);
                }
            }
            NodeKind::ImportedSymbolAccess { path } => {
                self.line(indent, format!("ImportedSymbolAccess: {}", path.join("::")));
            }
            NodeKind::ImportStatement { path } => {
                self.line(indent, format!("ImportStatement: {}", path.join("::")));
            }
            NodeKind::TypeDefStatement { name, ty } => {
                self.line(indent, "TypeDefStatement:");
                self.line(indent + 1, format!("Name: {name}"));
                self.line(indent + 1, format!("Type: {ty}"));
            }
            NodeKind::FunctionDefinition(func) => self.function_definition(func, indent),
            NodeKind::FunctionDeclaration(func) => self.function_declaration(func, indent),
            NodeKind::VariableDeclaration(decl) => self.variable(decl, indent),
            NodeKind::GlobalVariableDeclaration(decl) => self.global(decl, indent),
            NodeKind::StructDefinition(def) => self.struct_definition(def, indent),
            NodeKind::EnumDefinition(def) => self.enum_definition(def, indent),
            NodeKind::ReturnStatement { value: Some(value) } => {
                self.line(indent, "ReturnStatement:");
                self.node(value, indent + 1);
            }
            NodeKind::ReturnStatement { value: None } => self.line(indent, "ReturnStatement"),
            NodeKind::BreakStatement => self.line(indent, "BreakStatement"),
            NodeKind::ContinueStatement => self.line(indent, "ContinueStatement"),
            NodeKind::ForStatement { init, condition, increment, body } => {
                self.line(indent, "ForStatement:");
                self.optional("Initializer:", init.as_deref(), indent + 1);
                self.optional("Condition:", condition.as_deref(), indent + 1);
                self.optional("Increment:", increment.as_deref(), indent + 1);
                self.labeled("Body:", body, indent + 1);
            }
            NodeKind::IfStatement { condition, then_branch, else_branch } => {
                self.line(indent, "IfStatement:");
                self.labeled("Condition:", condition, indent + 1);
                self.labeled("Then Branch:", then_branch, indent + 1);
                self.optional("Else Branch:", else_branch.as_deref(), indent + 1);
            }
        }
    }

    fn nodes(&mut self, nodes: &[Node], indent: usize) {
        for node in nodes {
            self.node(node, indent);
        }
    }

    fn labeled(&mut self, label: impl Display, node: &Node, indent: usize) {
        self.line(indent, label);
        self.node(node, indent + 1);
    }

    fn optional(&mut self, label: &str, node: Option<&Node>, indent: usize) {
        if let Some(node) = node {
            self.labeled(label, node, indent);
        }
    }

    fn type_line(&mut self, ty: Option<&TypeSpecifier>, label: &str, indent: usize) {
        if let Some(ty) = ty {
            self.line(indent, format!("{label}: {ty}"));
        }
    }

    fn specifiers(&mut self, access: AccessSpecifier, storage: Option<StorageClass>, indent: usize) {
        if access != AccessSpecifier::Default {
            self.line(indent, format!("Access Specifier: {access}"));
        }
        if let Some(storage) = storage {
            self.line(indent, format!("Storage Class Specifier: {storage}"));
        }
    }

    fn params(&mut self, params: &FunctionParameters, indent: usize) {
        self.line(indent, "Parameters:");
        for param in &params.list {
            self.line(indent + 1, format!("FunctionParameter: {}", param.name));
            self.line(indent + 2, format!("Type: {}", param.ty));
            self.optional("Default Value:", param.default_value.as_deref(), indent + 2);
        }
        if let Some(ty) = &params.variadic_type {
            self.line(indent + 1, format!("Typed Variadic: {ty}"));
        }
        if params.is_variadic {
            self.line(indent + 1, "Is Variadic: true");
        }
    }

    fn function_definition(&mut self, func: &FunctionDefinition, indent: usize) {
        self.line(indent, format!("FunctionDefinition: {}", func.name));
        self.params(&func.params, indent + 1);
        self.type_line(func.return_type.as_ref(), "Return Type", indent + 1);
        self.specifiers(func.access, func.storage, indent + 1);
        self.line(indent + 1, "Body:");
        self.nodes(&func.body, indent + 2);
    }

    fn function_declaration(&mut self, func: &FunctionDeclaration, indent: usize) {
        self.line(indent, format!("FunctionDeclaration: {}", func.name));
        self.params(&func.params, indent + 1);
        self.type_line(func.return_type.as_ref(), "Return Type", indent + 1);
        self.specifiers(func.access, func.storage, indent + 1);
    }

    fn variable(&mut self, decl: &VariableDeclaration, indent: usize) {
        self.line(indent, "VariableDeclaration:");
        self.line(indent + 1, format!("Name: {}", decl.name));
        self.type_line(decl.ty.as_ref(), "Type", indent + 1);
        self.optional("Initializer:", decl.initializer.as_deref(), indent + 1);
    }

    fn global(&mut self, decl: &GlobalVariableDeclaration, indent: usize) {
        self.line(indent, "GlobalVariableDeclaration:");
        self.line(indent + 1, format!("Name: {}", decl.name));
        self.type_line(decl.ty.as_ref(), "Type", indent + 1);
        self.specifiers(decl.access, decl.storage, indent + 1);
        self.optional("Initializer:", decl.initializer.as_deref(), indent + 1);
    }

    fn fields(&mut self, fields: &[StructField], indent: usize) {
        for field in fields {
            self.line(indent, format!("StructField: {} {}", field.name, field.ty));
        }
    }

    fn struct_definition(&mut self, def: &StructDefinition, indent: usize) {
        self.line(indent, "StructDefinition:");
        if let Some(name) = &def.name {
            self.line(indent + 1, format!("Name: {name}"));
        }
        self.specifiers(def.access, None, indent + 1);
        self.line(indent + 1, "Members:");
        self.fields(&def.fields, indent + 2);
        self.line(indent + 1, "Methods:");
        for method in &def.methods {
            self.function_definition(method, indent + 2);
        }
    }

    fn enum_definition(&mut self, def: &EnumDefinition, indent: usize) {
        self.line(indent, "EnumDefinition:");
        if let Some(name) = &def.name {
            self.line(indent + 1, format!("Name: {name}"));
        }
        self.line(indent + 1, "Variants:");
        for variant in &def.variants {
            self.line(indent + 2, format!("EnumVariant: {}", variant.name));
            for item in &variant.items {
                match &item.name {
                    Some(name) => self.line(indent + 3, format!("Item: {name} {}", item.ty)),
                    None => self.line(indent + 3, format!("Item: {}", item.ty)),
                }
            }
        }
        self.line(indent + 1, "Fields:");
        self.fields(&def.fields, indent + 2);
        self.line(indent + 1, "Methods:");
        for method in &def.methods {
            self.function_definition(method, indent + 2);
        }
    }
}

impl Node {
    /// Render this subtree starting at `indent` levels deep
    pub fn print(&self, indent: usize) -> String {
        let mut printer = Printer { out: String::new() };
        printer.node(self, indent);
        printer.out
    }
}

impl Program {
    /// Render the whole tree under a `Program:` heading
    pub fn print(&self, indent: usize) -> String {
        let mut printer = Printer { out: String::new() };
        printer.line(indent, "Program:");
        printer.nodes(&self.statements, indent + 1);
        printer.out
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.print(0))
    }
}
