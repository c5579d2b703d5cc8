//! Module pipeline: owns the LLVM module, the builder and the per-module
//! symbol tables

use crate::error::{BuilderResultExt as _, ErrorKind, Result};
use crate::scope::{ScopeId, ScopeTree};
use crate::types::{CodegenType, TypeTable};
use crate::values::EValueRef;
use cy_syntax::{Node, NodeKind, Program};
use indexmap::IndexMap;
use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::types::BasicTypeEnum;
use inkwell::values::{BasicValue, BasicValueEnum, FunctionValue, GlobalValue, IntValue, PointerValue};

/// Handle of a scope inside the current function's scope tree
pub type Scope<'ctx> = ScopeId<EValueRef<'ctx>>;

/// Variadic tail of a function signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variadic<'ctx> {
    /// Fixed arity
    No,
    /// `...`
    Untyped,
    /// `...T`; the element type is kept for call checking
    Typed(CodegenType<'ctx>),
}

/// Function table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord<'ctx> {
    /// The LLVM function
    pub handle: FunctionValue<'ctx>,
    /// Parameter names and types in declaration order
    pub params: Vec<(String, CodegenType<'ctx>)>,
    /// Variadic tail
    pub variadic: Variadic<'ctx>,
    /// Declared return type; `void` when omitted
    pub return_type: CodegenType<'ctx>,
    /// Visible to other modules
    pub exported: bool,
    /// False for body-less declarations
    pub defined: bool,
}

/// Global variable table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalRecord<'ctx> {
    /// The LLVM global
    pub handle: GlobalValue<'ctx>,
    /// Declared or inferred type
    pub ty: CodegenType<'ctx>,
    /// Visible to other modules
    pub exported: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LoopTargets<'ctx> {
    pub break_to: BasicBlock<'ctx>,
    pub continue_to: BasicBlock<'ctx>,
}

/// State of the function body being lowered
pub(crate) struct FunctionState<'ctx> {
    pub name: String,
    pub function: FunctionValue<'ctx>,
    pub scopes: ScopeTree<EValueRef<'ctx>>,
    pub return_type: CodegenType<'ctx>,
    pub loops: Vec<LoopTargets<'ctx>>,
}

/// Lowers one translation unit into one LLVM [`Module`]
pub struct CodeGenerator<'ctx> {
    pub(crate) context: &'ctx Context,
    pub(crate) module: Module<'ctx>,
    pub(crate) builder: Builder<'ctx>,
    pub(crate) types: TypeTable<'ctx>,
    pub(crate) functions: IndexMap<String, FunctionRecord<'ctx>>,
    pub(crate) globals: IndexMap<String, GlobalRecord<'ctx>>,
    pub(crate) imports: Vec<Vec<String>>,
    pub(crate) current: Option<FunctionState<'ctx>>,
}

impl<'ctx> CodeGenerator<'ctx> {
    /// An empty module called `module_name` in `context`
    pub fn new(context: &'ctx Context, module_name: &str) -> Self {
        Self {
            context,
            module: context.create_module(module_name),
            builder: context.create_builder(),
            types: TypeTable::new(context),
            functions: IndexMap::new(),
            globals: IndexMap::new(),
            imports: Vec::new(),
            current: None,
        }
    }

    /// Record the originating file in the module header
    #[must_use]
    pub fn with_source_filename(self, filename: &str) -> Self {
        self.module.set_source_file_name(filename);
        self
    }

    /// Lower every top-level statement in source order
    ///
    /// Stops at the first error; tables keep whatever was registered before
    /// it.
    pub fn build_program(&mut self, program: Program) -> Result<()> {
        let name = self.module.get_name().to_string_lossy().into_owned();
        log::debug!("building module '{name}' ({} top-level statements)", program.statements.len());
        for statement in program.statements {
            self.build_top_level(statement)?;
        }
        log::debug!(
            "module '{name}' done: {} functions, {} globals",
            self.functions.len(),
            self.globals.len()
        );
        Ok(())
    }

    fn build_top_level(&mut self, node: Node) -> Result<()> {
        let line = node.line;
        log::trace!("top-level {} at line {line}", node.node_type());
        match node.kind {
            NodeKind::VariableDeclaration(decl) => self.build_global(decl.into(), line),
            NodeKind::GlobalVariableDeclaration(decl) => self.build_global(decl, line),
            NodeKind::FunctionDefinition(def) => self.build_function(def, None, line),
            NodeKind::StatementList { .. } => Err(ErrorKind::InvalidProgram.at(line)),
            kind => self.build_statement(Node::new(line, kind), None),
        }
    }

    /// The module being filled
    pub fn module(&self) -> &Module<'ctx> {
        &self.module
    }

    /// Give up the generator, keeping only the module
    pub fn into_module(self) -> Module<'ctx> {
        self.module
    }

    /// Function table in registration order
    pub fn functions(&self) -> &IndexMap<String, FunctionRecord<'ctx>> {
        &self.functions
    }

    /// Global table in registration order
    pub fn globals(&self) -> &IndexMap<String, GlobalRecord<'ctx>> {
        &self.globals
    }

    /// Named types defined so far
    pub fn types(&self) -> &TypeTable<'ctx> {
        &self.types
    }

    /// Import paths in the order they appeared, joined with `::`
    pub fn imports(&self) -> Vec<String> {
        self.imports.iter().map(|path| path.join("::")).collect()
    }

    /// Whether a global or function of this name already exists
    pub(crate) fn has_symbol(&self, name: &str) -> bool {
        self.module.get_global(name).is_some() || self.module.get_function(name).is_some()
    }

    pub(crate) fn require_scope(scope: Option<Scope<'ctx>>, line: u32) -> Result<Scope<'ctx>> {
        scope.ok_or_else(|| ErrorKind::ScopeRequired.at(line))
    }

    /// The function being lowered; only absent at module level
    pub(crate) fn state(&mut self, line: u32) -> Result<&mut FunctionState<'ctx>> {
        self.current
            .as_mut()
            .ok_or_else(|| ErrorKind::ScopeRequired.at(line))
    }

    /// Whether the insertion block already ends in a terminator
    pub(crate) fn is_terminated(&self) -> bool {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_terminator())
            .is_some()
    }

    /// Open an unreachable `cont` block when the insertion block is
    /// already terminated, so code after a jump still has somewhere to go
    fn open_insertion_block(&self, line: u32) -> Result<()> {
        if !self.is_terminated() {
            return Ok(());
        }
        let function = self
            .current
            .as_ref()
            .map(|state| state.function)
            .ok_or_else(|| ErrorKind::ScopeRequired.at(line))?;
        let block = self.context.append_basic_block(function, "cont");
        self.builder.position_at_end(block);
        Ok(())
    }

    /// Append a block named `name` to the current function
    pub(crate) fn append_block(&mut self, name: &str, line: u32) -> Result<BasicBlock<'ctx>> {
        let function = self.state(line)?.function;
        Ok(self.context.append_basic_block(function, name))
    }

    pub(crate) fn emit_alloca(
        &self,
        ty: BasicTypeEnum<'ctx>,
        name: &str,
        line: u32,
    ) -> Result<PointerValue<'ctx>> {
        self.open_insertion_block(line)?;
        self.builder.build_alloca(ty, name).at_line(line)
    }

    pub(crate) fn emit_store(
        &self,
        slot: PointerValue<'ctx>,
        value: BasicValueEnum<'ctx>,
        line: u32,
    ) -> Result<()> {
        self.open_insertion_block(line)?;
        self.builder.build_store(slot, value).at_line(line)?;
        Ok(())
    }

    pub(crate) fn emit_load(
        &self,
        slot: PointerValue<'ctx>,
        name: &str,
        line: u32,
    ) -> Result<BasicValueEnum<'ctx>> {
        self.open_insertion_block(line)?;
        self.builder.build_load(slot, name).at_line(line)
    }

    pub(crate) fn emit_branch(&self, target: BasicBlock<'ctx>, line: u32) -> Result<()> {
        self.open_insertion_block(line)?;
        self.builder.build_unconditional_branch(target).at_line(line)?;
        Ok(())
    }

    pub(crate) fn emit_cond_branch(
        &self,
        condition: IntValue<'ctx>,
        then_block: BasicBlock<'ctx>,
        else_block: BasicBlock<'ctx>,
        line: u32,
    ) -> Result<()> {
        self.open_insertion_block(line)?;
        self.builder
            .build_conditional_branch(condition, then_block, else_block)
            .at_line(line)?;
        Ok(())
    }

    pub(crate) fn emit_return(&self, value: Option<BasicValueEnum<'ctx>>, line: u32) -> Result<()> {
        self.open_insertion_block(line)?;
        let value = value.as_ref().map(|value| value as &dyn BasicValue<'ctx>);
        self.builder.build_return(value).at_line(line)?;
        Ok(())
    }

    /// Terminate every open block of `function`
    ///
    /// The insertion block gets `ret void` in a void function; every other
    /// open block gets `unreachable`.
    pub(crate) fn finish_function(&self, state: &FunctionState<'ctx>, line: u32) -> Result<()> {
        if !self.is_terminated() && state.return_type.is_void() {
            self.builder.build_return(None).at_line(line)?;
        }
        for block in state.function.get_basic_blocks() {
            if block.get_terminator().is_none() {
                self.builder.position_at_end(block);
                self.builder.build_unreachable().at_line(line)?;
            }
        }
        self.builder.clear_insertion_position();
        Ok(())
    }
}
