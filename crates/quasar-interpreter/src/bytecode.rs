//! Bytecode objects and the emitter that builds them
//!
//! A [`BytecodeBuilder`] collects instructions, literals and names, and lets
//! code generators place jumps to labels that are bound later. Calling
//! [`BytecodeBuilder::relocate`] resolves every symbolic jump and yields an
//! immutable [`BytecodeObject`]. Since `relocate` consumes the builder, an
//! object can neither be relocated twice nor modified afterwards.

use crate::error::CompileError;
use crate::opcode::{jump, Major, Opcode, Scope};
use crate::value::Value;
use std::rc::Rc;

/// Shared handle to a relocated bytecode object
pub type BytecodeRef = Rc<BytecodeObject>;

/// Symbolic jump target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(u16);

impl Label {
    pub fn id(self) -> u16 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelState {
    Unbound,
    Bound(usize),
    Duplicate,
}

/// Argument of `Push Boolean` that denotes null
pub const PUSH_NULL_ARG: u16 = 0xFFFF;

/// Instruction stream under construction
#[derive(Debug, Default)]
pub struct BytecodeBuilder {
    code: Vec<Opcode>,
    literals: Vec<Option<Value>>,
    names: Vec<String>,
    labels: Vec<LabelState>,
    stray_labels: Vec<u16>,
    file_name: String,
    subroutine_name: String,
    origin: String,
    is_procedure: bool,
}

impl BytecodeBuilder {
    pub fn new() -> Self {
        Self {
            is_procedure: true,
            ..Self::default()
        }
    }

    /// Append an instruction and return its address
    pub fn add_instruction(&mut self, major: Major, minor: u8, arg: u16) -> usize {
        self.code.push(Opcode::new(major, minor, arg));
        self.code.len() - 1
    }

    /// Push a constant. Small integers and booleans are encoded inline.
    pub fn add_push_literal(&mut self, value: Option<Value>) -> Result<(), CompileError> {
        match value {
            None => {
                self.add_instruction(Major::Push, Scope::Boolean as u8, PUSH_NULL_ARG);
            }
            Some(Value::Boolean(b)) => {
                self.add_instruction(Major::Push, Scope::Boolean as u8, u16::from(b));
            }
            Some(Value::Integer(i)) if i16::try_from(i).is_ok() => {
                self.add_instruction(Major::Push, Scope::Integer as u8, i as i16 as u16);
            }
            Some(other) => {
                let index = self.add_literal(Some(other))?;
                self.add_instruction(Major::Push, Scope::Literal as u8, index);
            }
        }
        Ok(())
    }

    /// Append a literal pool entry. Literals are not deduplicated.
    pub fn add_literal(&mut self, value: Option<Value>) -> Result<u16, CompileError> {
        let index = u16::try_from(self.literals.len()).map_err(|_| CompileError::TooManyLiterals)?;
        self.literals.push(value);
        Ok(index)
    }

    /// Intern a name and return its slot
    pub fn add_name(&mut self, name: &str) -> Result<u16, CompileError> {
        if let Some(index) = self.names.iter().position(|existing| existing == name) {
            return Ok(index as u16);
        }
        let index = u16::try_from(self.names.len()).map_err(|_| CompileError::TooManyNames)?;
        self.names.push(name.to_string());
        Ok(index)
    }

    /// Emit an instruction whose argument is a name slot
    pub fn add_named_instruction(&mut self, major: Major, minor: u8, name: &str) -> Result<usize, CompileError> {
        let index = self.add_name(name)?;
        Ok(self.add_instruction(major, minor, index))
    }

    pub fn make_label(&mut self) -> Result<Label, CompileError> {
        let id = u16::try_from(self.labels.len()).map_err(|_| CompileError::TooManyLabels)?;
        self.labels.push(LabelState::Unbound);
        Ok(Label(id))
    }

    /// Bind a label to the address of the next instruction
    pub fn add_label(&mut self, label: Label) {
        let here = self.code.len();
        match self.labels.get_mut(usize::from(label.0)) {
            Some(state) => {
                *state = match *state {
                    LabelState::Unbound => LabelState::Bound(here),
                    _ => LabelState::Duplicate,
                };
            }
            None => self.stray_labels.push(label.0),
        }
    }

    /// Emit a jump to a label; `flags` are [`jump`] condition flags
    pub fn add_jump(&mut self, flags: u8, label: Label) -> usize {
        self.add_instruction(Major::Jump, flags | jump::SYMBOLIC, label.0)
    }

    pub fn set_file_name(&mut self, name: impl Into<String>) {
        self.file_name = name.into();
    }

    pub fn set_subroutine_name(&mut self, name: impl Into<String>) {
        self.subroutine_name = name.into();
    }

    /// Tag used to attribute errors to a plugin
    pub fn set_origin(&mut self, origin: impl Into<String>) {
        self.origin = origin.into();
    }

    pub fn set_is_procedure(&mut self, flag: bool) {
        self.is_procedure = flag;
    }

    /// Address of the next instruction
    pub fn num_instructions(&self) -> usize {
        self.code.len()
    }

    /// Resolve all symbolic jumps and freeze the object
    pub fn relocate(self) -> Result<BytecodeObject, CompileError> {
        if let Some(&id) = self.stray_labels.first() {
            return Err(CompileError::UnknownLabel(id));
        }
        if let Some(id) = self.labels.iter().position(|s| *s == LabelState::Duplicate) {
            return Err(CompileError::DuplicateLabel(id as u16));
        }

        let mut code = self.code;
        for insn in code.iter_mut().filter(|insn| insn.is_symbolic_jump()) {
            let target = match self.labels.get(usize::from(insn.arg)) {
                None => return Err(CompileError::UnknownLabel(insn.arg)),
                Some(LabelState::Unbound) => return Err(CompileError::UnboundLabel(insn.arg)),
                Some(LabelState::Bound(address)) => *address,
                Some(LabelState::Duplicate) => return Err(CompileError::DuplicateLabel(insn.arg)),
            };
            insn.arg = u16::try_from(target).map_err(|_| CompileError::CodeTooLarge)?;
            insn.minor &= !jump::SYMBOLIC;
        }

        Ok(BytecodeObject {
            code,
            literals: self.literals,
            names: self.names,
            file_name: self.file_name,
            subroutine_name: self.subroutine_name,
            origin: self.origin,
            is_procedure: self.is_procedure,
        })
    }
}

/// Immutable, relocated instruction unit
#[derive(Debug)]
pub struct BytecodeObject {
    code: Vec<Opcode>,
    literals: Vec<Option<Value>>,
    names: Vec<String>,
    file_name: String,
    subroutine_name: String,
    origin: String,
    is_procedure: bool,
}

impl BytecodeObject {
    pub fn code(&self) -> &[Opcode] {
        &self.code
    }

    pub fn instruction(&self, pc: usize) -> Option<Opcode> {
        self.code.get(pc).copied()
    }

    pub fn num_instructions(&self) -> usize {
        self.code.len()
    }

    /// Literal pool entry; outer `None` if the index is out of range
    pub fn literal(&self, index: u16) -> Option<&Option<Value>> {
        self.literals.get(usize::from(index))
    }

    pub fn literals(&self) -> &[Option<Value>] {
        &self.literals
    }

    pub fn name(&self, index: u16) -> Option<&str> {
        self.names.get(usize::from(index)).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn subroutine_name(&self) -> &str {
        &self.subroutine_name
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn is_procedure(&self) -> bool {
        self.is_procedure
    }

    /// Human-readable listing
    pub fn disassemble(&self) -> String {
        crate::bytecode_debug::disassemble(self)
    }
}
