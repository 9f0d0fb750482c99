//! Call frames and exception handlers

use crate::bytecode::BytecodeRef;

/// Activation of one bytecode object
#[derive(Debug, Clone)]
pub struct Frame {
    pub bco: BytecodeRef,
    /// Next instruction to execute
    pub pc: usize,
    /// Caller expects one value on the stack after return
    pub want_result: bool,
    /// Operand stack height at entry
    pub stack_base: usize,
    /// Context stack height at entry
    pub context_base: usize,
}

impl Frame {
    pub fn new(bco: BytecodeRef, want_result: bool, stack_base: usize, context_base: usize) -> Self {
        Self {
            bco,
            pc: 0,
            want_result,
            stack_base,
            context_base,
        }
    }
}

/// Installed by a catch jump; describes the state to restore on error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionHandler {
    /// Index of the frame that installed the handler
    pub frame_depth: usize,
    /// Instruction to resume at
    pub catch_pc: usize,
    /// Operand stack height to restore
    pub stack_len: usize,
    /// Context stack height to restore
    pub context_len: usize,
}
