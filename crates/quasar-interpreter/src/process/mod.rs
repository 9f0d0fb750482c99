//! Script processes
//!
//! A process executes bytecode objects on an operand stack. Besides call
//! frames it maintains a context stack (`With`, `ForEach`) used for name
//! resolution, and a stack of exception handlers installed by catch jumps.
//!
//! The process is an explicit state machine. [`Process::run`] executes
//! instructions until the process ends, suspends, terminates or fails with
//! an uncaught error. On every exit path that finishes the process, all
//! contexts are left and all locks the process still holds are released.

use crate::bytecode::BytecodeRef;
use crate::context::Context;
use crate::error::Error;
use crate::value::Value;
use crate::world::World;
use tracing::{debug, info, warn};

mod execution;
mod frame;
pub mod ops;

pub use frame::{ExceptionHandler, Frame};

/// Identity of a process as seen by locks and builtins
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessHandle {
    id: u32,
    name: String,
}

impl ProcessHandle {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessState {
    /// Ready to run
    Runnable,
    /// Inside [`Process::run`]
    Running,
    /// Stopped by a suspend instruction; `run` resumes it
    Suspended,
    /// Ran to completion
    Ended,
    /// Stopped by a terminate instruction or by the embedding
    Terminated,
    /// Stopped by an uncaught error
    Failed(Error),
}

impl ProcessState {
    pub fn is_finished(&self) -> bool {
        matches!(self, ProcessState::Ended | ProcessState::Terminated | ProcessState::Failed(_))
    }
}

/// Outcome of one instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Suspend,
    Terminate,
}

/// A running script
#[derive(Debug)]
pub struct Process {
    handle: ProcessHandle,
    state: ProcessState,
    frames: Vec<Frame>,
    stack: Vec<Option<Value>>,
    contexts: Vec<Box<dyn Context>>,
    handlers: Vec<ExceptionHandler>,
    max_call_depth: usize,
    max_stack_depth: usize,
}

impl Process {
    pub fn new(world: &mut World, name: impl Into<String>) -> Self {
        let id = world.allocate_process_id();
        Self {
            handle: ProcessHandle::new(id, name),
            state: ProcessState::Runnable,
            frames: Vec::new(),
            stack: Vec::new(),
            contexts: Vec::new(),
            handlers: Vec::new(),
            max_call_depth: world.config().max_call_depth,
            max_stack_depth: world.config().max_stack_depth,
        }
    }

    pub fn handle(&self) -> &ProcessHandle {
        &self.handle
    }

    pub fn id(&self) -> u32 {
        self.handle.id()
    }

    pub fn name(&self) -> &str {
        self.handle.name()
    }

    pub fn state(&self) -> &ProcessState {
        &self.state
    }

    /// Number of active frames
    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    /// Number of entered contexts
    pub fn context_depth(&self) -> usize {
        self.contexts.len()
    }

    /// Enter a bytecode object. With `want_result`, one value is left on the
    /// stack when the frame returns.
    pub fn push_frame(&mut self, bco: BytecodeRef, want_result: bool) -> Result<(), Error> {
        if self.frames.len() >= self.max_call_depth {
            return Err(Error::StackOverflow);
        }
        self.frames
            .push(Frame::new(bco, want_result, self.stack.len(), self.contexts.len()));
        Ok(())
    }

    pub fn push_value(&mut self, value: Option<Value>) {
        self.stack.push(value);
    }

    /// Pop the top of stack; fails on underflow
    pub fn pop_value(&mut self) -> Result<Option<Value>, Error> {
        self.stack
            .pop()
            .ok_or_else(|| Error::InvalidBytecode("stack underflow".to_string()))
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Run until the process stops
    pub fn run(&mut self, world: &mut World) -> &ProcessState {
        if self.state.is_finished() {
            return &self.state;
        }
        if self.state == ProcessState::Runnable {
            debug!(process = %self.handle.name, id = self.handle.id, "process started");
        }
        self.state = ProcessState::Running;

        loop {
            let result = self.step(world).and_then(|flow| {
                if self.stack.len() > self.max_stack_depth {
                    Err(Error::StackOverflow)
                } else {
                    Ok(flow)
                }
            });
            match result {
                Ok(Some(Flow::Continue)) => {}
                Ok(Some(Flow::Suspend)) => {
                    debug!(process = %self.handle.name, "process suspended");
                    self.state = ProcessState::Suspended;
                    break;
                }
                Ok(Some(Flow::Terminate)) => {
                    self.terminate(world);
                    break;
                }
                Ok(None) => {
                    self.finish(world);
                    debug!(process = %self.handle.name, "process ended");
                    self.state = ProcessState::Ended;
                    break;
                }
                Err(e) => {
                    if !self.handle_error(world, &e) {
                        warn!(process = %self.handle.name, error = %e, "process failed");
                        self.finish(world);
                        self.state = ProcessState::Failed(e);
                        break;
                    }
                }
            }
        }
        &self.state
    }

    /// Stop the process, leaving all contexts and releasing its locks
    pub fn terminate(&mut self, world: &mut World) {
        if self.state.is_finished() {
            return;
        }
        self.finish(world);
        info!(process = %self.handle.name, "process terminated");
        self.state = ProcessState::Terminated;
    }

    /// Execute one instruction; `None` when no frame is left
    fn step(&mut self, world: &mut World) -> Result<Option<Flow>, Error> {
        let frame = match self.frames.last_mut() {
            Some(frame) => frame,
            None => return Ok(None),
        };
        match frame.bco.instruction(frame.pc) {
            Some(insn) => {
                frame.pc += 1;
                self.execute(world, insn).map(Some)
            }
            None => {
                self.return_from_frame(world, 0)?;
                Ok(Some(Flow::Continue))
            }
        }
    }

    /// Leave the current frame. `results` is the number of values the frame
    /// leaves on the stack (0 or 1).
    fn return_from_frame(&mut self, world: &mut World, results: u16) -> Result<(), Error> {
        let result = if results > 0 { self.pop_value()? } else { None };
        let frame = match self.frames.pop() {
            Some(frame) => frame,
            None => return Err(Error::InvalidBytecode("return without frame".to_string())),
        };
        self.leave_contexts(world, frame.context_base);
        self.stack.truncate(frame.stack_base);
        let depth = self.frames.len();
        self.handlers.retain(|h| h.frame_depth < depth);
        if frame.want_result {
            self.stack.push(result);
        }
        Ok(())
    }

    /// Unwind to the innermost handler. Returns false if there is none.
    fn handle_error(&mut self, world: &mut World, error: &Error) -> bool {
        let handler = match self.handlers.pop() {
            Some(h) => h,
            None => return false,
        };
        self.frames.truncate(handler.frame_depth + 1);
        self.leave_contexts(world, handler.context_len);
        self.stack.truncate(handler.stack_len);
        if let Some(frame) = self.frames.last_mut() {
            frame.pc = handler.catch_pc;
        }
        debug!(process = %self.handle.name, error = %error, "exception caught");
        self.stack.push(Some(Value::String(error.to_string())));
        true
    }

    /// Pop contexts down to `len`, calling their exit hooks
    fn leave_contexts(&mut self, world: &mut World, len: usize) {
        while self.contexts.len() > len {
            if let Some(mut ctx) = self.contexts.pop() {
                ctx.on_context_left(world, &self.handle);
            }
        }
    }

    fn finish(&mut self, world: &mut World) {
        self.leave_contexts(world, 0);
        self.frames.clear();
        self.stack.clear();
        self.handlers.clear();
        world.mutex_list_mut().disown_locks_by_process(self.handle.id);
    }
}
