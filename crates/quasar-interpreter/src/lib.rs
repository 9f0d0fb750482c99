//! Quasar script interpreter
//!
//! This crate implements the runtime half of the Quasar script engine: the
//! value model, bytecode objects and their emitter, a stack-based process
//! executor, and the contract through which game-specific code plugs its own
//! entity kinds into scripts.
//!
//! # Architecture
//!
//! - Scalar values are stored inline; callables, indexables and contexts are
//!   trait objects supplied by the embedding.
//! - Properties are resolved through static name tables, one per entity kind.
//! - Contexts are cursors over collections. `With` and `ForEach` push them on
//!   a per-process context stack used for name resolution.
//! - Locks coordinate processes working on the same object and are released
//!   when the owning block or process ends.
//! - Values persist as tagged nodes plus auxiliary bytes.
//!
//! # Modules
//!
//! - `value`: runtime value types and value traits
//! - `arguments`: argument lists and argument checks
//! - `names`: static name tables
//! - `context`: the context (cursor) protocol
//! - `opcode`: instruction set
//! - `bytecode`: bytecode objects, emitter and relocation
//! - `process`: process state machine and instruction execution
//! - `world`: globals, locks and host services
//! - `mutex`: named locks
//! - `builtins`: native functions
//! - `subroutine`: bytecode objects as callable values
//! - `serialization`: tagged store/load
//! - `error`: error types

pub mod arguments;
pub mod builtins;
pub mod bytecode;
pub mod bytecode_debug;
pub mod context;
pub mod error;
pub mod mutex;
pub mod names;
pub mod opcode;
pub mod process;
pub mod serialization;
pub mod subroutine;
pub mod value;
pub mod world;

// Re-export main types
pub use arguments::Arguments;
pub use builtins::{register_lock_builtins, BuiltinFunction};
pub use bytecode::{BytecodeBuilder, BytecodeObject, BytecodeRef, Label};
pub use context::Context;
pub use error::{CompileError, Error, ExpectedType};
pub use mutex::{MutexContext, MutexList};
pub use names::{NameTable, PropertyAcceptor, PropertyIndex, TypeHint};
pub use process::{Process, ProcessHandle, ProcessState};
pub use serialization::{BytecodeList, Charset, LoadContext, SaveContext, TagNode};
pub use subroutine::SubroutineValue;
pub use value::{BaseValue, CallableValue, IndexableValue, Value};
pub use world::{NullHost, ScriptHost, World, WorldConfig};
