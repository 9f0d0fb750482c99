//! Instruction set of the stack machine
//!
//! An instruction is a triple `(major, minor, arg)`. The major opcode selects
//! the instruction family, the minor selects the variant within the family,
//! and `arg` is a 16-bit operand (literal index, name index, argument count,
//! jump target or label id depending on the family).

use std::fmt;

/// Instruction family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Major {
    /// Push a value: minor is a [`Scope`]
    Push = 0,
    /// Binary operator on the two top values: minor is a [`BinaryOp`]
    Binary = 1,
    /// Unary operator on the top value: minor is a [`UnaryOp`]
    Unary = 2,
    /// Conditional or unconditional jump: minor is a set of [`jump`] flags
    Jump = 3,
    /// Call/load/store through a callable: minor is an [`IndirectOp`], arg is the argument count
    Indirect = 4,
    /// Stack shuffling: minor is a [`StackOp`]
    Stack = 5,
    /// Store and pop: minor is a [`Scope`]
    Pop = 6,
    /// Store, keeping the value: minor is a [`Scope`]
    Store = 7,
    /// Member access on a context: minor is an [`IndirectOp`], arg is a name index
    Memref = 8,
    /// Everything else: minor is a [`SpecialOp`]
    Special = 9,
}

impl Major {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Major::Push),
            1 => Some(Major::Binary),
            2 => Some(Major::Unary),
            3 => Some(Major::Jump),
            4 => Some(Major::Indirect),
            5 => Some(Major::Stack),
            6 => Some(Major::Pop),
            7 => Some(Major::Store),
            8 => Some(Major::Memref),
            9 => Some(Major::Special),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Major::Push => "push",
            Major::Binary => "binary",
            Major::Unary => "unary",
            Major::Jump => "jump",
            Major::Indirect => "indirect",
            Major::Stack => "stack",
            Major::Pop => "pop",
            Major::Store => "store",
            Major::Memref => "memref",
            Major::Special => "special",
        }
    }
}

/// Operand location for push/pop/store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Scope {
    /// Literal pool entry `arg`
    Literal = 0,
    /// Immediate signed integer `arg as i16`
    Integer = 1,
    /// Immediate boolean; `arg` is 0, 1, or anything else for null
    Boolean = 2,
    /// Variable named `names[arg]`: context stack first, then globals
    NamedVariable = 3,
    /// Global variable named `names[arg]`
    NamedShared = 4,
}

impl Scope {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Scope::Literal),
            1 => Some(Scope::Integer),
            2 => Some(Scope::Boolean),
            3 => Some(Scope::NamedVariable),
            4 => Some(Scope::NamedShared),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BinaryOp {
    Concat = 0,
    Add = 1,
    Sub = 2,
    Mul = 3,
    CompareEq = 4,
    CompareLt = 5,
}

impl BinaryOp {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(BinaryOp::Concat),
            1 => Some(BinaryOp::Add),
            2 => Some(BinaryOp::Sub),
            3 => Some(BinaryOp::Mul),
            4 => Some(BinaryOp::CompareEq),
            5 => Some(BinaryOp::CompareLt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UnaryOp {
    Not = 0,
    IsEmpty = 1,
    Str = 2,
    Neg = 3,
}

impl UnaryOp {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(UnaryOp::Not),
            1 => Some(UnaryOp::IsEmpty),
            2 => Some(UnaryOp::Str),
            3 => Some(UnaryOp::Neg),
            _ => None,
        }
    }
}

/// Jump condition flags (minor of [`Major::Jump`])
pub mod jump {
    /// Jump if the top of stack is true
    pub const IF_TRUE: u8 = 1;
    /// Jump if the top of stack is false
    pub const IF_FALSE: u8 = 2;
    /// Jump if the top of stack is null
    pub const IF_EMPTY: u8 = 4;
    /// Unconditional
    pub const ALWAYS: u8 = IF_TRUE | IF_FALSE | IF_EMPTY;
    /// Pop the tested value afterwards
    pub const POP: u8 = 8;
    /// `arg` is a label id, not an address (cleared by relocation)
    pub const SYMBOLIC: u8 = 16;
    /// Install an exception handler that resumes at the target
    pub const CATCH: u8 = 32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IndirectOp {
    Call = 0,
    Load = 1,
    Store = 2,
    Pop = 3,
}

impl IndirectOp {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(IndirectOp::Call),
            1 => Some(IndirectOp::Load),
            2 => Some(IndirectOp::Store),
            3 => Some(IndirectOp::Pop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StackOp {
    /// Duplicate the element `arg` positions below the top
    Dup = 0,
    /// Drop `arg` elements
    Drop = 1,
    /// Swap the top with the element `arg` positions below it
    Swap = 2,
}

impl StackOp {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(StackOp::Dup),
            1 => Some(StackOp::Drop),
            2 => Some(StackOp::Swap),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SpecialOp {
    /// Remove the innermost exception handler
    Uncatch = 0,
    /// Leave the current frame; `arg` is the number of result values (0 or 1)
    Return = 1,
    /// Pop a context and make it current
    With = 2,
    /// Leave the current context
    EndWith = 3,
    /// Pop a collection, enter its first element; push whether one exists
    FirstIndex = 4,
    /// Advance the current context; on exhaustion leave it. Push whether it advanced.
    NextIndex = 5,
    /// Leave the iteration context early
    EndIndex = 6,
    /// Pop a string, compile it as a statement and run it
    EvalStatement = 7,
    /// Pop a file name, load and run that script
    Load = 8,
    /// Pop a value and print it
    Print = 9,
    /// Pop a value and raise it as an error
    Throw = 10,
    /// Terminate the process
    Terminate = 11,
    /// Suspend the process
    Suspend = 12,
}

impl SpecialOp {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(SpecialOp::Uncatch),
            1 => Some(SpecialOp::Return),
            2 => Some(SpecialOp::With),
            3 => Some(SpecialOp::EndWith),
            4 => Some(SpecialOp::FirstIndex),
            5 => Some(SpecialOp::NextIndex),
            6 => Some(SpecialOp::EndIndex),
            7 => Some(SpecialOp::EvalStatement),
            8 => Some(SpecialOp::Load),
            9 => Some(SpecialOp::Print),
            10 => Some(SpecialOp::Throw),
            11 => Some(SpecialOp::Terminate),
            12 => Some(SpecialOp::Suspend),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SpecialOp::Uncatch => "uncatch",
            SpecialOp::Return => "return",
            SpecialOp::With => "with",
            SpecialOp::EndWith => "endwith",
            SpecialOp::FirstIndex => "firstindex",
            SpecialOp::NextIndex => "nextindex",
            SpecialOp::EndIndex => "endindex",
            SpecialOp::EvalStatement => "evalstmt",
            SpecialOp::Load => "load",
            SpecialOp::Print => "print",
            SpecialOp::Throw => "throw",
            SpecialOp::Terminate => "terminate",
            SpecialOp::Suspend => "suspend",
        }
    }
}

/// One instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub major: Major,
    pub minor: u8,
    pub arg: u16,
}

impl Opcode {
    pub fn new(major: Major, minor: u8, arg: u16) -> Self {
        Self { major, minor, arg }
    }

    /// True for a jump whose target is still a label id
    pub fn is_symbolic_jump(&self) -> bool {
        self.major == Major::Jump && self.minor & jump::SYMBOLIC != 0
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} {}", self.major.name(), self.minor, self.arg)
    }
}
