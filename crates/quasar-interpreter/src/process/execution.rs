//! Instruction execution

use super::{ExceptionHandler, Flow, Process};
use crate::arguments::Arguments;
use crate::bytecode::BytecodeRef;
use crate::context::{get_property, Context};
use crate::error::{Error, ExpectedType};
use crate::opcode::{jump, BinaryOp, IndirectOp, Major, Opcode, Scope, SpecialOp, StackOp, UnaryOp};
use crate::process::ops;
use crate::value::{to_boolean, value_to_text, Value};
use crate::world::World;

fn invalid(what: &str) -> Error {
    Error::InvalidBytecode(what.to_string())
}

impl Process {
    pub(super) fn execute(&mut self, world: &mut World, insn: Opcode) -> Result<Flow, Error> {
        match insn.major {
            Major::Push => self.execute_push(world, insn)?,
            Major::Pop | Major::Store => self.execute_store(world, insn)?,
            Major::Binary => {
                let op = BinaryOp::from_u8(insn.minor).ok_or_else(|| invalid("binary operator"))?;
                let b = self.pop_value()?;
                let a = self.pop_value()?;
                self.push_value(ops::binary(op, a, b)?);
            }
            Major::Unary => {
                let op = UnaryOp::from_u8(insn.minor).ok_or_else(|| invalid("unary operator"))?;
                let a = self.pop_value()?;
                self.push_value(ops::unary(op, a)?);
            }
            Major::Jump => self.execute_jump(insn)?,
            Major::Indirect => self.execute_indirect(world, insn)?,
            Major::Memref => self.execute_memref(world, insn)?,
            Major::Stack => self.execute_stack(insn)?,
            Major::Special => return self.execute_special(world, insn),
        }
        Ok(Flow::Continue)
    }

    fn current_bco(&self) -> Result<BytecodeRef, Error> {
        self.frames
            .last()
            .map(|f| f.bco.clone())
            .ok_or_else(|| invalid("no active frame"))
    }

    fn name_arg(&self, arg: u16) -> Result<String, Error> {
        let bco = self.current_bco()?;
        bco.name(arg)
            .map(str::to_string)
            .ok_or_else(|| invalid("name index out of range"))
    }

    /// Resolve a variable: innermost context first, then globals
    fn lookup_variable(&self, world: &World, name: &str) -> Result<Option<Value>, Error> {
        for ctx in self.contexts.iter().rev() {
            if let Some(index) = ctx.lookup(name) {
                return ctx.get(index);
            }
        }
        world.global(name)
    }

    fn assign_variable(&self, world: &mut World, name: &str, value: Option<Value>) -> Result<(), Error> {
        for ctx in self.contexts.iter().rev() {
            if let Some(index) = ctx.lookup(name) {
                return ctx.set(index, value.as_ref());
            }
        }
        if world.has_global(name) {
            world.set_global(name, value);
            Ok(())
        } else {
            Err(Error::UnknownIdentifier(name.to_string()))
        }
    }

    fn execute_push(&mut self, world: &mut World, insn: Opcode) -> Result<(), Error> {
        let value = match Scope::from_u8(insn.minor).ok_or_else(|| invalid("push scope"))? {
            Scope::Literal => self
                .current_bco()?
                .literal(insn.arg)
                .cloned()
                .ok_or_else(|| invalid("literal index out of range"))?,
            Scope::Integer => Some(Value::Integer(i32::from(insn.arg as i16))),
            Scope::Boolean => match insn.arg {
                0 => Some(Value::Boolean(false)),
                1 => Some(Value::Boolean(true)),
                _ => None,
            },
            Scope::NamedVariable => {
                let name = self.name_arg(insn.arg)?;
                self.lookup_variable(world, &name)?
            }
            Scope::NamedShared => world.global(&self.name_arg(insn.arg)?)?,
        };
        self.push_value(value);
        Ok(())
    }

    fn execute_store(&mut self, world: &mut World, insn: Opcode) -> Result<(), Error> {
        let scope = Scope::from_u8(insn.minor).ok_or_else(|| invalid("store scope"))?;
        let value = if insn.major == Major::Pop {
            self.pop_value()?
        } else {
            self.stack.last().cloned().ok_or_else(|| invalid("stack underflow"))?
        };
        match scope {
            Scope::NamedVariable => {
                let name = self.name_arg(insn.arg)?;
                self.assign_variable(world, &name, value)
            }
            Scope::NamedShared => {
                let name = self.name_arg(insn.arg)?;
                world.set_global(name, value);
                Ok(())
            }
            Scope::Literal | Scope::Integer | Scope::Boolean => Err(invalid("store to constant")),
        }
    }

    fn execute_jump(&mut self, insn: Opcode) -> Result<(), Error> {
        let flags = insn.minor;
        if flags & jump::SYMBOLIC != 0 {
            return Err(invalid("jump to unresolved label"));
        }
        let frame_depth = self.frames.len().checked_sub(1).ok_or_else(|| invalid("no active frame"))?;
        let target = usize::from(insn.arg);

        if flags & jump::CATCH != 0 {
            self.handlers.push(ExceptionHandler {
                frame_depth,
                catch_pc: target,
                stack_len: self.stack.len(),
                context_len: self.contexts.len(),
            });
            return Ok(());
        }

        let taken = if flags & jump::ALWAYS == jump::ALWAYS {
            true
        } else {
            let top = self.stack.last().ok_or_else(|| invalid("stack underflow"))?;
            let mask = match to_boolean(top.as_ref()) {
                Some(true) => jump::IF_TRUE,
                Some(false) => jump::IF_FALSE,
                None => jump::IF_EMPTY,
            };
            flags & mask != 0
        };
        if flags & jump::POP != 0 {
            self.pop_value()?;
        }
        if taken {
            self.frames[frame_depth].pc = target;
        }
        Ok(())
    }

    /// Pop `count` arguments, preserving their order
    fn pop_arguments(&mut self, count: u16) -> Result<Arguments, Error> {
        let count = usize::from(count);
        if count > self.stack.len() {
            return Err(invalid("stack underflow"));
        }
        let values = self.stack.split_off(self.stack.len() - count);
        Ok(Arguments::new(values))
    }

    /// Stack layout: `[value] args... callee`; `value` only for store and pop
    fn execute_indirect(&mut self, world: &mut World, insn: Opcode) -> Result<(), Error> {
        let op = IndirectOp::from_u8(insn.minor).ok_or_else(|| invalid("indirect operation"))?;
        let callee = self.pop_value()?;
        let mut args = self.pop_arguments(insn.arg)?;

        match op {
            IndirectOp::Call | IndirectOp::Load => {
                let want_result = op == IndirectOp::Load;
                match callee {
                    Some(Value::Callable(c)) => c.call(self, world, args, want_result),
                    Some(Value::Indexable(i)) => i.call(self, world, args, want_result),
                    None => {
                        if want_result {
                            self.push_value(None);
                        }
                        Ok(())
                    }
                    Some(_) => Err(Error::Type(ExpectedType::Callable)),
                }
            }
            IndirectOp::Store | IndirectOp::Pop => {
                let value = self.pop_value()?;
                match callee {
                    Some(Value::Indexable(i)) => i.set(&mut args, value.as_ref())?,
                    Some(Value::Callable(_)) => return Err(Error::NotAssignable),
                    _ => return Err(Error::Type(ExpectedType::Indexable)),
                }
                if op == IndirectOp::Store {
                    self.push_value(value);
                }
                Ok(())
            }
        }
    }

    /// Stack layout: `[value] object`; `value` only for store and pop
    fn execute_memref(&mut self, world: &mut World, insn: Opcode) -> Result<(), Error> {
        let op = IndirectOp::from_u8(insn.minor).ok_or_else(|| invalid("member operation"))?;
        let name = self.name_arg(insn.arg)?;
        let object = self.pop_value()?;

        match op {
            IndirectOp::Load => {
                let value = match &object {
                    None => None,
                    Some(Value::Context(ctx)) => get_property(ctx.as_ref(), &name)?,
                    Some(_) => return Err(Error::Type(ExpectedType::Context)),
                };
                self.push_value(value);
                Ok(())
            }
            IndirectOp::Call => {
                let member = match &object {
                    None => return Ok(()),
                    Some(Value::Context(ctx)) => get_property(ctx.as_ref(), &name)?,
                    Some(_) => return Err(Error::Type(ExpectedType::Context)),
                };
                match member {
                    Some(Value::Callable(c)) => c.call(self, world, Arguments::default(), false),
                    Some(Value::Indexable(i)) => i.call(self, world, Arguments::default(), false),
                    _ => Err(Error::Type(ExpectedType::Procedure)),
                }
            }
            IndirectOp::Store | IndirectOp::Pop => {
                let value = self.pop_value()?;
                match &object {
                    Some(Value::Context(ctx)) => match ctx.lookup(&name) {
                        Some(index) => ctx.set(index, value.as_ref())?,
                        None => return Err(Error::UnknownIdentifier(name)),
                    },
                    _ => return Err(Error::Type(ExpectedType::Context)),
                }
                if op == IndirectOp::Store {
                    self.push_value(value);
                }
                Ok(())
            }
        }
    }

    fn execute_stack(&mut self, insn: Opcode) -> Result<(), Error> {
        let op = StackOp::from_u8(insn.minor).ok_or_else(|| invalid("stack operation"))?;
        let n = usize::from(insn.arg);
        let len = self.stack.len();
        match op {
            StackOp::Dup => {
                let index = len.checked_sub(n + 1).ok_or_else(|| invalid("stack underflow"))?;
                let value = self.stack[index].clone();
                self.stack.push(value);
            }
            StackOp::Drop => {
                let keep = len.checked_sub(n).ok_or_else(|| invalid("stack underflow"))?;
                self.stack.truncate(keep);
            }
            StackOp::Swap => {
                let index = len.checked_sub(n + 1).ok_or_else(|| invalid("stack underflow"))?;
                self.stack.swap(index, len - 1);
            }
        }
        Ok(())
    }

    /// Enter a context, running its entry hook first
    fn enter_context(&mut self, world: &mut World, mut ctx: Box<dyn Context>) -> Result<(), Error> {
        ctx.on_context_entered(world, &self.handle)?;
        self.contexts.push(ctx);
        Ok(())
    }

    /// Leave the innermost context of the current frame
    fn leave_context(&mut self, world: &mut World) -> Result<(), Error> {
        let base = self.frames.last().map_or(0, |f| f.context_base);
        if self.contexts.len() <= base {
            return Err(invalid("no context to leave"));
        }
        let len = self.contexts.len() - 1;
        self.leave_contexts(world, len);
        Ok(())
    }

    fn execute_special(&mut self, world: &mut World, insn: Opcode) -> Result<Flow, Error> {
        let op = SpecialOp::from_u8(insn.minor).ok_or_else(|| invalid("special operation"))?;
        match op {
            SpecialOp::Uncatch => {
                let depth = self.frames.len().saturating_sub(1);
                match self.handlers.last() {
                    Some(h) if h.frame_depth == depth => {
                        self.handlers.pop();
                    }
                    _ => return Err(invalid("uncatch without handler")),
                }
            }
            SpecialOp::Return => self.return_from_frame(world, insn.arg)?,
            SpecialOp::With => match self.pop_value()? {
                Some(Value::Context(ctx)) => self.enter_context(world, ctx)?,
                _ => return Err(Error::Type(ExpectedType::Context)),
            },
            SpecialOp::EndWith | SpecialOp::EndIndex => self.leave_context(world)?,
            SpecialOp::FirstIndex => {
                let first = match self.pop_value()? {
                    None => None,
                    Some(collection) => collection.make_first_context()?,
                };
                match first {
                    Some(ctx) => {
                        self.enter_context(world, ctx)?;
                        self.push_value(Some(Value::Boolean(true)));
                    }
                    None => self.push_value(Some(Value::Boolean(false))),
                }
            }
            SpecialOp::NextIndex => {
                let base = self.frames.last().map_or(0, |f| f.context_base);
                if self.contexts.len() <= base {
                    return Err(invalid("no iteration context"));
                }
                let advanced = match self.contexts.last_mut() {
                    Some(ctx) => ctx.next(),
                    None => false,
                };
                if !advanced {
                    self.leave_context(world)?;
                }
                self.push_value(Some(Value::Boolean(advanced)));
            }
            SpecialOp::EvalStatement => {
                if let Some(text) = self.pop_value()? {
                    let origin = self.current_bco()?.origin().to_string();
                    let bco = world.host_mut().compile_statement(&text.to_text(false), &origin)?;
                    self.push_frame(bco, false)?;
                }
            }
            SpecialOp::Load => {
                let name = value_to_text(self.pop_value()?.as_ref(), false);
                if name.is_empty() {
                    return Err(Error::FileNotFound(name));
                }
                let origin = self.current_bco()?.origin().to_string();
                match world.host_mut().open_script(&name, &origin)? {
                    Some(bco) => self.push_frame(bco, false)?,
                    None => return Err(Error::FileNotFound(name)),
                }
            }
            SpecialOp::Print => {
                if let Some(value) = self.pop_value()? {
                    world.print(&value.to_text(false));
                }
            }
            SpecialOp::Throw => {
                let value = self.pop_value()?;
                return Err(Error::User(value_to_text(value.as_ref(), false)));
            }
            SpecialOp::Terminate => return Ok(Flow::Terminate),
            SpecialOp::Suspend => return Ok(Flow::Suspend),
        }
        Ok(Flow::Continue)
    }
}
