//! Bytecode debugging utilities

use crate::bytecode::BytecodeObject;
use crate::opcode::{jump, BinaryOp, IndirectOp, Major, Opcode, Scope, SpecialOp, StackOp, UnaryOp};
use crate::value::value_to_text;
use std::fmt::Write;

/// Render a listing of the whole object
pub fn disassemble(bco: &BytecodeObject) -> String {
    let mut out = String::new();
    let title = if bco.subroutine_name().is_empty() {
        "<anonymous>"
    } else {
        bco.subroutine_name()
    };
    let _ = writeln!(out, "; {}", title);
    if !bco.file_name().is_empty() {
        let _ = writeln!(out, "; file {}", bco.file_name());
    }
    if !bco.origin().is_empty() {
        let _ = writeln!(out, "; origin {}", bco.origin());
    }
    for (pc, insn) in bco.code().iter().enumerate() {
        let _ = writeln!(out, "{:4}  {}", pc, disassemble_instruction(insn, bco));
    }
    out
}

/// Render one instruction
pub fn disassemble_instruction(insn: &Opcode, bco: &BytecodeObject) -> String {
    let name = |index: u16| bco.name(index).unwrap_or("???").to_string();
    match insn.major {
        Major::Push | Major::Pop | Major::Store => {
            let verb = match insn.major {
                Major::Push => "push",
                Major::Pop => "pop",
                _ => "store",
            };
            match Scope::from_u8(insn.minor) {
                Some(Scope::Literal) => {
                    let text = bco
                        .literal(insn.arg)
                        .map(|v| value_to_text(v.as_ref(), true))
                        .unwrap_or_else(|| "???".to_string());
                    format!("{}lit   {:<6}; {}", verb, insn.arg, text)
                }
                Some(Scope::Integer) => format!("{}int   {}", verb, insn.arg as i16),
                Some(Scope::Boolean) => {
                    let text = match insn.arg {
                        0 => "False",
                        1 => "True",
                        _ => "EMPTY",
                    };
                    format!("{}bool  {}", verb, text)
                }
                Some(Scope::NamedVariable) => format!("{}var   {}", verb, name(insn.arg)),
                Some(Scope::NamedShared) => format!("{}gvar  {}", verb, name(insn.arg)),
                None => unknown(insn),
            }
        }
        Major::Binary => match BinaryOp::from_u8(insn.minor) {
            Some(op) => format!("b{:?}", op).to_lowercase(),
            None => unknown(insn),
        },
        Major::Unary => match UnaryOp::from_u8(insn.minor) {
            Some(op) => format!("u{:?}", op).to_lowercase(),
            None => unknown(insn),
        },
        Major::Jump => {
            let mut flags = String::new();
            if insn.minor & jump::CATCH != 0 {
                flags.push_str("catch");
            } else if insn.minor & jump::ALWAYS == jump::ALWAYS {
                flags.push_str("j");
            } else {
                flags.push_str("j");
                if insn.minor & jump::IF_TRUE != 0 {
                    flags.push('t');
                }
                if insn.minor & jump::IF_FALSE != 0 {
                    flags.push('f');
                }
                if insn.minor & jump::IF_EMPTY != 0 {
                    flags.push('e');
                }
            }
            if insn.minor & jump::POP != 0 {
                flags.push('p');
            }
            if insn.minor & jump::SYMBOLIC != 0 {
                format!("{:<9} L{}", flags, insn.arg)
            } else {
                format!("{:<9} #{}", flags, insn.arg)
            }
        }
        Major::Indirect => match IndirectOp::from_u8(insn.minor) {
            Some(op) => format!("{:<9} args={}", format!("{:?}ind", op).to_lowercase(), insn.arg),
            None => unknown(insn),
        },
        Major::Memref => match IndirectOp::from_u8(insn.minor) {
            Some(op) => format!("{:<9} {}", format!("{:?}mem", op).to_lowercase(), name(insn.arg)),
            None => unknown(insn),
        },
        Major::Stack => match StackOp::from_u8(insn.minor) {
            Some(op) => format!("{:<9} {}", format!("{:?}", op).to_lowercase(), insn.arg),
            None => unknown(insn),
        },
        Major::Special => match SpecialOp::from_u8(insn.minor) {
            Some(SpecialOp::Return) => format!("return    {}", insn.arg),
            Some(op) => op.name().to_string(),
            None => unknown(insn),
        },
    }
}

fn unknown(insn: &Opcode) -> String {
    format!("??? {}", insn)
}

#[cfg(test)]
mod tests {
    use crate::bytecode::BytecodeBuilder;
    use crate::opcode::{jump, Major, Scope, SpecialOp};
    use crate::value::Value;

    #[test]
    fn test_listing() {
        let mut b = BytecodeBuilder::new();
        b.set_subroutine_name("DEMO");
        let end = b.make_label().unwrap();
        b.add_jump(jump::CATCH, end);
        b.add_push_literal(Some(Value::from("hello"))).unwrap();
        b.add_instruction(Major::Special, SpecialOp::Print as u8, 0);
        b.add_named_instruction(Major::Push, Scope::NamedShared as u8, "LOCK").unwrap();
        b.add_label(end);
        let text = b.relocate().unwrap().disassemble();

        assert!(text.starts_with("; DEMO\n"));
        assert!(text.contains("catch     #4"));
        assert!(text.contains("pushlit   0     ; \"hello\""));
        assert!(text.contains("print"));
        assert!(text.contains("pushgvar  LOCK"));
    }
}
