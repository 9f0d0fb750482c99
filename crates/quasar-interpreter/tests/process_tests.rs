//! Process execution: control flow, contexts, locks and error unwinding

mod common;

use common::*;
use quasar_interpreter::opcode::{jump, IndirectOp, Major, Scope, SpecialOp};
use quasar_interpreter::{
    BuiltinFunction, BytecodeBuilder, Error, ExpectedType, ProcessHandle, ProcessState, SubroutineValue, Value,
    World, WorldConfig, NullHost,
};
use std::rc::Rc;

/// `With Lock(name, note) Do`
fn enter_lock(b: &mut BytecodeBuilder, name: &str, note: Option<&str>) {
    push_str(b, name);
    match note {
        Some(note) => {
            push_str(b, note);
            call_function(b, "LOCK", 2);
        }
        None => call_function(b, "LOCK", 1),
    }
    special(b, SpecialOp::With);
}

/// `Print GetLockInfo(name, kind)`
fn print_lock_info(b: &mut BytecodeBuilder, name: &str, kind: i32) {
    push_str(b, name);
    push_int(b, kind);
    call_function(b, "GETLOCKINFO", 2);
    special(b, SpecialOp::Print);
}

#[test]
fn test_lock_lifecycle() {
    let mut world = make_world(TestHost::default());
    let mut b = BytecodeBuilder::new();
    enter_lock(&mut b, "p15.tax", Some("taxation"));
    print_lock_info(&mut b, "P15.TAX", 1);
    print_lock_info(&mut b, "P15.TAX", 2);
    special(&mut b, SpecialOp::EndWith);
    print_lock_info(&mut b, "p15.tax", 0);

    let process = run(&mut world, "Tax Script", b);
    assert_eq!(process.state(), &ProcessState::Ended);
    assert_eq!(world.console(), &["Tax Script", "taxation", "False"]);
    assert!(world.mutex_list().is_empty());
}

#[test]
fn test_lock_conflict_is_catchable() {
    let mut world = make_world(TestHost::default());
    world
        .mutex_list_mut()
        .create("X", "", &ProcessHandle::new(999, "other"))
        .unwrap();

    let mut b = BytecodeBuilder::new();
    let caught = b.make_label().unwrap();
    let end = b.make_label().unwrap();
    b.add_jump(jump::CATCH, caught);
    enter_lock(&mut b, "x", None);
    special(&mut b, SpecialOp::Uncatch);
    b.add_jump(jump::ALWAYS, end);
    b.add_label(caught);
    special(&mut b, SpecialOp::Print);
    b.add_label(end);

    let process = run(&mut world, "P", b);
    assert_eq!(process.state(), &ProcessState::Ended);
    assert_eq!(world.console(), &["Lock \"X\" is already held"]);
    // The other process still owns it
    assert_eq!(world.mutex_list().query("X").unwrap().owner().id(), 999);
}

#[test]
fn test_lock_released_by_exception() {
    let mut world = make_world(TestHost::default());
    let mut b = BytecodeBuilder::new();
    let caught = b.make_label().unwrap();
    b.add_jump(jump::CATCH, caught);
    enter_lock(&mut b, "X", None);
    push_str(&mut b, "boom");
    special(&mut b, SpecialOp::Throw);
    b.add_label(caught);
    special(&mut b, SpecialOp::Print);
    print_lock_info(&mut b, "X", 0);

    let process = run(&mut world, "P", b);
    assert_eq!(process.state(), &ProcessState::Ended);
    assert_eq!(world.console(), &["boom", "False"]);
}

#[test]
fn test_lock_released_by_termination() {
    let mut world = make_world(TestHost::default());
    let mut b = BytecodeBuilder::new();
    enter_lock(&mut b, "X", None);
    special(&mut b, SpecialOp::Terminate);
    print_lock_info(&mut b, "X", 0);

    let process = run(&mut world, "P", b);
    assert_eq!(process.state(), &ProcessState::Terminated);
    assert!(world.console().is_empty());
    assert!(world.mutex_list().is_empty());
}

#[test]
fn test_suspended_process_keeps_lock_until_terminated() {
    let mut world = make_world(TestHost::default());
    let mut b = BytecodeBuilder::new();
    enter_lock(&mut b, "X", None);
    special(&mut b, SpecialOp::Suspend);
    special(&mut b, SpecialOp::EndWith);

    let mut process = run(&mut world, "P", b);
    assert_eq!(process.state(), &ProcessState::Suspended);
    assert_eq!(world.mutex_list().len(), 1);
    assert_eq!(process.context_depth(), 1);

    process.terminate(&mut world);
    assert_eq!(process.state(), &ProcessState::Terminated);
    assert!(world.mutex_list().is_empty());
    assert_eq!(process.context_depth(), 0);
}

#[test]
fn test_resume_after_suspend() {
    let mut world = make_world(TestHost::default());
    let mut b = BytecodeBuilder::new();
    push_str(&mut b, "before");
    special(&mut b, SpecialOp::Print);
    special(&mut b, SpecialOp::Suspend);
    push_str(&mut b, "after");
    special(&mut b, SpecialOp::Print);

    let mut process = run(&mut world, "P", b);
    assert_eq!(world.console(), &["before"]);
    assert_eq!(process.run(&mut world), &ProcessState::Ended);
    assert_eq!(world.console(), &["before", "after"]);
}

#[test]
fn test_uncaught_error_fails_process_and_releases_locks() {
    let mut world = make_world(TestHost::default());
    let mut b = BytecodeBuilder::new();
    enter_lock(&mut b, "X", None);
    push_str(&mut b, "bad");
    special(&mut b, SpecialOp::Throw);

    let process = run(&mut world, "P", b);
    assert_eq!(process.state(), &ProcessState::Failed(Error::User("bad".to_string())));
    assert!(world.mutex_list().is_empty());
}

/// `ForEach NUMBERS Do Print Value`
fn for_each_program() -> BytecodeBuilder {
    let mut b = BytecodeBuilder::new();
    let top = b.make_label().unwrap();
    let end = b.make_label().unwrap();
    push_global(&mut b, "NUMBERS");
    special(&mut b, SpecialOp::FirstIndex);
    b.add_jump(jump::IF_FALSE | jump::POP, end);
    b.add_label(top);
    push_var(&mut b, "VALUE");
    special(&mut b, SpecialOp::Print);
    special(&mut b, SpecialOp::NextIndex);
    b.add_jump(jump::IF_TRUE | jump::POP, top);
    b.add_label(end);
    b
}

#[test]
fn test_for_each() {
    let mut world = make_world(TestHost::default());
    world.set_global("NUMBERS", Some(Numbers::value(vec![10, 20, 30])));
    let process = run(&mut world, "P", for_each_program());
    assert_eq!(process.state(), &ProcessState::Ended);
    assert_eq!(world.console(), &["10", "20", "30"]);
}

#[test]
fn test_for_each_over_empty_collection() {
    let mut world = make_world(TestHost::default());
    world.set_global("NUMBERS", Some(Numbers::value(vec![])));
    let process = run(&mut world, "P", for_each_program());
    assert_eq!(process.state(), &ProcessState::Ended);
    assert!(world.console().is_empty());
}

#[test]
fn test_for_each_over_scalar_is_type_error() {
    let mut world = make_world(TestHost::default());
    world.set_global("NUMBERS", Some(Value::Integer(3)));
    let process = run(&mut world, "P", for_each_program());
    assert_eq!(
        process.state(),
        &ProcessState::Failed(Error::Type(ExpectedType::Iterable))
    );
}

#[test]
fn test_eval_statement_and_load() {
    let mut host = TestHost::default();
    host.statements.insert("print 1".to_string(), print_program("1"));
    host.files.insert("init.q".to_string(), print_program("loaded"));
    let origins = host.origins.clone();
    let mut world = make_world(host);

    let mut b = BytecodeBuilder::new();
    b.set_origin("MYPLUGIN");
    push_str(&mut b, "print 1");
    special(&mut b, SpecialOp::EvalStatement);
    push_str(&mut b, "init.q");
    special(&mut b, SpecialOp::Load);

    let process = run(&mut world, "P", b);
    assert_eq!(process.state(), &ProcessState::Ended);
    assert_eq!(world.console(), &["1", "loaded"]);
    assert_eq!(*origins.borrow(), vec!["MYPLUGIN".to_string(), "MYPLUGIN".to_string()]);
}

#[test]
fn test_load_missing_or_empty_file() {
    let mut world = make_world(TestHost::default());
    let mut b = BytecodeBuilder::new();
    push_str(&mut b, "missing.q");
    special(&mut b, SpecialOp::Load);
    let process = run(&mut world, "P", b);
    assert_eq!(
        process.state(),
        &ProcessState::Failed(Error::FileNotFound("missing.q".to_string()))
    );

    let mut b = BytecodeBuilder::new();
    push_str(&mut b, "");
    special(&mut b, SpecialOp::Load);
    let process = run(&mut world, "P", b);
    assert_eq!(process.state(), &ProcessState::Failed(Error::FileNotFound(String::new())));
}

#[test]
fn test_subroutine_result() {
    let mut world = make_world(TestHost::default());
    let mut sub = BytecodeBuilder::new();
    sub.set_is_procedure(false);
    push_int(&mut sub, 42);
    sub.add_instruction(Major::Special, SpecialOp::Return as u8, 1);
    let sub = SubroutineValue::new(Rc::new(sub.relocate().unwrap()));

    let mut b = BytecodeBuilder::new();
    b.add_push_literal(Some(sub.into_value())).unwrap();
    b.add_instruction(Major::Indirect, IndirectOp::Load as u8, 0);
    special(&mut b, SpecialOp::Print);

    let process = run(&mut world, "P", b);
    assert_eq!(process.state(), &ProcessState::Ended);
    assert_eq!(world.console(), &["42"]);
}

#[test]
fn test_unbounded_recursion_overflows() {
    let config = WorldConfig {
        max_call_depth: 20,
        ..WorldConfig::default()
    };
    let mut world = World::new(config, Box::new(NullHost));
    let mut rec = BytecodeBuilder::new();
    push_global(&mut rec, "REC");
    rec.add_instruction(Major::Indirect, IndirectOp::Call as u8, 0);
    let rec = Rc::new(rec.relocate().unwrap());
    world.set_global("REC", Some(SubroutineValue::new(rec.clone()).into_value()));

    let mut process = quasar_interpreter::Process::new(&mut world, "P");
    process.push_frame(rec, false).unwrap();
    assert_eq!(process.run(&mut world), &ProcessState::Failed(Error::StackOverflow));
}

#[test]
fn test_assigning_to_function_call_fails() {
    let mut world = make_world(TestHost::default());
    world.set_global("F", Some(BuiltinFunction::function("F", |_, _, _| Ok(None)).into_value()));
    let mut b = BytecodeBuilder::new();
    push_int(&mut b, 1);
    push_global(&mut b, "F");
    b.add_instruction(Major::Indirect, IndirectOp::Pop as u8, 0);

    let process = run(&mut world, "P", b);
    assert_eq!(process.state(), &ProcessState::Failed(Error::NotAssignable));
}

#[test]
fn test_variables_and_arithmetic() {
    let mut world = make_world(TestHost::default());
    world.set_global("A", None);
    let mut b = BytecodeBuilder::new();
    push_int(&mut b, 40);
    push_int(&mut b, 2);
    b.add_instruction(Major::Binary, quasar_interpreter::opcode::BinaryOp::Add as u8, 0);
    b.add_named_instruction(Major::Pop, Scope::NamedVariable as u8, "A").unwrap();
    push_var(&mut b, "A");
    special(&mut b, SpecialOp::Print);

    let process = run(&mut world, "P", b);
    assert_eq!(process.state(), &ProcessState::Ended);
    assert_eq!(world.console(), &["42"]);
    assert_eq!(world.global("A").unwrap().and_then(|v| v.as_integer()), Some(42));
}

#[test]
fn test_assigning_undeclared_variable_fails() {
    let mut world = make_world(TestHost::default());
    let mut b = BytecodeBuilder::new();
    push_int(&mut b, 1);
    b.add_named_instruction(Major::Pop, Scope::NamedVariable as u8, "NOPE").unwrap();
    let process = run(&mut world, "P", b);
    assert_eq!(
        process.state(),
        &ProcessState::Failed(Error::UnknownIdentifier("NOPE".to_string()))
    );
}

#[test]
fn test_catch_handler_is_frame_local() {
    // The handler installed by the caller catches an error from the callee
    let mut world = make_world(TestHost::default());
    let mut sub = BytecodeBuilder::new();
    push_str(&mut sub, "inner");
    special(&mut sub, SpecialOp::Throw);
    let sub = SubroutineValue::new(Rc::new(sub.relocate().unwrap()));

    let mut b = BytecodeBuilder::new();
    let caught = b.make_label().unwrap();
    b.add_jump(jump::CATCH, caught);
    b.add_push_literal(Some(sub.into_value())).unwrap();
    b.add_instruction(Major::Indirect, IndirectOp::Call as u8, 0);
    special(&mut b, SpecialOp::Uncatch);
    b.add_label(caught);
    special(&mut b, SpecialOp::Print);

    let process = run(&mut world, "P", b);
    assert_eq!(process.state(), &ProcessState::Ended);
    assert_eq!(world.console(), &["inner"]);
    assert_eq!(process.frame_depth(), 0);
}
