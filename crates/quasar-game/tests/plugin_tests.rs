//! Plugin and file loading through generated bytecode

mod common;

use common::*;
use quasar_game::plugin::Feature;
use quasar_game::{ItemType, Plugin, PluginManager};
use quasar_interpreter::opcode::SpecialOp;
use quasar_interpreter::{BytecodeBuilder, ProcessState};
use std::fs;
use std::path::PathBuf;

fn item_path(dir: &str, name: &str) -> String {
    PathBuf::from(dir).join(name).to_string_lossy().into_owned()
}

fn plugin_with(id: &str, items: &[(ItemType, &str)]) -> Plugin {
    let mut plugin = Plugin::new(id);
    for (item_type, name) in items {
        plugin.add_item(*item_type, *name);
    }
    plugin
}

#[test]
fn test_failing_plugin_does_not_stop_others() {
    let dir = "/plugins/a";
    let host = TestHost::default()
        .file(&item_path(dir, "x.q"), print_program("x loaded"))
        .statement("print 1", print_program("1"));
    let (mut session, _) = make_session(host);

    let mut a = plugin_with("A", &[(ItemType::ScriptFile, "x.q"), (ItemType::Command, "bogus syntax")]);
    a.base_directory = PathBuf::from(dir);
    let b = plugin_with("B", &[(ItemType::Command, "print 1")]);
    session.plugins().borrow_mut().add_plugin(a);
    session.plugins().borrow_mut().add_plugin(b);

    let process = session.load_plugins().unwrap();
    assert_eq!(process.state(), &ProcessState::Ended);
    assert_eq!(
        session.world().console(),
        &[
            "x loaded",
            "Load of plugin \"A\" failed: Syntax error in \"bogus syntax\"",
            "1",
        ]
    );
    assert!(session.plugins().borrow().plugins().iter().all(Plugin::is_loaded));
}

#[test]
fn test_plugins_load_once() {
    let host = TestHost::default().statement("hello", print_program("hello"));
    let (mut session, _) = make_session(host);
    session
        .plugins()
        .borrow_mut()
        .add_plugin(plugin_with("HELLO", &[(ItemType::Command, "hello")]));

    session.load_plugins().unwrap();
    session.load_plugins().unwrap();
    assert_eq!(session.world().console(), &["hello"]);

    session
        .plugins()
        .borrow_mut()
        .add_plugin(plugin_with("LATE", &[(ItemType::Command, "hello")]));
    session.load_plugins().unwrap();
    assert_eq!(session.world().console(), &["hello", "hello"]);
}

#[test]
fn test_failed_plugin_is_not_retried() {
    let (mut session, _) = make_session(TestHost::default());
    session
        .plugins()
        .borrow_mut()
        .add_plugin(plugin_with("BROKEN", &[(ItemType::Command, "nonsense")]));

    session.load_plugins().unwrap();
    session.load_plugins().unwrap();
    assert_eq!(
        session.world().console(),
        &["Load of plugin \"BROKEN\" failed: Syntax error in \"nonsense\""]
    );
}

#[test]
fn test_dependency_order() {
    let host = TestHost::default()
        .statement("print user", print_program("user"))
        .statement("print lib", print_program("lib"));
    let (mut session, _) = make_session(host);

    let mut user = plugin_with("USER", &[(ItemType::Command, "print user")]);
    user.requires.push(Feature::new("charts", "2"));
    let mut lib = plugin_with("LIB", &[(ItemType::Command, "print lib")]);
    lib.provides.push(Feature::new("CHARTS", "2.1"));

    session.plugins().borrow_mut().add_plugin(user);
    session.plugins().borrow_mut().add_plugin(lib);
    session.load_plugins().unwrap();
    assert_eq!(session.world().console(), &["lib", "user"]);
}

#[test]
fn test_resource_and_help_items() {
    let dir = "/plugins/res";
    let (mut session, resources) = make_session(TestHost::default());
    let mut plugin = plugin_with(
        "RES",
        &[
            (ItemType::PlainFile, "readme.txt"),
            (ItemType::ResourceFile, "pics.res"),
            (ItemType::HelpFile, "help.xml"),
        ],
    );
    plugin.base_directory = PathBuf::from(dir);
    session.plugins().borrow_mut().add_plugin(plugin);

    let process = session.load_plugins().unwrap();
    assert_eq!(process.state(), &ProcessState::Ended);
    assert_eq!(
        resources.borrow().loaded,
        vec![
            format!("resource:{}", item_path(dir, "pics.res")),
            format!("help:{}", item_path(dir, "help.xml")),
        ]
    );
    assert!(session.world().console().is_empty());
}

#[test]
fn test_plugin_context_during_load() {
    // Exec = Print Directory
    let mut b = BytecodeBuilder::new();
    push_var(&mut b, "DIRECTORY");
    special(&mut b, SpecialOp::Print);
    let mut b2 = BytecodeBuilder::new();
    push_var(&mut b2, "ID");
    special(&mut b2, SpecialOp::Print);

    let host = TestHost::default()
        .statement("print directory", relocate(b))
        .statement("print id", relocate(b2));
    let (mut session, _) = make_session(host);
    let mut plugin = plugin_with(
        "ctx",
        &[(ItemType::Command, "print directory"), (ItemType::Command, "print id")],
    );
    plugin.base_directory = PathBuf::from("/plugins/ctx");
    session.plugins().borrow_mut().add_plugin(plugin);

    session.load_plugins().unwrap();
    assert_eq!(session.world().console(), &["/plugins/ctx", "CTX"]);
}

#[test]
fn test_file_loader() {
    let host = TestHost::default().file("init.q", print_program("init"));
    let (mut session, _) = make_session(host);

    let process = session.load_file("init.q", false).unwrap();
    assert_eq!(process.state(), &ProcessState::Ended);
    assert_eq!(session.world().console(), &["init"]);

    let process = session.load_file("missing.q", true).unwrap();
    assert_eq!(process.state(), &ProcessState::Ended);
    assert_eq!(session.world().console(), &["init"]);

    let process = session.load_file("missing.q", false).unwrap();
    assert_eq!(process.state(), &ProcessState::Ended);
    assert_eq!(
        session.world().console(),
        &["init", "Error loading file \"missing.q\": File not found: \"missing.q\""]
    );
}

#[test]
fn test_scan_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("beta.c2p"),
        "Name = Beta\nRequires = ALPHA\nExec = print beta\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("Alpha.C2P"),
        "# first\nName = Alpha\nVersion = 1.0\nDescription = One\nDescription = Two\nScriptFile = alpha.q\n",
    )
    .unwrap();
    fs::write(dir.path().join("broken.c2p"), "this line has no separator\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "Name = Ignored\n").unwrap();

    let mut manager = PluginManager::new();
    assert_eq!(manager.scan_directory(dir.path()).unwrap(), 2);

    let alpha = manager.find("alpha").unwrap();
    assert_eq!(alpha.name, "Alpha");
    assert_eq!(alpha.description, "One\nTwo");
    assert_eq!(alpha.base_directory(), dir.path());
    assert_eq!(alpha.items[0].item_type, ItemType::ScriptFile);

    let order: Vec<&str> = manager.enum_plugins_ordered().into_iter().map(Plugin::id).collect();
    assert_eq!(order, vec!["ALPHA", "BETA"]);
}

#[test]
fn test_scan_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = PluginManager::new();
    assert!(manager.scan_directory(&dir.path().join("nowhere")).is_err());
    assert!(manager.is_empty());
}
