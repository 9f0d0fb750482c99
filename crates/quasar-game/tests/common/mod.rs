//! Shared fixtures for the game layer integration tests

#![allow(dead_code)]

use quasar_game::plugins::ResourceHost;
use quasar_game::spec::{Beam, Engine, FriendlyCode, Hull, ShipList, TorpedoLauncher};
use quasar_game::Session;
use quasar_interpreter::opcode::{IndirectOp, Major, Scope, SpecialOp};
use quasar_interpreter::{BytecodeBuilder, BytecodeRef, Error, ScriptHost, Value, WorldConfig};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Host with precompiled statements and files
#[derive(Default)]
pub struct TestHost {
    pub statements: HashMap<String, BytecodeRef>,
    pub files: HashMap<String, BytecodeRef>,
}

impl TestHost {
    pub fn statement(mut self, text: &str, bco: BytecodeRef) -> Self {
        self.statements.insert(text.to_string(), bco);
        self
    }

    pub fn file(mut self, name: &str, bco: BytecodeRef) -> Self {
        self.files.insert(name.to_string(), bco);
        self
    }
}

impl ScriptHost for TestHost {
    fn compile_statement(&mut self, text: &str, _origin: &str) -> Result<BytecodeRef, Error> {
        self.statements
            .get(text)
            .cloned()
            .ok_or_else(|| Error::user(format!("Syntax error in \"{}\"", text)))
    }

    fn open_script(&mut self, file_name: &str, _origin: &str) -> Result<Option<BytecodeRef>, Error> {
        Ok(self.files.get(file_name).cloned())
    }
}

/// Resource host remembering what it was asked to load
#[derive(Debug, Default)]
pub struct RecordingResources {
    pub loaded: Vec<String>,
}

impl ResourceHost for RecordingResources {
    fn load_resource(&mut self, file_name: &str) -> Result<(), Error> {
        self.loaded.push(format!("resource:{}", file_name));
        Ok(())
    }

    fn load_help_file(&mut self, file_name: &str) -> Result<(), Error> {
        self.loaded.push(format!("help:{}", file_name));
        Ok(())
    }
}

pub fn make_session(host: TestHost) -> (Session, Rc<RefCell<RecordingResources>>) {
    let resources = Rc::new(RefCell::new(RecordingResources::default()));
    let session = Session::new(WorldConfig::default(), Box::new(host), resources.clone());
    (session, resources)
}

/// Ship list with hulls 1, 2 and 17, two beams, one launcher, one engine
pub fn sample_ship_list() -> ShipList {
    let mut list = ShipList::new();

    let mut outrider = Hull::new(1, "Outrider");
    outrider.max_beams = 1;
    outrider.num_engines = 1;
    list.hulls_mut().insert(1, outrider);

    list.hulls_mut().insert(2, Hull::new(2, "Gemini"));

    let mut banshee = Hull::new(17, "Banshee");
    banshee.max_beams = 7;
    banshee.num_bays = 0;
    banshee.max_launchers = 2;
    banshee.internal_picture = 5;
    list.hulls_mut().insert(17, banshee);

    let mut laser = Beam::new(1, "Laser");
    laser.kill_power = 10;
    laser.damage_power = 3;
    list.beams_mut().insert(1, laser);
    list.beams_mut().insert(4, Beam::new(4, "Blaster"));

    let mut photon = TorpedoLauncher::new(1, "Mark 1 Photon");
    photon.component.mass = 2;
    photon.torpedo_cost.money = 1;
    list.launchers_mut().insert(1, photon);

    let mut drive = Engine::new(1, "StarDrive 1");
    drive.fuel_factors = [0, 100, 800, 2700, 6400, 12500, 21600, 34300, 51200, 72900];
    list.engines_mut().insert(1, drive);

    list.friendly_codes_mut().add(FriendlyCode::new("ATT", "Attack", "p"));
    list.friendly_codes_mut().add(FriendlyCode::new("mkt", "Make torpedoes", "s"));
    list
}

pub fn push_str(b: &mut BytecodeBuilder, text: &str) {
    b.add_push_literal(Some(Value::from(text))).unwrap();
}

pub fn push_int(b: &mut BytecodeBuilder, i: i32) {
    b.add_push_literal(Some(Value::Integer(i))).unwrap();
}

pub fn push_global(b: &mut BytecodeBuilder, name: &str) {
    b.add_named_instruction(Major::Push, Scope::NamedShared as u8, name).unwrap();
}

pub fn push_var(b: &mut BytecodeBuilder, name: &str) {
    b.add_named_instruction(Major::Push, Scope::NamedVariable as u8, name).unwrap();
}

pub fn special(b: &mut BytecodeBuilder, op: SpecialOp) {
    b.add_instruction(Major::Special, op as u8, 0);
}

/// `NAME(args)` with the arguments already pushed; leaves the result
pub fn call_function(b: &mut BytecodeBuilder, name: &str, argc: u16) {
    push_global(b, name);
    b.add_instruction(Major::Indirect, IndirectOp::Load as u8, argc);
}

/// Compile a program that prints `text`
pub fn print_program(text: &str) -> BytecodeRef {
    let mut b = BytecodeBuilder::new();
    push_str(&mut b, text);
    special(&mut b, SpecialOp::Print);
    Rc::new(b.relocate().unwrap())
}

pub fn relocate(b: BytecodeBuilder) -> BytecodeRef {
    Rc::new(b.relocate().unwrap())
}
