//! Game session: the world plus the game data scripts operate on

use crate::error::Result;
use crate::interface::{
    BeamFunction, ComponentContext, ComponentKind, DrawingFunction, EngineFunction, FriendlyCodeFunction, HullFunction,
    LauncherFunction, PluginFunction, TorpedoFunction,
};
use crate::interface::{beam::BeamKind, engine::EngineKind, hull::HullKind, torpedo::LauncherKind, torpedo::TorpedoKind};
use crate::map::DrawingContainer;
use crate::plugins::{
    create_file_loader, create_loader_for_unloaded_plugins, register_plugin_builtins, NullResourceHost, ResourceHost,
};
use crate::plugin::PluginManager;
use crate::spec::ShipList;
use quasar_interpreter::serialization::{
    unknown_tag, LoadContext, TagNode, TAG_BEAM, TAG_ENGINE, TAG_HULL, TAG_LAUNCHER, TAG_TORPEDO,
};
use quasar_interpreter::{
    register_lock_builtins, BytecodeList, BytecodeRef, Error, Process, ProcessState, ScriptHost, Value, World, WorldConfig,
};
use std::cell::RefCell;
use std::io::Read;
use std::rc::Rc;
use tracing::{info, warn};

/// Owns the world and the game data. Contexts handed to scripts refer to
/// the data through weak handles, so they read as null once the session is
/// gone.
pub struct Session {
    world: World,
    ship_list: Rc<RefCell<ShipList>>,
    drawings: Rc<RefCell<DrawingContainer>>,
    plugins: Rc<RefCell<PluginManager>>,
    bytecodes: BytecodeList,
}

impl Session {
    pub fn new(config: WorldConfig, host: Box<dyn ScriptHost>, resources: Rc<RefCell<dyn ResourceHost>>) -> Self {
        let mut session = Self {
            world: World::new(config, host),
            ship_list: Rc::new(RefCell::new(ShipList::new())),
            drawings: Rc::new(RefCell::new(DrawingContainer::new())),
            plugins: Rc::new(RefCell::new(PluginManager::new())),
            bytecodes: BytecodeList::new(),
        };
        session.register_builtins(resources);
        session
    }

    /// Session with default limits and no resource support
    pub fn with_host(host: Box<dyn ScriptHost>) -> Self {
        Self::new(WorldConfig::default(), host, Rc::new(RefCell::new(NullResourceHost)))
    }

    fn register_builtins(&mut self, resources: Rc<RefCell<dyn ResourceHost>>) {
        let world = &mut self.world;
        world.set_global("BEAM", Some(BeamFunction::new(&self.ship_list).into_value()));
        world.set_global("DRAWING", Some(DrawingFunction::new(&self.drawings).into_value()));
        world.set_global("ENGINE", Some(EngineFunction::new(&self.ship_list).into_value()));
        world.set_global("FCODE", Some(FriendlyCodeFunction::new(&self.ship_list).into_value()));
        world.set_global("HULL", Some(HullFunction::new(&self.ship_list).into_value()));
        world.set_global("LAUNCHER", Some(LauncherFunction::new(&self.ship_list).into_value()));
        world.set_global("PLUGIN", Some(PluginFunction::new(&self.plugins).into_value()));
        world.set_global("TORPEDO", Some(TorpedoFunction::new(&self.ship_list).into_value()));
        register_lock_builtins(world);
        register_plugin_builtins(world, resources);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn ship_list(&self) -> &Rc<RefCell<ShipList>> {
        &self.ship_list
    }

    pub fn drawings(&self) -> &Rc<RefCell<DrawingContainer>> {
        &self.drawings
    }

    pub fn plugins(&self) -> &Rc<RefCell<PluginManager>> {
        &self.plugins
    }

    /// Subroutines saved by reference; pass as the save context when storing values
    pub fn bytecodes_mut(&mut self) -> &mut BytecodeList {
        &mut self.bytecodes
    }

    /// Install new ship list data and notify listeners
    pub fn set_ship_list(&self, list: ShipList) {
        let signal = {
            let mut current = self.ship_list.borrow_mut();
            current.replace_definitions(list);
            current.sig_change().clone()
        };
        signal.raise();
    }

    /// Run `bco` in a new process until it stops
    pub fn run(&mut self, name: &str, bco: BytecodeRef) -> Result<Process> {
        let mut process = Process::new(&mut self.world, name);
        process.push_frame(bco, false)?;
        match process.run(&mut self.world) {
            ProcessState::Failed(e) => warn!(process = name, error = %e, "script failed"),
            state => info!(process = name, state = ?state, "script stopped"),
        }
        Ok(process)
    }

    /// Load all plugins that are not loaded yet
    pub fn load_plugins(&mut self) -> Result<Process> {
        let loader = create_loader_for_unloaded_plugins(&self.plugins)?;
        self.run("Plugin loader", loader)
    }

    /// Load a script file; failures are reported on the console unless `optional`
    pub fn load_file(&mut self, file_name: &str, optional: bool) -> Result<Process> {
        let loader = create_file_loader(file_name, "", optional)?;
        self.run(&format!("Load {}", file_name), loader)
    }
}

fn load_component<K: ComponentKind>(id: u32, list: &Rc<RefCell<ShipList>>) -> Option<Value> {
    let id = i32::try_from(id).ok()?;
    ComponentContext::<K>::create(id, list).map(|ctx| Value::Context(Box::new(ctx)))
}

impl LoadContext for Session {
    /// Components that no longer exist load as null
    fn load_context(&self, node: &TagNode, _aux: &mut dyn Read) -> std::result::Result<Option<Value>, Error> {
        let list = &self.ship_list;
        match node.tag {
            TAG_HULL => Ok(load_component::<HullKind>(node.value, list)),
            TAG_BEAM => Ok(load_component::<BeamKind>(node.value, list)),
            TAG_ENGINE => Ok(load_component::<EngineKind>(node.value, list)),
            TAG_TORPEDO => Ok(load_component::<TorpedoKind>(node.value, list)),
            TAG_LAUNCHER => Ok(load_component::<LauncherKind>(node.value, list)),
            _ => Err(unknown_tag(node)),
        }
    }

    fn load_bytecode(&self, id: u32) -> std::result::Result<Option<BytecodeRef>, Error> {
        Ok(self.bytecodes.get(id).cloned())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("world", &self.world)
            .field("plugins", &self.plugins.borrow().len())
            .field("bytecodes", &self.bytecodes.len())
            .finish()
    }
}
