//! Quasar game layer
//!
//! Connects the script interpreter to game data. Ship list components,
//! friendly codes, map drawings and plugins are exposed to scripts as
//! contexts with static property tables, and plugins are loaded through
//! generated bytecode.
//!
//! # Modules
//!
//! - `spec`: ship list specification data
//! - `map`: starchart drawings
//! - `interface`: property tables, contexts and accessor functions
//! - `plugin`: plugin manifests and the plugin manager
//! - `plugins`: plugin and file loader generation, loader builtins
//! - `session`: the world plus game data
//! - `signal`: change notification
//! - `error`: error types

pub mod error;
pub mod interface;
pub mod map;
pub mod plugin;
pub mod plugins;
pub mod session;
pub mod signal;
pub mod spec;

pub use error::{GameError, Result};
pub use plugin::{ItemType, Plugin, PluginItem, PluginManager};
pub use plugins::{
    create_file_loader, create_loader_for_unloaded_plugins, create_plugin_loader, NullResourceHost, ResourceHost,
};
pub use session::Session;
pub use signal::ChangeSignal;
pub use spec::ShipList;
