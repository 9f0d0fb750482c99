//! Script interface of game objects
//!
//! Each entity kind has a static name table, a pair of property dispatch
//! functions, a context (cursor) type and an accessor function that scripts
//! call by name, such as `Hull(17)`.

pub mod beam;
pub mod component_context;
pub mod component_property;
pub mod drawing;
pub mod engine;
pub mod engine_property;
pub mod friendly_code;
pub mod hull;
pub mod hull_property;
pub mod plugin_context;
pub mod torpedo;
pub mod weapon_property;

pub use beam::{BeamContext, BeamFunction, BEAM_MAPPING};
pub use component_context::{ComponentContext, ComponentFunction, ComponentKind};
pub use drawing::{DrawingContext, DrawingFunction, DRAWING_MAPPING};
pub use engine::{EngineContext, EngineFunction, ENGINE_MAPPING};
pub use engine_property::FuelFactorArray;
pub use friendly_code::{FriendlyCodeContext, FriendlyCodeFunction, FCODE_MAPPING};
pub use hull::{HullContext, HullFunction, HULL_MAPPING};
pub use plugin_context::{PluginContext, PluginFunction, PLUGIN_MAPPING};
pub use torpedo::{LauncherContext, LauncherFunction, TorpedoContext, TorpedoFunction, TORPEDO_MAPPING};

use quasar_interpreter::names::{enum_table, TypeHint};

/// Entity kinds with a property table, by script name
pub const KINDS: &[&str] = &["BEAM", "DRAWING", "ENGINE", "FCODE", "HULL", "LAUNCHER", "PLUGIN", "TORPEDO"];

/// Properties of an entity kind in table order; `None` for an unknown kind
pub fn property_names(kind: &str) -> Option<Vec<(String, TypeHint)>> {
    let mut names: Vec<(String, TypeHint)> = Vec::new();
    match kind.to_uppercase().as_str() {
        "BEAM" => enum_table(BEAM_MAPPING, &mut names),
        "DRAWING" => enum_table(DRAWING_MAPPING, &mut names),
        "ENGINE" => enum_table(ENGINE_MAPPING, &mut names),
        "FCODE" => enum_table(FCODE_MAPPING, &mut names),
        "HULL" => enum_table(HULL_MAPPING, &mut names),
        "LAUNCHER" | "TORPEDO" => enum_table(TORPEDO_MAPPING, &mut names),
        "PLUGIN" => enum_table(PLUGIN_MAPPING, &mut names),
        _ => return None,
    }
    Some(names)
}
