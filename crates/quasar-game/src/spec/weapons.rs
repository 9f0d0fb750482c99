//! Beam weapons and torpedo launchers

use super::component::Component;
use super::cost::Cost;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Beam {
    #[serde(flatten)]
    pub component: Component,
    pub kill_power: i32,
    pub damage_power: i32,
}

impl Beam {
    pub fn new(id: i32, name: &str) -> Self {
        Self {
            component: Component::new(id, name),
            ..Self::default()
        }
    }
}

/// A torpedo launcher and the torpedo it fires
///
/// The launcher's [`Component`] describes the launcher itself. The torpedo
/// is described by [`TorpedoLauncher::torpedo_component`], which shares the
/// launcher's id, name and tech level, costs `torpedo_cost` and weighs 1 kt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorpedoLauncher {
    #[serde(flatten)]
    pub component: Component,
    pub kill_power: i32,
    pub damage_power: i32,
    pub torpedo_cost: Cost,
}

impl TorpedoLauncher {
    pub fn new(id: i32, name: &str) -> Self {
        Self {
            component: Component::new(id, name),
            ..Self::default()
        }
    }

    pub fn torpedo_component(&self) -> Component {
        Component {
            mass: 1,
            cost: self.torpedo_cost,
            ..self.component.clone()
        }
    }
}
