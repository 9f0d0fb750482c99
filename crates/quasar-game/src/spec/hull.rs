//! Starship hulls

use super::component::Component;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hull {
    #[serde(flatten)]
    pub component: Component,
    pub max_fuel: i32,
    pub max_crew: i32,
    pub num_engines: i32,
    pub max_cargo: i32,
    pub num_bays: i32,
    pub max_launchers: i32,
    pub max_beams: i32,
    /// Picture number
    pub internal_picture: i32,
    /// Resource identifier of the picture; derived from the picture number if empty
    pub image_name: String,
    /// Special abilities, human-readable
    pub special: String,
}

impl Hull {
    pub fn new(id: i32, name: &str) -> Self {
        Self {
            component: Component::new(id, name),
            ..Self::default()
        }
    }

    pub fn id(&self) -> i32 {
        self.component.id
    }

    /// Resource identifier of the hull picture
    pub fn image_resource(&self) -> String {
        if self.image_name.is_empty() {
            format!("ship.{}.{}", self.internal_picture, self.id())
        } else {
            self.image_name.clone()
        }
    }
}
