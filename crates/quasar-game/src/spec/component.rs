//! Data shared by all ship components

use super::cost::Cost;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Component {
    pub id: i32,
    pub name: String,
    /// Abbreviated name; falls back to `name` when empty
    pub short_name: String,
    pub mass: i32,
    pub tech_level: i32,
    pub cost: Cost,
}

impl Component {
    pub fn new(id: i32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn effective_short_name(&self) -> &str {
        if self.short_name.is_empty() {
            &self.name
        } else {
            &self.short_name
        }
    }
}
