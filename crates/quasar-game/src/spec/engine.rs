//! Engines

use super::component::Component;
use serde::{Deserialize, Serialize};

/// Highest warp factor
pub const MAX_WARP: usize = 9;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Engine {
    #[serde(flatten)]
    pub component: Component,
    /// Fuel usage per warp factor, index 0 (standing still) to [`MAX_WARP`]
    pub fuel_factors: [i32; MAX_WARP + 1],
}

impl Engine {
    pub fn new(id: i32, name: &str) -> Self {
        Self {
            component: Component::new(id, name),
            ..Self::default()
        }
    }

    pub fn fuel_factor(&self, warp: usize) -> Option<i32> {
        self.fuel_factors.get(warp).copied()
    }

    /// Highest warp whose fuel factor stays within 120 × warp²; 0 if none
    pub fn max_efficient_warp(&self) -> i32 {
        (1..=MAX_WARP)
            .rev()
            .find(|&w| self.fuel_factors[w] <= 120 * (w * w) as i32)
            .map_or(0, |w| w as i32)
    }
}
