//! Ship list specification data

pub mod component;
pub mod component_vector;
pub mod cost;
pub mod engine;
pub mod friendly_code;
pub mod hull;
pub mod ship_list;
pub mod weapons;

pub use component::Component;
pub use component_vector::ComponentVector;
pub use cost::Cost;
pub use engine::{Engine, MAX_WARP};
pub use friendly_code::{FriendlyCode, FriendlyCodeList};
pub use hull::Hull;
pub use ship_list::ShipList;
pub use weapons::{Beam, TorpedoLauncher};
