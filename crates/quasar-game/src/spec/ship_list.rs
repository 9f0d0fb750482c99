//! Ship list: all component definitions of a game

use super::component_vector::ComponentVector;
use super::engine::Engine;
use super::friendly_code::{FriendlyCode, FriendlyCodeList};
use super::hull::Hull;
use super::weapons::{Beam, TorpedoLauncher};
use crate::error::{GameError, Result};
use crate::signal::ChangeSignal;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Default)]
pub struct ShipList {
    hulls: ComponentVector<Hull>,
    beams: ComponentVector<Beam>,
    launchers: ComponentVector<TorpedoLauncher>,
    engines: ComponentVector<Engine>,
    friendly_codes: FriendlyCodeList,
    sig_change: ChangeSignal,
}

/// JSON document layout
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ShipListData {
    hulls: Vec<Hull>,
    beams: Vec<Beam>,
    launchers: Vec<TorpedoLauncher>,
    engines: Vec<Engine>,
    friendly_codes: Vec<FriendlyCode>,
}

fn place<T>(target: &mut ComponentVector<T>, kind: &'static str, id: i32, item: T) -> Result<()> {
    if target.get(id).is_some() {
        return Err(GameError::DuplicateId { kind, id });
    }
    if !target.insert(id, item) {
        return Err(GameError::InvalidId { kind, id });
    }
    Ok(())
}

impl ShipList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a ship list from JSON
    pub fn from_json(text: &str) -> Result<Self> {
        let data: ShipListData = serde_json::from_str(text)?;
        let mut list = ShipList::new();
        for hull in data.hulls {
            place(&mut list.hulls, "hull", hull.id(), hull)?;
        }
        for beam in data.beams {
            place(&mut list.beams, "beam", beam.component.id, beam)?;
        }
        for launcher in data.launchers {
            place(&mut list.launchers, "launcher", launcher.component.id, launcher)?;
        }
        for engine in data.engines {
            place(&mut list.engines, "engine", engine.component.id, engine)?;
        }
        for code in data.friendly_codes {
            list.friendly_codes.add(code);
        }
        Ok(list)
    }

    /// Read a JSON ship list file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GameError::io(path, e))?;
        let list = Self::from_json(&text)?;
        info!(
            path = %path.display(),
            hulls = list.hulls.count(),
            beams = list.beams.count(),
            launchers = list.launchers.count(),
            engines = list.engines.count(),
            "ship list loaded"
        );
        Ok(list)
    }

    /// Replace all definitions by those of `other`, keeping the listeners of
    /// this list. The caller raises [`ShipList::sig_change`] afterwards.
    pub fn replace_definitions(&mut self, other: ShipList) {
        let sig_change = std::mem::take(&mut self.sig_change);
        *self = ShipList { sig_change, ..other };
    }

    pub fn hulls(&self) -> &ComponentVector<Hull> {
        &self.hulls
    }

    pub fn hulls_mut(&mut self) -> &mut ComponentVector<Hull> {
        &mut self.hulls
    }

    pub fn beams(&self) -> &ComponentVector<Beam> {
        &self.beams
    }

    pub fn beams_mut(&mut self) -> &mut ComponentVector<Beam> {
        &mut self.beams
    }

    pub fn launchers(&self) -> &ComponentVector<TorpedoLauncher> {
        &self.launchers
    }

    pub fn launchers_mut(&mut self) -> &mut ComponentVector<TorpedoLauncher> {
        &mut self.launchers
    }

    pub fn engines(&self) -> &ComponentVector<Engine> {
        &self.engines
    }

    pub fn engines_mut(&mut self) -> &mut ComponentVector<Engine> {
        &mut self.engines
    }

    pub fn friendly_codes(&self) -> &FriendlyCodeList {
        &self.friendly_codes
    }

    pub fn friendly_codes_mut(&mut self) -> &mut FriendlyCodeList {
        &mut self.friendly_codes
    }

    /// Raised after a script modifies a component
    pub fn sig_change(&self) -> &ChangeSignal {
        &self.sig_change
    }
}
