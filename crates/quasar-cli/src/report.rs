//! Text output of the inspection commands

use quasar_game::{Plugin, ResourceHost, ShipList};
use quasar_interpreter::{Error, TypeHint};
use std::fmt::Write;

/// One `NAME  type` line per property
pub fn property_list(names: &[(String, TypeHint)]) -> String {
    let width = names.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, hint) in names {
        let _ = writeln!(out, "{:<width$}  {}", name, hint.as_str(), width = width);
    }
    out
}

pub fn plugin_summary(plugin: &Plugin) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Plugin {} ({})", plugin.id(), plugin.name);
    if !plugin.version.is_empty() {
        let _ = writeln!(out, "Version:   {}", plugin.version);
    }
    let _ = writeln!(out, "Directory: {}", plugin.base_directory().display());
    for line in plugin.description.lines() {
        let _ = writeln!(out, "  {}", line);
    }
    for feature in &plugin.requires {
        let _ = writeln!(out, "Requires:  {}", feature);
    }
    for feature in &plugin.provides {
        let _ = writeln!(out, "Provides:  {}", feature);
    }
    for item in &plugin.items {
        let _ = writeln!(out, "  {:<14} {}", format!("{:?}", item.item_type), item.name);
    }
    out
}

pub fn ship_list_summary(list: &ShipList) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Hulls:          {}", list.hulls().count());
    for (id, hull) in list.hulls().iter() {
        let _ = writeln!(
            out,
            "  {:3}  {:<30} beams {:2}  launchers {:2}  bays {:2}",
            id, hull.component.name, hull.max_beams, hull.max_launchers, hull.num_bays
        );
    }
    let _ = writeln!(out, "Beams:          {}", list.beams().count());
    let _ = writeln!(out, "Launchers:      {}", list.launchers().count());
    let _ = writeln!(out, "Engines:        {}", list.engines().count());
    let _ = writeln!(out, "Friendly codes: {}", list.friendly_codes().len());
    out
}

/// Resource host that only records the requested files
#[derive(Debug, Default)]
pub struct ListingResources {
    pub loaded: Vec<String>,
}

impl ResourceHost for ListingResources {
    fn load_resource(&mut self, file_name: &str) -> Result<(), Error> {
        self.loaded.push(format!("resource {}", file_name));
        Ok(())
    }

    fn load_help_file(&mut self, file_name: &str) -> Result<(), Error> {
        self.loaded.push(format!("help     {}", file_name));
        Ok(())
    }
}
