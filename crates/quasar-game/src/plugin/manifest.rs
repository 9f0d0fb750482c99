//! `.c2p` plugin manifest parsing
//!
//! A manifest is a list of `Key = Value` lines. Keys are case-insensitive;
//! lines starting with `#` or `;` are comments. Item keys (`ScriptFile`,
//! `ResourceFile`, `HelpFile`, `Exec`, `File`) may repeat and keep their
//! order.

use super::{Feature, ItemType, Plugin};
use crate::error::{GameError, Result};
use std::path::Path;
use tracing::{debug, warn};

fn add_features(target: &mut Vec<Feature>, value: &str) {
    target.extend(value.split(',').filter_map(Feature::parse));
}

/// Parse manifest text for the plugin `id`
pub fn parse_manifest(id: &str, text: &str, file_name: &str) -> Result<Plugin> {
    let mut plugin = Plugin::new(id);
    plugin.file_name = file_name.to_string();
    let mut description: Vec<&str> = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| GameError::Manifest {
            file: file_name.to_string(),
            line: number + 1,
            message: "expected \"key = value\"".to_string(),
        })?;
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "name" => plugin.name = value.to_string(),
            "description" => description.push(value),
            "version" => plugin.version = value.to_string(),
            "requires" => add_features(&mut plugin.requires, value),
            "provides" => add_features(&mut plugin.provides, value),
            "scriptfile" => plugin.add_item(ItemType::ScriptFile, value),
            "resourcefile" => plugin.add_item(ItemType::ResourceFile, value),
            "helpfile" => plugin.add_item(ItemType::HelpFile, value),
            "exec" => plugin.add_item(ItemType::Command, value),
            "file" => plugin.add_item(ItemType::PlainFile, value),
            other => warn!(file = file_name, line = number + 1, key = other, "unknown manifest key ignored"),
        }
    }
    plugin.description = description.join("\n");
    Ok(plugin)
}

/// Load a manifest file. The plugin id is the file's base name; items are
/// resolved relative to the file's directory.
pub fn load_manifest(path: &Path) -> Result<Plugin> {
    let text = std::fs::read_to_string(path).map_err(|e| GameError::io(path, e))?;
    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut plugin = parse_manifest(&id, &text, &path.display().to_string())?;
    plugin.base_directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
    debug!(plugin = plugin.id(), items = plugin.items.len(), "plugin manifest loaded");
    Ok(plugin)
}
