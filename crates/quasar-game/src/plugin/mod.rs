//! Plugins: declarative bundles of scripts, resources and help files

use std::fmt;
use std::path::{Path, PathBuf};

pub mod manager;
pub mod manifest;

pub use manager::PluginManager;
pub use manifest::{load_manifest, parse_manifest};

/// What a plugin item does when the plugin is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    /// Shipped with the plugin, not loaded
    PlainFile,
    /// Script file, executed
    ScriptFile,
    /// Resource file, added to the resource provider
    ResourceFile,
    /// Help file, added to the help index
    HelpFile,
    /// Script command, executed
    Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginItem {
    pub item_type: ItemType,
    /// File name relative to the plugin directory, or the command text
    pub name: String,
}

impl PluginItem {
    pub fn new(item_type: ItemType, name: impl Into<String>) -> Self {
        Self {
            item_type,
            name: name.into(),
        }
    }
}

/// A feature required or provided by a plugin, `NAME [VERSION]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Upper case
    pub name: String,
    pub version: String,
}

impl Feature {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_uppercase(),
            version: version.to_string(),
        }
    }

    /// Parse `NAME [VERSION]`; `None` for an empty text
    pub fn parse(text: &str) -> Option<Self> {
        let mut words = text.split_whitespace();
        let name = words.next()?;
        let version = words.collect::<Vec<_>>().join(" ");
        Some(Self::new(name, &version))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} {}", self.name, self.version)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugin {
    id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    /// Directory relative to which item names are resolved
    pub base_directory: PathBuf,
    /// Manifest file, for diagnostics
    pub file_name: String,
    pub items: Vec<PluginItem>,
    pub requires: Vec<Feature>,
    pub provides: Vec<Feature>,
    loaded: bool,
}

impl Plugin {
    /// Create an empty plugin. Ids are upper case.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_uppercase(),
            name: id.to_string(),
            description: String::new(),
            version: String::new(),
            base_directory: PathBuf::new(),
            file_name: String::new(),
            items: Vec::new(),
            requires: Vec::new(),
            provides: Vec::new(),
            loaded: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn add_item(&mut self, item_type: ItemType, name: impl Into<String>) {
        self.items.push(PluginItem::new(item_type, name));
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    /// Whether this plugin satisfies a requirement for `feature`
    pub fn provides_feature(&self, feature: &str) -> bool {
        self.id == feature || self.provides.iter().any(|p| p.name == feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_parse() {
        assert_eq!(Feature::parse("  pcc 2.0.5 "), Some(Feature::new("PCC", "2.0.5")));
        assert_eq!(Feature::parse("Base"), Some(Feature::new("BASE", "")));
        assert_eq!(Feature::parse("   "), None);
        assert_eq!(Feature::new("pcc", "2.0").to_string(), "PCC 2.0");
    }

    #[test]
    fn test_provides() {
        let mut p = Plugin::new("tools");
        p.provides.push(Feature::new("Helpers", "1"));
        assert_eq!(p.id(), "TOOLS");
        assert!(p.provides_feature("TOOLS"));
        assert!(p.provides_feature("HELPERS"));
        assert!(!p.provides_feature("OTHER"));
    }
}
