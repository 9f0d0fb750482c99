//! Plugin registry and load order

use super::{load_manifest, Plugin};
use crate::error::{GameError, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// All known plugins, in registration order
#[derive(Debug, Default)]
pub struct PluginManager {
    plugins: Vec<Plugin>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin, replacing one with the same id
    pub fn add_plugin(&mut self, plugin: Plugin) {
        match self.plugins.iter_mut().find(|p| p.id() == plugin.id()) {
            Some(existing) => *existing = plugin,
            None => self.plugins.push(plugin),
        }
    }

    /// Find by id, case-insensitively
    pub fn find(&self, id: &str) -> Option<&Plugin> {
        let id = id.to_uppercase();
        self.plugins.iter().find(|p| p.id() == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Plugin> {
        let id = id.to_uppercase();
        self.plugins.iter_mut().find(|p| p.id() == id)
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Plugins ordered so that each comes after the plugins providing what it
    /// requires.
    ///
    /// Requirements no registered plugin provides are assumed to be met by
    /// the host. Plugins whose requirements cannot be ordered (cycles) are
    /// appended in registration order.
    pub fn enum_plugins_ordered(&self) -> Vec<&Plugin> {
        let satisfiable = |feature: &str| self.plugins.iter().any(|p| p.provides_feature(feature));
        let mut done = vec![false; self.plugins.len()];
        let mut provided: HashSet<&str> = HashSet::new();
        let mut result = Vec::with_capacity(self.plugins.len());

        loop {
            let ready = self.plugins.iter().enumerate().find(|(index, plugin)| {
                !done[*index]
                    && plugin
                        .requires
                        .iter()
                        .all(|r| provided.contains(r.name.as_str()) || !satisfiable(&r.name))
            });
            let (index, plugin) = match ready {
                Some(found) => found,
                None => break,
            };
            done[index] = true;
            provided.insert(plugin.id());
            provided.extend(plugin.provides.iter().map(|p| p.name.as_str()));
            result.push(plugin);
        }

        for (index, plugin) in self.plugins.iter().enumerate() {
            if !done[index] {
                warn!(plugin = plugin.id(), "plugin dependencies cannot be ordered");
                result.push(plugin);
            }
        }
        result
    }

    /// Load all `*.c2p` manifests of a directory, in file name order.
    /// Unreadable manifests are skipped. Returns the number of plugins added.
    pub fn scan_directory(&mut self, dir: &Path) -> Result<usize> {
        let entries = std::fs::read_dir(dir).map_err(|e| GameError::io(dir, e))?;
        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .map_or(false, |ext| ext.to_string_lossy().eq_ignore_ascii_case("c2p"))
            })
            .collect();
        paths.sort();

        let mut count = 0;
        for path in paths {
            match load_manifest(&path) {
                Ok(plugin) => {
                    debug!(plugin = plugin.id(), path = %path.display(), "plugin found");
                    self.add_plugin(plugin);
                    count += 1;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "plugin manifest skipped"),
            }
        }
        info!(dir = %dir.display(), count, "plugin directory scanned");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::Feature;

    fn plugin(id: &str, requires: &[&str], provides: &[&str]) -> Plugin {
        let mut p = Plugin::new(id);
        p.requires = requires.iter().map(|r| Feature::new(r, "")).collect();
        p.provides = provides.iter().map(|r| Feature::new(r, "")).collect();
        p
    }

    fn ids(manager: &PluginManager) -> Vec<&str> {
        manager.enum_plugins_ordered().iter().map(|p| p.id()).collect()
    }

    #[test]
    fn test_providers_first() {
        let mut m = PluginManager::new();
        m.add_plugin(plugin("app", &["lib", "pcc"], &[]));
        m.add_plugin(plugin("lib", &["core"], &[]));
        m.add_plugin(plugin("base", &[], &["core"]));
        assert_eq!(ids(&m), vec!["BASE", "LIB", "APP"]);
    }

    #[test]
    fn test_cycles_are_appended() {
        let mut m = PluginManager::new();
        m.add_plugin(plugin("a", &["b"], &[]));
        m.add_plugin(plugin("b", &["a"], &[]));
        m.add_plugin(plugin("c", &[], &[]));
        assert_eq!(ids(&m), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_replace_and_find() {
        let mut m = PluginManager::new();
        m.add_plugin(plugin("a", &[], &[]));
        let mut replacement = plugin("A", &[], &[]);
        replacement.name = "Second".to_string();
        m.add_plugin(replacement);
        assert_eq!(m.len(), 1);
        assert_eq!(m.find("a").unwrap().name, "Second");
        assert!(m.find("b").is_none());
    }

    #[test]
    fn test_scan_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("beta.c2p"), "Name = Beta\n").unwrap();
        std::fs::write(dir.path().join("alpha.C2P"), "Name = Alpha\n").unwrap();
        std::fs::write(dir.path().join("broken.c2p"), "no equals sign\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "Name = Nope\n").unwrap();

        let mut m = PluginManager::new();
        assert_eq!(m.scan_directory(dir.path()).unwrap(), 2);
        let names: Vec<&str> = m.plugins().iter().map(|p| p.id()).collect();
        assert_eq!(names, vec!["ALPHA", "BETA"]);
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = PluginManager::new();
        assert!(matches!(m.scan_directory(&dir.path().join("missing")), Err(GameError::Io { .. })));
    }
}
