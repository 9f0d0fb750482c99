//! Friendly codes

use serde::{Deserialize, Serialize};

/// A special friendly code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendlyCode {
    pub code: String,
    pub description: String,
    /// Applicability flags, e.g. `sp` for ships and planets
    pub flags: String,
}

impl FriendlyCode {
    pub fn new(code: &str, description: &str, flags: &str) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            flags: flags.to_string(),
        }
    }
}

/// Friendly codes in definition order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FriendlyCodeList {
    codes: Vec<FriendlyCode>,
}

impl FriendlyCodeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a code; a later definition of the same code replaces the earlier one
    pub fn add(&mut self, code: FriendlyCode) {
        match self.codes.iter_mut().find(|c| c.code == code.code) {
            Some(existing) => *existing = code,
            None => self.codes.push(code),
        }
    }

    /// Exact, case-sensitive lookup by code
    pub fn find_index(&self, code: &str) -> Option<usize> {
        self.codes.iter().position(|c| c.code == code)
    }

    pub fn get(&self, index: usize) -> Option<&FriendlyCode> {
        self.codes.get(index)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FriendlyCode> {
        self.codes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_find() {
        let mut list = FriendlyCodeList::new();
        list.add(FriendlyCode::new("mkt", "Make torpedoes", "s"));
        list.add(FriendlyCode::new("ATT", "Attack", "p"));
        list.add(FriendlyCode::new("mkt", "Build torpedoes", "s"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.find_index("ATT"), Some(1));
        assert_eq!(list.find_index("att"), None);
        assert_eq!(list.get(0).unwrap().description, "Build torpedoes");
    }
}
