//! Static name tables for property lookup
//!
//! Each entity kind declares one table mapping upper-case property names to
//! a domain tag. The domain tag is a per-kind enum whose variants carry the
//! typed property, so a property is only ever interpreted within its own
//! domain. Tables are small; lookup is a linear scan that keeps declaration
//! order for enumeration.

use std::collections::HashSet;

/// Position of an entry within its table
pub type PropertyIndex = usize;

/// Type hint presented to introspection tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHint {
    None,
    Bool,
    Int,
    Float,
    String,
    Procedure,
    Function,
    Array,
}

impl TypeHint {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeHint::None => "any",
            TypeHint::Bool => "bool",
            TypeHint::Int => "int",
            TypeHint::Float => "float",
            TypeHint::String => "string",
            TypeHint::Procedure => "procedure",
            TypeHint::Function => "function",
            TypeHint::Array => "array",
        }
    }
}

/// One name table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameTable<D> {
    pub name: &'static str,
    pub domain: D,
    pub type_hint: TypeHint,
}

impl<D> NameTable<D> {
    pub const fn new(name: &'static str, domain: D, type_hint: TypeHint) -> Self {
        Self {
            name,
            domain,
            type_hint,
        }
    }
}

/// Receives property names during enumeration
pub trait PropertyAcceptor {
    fn add_property(&mut self, name: &str, type_hint: TypeHint);
}

impl PropertyAcceptor for Vec<(String, TypeHint)> {
    fn add_property(&mut self, name: &str, type_hint: TypeHint) {
        self.push((name.to_string(), type_hint));
    }
}

/// Exact, case-sensitive lookup
pub fn lookup_name<D>(name: &str, table: &[NameTable<D>]) -> Option<PropertyIndex> {
    table.iter().position(|entry| entry.name == name)
}

/// Present every entry in table order
pub fn enum_table<D>(table: &[NameTable<D>], acceptor: &mut dyn PropertyAcceptor) {
    for entry in table {
        acceptor.add_property(entry.name, entry.type_hint);
    }
}

/// Check that names are unique and canonical (upper case)
pub fn validate_table<D>(table: &[NameTable<D>]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for entry in table {
        if entry.name != entry.name.to_uppercase() {
            return Err(format!("name \"{}\" is not upper case", entry.name));
        }
        if !seen.insert(entry.name) {
            return Err(format!("name \"{}\" is declared twice", entry.name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Domain {
        First(u8),
        Second(u8),
    }

    const TABLE: &[NameTable<Domain>] = &[
        NameTable::new("ALPHA", Domain::First(0), TypeHint::Int),
        NameTable::new("BETA", Domain::Second(0), TypeHint::String),
        NameTable::new("GAMMA", Domain::First(1), TypeHint::Int),
    ];

    #[test]
    fn test_lookup_round_trip() {
        for (i, entry) in TABLE.iter().enumerate() {
            assert_eq!(lookup_name(entry.name, TABLE), Some(i));
            assert_eq!(lookup_name(&entry.name.to_lowercase(), TABLE), None);
        }
        assert_eq!(lookup_name("DELTA", TABLE), None);
        assert_eq!(TABLE[1].domain, Domain::Second(0));
    }

    #[test]
    fn test_enumeration_order() {
        let mut names: Vec<(String, TypeHint)> = Vec::new();
        enum_table(TABLE, &mut names);
        let plain: Vec<&str> = names.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(plain, vec!["ALPHA", "BETA", "GAMMA"]);
        assert_eq!(names[1].1, TypeHint::String);
    }

    #[test]
    fn test_validation() {
        assert!(validate_table(TABLE).is_ok());
        let dup = [
            NameTable::new("A", 1, TypeHint::Int),
            NameTable::new("A", 2, TypeHint::Int),
        ];
        assert!(validate_table(&dup).is_err());
        let lower = [NameTable::new("a", 1, TypeHint::Int)];
        assert!(validate_table(&lower).is_err());
    }
}
