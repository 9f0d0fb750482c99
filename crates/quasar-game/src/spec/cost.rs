//! Build cost of a component

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cost {
    pub tritanium: i32,
    pub duranium: i32,
    pub molybdenum: i32,
    pub money: i32,
    pub supplies: i32,
}

impl Cost {
    pub fn new(tritanium: i32, duranium: i32, molybdenum: i32, money: i32) -> Self {
        Self {
            tritanium,
            duranium,
            molybdenum,
            money,
            supplies: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Cost::default()
    }

    /// Compact form such as `T10 D5 $100`; zero amounts are omitted
    pub fn to_cost_string(&self) -> String {
        let parts = [
            ("T", self.tritanium),
            ("D", self.duranium),
            ("M", self.molybdenum),
            ("$", self.money),
            ("S", self.supplies),
        ];
        parts
            .iter()
            .filter(|(_, amount)| *amount != 0)
            .map(|(unit, amount)| format!("{}{}", unit, amount))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_string() {
        assert_eq!(Cost::new(10, 5, 0, 100).to_cost_string(), "T10 D5 $100");
        assert_eq!(Cost::default().to_cost_string(), "");
        let with_supplies = Cost {
            supplies: 3,
            ..Cost::default()
        };
        assert_eq!(with_supplies.to_cost_string(), "S3");
    }
}
