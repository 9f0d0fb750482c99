//! Properties of beams and torpedoes

use quasar_interpreter::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponProperty {
    KillPower,
    DamagePower,
}

/// Weapon data common to beams and torpedo launchers
pub trait Weapon {
    fn kill_power(&self) -> i32;
    fn damage_power(&self) -> i32;
}

impl Weapon for crate::spec::Beam {
    fn kill_power(&self) -> i32 {
        self.kill_power
    }

    fn damage_power(&self) -> i32 {
        self.damage_power
    }
}

impl Weapon for crate::spec::TorpedoLauncher {
    fn kill_power(&self) -> i32 {
        self.kill_power
    }

    fn damage_power(&self) -> i32 {
        self.damage_power
    }
}

pub fn get_weapon_property(weapon: &dyn Weapon, property: WeaponProperty) -> Option<Value> {
    Some(Value::Integer(match property {
        WeaponProperty::KillPower => weapon.kill_power(),
        WeaponProperty::DamagePower => weapon.damage_power(),
    }))
}
