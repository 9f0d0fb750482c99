//! Torpedo and launcher contexts, `Torpedo()` and `Launcher()` functions
//!
//! Both views share the launcher collection. The torpedo view reports the
//! torpedo's own mass and cost; the launcher view reports the launcher's.
//! Names are shared, so renaming through either view renames both.

use super::beam::WeaponDomain;
use super::component_context::{ComponentContext, ComponentFunction, ComponentKind};
use super::component_property::{get_component_property, set_component_property, ComponentProperty};
use super::weapon_property::{get_weapon_property, WeaponProperty};
use crate::spec::ShipList;
use quasar_interpreter::names::{NameTable, TypeHint};
use quasar_interpreter::serialization::{TAG_LAUNCHER, TAG_TORPEDO};
use quasar_interpreter::{Error, Value};

use ComponentProperty as C;
use WeaponDomain::{Component as Cp, Weapon as Wp};
use WeaponProperty as W;

pub const TORPEDO_MAPPING: &[NameTable<WeaponDomain>] = &[
    NameTable::new("COST.D", Cp(C::CostD), TypeHint::Int),
    NameTable::new("COST.M", Cp(C::CostM), TypeHint::Int),
    NameTable::new("COST.MC", Cp(C::CostMC), TypeHint::Int),
    NameTable::new("COST.STR", Cp(C::CostStr), TypeHint::String),
    NameTable::new("COST.T", Cp(C::CostT), TypeHint::Int),
    NameTable::new("DAMAGE", Wp(W::DamagePower), TypeHint::Int),
    NameTable::new("ID", Cp(C::Id), TypeHint::Int),
    NameTable::new("KILL", Wp(W::KillPower), TypeHint::Int),
    NameTable::new("MASS", Cp(C::Mass), TypeHint::Int),
    NameTable::new("NAME", Cp(C::Name), TypeHint::String),
    NameTable::new("NAME.SHORT", Cp(C::ShortName), TypeHint::String),
    NameTable::new("TECH", Cp(C::Tech), TypeHint::Int),
    NameTable::new("TECH.TORPEDO", Cp(C::Tech), TypeHint::Int),
];

fn get_launcher_property(
    list: &ShipList,
    id: i32,
    domain: WeaponDomain,
    use_launcher: bool,
) -> Option<Value> {
    let launcher = list.launchers().get(id)?;
    match domain {
        Cp(p) if use_launcher => get_component_property(&launcher.component, p),
        Cp(p) => get_component_property(&launcher.torpedo_component(), p),
        Wp(p) => get_weapon_property(launcher, p),
    }
}

fn set_launcher_property(list: &mut ShipList, id: i32, domain: WeaponDomain, value: Option<&Value>) -> Result<bool, Error> {
    match (list.launchers_mut().get_mut(id), domain) {
        (_, Wp(_)) | (None, _) => Err(Error::NotAssignable),
        (Some(launcher), Cp(p)) => set_component_property(&mut launcher.component, p, value),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TorpedoKind;

impl ComponentKind for TorpedoKind {
    type Domain = WeaponDomain;
    const NAME: &'static str = "Torpedo";
    const TAG: u16 = TAG_TORPEDO;
    const TABLE: &'static [NameTable<WeaponDomain>] = TORPEDO_MAPPING;

    fn size(list: &ShipList) -> i32 {
        list.launchers().size()
    }

    fn find_next(list: &ShipList, id: i32) -> Option<i32> {
        list.launchers().find_next(id)
    }

    fn get_property(list: &ShipList, id: i32, domain: WeaponDomain) -> Option<Value> {
        get_launcher_property(list, id, domain, false)
    }

    fn set_property(list: &mut ShipList, id: i32, domain: WeaponDomain, value: Option<&Value>) -> Result<bool, Error> {
        set_launcher_property(list, id, domain, value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LauncherKind;

impl ComponentKind for LauncherKind {
    type Domain = WeaponDomain;
    const NAME: &'static str = "Launcher";
    const TAG: u16 = TAG_LAUNCHER;
    const TABLE: &'static [NameTable<WeaponDomain>] = TORPEDO_MAPPING;

    fn size(list: &ShipList) -> i32 {
        list.launchers().size()
    }

    fn find_next(list: &ShipList, id: i32) -> Option<i32> {
        list.launchers().find_next(id)
    }

    fn get_property(list: &ShipList, id: i32, domain: WeaponDomain) -> Option<Value> {
        get_launcher_property(list, id, domain, true)
    }

    fn set_property(list: &mut ShipList, id: i32, domain: WeaponDomain, value: Option<&Value>) -> Result<bool, Error> {
        set_launcher_property(list, id, domain, value)
    }
}

pub type TorpedoContext = ComponentContext<TorpedoKind>;
pub type TorpedoFunction = ComponentFunction<TorpedoKind>;
pub type LauncherContext = ComponentContext<LauncherKind>;
pub type LauncherFunction = ComponentFunction<LauncherKind>;
