//! Beam context and `Beam()` function

use super::component_context::{ComponentContext, ComponentFunction, ComponentKind};
use super::component_property::{get_component_property, set_component_property, ComponentProperty};
use super::weapon_property::{get_weapon_property, WeaponProperty};
use crate::spec::ShipList;
use quasar_interpreter::names::{NameTable, TypeHint};
use quasar_interpreter::serialization::TAG_BEAM;
use quasar_interpreter::{Error, Value};

/// Domain tag shared by beam and torpedo tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponDomain {
    Component(ComponentProperty),
    Weapon(WeaponProperty),
}

use ComponentProperty as C;
use WeaponDomain::{Component as Cp, Weapon as Wp};
use WeaponProperty as W;

pub const BEAM_MAPPING: &[NameTable<WeaponDomain>] = &[
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
    NameTable::new("TECH.BEAM", Cp(C::Tech), TypeHint::Int),
];

#[derive(Debug, Clone, Copy)]
pub struct BeamKind;

impl ComponentKind for BeamKind {
    type Domain = WeaponDomain;
    const NAME: &'static str = "Beam";
    const TAG: u16 = TAG_BEAM;
    const TABLE: &'static [NameTable<WeaponDomain>] = BEAM_MAPPING;

    fn size(list: &ShipList) -> i32 {
        list.beams().size()
    }

    fn find_next(list: &ShipList, id: i32) -> Option<i32> {
        list.beams().find_next(id)
    }

    fn get_property(list: &ShipList, id: i32, domain: WeaponDomain) -> Option<Value> {
        let beam = list.beams().get(id)?;
        match domain {
            Cp(p) => get_component_property(&beam.component, p),
            Wp(p) => get_weapon_property(beam, p),
        }
    }

    fn set_property(list: &mut ShipList, id: i32, domain: WeaponDomain, value: Option<&Value>) -> Result<bool, Error> {
        match (list.beams_mut().get_mut(id), domain) {
            (_, Wp(_)) | (None, _) => Err(Error::NotAssignable),
            (Some(beam), Cp(p)) => set_component_property(&mut beam.component, p, value),
        }
    }
}

pub type BeamContext = ComponentContext<BeamKind>;
pub type BeamFunction = ComponentFunction<BeamKind>;
