//! Hull context and `Hull()` function

use super::component_context::{ComponentContext, ComponentFunction, ComponentKind};
use super::component_property::{get_component_property, set_component_property, ComponentProperty};
use super::hull_property::{get_hull_property, is_assignable_hull_property, set_hull_property, HullProperty};
use crate::spec::ShipList;
use quasar_interpreter::names::{NameTable, TypeHint};
use quasar_interpreter::serialization::TAG_HULL;
use quasar_interpreter::{Error, Value};

/// Hull names dispatch into the component or the hull domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HullDomain {
    Component(ComponentProperty),
    Hull(HullProperty),
}

use ComponentProperty as C;
use HullDomain::{Component as Cp, Hull as Hp};
use HullProperty as H;

pub const HULL_MAPPING: &[NameTable<HullDomain>] = &[
    NameTable::new("BEAM.MAX", Hp(H::MaxBeams), TypeHint::Int),
    NameTable::new("CARGO.MAX", Hp(H::MaxCargo), TypeHint::Int),
    NameTable::new("COST.D", Cp(C::CostD), TypeHint::Int),
    NameTable::new("COST.M", Cp(C::CostM), TypeHint::Int),
    NameTable::new("COST.MC", Cp(C::CostMC), TypeHint::Int),
    NameTable::new("COST.STR", Cp(C::CostStr), TypeHint::String),
    NameTable::new("COST.T", Cp(C::CostT), TypeHint::Int),
    NameTable::new("CREW.NORMAL", Hp(H::MaxCrew), TypeHint::Int),
    NameTable::new("ENGINE.COUNT", Hp(H::NumEngines), TypeHint::Int),
    NameTable::new("FIGHTER.BAYS", Hp(H::NumBays), TypeHint::Int),
    NameTable::new("FUEL.MAX", Hp(H::MaxFuel), TypeHint::Int),
    NameTable::new("ID", Cp(C::Id), TypeHint::Int),
    NameTable::new("IMAGE", Hp(H::Image), TypeHint::Int),
    NameTable::new("IMAGE$", Hp(H::Image2), TypeHint::String),
    NameTable::new("MASS", Cp(C::Mass), TypeHint::Int),
    NameTable::new("NAME", Cp(C::Name), TypeHint::String),
    NameTable::new("NAME.SHORT", Cp(C::ShortName), TypeHint::String),
    NameTable::new("SPECIAL", Hp(H::Special), TypeHint::String),
    NameTable::new("TECH", Cp(C::Tech), TypeHint::Int),
    NameTable::new("TECH.HULL", Cp(C::Tech), TypeHint::Int),
    NameTable::new("TORP.LMAX", Hp(H::MaxLaunchers), TypeHint::Int),
];

#[derive(Debug, Clone, Copy)]
pub struct HullKind;

impl ComponentKind for HullKind {
    type Domain = HullDomain;
    const NAME: &'static str = "Hull";
    const TAG: u16 = TAG_HULL;
    const TABLE: &'static [NameTable<HullDomain>] = HULL_MAPPING;

    fn size(list: &ShipList) -> i32 {
        list.hulls().size()
    }

    fn find_next(list: &ShipList, id: i32) -> Option<i32> {
        list.hulls().find_next(id)
    }

    fn get_property(list: &ShipList, id: i32, domain: HullDomain) -> Option<Value> {
        let hull = list.hulls().get(id)?;
        match domain {
            Cp(p) => get_component_property(&hull.component, p),
            Hp(p) => get_hull_property(hull, p),
        }
    }

    fn set_property(list: &mut ShipList, id: i32, domain: HullDomain, value: Option<&Value>) -> Result<bool, Error> {
        if let Hp(p) = domain {
            if !is_assignable_hull_property(p) {
                return Err(Error::NotAssignable);
            }
        }
        let hull = list.hulls_mut().get_mut(id).ok_or(Error::NotAssignable)?;
        match domain {
            Cp(p) => set_component_property(&mut hull.component, p, value),
            Hp(p) => set_hull_property(hull, p, value),
        }
    }
}

pub type HullContext = ComponentContext<HullKind>;
pub type HullFunction = ComponentFunction<HullKind>;
