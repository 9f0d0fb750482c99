//! Engine context and `Engine()` function

use super::component_context::{ComponentContext, ComponentFunction, ComponentKind};
use super::component_property::{get_component_property, set_component_property, ComponentProperty};
use super::engine_property::{get_engine_property, EngineProperty};
use crate::spec::ShipList;
use quasar_interpreter::names::{NameTable, TypeHint};
use quasar_interpreter::serialization::TAG_ENGINE;
use quasar_interpreter::{Error, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineDomain {
    Component(ComponentProperty),
    Engine(EngineProperty),
}

use ComponentProperty as C;
use EngineDomain::{Component as Cp, Engine as Ep};
use EngineProperty as E;

pub const ENGINE_MAPPING: &[NameTable<EngineDomain>] = &[
    NameTable::new("COST.D", Cp(C::CostD), TypeHint::Int),
    NameTable::new("COST.M", Cp(C::CostM), TypeHint::Int),
    NameTable::new("COST.MC", Cp(C::CostMC), TypeHint::Int),
    NameTable::new("COST.STR", Cp(C::CostStr), TypeHint::String),
    NameTable::new("COST.T", Cp(C::CostT), TypeHint::Int),
    NameTable::new("FUEL.FACTOR", Ep(E::FuelFactor), TypeHint::Array),
    NameTable::new("ID", Cp(C::Id), TypeHint::Int),
    NameTable::new("MASS", Cp(C::Mass), TypeHint::Int),
    NameTable::new("NAME", Cp(C::Name), TypeHint::String),
    NameTable::new("NAME.SHORT", Cp(C::ShortName), TypeHint::String),
    NameTable::new("SPEED$", Ep(E::EfficientWarp), TypeHint::Int),
    NameTable::new("TECH", Cp(C::Tech), TypeHint::Int),
    NameTable::new("TECH.ENGINE", Cp(C::Tech), TypeHint::Int),
];

#[derive(Debug, Clone, Copy)]
pub struct EngineKind;

impl ComponentKind for EngineKind {
    type Domain = EngineDomain;
    const NAME: &'static str = "Engine";
    const TAG: u16 = TAG_ENGINE;
    const TABLE: &'static [NameTable<EngineDomain>] = ENGINE_MAPPING;

    fn size(list: &ShipList) -> i32 {
        list.engines().size()
    }

    fn find_next(list: &ShipList, id: i32) -> Option<i32> {
        list.engines().find_next(id)
    }

    fn get_property(list: &ShipList, id: i32, domain: EngineDomain) -> Option<Value> {
        let engine = list.engines().get(id)?;
        match domain {
            Cp(p) => get_component_property(&engine.component, p),
            Ep(p) => get_engine_property(engine, p),
        }
    }

    fn set_property(list: &mut ShipList, id: i32, domain: EngineDomain, value: Option<&Value>) -> Result<bool, Error> {
        match (list.engines_mut().get_mut(id), domain) {
            (_, Ep(_)) | (None, _) => Err(Error::NotAssignable),
            (Some(engine), Cp(p)) => set_component_property(&mut engine.component, p, value),
        }
    }
}

pub type EngineContext = ComponentContext<EngineKind>;
pub type EngineFunction = ComponentFunction<EngineKind>;
