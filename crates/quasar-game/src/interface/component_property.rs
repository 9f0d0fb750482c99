//! Properties shared by all ship components

use crate::spec::Component;
use quasar_interpreter::arguments::check_string_arg;
use quasar_interpreter::{Error, Value};

/// Component property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentProperty {
    Id,
    Name,
    ShortName,
    Mass,
    Tech,
    CostT,
    CostD,
    CostM,
    CostMC,
    CostSup,
    CostStr,
}

pub fn get_component_property(component: &Component, property: ComponentProperty) -> Option<Value> {
    let cost = &component.cost;
    Some(match property {
        ComponentProperty::Id => Value::Integer(component.id),
        ComponentProperty::Name => Value::from(component.name.as_str()),
        ComponentProperty::ShortName => Value::from(component.effective_short_name()),
        ComponentProperty::Mass => Value::Integer(component.mass),
        ComponentProperty::Tech => Value::Integer(component.tech_level),
        ComponentProperty::CostT => Value::Integer(cost.tritanium),
        ComponentProperty::CostD => Value::Integer(cost.duranium),
        ComponentProperty::CostM => Value::Integer(cost.molybdenum),
        ComponentProperty::CostMC => Value::Integer(cost.money),
        ComponentProperty::CostSup => Value::Integer(cost.supplies),
        ComponentProperty::CostStr => Value::from(cost.to_cost_string()),
    })
}

/// Only the names can be changed. Assigning null leaves the component
/// unchanged; the result tells whether anything was assigned.
pub fn set_component_property(
    component: &mut Component,
    property: ComponentProperty,
    value: Option<&Value>,
) -> Result<bool, Error> {
    let target = match property {
        ComponentProperty::Name => &mut component.name,
        ComponentProperty::ShortName => &mut component.short_name,
        _ => return Err(Error::NotAssignable),
    };
    match check_string_arg(value)? {
        Some(text) => {
            *target = text;
            Ok(true)
        }
        None => Ok(false),
    }
}
