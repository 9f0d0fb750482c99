//! Hull-specific properties

use crate::spec::Hull;
use quasar_interpreter::arguments::{check_integer_arg, check_string_arg};
use quasar_interpreter::{Error, Value};

/// Hull property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HullProperty {
    MaxBeams,
    MaxCargo,
    MaxCrew,
    MaxFuel,
    MaxLaunchers,
    NumBays,
    NumEngines,
    Special,
    /// Picture number
    Image,
    /// Picture resource name
    Image2,
}

pub fn get_hull_property(hull: &Hull, property: HullProperty) -> Option<Value> {
    Some(match property {
        HullProperty::MaxBeams => Value::Integer(hull.max_beams),
        HullProperty::MaxCargo => Value::Integer(hull.max_cargo),
        HullProperty::MaxCrew => Value::Integer(hull.max_crew),
        HullProperty::MaxFuel => Value::Integer(hull.max_fuel),
        HullProperty::MaxLaunchers => Value::Integer(hull.max_launchers),
        HullProperty::NumBays => Value::Integer(hull.num_bays),
        HullProperty::NumEngines => Value::Integer(hull.num_engines),
        HullProperty::Special => Value::from(hull.special.as_str()),
        HullProperty::Image => Value::Integer(hull.internal_picture),
        HullProperty::Image2 => Value::from(hull.image_resource()),
    })
}

/// Whether scripts may assign `property`
pub fn is_assignable_hull_property(property: HullProperty) -> bool {
    matches!(property, HullProperty::Image | HullProperty::Image2)
}

/// Only the pictures can be changed. Assigning null leaves the hull
/// unchanged; the result tells whether anything was assigned.
pub fn set_hull_property(hull: &mut Hull, property: HullProperty, value: Option<&Value>) -> Result<bool, Error> {
    match property {
        HullProperty::Image => match check_integer_arg(value)? {
            Some(picture) if picture < 0 => Err(Error::Range),
            Some(picture) => {
                hull.internal_picture = picture;
                Ok(true)
            }
            None => Ok(false),
        },
        HullProperty::Image2 => match check_string_arg(value)? {
            Some(name) => {
                hull.image_name = name;
                Ok(true)
            }
            None => Ok(false),
        },
        _ => Err(Error::NotAssignable),
    }
}
