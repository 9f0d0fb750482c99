//! Engine-specific properties

use crate::spec::{Engine, MAX_WARP};
use quasar_interpreter::arguments::check_integer_arg_range;
use quasar_interpreter::serialization::{Charset, SaveContext, TagNode};
use quasar_interpreter::value::{call_indexable, reject_set, reject_store};
use quasar_interpreter::{
    Arguments, BaseValue, CallableValue, Context, Error, ExpectedType, IndexableValue, Process, Value, World,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineProperty {
    FuelFactor,
    EfficientWarp,
}

pub fn get_engine_property(engine: &Engine, property: EngineProperty) -> Option<Value> {
    Some(match property {
        EngineProperty::FuelFactor => Value::Indexable(Box::new(FuelFactorArray::new(engine.fuel_factors))),
        EngineProperty::EfficientWarp => Value::Integer(engine.max_efficient_warp()),
    })
}

/// `FUEL.FACTOR(warp)`: read-only array indexed by warp factor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuelFactorArray {
    factors: [i32; MAX_WARP + 1],
}

impl FuelFactorArray {
    pub fn new(factors: [i32; MAX_WARP + 1]) -> Self {
        Self { factors }
    }
}

impl BaseValue for FuelFactorArray {
    fn to_text(&self, _readable: bool) -> String {
        "#<array>".to_string()
    }

    fn store(
        &self,
        _out: &mut TagNode,
        _aux: &mut Vec<u8>,
        _charset: Charset,
        _ctx: Option<&mut dyn SaveContext>,
    ) -> Result<(), Error> {
        reject_store()
    }
}

impl CallableValue for FuelFactorArray {
    fn call(&self, process: &mut Process, _world: &mut World, args: Arguments, want_result: bool) -> Result<(), Error> {
        call_indexable(self, process, args, want_result)
    }

    fn is_procedure_call(&self) -> bool {
        false
    }

    /// One dimension, indexes 0 to 9
    fn get_dimension(&self, which: usize) -> usize {
        match which {
            0 => 1,
            _ => MAX_WARP + 1,
        }
    }

    fn make_first_context(&self) -> Result<Option<Box<dyn Context>>, Error> {
        Err(Error::Type(ExpectedType::Iterable))
    }

    fn clone_callable(&self) -> Box<dyn CallableValue> {
        Box::new(self.clone())
    }
}

impl IndexableValue for FuelFactorArray {
    fn get(&self, args: &mut Arguments) -> Result<Option<Value>, Error> {
        args.check_argument_count(1)?;
        let warp = check_integer_arg_range(args.next().as_ref(), 0, MAX_WARP as i32)?;
        Ok(warp.map(|w| Value::Integer(self.factors[w as usize])))
    }

    fn set(&self, _args: &mut Arguments, _value: Option<&Value>) -> Result<(), Error> {
        reject_set()
    }

    fn clone_indexable(&self) -> Box<dyn IndexableValue> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array() -> FuelFactorArray {
        FuelFactorArray::new([0, 100, 800, 2700, 6400, 12500, 21600, 34300, 51200, 72900])
    }

    fn get(a: &FuelFactorArray, values: Vec<Option<Value>>) -> Result<Option<Value>, Error> {
        a.get(&mut Arguments::new(values))
    }

    #[test]
    fn test_lookup() {
        let a = array();
        assert_eq!(get(&a, vec![Some(Value::Integer(3))]).unwrap().unwrap().as_integer(), Some(2700));
        assert!(get(&a, vec![None]).unwrap().is_none());
        assert_eq!(get(&a, vec![Some(Value::Integer(10))]).unwrap_err(), Error::Range);
        assert!(matches!(get(&a, vec![]), Err(Error::Arity { .. })));
    }

    #[test]
    fn test_read_only() {
        let a = array();
        let mut args = Arguments::new(vec![Some(Value::Integer(1))]);
        assert_eq!(a.set(&mut args, Some(&Value::Integer(5))), Err(Error::NotAssignable));
        assert_eq!(a.get_dimension(0), 1);
        assert_eq!(a.get_dimension(1), 10);
    }
}
