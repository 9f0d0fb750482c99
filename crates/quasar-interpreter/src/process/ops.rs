//! Operators on scalar values
//!
//! Null propagates through arithmetic and comparison: if either operand is
//! null, the result is null.

use crate::error::{Error, ExpectedType};
use crate::opcode::{BinaryOp, UnaryOp};
use crate::value::{to_boolean, value_to_text, Value};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i32),
    Float(f64),
}

fn number(value: &Value) -> Result<Number, Error> {
    match value {
        Value::Integer(i) => Ok(Number::Int(*i)),
        Value::Boolean(b) => Ok(Number::Int(i32::from(*b))),
        Value::Float(f) => Ok(Number::Float(*f)),
        _ => Err(Error::Type(ExpectedType::Number)),
    }
}

fn as_f64(n: Number) -> f64 {
    match n {
        Number::Int(i) => f64::from(i),
        Number::Float(f) => f,
    }
}

fn arithmetic(
    a: &Value,
    b: &Value,
    int_op: fn(i32, i32) -> Option<i32>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, Error> {
    match (number(a)?, number(b)?) {
        (Number::Int(x), Number::Int(y)) => Ok(match int_op(x, y) {
            Some(r) => Value::Integer(r),
            None => Value::Float(float_op(f64::from(x), f64::from(y))),
        }),
        (x, y) => Ok(Value::Float(float_op(as_f64(x), as_f64(y)))),
    }
}

fn compare(a: &Value, b: &Value) -> Result<Ordering, Error> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Ok(x.to_uppercase().cmp(&y.to_uppercase())),
        (Value::String(_), _) | (_, Value::String(_)) => Err(Error::Type(ExpectedType::String)),
        _ => {
            let x = as_f64(number(a)?);
            let y = as_f64(number(b)?);
            x.partial_cmp(&y).ok_or(Error::Range)
        }
    }
}

/// Evaluate a binary operator
pub fn binary(op: BinaryOp, a: Option<Value>, b: Option<Value>) -> Result<Option<Value>, Error> {
    let (a, b) = match (op, a, b) {
        (BinaryOp::Concat, a, b) => return Ok(concat(a.as_ref(), b.as_ref())),
        (_, Some(a), Some(b)) => (a, b),
        _ => return Ok(None),
    };
    let result = match op {
        BinaryOp::Concat => Value::String(a.to_text(false) + &b.to_text(false)),
        BinaryOp::Add => match (&a, &b) {
            (Value::String(x), Value::String(y)) => Value::String(format!("{}{}", x, y)),
            _ => arithmetic(&a, &b, i32::checked_add, |x, y| x + y)?,
        },
        BinaryOp::Sub => arithmetic(&a, &b, i32::checked_sub, |x, y| x - y)?,
        BinaryOp::Mul => arithmetic(&a, &b, i32::checked_mul, |x, y| x * y)?,
        BinaryOp::CompareEq => Value::Boolean(compare(&a, &b)? == Ordering::Equal),
        BinaryOp::CompareLt => Value::Boolean(compare(&a, &b)? == Ordering::Less),
    };
    Ok(Some(result))
}

/// Concatenation treats a single null operand as empty text
fn concat(a: Option<&Value>, b: Option<&Value>) -> Option<Value> {
    match (a, b) {
        (None, None) => None,
        _ => Some(Value::String(value_to_text(a, false) + &value_to_text(b, false))),
    }
}

/// Evaluate a unary operator
pub fn unary(op: UnaryOp, a: Option<Value>) -> Result<Option<Value>, Error> {
    match op {
        UnaryOp::IsEmpty => Ok(Some(Value::Boolean(a.is_none()))),
        UnaryOp::Not => Ok(to_boolean(a.as_ref()).map(|b| Value::Boolean(!b))),
        UnaryOp::Str => Ok(a.map(|v| Value::String(v.to_text(false)))),
        UnaryOp::Neg => match a {
            None => Ok(None),
            Some(v) => match number(&v)? {
                Number::Int(i) => Ok(Some(match i.checked_neg() {
                    Some(r) => Value::Integer(r),
                    None => Value::Float(-f64::from(i)),
                })),
                Number::Float(f) => Ok(Some(Value::Float(-f))),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i32) -> Option<Value> {
        Some(Value::Integer(i))
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(binary(BinaryOp::Add, int(2), int(3)).unwrap().unwrap().as_integer(), Some(5));
        assert_eq!(
            binary(BinaryOp::Mul, int(2), Some(Value::Float(1.5))).unwrap().unwrap().as_float(),
            Some(3.0)
        );
        let big = binary(BinaryOp::Add, int(i32::MAX), int(1)).unwrap().unwrap();
        assert_eq!(big.as_float(), Some(f64::from(i32::MAX) + 1.0));
    }

    #[test]
    fn test_null_propagates() {
        assert!(binary(BinaryOp::Add, None, int(1)).unwrap().is_none());
        assert!(binary(BinaryOp::CompareEq, int(1), None).unwrap().is_none());
        assert!(unary(UnaryOp::Not, None).unwrap().is_none());
        assert!(unary(UnaryOp::Neg, None).unwrap().is_none());
    }

    #[test]
    fn test_concat() {
        let r = binary(BinaryOp::Concat, Some(Value::from("a")), int(1)).unwrap().unwrap();
        assert_eq!(r.as_str(), Some("a1"));
        let r = binary(BinaryOp::Concat, None, Some(Value::from("b"))).unwrap().unwrap();
        assert_eq!(r.as_str(), Some("b"));
        assert!(binary(BinaryOp::Concat, None, None).unwrap().is_none());
    }

    #[test]
    fn test_compare() {
        let eq = binary(BinaryOp::CompareEq, Some(Value::from("abc")), Some(Value::from("ABC")));
        assert_eq!(eq.unwrap().unwrap().as_bool(), Some(true));
        let lt = binary(BinaryOp::CompareLt, int(1), Some(Value::Float(1.5)));
        assert_eq!(lt.unwrap().unwrap().as_bool(), Some(true));
        assert!(matches!(
            binary(BinaryOp::CompareEq, int(1), Some(Value::from("1"))),
            Err(Error::Type(ExpectedType::String))
        ));
    }

    #[test]
    fn test_unary() {
        assert_eq!(unary(UnaryOp::IsEmpty, None).unwrap().unwrap().as_bool(), Some(true));
        assert_eq!(unary(UnaryOp::Not, int(0)).unwrap().unwrap().as_bool(), Some(true));
        assert_eq!(unary(UnaryOp::Str, int(7)).unwrap().unwrap().as_str(), Some("7"));
        assert_eq!(unary(UnaryOp::Neg, int(7)).unwrap().unwrap().as_integer(), Some(-7));
        assert!(unary(UnaryOp::Neg, Some(Value::from("x"))).is_err());
    }
}
