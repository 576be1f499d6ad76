use super::{Element, Value};
use crate::error::GraphError;

/// Shared kernel for binary elementwise operations.
///
/// Equal shapes combine element by element. A scalar on either side is
/// broadcast against the other operand.
fn zip_with<T, F>(a: &Value<T>, b: &Value<T>, operation: &str, f: F) -> Result<Value<T>, GraphError>
where
    T: Element,
    F: Fn(T, T) -> T,
{
    if a.shape == b.shape {
        let data = a.data.iter().zip(b.data.iter()).map(|(&x, &y)| f(x, y)).collect();
        return Ok(Value {
            shape: a.shape.clone(),
            data,
        });
    }
    if a.is_scalar() {
        let x = a.data[0];
        return Ok(b.map(|y| f(x, y)));
    }
    if b.is_scalar() {
        let y = b.data[0];
        return Ok(a.map(|x| f(x, y)));
    }
    Err(GraphError::ShapeMismatch {
        lhs: a.shape.clone(),
        rhs: b.shape.clone(),
        operation: operation.to_string(),
    })
}

pub fn add_op<T: Element>(a: &Value<T>, b: &Value<T>) -> Result<Value<T>, GraphError> {
    zip_with(a, b, "add", |x, y| x + y)
}

pub fn sub_op<T: Element>(a: &Value<T>, b: &Value<T>) -> Result<Value<T>, GraphError> {
    zip_with(a, b, "sub", |x, y| x - y)
}

pub fn mul_op<T: Element>(a: &Value<T>, b: &Value<T>) -> Result<Value<T>, GraphError> {
    zip_with(a, b, "mul", |x, y| x * y)
}

pub fn neg_op<T: Element>(a: &Value<T>) -> Value<T> {
    a.map(|x| -x)
}

/// Multiplies every element by the constant `c`.
pub fn mul_scalar_op<T: Element>(a: &Value<T>, c: T) -> Value<T> {
    a.map(|x| x * c)
}

/// Raises every element to the integer power `n` (the `**` of the value contract).
pub fn powi_op<T: Element>(a: &Value<T>, n: i32) -> Value<T> {
    a.map(|x| x.powi(n))
}
