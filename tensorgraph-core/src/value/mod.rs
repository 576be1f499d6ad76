//! # Numeric Values (`value`)
//!
//! [`Value`] is the numeric payload that flows along graph edges: a dense,
//! row-major block of elements with a shape. A rank-0 value is a scalar.
//!
//! Arithmetic is deliberately small. Binary elementwise operations require
//! equal shapes, except that a scalar operand is broadcast against any shape.
//! There is no general broadcasting.
//!
//! ## Submodules:
//!
//! - [`arithmetic`]: elementwise `add`, `sub`, `mul`, `neg`, scalar multiply and integer power.
//! - [`reduction`]: full and single-axis sums, axis expansion, mean.
//! - [`create`]: constant and random constructors.

use crate::error::GraphError;
use approx::{AbsDiffEq, RelativeEq};
use num_traits::Float;
use std::fmt::{self, Debug, Display};

pub mod arithmetic;
pub mod create;
pub mod reduction;

pub use arithmetic::{add_op, mul_op, mul_scalar_op, neg_op, powi_op, sub_op};

/// Element types a [`Value`] can hold.
///
/// Blanket-implemented for every `num_traits::Float` that is also
/// `Debug + Send + Sync + 'static` (in practice `f32` and `f64`).
pub trait Element: Float + Debug + Send + Sync + 'static {}

impl<T> Element for T where T: Float + Debug + Send + Sync + 'static {}

/// A dense numeric value with a row-major shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Value<T = f64> {
    pub(crate) shape: Vec<usize>,
    pub(crate) data: Vec<T>,
}

impl<T: Element> Value<T> {
    /// Creates a value from raw data and a shape.
    ///
    /// # Errors
    /// Returns `GraphError::ValueCreation` if `data.len()` is not the product of `shape`.
    pub fn new(data: Vec<T>, shape: Vec<usize>) -> Result<Self, GraphError> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(GraphError::ValueCreation {
                data_len: data.len(),
                shape,
            });
        }
        Ok(Value { shape, data })
    }

    /// Creates a rank-0 value.
    pub fn scalar(value: T) -> Self {
        Value {
            shape: vec![],
            data: vec![value],
        }
    }

    /// Creates a rank-1 value from a vector.
    pub fn from_vec(data: Vec<T>) -> Self {
        Value {
            shape: vec![data.len()],
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Returns the single element of a one-element value.
    pub fn item(&self) -> Option<T> {
        match self.data.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    /// Applies `f` to every element, keeping the shape.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T,
    {
        Value {
            shape: self.shape.clone(),
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }
}

impl<T: Element> From<T> for Value<T> {
    fn from(value: T) -> Self {
        Value::scalar(value)
    }
}

impl<T: Element> From<Vec<T>> for Value<T> {
    fn from(data: Vec<T>) -> Self {
        Value::from_vec(data)
    }
}

impl<T: Element + Display> Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_scalar() {
            return write!(f, "{}", self.data[0]);
        }
        write!(f, "Value(shape={:?}, data=[", self.shape)?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", x)?;
        }
        write!(f, "])")
    }
}

impl<T> AbsDiffEq for Value<T>
where
    T: Element + AbsDiffEq<Epsilon = T>,
{
    type Epsilon = T;

    fn default_epsilon() -> T {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: T) -> bool {
        self.shape == other.shape
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<T> RelativeEq for Value<T>
where
    T: Element + RelativeEq<Epsilon = T>,
{
    fn default_max_relative() -> T {
        T::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: T, max_relative: T) -> bool {
        self.shape == other.shape
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
