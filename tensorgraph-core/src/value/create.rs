// Constant and random constructors for Value.

use super::{Element, Value};
use crate::error::GraphError;
use rand::distributions::Standard;
use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal};

impl<T: Element> Value<T> {
    pub fn full(shape: &[usize], fill: T) -> Self {
        let numel = shape.iter().product();
        Value {
            shape: shape.to_vec(),
            data: vec![fill; numel],
        }
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, T::zero())
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, T::one())
    }

    pub fn zeros_like(other: &Value<T>) -> Self {
        Self::zeros(&other.shape)
    }

    pub fn ones_like(other: &Value<T>) -> Self {
        Self::ones(&other.shape)
    }

    /// Samples every element uniformly from `[0, 1)`.
    pub fn rand_uniform<R>(shape: &[usize], rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
        Standard: Distribution<T>,
    {
        let numel = shape.iter().product();
        let data = (0..numel).map(|_| rng.gen::<T>()).collect();
        Value {
            shape: shape.to_vec(),
            data,
        }
    }

    /// Samples every element from a normal distribution.
    ///
    /// # Errors
    /// `GraphError::InvalidDistribution` if `std` is not a valid standard deviation (e.g. NaN).
    pub fn rand_normal<R>(shape: &[usize], mean: T, std: T, rng: &mut R) -> Result<Self, GraphError>
    where
        R: Rng + ?Sized,
        StandardNormal: Distribution<T>,
    {
        let normal = Normal::new(mean, std)
            .map_err(|e| GraphError::InvalidDistribution(format!("{} (mean={:?}, std={:?})", e, mean, std)))?;
        let numel = shape.iter().product();
        let data = (0..numel).map(|_| normal.sample(rng)).collect();
        Ok(Value {
            shape: shape.to_vec(),
            data,
        })
    }
}
