use crate::error::GraphError;
use crate::ops::{LocalGradient, OpConfig, Operation};
use crate::value::{add_op, Element, Value};

/// Elementwise sum of any number of inputs (at least one).
///
/// Every input receives the upstream gradient unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumOp;

impl SumOp {
    pub fn new() -> Self {
        SumOp
    }
}

impl<T: Element> Operation<T> for SumOp {
    fn name(&self) -> &str {
        "sum_op"
    }

    fn apply(&self, inputs: &[Value<T>], _config: &OpConfig) -> Result<Value<T>, GraphError> {
        let (first, rest) = inputs.split_first().ok_or_else(|| GraphError::ArityMismatch {
            operation: "sum_op".to_string(),
            expected: 1,
            actual: 0,
        })?;
        rest.iter().try_fold(first.clone(), |acc, x| add_op(&acc, x))
    }

    fn gradient(
        &self,
        inputs: &[Value<T>],
        upstream: &Value<T>,
        _config: &OpConfig,
    ) -> Result<LocalGradient<T>, GraphError> {
        Ok(LocalGradient::new(vec![upstream.clone(); inputs.len()]))
    }
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
