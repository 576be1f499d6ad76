use crate::error::GraphError;
use crate::ops::{check_arity, LocalGradient, OpConfig, Operation};
use crate::value::{neg_op, sub_op, Element, Value};

/// Binary subtraction `inputs[0] - inputs[1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubtractOp;

impl SubtractOp {
    pub fn new() -> Self {
        SubtractOp
    }
}

impl<T: Element> Operation<T> for SubtractOp {
    fn name(&self) -> &str {
        "subtract_op"
    }

    fn apply(&self, inputs: &[Value<T>], _config: &OpConfig) -> Result<Value<T>, GraphError> {
        check_arity("subtract_op", inputs, 2)?;
        sub_op(&inputs[0], &inputs[1])
    }

    fn gradient(
        &self,
        inputs: &[Value<T>],
        upstream: &Value<T>,
        _config: &OpConfig,
    ) -> Result<LocalGradient<T>, GraphError> {
        check_arity("subtract_op", inputs, 2)?;
        // d(a - b)/da = 1, d(a - b)/db = -1
        Ok(LocalGradient::new(vec![upstream.clone(), neg_op(upstream)]))
    }
}

#[cfg(test)]
#[path = "subtract_test.rs"]
mod tests;
