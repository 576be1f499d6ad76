use crate::error::GraphError;
use crate::ops::{check_arity, LocalGradient, OpConfig, Operation};
use crate::value::{mul_op, Element, Value};

/// Elementwise product of two inputs.
///
/// The gradient rule also reports `inputs[0] * upstream` as the operation's own gradient.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiplyOp;

impl MultiplyOp {
    pub fn new() -> Self {
        MultiplyOp
    }
}

impl<T: Element> Operation<T> for MultiplyOp {
    fn name(&self) -> &str {
        "multiply_op"
    }

    fn apply(&self, inputs: &[Value<T>], _config: &OpConfig) -> Result<Value<T>, GraphError> {
        check_arity("multiply_op", inputs, 2)?;
        mul_op(&inputs[0], &inputs[1])
    }

    fn gradient(
        &self,
        inputs: &[Value<T>],
        upstream: &Value<T>,
        _config: &OpConfig,
    ) -> Result<LocalGradient<T>, GraphError> {
        check_arity("multiply_op", inputs, 2)?;
        let (a, b) = (&inputs[0], &inputs[1]);
        // grad_a = upstream * b, grad_b = upstream * a
        let grad_a = mul_op(b, upstream)?;
        let grad_b = mul_op(a, upstream)?;
        let self_grad = mul_op(a, upstream)?;
        Ok(LocalGradient::new(vec![grad_a, grad_b]).with_self_grad(self_grad))
    }
}

#[cfg(test)]
#[path = "multiply_test.rs"]
mod tests;
