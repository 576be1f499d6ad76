use crate::error::GraphError;
use crate::ops::{check_arity, LocalGradient, OpConfig, Operation};
use crate::value::{mul_op, mul_scalar_op, powi_op, Element, Value};

/// Elementwise square `x ** 2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquareOp;

impl SquareOp {
    pub fn new() -> Self {
        SquareOp
    }
}

impl<T: Element> Operation<T> for SquareOp {
    fn name(&self) -> &str {
        "square_op"
    }

    fn apply(&self, inputs: &[Value<T>], _config: &OpConfig) -> Result<Value<T>, GraphError> {
        check_arity("square_op", inputs, 1)?;
        Ok(powi_op(&inputs[0], 2))
    }

    fn gradient(
        &self,
        inputs: &[Value<T>],
        upstream: &Value<T>,
        _config: &OpConfig,
    ) -> Result<LocalGradient<T>, GraphError> {
        check_arity("square_op", inputs, 1)?;
        let two = T::one() + T::one();
        let grad = mul_op(&mul_scalar_op(&inputs[0], two), upstream)?;
        Ok(LocalGradient::new(vec![grad]))
    }
}

#[cfg(test)]
#[path = "square_test.rs"]
mod tests;
