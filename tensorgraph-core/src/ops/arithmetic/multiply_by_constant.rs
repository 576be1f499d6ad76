use crate::error::GraphError;
use crate::ops::{check_arity, LocalGradient, OpConfig, Operation};
use crate::value::{mul_op, mul_scalar_op, Element, Value};

/// Multiplies its single input by a constant fixed at construction.
///
/// The gradient rule reports `input * upstream` as the operation's own gradient.
#[derive(Debug, Clone, Copy)]
pub struct MultiplyByConstantOp<T> {
    c: T,
}

impl<T: Element> MultiplyByConstantOp<T> {
    pub fn new(c: T) -> Self {
        MultiplyByConstantOp { c }
    }

    pub fn constant(&self) -> T {
        self.c
    }
}

impl<T: Element> Operation<T> for MultiplyByConstantOp<T> {
    fn name(&self) -> &str {
        "multiply_by_constant_op"
    }

    fn apply(&self, inputs: &[Value<T>], _config: &OpConfig) -> Result<Value<T>, GraphError> {
        check_arity("multiply_by_constant_op", inputs, 1)?;
        Ok(mul_scalar_op(&inputs[0], self.c))
    }

    fn gradient(
        &self,
        inputs: &[Value<T>],
        upstream: &Value<T>,
        _config: &OpConfig,
    ) -> Result<LocalGradient<T>, GraphError> {
        check_arity("multiply_by_constant_op", inputs, 1)?;
        let self_grad = mul_op(&inputs[0], upstream)?;
        Ok(LocalGradient::new(vec![mul_scalar_op(upstream, self.c)]).with_self_grad(self_grad))
    }
}

#[cfg(test)]
#[path = "multiply_by_constant_test.rs"]
mod tests;
