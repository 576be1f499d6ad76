use crate::error::GraphError;
use crate::ops::{check_arity, LocalGradient, OpConfig, Operation};
use crate::value::{Element, Value};

/// Forwards its input unchanged but always sends a zero gradient back.
///
/// Used to detach a subgraph (e.g. data inputs or regression targets) from differentiation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopGradientOp;

impl StopGradientOp {
    pub fn new() -> Self {
        StopGradientOp
    }
}

impl<T: Element> Operation<T> for StopGradientOp {
    fn name(&self) -> &str {
        "stop_gradient_op"
    }

    fn apply(&self, inputs: &[Value<T>], _config: &OpConfig) -> Result<Value<T>, GraphError> {
        check_arity("stop_gradient_op", inputs, 1)?;
        Ok(inputs[0].clone())
    }

    fn gradient(
        &self,
        inputs: &[Value<T>],
        upstream: &Value<T>,
        _config: &OpConfig,
    ) -> Result<LocalGradient<T>, GraphError> {
        check_arity("stop_gradient_op", inputs, 1)?;
        // Zeros, not `upstream * 0`: a NaN or infinite upstream still yields 0.
        Ok(LocalGradient::new(vec![Value::zeros_like(upstream)]))
    }
}

#[cfg(test)]
#[path = "stop_gradient_test.rs"]
mod tests;
