use crate::error::GraphError;
use crate::ops::{check_arity, LocalGradient, OpConfig, Operation};
use crate::value::{Element, Value};

/// Passes its single input through unchanged, in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityOp;

impl IdentityOp {
    pub fn new() -> Self {
        IdentityOp
    }
}

impl<T: Element> Operation<T> for IdentityOp {
    fn name(&self) -> &str {
        "identity_op"
    }

    fn apply(&self, inputs: &[Value<T>], _config: &OpConfig) -> Result<Value<T>, GraphError> {
        check_arity("identity_op", inputs, 1)?;
        Ok(inputs[0].clone())
    }

    fn gradient(
        &self,
        inputs: &[Value<T>],
        upstream: &Value<T>,
        _config: &OpConfig,
    ) -> Result<LocalGradient<T>, GraphError> {
        check_arity("identity_op", inputs, 1)?;
        Ok(LocalGradient::new(vec![upstream.clone()]))
    }
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
