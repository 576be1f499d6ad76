use crate::error::GraphError;
use crate::ops::{check_arity, LocalGradient, OpConfig, Operation};
use crate::value::{mul_op, Element, Value};

/// Sums its input, either over every element or along `OpConfig::axis`.
///
/// Backward spreads the upstream gradient back over the reduced elements:
/// - full reduction: `ones_like(x) * upstream` (upstream is a scalar).
/// - axis reduction: the upstream is re-expanded along the reduced axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReduceSumOp;

impl ReduceSumOp {
    pub fn new() -> Self {
        ReduceSumOp
    }
}

impl<T: Element> Operation<T> for ReduceSumOp {
    fn name(&self) -> &str {
        "reduce_sum_op"
    }

    fn apply(&self, inputs: &[Value<T>], config: &OpConfig) -> Result<Value<T>, GraphError> {
        check_arity("reduce_sum_op", inputs, 1)?;
        match config.axis() {
            None => Ok(inputs[0].sum_all()),
            Some(axis) => inputs[0].sum_axis(axis),
        }
    }

    fn gradient(
        &self,
        inputs: &[Value<T>],
        upstream: &Value<T>,
        config: &OpConfig,
    ) -> Result<LocalGradient<T>, GraphError> {
        check_arity("reduce_sum_op", inputs, 1)?;
        let x = &inputs[0];
        let grad = match config.axis() {
            None => mul_op(&Value::ones_like(x), upstream)?,
            Some(axis) => {
                let len = *x.shape().get(axis).ok_or(GraphError::AxisOutOfBounds {
                    axis,
                    rank: x.rank(),
                })?;
                upstream.expand_axis(axis, len)?
            }
        };
        Ok(LocalGradient::new(vec![grad]))
    }
}

#[cfg(test)]
#[path = "reduce_sum_test.rs"]
mod tests;
