use crate::error::GraphError;
use crate::graph::{Feed, Graph, NodeId, NodeVariant};
use crate::value::{Element, Value};
use log::debug;
use num_traits::ToPrimitive;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed at element {element_index}: analytical grad {analytical_grad:?} != numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        element_index: usize,
        analytical_grad: f64, // Use f64 for reporting
        numerical_grad: f64,
        difference: f64,
    },

    #[error("Numerical gradient is NaN or infinite at element {element_index}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },

    #[error("Analytical gradient of shape {gradient_shape:?} cannot be matched to source of shape {source_shape:?}")]
    GradientShapeMismatch {
        gradient_shape: Vec<usize>,
        source_shape: Vec<usize>,
    },

    #[error("Gradient check needs a terminal with a single-element output, got shape {0:?}")]
    NonScalarTerminal(Vec<usize>),

    #[error("Gradient check target must be a source node, got a {0:?} node")]
    NotASource(NodeVariant),

    #[error("Graph error during gradient check: {0}")]
    Graph(#[from] GraphError),
}

/// Checks the analytical gradient of `terminal` with respect to `source` against central
/// finite differences.
///
/// The terminal must produce a single element (reduce first), since the backward seed is a
/// scalar `1.0`. When a scalar source is broadcast inside the graph its analytical gradient
/// has the broadcast shape; it is summed before comparison.
///
/// The graph is reset before each evaluation and once more before returning, and the
/// original `feed` is bound again afterwards.
///
/// # Errors
/// `GradCheckError::NonScalarTerminal` if the terminal output has more than one element.
/// `GradCheckError::GradientMismatch` when `|analytical - numerical| > tolerance * (1 + |numerical|)`
/// for some element, or any graph error raised while evaluating.
pub fn check_grad<T: Element>(
    graph: &mut Graph<T>,
    terminal: NodeId,
    source: NodeId,
    feed: &Feed<T>,
    epsilon: T,
    tolerance: T,
) -> Result<(), GradCheckError> {
    let variant = graph.node_variant(source)?;
    if variant != NodeVariant::Source {
        return Err(GradCheckError::NotASource(variant));
    }
    let name = graph.node_name(source)?.to_string();
    let original = feed
        .get(&name)
        .cloned()
        .ok_or_else(|| GraphError::MissingSourceBinding { name: name.clone() })?;

    // --- Analytical gradient ---
    graph.reset();
    graph.bind_feed(feed.clone());
    let analytical = graph
        .source_gradients(terminal, &[source])?
        .into_iter()
        .next()
        .ok_or_else(|| GraphError::GradientArityMismatch {
            node: name.clone(),
            expected: 1,
            actual: 0,
        })?;
    let output_shape = graph.forward(terminal)?.shape().to_vec();
    if output_shape.iter().product::<usize>() != 1 {
        graph.reset();
        return Err(GradCheckError::NonScalarTerminal(output_shape));
    }
    let analytical = if analytical.shape() == original.shape() {
        analytical
    } else if original.is_scalar() {
        analytical.sum_all()
    } else {
        graph.reset();
        return Err(GradCheckError::GradientShapeMismatch {
            gradient_shape: analytical.shape().to_vec(),
            source_shape: original.shape().to_vec(),
        });
    };

    // --- Numerical gradient, element by element ---
    let two = T::one() + T::one();
    for element_index in 0..original.numel() {
        let loss_plus = perturbed_loss(graph, terminal, feed, &name, &original, element_index, epsilon)?;
        let loss_minus = perturbed_loss(graph, terminal, feed, &name, &original, element_index, -epsilon)?;
        let numerical = (loss_plus - loss_minus) / (two * epsilon);

        if !numerical.is_finite() {
            graph.reset();
            return Err(GradCheckError::NumericalGradNaNOrInfinite {
                element_index,
                loss_plus: to_f64(loss_plus),
                loss_minus: to_f64(loss_minus),
            });
        }

        let analytical_value = analytical.data()[element_index];
        let difference = (analytical_value - numerical).abs();
        if difference > tolerance * (T::one() + numerical.abs()) {
            graph.reset();
            return Err(GradCheckError::GradientMismatch {
                element_index,
                analytical_grad: to_f64(analytical_value),
                numerical_grad: to_f64(numerical),
                difference: to_f64(difference),
            });
        }
    }

    debug!("check_grad: {} element(s) of source '{}' match", original.numel(), name);
    graph.reset();
    graph.bind_feed(feed.clone());
    Ok(())
}

/// Terminal output with one element of `source` shifted by `delta`.
fn perturbed_loss<T: Element>(
    graph: &mut Graph<T>,
    terminal: NodeId,
    feed: &Feed<T>,
    source: &str,
    original: &Value<T>,
    element_index: usize,
    delta: T,
) -> Result<T, GraphError> {
    let mut data = original.data().to_vec();
    data[element_index] = data[element_index] + delta;
    let mut perturbed_feed = feed.clone();
    perturbed_feed.insert(source.to_string(), Value::new(data, original.shape().to_vec())?);

    graph.reset();
    let output = graph.eval_terminal(terminal, perturbed_feed)?;
    Ok(output.sum_all().data()[0])
}

fn to_f64<T: Element>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
