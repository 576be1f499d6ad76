//! # tensorgraph-core
//!
//! A small automatic-differentiation engine built around an explicit computation graph.
//!
//! Build a [`Graph`] out of named source nodes, operation nodes and terminal nodes, feed
//! values to the sources, evaluate terminals forward (memoized), and ask for reverse-mode
//! gradients of a terminal with respect to any of its ancestors.
//!
//! ```
//! use tensorgraph_core::{feed, Graph, Value};
//! use tensorgraph_core::ops::{MultiplyOp, SumOp};
//!
//! let mut graph = Graph::<f64>::new();
//! let x = graph.add_source_node("x");
//! let w = graph.add_source_node("w");
//! let b = graph.add_source_node("b");
//! let wx = graph.add_op(MultiplyOp::new(), [x, w]).unwrap();
//! let y = graph.add_op(SumOp::new(), [wx, b]).unwrap();
//! let out = graph.add_terminal_node(y, "y").unwrap();
//!
//! let feed = feed! { "x" => Value::scalar(3.0), "w" => Value::scalar(2.0), "b" => Value::scalar(1.0) };
//! let value = graph.eval_terminal(out, feed).unwrap();
//! assert_eq!(value.item(), Some(7.0));
//!
//! let grads = graph.source_gradients(out, &[w, b]).unwrap();
//! assert_eq!(grads[0].item(), Some(3.0));
//! assert_eq!(grads[1].item(), Some(1.0));
//! graph.reset();
//! ```

pub mod autograd;
pub mod error;
pub mod graph;
pub mod ops;
pub mod value;

pub use autograd::{check_grad, GradCheckError, Gradients, RestrictionSet};
pub use error::GraphError;
pub use graph::{Evaluation, Feed, Graph, NodeId, NodeInputs, NodeVariant, Targets};
pub use ops::{LocalGradient, OpConfig, Operation};
pub use value::{Element, Value};

// Re-export traits required by public functions/structs
pub use num_traits;

/// Builds a [`Feed`] from `name => value` pairs.
///
/// Values are converted with `Into<Value<_>>`, so plain floats and `Vec`s work too.
#[macro_export]
macro_rules! feed {
    () => {
        $crate::Feed::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut feed = $crate::Feed::new();
        $(
            feed.insert(::std::string::String::from($name), $crate::Value::from($value));
        )+
        feed
    }};
}
