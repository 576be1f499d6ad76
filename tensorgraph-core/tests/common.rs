use rand::Rng;
use rand_distr::{Distribution, Normal};
use tensorgraph_core::ops::{MultiplyOp, ReduceSumOp, SquareOp, StopGradientOp, SubtractOp, SumOp};
use tensorgraph_core::{Feed, Graph, NodeId, Value};

pub const TRUE_SCALE: f64 = 0.2;
pub const TRUE_BIAS: f64 = -0.5;

// Handles of the one-feature linear regression graph:
// pred = stop(input1) * scale + bias, total_error = reduce_sum((pred - stop(target))^2)
#[allow(dead_code)]
pub struct Regression {
    pub graph: Graph,
    pub input: NodeId,
    pub scale: NodeId,
    pub bias: NodeId,
    pub target: NodeId,
    pub pred: NodeId,
    pub total_error: NodeId,
}

#[allow(dead_code)]
pub fn build_regression_graph() -> Regression {
    let mut graph = Graph::<f64>::new();
    let input = graph.add_source_node("input1");
    let scale = graph.add_source_node("scale");
    let bias = graph.add_source_node("bias");
    let target = graph.add_source_node("target");

    let input_stopped = graph.add_op(StopGradientOp::new(), input).expect("stop input");
    let target_stopped = graph.add_op(StopGradientOp::new(), target).expect("stop target");
    let scaled = graph.add_op(MultiplyOp::new(), [input_stopped, scale]).expect("multiply");
    let out = graph.add_op(SumOp::new(), [scaled, bias]).expect("sum");
    let pred = graph.add_terminal_node(out, "pred").expect("pred terminal");

    let error_raw = graph.add_op(SubtractOp::new(), [out, target_stopped]).expect("subtract");
    let error = graph.add_op(SquareOp::new(), error_raw).expect("square");
    let total = graph.add_op(ReduceSumOp::new(), error).expect("reduce_sum");
    let total_error = graph.add_terminal_node(total, "total_error").expect("total_error terminal");

    Regression {
        graph,
        input,
        scale,
        bias,
        target,
        pred,
        total_error,
    }
}

/// Ten samples of `y = 0.2 x - 0.5 + N(0, 0.01)` with `x ~ U[0, 1)`, fed with the
/// current parameter values.
#[allow(dead_code)]
pub fn sample_feed<R: Rng>(rng: &mut R, scale: f64, bias: f64) -> Feed {
    let noise = Normal::new(0.0, 0.01).expect("valid normal");
    let x = Value::<f64>::rand_uniform(&[10], rng);
    let y: Vec<f64> = x
        .data()
        .iter()
        .map(|&xi| xi * TRUE_SCALE + TRUE_BIAS + noise.sample(rng))
        .collect();

    let mut feed = Feed::new();
    feed.insert("input1".to_string(), x);
    feed.insert("scale".to_string(), Value::scalar(scale));
    feed.insert("bias".to_string(), Value::scalar(bias));
    feed.insert("target".to_string(), Value::from_vec(y));
    feed
}
