use crate::error::GraphError;
use crate::feed;
use crate::graph::{Graph, NodeId};
use crate::ops::{
    IdentityOp, MultiplyByConstantOp, MultiplyOp, ReduceSumOp, SquareOp, StopGradientOp, SubtractOp, SumOp,
};
use crate::value::Value;
use approx::assert_relative_eq;

fn scalar_feed(pairs: &[(&str, f64)]) -> crate::graph::Feed {
    pairs
        .iter()
        .map(|&(name, v)| (name.to_string(), Value::scalar(v)))
        .collect()
}

#[test]
fn test_seed_gradient_is_one() {
    let mut graph = Graph::<f64>::new();
    let x = graph.add_source_node("x");
    let t = graph.add_terminal_node(x, "t").unwrap();
    graph.bind_feed(scalar_feed(&[("x", 42.0)]));

    let grads = graph.backward(t, &[t]).unwrap();
    assert_eq!(grads.len(), 1);
    assert_eq!(grads[0][0].item(), Some(1.0));
    assert_eq!(graph.source_gradients(t, &[x]).unwrap()[0].item(), Some(1.0));
}

#[test]
fn test_product_gradients() {
    // t = a * b
    let mut graph = Graph::<f64>::new();
    let a = graph.add_source_node("a");
    let b = graph.add_source_node("b");
    let m = graph.add_op(MultiplyOp::new(), [a, b]).unwrap();
    let t = graph.add_terminal_node(m, "t").unwrap();
    graph.bind_feed(scalar_feed(&[("a", 3.0), ("b", 5.0)]));

    let grads = graph.source_gradients(t, &[a, b]).unwrap();
    assert_eq!(grads[0].item(), Some(5.0));
    assert_eq!(grads[1].item(), Some(3.0));

    // Gradient list of an operation target: one entry per input.
    graph.reset();
    let op_grads = graph.backward(t, &[m]).unwrap();
    assert_eq!(op_grads[0].len(), 2);
    assert_eq!(op_grads[0][0].item(), Some(5.0));
    assert_eq!(op_grads[0][1].item(), Some(3.0));
}

#[test]
fn test_diamond_sums_both_paths() {
    // x feeds both branches: t = 2x + x^2, dt/dx = 2 + 2x
    let mut graph = Graph::<f64>::new();
    let x = graph.add_source_node("x");
    let doubled = graph.add_op(MultiplyByConstantOp::new(2.0), x).unwrap();
    let squared = graph.add_op(SquareOp::new(), x).unwrap();
    let s = graph.add_op(SumOp::new(), [doubled, squared]).unwrap();
    let t = graph.add_terminal_node(s, "t").unwrap();
    graph.bind_feed(scalar_feed(&[("x", 3.0)]));

    let grad = graph.source_gradients(t, &[x]).unwrap();
    assert_relative_eq!(grad[0].item().unwrap(), 8.0);
}

#[test]
fn test_same_input_twice() {
    // t = a * a, dt/da = 2a
    let mut graph = Graph::<f64>::new();
    let a = graph.add_source_node("a");
    let m = graph.add_op(MultiplyOp::new(), [a, a]).unwrap();
    let t = graph.add_terminal_node(m, "t").unwrap();
    graph.bind_feed(scalar_feed(&[("a", 4.0)]));

    let grad = graph.source_gradients(t, &[a]).unwrap();
    assert_eq!(grad[0].item(), Some(8.0));
}

#[test]
fn test_stop_gradient_blocks_flow() {
    // t = stop(x) * w: x gets zero, w gets x.
    let mut graph = Graph::<f64>::new();
    let x = graph.add_source_node("x");
    let w = graph.add_source_node("w");
    let stopped = graph.add_op(StopGradientOp::new(), x).unwrap();
    let m = graph.add_op(MultiplyOp::new(), [stopped, w]).unwrap();
    let t = graph.add_terminal_node(m, "t").unwrap();
    graph.bind_feed(scalar_feed(&[("x", 7.0), ("w", 2.0)]));

    let grads = graph.source_gradients(t, &[x, w]).unwrap();
    assert_eq!(grads[0].item(), Some(0.0));
    assert_eq!(grads[1].item(), Some(7.0));
}

#[test]
fn test_off_path_consumers_are_ignored() {
    // `x` also feeds a second terminal; differentiating t1 must not see it.
    let mut graph = Graph::<f64>::new();
    let x = graph.add_source_node("x");
    let sq = graph.add_op(SquareOp::new(), x).unwrap();
    let t1 = graph.add_terminal_node(sq, "t1").unwrap();
    let tripled = graph.add_op(MultiplyByConstantOp::new(3.0), x).unwrap();
    let _t2 = graph.add_terminal_node(tripled, "t2").unwrap();
    graph.bind_feed(scalar_feed(&[("x", 2.0)]));

    let grad = graph.source_gradients(t1, &[x]).unwrap();
    assert_eq!(grad[0].item(), Some(4.0));
    // The off-path node was never visited.
    assert!(graph.input_gradients(tripled).unwrap().is_none());
}

#[test]
fn test_unreachable_target() {
    let mut graph = Graph::<f64>::new();
    let x = graph.add_source_node("x");
    let y = graph.add_source_node("y");
    let sq = graph.add_op(SquareOp::new(), x).unwrap();
    let t = graph.add_terminal_node(sq, "t").unwrap();
    graph.bind_feed(scalar_feed(&[("x", 1.0), ("y", 1.0)]));

    let err = graph.backward(t, &[y]).unwrap_err();
    assert_eq!(
        err,
        GraphError::UnreachableTarget {
            seed: t.index(),
            target: y.index(),
            name: "y".to_string()
        }
    );
}

#[test]
fn test_backward_requires_terminal_seed() {
    let mut graph = Graph::<f64>::new();
    let x = graph.add_source_node("x");
    let sq = graph.add_op(SquareOp::new(), x).unwrap();
    graph.bind_feed(scalar_feed(&[("x", 1.0)]));
    assert!(matches!(
        graph.backward(sq, &[x]),
        Err(GraphError::NotATerminal { .. })
    ));
}

#[test]
fn test_empty_targets() {
    let mut graph = Graph::<f64>::new();
    let x = graph.add_source_node("x");
    let t = graph.add_terminal_node(x, "t").unwrap();
    assert!(graph.backward(t, &[]).unwrap().is_empty());
}

#[test]
fn test_backward_triggers_forward() {
    let mut graph = Graph::<f64>::new();
    let x = graph.add_source_node("x");
    let sq = graph.add_op(SquareOp::new(), x).unwrap();
    let t = graph.add_terminal_node(sq, "t").unwrap();
    graph.bind_feed(scalar_feed(&[("x", 3.0)]));
    assert!(graph.cached_output(sq).unwrap().is_none());

    graph.backward(t, &[x]).unwrap();
    assert_eq!(graph.cached_output(sq).unwrap().and_then(Value::item), Some(9.0));
}

#[test]
fn test_gradient_caches_accumulate_across_calls() {
    let mut graph = Graph::<f64>::new();
    let x = graph.add_source_node("x");
    let sq = graph.add_op(SquareOp::new(), x).unwrap();
    let t = graph.add_terminal_node(sq, "t").unwrap();
    graph.bind_feed(scalar_feed(&[("x", 3.0)]));

    let first = graph.source_gradients(t, &[x]).unwrap();
    let second = graph.source_gradients(t, &[x]).unwrap();
    // Returned values cover one call each.
    assert_eq!(first, second);
    assert_eq!(first[0].item(), Some(6.0));
    // Node caches hold the sum.
    let cached = graph.input_gradients(x).unwrap().unwrap();
    assert_eq!(cached[0].item(), Some(12.0));

    graph.reset();
    graph.bind_feed(scalar_feed(&[("x", 3.0)]));
    graph.source_gradients(t, &[x]).unwrap();
    assert_eq!(graph.input_gradients(x).unwrap().unwrap()[0].item(), Some(6.0));
}

#[test]
fn test_self_gradient_is_recorded() {
    let mut graph = Graph::<f64>::new();
    let x = graph.add_source_node("x");
    let scaled = graph.add_op(MultiplyByConstantOp::new(5.0), x).unwrap();
    let t = graph.add_terminal_node(scaled, "t").unwrap();
    graph.bind_feed(scalar_feed(&[("x", 2.0)]));

    graph.backward(t, &[x]).unwrap();
    assert_eq!(graph.self_gradient(scaled).unwrap().and_then(Value::item), Some(2.0));
    assert!(graph.self_gradient(x).unwrap().is_none());
}

#[test]
fn test_squared_error_gradients_are_elementwise() {
    // loss = sum((w * x - y)^2) over three samples.
    let mut graph = Graph::<f64>::new();
    let x = graph.add_source_node("x");
    let w = graph.add_source_node("w");
    let y = graph.add_source_node("y");
    let x_in = graph.add_op(IdentityOp::new(), x).unwrap();
    let pred = graph.add_op(MultiplyOp::new(), [x_in, w]).unwrap();
    let err = graph.add_op(SubtractOp::new(), [pred, y]).unwrap();
    let sq = graph.add_op(SquareOp::new(), err).unwrap();
    let loss = graph.add_op(ReduceSumOp::new(), sq).unwrap();
    let t = graph.add_terminal_node(loss, "loss").unwrap();

    let feed = feed! {
        "x" => Value::from_vec(vec![1.0, 2.0, 3.0]),
        "w" => Value::scalar(2.0),
        "y" => Value::from_vec(vec![1.0, 1.0, 1.0]),
    };
    let value = graph.eval_terminal(t, feed).unwrap();
    // residuals 1, 3, 5
    assert_eq!(value.item(), Some(35.0));

    let grad_w = graph.source_gradients(t, &[w]).unwrap().remove(0);
    // d/dw per sample: 2 * r_i * x_i
    assert_eq!(grad_w.shape(), &[3]);
    assert_eq!(grad_w.data(), &[2.0, 12.0, 30.0]);
    assert_relative_eq!(grad_w.mean(), 44.0 / 3.0);
}

#[test]
fn test_foreign_target_is_rejected() {
    let mut graph = Graph::<f64>::new();
    let mut other = Graph::<f64>::new();
    let x = graph.add_source_node("x");
    let t = graph.add_terminal_node(x, "t").unwrap();
    let foreign: NodeId = other.add_source_node("x");
    assert!(matches!(
        graph.backward(t, &[foreign]),
        Err(GraphError::UnregisteredNode { .. })
    ));
}
