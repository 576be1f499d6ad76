// Fits `y = 0.2 x - 0.5` with plain gradient descent on a tensorgraph graph.
//
// cargo run --example linear_regression

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tensorgraph_core::ops::{MultiplyOp, ReduceSumOp, SquareOp, StopGradientOp, SubtractOp, SumOp};
use tensorgraph_core::{feed, Graph, GraphError, Value};

const TRUE_SCALE: f64 = 0.2;
const TRUE_BIAS: f64 = -0.5;
const LEARNING_RATE: f64 = 0.01;
const ITERATIONS: usize = 5000;
const BATCH_SIZE: usize = 10;

fn main() -> Result<(), GraphError> {
    println!("--- tensorgraph linear regression ---");

    // 1. Graph: pred = input1 * scale + bias, total_error = sum((pred - target)^2)
    let mut graph = Graph::<f64>::new();
    let input = graph.add_source_node("input1");
    let scale = graph.add_source_node("scale");
    let bias = graph.add_source_node("bias");
    let target = graph.add_source_node("target");

    let input_stopped = graph.add_op(StopGradientOp::new(), input)?;
    let target_stopped = graph.add_op(StopGradientOp::new(), target)?;
    let scaled = graph.add_op(MultiplyOp::new(), [input_stopped, scale])?;
    let out = graph.add_op(SumOp::new(), [scaled, bias])?;
    let pred = graph.add_terminal_node(out, "pred")?;
    let error_raw = graph.add_op(SubtractOp::new(), [out, target_stopped])?;
    let error = graph.add_op(SquareOp::new(), error_raw)?;
    let total = graph.add_op(ReduceSumOp::new(), error)?;
    let total_error = graph.add_terminal_node(total, "total_error")?;
    println!("Graph built: {} nodes, {} edges", graph.len(), graph.edge_count());

    // 2. Training loop
    let mut rng = StdRng::seed_from_u64(0);
    let noise = Normal::new(0.0, 0.01).map_err(|e| GraphError::InvalidDistribution(e.to_string()))?;
    let mut var_scale = 0.1;
    let mut var_bias = -0.1;
    println!("true scale = {}, true bias = {}", TRUE_SCALE, TRUE_BIAS);
    println!("initial scale = {}, initial bias = {}", var_scale, var_bias);

    for iteration in 0..ITERATIONS {
        let x = Value::<f64>::rand_uniform(&[BATCH_SIZE], &mut rng);
        let y: Vec<f64> = x
            .data()
            .iter()
            .map(|&xi| xi * TRUE_SCALE + TRUE_BIAS + noise.sample(&mut rng))
            .collect();

        let feed = feed! {
            "input1" => x,
            "scale" => Value::scalar(var_scale),
            "bias" => Value::scalar(var_bias),
            "target" => Value::from_vec(y),
        };
        let loss = graph.eval_terminal(total_error, feed)?;
        let grads = graph.source_gradients(total_error, &[scale, bias])?;
        var_scale -= LEARNING_RATE * grads[0].mean();
        var_bias -= LEARNING_RATE * grads[1].mean();

        if iteration % 1000 == 0 {
            println!("iter {:>4}: total_error = {:.6}", iteration, loss.item().unwrap_or(f64::NAN));
        }
        graph.reset();
    }

    println!("final scale = {:.4}, final bias = {:.4}", var_scale, var_bias);

    // 3. Prediction with the fitted parameters
    let probe = feed! {
        "input1" => Value::from_vec(vec![0.0, 0.5, 1.0]),
        "scale" => Value::scalar(var_scale),
        "bias" => Value::scalar(var_bias),
    };
    println!("pred(0, 0.5, 1) = {}", graph.eval_terminal(pred, probe)?);

    Ok(())
}
