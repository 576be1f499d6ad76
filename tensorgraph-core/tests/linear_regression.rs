use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tensorgraph_core::{check_grad, Targets};

mod common;
use common::{build_regression_graph, sample_feed, TRUE_BIAS, TRUE_SCALE};

#[test]
fn test_linear_regression_converges() {
    let mut model = build_regression_graph();
    let mut rng = StdRng::seed_from_u64(42);
    let mut var_scale = 0.1;
    let mut var_bias = -0.1;

    for _ in 0..5000 {
        let feed = sample_feed(&mut rng, var_scale, var_bias);
        model.graph.eval_terminal(model.total_error, feed).unwrap();
        let grads = model
            .graph
            .source_gradients(model.total_error, &[model.scale, model.bias])
            .unwrap();
        // Gradients come back per sample; step on their mean.
        var_scale -= 0.01 * grads[0].mean();
        var_bias -= 0.01 * grads[1].mean();
        model.graph.reset();
    }

    assert_abs_diff_eq!(var_scale, TRUE_SCALE, epsilon = 0.02);
    assert_abs_diff_eq!(var_bias, TRUE_BIAS, epsilon = 0.02);
}

#[test]
fn test_regression_gradients_match_finite_differences() {
    let mut model = build_regression_graph();
    let mut rng = StdRng::seed_from_u64(7);
    let feed = sample_feed(&mut rng, 0.1, -0.1);

    check_grad(&mut model.graph, model.total_error, model.scale, &feed, 1e-6, 1e-5).unwrap();
    check_grad(&mut model.graph, model.total_error, model.bias, &feed, 1e-6, 1e-5).unwrap();
}

#[test]
fn test_data_sources_receive_zero_gradient() {
    let mut model = build_regression_graph();
    let mut rng = StdRng::seed_from_u64(3);
    model.graph.bind_feed(sample_feed(&mut rng, 0.1, -0.1));

    let grads = model
        .graph
        .source_gradients(model.total_error, &[model.input, model.target])
        .unwrap();
    assert!(grads.iter().all(|g| g.data().iter().all(|&v| v == 0.0)));
}

#[test]
fn test_evaluate_reports_both_terminals() {
    let mut model = build_regression_graph();
    let mut rng = StdRng::seed_from_u64(11);
    let result = model
        .graph
        .evaluate(sample_feed(&mut rng, TRUE_SCALE, TRUE_BIAS), Targets::All)
        .unwrap();

    let pred = result.get("pred").unwrap();
    assert_eq!(pred.shape(), &[10]);
    // With the true parameters only the noise is left.
    let total_error = result.get("total_error").unwrap().item().unwrap();
    assert!(total_error < 10.0 * 0.05 * 0.05);
}
