//! End-to-end training properties.

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use qlogic_pqc::{
    AngleConfig, CircuitConfig, CircuitModel, EncodingAxis, EntangledConfig, Entangler,
    LogicGate, ParameterTensor, PqcConfig, TrainingResult, Variant, build_dataset,
    default_config, expval_to_prob, init_params, run_all_experiments, run_angle_experiments,
    run_entangled_experiments, train_gate,
};

fn configs() -> Vec<CircuitConfig> {
    vec![
        PqcConfig::builder()
            .num_blocks(1)
            .seed(3)
            .build()
            .unwrap()
            .into(),
        AngleConfig::builder()
            .num_blocks(1)
            .seed(5)
            .axis(EncodingAxis::Rx)
            .bias(0.3)
            .build()
            .unwrap()
            .into(),
        EntangledConfig::builder()
            .num_blocks(2)
            .seed(9)
            .entangler(Entangler::ISwap)
            .entangle_order(1, 0)
            .build()
            .unwrap()
            .into(),
    ]
}

#[test]
fn parameter_shift_matches_finite_differences() {
    let h = 1e-5;
    for config in configs() {
        let mut model = CircuitModel::new(config).unwrap();
        let data = build_dataset(LogicGate::Nand);
        let params = model.params().clone();
        let (loss, grad) = model.loss_and_gradient(&data, &params).unwrap();
        assert_abs_diff_eq!(loss, model.loss(&data, &params).unwrap(), epsilon = 1e-12);

        for (idx, &value) in params.indexed_iter() {
            let mut plus = params.clone();
            plus[idx] = value + h;
            let mut minus = params.clone();
            minus[idx] = value - h;
            let numeric =
                (model.loss(&data, &plus).unwrap() - model.loss(&data, &minus).unwrap()) / (2.0 * h);
            assert_abs_diff_eq!(grad[idx], numeric, epsilon = 1e-6);
        }
    }
}

#[test]
fn training_reduces_loss() {
    let config: CircuitConfig = PqcConfig::builder()
        .learning_rate(0.05)
        .max_steps(40)
        .num_blocks(1)
        .build()
        .unwrap()
        .into();
    let mut model = CircuitModel::new(config).unwrap();
    // Small tilt on wire 0, away from the stationary point at zero.
    let mut params = ParameterTensor::zeros((1, 2, 3));
    params[[0, 0, 0]] = 0.3;
    model.set_params(params).unwrap();

    let history = model.fit(&build_dataset(LogicGate::Or)).unwrap();
    let first = history[0];
    let last = *history.last().unwrap();
    assert_eq!(history.len(), 40);
    assert!(last < first - 0.02, "loss went from {first} to {last}");
}

#[test]
fn training_stops_at_first_step_below_tolerance() {
    let config: CircuitConfig = PqcConfig::builder()
        .learning_rate(0.05)
        .max_steps(40)
        .num_blocks(1)
        .convergence_tol(0.2)
        .build()
        .unwrap()
        .into();
    let mut model = CircuitModel::new(config).unwrap();
    let mut params = ParameterTensor::zeros((1, 2, 3));
    params[[0, 0, 0]] = 0.3;
    model.set_params(params).unwrap();

    let history = model.fit(&build_dataset(LogicGate::Or)).unwrap();
    let first_below = history.iter().position(|&loss| loss < 0.2).unwrap();
    assert_eq!(history.len(), first_below + 1);
    assert!(history.len() > 1, "already converged at the start: {history:?}");
    assert!(history.len() < 40);
    assert!(history[..first_below].iter().all(|&loss| loss >= 0.2));
}

fn assert_batch(results: &[TrainingResult], variant: Variant) {
    let gates: Vec<_> = results.iter().map(|r| r.gate).collect();
    assert_eq!(gates, LogicGate::ALL.to_vec());
    for result in results {
        assert_eq!(result.variant, variant);
        assert!((1..=2).contains(&result.loss_history.len()));
        assert_eq!(result.predictions.len(), 4);
    }
}

#[test]
fn batch_entry_points_train_every_gate() {
    let plain = PqcConfig::builder().max_steps(2).num_blocks(1).build().unwrap();
    assert_batch(&run_all_experiments(Some(plain)).unwrap(), Variant::Plain);

    let angle = AngleConfig::builder().max_steps(2).num_blocks(1).build().unwrap();
    assert_batch(&run_angle_experiments(Some(angle)).unwrap(), Variant::Angle);

    let entangled = EntangledConfig::builder().max_steps(2).num_blocks(1).build().unwrap();
    assert_batch(&run_entangled_experiments(Some(entangled)).unwrap(), Variant::Entangled);
}

#[test]
fn plain_variant_cannot_see_second_input() {
    // Qubit 1 never touches qubit 0, so rows differing only in bit 1 agree.
    let config: CircuitConfig = PqcConfig::builder().max_steps(5).build().unwrap().into();
    let result = train_gate(LogicGate::Xor, &config).unwrap();
    assert_abs_diff_eq!(result.probabilities[0], result.probabilities[1], epsilon = 1e-9);
    assert_abs_diff_eq!(result.probabilities[2], result.probabilities[3], epsilon = 1e-9);
    assert!(result.accuracy <= 0.5);
}

#[test]
fn same_seed_same_result() {
    let config = default_config(Variant::Angle)
        .unwrap()
        .with_overrides(&qlogic_pqc::ConfigOverrides {
            max_steps: Some(10),
            ..Default::default()
        })
        .unwrap();
    let a = train_gate(LogicGate::And, &config).unwrap();
    let b = train_gate(LogicGate::And, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn shot_based_training_is_reproducible() {
    let config: CircuitConfig = EntangledConfig::builder()
        .num_blocks(1)
        .max_steps(4)
        .shots(Some(200))
        .build()
        .unwrap()
        .into();
    let a = train_gate(LogicGate::Nor, &config).unwrap();
    let b = train_gate(LogicGate::Nor, &config).unwrap();
    assert_eq!(a.loss_history, b.loss_history);
    assert_eq!(a.params, b.params);
    assert!(a.probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
}

#[test]
fn history_never_exceeds_max_steps() {
    for config in configs() {
        let config = config
            .with_overrides(&qlogic_pqc::ConfigOverrides {
                max_steps: Some(7),
                ..Default::default()
            })
            .unwrap();
        let result = train_gate(LogicGate::Xnor, &config).unwrap();
        assert!((1..=7).contains(&result.loss_history.len()));
        assert_eq!(result.converged, result.final_loss < 1e-3);
        if result.loss_history.len() < 7 {
            assert!(result.converged);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn expval_to_prob_is_monotone(a in -1.0f64..=1.0, b in -1.0f64..=1.0) {
        let (pa, pb) = (expval_to_prob(a), expval_to_prob(b));
        prop_assert!((0.0..=1.0).contains(&pa));
        if a <= b {
            prop_assert!(pa >= pb);
        }
    }

    #[test]
    fn probabilities_stay_in_unit_interval(seed in any::<u64>(), shots in prop::option::of(1u32..64)) {
        let config: CircuitConfig = EntangledConfig::builder()
            .seed(seed)
            .shots(shots)
            .build()
            .unwrap()
            .into();
        let mut model = CircuitModel::new(config).unwrap();
        let params: ParameterTensor = init_params(2, 5, seed.wrapping_add(1));
        model.set_params(params).unwrap();
        for sample in build_dataset(LogicGate::And) {
            let p = model.predict_probability(&sample.inputs).unwrap();
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn builder_accepts_exactly_the_valid_settings(
        lr in -1.0f64..1.0,
        tol in -0.5f64..0.5,
        blocks in 0usize..4,
    ) {
        let built = PqcConfig::builder()
            .learning_rate(lr)
            .convergence_tol(tol)
            .num_blocks(blocks)
            .build();
        prop_assert_eq!(built.is_ok(), lr > 0.0 && tol >= 0.0 && blocks >= 1);
    }
}
