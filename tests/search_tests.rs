use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sweepnet::{
    one_hot, run_sweep, ActivationType, BestModel, Config, Dataset, Error, MetricTrace, Network,
    SweepGrid, SweepOutcome, TrainingParams,
};

fn fabricated_outcome(hidden_size: usize, final_accuracy: f32) -> SweepOutcome {
    let mut rng = StdRng::seed_from_u64(hidden_size as u64);
    let network = Network::new(4, hidden_size, 2, ActivationType::Sigmoid, 0.0, &mut rng).unwrap();
    SweepOutcome {
        network,
        config: Config {
            hidden_size,
            activation: ActivationType::Sigmoid,
            regularization_strength: 0.0,
        },
        trace: MetricTrace {
            train_losses: vec![0.5],
            test_losses: vec![0.5],
            test_accuracies: vec![final_accuracy],
        },
    }
}

fn tiny_dataset() -> Dataset {
    // Four linearly separable samples in two classes, reused as the
    // held-out split to keep the sweep fast and deterministic.
    let images = Array2::from_shape_vec(
        (4, 4),
        vec![
            1.0, 1.0, 0.0, 0.0, //
            0.9, 0.8, 0.1, 0.0, //
            0.0, 0.1, 0.9, 1.0, //
            0.0, 0.0, 1.0, 0.8,
        ],
    )
    .unwrap();
    let labels = one_hot(&[0, 0, 1, 1], 2);
    Dataset {
        train_images: images.clone(),
        train_labels: labels.clone(),
        test_images: images,
        test_labels: labels,
        num_classes: 2,
    }
}

#[test]
fn test_best_model_picks_highest_final_accuracy() {
    let mut best = BestModel::new();
    best.offer(fabricated_outcome(3, 0.70));
    best.offer(fabricated_outcome(5, 0.85));
    best.offer(fabricated_outcome(7, 0.80));

    let winner = best.take().unwrap();
    assert_eq!(winner.config.hidden_size, 5);
    assert_eq!(winner.trace.final_test_accuracy(), Some(0.85));
}

#[test]
fn test_best_model_keeps_first_on_exact_tie() {
    let mut best = BestModel::new();
    best.offer(fabricated_outcome(3, 0.80));
    best.offer(fabricated_outcome(5, 0.80));

    assert_eq!(best.take().unwrap().config.hidden_size, 3);
}

#[test]
fn test_best_model_rejects_zero_accuracy() {
    // The selection threshold starts at zero, so a candidate must strictly
    // beat it.
    let mut best = BestModel::new();
    best.offer(fabricated_outcome(3, 0.0));

    assert!(best.take().is_none());
}

#[test]
fn test_sweep_trains_every_configuration_and_retains_winner_trace() {
    let data = tiny_dataset();
    let grid = SweepGrid {
        hidden_sizes: vec![2, 3],
        activations: vec![ActivationType::Sigmoid],
        regularization_strengths: vec![0.0, 0.01],
    };
    let params = TrainingParams {
        batch_size: 2,
        num_epochs: 10,
        learning_rate: 0.5,
    };
    let mut rng = StdRng::seed_from_u64(21);

    let outcome = run_sweep(&grid, &params, &data, &mut rng).unwrap();
    let outcome = outcome.expect("separable data should beat zero accuracy");

    // The winner carries its own full trace, not the last iteration's
    assert_eq!(outcome.trace.epochs(), 10);
    assert!(outcome.trace.final_test_accuracy().unwrap() > 0.0);
    assert!(grid
        .configurations()
        .iter()
        .any(|c| *c == outcome.config));
    assert_eq!(outcome.network.hidden_size(), outcome.config.hidden_size);
}

#[test]
fn test_sweep_aborts_on_softmax_configuration() {
    // Softmax has no derivative branch, so a grid that selects it fails in
    // training and takes the whole sweep down with a diagnostic naming the
    // configuration and stage.
    let data = tiny_dataset();
    let grid = SweepGrid {
        hidden_sizes: vec![2],
        activations: vec![ActivationType::Softmax],
        regularization_strengths: vec![0.0],
    };
    let mut rng = StdRng::seed_from_u64(22);

    let err = run_sweep(&grid, &TrainingParams::default(), &data, &mut rng).unwrap_err();
    match err {
        Error::Sweep {
            hidden_size,
            activation,
            stage,
            ..
        } => {
            assert_eq!(hidden_size, 2);
            assert_eq!(activation, "softmax");
            assert_eq!(stage, "training");
        }
        other => panic!("expected sweep failure, got {other}"),
    }
}

#[test]
fn test_sweep_failure_names_construction_stage() {
    let data = Dataset {
        num_classes: 0,
        ..tiny_dataset()
    };
    let grid = SweepGrid {
        hidden_sizes: vec![2],
        activations: vec![ActivationType::Sigmoid],
        regularization_strengths: vec![0.0],
    };
    let mut rng = StdRng::seed_from_u64(23);

    let err = run_sweep(&grid, &TrainingParams::default(), &data, &mut rng).unwrap_err();
    match err {
        Error::Sweep { stage, .. } => assert_eq!(stage, "construction"),
        other => panic!("expected sweep failure, got {other}"),
    }
}
