use sinewave::prelude::*;

fn small() -> TrainConfig {
    TrainConfig {
        batch: BatchConfig {
            batch_size: 16,
            ..Default::default()
        },
        hidden: 16,
        epochs: 401,
        adam: AdamConfig {
            lr: 5e-3,
            ..Default::default()
        },
        report_every: 100,
        ..Default::default()
    }
}

#[test]
fn test_training_reduces_loss() {
    let cfg = small();
    let (root, key) = PrngKey::new(cfg.seed).split();
    let state = TrainState::init(key, &cfg).unwrap();
    let (state, reports) = train(state, key, &cfg.batch, cfg.epochs, cfg.report_every).unwrap();

    assert_eq!(state.step, cfg.epochs);
    let epochs: Vec<usize> = reports.iter().map(|p| p.epoch).collect();
    assert_eq!(epochs, vec![0, 100, 200, 300, 400]);

    let first = reports.first().unwrap().avg_loss;
    let last = reports.last().unwrap().avg_loss;
    assert!(last < first, "{first} -> {last}");

    let (_, key) = root.split();
    let eval = evaluate(&state, key, &cfg.batch).unwrap();
    assert_eq!(eval.predictions.len(), cfg.batch.time_window);
    assert!(eval.loss.is_finite());
}

#[test]
fn test_training_is_reproducible() {
    let cfg = TrainConfig {
        epochs: 5,
        report_every: 1,
        ..small()
    };
    let run = || {
        let (_, key) = PrngKey::new(cfg.seed).split();
        let state = TrainState::init(key, &cfg).unwrap();
        train(state, key, &cfg.batch, cfg.epochs, cfg.report_every).unwrap()
    };
    let (a, reports_a) = run();
    let (b, reports_b) = run();
    assert_eq!(reports_a, reports_b);
    assert_eq!(a.params.lstm.w_ih.as_vec(), b.params.lstm.w_ih.as_vec());
    assert_eq!(a.params.head.weight.as_vec(), b.params.head.weight.as_vec());
}
