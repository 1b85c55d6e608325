use anyhow::Context;
use sinewave::{
    config::TrainConfig, eval::evaluate, plot, prng::PrngKey, train::train,
    train_state::TrainState,
};
use sinewave_core::nn_traits::NumParams;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cfg = TrainConfig::default();
    let root = PrngKey::new(cfg.seed);
    let (root, key) = root.split();

    let state = TrainState::init(key, &cfg).context("failed to initialize the model")?;
    info!(
        params = state.params.num_params(),
        hidden = cfg.hidden,
        epochs = cfg.epochs,
        batch_size = cfg.batch.batch_size,
        time_window = cfg.batch.time_window,
        "training"
    );

    let (state, reports) = train(state, key, &cfg.batch, cfg.epochs, cfg.report_every)
        .context("training failed")?;
    if let Some(last) = reports.last() {
        info!(step = state.step, avg_loss = last.avg_loss, "training finished");
    }

    let (_, key) = root.split();
    let evaluation = evaluate(&state, key, &cfg.batch).context("evaluation failed")?;
    println!("loss: {}", evaluation.loss);
    info!(
        points = evaluation.xs.len(),
        "evaluated the first sequence of a held-out batch"
    );

    plot::show(&evaluation).context("failed to show the plot")
}
