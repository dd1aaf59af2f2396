use anyhow::Result;
use clap::Parser;
use log::info;
use nle_rollout::{run_rollout, RolloutArgs};
use nle_rollout_env::PyNleEnv;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = RolloutArgs::parse();
    let stats = run_rollout::<PyNleEnv>(&args)?;
    if let (Some(r), Some(l)) = (stats.mean_return(), stats.mean_length()) {
        info!(
            "{} episodes, mean return = {}, mean length = {}",
            stats.n_episodes(),
            r,
            l
        );
    }

    Ok(())
}
