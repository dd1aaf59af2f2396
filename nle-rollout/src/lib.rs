//! Batched evaluation of trained NetHack agents.
//!
//! [`run_rollout`] restores the default policy of a checkpoint, builds a batch of
//! environments from the configuration the agent was trained with and runs the
//! policy until the requested number of episodes complete.
use anyhow::Result;
use clap::Parser;
use log::info;
use nle_rollout_core::{
    error::RolloutError,
    record::{BufferedRecorder, Record},
    BatchedRollout, EnvBatch, EnvBuildGuard, RolloutConfig, RolloutStats,
};
use nle_rollout_env::{DictEnv, NleEnv};
use nle_rollout_policy::{load_agent, Algorithm, DEFAULT_POLICY_ID};
use serde::Serialize;
use std::{convert::TryFrom, path::Path, path::PathBuf};

/// Evaluates a trained agent on a batch of NetHack environments.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct RolloutArgs {
    /// Checkpoint file of the agent
    #[arg(long)]
    pub checkpoint_location: PathBuf,

    /// Print every step
    #[arg(long, default_value_t = false)]
    pub print_steps: bool,

    /// Number of environments stepped together
    #[arg(long)]
    pub batch_size: usize,

    /// Number of episodes to complete
    #[arg(long, default_value_t = 200)]
    pub num_assessments: usize,

    /// Algorithm the agent was trained with
    #[arg(long, value_enum)]
    pub model_class_name: Algorithm,

    /// Seed of the first environment, the others get the following seeds
    #[arg(long, default_value_t = 0)]
    pub seed: i64,

    /// Writes the results of every episode to this CSV file
    #[arg(long)]
    pub output_csv: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EpisodeRecord {
    episode: usize,
    slot: usize,
    length: usize,
    #[serde(rename = "return")]
    ret: f32,
    end_status: String,
    datetime: String,
}

impl TryFrom<&Record> for EpisodeRecord {
    type Error = anyhow::Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            episode: record.get_scalar("episode")? as _,
            slot: record.get_scalar("slot")? as _,
            length: record.get_scalar("length")? as _,
            ret: record.get_scalar("return")?,
            end_status: record.get_string("end_status")?,
            datetime: record.get_datetime("datetime")?.to_rfc3339(),
        })
    }
}

fn write_csv(path: &Path, recorder: &BufferedRecorder) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    for record in recorder.iter() {
        wtr.serialize(EpisodeRecord::try_from(record)?)?;
    }
    wtr.flush()?;
    info!("Wrote {} episodes to {:?}", recorder.len(), path);
    Ok(())
}

/// Evaluates the default policy of a checkpoint on environments of type `R`.
pub fn run_rollout<R: DictEnv>(args: &RolloutArgs) -> Result<RolloutStats> {
    fastrand::seed(args.seed as u64);

    let mut trainer = load_agent(&args.checkpoint_location, args.model_class_name)?;
    let policy = trainer.take_policy(DEFAULT_POLICY_ID)?;

    let guard = EnvBuildGuard::new();
    let envs: EnvBatch<NleEnv<R>> =
        EnvBatch::build(trainer.env_config(), args.batch_size, args.seed, &guard)?;
    let num_actions = envs.envs()[0].num_actions();
    if num_actions != policy.num_actions() {
        return Err(RolloutError::InvalidConfig(format!(
            "policy has {} actions, environment has {}",
            policy.num_actions(),
            num_actions
        ))
        .into());
    }

    let config = RolloutConfig::default()
        .num_assessments(args.num_assessments)
        .print_steps(args.print_steps);
    let mut rollout = BatchedRollout::new(config, policy, envs)?;
    let mut recorder = BufferedRecorder::new();
    let stats = rollout.run(&mut recorder)?;

    if let Some(path) = args.output_csv.as_ref() {
        write_csv(path, &recorder)?;
    }
    Ok(stats)
}
