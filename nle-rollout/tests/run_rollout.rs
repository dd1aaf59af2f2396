use anyhow::Result;
use clap::Parser;
use ndarray::{arr1, ArrayD};
use nle_rollout::{run_rollout, RolloutArgs};
use nle_rollout_env::{util::Array, DictEnv, NleEnvConfig, NleInfo, RawStep};
use nle_rollout_policy::{Checkpoint, Mat, Mlp, NetParams, DEFAULT_POLICY_ID};
use std::{collections::BTreeMap, fs, path::Path};
use tempdir::TempDir;
use test_log::test;

const PARAMS: &str = r#"
num_workers: 4
model:
  use_lstm: false
preprocessor:
  channels:
    - key: blstats
      size: 3
      scale: 0.1
env_config:
  flags:
    env: score
    max_num_steps: 100
"#;

/// Episodes of the environment built with seed `s` last `s + 2` steps.
struct CountdownEnv {
    episode_len: usize,
    num_actions: usize,
    t: usize,
}

impl CountdownEnv {
    fn obs(&self) -> Vec<(String, Array)> {
        let glyphs: ArrayD<i16> = arr1(&[0, 1]).into_dyn();
        let blstats: ArrayD<i64> = arr1(&[self.t as i64, 0, 1]).into_dyn();
        vec![
            ("glyphs".to_string(), glyphs.into()),
            ("blstats".to_string(), blstats.into()),
        ]
    }
}

impl DictEnv for CountdownEnv {
    fn create(config: &NleEnvConfig, seed: i64) -> Result<Self> {
        Ok(Self {
            episode_len: seed as usize + 2,
            // Uses the step cap as a knob for the action count.
            num_actions: match config.max_num_steps {
                100 => 5,
                _ => 7,
            },
            t: 0,
        })
    }

    fn observation_keys(&self) -> Vec<String> {
        vec!["glyphs".to_string(), "blstats".to_string()]
    }

    fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn reset(&mut self) -> Result<Vec<(String, Array)>> {
        self.t = 0;
        Ok(self.obs())
    }

    fn step(&mut self, action: i64) -> Result<RawStep> {
        assert!((action as usize) < self.num_actions);
        self.t += 1;
        let is_done = self.t >= self.episode_len;
        Ok(RawStep {
            obs: self.obs(),
            reward: 1.0,
            is_done,
            info: NleInfo {
                end_status: Some(match is_done {
                    true => "DEATH".to_string(),
                    false => "RUNNING".to_string(),
                }),
                is_ascended: false,
            },
        })
    }
}

fn setup(dir: &Path, params: &str) -> Result<String> {
    fs::write(dir.join("params.yaml"), params)?;
    let ckpt_dir = dir.join("checkpoint_000001");
    fs::create_dir_all(&ckpt_dir)?;
    let path = ckpt_dir.join("checkpoint-1");

    let net = NetParams {
        encoder: Mlp {
            ws: vec![Mat::zeros(4, 3)],
            bs: vec![Mat::zeros(4, 1)],
        },
        lstm: None,
        head: Mlp {
            ws: vec![Mat::zeros(5, 4)],
            bs: vec![vec![0.0, 1.0, 0.0, 0.0, 0.0].into()],
        },
    };
    let mut policies = BTreeMap::new();
    policies.insert(DEFAULT_POLICY_ID.to_string(), net);
    Checkpoint {
        algorithm: "a2c".to_string(),
        policies,
    }
    .save(&path)?;
    Ok(path.to_string_lossy().to_string())
}

#[test]
fn test_run_rollout() -> Result<()> {
    let tmp = TempDir::new("run_rollout")?;
    let checkpoint = setup(tmp.path(), PARAMS)?;
    let csv_path = tmp.path().join("episodes.csv");
    let csv_path_str = csv_path.to_string_lossy().to_string();

    let args = RolloutArgs::parse_from(&[
        "nle-rollout",
        "--checkpoint-location",
        checkpoint.as_str(),
        "--batch-size",
        "3",
        "--num-assessments",
        "7",
        "--model-class-name",
        "a2c",
        "--output-csv",
        csv_path_str.as_str(),
    ]);
    assert_eq!(args.seed, 0);
    assert!(!args.print_steps);

    let stats = run_rollout::<CountdownEnv>(&args)?;
    assert_eq!(stats.n_episodes(), 7);
    for (ret, len) in stats.returns.iter().zip(stats.lengths.iter()) {
        assert_eq!(*ret, *len as f32);
        assert!(*len >= 2 && *len <= 4);
    }

    let csv = fs::read_to_string(&csv_path)?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 8);
    assert!(lines[0].starts_with("episode,slot,length,return,end_status,datetime"));
    assert!(lines[1..].iter().all(|l| l.contains("DEATH")));
    Ok(())
}

#[test]
fn test_default_num_assessments() {
    let args = RolloutArgs::parse_from(&[
        "nle-rollout",
        "--checkpoint-location",
        "checkpoint",
        "--batch-size",
        "2",
        "--model-class-name",
        "impala",
    ]);
    assert_eq!(args.num_assessments, 200);
    assert!(RolloutArgs::try_parse_from(&[
        "nle-rollout",
        "--checkpoint-location",
        "checkpoint",
        "--batch-size",
        "2",
        "--model-class-name",
        "sac",
    ])
    .is_err());
}

#[test]
fn test_action_count_mismatch() -> Result<()> {
    let tmp = TempDir::new("run_rollout")?;
    let params = PARAMS.replace("max_num_steps: 100", "max_num_steps: 50");
    let checkpoint = setup(tmp.path(), &params)?;
    let args = RolloutArgs::parse_from(&[
        "nle-rollout",
        "--checkpoint-location",
        checkpoint.as_str(),
        "--batch-size",
        "2",
        "--model-class-name",
        "a2c",
    ]);
    assert!(run_rollout::<CountdownEnv>(&args).is_err());
    Ok(())
}

#[test]
fn test_zero_batch_size() -> Result<()> {
    let tmp = TempDir::new("run_rollout")?;
    let checkpoint = setup(tmp.path(), PARAMS)?;
    let args = RolloutArgs::parse_from(&[
        "nle-rollout",
        "--checkpoint-location",
        checkpoint.as_str(),
        "--batch-size",
        "0",
        "--model-class-name",
        "a2c",
    ]);
    assert!(run_rollout::<CountdownEnv>(&args).is_err());
    Ok(())
}
