//! Construction options of the NetHack environment.
use anyhow::Result;
use nle_rollout_core::error::RolloutError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Task variants of the NetHack Learning Environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NleTask {
    /// Reach the staircase down.
    Staircase,
    /// Maximize the in-game score.
    Score,
    /// Reach the staircase down with the pet.
    Pet,
    /// Find the oracle.
    Oracle,
    /// Collect gold.
    Gold,
    /// Eat.
    Eat,
    /// Explore.
    Scout,
    /// The challenge task, scored on the in-game score.
    Challenge,
}

impl NleTask {
    /// Name of the environment class of the task.
    pub fn class_name(&self) -> &'static str {
        match self {
            NleTask::Staircase => "NetHackStaircase",
            NleTask::Score => "NetHackScore",
            NleTask::Pet => "NetHackStaircasePet",
            NleTask::Oracle => "NetHackOracle",
            NleTask::Gold => "NetHackGold",
            NleTask::Eat => "NetHackEat",
            NleTask::Scout => "NetHackScout",
            NleTask::Challenge => "NetHackChallenge",
        }
    }

    /// Returns `true` if the task ends in a win or a loss, and so accepts
    /// win/lose rewards.
    pub fn has_win_lose(&self) -> bool {
        matches!(self, NleTask::Staircase | NleTask::Pet | NleTask::Oracle)
    }
}

impl FromStr for NleTask {
    type Err = RolloutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staircase" => Ok(NleTask::Staircase),
            "score" => Ok(NleTask::Score),
            "pet" => Ok(NleTask::Pet),
            "oracle" => Ok(NleTask::Oracle),
            "gold" => Ok(NleTask::Gold),
            "eat" => Ok(NleTask::Eat),
            "scout" => Ok(NleTask::Scout),
            "challenge" => Ok(NleTask::Challenge),
            _ => Err(RolloutError::InvalidConfig(format!("unknown task: {}", s))),
        }
    }
}

/// Observation channels requested from the game by default.
pub const DEFAULT_OBSERVATION_KEYS: [&str; 13] = [
    "glyphs",
    "chars",
    "colors",
    "specials",
    "blstats",
    "message",
    "tty_chars",
    "tty_colors",
    "tty_cursor",
    "inv_glyphs",
    "inv_strs",
    "inv_letters",
    "inv_oclasses",
];

/// Configuration of [`NleEnv`](crate::NleEnv).
///
/// Field names follow the `flags` section of a training configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NleEnvConfig {
    /// Task variant.
    pub env: NleTask,

    /// Directory where the game writes its files.
    pub savedir: Option<String>,

    /// Character, e.g., `mon-hum-neu-mal`.
    pub character: String,

    /// Episode step cap.
    pub max_num_steps: usize,

    /// Observation channels requested from the game.
    pub observation_keys: Vec<String>,

    /// Reward added at every step.
    pub penalty_step: f32,

    /// Reward added per unit of in-game time.
    pub penalty_time: f32,

    /// How the step penalty grows, e.g., `constant`.
    pub fn_penalty_step: String,

    /// Reward of winning, used by tasks with a terminal win state.
    pub reward_win: f32,

    /// Reward of losing, used by tasks with a terminal lose state.
    pub reward_lose: f32,

    /// State counter augmentation of the reward, `none` to disable.
    pub state_counter: String,

    /// File of seeds. Not supported.
    pub seedspath: Option<String>,
}

impl Default for NleEnvConfig {
    fn default() -> Self {
        Self {
            env: NleTask::Challenge,
            savedir: None,
            character: "mon-hum-neu-mal".to_string(),
            max_num_steps: 1_000_000,
            observation_keys: DEFAULT_OBSERVATION_KEYS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            penalty_step: -0.01,
            penalty_time: 0.0,
            fn_penalty_step: "constant".to_string(),
            reward_win: 1.0,
            reward_lose: -1.0,
            state_counter: "none".to_string(),
            seedspath: None,
        }
    }
}

/// Arguments passed to the game when constructing an environment.
#[derive(Clone, Debug, PartialEq)]
pub struct NleEnvKwargs {
    /// Directory where the game writes its files.
    pub savedir: Option<String>,
    /// Archive file of recorded episodes. Always disabled.
    pub archivefile: Option<String>,
    /// Character.
    pub character: String,
    /// Episode step cap.
    pub max_episode_steps: usize,
    /// Observation channels.
    pub observation_keys: Vec<String>,
    /// Step penalty.
    pub penalty_step: f32,
    /// Time penalty.
    pub penalty_time: f32,
    /// Penalty mode.
    pub penalty_mode: String,
    /// Win reward, only for tasks with a terminal win state.
    pub reward_win: Option<f32>,
    /// Lose reward, only for tasks with a terminal lose state.
    pub reward_lose: Option<f32>,
    /// State counter, absent when disabled.
    pub state_counter: Option<String>,
}

impl NleEnvConfig {
    /// Sets the task.
    pub fn env(mut self, v: NleTask) -> Self {
        self.env = v;
        self
    }

    /// Sets the save directory.
    pub fn savedir(mut self, v: Option<String>) -> Self {
        self.savedir = v;
        self
    }

    /// Sets the episode step cap.
    pub fn max_num_steps(mut self, v: usize) -> Self {
        self.max_num_steps = v;
        self
    }

    /// Sets the step and time penalties.
    pub fn penalty(mut self, step: f32, time: f32) -> Self {
        self.penalty_step = step;
        self.penalty_time = time;
        self
    }

    /// Sets the win and lose rewards.
    pub fn reward_win_lose(mut self, win: f32, lose: f32) -> Self {
        self.reward_win = win;
        self.reward_lose = lose;
        self
    }

    /// Sets the state counter.
    pub fn state_counter(mut self, v: impl Into<String>) -> Self {
        self.state_counter = v.into();
        self
    }

    /// Sets the file of seeds.
    pub fn seedspath(mut self, v: Option<String>) -> Self {
        self.seedspath = v;
        self
    }

    /// Checks the configuration is supported.
    pub fn check(&self) -> Result<()> {
        if let Some(path) = self.seedspath.as_ref() {
            if !path.is_empty() {
                return Err(RolloutError::NotImplemented("seedspath > 0".to_string()).into());
            }
        }
        if self.observation_keys.is_empty() {
            return Err(RolloutError::InvalidConfig("no observation keys".to_string()).into());
        }
        Ok(())
    }

    /// Returns the arguments of the game for this configuration.
    pub fn kwargs(&self) -> NleEnvKwargs {
        let (reward_win, reward_lose) = match self.env.has_win_lose() {
            true => (Some(self.reward_win), Some(self.reward_lose)),
            false => (None, None),
        };
        let state_counter = match self.state_counter.as_str() {
            "none" => None,
            s => Some(s.to_string()),
        };

        NleEnvKwargs {
            savedir: self.savedir.clone(),
            archivefile: None,
            character: self.character.clone(),
            max_episode_steps: self.max_num_steps,
            observation_keys: self.observation_keys.clone(),
            penalty_step: self.penalty_step,
            penalty_time: self.penalty_time,
            penalty_mode: self.fn_penalty_step.clone(),
            reward_win,
            reward_lose,
            state_counter,
        }
    }
}
