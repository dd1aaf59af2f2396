//! NetHack Learning Environment implemented in Python.
use crate::{util::Array, DictEnv, NleEnvConfig, NleInfo, RawStep};
use anyhow::{anyhow, Result};
use log::info;
use numpy::PyArrayDyn;
use pyo3::{
    types::{IntoPyDict, PyDict, PyTuple},
    PyAny, PyObject, PyResult, Python,
};

/// Converts an observation dictionary into typed channels.
fn to_channels(obs: &PyAny) -> Result<Vec<(String, Array)>> {
    let obs: &PyDict = obs.extract()?;
    obs.iter()
        .map(|(k, v)| -> Result<(String, Array)> {
            let key: String = k.extract()?;
            Ok((key, to_array(v)?))
        })
        .collect()
}

/// Copies a numpy array, keeping its element type.
fn to_array(v: &PyAny) -> Result<Array> {
    if let Ok(a) = v.extract::<&PyArrayDyn<u8>>() {
        Ok(a.to_owned_array().into())
    } else if let Ok(a) = v.extract::<&PyArrayDyn<i16>>() {
        Ok(a.to_owned_array().into())
    } else if let Ok(a) = v.extract::<&PyArrayDyn<i32>>() {
        Ok(a.to_owned_array().into())
    } else if let Ok(a) = v.extract::<&PyArrayDyn<i64>>() {
        Ok(a.to_owned_array().into())
    } else if let Ok(a) = v.extract::<&PyArrayDyn<f32>>() {
        Ok(a.to_owned_array().into())
    } else {
        Err(anyhow!("unsupported observation dtype: {}", v.get_type().name()?))
    }
}

/// Reads the end status and the ascension flag from an info dictionary.
fn to_info(info: &PyAny) -> PyResult<NleInfo> {
    let info: &PyDict = info.extract()?;
    let end_status = match info.get_item("end_status") {
        Some(s) => {
            let s = s.str()?.to_str()?;
            // `StepStatus.DEATH` -> `DEATH`
            Some(s.rsplit('.').next().unwrap_or(s).to_string())
        }
        None => None,
    };
    let is_ascended = match info.get_item("is_ascended") {
        Some(v) => v.extract()?,
        None => false,
    };
    Ok(NleInfo {
        end_status,
        is_ascended,
    })
}

/// A task of the `nle` Python package.
pub struct PyNleEnv {
    env: PyObject,
    obs_keys: Vec<String>,
    num_actions: usize,
}

impl DictEnv for PyNleEnv {
    /// Instantiates the task class from `nle.env.tasks` and seeds it.
    fn create(config: &NleEnvConfig, seed: i64) -> Result<Self> {
        let gil = Python::acquire_gil();
        let py = gil.python();

        let locals = [("sys", py.import("sys")?)].into_py_dict(py);
        let ver = py.eval("sys.version", None, Some(locals))?;
        info!("Initialize PyNleEnv, Python version = {}", ver);

        let kw = config.kwargs();
        let kwargs = PyDict::new(py);
        kwargs.set_item("savedir", kw.savedir)?;
        kwargs.set_item("archivefile", kw.archivefile)?;
        kwargs.set_item("character", kw.character)?;
        kwargs.set_item("max_episode_steps", kw.max_episode_steps)?;
        kwargs.set_item("observation_keys", PyTuple::new(py, &kw.observation_keys))?;
        kwargs.set_item("penalty_step", kw.penalty_step)?;
        kwargs.set_item("penalty_time", kw.penalty_time)?;
        kwargs.set_item("penalty_mode", kw.penalty_mode)?;
        if let Some(v) = kw.reward_win {
            kwargs.set_item("reward_win", v)?;
        }
        if let Some(v) = kw.reward_lose {
            kwargs.set_item("reward_lose", v)?;
        }
        if let Some(v) = kw.state_counter {
            kwargs.set_item("state_counter", v)?;
        }

        let class_name = config.env.class_name();
        let tasks = py.import("nle.env.tasks")?;
        let env = tasks.getattr(class_name)?.call((), Some(kwargs))?;
        if env.hasattr("seed")? {
            env.call_method1("seed", (seed, seed, false))?;
        }

        let num_actions: usize = env.getattr("action_space")?.getattr("n")?.extract()?;
        let spaces: &PyDict = env
            .getattr("observation_space")?
            .getattr("spaces")?
            .extract()?;
        let obs_keys: Vec<String> = spaces.keys().extract()?;
        info!(
            "Created {} with seed {}, {} actions",
            class_name, seed, num_actions
        );

        Ok(Self {
            env: env.into(),
            obs_keys,
            num_actions,
        })
    }

    fn observation_keys(&self) -> Vec<String> {
        self.obs_keys.clone()
    }

    fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn reset(&mut self) -> Result<Vec<(String, Array)>> {
        Python::with_gil(|py| {
            let obs = self.env.call_method0(py, "reset")?;
            to_channels(obs.as_ref(py))
        })
    }

    fn step(&mut self, action: i64) -> Result<RawStep> {
        Python::with_gil(|py| {
            let ret = self.env.call_method1(py, "step", (action,))?;
            let step: &PyTuple = ret.extract(py)?;
            let obs = to_channels(step.get_item(0))?;
            let reward: f32 = step.get_item(1).extract()?;
            let is_done: bool = step.get_item(2).extract()?;
            let info = to_info(step.get_item(3))?;
            Ok(RawStep {
                obs,
                reward,
                is_done,
                info,
            })
        })
    }
}
