//! Configuration for the corpus decomposition optimizer
//!
//! Mirrors the declarative-config approach used elsewhere in this family of
//! crates: a serde-backed schema with builder methods, explicit validation,
//! and a YAML entry point for callers that drive runs from config files.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Placement hint for encoder evaluation.
///
/// The algorithm is placement-agnostic; this hint only exists so config files
/// keep a stable schema when an accelerated encoder backend is in play. The
/// ndarray implementation always runs on the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Host CPU (the only backend of this implementation).
    #[default]
    Cpu,
}

/// Configuration for [`CorpusDecomposer`](crate::CorpusDecomposer).
///
/// Defaults are deliberately conservative: a fixed 500-step budget with the
/// plateau threshold disabled, so runs are deterministic and all query rows
/// iterate together for the same number of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplexConfig {
    /// Iteration budget for the projected gradient descent loop.
    #[serde(default = "default_n_steps")]
    pub n_steps: usize,
    /// Learning rate for the descent step on the weight matrix.
    #[serde(default = "default_lr")]
    pub lr: f32,
    /// Loss-improvement threshold for early termination. `0.0` disables the
    /// plateau check and the loop always runs the full budget.
    #[serde(default)]
    pub tol: f32,
    /// Record the loss into the history every this many steps.
    #[serde(default = "default_record_every")]
    pub record_every: usize,
    /// Placement hint, carried but not acted on by the CPU implementation.
    #[serde(default)]
    pub device: Device,
}

fn default_n_steps() -> usize {
    500
}

fn default_lr() -> f32 {
    0.1
}

fn default_record_every() -> usize {
    10
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            n_steps: default_n_steps(),
            lr: default_lr(),
            tol: 0.0,
            record_every: default_record_every(),
            device: Device::Cpu,
        }
    }
}

impl SimplexConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration budget.
    pub fn with_n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = n_steps;
        self
    }

    /// Set the learning rate.
    pub fn with_lr(mut self, lr: f32) -> Self {
        self.lr = lr;
        self
    }

    /// Set the loss-improvement threshold for early termination.
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Set the loss-recording interval.
    pub fn with_record_every(mut self, record_every: usize) -> Self {
        self.record_every = record_every;
        self
    }

    /// Load and validate a config from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| Error::Config {
            field: "simplex".into(),
            message: format!("failed to parse YAML config: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all fields, reporting the first offending one.
    pub fn validate(&self) -> Result<()> {
        if self.n_steps == 0 {
            return Err(Error::Config {
                field: "n_steps".into(),
                message: "iteration budget must be at least 1".into(),
            });
        }
        if !self.lr.is_finite() || self.lr <= 0.0 {
            return Err(Error::Config {
                field: "lr".into(),
                message: format!("learning rate must be finite and positive, got {}", self.lr),
            });
        }
        if !self.tol.is_finite() || self.tol < 0.0 {
            return Err(Error::Config {
                field: "tol".into(),
                message: format!("tolerance must be finite and non-negative, got {}", self.tol),
            });
        }
        if self.record_every == 0 {
            return Err(Error::Config {
                field: "record_every".into(),
                message: "recording interval must be at least 1".into(),
            });
        }
        Ok(())
    }
}
