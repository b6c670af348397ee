use crate::error::Result;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_MAX_PASSES: usize = 5;

/// Configuration of the simplification action.
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(default)]
pub struct Environment {
    /// Re-apply the action from each rewritten node until nothing more
    /// simplifies.
    #[serde(default = "enabled")]
    pub fixpoint: bool,
    /// Bound on the number of rewrites performed in fixpoint mode.
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,
    #[serde(default = "disabled")]
    pub debug: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            fixpoint: true,
            max_passes: DEFAULT_MAX_PASSES,
            debug: false,
        }
    }
}

impl Environment {
    pub fn from_file(path: &Path) -> Result<Environment> {
        let file = File::open(path)
            .map_err(|_| format!("Environment file '{}' could not be loaded", path.display()))?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }
}

impl EnvironmentBuilder {
    /// Seeds all builder fields that have not been set explicitly with the
    /// contents of an environment file.
    pub fn from_file(&mut self, path: &Path) -> Result<&mut Self> {
        let env = Environment::from_file(path)?;
        if self.fixpoint.is_none() {
            self.fixpoint = Some(env.fixpoint);
        }
        if self.max_passes.is_none() {
            self.max_passes = Some(env.max_passes);
        }
        if self.debug.is_none() {
            self.debug = Some(env.debug);
        }
        Ok(self)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_yaml::to_string(self).unwrap())
    }
}

fn disabled() -> bool {
    false
}

fn enabled() -> bool {
    true
}

fn default_max_passes() -> usize {
    DEFAULT_MAX_PASSES
}
