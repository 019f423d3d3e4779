use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::maint_error::MaintError;
use crate::plan::{
    CleanupPlan, CleanupStep, DEFAULT_PURGE_TARGETS, DEFAULT_RESET_CLEAR_TARGETS, DEFAULT_RESET_REMOVE_TARGETS,
};

#[derive(Deserialize, Debug, Default)]
pub struct MaintConfig {
    /// Base directory for relative target paths. Defaults to the working directory.
    pub data_root: Option<String>,

    /// Targets removed entirely by `purge`
    pub purge: Option<Vec<String>>,

    /// Targets handled by `reset`: the `clear` list is emptied in place first, then the
    /// `remove` list is deleted
    pub reset: Option<ResetTargets>,

    /// Free-form ordered steps run by `run`
    #[serde(default)]
    pub steps: Vec<CleanupStep>,

    pub log_level: Option<MaintLogLevel>,

    #[serde(default)]
    pub tests: TestSettings,
}

#[derive(Deserialize, Debug, Default)]
pub struct ResetTargets {
    #[serde(default)]
    pub clear: Vec<String>,
    #[serde(default)]
    pub remove: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TestSettings {
    /// Interpreter used to launch pytest
    pub python: String,
    pub tests_dir: String,
    /// Package measured by `--cov`
    pub cov_source: String,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            python: "python3".to_owned(),
            tests_dir: "tests".to_owned(),
            cov_source: "src".to_owned(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum MaintLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl From<MaintLogLevel> for log::LevelFilter {
    fn from(value: MaintLogLevel) -> Self {
        match value {
            MaintLogLevel::Error => log::LevelFilter::Error,
            MaintLogLevel::Warn => log::LevelFilter::Warn,
            MaintLogLevel::Info => log::LevelFilter::Info,
            MaintLogLevel::Debug => log::LevelFilter::Debug,
            MaintLogLevel::Trace => log::LevelFilter::Trace,
            MaintLogLevel::Off => log::LevelFilter::Off,
        }
    }
}

impl MaintConfig {
    /// Loads the config file at `path`. A missing file yields the built-in defaults.
    ///
    /// `.json5` files are parsed as JSON5, anything else as plain JSON.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            log::debug!(
                "No configuration found at {}, using defaults",
                path.display()
            );
            return Ok(MaintConfig::default());
        }

        log::debug!("Loading configuration from {}", path.display());
        let is_json5 = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json5"))
            .unwrap_or(false);

        let config = if is_json5 {
            let text = std::fs::read_to_string(path)?;
            json5::from_str::<MaintConfig>(&text)?
        } else {
            let reader = BufReader::new(File::open(path)?);
            serde_json::from_reader::<_, MaintConfig>(reader)?
        };
        Ok(config)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level
            .map(Into::into)
            .unwrap_or(log::LevelFilter::Debug)
    }

    /// The expanded data root
    pub fn data_root(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        match &self.data_root {
            Some(root) => expand(root),
            None => Ok(PathBuf::from(".")),
        }
    }

    pub fn purge_plan(&self) -> CleanupPlan {
        match &self.purge {
            Some(paths) => CleanupPlan::full_removal(paths),
            None => CleanupPlan::full_removal(&*DEFAULT_PURGE_TARGETS),
        }
    }

    pub fn reset_plan(&self) -> CleanupPlan {
        match &self.reset {
            Some(targets) => CleanupPlan::mixed(&targets.clear, &targets.remove),
            None => CleanupPlan::mixed(&*DEFAULT_RESET_CLEAR_TARGETS, &*DEFAULT_RESET_REMOVE_TARGETS),
        }
    }

    pub fn custom_plan(&self) -> CleanupPlan {
        CleanupPlan::from_steps(self.steps.clone())
    }
}

fn expand(raw: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| MaintError::new(&format!("Failed to expand path {}: {}", raw, e)))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Expands `~` and environment variables in `raw`, then places it under `data_root` unless it
/// is already absolute.
pub(crate) fn resolve_target(
    data_root: &Path,
    raw: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    Ok(data_root.join(expand(raw)?))
}
