use std::fmt::Display;
use std::process::{Command, Stdio};
use std::str::FromStr;

use crate::maint_config::TestSettings;
use crate::maint_error::MaintError;

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum TestType {
    Unit,
    Integration,
    E2e,
    #[default]
    All,
}

impl TestType {
    pub const NAMES: [&'static str; 4] = ["unit", "integration", "e2e", "all"];

    /// The pytest marker restricting the run, if any
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            TestType::Unit => Some("unit"),
            TestType::Integration => Some("integration"),
            TestType::E2e => Some("e2e"),
            TestType::All => None,
        }
    }
}

impl Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.marker().unwrap_or("all"))
    }
}

impl FromStr for TestType {
    type Err = MaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unit" => Ok(TestType::Unit),
            "integration" => Ok(TestType::Integration),
            "e2e" => Ok(TestType::E2e),
            "all" => Ok(TestType::All),
            _ => Err(MaintError::new(&format!("Unknown test type: {}", s))),
        }
    }
}

/// Builds `<python> -m pytest <tests_dir> -v [-m <marker>] [--cov ...]`
pub fn build_test_command(settings: &TestSettings, test_type: TestType, coverage: bool) -> Command {
    let mut cmd = Command::new(&settings.python);
    cmd.arg("-m").arg("pytest").arg(&settings.tests_dir).arg("-v");

    if let Some(marker) = test_type.marker() {
        cmd.arg("-m").arg(marker);
    }
    if coverage {
        cmd.arg(format!("--cov={}", settings.cov_source))
            .arg("--cov-report=term-missing");
    }
    cmd
}

/// True when the pytest coverage plugin can be imported by the configured interpreter
pub fn coverage_available(settings: &TestSettings) -> bool {
    let status = Command::new(&settings.python)
        .arg("-c")
        .arg("import pytest_cov")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(s) => s.success(),
        Err(e) => {
            log::debug!("Coverage probe failed to start: {}", e);
            false
        }
    }
}

fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().to_string()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().to_string()));
    parts.join(" ")
}

/// Runs the suite with inherited stdio and returns the exit code to hand back to the shell
pub fn run_tests(settings: &TestSettings, test_type: TestType, probe_coverage: bool) -> i32 {
    let coverage = probe_coverage && coverage_available(settings);
    if probe_coverage && !coverage {
        log::info!("pytest-cov not found, running without coverage");
    }

    let mut cmd = build_test_command(settings, test_type, coverage);
    println!("Running {} tests: {}", test_type, describe(&cmd));

    match cmd.status() {
        Ok(status) => status.code().unwrap_or_else(|| {
            log::error!("Test runner was terminated by a signal");
            1
        }),
        Err(e) => {
            eprintln!("Failed to launch test runner {}: {}", settings.python, e);
            1
        }
    }
}
