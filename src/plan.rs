use std::fmt::Display;
use std::path::Path;

use lazy_static::lazy_static;
use serde::Deserialize;
use tabled::settings::{object::Rows, Alignment, Modify, Style};

use crate::diagnostics::log_directory_contents;
use crate::maint_config::resolve_target;
use crate::util::{self, Outcome};

lazy_static! {
    /* purge: everything the pipeline produces */
    pub static ref DEFAULT_PURGE_TARGETS: Vec<&'static str> = vec![
        "data/raw",
        "data/staging",
        "data/processed",
        "data/output",
        "logs",
    ];

    /* reset: keep the landing folders, drop the intermediates */
    pub static ref DEFAULT_RESET_CLEAR_TARGETS: Vec<&'static str> = vec![
        "data/raw",
        "data/processed",
    ];
    pub static ref DEFAULT_RESET_REMOVE_TARGETS: Vec<&'static str> = vec![
        "data/staging",
        "data/output",
        "logs",
    ];
}

#[derive(Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Delete the directory itself
    Remove,
    /// Empty the directory, keep the node
    Clear,
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Operation::Remove => "remove",
            Operation::Clear => "clear",
        })
    }
}

impl Operation {
    pub fn apply(&self, path: &Path) -> Result<Outcome, Box<dyn std::error::Error>> {
        match self {
            Operation::Remove => util::remove_dir(path),
            Operation::Clear => util::clear_dir_contents(path),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct CleanupStep {
    pub op: Operation,
    pub path: String,
}

/// An ordered list of cleanup steps, applied one after the other.
#[derive(Debug, Clone, Default)]
pub struct CleanupPlan {
    pub steps: Vec<CleanupStep>,
}

impl CleanupPlan {
    /// Removes every path, in order
    pub fn full_removal<S: AsRef<str>>(paths: &[S]) -> Self {
        Self {
            steps: paths
                .iter()
                .map(|p| CleanupStep {
                    op: Operation::Remove,
                    path: p.as_ref().to_owned(),
                })
                .collect(),
        }
    }

    pub fn from_steps(steps: Vec<CleanupStep>) -> Self {
        Self { steps }
    }

    /// Clears every path in `clear`, then removes every path in `remove`
    pub fn mixed<S: AsRef<str>>(clear: &[S], remove: &[S]) -> Self {
        let clears = clear.iter().map(|p| CleanupStep {
            op: Operation::Clear,
            path: p.as_ref().to_owned(),
        });
        let removes = remove.iter().map(|p| CleanupStep {
            op: Operation::Remove,
            path: p.as_ref().to_owned(),
        });
        Self {
            steps: clears.chain(removes).collect(),
        }
    }

    /// Applies each step in order. The first failing step aborts the run and its error is
    /// returned; steps after it are not attempted.
    ///
    /// With `inspect`, each target is listed at debug level before and after its step.
    pub fn run(
        &self,
        data_root: &Path,
        inspect: bool,
    ) -> Result<Vec<Outcome>, Box<dyn std::error::Error>> {
        log::info!(
            "Running {} cleanup steps under {}",
            self.steps.len(),
            data_root.display()
        );
        let mut outcomes = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let path = resolve_target(data_root, &step.path)?;
            if inspect {
                let _ = log_directory_contents(&path, &format!("pre-{}", step.op));
            }

            outcomes.push(step.op.apply(&path)?);

            if inspect {
                let _ = log_directory_contents(&path, &format!("post-{}", step.op));
            }
        }
        Ok(outcomes)
    }

    /// Renders the plan as a table, with every target resolved against `data_root`
    pub fn render_table(&self, data_root: &Path) -> String {
        let mut builder = tabled::builder::Builder::default();
        let header_record = vec!["#", "Operation", "Target", "Resolved", "Exists"];
        let header_record_count = header_record.len();
        builder.push_record(header_record);

        for (i, step) in self.steps.iter().enumerate() {
            let (resolved, exists) = match resolve_target(data_root, &step.path) {
                Ok(p) => (p.display().to_string(), p.exists().to_string()),
                Err(e) => (format!("<{}>", e), String::default()),
            };
            builder.push_record([
                (i + 1).to_string(),
                step.op.to_string(),
                step.path.to_owned(),
                resolved,
                exists,
            ]);
        }
        if self.steps.is_empty() {
            builder.push_record(["No targets configured"]);
        }

        let mut table = builder.build();
        table
            .with(Style::sharp())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        if self.steps.is_empty() {
            table
                .modify((1, 0), tabled::settings::Span::column(header_record_count))
                .modify((1, 0), Alignment::center());
        }

        table.to_string()
    }
}
