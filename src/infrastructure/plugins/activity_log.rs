use crate::infrastructure::{Mutation, MutationContext, MutationHook};
use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Appends one line per confirmed save or delete to an activity log file
pub struct ActivityLogHook {
    path: PathBuf,
}

impl ActivityLogHook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MutationHook for ActivityLogHook {
    fn on_mutation(&self, context: &MutationContext) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let detail = match &context.mutation {
            Mutation::Saved { mood, chars } => format!(
                "saved - mood: {} - {} characters",
                mood.as_ref().map(|m| m.as_str()).unwrap_or("none"),
                chars
            ),
            Mutation::Deleted => "deleted".to_string(),
        };

        writeln!(
            file,
            "[{}] Entry {} {}",
            context.at.format("%Y-%m-%d %H:%M:%S UTC"),
            context.date,
            detail
        )?;

        Ok(())
    }

    fn name(&self) -> &str {
        "Activity Log"
    }
}
