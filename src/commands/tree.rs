//! `autoreadme tree` command.

use crate::config::ProjectConfig;
use crate::context::ServiceContext;
use crate::error::Result;
use crate::scan::walk_project;

/// Print the project structure as it would appear in `PROJECT_STRUCTURE.md`.
///
/// # Errors
///
/// Returns an error if the project directory cannot be walked.
pub fn run(ctx: &ServiceContext, config: &ProjectConfig) -> Result<()> {
    let (structure, _) = walk_project(ctx.fs.as_ref(), &config.project_dir)?;
    if !structure.is_empty() {
        println!("{}", structure.render());
    }
    Ok(())
}
