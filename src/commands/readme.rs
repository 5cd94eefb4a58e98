//! `autoreadme readme` command.

use crate::config::ProjectConfig;
use crate::context::ServiceContext;
use crate::error::Result;
use crate::readme::ReadmeGenerator;

/// Execute the `readme` command.
///
/// Missing dependency artifacts are reported in the log and are not an error.
///
/// # Errors
///
/// Returns an error if the README request fails or the file cannot be written.
pub async fn run(ctx: &ServiceContext, config: &ProjectConfig) -> Result<()> {
    if let Some(path) = ReadmeGenerator::new(ctx, config).generate_readme().await? {
        println!("{}", path.display());
    }
    Ok(())
}
