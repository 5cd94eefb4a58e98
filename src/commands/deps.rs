//! `autoreadme deps` command.

use crate::config::ProjectConfig;
use crate::context::ServiceContext;
use crate::error::Result;
use crate::readme::ReadmeGenerator;

/// Execute the `deps` command.
///
/// # Errors
///
/// Returns an error if any dependency artifact cannot be produced.
pub async fn run(ctx: &ServiceContext, config: &ProjectConfig) -> Result<()> {
    let artifacts = ReadmeGenerator::new(ctx, config).generate_dependency().await?;
    println!(
        "Wrote {} requirements and {} descriptions to {}",
        artifacts.requirements.len(),
        artifacts.descriptions.len(),
        config.output_dir.display()
    );
    Ok(())
}
