//! `autoreadme generate` command, the default.

use crate::config::ProjectConfig;
use crate::context::ServiceContext;
use crate::error::Result;
use crate::readme::ReadmeGenerator;

/// Execute the `generate` command: dependency artifacts, then the README.
///
/// # Errors
///
/// Returns the first error from either stage.
pub async fn run(ctx: &ServiceContext, config: &ProjectConfig) -> Result<()> {
    let generator = ReadmeGenerator::new(ctx, config);
    generator.generate_dependency().await?;
    if let Some(path) = generator.generate_readme().await? {
        println!("{}", path.display());
    }
    Ok(())
}
