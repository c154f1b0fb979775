//! Artifacts command - register build outputs

use crate::cli::args::ArtifactsArgs;
use crate::config::{Config, ConfigManager};
use crate::error::{GobiError, GobiResult};
use crate::module::{checksum, GoCli, GoModule};
use crate::ui::{self, ChecksumProgress, UiContext};

/// Execute the artifacts command
pub async fn execute(args: ArtifactsArgs, config: &Config) -> GobiResult<()> {
    let ui = UiContext::detect();
    let ctx = args.build.context(config);

    // Fail before touching any file
    if !ctx.name_and_number_provided() {
        return Err(GobiError::BuildNotConfigured {
            action: "add artifacts",
        });
    }

    let toolchain = GoCli::new(config.go.binary.clone()).with_cache_root(config.go.cache_root.clone());
    let store = ConfigManager::build_store(config);
    let mut module = GoModule::new(&ctx, &toolchain, &store, args.path).await?;
    if let Some(name) = args.module {
        module.set_name(name);
    }

    let progress = ChecksumProgress::new(&ui, args.files.len() as u64);
    let mut artifacts = Vec::with_capacity(args.files.len());
    for file in &args.files {
        if !file.is_file() {
            progress.finish();
            return Err(GobiError::PathNotFound(file.clone()));
        }
        let artifact = checksum::artifact(file)?;
        progress.on_file(&artifact.name);
        artifacts.push(artifact);
    }
    progress.finish();

    let count = artifacts.len();
    module.add_artifacts(artifacts).await?;
    ui::step_ok(
        &ui,
        &format!("Registered {} artifact(s) for {}", count, module.name()),
    );

    Ok(())
}
