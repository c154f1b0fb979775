//! Show command - print recorded build-info

use crate::build_info::BuildInfo;
use crate::cli::args::{OutputFormat, ShowArgs};
use crate::config::{Config, ConfigManager};
use crate::error::GobiResult;

/// Execute the show command
pub async fn execute(args: ShowArgs, config: &Config) -> GobiResult<()> {
    let ctx = args.build.context(config);
    let store = ConfigManager::build_store(config);
    let info = store.build_info(&ctx).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
        OutputFormat::Table => print_table(&info),
    }

    Ok(())
}

fn print_table(info: &BuildInfo) {
    println!(
        "Build {}/{} (started {})",
        info.name,
        info.number,
        info.started.format("%Y-%m-%d %H:%M")
    );

    for module in &info.modules {
        println!();
        println!("Module: {} ({})", module.id, module.kind);
        println!("{:<60} {:<14} {:<10}", "DEPENDENCY", "SHA256", "REQUESTED");
        println!("{}", "-".repeat(86));

        for dep in &module.dependencies {
            let sha = dep.checksum.sha256.get(..12).unwrap_or(&dep.checksum.sha256);
            println!("{:<60} {:<14} {:<10}", dep.id, sha, dep.requested_by.len());
        }

        for artifact in &module.artifacts {
            println!("artifact: {} ({})", artifact.name, artifact.checksum.sha256);
        }
    }

    let total: usize = info.modules.iter().map(|m| m.dependencies.len()).sum();
    println!();
    println!("Total: {} dependencies", total);
}
