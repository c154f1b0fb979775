//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{GobiError, GobiResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Keys accepted by `gobi config set`
const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "general.state_dir",
    "go.binary",
    "go.cache_root",
    "build.name",
    "build.number",
    "build.project",
];

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> GobiResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => println!("{}", toml::to_string_pretty(config)?),
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            let mut updated = config.clone();
            set_value(&mut updated, &key, &value)?;
            manager.save(&updated).await?;
            ui::step_ok(&UiContext::detect(), &format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> GobiResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn(
            &ctx,
            &format!("Config already exists at {} (use --force to overwrite)", path.display()),
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());
    Ok(())
}

/// Apply a dot-separated key to the configuration. An empty value clears
/// optional settings.
fn set_value(config: &mut Config, key: &str, value: &str) -> GobiResult<()> {
    let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => match value {
            "text" | "json" => config.general.log_format = value.to_string(),
            _ => {
                return Err(GobiError::User(format!(
                    "Invalid log format: {}. Use text or json",
                    value
                )))
            }
        },
        ["general", "state_dir"] => config.general.state_dir = optional(value).map(PathBuf::from),

        ["go", "binary"] if !value.is_empty() => config.go.binary = value.to_string(),
        ["go", "cache_root"] => config.go.cache_root = optional(value).map(PathBuf::from),

        ["build", "name"] => config.build.name = optional(value),
        ["build", "number"] => config.build.number = optional(value),
        ["build", "project"] => config.build.project = optional(value),

        _ => {
            return Err(GobiError::User(format!(
                "Unknown config key: {} (valid keys: {})",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}
