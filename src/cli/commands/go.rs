//! Go command - run go and record the module's build-info

use crate::cli::args::GoArgs;
use crate::config::{Config, ConfigManager};
use crate::error::GobiResult;
use crate::module::{GoCli, GoModule};
use crate::ui::{self, UiContext};

/// Execute the go command
pub async fn execute(args: GoArgs, config: &Config) -> GobiResult<()> {
    let ui = UiContext::detect();
    let ctx = args.build.context(config);
    let toolchain = GoCli::new(config.go.binary.clone()).with_cache_root(config.go.cache_root.clone());
    let store = ConfigManager::build_store(config);

    let mut module = GoModule::new(&ctx, &toolchain, &store, args.path).await?;
    if let Some(name) = args.module {
        module.set_name(name);
    }
    module.set_args(args.go_args);

    match module.build().await? {
        Some(recorded) => ui::step_ok_detail(
            &ui,
            &format!(
                "Recorded {} dependencies for {}",
                recorded.dependencies.len(),
                recorded.id
            ),
            &format!(
                "{}/{}",
                ctx.name().unwrap_or_default(),
                ctx.number().unwrap_or_default()
            ),
        ),
        None => ui::remark(&ui, "No build name and number given, build-info not recorded"),
    }

    Ok(())
}
