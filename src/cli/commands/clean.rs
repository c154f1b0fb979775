//! Clean command - remove recorded build-info

use crate::cli::args::CleanArgs;
use crate::config::{Config, ConfigManager};
use crate::error::GobiResult;
use crate::ui::{self, UiContext};

/// Execute the clean command
pub async fn execute(args: CleanArgs, config: &Config) -> GobiResult<()> {
    let ui = UiContext::detect().with_auto_yes(args.yes);
    let ctx = args.build.context(config);
    let store = ConfigManager::build_store(config);

    // Validates the build identity before prompting
    let dir = store.build_dir(&ctx)?;

    let prompt = format!(
        "Remove recorded build-info for {}/{}?",
        ctx.name().unwrap_or_default(),
        ctx.number().unwrap_or_default()
    );
    if !ui::confirm(&ui, &prompt, false).await? {
        ui::remark(&ui, "Nothing removed (use --yes to skip confirmation)");
        return Ok(());
    }

    let removed = store.clean(&ctx).await?;
    if removed == 0 {
        ui::step_info(&ui, &format!("No build-info recorded in {}", dir.display()));
    } else {
        ui::step_ok(&ui, &format!("Removed {} partial(s)", removed));
    }

    Ok(())
}
