//! Terminal output helpers
//!
//! Uses `cliclack` for styled output and prompts in interactive terminals,
//! with plain `[OK]` / `[WARN]` lines when running in CI or piped.

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{remark, step_info, step_ok, step_ok_detail, step_warn};
pub use progress::ChecksumProgress;
pub use prompts::confirm;
