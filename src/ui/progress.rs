//! Progress indicators with CI fallback

use super::context::UiContext;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress over files being checksummed.
///
/// Shows an indicatif bar in interactive mode and one line per file in CI.
pub struct ChecksumProgress {
    bar: Option<ProgressBar>,
}

impl ChecksumProgress {
    pub fn new(ctx: &UiContext, total: u64) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new(total);
            let template = ProgressStyle::default_bar()
                .template("  {spinner:.cyan} Checksumming  {bar:20.cyan/dim} {pos}/{len} {msg:.dim}");
            if let Ok(template) = template {
                bar.set_style(template.progress_chars("━╸─"));
            }
            Some(bar)
        } else {
            None
        };
        Self { bar }
    }

    /// Mark one file as processed
    pub fn on_file(&self, name: &str) {
        match self.bar {
            Some(ref bar) => {
                bar.set_message(name.to_string());
                bar.inc(1);
            }
            None => println!("  checksummed {}", name),
        }
    }

    /// Finish and clear the progress bar
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_progress_non_interactive() {
        let ctx = UiContext::non_interactive();
        let progress = ChecksumProgress::new(&ctx, 2);
        progress.on_file("app");
        progress.on_file("app.sbom.json");
        progress.finish();
    }
}
