use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use super::{Interaction, SpinnerHandle, SpinnerInteraction};

impl SpinnerInteraction for Interaction {
    fn start_spinner(&self, message: String) -> Result<SpinnerHandle> {
        let spinner = ProgressBar::new_spinner()
            .with_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .context("building the spinner style")?,
            )
            .with_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));

        Ok(SpinnerHandle::new(Box::new(move || {
            spinner.finish_and_clear();
        })))
    }
}
