use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Spinner shown between sending a request and the first delta (or the
/// blocking response) arriving.
///
/// Drawn on stderr so piped stdout stays clean; cleared on drop so an
/// early error never leaves a stale line behind.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Creates and starts a spinner with the given message.
    #[allow(clippy::unwrap_used)]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner().with_message(message.to_string());
        // unwrap is safe: template string is a compile-time constant
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠷", "⠯", "⠟", "⠻", "⠽", "⠾"])
                .template("{spinner} {msg}")
                .unwrap(),
        );
        bar.enable_steady_tick(TICK_INTERVAL);

        Self { bar }
    }

    /// Stops the spinner and clears it from the terminal.
    pub fn stop(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
