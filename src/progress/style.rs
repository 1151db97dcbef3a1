//! Progress bar styling.

use indicatif::{ProgressBar, ProgressStyle};

/// Styling for the progress bars of a session.
///
/// The main bar counts finished tasks; one child bar per fetch counts bytes.
/// Bars are hidden unless enabled, so library callers and tests stay quiet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressOptions {
    /// Draw bars at all.
    pub enabled: bool,
    /// Template of the task-count bar.
    pub main_template: String,
    /// Template of the per-fetch byte bars.
    pub child_template: String,
    /// Progress characters shared by both bars.
    pub progress_chars: String,
    /// Remove child bars once their fetch completes.
    pub clear_children: bool,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            main_template: Self::TEMPLATE_TASKS.into(),
            child_template: Self::TEMPLATE_BYTES.into(),
            progress_chars: Self::CHARS_LINE.into(),
            clear_children: true,
        }
    }
}

impl ProgressOptions {
    /// `━━━━━━━━━━━━━━━━╾─────── 11/40 mods eta 00:00:12`
    pub const TEMPLATE_TASKS: &'static str =
        "{bar:40.blue} {pos:>}/{len} mods eta {eta_precise:.blue} {msg}";
    /// `━━━━━━━━━━━━━━━━━━━╾──── 1.2 MiB/4.0 MiB 3.1 MiB/s sodium.jar`
    pub const TEMPLATE_BYTES: &'static str =
        "{bar:40.green/black} {bytes:>11.green}/{total_bytes:<11.green} {bytes_per_sec:>13.red} {msg}";
    pub const CHARS_LINE: &'static str = "━╾╴─";

    /// Visible bars with the default templates.
    pub fn visible() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    fn style(&self, template: &str) -> ProgressStyle {
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(&self.progress_chars)
    }

    pub(crate) fn main_bar(&self, len: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }
        ProgressBar::new(len).with_style(self.style(&self.main_template))
    }

    pub(crate) fn child_bar(&self, len: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }
        ProgressBar::new(len).with_style(self.style(&self.child_template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_by_default() {
        let options = ProgressOptions::default();
        assert!(!options.enabled);
        assert!(options.main_bar(10).is_hidden());
        assert!(options.child_bar(10).is_hidden());
    }

    #[test]
    fn test_bad_template_falls_back() {
        let options = ProgressOptions {
            main_template: "{bar:".into(),
            ..ProgressOptions::visible()
        };
        assert_eq!(options.main_bar(3).length(), Some(3));
    }
}
