//! Progress bars shared by the workers of one session.

use super::style::ProgressOptions;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};

/// Coordinates the task-count bar and the per-fetch byte bars.
#[derive(Debug)]
pub struct ProgressDisplay {
    multi: MultiProgress,
    main: ProgressBar,
    options: ProgressOptions,
}

impl ProgressDisplay {
    pub fn new(options: ProgressOptions, total_tasks: usize) -> Self {
        let multi = if options.enabled {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };
        let main = multi.add(options.main_bar(total_tasks as u64));
        main.tick();
        Self {
            multi,
            main,
            options,
        }
    }

    /// A byte bar for one fetch; `size` is unknown for chunked responses.
    pub fn child(&self, name: &str, size: Option<u64>) -> ProgressBar {
        let pb = self.multi.add(self.options.child_bar(size.unwrap_or(0)));
        pb.set_message(name.to_string());
        pb
    }

    pub fn finish_child(&self, pb: ProgressBar) {
        if self.options.clear_children {
            pb.finish_and_clear();
        } else {
            pb.finish();
        }
    }

    /// Advance the task-count bar by one finished task.
    pub fn task_done(&self) {
        self.main.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.main.position()
    }

    pub fn finish(&self) {
        self.main.finish();
    }
}
