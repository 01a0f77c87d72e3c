//! Textual progress bar for verbose dispatch

use std::sync::Arc;

use super::queue::ProgressFn;

/// Cells step by 4%, so a bar has 26 of them (0% through 100%)
const STEP_PERCENT: usize = 4;
const CELLS: usize = 100 / STEP_PERCENT + 1;

pub struct ProgressBar;

impl ProgressBar {
    /// `[####------...] 12.00% completed`
    pub fn render(completed: usize, total: usize) -> String {
        let percent = if total == 0 {
            100.0
        } else {
            completed as f64 / total as f64 * 100.0
        };

        let mut line = String::with_capacity(CELLS + 24);
        line.push('[');
        for cell in 0..CELLS {
            let threshold = (cell * STEP_PERCENT) as f64;
            line.push(if threshold <= percent { '#' } else { '-' });
        }
        line.push_str(&format!("] {:.2}% completed", percent));
        line
    }

    /// Progress callback printing one bar per completed request to stderr
    pub fn callback() -> Arc<ProgressFn> {
        Arc::new(|completed: usize, total: usize| eprintln!("{}", Self::render(completed, total)))
    }
}
