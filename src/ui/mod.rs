//! Terminal output: step lines, per-request spinners and the size table
//!
//! Everything falls back to plain text when stdout is not a terminal or a
//! CI environment is detected.
//!
//! # Example
//!
//! ```rust,ignore
//! use package_size::ui::{self, MeasureProgress, SizeRow, UiContext};
//!
//! let ctx = UiContext::detect();
//! let progress = MeasureProgress::new(&ctx, &requests);
//! // ... measure ...
//! progress.clear();
//!
//! println!("{}", ui::render_table(&rows));
//! ui::step_ok_detail(&ctx, "Saved results", "package-size-output.json");
//! ```

mod context;
mod output;
mod progress;
mod table;

pub use context::UiContext;
pub use output::{block, step_error_detail, step_ok, step_ok_detail, step_warn_hint};
pub use progress::MeasureProgress;
pub use table::{format_size, render as render_table, sort_by_gzipped, SizeRow};
