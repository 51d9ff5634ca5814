//! Progress indicators with CI fallback

use super::context::UiContext;
use super::table::format_size;
use crate::cache::SizeRecord;
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// One spinner per requested package group.
///
/// Interactive terminals get an indicatif spinner per row; CI and piped
/// output stay silent until the final table.
pub struct MeasureProgress {
    multi: Option<MultiProgress>,
    bars: Vec<ProgressBar>,
}

impl MeasureProgress {
    /// Start spinners for `requests`
    pub fn new(ctx: &UiContext, requests: &[String]) -> Self {
        if !ctx.use_fancy_output() {
            return Self {
                multi: None,
                bars: Vec::new(),
            };
        }

        let multi = MultiProgress::new();
        let spinner_style = ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {prefix:.yellow} {msg:.dim}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");

        let bars = requests
            .iter()
            .map(|request| {
                let bar = multi.add(ProgressBar::new_spinner());
                bar.set_style(spinner_style.clone());
                bar.set_prefix(request.clone());
                bar.set_message("measuring");
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            })
            .collect();

        Self {
            multi: Some(multi),
            bars,
        }
    }

    /// Mark row `index` as measured
    pub fn finish_ok(&self, index: usize, record: &SizeRecord, from_cache: bool) {
        if let Some(bar) = self.bars.get(index) {
            let source = if from_cache { " (cached)" } else { "" };
            bar.finish_with_message(format!(
                "{} gzipped{}",
                format_size(record.gzipped_size),
                source
            ));
        }
    }

    /// Mark row `index` as failed
    pub fn finish_error(&self, index: usize) {
        if let Some(bar) = self.bars.get(index) {
            bar.finish_with_message(style("failed").red().to_string());
        }
    }

    /// Remove every spinner line before the final table is printed
    pub fn clear(&self) {
        for bar in &self.bars {
            bar.finish_and_clear();
        }
        if let Some(ref multi) = self.multi {
            multi.clear().ok();
        }
    }
}
