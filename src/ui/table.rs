//! Size table rendering

use crate::cache::SizeRecord;
use bytesize::ByteSize;
use console::{pad_str, style, Alignment};

/// One table row: a measured group or a failed one
#[derive(Debug, Clone)]
pub enum SizeRow {
    Measured(SizeRecord),
    Failed(String),
}

impl SizeRow {
    fn gzipped(&self) -> Option<u64> {
        match self {
            Self::Measured(record) => Some(record.gzipped_size),
            Self::Failed(_) => None,
        }
    }
}

/// Human-readable byte size
pub fn format_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

/// Order rows by gzipped size, smallest first. Failed rows go last.
pub fn sort_by_gzipped(rows: &mut [SizeRow]) {
    rows.sort_by_key(|row| row.gzipped().unwrap_or(u64::MAX));
}

/// Render the package/size/minified/gzipped table
pub fn render(rows: &[SizeRow]) -> String {
    let header = ["package", "size", "minified", "gzipped"]
        .map(|h| style(h).bold().to_string())
        .to_vec();

    let mut cells: Vec<Vec<String>> = vec![header];
    for row in rows {
        cells.push(match row {
            SizeRow::Measured(record) => vec![
                style(record.display_name()).yellow().to_string(),
                format_size(record.raw_size),
                format_size(record.minified_size),
                format_size(record.gzipped_size),
            ],
            SizeRow::Failed(name) => vec![
                style(name).yellow().to_string(),
                style("failed").red().to_string(),
                String::new(),
                String::new(),
            ],
        });
    }

    let widths: Vec<usize> = (0..4)
        .map(|col| {
            cells
                .iter()
                .map(|row| console::measure_text_width(&row[col]))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::from("\n");
    for row in &cells {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| pad_str(cell, width, Alignment::Left, None).to_string())
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
