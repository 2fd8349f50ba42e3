use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const BAR_WIDTH: usize = 20;
const FILLED: char = '█';
const UNFILLED: char = '░';
const EMPTY_MARKER: char = '·';

pub fn progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb.set_message(message.to_string());
    pb
}

/// `1234567` -> `1,234,567`
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Horizontal bar proportional to `value / max`.
///
/// Zero renders as the empty marker; any nonzero value gets at least one
/// filled unit. Halves round to even.
pub fn bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 || value == 0 {
        return format!("{EMPTY_MARKER}{}", " ".repeat(width.saturating_sub(1)));
    }
    let blocks = ((value as f64 / max as f64) * width as f64).round_ties_even() as usize;
    let blocks = blocks.clamp(1, width);
    let mut out = String::with_capacity(width * 3);
    out.extend(std::iter::repeat(FILLED).take(blocks));
    out.extend(std::iter::repeat(UNFILLED).take(width - blocks));
    out
}

/// 12-hour clock label, right-aligned to six columns: ` 12 AM`, `  3 PM`.
pub fn hour_label(hour: usize) -> String {
    match hour {
        0 => " 12 AM".to_string(),
        1..=11 => format!("{hour:3} AM"),
        12 => " 12 PM".to_string(),
        _ => format!("{:3} PM", hour - 12),
    }
}

/// Percentage of `part` in `total`, halves rounded to even; zero when `total` is zero.
pub fn percent(part: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round_ties_even() as u64
}

pub fn parse_duration(input: &str) -> Result<Duration, String> {
    humantime::parse_duration(input).map_err(|e| format!("invalid duration '{input}': {e}"))
}
