//! Ranking and rendering of finished benchmark results.

use crate::hashing::AlgorithmName;
use crate::trial::TrialResult;
use crate::utils::format_bytes;

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub algorithm: AlgorithmName,
    pub mean_millis: f64,
    /// `None` when the mean time is zero and the rate is undefined.
    pub bytes_per_second: Option<f64>,
    pub digest_bits: u32,
}

impl AggregateResult {
    pub fn from_trial(result: &TrialResult, file_size: u64) -> Self {
        let mean_millis = result.mean_millis();
        let bytes_per_second = if mean_millis > 0.0 {
            Some(file_size as f64 / (mean_millis / 1000.0))
        } else {
            None
        };

        Self {
            algorithm: result.algorithm,
            mean_millis,
            bytes_per_second,
            digest_bits: result.digest_bits,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub result: AggregateResult,
    pub percent_faster_than_next: Option<f64>,
}

/// Results ordered fastest first.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedReport {
    pub file_size: u64,
    pub entries: Vec<RankedEntry>,
}

/// Sorts results by ascending mean time and compares each one with the
/// next slower entry.
///
/// The sort is stable, so equal means keep their input order.
pub fn rank(results: &[TrialResult], file_size: u64) -> RankedReport {
    let mut aggregates: Vec<AggregateResult> = results
        .iter()
        .map(|r| AggregateResult::from_trial(r, file_size))
        .collect();
    aggregates.sort_by(|a, b| a.mean_millis.total_cmp(&b.mean_millis));

    let percents: Vec<Option<f64>> = (0..aggregates.len())
        .map(|i| {
            let next = aggregates.get(i + 1)?;
            percent_faster(aggregates[i].bytes_per_second?, next.bytes_per_second?)
        })
        .collect();

    let entries = aggregates
        .into_iter()
        .zip(percents)
        .map(|(result, percent_faster_than_next)| RankedEntry {
            result,
            percent_faster_than_next,
        })
        .collect();

    RankedReport { file_size, entries }
}

fn percent_faster(current: f64, next: f64) -> Option<f64> {
    if next <= 0.0 {
        return None;
    }
    let percent = (current - next) / next * 100.0;
    Some((percent * 100.0).round() / 100.0)
}

/// Formats a throughput as e.g. "12.34 MB/s".
pub fn format_speed(bytes_per_second: Option<f64>) -> String {
    match bytes_per_second {
        Some(rate) if rate.is_finite() => format!("{}/s", format_bytes(rate.round() as u64)),
        _ => "n/a".to_string(),
    }
}

impl RankedReport {
    /// Renders the comparison table, or a single line for one algorithm.
    pub fn render(&self) -> String {
        if let [only] = self.entries.as_slice() {
            let r = &only.result;
            return format!(
                "{}: {} ({}-bit digest)\n",
                r.algorithm,
                format_speed(r.bytes_per_second),
                r.digest_bits
            );
        }

        let rows: Vec<[String; 4]> = self
            .entries
            .iter()
            .map(|e| {
                [
                    e.result.algorithm.to_string(),
                    format_speed(e.result.bytes_per_second),
                    e.percent_faster_than_next
                        .map(|p| format!("{:.2}% faster", p))
                        .unwrap_or_default(),
                    e.result.digest_bits.to_string(),
                ]
            })
            .collect();

        let header = ["Algorithm", "Speed", "Compared to next", "Digest size"];
        let mut widths = header.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let line = |cells: [&str; 4]| {
            format!(
                "{:<w0$} | {:>w1$} | {:>w2$} | {:>w3$}",
                cells[0],
                cells[1],
                cells[2],
                cells[3],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
                w3 = widths[3],
            )
        };

        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        let mut lines = vec![line(header), separator.join("-+-")];
        lines.extend(rows.iter().map(|row| {
            line([
                row[0].as_str(),
                row[1].as_str(),
                row[2].as_str(),
                row[3].as_str(),
            ])
        }));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
