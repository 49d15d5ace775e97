//! Rendering a finished search for the terminal or as JSON.

use std::collections::BTreeMap;

use console::style;
use qsearch_grover::{SearchOutcome, theoretical_success_probability};
use qsearch_hal::Counts;
use serde::Serialize;

/// Widest histogram bar, reached by the most frequent outcome.
pub const HISTOGRAM_WIDTH: usize = 50;

/// Machine-readable summary of a search, emitted by `--format json`.
#[derive(Debug, Serialize)]
pub struct SearchReport<'a> {
    pub backend: &'a str,
    pub num_qubits: u32,
    pub marked_index: u64,
    pub expected: String,
    pub most_frequent: Option<&'a str>,
    pub found: bool,
    pub success_rate: f64,
    pub theoretical_success_probability: f64,
    pub circuit_depth: usize,
    pub shots: u32,
    /// Ordered by bit-string.
    pub counts: BTreeMap<&'a str, u64>,
    pub execution_time_ms: Option<u64>,
    pub metadata: &'a serde_json::Map<String, serde_json::Value>,
}

impl<'a> SearchReport<'a> {
    pub fn new(outcome: &'a SearchOutcome, backend: &'a str) -> Self {
        let result = &outcome.result;
        Self {
            backend,
            num_qubits: outcome.num_qubits,
            marked_index: outcome.marked_index,
            expected: outcome.expected_bitstring(),
            most_frequent: result.counts.most_frequent().map(|(bits, _)| bits),
            found: outcome.found(),
            success_rate: outcome.success_rate(),
            theoretical_success_probability: theoretical_success_probability(outcome.num_qubits),
            circuit_depth: outcome.circuit.depth(),
            shots: result.shots,
            counts: result.counts.iter().collect(),
            execution_time_ms: result.execution_time_ms,
            metadata: &result.metadata,
        }
    }
}

/// `Result Counts: {"00": 3, ...}` with keys in bit-string order.
pub fn render_counts(counts: &Counts) -> String {
    let body = counts
        .sorted_by_bitstring()
        .into_iter()
        .map(|(bits, count)| format!("\"{bits}\": {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Result Counts: {{{body}}}")
}

/// One bar per outcome, in bit-string order, scaled so the largest count
/// spans [`HISTOGRAM_WIDTH`] cells.
pub fn histogram_rows(counts: &Counts) -> Vec<HistogramRow<'_>> {
    let total = counts.total_shots();
    let max = counts.iter().map(|(_, c)| c).max().unwrap_or(0);

    counts
        .sorted_by_bitstring()
        .into_iter()
        .map(|(bitstring, count)| {
            let bar_len = if max == 0 {
                0
            } else {
                ((count as f64 / max as f64) * HISTOGRAM_WIDTH as f64).round() as usize
            };
            let percent = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            };
            HistogramRow {
                bitstring,
                count,
                percent,
                bar_len,
            }
        })
        .collect()
}

/// A single histogram line before styling.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramRow<'a> {
    pub bitstring: &'a str,
    pub count: u64,
    pub percent: f64,
    pub bar_len: usize,
}

impl HistogramRow<'_> {
    pub fn bar(&self) -> String {
        "█".repeat(self.bar_len)
    }
}

/// Print counts, histogram and summary with terminal styling.
pub fn print_table(outcome: &SearchOutcome, backend: &str) {
    let result = &outcome.result;
    let expected = outcome.expected_bitstring();

    println!("{}", render_counts(&result.counts));

    println!(
        "\n{} Histogram ({} shots):",
        style("✓").green().bold(),
        result.shots
    );
    for row in histogram_rows(&result.counts) {
        let label = if row.bitstring == expected {
            style(row.bitstring).cyan().bold()
        } else {
            style(row.bitstring).cyan()
        };
        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            label,
            row.count,
            row.percent,
            style(row.bar()).green()
        );
    }

    let most_frequent = result
        .counts
        .most_frequent()
        .map_or_else(|| "-".to_string(), |(bits, _)| bits.to_string());
    let verdict = if outcome.found() {
        style("found").green().bold()
    } else {
        style("not found").red().bold()
    };

    println!("\n{}", style("Summary").bold());
    println!("  Backend:        {backend}");
    println!(
        "  Circuit:        {} qubits, {} clbits, depth {}",
        outcome.circuit.num_qubits(),
        outcome.circuit.num_clbits(),
        outcome.circuit.depth()
    );
    println!(
        "  Marked index:   {} (expected {})",
        outcome.marked_index,
        style(&expected).cyan()
    );
    println!("  Most frequent:  {most_frequent} [{verdict}]");
    println!(
        "  Success rate:   {:.2}% (theory {:.2}%)",
        outcome.success_rate() * 100.0,
        theoretical_success_probability(outcome.num_qubits) * 100.0
    );

    if let Some(time_ms) = result.execution_time_ms {
        println!("  Execution time: {} ms", style(time_ms).yellow());
    }
}

/// Pretty JSON for `--format json`.
pub fn render_json(outcome: &SearchOutcome, backend: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&SearchReport::new(outcome, backend))
}
