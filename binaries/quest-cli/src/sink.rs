//! Terminal presentation sink

use quest_core::{
    ActionKind, CustomField, DashboardSnapshot, PresentationSink, QuestProgress, RequestTrace,
    ResponseTrace,
};
use serde::Serialize;
use serde_json::{Map, Value};

const BAR_WIDTH: usize = 30;

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unprintable: {e}>"))
}

/// Writes rendering commands to stdout
#[derive(Debug, Default)]
pub struct TerminalSink {
    /// Echo traces and field chips (off for one-shot commands that only want the result)
    verbose: bool,
}

impl TerminalSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl PresentationSink for TerminalSink {
    fn render_base_url(&self, base_url: &str) {
        println!("API: {base_url}");
    }

    fn render_request_trace(&self, trace: &RequestTrace) {
        if self.verbose {
            println!("→ request\n{}", pretty(trace));
        }
    }

    fn render_response_trace(&self, trace: &ResponseTrace) {
        if self.verbose {
            println!("← response\n{}", pretty(trace));
        }
    }

    fn render_quest_progress(&self, progress: &QuestProgress, newly_completed: Option<ActionKind>) {
        if let Some(kind) = newly_completed {
            println!(
                "★ Quest complete: {} (+25 XP) · XP {} · quests {}/{}",
                kind.quest_title(),
                progress.xp,
                progress.completed_count,
                ActionKind::ALL.len()
            );
        }
    }

    fn render_custom_fields(&self, fields: &[CustomField], preview: &Map<String, Value>) {
        if !self.verbose {
            return;
        }
        if fields.is_empty() {
            println!("No custom fields.");
        }
        for (idx, field) in fields.iter().enumerate() {
            println!("  [{idx}] {field}");
        }
        println!("payload schema\n{}", pretty(preview));
    }

    fn render_dashboard(&self, snapshot: &DashboardSnapshot) {
        println!(
            "{:<6} {:<20} {:<28} {:>10} {:>8}  extras",
            "id", "name", "description", "price", "qty"
        );
        for row in snapshot.table_rows() {
            println!(
                "{:<6} {:<20} {:<28} {:>10} {:>8}  {}",
                row.id, row.name, row.description, row.price, row.quantity, row.extras
            );
        }
        println!();
        println!("Items: {}", snapshot.item_count);
        println!("Total value: {}", snapshot.total_value_display());

        let series = &snapshot.chart_series;
        if series.is_empty() {
            return;
        }

        println!("\nQuantity");
        let max_qty = series.quantities.iter().cloned().fold(0.0_f64, f64::max);
        for (label, qty) in series.labels.iter().zip(&series.quantities) {
            println!("  {:<20} {} {}", label, bar(*qty, max_qty), qty);
        }

        println!("\nValue share");
        for ((label, value), share) in series
            .labels
            .iter()
            .zip(&series.values)
            .zip(series.value_shares())
        {
            println!("  {:<20} {:>6.1}%  {:.2}", label, share, value);
        }
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.clamp(1, BAR_WIDTH))
}

/// Quest board with every action's state
pub fn quest_board(progress: &QuestProgress, completed: &[(ActionKind, bool)], requests: u64) -> String {
    let mut out = format!(
        "XP {} · quests {}/{} · requests {}\n",
        progress.xp,
        progress.completed_count,
        ActionKind::ALL.len(),
        requests
    );
    for (kind, done) in completed {
        let mark = if *done { "x" } else { " " };
        out.push_str(&format!("  [{mark}] {}\n", kind.quest_title()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0.0, 10.0), "");
        assert_eq!(bar(10.0, 10.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(0.01, 10.0).chars().count(), 1);
    }

    #[test]
    fn test_quest_board() {
        let progress = QuestProgress {
            is_new_credit: false,
            xp: 25,
            completed_count: 1,
        };
        let board = quest_board(
            &progress,
            &[(ActionKind::List, true), (ActionKind::Create, false)],
            3,
        );
        assert!(board.starts_with("XP 25 · quests 1/4 · requests 3"));
        assert!(board.contains("[x] List the items"));
        assert!(board.contains("[ ] Create an item"));
    }
}
