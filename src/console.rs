//! Line-oriented terminal front end: command parsing and text rendering.

use crate::driver::Command;
use crate::metrics::RunningStats;
use crate::types::feed::{format_amount, FeedEntry};
use crate::types::score::{RiskLevel, ScoreResult};
use crate::types::transaction::Transaction;
use anyhow::{bail, Context, Result};
use std::fmt::Write;

pub const USAGE: &str = "\
commands:
  start | pause | reset | stats | quit
  analyze <amount> [avg=<daily average>] [foreign] [high-risk] [declined] [refusals=<n>]";

/// Average daily amount assumed by `analyze` when none is given
pub const DEFAULT_AVG_DAILY_AMOUNT: f64 = 200.0;

const PROGRESS_WIDTH: usize = 30;

/// Parse one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut tokens = line.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(None);
    };

    let command = match keyword.to_ascii_lowercase().as_str() {
        "start" | "s" => Command::Start,
        "pause" | "p" => Command::Pause,
        "reset" | "r" => Command::Reset,
        "stats" => Command::Stats,
        "quit" | "exit" | "q" => Command::Shutdown,
        "analyze" | "a" => Command::Analyze(parse_transaction(tokens)?),
        other => bail!("unknown command '{other}'"),
    };
    Ok(Some(command))
}

fn parse_transaction<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<Transaction> {
    let amount = tokens.next().context("analyze needs an amount")?;
    let amount: f64 = amount
        .parse()
        .with_context(|| format!("invalid amount '{amount}'"))?;
    let mut tx = Transaction::new(amount, DEFAULT_AVG_DAILY_AMOUNT);

    for token in tokens {
        match token.split_once('=') {
            Some(("avg", value)) => {
                tx.avg_daily_amount = value
                    .parse()
                    .with_context(|| format!("invalid average '{value}'"))?;
            }
            Some(("refusals", value)) => {
                tx.refusals_today = value
                    .parse()
                    .with_context(|| format!("invalid refusal count '{value}'"))?;
            }
            None if token == "foreign" => tx.is_foreign = true,
            None if token == "high-risk" => tx.is_high_risk_country = true,
            None if token == "declined" => tx.is_declined = true,
            _ => bail!("unknown analyze option '{token}'"),
        }
    }

    tx.validate()?;
    Ok(tx)
}

/// Verdict banner for a manual analysis
pub fn render_verdict(tx: &Transaction, result: &ScoreResult) -> String {
    let amount = format_amount(tx.amount, 2);
    let (headline, detail) = match result.level {
        RiskLevel::Fraud => (
            format!(
                "⚠️  FRAUD DETECTED!  Probability: {:.1}%  Level: HIGH {}",
                result.score,
                result.level.glyph()
            ),
            format!(
                "🚨 Transaction of ${amount} flagged as FRAUDULENT with a score of {:.1}%",
                result.score
            ),
        ),
        RiskLevel::Suspect => (
            format!(
                "⚠️  SUSPICIOUS TRANSACTION  Probability: {:.1}%  Level: MEDIUM {}",
                result.score,
                result.level.glyph()
            ),
            format!(
                "Transaction of ${amount} requires verification - Score: {:.1}%",
                result.score
            ),
        ),
        RiskLevel::Legitimate => (
            format!(
                "✅ LEGITIMATE TRANSACTION  Fraud probability: {:.1}%  Level: LOW {}",
                result.score,
                result.level.glyph()
            ),
            format!(
                "Transaction of ${amount} validated - Risk score: {:.1}%",
                result.score
            ),
        ),
    };

    let mut out = String::new();
    let _ = writeln!(out, "{headline}");
    let _ = writeln!(out, "{detail}");
    if !result.triggered_rules.is_empty() {
        let _ = writeln!(out, "rules: {}", result.triggered_rules.join(", "));
    }
    out.push_str(&progress_bar(result.fraction()));
    out
}

/// Fixed-width bar for a fraction in `[0, 1]`
pub fn progress_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * PROGRESS_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>5.1}%",
        "█".repeat(filled),
        "░".repeat(PROGRESS_WIDTH - filled),
        fraction.clamp(0.0, 1.0) * 100.0
    )
}

/// Live feed panel: status line, visible rows, statistics footer
pub fn render_feed<'a>(
    visible: impl IntoIterator<Item = &'a FeedEntry>,
    stats: &RunningStats,
    streaming: bool,
) -> String {
    let mut out = String::new();
    if streaming {
        let _ = writeln!(out, "⏱️  LIVE FEED 🟢 streaming");
    } else {
        let _ = writeln!(out, "⏱️  LIVE FEED ⏸️  paused");
    }

    let mut rows = 0;
    for entry in visible {
        let _ = writeln!(out, "  {entry}");
        rows += 1;
    }
    if rows == 0 {
        let _ = writeln!(out, "  type 'start' to stream simulated transactions");
    }

    out.push_str(&stats.summary_line());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("start").unwrap(), Some(Command::Start));
        assert_eq!(parse_command("  PAUSE ").unwrap(), Some(Command::Pause));
        assert_eq!(parse_command("r").unwrap(), Some(Command::Reset));
        assert_eq!(parse_command("stats").unwrap(), Some(Command::Stats));
        assert_eq!(parse_command("quit").unwrap(), Some(Command::Shutdown));
        assert_eq!(parse_command("   ").unwrap(), None);
        assert!(parse_command("launch").is_err());
    }

    #[test]
    fn test_parse_analyze() {
        let command = parse_command("analyze 12000 foreign high-risk refusals=3").unwrap();
        let expected = Transaction::new(12000.0, 200.0)
            .foreign(true)
            .high_risk_country(true)
            .refusals(3);
        assert_eq!(command, Some(Command::Analyze(expected)));

        let command = parse_command("a 50 avg=0 declined").unwrap();
        let expected = Transaction::new(50.0, 0.0).declined(true);
        assert_eq!(command, Some(Command::Analyze(expected)));
    }

    #[test]
    fn test_parse_analyze_rejects_bad_input() {
        assert!(parse_command("analyze").is_err());
        assert!(parse_command("analyze lots").is_err());
        assert!(parse_command("analyze -10").is_err());
        assert!(parse_command("analyze 10 avg=-1").is_err());
        assert!(parse_command("analyze 10 refusals=-1").is_err());
        assert!(parse_command("analyze 10 teleported").is_err());
    }

    #[test]
    fn test_render_verdict() {
        let tx = Transaction::new(12000.0, 200.0);
        let result = ScoreResult {
            score: 97.25,
            level: RiskLevel::Fraud,
            base_score: 107.0,
            triggered_rules: vec!["foreign".to_string()],
        };

        let text = render_verdict(&tx, &result);
        assert!(text.contains("FRAUD DETECTED"));
        assert!(text.contains("$12,000.00"));
        assert!(text.contains("97.2%") || text.contains("97.3%"));
        assert!(text.contains("rules: foreign"));
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0), format!("[{}]   0.0%", "░".repeat(30)));
        assert_eq!(progress_bar(1.0), format!("[{}] 100.0%", "█".repeat(30)));
        assert!(progress_bar(0.5).starts_with(&format!("[{}{}]", "█".repeat(15), "░".repeat(15))));
    }

    #[test]
    fn test_render_feed() {
        let stats = RunningStats::default();
        let empty = render_feed(std::iter::empty(), &stats, false);
        assert!(empty.contains("paused"));
        assert!(empty.contains("type 'start'"));

        let time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        let entries = vec![
            FeedEntry::new(time, 222, 150.0, RiskLevel::Legitimate, 3.0),
            FeedEntry::new(time, 221, 9000.0, RiskLevel::Suspect, 55.0),
        ];
        let panel = render_feed(&entries, &stats, true);
        let lines: Vec<&str> = panel.lines().collect();
        assert!(lines[0].contains("streaming"));
        assert!(lines[1].contains("#222"));
        assert!(lines[2].contains("#221") && lines[2].contains("9,000"));
        assert!(lines[3].starts_with("Analyzed: 0"));
    }
}
