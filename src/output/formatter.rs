use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::{RankedEntry, ScoreToken};
use crate::standings::{ClassResult, SailorRecord};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format points without a trailing ".0" (7, 7.5, 7.25)
pub fn format_points(points: f64) -> String {
    format!("{}", points)
}

/// One race cell: the score, the code with its points for non-finishes,
/// "-" when nothing is recorded. Discards are wrapped in parentheses.
pub fn format_race_cell(entry: &RankedEntry, race: usize) -> String {
    let points = entry.race_scores.get(race).copied().unwrap_or(0.0);
    let cell = match entry.tokens.get(race) {
        Some(ScoreToken::Finish(_)) => format_points(points),
        Some(ScoreToken::Absent) | None => "-".to_string(),
        Some(token) => format!("{}({})", token, format_points(points)),
    };

    if entry.is_discarded(race) {
        format!("({})", cell)
    } else {
        cell
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn entrant_label(entry: &RankedEntry) -> String {
    match entry.sail_number.as_deref().filter(|s| !s.is_empty()) {
        Some(sail) => format!("{} {}", sail, entry.display_name()),
        None => entry.display_name().to_string(),
    }
}

/// Format a class classification as a table.
///
/// Columns: rank, sail number and name, one cell per race, net points.
/// The name column shrinks to fit the terminal; pipes get it in full.
pub fn format_leaderboard(class_name: &str, entries: &[RankedEntry], use_colors: bool) -> String {
    let heading = if use_colors {
        class_name.bold().to_string()
    } else {
        class_name.to_string()
    };

    if entries.is_empty() {
        return format!("{}\n  No entrants.", heading);
    }

    let races = entries.iter().map(|e| e.race_scores.len()).max().unwrap_or(0);
    let cells: Vec<Vec<String>> = entries
        .iter()
        .map(|e| (0..races).map(|race| format_race_cell(e, race)).collect())
        .collect();
    let cell_widths: Vec<usize> = (0..races)
        .map(|race| {
            cells
                .iter()
                .map(|row| row[race].chars().count())
                .chain(std::iter::once(format!("R{}", race + 1).len()))
                .max()
                .unwrap_or(1)
        })
        .collect();
    let totals: Vec<String> = entries.iter().map(|e| format_points(e.total_points)).collect();
    let total_width = totals.iter().map(String::len).max().unwrap_or(1).max(3);

    let labels: Vec<String> = entries.iter().map(entrant_label).collect();
    let widest_label = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    // Rank column "999." plus separators between every column
    let separator = "  ";
    let fixed_width = 4
        + separator.len()
        + cell_widths.iter().map(|w| w + 1).sum::<usize>()
        + separator.len()
        + total_width;
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => widest_label.min(width - fixed_width),
        Some(_) => widest_label.min(20),
        None => widest_label,
    };

    let race_header: Vec<String> = cell_widths
        .iter()
        .enumerate()
        .map(|(race, w)| format!("{:>width$}", format!("R{}", race + 1), width = w))
        .collect();
    let header = format!(
        "{:>4}{}{:<name_width$}{} {}{}{:>total_width$}",
        "",
        separator,
        "",
        separator,
        race_header.join(" "),
        separator,
        "Net",
    );

    let mut lines = vec![heading];
    lines.push(if use_colors {
        header.dimmed().to_string()
    } else {
        header
    });

    for (((entry, label), row), total) in entries.iter().zip(&labels).zip(&cells).zip(&totals) {
        let rank = format!("{:>3}.", entry.rank);
        let name = truncate_name(label, name_width);
        let name_padded = format!("{:<width$}", name, width = name_width);
        let race_cols: Vec<String> = row
            .iter()
            .zip(&cell_widths)
            .enumerate()
            .map(|(race, (cell, w))| {
                let padded = format!("{:>width$}", cell, width = w);
                if use_colors && entry.is_discarded(race) {
                    padded.dimmed().to_string()
                } else {
                    padded
                }
            })
            .collect();
        let total_padded = format!("{:>width$}", total, width = total_width);

        if use_colors {
            lines.push(format!(
                "{}{}{}{} {}{}{}",
                rank.dimmed(),
                separator,
                name_padded,
                separator,
                race_cols.join(" "),
                separator,
                total_padded.bold()
            ));
        } else {
            lines.push(format!(
                "{}{}{}{} {}{}{}",
                rank,
                separator,
                name_padded,
                separator,
                race_cols.join(" "),
                separator,
                total_padded
            ));
        }
    }

    lines.join("\n")
}

/// Format a classification as tab-separated values for scripting.
/// Columns: rank, sailor id, name, net points, discarded race (1-based,
/// empty if none), comma-joined race scores. No headers, no colors.
pub fn format_tsv(entries: &[RankedEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let discard = entry
                .discarded_race_index
                .map(|i| (i + 1).to_string())
                .unwrap_or_default();
            let races = entry
                .race_scores
                .iter()
                .map(|p| format_points(*p))
                .collect::<Vec<_>>()
                .join(",");
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                entry.rank,
                entry.sailor_id,
                entry.name.as_deref().unwrap_or(""),
                format_points(entry.total_points),
                discard,
                races
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format classifications as pretty JSON
pub fn format_json(results: &[ClassResult]) -> Result<String> {
    serde_json::to_string_pretty(results).context("Failed to serialize classifications")
}

/// Format podium counts per sailor.
/// Columns: position, name, wins, podiums, starts
pub fn format_standings(records: &[SailorRecord], use_colors: bool) -> String {
    if records.is_empty() {
        return "No results found.".to_string();
    }

    let name_width = records
        .iter()
        .map(|r| r.display_name().chars().count())
        .max()
        .unwrap_or(0)
        .min(40);

    let mut lines = vec![format!(
        "{:>4}  {:<name_width$}  {:>4}  {:>7}  {:>6}",
        "", "Sailor", "Wins", "Podiums", "Starts"
    )];
    if use_colors {
        lines[0] = lines[0].dimmed().to_string();
    }

    for (idx, record) in records.iter().enumerate() {
        let name = truncate_name(record.display_name(), name_width);
        let line = format!(
            "{:>3}.  {:<name_width$}  {:>4}  {:>7}  {:>6}",
            idx + 1,
            name,
            record.wins,
            record.podiums,
            record.starts
        );
        if use_colors && record.wins > 0 {
            lines.push(line.bold().to_string());
        } else {
            lines.push(line);
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::StatusCode;

    fn sample_entry() -> RankedEntry {
        RankedEntry {
            rank: 1,
            sailor_id: "s1".to_string(),
            name: Some("Ann Lee".to_string()),
            sail_number: Some("GBR 7".to_string()),
            total_points: 7.0,
            discarded_race_index: Some(1),
            race_scores: vec![1.0, 9.0, 2.0, 4.0, 0.0],
            tokens: vec![
                ScoreToken::Finish(1.0),
                ScoreToken::Code(StatusCode::Dnc),
                ScoreToken::Finish(2.0),
                ScoreToken::Code(StatusCode::Dsq),
                ScoreToken::Absent,
            ],
            tie_break: vec![0.0, 1.0, 2.0, 4.0],
        }
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(7.0), "7");
        assert_eq!(format_points(0.0), "0");
        assert_eq!(format_points(7.5), "7.5");
        assert_eq!(format_points(7.25), "7.25");
    }

    #[test]
    fn test_format_race_cells() {
        let entry = sample_entry();
        assert_eq!(format_race_cell(&entry, 0), "1");
        assert_eq!(format_race_cell(&entry, 1), "(DNC(9))");
        assert_eq!(format_race_cell(&entry, 3), "DSQ(4)");
        assert_eq!(format_race_cell(&entry, 4), "-");
    }

    #[test]
    fn test_format_leaderboard_empty() {
        let result = format_leaderboard("Finn", &[], false);
        assert_eq!(result, "Finn\n  No entrants.");
    }

    #[test]
    fn test_format_leaderboard() {
        let result = format_leaderboard("Finn", &[sample_entry()], false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines[0], "Finn");
        assert!(lines[1].contains("R1"));
        assert!(lines[1].contains("Net"));
        assert!(lines[2].starts_with("  1."));
        assert!(lines[2].contains("GBR 7 Ann Lee"));
        assert!(lines[2].contains("(DNC(9))"));
        assert!(lines[2].trim_end().ends_with('7'));
    }

    #[test]
    fn test_format_tsv() {
        let result = format_tsv(&[sample_entry()]);
        assert_eq!(result, "1\ts1\tAnn Lee\t7\t2\t1,9,2,4,0");
    }

    #[test]
    fn test_format_tsv_keeps_every_decimal() {
        let mut entry = sample_entry();
        entry.total_points = 7.25;
        entry.race_scores = vec![1.25, 9.0, 2.0, 4.0, 0.0];
        assert_eq!(format_tsv(&[entry]), "1\ts1\tAnn Lee\t7.25\t2\t1.25,9,2,4,0");
    }

    #[test]
    fn test_format_tsv_without_discard() {
        let mut entry = sample_entry();
        entry.discarded_race_index = None;
        entry.name = None;
        assert_eq!(format_tsv(&[entry]), "1\ts1\t\t7\t\t1,9,2,4,0");
    }

    #[test]
    fn test_format_json() {
        let result = ClassResult {
            event: "Spring".to_string(),
            class: "Finn".to_string(),
            entries: vec![sample_entry()],
        };
        let json = format_json(&[result]).unwrap();
        assert!(json.contains("\"class\": \"Finn\""));
        assert!(json.contains("\"discarded_race_index\": 1"));
        assert!(json.contains("\"DNC\""));
    }

    #[test]
    fn test_format_standings() {
        let records = vec![SailorRecord {
            sailor_id: "s1".to_string(),
            name: Some("Ann".to_string()),
            starts: 3,
            wins: 2,
            podiums: 3,
            history: vec![],
        }];
        let result = format_standings(&records, false);
        let lines: Vec<&str> = result.lines().collect();
        assert!(lines[0].contains("Podiums"));
        assert!(lines[1].starts_with("  1."));
        assert!(lines[1].contains("Ann"));
    }

    #[test]
    fn test_format_standings_empty() {
        assert_eq!(format_standings(&[], false), "No results found.");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Short", 10), "Short");
        assert_eq!(truncate_name("A very long name", 8), "A ver...");
        assert_eq!(truncate_name("Abcdef", 2), "Ab");
    }
}
