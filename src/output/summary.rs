use crate::tally::LetterTally;

/// Renders a tally as a human-readable table with per-letter percentages
pub fn format_tally(tally: &LetterTally) -> String {
    let total = tally.total();
    let mut out = String::from("=== Letter Tally ===\n\n");

    out.push_str("Overview:\n");
    out.push_str(&format!("  Letters: {}\n", tally.len()));
    out.push_str(&format!("  Total entries: {}\n", total));

    if tally.is_empty() {
        return out;
    }

    out.push_str("\nEntries by Letter:\n");
    for (letter, count) in tally.iter() {
        let percentage = if total > 0 {
            (count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        out.push_str(&format!("  {}: {} ({:.1}%)\n", letter, count, percentage));
    }

    out
}

/// Prints a tally to stdout
pub fn print_tally(tally: &LetterTally) {
    print!("{}", format_tally(tally));
}
