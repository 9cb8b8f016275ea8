// Plain-text table for terminals.

use std::fmt::Write as _;

use dh_algo::allocation::QuotientTable;

use crate::ReportModel;

/// Aligned table; rows below the threshold are marked with `*`.
pub fn render_text(model: &ReportModel) -> String {
    let name_w = model.rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0).max("Party".len());
    let votes_w = model
        .rows
        .iter()
        .map(|r| r.votes.to_string().len())
        .max()
        .unwrap_or(0)
        .max("Votes".len());

    let mut out = String::new();
    let t = &model.totals;
    let _ = writeln!(out, "{}", model.title);
    let _ = writeln!(
        out,
        "seats {}  majority {}  valid {}  blank {}  null {}  cast {}",
        t.seats, model.majority, t.valid_votes, t.blank_votes, t.null_votes, t.total_cast
    );
    if model.threshold.applied {
        let _ = writeln!(out, "threshold {} ({} votes)", model.threshold.percent, model.threshold.min_votes);
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "  {:<name_w$}  {:>votes_w$}  {:>7}  {:>5}  {:>7}",
        "Party", "Votes", "% votes", "Seats", "% seats"
    );
    for row in &model.rows {
        let mark = if row.below_threshold { '*' } else { ' ' };
        // Pad by chars, not bytes: names are often accented.
        let pad = name_w - row.name.chars().count();
        let _ = writeln!(
            out,
            "{mark} {}{:pad$}  {:>votes_w$}  {:>7}  {:>5}  {:>7}",
            row.name, "", row.votes, row.vote_share, row.seats, row.seat_share
        );
    }

    if model.rows.iter().any(|r| r.below_threshold) {
        out.push_str("\n* below threshold\n");
    }
    match (&model.outcome.majority_party, &model.outcome.largest_party) {
        (Some(m), _) => {
            let _ = writeln!(out, "\n{m} holds an absolute majority.");
        }
        (None, Some(l)) => {
            let _ = writeln!(out, "\n{l} is the largest party; no absolute majority.");
        }
        (None, None) => out.push_str("\nNo seats allocated.\n"),
    }
    out
}

/// Divisor table: one row per party, one column per divisor. Quotients that
/// won a seat carry their rank in brackets.
pub fn render_quotients(table: &QuotientTable) -> String {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|c| match c.seat_rank {
                    Some(rank) => format!("{:.2} [{rank}]", c.value),
                    None => format!("{:.2}", c.value),
                })
                .collect()
        })
        .collect();

    let name_w = table.rows.iter().map(|r| r.party.chars().count()).max().unwrap_or(0).max("Party".len());
    let col_w = cells.iter().flatten().map(String::len).max().unwrap_or(0).max(4);

    let mut out = String::new();
    let _ = write!(out, "{:<name_w$}  {:>5}", "Party", "Seats");
    for d in 1..=table.seats {
        let _ = write!(out, "  {:>col_w$}", format!("/{d}"));
    }
    out.push('\n');
    for (row, row_cells) in table.rows.iter().zip(&cells) {
        let pad = name_w - row.party.chars().count();
        let _ = write!(out, "{}{:pad$}  {:>5}", row.party, "", row.seats());
        for cell in row_cells {
            let _ = write!(out, "  {cell:>col_w$}");
        }
        out.push('\n');
    }
    if let Some((party, divisor, value)) = &table.last_seat {
        let _ = writeln!(out, "\nlast seat: {party} at {value:.2} (/{divisor})");
    }
    out
}
