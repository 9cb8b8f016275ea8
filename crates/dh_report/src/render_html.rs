// crates/dh_report/src/render_html.rs
//
// Deterministic, offline HTML renderer. One self-contained page: inline
// style, no scripts, no external assets. Party names and colors are
// user input and are always escaped.

use std::fmt::Write as _;

use crate::ReportModel;

// ------------------------- formatting helpers -------------------------

/// Escape text for HTML (minimal, deterministic).
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Thousands separated with a narrow no-break space (U+202F).
fn fmt_int(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\u{202F}');
        }
        out.push(ch);
    }
    out
}

/// Only `#rgb` / `#rrggbb` pass through to CSS; anything else is dropped.
fn css_color(c: &str) -> Option<&str> {
    let hex = c.strip_prefix('#')?;
    let ok = matches!(hex.len(), 3 | 6) && hex.bytes().all(|b| b.is_ascii_hexdigit());
    ok.then_some(c)
}

// ------------------------- HTML builder -------------------------

pub struct HtmlBuilder {
    buf: String,
}

impl HtmlBuilder {
    pub fn new() -> Self {
        Self { buf: String::with_capacity(8 * 1024) }
    }

    pub fn start(&mut self, title: &str) {
        let _ = write!(
            self.buf,
            "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
             <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\
             <title>{}</title>\
             <style>\
             body{{font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu,Arial,sans-serif;margin:24px;}}\
             h1,h2{{margin:0.2em 0;}}\
             .muted{{opacity:0.5}}\
             .note{{font-style:italic;opacity:0.9}}\
             .swatch{{display:inline-block;width:.8em;height:.8em;border-radius:2px;margin-right:.4em}}\
             table{{border-collapse:collapse}}\
             td,th{{padding:4px 8px;border-bottom:1px solid #ddd;text-align:left}}\
             td.num,th.num{{text-align:right}}\
             </style></head><body>",
            esc(title)
        );
    }

    pub fn finish(mut self) -> String {
        self.buf.push_str("</body></html>");
        self.buf
    }

    pub fn section_cover(&mut self, model: &ReportModel) {
        let t = &model.totals;
        let _ = write!(
            self.buf,
            "<h1>{}</h1><p>{} seats · majority {} · valid votes {} (blank {}) · null {} · cast {}</p>",
            esc(&model.title),
            t.seats,
            model.majority,
            fmt_int(t.valid_votes),
            fmt_int(t.blank_votes),
            fmt_int(t.null_votes),
            fmt_int(t.total_cast),
        );
        if model.threshold.applied {
            let _ = write!(
                self.buf,
                "<p class=\"note\">Threshold {} of valid votes: {} votes needed.</p>",
                esc(&model.threshold.percent),
                fmt_int(model.threshold.min_votes)
            );
        }
    }

    pub fn section_results(&mut self, model: &ReportModel) {
        self.buf.push_str(
            "<h2>Results</h2><table><thead><tr><th>Party</th><th class=\"num\">Votes</th>\
             <th class=\"num\">% votes</th><th class=\"num\">Seats</th><th class=\"num\">% seats</th></tr></thead><tbody>",
        );
        for row in &model.rows {
            let class = if row.below_threshold { " class=\"muted\"" } else { "" };
            let swatch = row
                .color
                .as_deref()
                .and_then(css_color)
                .map(|c| format!("<span class=\"swatch\" style=\"background:{c}\"></span>"))
                .unwrap_or_default();
            let _ = write!(
                self.buf,
                "<tr{class}><td>{swatch}{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
                 <td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
                esc(&row.name),
                fmt_int(row.votes),
                esc(&row.vote_share),
                row.seats,
                esc(&row.seat_share),
            );
        }
        self.buf.push_str("</tbody></table>");
    }

    pub fn section_outcome(&mut self, model: &ReportModel) {
        let text = match (&model.outcome.majority_party, &model.outcome.largest_party) {
            (Some(m), _) => format!("{} holds an absolute majority.", esc(m)),
            (None, Some(l)) => format!("{} is the largest party; no absolute majority.", esc(l)),
            (None, None) => "No seats allocated.".to_string(),
        };
        let _ = write!(self.buf, "<h2>Outcome</h2><p>{text}</p>");
    }
}

impl Default for HtmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Full page: cover, results table, outcome.
pub fn render_html(model: &ReportModel) -> String {
    let mut h = HtmlBuilder::new();
    h.start(&model.title);
    h.section_cover(model);
    h.section_results(model);
    h.section_outcome(model);
    h.finish()
}
