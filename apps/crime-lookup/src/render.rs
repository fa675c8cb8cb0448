//! Terminal and HTML rendering of lookup results

use std::fmt;

use owo_colors::{OwoColorize, Style};

use crime_core::MatchCandidate;
use crime_types::{OffenseRecord, TriState};

/// Placeholder for an empty ingredient list.
const NOT_SPECIFIED: &str = "Not specified";

/// Status lines shown instead of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    EmptyInput,
    NoMatch(&'a str),
    DatasetUnavailable,
    LoadFailed(&'a str),
}

impl Notice<'_> {
    fn is_error(&self) -> bool {
        !matches!(self, Notice::EmptyInput)
    }
}

impl fmt::Display for Notice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::EmptyInput => f.write_str("Please enter a crime name."),
            Notice::NoMatch(input) => {
                write!(f, "No data found for \"{}\". Try different spellings.", input)
            }
            Notice::DatasetUnavailable => f.write_str("Crime database is empty or failed to load."),
            Notice::LoadFailed(reason) => write!(f, "Failed to load crime data: {}", reason),
        }
    }
}

/// Colors for one theme. With `color` off every style renders as plain text.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    color: bool,
    heading: Style,
    label: Style,
    muted: Style,
    yes: Style,
    no: Style,
    unknown: Style,
    error: Style,
}

impl Palette {
    pub fn dark(color: bool) -> Self {
        Self {
            color,
            heading: Style::new().bold().bright_cyan(),
            label: Style::new().bold().bright_white(),
            muted: Style::new().bright_black(),
            yes: Style::new().bright_green(),
            no: Style::new().bright_red(),
            unknown: Style::new().bright_yellow(),
            error: Style::new().bold().bright_red(),
        }
    }

    pub fn light(color: bool) -> Self {
        Self {
            color,
            heading: Style::new().bold().blue(),
            label: Style::new().bold().black(),
            muted: Style::new().dimmed(),
            yes: Style::new().green(),
            no: Style::new().red(),
            unknown: Style::new().yellow(),
            error: Style::new().bold().red(),
        }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn flag(&self, value: TriState) -> String {
        let style = match value {
            TriState::Yes => self.yes,
            TriState::No => self.no,
            TriState::Unknown => self.unknown,
        };
        self.paint(value.label(), style)
    }
}

/// Output format for the lookup client.
#[derive(Debug, Clone, Copy)]
pub enum Renderer {
    Text(Palette),
    Html,
}

impl Renderer {
    pub fn card(&self, record: &OffenseRecord) -> String {
        match self {
            Renderer::Text(palette) => text_card(record, palette),
            Renderer::Html => html_card(record),
        }
    }

    pub fn suggestions(&self, candidates: &[MatchCandidate<'_>]) -> String {
        match self {
            Renderer::Text(palette) => {
                let mut out = palette.paint("No exact match found. Suggestions:", palette.muted);
                for (i, candidate) in candidates.iter().enumerate() {
                    out.push_str(&format!("\n  {}. {}", i + 1, candidate.record.name));
                }
                out
            }
            Renderer::Html => {
                let items: String = candidates
                    .iter()
                    .map(|c| format!("<li>{}</li>", escape_html(&c.record.name)))
                    .collect();
                format!(
                    "<p class=\"muted\">No exact match found. Suggestions:</p>\n<ol class=\"suggestions\">{}</ol>",
                    items
                )
            }
        }
    }

    pub fn notice(&self, notice: Notice<'_>) -> String {
        match self {
            Renderer::Text(palette) => {
                let style = if notice.is_error() { palette.error } else { palette.muted };
                palette.paint(&notice.to_string(), style)
            }
            Renderer::Html => {
                let class = if notice.is_error() { "error" } else { "muted" };
                format!("<p class=\"{}\">{}</p>", class, escape_html(&notice.to_string()))
            }
        }
    }
}

fn text_card(record: &OffenseRecord, palette: &Palette) -> String {
    let field = |label: &str, value: &str| format!("{} {}", palette.paint(label, palette.label), value);

    let mut lines = vec![
        palette.paint(&record.name.to_uppercase(), palette.heading),
        field("IPC / Act Section:", &record.section),
        field("Punishment:", &record.punishment),
        palette.paint("Ingredients (elements to prove):", palette.label),
    ];

    if record.ingredients.is_empty() {
        lines.push(format!("  {}", palette.paint(NOT_SPECIFIED, palette.muted)));
    } else {
        lines.extend(record.ingredients.iter().map(|i| format!("  • {}", i)));
    }

    lines.push(field("Cognizable:", &palette.flag(record.cognizable)));
    lines.push(field("Bailable:", &palette.flag(record.bailable)));
    lines.push(field("Compoundable:", &palette.flag(record.compoundable)));
    lines.push(field("Description:", &record.description));

    lines.join("\n")
}

fn html_card(record: &OffenseRecord) -> String {
    let ingredients = if record.ingredients.is_empty() {
        format!("<em>{}</em>", NOT_SPECIFIED)
    } else {
        let items: String = record
            .ingredients
            .iter()
            .map(|i| format!("<li>{}</li>", escape_html(i)))
            .collect();
        format!("<ul>{}</ul>", items)
    };

    let flag = |label: &str, value: TriState| {
        format!("  <p><strong>{}:</strong> {}</p>\n", label, value.label())
    };

    let mut html = String::from("<div class=\"crime-card\">\n");
    html.push_str(&format!("  <h2>{}</h2>\n", escape_html(&record.name.to_uppercase())));
    html.push_str(&format!(
        "  <p><strong>IPC / Act Section:</strong> {}</p>\n",
        escape_html(&record.section)
    ));
    html.push_str(&format!(
        "  <p><strong>Punishment:</strong> {}</p>\n",
        escape_html(&record.punishment)
    ));
    html.push_str("  <p><strong>Ingredients (elements to prove):</strong></p>\n");
    html.push_str(&format!("  {}\n", ingredients));
    html.push_str(&flag("Cognizable", record.cognizable));
    html.push_str(&flag("Bailable", record.bailable));
    html.push_str(&flag("Compoundable", record.compoundable));
    html.push_str(&format!(
        "  <p><strong>Description:</strong> {}</p>\n",
        escape_html(&record.description)
    ));
    html.push_str("</div>");
    html
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
