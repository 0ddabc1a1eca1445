//! Sectioning of the model's reply into report fields.
//!
//! The prompt asks for four headings, each alone on its line:
//!
//! ```text
//! ## STATUS
//! ## ACTIONS
//! ## FAST SELLERS
//! ## ADVICE
//! ```
//!
//! Matching ignores case, any number of leading `#`, bold/italic markers and a
//! trailing colon, so `**Fast sellers:**` is recognised too. A line needs a
//! leading `#`, `**` or `__`, or a trailing colon, to count as a heading; a
//! bare `Advice` inside a section is body text. A reply is only
//! treated as structured when all four headings occur; otherwise the whole
//! text becomes the report's advice. Text before the first heading is dropped,
//! and a repeated heading appends to its section.

use kirana_mitra_core::AdvisoryReport;

/// One of the four report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Status,
    Actions,
    FastSellers,
    Advice,
}

impl Section {
    /// All sections, in the order the prompt asks for them.
    pub const ALL: [Self; 4] = [Self::Status, Self::Actions, Self::FastSellers, Self::Advice];

    /// Canonical heading title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Status => "STATUS",
            Self::Actions => "ACTIONS",
            Self::FastSellers => "FAST SELLERS",
            Self::Advice => "ADVICE",
        }
    }

    /// The heading line as it should appear in a reply.
    #[must_use]
    pub fn heading(self) -> String {
        format!("## {}", self.title())
    }
}

/// Recognise a heading line.
fn parse_heading(line: &str) -> Option<Section> {
    let line = line.trim();
    let marked = line.starts_with('#') || line.starts_with("**") || line.starts_with("__");
    let colon = line.trim_end_matches(['*', '_']).trim_end().ends_with(':');
    if !marked && !colon {
        return None;
    }

    let title = line
        .trim_start_matches('#')
        .trim_matches(|c: char| matches!(c, '*' | '_' | ':') || c.is_whitespace());
    let normalized: String = title
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    Section::ALL
        .into_iter()
        .find(|section| section.title() == normalized)
}

/// Lines collected under each heading. `None` until the heading is seen.
#[derive(Default)]
struct Bodies<'a> {
    status: Option<Vec<&'a str>>,
    actions: Option<Vec<&'a str>>,
    fast_sellers: Option<Vec<&'a str>>,
    advice: Option<Vec<&'a str>>,
}

impl<'a> Bodies<'a> {
    fn slot(&mut self, section: Section) -> &mut Option<Vec<&'a str>> {
        match section {
            Section::Status => &mut self.status,
            Section::Actions => &mut self.actions,
            Section::FastSellers => &mut self.fast_sellers,
            Section::Advice => &mut self.advice,
        }
    }
}

/// Split a reply into an [`AdvisoryReport`].
#[must_use]
pub fn parse_reply(raw: &str) -> AdvisoryReport {
    let mut bodies = Bodies::default();
    let mut current: Option<Section> = None;

    for line in raw.lines() {
        if let Some(section) = parse_heading(line) {
            current = Some(section);
            bodies.slot(section).get_or_insert_with(Vec::new);
            continue;
        }
        if let Some(section) = current
            && let Some(body) = bodies.slot(section).as_mut()
        {
            body.push(line);
        }
    }

    let Bodies {
        status: Some(status),
        actions: Some(actions),
        fast_sellers: Some(fast_sellers),
        advice: Some(advice),
    } = bodies
    else {
        return AdvisoryReport::unstructured(raw.trim());
    };

    AdvisoryReport::generated(
        join_body(&status),
        join_body(&actions),
        join_body(&fast_sellers),
        join_body(&advice),
    )
}

fn join_body(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}
