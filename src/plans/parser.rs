// ABOUTME: Single-pass parser converting free-text nutrition plans into ordered sections
// ABOUTME: Classifies lines as headings, meal rows, list items or text and groups them per heading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Meal keywords recognized at the start of a meal line (case-insensitive)
pub const MEAL_KEYWORDS: &[&str] = &[
    "Breakfast",
    "Lunch",
    "Dinner",
    "Snack",
    "Mid-Morning",
    "Evening",
    "Pre-Workout",
    "Post-Workout",
];

/// Lines shorter than this that are entirely upper-case count as headings
const SHORT_HEADING_MAX_CHARS: usize = 60;

/// One structured meal entry extracted from a meal line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRow {
    /// Meal keyword exactly as written in the source line
    pub meal: String,
    /// Foods eaten
    pub foods: String,
    /// Portion sizes
    pub portions: String,
    /// Preparation or other notes
    pub notes: String,
}

/// One structural unit of a parsed plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    /// Section title
    Heading {
        /// Title text without markdown markers or trailing colon
        title: String,
    },
    /// Meal table attached to the preceding heading
    MealTable {
        /// Table rows in source order
        rows: Vec<MealRow>,
    },
    /// Unordered list attached to the preceding heading
    BulletList {
        /// Item texts with list markers removed
        items: Vec<String>,
    },
    /// Plain paragraphs
    TextBlock {
        /// One paragraph per source line
        paragraphs: Vec<String>,
    },
}

/// A heading (or the untitled leading text) together with everything filed under it
///
/// Each block carries at most one meal table and one list. This is the render
/// view: title, table, list, paragraphs. Source order lives in [`ParsedPlan::sections`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanBlock {
    /// Heading title, `None` for the generic text section
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Meal rows
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meal_table: Vec<MealRow>,
    /// List items
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<String>,
    /// Paragraph lines
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paragraphs: Vec<String>,
}

impl PlanBlock {
    fn heading(title: String) -> Self {
        Self {
            title: Some(title),
            ..Self::default()
        }
    }

    fn text() -> Self {
        Self::default()
    }

    /// Whether the meal table needs a Notes column
    #[must_use]
    pub fn shows_notes_column(&self) -> bool {
        self.meal_table.iter().any(|row| !row.notes.is_empty())
    }

    /// Number of source lines that ended up in this block
    #[must_use]
    pub fn line_count(&self) -> usize {
        usize::from(self.title.is_some())
            + self.meal_table.len()
            + self.list.len()
            + self.paragraphs.len()
    }
}

/// Classification of one non-blank, trimmed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Heading with its cleaned title
    Heading(String),
    /// Meal line
    Meal(MealRow),
    /// List item with the marker removed
    ListItem(String),
    /// Anything else
    Text(String),
}

/// `DAY n` or a weekday name at the start of a line
static DAY_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:DAY [0-9]+|MONDAY|TUESDAY|WEDNESDAY|THURSDAY|FRIDAY|SATURDAY|SUNDAY)").ok()
});

/// Upper-case words followed by a colon: `WEEKLY OVERVIEW:`
static CAPS_LABEL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Z\s]+:").ok());

/// One to three `#` then whitespace
static MARKDOWN_HEADING_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^#{1,3}\s").ok());

static MEAL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    let keywords = MEAL_KEYWORDS.join("|");
    Regex::new(&format!(r"(?i)^({keywords})[:\s-]")).ok()
});

static BULLET_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[-•*]\s").ok());

static NUMBERED_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9]+[.)]\s").ok());

/// Splits a meal line into foods, portions and notes
static FIELD_SEPARATOR_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[;|]").ok());

fn pattern_matches(pattern: &LazyLock<Option<Regex>>, line: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(line))
}

fn is_heading(line: &str) -> bool {
    pattern_matches(&DAY_PATTERN, line)
        || pattern_matches(&CAPS_LABEL_PATTERN, line)
        || pattern_matches(&MARKDOWN_HEADING_PATTERN, line)
        || is_short_caps_line(line)
}

fn heading_title(line: &str) -> String {
    let without_markup = MARKDOWN_HEADING_PATTERN
        .as_ref()
        .and_then(|re| re.find(line))
        .map_or(line, |m| &line[m.end()..]);
    let without_colon = without_markup
        .strip_suffix(':')
        .unwrap_or(without_markup);
    without_colon.trim().to_owned()
}

fn meal_row(line: &str) -> Option<MealRow> {
    let captures = MEAL_PATTERN.as_ref()?.captures(line)?;
    let meal = captures.get(1)?.as_str().to_owned();
    let remainder = line[captures.get(0)?.end()..].trim();

    let parts: Vec<&str> = FIELD_SEPARATOR_PATTERN.as_ref().map_or_else(
        || vec![remainder],
        |re| {
            re.split(remainder)
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect()
        },
    );
    let field = |i: usize| parts.get(i).copied().unwrap_or_default().to_owned();

    Some(MealRow {
        meal,
        foods: parts.first().copied().unwrap_or(remainder).to_owned(),
        portions: field(1),
        notes: field(2),
    })
}

fn list_item(line: &str) -> Option<String> {
    let bullet = BULLET_PATTERN.as_ref()?;
    let numbered = NUMBERED_PATTERN.as_ref()?;
    if !bullet.is_match(line) && !numbered.is_match(line) {
        return None;
    }
    let without_bullet = bullet.replace(line, "");
    Some(numbered.replace(&without_bullet, "").trim().to_owned())
}

/// Short line that is entirely upper-case and contains at least one letter
fn is_short_caps_line(line: &str) -> bool {
    line.chars().count() < SHORT_HEADING_MAX_CHARS
        && line.to_uppercase() == line
        && line.chars().any(|c| c.is_ascii_uppercase())
}

/// Classify a single trimmed, non-blank line
///
/// Rules are tried in a fixed order and the first match wins: heading, meal
/// line, list item, plain text. Short all-caps food or brand names are read as
/// headings; that is a known limit of the heuristic.
#[must_use]
pub fn classify_line(line: &str) -> LineKind {
    if is_heading(line) {
        return LineKind::Heading(heading_title(line));
    }
    if let Some(row) = meal_row(line) {
        return LineKind::Meal(row);
    }
    if let Some(item) = list_item(line) {
        return LineKind::ListItem(item);
    }
    LineKind::Text(line.to_owned())
}

/// Where the parser currently is relative to the open section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Nothing seen yet
    NoSection,
    /// Content is being filed under a heading
    InHeadingSection,
    /// Content is being filed under the untitled leading section
    InTextSection,
}

/// Both views of one parse: grouped blocks for rendering, flat sections in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPlan {
    /// One block per heading (plus the untitled leading block)
    pub blocks: Vec<PlanBlock>,
    /// Headings, tables, lists and text runs in the order their lines appeared
    pub sections: Vec<Section>,
}

/// Left-to-right plan parser with one open section and two pending accumulators
///
/// Meal rows and list items accumulate until a blank line, a heading, a plain
/// text line or the end of input flushes them into the open section. Every
/// flush and text run is also appended to the flat section sequence as it
/// happens, so that sequence keeps source order.
#[derive(Debug, Default)]
pub struct PlanParser {
    blocks: Vec<PlanBlock>,
    sections: Vec<Section>,
    current: Option<PlanBlock>,
    pending_meals: Option<Vec<MealRow>>,
    pending_items: Option<Vec<String>>,
    // which accumulator opened first since the last flush
    table_before_list: bool,
}

impl PlanParser {
    /// Create a parser with no open section
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the open section
    #[must_use]
    pub fn state(&self) -> ParserState {
        match &self.current {
            None => ParserState::NoSection,
            Some(block) if block.title.is_some() => ParserState::InHeadingSection,
            Some(_) => ParserState::InTextSection,
        }
    }

    /// Whether meal rows are waiting to be flushed
    #[must_use]
    pub fn has_pending_table(&self) -> bool {
        self.pending_meals.is_some()
    }

    /// Whether list items are waiting to be flushed
    #[must_use]
    pub fn has_pending_list(&self) -> bool {
        self.pending_items.is_some()
    }

    /// Feed one raw source line
    pub fn feed_line(&mut self, raw_line: &str) {
        let line = raw_line.trim();
        if line.is_empty() {
            self.flush_pending();
            return;
        }

        match classify_line(line) {
            LineKind::Heading(title) => self.open_heading(title),
            LineKind::Meal(row) => {
                if self.pending_meals.is_none() && self.pending_items.is_none() {
                    self.table_before_list = true;
                }
                self.pending_meals.get_or_insert_with(Vec::new).push(row);
            }
            LineKind::ListItem(item) => {
                if self.pending_meals.is_none() && self.pending_items.is_none() {
                    self.table_before_list = false;
                }
                self.pending_items.get_or_insert_with(Vec::new).push(item);
            }
            LineKind::Text(text) => self.push_text(text),
        }
    }

    /// Flush pending content and return both views of the plan
    #[must_use]
    pub fn finish(mut self) -> ParsedPlan {
        self.flush_pending();
        if let Some(block) = self.current.take() {
            self.blocks.push(block);
        }
        ParsedPlan {
            blocks: self.blocks,
            sections: self.sections,
        }
    }

    fn open_heading(&mut self, title: String) {
        self.flush_pending();
        self.sections.push(Section::Heading {
            title: title.clone(),
        });
        if let Some(previous) = self.current.replace(PlanBlock::heading(title)) {
            self.blocks.push(previous);
        }
    }

    fn push_text(&mut self, text: String) {
        self.flush_pending();
        match self.sections.last_mut() {
            Some(Section::TextBlock { paragraphs }) => paragraphs.push(text.clone()),
            _ => self.sections.push(Section::TextBlock {
                paragraphs: vec![text.clone()],
            }),
        }
        self.current
            .get_or_insert_with(PlanBlock::text)
            .paragraphs
            .push(text);
    }

    /// Attach pending rows/items to the open section, opening a text section if needed
    ///
    /// A second flush into the same section appends to its table/list; the flat
    /// sequence gets a new table or list at the flush position instead.
    fn flush_pending(&mut self) {
        if self.pending_meals.is_none() && self.pending_items.is_none() {
            return;
        }
        let table = self.pending_meals.take().map(|rows| Section::MealTable { rows });
        let list = self.pending_items.take().map(|items| Section::BulletList { items });
        let ordered = if self.table_before_list {
            [table, list]
        } else {
            [list, table]
        };

        let block = self.current.get_or_insert_with(PlanBlock::text);
        for section in ordered.into_iter().flatten() {
            match &section {
                Section::MealTable { rows } => block.meal_table.extend(rows.iter().cloned()),
                Section::BulletList { items } => block.list.extend(items.iter().cloned()),
                Section::Heading { .. } | Section::TextBlock { .. } => {}
            }
            self.sections.push(section);
        }
    }
}

/// Parse plan text into grouped blocks and the flat section sequence
///
/// `None` and empty input produce an empty result.
#[must_use]
pub fn parse_plan<'a>(content: impl Into<Option<&'a str>>) -> ParsedPlan {
    let Some(content) = content.into() else {
        return ParsedPlan::default();
    };

    let mut parser = PlanParser::new();
    for line in content.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

/// Parse plan text into grouped blocks
#[must_use]
pub fn parse_plan_blocks<'a>(content: impl Into<Option<&'a str>>) -> Vec<PlanBlock> {
    parse_plan(content).blocks
}

/// Parse plan text into the flat section sequence, in source order
#[must_use]
pub fn parse_plan_sections<'a>(content: impl Into<Option<&'a str>>) -> Vec<Section> {
    parse_plan(content).sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_title_cleanup() {
        assert_eq!(
            classify_line("## Nutrition Guidelines:"),
            LineKind::Heading("Nutrition Guidelines".to_owned())
        );
        assert_eq!(
            classify_line("WEEKLY OVERVIEW:"),
            LineKind::Heading("WEEKLY OVERVIEW".to_owned())
        );
    }

    #[test]
    fn test_four_hashes_is_not_markdown_heading() {
        assert_eq!(
            classify_line("#### small print"),
            LineKind::Text("#### small print".to_owned())
        );
    }

    #[test]
    fn test_caps_line_with_list_marker_is_heading() {
        assert_eq!(
            classify_line("- AVOID"),
            LineKind::Heading("- AVOID".to_owned())
        );
    }

    #[test]
    fn test_state_transitions() {
        let mut parser = PlanParser::new();
        assert_eq!(parser.state(), ParserState::NoSection);

        parser.feed_line("Intro sentence.");
        assert_eq!(parser.state(), ParserState::InTextSection);

        parser.feed_line("Lunch: Soup");
        assert!(parser.has_pending_table());

        parser.feed_line("");
        assert!(!parser.has_pending_table());

        parser.feed_line("DAY 2");
        assert_eq!(parser.state(), ParserState::InHeadingSection);

        parser.feed_line("* Walk after dinner");
        assert!(parser.has_pending_list());

        let parsed = parser.finish();
        assert_eq!(parsed.blocks.len(), 2);
        assert_eq!(parsed.blocks[1].list, vec!["Walk after dinner"]);
        assert_eq!(parsed.sections.len(), 4);
    }
}
