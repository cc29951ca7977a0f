// ABOUTME: Integration tests for the plan text parser
// ABOUTME: Covers line classification precedence, flush rules, and line preservation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test modules don't need documentation
#![allow(missing_docs)]
// Allow unwrap in tests - tests should panic on failure
#![allow(clippy::unwrap_used)]

use nutriplan_server::plans::{
    classify_line, parse_plan_blocks, parse_plan_sections, LineKind, MealRow, PlanBlock, Section,
};

const SAMPLE_PLAN: &str = "\
Personalized plan for Jane.

DAY 1
Breakfast: Oatmeal with berries; 1 cup; add cinnamon
Lunch: Grilled chicken salad; 200g
Dinner - Baked salmon with vegetables

## Guidelines
- Drink 8 glasses of water
• Avoid sugary drinks
2. Prefer steaming over frying
Stay consistent throughout the week.

HYDRATION TIPS:
Carry a water bottle.
";

fn row(meal: &str, foods: &str, portions: &str, notes: &str) -> MealRow {
    MealRow {
        meal: meal.to_owned(),
        foods: foods.to_owned(),
        portions: portions.to_owned(),
        notes: notes.to_owned(),
    }
}

fn content_slots(sections: &[Section]) -> usize {
    sections
        .iter()
        .map(|section| match section {
            Section::Heading { .. } => 1,
            Section::MealTable { rows } => rows.len(),
            Section::BulletList { items } => items.len(),
            Section::TextBlock { paragraphs } => paragraphs.len(),
        })
        .sum()
}

fn non_blank_lines(content: &str) -> usize {
    content.lines().filter(|l| !l.trim().is_empty()).count()
}

#[test]
fn test_parse_is_deterministic() {
    assert_eq!(parse_plan_sections(SAMPLE_PLAN), parse_plan_sections(SAMPLE_PLAN));
}

#[test]
fn test_no_line_loss_on_sample_plan() {
    let sections = parse_plan_sections(SAMPLE_PLAN);
    assert_eq!(content_slots(&sections), non_blank_lines(SAMPLE_PLAN));
}

#[test]
fn test_no_line_loss_with_repeated_blocks_in_one_section() {
    let content = "DAY 1\nBreakfast: Eggs\n\nLunch: Soup\n- walk\n\n- stretch\nNotes here\n";
    let sections = parse_plan_sections(content);
    assert_eq!(content_slots(&sections), non_blank_lines(content));

    let blocks = parse_plan_blocks(content);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].meal_table.len(), 2);
    assert_eq!(blocks[0].list, vec!["walk", "stretch"]);
}

#[test]
fn test_sample_plan_structure() {
    let blocks = parse_plan_blocks(SAMPLE_PLAN);
    assert_eq!(blocks.len(), 4);

    assert_eq!(blocks[0].title, None);
    assert_eq!(blocks[0].paragraphs, vec!["Personalized plan for Jane."]);

    assert_eq!(blocks[1].title.as_deref(), Some("DAY 1"));
    assert_eq!(
        blocks[1].meal_table,
        vec![
            row("Breakfast", "Oatmeal with berries", "1 cup", "add cinnamon"),
            row("Lunch", "Grilled chicken salad", "200g", ""),
            row("Dinner", "- Baked salmon with vegetables", "", ""),
        ]
    );
    assert!(blocks[1].shows_notes_column());

    assert_eq!(blocks[2].title.as_deref(), Some("Guidelines"));
    assert_eq!(
        blocks[2].list,
        vec![
            "Drink 8 glasses of water",
            "Avoid sugary drinks",
            "Prefer steaming over frying"
        ]
    );
    assert_eq!(
        blocks[2].paragraphs,
        vec!["Stay consistent throughout the week."]
    );

    assert_eq!(blocks[3].title.as_deref(), Some("HYDRATION TIPS"));
    assert_eq!(blocks[3].paragraphs, vec!["Carry a water bottle."]);
}

#[test]
fn test_heading_closes_table() {
    let sections =
        parse_plan_sections("BREAKFAST:\nBreakfast: Oats; 1 cup\n\nLUNCH:\nLunch: Salad; 2 cups");

    assert_eq!(
        sections,
        vec![
            Section::Heading {
                title: "BREAKFAST".to_owned()
            },
            Section::MealTable {
                rows: vec![row("Breakfast", "Oats", "1 cup", "")]
            },
            Section::Heading {
                title: "LUNCH".to_owned()
            },
            Section::MealTable {
                rows: vec![row("Lunch", "Salad", "2 cups", "")]
            },
        ]
    );
}

#[test]
fn test_meal_row_splitting() {
    assert_eq!(
        classify_line("Lunch: Grilled chicken; 200g; high protein"),
        LineKind::Meal(row("Lunch", "Grilled chicken", "200g", "high protein"))
    );
}

#[test]
fn test_meal_row_without_separators() {
    assert_eq!(
        classify_line("Dinner: Baked salmon with vegetables"),
        LineKind::Meal(row("Dinner", "Baked salmon with vegetables", "", ""))
    );
}

#[test]
fn test_meal_row_pipe_separator_and_empty_parts() {
    assert_eq!(
        classify_line("Snack: Apple | | 1 medium | before gym"),
        LineKind::Meal(row("Snack", "Apple", "1 medium", "before gym"))
    );
}

#[test]
fn test_meal_keyword_is_case_insensitive_and_kept_as_written() {
    assert_eq!(
        classify_line("post-workout shake; 300ml"),
        LineKind::Meal(row("post-workout", "shake", "300ml", ""))
    );
    assert_eq!(
        classify_line("Mid-Morning: Almonds"),
        LineKind::Meal(row("Mid-Morning", "Almonds", "", ""))
    );
}

#[test]
fn test_meal_keyword_needs_separator() {
    assert_eq!(
        classify_line("Breakfasts are important"),
        LineKind::Text("Breakfasts are important".to_owned())
    );
}

#[test]
fn test_bullet_stripping() {
    let expected = LineKind::ListItem("Drink 8 glasses of water".to_owned());
    assert_eq!(classify_line("- Drink 8 glasses of water"), expected);
    assert_eq!(classify_line("3. Drink 8 glasses of water"), expected);
    assert_eq!(classify_line("12) Drink 8 glasses of water"), expected);
    assert_eq!(classify_line("* Drink 8 glasses of water"), expected);
}

#[test]
fn test_empty_input() {
    assert!(parse_plan_sections("").is_empty());
    assert!(parse_plan_sections(None).is_empty());
    assert!(parse_plan_blocks(Some("\n  \n\t\n")).is_empty());
}

#[test]
fn test_heading_precedence_over_meal_and_list() {
    assert_eq!(
        classify_line("LUNCH"),
        LineKind::Heading("LUNCH".to_owned())
    );
    assert_eq!(
        classify_line("Monday: high protein day"),
        LineKind::Heading("Monday: high protein day".to_owned())
    );
    assert_eq!(
        classify_line("- OPTIONAL"),
        LineKind::Heading("- OPTIONAL".to_owned())
    );
}

#[test]
fn test_day_heading_forms() {
    assert_eq!(classify_line("Day 3"), LineKind::Heading("Day 3".to_owned()));
    assert_eq!(
        classify_line("### Sunday Prep:"),
        LineKind::Heading("Sunday Prep".to_owned())
    );
}

#[test]
fn test_long_caps_line_is_text() {
    let line = "THIS IS A VERY LONG SENTENCE WRITTEN ENTIRELY IN CAPITAL LETTERS FOR EMPHASIS";
    assert!(line.len() >= 60);
    assert_eq!(classify_line(line), LineKind::Text(line.to_owned()));
}

#[test]
fn test_digits_only_line_is_text() {
    assert_eq!(classify_line("1500"), LineKind::Text("1500".to_owned()));
}

#[test]
fn test_leading_meals_open_text_section() {
    let blocks = parse_plan_blocks("Breakfast: Toast\nLunch: Rice; 1 bowl");
    assert_eq!(
        blocks,
        vec![PlanBlock {
            title: None,
            meal_table: vec![row("Breakfast", "Toast", "", ""), row("Lunch", "Rice", "1 bowl", "")],
            list: Vec::new(),
            paragraphs: Vec::new(),
        }]
    );
}

#[test]
fn test_text_flushes_pending_list_before_paragraph() {
    let blocks = parse_plan_blocks("TIPS\n- one\n- two\nClosing words\n- three");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].list, vec!["one", "two", "three"]);
    assert_eq!(blocks[0].paragraphs, vec!["Closing words"]);
}

#[test]
fn test_crlf_input() {
    let blocks = parse_plan_blocks("DAY 1\r\nLunch: Soup; 1 bowl\r\n");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].meal_table, vec![row("Lunch", "Soup", "1 bowl", "")]);
}

#[test]
fn test_sections_serialize_with_type_tag() {
    let sections = parse_plan_sections("DAY 1\n- Walk");
    let json = serde_json::to_value(&sections).unwrap();
    assert_eq!(json[0]["type"], "heading");
    assert_eq!(json[0]["title"], "DAY 1");
    assert_eq!(json[1]["type"], "bullet_list");
    assert_eq!(json[1]["items"][0], "Walk");
}

fn heading(title: &str) -> Section {
    Section::Heading {
        title: title.to_owned(),
    }
}

fn text(paragraphs: &[&str]) -> Section {
    Section::TextBlock {
        paragraphs: paragraphs.iter().map(|p| (*p).to_owned()).collect(),
    }
}

fn items(values: &[&str]) -> Section {
    Section::BulletList {
        items: values.iter().map(|v| (*v).to_owned()).collect(),
    }
}

#[test]
fn test_sections_keep_text_before_following_table() {
    assert_eq!(
        parse_plan_sections("DAY 1\nEat slowly.\nBreakfast: Oats"),
        vec![
            heading("DAY 1"),
            text(&["Eat slowly."]),
            Section::MealTable {
                rows: vec![row("Breakfast", "Oats", "", "")]
            },
        ]
    );
}

#[test]
fn test_sections_do_not_pull_later_rows_above_prose() {
    let content = "DAY 1\nBreakfast: A\nDrink water between meals.\nLunch: B";
    assert_eq!(
        parse_plan_sections(content),
        vec![
            heading("DAY 1"),
            Section::MealTable {
                rows: vec![row("Breakfast", "A", "", "")]
            },
            text(&["Drink water between meals."]),
            Section::MealTable {
                rows: vec![row("Lunch", "B", "", "")]
            },
        ]
    );

    // the grouped view still files both rows under the one heading
    let blocks = parse_plan_blocks(content);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].meal_table.len(), 2);
}

#[test]
fn test_sections_follow_source_order_for_mixed_content() {
    let content = "\
TIPS
Intro line.
- one
- two
Closing words
Still closing.

Snack: Nuts
- three
";
    let sections = parse_plan_sections(content);
    assert_eq!(
        sections,
        vec![
            heading("TIPS"),
            text(&["Intro line."]),
            items(&["one", "two"]),
            text(&["Closing words", "Still closing."]),
            Section::MealTable {
                rows: vec![row("Snack", "Nuts", "", "")]
            },
            items(&["three"]),
        ]
    );
    assert_eq!(content_slots(&sections), non_blank_lines(content));
}

#[test]
fn test_list_opened_first_is_emitted_first() {
    assert_eq!(
        parse_plan_sections("DAY 2\n- warm up\nDinner: Rice; 1 cup"),
        vec![
            heading("DAY 2"),
            items(&["warm up"]),
            Section::MealTable {
                rows: vec![row("Dinner", "Rice", "1 cup", "")]
            },
        ]
    );
}
