// ABOUTME: Plan text structuring and rendering for AI-generated nutrition plans
// ABOUTME: Turns loosely formatted plan text into headings, meal tables, lists and paragraphs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Text Structuring
//!
//! Generated plans arrive as free text. This module classifies each line and
//! groups the results into sections that the renderer turns into HTML.
//!
//! ## Recognized Input
//!
//! ```text
//! DAY 1
//! Breakfast: Oatmeal with berries; 1 cup; add cinnamon
//! Lunch: Grilled chicken salad; 200g
//!
//! ## Guidelines
//! - Drink 8 glasses of water
//! 2. Prefer steaming over frying
//! Plain sentences become paragraphs.
//! ```
//!
//! Parsing never fails: anything that is not a heading, meal line or list item
//! is kept as a paragraph.

/// Line classifier and section state machine
pub mod parser;

/// HTML rendering of parsed plans
pub mod render;

pub use parser::{
    classify_line, parse_plan, parse_plan_blocks, parse_plan_sections, LineKind, MealRow,
    ParsedPlan, ParserState, PlanBlock, PlanParser, Section, MEAL_KEYWORDS,
};
pub use render::{render_branded_plan_html, render_plan_html, NO_CONTENT_PLACEHOLDER};
