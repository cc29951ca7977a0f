// ABOUTME: Integration tests for plan HTML rendering
// ABOUTME: Verifies table columns, escaping, placeholder output, and branding wrapper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs)]

use nutriplan_core::models::{Branding, LogoAlignment};
use nutriplan_server::plans::{
    parse_plan_blocks, render_branded_plan_html, render_plan_html, NO_CONTENT_PLACEHOLDER,
};

#[test]
fn test_empty_plan_renders_placeholder() {
    let html = render_plan_html(&parse_plan_blocks(None));
    assert!(html.contains(NO_CONTENT_PLACEHOLDER));
}

#[test]
fn test_notes_column_only_when_some_row_has_notes() {
    let without_notes = render_plan_html(&parse_plan_blocks("DAY 1\nLunch: Soup; 1 bowl"));
    assert!(without_notes.contains("<th>Portions</th>"));
    assert!(!without_notes.contains("<th>Notes</th>"));

    let with_notes = render_plan_html(&parse_plan_blocks(
        "DAY 1\nLunch: Soup; 1 bowl\nDinner: Fish; 150g; grilled",
    ));
    assert!(with_notes.contains("<th>Notes</th>"));
    assert_eq!(with_notes.matches("<tr>").count(), 3);
}

#[test]
fn test_block_render_order() {
    let html = render_plan_html(&parse_plan_blocks(
        "TIPS\nKeep it simple.\n- Drink water\nLunch: Soup",
    ));
    let title = html.find("<h3>TIPS</h3>").unwrap_or(usize::MAX);
    let table = html.find("<table").unwrap_or(usize::MAX);
    let list = html.find("<ul>").unwrap_or(usize::MAX);
    let paragraph = html.find("<p>Keep it simple.</p>").unwrap_or(usize::MAX);
    assert!(title < table && table < list && list < paragraph);
}

#[test]
fn test_empty_heading_title_is_not_rendered() {
    let html = render_plan_html(&parse_plan_blocks("## :\nLunch: Soup; 1 bowl"));
    assert!(!html.contains("<h3>"));
    assert!(html.contains("<td>Soup</td>"));
}

#[test]
fn test_text_is_escaped() {
    let html = render_plan_html(&parse_plan_blocks("Eat <script>alert(1)</script> & rest"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("&amp; rest"));
    assert!(!html.contains("<script>"));
}

#[test]
fn test_branded_document_uses_branding() {
    let mut branding = Branding {
        business_name: "Green Plate".to_owned(),
        tagline: "Eat well".to_owned(),
        logo_url: "https://example.com/logo.png".to_owned(),
        primary_color: "#123456".to_owned(),
        ..Branding::default()
    };
    branding.header_settings.logo_alignment = LogoAlignment::Center;
    branding.footer_settings.email = "hello@greenplate.test".to_owned();

    let html = render_branded_plan_html(&parse_plan_blocks("DAY 1"), &branding, "Jane Doe");
    assert!(html.contains("Green Plate"));
    assert!(html.contains("Eat well"));
    assert!(html.contains("#123456"));
    assert!(html.contains("text-align: center"));
    assert!(html.contains("Nutrition Plan for Jane Doe"));
    assert!(html.contains("hello@greenplate.test"));
    assert!(html.contains(&branding.footer_settings.disclaimer_text));
    assert!(html.contains(r#"src="https://example.com/logo.png""#));
}

#[test]
fn test_branded_document_rejects_css_injection_in_colors() {
    let branding = Branding {
        primary_color: "red;background:url(evil)".to_owned(),
        ..Branding::default()
    };
    let html = render_branded_plan_html(&parse_plan_blocks("DAY 1"), &branding, "");
    assert!(!html.contains("evil"));
    assert!(html.contains("#22c55e"));
}
