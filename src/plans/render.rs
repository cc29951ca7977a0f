// ABOUTME: HTML rendering of parsed plan blocks, plain and wrapped in dietitian branding
// ABOUTME: Escapes all plan text and falls back to a placeholder when a plan is empty
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};
use nutriplan_core::models::Branding;

use super::parser::{MealRow, PlanBlock};

/// Shown instead of a plan body when parsing produced nothing
pub const NO_CONTENT_PLACEHOLDER: &str = "No plan content available";

const FALLBACK_PRIMARY: &str = "#22c55e";
const FALLBACK_SECONDARY: &str = "#16a34a";

/// Render parsed blocks as an HTML fragment
///
/// Each block renders its title (when non-empty), meal table, list and paragraphs in that order.
#[must_use]
pub fn render_plan_html(blocks: &[PlanBlock]) -> String {
    if blocks.is_empty() {
        return format!(r#"<p class="plan-empty">{NO_CONTENT_PLACEHOLDER}</p>"#);
    }

    let mut html = String::new();
    for block in blocks {
        html.push_str(r#"<section class="plan-section">"#);
        if let Some(title) = block.title.as_deref().filter(|t| !t.is_empty()) {
            let _ = write!(html, "<h3>{}</h3>", encode_text(title));
        }
        if !block.meal_table.is_empty() {
            render_meal_table(&mut html, &block.meal_table, block.shows_notes_column());
        }
        if !block.list.is_empty() {
            html.push_str("<ul>");
            for item in &block.list {
                let _ = write!(html, "<li>{}</li>", encode_text(item));
            }
            html.push_str("</ul>");
        }
        for paragraph in &block.paragraphs {
            let _ = write!(html, "<p>{}</p>", encode_text(paragraph));
        }
        html.push_str("</section>");
    }
    html
}

fn render_meal_table(html: &mut String, rows: &[MealRow], with_notes: bool) {
    html.push_str(r#"<table class="meal-table"><thead><tr><th>Meal</th><th>Foods</th><th>Portions</th>"#);
    if with_notes {
        html.push_str("<th>Notes</th>");
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td>",
            encode_text(&row.meal),
            encode_text(&row.foods),
            encode_text(&row.portions)
        );
        if with_notes {
            let _ = write!(html, "<td>{}</td>", encode_text(&row.notes));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
}

fn safe_color<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if Branding::is_valid_color(value) {
        value
    } else {
        fallback
    }
}

/// Render parsed blocks inside a branded document shell
///
/// Colors that are not plain hex literals fall back to the default palette so
/// stored branding can never inject CSS.
#[must_use]
pub fn render_branded_plan_html(
    blocks: &[PlanBlock],
    branding: &Branding,
    client_name: &str,
) -> String {
    let primary = safe_color(&branding.primary_color, FALLBACK_PRIMARY);
    let secondary = safe_color(&branding.secondary_color, FALLBACK_SECONDARY);
    let font = branding
        .font_family
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .collect::<String>();

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<article class="plan-document" style="font-family: '{font}', sans-serif; border-top: 4px solid {primary};">"#
    );

    let header = &branding.header_settings;
    let _ = write!(
        html,
        r#"<header style="text-align: {};">"#,
        header.logo_alignment.as_css()
    );
    if header.show_logo && !branding.logo_url.is_empty() {
        let _ = write!(
            html,
            r#"<img class="plan-logo" src="{}" alt="{}">"#,
            encode_double_quoted_attribute(&branding.logo_url),
            encode_double_quoted_attribute(&branding.business_name)
        );
    }
    if header.show_business_name && !branding.business_name.is_empty() {
        let _ = write!(
            html,
            r#"<h1 style="color: {primary};">{}</h1>"#,
            encode_text(&branding.business_name)
        );
    }
    if !branding.tagline.is_empty() {
        let _ = write!(
            html,
            r#"<p class="plan-tagline" style="color: {secondary};">{}</p>"#,
            encode_text(&branding.tagline)
        );
    }
    if !client_name.is_empty() {
        let _ = write!(
            html,
            "<h2>Nutrition Plan for {}</h2>",
            encode_text(client_name)
        );
    }
    html.push_str("</header>");

    let _ = write!(html, "<main>{}</main>", render_plan_html(blocks));

    let footer = &branding.footer_settings;
    let contacts: Vec<&str> = [
        footer.phone.as_str(),
        footer.email.as_str(),
        footer.website.as_str(),
    ]
    .into_iter()
    .filter(|value| !value.is_empty())
    .collect();

    let _ = write!(
        html,
        r#"<footer style="border-top: 1px solid {secondary};">"#
    );
    if !contacts.is_empty() {
        let _ = write!(
            html,
            r#"<p class="plan-contact">{}</p>"#,
            encode_text(&contacts.join(" | "))
        );
    }
    if !footer.disclaimer_text.is_empty() {
        let _ = write!(
            html,
            r#"<p class="plan-disclaimer">{}</p>"#,
            encode_text(&footer.disclaimer_text)
        );
    }
    html.push_str("</footer></article>");
    html
}
