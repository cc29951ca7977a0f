// ABOUTME: Prompt text for nutrition plan generation, system prompt loaded at compile time
// ABOUTME: Builds the per-client user prompt with placeholders for missing profile fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompts
//!
//! The system prompt lives in a markdown file next to this module so it can be
//! edited without touching code.

use nutriplan_core::models::ClientProfile;

/// Dietitian-voice system prompt describing plan structure and content rules
pub const SYSTEM_PROMPT: &str = include_str!("nutrition_system.md");

const NONE_SPECIFIED: &str = "None specified";
const NO_NOTES: &str = "No additional notes provided.";

fn join_or_none(values: &[String]) -> String {
    let present: Vec<&str> = values
        .iter()
        .map(|v| v.as_str().trim())
        .filter(|v| !v.is_empty())
        .collect();
    if present.is_empty() {
        NONE_SPECIFIED.to_owned()
    } else {
        present.join(", ")
    }
}

/// Build the user prompt for one client
#[must_use]
pub fn build_user_prompt(client: &ClientProfile, raw_input: Option<&str>) -> String {
    let notes = raw_input
        .map(str::trim)
        .filter(|notes| !notes.is_empty())
        .unwrap_or(NO_NOTES);

    format!(
        "Create a personalized diet plan based on the following data.

Client Profile:
- Name: {name}
- Age: {age}
- Gender: {gender}
- Height: {height}
- Weight: {weight}
- Medical Conditions: {conditions}
- Allergies: {allergies}
- Goals: {goals}

Dietitian Notes / Raw Input:
{notes}

REQUIREMENTS:
- Do NOT mention diagnoses
- Respect all allergies and restrictions
- Focus on whole foods
- Include portion sizes where appropriate
- Use simple household measurements
- Avoid supplements unless explicitly mentioned
- Include hydration guidance
- Include culturally neutral food options

OUTPUT FORMAT:
1. Short Introduction
2. Daily Calorie & Macro Overview (if data allows)
3. 7-Day Meal Plan
   - Breakfast
   - Lunch
   - Dinner
   - Optional Snacks
4. General Nutrition Guidelines
5. Foods to Prefer
6. Foods to Limit
7. Disclaimer (non-medical)",
        name = client.display_name(),
        age = ClientProfile::field_or_unspecified(&client.age),
        gender = ClientProfile::field_or_unspecified(&client.gender),
        height = ClientProfile::field_or_unspecified(&client.height),
        weight = ClientProfile::field_or_unspecified(&client.weight),
        conditions = join_or_none(&client.medical_conditions),
        allergies = join_or_none(&client.allergies),
        goals = ClientProfile::field_or_unspecified(&client.goals),
    )
}

/// System prompt and user prompt as one text block, for providers without a system role
#[must_use]
pub fn combined_prompt(system: &str, user: &str) -> String {
    format!("{}\n\n{user}", system.trim_end())
}
