// ABOUTME: Post-generation content filter for medical claims in generated plans
// ABOUTME: Case-insensitive phrase denylist; a single hit rejects the whole plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use nutriplan_core::constants::ai::UNSAFE_PHRASES;

/// First denylisted phrase found in `text`, if any
#[must_use]
pub fn find_unsafe_phrase(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    UNSAFE_PHRASES
        .iter()
        .copied()
        .find(|phrase| lowered.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_phrase_any_case() {
        assert_eq!(
            find_unsafe_phrase("Following this diet, THIS WILL CURE your condition."),
            Some("this will cure")
        );
        assert_eq!(
            find_unsafe_phrase("Your doctor may Diagnose this later"),
            Some("diagnose")
        );
    }

    #[test]
    fn test_clean_plan_passes() {
        assert_eq!(
            find_unsafe_phrase("Breakfast: Oats; 1 cup\nConsult your healthcare provider."),
            None
        );
    }
}
