// ABOUTME: Domain models shared by the parser, quota gate, generation service and store
// ABOUTME: Client profiles, diet plans, branding settings, and AI usage records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

mod branding;
mod client;
mod diet_plan;
mod usage;

pub use branding::{
    Branding, DEFAULT_DISCLAIMER, FooterSettings, HeaderSettings, LogoAlignment, SocialLinks,
};
pub use client::{ClientProfile, NOT_SPECIFIED};
pub use diet_plan::{DietPlan, DietPlanUpdate, NewDietPlan, PlanStatus};
pub use usage::{UsageRecord, UsageSummary};
