//! Core domain types for the nutri calculator.
//!
//! This module defines the fundamental types used throughout the system:
//! - Raw calculation input as submitted by a user
//! - Normalized gender and activity level
//! - The derived calorie/macro result
//! - Persisted entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Normalized Input Types
// ============================================================================

/// Gender as used by the Mifflin-St Jeor equation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Normalize free-text input.
    ///
    /// Anything that is not case-insensitively `"male"` is treated as female.
    pub fn from_input(raw: &str) -> Self {
        if raw.to_lowercase() == "male" {
            Gender::Male
        } else {
            Gender::Female
        }
    }
}

/// Activity level keys and their TDEE multipliers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    Very,
    Extra,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Very,
        ActivityLevel::Extra,
    ];

    /// Look up an activity level by its exact key (`"moderate"`, ...)
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.key() == key)
    }

    /// Normalize free-text input, defaulting unknown keys to sedentary
    pub fn from_input(raw: &str) -> Self {
        Self::from_key(raw).unwrap_or(ActivityLevel::Sedentary)
    }

    pub fn key(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Very => "very",
            ActivityLevel::Extra => "extra",
        }
    }

    /// Multiplier applied to BMR to estimate total daily energy expenditure
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Very => 1.725,
            ActivityLevel::Extra => 1.9,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "little or no exercise",
            ActivityLevel::Light => "light exercise 1-3 days/week",
            ActivityLevel::Moderate => "moderate exercise 3-5 days/week",
            ActivityLevel::Very => "hard exercise 6-7 days/week",
            ActivityLevel::Extra => "very hard exercise or a physical job",
        }
    }
}

// ============================================================================
// Calculation Types
// ============================================================================

/// Body metrics as submitted, before any normalization.
///
/// Gender and activity level are kept as the raw strings so a persisted
/// entry records exactly what the user typed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age_years: i64,
    pub gender: String,
    pub activity_level: String,
}

impl CalculationInput {
    pub fn gender(&self) -> Gender {
        Gender::from_input(&self.gender)
    }

    pub fn activity(&self) -> ActivityLevel {
        ActivityLevel::from_input(&self.activity_level)
    }
}

/// Unrounded macronutrient split in grams
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Macros {
    pub protein_grams: f64,
    pub fat_grams: f64,
    pub carb_grams: f64,
}

/// Daily calorie target and macro breakdown, rounded for display
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub calories: i64,
    pub protein_g: i64,
    pub fat_g: i64,
    pub carb_g: i64,
    pub bmr: i64,
    pub activity_multiplier: f64,
}

// ============================================================================
// Persisted Entry
// ============================================================================

/// A saved calculation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(with = "crate::timestamp")]
    pub timestamp: DateTime<Utc>,
    pub inputs: CalculationInput,
    pub results: CalculationResult,
}

impl Entry {
    pub const ANONYMOUS: &'static str = "Anonymous";

    /// Build an entry, substituting `"Anonymous"` for a blank name
    pub fn new(
        name: &str,
        inputs: CalculationInput,
        results: CalculationResult,
        at: DateTime<Utc>,
    ) -> Self {
        Self::with_default_name(name, Self::ANONYMOUS, inputs, results, at)
    }

    /// Build an entry with a caller-chosen fallback for blank names
    pub fn with_default_name(
        name: &str,
        default_name: &str,
        inputs: CalculationInput,
        results: CalculationResult,
        at: DateTime<Utc>,
    ) -> Self {
        let name = if name.trim().is_empty() {
            default_name.to_string()
        } else {
            name.to_string()
        };

        Entry {
            name,
            timestamp: at,
            inputs,
            results,
        }
    }

    /// Whether every float field can be written as a JSON number.
    ///
    /// serde_json writes NaN and infinities as `null`, which would not read
    /// back as an `f64`.
    pub fn is_finite(&self) -> bool {
        self.inputs.height_cm.is_finite()
            && self.inputs.weight_kg.is_finite()
            && self.results.activity_multiplier.is_finite()
    }
}
