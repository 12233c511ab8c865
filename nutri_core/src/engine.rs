//! Calculation engine: BMR → TDEE → macro split.
//!
//! Every function here is pure and total. Implausible inputs (zero or
//! negative weight, absurd ages) are not rejected; they produce a
//! well-defined number and range checks are left to whatever collects the
//! input.
//!
//! ## Pipeline
//!
//! 1. **BMR**: Mifflin-St Jeor, `10w + 6.25h - 5a`, then `+5` (male) or `-161`
//! 2. **TDEE**: BMR times the activity multiplier (unknown level → 1.2)
//! 3. **Macros**: protein 1.8 g/kg and fat 0.8 g/kg first, the remaining
//!    calories go to carbs (floored at zero)
//!
//! Displayed integers are rounded half-to-even.

use crate::{ActivityLevel, CalculationInput, CalculationResult, Gender, Macros};

pub const PROTEIN_GRAMS_PER_KG: f64 = 1.8;
pub const FAT_GRAMS_PER_KG: f64 = 0.8;

pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARB: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Basal metabolic rate in kcal/day (Mifflin-St Jeor)
pub fn compute_bmr(weight_kg: f64, height_cm: f64, age_years: i64, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// TDEE multiplier for a raw activity key, 1.2 for anything unrecognized
pub fn activity_multiplier(level: &str) -> f64 {
    ActivityLevel::from_input(level).multiplier()
}

/// Split a calorie total into protein, fat and carb grams.
///
/// Protein and fat are fixed per kilogram of body weight and are never
/// clamped, so for very low calorie totals they alone can exceed the total.
/// Carbs take whatever is left and never go below zero.
pub fn compute_macros(total_calories: f64, weight_kg: f64) -> Macros {
    let protein_grams = PROTEIN_GRAMS_PER_KG * weight_kg;
    let fat_grams = FAT_GRAMS_PER_KG * weight_kg;

    let protein_cal = protein_grams * KCAL_PER_GRAM_PROTEIN;
    let fat_cal = fat_grams * KCAL_PER_GRAM_FAT;

    let remaining_cal = (total_calories - (protein_cal + fat_cal)).max(0.0);
    let carb_grams = remaining_cal / KCAL_PER_GRAM_CARB;

    Macros {
        protein_grams,
        fat_grams,
        carb_grams,
    }
}

/// Run the full pipeline for one submission
pub fn calculate(input: &CalculationInput) -> CalculationResult {
    let bmr = compute_bmr(
        input.weight_kg,
        input.height_cm,
        input.age_years,
        input.gender(),
    );
    let multiplier = activity_multiplier(&input.activity_level);
    let tdee = bmr * multiplier;
    let macros = compute_macros(tdee, input.weight_kg);

    tracing::debug!(
        "Calculated bmr={:.3} multiplier={} tdee={:.3}",
        bmr,
        multiplier,
        tdee
    );

    CalculationResult {
        calories: round_display(tdee),
        protein_g: round_display(macros.protein_grams),
        fat_g: round_display(macros.fat_grams),
        carb_g: round_display(macros.carb_grams),
        bmr: round_display(bmr),
        activity_multiplier: multiplier,
    }
}

/// Round half-to-even; non-finite values saturate through the `as` cast
fn round_display(value: f64) -> i64 {
    value.round_ties_even() as i64
}
