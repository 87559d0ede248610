//! Serving-size scaling of ingredient quantities

use serde::{Deserialize, Serialize};

use super::Ingredient;
use crate::error::ValidationError;

/// Round to two decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ratio between the target and the base serving count
pub fn scaling_ratio(base: u32, target: u32) -> Result<f64, ValidationError> {
    check_servings(base)?;
    check_servings(target)?;
    Ok(f64::from(target) / f64::from(base))
}

/// Reject serving counts below 1
pub fn check_servings(servings: u32) -> Result<u32, ValidationError> {
    if servings < 1 {
        return Err(ValidationError::Servings(servings));
    }
    Ok(servings)
}

/// Scale a single quantity from `base` to `target` servings
pub fn scale_quantity(quantity: f64, base: u32, target: u32) -> Result<f64, ValidationError> {
    let ratio = scaling_ratio(base, target)?;
    Ok(round2(quantity * ratio))
}

/// Return a copy of `ingredients` with every quantity scaled from `base` to
/// `target` servings. Names and units are untouched.
pub fn scale_ingredients(
    ingredients: &[Ingredient],
    base: u32,
    target: u32,
) -> Result<Vec<Ingredient>, ValidationError> {
    let ratio = scaling_ratio(base, target)?;
    Ok(ingredients
        .iter()
        .map(|ingredient| Ingredient {
            quantity: round2(ingredient.quantity * ratio),
            ..ingredient.clone()
        })
        .collect())
}

/// Direction of a serving change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleDirection {
    Up,
    Down,
    Unchanged,
}

/// Human-readable description of how quantities were scaled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingSummary {
    pub ratio: f64,
    pub direction: ScaleDirection,
    pub message: Option<String>,
}

impl ScalingSummary {
    pub fn new(base: u32, target: u32) -> Result<Self, ValidationError> {
        let ratio = scaling_ratio(base, target)?;
        let direction = match target.cmp(&base) {
            std::cmp::Ordering::Greater => ScaleDirection::Up,
            std::cmp::Ordering::Less => ScaleDirection::Down,
            std::cmp::Ordering::Equal => ScaleDirection::Unchanged,
        };
        let message = match direction {
            ScaleDirection::Unchanged => None,
            ScaleDirection::Up | ScaleDirection::Down => Some(format!(
                "Quantities scaled {} by {:.1}x",
                if direction == ScaleDirection::Up { "up" } else { "down" },
                (ratio - 1.0).abs()
            )),
        };
        Ok(Self {
            ratio,
            direction,
            message,
        })
    }
}
