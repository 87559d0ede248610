//! Recipe, ingredient and step records

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Opaque recipe identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl RecipeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A single ingredient row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }

    /// Blank row used by the editor
    pub fn blank() -> Self {
        Self::new("", 0.0, "")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            return Err(ValidationError::Quantity {
                name: self.name.clone(),
                quantity: self.quantity,
            });
        }
        Ok(())
    }
}

/// A single instruction, optionally timed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_minutes: Option<u32>,
}

impl Step {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            timer_minutes: None,
        }
    }

    pub fn timed(instruction: impl Into<String>, minutes: u32) -> Self {
        Self {
            instruction: instruction.into(),
            timer_minutes: Some(minutes),
        }
    }

    pub fn has_timer(&self) -> bool {
        self.timer_minutes.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.timer_minutes {
            Some(0) => Err(ValidationError::TimerMinutes),
            _ => Ok(()),
        }
    }
}

/// A recipe as stored in the recipe book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    pub servings: u32,
    pub tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub author: String,
    pub collaborators: Vec<String>,
    pub is_public: bool,
}

impl Recipe {
    /// Number of steps that carry a timer
    pub fn timer_count(&self) -> usize {
        self.steps.iter().filter(|step| step.has_timer()).count()
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Compact card shown in the recipe list
    pub fn card(&self) -> RecipeCard {
        RecipeCard {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            servings: self.servings,
            tags: self.tags.clone(),
            timer_count: self.timer_count(),
            collaborator_count: self.collaborators.len(),
            is_public: self.is_public,
        }
    }
}

/// Summary of a recipe for list views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCard {
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    pub servings: u32,
    pub tags: Vec<String>,
    pub timer_count: usize,
    pub collaborator_count: usize,
    pub is_public: bool,
}
