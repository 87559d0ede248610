//! Recipe editor draft
//!
//! A [`RecipeDraft`] mirrors the editable fields of a [`Recipe`]. Edits only
//! live in the draft until it is submitted; dropping the draft discards them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{scaling::check_servings, Ingredient, Recipe, RecipeId, Step};
use crate::error::{AppError, ValidationError};

/// Serving count a blank draft starts with
pub const DEFAULT_DRAFT_SERVINGS: u32 = 4;

/// Author assigned to recipes created through the editor
pub const DEFAULT_AUTHOR: &str = "Current User";

/// Editable copy of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub servings: u32,
    pub tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub is_public: bool,
}

/// Which ingredient field an update targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum IngredientField {
    Name(String),
    Quantity(f64),
    Unit(String),
}

/// Which step field an update targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum StepField {
    Instruction(String),
    TimerMinutes(Option<u32>),
}

/// A single edit applied to a draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditorAction {
    SetTitle { title: String },
    SetDescription { description: String },
    SetServings { servings: u32 },
    SetPublic { is_public: bool },
    AddTag { tag: String },
    RemoveTag { tag: String },
    AddIngredient,
    RemoveIngredient { index: usize },
    UpdateIngredient { index: usize, update: IngredientField },
    AddStep,
    RemoveStep { index: usize },
    UpdateStep { index: usize, update: StepField },
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeDraft {
    /// Blank draft for a new recipe
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            servings: DEFAULT_DRAFT_SERVINGS,
            tags: Vec::new(),
            ingredients: vec![Ingredient::blank()],
            steps: vec![Step::new("")],
            is_public: false,
        }
    }

    /// Draft pre-filled from an existing recipe
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            servings: recipe.servings,
            tags: recipe.tags.clone(),
            ingredients: recipe.ingredients.clone(),
            steps: recipe.steps.clone(),
            is_public: recipe.is_public,
        }
    }

    pub fn add_ingredient(&mut self) {
        self.ingredients.push(Ingredient::blank());
    }

    pub fn remove_ingredient(&mut self, index: usize) -> Result<Ingredient, AppError> {
        let len = self.ingredients.len();
        if index >= len {
            return Err(AppError::IndexOutOfRange {
                kind: "ingredient",
                index,
                len,
            });
        }
        Ok(self.ingredients.remove(index))
    }

    pub fn update_ingredient(&mut self, index: usize, update: IngredientField) -> Result<(), AppError> {
        let len = self.ingredients.len();
        let row = self.ingredients.get_mut(index).ok_or(AppError::IndexOutOfRange {
            kind: "ingredient",
            index,
            len,
        })?;
        match update {
            IngredientField::Name(name) => row.name = name,
            IngredientField::Quantity(quantity) => row.quantity = quantity,
            IngredientField::Unit(unit) => row.unit = unit,
        }
        Ok(())
    }

    pub fn add_step(&mut self) {
        self.steps.push(Step::new(""));
    }

    pub fn remove_step(&mut self, index: usize) -> Result<Step, AppError> {
        let len = self.steps.len();
        if index >= len {
            return Err(AppError::IndexOutOfRange {
                kind: "step",
                index,
                len,
            });
        }
        Ok(self.steps.remove(index))
    }

    pub fn update_step(&mut self, index: usize, update: StepField) -> Result<(), AppError> {
        let len = self.steps.len();
        let row = self.steps.get_mut(index).ok_or(AppError::IndexOutOfRange {
            kind: "step",
            index,
            len,
        })?;
        match update {
            StepField::Instruction(instruction) => row.instruction = instruction,
            StepField::TimerMinutes(minutes) => row.timer_minutes = minutes,
        }
        Ok(())
    }

    /// Add a trimmed tag. Returns false when the tag is blank or already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|existing| existing == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove every tag equal to `tag`. Returns whether anything was removed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag);
        self.tags.len() != before
    }

    /// Apply a single editor action
    pub fn apply(&mut self, action: EditorAction) -> Result<(), AppError> {
        debug!("Applying editor action: {:?}", action);
        match action {
            EditorAction::SetTitle { title } => self.title = title,
            EditorAction::SetDescription { description } => self.description = description,
            EditorAction::SetServings { servings } => self.servings = servings,
            EditorAction::SetPublic { is_public } => self.is_public = is_public,
            EditorAction::AddTag { tag } => {
                self.add_tag(&tag);
            }
            EditorAction::RemoveTag { tag } => {
                self.remove_tag(&tag);
            }
            EditorAction::AddIngredient => self.add_ingredient(),
            EditorAction::RemoveIngredient { index } => {
                self.remove_ingredient(index)?;
            }
            EditorAction::UpdateIngredient { index, update } => self.update_ingredient(index, update)?,
            EditorAction::AddStep => self.add_step(),
            EditorAction::RemoveStep { index } => {
                self.remove_step(index)?;
            }
            EditorAction::UpdateStep { index, update } => self.update_step(index, update)?,
        }
        Ok(())
    }

    /// Check the draft can become a recipe
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        check_servings(self.servings)?;
        for ingredient in &self.ingredients {
            ingredient.validate()?;
        }
        for step in &self.steps {
            step.validate()?;
        }
        Ok(())
    }

    /// Build a brand-new recipe from this draft
    pub fn into_new_recipe(self, id: RecipeId) -> Result<Recipe, ValidationError> {
        self.validate()?;
        Ok(Recipe {
            id,
            title: self.title,
            description: self.description,
            servings: self.servings,
            tags: self.tags,
            ingredients: self.ingredients,
            steps: self.steps,
            author: DEFAULT_AUTHOR.to_string(),
            collaborators: Vec::new(),
            is_public: self.is_public,
        })
    }

    /// Overwrite the editable fields of `existing` with this draft
    pub fn merge_into(self, existing: &Recipe) -> Result<Recipe, ValidationError> {
        self.validate()?;
        Ok(Recipe {
            title: self.title,
            description: self.description,
            servings: self.servings,
            tags: self.tags,
            ingredients: self.ingredients,
            steps: self.steps,
            is_public: self.is_public,
            ..existing.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::sample_recipe;

    fn filled_draft() -> RecipeDraft {
        let mut draft = RecipeDraft::new();
        draft.title = "Pancakes".to_string();
        draft.description = "Fluffy".to_string();
        draft
    }

    #[test]
    fn blank_draft_has_one_row_each() {
        let draft = RecipeDraft::new();
        assert_eq!(draft.servings, DEFAULT_DRAFT_SERVINGS);
        assert_eq!(draft.ingredients, vec![Ingredient::blank()]);
        assert_eq!(draft.steps, vec![Step::new("")]);
        assert!(draft.tags.is_empty());
        assert!(!draft.is_public);
    }

    #[test]
    fn adding_tags_trims_and_deduplicates() {
        let mut draft = RecipeDraft::new();
        assert!(draft.add_tag("  Dessert "));
        assert!(!draft.add_tag("Dessert"));
        assert!(!draft.add_tag("   "));
        assert!(!draft.add_tag(""));
        assert!(draft.add_tag("dessert"));
        assert_eq!(draft.tags, vec!["Dessert", "dessert"]);

        assert!(draft.remove_tag("Dessert"));
        assert!(!draft.remove_tag("Dessert"));
        assert_eq!(draft.tags, vec!["dessert"]);
    }

    #[test]
    fn rows_can_be_added_updated_and_removed() {
        let mut draft = RecipeDraft::new();
        draft.add_ingredient();
        draft
            .update_ingredient(1, IngredientField::Name("sugar".into()))
            .unwrap();
        draft.update_ingredient(1, IngredientField::Quantity(0.5)).unwrap();
        draft
            .update_ingredient(1, IngredientField::Unit("cup".into()))
            .unwrap();
        assert_eq!(draft.ingredients[1], Ingredient::new("sugar", 0.5, "cup"));

        let removed = draft.remove_ingredient(0).unwrap();
        assert_eq!(removed, Ingredient::blank());
        assert_eq!(draft.ingredients.len(), 1);

        draft.add_step();
        draft.update_step(1, StepField::TimerMinutes(Some(5))).unwrap();
        assert_eq!(draft.steps[1].timer_minutes, Some(5));
        draft.remove_step(0).unwrap();
        assert_eq!(draft.steps.len(), 1);

        assert!(matches!(
            draft.remove_step(3),
            Err(AppError::IndexOutOfRange { kind: "step", index: 3, len: 1 })
        ));
        assert!(draft.update_ingredient(9, IngredientField::Quantity(1.0)).is_err());
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let action: EditorAction = serde_json::from_str(
            r#"{"action":"updateIngredient","index":0,"update":{"field":"quantity","value":2.5}}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            EditorAction::UpdateIngredient {
                index: 0,
                update: IngredientField::Quantity(2.5)
            }
        );

        let mut draft = RecipeDraft::new();
        draft.apply(action).unwrap();
        draft.apply(EditorAction::AddTag { tag: "Quick".into() }).unwrap();
        assert_eq!(draft.ingredients[0].quantity, 2.5);
        assert_eq!(draft.tags, vec!["Quick"]);
    }

    #[test]
    fn validation_rejects_bad_drafts() {
        assert_eq!(RecipeDraft::new().validate(), Err(ValidationError::EmptyTitle));

        let mut draft = filled_draft();
        draft.description = " ".into();
        assert_eq!(draft.validate(), Err(ValidationError::EmptyDescription));

        let mut draft = filled_draft();
        draft.servings = 0;
        assert_eq!(draft.validate(), Err(ValidationError::Servings(0)));

        let mut draft = filled_draft();
        draft.steps[0].timer_minutes = Some(0);
        assert_eq!(draft.validate(), Err(ValidationError::TimerMinutes));

        assert!(filled_draft().validate().is_ok());
    }

    #[test]
    fn new_recipe_gets_default_author() {
        let recipe = filled_draft().into_new_recipe(RecipeId::from("42")).unwrap();
        assert_eq!(recipe.id, RecipeId::from("42"));
        assert_eq!(recipe.author, DEFAULT_AUTHOR);
        assert!(recipe.collaborators.is_empty());
        assert_eq!(recipe.servings, DEFAULT_DRAFT_SERVINGS);
    }

    #[test]
    fn merge_keeps_identity_and_ownership() {
        let existing = sample_recipe(RecipeId::from("1"));
        let mut draft = RecipeDraft::from_recipe(&existing);
        draft.title = "Brown Butter Cookies".into();
        draft.servings = 12;

        let merged = draft.merge_into(&existing).unwrap();
        assert_eq!(merged.id, existing.id);
        assert_eq!(merged.author, existing.author);
        assert_eq!(merged.collaborators, existing.collaborators);
        assert_eq!(merged.title, "Brown Butter Cookies");
        assert_eq!(merged.servings, 12);
        assert_eq!(merged.steps, existing.steps);
    }
}
