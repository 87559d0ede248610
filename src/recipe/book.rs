//! In-memory recipe collection for one session

use chrono::Utc;
use tracing::info;

use super::{sample_recipe, Recipe, RecipeCard, RecipeDraft, RecipeId};
use crate::error::AppError;

/// Ordered collection of recipes, newest last
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
    last_issued_id: i64,
}

impl RecipeBook {
    /// Create an empty recipe book
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recipe book holding the sample recipe under id "1"
    pub fn seeded() -> Self {
        Self {
            recipes: vec![sample_recipe(RecipeId::from("1"))],
            last_issued_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn cards(&self) -> Vec<RecipeCard> {
        self.recipes.iter().map(Recipe::card).collect()
    }

    pub fn get(&self, id: &RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| &recipe.id == id)
    }

    /// Look up a recipe, failing with `RecipeNotFound`
    pub fn require(&self, id: &RecipeId) -> Result<&Recipe, AppError> {
        self.get(id)
            .ok_or_else(|| AppError::RecipeNotFound(id.to_string()))
    }

    /// Millisecond timestamp id, bumped past the last issued one so two
    /// recipes created in the same millisecond never collide.
    fn fresh_id(&mut self) -> RecipeId {
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last_issued_id + 1);
        self.last_issued_id = id;
        RecipeId(id.to_string())
    }

    /// Store a draft as a brand-new recipe
    pub fn create(&mut self, draft: RecipeDraft) -> Result<Recipe, AppError> {
        draft.validate()?;
        let id = self.fresh_id();
        let recipe = draft.into_new_recipe(id)?;
        info!("Created recipe {} ({})", recipe.id, recipe.title);
        self.recipes.push(recipe.clone());
        Ok(recipe)
    }

    /// Overwrite an existing recipe with a draft
    pub fn update(&mut self, id: &RecipeId, draft: RecipeDraft) -> Result<Recipe, AppError> {
        let slot = self
            .recipes
            .iter_mut()
            .find(|recipe| &recipe.id == id)
            .ok_or_else(|| AppError::RecipeNotFound(id.to_string()))?;
        let updated = draft.merge_into(slot)?;
        *slot = updated.clone();
        info!("Updated recipe {} ({})", updated.id, updated.title);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> RecipeDraft {
        let mut draft = RecipeDraft::new();
        draft.title = title.to_string();
        draft.description = "Tasty".to_string();
        draft
    }

    #[test]
    fn seeded_book_holds_the_sample_recipe() {
        let book = RecipeBook::seeded();
        assert_eq!(book.len(), 1);
        let cards = book.cards();
        assert_eq!(cards[0].title, "Classic Chocolate Chip Cookies");
        assert_eq!(cards[0].timer_count, 3);
        assert_eq!(cards[0].collaborator_count, 1);
    }

    #[test]
    fn created_recipes_get_distinct_ids() {
        let mut book = RecipeBook::new();
        let first = book.create(draft("Soup")).unwrap();
        let second = book.create(draft("Salad")).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(book.len(), 2);
        assert_eq!(book.require(&second.id).unwrap().title, "Salad");
    }

    #[test]
    fn invalid_draft_is_not_stored() {
        let mut book = RecipeBook::new();
        let result = book.create(RecipeDraft::new());
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(book.is_empty());
    }

    #[test]
    fn update_overwrites_in_place() {
        let mut book = RecipeBook::seeded();
        let id = RecipeId::from("1");
        let mut edit = RecipeDraft::from_recipe(book.require(&id).unwrap());
        edit.add_tag("Vegetarian");

        let updated = book.update(&id, edit).unwrap();
        assert_eq!(updated.tags, vec!["Dessert", "Quick", "Vegetarian"]);
        assert_eq!(book.require(&id).unwrap().tags.len(), 3);
        assert_eq!(book.len(), 1);

        assert!(matches!(
            book.update(&RecipeId::from("nope"), draft("x")),
            Err(AppError::RecipeNotFound(_))
        ));
    }
}
