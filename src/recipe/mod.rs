//! Recipe domain module
//!
//! Recipe records, the in-memory recipe book, the editor draft and the
//! serving scaler.

pub mod book;
pub mod editor;
pub mod model;
pub mod scaling;
pub mod seed;

// Re-export main types
pub use book::RecipeBook;
pub use editor::{EditorAction, RecipeDraft};
pub use model::{Ingredient, Recipe, RecipeCard, RecipeId, Step};
pub use scaling::{scale_ingredients, ScalingSummary};
pub use seed::sample_recipe;
