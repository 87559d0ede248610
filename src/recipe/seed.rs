//! Sample recipe the book starts with

use super::{Ingredient, Recipe, RecipeId, Step};

/// The chocolate chip cookie recipe every fresh session starts with
pub fn sample_recipe(id: RecipeId) -> Recipe {
    Recipe {
        id,
        title: "Classic Chocolate Chip Cookies".to_string(),
        description: "Perfectly chewy cookies with gooey chocolate chips".to_string(),
        servings: 24,
        tags: vec!["Dessert".to_string(), "Quick".to_string()],
        ingredients: vec![
            Ingredient::new("All-purpose flour", 2.25, "cups"),
            Ingredient::new("Butter", 1.0, "cup"),
            Ingredient::new("Brown sugar", 0.75, "cup"),
            Ingredient::new("Chocolate chips", 2.0, "cups"),
        ],
        steps: vec![
            Step::timed("Preheat oven to 375°F", 10),
            Step::new("Mix dry ingredients in a bowl"),
            Step::timed("Cream butter and sugars", 3),
            Step::timed("Bake for 9-11 minutes", 10),
        ],
        author: "Chef Sarah".to_string(),
        collaborators: vec!["baker123".to_string()],
        is_public: true,
    }
}
