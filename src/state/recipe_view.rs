//! Display context for the recipe currently being viewed

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::timer_state::{CountdownTimer, TickOutcome, TimerSnapshot};
use crate::{
    error::{AppError, ValidationError},
    recipe::{scale_ingredients, scaling::check_servings, Ingredient, Recipe, RecipeId, ScalingSummary},
    services::{Notifier, TimerAlert},
};

/// Serving scaler plus at most one active step timer for one recipe
#[derive(Debug)]
pub struct RecipeView {
    recipe_id: RecipeId,
    base_servings: u32,
    current_servings: u32,
    active_timer: Option<CountdownTimer>,
}

impl RecipeView {
    /// Open a view at the recipe's own serving count with no timer
    pub fn new(recipe: &Recipe) -> Self {
        Self {
            recipe_id: recipe.id.clone(),
            base_servings: recipe.servings,
            current_servings: recipe.servings,
            active_timer: None,
        }
    }

    pub fn recipe_id(&self) -> &RecipeId {
        &self.recipe_id
    }

    pub fn current_servings(&self) -> u32 {
        self.current_servings
    }

    pub fn set_servings(&mut self, servings: u32) -> Result<u32, ValidationError> {
        self.current_servings = check_servings(servings)?;
        Ok(self.current_servings)
    }

    pub fn scaling_ratio(&self) -> f64 {
        f64::from(self.current_servings) / f64::from(self.base_servings)
    }

    pub fn scaled_ingredients(&self, recipe: &Recipe) -> Result<Vec<Ingredient>, ValidationError> {
        scale_ingredients(&recipe.ingredients, self.base_servings, self.current_servings)
    }

    pub fn active_timer(&self) -> Option<&CountdownTimer> {
        self.active_timer.as_ref()
    }

    pub fn active_timer_mut(&mut self) -> Option<&mut CountdownTimer> {
        self.active_timer.as_mut()
    }

    /// Start the timer of `step_index`, replacing any timer already shown
    pub fn start_timer(
        &mut self,
        recipe: &Recipe,
        step_index: usize,
        notifier: Arc<dyn Notifier>,
        on_complete: impl FnOnce(&TimerAlert) + Send + 'static,
    ) -> Result<&CountdownTimer, AppError> {
        let step = recipe.step(step_index).ok_or(AppError::StepOutOfRange {
            index: step_index,
            len: recipe.steps.len(),
        })?;
        let minutes = step.timer_minutes.ok_or(AppError::NoTimerForStep(step_index))?;

        let timer = CountdownTimer::new(step_index, minutes)?
            .with_notifier(notifier)
            .on_complete(on_complete)
            .on_dismiss(move || info!("Timer for step {} closed", step_index + 1));

        if let Some(previous) = self.active_timer.replace(timer) {
            info!(
                "Replacing timer for step {} with step {}",
                previous.step_index() + 1,
                step_index + 1
            );
        }
        info!("Started {}-minute timer for step {}", minutes, step_index + 1);
        self.active_timer.as_ref().ok_or(AppError::NoActiveTimer)
    }

    /// Dismiss and drop the active timer
    pub fn stop_timer(&mut self) -> Result<(), AppError> {
        let mut timer = self.active_timer.take().ok_or(AppError::NoActiveTimer)?;
        timer.dismiss();
        Ok(())
    }

    /// Deliver one tick to the active timer. A completed timer is removed
    /// from the view.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(timer) = self.active_timer.as_mut() else {
            return TickOutcome::Idle;
        };
        let outcome = timer.tick();
        if outcome == TickOutcome::Completed {
            self.active_timer = None;
        }
        outcome
    }

    pub fn snapshot(&self, recipe: &Recipe) -> Result<ViewSnapshot, ValidationError> {
        Ok(ViewSnapshot {
            recipe: recipe.clone(),
            current_servings: self.current_servings,
            scaled_ingredients: self.scaled_ingredients(recipe)?,
            scaling: ScalingSummary::new(self.base_servings, self.current_servings)?,
            timer: self.active_timer.as_ref().map(CountdownTimer::snapshot),
        })
    }
}

/// Everything a client needs to render the recipe view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub recipe: Recipe,
    pub current_servings: u32,
    pub scaled_ingredients: Vec<Ingredient>,
    pub scaling: ScalingSummary,
    pub timer: Option<TimerSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{recipe::sample_recipe, services::LogNotifier, state::TimerPhase};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cookies() -> Recipe {
        sample_recipe(RecipeId::from("1"))
    }

    fn notifier() -> Arc<dyn Notifier> {
        Arc::new(LogNotifier)
    }

    #[test]
    fn view_starts_at_base_servings() {
        let recipe = cookies();
        let view = RecipeView::new(&recipe);
        assert_eq!(view.current_servings(), 24);
        assert_eq!(view.scaling_ratio(), 1.0);
        assert_eq!(view.scaled_ingredients(&recipe).unwrap(), recipe.ingredients);
        assert!(view.active_timer().is_none());
    }

    #[test]
    fn changing_servings_scales_ingredients() {
        let recipe = cookies();
        let mut view = RecipeView::new(&recipe);
        view.set_servings(12).unwrap();
        let scaled = view.scaled_ingredients(&recipe).unwrap();
        assert_eq!(scaled[0].quantity, 1.13);
        assert_eq!(scaled[1].quantity, 0.5);

        assert_eq!(view.set_servings(0), Err(ValidationError::Servings(0)));
        assert_eq!(view.current_servings(), 12);

        let snapshot = view.snapshot(&recipe).unwrap();
        assert_eq!(
            snapshot.scaling.message.as_deref(),
            Some("Quantities scaled down by 0.5x")
        );
    }

    #[test]
    fn untimed_or_missing_steps_cannot_start_timers() {
        let recipe = cookies();
        let mut view = RecipeView::new(&recipe);
        assert!(matches!(
            view.start_timer(&recipe, 1, notifier(), |_| {}),
            Err(AppError::NoTimerForStep(1))
        ));
        assert!(matches!(
            view.start_timer(&recipe, 9, notifier(), |_| {}),
            Err(AppError::StepOutOfRange { index: 9, len: 4 })
        ));
        assert!(matches!(view.stop_timer(), Err(AppError::NoActiveTimer)));
    }

    #[test]
    fn starting_another_step_replaces_the_timer() {
        let recipe = cookies();
        let mut view = RecipeView::new(&recipe);
        view.start_timer(&recipe, 0, notifier(), |_| {}).unwrap();
        view.tick();
        let timer = view.start_timer(&recipe, 2, notifier(), |_| {}).unwrap();
        assert_eq!(timer.step_index(), 2);
        assert_eq!(timer.remaining_seconds(), 180);
        assert_eq!(timer.phase(), TimerPhase::Running);
    }

    #[test]
    fn completion_clears_the_active_timer() {
        let recipe = cookies();
        let mut view = RecipeView::new(&recipe);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        view.start_timer(&recipe, 2, notifier(), move |alert| {
            assert_eq!(alert.minutes, 3);
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        for _ in 0..179 {
            assert!(matches!(view.tick(), TickOutcome::Counting(_)));
        }
        assert_eq!(view.tick(), TickOutcome::Completed);
        assert!(view.active_timer().is_none());
        assert_eq!(view.tick(), TickOutcome::Idle);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stopping_removes_the_timer() {
        let recipe = cookies();
        let mut view = RecipeView::new(&recipe);
        view.start_timer(&recipe, 3, notifier(), |_| {}).unwrap();
        view.stop_timer().unwrap();
        assert!(view.active_timer().is_none());
        assert!(view.snapshot(&recipe).unwrap().timer.is_none());
    }
}
