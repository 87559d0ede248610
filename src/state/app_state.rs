//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use super::{RecipeView, TickOutcome, TimerPhase, TimerSnapshot, ViewSnapshot};
use crate::{
    error::{AppError, Result},
    recipe::{
        scale_ingredients, EditorAction, Ingredient, Recipe, RecipeBook, RecipeCard, RecipeDraft,
        RecipeId, ScalingSummary,
    },
    services::{Notifier, TimerAlert},
    tasks::TickScheduler,
};

/// An open editor: the draft plus the recipe it will overwrite, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSession {
    pub target: Option<RecipeId>,
    pub draft: RecipeDraft,
}

/// What the session is currently showing
#[derive(Debug, Default)]
pub enum Screen {
    #[default]
    List,
    Viewing(RecipeView),
    Editing(EditorSession),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::List => "list",
            Screen::Viewing(_) => "viewing",
            Screen::Editing(_) => "editing",
        }
    }
}

/// Navigation state and the tick scheduler of the active timer, guarded together
#[derive(Debug, Default)]
pub struct Session {
    pub screen: Screen,
    pub ticks: TickScheduler,
}

impl Session {
    fn view_mut(&mut self) -> Result<&mut RecipeView> {
        match &mut self.screen {
            Screen::Viewing(view) => Ok(view),
            _ => Err(AppError::NotViewing),
        }
    }

    fn editor_mut(&mut self) -> Result<&mut EditorSession> {
        match &mut self.screen {
            Screen::Editing(editor) => Ok(editor),
            _ => Err(AppError::NoDraft),
        }
    }

    fn timer_snapshot(&self) -> Option<TimerSnapshot> {
        match &self.screen {
            Screen::Viewing(view) => view.active_timer().map(|timer| timer.snapshot()),
            _ => None,
        }
    }

    /// Switch screens, cancelling any scheduled tick first
    fn navigate(&mut self, screen: Screen) {
        self.ticks.cancel();
        if let Screen::Viewing(view) = &mut self.screen {
            if view.active_timer().is_some() {
                let _ = view.stop_timer();
            }
        }
        self.screen = screen;
    }
}

/// Scaled ingredient list for one recipe at a given serving count
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledRecipe {
    pub recipe_id: RecipeId,
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
    pub scaling: ScalingSummary,
}

/// Session-wide status summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub recipe_count: usize,
    pub screen: String,
    pub viewing: Option<RecipeId>,
    pub timer: Option<TimerSnapshot>,
    pub last_alert: Option<TimerAlert>,
}

/// Main application state: the recipe book plus the single browsing session
pub struct AppState {
    /// Session recipe collection
    pub book: Mutex<RecipeBook>,
    /// Current screen and the active timer's tick scheduler
    pub session: Mutex<Session>,
    /// Completion notifications
    pub notifier: Arc<dyn Notifier>,
    pub tick_period: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<(String, DateTime<Utc>)>>,
    pub last_alert: Arc<Mutex<Option<TimerAlert>>>,
    /// Channel for timer completion alerts
    pub alert_tx: broadcast::Sender<TimerAlert>,
    /// Channel for timer display updates, read by the timer stream
    pub timer_update_tx: watch::Sender<Option<TimerSnapshot>>,
}

impl AppState {
    /// Create a new AppState around `book`
    pub fn new(
        book: RecipeBook,
        notifier: Arc<dyn Notifier>,
        tick_period: Duration,
        port: u16,
        host: String,
    ) -> Self {
        let (alert_tx, _) = broadcast::channel(16);
        let (timer_update_tx, _) = watch::channel(None);

        Self {
            book: Mutex::new(book),
            session: Mutex::new(Session::default()),
            notifier,
            tick_period,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_alert: Arc::new(Mutex::new(None)),
            alert_tx,
            timer_update_tx,
        }
    }

    fn book(&self) -> Result<MutexGuard<'_, RecipeBook>> {
        self.book.lock().map_err(|_| AppError::Lock("recipe book"))
    }

    fn session(&self) -> Result<MutexGuard<'_, Session>> {
        self.session.lock().map_err(|_| AppError::Lock("session"))
    }

    /// Remember the most recent user-visible action
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some((action.to_string(), Utc::now()));
        }
    }

    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|a| a.clone()) {
            Some((action, at)) => (Some(action), Some(at)),
            None => (None, None),
        }
    }

    fn publish_timer(&self, snapshot: Option<TimerSnapshot>) {
        self.timer_update_tx.send_replace(snapshot);
    }

    /// Watch the active timer; the receiver starts at the current snapshot
    pub fn subscribe_timer(&self) -> watch::Receiver<Option<TimerSnapshot>> {
        self.timer_update_tx.subscribe()
    }

    // ---- recipe book ----

    pub fn list_recipes(&self) -> Result<Vec<RecipeCard>> {
        Ok(self.book()?.cards())
    }

    pub fn get_recipe(&self, id: &RecipeId) -> Result<Recipe> {
        Ok(self.book()?.require(id)?.clone())
    }

    /// Scale a stored recipe's ingredients to `servings`
    pub fn scaled_recipe(&self, id: &RecipeId, servings: u32) -> Result<ScaledRecipe> {
        let book = self.book()?;
        let recipe = book.require(id)?;
        Ok(ScaledRecipe {
            recipe_id: recipe.id.clone(),
            servings,
            ingredients: scale_ingredients(&recipe.ingredients, recipe.servings, servings)?,
            scaling: ScalingSummary::new(recipe.servings, servings)?,
        })
    }

    // ---- recipe view ----

    /// Show `id`, leaving whatever was on screen before
    pub fn open_view(&self, id: &RecipeId) -> Result<ViewSnapshot> {
        let recipe = self.get_recipe(id)?;
        let view = RecipeView::new(&recipe);
        let snapshot = view.snapshot(&recipe)?;

        self.session()?.navigate(Screen::Viewing(view));
        self.publish_timer(None);
        self.record_action("view");
        info!("Viewing recipe {} ({})", recipe.id, recipe.title);
        Ok(snapshot)
    }

    /// Return to the recipe list
    pub fn close_view(&self) -> Result<()> {
        let mut session = self.session()?;
        if !matches!(session.screen, Screen::Viewing(_)) {
            return Err(AppError::NotViewing);
        }
        session.navigate(Screen::List);
        drop(session);

        self.publish_timer(None);
        self.record_action("back");
        Ok(())
    }

    pub fn view_snapshot(&self) -> Result<ViewSnapshot> {
        let mut session = self.session()?;
        let view = session.view_mut()?;
        let recipe = self.get_recipe(view.recipe_id())?;
        Ok(view.snapshot(&recipe)?)
    }

    pub fn set_servings(&self, servings: u32) -> Result<ViewSnapshot> {
        let mut session = self.session()?;
        let view = session.view_mut()?;
        view.set_servings(servings)?;
        let recipe = self.get_recipe(view.recipe_id())?;
        self.record_action("servings");
        Ok(view.snapshot(&recipe)?)
    }

    // ---- active timer ----

    /// Start the timer of `step_index` in the current view, replacing any
    /// timer already running
    pub fn start_timer(self: &Arc<Self>, step_index: usize) -> Result<TimerSnapshot> {
        let mut session = self.session()?;
        let recipe = {
            let view = session.view_mut()?;
            self.get_recipe(view.recipe_id())?
        };

        let alert_tx = self.alert_tx.clone();
        let last_alert = Arc::clone(&self.last_alert);
        let on_complete = move |alert: &TimerAlert| {
            if let Ok(mut last) = last_alert.lock() {
                *last = Some(alert.clone());
            }
            if let Err(e) = alert_tx.send(alert.clone()) {
                warn!("No listener for timer alert: {}", e);
            }
        };

        let view = session.view_mut()?;
        let snapshot = view
            .start_timer(&recipe, step_index, Arc::clone(&self.notifier), on_complete)?
            .snapshot();
        session.ticks.schedule(Arc::clone(self));
        drop(session);

        self.publish_timer(Some(snapshot.clone()));
        self.record_action("timer-start");
        Ok(snapshot)
    }

    /// Pause a running timer or resume a paused one
    pub fn toggle_timer(self: &Arc<Self>) -> Result<TimerSnapshot> {
        let mut session = self.session()?;
        let timer = session
            .view_mut()?
            .active_timer_mut()
            .ok_or(AppError::NoActiveTimer)?;
        let phase = timer.toggle();
        let snapshot = timer.snapshot();

        if phase == TimerPhase::Running {
            session.ticks.schedule(Arc::clone(self));
        } else {
            session.ticks.cancel();
        }
        drop(session);

        self.publish_timer(Some(snapshot.clone()));
        self.record_action(if phase == TimerPhase::Running { "timer-resume" } else { "timer-pause" });
        Ok(snapshot)
    }

    /// Restore the active timer's full duration, paused
    pub fn reset_timer(&self) -> Result<TimerSnapshot> {
        let mut session = self.session()?;
        session.ticks.cancel();
        let timer = session
            .view_mut()?
            .active_timer_mut()
            .ok_or(AppError::NoActiveTimer)?;
        if !timer.reset() {
            warn!("Ignoring reset of a finished timer");
        }
        let snapshot = timer.snapshot();
        drop(session);

        self.publish_timer(Some(snapshot.clone()));
        self.record_action("timer-reset");
        Ok(snapshot)
    }

    /// Dismiss the active timer
    pub fn close_timer(&self) -> Result<()> {
        let mut session = self.session()?;
        session.ticks.cancel();
        session.view_mut()?.stop_timer()?;
        drop(session);

        self.publish_timer(None);
        self.record_action("timer-close");
        Ok(())
    }

    /// Deliver one scheduled tick. Returns whether the tick task should keep
    /// running; stale generations are ignored.
    pub fn tick_timer(&self, generation: u64) -> Result<bool> {
        let mut session = self.session()?;
        if !session.ticks.is_current(generation) {
            return Ok(false);
        }

        let (outcome, snapshot) = match &mut session.screen {
            Screen::Viewing(view) => {
                let outcome = view.tick();
                (outcome, view.active_timer().map(|timer| timer.snapshot()))
            }
            _ => (TickOutcome::Idle, None),
        };

        let keep_ticking = matches!(outcome, TickOutcome::Counting(_));
        if !keep_ticking {
            session.ticks.release(generation);
        }
        drop(session);

        self.publish_timer(snapshot);
        Ok(keep_ticking)
    }

    pub fn timer_snapshot(&self) -> Result<Option<TimerSnapshot>> {
        Ok(self.session()?.timer_snapshot())
    }

    // ---- editor ----

    /// Open the editor on a blank draft, or on a copy of `id`
    pub fn open_editor(&self, id: Option<&RecipeId>) -> Result<EditorSession> {
        let draft = match id {
            Some(id) => RecipeDraft::from_recipe(&self.get_recipe(id)?),
            None => RecipeDraft::new(),
        };
        let editor = EditorSession {
            target: id.cloned(),
            draft,
        };

        self.session()?.navigate(Screen::Editing(editor.clone()));
        self.publish_timer(None);
        self.record_action(if id.is_some() { "edit" } else { "new" });
        Ok(editor)
    }

    pub fn editor(&self) -> Result<EditorSession> {
        Ok(self.session()?.editor_mut()?.clone())
    }

    pub fn apply_editor_action(&self, action: EditorAction) -> Result<EditorSession> {
        let mut session = self.session()?;
        let editor = session.editor_mut()?;
        editor.draft.apply(action)?;
        Ok(editor.clone())
    }

    /// Save the draft into the book and return to the list. The draft stays
    /// open when validation fails.
    pub fn submit_editor(&self) -> Result<Recipe> {
        let mut session = self.session()?;
        let editor = session.editor_mut()?;
        let draft = editor.draft.clone();

        let recipe = {
            let mut book = self.book()?;
            match &editor.target {
                Some(id) => book.update(id, draft)?,
                None => book.create(draft)?,
            }
        };
        session.navigate(Screen::List);
        drop(session);

        self.record_action("save");
        Ok(recipe)
    }

    /// Drop the draft without saving
    pub fn discard_editor(&self) -> Result<()> {
        let mut session = self.session()?;
        session.editor_mut()?;
        session.navigate(Screen::List);
        info!("Discarded recipe draft");
        self.record_action("discard");
        Ok(())
    }

    // ---- status ----

    pub fn status(&self) -> Result<SessionStatus> {
        let recipe_count = self.book()?.len();
        let session = self.session()?;
        let viewing = match &session.screen {
            Screen::Viewing(view) => Some(view.recipe_id().clone()),
            _ => None,
        };
        Ok(SessionStatus {
            recipe_count,
            screen: session.screen.name().to_string(),
            viewing,
            timer: session.timer_snapshot(),
            last_alert: self.last_alert.lock().ok().and_then(|a| a.clone()),
        })
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::LogNotifier;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(
            RecipeBook::seeded(),
            Arc::new(LogNotifier),
            Duration::from_secs(1),
            0,
            "127.0.0.1".to_string(),
        ))
    }

    fn cookies() -> RecipeId {
        RecipeId::from("1")
    }

    async fn advance_secs(secs: f64) {
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn running_timer_counts_down_once_per_second() {
        let state = state();
        state.open_view(&cookies()).unwrap();
        let started = state.start_timer(2).unwrap();
        assert_eq!(started.display, "03:00");

        advance_secs(90.5).await;
        let timer = state.timer_snapshot().unwrap().unwrap();
        assert_eq!(timer.display, "01:30");
        assert_eq!(*state.timer_update_tx.borrow(), Some(timer));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_subscribers_see_every_change() {
        let state = state();
        let mut updates = state.subscribe_timer();
        assert!(updates.borrow_and_update().is_none());

        state.open_view(&cookies()).unwrap();
        state.start_timer(2).unwrap();
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().as_ref().unwrap().display, "03:00");

        advance_secs(1.5).await;
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().as_ref().unwrap().display, "02:59");

        state.close_timer().unwrap();
        assert!(updates.has_changed().unwrap());
        assert!(updates.borrow_and_update().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn completed_timer_alerts_once_and_clears() {
        let state = state();
        let mut alerts = state.alert_tx.subscribe();
        state.open_view(&cookies()).unwrap();
        state.start_timer(2).unwrap();

        advance_secs(180.5).await;
        let alert = alerts.try_recv().unwrap();
        assert_eq!(alert.description, "Your 3-minute timer has finished.");
        assert!(alerts.try_recv().is_err());

        assert!(state.timer_snapshot().unwrap().is_none());
        assert!(!state.session.lock().unwrap().ticks.is_pending());
        assert_eq!(state.status().unwrap().last_alert, Some(alert));
    }

    #[tokio::test(start_paused = true)]
    async fn paused_timer_does_not_lose_time() {
        let state = state();
        state.open_view(&cookies()).unwrap();
        state.start_timer(0).unwrap();

        advance_secs(10.5).await;
        let paused = state.toggle_timer().unwrap();
        assert_eq!(paused.phase, TimerPhase::Paused);
        assert_eq!(paused.remaining_seconds, 590);

        advance_secs(30.0).await;
        assert_eq!(state.timer_snapshot().unwrap().unwrap().remaining_seconds, 590);

        let resumed = state.toggle_timer().unwrap();
        assert!(resumed.running);
        advance_secs(5.5).await;
        assert_eq!(state.timer_snapshot().unwrap().unwrap().remaining_seconds, 585);
    }

    #[tokio::test(start_paused = true)]
    async fn toggling_twice_never_double_ticks() {
        let state = state();
        state.open_view(&cookies()).unwrap();
        state.start_timer(0).unwrap();
        for _ in 0..5 {
            state.toggle_timer().unwrap();
            state.toggle_timer().unwrap();
        }
        advance_secs(3.5).await;
        assert_eq!(state.timer_snapshot().unwrap().unwrap().remaining_seconds, 597);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_pauses_at_full_duration() {
        let state = state();
        state.open_view(&cookies()).unwrap();
        state.start_timer(3).unwrap();
        advance_secs(42.5).await;

        let reset = state.reset_timer().unwrap();
        assert_eq!(reset.display, "10:00");
        assert_eq!(reset.phase, TimerPhase::Paused);

        advance_secs(5.0).await;
        assert_eq!(state.timer_snapshot().unwrap().unwrap().remaining_seconds, 600);
    }

    #[tokio::test(start_paused = true)]
    async fn closing_or_leaving_cancels_ticks() {
        let state = state();
        state.open_view(&cookies()).unwrap();
        state.start_timer(0).unwrap();
        state.close_timer().unwrap();
        assert!(!state.session.lock().unwrap().ticks.is_pending());
        assert!(matches!(state.close_timer(), Err(AppError::NoActiveTimer)));

        state.start_timer(0).unwrap();
        state.close_view().unwrap();
        assert!(!state.session.lock().unwrap().ticks.is_pending());
        assert_eq!(state.status().unwrap().screen, "list");
        assert!(matches!(state.start_timer(0), Err(AppError::NotViewing)));
    }

    #[tokio::test]
    async fn stale_generation_is_ignored() {
        let state = state();
        state.open_view(&cookies()).unwrap();
        state.start_timer(0).unwrap();
        let stale = {
            let mut session = state.session.lock().unwrap();
            let first = session.ticks.schedule(Arc::clone(&state));
            session.ticks.schedule(Arc::clone(&state));
            first
        };
        assert!(!state.tick_timer(stale).unwrap());
        assert_eq!(state.timer_snapshot().unwrap().unwrap().remaining_seconds, 600);
    }

    #[tokio::test]
    async fn servings_are_scaled_in_the_view() {
        let state = state();
        state.open_view(&cookies()).unwrap();
        let snapshot = state.set_servings(48).unwrap();
        assert_eq!(snapshot.scaled_ingredients[0].quantity, 4.5);
        assert!(matches!(
            state.set_servings(0),
            Err(AppError::Validation(_))
        ));

        let scaled = state.scaled_recipe(&cookies(), 12).unwrap();
        assert_eq!(scaled.ingredients[3].quantity, 1.0);
    }

    #[tokio::test]
    async fn editor_creates_and_updates_recipes() {
        let state = state();
        state.open_editor(None).unwrap();
        for action in [
            EditorAction::SetTitle { title: "Tea".into() },
            EditorAction::SetDescription { description: "Hot".into() },
            EditorAction::AddTag { tag: "Drink".into() },
            EditorAction::AddTag { tag: "Drink ".into() },
        ] {
            state.apply_editor_action(action).unwrap();
        }
        assert_eq!(state.editor().unwrap().draft.tags, vec!["Drink"]);
        let created = state.submit_editor().unwrap();
        assert_eq!(created.author, "Current User");
        assert_eq!(state.list_recipes().unwrap().len(), 2);
        assert!(matches!(state.editor(), Err(AppError::NoDraft)));

        state.open_editor(Some(&cookies())).unwrap();
        state
            .apply_editor_action(EditorAction::SetServings { servings: 12 })
            .unwrap();
        let updated = state.submit_editor().unwrap();
        assert_eq!(updated.servings, 12);
        assert_eq!(updated.author, "Chef Sarah");
        assert_eq!(state.list_recipes().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn discarded_or_invalid_drafts_change_nothing() {
        let state = state();
        state.open_editor(None).unwrap();
        assert!(matches!(state.submit_editor(), Err(AppError::Validation(_))));
        assert_eq!(state.status().unwrap().screen, "editing");

        state
            .apply_editor_action(EditorAction::SetTitle { title: "Toast".into() })
            .unwrap();
        state.discard_editor().unwrap();
        assert_eq!(state.list_recipes().unwrap().len(), 1);
        assert!(matches!(state.discard_editor(), Err(AppError::NoDraft)));
    }
}
