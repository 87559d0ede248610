//! Timer alert listener background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::state::AppState;

/// Background task that records every timer alert raised by the session
pub async fn alert_listener_task(state: Arc<AppState>) {
    info!("Starting timer alert listener");

    let mut alert_rx = state.alert_tx.subscribe();

    loop {
        match alert_rx.recv().await {
            Ok(alert) => {
                info!("{}: {}", alert.title, alert.description);
                state.record_action("timer-complete");
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Alert listener lagged, skipped {} alerts", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Alert channel closed, stopping listener");
                break;
            }
        }
    }
}
