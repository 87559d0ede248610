//! Configuration and CLI argument handling

use std::{sync::Arc, time::Duration};
use clap::Parser;

use crate::{
    recipe::RecipeBook,
    services::{LogNotifier, Notifier, TerminalBell},
};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "recipe-timer")]
#[command(about = "An in-memory recipe book with serving scaling and cooking timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Countdown tick period in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_millis: u64,

    /// Ring the terminal bell when a cooking timer finishes
    #[arg(long)]
    pub bell: bool,

    /// Start with an empty recipe book instead of the sample recipe
    #[arg(long)]
    pub no_seed: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// Notifier selected by `--bell`
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        if self.bell {
            Arc::new(TerminalBell)
        } else {
            Arc::new(LogNotifier)
        }
    }

    /// Initial recipe book selected by `--no-seed`
    pub fn recipe_book(&self) -> RecipeBook {
        if self.no_seed {
            RecipeBook::new()
        } else {
            RecipeBook::seeded()
        }
    }
}
