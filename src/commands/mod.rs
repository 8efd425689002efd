//! Subcommand handlers. Each handler talks to the service through
//! [`SpeechApi`] and writes user-facing output to the session console.

pub mod accuracy_test;
pub mod dataset;
pub mod endpoint;
pub mod model;
pub mod transcript;

use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use crate::api::{ApiError, SpeechApi};
use crate::cli::Commands;
use crate::console::Console;
use crate::dto::Properties;
use crate::poller::{ExitSignal, JobPoller, POLL_INTERVAL, UNAUTHORIZED_HINT};

/// Everything a handler needs: the API, the output sink and the poll cadence.
pub struct Session<'a> {
    pub api: &'a dyn SpeechApi,
    pub console: &'a mut dyn Console,
    pub poll_interval: Duration,
}

impl<'a> Session<'a> {
    pub fn new(api: &'a dyn SpeechApi, console: &'a mut dyn Console) -> Self {
        Self {
            api,
            console,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn poller(&mut self) -> JobPoller<'_> {
        JobPoller::new(&mut *self.console).with_interval(self.poll_interval)
    }

    pub fn println(&mut self, line: &str) {
        self.console.println(line);
    }

    /// Turns a failed call into an error for `main` to report.
    pub fn api_failure(&mut self, error: ApiError) -> anyhow::Error {
        if error.is_unauthorized() {
            self.console.eprintln(UNAUTHORIZED_HINT);
        }
        anyhow::Error::new(error).context("API call ended with error")
    }

    pub fn print_json<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value)?;
        self.console.println(&text);
        Ok(())
    }
}

pub fn run(command: Commands, session: &mut Session<'_>) -> Result<ExitSignal> {
    match command {
        Commands::Dataset(command) => dataset::run(command, session),
        Commands::Model(command) => model::run(command, session),
        Commands::Test(command) => accuracy_test::run(command, session),
        Commands::Endpoint(command) => endpoint::run(command, session),
        Commands::Transcript(command) => transcript::run(command, session),
    }
}

/// Parses `"name1=value1;name2=value2"`. Entries without exactly one `=` are
/// dropped; blank input yields `None`.
pub fn split_properties(properties: Option<&str>) -> Option<Properties> {
    let properties = properties.filter(|p| !p.trim().is_empty())?;

    Some(
        properties
            .split(';')
            .filter_map(|entry| {
                let mut parts = entry.split('=');
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(name), Some(value), None) => Some((name.to_string(), value.to_string())),
                    _ => None,
                }
            })
            .collect(),
    )
}

pub fn locale_or_default(locale: Option<String>) -> String {
    locale.unwrap_or_else(|| crate::config::DEFAULT_LOCALE.to_string())
}

/// Prints the locales supported for `kind` ("acoustic", "language", ...) of
/// `noun` ("datasets" or "models").
pub fn print_locales(
    session: &mut Session<'_>,
    kind: &str,
    noun: &str,
    locales: Option<Vec<String>>,
    simple: bool,
) {
    match locales {
        None => {
            if !simple {
                session.println("No locales for this type.");
            }
        }
        Some(locales) => {
            if !simple {
                session.println(&format!("Supported locales for {kind} {noun}:"));
            }
            session.println(&locales.join("\n"));
        }
    }
}

pub fn format_created(created: Option<chrono::DateTime<chrono::Utc>>) -> String {
    created
        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
