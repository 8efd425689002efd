//! Create-then-poll driver shared by every long-running server resource.
//!
//! A resource is created, and when the caller asked to wait, its status is
//! probed at a fixed one second cadence until it reaches `Succeeded` or
//! `Failed`. There is no attempt cap: a caller that needs a deadline has to
//! enforce it from outside.

use std::fmt;
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::ApiError;
use crate::console::Console;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub const UNAUTHORIZED_HINT: &str =
    "Set SPEECH_KEY (or pass --key) and the matching SPEECH_REGION (or --region) for your subscription.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStatus::NotStarted => "NotStarted",
            JobStatus::Running => "Running",
            JobStatus::Succeeded => "Succeeded",
            JobStatus::Failed => "Failed",
            JobStatus::Unknown => "Unknown",
        };
        f.pad(name)
    }
}

/// A server-side resource the poller can watch.
pub trait Job {
    fn id(&self) -> Uuid;
    fn status(&self) -> JobStatus;
}

/// Outcome handed back to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSignal {
    Success,
    Failure,
}

impl ExitSignal {
    pub fn code(self) -> i32 {
        match self {
            ExitSignal::Success => 0,
            ExitSignal::Failure => -1,
        }
    }
}

/// Reports a failed API call on the error stream.
pub fn report_api_error(console: &mut dyn Console, error: &ApiError) {
    if error.is_unauthorized() {
        console.eprintln(UNAUTHORIZED_HINT);
    }
    console.eprintln(&format!("API call ended with error: {error}"));
}

pub struct JobPoller<'a> {
    console: &'a mut dyn Console,
    interval: Duration,
}

impl<'a> JobPoller<'a> {
    pub fn new(console: &'a mut dyn Console) -> Self {
        Self {
            console,
            interval: POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Runs `create`, then either returns right away or, with `wait`, polls
    /// `probe` until the resource reaches a terminal status.
    pub fn create_and_wait<J, C, P>(&mut self, create: C, wait: bool, probe: P) -> ExitSignal
    where
        J: Job,
        C: FnOnce() -> Result<Uuid, ApiError>,
        P: FnMut(Uuid) -> Result<J, ApiError>,
    {
        let id = match create() {
            Ok(id) => id,
            Err(e) => {
                warn!("Create call failed: {e}");
                report_api_error(self.console, &e);
                return ExitSignal::Failure;
            }
        };
        info!("Created resource {id}");

        if wait {
            self.wait_for(id, probe)
        } else {
            self.console.println("Created.");
            self.console.println(&id.to_string());
            ExitSignal::Success
        }
    }

    pub fn wait_for<J, P>(&mut self, id: Uuid, mut probe: P) -> ExitSignal
    where
        J: Job,
        P: FnMut(Uuid) -> Result<J, ApiError>,
    {
        self.console.print("Processing [.");
        let mut attempt = 0u64;

        loop {
            self.console.print(".");
            thread::sleep(self.interval);
            attempt += 1;

            match probe(id) {
                Ok(resource) => {
                    let status = resource.status();
                    debug!("Poll {attempt} for {}: {status}", resource.id());
                    if !status.is_terminal() {
                        continue;
                    }
                    match status {
                        JobStatus::Succeeded => {
                            info!("{id} succeeded after {attempt} polls");
                            self.console.println(".] Done");
                            self.console.println(&id.to_string());
                            return ExitSignal::Success;
                        }
                        JobStatus::Failed => {
                            info!("{id} failed after {attempt} polls");
                            self.console.println(".]");
                            self.console.eprintln("Processing failed.");
                            return ExitSignal::Failure;
                        }
                        _ => {}
                    }
                }
                Err(e) => {
                    warn!("Status probe for {id} failed: {e}");
                    self.console.println(".]");
                    self.console.eprintln(&format!("Unable to get status. {e}"));
                    return ExitSignal::Failure;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::BufferConsole;
    use std::cell::Cell;
    use std::collections::VecDeque;

    struct Resource {
        id: Uuid,
        status: JobStatus,
    }

    impl Job for Resource {
        fn id(&self) -> Uuid {
            self.id
        }

        fn status(&self) -> JobStatus {
            self.status
        }
    }

    const ID: Uuid = Uuid::from_u128(0x1234);

    /// Probe that replays `steps` and counts its calls.
    fn scripted<'a>(
        calls: &'a Cell<usize>,
        steps: Vec<Result<JobStatus, ApiError>>,
    ) -> impl FnMut(Uuid) -> Result<Resource, ApiError> + 'a {
        let mut steps: VecDeque<_> = steps.into();
        move |id| {
            assert_eq!(id, ID);
            calls.set(calls.get() + 1);
            let step = steps.pop_front().expect("probe called after terminal status");
            step.map(|status| Resource { id, status })
        }
    }

    #[test]
    fn test_no_wait_returns_without_probing() {
        let mut console = BufferConsole::default();
        let calls = Cell::new(0);

        let signal = JobPoller::new(&mut console)
            .with_interval(Duration::ZERO)
            .create_and_wait(|| Ok(ID), false, scripted(&calls, vec![]));

        assert_eq!(signal, ExitSignal::Success);
        assert_eq!(signal.code(), 0);
        assert_eq!(calls.get(), 0);
        assert_eq!(console.out, format!("Created.\n{ID}\n"));
        assert!(console.err.is_empty());
    }

    #[test]
    fn test_create_error_skips_polling() {
        let mut console = BufferConsole::default();
        let calls = Cell::new(0);

        let signal = JobPoller::new(&mut console).with_interval(Duration::ZERO).create_and_wait(
            || Err(ApiError::service("InvalidPayload", "Name is required.")),
            true,
            scripted(&calls, vec![]),
        );

        assert_eq!(signal, ExitSignal::Failure);
        assert_eq!(signal.code(), -1);
        assert_eq!(calls.get(), 0);
        assert!(console.out.is_empty());
        assert_eq!(console.err, "API call ended with error: Name is required.\n");
    }

    #[test]
    fn test_unauthorized_create_prints_hint() {
        let mut console = BufferConsole::default();
        let calls = Cell::new(0);

        let signal = JobPoller::new(&mut console).with_interval(Duration::ZERO).create_and_wait(
            || Err(ApiError::service("Unauthorized", "Access denied.")),
            false,
            scripted(&calls, vec![]),
        );

        assert_eq!(signal, ExitSignal::Failure);
        assert!(console.err.starts_with(UNAUTHORIZED_HINT));
        assert!(console.err.ends_with("Access denied.\n"));
    }

    #[test]
    fn test_waits_until_succeeded() {
        let mut console = BufferConsole::default();
        let calls = Cell::new(0);
        let probe = scripted(
            &calls,
            vec![Ok(JobStatus::Running), Ok(JobStatus::Running), Ok(JobStatus::Succeeded)],
        );

        let signal = JobPoller::new(&mut console)
            .with_interval(Duration::ZERO)
            .create_and_wait(|| Ok(ID), true, probe);

        assert_eq!(signal, ExitSignal::Success);
        assert_eq!(calls.get(), 3);
        assert_eq!(console.out, format!("Processing [.....] Done\n{ID}\n"));
        assert!(console.err.is_empty());
    }

    #[test]
    fn test_not_started_keeps_polling() {
        let mut console = BufferConsole::default();
        let calls = Cell::new(0);
        let probe = scripted(
            &calls,
            vec![
                Ok(JobStatus::NotStarted),
                Ok(JobStatus::Unknown),
                Ok(JobStatus::Running),
                Ok(JobStatus::Succeeded),
            ],
        );

        let signal = JobPoller::new(&mut console)
            .with_interval(Duration::ZERO)
            .wait_for(ID, probe);

        assert_eq!(signal, ExitSignal::Success);
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn test_failed_status_stops_polling() {
        let mut console = BufferConsole::default();
        let calls = Cell::new(0);
        let probe = scripted(&calls, vec![Ok(JobStatus::Running), Ok(JobStatus::Failed)]);

        let signal = JobPoller::new(&mut console)
            .with_interval(Duration::ZERO)
            .create_and_wait(|| Ok(ID), true, probe);

        assert_eq!(signal, ExitSignal::Failure);
        assert_eq!(calls.get(), 2);
        assert_eq!(console.out, "Processing [....]\n");
        assert_eq!(console.err, "Processing failed.\n");
    }

    #[test]
    fn test_probe_error_is_not_retried() {
        let mut console = BufferConsole::default();
        let calls = Cell::new(0);
        let probe = scripted(
            &calls,
            vec![
                Ok(JobStatus::Running),
                Err(ApiError::service("NotFound", "The transcription does not exist.")),
            ],
        );

        let signal = JobPoller::new(&mut console)
            .with_interval(Duration::ZERO)
            .wait_for(ID, probe);

        assert_eq!(signal, ExitSignal::Failure);
        assert_eq!(calls.get(), 2);
        assert_eq!(
            console.err,
            "Unable to get status. The transcription does not exist.\n"
        );
    }

    #[test]
    fn test_status_display_pads() {
        assert_eq!(format!("{}", JobStatus::NotStarted), "NotStarted");
        assert_eq!(format!("{:<10}|", JobStatus::Running), "Running   |");
    }
}
