use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::dispatch::{
    CommandRunner,
    ExecError,
};

/// Command runner that records what it was asked to run instead of spawning
/// a process.
pub(crate) struct RecordingRunner {
    commands: Mutex<Vec<String>>,
    fail_on: Option<String>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl RecordingRunner {
    pub(crate) fn succeeding() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            fail_on: None,
            delay: None,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing_on(needle: &str) -> Self {
        Self {
            fail_on: Some(needle.to_string()),
            ..Self::succeeding()
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &str) -> Result<Vec<u8>, ExecError> {
        self.commands.lock().unwrap().push(command.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match &self.fail_on {
            Some(needle) if command.contains(needle.as_str()) => Err(ExecError::Exit {
                status: "exit status: 1".to_string(),
                output: b"simulated failure".to_vec(),
            }),
            _ => Ok(format!("ran {}", command).into_bytes()),
        }
    }
}
