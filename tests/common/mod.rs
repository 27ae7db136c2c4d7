//! Shared utilities for launcher integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::Instant;

use postgis_launcher::config::EngineConfig;
use postgis_launcher::initializer::{InitOutcome, Initializer};
use postgis_launcher::readiness::ReadinessProbe;

/// What happened, and when, relative to the start of the test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Probe { ready: bool, at: Duration },
    Init { at: Duration },
}

/// Ordered record shared by the scripted probe and the recording initializer.
#[derive(Clone)]
pub struct EventLog {
    start: Instant,
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(&self, make: impl FnOnce(Duration) -> Event) {
        let at = self.start.elapsed();
        self.events.lock().unwrap().push(make(at));
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn init_times(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Init { at } => Some(at),
                _ => None,
            })
            .collect()
    }

    pub fn probe_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Probe { .. }))
            .count()
    }
}

/// Returns scripted answers, then `fallback` forever.
pub struct ScriptedProbe {
    answers: Mutex<VecDeque<bool>>,
    fallback: bool,
    log: EventLog,
}

impl ScriptedProbe {
    pub fn new(answers: &[bool], fallback: bool, log: EventLog) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            fallback,
            log,
        }
    }

    /// Fails `n` times, then succeeds.
    pub fn ready_after(n: usize, log: EventLog) -> Self {
        Self::new(&vec![false; n], true, log)
    }

    pub fn never_ready(log: EventLog) -> Self {
        Self::new(&[], false, log)
    }
}

impl ReadinessProbe for ScriptedProbe {
    async fn probe(&self) -> bool {
        let ready = self.answers.lock().unwrap().pop_front().unwrap_or(self.fallback);
        self.log.push(|at| Event::Probe { ready, at });
        ready
    }

    fn target(&self) -> String {
        "scripted".into()
    }
}

/// Records each run and answers with a fixed outcome.
pub struct RecordingInit {
    outcome: InitOutcome,
    log: EventLog,
}

impl RecordingInit {
    pub fn new(outcome: InitOutcome, log: EventLog) -> Self {
        Self { outcome, log }
    }
}

impl Initializer for RecordingInit {
    async fn run(&self) -> InitOutcome {
        self.log.push(|at| Event::Init { at });
        self.outcome.clone()
    }
}

/// An engine that starts and exits immediately; the probe is what matters.
pub fn quick_engine() -> EngineConfig {
    EngineConfig {
        program: "true".into(),
        args: Vec::new(),
        ..EngineConfig::default()
    }
}

/// Reserve a local port that nothing listens on yet.
pub async fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Start accepting connections on `addr` after `delay`, like an engine that
/// takes a while to boot.
pub fn start_late_listener(addr: SocketAddr, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let listener = TcpListener::bind(addr).await.unwrap();
        loop {
            match listener.accept().await {
                Ok((socket, _)) => drop(socket),
                Err(_) => break,
            }
        }
    });
}
