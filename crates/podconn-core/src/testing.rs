//! In-memory collaborators for unit tests.
use std::{
    collections::{HashMap, VecDeque},
    fmt,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    subscriber::DefaultGuard,
};
use tracing_subscriber::{
    layer::{Context, Layer, SubscriberExt},
    registry,
};

use podconn_model::{AggregateCount, Credential, Target};

use crate::{
    credential::{CredentialError, CredentialIssuer, IssuedToken},
    discovery::{Discovery, DiscoveryError},
    probe::{Probe, ProbeError, ProbeResult},
    publish::{PublishError, Publisher},
};

pub fn targets<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<Target> {
    names
        .into_iter()
        .map(|n| Target::new(n).unwrap())
        .collect()
}

pub fn credential(token: &str) -> Credential {
    Credential::new(token, Instant::now() + Duration::from_secs(300))
}

/// Issuer handing out a fixed sequence of tokens, then failing.
pub struct CountingIssuer {
    tokens: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl CountingIssuer {
    pub fn new<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            tokens: Mutex::new(tokens.into_iter().map(str::to_string).collect()),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialIssuer for CountingIssuer {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn issue(&self) -> Result<IssuedToken, CredentialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        let next = self.tokens.lock().unwrap().pop_front();
        next.map(|t| IssuedToken::new(t, None))
            .ok_or_else(|| CredentialError::Issuer("issuer exhausted".into()))
    }
}

#[derive(Clone)]
enum Script {
    Count(u64),
    Fail(String),
    Hang,
    Panic,
}

/// Probe whose answer per target is scripted up front.
#[derive(Default)]
pub struct ScriptedProbe {
    script: HashMap<String, Script>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
    tokens: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(mut self, target: impl Into<String>, n: u64) -> Self {
        self.script.insert(target.into(), Script::Count(n));
        self
    }

    pub fn fail(mut self, target: impl Into<String>, reason: &str) -> Self {
        self.script.insert(target.into(), Script::Fail(reason.into()));
        self
    }

    pub fn hang(mut self, target: impl Into<String>) -> Self {
        self.script.insert(target.into(), Script::Hang);
        self
    }

    pub fn panic(mut self, target: impl Into<String>) -> Self {
        self.script.insert(target.into(), Script::Panic);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, target: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|t| *t == target).count()
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn probe(&self, target: &Target, credential: &Credential) -> ProbeResult {
        self.calls.lock().unwrap().push(target.to_string());
        self.tokens.lock().unwrap().push(credential.token().to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        match self.script.get(target.as_str()).cloned() {
            Some(Script::Count(n)) => Ok(n),
            Some(Script::Fail(reason)) => Err(ProbeError::failed(target, reason)),
            Some(Script::Hang) => std::future::pending().await,
            Some(Script::Panic) => panic!("scripted panic for {target}"),
            None => Err(ProbeError::failed(target, "unscripted target")),
        }
    }
}

/// Discovery returning a fixed list, or a fixed error.
pub struct StaticDiscovery {
    result: Result<Vec<Target>, String>,
    calls: AtomicUsize,
}

impl StaticDiscovery {
    pub fn ok(targets: Vec<Target>) -> Self {
        Self {
            result: Ok(targets),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn err(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Discovery for StaticDiscovery {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn discover(&self) -> Result<Vec<Target>, DiscoveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(DiscoveryError)
    }
}

/// Publisher that records every aggregate it receives.
#[derive(Default)]
pub struct RecordingPublisher {
    fail_with: Option<u16>,
    published: Mutex<Vec<AggregateCount>>,
}

impl RecordingPublisher {
    pub fn rejecting(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Default::default()
        }
    }

    pub fn published(&self) -> Vec<AggregateCount> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn publish(&self, aggregate: &AggregateCount) -> Result<(), PublishError> {
        self.published.lock().unwrap().push(*aggregate);
        match self.fail_with {
            Some(status) => Err(PublishError::Rejected {
                status,
                body: "rejected".into(),
            }),
            None => Ok(()),
        }
    }
}

/// One `warn!` record seen by [`WarnCapture`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedWarn {
    pub message: String,
    pub target: Option<String>,
}

impl Visit for CapturedWarn {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "target" => self.target = Some(format!("{value:?}")),
            _ => {}
        }
    }
}

/// Layer collecting WARN events emitted on the current thread while installed.
#[derive(Clone, Default)]
pub struct WarnCapture {
    events: Arc<Mutex<Vec<CapturedWarn>>>,
}

impl WarnCapture {
    /// Install as the thread default; records stop when the guard drops.
    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(registry().with(self.clone()))
    }

    pub fn with_message(&self, message: &str) -> Vec<CapturedWarn> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.message == message)
            .cloned()
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for WarnCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut captured = CapturedWarn::default();
        event.record(&mut captured);
        self.events.lock().unwrap().push(captured);
    }
}
