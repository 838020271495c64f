//! Shared fixtures for the end-to-end tests: log capture and runner wiring

use std::fmt;
use std::sync::{Arc, Mutex};

use delayed_core::application::{JobService, TaskRegistry, Worker};
use delayed_core::port::id_provider::mocks::SequentialIdProvider;
use delayed_core::port::time_provider::TokioTimeProvider;
use delayed_core::port::TimeProvider;
use delayed_infra_memory::InMemoryJobRepository;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// One captured log record
#[derive(Debug, Clone)]
pub struct CapturedRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Layer that keeps every event's level, target and message
#[derive(Clone, Default)]
pub struct LogCapture {
    records: Arc<Mutex<Vec<CapturedRecord>>>,
}

impl LogCapture {
    /// Install a capturing subscriber for the current thread
    ///
    /// Tests run on tokio's current-thread runtime, so spawned tasks log
    /// through the same subscriber while the guard is alive.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Records whose message is exactly `message`
    pub fn matching(&self, message: &str) -> Vec<CapturedRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.message == message)
            .collect()
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.records.lock().unwrap().push(CapturedRecord {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.message.unwrap_or_default(),
        });
    }
}

/// In-memory runner wired the way the binary wires it, on tokio's clock
pub struct TestRunner {
    pub job_repo: Arc<InMemoryJobRepository>,
    pub registry: Arc<TaskRegistry>,
    pub time_provider: Arc<dyn TimeProvider>,
    pub service: JobService,
}

impl TestRunner {
    pub fn new(registry: TaskRegistry) -> Self {
        let job_repo = Arc::new(InMemoryJobRepository::new());
        let registry = Arc::new(registry);
        let time_provider: Arc<dyn TimeProvider> = Arc::new(TokioTimeProvider::new());
        let service = JobService::new(
            job_repo.clone(),
            registry.clone(),
            Arc::new(SequentialIdProvider::default()),
            time_provider.clone(),
        );
        Self {
            job_repo,
            registry,
            time_provider,
            service,
        }
    }

    pub fn with_builtin_tasks() -> Self {
        Self::new(TaskRegistry::with_builtin_tasks().expect("builtin tasks register"))
    }

    pub fn worker(&self, queue: &str) -> Worker {
        Worker::new(
            queue,
            self.job_repo.clone(),
            self.registry.clone(),
            self.time_provider.clone(),
        )
    }
}
