//! `tracing` setup for the runner binary plus an in-memory capture layer
//! for asserting on what the simulator logged.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::subscriber::SetGlobalDefaultError;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,pokerbench_sim=debug";

/// Set to `json` for one JSON object per line.
pub const LOG_FORMAT_ENV: &str = "POKERBENCH_LOG_FORMAT";

/// One event as seen by [`LogCapture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLog {
    pub level: Level,
    pub target: String,
    pub message: String,
    /// Structured fields in emission order, values rendered with `Display`
    /// where the macro used `%` and `Debug` otherwise
    pub fields: Vec<(String, String)>,
}

impl CapturedLog {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v.as_str()))
    }
}

/// Layer that stores every event it sees. Clones share the same buffer, so
/// keep one handle and install a clone:
///
/// ```
/// use pokerbench_sim::LogCapture;
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let logs = LogCapture::new();
/// let subscriber = tracing_subscriber::registry().with(logs.clone());
/// tracing::subscriber::with_default(subscriber, || tracing::warn!(seat = 2, "slow agent"));
/// assert_eq!(logs.warnings()[0].field("seat"), Some("2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedLog>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CapturedLog> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<CapturedLog> {
        self.events()
            .into_iter()
            .filter(|e| e.level == Level::WARN)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldCollector::default();
        event.record(&mut fields);
        let meta = event.metadata();
        let captured = CapturedLog {
            level: *meta.level(),
            target: meta.target().to_string(),
            message: fields.message.unwrap_or_default(),
            fields: fields.values,
        };
        if let Ok(mut events) = self.events.lock() {
            events.push(captured);
        }
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    values: Vec<(String, String)>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            name => self.values.push((name.to_string(), value)),
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

/// Installs the global subscriber: `RUST_LOG` (or [`DEFAULT_FILTER`]),
/// human-readable unless [`LOG_FORMAT_ENV`] is `json`.
pub fn init_logging() -> Result<(), SetGlobalDefaultError> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        let subscriber = fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    }
}
