//! Structured logging setup for the sync client family.
//!
//! This crate never chooses a destination for its own logs — every state
//! transition, reconnect, decode failure, and ack/nack decision goes through
//! `tracing` and it's up to the caller to install a subscriber. These
//! helpers cover the common case; anyone with their own `tracing_subscriber`
//! pipeline can skip this module entirely.
//!
//! ```rust,ignore
//! atproto_sync::logging::init();
//!
//! // Or with span events, useful for watching the engine's state transitions:
//! atproto_sync::logging::LoggingBuilder::new()
//!     .directive("atproto_sync_engine=debug")
//!     .span_events(SpanEvents::LIFECYCLE)
//!     .init();
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Controls which span lifecycle events get logged.
///
/// Useful for watching the engine's `Disconnected` → `ConnectingHttp` →
/// `ConnectingWs` → `Connected` transitions without wiring up a full
/// subscriber by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanEvents {
    pub new: bool,
    pub enter: bool,
    pub exit: bool,
    pub close: bool,
}

impl SpanEvents {
    pub const NONE: Self = Self { new: false, enter: false, exit: false, close: false };

    pub const LIFECYCLE: Self = Self { new: true, enter: false, exit: false, close: true };

    pub const FULL: Self = Self { new: true, enter: true, exit: true, close: true };

    pub const ACTIVE: Self = Self { new: false, enter: true, exit: true, close: false };

    fn to_fmt_span(self) -> fmt::format::FmtSpan {
        let mut span = fmt::format::FmtSpan::NONE;
        if self.new {
            span |= fmt::format::FmtSpan::NEW;
        }
        if self.enter {
            span |= fmt::format::FmtSpan::ENTER;
        }
        if self.exit {
            span |= fmt::format::FmtSpan::EXIT;
        }
        if self.close {
            span |= fmt::format::FmtSpan::CLOSE;
        }
        span
    }
}

/// Initializes logging with the default `info` filter, honoring `RUST_LOG`.
///
/// # Panics
///
/// Panics if a global subscriber is already set.
pub fn init() {
    init_with_filter("info");
}

/// Initializes logging with a custom filter string, e.g.
/// `"atproto_sync_engine=debug,atproto_sync_firehose=trace"`.
///
/// # Panics
///
/// Panics if a global subscriber is already set.
pub fn init_with_filter(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry().with(fmt::layer()).with(env_filter).init();
}

/// A builder for logging setups that need span-event visibility or other
/// formatting tweaks beyond [`init`]'s defaults.
#[derive(Default)]
pub struct LoggingBuilder {
    directives: Vec<String>,
    level: Option<tracing::Level>,
    span_events: SpanEvents,
    with_target: bool,
    with_thread_ids: bool,
    with_file: bool,
    with_line_number: bool,
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base log level used when `RUST_LOG` isn't set.
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Adds a filter directive, e.g. `"atproto_sync_jetstream=debug"`.
    pub fn directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    /// Configures which span lifecycle events are logged.
    pub fn span_events(mut self, events: SpanEvents) -> Self {
        self.span_events = events;
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.with_thread_ids = enabled;
        self
    }

    pub fn with_file(mut self, enabled: bool) -> Self {
        self.with_file = enabled;
        self
    }

    pub fn with_line_number(mut self, enabled: bool) -> Self {
        self.with_line_number = enabled;
        self
    }

    fn build_filter(&self) -> EnvFilter {
        let base_filter = match self.level {
            Some(tracing::Level::TRACE) => "trace",
            Some(tracing::Level::DEBUG) => "debug",
            Some(tracing::Level::INFO) => "info",
            Some(tracing::Level::WARN) => "warn",
            Some(tracing::Level::ERROR) => "error",
            None => "info",
        };

        let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base_filter));
        for directive in &self.directives {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }
        filter
    }

    fn build_fmt_layer<S>(&self) -> fmt::Layer<S>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        fmt::layer()
            .with_span_events(self.span_events.to_fmt_span())
            .with_target(self.with_target)
            .with_thread_ids(self.with_thread_ids)
            .with_file(self.with_file)
            .with_line_number(self.with_line_number)
    }

    /// Installs the configured subscriber as the global default.
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber is already set.
    pub fn init(self) {
        let filter = self.build_filter();
        tracing_subscriber::registry().with(self.build_fmt_layer()).with(filter).init();
    }

    /// Like [`LoggingBuilder::init`], but returns an error instead of
    /// panicking if a global subscriber is already set.
    pub fn try_init(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = self.build_filter();
        tracing_subscriber::registry()
            .with(self.build_fmt_layer())
            .with(filter)
            .try_init()
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
    }
}
