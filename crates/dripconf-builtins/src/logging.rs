//! Logging setup from the `logging` section
//!
//! ```ini
//! [logging]
//! level = debug
//! filter = info,my_crate=trace
//! format = compact
//! ```
//!
//! `filter` takes `RUST_LOG` directive syntax and wins over `level` when
//! both are set. `format` is one of `full` (default), `compact` or `json`.
//! Every event carries the process ident: as a `ident: ` prefix on text
//! lines, as an `"ident"` key on JSON lines.

use std::fmt::Write as _;
use std::sync::OnceLock;

use dripconf::{ConfigNode, Error, FieldFailure, Result, SchemaTrigger, Trigger};
use serde::{Deserialize, Serialize};
use tracing::{Event, Subscriber, info, warn};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::{self, FmtContext};
use tracing_subscriber::registry::{LookupSpan, Registry};
use tracing_subscriber::{EnvFilter, Layer, prelude::*, reload};
use validator::Validate;

use crate::process_ident;

pub const SECTION: &str = "logging";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[serde(alias = "TRACE")]
    Trace,
    #[serde(alias = "DEBUG")]
    Debug,
    #[default]
    #[serde(alias = "INFO")]
    Info,
    #[serde(alias = "WARN", alias = "warning", alias = "WARNING")]
    Warn,
    #[serde(alias = "ERROR")]
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

/// Typed view of the `logging` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct LoggingSection {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "filter must not be empty"))]
    pub filter: Option<String>,
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingSection {
    /// The filter this section describes.
    pub fn env_filter(&self) -> std::result::Result<EnvFilter, String> {
        let directives = self.filter.as_deref().unwrap_or(self.level.as_str());
        EnvFilter::try_new(directives).map_err(|e| e.to_string())
    }
}

/// Prefixes text events with the process ident
pub struct IdentPrefix<E> {
    ident: String,
    inner: E,
}

impl<E> IdentPrefix<E> {
    pub fn new(ident: impl Into<String>, inner: E) -> Self {
        Self {
            ident: ident.into(),
            inner,
        }
    }
}

impl<S, N, E> FormatEvent<S, N> for IdentPrefix<E>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    E: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(writer, "{}: ", self.ident)?;
        self.inner.format_event(ctx, writer, event)
    }
}

/// Adds an `"ident"` key to JSON events
pub struct IdentField<E> {
    // `"ident":"<ident>",` ready to splice after the opening brace
    field: String,
    inner: E,
}

impl<E> IdentField<E> {
    pub fn new(ident: impl Into<String>, inner: E) -> Self {
        let ident = serde_json::Value::String(ident.into());
        Self {
            field: format!("\"ident\":{ident},"),
            inner,
        }
    }
}

impl<S, N, E> FormatEvent<S, N> for IdentField<E>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    E: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut line = String::new();
        self.inner
            .format_event(ctx, format::Writer::new(&mut line), event)?;
        match line.strip_prefix('{') {
            Some(rest) if !rest.starts_with('}') => write!(writer, "{{{}{rest}", self.field),
            _ => writer.write_str(&line),
        }
    }
}

/// The `fmt` layer for `format`, stamping `ident` on every event.
pub fn event_layer<S>(format: LogFormat, ident: &str) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    match format {
        LogFormat::Full => fmt::layer()
            .event_format(IdentPrefix::new(ident, fmt::format()))
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .event_format(IdentPrefix::new(ident, fmt::format().compact()))
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .event_format(IdentField::new(ident, fmt::format().json()))
            .boxed(),
    }
}

struct Installed {
    filter: reload::Handle<EnvFilter, Registry>,
    format: LogFormat,
}

static INSTALLED: OnceLock<Installed> = OnceLock::new();

/// Installs the global `tracing` subscriber when a `logging` section exists
///
/// The first pass installs the subscriber. Later passes swap its filter in
/// place, so a late-merged `level` or `filter` takes effect. The output
/// format is fixed once installed. If the application installed its own
/// subscriber first, that one is kept and a warning is logged through it.
pub struct LoggingTrigger {
    schema: SchemaTrigger<LoggingSection>,
}

impl Default for LoggingTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingTrigger {
    pub fn new() -> Self {
        Self {
            schema: SchemaTrigger::new(SECTION),
        }
    }
}

impl Trigger for LoggingTrigger {
    fn name(&self) -> &str {
        SECTION
    }

    fn clean(&self, config: &ConfigNode) -> Result<ConfigNode> {
        if let Some(section) = self.schema.validate(config)? {
            if let Err(message) = section.env_filter() {
                return Err(Error::validation(
                    SECTION,
                    vec![FieldFailure::new("logging.filter", message)],
                ));
            }
        }
        self.schema.clean(config)
    }

    fn configure(&self, config: &ConfigNode) -> Result<()> {
        let Some(section) = self.schema.validate(config)? else {
            return Ok(());
        };
        let filter = section
            .env_filter()
            .map_err(|e| Error::trigger(SECTION, e))?;

        if let Some(installed) = INSTALLED.get() {
            installed
                .filter
                .reload(filter)
                .map_err(|e| Error::trigger(SECTION, e))?;
            if installed.format != section.format {
                warn!(
                    installed = ?installed.format,
                    requested = ?section.format,
                    "Log format cannot change once installed"
                );
            }
            info!(level = section.level.as_str(), filter = ?section.filter, "Logging reconfigured");
            return Ok(());
        }

        let (filter, handle) = reload::Layer::new(filter);
        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(event_layer(section.format, &process_ident()))
            .try_init();

        match installed {
            Ok(()) => {
                let _ = INSTALLED.set(Installed {
                    filter: handle,
                    format: section.format,
                });
                info!(
                    level = section.level.as_str(),
                    format = ?section.format,
                    "Logging configured"
                );
            }
            Err(e) => warn!(error = %e, "Keeping the existing tracing subscriber"),
        }
        Ok(())
    }
}
