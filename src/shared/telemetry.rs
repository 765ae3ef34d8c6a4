//! Telemetry
//!
//! Tracing subscriber setup and the formatters that tag each log message
//! with the application name.

use std::fmt::{self, Write as _};

use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::field::RecordFields;
use tracing_subscriber::fmt::format::{self, Format, FormatEvent, FormatFields, Json, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::infrastructure::driven_adapters::config::{LogFormat, LoggingConfig};

const MESSAGE_FIELD: &str = "message";

/// Console field formatter writing the message as `[app_name] message`.
///
/// Other fields render as `name=value`, space separated. Span fields carry no
/// message and are left untagged.
#[derive(Debug, Clone)]
pub struct AppTagFields {
    app_name: String,
}

impl AppTagFields {
    #[must_use]
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

impl<'writer> FormatFields<'writer> for AppTagFields {
    fn format_fields<R: RecordFields>(&self, mut writer: Writer<'writer>, fields: R) -> fmt::Result {
        let mut visitor = TagVisitor {
            writer: &mut writer,
            app_name: &self.app_name,
            result: Ok(()),
            first: true,
        };
        fields.record(&mut visitor);
        visitor.result
    }
}

struct TagVisitor<'a, 'writer> {
    writer: &'a mut Writer<'writer>,
    app_name: &'a str,
    result: fmt::Result,
    first: bool,
}

impl Visit for TagVisitor<'_, '_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.record_debug(field, &format_args!("{value}"));
        } else {
            self.record_debug(field, &value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if self.result.is_err() {
            return;
        }
        let separator = if self.first { "" } else { " " };
        self.first = false;

        self.result = if field.name() == MESSAGE_FIELD {
            write!(self.writer, "{separator}[{}] {value:?}", self.app_name)
        } else {
            write!(self.writer, "{separator}{}={value:?}", field.name())
        };
    }
}

/// JSON event formatter that rewrites the `message` of each entry to
/// `[app_name] message` and then emits the entry unchanged otherwise
#[derive(Debug, Clone)]
pub struct AppTagJson<F = Format<Json>> {
    inner: F,
    app_name: String,
}

impl AppTagJson {
    /// Wrap the default JSON format
    #[must_use]
    pub fn new(app_name: impl Into<String>) -> Self {
        Self::wrap(format::format().json(), app_name)
    }
}

impl<F> AppTagJson<F> {
    /// Wrap an existing JSON event formatter
    #[must_use]
    pub fn wrap(inner: F, app_name: impl Into<String>) -> Self {
        Self {
            inner,
            app_name: app_name.into(),
        }
    }

    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

impl<S, N, F> FormatEvent<S, N> for AppTagJson<F>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    F: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut line = String::new();
        self.inner.format_event(ctx, Writer::new(&mut line), event)?;

        let Ok(mut entry) = serde_json::from_str::<Value>(&line) else {
            return writer.write_str(&line);
        };
        tag_message(&mut entry, &self.app_name);
        writeln!(writer, "{entry}")
    }
}

/// Prefix the entry's message, whether nested under `fields` or flattened
fn tag_message(entry: &mut Value, app_name: &str) {
    if let Some(Value::String(message)) = entry.pointer_mut("/fields/message") {
        *message = format!("[{app_name}] {message}");
        return;
    }
    if let Some(Value::String(message)) = entry.get_mut(MESSAGE_FIELD) {
        *message = format!("[{app_name}] {message}");
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(logging: &LoggingConfig, app_name: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .event_format(AppTagJson::new(app_name)),
                )
                .init();
        }
        LogFormat::Console => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().fmt_fields(AppTagFields::new(app_name)))
                .init();
        }
    }

    tracing::info!(format = ?logging.format, "Tracing initialized");
}
