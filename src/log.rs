use anyhow::{anyhow, Result};
use std::fmt;
use std::io;
use time::OffsetDateTime;
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    registry::LookupSpan,
    EnvFilter,
};

const DEFAULT_FILTER: &str = "info";

/// Formats events like absl/glog: `MMDD HH:MM:SS.mmm LEVEL crate file:line] message`.
pub struct GoogleEventFormat;

impl<S, N> FormatEvent<S, N> for GoogleEventFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        // Local time, UTC when the offset can't be determined
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        write!(
            writer,
            "{:02}{:02} {:02}:{:02}:{:02}.{:03} ",
            now.month() as u8,
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
            now.millisecond()
        )?;

        // Fixed-width level
        let metadata = event.metadata();
        write!(writer, "{:5} ", metadata.level().as_str())?;

        // Crate name only
        if let Some(module_path) = metadata.module_path() {
            let root_module = module_path.split("::").next().unwrap_or(module_path);
            write!(writer, "{} ", root_module)?;
        }

        // file.rs:line] closes the prefix
        if let Some(file) = metadata.file() {
            let file_name = file.rsplit('/').next().unwrap_or(file);
            write!(writer, "{}:{}] ", file_name, metadata.line().unwrap_or(0))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// `RUST_LOG` if set, otherwise everything at INFO and above.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn ansi_from_env() -> bool {
    std::env::var("E2E_LOG_ANSI")
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Install the process-wide subscriber, writing to stderr.
///
/// Fails if another subscriber is already installed.
pub fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(ansi_from_env())
        .with_writer(io::stderr)
        .event_format(GoogleEventFormat)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {}", e))
}
