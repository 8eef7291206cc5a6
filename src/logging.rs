//! Tracing subscriber setup for the demo binary. The library itself never
//! installs a global subscriber — only binaries do that — this module
//! exists purely so `pool_demo`'s output looks like a real deployment's
//! instrumentation would.

use std::env;
use std::fmt;
use std::io::IsTerminal as _;

fn should_enable_ansi() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn init() {
    let ansi = should_enable_ansi();
    #[allow(deprecated)]
    {
        colored::control::set_override(ansi);
    }

    use tracing_subscriber::{EnvFilter, fmt::time::UtcTime};
    let formatter = PoolFormatter {
        ansi,
        timer: UtcTime::rfc_3339(),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .event_format(formatter)
        .init();
}

use colored::Colorize;
use tracing::Event;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

struct PoolFormatter<T> {
    ansi: bool,
    timer: T,
}

impl<S, N, T> FormatEvent<S, N> for PoolFormatter<T>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> FormatFields<'writer> + 'static,
    T: FormatTime + Send + Sync,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        self.timer.format_time(&mut writer)?;
        write!(writer, " ")?;

        let meta = event.metadata();
        let level = meta.level();
        let target = meta.target();

        let (lvl_colored, width) = match *level {
            tracing::Level::ERROR => ("ERROR".red().bold().to_string(), 5),
            tracing::Level::WARN => ("WARN".yellow().bold().to_string(), 4),
            tracing::Level::INFO => ("INFO".green().bold().to_string(), 4),
            tracing::Level::DEBUG => ("DEBUG".blue().bold().to_string(), 5),
            tracing::Level::TRACE => ("TRACE".magenta().bold().to_string(), 5),
        };
        let lvl_padded = if self.ansi {
            format!("{lvl_colored: <width$}")
        } else {
            format!("{level:<width$}")
        };

        let target_s = if self.ansi {
            target.dimmed().to_string()
        } else {
            target.to_string()
        };

        write!(writer, "{lvl_padded} {target_s}: ")?;

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        if let Some(msg) = visitor.message.take() {
            write!(writer, "{msg}")?;
            if !visitor.fields.is_empty() {
                write!(writer, " {}", visitor.fields.join(" "))?;
            }
        } else if !visitor.fields.is_empty() {
            write!(writer, "{}", visitor.fields.join(" "))?;
        }

        writeln!(writer)
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<String>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.fields.push(format!("{}={value:?}", field.name()));
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}=\"{value}\"", field.name()));
        }
    }
}
