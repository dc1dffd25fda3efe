use std::fmt;
use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Local};
use once_cell::sync::OnceCell;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LoggingConfig, parse_level};
use crate::error::{SvgtintError, SvgtintResult};

/// Capacity of the bounded console queue shared with the web UI.
pub const CONSOLE_QUEUE_DEPTH: usize = 256;

/// Delay between dequeue attempts of the console drain loop.
pub const DRAIN_INTERVAL: Duration = Duration::from_millis(150);

static LOG_INIT: OnceCell<()> = OnceCell::new();

/// A log record captured at the emit site, formatted later by each sink.
struct LogRecord {
    level: Level,
    message: String,
    timestamp: DateTime<Local>,
}

/// Renders records as `timestamp \t LEVEL \t message`.
///
/// The `format` string from the config is accepted for compatibility but the
/// line layout is fixed; only `datefmt` is honored.
#[derive(Debug, Clone)]
struct LineFormatter {
    datefmt: String,
}

impl LineFormatter {
    fn new<S: Into<String>>(datefmt: S) -> Self {
        Self {
            datefmt: datefmt.into(),
        }
    }

    fn format_record(&self, record: &LogRecord) -> String {
        format!(
            "{}\t{}\t{}",
            record.timestamp.format(&self.datefmt),
            record.level,
            record.message
        )
    }
}

trait LogSink: Send + Sync {
    fn threshold(&self) -> LevelFilter;
    fn emit(&self, record: &LogRecord);
}

struct StderrSink {
    threshold: LevelFilter,
    formatter: LineFormatter,
}

impl LogSink for StderrSink {
    fn threshold(&self) -> LevelFilter {
        self.threshold
    }

    fn emit(&self, record: &LogRecord) {
        eprintln!("{}", self.formatter.format_record(record));
    }
}

/// Sink feeding the UI console queue. The queue is bounded; when the console
/// falls behind, the line is dropped rather than stalling the dispatcher.
struct ConsoleSink {
    threshold: LevelFilter,
    formatter: LineFormatter,
    tx: mpsc::Sender<String>,
}

impl LogSink for ConsoleSink {
    fn threshold(&self) -> LevelFilter {
        self.threshold
    }

    fn emit(&self, record: &LogRecord) {
        let _ = self.tx.try_send(self.formatter.format_record(record));
    }
}

/// Collects the `message` field of a tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        }
    }
}

/// Tracing layer on the emit path. It only captures the record and hands it
/// to the dispatch channel, so logging callers never touch the sinks.
struct BridgeLayer {
    tx: mpsc::UnboundedSender<LogRecord>,
}

impl<S: Subscriber> Layer<S> for BridgeLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let _ = self.tx.send(LogRecord {
            level: *event.metadata().level(),
            message: visitor.message,
            timestamp: Local::now(),
        });
    }
}

async fn dispatch(mut rx: mpsc::UnboundedReceiver<LogRecord>, sinks: Vec<Box<dyn LogSink>>) {
    while let Some(record) = rx.recv().await {
        for sink in &sinks {
            if record.level <= sink.threshold() {
                sink.emit(&record);
            }
        }
    }
}

fn build_sinks(
    config: &LoggingConfig,
    console_tx: mpsc::Sender<String>,
) -> SvgtintResult<Vec<Box<dyn LogSink>>> {
    let mut sinks: Vec<Box<dyn LogSink>> = Vec::new();
    for (name, handler) in &config.handlers {
        let threshold = parse_level(&handler.level)?;
        let props = config.formatters.get(&handler.formatter).ok_or_else(|| {
            SvgtintError::config(format!(
                "handler '{}' references unknown formatter '{}'",
                name, handler.formatter
            ))
        })?;
        let formatter = LineFormatter::new(&props.datefmt);
        match handler.class.as_str() {
            "stderr" => sinks.push(Box::new(StderrSink {
                threshold,
                formatter,
            })),
            "console" => sinks.push(Box::new(ConsoleSink {
                threshold,
                formatter,
                tx: console_tx.clone(),
            })),
            other => {
                return Err(SvgtintError::config(format!(
                    "handler '{}' has unknown class '{}'",
                    name, other
                )));
            }
        }
    }
    Ok(sinks)
}

/// Creates the bounded queue between the console sink and the drain loop.
pub fn console_channel() -> (mpsc::Sender<String>, mpsc::Receiver<String>) {
    mpsc::channel(CONSOLE_QUEUE_DEPTH)
}

/// Installs the process-wide logging pipeline.
///
/// Must run inside a tokio runtime: the dispatcher that fans records out to
/// the sinks is a background task. Repeated calls are no-ops.
pub fn init_logging(config: &LoggingConfig, console_tx: mpsc::Sender<String>) -> SvgtintResult<()> {
    if LOG_INIT.get().is_some() {
        return Ok(());
    }
    let sinks = build_sinks(config, console_tx)?;
    let root_level = config.root_level()?;

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(dispatch(rx, sinks));

    tracing_subscriber::registry()
        .with(BridgeLayer { tx }.with_filter(root_level))
        .try_init()
        .map_err(|e| SvgtintError::logging(e.to_string()))?;
    let _ = LOG_INIT.set(());
    Ok(())
}

/// One drain pass of the console queue.
///
/// Dequeues whatever is currently available, pacing iterations by
/// [`DRAIN_INTERVAL`]; an empty queue ends the pass, it is not an error.
pub async fn drain_console(rx: &mut mpsc::Receiver<String>, messages: &mut Vec<String>) {
    loop {
        match rx.try_recv() {
            Ok(line) => {
                messages.push(line);
                tokio::time::sleep(DRAIN_INTERVAL).await;
            }
            Err(_) => break,
        }
    }
}
