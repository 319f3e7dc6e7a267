//! Log line format with the simulation's tick and virtual clock.
//!
//! Each line reads `wall-time tick game-clock LEVEL target: fields`, e.g.
//! `14:02:11.03817 0x01F4 [00:08.000]  INFO pacman_core::systems::lifecycle: Level started`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

static TICK_COUNTER: AtomicU64 = AtomicU64::new(0);
static GAME_CLOCK_MS: AtomicU64 = AtomicU64::new(0);

/// Ticks are shown as four hex digits and wrap.
const TICK_DISPLAY_MASK: u64 = 0xFFFF;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:5]");

const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Formats events with the wall time, the current tick and the virtual game clock.
pub struct GameClockFormatter;

impl<S, N> FormatEvent<S, N> for GameClockFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        let now = OffsetDateTime::now_utc().format(&TIMESTAMP_FORMAT).map_err(|_| fmt::Error)?;
        styled(&mut writer, ansi, DIM, now)?;
        writer.write_char(' ')?;

        styled(&mut writer, ansi, DIM, format_args!("0x{:04X}", tick_count() & TICK_DISPLAY_MASK))?;
        writer.write_char(' ')?;

        let clock = game_clock_ms();
        styled(
            &mut writer,
            ansi,
            DIM,
            format_args!("[{:02}:{:02}.{:03}]", clock / 60_000, (clock / 1000) % 60, clock % 1000),
        )?;
        writer.write_char(' ')?;

        write_level(&mut writer, ansi, meta.level())?;
        writer.write_char(' ')?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                styled(&mut writer, ansi, BOLD, span.metadata().name())?;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>().filter(|f| !f.is_empty()) {
                    styled(&mut writer, ansi, BOLD, "{")?;
                    write!(writer, "{fields}")?;
                    styled(&mut writer, ansi, BOLD, "}")?;
                }
                writer.write_char(':')?;
            }
            writer.write_char(' ')?;
        }

        styled(&mut writer, ansi, DIM, format_args!("{}:", meta.target()))?;
        writer.write_char(' ')?;

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn write_level(writer: &mut Writer<'_>, ansi: bool, level: &Level) -> fmt::Result {
    let (color, text) = match *level {
        Level::TRACE => ("\x1b[35m", "TRACE"),
        Level::DEBUG => ("\x1b[34m", "DEBUG"),
        Level::INFO => ("\x1b[32m", " INFO"),
        Level::WARN => ("\x1b[33m", " WARN"),
        Level::ERROR => ("\x1b[31m", "ERROR"),
    };
    styled(writer, ansi, color, text)
}

fn styled(writer: &mut Writer<'_>, ansi: bool, style: &str, value: impl fmt::Display) -> fmt::Result {
    if ansi {
        write!(writer, "{style}{value}{RESET}")
    } else {
        write!(writer, "{value}")
    }
}

/// Counts one simulation tick and records the virtual time it ran at.
pub fn record_tick(game_clock_ms: u64) {
    TICK_COUNTER.fetch_add(1, Ordering::Relaxed);
    set_game_clock(game_clock_ms);
}

/// Updates the virtual clock shown in log lines without counting a tick.
pub fn set_game_clock(ms: u64) {
    GAME_CLOCK_MS.store(ms, Ordering::Relaxed);
}

/// Ticks recorded since the process started, across every game instance.
pub fn tick_count() -> u64 {
    TICK_COUNTER.load(Ordering::Relaxed)
}

pub fn game_clock_ms() -> u64 {
    GAME_CLOCK_MS.load(Ordering::Relaxed)
}
