//! # dabug
//!
//! A small tracer for print-style debugging. Call sites record short messages
//! tagged with their source location; a flush writes everything recorded so
//! far as one aligned block:
//!
//! ```text
//! -----
//! src/main.rs:5    - A
//! src/main.rs:7    - B
//! src/main.rs:9    - wat
//! src/helpers.rs:3 - C
//! =====
//! ```
//!
//! ## Main Components
//!
//! * `Tracer`: owns the pending entries, the configuration and the sink
//! * `source`: caller location capture and path normalization
//! * `line_buffer`: the thread-safe queue of pending entries
//! * `renderer`: single-line and block formatting, value dumps
//!
//! ## Quick Start
//!
//! The macros record into a process-wide tracer writing to standard output,
//! and also capture the name of the enclosing function:
//!
//! ```
//! dabug::msg!("starting with {} workers", 4);
//! dabug::here!();
//! dabug::objs!(42, "x");
//! dabug::flush();
//! ```
//!
//! The free functions ([`here()`], [`msg()`], [`check()`]) and the `Tracer`
//! methods record the file and line too, but Rust locations carry no function
//! name, so theirs stays empty. Prefer the macros whenever the function name
//! matters.
//!
//! Independent tracers can be built with [`Tracer::new`] and targeted with
//! `to:`:
//!
//! ```
//! use dabug::{Config, Tracer};
//!
//! let tracer = Tracer::new(Config::default(), std::io::sink());
//! dabug::msg!(to: tracer, "isolated");
//! assert_eq!(tracer.pending(), 1);
//! ```

use std::io::Write;
use lazy_static::lazy_static;
use serde::Serialize;

pub mod config;
pub mod line_buffer;
pub mod renderer;
pub mod source;
pub mod tracer;

pub use config::Config;
pub use line_buffer::{Entry, LineBuffer};
pub use renderer::Markers;
pub use source::{Locator, Source};
pub use tracer::{Sink, Tracer};

lazy_static! {
    /// The tracer used by the free functions and macros.
    ///
    /// Configured from the environment on first use and writes to standard
    /// output until [`set_writer`] says otherwise.
    static ref DEFAULT_TRACER: Tracer = Tracer::from_env();
}

/// The process-wide default tracer.
pub fn tracer() -> &'static Tracer {
    &DEFAULT_TRACER
}

/// Sends default tracer output to `writer`.
pub fn set_writer(writer: impl Write + Send + 'static) {
    tracer().set_sink(writer);
}

pub fn set_prefix(prefix: impl Into<String>) {
    tracer().set_prefix(prefix);
}

/// Turns autoflush on or off for the default tracer, flushing pending entries.
pub fn set_autoflush(autoflush: bool) {
    tracer().set_autoflush(autoflush);
}

pub fn set_markers(markers: Markers) {
    tracer().set_markers(markers);
}

/// Writes the default tracer's pending entries.
pub fn flush() {
    tracer().flush();
}

/// Records that the calling line ran. [`here!`] also records the function.
#[track_caller]
pub fn here() {
    tracer().here();
}

/// Records a message. [`msg!`] also records the function.
#[track_caller]
pub fn msg(message: impl Into<String>) {
    tracer().msg(message);
}

/// Records a JSON check. [`check!`] also records the function.
#[track_caller]
pub fn check<T: Serialize + ?Sized>(value: &T) {
    tracer().check(value);
}

/// Records that this line ran.
///
/// `here!()` uses the default tracer, `here!(to: tracer)` an explicit one.
#[macro_export]
macro_rules! here {
    () => {
        $crate::tracer().record($crate::function_name!(), ::std::string::String::new())
    };
    (to: $tracer:expr $(,)?) => {
        $tracer.record($crate::function_name!(), ::std::string::String::new())
    };
}

/// Records a message built with `format!` syntax.
#[macro_export]
macro_rules! msg {
    (to: $tracer:expr, $($arg:tt)+) => {
        $tracer.record($crate::function_name!(), ::std::format!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::tracer().record($crate::function_name!(), ::std::format!($($arg)+))
    };
}

/// Records the `Debug` form of each value, tagged with its position.
///
/// `objs!(42, "x")` records `[0] 42, [1] "x"`.
#[macro_export]
macro_rules! objs {
    (to: $tracer:expr, $($value:expr),+ $(,)?) => {
        $tracer.record(
            $crate::function_name!(),
            $crate::renderer::dump_values(&[$(&$value as &dyn ::std::fmt::Debug),+]),
        )
    };
    ($($value:expr),+ $(,)?) => {
        $crate::tracer().record(
            $crate::function_name!(),
            $crate::renderer::dump_values(&[$(&$value as &dyn ::std::fmt::Debug),+]),
        )
    };
}

/// Records a value serialized as JSON: `CHECK - {json}`.
#[macro_export]
macro_rules! check {
    (to: $tracer:expr, $value:expr $(,)?) => {
        $tracer.record($crate::function_name!(), $crate::renderer::check_message(&$value))
    };
    ($value:expr $(,)?) => {
        $crate::tracer().record($crate::function_name!(), $crate::renderer::check_message(&$value))
    };
}
