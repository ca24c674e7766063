//! # Command-Line Interface
//!
//! The `timeline` binary: supplies document text to the core and shows
//! what comes back.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `validate` | List every problem, exit non-zero if any |
//! | `normalize` | Print (or `--write`) the normalized document |
//! | `layout` | ASCII chart (text) or axis geometry (json) |
//! | `fmt` | Re-indent the JSON |
//! | `set-mode` | Switch `view.mode` between `day` and `hour` |
//! | `watch` | Live re-validation, last edit wins |
//! | `sample` | Print the bundled example document |
//!
//! Every command that takes a file also accepts `-` for stdin.
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! `--verbose` (or `-v`) prints `[verbose]` progress lines and enables
//! `debug` tracing from the library. `RUST_LOG` overrides the filter.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod check;
mod edit;
mod render;
mod watch;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
pub use render::render_chart;
