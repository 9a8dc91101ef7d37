//! Bot commands.
//!
//! - [`CommandRegistry`]: name → handler mapping with per-command scope and
//!   prefix
//! - [`CommandParser`]: prefix stripping, tokenising, lookup and dispatch,
//!   including `|` pipes

mod parser;
mod piped;
mod registry;

pub use parser::{CommandParser, ParserSettings};
pub use registry::{CommandEntry, CommandOptions, CommandRegistry};
