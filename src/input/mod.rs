//! Input detection and reading module.

mod detect;
mod read;

pub use detect::{InputSource, is_hex_text, strip_hex_prefix};
pub use read::read_input;
