//! Widgets
//!
//! - [`TextBlock`]: borderless scrollable text (scramble output)
//! - [`RevealText`]: per-character fade/slide-in text

mod reveal_text;
mod text_block;

pub use reveal_text::{layout_rows, RevealText};
pub use text_block::{wrap_lines, TextBlock, TextBlockState};
