//! Token Masq TUI - Terminal surface for Token Masq
//!
//! Full-screen converter between text and `cl100k_base` token ids, with the
//! result animated by a scramble or reveal effect.
//!
//! # Architecture
//!
//! - **App**: event loop, focus, layout and effect dispatch
//! - **Widgets**: scrollable text block and per-character reveal text
//! - **Theme**: phosphor palette and opacity blending
//! - **Logging**: stderr for headless runs, a file for the surface
//! - **Oneshot**: headless conversion for `--once` and piped stdin

pub mod app;
pub mod logging;
pub mod oneshot;
pub mod theme;
pub mod widgets;

pub use app::{App, Focus};
