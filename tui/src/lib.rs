//! Concierge TUI - Terminal surface for the portfolio assistant
//!
//! A full-screen terminal UI around an embedded [`concierge_core::Concierge`].
//! The surface only renders what the core tells it.
//!
//! # Architecture
//!
//! - **App**: Event loop, key/mouse handling and rendering
//! - **Display**: Display state built from `ConciergeMessage`s
//! - **Theme**: Colors

pub mod app;
pub mod display;
pub mod theme;

pub use app::App;
