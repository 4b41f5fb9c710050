//! Theme and Colors
//!
//! The concierge palette. Assistant text uses the accent, visitor text the
//! green, and everything the UI says about itself stays dim.

use ratatui::style::Color;

// ============================================================================
// Text Colors
// ============================================================================

/// Assistant accent (names, mascot, drawer border)
pub const CONCIERGE_MAGENTA: Color = Color::Magenta;

/// Visitor input green
pub const USER_GREEN: Color = Color::Rgb(130, 220, 130);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Faded lines at the edge of a scrolled transcript
pub const FADE_GRAY: Color = Color::Rgb(80, 80, 80);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Warning amber
pub const WARNING_AMBER: Color = Color::Rgb(255, 190, 90);

// ============================================================================
// Mascot Colors
// ============================================================================

/// Idle bubble background tint
pub const BUBBLE: Color = Color::Rgb(200, 230, 255);

/// Typing indicator
pub const THINKING_BLUE: Color = Color::Rgb(150, 180, 255);
