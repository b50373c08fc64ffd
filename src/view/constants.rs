//! Layout dimension constants for TUI rendering.
//!
//! Centralized location for all layout-related numeric values to enable
//! consistent tuning across the application.

use std::time::Duration;

/// Height of the header bar in lines.
pub const HEADER_HEIGHT: u16 = 1;

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Height of the go-to-line prompt when open.
pub const PROMPT_HEIGHT: u16 = 1;

/// Columns moved per horizontal scroll step.
pub const HORIZONTAL_STEP: usize = 8;

/// Spaces a tab character expands to.
pub const TAB_WIDTH: usize = 4;

/// Longest event poll when nothing is scheduled.
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Width percentage for help overlay popup.
pub const HELP_POPUP_WIDTH_PERCENT: u16 = 70;

/// Height percentage for help overlay popup.
pub const HELP_POPUP_HEIGHT_PERCENT: u16 = 80;
