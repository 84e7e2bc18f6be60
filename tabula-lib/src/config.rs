//! Layout and drag configuration

use std::time::Duration;

/// Defaults applied to columns that leave width settings unspecified.
///
/// # Example
///
/// ```
/// use tabula_lib::config::LayoutConfig;
///
/// let config = LayoutConfig::default()
///     .with_default_width(120)
///     .with_default_min_width(40);
/// assert_eq!(config.default_width, 120);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Starting width for columns without an explicit width.
    ///
    /// Default: 150 px
    pub default_width: u32,

    /// Minimum width for columns without an explicit minimum.
    ///
    /// Default: 50 px
    pub default_min_width: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_width: 150,
            default_min_width: 50,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_width(mut self, width: u32) -> Self {
        self.default_width = width;
        self
    }

    pub fn with_default_min_width(mut self, width: u32) -> Self {
        self.default_min_width = width;
        self
    }
}

/// Settings for interactive border dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragConfig {
    /// Minimum spacing between applied pointer moves.
    ///
    /// Default: 50 ms
    pub throttle: Duration,

    /// Keyboard nudge per arrow key press.
    ///
    /// Default: 5 px
    pub keyboard_step: u32,

    /// Keyboard nudge with the large-step modifier held.
    ///
    /// Default: 20 px
    pub keyboard_step_large: u32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            throttle: Duration::from_millis(50),
            keyboard_step: 5,
            keyboard_step_large: 20,
        }
    }
}

impl DragConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_keyboard_steps(mut self, step: u32, large: u32) -> Self {
        self.keyboard_step = step;
        self.keyboard_step_large = large;
        self
    }
}
