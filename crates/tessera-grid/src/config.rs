//! Grid configuration, validation, and error types.
//!
//! [`GridConfig`] is the builder-input for constructing a
//! [`Grid`](crate::Grid). [`validate()`](GridConfig::validate) checks
//! structural invariants before any state is allocated.

use thiserror::Error;

use tessera_core::Point;
use tessera_space::Region;

// ── ActionPolicy ───────────────────────────────────────────────────

/// When registered actions run relative to the outcome of a proposed move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ActionPolicy {
    /// Actions whose predicate matches run even when a constraint (or a
    /// pre-move observer) has already aborted the move.
    ///
    /// This is the historical pipeline behaviour. Integrators relying on
    /// actions as "on successful move" hooks want
    /// [`CommittedOnly`](Self::CommittedOnly) instead.
    #[default]
    Always,
    /// Actions run only while the proposal is still unaborted.
    CommittedOnly,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`GridConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Width or height is not positive.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions {
        /// Configured width.
        width: i32,
        /// Configured height.
        height: i32,
    },
    /// A unit size is NaN, infinite, zero, or negative.
    #[error("unit size must be finite and positive, got {width}x{height}")]
    InvalidUnitSize {
        /// Configured unit width.
        width: f64,
        /// Configured unit height.
        height: f64,
    },
    /// The viewport reaches outside the grid.
    #[error("viewport {viewport} is not inside the {width}x{height} grid")]
    ViewportOutsideGrid {
        /// The configured viewport.
        viewport: Region,
        /// Grid width.
        width: i32,
        /// Grid height.
        height: i32,
    },
}

// ── GridConfig ─────────────────────────────────────────────────────

/// Complete configuration for constructing a grid.
///
/// The grid region always starts at the origin; translate it afterwards
/// with [`Grid::move_by`](crate::Grid::move_by).
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Number of columns. Default: 10.
    pub width: i32,
    /// Number of rows. Default: 10.
    pub height: i32,
    /// Whether distinct occupants may share cells. Default: false.
    pub allow_overlapping: bool,
    /// Rendered width of one cell, passed through to formatters. Default: 1.0.
    pub unit_width: f64,
    /// Rendered height of one cell, passed through to formatters. Default: 1.0.
    pub unit_height: f64,
    /// Sub-region walked by rendering. `None` = the whole grid.
    pub viewport: Option<Region>,
    /// When actions run. Default: [`ActionPolicy::Always`].
    pub action_policy: ActionPolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            allow_overlapping: false,
            unit_width: 1.0,
            unit_height: 1.0,
            viewport: None,
            action_policy: ActionPolicy::Always,
        }
    }
}

impl GridConfig {
    /// Default configuration for a `width` x `height` grid.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Set the overlap policy.
    pub fn with_overlapping(mut self, allow: bool) -> Self {
        self.allow_overlapping = allow;
        self
    }

    /// Set the rendered cell size.
    pub fn with_unit_size(mut self, width: f64, height: f64) -> Self {
        self.unit_width = width;
        self.unit_height = height;
        self
    }

    /// Restrict rendering to `viewport`.
    pub fn with_viewport(mut self, viewport: Region) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Set the action policy.
    pub fn with_action_policy(mut self, policy: ActionPolicy) -> Self {
        self.action_policy = policy;
        self
    }

    /// Check every structural invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let region = self.region()?;
        validate_unit_size(self.unit_width, self.unit_height)?;
        if let Some(viewport) = self.viewport {
            if !region.contains_region(&viewport) {
                return Err(ConfigError::ViewportOutsideGrid {
                    viewport,
                    width: self.width,
                    height: self.height,
                });
            }
        }
        Ok(())
    }

    /// The grid region this configuration describes.
    pub(crate) fn region(&self) -> Result<Region, ConfigError> {
        Region::new(Point::ORIGIN, self.width, self.height).map_err(|_| {
            ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            }
        })
    }
}

pub(crate) fn validate_unit_size(width: f64, height: f64) -> Result<(), ConfigError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(ConfigError::InvalidUnitSize { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GridConfig::default().validate().is_ok());
        assert!(GridConfig::new(1, 1).validate().is_ok());
    }

    #[test]
    fn rejects_empty_grid() {
        assert_eq!(
            GridConfig::new(0, 5).validate(),
            Err(ConfigError::InvalidDimensions {
                width: 0,
                height: 5
            })
        );
        assert!(GridConfig::new(5, -1).validate().is_err());
    }

    #[test]
    fn rejects_bad_unit_size() {
        for (w, h) in [(0.0, 1.0), (1.0, -2.0), (f64::NAN, 1.0), (1.0, f64::INFINITY)] {
            let cfg = GridConfig::new(3, 3).with_unit_size(w, h);
            assert!(
                matches!(cfg.validate(), Err(ConfigError::InvalidUnitSize { .. })),
                "unit size {w}x{h} accepted"
            );
        }
    }

    #[test]
    fn viewport_must_fit() {
        let inside = Region::new(Point::new(1, 1), 2, 2).unwrap();
        assert!(GridConfig::new(3, 3).with_viewport(inside).validate().is_ok());

        let outside = Region::new(Point::new(2, 2), 2, 2).unwrap();
        assert!(matches!(
            GridConfig::new(3, 3).with_viewport(outside).validate(),
            Err(ConfigError::ViewportOutsideGrid { .. })
        ));
    }

    #[test]
    fn builder_sets_fields() {
        let cfg = GridConfig::new(4, 6)
            .with_overlapping(true)
            .with_unit_size(16.0, 24.0)
            .with_action_policy(ActionPolicy::CommittedOnly);
        assert_eq!(cfg.width, 4);
        assert_eq!(cfg.height, 6);
        assert!(cfg.allow_overlapping);
        assert_eq!(cfg.unit_width, 16.0);
        assert_eq!(cfg.unit_height, 24.0);
        assert_eq!(cfg.action_policy, ActionPolicy::CommittedOnly);
    }
}
