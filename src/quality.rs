//! Quality tiers and the adaptive quality controller
//!
//! A tier fixes how expensive each rendered primitive is. The controller
//! watches one fps reading per sampling window and moves the tier one step
//! at a time: down when the scene struggles, back up when it recovers, but
//! never above the tier the caller asked for.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default fps below which the tier is lowered
pub const DEFAULT_DOWNGRADE_FPS: f32 = 30.0;

/// Default fps above which the tier is raised (up to the configured tier)
pub const DEFAULT_UPGRADE_FPS: f32 = 50.0;

/// Discrete rendering fidelity level
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityTier {
    /// The next lower tier, or `None` at Low
    pub fn lower(self) -> Option<Self> {
        match self {
            QualityTier::High => Some(QualityTier::Medium),
            QualityTier::Medium => Some(QualityTier::Low),
            QualityTier::Low => None,
        }
    }

    /// The next higher tier, or `None` at High
    pub fn higher(self) -> Option<Self> {
        match self {
            QualityTier::Low => Some(QualityTier::Medium),
            QualityTier::Medium => Some(QualityTier::High),
            QualityTier::High => None,
        }
    }

    /// Rendering parameters fixed by this tier
    pub fn settings(self) -> QualitySettings {
        match self {
            QualityTier::Low => QualitySettings {
                tier: self,
                sphere_subdivisions: 1,
                radial_segments: 8,
                lit: false,
                msaa_samples: 1,
                max_pixel_ratio: 1.0,
            },
            QualityTier::Medium => QualitySettings {
                tier: self,
                sphere_subdivisions: 2,
                radial_segments: 16,
                lit: true,
                msaa_samples: 4,
                max_pixel_ratio: 1.5,
            },
            QualityTier::High => QualitySettings {
                tier: self,
                sphere_subdivisions: 3,
                radial_segments: 32,
                lit: true,
                msaa_samples: 4,
                max_pixel_ratio: 2.0,
            },
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        };
        f.write_str(name)
    }
}

/// Geometry and shading parameters for one quality tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualitySettings {
    /// Tier these settings belong to
    pub tier: QualityTier,
    /// Icosphere subdivision level for sphere-shaped nodes
    pub sphere_subdivisions: u32,
    /// Segment count around cylinders and cones
    pub radial_segments: u32,
    /// Lit (Blinn-Phong) shading when true, flat color when false
    pub lit: bool,
    /// MSAA sample count (1 = anti-aliasing off)
    pub msaa_samples: u32,
    /// Upper bound applied to the host device pixel ratio
    pub max_pixel_ratio: f32,
}

impl QualitySettings {
    /// Whether anti-aliasing is enabled
    pub fn antialias(&self) -> bool {
        self.msaa_samples > 1
    }

    /// Effective pixel ratio for a host reporting `device_pixel_ratio`
    pub fn pixel_ratio(&self, device_pixel_ratio: f32) -> f32 {
        device_pixel_ratio.min(self.max_pixel_ratio).max(0.25)
    }
}

/// Fps thresholds driving tier transitions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Lower the tier when fps falls below this
    pub downgrade_below_fps: f32,
    /// Raise the tier when fps rises above this
    pub upgrade_above_fps: f32,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            downgrade_below_fps: DEFAULT_DOWNGRADE_FPS,
            upgrade_above_fps: DEFAULT_UPGRADE_FPS,
        }
    }
}

/// A single-step tier change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityTransition {
    pub from: QualityTier,
    pub to: QualityTier,
}

/// Closed-loop controller over [`QualityTier`].
///
/// The configured tier is both the initial state and the ceiling.
#[derive(Debug, Clone)]
pub struct AdaptiveQualityController {
    ceiling: QualityTier,
    current: QualityTier,
    thresholds: QualityThresholds,
}

impl AdaptiveQualityController {
    /// Create a controller starting (and capped) at `configured`
    pub fn new(configured: QualityTier) -> Self {
        Self::with_thresholds(configured, QualityThresholds::default())
    }

    /// Create a controller with custom fps thresholds
    pub fn with_thresholds(configured: QualityTier, thresholds: QualityThresholds) -> Self {
        Self {
            ceiling: configured,
            current: configured,
            thresholds,
        }
    }

    /// Current tier
    pub fn tier(&self) -> QualityTier {
        self.current
    }

    /// Tier configured by the caller (never exceeded)
    pub fn ceiling(&self) -> QualityTier {
        self.ceiling
    }

    /// Rendering parameters of the current tier
    pub fn settings(&self) -> QualitySettings {
        self.current.settings()
    }

    /// Feed one performance reading; returns the transition if the tier moved
    pub fn observe(&mut self, fps: f32) -> Option<QualityTransition> {
        let transition = self.propose(fps)?;
        self.commit(transition);
        Some(transition)
    }

    /// The transition a reading of `fps` would cause, without taking it
    pub fn propose(&self, fps: f32) -> Option<QualityTransition> {
        let from = self.current;
        let to = if fps < self.thresholds.downgrade_below_fps {
            from.lower()?
        } else if fps > self.thresholds.upgrade_above_fps && from < self.ceiling {
            from.higher()?
        } else {
            return None;
        };
        Some(QualityTransition { from, to })
    }

    /// Take a transition returned by [`propose`](Self::propose).
    ///
    /// Ignored when the controller has moved since the proposal.
    pub fn commit(&mut self, transition: QualityTransition) {
        let QualityTransition { from, to } = transition;
        if from != self.current {
            return;
        }
        self.current = to;
        if to < from {
            tracing::info!(%from, %to, "lowering render quality");
        } else {
            tracing::info!(%from, %to, "restoring render quality");
        }
    }
}
