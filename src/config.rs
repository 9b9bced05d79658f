//! Engine configuration
//!
//! Every field has a default so a config file only needs the values it
//! changes. Files are YAML or JSON, picked by extension (see [`crate::io`]).

use std::cmp::Ordering;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::quality::{QualityThresholds, QualityTier};

/// Default node budget per frame
pub const DEFAULT_MAX_RENDER_NODES: usize = 500;

/// Default length of one performance sampling window
pub const DEFAULT_SAMPLE_WINDOW_MS: u64 = 1000;

/// Default memory estimate (MB) above which a warning is emitted
pub const DEFAULT_MEMORY_WARNING_MB: f32 = 100.0;

/// Default memory estimate (MB) above which the warning is critical
pub const DEFAULT_MEMORY_CRITICAL_MB: f32 = 200.0;

/// Default maximum relationship opacity (scaled by strength)
pub const DEFAULT_EDGE_BASE_ALPHA: f32 = 0.8;

/// Background clear color (#f8fafc)
pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.973, 0.980, 0.988, 1.0];

/// Host surface dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Logical width in pixels
    pub width: u32,
    /// Logical height in pixels
    pub height: u32,
    /// Device pixel ratio reported by the host (capped per quality tier)
    pub device_pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            device_pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    /// Width / height
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Physical render target size for a given pixel ratio
    pub fn physical_size(&self, pixel_ratio: f32) -> (u32, u32) {
        let width = ((self.width as f32) * pixel_ratio).round().max(1.0) as u32;
        let height = ((self.height as f32) * pixel_ratio).round().max(1.0) as u32;
        (width, height)
    }
}

/// Configuration handed to the engine at mount time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Nodes submitted per frame, in addition to selected/hovered nodes
    pub max_render_nodes: usize,

    /// Starting quality tier, also the highest tier the controller may use
    pub initial_quality_tier: QualityTier,

    /// Accepted for compatibility; layout is always the deterministic
    /// spherical placement
    pub enable_physics: bool,

    /// Host surface dimensions
    pub viewport: Viewport,

    /// Fps thresholds for tier transitions
    pub thresholds: QualityThresholds,

    /// Performance sampling window in milliseconds
    pub sample_window_ms: u64,

    /// Memory warning threshold in MB
    pub memory_warning_mb: f32,

    /// Memory critical threshold in MB
    pub memory_critical_mb: f32,

    /// Maximum relationship opacity
    pub edge_base_alpha: f32,

    /// Background clear color (RGBA)
    pub clear_color: [f32; 4],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_render_nodes: DEFAULT_MAX_RENDER_NODES,
            initial_quality_tier: QualityTier::default(),
            enable_physics: false,
            viewport: Viewport::default(),
            thresholds: QualityThresholds::default(),
            sample_window_ms: DEFAULT_SAMPLE_WINDOW_MS,
            memory_warning_mb: DEFAULT_MEMORY_WARNING_MB,
            memory_critical_mb: DEFAULT_MEMORY_CRITICAL_MB,
            edge_base_alpha: DEFAULT_EDGE_BASE_ALPHA,
            clear_color: DEFAULT_CLEAR_COLOR,
        }
    }
}

impl EngineConfig {
    /// Set the per-frame node budget
    pub fn with_max_render_nodes(mut self, max_render_nodes: usize) -> Self {
        self.max_render_nodes = max_render_nodes;
        self
    }

    /// Set the initial (and maximum) quality tier
    pub fn with_quality(mut self, tier: QualityTier) -> Self {
        self.initial_quality_tier = tier;
        self
    }

    /// Set the host viewport size
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport.width = width;
        self.viewport.height = height;
        self
    }

    /// Sampling window as a duration
    pub fn sample_window(&self) -> Duration {
        Duration::from_millis(self.sample_window_ms)
    }

    /// Check values that would make the engine misbehave
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Viewport {
            width,
            height,
            device_pixel_ratio,
        } = self.viewport;
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyViewport { width, height });
        }
        if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
            return Err(ConfigError::InvalidPixelRatio(device_pixel_ratio));
        }
        let QualityThresholds {
            downgrade_below_fps,
            upgrade_above_fps,
        } = self.thresholds;
        if downgrade_below_fps >= upgrade_above_fps {
            return Err(ConfigError::InvertedThresholds {
                downgrade: downgrade_below_fps,
                upgrade: upgrade_above_fps,
            });
        }
        if self.sample_window_ms == 0 {
            return Err(ConfigError::EmptySampleWindow);
        }
        if self.memory_warning_mb.partial_cmp(&self.memory_critical_mb) != Some(Ordering::Less) {
            return Err(ConfigError::InvertedMemoryThresholds {
                warning: self.memory_warning_mb,
                critical: self.memory_critical_mb,
            });
        }
        if !(0.0..=1.0).contains(&self.edge_base_alpha) {
            return Err(ConfigError::InvalidEdgeAlpha(self.edge_base_alpha));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_render_nodes, 500);
        assert_eq!(config.initial_quality_tier, QualityTier::Medium);
        assert_eq!(config.sample_window(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "max_render_nodes: 200\ninitial_quality_tier: high\nviewport:\n  width: 1024\n";
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.max_render_nodes, 200);
        assert_eq!(config.initial_quality_tier, QualityTier::High);
        assert_eq!(config.viewport.width, 1024);
        assert_eq!(config.viewport.height, 600);
        assert_eq!(config.edge_base_alpha, DEFAULT_EDGE_BASE_ALPHA);
    }

    #[test]
    fn test_rejects_empty_viewport() {
        let config = EngineConfig::default().with_viewport(0, 600);
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyViewport {
                width: 0,
                height: 600
            })
        );
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let mut config = EngineConfig::default();
        config.thresholds.downgrade_below_fps = 60.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedThresholds { .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_memory_thresholds() {
        let mut config = EngineConfig::default();
        config.memory_warning_mb = 500.0;
        config.memory_critical_mb = 10.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedMemoryThresholds {
                warning: 500.0,
                critical: 10.0
            })
        );
    }

    #[test]
    fn test_rejects_edge_alpha_outside_unit_range() {
        for alpha in [5.0, -0.1, f32::NAN] {
            let mut config = EngineConfig::default();
            config.edge_base_alpha = alpha;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidEdgeAlpha(_))
            ));
        }

        let mut config = EngineConfig::default();
        config.edge_base_alpha = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_pixel_ratio() {
        let mut config = EngineConfig::default();
        config.viewport.device_pixel_ratio = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPixelRatio(_))
        ));
    }

    #[test]
    fn test_physical_size_applies_ratio() {
        let viewport = Viewport {
            width: 800,
            height: 600,
            device_pixel_ratio: 2.0,
        };
        assert_eq!(viewport.physical_size(1.5), (1200, 900));
        assert!((viewport.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }
}
