//! Configuration types for Codeweave.
//!
//! This module provides configuration structures that control diagram
//! geometry and the mutation engine. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources, and
//! every field falls back to its default when omitted.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and engine settings.
//! - [`LayoutConfig`] - Container padding and the payload size of newly shown nodes.
//! - [`EngineConfig`] - Mutation engine settings such as the event channel capacity.
//!
//! # Example
//!
//! ```
//! # use codeweave::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().child_area_padding(), 10.0);
//! assert_eq!(config.engine().event_capacity(), 256);
//! ```

use serde::Deserialize;

use codeweave_core::geometry::{Insets, Size};

/// Top-level configuration combining layout and engine settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Engine configuration section.
    #[serde(default)]
    engine: EngineConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and engine configurations.
    pub fn new(layout: LayoutConfig, engine: EngineConfig) -> Self {
        Self { layout, engine }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the engine configuration.
    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }
}

/// Width and height as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SizeConfig {
    width: f32,
    height: f32,
}

impl SizeConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Geometry settings for diagram nodes and containers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Uniform padding around a container's children area.
    child_area_padding: f32,

    /// Payload size given to newly shown nodes.
    default_payload_size: SizeConfig,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    ///
    /// # Arguments
    ///
    /// * `child_area_padding` - Uniform padding around every container's children area.
    /// * `default_payload_size` - Payload size of nodes that have not been measured yet.
    pub fn new(child_area_padding: f32, default_payload_size: Size) -> Self {
        Self {
            child_area_padding,
            default_payload_size: SizeConfig::new(
                default_payload_size.width(),
                default_payload_size.height(),
            ),
        }
    }

    /// Returns the children-area padding.
    pub fn child_area_padding(&self) -> f32 {
        self.child_area_padding
    }

    /// Returns the children-area padding as uniform [`Insets`].
    pub fn child_area_insets(&self) -> Insets {
        Insets::uniform(self.child_area_padding)
    }

    /// Returns the payload size of newly shown nodes.
    pub fn default_payload_size(&self) -> Size {
        self.default_payload_size.to_size()
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            child_area_padding: 10.0,
            default_payload_size: SizeConfig::new(120.0, 40.0),
        }
    }
}

/// Mutation engine settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of the committed-change broadcast channel.
    event_capacity: usize,
}

impl EngineConfig {
    pub fn new(event_capacity: usize) -> Self {
        Self { event_capacity }
    }

    /// Returns the capacity of the committed-change channel, never zero.
    pub fn event_capacity(&self) -> usize {
        self.event_capacity.max(1)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_defaults() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.child_area_padding(), 10.0);
        assert_eq!(layout.child_area_insets(), Insets::uniform(10.0));
        assert_eq!(layout.default_payload_size(), Size::new(120.0, 40.0));
    }

    #[test]
    fn test_engine_capacity_never_zero() {
        assert_eq!(EngineConfig::new(0).event_capacity(), 1);
        assert_eq!(EngineConfig::new(8).event_capacity(), 8);
    }

    #[test]
    fn test_custom_layout() {
        let layout = LayoutConfig::new(2.0, Size::new(80.0, 24.0));
        let config = AppConfig::new(layout, EngineConfig::default());
        assert_eq!(config.layout().child_area_padding(), 2.0);
        assert_eq!(config.layout().default_payload_size(), Size::new(80.0, 24.0));
    }
}
