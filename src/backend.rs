//! Render backends
//!
//! A backend receives one [`FrameDrawList`] per tick. The wgpu renderer in
//! [`crate::gpu`] is the real one; [`RecordingBackend`] keeps the last frame
//! for hosts that render elsewhere (and for tests).

use crate::camera::Camera3D;
use crate::config::Viewport;
use crate::error::RenderError;
use crate::quality::{QualitySettings, QualityTier};
use crate::scene::FrameDrawList;

/// Something that can draw a frame
pub trait RenderBackend {
    /// Rebuild whatever depends on the quality tier (geometry detail,
    /// shading pipeline, sample count, target size)
    fn apply_quality(&mut self, settings: &QualitySettings) -> Result<(), RenderError>;

    /// Draw one frame
    fn draw(&mut self, camera: &Camera3D, frame: &FrameDrawList) -> Result<(), RenderError>;

    /// The host surface changed size
    fn resize(&mut self, _viewport: &Viewport) -> Result<(), RenderError> {
        Ok(())
    }
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn apply_quality(&mut self, settings: &QualitySettings) -> Result<(), RenderError> {
        (**self).apply_quality(settings)
    }

    fn draw(&mut self, camera: &Camera3D, frame: &FrameDrawList) -> Result<(), RenderError> {
        (**self).draw(camera, frame)
    }

    fn resize(&mut self, viewport: &Viewport) -> Result<(), RenderError> {
        (**self).resize(viewport)
    }
}

/// Backend that records frames instead of drawing them
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    tier: Option<QualityTier>,
    viewport: Option<Viewport>,
    rebuilds: usize,
    frames: usize,
    last_frame: Option<FrameDrawList>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tier of the last applied settings
    pub fn tier(&self) -> Option<QualityTier> {
        self.tier
    }

    /// Viewport of the last resize
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// How many times quality settings were applied
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Frames drawn so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// The most recent frame
    pub fn last_frame(&self) -> Option<&FrameDrawList> {
        self.last_frame.as_ref()
    }
}

impl RenderBackend for RecordingBackend {
    fn apply_quality(&mut self, settings: &QualitySettings) -> Result<(), RenderError> {
        self.tier = Some(settings.tier);
        self.rebuilds += 1;
        Ok(())
    }

    fn draw(&mut self, _camera: &Camera3D, frame: &FrameDrawList) -> Result<(), RenderError> {
        self.frames += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn resize(&mut self, viewport: &Viewport) -> Result<(), RenderError> {
        self.viewport = Some(*viewport);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_frame() -> FrameDrawList {
        FrameDrawList {
            nodes: Vec::new(),
            edges: Vec::new(),
            overlays: Vec::new(),
            settings: QualityTier::Low.settings(),
            clear_color: [0.0; 4],
        }
    }

    #[test]
    fn test_recording_backend_keeps_last_frame() {
        let mut backend = RecordingBackend::new();
        assert!(backend.last_frame().is_none());

        backend.apply_quality(&QualityTier::High.settings()).unwrap();
        backend.draw(&Camera3D::default(), &empty_frame()).unwrap();
        backend.draw(&Camera3D::default(), &empty_frame()).unwrap();

        assert_eq!(backend.tier(), Some(QualityTier::High));
        assert_eq!(backend.rebuilds(), 1);
        assert_eq!(backend.frames(), 2);
        assert_eq!(backend.last_frame(), Some(&empty_frame()));
    }

    #[test]
    fn test_boxed_backend_forwards() {
        let mut backend: Box<dyn RenderBackend> = Box::new(RecordingBackend::new());
        backend.apply_quality(&QualityTier::Low.settings()).unwrap();
        backend.draw(&Camera3D::default(), &empty_frame()).unwrap();
        backend.resize(&Viewport::default()).unwrap();
    }
}
