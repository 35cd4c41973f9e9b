// canvas.rs    Host canvas
//
// Copyright (c) 2024  Douglas Lau
//
use protagonist::{FrameHost, MountHost, Scene, Viewport};

/// Mount element id of the program canvas
pub const CANVAS_ID: &str = "drawing";

/// Program canvas
///
/// A single mount element, which records frame requests until the host
/// loop consumes them.
#[derive(Debug)]
pub struct Canvas {
    /// Element id
    id: &'static str,

    /// Viewport size
    viewport: Viewport,

    /// Frame requested
    frame_pending: bool,

    /// Count of rendered frames
    frames: u64,
}

impl Canvas {
    /// Create a new canvas
    pub fn new(width: f32, height: f32) -> Self {
        Canvas {
            id: CANVAS_ID,
            viewport: Viewport::new(width, height),
            frame_pending: false,
            frames: 0,
        }
    }

    /// Take a pending frame request
    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.frame_pending)
    }

    /// Get the count of rendered frames
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl MountHost for Canvas {
    fn lookup(&self, id: &str) -> Option<Viewport> {
        (id == self.id).then_some(self.viewport)
    }
}

impl FrameHost for Canvas {
    fn request_frame(&mut self) {
        self.frame_pending = true;
    }

    fn render(&mut self, _scene: &Scene) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use protagonist::{Drawing, DrawingCfg};

    #[test]
    fn frames() {
        let mut canvas = Canvas::new(1280.0, 720.0);
        let mut drawing =
            Drawing::mount(&mut canvas, DrawingCfg::default()).unwrap();
        assert!(canvas.take_frame());
        assert!(!canvas.take_frame());
        drawing.tick(0.1, &mut canvas);
        assert_eq!(canvas.frames(), 1);
        assert!(canvas.take_frame());
    }

    #[test]
    fn other_mount_id() {
        let mut canvas = Canvas::new(1280.0, 720.0);
        let cfg = DrawingCfg {
            mount_id: "elsewhere".into(),
            ..Default::default()
        };
        assert!(Drawing::mount(&mut canvas, cfg).is_none());
        assert!(!canvas.take_frame());
    }
}
