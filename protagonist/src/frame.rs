// frame.rs     Frame updater
//
// Copyright (c) 2024  Douglas Lau
//
use crate::config::DrawingCfg;
use crate::scene::{NodeId, Scene};
use glam::{Quat, Vec2};

/// Host render loop
///
/// The host decides when frames happen; the updater only asks for the next
/// one and for the scene to be drawn.
pub trait FrameHost {
    /// Request a callback on the next animation frame
    fn request_frame(&mut self);

    /// Render the scene
    fn render(&mut self, scene: &Scene);
}

/// Updater state
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FrameState {
    /// Not yet started
    #[default]
    Idle,

    /// Updating on every frame
    Running,
}

/// Per-frame rotation of a root node
///
/// The rotation about Y is a steady spin plus a smoothed offset following
/// the pointer.
#[derive(Clone, Debug)]
pub struct FrameUpdater {
    /// Current state
    state: FrameState,

    /// Pointer offset to rotation factor
    mouse_factor: f32,

    /// Spin rate (radians / second)
    spin_rate: f32,

    /// Smoothing factor
    smoothing: f32,

    /// Pointer offset from viewport center
    mouse: Vec2,

    /// Smoothed rotation offset
    smoothed: f32,

    /// Count of ticks while running
    ticks: u64,
}

impl FrameUpdater {
    /// Create a new idle updater
    pub fn new(cfg: &DrawingCfg) -> Self {
        FrameUpdater {
            state: FrameState::Idle,
            mouse_factor: cfg.mouse_factor,
            spin_rate: cfg.spin_rate,
            smoothing: cfg.smoothing.clamp(0.0, 1.0),
            mouse: Vec2::ZERO,
            smoothed: 0.0,
            ticks: 0,
        }
    }

    /// Get the current state
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Get the count of ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Start updating (Idle to Running) and request the first frame
    pub fn start<H: FrameHost>(&mut self, host: &mut H) {
        if self.state == FrameState::Idle {
            self.state = FrameState::Running;
            host.request_frame();
        }
    }

    /// Update pointer position
    ///
    /// `half` is half the viewport size.
    pub fn pointer_moved(&mut self, pos: Vec2, half: Vec2) {
        self.mouse = pos - half;
    }

    /// Get the rotation target from the pointer
    pub fn target(&self) -> Vec2 {
        self.mouse * self.mouse_factor
    }

    /// Get the smoothed rotation offset
    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    /// Handle one animation frame
    ///
    /// `elapsed` is seconds since the drawing started.  Ticks while idle
    /// are ignored.
    pub fn tick<H: FrameHost>(
        &mut self,
        elapsed: f32,
        scene: &mut Scene,
        root: NodeId,
        host: &mut H,
    ) {
        if self.state != FrameState::Running {
            return;
        }
        let target = self.target().x;
        self.smoothed += self.smoothing * (target - self.smoothed);
        let angle = self.spin_rate * elapsed + self.smoothed;
        scene.node_mut(root).xform.rotation = Quat::from_rotation_y(angle);
        self.ticks += 1;
        host.render(scene);
        host.request_frame();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Default)]
    struct Host {
        requests: usize,
        renders: usize,
    }

    impl FrameHost for Host {
        fn request_frame(&mut self) {
            self.requests += 1;
        }

        fn render(&mut self, _scene: &Scene) {
            self.renders += 1;
        }
    }

    fn setup() -> (Scene, NodeId, FrameUpdater, Host) {
        let mut scene = Scene::default();
        let root = scene.add_group("root");
        scene.add_root(root);
        let updater = FrameUpdater::new(&DrawingCfg::default());
        (scene, root, updater, Host::default())
    }

    fn rotation_y(scene: &Scene, root: NodeId) -> f32 {
        let (axis, angle) = scene.node(root).xform.rotation.to_axis_angle();
        if axis.y < 0.0 {
            -angle
        } else {
            angle
        }
    }

    #[test]
    fn idle_until_started() {
        let (mut scene, root, mut updater, mut host) = setup();
        assert_eq!(updater.state(), FrameState::Idle);
        updater.tick(1.0, &mut scene, root, &mut host);
        assert_eq!(updater.ticks(), 0);
        assert_eq!(host.renders, 0);
        updater.start(&mut host);
        updater.start(&mut host);
        assert_eq!(updater.state(), FrameState::Running);
        assert_eq!(host.requests, 1);
    }

    #[test]
    fn tick_renders_and_reschedules() {
        let (mut scene, root, mut updater, mut host) = setup();
        updater.start(&mut host);
        for i in 0..3 {
            updater.tick(i as f32 * 0.016, &mut scene, root, &mut host);
        }
        assert_eq!(updater.ticks(), 3);
        assert_eq!(host.renders, 3);
        assert_eq!(host.requests, 4);
    }

    #[test]
    fn spin_without_pointer() {
        let (mut scene, root, mut updater, mut host) = setup();
        updater.start(&mut host);
        updater.tick(2.0, &mut scene, root, &mut host);
        assert!((rotation_y(&scene, root) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn pointer_offset() {
        let (_scene, _root, mut updater, _host) = setup();
        updater.pointer_moved(Vec2::new(700.0, 100.0), Vec2::new(600.0, 400.0));
        assert_eq!(updater.target(), Vec2::new(0.5, -1.5));
    }

    #[test]
    fn converges_to_target() {
        let (mut scene, root, mut updater, mut host) = setup();
        updater.start(&mut host);
        updater.pointer_moved(Vec2::new(740.0, 400.0), Vec2::new(640.0, 360.0));
        let target = updater.target().x;
        assert!((target - 0.5).abs() < 1e-6);
        let mut elapsed = 0.0;
        let mut prev_err = f32::MAX;
        for _ in 0..30 {
            elapsed += 0.016;
            updater.tick(elapsed, &mut scene, root, &mut host);
            let err = (target - updater.smoothed()).abs();
            assert!(err <= prev_err);
            prev_err = err;
        }
        let steady = 0.5 * elapsed + target;
        assert!((rotation_y(&scene, root) - steady).abs() < 1e-4);
    }
}
