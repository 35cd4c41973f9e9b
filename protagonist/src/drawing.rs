// drawing.rs   Drawing context
//
// Copyright (c) 2024  Douglas Lau
//
use crate::building::Building;
use crate::config::DrawingCfg;
use crate::error::Result;
use crate::figure::Protagonist;
use crate::frame::{FrameHost, FrameState, FrameUpdater};
use crate::material::MaterialId;
use crate::scene::{NodeId, Primitive, Scene};
use crate::shape::Shape;
use crate::xform::Transform;
use glam::{Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;
use std::io::Write;

/// Viewport size (pixels)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Width
    pub width: f32,

    /// Height
    pub height: f32,
}

/// Host page or window containing mount elements
pub trait MountHost {
    /// Look up a mount element, returning its viewport
    fn lookup(&self, id: &str) -> Option<Viewport>;
}

/// Drawing context
///
/// Owns the scene and everything needed to animate it.
#[derive(Debug)]
pub struct Drawing {
    /// Configuration
    cfg: DrawingCfg,

    /// Scene graph
    scene: Scene,

    /// Mount viewport
    viewport: Viewport,

    /// Object root (rotated every frame)
    object_root: NodeId,

    /// Protagonist figure
    protagonist: Protagonist,

    /// Building (second revision)
    building: Option<Building>,

    /// Frame updater
    updater: FrameUpdater,
}

impl Viewport {
    /// Create a new viewport
    pub fn new(width: f32, height: f32) -> Self {
        Viewport { width, height }
    }

    /// Get half the viewport size
    pub fn half(self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }
}

/// Add the ground plane
fn add_ground(scene: &mut Scene, cfg: &DrawingCfg) -> NodeId {
    let prim = Primitive {
        shape: Shape::Plane {
            width: cfg.ground_size,
            height: cfg.ground_size,
        },
        material: MaterialId::BLACK,
    };
    let mut xform = Transform::from_translation(Vec3::new(0.0, cfg.ground_y, 0.0));
    xform.rotate_x(-FRAC_PI_2);
    scene.add_mesh(prim, xform)
}

/// Add the grid helper
fn add_grid(scene: &mut Scene, cfg: &DrawingCfg) -> NodeId {
    let prim = Primitive {
        shape: Shape::Grid {
            size: cfg.ground_size,
            divisions: cfg.grid_divisions,
        },
        material: MaterialId::WHITE,
    };
    let xform = Transform::from_translation(Vec3::new(0.0, cfg.ground_y, 0.0));
    scene.add_mesh(prim, xform)
}

impl Drawing {
    /// Mount a drawing on a host element
    ///
    /// If the mount element is missing, a warning is logged and nothing is
    /// built.  Otherwise the scene is assembled and the frame updater is
    /// started.
    pub fn mount<H>(host: &mut H, cfg: DrawingCfg) -> Option<Self>
    where
        H: MountHost + FrameHost,
    {
        let Some(viewport) = host.lookup(&cfg.mount_id) else {
            log::warn!("mount element `{}` not found", cfg.mount_id);
            return None;
        };
        let mut scene = Scene::default();
        let object_root = scene.add_group("objectRoot");
        scene.add_root(object_root);
        let ground = add_ground(&mut scene, &cfg);
        scene.attach(object_root, ground);
        let protagonist = Protagonist::build(&mut scene);
        scene.node_mut(protagonist.root()).xform.scale = Vec3::splat(cfg.scale);
        scene.attach(object_root, protagonist.root());
        let grid = add_grid(&mut scene, &cfg);
        scene.attach(object_root, grid);
        let building = cfg.has_building().then(|| {
            let building = Building::build(&mut scene);
            scene.attach(object_root, building.root());
            building
        });
        log::info!(
            "mounted `{}` ({:?}, {} nodes)",
            cfg.mount_id,
            cfg.revision,
            scene.len()
        );
        let mut updater = FrameUpdater::new(&cfg);
        updater.start(host);
        Some(Drawing {
            cfg,
            scene,
            viewport,
            object_root,
            protagonist,
            building,
            updater,
        })
    }

    /// Get the configuration
    pub fn cfg(&self) -> &DrawingCfg {
        &self.cfg
    }

    /// Get the scene graph
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Get the object root node
    pub fn object_root(&self) -> NodeId {
        self.object_root
    }

    /// Get the protagonist figure
    pub fn protagonist(&self) -> &Protagonist {
        &self.protagonist
    }

    /// Get the building
    pub fn building(&self) -> Option<&Building> {
        self.building.as_ref()
    }

    /// Get the frame updater state
    pub fn state(&self) -> FrameState {
        self.updater.state()
    }

    /// Get the frame updater
    pub fn updater(&self) -> &FrameUpdater {
        &self.updater
    }

    /// Get the viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Set the viewport (after a resize)
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Handle pointer movement (viewport pixel coordinates)
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.updater
            .pointer_moved(Vec2::new(x, y), self.viewport.half());
    }

    /// Handle one animation frame
    pub fn tick<H: FrameHost>(&mut self, elapsed: f32, host: &mut H) {
        self.updater
            .tick(elapsed, &mut self.scene, self.object_root, host);
    }

    /// Write the scene as `.glb`
    pub fn write_gltf<W: Write>(&self, writer: W) -> Result<()> {
        self.scene.write_gltf(writer)
    }
}
