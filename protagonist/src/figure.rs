// figure.rs    Articulated figure assembly
//
// Copyright (c) 2024  Douglas Lau
//
use crate::error::{Error, Result};
use crate::scene::{NodeId, Scene};
use crate::table::{
    Role, Segment, ARM_RIGHT, JOINT_OFFSETS, SEGMENTS, WHEEL, WHEEL_SKELETON,
};
use glam::Vec3;
use std::f32::consts::{FRAC_PI_4, PI};

/// Count of spokes around the wheel
pub const SPOKES: usize = 8;

/// Angle between adjacent spokes
pub const SPOKE_STEP: f32 = 2.0 * PI / SPOKES as f32;

/// Right arm pose, correcting rows shared with the left arm
const ARM_RIGHT_POSE: Vec3 = Vec3::new(-FRAC_PI_4, 0.0, 0.0);

/// Assembled protagonist figure
///
/// Handles to the nodes which are adjusted after the generic assembly are
/// returned directly, so nothing needs to be looked up by name.
#[derive(Clone, Debug)]
pub struct Protagonist {
    /// Root group of the figure
    root: NodeId,

    /// Segment groups, in table order
    segments: Vec<NodeId>,

    /// Right arm group
    arm_right: NodeId,

    /// Wheel spokes, in order around the wheel
    spokes: Vec<NodeId>,
}

/// Draw one segment into a new group
fn draw_segment(scene: &mut Scene, segment: &Segment) -> NodeId {
    let group = scene.add_group(segment.name);
    for prim in segment.prims {
        let mesh = scene.add_spec(prim);
        scene.attach(group, mesh);
    }
    group
}

/// Build the spoke ring around a wheel
///
/// Each spoke is cloned from the previous one and rotated about X by one
/// more step; `template` is the first spoke.
fn build_spoke_ring(
    scene: &mut Scene,
    wheel: NodeId,
    template: NodeId,
) -> Vec<NodeId> {
    (1..SPOKES).fold(vec![template], |mut ring, k| {
        let prev = ring[ring.len() - 1];
        let spoke = scene.clone_subtree(prev);
        scene
            .node_mut(spoke)
            .xform
            .set_euler(Vec3::new(k as f32 * SPOKE_STEP, 0.0, 0.0));
        scene.attach(wheel, spoke);
        ring.push(spoke);
        ring
    })
}

impl Protagonist {
    /// Build the figure into a scene
    ///
    /// The root group is returned detached; the caller decides where it
    /// goes.
    pub fn build(scene: &mut Scene) -> Self {
        let root = scene.add_group("protagonist");
        let mut segments = Vec::with_capacity(SEGMENTS.len());
        let mut joint = root;
        for (i, segment) in SEGMENTS.iter().enumerate() {
            let group = draw_segment(scene, segment);
            match Segment::role(i) {
                Role::Joint => {
                    scene.node_mut(group).xform.translation =
                        JOINT_OFFSETS[i / 2];
                    scene.attach(root, group);
                    joint = group;
                }
                Role::Attachment => scene.attach(joint, group),
            }
            segments.push(group);
        }
        let arm_right = segments[ARM_RIGHT];
        scene.node_mut(arm_right).xform.set_euler(ARM_RIGHT_POSE);
        let spokes =
            build_spoke_ring(scene, segments[WHEEL], segments[WHEEL_SKELETON]);
        log::debug!(
            "protagonist: {} segments, {} spokes, {} nodes",
            segments.len(),
            spokes.len(),
            scene.descendants(root).len() + 1,
        );
        Protagonist {
            root,
            segments,
            arm_right,
            spokes,
        }
    }

    /// Get the root group
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get the segment groups, in table order
    pub fn segments(&self) -> &[NodeId] {
        &self.segments
    }

    /// Get the joint groups
    pub fn joints(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.segments.iter().step_by(2).copied()
    }

    /// Get a segment group by table name
    pub fn segment(&self, name: &str) -> Result<NodeId> {
        SEGMENTS
            .iter()
            .position(|s| s.name == name)
            .map(|i| self.segments[i])
            .ok_or_else(|| Error::UnknownSegment(name.into()))
    }

    /// Get the right arm group
    pub fn arm_right(&self) -> NodeId {
        self.arm_right
    }

    /// Get the wheel spokes
    pub fn spokes(&self) -> &[NodeId] {
        &self.spokes
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shape::Shape;
    use crate::table::PrimitiveSpec;
    use glam::Quat;

    fn build() -> (Scene, Protagonist) {
        let mut scene = Scene::default();
        let fig = Protagonist::build(&mut scene);
        (scene, fig)
    }

    #[test]
    fn single_root() {
        let (scene, fig) = build();
        assert_eq!(scene.parent(fig.root()), None);
        // every node in the scene hangs from the figure root
        assert_eq!(scene.descendants(fig.root()).len() + 1, scene.len());
    }

    #[test]
    fn joints_and_attachments() {
        let (scene, fig) = build();
        let segs = fig.segments();
        assert_eq!(segs.len(), SEGMENTS.len());
        for (k, joint) in fig.joints().enumerate() {
            assert_eq!(segs[2 * k], joint);
            assert_eq!(scene.parent(joint), Some(fig.root()));
            assert_eq!(scene.node(joint).xform.translation, JOINT_OFFSETS[k]);
            if let Some(attachment) = segs.get(2 * k + 1) {
                assert!(scene.is_descendant(*attachment, joint));
                assert_eq!(scene.parent(*attachment), Some(joint));
            }
        }
        for (i, seg) in segs.iter().enumerate() {
            assert_eq!(scene.node(*seg).name(), Some(SEGMENTS[i].name));
        }
    }

    #[test]
    fn segment_meshes() {
        let (scene, fig) = build();
        let neck = fig.segments()[0];
        let mesh = scene.children(neck)[0];
        let prim = scene.node(mesh).primitive().unwrap();
        assert_eq!(
            prim.shape,
            Shape::Cylinder {
                radius_top: 2.0,
                radius_bottom: 2.0,
                height: 4.0,
                radial_segments: 10,
            }
        );
        // meshes come before the attachment group
        let head = fig.segments()[1];
        assert_eq!(scene.children(neck).len(), 2);
        assert_eq!(scene.children(neck)[1], head);
        assert_eq!(scene.children(head).len(), SEGMENTS[1].prims.len());
    }

    #[test]
    fn cylinder_rows_keep_params() {
        let (scene, fig) = build();
        for (seg, spec) in fig.segments().iter().zip(SEGMENTS) {
            let meshes: Vec<_> = scene
                .children(*seg)
                .iter()
                .filter_map(|c| scene.node(*c).primitive())
                .collect();
            for (prim, row) in meshes.iter().zip(spec.prims) {
                assert_eq!(prim.shape, row.shape);
                if let Shape::Cylinder { .. } = row.shape {
                    assert_eq!(prim.shape.params().len(), 4);
                }
            }
        }
    }

    #[test]
    fn arm_right_patched() {
        let (scene, fig) = build();
        let screw = fig.segments()[ARM_RIGHT - 1];
        assert_eq!(scene.children(screw)[1], fig.arm_right());
        let rot = scene.node(fig.arm_right()).xform.rotation;
        assert!(rot.abs_diff_eq(Quat::from_rotation_x(-FRAC_PI_4), 1e-6));
        // left arm is not patched
        let arm_left = fig.segments()[ARM_RIGHT - 2];
        assert_eq!(scene.node(arm_left).xform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn segment_by_name() {
        let (_scene, fig) = build();
        assert_eq!(fig.segment("armRight").unwrap(), fig.arm_right());
        assert_eq!(fig.segment("neck").unwrap(), fig.segments()[0]);
        assert!(matches!(
            fig.segment("tail"),
            Err(Error::UnknownSegment(n)) if n == "tail"
        ));
    }

    #[test]
    fn spoke_ring() {
        let (scene, fig) = build();
        let spokes = fig.spokes();
        assert_eq!(spokes.len(), SPOKES);
        assert_eq!(spokes[0], fig.segments()[WHEEL_SKELETON]);
        let wheel = fig.segments()[WHEEL];
        assert_eq!(scene.children(wheel)[2], spokes[0]);
        for (k, spoke) in spokes.iter().enumerate() {
            assert_eq!(scene.parent(*spoke), Some(wheel));
            let rot = scene.node(*spoke).xform.rotation;
            let angle = k as f32 * SPOKE_STEP;
            let expected = Quat::from_rotation_x(angle) * Vec3::Y;
            assert!((rot * Vec3::Y).abs_diff_eq(expected, 1e-5));
            if k > 0 {
                // chained: cloned from the previous spoke, not the first
                assert_eq!(scene.node(*spoke).cloned_from(), Some(spokes[k - 1]));
            }
        }
        assert!((SPOKE_STEP * SPOKES as f32 - 2.0 * PI).abs() < 1e-6);
        assert!((SPOKE_STEP - FRAC_PI_4).abs() < 1e-7);
    }

    #[test]
    fn spoke_meshes_copied() {
        let (scene, fig) = build();
        let first = fig.spokes()[0];
        let template: &PrimitiveSpec = &SEGMENTS[WHEEL_SKELETON].prims[0];
        for spoke in fig.spokes() {
            let children = scene.children(*spoke);
            assert_eq!(children.len(), 1);
            let mesh = scene.node(children[0]);
            assert_eq!(mesh.primitive().unwrap().shape, template.shape);
            assert_eq!(mesh.xform, scene.node(scene.children(first)[0]).xform);
        }
    }
}
