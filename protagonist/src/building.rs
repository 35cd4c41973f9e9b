// building.rs  Box-pile building
//
// Copyright (c) 2024  Douglas Lau
//
use crate::material::MaterialId;
use crate::scene::{NodeId, Primitive, Scene};
use crate::shape::Shape;
use crate::xform::Transform;
use glam::Vec3;

/// Edge length of one box
const BOX_SIZE: f32 = 1.0;

/// Distance between adjacent box centers
const SPACING: f32 = 1.2;

/// Count of tiers in a pile
const TIERS: usize = 3;

/// Half-width of the square the corner piles sit on
const CORNER: f32 = 6.0;

/// Scale of the center pile
const CENTER_SCALE: f32 = 2.0;

/// Box-pile building
///
/// A pile is a stack of cross-shaped tiers, each one box narrower than
/// the tier below.  Piles are placed at four corners of a square, plus a
/// larger one in the middle.
#[derive(Clone, Debug)]
pub struct Building {
    /// Root group
    root: NodeId,

    /// Corner piles
    corners: Vec<NodeId>,

    /// Scaled center pile
    center: NodeId,
}

/// Box primitive
fn box_prim(tier: usize) -> Primitive {
    let material = if tier % 2 == 0 {
        MaterialId::BLUE
    } else {
        MaterialId::METAL
    };
    Primitive {
        shape: Shape::Cuboid {
            width: BOX_SIZE,
            height: BOX_SIZE,
            depth: BOX_SIZE,
        },
        material,
    }
}

/// Get box offsets for a cross with `arm` boxes on each side
fn cross_offsets(arm: usize) -> impl Iterator<Item = Vec3> {
    let center = std::iter::once(Vec3::ZERO);
    let arms = (1..=arm).flat_map(|k| {
        let d = k as f32 * SPACING;
        [
            Vec3::new(d, 0.0, 0.0),
            Vec3::new(-d, 0.0, 0.0),
            Vec3::new(0.0, 0.0, d),
            Vec3::new(0.0, 0.0, -d),
        ]
    });
    center.chain(arms)
}

/// Build one cross-shaped tier
fn build_tier(scene: &mut Scene, tier: usize) -> NodeId {
    let group = scene.add_group(format!("tier{tier}"));
    let arm = TIERS - tier;
    for pos in cross_offsets(arm) {
        let mesh = scene.add_mesh(box_prim(tier), Transform::from_translation(pos));
        scene.attach(group, mesh);
    }
    scene.node_mut(group).xform.translation =
        Vec3::new(0.0, BOX_SIZE * 0.5 + tier as f32 * SPACING, 0.0);
    group
}

/// Build one pile of stacked tiers
fn build_pile(scene: &mut Scene) -> NodeId {
    let pile = scene.add_group("pile");
    for tier in 0..TIERS {
        let t = build_tier(scene, tier);
        scene.attach(pile, t);
    }
    pile
}

impl Building {
    /// Build the building into a scene
    ///
    /// The root group is returned detached.
    pub fn build(scene: &mut Scene) -> Self {
        let root = scene.add_group("building");
        let template = build_pile(scene);
        let mut corners = Vec::with_capacity(4);
        for (i, (x, z)) in [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)]
            .into_iter()
            .enumerate()
        {
            let pile = if i == 0 {
                template
            } else {
                scene.clone_subtree(template)
            };
            scene.node_mut(pile).xform.translation =
                Vec3::new(x * CORNER, 0.0, z * CORNER);
            scene.attach(root, pile);
            corners.push(pile);
        }
        let center = scene.clone_subtree(template);
        let xform = &mut scene.node_mut(center).xform;
        xform.translation = Vec3::ZERO;
        xform.scale = Vec3::splat(CENTER_SCALE);
        scene.attach(root, center);
        Building {
            root,
            corners,
            center,
        }
    }

    /// Get the root group
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get the corner piles
    pub fn corners(&self) -> &[NodeId] {
        &self.corners
    }

    /// Get the center pile
    pub fn center(&self) -> NodeId {
        self.center
    }

    /// Count the boxes in one pile
    pub fn boxes_per_pile() -> usize {
        (0..TIERS).map(|t| 1 + 4 * (TIERS - t)).sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn count_boxes(scene: &Scene, pile: NodeId) -> usize {
        scene
            .descendants(pile)
            .into_iter()
            .filter(|n| scene.node(*n).primitive().is_some())
            .count()
    }

    #[test]
    fn piles() {
        let mut scene = Scene::default();
        let building = Building::build(&mut scene);
        assert_eq!(building.corners().len(), 4);
        assert_eq!(scene.children(building.root()).len(), 5);
        assert_eq!(Building::boxes_per_pile(), 13 + 9 + 5);
        for pile in building.corners() {
            assert_eq!(count_boxes(&scene, *pile), Building::boxes_per_pile());
            let pos = scene.node(*pile).xform.translation;
            assert_eq!(pos.x.abs(), CORNER);
            assert_eq!(pos.z.abs(), CORNER);
            assert_eq!(pos.y, 0.0);
        }
        let center = building.center();
        assert_eq!(scene.node(center).xform.scale, Vec3::splat(CENTER_SCALE));
        assert_eq!(count_boxes(&scene, center), Building::boxes_per_pile());
        assert_eq!(scene.descendants(building.root()).len() + 1, scene.len());
    }

    #[test]
    fn tiers_narrow_upward() {
        let mut scene = Scene::default();
        let pile = build_pile(&mut scene);
        let tiers = scene.children(pile).to_vec();
        assert_eq!(tiers.len(), TIERS);
        let mut prev = usize::MAX;
        let mut prev_y = f32::MIN;
        for tier in tiers {
            let boxes = scene.children(tier).len();
            assert!(boxes < prev);
            prev = boxes;
            let y = scene.node(tier).xform.translation.y;
            assert!(y > prev_y);
            prev_y = y;
        }
    }

    #[test]
    fn cross_shape() {
        let offsets: Vec<_> = cross_offsets(2).collect();
        assert_eq!(offsets.len(), 9);
        assert!(offsets.iter().all(|v| v.y == 0.0 && (v.x == 0.0 || v.z == 0.0)));
        assert!(offsets.contains(&Vec3::new(2.0 * SPACING, 0.0, 0.0)));
    }
}
