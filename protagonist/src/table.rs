// table.rs     Geometry table
//
// Copyright (c) 2024  Douglas Lau
//
use crate::error::{Error, Result};
use crate::material::{MaterialId, Palette};
use crate::shape::{Shape, ShapeKind};
use crate::xform::Transform;
use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_8};

/// Count of leading (non-parameter) values in a raw row
const ROW_HEAD: usize = 8;

/// One row of the geometry table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrimitiveSpec {
    /// Shape with parameters
    pub shape: Shape,

    /// Palette material
    pub material: MaterialId,

    /// Position in group space
    pub position: Vec3,

    /// Euler angles (radians), applied X, Y, Z
    pub rotation: Vec3,
}

/// Named list of primitives drawn into one group
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    /// Group name
    pub name: &'static str,

    /// Primitives in the group
    pub prims: &'static [PrimitiveSpec],
}

/// Role of a segment in the articulated figure
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// Anchor with an explicit offset; parent of the next segment
    Joint,

    /// Rigid part attached to the preceding joint
    Attachment,
}

impl PrimitiveSpec {
    /// Create a primitive spec
    pub const fn new(
        shape: Shape,
        material: MaterialId,
        position: Vec3,
        rotation: Vec3,
    ) -> Self {
        PrimitiveSpec {
            shape,
            material,
            position,
            rotation,
        }
    }

    /// Parse a raw numeric row
    ///
    /// Layout: `[code, material, px, py, pz, rx, ry, rz, params…]`.  Shape
    /// parameters are taken from the end of the row.  Unknown codes fall
    /// back to [Shape::DEFAULT_SPHERE].
    ///
    /// ```rust
    /// # use protagonist::{PrimitiveSpec, Shape};
    /// let row = [1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 2.0, 4.0, 10.0];
    /// let spec = PrimitiveSpec::from_row(&row).unwrap();
    /// assert!(matches!(spec.shape, Shape::Cylinder { height, .. } if height == 4.0));
    /// ```
    pub fn from_row(row: &[f32]) -> Result<Self> {
        if row.len() < ROW_HEAD {
            return Err(Error::ShapeParams {
                kind: "row",
                expected: ROW_HEAD,
                found: row.len(),
            });
        }
        let material = MaterialId(row[1] as usize);
        if !Palette::global().contains(material) {
            return Err(Error::MaterialIndex(material.0));
        }
        let code = row[0] as i32;
        let shape = match ShapeKind::from_code(code) {
            Some(kind) => {
                let arity = kind.arity();
                let found = row.len() - ROW_HEAD;
                if found < arity {
                    return Err(Error::ShapeParams {
                        kind: kind.name(),
                        expected: arity,
                        found,
                    });
                }
                Shape::with_params(kind, &row[row.len() - arity..])
            }
            None => {
                log::debug!("unknown shape code {code}, using default sphere");
                Shape::DEFAULT_SPHERE
            }
        };
        Ok(PrimitiveSpec {
            shape,
            material,
            position: Vec3::new(row[2], row[3], row[4]),
            rotation: Vec3::new(row[5], row[6], row[7]),
        })
    }

    /// Get the local transform
    ///
    /// Rotation is applied one axis at a time, X then Y then Z.
    pub fn transform(&self) -> Transform {
        let mut xform = Transform::from_translation(self.position);
        xform.rotate_xyz(self.rotation);
        xform
    }
}

impl Segment {
    /// Get the segment role from its table index
    pub fn role(index: usize) -> Role {
        if index % 2 == 0 {
            Role::Joint
        } else {
            Role::Attachment
        }
    }
}

/// Cylinder shape
const fn cyl(top: f32, bottom: f32, height: f32, segments: u32) -> Shape {
    Shape::Cylinder {
        radius_top: top,
        radius_bottom: bottom,
        height,
        radial_segments: segments,
    }
}

/// Table row
const fn row(
    shape: Shape,
    material: usize,
    pos: [f32; 3],
    rot: [f32; 3],
) -> PrimitiveSpec {
    PrimitiveSpec::new(
        shape,
        MaterialId(material),
        Vec3::new(pos[0], pos[1], pos[2]),
        Vec3::new(rot[0], rot[1], rot[2]),
    )
}

/// Offsets of joint segments (one per even segment index)
pub const JOINT_OFFSETS: [Vec3; 5] = [
    Vec3::new(0.0, 9.0, 0.0),
    Vec3::new(0.0, -17.0, 5.0),
    Vec3::new(8.5, 3.5, -3.4),
    Vec3::new(-8.5, 3.5, -3.4),
    Vec3::new(0.0, 0.0, 0.0),
];

/// Index of the wheel joint segment
pub const WHEEL: usize = 2;

/// Index of the wheel skeleton (spoke) segment
pub const WHEEL_SKELETON: usize = 3;

/// Index of the right arm segment
pub const ARM_RIGHT: usize = 7;

const NECK: &[PrimitiveSpec] =
    &[row(cyl(2.0, 2.0, 4.0, 10), 2, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0])];

const HEAD: &[PrimitiveSpec] = &[
    // skull
    row(
        Shape::Tetrahedron {
            radius: 10.0,
            detail: 6,
        },
        0,
        [0.0, 9.5, 0.0],
        [0.0, 0.0, 0.0],
    ),
    // eyes
    row(
        Shape::Sphere {
            radius: 2.0,
            width_segments: 8,
            height_segments: 6,
        },
        1,
        [-4.0, 8.5, -9.0],
        [0.0, 0.0, 0.0],
    ),
    row(
        Shape::Sphere {
            radius: 2.0,
            width_segments: 8,
            height_segments: 6,
        },
        1,
        [4.0, 8.5, -9.0],
        [0.0, 0.0, 0.0],
    ),
    // eyebrows
    row(cyl(0.5, 0.5, 5.0, 4), 1, [4.0, 11.5, -8.9], [0.0, -0.5, -1.4]),
    row(cyl(0.5, 0.5, 5.0, 4), 1, [-4.0, 11.5, -8.9], [0.0, 0.4, 1.4]),
];

const WHEEL_PARTS: &[PrimitiveSpec] = &[
    // axle
    row(cyl(1.0, 1.0, 3.0, 8), 0, [0.0, 0.0, 0.0], [0.0, 0.0, FRAC_PI_2]),
    // tire
    row(
        Shape::Torus {
            radius: 10.0,
            tube: 2.8,
            radial_segments: 16,
            tubular_segments: 100,
        },
        2,
        [0.0, 0.0, 0.0],
        [0.0, FRAC_PI_2, 0.0],
    ),
];

const SPOKE: &[PrimitiveSpec] =
    &[row(cyl(0.3, 0.3, 8.0, 10), 2, [0.0, -4.0, 0.0], [0.0, 0.0, 0.0])];

const SCREW_LEFT: &[PrimitiveSpec] =
    &[row(cyl(2.0, 2.0, 3.0, 6), 1, [0.0, 0.0, 0.0], [FRAC_PI_2, 0.0, 1.3])];

const ARM_LEFT: &[PrimitiveSpec] = &[
    row(cyl(1.5, 1.0, 9.0, 4), 0, [2.7, 0.1, -1.0], [-2.1, -0.5, -1.3]),
    row(cyl(2.5, 2.5, 2.0, 6), 1, [6.0, 2.0, -3.0], [2.0, 0.4, 0.4]),
    row(cyl(3.0, 1.5, 9.0, 4), 0, [6.1, 4.0, -6.6], [-1.0, 0.0, 0.0]),
];

const SCREW_RIGHT: &[PrimitiveSpec] =
    &[row(cyl(2.0, 2.0, 3.0, 6), 1, [0.0, 0.0, 0.0], [FRAC_PI_2, 0.0, -1.3])];

const ARM_RIGHT_PARTS: &[PrimitiveSpec] = &[
    row(cyl(1.5, 1.0, 9.0, 4), 0, [-2.7, 0.1, -1.0], [-2.1, 0.5, 1.3]),
    row(cyl(2.5, 2.5, 2.0, 6), 1, [-6.0, 2.0, -3.0], [2.0, 0.4, -0.2]),
    row(cyl(3.0, 1.5, 9.0, 4), 0, [-6.1, 4.0, -6.6], [-1.0, 0.0, 0.0]),
];

const BODY: &[PrimitiveSpec] = &[
    // upper
    row(cyl(5.0, 10.0, 4.0, 6), 3, [0.0, 6.0, 0.0], [0.0, 0.0, 0.0]),
    // lower
    row(cyl(10.0, 6.0, 8.0, 6), 4, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
    // legs
    row(cyl(1.5, 1.0, 23.0, 4), 0, [-5.0, -7.4, 1.3], [-FRAC_PI_8, 0.0, 0.3]),
    row(cyl(1.5, 1.0, 23.0, 4), 0, [5.0, -7.4, 1.3], [-FRAC_PI_8, 0.0, -0.3]),
];

/// Protagonist segments, alternating joint / attachment
pub const SEGMENTS: [Segment; 9] = [
    Segment {
        name: "neck",
        prims: NECK,
    },
    Segment {
        name: "head",
        prims: HEAD,
    },
    Segment {
        name: "wheel",
        prims: WHEEL_PARTS,
    },
    Segment {
        name: "wheel_skeleton",
        prims: SPOKE,
    },
    Segment {
        name: "body_screwL",
        prims: SCREW_LEFT,
    },
    Segment {
        name: "armLeft",
        prims: ARM_LEFT,
    },
    Segment {
        name: "body_screwR",
        prims: SCREW_RIGHT,
    },
    Segment {
        name: "armRight",
        prims: ARM_RIGHT_PARTS,
    },
    Segment {
        name: "body",
        prims: BODY,
    },
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cylinder_row() {
        let row = [1.0, 0.0, 2.7, 0.1, -1.0, -2.1, -0.5, -1.3, 1.5, 1.0, 9.0, 4.0];
        let spec = PrimitiveSpec::from_row(&row).unwrap();
        assert_eq!(spec.shape.kind(), ShapeKind::Cylinder);
        assert_eq!(spec.shape.params(), &row[8..]);
        assert_eq!(spec, ARM_LEFT[0]);
    }

    #[test]
    fn params_from_tail() {
        // extra value between head and params is skipped
        let row = [3.0, 1.0, -4.0, 8.5, -9.0, 0.0, 0.0, 0.0, 99.0, 2.0, 8.0, 6.0];
        let spec = PrimitiveSpec::from_row(&row).unwrap();
        assert_eq!(spec, HEAD[1]);
    }

    #[test]
    fn unknown_code() {
        let row = [7.0, 0.0, 1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 5.0];
        let spec = PrimitiveSpec::from_row(&row).unwrap();
        assert_eq!(spec.shape, Shape::DEFAULT_SPHERE);
        assert_eq!(spec.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn dense_cylinder_row() {
        let row = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 40000.0];
        let mesh = PrimitiveSpec::from_row(&row).unwrap().shape.mesh();
        assert!(mesh.has_wide_indices());
        assert_eq!(mesh.triangles(), 40_000 * 4);
    }

    #[test]
    fn short_rows() {
        assert!(matches!(
            PrimitiveSpec::from_row(&[1.0, 0.0, 0.0]),
            Err(Error::ShapeParams { expected: 8, found: 3, .. })
        ));
        let row = [4.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0, 2.8];
        assert!(matches!(
            PrimitiveSpec::from_row(&row),
            Err(Error::ShapeParams {
                kind: "torus",
                expected: 4,
                found: 2,
            })
        ));
    }

    #[test]
    fn bad_material() {
        let row = [3.0, 9.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 8.0, 6.0];
        assert!(matches!(
            PrimitiveSpec::from_row(&row),
            Err(Error::MaterialIndex(9))
        ));
    }

    #[test]
    fn table_materials_valid() {
        let palette = Palette::global();
        for seg in SEGMENTS {
            assert!(!seg.prims.is_empty());
            for prim in seg.prims {
                assert!(palette.contains(prim.material), "{}", seg.name);
            }
        }
    }

    #[test]
    fn roles() {
        assert_eq!(SEGMENTS.len(), JOINT_OFFSETS.len() * 2 - 1);
        assert_eq!(Segment::role(WHEEL), Role::Joint);
        assert_eq!(Segment::role(WHEEL_SKELETON), Role::Attachment);
        assert_eq!(Segment::role(ARM_RIGHT), Role::Attachment);
        assert_eq!(SEGMENTS[ARM_RIGHT].name, "armRight");
    }
}
