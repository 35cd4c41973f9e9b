// shape.rs     Primitive shapes
//
// Copyright (c) 2024  Douglas Lau
//
use crate::mesh::{Face, Mesh, MeshBuilder, Smoothing};
use glam::Vec3;
use std::f32::consts::PI;

/// Shape kind
///
/// Table rows select a kind by numeric code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShapeKind {
    Cylinder,
    Tetrahedron,
    Sphere,
    Torus,
    Cuboid,
    Plane,
    Grid,
}

/// Primitive shape with its parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Cylinder (or cone) centered on origin, along Y axis
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },

    /// Tetrahedron; each `detail` level subdivides faces toward a sphere
    Tetrahedron { radius: f32, detail: u32 },

    /// UV sphere
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },

    /// Torus in XY plane
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },

    /// Axis-aligned box centered on origin
    Cuboid { width: f32, height: f32, depth: f32 },

    /// Plane in XY, facing +Z
    Plane { width: f32, height: f32 },

    /// Grid of thin lines on XZ plane
    Grid { size: f32, divisions: u32 },
}

impl ShapeKind {
    /// Look up a table code
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(ShapeKind::Cylinder),
            2 => Some(ShapeKind::Tetrahedron),
            3 => Some(ShapeKind::Sphere),
            4 => Some(ShapeKind::Torus),
            _ => None,
        }
    }

    /// Get the count of shape parameters
    pub fn arity(self) -> usize {
        match self {
            ShapeKind::Cylinder | ShapeKind::Torus => 4,
            ShapeKind::Sphere | ShapeKind::Cuboid => 3,
            ShapeKind::Tetrahedron | ShapeKind::Plane | ShapeKind::Grid => 2,
        }
    }

    /// Get kind name
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Tetrahedron => "tetrahedron",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Torus => "torus",
            ShapeKind::Cuboid => "cuboid",
            ShapeKind::Plane => "plane",
            ShapeKind::Grid => "grid",
        }
    }
}

/// Convert a segment count parameter
fn segments(val: f32, min: u32) -> u32 {
    (val.max(0.0) as u32).max(min)
}

impl Shape {
    /// Fallback shape for unknown codes
    pub const DEFAULT_SPHERE: Shape = Shape::Sphere {
        radius: 2.0,
        width_segments: 16,
        height_segments: 16,
    };

    /// Create a shape from a kind and its parameters
    ///
    /// `params` must have exactly `kind.arity()` values.
    pub(crate) fn with_params(kind: ShapeKind, params: &[f32]) -> Self {
        debug_assert_eq!(params.len(), kind.arity());
        match kind {
            ShapeKind::Cylinder => Shape::Cylinder {
                radius_top: params[0],
                radius_bottom: params[1],
                height: params[2],
                radial_segments: segments(params[3], 3),
            },
            ShapeKind::Tetrahedron => Shape::Tetrahedron {
                radius: params[0],
                detail: segments(params[1], 0),
            },
            ShapeKind::Sphere => Shape::Sphere {
                radius: params[0],
                width_segments: segments(params[1], 3),
                height_segments: segments(params[2], 2),
            },
            ShapeKind::Torus => Shape::Torus {
                radius: params[0],
                tube: params[1],
                radial_segments: segments(params[2], 3),
                tubular_segments: segments(params[3], 3),
            },
            ShapeKind::Cuboid => Shape::Cuboid {
                width: params[0],
                height: params[1],
                depth: params[2],
            },
            ShapeKind::Plane => Shape::Plane {
                width: params[0],
                height: params[1],
            },
            ShapeKind::Grid => Shape::Grid {
                size: params[0],
                divisions: segments(params[1], 1),
            },
        }
    }

    /// Get the shape kind
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Cylinder { .. } => ShapeKind::Cylinder,
            Shape::Tetrahedron { .. } => ShapeKind::Tetrahedron,
            Shape::Sphere { .. } => ShapeKind::Sphere,
            Shape::Torus { .. } => ShapeKind::Torus,
            Shape::Cuboid { .. } => ShapeKind::Cuboid,
            Shape::Plane { .. } => ShapeKind::Plane,
            Shape::Grid { .. } => ShapeKind::Grid,
        }
    }

    /// Get the shape parameters, in table order
    pub fn params(&self) -> Vec<f32> {
        match *self {
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => vec![radius_top, radius_bottom, height, radial_segments as f32],
            Shape::Tetrahedron { radius, detail } => {
                vec![radius, detail as f32]
            }
            Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            } => vec![radius, width_segments as f32, height_segments as f32],
            Shape::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => vec![
                radius,
                tube,
                radial_segments as f32,
                tubular_segments as f32,
            ],
            Shape::Cuboid {
                width,
                height,
                depth,
            } => vec![width, height, depth],
            Shape::Plane { width, height } => vec![width, height],
            Shape::Grid { size, divisions } => vec![size, divisions as f32],
        }
    }

    /// Build a triangle mesh for the shape
    pub fn mesh(&self) -> Mesh {
        match *self {
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => build_cylinder(
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            ),
            Shape::Tetrahedron { radius, detail } => {
                build_tetrahedron(radius, detail)
            }
            Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            } => build_sphere(radius, width_segments, height_segments),
            Shape::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => build_torus(radius, tube, radial_segments, tubular_segments),
            Shape::Cuboid {
                width,
                height,
                depth,
            } => build_cuboid(Vec3::new(width, height, depth)),
            Shape::Plane { width, height } => build_plane(width, height),
            Shape::Grid { size, divisions } => build_grid(size, divisions),
        }
    }
}

/// Point on a ring around the Y axis (angle 0 is +Z, increasing toward +X)
fn ring_point(radius: f32, angle: f32, y: f32) -> Vec3 {
    Vec3::new(radius * angle.sin(), y, radius * angle.cos())
}

/// Build a cylinder mesh
fn build_cylinder(rtop: f32, rbot: f32, height: f32, radial: u32) -> Mesh {
    let n = radial.max(3) as usize;
    let half = height * 0.5;
    let mut builder = Mesh::builder();
    let top: Vec<usize> = (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f32 / n as f32;
            builder.push_vtx(ring_point(rtop, angle, half))
        })
        .collect();
    let bot: Vec<usize> = (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f32 / n as f32;
            builder.push_vtx(ring_point(rbot, angle, -half))
        })
        .collect();
    for i in 0..n {
        let j = (i + 1) % n;
        if rbot > 0.0 {
            builder.push_face(Face::smooth([top[i], bot[i], bot[j]]));
        }
        if rtop > 0.0 {
            builder.push_face(Face::smooth([top[i], bot[j], top[j]]));
        }
    }
    if rtop > 0.0 {
        let center = builder.push_vtx(Vec3::new(0.0, half, 0.0));
        for i in 0..n {
            let j = (i + 1) % n;
            builder.push_face(Face::flat([center, top[i], top[j]]));
        }
    }
    if rbot > 0.0 {
        let center = builder.push_vtx(Vec3::new(0.0, -half, 0.0));
        for i in 0..n {
            let j = (i + 1) % n;
            builder.push_face(Face::flat([center, bot[j], bot[i]]));
        }
    }
    builder.build()
}

/// Build a UV sphere mesh
fn build_sphere(radius: f32, width: u32, height: u32) -> Mesh {
    let (w, h) = (width.max(3) as usize, height.max(2) as usize);
    let mut builder = Mesh::builder();
    let north = builder.push_vtx(Vec3::new(0.0, radius, 0.0));
    let mut rings = Vec::with_capacity(h - 1);
    for iy in 1..h {
        let phi = PI * iy as f32 / h as f32;
        let y = radius * phi.cos();
        let r = radius * phi.sin();
        let ring: Vec<usize> = (0..w)
            .map(|ix| {
                let angle = 2.0 * PI * ix as f32 / w as f32;
                builder.push_vtx(ring_point(r, angle, y))
            })
            .collect();
        rings.push(ring);
    }
    let south = builder.push_vtx(Vec3::new(0.0, -radius, 0.0));
    for i in 0..w {
        let j = (i + 1) % w;
        builder.push_face(Face::smooth([north, rings[0][i], rings[0][j]]));
        for k in 1..rings.len() {
            let (upper, lower) = (&rings[k - 1], &rings[k]);
            builder.push_face(Face::smooth([upper[i], lower[i], lower[j]]));
            builder.push_face(Face::smooth([upper[i], lower[j], upper[j]]));
        }
        let last = &rings[rings.len() - 1];
        builder.push_face(Face::smooth([last[i], south, last[j]]));
    }
    builder.build()
}

/// Build a torus mesh
fn build_torus(radius: f32, tube: f32, radial: u32, tubular: u32) -> Mesh {
    let (nr, nt) = (radial.max(3) as usize, tubular.max(3) as usize);
    let mut builder = Mesh::builder();
    let mut vids = Vec::with_capacity(nr * nt);
    for j in 0..nr {
        let v = 2.0 * PI * j as f32 / nr as f32;
        for i in 0..nt {
            let u = 2.0 * PI * i as f32 / nt as f32;
            let d = radius + tube * v.cos();
            let pos = Vec3::new(d * u.cos(), d * u.sin(), tube * v.sin());
            vids.push(builder.push_vtx(pos));
        }
    }
    let vid = |j: usize, i: usize| vids[(j % nr) * nt + i % nt];
    for j in 0..nr {
        for i in 0..nt {
            let a = vid(j + 1, i);
            let b = vid(j, i);
            let c = vid(j, i + 1);
            let d = vid(j + 1, i + 1);
            builder.push_face(Face::smooth([a, b, d]));
            builder.push_face(Face::smooth([b, c, d]));
        }
    }
    builder.build()
}

/// Tetrahedron corners
const TETRA_VERTICES: [Vec3; 4] = [
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
];

/// Tetrahedron faces
const TETRA_FACES: [[usize; 3]; 4] = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];

/// Push a vertex, reusing any existing vertex at the same position
fn push_shared_vtx(builder: &mut MeshBuilder, pos: Vec3) -> usize {
    (0..builder.vertices())
        .find(|i| builder.vertex(*i).abs_diff_eq(pos, 1e-5))
        .unwrap_or_else(|| builder.push_vtx(pos))
}

/// Build a tetrahedron mesh, subdivided `detail` times
fn build_tetrahedron(radius: f32, detail: u32) -> Mesh {
    let smoothing = if detail == 0 {
        Smoothing::Flat
    } else {
        Smoothing::Smooth
    };
    let cols = detail as usize + 1;
    let mut builder = Mesh::builder();
    for [ia, ib, ic] in TETRA_FACES {
        let (a, b, c) = (TETRA_VERTICES[ia], TETRA_VERTICES[ib], TETRA_VERTICES[ic]);
        // v[i][j]: row i from edge a-b toward c
        let mut v: Vec<Vec<usize>> = Vec::with_capacity(cols + 1);
        for i in 0..=cols {
            let aj = a.lerp(c, i as f32 / cols as f32);
            let bj = b.lerp(c, i as f32 / cols as f32);
            let rows = cols - i;
            let row = (0..=rows)
                .map(|j| {
                    let pos = if rows == 0 {
                        aj
                    } else {
                        aj.lerp(bj, j as f32 / rows as f32)
                    };
                    push_shared_vtx(&mut builder, pos.normalize() * radius)
                })
                .collect();
            v.push(row);
        }
        for i in 0..cols {
            for j in 0..(2 * (cols - i) - 1) {
                let k = j / 2;
                let vtx = if j % 2 == 0 {
                    [v[i][k + 1], v[i + 1][k], v[i][k]]
                } else {
                    [v[i][k + 1], v[i + 1][k + 1], v[i + 1][k]]
                };
                builder.push_face(Face::new(vtx, smoothing));
            }
        }
    }
    builder.build()
}

/// Build a box mesh
fn build_cuboid(size: Vec3) -> Mesh {
    let mut builder = Mesh::builder();
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x, y, z) * size;
    builder.push_vtx(corner(-0.5, -0.5, 0.5)); // 0 left bottom front
    builder.push_vtx(corner(-0.5, 0.5, 0.5)); // 1 left top front
    builder.push_vtx(corner(0.5, -0.5, 0.5)); // 2 right bottom front
    builder.push_vtx(corner(0.5, 0.5, 0.5)); // 3 right top front
    builder.push_vtx(corner(-0.5, -0.5, -0.5)); // 4 left bottom back
    builder.push_vtx(corner(-0.5, 0.5, -0.5)); // 5 left top back
    builder.push_vtx(corner(0.5, -0.5, -0.5)); // 6 right bottom back
    builder.push_vtx(corner(0.5, 0.5, -0.5)); // 7 right top back

    // front
    builder.push_face(Face::flat([0, 3, 1]));
    builder.push_face(Face::flat([0, 2, 3]));
    // right
    builder.push_face(Face::flat([2, 7, 3]));
    builder.push_face(Face::flat([2, 6, 7]));
    // back
    builder.push_face(Face::flat([7, 6, 5]));
    builder.push_face(Face::flat([5, 6, 4]));
    // left
    builder.push_face(Face::flat([1, 5, 4]));
    builder.push_face(Face::flat([1, 4, 0]));
    // top
    builder.push_face(Face::flat([3, 5, 1]));
    builder.push_face(Face::flat([3, 7, 5]));
    // bottom
    builder.push_face(Face::flat([2, 0, 4]));
    builder.push_face(Face::flat([2, 4, 6]));
    builder.build()
}

/// Build a plane mesh
fn build_plane(width: f32, height: f32) -> Mesh {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let mut builder = Mesh::builder();
    builder.push_vtx(Vec3::new(-hw, -hh, 0.0));
    builder.push_vtx(Vec3::new(hw, -hh, 0.0));
    builder.push_vtx(Vec3::new(hw, hh, 0.0));
    builder.push_vtx(Vec3::new(-hw, hh, 0.0));
    builder.push_face(Face::flat([0, 1, 2]));
    builder.push_face(Face::flat([0, 2, 3]));
    builder.build()
}

/// Push one grid line as a thin quad facing +Y
fn push_line(builder: &mut MeshBuilder, from: Vec3, to: Vec3, width: f32) {
    let side = Vec3::Y.cross(to - from).normalize() * width;
    let v0 = builder.push_vtx(from - side);
    let v1 = builder.push_vtx(from + side);
    let v2 = builder.push_vtx(to + side);
    let v3 = builder.push_vtx(to - side);
    builder.push_face(Face::flat([v0, v3, v2]));
    builder.push_face(Face::flat([v0, v2, v1]));
}

/// Build a grid mesh
fn build_grid(size: f32, divisions: u32) -> Mesh {
    let divisions = divisions.max(1);
    let half = size * 0.5;
    let step = size / divisions as f32;
    let width = size / 400.0;
    let mut builder = Mesh::builder();
    for k in 0..=divisions {
        let d = -half + k as f32 * step;
        push_line(
            &mut builder,
            Vec3::new(d, 0.0, -half),
            Vec3::new(d, 0.0, half),
            width,
        );
        push_line(
            &mut builder,
            Vec3::new(-half, 0.0, d),
            Vec3::new(half, 0.0, d),
            width,
        );
    }
    builder.build()
}

#[cfg(test)]
mod test {
    use super::*;

    /// Check that every face normal points away from the origin
    fn assert_outward(mesh: &Mesh) {
        let pos = mesh.positions();
        for tri in mesh.indices().chunks(3) {
            let (p0, p1, p2) =
                (pos[tri[0].0 as usize], pos[tri[1].0 as usize], pos[tri[2].0 as usize]);
            let norm = (p0 - p1).cross(p0 - p2);
            let center = (p0 + p1 + p2) / 3.0;
            assert!(norm.dot(center) > 0.0, "inward face at {center}");
        }
    }

    #[test]
    fn cylinder_params() {
        let shape = Shape::with_params(ShapeKind::Cylinder, &[2.0, 3.0, 4.0, 10.0]);
        assert_eq!(
            shape,
            Shape::Cylinder {
                radius_top: 2.0,
                radius_bottom: 3.0,
                height: 4.0,
                radial_segments: 10,
            }
        );
        assert_eq!(shape.params(), vec![2.0, 3.0, 4.0, 10.0]);
    }

    #[test]
    fn cylinder_mesh() {
        let mesh = build_cylinder(2.0, 2.0, 4.0, 10);
        // sides + two caps
        assert_eq!(mesh.triangles(), 10 * 2 + 10 * 2);
        assert_eq!(mesh.pos_max().y, 2.0);
        assert_eq!(mesh.pos_min().y, -2.0);
        assert_outward(&mesh);
    }

    #[test]
    fn cone_mesh() {
        let mesh = build_cylinder(0.0, 1.0, 2.0, 8);
        assert_eq!(mesh.triangles(), 8 + 8);
        assert!(mesh.normals().iter().all(|n| n.is_finite()));
    }

    #[test]
    fn sphere_mesh() {
        let mesh = build_sphere(2.0, 8, 6);
        assert_eq!(mesh.positions().len(), 2 + 8 * 5);
        assert_eq!(mesh.triangles(), 8 * 2 + 8 * 4 * 2);
        for pos in mesh.positions() {
            assert!((pos.length() - 2.0).abs() < 1e-5);
        }
        assert_outward(&mesh);
    }

    #[test]
    fn too_few_segments() {
        let sphere = |h| Shape::Sphere {
            radius: 1.0,
            width_segments: 8,
            height_segments: h,
        };
        for h in [0, 1] {
            let mesh = sphere(h).mesh();
            // clamped to two rows: north and south fans only
            assert_eq!(mesh.positions().len(), 2 + 8);
            assert_eq!(mesh.triangles(), 8 * 2);
            assert_outward(&mesh);
        }
        for radial in [0, 1, 2] {
            let shape = Shape::Cylinder {
                radius_top: 1.0,
                radius_bottom: 1.0,
                height: 2.0,
                radial_segments: radial,
            };
            let mesh = shape.mesh();
            assert_eq!(mesh.triangles(), 3 * 2 + 3 * 2);
            assert!(mesh.normals().iter().all(|n| n.is_finite()));
            assert_outward(&mesh);
        }
        let torus = Shape::Torus {
            radius: 2.0,
            tube: 0.5,
            radial_segments: 0,
            tubular_segments: 1,
        };
        assert_eq!(torus.mesh().positions().len(), 9);
        let grid = Shape::Grid {
            size: 4.0,
            divisions: 0,
        };
        assert_eq!(grid.mesh().triangles(), 2 * 2 * 2);
    }

    #[test]
    fn many_segments() {
        let mesh = build_cylinder(1.0, 1.0, 2.0, 40_000);
        assert!(mesh.has_wide_indices());
        assert_eq!(mesh.triangles(), 40_000 * 4);
        let last = mesh.indices().iter().map(|v| v.0).max().unwrap();
        assert_eq!(last as usize, mesh.positions().len() - 1);
    }

    #[test]
    fn torus_mesh() {
        let mesh = build_torus(10.0, 2.8, 16, 100);
        assert_eq!(mesh.positions().len(), 1600);
        assert_eq!(mesh.triangles(), 3200);
        assert!((mesh.pos_max().x - 12.8).abs() < 1e-4);
        assert!((mesh.pos_max().z - 2.8).abs() < 1e-2);
    }

    #[test]
    fn tetrahedron_flat() {
        let mesh = build_tetrahedron(1.0, 0);
        assert_eq!(mesh.triangles(), 4);
        assert_eq!(mesh.positions().len(), 12);
        assert_outward(&mesh);
    }

    #[test]
    fn tetrahedron_detail() {
        let mesh = build_tetrahedron(10.0, 6);
        assert_eq!(mesh.triangles(), 4 * 7 * 7);
        for pos in mesh.positions() {
            assert!((pos.length() - 10.0).abs() < 1e-3);
        }
        assert_outward(&mesh);
    }

    #[test]
    fn cuboid_mesh() {
        let mesh = build_cuboid(Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(mesh.triangles(), 12);
        assert_eq!(mesh.pos_max(), Vec3::new(1.0, 2.0, 3.0));
        assert_outward(&mesh);
    }

    #[test]
    fn plane_mesh() {
        let mesh = build_plane(10.0, 10.0);
        assert_eq!(mesh.triangles(), 2);
        assert!(mesh.normals().iter().all(|n| n.abs_diff_eq(Vec3::Z, 1e-6)));
    }

    #[test]
    fn grid_mesh() {
        let mesh = build_grid(10.0, 10);
        assert_eq!(mesh.triangles(), 11 * 2 * 2);
        assert!(mesh.normals().iter().all(|n| n.abs_diff_eq(Vec3::Y, 1e-6)));
    }

    #[test]
    fn codes() {
        assert_eq!(ShapeKind::from_code(1), Some(ShapeKind::Cylinder));
        assert_eq!(ShapeKind::from_code(2), Some(ShapeKind::Tetrahedron));
        assert_eq!(ShapeKind::from_code(3), Some(ShapeKind::Sphere));
        assert_eq!(ShapeKind::from_code(4), Some(ShapeKind::Torus));
        assert_eq!(ShapeKind::from_code(5), None);
        assert_eq!(ShapeKind::from_code(0), None);
    }
}
