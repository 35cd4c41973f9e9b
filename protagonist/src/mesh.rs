// mesh.rs      Mesh module
//
// Copyright (c) 2022-2024  Douglas Lau
//
use glam::Vec3;

/// Vertex index
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vertex(pub u32);

impl From<usize> for Vertex {
    fn from(v: usize) -> Self {
        // positions alone would exhaust memory before u32 overflows
        debug_assert!(v <= u32::MAX as usize);
        Self(v as u32)
    }
}

/// Vertex normal smoothing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Smoothing {
    /// Face normal only (vertices are not shared)
    #[default]
    Flat,

    /// Normals averaged with adjacent smooth faces
    Smooth,
}

/// Triangle face
///
/// Vertices are counter-clockwise when viewed from the front:
///
/// ```text
/// v0______v2
///   \    /
///    \  /
///     \/
///     v1
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Face {
    /// Vertex positions
    vtx: [usize; 3],

    /// Vertex normal smoothing
    smoothing: Smoothing,
}

/// Mesh builder
#[derive(Default)]
pub struct MeshBuilder {
    /// Vertex positions
    pos: Vec<Vec3>,

    /// Triangle faces
    faces: Vec<Face>,
}

/// 3D Mesh
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions
    pos: Vec<Vec3>,

    /// Vertex normals
    norm: Vec<Vec3>,

    /// Vertex indices
    indices: Vec<Vertex>,
}

impl Face {
    /// Create a new face
    pub fn new(vtx: [usize; 3], smoothing: Smoothing) -> Self {
        debug_assert_ne!(vtx[0], vtx[1]);
        debug_assert_ne!(vtx[1], vtx[2]);
        debug_assert_ne!(vtx[2], vtx[0]);
        Self { vtx, smoothing }
    }

    /// Create a new flat face
    pub fn flat(vtx: [usize; 3]) -> Self {
        Face::new(vtx, Smoothing::Flat)
    }

    /// Create a new smooth face
    pub fn smooth(vtx: [usize; 3]) -> Self {
        Face::new(vtx, Smoothing::Smooth)
    }

    /// Check if the face is flat
    fn is_flat(&self) -> bool {
        self.smoothing == Smoothing::Flat
    }
}

impl MeshBuilder {
    /// Create a mesh builder with capacity for N faces
    fn with_capacity(n_faces: usize) -> Self {
        let pos = Vec::with_capacity(n_faces * 3);
        let faces = Vec::with_capacity(n_faces);
        MeshBuilder { pos, faces }
    }

    /// Get the count of vertices
    pub fn vertices(&self) -> usize {
        self.pos.len()
    }

    /// Get a vertex
    pub fn vertex(&self, idx: usize) -> Vec3 {
        self.pos[idx]
    }

    /// Push a vertex position
    pub fn push_vtx(&mut self, pos: Vec3) -> usize {
        let idx = self.pos.len();
        self.pos.push(pos);
        idx
    }

    /// Push a face
    pub fn push_face(&mut self, face: Face) {
        let idx = self.pos.len();
        if face.vtx[0] >= idx || face.vtx[1] >= idx || face.vtx[2] >= idx {
            panic!("Invalid vertex");
        }
        self.faces.push(face);
    }

    /// Build the mesh
    pub fn build(self) -> Mesh {
        Mesh::new(self.split_flat_faces())
    }

    /// Split vertices so that flat faces do not share any
    ///
    /// Smooth faces keep shared vertices; every flat face corner which is
    /// already used by another face gets its own copy.
    fn split_flat_faces(mut self) -> Self {
        let mut used = vec![false; self.pos.len()];
        for face in self.faces.iter().filter(|f| !f.is_flat()) {
            for vid in face.vtx {
                used[vid] = true;
            }
        }
        for f in 0..self.faces.len() {
            if !self.faces[f].is_flat() {
                continue;
            }
            for c in 0..3 {
                let vid = self.faces[f].vtx[c];
                if used[vid] {
                    let pos = self.pos[vid];
                    self.faces[f].vtx[c] = self.push_vtx(pos);
                } else {
                    used[vid] = true;
                }
            }
        }
        self
    }

    /// Calculate normals for all vertices
    fn build_normals(&self) -> Vec<Vec3> {
        let vertices = self.pos.len();
        let mut norm = vec![Vec3::default(); vertices];
        for face in &self.faces {
            let vtx = [face.vtx[0], face.vtx[1], face.vtx[2]];
            let pos = [self.pos[vtx[0]], self.pos[vtx[1]], self.pos[vtx[2]]];
            let trin = (pos[0] - pos[1]).cross(pos[0] - pos[2]);
            if trin.length_squared() == 0.0 {
                // degenerate face
                continue;
            }
            let trin = trin.normalize();
            let a0 = (pos[1] - pos[0]).angle_between(pos[2] - pos[0]);
            norm[vtx[0]] += trin * a0;
            let a1 = (pos[2] - pos[1]).angle_between(pos[0] - pos[1]);
            norm[vtx[1]] += trin * a1;
            let a2 = (pos[0] - pos[2]).angle_between(pos[1] - pos[2]);
            norm[vtx[2]] += trin * a2;
        }
        norm.iter().map(|n| n.normalize_or_zero()).collect()
    }

    /// Build `Vec` of indices for all faces
    fn build_indices(&self) -> Vec<Vertex> {
        let mut indices = Vec::with_capacity(self.faces.len() * 3);
        for face in &self.faces {
            indices.push(face.vtx[0].into());
            indices.push(face.vtx[1].into());
            indices.push(face.vtx[2].into());
        }
        indices
    }
}

impl Mesh {
    /// Create a new mesh builder
    pub fn builder() -> MeshBuilder {
        MeshBuilder::with_capacity(256)
    }

    /// Create a new mesh
    fn new(builder: MeshBuilder) -> Self {
        let norm = builder.build_normals();
        let indices = builder.build_indices();
        let pos = builder.pos;
        Mesh { pos, norm, indices }
    }

    /// Get slice of all vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.pos[..]
    }

    /// Get slice of all vertex normals
    pub fn normals(&self) -> &[Vec3] {
        &self.norm[..]
    }

    /// Get slice of vertex indices for all triangles
    pub fn indices(&self) -> &[Vertex] {
        &self.indices[..]
    }

    /// Check whether indices need 32 bits (more than 65536 vertices)
    pub fn has_wide_indices(&self) -> bool {
        self.pos.len() > usize::from(u16::MAX) + 1
    }

    /// Get vertex indices narrowed to `u16`
    ///
    /// Returns `None` if any index does not fit.
    pub fn indices_u16(&self) -> Option<Vec<u16>> {
        self.indices
            .iter()
            .map(|v| u16::try_from(v.0).ok())
            .collect()
    }

    /// Get the count of triangles
    pub fn triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get minimum position
    pub fn pos_min(&self) -> Vec3 {
        self.positions()
            .iter()
            .copied()
            .reduce(|min, v| v.min(min))
            .unwrap_or_default()
    }

    /// Get maximum position
    pub fn pos_max(&self) -> Vec3 {
        self.positions()
            .iter()
            .copied()
            .reduce(|max, v| v.max(max))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn quad(smoothing: Smoothing) -> Mesh {
        let mut builder = Mesh::builder();
        builder.push_vtx(Vec3::new(0.0, 0.0, 0.0));
        builder.push_vtx(Vec3::new(1.0, 0.0, 0.0));
        builder.push_vtx(Vec3::new(1.0, 1.0, 0.0));
        builder.push_vtx(Vec3::new(0.0, 1.0, 1.0));
        builder.push_face(Face::new([0, 1, 2], smoothing));
        builder.push_face(Face::new([0, 2, 3], smoothing));
        builder.build()
    }

    #[test]
    fn flat_faces_split() {
        let mesh = quad(Smoothing::Flat);
        assert_eq!(mesh.positions().len(), 6);
        assert_eq!(mesh.triangles(), 2);
        assert!(mesh.normals()[0].abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn smooth_faces_shared() {
        let mesh = quad(Smoothing::Smooth);
        assert_eq!(mesh.positions().len(), 4);
        // shared vertex averages both face normals
        let n = mesh.normals()[0];
        assert!(n.z > 0.0 && n.x > 0.0 && n.y < 0.0);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn many_vertices() {
        let mut builder = Mesh::builder();
        for i in 0..70_000 {
            builder.push_vtx(Vec3::new(i as f32, 0.0, 0.0));
        }
        builder.push_face(Face::smooth([0, 1, 69_999]));
        let mesh = builder.build();
        assert!(mesh.has_wide_indices());
        assert_eq!(mesh.indices()[2], Vertex(69_999));
        assert_eq!(mesh.indices_u16(), None);
        let narrow = quad(Smoothing::Smooth);
        assert!(!narrow.has_wide_indices());
        assert_eq!(narrow.indices_u16(), Some(vec![0, 1, 2, 0, 2, 3]));
    }

    #[test]
    fn bounds() {
        let mesh = quad(Smoothing::Flat);
        assert_eq!(mesh.pos_min(), Vec3::ZERO);
        assert_eq!(mesh.pos_max(), Vec3::new(1.0, 1.0, 1.0));
    }
}
