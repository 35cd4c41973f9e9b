// mesh.rs      Bevy mesh conversion
//
// Copyright (c) 2024  Douglas Lau
//
use bevy::render::mesh::{Indices, Mesh};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::PrimitiveTopology;

/// Build a bevy Mesh (TriangleList) from a protagonist mesh
pub fn build_mesh(mesh: &protagonist::Mesh) -> Mesh {
    let pos: Vec<[f32; 3]> =
        mesh.positions().iter().map(|p| p.to_array()).collect();
    let norm: Vec<[f32; 3]> =
        mesh.normals().iter().map(|n| n.to_array()).collect();
    let indices = match mesh.indices_u16() {
        Some(indices) => Indices::U16(indices),
        None => Indices::U32(mesh.indices().iter().map(|v| v.0).collect()),
    };
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, pos);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, norm);
    mesh.insert_indices(indices);
    mesh
}
