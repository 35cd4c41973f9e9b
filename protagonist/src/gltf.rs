// gltf.rs      glTF module
//
// Copyright (c) 2022-2024  Douglas Lau
//
use crate::error::Result;
use crate::material::{Material, Palette};
use crate::mesh::Mesh;
use crate::scene::{Content, NodeId, Primitive, Scene};
use serde_json::{json, Map, Value};
use serde_repr::Serialize_repr;
use std::collections::HashMap;
use std::io::{self, ErrorKind, Write};
use std::mem::size_of;

/// Component types for glTF accessor
#[derive(Serialize_repr)]
#[repr(u32)]
enum ComponentType {
    U16 = 5123,
    U32 = 5125,
    F32 = 5126,
}

/// Target for glTF buffer view
#[derive(Serialize_repr)]
#[repr(u32)]
enum Target {
    ArrayBuffer = 34962,
    ElementArrayBuffer = 34963,
}

/// Builder for glTF
#[derive(Default)]
struct Builder {
    bin: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
    meshes: Vec<Value>,
    nodes: Vec<Value>,
    /// Primitives already added, with mesh index
    prims: Vec<(Primitive, usize)>,
    /// Scene node to glTF node index
    node_map: HashMap<NodeId, usize>,
}

/// GLB writer
struct Glb<W: Write> {
    writer: W,
}

/// Transmute a slice of `T` to a slice of `u8`
fn as_u8_slice<T: Sized>(p: &[T]) -> &[u8] {
    let (_head, body, _tail) = unsafe { p.align_to::<u8>() };
    body
}

/// Convert a length to `u32`
fn len_u32(len: usize) -> io::Result<u32> {
    len.try_into()
        .map_err(|_| io::Error::new(ErrorKind::InvalidData, "GLB too large"))
}

/// Make material JSON
fn material_json(mat: &Material) -> Value {
    let [r, g, b] = mat.linear_rgb();
    let mut extras = Map::new();
    if mat.wireframe {
        extras.insert("wireframe".into(), Value::Bool(true));
    }
    if let Some(map) = mat.normal_map {
        extras.insert("normalMap".into(), Value::from(map));
    }
    let mut value = json!({
        "pbrMetallicRoughness": {
            "baseColorFactor": [r, g, b, 1.0],
            "metallicFactor": mat.metalness,
            "roughnessFactor": mat.pbr_roughness(),
        },
        "doubleSided": mat.wireframe,
    });
    if !extras.is_empty() {
        value["extras"] = Value::Object(extras);
    }
    value
}

impl Builder {
    /// Get mesh index for a primitive, adding it if needed
    fn mesh_index(&mut self, prim: &Primitive) -> usize {
        if let Some((_, idx)) = self.prims.iter().find(|(p, _)| p == prim) {
            return *idx;
        }
        let idx = self.meshes.len();
        self.add_mesh(&prim.shape.mesh(), prim.material.0);
        self.prims.push((*prim, idx));
        idx
    }

    /// Add a mesh
    fn add_mesh(&mut self, mesh: &Mesh, material: usize) {
        let count = mesh.positions().len();
        // indices
        let idx_view = self.views.len();
        let (ctype, v) = match mesh.indices_u16() {
            Some(indices) => {
                (ComponentType::U16, self.push_index_view(&indices[..]))
            }
            None => (ComponentType::U32, self.push_index_view(mesh.indices())),
        };
        self.accessors.push(json!({
            "bufferView": idx_view,
            "componentType": ctype,
            "type": "SCALAR",
            "count": mesh.indices().len(),
        }));
        self.views.push(v);
        // positions
        let pos_view = self.views.len();
        self.accessors.push(json!({
            "bufferView": pos_view,
            "componentType": ComponentType::F32,
            "type": "VEC3",
            "count": count,
            "min": mesh.pos_min(),
            "max": mesh.pos_max(),
        }));
        let v = self.push_array_view(mesh.positions());
        self.views.push(v);
        // normals
        let norm_view = self.views.len();
        self.accessors.push(json!({
            "bufferView": norm_view,
            "componentType": ComponentType::F32,
            "type": "VEC3",
            "count": count,
        }));
        let v = self.push_array_view(mesh.normals());
        self.views.push(v);
        self.meshes.push(json!({
            "primitives": [{
                "attributes": {
                    "POSITION": pos_view,
                    "NORMAL": norm_view,
                },
                "indices": idx_view,
                "material": material,
            }],
        }));
    }

    /// Push an index view
    fn push_index_view<V>(&mut self, buf: &[V]) -> Value {
        self.pad_bin();
        let byte_offset = self.bin.len();
        let bytes = as_u8_slice(buf);
        self.bin.extend_from_slice(bytes);
        // no byteStride for index view
        json!({
            "buffer": 0,
            "byteLength": bytes.len(),
            "byteOffset": byte_offset,
            "target": Target::ElementArrayBuffer,
        })
    }

    /// Push an array view
    fn push_array_view<V>(&mut self, buf: &[V]) -> Value {
        self.pad_bin();
        let byte_offset = self.bin.len();
        let bytes = as_u8_slice(buf);
        self.bin.extend_from_slice(bytes);
        json!({
            "buffer": 0,
            "byteLength": bytes.len(),
            "byteOffset": byte_offset,
            "byteStride": size_of::<V>(),
            "target": Target::ArrayBuffer,
        })
    }

    /// Pad binary buffer to 4-byte alignment
    fn pad_bin(&mut self) {
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }
    }

    /// Add nodes for a subtree (pre-order)
    fn add_subtree(&mut self, scene: &Scene, root: NodeId) {
        let order: Vec<NodeId> =
            std::iter::once(root).chain(scene.descendants(root)).collect();
        for id in &order {
            self.node_map.insert(*id, self.nodes.len());
            self.nodes.push(Value::Null);
        }
        for id in order {
            let node = scene.node(id);
            let xform = &node.xform;
            let mut value = json!({
                "translation": xform.translation.to_array(),
                "rotation": xform.rotation.to_array(),
                "scale": xform.scale.to_array(),
            });
            if let Some(name) = node.name() {
                value["name"] = Value::from(name);
            }
            if let Content::Mesh(prim) = node.content() {
                value["mesh"] = Value::from(self.mesh_index(prim));
            }
            let children: Vec<usize> = scene
                .children(id)
                .iter()
                .filter_map(|c| self.node_map.get(c).copied())
                .collect();
            if !children.is_empty() {
                value["children"] = Value::from(children);
            }
            self.nodes[self.node_map[&id]] = value;
        }
    }

    /// Get root JSON of glTF
    fn json(&self, scene: &Scene) -> Value {
        let roots: Vec<usize> = scene
            .roots()
            .iter()
            .filter_map(|r| self.node_map.get(r).copied())
            .collect();
        let materials: Vec<Value> =
            Palette::global().iter().map(material_json).collect();
        json!({
            "asset": {
                "version": "2.0",
                "generator": "protagonist",
            },
            "buffers": [{
                "byteLength": self.bin.len(),
            }],
            "bufferViews": self.views,
            "accessors": self.accessors,
            "materials": materials,
            "meshes": self.meshes,
            "nodes": self.nodes,
            "scenes": [{
                "nodes": roots,
            }],
            "scene": 0,
        })
    }

    /// Get binary buffer
    fn bin(&self) -> &[u8] {
        &self.bin
    }
}

/// Export a scene to a writer as a GLB
///
/// Only nodes reachable from the scene roots are exported.
pub fn export<W: Write>(writer: W, scene: &Scene) -> Result<()> {
    let mut builder = Builder::default();
    for root in scene.roots() {
        builder.add_subtree(scene, *root);
    }
    builder.pad_bin();
    log::debug!(
        "glTF: {} nodes, {} meshes, {} bytes",
        builder.nodes.len(),
        builder.meshes.len(),
        builder.bin.len()
    );
    let bin = builder.bin();
    let mut root_json = builder.json(scene).to_string();
    while root_json.len() % 4 != 0 {
        root_json.push(' ');
    }
    let mut glb = Glb::new(writer);
    glb.write_header(2, len_u32(root_json.len() + bin.len())?)?;
    glb.write_json(&root_json)?;
    glb.write_bin(bin)?;
    Ok(())
}

impl<W: Write> Glb<W> {
    /// Create new GLB writer
    fn new(writer: W) -> Self {
        Glb { writer }
    }

    /// Write GLB header
    fn write_header(&mut self, chunks: u32, len: u32) -> io::Result<()> {
        let total_len = 12 + chunks * 8 + len;
        self.writer.write_all(b"glTF")?;
        self.writer.write_all(&2u32.to_le_bytes())?;
        self.writer.write_all(&total_len.to_le_bytes())?;
        Ok(())
    }

    /// Write one chunk
    fn write_chunk(&mut self, ctype: &[u8], data: &[u8]) -> io::Result<()> {
        let len = len_u32(data.len())?;
        self.writer.write_all(&len.to_le_bytes())?;
        self.writer.write_all(ctype)?;
        self.writer.write_all(data)?;
        Ok(())
    }

    /// Write a JSON chunk
    fn write_json(&mut self, json: &str) -> io::Result<()> {
        self.write_chunk(b"JSON", json.as_bytes())
    }

    /// Write a BIN chunk
    fn write_bin(&mut self, bin: &[u8]) -> io::Result<()> {
        self.write_chunk(b"BIN\0", bin)
    }
}
