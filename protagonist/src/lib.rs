// lib.rs      protagonist crate.
//
// Copyright (c) 2022-2024  Douglas Lau
//
mod building;
mod config;
mod drawing;
mod error;
mod figure;
mod frame;
mod gltf;
mod material;
mod mesh;
mod scene;
mod shape;
mod table;
mod xform;

pub use building::Building;
pub use config::{CfgDef, DrawingCfg, Revision};
pub use drawing::{Drawing, MountHost, Viewport};
pub use error::{Error, Result};
pub use figure::{Protagonist, SPOKES, SPOKE_STEP};
pub use frame::{FrameHost, FrameState, FrameUpdater};
pub use material::{Material, MaterialId, Palette, Shading};
pub use mesh::{Face, Mesh, MeshBuilder, Smoothing, Vertex};
pub use scene::{Content, Node, NodeId, Primitive, Scene};
pub use shape::{Shape, ShapeKind};
pub use table::{PrimitiveSpec, Role, Segment, JOINT_OFFSETS, SEGMENTS};
pub use xform::{euler_xyz, Transform};
