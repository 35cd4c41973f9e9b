// material.rs  Materials palette
//
// Copyright (c) 2024  Douglas Lau
//
use crate::error::{Error, Result};

/// Index into the materials palette
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MaterialId(pub usize);

/// Shading model
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Shading {
    /// Specular highlights (shininess)
    Phong,

    /// Physically based (metalness / roughness)
    Standard,
}

/// Shading parameter set
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Shading model
    pub shading: Shading,

    /// Base color (0xRRGGBB, sRGB)
    pub color: u32,

    /// Phong shininess
    pub shininess: f32,

    /// Phong reflectivity
    pub reflectivity: f32,

    /// Standard metalness
    pub metalness: f32,

    /// Standard roughness
    pub roughness: f32,

    /// Flat shading
    pub flat_shading: bool,

    /// Render as wireframe
    pub wireframe: bool,

    /// Normal map texture file
    pub normal_map: Option<&'static str>,
}

impl Material {
    /// Create a Phong material
    pub const fn phong(color: u32) -> Self {
        Material {
            shading: Shading::Phong,
            color,
            shininess: 30.0,
            reflectivity: 1.0,
            metalness: 0.0,
            roughness: 1.0,
            flat_shading: false,
            wireframe: false,
            normal_map: None,
        }
    }

    /// Create a standard (PBR) material
    pub const fn standard(color: u32) -> Self {
        Material {
            shading: Shading::Standard,
            ..Material::phong(color)
        }
    }

    /// Get color as sRGB components
    pub fn srgb(&self) -> [f32; 3] {
        let [_, r, g, b] = self.color.to_be_bytes();
        [r, g, b].map(|c| f32::from(c) / 255.0)
    }

    /// Get color as linear RGB components
    pub fn linear_rgb(&self) -> [f32; 3] {
        self.srgb().map(|c| {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        })
    }

    /// Get an equivalent PBR roughness
    ///
    /// Phong shininess is converted with the Blinn-Phong / Beckmann
    /// relation `roughness = sqrt(2 / (shininess + 2))`.
    pub fn pbr_roughness(&self) -> f32 {
        match self.shading {
            Shading::Standard => self.roughness,
            Shading::Phong => (2.0 / (self.shininess + 2.0)).sqrt(),
        }
    }
}

/// Fixed palette of materials
pub struct Palette {
    materials: &'static [Material],
}

/// All palette materials
static MATERIALS: [Material; 5] = [
    Material::phong(0xffffff),
    Material::standard(0x000000),
    Material {
        shininess: 75.0,
        reflectivity: 0.7,
        flat_shading: true,
        wireframe: true,
        ..Material::phong(0xffffff)
    },
    Material::phong(0x2b22a4),
    Material {
        metalness: 0.7,
        roughness: 0.2,
        normal_map: Some("normalTexture.jpeg"),
        ..Material::standard(0x2b22a4)
    },
];

/// Process-wide palette
static PALETTE: Palette = Palette {
    materials: &MATERIALS,
};

impl MaterialId {
    /// White (Phong)
    pub const WHITE: Self = MaterialId(0);

    /// Black (standard)
    pub const BLACK: Self = MaterialId(1);

    /// White wireframe
    pub const WIREFRAME: Self = MaterialId(2);

    /// Blue (Phong)
    pub const BLUE: Self = MaterialId(3);

    /// Blue metal with normal map
    pub const METAL: Self = MaterialId(4);
}

impl Palette {
    /// Get the process-wide palette
    pub fn global() -> &'static Palette {
        &PALETTE
    }

    /// Get the number of materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Check if the palette is empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Check whether an index is valid
    pub fn contains(&self, id: MaterialId) -> bool {
        id.0 < self.materials.len()
    }

    /// Get a material
    pub fn get(&self, id: MaterialId) -> Result<&Material> {
        self.materials.get(id.0).ok_or(Error::MaterialIndex(id.0))
    }

    /// Get an iterator of all materials
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }
}
