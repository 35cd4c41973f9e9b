// config.rs    Drawing configuration
//
// Copyright (c) 2024  Douglas Lau
//
use crate::error::{Error, Result};
use serde_derive::{Deserialize, Serialize};
use std::str::FromStr;

/// Demo revision
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Revision {
    /// Protagonist only
    #[default]
    First,

    /// Protagonist with box-pile building
    Second,
}

impl FromStr for Revision {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self> {
        match code {
            "1" | "first" => Ok(Revision::First),
            "2" | "second" => Ok(Revision::Second),
            _ => Err(Error::InvalidRevision(code.into())),
        }
    }
}

/// Definition of a drawing configuration (as read from a file)
///
/// Every value is optional; missing values take defaults when converted
/// to a [DrawingCfg].
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CfgDef {
    /// Mount element identifier
    mount_id: Option<String>,

    /// Demo revision (`first` / `second`)
    revision: Option<String>,

    /// Figure scale factor
    scale: Option<f32>,

    /// Height of ground plane
    ground_y: Option<f32>,

    /// Size of ground plane and grid
    ground_size: Option<f32>,

    /// Grid divisions
    grid_divisions: Option<u32>,

    /// Mouse offset to rotation factor
    mouse_factor: Option<f32>,

    /// Spin rate (radians / second)
    spin_rate: Option<f32>,

    /// Smoothing factor toward mouse target
    smoothing: Option<f32>,

    /// Include building
    building: Option<bool>,
}

/// Drawing configuration
#[derive(Clone, Debug)]
pub struct DrawingCfg {
    /// Mount element identifier
    pub mount_id: String,

    /// Demo revision
    pub revision: Revision,

    /// Figure scale factor
    pub scale: f32,

    /// Height of ground plane
    pub ground_y: f32,

    /// Size of ground plane and grid
    pub ground_size: f32,

    /// Grid divisions
    pub grid_divisions: u32,

    /// Mouse offset to rotation factor
    pub mouse_factor: f32,

    /// Spin rate (radians / second)
    pub spin_rate: f32,

    /// Smoothing factor toward mouse target (0 to 1)
    pub smoothing: f32,

    /// Include building (default depends on revision)
    pub building: Option<bool>,
}

impl Default for DrawingCfg {
    fn default() -> Self {
        DrawingCfg {
            mount_id: "drawing".into(),
            revision: Revision::default(),
            scale: 0.08,
            ground_y: -2.3,
            ground_size: 10.0,
            grid_divisions: 10,
            mouse_factor: 0.005,
            spin_rate: 0.5,
            smoothing: 0.5,
            building: None,
        }
    }
}

impl TryFrom<&CfgDef> for DrawingCfg {
    type Error = Error;

    fn try_from(def: &CfgDef) -> Result<Self> {
        let dflt = DrawingCfg::default();
        let revision = match &def.revision {
            Some(code) => code.parse()?,
            None => dflt.revision,
        };
        Ok(DrawingCfg {
            mount_id: def.mount_id.clone().unwrap_or(dflt.mount_id),
            revision,
            scale: def.scale.unwrap_or(dflt.scale),
            ground_y: def.ground_y.unwrap_or(dflt.ground_y),
            ground_size: def.ground_size.unwrap_or(dflt.ground_size),
            grid_divisions: def.grid_divisions.unwrap_or(dflt.grid_divisions),
            mouse_factor: def.mouse_factor.unwrap_or(dflt.mouse_factor),
            spin_rate: def.spin_rate.unwrap_or(dflt.spin_rate),
            smoothing: def.smoothing.unwrap_or(dflt.smoothing),
            building: def.building.or(dflt.building),
        })
    }
}

impl DrawingCfg {
    /// Check whether the building should be drawn
    pub fn has_building(&self) -> bool {
        self.building.unwrap_or(self.revision == Revision::Second)
    }
}
