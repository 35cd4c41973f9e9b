// main.rs      protag program
//
// Copyright (c) 2022-2024  Douglas Lau
//
mod canvas;
mod mesh;
mod view;

use crate::canvas::Canvas;
use anyhow::{Context, Result};
use argh::FromArgs;
use protagonist::{CfgDef, Drawing, DrawingCfg, Revision};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Canvas width (pixels)
const CANVAS_WIDTH: f32 = 1280.0;

/// Canvas height (pixels)
const CANVAS_HEIGHT: f32 = 720.0;

/// Command-line arguments
#[derive(FromArgs, PartialEq, Debug)]
struct Args {
    /// view drawing
    #[argh(switch, short = 'v')]
    view: bool,

    /// revision (1: protagonist, 2: with building)
    #[argh(option, short = 'r')]
    revision: Option<Revision>,

    /// configuration file (.muon)
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// output file name (.glb)
    #[argh(option, short = 'o', default = "PathBuf::from(\"protagonist.glb\")")]
    out: PathBuf,
}

/// Main function
fn main() -> Result<()> {
    let args: Args = argh::from_env();
    if !args.view {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("info"),
        )
        .init();
    }
    let cfg = args.drawing_cfg()?;
    let mut canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let Some(drawing) = Drawing::mount(&mut canvas, cfg) else {
        anyhow::bail!("Drawing not mounted");
    };
    write_glb(&drawing, &args.out)?;
    if args.view {
        view::view_drawing(drawing, canvas);
    }
    Ok(())
}

impl Args {
    /// Load drawing configuration
    fn drawing_cfg(&self) -> Result<DrawingCfg> {
        let mut cfg = match &self.config {
            Some(path) => read_cfg(path)?,
            None => DrawingCfg::default(),
        };
        if let Some(revision) = self.revision {
            cfg.revision = revision;
        }
        Ok(cfg)
    }
}

/// Read drawing configuration file
fn read_cfg(path: &Path) -> Result<DrawingCfg> {
    let file = File::open(path)
        .with_context(|| format!("{} not found", path.display()))?;
    let def: CfgDef = muon_rs::from_reader(file)
        .with_context(|| format!("Invalid configuration {}", path.display()))?;
    let cfg = DrawingCfg::try_from(&def)
        .with_context(|| format!("Invalid configuration {}", path.display()))?;
    log::debug!("configuration: {cfg:?}");
    Ok(cfg)
}

/// Write drawing as glTF binary
fn write_glb(drawing: &Drawing, out: &Path) -> Result<()> {
    let file = File::create(out)
        .with_context(|| format!("Cannot create {}", out.display()))?;
    let mut writer = BufWriter::new(file);
    drawing.write_gltf(&mut writer).context("Writing glTF")?;
    writer.flush()?;
    log::info!("wrote {}", out.display());
    Ok(())
}
