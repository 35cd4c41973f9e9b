// spin example
use anyhow::Result;
use protagonist::{
    Drawing, DrawingCfg, FrameHost, MountHost, Revision, Scene, Viewport,
};
use std::fs::File;

/// Headless page with one canvas
struct Page {
    pending: bool,
}

impl MountHost for Page {
    fn lookup(&self, id: &str) -> Option<Viewport> {
        (id == "drawing").then_some(Viewport::new(640.0, 480.0))
    }
}

impl FrameHost for Page {
    fn request_frame(&mut self) {
        self.pending = true;
    }

    fn render(&mut self, _scene: &Scene) {}
}

fn main() -> Result<()> {
    let mut page = Page { pending: false };
    let cfg = DrawingCfg {
        revision: Revision::Second,
        ..Default::default()
    };
    let Some(mut drawing) = Drawing::mount(&mut page, cfg) else {
        anyhow::bail!("no canvas");
    };
    drawing.pointer_moved(480.0, 240.0);
    let mut frame = 0;
    while page.pending && frame < 60 {
        page.pending = false;
        frame += 1;
        drawing.tick(frame as f32 / 60.0, &mut page);
    }
    let root = drawing.scene().node(drawing.object_root());
    println!("after {frame} frames: {:?}", root.xform.rotation);
    let file = File::create("spin.glb")?;
    drawing.write_gltf(file)?;
    Ok(())
}
