mod aabb;
mod bvh;
mod camera;
mod color;
mod geometry;
mod io;
mod material;
mod rendering;
mod scene;

extern crate nalgebra as na;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use log::info;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut scene_path: Option<PathBuf> = None;
    let mut output_path = PathBuf::from("out.ppm");
    let mut use_bvh = false;
    let mut tonemap = false;
    let mut positional = 0;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--bvh" => use_bvh = true,
            "--tonemap" => tonemap = true,
            flag if flag.starts_with("--") => anyhow::bail!("unknown flag: {}", flag),
            _ => {
                match positional {
                    0 => scene_path = Some(PathBuf::from(&arg)),
                    1 => output_path = PathBuf::from(&arg),
                    _ => anyhow::bail!("unexpected argument: {}", arg),
                }
                positional += 1;
            }
        }
    }

    let Some(scene_path) = scene_path else {
        println!("Usage: raytracer <scene.json> [output.(ppm|png)] [--bvh] [--tonemap]");
        return Ok(());
    };

    let renderer = io::load_renderer(&scene_path, use_bvh)
        .with_context(|| format!("failed to load scene {}", scene_path.display()))?;
    info!(
        "loaded scene: {}x{}, {:?} mode, {} bounces, {} shapes, {} lights",
        renderer.camera().width,
        renderer.camera().height,
        renderer.render_mode(),
        renderer.nbounces(),
        renderer.scene().primitives().len(),
        renderer.scene().lights().len(),
    );

    let start = Instant::now();
    let mut pixels = renderer.render_scene();
    let elapsed = start.elapsed();
    println!("Render time: {} ms", elapsed.as_millis());

    if tonemap {
        for row in &mut pixels {
            for pixel in row.iter_mut() {
                *pixel = rendering::tone_map(*pixel);
            }
        }
    }

    match output_path.extension().and_then(|e| e.to_str()) {
        Some("png") => io::write_png(&output_path, &pixels)
            .with_context(|| format!("failed to write {}", output_path.display()))?,
        _ => io::write_ppm(&output_path, &pixels)
            .with_context(|| format!("failed to write {}", output_path.display()))?,
    }
    info!("wrote {}", output_path.display());

    Ok(())
}
