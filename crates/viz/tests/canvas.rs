//! Whole-scene rendering into the software canvas.

use aquarium_core::{AquariumConfig, AquariumScene, ImageCatalog};
use aquarium_frame::Rgba;
use aquarium_viz::{AquariumRun, PixelCanvas, SpriteLibrary, SpritePixels};
use bevy::prelude::Handle;

fn row_mean(canvas: &PixelCanvas, y: u32) -> Rgba {
    let mut sum = Rgba::TRANSPARENT;
    for x in 0..canvas.width() {
        let px = canvas.pixel(x, y).unwrap();
        sum.r += px.r;
        sum.g += px.g;
        sum.b += px.b;
    }
    let n = canvas.width() as f32;
    Rgba::new(sum.r / n, sum.g / n, sum.b / n, 1.0)
}

fn is_magenta(px: Rgba) -> bool {
    px.r > 0.9 && px.g < 0.1 && px.b > 0.9
}

#[test]
fn test_scene_paints_water_over_sand() {
    let mut config = AquariumConfig::default();
    config.scene.width = 320;
    config.scene.height = 120;
    config.scene.count = 0;
    let catalog = ImageCatalog::placeholder(&config.assets);
    let mut scene = AquariumScene::new(config, catalog);
    let mut canvas = PixelCanvas::new(320, 120).unwrap();

    for _ in 0..3 {
        canvas.clear(Rgba::BLACK);
        scene.render_frame(&mut canvas);
    }

    let top = row_mean(&canvas, 0);
    let bottom = row_mean(&canvas, 119);
    assert!(top.b > top.r, "water should be blue, got {:?}", top);
    assert!(bottom.r > bottom.b, "sand should be warm, got {:?}", bottom);
}

#[test]
fn test_loaded_sprites_reach_the_canvas() {
    let mut config = AquariumConfig::default();
    config.scene.width = 320;
    config.scene.height = 120;
    config.scene.count = 12;

    let mut library = SpriteLibrary::default();
    for name in config.assets.all_names() {
        let magenta = [255u8, 0, 255, 255].repeat(16 * 10);
        library.insert(name, SpritePixels::from_rgba8(16, 10, magenta).unwrap());
    }

    let mut run = AquariumRun::new(config, &library, Handle::default()).unwrap();
    assert_eq!(run.canvas().image_count(), library.len());
    assert!(run.advance());

    let canvas = run.canvas();
    let magenta = (0..canvas.height())
        .flat_map(|y| (0..canvas.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| canvas.pixel(x, y).map(is_magenta).unwrap_or(false))
        .count();
    assert!(magenta > 0);
}

#[test]
fn test_rgba8_export_is_opaque() {
    let config = AquariumConfig::default();
    let (width, height) = (config.scene.width, config.scene.height);
    let catalog = ImageCatalog::placeholder(&config.assets);
    let mut scene = AquariumScene::new(config, catalog);
    let mut canvas = PixelCanvas::new(width, height).unwrap();
    canvas.clear(Rgba::BLACK);
    scene.render_frame(&mut canvas);

    let bytes = canvas.to_rgba8();
    assert_eq!(bytes.len(), (width * height * 4) as usize);
    assert!(bytes.chunks_exact(4).all(|px| px[3] == 255));
}
