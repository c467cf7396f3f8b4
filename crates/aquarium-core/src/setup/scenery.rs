//! Scenery Setup
//!
//! Decor placement, weeds and sand blemishes. Everything here is generated
//! once per run and never changes afterwards.

use aquarium_frame::Point;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::f32::consts::TAU;

use crate::assets::ImageCatalog;
use crate::components::{Decor, DecorKind, DecorLayer, SandBlemish, SceneSize, Weed};
use crate::config::AquariumConfig;

use super::population::lerp;

/// Picks decor x positions with a bounded retry search.
///
/// Each attempt draws a random x and is accepted when it keeps at least
/// `min_gap` from every accepted position. After `max_attempts` misses the
/// last attempt is accepted anyway, so overlap is possible on crowded or
/// narrow scenes.
pub fn spread_positions(
    count: usize,
    width: f32,
    min_gap: f32,
    max_attempts: usize,
    rng: &mut SmallRng,
) -> Vec<f32> {
    let mut accepted: Vec<f32> = Vec::with_capacity(count);
    for _ in 0..count {
        let mut x = rng.gen::<f32>() * width;
        for _ in 1..max_attempts.max(1) {
            if accepted.iter().all(|other| (x - other).abs() > min_gap) {
                break;
            }
            x = rng.gen::<f32>() * width;
        }
        accepted.push(x);
    }
    accepted
}

/// Places the decor pieces. Depth sets scale, how far a piece sinks into the
/// sand, and whether it is drawn in front of the creatures.
pub fn place_decor(
    config: &AquariumConfig,
    catalog: &ImageCatalog,
    size: SceneSize,
    rng: &mut SmallRng,
) -> Vec<Decor> {
    let kinds: Vec<DecorKind> = DecorKind::ALL
        .iter()
        .copied()
        .filter(|k| !catalog.decor_pool(*k).is_empty())
        .collect();
    if kinds.is_empty() {
        tracing::warn!("No decor images loaded, skipping decor");
        return Vec::new();
    }

    let cfg = &config.decor;
    let sand_top = size.sand_top(config.environment.sand_ratio);
    let sand_height = size.sand_height(config.environment.sand_ratio);
    let positions = spread_positions(
        cfg.count,
        size.width,
        size.width * cfg.min_separation,
        cfg.max_attempts,
        rng,
    );

    let mut decor = Vec::with_capacity(positions.len());
    for x in positions {
        let Some(&kind) = kinds.choose(rng) else {
            break;
        };
        let Some(image) = catalog
            .decor_pool(kind)
            .choose(rng)
            .and_then(|id| catalog.get(*id))
        else {
            continue;
        };

        let depth: f32 = rng.gen();
        let scale = 0.6 + 0.6 * depth;
        let height = size.height * cfg.size_ratio * scale;
        let width = height * image.aspect_ratio();
        let sink = height * cfg.sink * depth;
        let layer = if depth > cfg.foreground_depth {
            DecorLayer::Foreground
        } else {
            DecorLayer::Background
        };

        decor.push(Decor {
            kind,
            image: image.id,
            base: Point::new(x, sand_top + depth * sand_height * 0.5 + sink),
            width,
            height,
            depth,
            layer,
        });
    }

    // Far pieces first so nearer ones overlap them within a layer.
    decor.sort_by(|a, b| a.depth.partial_cmp(&b.depth).unwrap_or(std::cmp::Ordering::Equal));
    decor
}

pub fn spawn_weeds(config: &AquariumConfig, size: SceneSize, rng: &mut SmallRng) -> Vec<Weed> {
    let cfg = &config.weeds;
    let count = cfg.min_count.max((size.width / cfg.spacing.max(1.0)) as usize);
    (0..count)
        .map(|_| Weed {
            x: rng.gen::<f32>() * size.width,
            height_ratio: lerp(cfg.min_height, cfg.max_height, rng.gen()),
            width_ratio: lerp(cfg.min_width, cfg.max_width, rng.gen()),
            phase: rng.gen::<f32>() * TAU,
        })
        .collect()
}

pub fn spawn_sand_blemishes(
    config: &AquariumConfig,
    size: SceneSize,
    rng: &mut SmallRng,
) -> Vec<SandBlemish> {
    let cfg = &config.sand;
    let sand_top = size.sand_top(config.environment.sand_ratio);
    let sand_height = size.sand_height(config.environment.sand_ratio);
    let count = cfg.min_blemishes.max((size.width / cfg.spacing.max(1.0)) as usize);

    (0..count)
        .map(|_| {
            let radius_x = sand_height * lerp(0.1, 0.5, rng.gen());
            SandBlemish {
                center: Point::new(
                    rng.gen::<f32>() * size.width,
                    sand_top + rng.gen::<f32>() * sand_height,
                ),
                radius_x,
                radius_y: radius_x * lerp(0.2, 0.5, rng.gen()),
                opacity: lerp(cfg.min_opacity, cfg.max_opacity, rng.gen()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetManifest;
    use rand::SeedableRng;

    #[test]
    fn test_spread_positions_respect_gap_when_room() {
        let mut rng = SmallRng::seed_from_u64(3);
        let xs = spread_positions(5, 1200.0, 20.0, 50, &mut rng);
        assert_eq!(xs.len(), 5);
        for (i, a) in xs.iter().enumerate() {
            for b in &xs[i + 1..] {
                assert!((a - b).abs() > 20.0);
            }
        }
    }

    #[test]
    fn test_spread_positions_fall_back_when_crowded() {
        // Ten pieces cannot keep a 50px gap on a 100px scene; placement still
        // returns every piece.
        let mut rng = SmallRng::seed_from_u64(5);
        let xs = spread_positions(10, 100.0, 50.0, 10, &mut rng);
        assert_eq!(xs.len(), 10);
        assert!(xs.iter().all(|x| *x >= 0.0 && *x < 100.0));
    }

    #[test]
    fn test_decor_layers_follow_depth() {
        let config = AquariumConfig::default();
        let catalog = ImageCatalog::placeholder(&AssetManifest::default());
        let mut rng = SmallRng::seed_from_u64(8);
        let decor = place_decor(&config, &catalog, SceneSize::new(1200.0, 200.0), &mut rng);

        assert_eq!(decor.len(), 7);
        for piece in &decor {
            let expected = if piece.depth > 0.7 {
                DecorLayer::Foreground
            } else {
                DecorLayer::Background
            };
            assert_eq!(piece.layer, expected);
            assert!(piece.base.y >= 160.0);
        }
        assert!(decor.windows(2).all(|w| w[0].depth <= w[1].depth));
    }

    #[test]
    fn test_blemishes_sit_in_sand() {
        let config = AquariumConfig::default();
        let mut rng = SmallRng::seed_from_u64(2);
        let blemishes = spawn_sand_blemishes(&config, SceneSize::new(400.0, 200.0), &mut rng);
        assert_eq!(blemishes.len(), 50);
        for b in &blemishes {
            assert!(b.center.y >= 160.0 && b.center.y <= 200.0);
            assert!(b.opacity >= 0.02 && b.opacity <= 0.08);
        }
    }

    #[test]
    fn test_weed_count_floor() {
        let config = AquariumConfig::default();
        let mut rng = SmallRng::seed_from_u64(2);
        assert_eq!(spawn_weeds(&config, SceneSize::new(100.0, 200.0), &mut rng).len(), 6);
        assert_eq!(spawn_weeds(&config, SceneSize::new(1200.0, 200.0), &mut rng).len(), 20);
    }
}
