//! Asset manifest and image catalog.
//!
//! Images are resolved in two phases: the host requests every name in the
//! [`AssetManifest`], waits for all of them to complete (or gives up after a
//! timeout), and only then builds an [`ImageCatalog`] from whatever loaded.
//! The scene is constructed from the finished catalog, so the population is
//! complete from tick zero and never references an image that failed.

use aquarium_frame::ImageId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::components::{DecorKind, Species};
use crate::error::AssetError;

/// Image names per species and per decor kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub swimmers: Vec<String>,
    pub drifters: Vec<String>,
    pub crawlers: Vec<String>,
    pub pulsators: Vec<String>,
    pub rocks: Vec<String>,
    pub corals: Vec<String>,
    pub driftwood: Vec<String>,
    /// Width/height used when images are not probed
    pub placeholder_aspect: f32,
}

fn numbered(prefix: &str, numbers: impl IntoIterator<Item = u32>) -> Vec<String> {
    numbers
        .into_iter()
        .map(|n| format!("{}{}.png", prefix, n))
        .collect()
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            swimmers: numbered("fish", [1, 2, 3, 4, 5, 6, 16, 17, 18, 19]),
            drifters: numbered("fish", [7, 8]),
            crawlers: numbered("fish", 9..=15),
            pulsators: numbered("jellyfish", 1..=2),
            rocks: numbered("rock", 1..=5),
            corals: numbered("coral", 1..=3),
            driftwood: numbered("wood", 1..=3),
            placeholder_aspect: 1.6,
        }
    }
}

impl AssetManifest {
    pub fn species_names(&self, species: Species) -> &[String] {
        match species {
            Species::Swimmer => &self.swimmers,
            Species::Drifter => &self.drifters,
            Species::Crawler => &self.crawlers,
            Species::Pulsator => &self.pulsators,
        }
    }

    pub fn decor_names(&self, kind: DecorKind) -> &[String] {
        match kind {
            DecorKind::Rock => &self.rocks,
            DecorKind::Coral => &self.corals,
            DecorKind::Driftwood => &self.driftwood,
        }
    }

    /// Every distinct image name, in manifest order.
    pub fn all_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let groups = Species::ALL
            .iter()
            .map(|s| self.species_names(*s))
            .chain(DecorKind::ALL.iter().map(|k| self.decor_names(*k)));
        for group in groups {
            for name in group {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
        }
        names
    }
}

/// A loaded image as the simulation sees it: identity and pixel size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteImage {
    pub id: ImageId,
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl SpriteImage {
    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Pixel dimensions reported by the host once an image completes loading.
pub type LoadedDimensions = HashMap<String, (u32, u32)>;

/// Images grouped into per-species and per-decor pools.
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    images: Vec<SpriteImage>,
    species: HashMap<Species, Vec<ImageId>>,
    decor: HashMap<DecorKind, Vec<ImageId>>,
}

impl ImageCatalog {
    /// Builds the catalog from completed loads. Names missing from `loaded`
    /// (failed or timed out) are left out of their pools.
    pub fn from_loaded(manifest: &AssetManifest, loaded: &LoadedDimensions) -> Self {
        let mut catalog = Self::default();
        let mut ids: HashMap<&str, ImageId> = HashMap::new();

        for name in manifest.all_names() {
            match loaded.get(name) {
                Some(&(width, height)) if width > 0 && height > 0 => {
                    let id = ImageId(catalog.images.len() as u32);
                    catalog.images.push(SpriteImage {
                        id,
                        name: name.to_string(),
                        width,
                        height,
                    });
                    ids.insert(name, id);
                }
                Some(&(width, height)) => {
                    let err = AssetError::Degenerate {
                        name: name.to_string(),
                        width,
                        height,
                    };
                    tracing::warn!("{}", err);
                }
                None => tracing::warn!("Image {} did not load, leaving it out", name),
            }
        }

        for species in Species::ALL {
            let pool = pool_ids(manifest.species_names(species), &ids);
            if pool.is_empty() {
                tracing::warn!("No images for {}, it will not spawn", species);
            }
            catalog.species.insert(species, pool);
        }
        for kind in DecorKind::ALL {
            catalog.decor.insert(kind, pool_ids(manifest.decor_names(kind), &ids));
        }

        tracing::info!("Image catalog ready: {} images", catalog.images.len());
        catalog
    }

    /// Catalog where every manifest name "loaded" with placeholder dimensions.
    pub fn placeholder(manifest: &AssetManifest) -> Self {
        let height = 100u32;
        let width = (manifest.placeholder_aspect.max(0.05) * height as f32).round() as u32;
        let loaded = manifest
            .all_names()
            .into_iter()
            .map(|n| (n.to_string(), (width, height)))
            .collect();
        Self::from_loaded(manifest, &loaded)
    }

    /// Reads image headers under `dir` for every manifest name. Unreadable
    /// files are reported and skipped.
    pub fn probe_directory(manifest: &AssetManifest, dir: &Path) -> Self {
        let mut loaded = LoadedDimensions::new();
        for name in manifest.all_names() {
            match probe_dimensions(&dir.join(name)) {
                Ok(dims) => {
                    loaded.insert(name.to_string(), dims);
                }
                Err(e) => tracing::warn!("{}", e),
            }
        }
        Self::from_loaded(manifest, &loaded)
    }

    pub fn get(&self, id: ImageId) -> Option<&SpriteImage> {
        self.images.get(id.0 as usize)
    }

    pub fn images(&self) -> &[SpriteImage] {
        &self.images
    }

    pub fn species_pool(&self, species: Species) -> &[ImageId] {
        self.species.get(&species).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn decor_pool(&self, kind: DecorKind) -> &[ImageId] {
        self.decor.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

fn pool_ids(names: &[String], ids: &HashMap<&str, ImageId>) -> Vec<ImageId> {
    names.iter().filter_map(|n| ids.get(n.as_str()).copied()).collect()
}

/// Reads width and height from an image header without decoding pixels.
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), AssetError> {
    image::image_dimensions(path).map_err(|source| AssetError::Probe {
        path: path.to_path_buf(),
        source,
    })
}
