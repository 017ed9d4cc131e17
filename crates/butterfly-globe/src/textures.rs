//! Procedural planet textures
//!
//! Four equirectangular maps, each produced by its own pure function and
//! returned as a fresh [`RgbaImage`]:
//! - diffuse: ocean, gradient-filled continents, polar ice, low-frequency noise
//! - normal: finite differences over a three-octave height field
//! - specular: reflective ocean with radial waves, duller land by category
//! - clouds: white with three-octave alpha, denser in the storm-track bands

use crate::landmass::{ice_cap, Landmasses, Surface, SurfaceMap};
use crate::noise::{NoiseField, Octave};
use butterfly_core::config::GlobeConfig;
use butterfly_core::{ButterflyError, Color, Result};
use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::time::Instant;

const OCEAN_DEEP: u32 = 0x0b2a4a;
const OCEAN_SHALLOW: u32 = 0x1e5f8c;
const ICE: u32 = 0xf0f4f8;

/// Height field: three octaves of the same hash noise
const HEIGHT_OCTAVES: [Octave; 3] = [
    Octave::new(8.0, 0.5),
    Octave::new(24.0, 0.3),
    Octave::new(64.0, 0.2),
];
const NORMAL_STRENGTH: f32 = 6.0;

/// Clouds: frequency falls as weight rises
const CLOUD_OCTAVES: [Octave; 3] = [
    Octave::new(48.0, 0.2),
    Octave::new(24.0, 0.3),
    Octave::new(12.0, 0.5),
];
const STORM_BANDS: [(f32, f32); 2] = [(0.2, 0.4), (0.6, 0.8)];
const STORM_BOOST: f32 = 1.25;
const WISP_FREQUENCY: f32 = 160.0;
const WISP_THRESHOLD: f32 = 0.92;

const OCEAN_SPECULAR: f32 = 190.0;
const WAVE_AMPLITUDE: f32 = 35.0;
const ICE_SPECULAR: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureParams {
    pub width: u32,
    pub height: u32,
    /// Fixed seed for reproducible maps; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 512,
            seed: None,
        }
    }
}

impl TextureParams {
    pub fn from_config(config: &GlobeConfig) -> Self {
        Self {
            width: config.texture_width,
            height: config.texture_height,
            seed: config.seed,
        }
    }
}

/// The four maps applied to the globe
#[derive(Debug, Clone)]
pub struct PlanetTextureSet {
    pub diffuse: RgbaImage,
    pub normal: RgbaImage,
    pub specular: RgbaImage,
    pub clouds: RgbaImage,
}

impl PlanetTextureSet {
    /// Maps paired with their file stem
    pub fn maps(&self) -> [(&'static str, &RgbaImage); 4] {
        [
            ("earth_diffuse", &self.diffuse),
            ("earth_normal", &self.normal),
            ("earth_specular", &self.specular),
            ("earth_clouds", &self.clouds),
        ]
    }

    /// Write every map as `<dir>/<stem>.png`
    pub fn save_pngs(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        self.maps()
            .into_iter()
            .map(|(stem, image)| {
                let path = dir.join(format!("{}.png", stem));
                image.save(&path).map_err(|e| {
                    ButterflyError::TextureError(format!("{}: {}", path.display(), e))
                })?;
                Ok(path)
            })
            .collect()
    }
}

/// Generate all four maps, sequentially, from one generator
pub fn generate_texture_set(params: &TextureParams) -> PlanetTextureSet {
    let start = Instant::now();
    let width = params.width.max(1);
    let height = params.height.max(1);

    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let landmasses = Landmasses::generate(&mut rng);
    let terrain_noise = NoiseField::new(&mut rng);
    let height_noise = NoiseField::new(&mut rng);
    let cloud_noise = NoiseField::new(&mut rng);
    let wave_noise = NoiseField::new(&mut rng);

    let surface = landmasses.rasterize(width, height);
    let set = PlanetTextureSet {
        diffuse: diffuse_map(&surface, &landmasses, &terrain_noise),
        normal: normal_map(width, height, &height_noise),
        specular: specular_map(&surface, &landmasses, &wave_noise),
        clouds: cloud_map(width, height, &cloud_noise),
    };

    log::info!(
        "Generated planet textures {}x{} in {:.1?} ({:.0}% land)",
        width,
        height,
        start.elapsed(),
        surface.land_fraction() * 100.0
    );
    set
}

fn uv(x: u32, y: u32, width: u32, height: u32) -> (f32, f32) {
    (
        (x as f32 + 0.5) / width as f32,
        (y as f32 + 0.5) / height as f32,
    )
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn diffuse_map(surface: &SurfaceMap, landmasses: &Landmasses, noise: &NoiseField) -> RgbaImage {
    let (width, height) = (surface.width, surface.height);
    let deep = Color::from_hex(OCEAN_DEEP);
    let shallow = Color::from_hex(OCEAN_SHALLOW);
    let ice = Color::from_hex(ICE);

    RgbaImage::from_fn(width, height, |x, y| {
        let (u, v) = uv(x, y, width, height);
        let base = match surface.get(x, y) {
            Surface::Ocean => {
                let equator = 1.0 - (v - 0.5).abs() * 2.0;
                deep.lerp(&shallow, equator * 0.6)
            }
            Surface::Land(i) => landmasses.all()[i].color_at(u, v),
        };
        let color = base.lerp(&ice, ice_cap(v));

        let n = noise.sample(u * 64.0, v * 32.0);
        let factor = 0.9 + n * 0.2;
        Rgba([
            to_byte(color.r * factor),
            to_byte(color.g * factor),
            to_byte(color.b * factor),
            255,
        ])
    })
}

pub fn normal_map(width: u32, height: u32, noise: &NoiseField) -> RgbaImage {
    let heights: Vec<f32> = (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                let (u, v) = uv(x, y, width, height);
                noise.octaves(u * 2.0, v, &HEIGHT_OCTAVES)
            })
        })
        .collect();

    // Wrap horizontally around the globe, clamp at the poles
    let at = |x: i64, y: i64| -> f32 {
        let x = x.rem_euclid(width as i64) as u32;
        let y = y.clamp(0, height as i64 - 1) as u32;
        heights[(y * width + x) as usize]
    };

    RgbaImage::from_fn(width, height, |x, y| {
        let (xi, yi) = (x as i64, y as i64);
        let dx = at(xi - 1, yi) - at(xi + 1, yi);
        let dy = at(xi, yi - 1) - at(xi, yi + 1);
        Rgba([
            to_byte(0.5 + dx * NORMAL_STRENGTH * 0.5),
            to_byte(0.5 + dy * NORMAL_STRENGTH * 0.5),
            255,
            255,
        ])
    })
}

pub fn specular_map(
    surface: &SurfaceMap,
    landmasses: &Landmasses,
    noise: &NoiseField,
) -> RgbaImage {
    let (width, height) = (surface.width, surface.height);

    RgbaImage::from_fn(width, height, |x, y| {
        let (u, v) = uv(x, y, width, height);
        let value = if ice_cap(v) > 0.5 {
            ICE_SPECULAR
        } else {
            match surface.get(x, y) {
                Surface::Ocean => {
                    let du = (u - 0.5) * 2.0;
                    let dv = v - 0.5;
                    let distance = (du * du + dv * dv).sqrt();
                    let wobble = noise.sample(u * 16.0, v * 8.0) * 6.0;
                    let wave = (distance * 80.0 + wobble).sin();
                    (OCEAN_SPECULAR + wave * WAVE_AMPLITUDE).round() as u8
                }
                Surface::Land(i) => landmasses.all()[i].category().reflectivity(),
            }
        };
        Rgba([value, value, value, 255])
    })
}

pub fn cloud_map(width: u32, height: u32, noise: &NoiseField) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let (u, v) = uv(x, y, width, height);
        let mut density = noise.octaves(u * 2.0, v, &CLOUD_OCTAVES);
        if STORM_BANDS.iter().any(|&(lo, hi)| v >= lo && v <= hi) {
            density *= STORM_BOOST;
        }
        let mut alpha = smoothstep(0.5, 0.8, density);

        let wisp = noise.sample(u * 2.0 * WISP_FREQUENCY, v * WISP_FREQUENCY);
        if wisp > WISP_THRESHOLD {
            alpha += 0.3 * (wisp - WISP_THRESHOLD) / (1.0 - WISP_THRESHOLD);
        }
        Rgba([255, 255, 255, to_byte(alpha)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(seed: u64) -> TextureParams {
        TextureParams {
            width: 128,
            height: 64,
            seed: Some(seed),
        }
    }

    fn pixel_at(image: &RgbaImage, u: f32, v: f32) -> Rgba<u8> {
        let x = (u * image.width() as f32) as u32;
        let y = (v * image.height() as f32) as u32;
        *image.get_pixel(x, y)
    }

    #[test]
    fn all_maps_share_resolution() {
        let set = generate_texture_set(&small(1));
        for (_, map) in set.maps() {
            assert_eq!(map.dimensions(), (128, 64));
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = generate_texture_set(&small(42));
        let b = generate_texture_set(&small(42));
        let c = generate_texture_set(&small(43));
        assert_eq!(a.diffuse, b.diffuse);
        assert_eq!(a.clouds, b.clouds);
        assert_ne!(a.diffuse, c.diffuse);
    }

    #[test]
    fn normal_map_keeps_flat_up_bias() {
        let set = generate_texture_set(&small(2));
        assert!(set.normal.pixels().all(|p| p[2] == 255));
    }

    #[test]
    fn clouds_are_white_with_varying_alpha() {
        let set = generate_texture_set(&small(3));
        assert!(set.clouds.pixels().all(|p| p[0] == 255 && p[1] == 255 && p[2] == 255));
        let min = set.clouds.pixels().map(|p| p[3]).min().unwrap();
        let max = set.clouds.pixels().map(|p| p[3]).max().unwrap();
        assert!(max > min);
    }

    #[test]
    fn poles_are_icy_in_diffuse() {
        let set = generate_texture_set(&small(4));
        let top = pixel_at(&set.diffuse, 0.5, 0.0);
        let equator_ocean = pixel_at(&set.diffuse, 0.45, 0.85);
        assert!(top[0] > 180 && top[2] > 180);
        assert!(equator_ocean[0] < 100);
    }

    #[test]
    fn specular_ocean_brighter_than_land_and_ice() {
        let set = generate_texture_set(&small(5));
        let ocean = pixel_at(&set.specular, 0.45, 0.85)[0];
        let desert = pixel_at(&set.specular, 0.54, 0.40)[0];
        let forest = pixel_at(&set.specular, 0.32, 0.64)[0];
        let ice = pixel_at(&set.specular, 0.5, 0.0)[0];

        assert!(ocean > desert);
        assert!(desert > forest);
        assert_eq!(ice, ICE_SPECULAR);
    }

    #[test]
    fn save_pngs_writes_four_files() {
        let dir = std::env::temp_dir().join(format!("butterfly_textures_{}", uuid::Uuid::new_v4()));
        let set = generate_texture_set(&TextureParams {
            width: 16,
            height: 8,
            seed: Some(9),
        });
        let paths = set.save_pngs(&dir).unwrap();
        assert_eq!(paths.len(), 4);
        assert!(paths.iter().all(|p| p.exists()));
        std::fs::remove_dir_all(&dir).ok();
    }
}
