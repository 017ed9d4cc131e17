//! Hand-placed continents for the procedural planet
//!
//! Fourteen elliptical templates at fixed normalized (u, v) positions on an
//! equirectangular map. Each generated landmass jitters its template into an
//! irregular polygon of 12-16 boundary points, so coastlines change from one
//! generator to the next while the rough layout stays recognisable.

use butterfly_core::Color;
use rand::Rng;
use std::f32::consts::TAU;

/// Broad surface type of a landmass; drives color and reflectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceCategory {
    Desert,
    Forest,
    Mountain,
    Grassland,
    Tundra,
}

impl SurfaceCategory {
    /// Specular intensity painted over land of this kind
    pub fn reflectivity(&self) -> u8 {
        match self {
            SurfaceCategory::Desert => 96,
            SurfaceCategory::Grassland => 56,
            SurfaceCategory::Tundra => 48,
            SurfaceCategory::Mountain => 32,
            SurfaceCategory::Forest => 28,
        }
    }
}

/// Fixed placement of one continent
#[derive(Debug, Clone, Copy)]
pub struct ContinentTemplate {
    pub name: &'static str,
    pub center: (f32, f32),
    pub radii: (f32, f32),
    pub category: SurfaceCategory,
    /// Gradient from the interior (inner) to the coast (outer)
    pub inner: u32,
    pub outer: u32,
}

const fn template(
    name: &'static str,
    center: (f32, f32),
    radii: (f32, f32),
    category: SurfaceCategory,
    inner: u32,
    outer: u32,
) -> ContinentTemplate {
    ContinentTemplate {
        name,
        center,
        radii,
        category,
        inner,
        outer,
    }
}

pub const CONTINENTS: [ContinentTemplate; 14] = [
    template(
        "north_america",
        (0.22, 0.28),
        (0.10, 0.12),
        SurfaceCategory::Forest,
        0x2d5a27,
        0x4a7c3a,
    ),
    template("greenland", (0.38, 0.12), (0.04, 0.05), SurfaceCategory::Tundra, 0xc8d0c8, 0x8fa08a),
    template(
        "central_america",
        (0.24, 0.42),
        (0.03, 0.05),
        SurfaceCategory::Forest,
        0x2f6b2a,
        0x4f8a3c,
    ),
    template(
        "south_america",
        (0.32, 0.64),
        (0.06, 0.14),
        SurfaceCategory::Forest,
        0x1f5a1c,
        0x4a7f35,
    ),
    template("europe", (0.53, 0.24), (0.05, 0.06), SurfaceCategory::Grassland, 0x5b8a3c, 0x7a9a50),
    template(
        "scandinavia",
        (0.54, 0.14),
        (0.03, 0.04),
        SurfaceCategory::Tundra,
        0x6f7f5f,
        0x8c9a7a,
    ),
    template("sahara", (0.54, 0.40), (0.08, 0.08), SurfaceCategory::Desert, 0xd9b56a, 0xc49a55),
    template(
        "southern_africa",
        (0.57, 0.60),
        (0.06, 0.10),
        SurfaceCategory::Grassland,
        0x8a8a3c,
        0x5f7f32,
    ),
    template("arabia", (0.63, 0.38), (0.04, 0.05), SurfaceCategory::Desert, 0xe0c080, 0xc8a460),
    template("siberia", (0.75, 0.18), (0.14, 0.07), SurfaceCategory::Tundra, 0x7a8a6a, 0x5f7050),
    template("himalaya", (0.72, 0.32), (0.08, 0.06), SurfaceCategory::Mountain, 0x8a7f70, 0x6b6a55),
    template("india", (0.70, 0.42), (0.03, 0.05), SurfaceCategory::Grassland, 0x7a8f40, 0x5a7a35),
    template(
        "southeast_asia",
        (0.80, 0.44),
        (0.04, 0.05),
        SurfaceCategory::Forest,
        0x236b2a,
        0x3f8a3a,
    ),
    template("australia", (0.87, 0.68), (0.06, 0.06), SurfaceCategory::Desert, 0xc8783c, 0xb08a50),
];

/// Latitude extent (fraction of map height) of each polar cap
pub const NORTH_CAP: f32 = 0.07;
pub const SOUTH_CAP: f32 = 0.10;

/// Ice coverage in [0, 1] at normalized latitude `v` (0 = north pole)
pub fn ice_cap(v: f32) -> f32 {
    let north = 1.0 - (v / NORTH_CAP);
    let south = 1.0 - ((1.0 - v) / SOUTH_CAP);
    smoothstep(0.0, 0.6, north.max(south))
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// A jittered continent polygon
#[derive(Debug, Clone)]
pub struct Landmass {
    pub template: ContinentTemplate,
    pub points: Vec<(f32, f32)>,
    min: (f32, f32),
    max: (f32, f32),
}

impl Landmass {
    fn from_points(template: ContinentTemplate, points: Vec<(f32, f32)>) -> Self {
        let min = points
            .iter()
            .fold((f32::MAX, f32::MAX), |(mu, mv), &(u, v)| (mu.min(u), mv.min(v)));
        let max = points
            .iter()
            .fold((f32::MIN, f32::MIN), |(mu, mv), &(u, v)| (mu.max(u), mv.max(v)));
        Self {
            template,
            points,
            min,
            max,
        }
    }

    pub fn category(&self) -> SurfaceCategory {
        self.template.category
    }

    /// Even-odd point-in-polygon test
    pub fn contains(&self, u: f32, v: f32) -> bool {
        if u < self.min.0 || u > self.max.0 || v < self.min.1 || v > self.max.1 {
            return false;
        }
        let mut inside = false;
        let n = self.points.len();
        let mut j = n - 1;
        for i in 0..n {
            let (ui, vi) = self.points[i];
            let (uj, vj) = self.points[j];
            if (vi > v) != (vj > v) && u < (uj - ui) * (v - vi) / (vj - vi) + ui {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Interior-to-coast gradient color at (u, v)
    pub fn color_at(&self, u: f32, v: f32) -> Color {
        let (cu, cv) = self.template.center;
        let (ru, rv) = self.template.radii;
        let du = (u - cu) / ru;
        let dv = (v - cv) / rv;
        let t = (du * du + dv * dv).sqrt().min(1.0);
        Color::from_hex(self.template.inner).lerp(&Color::from_hex(self.template.outer), t)
    }
}

/// What a map pixel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Ocean,
    /// Index into [`Landmasses::all`]
    Land(usize),
}

/// Per-pixel surface classification shared by the maps that need it
#[derive(Debug, Clone)]
pub struct SurfaceMap {
    pub width: u32,
    pub height: u32,
    cells: Vec<Surface>,
}

impl SurfaceMap {
    pub fn get(&self, x: u32, y: u32) -> Surface {
        self.cells[(y * self.width + x) as usize]
    }

    pub fn land_fraction(&self) -> f32 {
        let land = self
            .cells
            .iter()
            .filter(|c| matches!(c, Surface::Land(_)))
            .count();
        land as f32 / self.cells.len().max(1) as f32
    }
}

#[derive(Debug, Clone)]
pub struct Landmasses {
    shapes: Vec<Landmass>,
}

impl Landmasses {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let shapes = CONTINENTS
            .iter()
            .map(|template| {
                let count = rng.gen_range(12..=16);
                let jitter = rng.gen_range(0.2..=0.6f32);
                let (cu, cv) = template.center;
                let (ru, rv) = template.radii;
                let points = (0..count)
                    .map(|i| {
                        let angle = i as f32 / count as f32 * TAU;
                        let scale = 1.0 + rng.gen_range(-jitter..=jitter);
                        (
                            cu + angle.cos() * ru * scale,
                            cv + angle.sin() * rv * scale,
                        )
                    })
                    .collect();
                Landmass::from_points(*template, points)
            })
            .collect();
        Self { shapes }
    }

    pub fn all(&self) -> &[Landmass] {
        &self.shapes
    }

    /// Topmost landmass at (u, v); later templates paint over earlier ones
    pub fn landmass_at(&self, u: f32, v: f32) -> Option<&Landmass> {
        self.shapes.iter().rev().find(|shape| shape.contains(u, v))
    }

    pub fn category_at(&self, u: f32, v: f32) -> Option<SurfaceCategory> {
        self.landmass_at(u, v).map(Landmass::category)
    }

    /// Classify every pixel center of a `width` × `height` map
    pub fn rasterize(&self, width: u32, height: u32) -> SurfaceMap {
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            let v = (y as f32 + 0.5) / height as f32;
            for x in 0..width {
                let u = (x as f32 + 0.5) / width as f32;
                let index = self
                    .shapes
                    .iter()
                    .rposition(|shape| shape.contains(u, v));
                cells.push(index.map_or(Surface::Ocean, Surface::Land));
            }
        }
        SurfaceMap {
            width,
            height,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn landmasses(seed: u64) -> Landmasses {
        Landmasses::generate(&mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn fourteen_shapes_with_12_to_16_points() {
        let lm = landmasses(3);
        assert_eq!(lm.all().len(), 14);
        for shape in lm.all() {
            assert!((12..=16).contains(&shape.points.len()));
        }
    }

    #[test]
    fn jitter_stays_within_sixty_percent() {
        let lm = landmasses(11);
        for shape in lm.all() {
            let (cu, cv) = shape.template.center;
            let (ru, rv) = shape.template.radii;
            for &(u, v) in &shape.points {
                let r = (((u - cu) / ru).powi(2) + ((v - cv) / rv).powi(2)).sqrt();
                assert!((0.39..=1.61).contains(&r), "radius factor {r}");
            }
        }
    }

    #[test]
    fn template_centers_are_land() {
        let lm = landmasses(5);
        assert_eq!(lm.category_at(0.54, 0.40), Some(SurfaceCategory::Desert));
        assert_eq!(lm.category_at(0.32, 0.64), Some(SurfaceCategory::Forest));
    }

    #[test]
    fn open_ocean_is_ocean() {
        let lm = landmasses(5);
        assert_eq!(lm.category_at(0.45, 0.85), None);
        assert_eq!(lm.category_at(0.05, 0.5), None);
    }

    #[test]
    fn seeds_change_coastlines() {
        let a = landmasses(1);
        let b = landmasses(2);
        assert_ne!(a.all()[0].points, b.all()[0].points);
        assert_eq!(a.all()[0].points, landmasses(1).all()[0].points);
    }

    #[test]
    fn rasterize_matches_point_queries() {
        let lm = landmasses(8);
        let map = lm.rasterize(64, 32);
        let fraction = map.land_fraction();
        assert!(fraction > 0.05 && fraction < 0.6, "land fraction {fraction}");

        let x = (0.54 * 64.0) as u32;
        let y = (0.40 * 32.0) as u32;
        match map.get(x, y) {
            Surface::Land(i) => assert_eq!(lm.all()[i].category(), SurfaceCategory::Desert),
            Surface::Ocean => panic!("expected land at the Sahara template"),
        }
    }

    #[test]
    fn ice_caps_at_poles_only() {
        assert!(ice_cap(0.0) > 0.99);
        assert!(ice_cap(1.0) > 0.99);
        assert_eq!(ice_cap(0.5), 0.0);
        assert_eq!(ice_cap(NORTH_CAP + 0.01), 0.0);
    }
}
