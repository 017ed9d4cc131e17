//! Coordinate-hashed value noise
//!
//! `fract(sin(x * 12.9898 + y * 78.233) * 43758.5453)` evaluated on an
//! integer lattice and blended with smoothstep. Cheap and grid-correlated,
//! not seamless. Each field carries a random lattice offset, so two fields
//! built from different generators produce different patterns.

use rand::Rng;

/// One octave: sample frequency and blend weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Octave {
    pub frequency: f32,
    pub weight: f32,
}

impl Octave {
    pub const fn new(frequency: f32, weight: f32) -> Self {
        Self { frequency, weight }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseField {
    offset_x: f32,
    offset_y: f32,
}

impl NoiseField {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            offset_x: rng.gen_range(0.0..1000.0f32).floor(),
            offset_y: rng.gen_range(0.0..1000.0f32).floor(),
        }
    }

    /// Field with no offset
    pub fn unshifted() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Raw lattice hash in [0, 1)
    pub fn hash(&self, x: f32, y: f32) -> f32 {
        let v = ((x + self.offset_x) * 12.9898 + (y + self.offset_y) * 78.233).sin() * 43758.5453;
        v - v.floor()
    }

    /// Smoothly interpolated noise in [0, 1]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let ix = x.floor();
        let iy = y.floor();
        let fx = x - ix;
        let fy = y - iy;

        let fx = fx * fx * (3.0 - 2.0 * fx);
        let fy = fy * fy * (3.0 - 2.0 * fy);

        let n00 = self.hash(ix, iy);
        let n10 = self.hash(ix + 1.0, iy);
        let n01 = self.hash(ix, iy + 1.0);
        let n11 = self.hash(ix + 1.0, iy + 1.0);

        let nx0 = n00 + (n10 - n00) * fx;
        let nx1 = n01 + (n11 - n01) * fx;
        nx0 + (nx1 - nx0) * fy
    }

    /// Weighted sum of octaves, normalised by total weight
    pub fn octaves(&self, x: f32, y: f32, octaves: &[Octave]) -> f32 {
        let total: f32 = octaves.iter().map(|o| o.weight).sum();
        if total <= 0.0 {
            return 0.0;
        }
        octaves
            .iter()
            .map(|o| o.weight * self.sample(x * o.frequency, y * o.frequency))
            .sum::<f32>()
            / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn hash_is_deterministic_and_in_range() {
        let field = NoiseField::unshifted();
        for i in 0..100 {
            let (x, y) = (i as f32 * 3.0, i as f32 * 7.0);
            let h = field.hash(x, y);
            assert!((0.0..1.0).contains(&h));
            assert_eq!(h, field.hash(x, y));
        }
    }

    #[test]
    fn sample_matches_hash_on_lattice() {
        let field = NoiseField::unshifted();
        assert_eq!(field.sample(5.0, 9.0), field.hash(5.0, 9.0));
    }

    #[test]
    fn sample_is_continuous() {
        let field = NoiseField::unshifted();
        let a = field.sample(2.999, 4.5);
        let b = field.sample(3.001, 4.5);
        assert!((a - b).abs() < 0.01);
    }

    #[test]
    fn seeded_fields_repeat_and_differ() {
        let a = NoiseField::new(&mut StdRng::seed_from_u64(1));
        let b = NoiseField::new(&mut StdRng::seed_from_u64(1));
        let c = NoiseField::new(&mut StdRng::seed_from_u64(2));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn octaves_stay_in_unit_range() {
        let field = NoiseField::unshifted();
        let octs = [Octave::new(0.1, 0.2), Octave::new(0.05, 0.3), Octave::new(0.02, 0.5)];
        for i in 0..200 {
            let v = field.octaves(i as f32 * 1.7, i as f32 * 0.3, &octs);
            assert!((0.0..=1.0).contains(&v));
        }
        assert_eq!(field.octaves(1.0, 1.0, &[]), 0.0);
    }
}
