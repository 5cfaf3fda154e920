//! Particle attribute generation.
//!
//! Positions are drawn by rejection sampling inside the unit ball and
//! redistributed uniformly by volume; the random source is injected so
//! seeded layouts are reproducible in tests.

use rand::Rng;

/// The three per-particle attribute buffers, generated once at mount.
///
/// All three vectors always have the same length. Positions hold the
/// pre-`spread` unit-ball coordinates; scaling to world space happens in
/// the vertex shader.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBuffers {
    /// Unit-ball positions, 3 components per particle.
    pub positions: Vec<[f32; 3]>,
    /// Independent uniform random values, 4 per particle; the shader uses
    /// them for phase-offset oscillation and size jitter.
    pub randoms: Vec<[f32; 4]>,
    /// Normalized RGB color per particle, sampled from the palette.
    pub colors: Vec<[f32; 3]>,
}

impl ParticleBuffers {
    /// Generate `count` particles from the given random source.
    ///
    /// Each direction is rejection-sampled from `[-1,1]^3` (accepted when
    /// `0 < x^2+y^2+z^2 <= 1`, so directions are unbiased and the zero
    /// vector never produces a degenerate normalization), normalized, then
    /// scaled by `cbrt(u)` — the cube root compensates for the r^2 growth
    /// of shell volume, giving a uniform-by-volume distribution instead of
    /// center clustering.
    ///
    /// Colors are drawn uniformly with replacement from `palette`; an
    /// empty palette falls back to white.
    pub fn generate<R: Rng + ?Sized>(
        count: usize,
        palette: &[[f32; 3]],
        rng: &mut R,
    ) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut randoms = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);

        for _ in 0..count {
            let (x, y, z) = loop {
                let x = rng.random::<f32>() * 2.0 - 1.0;
                let y = rng.random::<f32>() * 2.0 - 1.0;
                let z = rng.random::<f32>() * 2.0 - 1.0;
                let len_sq = x * x + y * y + z * z;
                if len_sq > 0.0 && len_sq <= 1.0 {
                    let inv_len = len_sq.sqrt().recip();
                    break (x * inv_len, y * inv_len, z * inv_len);
                }
            };

            let r = rng.random::<f32>().cbrt();
            positions.push([x * r, y * r, z * r]);

            randoms.push([
                rng.random(),
                rng.random(),
                rng.random(),
                rng.random(),
            ]);

            let color = if palette.is_empty() {
                [1.0, 1.0, 1.0]
            } else {
                palette[rng.random_range(0..palette.len())]
            };
            colors.push(color);
        }

        Self {
            positions,
            randoms,
            colors,
        }
    }

    /// Number of particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the buffers are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

    #[test]
    fn generates_exactly_count_particles() {
        let mut rng = StdRng::seed_from_u64(7);
        for count in [0usize, 1, 200, 1337] {
            let buffers = ParticleBuffers::generate(count, &[WHITE], &mut rng);
            assert_eq!(buffers.positions.len(), count);
            assert_eq!(buffers.randoms.len(), count);
            assert_eq!(buffers.colors.len(), count);
        }
    }

    #[test]
    fn positions_stay_inside_the_unit_ball() {
        let mut rng = StdRng::seed_from_u64(42);
        let buffers = ParticleBuffers::generate(5000, &[WHITE], &mut rng);
        for p in &buffers.positions {
            let len_sq = p[0] * p[0] + p[1] * p[1] + p[2] * p[2];
            assert!(len_sq <= 1.0 + 1e-6, "escaped the ball: {len_sq}");
        }
    }

    #[test]
    fn randoms_are_unit_interval() {
        let mut rng = StdRng::seed_from_u64(42);
        let buffers = ParticleBuffers::generate(1000, &[WHITE], &mut rng);
        for r in &buffers.randoms {
            for &v in r {
                assert!((0.0..1.0).contains(&v));
            }
        }
    }

    #[test]
    fn radial_distribution_is_uniform_by_volume() {
        // If positions are uniform by volume, r^3 is uniform on [0, 1]:
        // bucket r^3 into ten bins and check each holds roughly a tenth.
        let mut rng = StdRng::seed_from_u64(99);
        let n = 20_000;
        let buffers = ParticleBuffers::generate(n, &[WHITE], &mut rng);

        let mut bins = [0usize; 10];
        for p in &buffers.positions {
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            let idx = ((r.powi(3) * 10.0) as usize).min(9);
            bins[idx] += 1;
        }

        let expected = n / 10;
        for (i, &count) in bins.iter().enumerate() {
            assert!(
                count > expected * 8 / 10 && count < expected * 12 / 10,
                "bin {i} holds {count}, expected ~{expected}"
            );
        }
    }

    #[test]
    fn colors_come_only_from_the_palette() {
        let palette = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let mut rng = StdRng::seed_from_u64(3);
        let buffers = ParticleBuffers::generate(500, &palette, &mut rng);
        for c in &buffers.colors {
            assert!(palette.contains(c), "color {c:?} not in palette");
        }
    }

    #[test]
    fn empty_palette_falls_back_to_white() {
        let mut rng = StdRng::seed_from_u64(3);
        let buffers = ParticleBuffers::generate(10, &[], &mut rng);
        assert!(buffers.colors.iter().all(|c| *c == WHITE));
    }

    #[test]
    fn same_seed_produces_identical_buffers() {
        let palette = [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let mut rng_a = StdRng::seed_from_u64(1234);
        let mut rng_b = StdRng::seed_from_u64(1234);
        let a = ParticleBuffers::generate(300, &palette, &mut rng_a);
        let b = ParticleBuffers::generate(300, &palette, &mut rng_b);
        assert_eq!(a, b);
    }
}
