//! Fixed decay roots (1/s) shared by every construction of a kind.
//!
//! The wall set spans time constants from about six days down to half a
//! minute; the ground set reaches years to cover the seasonal soil swing.

/// Decay roots for above-ground constructions.
pub const WALL_ROOTS: [f64; 8] = [
    2.0e-6, 7.9e-6, 3.1205e-5, 1.2325e-4, 4.868e-4, 1.9228e-3, 7.5947e-3, 2.9997e-2,
];

/// Decay roots for ground-contact constructions.
pub const GROUND_ROOTS: [f64; 10] = [
    1.056_993_066_125_49e-8,
    3.274_474_576_772_04e-8,
    1.014_404_360_591_47e-7,
    3.142_538_391_003_15e-7,
    9.735_316_529_170_36e-7,
    3.015_910_089_858_09e-6,
    9.343_058_545_336_73e-6,
    2.894_395_683_137_06e-5,
    8.966_609_703_048_53e-5,
    2.777_777_777_777_78e-4,
];

/// Root set for a construction.
pub fn roots_for(is_ground: bool) -> &'static [f64] {
    if is_ground {
        &GROUND_ROOTS
    } else {
        &WALL_ROOTS
    }
}

/// Laplace sample points: twice as many as roots, log-interleaved.
///
/// Even positions (1-based) carry the roots themselves; odd positions carry
/// the geometric midpoint of the neighbouring roots, the first one sitting
/// half a ratio below the smallest root.
pub fn laplace_points(roots: &[f64]) -> Vec<f64> {
    let mut points = Vec::with_capacity(2 * roots.len());
    for (i, &root) in roots.iter().enumerate() {
        let below = if i == 0 {
            match roots.get(1) {
                Some(&next) => root * (root / next).sqrt(),
                None => root,
            }
        } else {
            (roots[i - 1] * root).sqrt()
        };
        points.push(below);
        points.push(root);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_are_strictly_increasing() {
        for set in [&WALL_ROOTS[..], &GROUND_ROOTS[..]] {
            assert!(set.windows(2).all(|w| w[0] < w[1]));
            assert!(set.iter().all(|&a| a > 0.0));
        }
    }

    #[test]
    fn laplace_points_interleave_roots() {
        let pts = laplace_points(&WALL_ROOTS);
        assert_eq!(pts.len(), 16);
        assert!(pts.windows(2).all(|w| w[0] < w[1]));
        for (i, root) in WALL_ROOTS.iter().enumerate() {
            assert_eq!(pts[2 * i + 1], *root);
        }
        // first point is one half-ratio below the smallest root
        let ratio = (WALL_ROOTS[1] / WALL_ROOTS[0]).sqrt();
        assert!((pts[0] * ratio - WALL_ROOTS[0]).abs() < 1e-18);
    }

    #[test]
    fn ground_set_is_longer() {
        assert_eq!(roots_for(true).len(), 10);
        assert_eq!(roots_for(false).len(), 8);
    }
}
