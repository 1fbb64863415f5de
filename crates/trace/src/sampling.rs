//! Sampling helpers for the diffuse transport loop.

use glam::Vec3;
use std::f32::consts::{FRAC_1_PI, PI};

/// Cosine-weighted hemisphere sample around `+z` (Malley's method): sample
/// the unit disk uniformly, project up to the hemisphere.
///
/// Returns the direction in tangent space and its pdf `cosθ / π`.
pub fn cosine_sample_hemisphere(u: f32, v: f32) -> (Vec3, f32) {
    let r = u.sqrt();
    let phi = v * 2.0 * PI;

    let x = r * phi.cos();
    let y = r * phi.sin();
    let z = (1.0 - x * x - y * y).max(0.0).sqrt();

    (Vec3::new(x, y, z), z * FRAC_1_PI)
}

/// `n` flipped, if needed, to face against the incident direction `i`.
#[inline]
pub fn face_forward(i: Vec3, n: Vec3) -> Vec3 {
    if i.dot(n) > 0.0 {
        n
    } else {
        -n
    }
}

/// Rotate a tangent-space direction into world space around `normal`,
/// using Frisvad's branchless orthonormal basis.
pub fn tangent_to_world(dir: Vec3, normal: Vec3) -> Vec3 {
    let sign = if normal.z >= 0.0 { 1.0 } else { -1.0 };
    let a = -1.0 / (sign + normal.z);
    let b = normal.x * normal.y * a;
    let tangent = Vec3::new(1.0 + sign * a * normal.x * normal.x, sign * b, -sign * normal.x);
    let binormal = Vec3::new(b, sign + a * normal.y * normal.y, -normal.y);

    tangent * dir.x + binormal * dir.y + normal * dir.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_geom::Rng;

    #[test]
    fn samples_lie_on_the_upper_hemisphere() {
        let mut rng = Rng::from_seeds(5, 5);
        for _ in 0..1_000 {
            let (p, pdf) = cosine_sample_hemisphere(rng.next_f32(), rng.next_f32());
            assert!((p.length() - 1.0).abs() < 1e-4);
            assert!(p.z >= 0.0);
            assert!((pdf - p.z * FRAC_1_PI).abs() < 1e-6);
        }
    }

    #[test]
    fn cosine_distribution_histogram() {
        // With pdf cosθ/π the marginal density of z = cosθ is 2z, so the
        // mass of the bucket [i/10, (i+1)/10] is (2i + 1) / 100.
        let mut rng = Rng::from_seeds(42, 9);
        let n = 1_000_000;
        let mut buckets = [0u32; 10];
        for _ in 0..n {
            let (p, _) = cosine_sample_hemisphere(rng.next_f32(), rng.next_f32());
            let bucket = ((p.z * 10.0) as usize).min(9);
            buckets[bucket] += 1;
        }

        for (i, &count) in buckets.iter().enumerate() {
            let expected = (2 * i + 1) as f32 / 100.0;
            let observed = count as f32 / n as f32;
            assert!(
                (observed - expected).abs() < 0.01,
                "bucket {i}: observed {observed}, expected {expected}"
            );
        }
    }

    #[test]
    fn face_forward_flips_against_incidence() {
        let n = Vec3::Z;
        // `i` pointing away from the surface keeps the normal.
        assert_eq!(face_forward(Vec3::new(0.3, 0.0, 0.8), n), n);
        // `i` pointing into the surface flips it.
        assert_eq!(face_forward(Vec3::new(0.3, 0.0, -0.8), n), -n);
    }

    #[test]
    fn tangent_basis_is_orthonormal() {
        let normals = [
            Vec3::Z,
            -Vec3::Z,
            Vec3::new(0.3, -0.5, 0.8).normalize(),
            Vec3::new(-0.9, 0.1, -0.4).normalize(),
            Vec3::X,
        ];
        for &n in &normals {
            let t = tangent_to_world(Vec3::X, n);
            let b = tangent_to_world(Vec3::Y, n);
            let up = tangent_to_world(Vec3::Z, n);

            assert!((up - n).length() < 1e-5);
            assert!((t.length() - 1.0).abs() < 1e-4);
            assert!((b.length() - 1.0).abs() < 1e-4);
            assert!(t.dot(b).abs() < 1e-4);
            assert!(t.dot(n).abs() < 1e-4);
            assert!(b.dot(n).abs() < 1e-4);
        }
    }
}
