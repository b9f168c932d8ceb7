//! Shrake–Rupley solvent accessible surface area.

use crate::math::distance;
use std::f64::consts::PI;
use std::sync::LazyLock;

/// Solvent probe radius (Å).
pub const PROBE_RADIUS: f64 = 1.4;

const SPHERE_POINTS: usize = 256;

static UNIT_SPHERE: LazyLock<Vec<[f64; 3]>> = LazyLock::new(|| golden_spiral(SPHERE_POINTS));

/// Evenly spread points on the unit sphere.
fn golden_spiral(count: usize) -> Vec<[f64; 3]> {
    let golden_angle = PI * (3.0 - 5f64.sqrt());
    (0..count)
        .map(|k| {
            let y = 1.0 - 2.0 * (k as f64 + 0.5) / count as f64;
            let r = (1.0 - y * y).sqrt();
            let theta = golden_angle * k as f64;
            [r * theta.cos(), y, r * theta.sin()]
        })
        .collect()
}

/// Per-atom accessible area for spheres of `radii` (already including the
/// probe) centred on `positions`.
pub fn solvent_accessible_areas(positions: &[[f64; 3]], radii: &[f64]) -> Vec<f64> {
    let n = positions.len();
    let sphere = &*UNIT_SPHERE;

    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            if distance(&positions[i], &positions[j]) < radii[i] + radii[j] {
                neighbors[i].push(j);
                neighbors[j].push(i);
            }
        }
    }

    (0..n)
        .map(|i| {
            let (center, r) = (positions[i], radii[i]);
            let exposed = sphere
                .iter()
                .filter(|u| {
                    let point = [
                        center[0] + r * u[0],
                        center[1] + r * u[1],
                        center[2] + r * u[2],
                    ];
                    neighbors[i]
                        .iter()
                        .all(|&j| distance(&point, &positions[j]) >= radii[j])
                })
                .count();
            4.0 * PI * r * r * exposed as f64 / sphere.len() as f64
        })
        .collect()
}
