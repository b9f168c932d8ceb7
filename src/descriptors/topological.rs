//! Distance- and path-based indices of the hydrogen-suppressed graph.

use super::graph::{HeavyGraph, UNREACHABLE, count_paths, for_each_path, valence_delta};
use crate::model::molecule::Molecule;

const MAX_CHI_ORDER: usize = 5;
const CLUSTER_ORDERS: [usize; 2] = [3, 4];
const CHAIN_ORDERS: std::ops::RangeInclusive<usize> = 3..=7;

pub const INDEX_NAMES: [&str; 11] = [
    "WPath",
    "WPol",
    "Zagreb1",
    "Zagreb2",
    "BalabanJ",
    "Diameter",
    "Radius",
    "TopoShapeIndex",
    "PetitjeanIndex",
    "ABC",
    "ECIndex",
];
pub const KAPPA_NAMES: [&str; 3] = ["Kier1", "Kier2", "Kier3"];

/// Chi families in output order: path (`Xp`), averaged path (`AXp`),
/// cluster (`Xc`) and chain (`Xch`), each over simple then valence
/// deltas.
pub fn names(out: &mut Vec<String>) {
    out.extend(INDEX_NAMES.iter().map(|s| s.to_string()));
    for prefix in ["Xp", "AXp"] {
        for delta in ["d", "dv"] {
            for order in 0..=MAX_CHI_ORDER {
                out.push(format!("{prefix}-{order}{delta}"));
            }
        }
    }
    for delta in ["d", "dv"] {
        for order in CLUSTER_ORDERS {
            out.push(format!("Xc-{order}{delta}"));
        }
    }
    for delta in ["d", "dv"] {
        for order in CHAIN_ORDERS {
            out.push(format!("Xch-{order}{delta}"));
        }
    }
    out.extend(KAPPA_NAMES.iter().map(|s| s.to_string()));
}

pub fn evaluate(molecule: &Molecule, graph: &HeavyGraph, out: &mut Vec<f64>) {
    distance_indices(graph, out);
    let degrees: Vec<f64> = (0..graph.len()).map(|i| graph.degree(i) as f64).collect();
    let valence = valence_degrees(molecule, graph);

    let paths: Vec<Vec<(f64, usize)>> = [&degrees, &valence]
        .iter()
        .map(|deltas| (0..=MAX_CHI_ORDER).map(|order| chi(graph, deltas, order)).collect())
        .collect();
    for per_delta in &paths {
        out.extend(per_delta.iter().map(|&(total, _)| total));
    }
    for per_delta in &paths {
        out.extend(per_delta.iter().map(|&(total, count)| {
            if count == 0 {
                f64::NAN
            } else {
                total / count as f64
            }
        }));
    }
    for deltas in [&degrees, &valence] {
        out.extend(CLUSTER_ORDERS.map(|order| chi_cluster(graph, deltas, order)));
    }
    for deltas in [&degrees, &valence] {
        out.extend(CHAIN_ORDERS.map(|order| chi_chain(graph, deltas, order)));
    }
    kappa(graph, out);
}

fn distance_indices(graph: &HeavyGraph, out: &mut Vec<f64>) {
    let n = graph.len();
    let mut wiener = 0usize;
    let mut polarity = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            let d = graph.distances[i][j];
            if d == UNREACHABLE {
                continue;
            }
            wiener += d;
            if d == 3 {
                polarity += 1;
            }
        }
    }

    let zagreb1: usize = (0..n).map(|i| graph.degree(i).pow(2)).sum();
    let zagreb2: usize = graph
        .bonds
        .iter()
        .map(|&(i, j, _)| graph.degree(i) * graph.degree(j))
        .sum();

    let eccentricities = graph.eccentricities();
    let (diameter, radius) = if n == 0 {
        (f64::NAN, f64::NAN)
    } else {
        let max = eccentricities.iter().copied().max().unwrap_or(0);
        let min = eccentricities.iter().copied().min().unwrap_or(0);
        (max as f64, min as f64)
    };
    let shape = if radius > 0.0 {
        (diameter - radius) / radius
    } else {
        f64::NAN
    };
    let petitjean = if diameter > 0.0 {
        (diameter - radius) / diameter
    } else {
        f64::NAN
    };

    let abc: f64 = graph
        .bonds
        .iter()
        .map(|&(i, j, _)| {
            let (di, dj) = (graph.degree(i) as f64, graph.degree(j) as f64);
            ((di + dj - 2.0) / (di * dj)).sqrt()
        })
        .sum();

    let eccentric: usize = (0..n).map(|i| eccentricities[i] * graph.degree(i)).sum();

    out.extend([
        wiener as f64,
        polarity as f64,
        zagreb1 as f64,
        zagreb2 as f64,
        balaban_j(graph),
        diameter,
        radius,
        shape,
        petitjean,
        abc,
        eccentric as f64,
    ]);
}

/// `m / (μ + 1) Σ_bonds (s_i s_j)^-½` with `s` the distance sums.
fn balaban_j(graph: &HeavyGraph) -> f64 {
    let m = graph.bonds.len();
    if m == 0 {
        return f64::NAN;
    }
    let sums: Vec<f64> = graph
        .distances
        .iter()
        .map(|row| {
            row.iter()
                .filter(|&&d| d != UNREACHABLE)
                .map(|&d| d as f64)
                .sum()
        })
        .collect();
    let mu = graph.cyclomatic_number() as f64;
    let edge_sum: f64 = graph
        .bonds
        .iter()
        .map(|&(i, j, _)| (sums[i] * sums[j]).powf(-0.5))
        .sum();
    m as f64 / (mu + 1.0) * edge_sum
}

/// Kier–Hall valence delta of every heavy atom.
fn valence_degrees(molecule: &Molecule, graph: &HeavyGraph) -> Vec<f64> {
    graph
        .atoms
        .iter()
        .zip(&graph.hydrogens)
        .map(|(&idx, &h)| {
            let atom = &molecule.atoms[idx];
            valence_delta(atom.element, atom.formal_charge, h)
        })
        .collect()
}

fn inverse_root(product: f64) -> f64 {
    if product > 0.0 { product.powf(-0.5) } else { 0.0 }
}

/// Path connectivity index of the given order over per-atom `deltas`,
/// with the number of paths visited. Paths through atoms with a
/// non-positive delta add nothing.
fn chi(graph: &HeavyGraph, deltas: &[f64], order: usize) -> (f64, usize) {
    let mut total = 0.0;
    let mut count = 0;
    for_each_path(&graph.adjacency, order, |path| {
        total += inverse_root(path.iter().map(|&a| deltas[a]).product());
        count += 1;
    });
    (total, count)
}

/// Cluster connectivity: a centre with `order` of its neighbours.
fn chi_cluster(graph: &HeavyGraph, deltas: &[f64], order: usize) -> f64 {
    let mut total = 0.0;
    for centre in 0..graph.len() {
        let neighbours = &graph.adjacency[centre];
        for_each_subset(neighbours.len(), order, &mut |picked| {
            let product: f64 = picked.iter().map(|&k| deltas[neighbours[k]]).product();
            total += inverse_root(deltas[centre] * product);
        });
    }
    total
}

fn for_each_subset(n: usize, size: usize, visit: &mut impl FnMut(&[usize])) {
    fn recurse(start: usize, n: usize, size: usize, picked: &mut Vec<usize>, visit: &mut impl FnMut(&[usize])) {
        if picked.len() == size {
            visit(picked);
            return;
        }
        for k in start..n {
            picked.push(k);
            recurse(k + 1, n, size, picked, visit);
            picked.pop();
        }
    }
    if size <= n {
        recurse(0, n, size, &mut Vec::with_capacity(size), visit);
    }
}

/// Chain connectivity over every ring of `order` atoms.
///
/// A ring is found once per bond it contains, as the path left after
/// removing that bond.
fn chi_chain(graph: &HeavyGraph, deltas: &[f64], order: usize) -> f64 {
    let mut total = 0.0;
    for_each_path(&graph.adjacency, order - 1, |path| {
        let (first, last) = (path[0], path[order - 1]);
        if graph.adjacency[first].contains(&last) {
            total += inverse_root(path.iter().map(|&a| deltas[a]).product());
        }
    });
    total / order as f64
}

fn kappa(graph: &HeavyGraph, out: &mut Vec<f64>) {
    let a = graph.len() as f64;
    let p = [1, 2, 3].map(|len| count_paths(&graph.adjacency, len) as f64);
    let shape = |numerator: f64, paths: f64| {
        if paths > 0.0 {
            numerator / (paths * paths)
        } else {
            f64::NAN
        }
    };

    out.push(shape(a * (a - 1.0).powi(2), p[0]));
    out.push(shape((a - 1.0) * (a - 2.0).powi(2), p[1]));
    let third = if graph.len() % 2 == 1 {
        (a - 1.0) * (a - 3.0).powi(2)
    } else {
        (a - 3.0) * (a - 2.0).powi(2)
    };
    out.push(shape(third, p[2]));
}
