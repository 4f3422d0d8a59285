//! Directions for new bonds around an atom.
//!
//! The existing bonds of an atom split the full turn into gaps. New bonds go
//! into the widest gap: a single new bond bisects it, a pair splits it into
//! equal thirds so both sit symmetrically about the bisector. This gives the
//! evenly splayed drawings chemists expect (120° zig-zags, a methylene's two
//! hydrogens fanned away from the chain).

use std::f64::consts::{PI, TAU};

use crate::point::normalize_angle;

/// Direction of the first bond drawn from a bare atom.
pub const DEFAULT_ANGLE: f64 = PI / 6.0;

/// Angles closer than this are treated as the same direction.
const EPSILON: f64 = 1e-6;

/// An empty angular sector between two consecutive bonds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub start: f64,
    pub width: f64,
}

impl Gap {
    pub fn bisector(&self) -> f64 {
        normalize_angle(self.start + self.width / 2.0)
    }
}

/// Gaps between the given bond directions, sorted by start angle and
/// including the gap that wraps past zero. Coinciding directions count once.
pub fn gaps(existing: &[f64]) -> Vec<Gap> {
    let mut angles: Vec<f64> = existing.iter().map(|&a| normalize_angle(a)).collect();
    angles.sort_by(f64::total_cmp);
    angles.dedup_by(|later, earlier| (*later - *earlier).abs() < EPSILON);
    if angles.len() > 1 && angles[0] + TAU - angles[angles.len() - 1] < EPSILON {
        angles.pop();
    }

    let n = angles.len();
    (0..n)
        .map(|i| {
            let start = angles[i];
            let end = if i + 1 < n { angles[i + 1] } else { angles[0] + TAU };
            Gap {
                start,
                width: end - start,
            }
        })
        .collect()
}

/// The widest gap; on a tie, the one starting at the smallest angle.
fn widest(gaps: &[Gap]) -> Option<Gap> {
    let mut best: Option<Gap> = None;
    for &gap in gaps {
        match best {
            Some(b) if gap.width <= b.width + EPSILON => {}
            _ => best = Some(gap),
        }
    }
    best
}

/// Angle between two directions, in `[0, π]`.
pub fn separation(a: f64, b: f64) -> f64 {
    let d = normalize_angle(a - b);
    if d > PI {
        TAU - d
    } else {
        d
    }
}

/// Direction for one new bond.
///
/// ```
/// use molsketch::placement::place_one;
/// use std::f64::consts::PI;
///
/// // A single bond pointing right gets its partner pointing left.
/// assert!((place_one(&[0.0]) - PI).abs() < 1e-12);
/// ```
pub fn place_one(existing: &[f64]) -> f64 {
    match widest(&gaps(existing)) {
        Some(gap) => gap.bisector(),
        None => DEFAULT_ANGLE,
    }
}

/// Directions for two new bonds, or `None` when the widest gap is not
/// unique (for example two bonds already pointing in opposite directions),
/// in which case no placement is better than another and nothing should
/// be added.
pub fn place_two(existing: &[f64]) -> Option<[f64; 2]> {
    let gaps = gaps(existing);
    let Some(gap) = widest(&gaps) else {
        return Some([DEFAULT_ANGLE, normalize_angle(DEFAULT_ANGLE + PI)]);
    };
    let ties = gaps
        .iter()
        .filter(|g| (g.width - gap.width).abs() <= EPSILON)
        .count();
    if ties > 1 {
        return None;
    }
    let third = gap.width / 3.0;
    Some([
        normalize_angle(gap.start + third),
        normalize_angle(gap.start + 2.0 * third),
    ])
}
