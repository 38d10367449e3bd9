//! Hex grid geometry with axial coordinates

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg};

/// Axial hex coordinates
///
/// The third cube coordinate is implied (`s = -q - r`) and computed on
/// demand, so `q + r + s == 0` always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i16,
    pub r: i16,
}

/// Direction vectors in axial coordinates, counter-clockwise from north.
///
/// Shield-arc indices and facing arithmetic depend on this exact order.
pub const HEX_DIRECTIONS: [Hex; 6] = [
    Hex::new(0, -1),
    Hex::new(-1, 0),
    Hex::new(-1, 1),
    Hex::new(0, 1),
    Hex::new(1, 0),
    Hex::new(1, -1),
];

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i16, r: i16) -> Self {
        Self { q, r }
    }

    /// Distance between two hexes in grid steps
    pub fn distance(self, to: Hex) -> i32 {
        let dq = (i32::from(self.q) - i32::from(to.q)).abs();
        let dr = (i32::from(self.r) - i32::from(to.r)).abs();
        let ds = (i32::from(self.q) + i32::from(self.r) - i32::from(to.q) - i32::from(to.r)).abs();
        (dq + dr + ds) / 2
    }

    /// All hexes at exactly `radius` steps from this hex.
    ///
    /// Starts at `(q + radius, r)` and walks the six edges in
    /// [`HEX_DIRECTIONS`] order, stepping before yielding. A radius of zero
    /// produces nothing.
    pub fn ring(self, radius: i16) -> Vec<Hex> {
        let mut out = Vec::with_capacity(6 * radius.max(0) as usize);
        let mut q = i32::from(self.q) + i32::from(radius);
        let mut r = i32::from(self.r);
        for dir in &HEX_DIRECTIONS {
            for _ in 0..radius {
                q += i32::from(dir.q);
                r += i32::from(dir.r);
                out.push(Hex::new(q as i16, r as i16));
            }
        }
        out
    }

    /// Index into [`HEX_DIRECTIONS`] closest to the vector from `self` to `to`.
    ///
    /// The direction vector is normalized and each component rounded to the
    /// nearest integer; when both components round to the same value the `r`
    /// component is dropped. Must not be called with `to == self`.
    pub fn direction_to(self, to: Hex) -> usize {
        let dq = f64::from(to.q) - f64::from(self.q);
        let dr = f64::from(to.r) - f64::from(self.r);
        let len = (dq * dq + dr * dr).sqrt();
        let mut dq = (dq / len).round();
        let mut dr = (dr / len).round();
        if dq == dr {
            dr = 0.0;
        }
        let (dq, dr) = (dq as i16, dr as i16);
        HEX_DIRECTIONS
            .iter()
            .position(|d| d.q == dq && d.r == dr)
            .unwrap_or(0)
    }
}

/// Direction opposite to `dir`
pub fn reverse_direction(dir: usize) -> usize {
    (dir + 3) % 6
}

impl Add for Hex {
    type Output = Hex;

    fn add(self, rhs: Hex) -> Hex {
        Hex::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl Mul<i16> for Hex {
    type Output = Hex;

    fn mul(self, k: i16) -> Hex {
        Hex::new(self.q * k, self.r * k)
    }
}

impl Neg for Hex {
    type Output = Hex;

    fn neg(self) -> Hex {
        Hex::new(-self.q, -self.r)
    }
}
