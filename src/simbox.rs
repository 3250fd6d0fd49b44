use serde::{Deserialize, Serialize};

use crate::position::{DimVec, PosDifference, Position};

fn map_into_range(p: f64, lower: f64, upper: f64) -> f64 {
    if p < lower {
        let wrapped = p + (upper - lower);
        // tiny negatives can round up onto the upper edge
        if wrapped >= upper {
            lower
        } else {
            wrapped
        }
    } else if p >= upper {
        p - (upper - lower)
    } else {
        p
    }
}

// shortest signed separation along one periodic axis of length `len`
fn min_image(d: f64, len: f64) -> f64 {
    if d > 0.5 * len {
        d - len
    } else if d < -0.5 * len {
        d + len
    } else {
        d
    }
}

/// Rectangular periodic cell spanning [0, width) x [0, height).
/// Dimensions are fixed once the lattice has been built.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimBox {
    dimensions: DimVec,
}

impl SimBox {
    pub fn new(dimensions: [f64; 2]) -> Self {
        Self {
            dimensions: DimVec::new(dimensions),
        }
    }

    pub fn square(side: f64) -> Self {
        Self::new([side, side])
    }

    pub fn dimensions(&self) -> DimVec {
        self.dimensions
    }

    pub fn width(&self) -> f64 {
        self.dimensions.x()
    }

    pub fn height(&self) -> f64 {
        self.dimensions.y()
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn min_extent(&self) -> f64 {
        self.width().min(self.height())
    }

    pub fn pos_in_box(&self, pos: Position) -> bool {
        pos.x() >= 0.0 && pos.x() < self.width() && pos.y() >= 0.0 && pos.y() < self.height()
    }

    /// Wraps each axis once. Only valid for positions less than one box length outside.
    pub fn map_pos_into_box(&self, pos: Position) -> Position {
        let x = map_into_range(pos.x(), 0.0, self.width());
        let y = map_into_range(pos.y(), 0.0, self.height());
        Position::new([x, y])
    }

    /// Minimum-image displacement p0 - p1.
    /// Each component is bounded by half the box length on that axis.
    pub fn sep_in_box(&self, p0: Position, p1: Position) -> PosDifference {
        let dx = min_image(p0.x() - p1.x(), self.width());
        let dy = min_image(p0.y() - p1.y(), self.height());
        PosDifference::new([dx, dy])
    }

    pub fn dist_sqd(&self, p0: Position, p1: Position) -> f64 {
        let sep = self.sep_in_box(p0, p1);
        sep.x() * sep.x() + sep.y() * sep.y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_image_flips_long_separations() {
        assert_eq!(min_image(6.0, 10.0), -4.0);
        assert_eq!(min_image(-6.0, 10.0), 4.0);
        assert_eq!(min_image(5.0, 10.0), 5.0);
        assert_eq!(min_image(-1.5, 10.0), -1.5);
    }

    #[test]
    fn map_into_range_wraps_once() {
        assert_eq!(map_into_range(10.5, 0.0, 10.0), 0.5);
        assert_eq!(map_into_range(-0.5, 0.0, 10.0), 9.5);
        assert_eq!(map_into_range(10.0, 0.0, 10.0), 0.0);
        assert_eq!(map_into_range(3.0, 0.0, 10.0), 3.0);
    }
}
