//! Axis-aligned rectangles produced and consumed by the packing engine.

use nalgebra::Point2;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Classification of a rectangle on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DetailType {
    /// A placed detail from the input stream.
    #[cfg_attr(feature = "serde", serde(rename = "detail"))]
    Detail,
    /// The large rectangular piece (unassigned sheet area).
    #[cfg_attr(feature = "serde", serde(rename = "lrp"))]
    Lrp,
    /// Normal box left by a stripe cut from the LRP.
    #[cfg_attr(feature = "serde", serde(rename = "normal_box_1"))]
    NormalBox1,
    /// Normal box left by a stripe taken from the box pool.
    #[cfg_attr(feature = "serde", serde(rename = "normal_box_2"))]
    NormalBox2,
    /// Endpoint whose lineage runs only through the LRP and `endpoint_1` shapes.
    #[cfg_attr(feature = "serde", serde(rename = "endpoint_1"))]
    Endpoint1,
    /// Endpoint whose lineage passed through a pooled normal box.
    #[cfg_attr(feature = "serde", serde(rename = "endpoint_2"))]
    Endpoint2,
}

impl DetailType {
    /// All detail types, in declaration order.
    pub const ALL: [DetailType; 6] = [
        DetailType::Detail,
        DetailType::Lrp,
        DetailType::NormalBox1,
        DetailType::NormalBox2,
        DetailType::Endpoint1,
        DetailType::Endpoint2,
    ];

    /// Returns the canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailType::Detail => "detail",
            DetailType::Lrp => "lrp",
            DetailType::NormalBox1 => "normal_box_1",
            DetailType::NormalBox2 => "normal_box_2",
            DetailType::Endpoint1 => "endpoint_1",
            DetailType::Endpoint2 => "endpoint_2",
        }
    }

    /// Parses a canonical name back into a type.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == name)
    }

    /// Returns true for normal boxes of either lineage.
    pub fn is_normal_box(&self) -> bool {
        matches!(self, DetailType::NormalBox1 | DetailType::NormalBox2)
    }

    /// Returns true for endpoints of either lineage.
    pub fn is_endpoint(&self) -> bool {
        matches!(self, DetailType::Endpoint1 | DetailType::Endpoint2)
    }
}

impl fmt::Display for DetailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An axis-aligned rectangle with a name and a type tag.
///
/// Details are never mutated once built; the engine replaces them instead.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Detail {
    /// Bottom-left corner.
    pub bottom_left: Point2<f64>,
    /// Top-right corner.
    pub top_right: Point2<f64>,
    /// Identity, e.g. `S120`, `B120`, `Ep7` or `LRP`.
    pub name: String,
    /// Classification of this rectangle.
    pub detail_type: DetailType,
}

impl Detail {
    /// Creates a detail from its corners.
    pub fn new(
        bottom_left: (f64, f64),
        top_right: (f64, f64),
        name: impl Into<String>,
        detail_type: DetailType,
    ) -> Self {
        Self {
            bottom_left: Point2::new(bottom_left.0, bottom_left.1),
            top_right: Point2::new(top_right.0, top_right.1),
            name: name.into(),
            detail_type,
        }
    }

    /// Creates a whole sheet anchored at `bottom_left`, typed as the LRP.
    pub fn sheet(bottom_left: (f64, f64), width: f64, height: f64) -> Self {
        Self::new(
            bottom_left,
            (bottom_left.0 + width, bottom_left.1 + height),
            "LRP",
            DetailType::Lrp,
        )
    }

    /// Extent along the x axis.
    #[inline]
    pub fn width(&self) -> f64 {
        self.top_right.x - self.bottom_left.x
    }

    /// Extent along the y axis.
    #[inline]
    pub fn height(&self) -> f64 {
        self.top_right.y - self.bottom_left.y
    }

    /// Area of the rectangle.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Shorter side.
    #[inline]
    pub fn min_side(&self) -> f64 {
        self.width().min(self.height())
    }

    /// Longer side.
    #[inline]
    pub fn max_side(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Checks whether the interiors of two rectangles overlap.
    pub fn intersects(&self, other: &Self) -> bool {
        self.intersection_area(other) > 0.0
    }

    /// Area shared by two rectangles (0.0 if they only touch or are apart).
    pub fn intersection_area(&self, other: &Self) -> f64 {
        let dx = self.top_right.x.min(other.top_right.x)
            - self.bottom_left.x.max(other.bottom_left.x);
        let dy = self.top_right.y.min(other.top_right.y)
            - self.bottom_left.y.max(other.bottom_left.y);
        if dx <= 0.0 || dy <= 0.0 {
            0.0
        } else {
            dx * dy
        }
    }

    /// Returns true if `other` lies inside this rectangle (within `epsilon`).
    pub fn contains(&self, other: &Self, epsilon: f64) -> bool {
        other.bottom_left.x >= self.bottom_left.x - epsilon
            && other.bottom_left.y >= self.bottom_left.y - epsilon
            && other.top_right.x <= self.top_right.x + epsilon
            && other.top_right.y <= self.top_right.y + epsilon
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] ({}, {}) - ({}, {})",
            self.name,
            self.detail_type,
            self.bottom_left.x,
            self.bottom_left.y,
            self.top_right.x,
            self.top_right.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dimensions() {
        let d = Detail::new((1.0, 2.0), (4.0, 3.0), "S1", DetailType::Detail);
        assert_relative_eq!(d.width(), 3.0);
        assert_relative_eq!(d.height(), 1.0);
        assert_relative_eq!(d.area(), 3.0);
        assert_relative_eq!(d.min_side(), 1.0);
        assert_relative_eq!(d.max_side(), 3.0);
    }

    #[test]
    fn test_intersection_area() {
        let a = Detail::new((0.0, 0.0), (10.0, 10.0), "a", DetailType::Detail);
        let b = Detail::new((5.0, 5.0), (15.0, 15.0), "b", DetailType::Detail);
        assert_relative_eq!(a.intersection_area(&b), 25.0);
        assert!(a.intersects(&b));

        // Touching along an edge is not an overlap
        let c = Detail::new((10.0, 0.0), (12.0, 10.0), "c", DetailType::Detail);
        assert_eq!(a.intersection_area(&c), 0.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_sheet() {
        let sheet = Detail::sheet((1.0, 1.0), 2.0, 3.0);
        assert_eq!(sheet.name, "LRP");
        assert_eq!(sheet.detail_type, DetailType::Lrp);
        assert_relative_eq!(sheet.top_right.x, 3.0);
        assert_relative_eq!(sheet.top_right.y, 4.0);
    }

    #[test]
    fn test_type_names_roundtrip() {
        for t in DetailType::ALL {
            assert_eq!(DetailType::from_name(t.as_str()), Some(t));
        }
        assert_eq!(DetailType::from_name("box"), None);
        assert!(DetailType::NormalBox2.is_normal_box());
        assert!(DetailType::Endpoint1.is_endpoint());
        assert!(!DetailType::Lrp.is_endpoint());
    }

    #[test]
    fn test_contains() {
        let outer = Detail::sheet((0.0, 0.0), 10.0, 10.0);
        let inner = Detail::new((2.0, 2.0), (10.0, 5.0), "S1", DetailType::Detail);
        assert!(outer.contains(&inner, 1e-12));
        assert!(!inner.contains(&outer, 1e-12));
    }
}
