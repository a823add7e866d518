//! Summary statistics over a placed-details collection.

use crate::detail::{Detail, DetailType};
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counts details per type. Types that do not occur are omitted.
pub fn count_detail_types(details: &[Detail]) -> BTreeMap<DetailType, usize> {
    let mut counts = BTreeMap::new();
    for detail in details {
        *counts.entry(detail.detail_type).or_insert(0) += 1;
    }
    counts
}

/// Aggregate view of a finished (or interrupted) packing run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackingSummary {
    /// Area of the sheet.
    pub sheet_area: f64,
    /// Number of details per type.
    pub counts: BTreeMap<DetailType, usize>,
    /// Total area of placed details.
    pub placed_area: f64,
    /// Area of the LRP (0.0 if the collection has none).
    pub lrp_area: f64,
    /// Total area of normal boxes and endpoints.
    pub leftover_area: f64,
}

impl PackingSummary {
    /// Computes the summary of a tracked collection.
    pub fn from_details(sheet_area: f64, details: &[Detail]) -> Self {
        let mut placed_area = 0.0;
        let mut lrp_area = 0.0;
        let mut leftover_area = 0.0;
        for detail in details {
            match detail.detail_type {
                DetailType::Detail => placed_area += detail.area(),
                DetailType::Lrp => lrp_area += detail.area(),
                _ => leftover_area += detail.area(),
            }
        }
        Self {
            sheet_area,
            counts: count_detail_types(details),
            placed_area,
            lrp_area,
            leftover_area,
        }
    }

    /// Number of details of the given type.
    pub fn count(&self, detail_type: DetailType) -> usize {
        self.counts.get(&detail_type).copied().unwrap_or(0)
    }

    /// Fraction of the sheet covered by placed details.
    pub fn density(&self) -> f64 {
        if self.sheet_area > 0.0 {
            self.placed_area / self.sheet_area
        } else {
            0.0
        }
    }

    /// Share of the free area (everything but placed details) held by the LRP.
    pub fn lrp_occupancy_ratio(&self) -> f64 {
        let free = self.lrp_area + self.leftover_area;
        if free > 0.0 {
            self.lrp_area / free
        } else {
            0.0
        }
    }

    /// Difference between the sheet area and the area of all listed shapes.
    pub fn area_defect(&self) -> f64 {
        self.sheet_area - (self.placed_area + self.lrp_area + self.leftover_area)
    }

    /// Returns density as a percentage string.
    pub fn density_percent(&self) -> String {
        format!("{:.1}%", self.density() * 100.0)
    }
}

impl fmt::Display for PackingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (detail_type, count)) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': {}", detail_type, count)?;
        }
        write!(f, "}} density={}", self.density_percent())
    }
}
