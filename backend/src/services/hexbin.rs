//! Hexagonal binning of household locations for the map page.
//!
//! Cells are pointy-top hexagons in axial coordinates. Longitudes are scaled
//! by the cosine of a reference latitude first, so cells cover roughly equal
//! ground distance east-west and north-south at Danish latitudes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// A weighted location.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPoint {
    pub lon: f64,
    pub lat: f64,
    pub weight: f64,
}

/// One populated hexagon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexCell {
    pub q: i64,
    pub r: i64,
    pub center_lon: f64,
    pub center_lat: f64,
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
}

/// Hexagon grid of a given radius (centre to corner, degrees of latitude).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HexGrid {
    radius: f64,
    lon_scale: f64,
}

impl HexGrid {
    /// `None` for a non-positive radius.
    pub fn new(radius: f64, reference_lat: f64) -> Option<Self> {
        if !(radius > 0.0) {
            return None;
        }
        let lon_scale = reference_lat.to_radians().cos().abs().max(1e-6);
        Some(Self { radius, lon_scale })
    }

    /// Axial `(q, r)` of the cell containing a location.
    pub fn cell_of(&self, lon: f64, lat: f64) -> (i64, i64) {
        let x = lon * self.lon_scale;
        let y = lat;
        let q = (SQRT_3 / 3.0 * x - y / 3.0) / self.radius;
        let r = (2.0 / 3.0 * y) / self.radius;
        cube_round(q, r)
    }

    /// `(lon, lat)` of a cell centre.
    pub fn center(&self, q: i64, r: i64) -> (f64, f64) {
        let (q, r) = (q as f64, r as f64);
        let x = self.radius * SQRT_3 * (q + r / 2.0);
        let y = self.radius * 1.5 * r;
        (x / self.lon_scale, y)
    }
}

fn cube_round(q: f64, r: f64) -> (i64, i64) {
    let s = -q - r;
    let (mut rq, mut rr, rs) = (q.round(), r.round(), s.round());
    let (dq, dr, ds) = ((rq - q).abs(), (rr - r).abs(), (rs - s).abs());
    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    (rq as i64, rr as i64)
}

/// Bucket points into hexagons. The reference latitude is the mean latitude
/// of the input. Cells are returned in axial order.
pub fn hexbin(points: &[WeightedPoint], radius: f64) -> Vec<HexCell> {
    if points.is_empty() {
        return Vec::new();
    }
    let reference_lat = points.iter().map(|p| p.lat).sum::<f64>() / points.len() as f64;
    let Some(grid) = HexGrid::new(radius, reference_lat) else {
        return Vec::new();
    };

    let mut cells: BTreeMap<(i64, i64), (usize, f64)> = BTreeMap::new();
    for p in points {
        let entry = cells.entry(grid.cell_of(p.lon, p.lat)).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += p.weight;
    }

    cells
        .into_iter()
        .map(|((q, r), (count, sum))| {
            let (center_lon, center_lat) = grid.center(q, r);
            HexCell {
                q,
                r,
                center_lon,
                center_lat,
                count,
                sum,
                mean: sum / count as f64,
            }
        })
        .collect()
}
