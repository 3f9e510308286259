#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region boundary types.
//!
//! A region (city or regency) is drawn on the map as a single closed ring
//! of latitude/longitude vertices. Boundaries are authored as TOML files,
//! one per province, and deserialized into [`RegionBoundaryFile`].

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
///
/// Serialized as a `[latitude, longitude]` array, which is the order map
/// libraries such as Leaflet expect for polygon vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lon]
    }
}

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Southern latitude boundary.
    pub south: f64,
    /// Western longitude boundary.
    pub west: f64,
    /// Northern latitude boundary.
    pub north: f64,
    /// Eastern longitude boundary.
    pub east: f64,
}

impl GeoBounds {
    /// Returns the smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            north: self.north.max(other.north),
            east: self.east.max(other.east),
        }
    }
}

/// The boundary of one region as an ordered, closed ring.
///
/// The first and last vertices are always equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionGeometry {
    /// Region name as it appears in investment records.
    pub name: String,
    /// Closed ring of vertices.
    pub ring: Vec<Coordinate>,
}

impl RegionGeometry {
    /// Builds a geometry from an open or closed vertex list, closing the
    /// ring when the last vertex differs from the first.
    ///
    /// Consecutive repeated vertices are collapsed first. Returns `None` when
    /// fewer than three distinct vertices remain.
    #[must_use]
    pub fn closed(name: impl Into<String>, mut ring: Vec<Coordinate>) -> Option<Self> {
        ring.dedup();
        if ring.first().is_some() && ring.first() == ring.last() && ring.len() > 1 {
            ring.pop();
        }
        if ring.len() < 3 {
            return None;
        }
        ring.push(ring[0]);
        Some(Self {
            name: name.into(),
            ring,
        })
    }

    /// Number of distinct vertices (the closing vertex is not counted).
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.ring.len().saturating_sub(1)
    }

    /// Returns `true` if the ring's first and last vertices are equal.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.ring.len() >= 4 && self.ring.first() == self.ring.last()
    }

    /// Bounding box of the ring.
    #[must_use]
    pub fn bounds(&self) -> Option<GeoBounds> {
        let first = self.ring.first()?;
        let init = GeoBounds {
            south: first.lat,
            west: first.lon,
            north: first.lat,
            east: first.lon,
        };
        Some(self.ring.iter().fold(init, |b, c| GeoBounds {
            south: b.south.min(c.lat),
            west: b.west.min(c.lon),
            north: b.north.max(c.lat),
            east: b.east.max(c.lon),
        }))
    }
}

/// One region entry in a boundary file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDefinition {
    /// Region name as it appears in investment records.
    pub name: String,
    /// Explicit fill color (`#rrggbb`). Falls back to the hashed palette
    /// when absent.
    pub color: Option<String>,
    /// Boundary vertices as `[lat, lon]` pairs, open or closed.
    pub boundary: Vec<Coordinate>,
}

/// Normalizes a region name for lookup: trims, lowercases, and collapses
/// internal whitespace so `"KOTA  BANDUNG "` and `"Kota Bandung"` match.
#[must_use]
pub fn normalize_region_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A province's boundary file, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionBoundaryFile {
    /// Province name (e.g., "Jawa Barat").
    pub province: String,
    /// Regions within the province.
    pub regions: Vec<RegionDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(1.0, 0.0),
        ]
    }

    #[test]
    fn closes_open_ring() {
        let geom = RegionGeometry::closed("A", square()).unwrap();
        assert!(geom.is_closed());
        assert_eq!(geom.ring.len(), 5);
        assert_eq!(geom.vertex_count(), 4);
    }

    #[test]
    fn keeps_already_closed_ring() {
        let mut ring = square();
        ring.push(ring[0]);
        let geom = RegionGeometry::closed("A", ring).unwrap();
        assert_eq!(geom.ring.len(), 5);
    }

    #[test]
    fn rejects_degenerate_ring() {
        let ring = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.0, 0.0),
        ];
        assert!(RegionGeometry::closed("A", ring).is_none());
        assert!(RegionGeometry::closed("A", Vec::new()).is_none());
    }

    #[test]
    fn repeated_vertices_do_not_count() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 1.0);
        assert!(RegionGeometry::closed("A", vec![a, a, a, b]).is_none());

        let mut ring = square();
        let repeated = ring[1];
        ring.insert(1, repeated);
        let geom = RegionGeometry::closed("A", ring).unwrap();
        assert_eq!(geom.vertex_count(), 4);
    }

    #[test]
    fn bounds_cover_every_vertex() {
        let geom = RegionGeometry::closed("A", square()).unwrap();
        let b = geom.bounds().unwrap();
        assert!((b.south - 0.0).abs() < f64::EPSILON);
        assert!((b.north - 1.0).abs() < f64::EPSILON);
        assert!((b.west - 0.0).abs() < f64::EPSILON);
        assert!((b.east - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn normalize_collapses_case_and_whitespace() {
        assert_eq!(normalize_region_name("  KOTA   Bandung "), "kota bandung");
        assert_eq!(normalize_region_name("Kota Bandung"), "kota bandung");
        assert_eq!(normalize_region_name(""), "");
    }

    #[test]
    fn parses_boundary_file() {
        let toml_str = r##"
            province = "Test"

            [[regions]]
            name = "Kota Uji"
            color = "#123456"
            boundary = [[-6.0, 107.0], [-6.0, 107.1], [-6.1, 107.1]]
        "##;
        let file: RegionBoundaryFile = toml::de::from_str(toml_str).unwrap();
        assert_eq!(file.regions.len(), 1);
        assert_eq!(file.regions[0].boundary[0], Coordinate::new(-6.0, 107.0));
        assert_eq!(file.regions[0].color.as_deref(), Some("#123456"));
    }
}
