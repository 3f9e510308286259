//! Compile-time registry of region boundaries.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a province requires creating a TOML file in `regions/` and adding
//! a corresponding entry here.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use geo::{Area, Contains, Point, Polygon};
use invest_map_geography_models::{RegionBoundaryFile, RegionGeometry};
use rstar::{AABB, RTree, RTreeObject};

use crate::geometry::{envelope, to_polygon};
use crate::palette::{hashed_color, parse_hex_color};
use crate::{RegistryError, normalize_region_name};

/// Number of regions across all embedded boundary files. Enforced by a test.
#[cfg(test)]
const EXPECTED_REGION_COUNT: usize = 15;

/// Embedded TOML boundary files.
const REGION_TOMLS: &[(&str, &str)] = &[
    ("jawa_barat", include_str!("../regions/jawa_barat.toml")),
    ("dki_jakarta", include_str!("../regions/dki_jakarta.toml")),
];

static EMBEDDED: LazyLock<RegionRegistry> = LazyLock::new(|| {
    let files: Vec<RegionBoundaryFile> = REGION_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse region file '{name}': {e}"))
        })
        .collect();
    let registry = RegionRegistry::from_files(files)
        .unwrap_or_else(|e| panic!("Invalid embedded region data: {e}"));
    log::info!("Loaded {} region boundaries", registry.len());
    registry
});

/// Returns the process-wide registry built from the embedded boundary files.
///
/// # Panics
///
/// Panics on first use if any embedded TOML file is malformed. Since these
/// are compile-time constants, failures indicate a development error and are
/// caught by the tests in this module.
#[must_use]
pub fn embedded() -> &'static RegionRegistry {
    &EMBEDDED
}

/// A registered region: its boundary, fill color, and province.
#[derive(Debug, Clone)]
pub struct RegionEntry {
    /// Closed boundary ring.
    pub geometry: RegionGeometry,
    /// Fill color (`#rrggbb`), explicit or hashed.
    pub color: String,
    /// Province the region belongs to.
    pub province: String,
}

/// A region polygon stored in the R-tree for point lookups.
struct IndexedRegion {
    key: String,
    area: f64,
    envelope: AABB<[f64; 2]>,
    polygon: Polygon<f64>,
}

impl RTreeObject for IndexedRegion {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Immutable region name → boundary lookup.
pub struct RegionRegistry {
    entries: BTreeMap<String, RegionEntry>,
    index: RTree<IndexedRegion>,
}

impl RegionRegistry {
    /// Builds a registry from parsed boundary files.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if a boundary is degenerate, a color is
    /// malformed, or two entries share a name.
    pub fn from_files(
        files: impl IntoIterator<Item = RegionBoundaryFile>,
    ) -> Result<Self, RegistryError> {
        let mut entries = BTreeMap::new();
        let mut indexed = Vec::new();

        for file in files {
            for def in file.regions {
                let key = normalize_region_name(&def.name);
                if entries.contains_key(&key) {
                    return Err(RegistryError::Duplicate { region: def.name });
                }

                let color = match def.color {
                    Some(color) if parse_hex_color(&color).is_some() => color.to_lowercase(),
                    Some(color) => {
                        return Err(RegistryError::InvalidColor {
                            region: def.name,
                            color,
                        });
                    }
                    None => hashed_color(&def.name).to_string(),
                };

                let Some(geometry) = RegionGeometry::closed(def.name.trim(), def.boundary) else {
                    return Err(RegistryError::InvalidGeometry { region: def.name });
                };

                let polygon = to_polygon(&geometry);
                indexed.push(IndexedRegion {
                    key: key.clone(),
                    area: polygon.unsigned_area(),
                    envelope: envelope(&polygon),
                    polygon,
                });

                entries.insert(
                    key,
                    RegionEntry {
                        geometry,
                        color,
                        province: file.province.clone(),
                    },
                );
            }
        }

        Ok(Self {
            entries,
            index: RTree::bulk_load(indexed),
        })
    }

    /// Builds a registry from a single TOML boundary file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the TOML is malformed or any region is
    /// invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, RegistryError> {
        let file: RegionBoundaryFile = toml::de::from_str(toml_str)?;
        Self::from_files([file])
    }

    /// Number of registered regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no regions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a region entry by name (case- and whitespace-insensitive).
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&RegionEntry> {
        self.entries.get(&normalize_region_name(name))
    }

    /// Looks up a region's boundary. `None` means "nothing to draw".
    #[must_use]
    pub fn geometry(&self, name: &str) -> Option<&RegionGeometry> {
        self.entry(name).map(|e| &e.geometry)
    }

    /// Returns the fill color for a region. Unregistered regions still get
    /// a stable hashed color.
    #[must_use]
    pub fn color(&self, name: &str) -> String {
        self.entry(name).map_or_else(
            || hashed_color(name).to_string(),
            |e| e.color.clone(),
        )
    }

    /// Iterates over registered region names in normalized-name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.geometry.name.as_str())
    }

    /// Finds the region containing a point.
    ///
    /// When boundaries overlap (a city enclosed by its regency), the
    /// smallest containing region wins.
    #[must_use]
    pub fn locate(&self, lat: f64, lon: f64) -> Option<&str> {
        let point = Point::new(lon, lat);
        let query_env = AABB::from_point([lon, lat]);

        let mut best: Option<&IndexedRegion> = None;

        for candidate in self.index.locate_in_envelope_intersecting(&query_env) {
            if candidate.polygon.contains(&point) {
                match best {
                    None => best = Some(candidate),
                    Some(current) if candidate.area < current.area => best = Some(candidate),
                    _ => {}
                }
            }
        }

        best.and_then(|c| self.entries.get(&c.key))
            .map(|e| e.geometry.name.as_str())
    }
}

impl std::fmt::Debug for RegionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionRegistry")
            .field("regions", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PALETTE;

    #[test]
    fn loads_all_regions() {
        let registry = embedded();
        assert_eq!(
            registry.len(),
            EXPECTED_REGION_COUNT,
            "Expected {EXPECTED_REGION_COUNT} regions, found {}. \
             Update EXPECTED_REGION_COUNT after adding/removing regions.",
            registry.len()
        );
    }

    #[test]
    fn all_regions_are_closed_polygons() {
        let registry = embedded();
        for name in registry.names() {
            let geom = registry.geometry(name).unwrap();
            assert!(geom.is_closed(), "Region {name} is not closed");
            assert!(
                geom.vertex_count() >= 3,
                "Region {name} has {} vertices",
                geom.vertex_count()
            );
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = embedded();
        assert!(registry.geometry("KOTA BANDUNG").is_some());
        assert!(registry.geometry("kota  bandung").is_some());
    }

    #[test]
    fn unknown_region_has_no_geometry_but_a_color() {
        let registry = embedded();
        assert!(registry.geometry("Kabupaten Atlantis").is_none());
        let color = registry.color("Kabupaten Atlantis");
        assert!(PALETTE.contains(&color.as_str()));
    }

    #[test]
    fn explicit_color_wins_over_hash() {
        assert_eq!(embedded().color("Kota Bandung"), "#1f77b4");
    }

    #[test]
    fn locate_prefers_smallest_region() {
        let registry = embedded();
        assert_eq!(registry.locate(-6.917, 107.619), Some("Kota Bandung"));
        // Depok lies inside the Kabupaten Bogor box.
        assert_eq!(registry.locate(-6.40, 106.80), Some("Kota Depok"));
        assert_eq!(registry.locate(-6.70, 106.50), Some("Kabupaten Bogor"));
        assert_eq!(registry.locate(0.0, 0.0), None);
    }

    #[test]
    fn rejects_duplicate_names() {
        let toml_str = r#"
            province = "Test"

            [[regions]]
            name = "Kota A"
            boundary = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]]

            [[regions]]
            name = "KOTA A"
            boundary = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]]
        "#;
        assert!(matches!(
            RegionRegistry::from_toml_str(toml_str),
            Err(RegistryError::Duplicate { .. })
        ));
    }

    #[test]
    fn rejects_bad_color_and_geometry() {
        let bad_color = r#"
            province = "Test"

            [[regions]]
            name = "Kota A"
            color = "red"
            boundary = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]]
        "#;
        assert!(matches!(
            RegionRegistry::from_toml_str(bad_color),
            Err(RegistryError::InvalidColor { .. })
        ));

        let bad_geometry = r#"
            province = "Test"

            [[regions]]
            name = "Kota A"
            boundary = [[0.0, 0.0], [0.0, 1.0]]
        "#;
        assert!(matches!(
            RegionRegistry::from_toml_str(bad_geometry),
            Err(RegistryError::InvalidGeometry { .. })
        ));
    }
}
