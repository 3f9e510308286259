//! Conversions between [`RegionGeometry`] and the `geo`/`geojson` types.
//!
//! `geo` works in `(x, y)` = `(longitude, latitude)` order while region
//! rings are stored as `(lat, lon)`, so every conversion goes through
//! [`to_polygon`].

use geo::{BoundingRect, LineString, Polygon};
use invest_map_geography_models::RegionGeometry;
use rstar::AABB;

/// Converts a region ring into a `geo` polygon with no interior rings.
#[must_use]
pub fn to_polygon(geometry: &RegionGeometry) -> Polygon<f64> {
    let exterior: LineString<f64> = geometry
        .ring
        .iter()
        .map(|c| (c.lon, c.lat))
        .collect::<Vec<_>>()
        .into();
    Polygon::new(exterior, vec![])
}

/// Converts a region ring into a `GeoJSON` polygon geometry.
#[must_use]
pub fn to_geojson(geometry: &RegionGeometry) -> geojson::Geometry {
    geojson::Geometry::new(geojson::Value::from(&to_polygon(geometry)))
}

/// Computes the R-tree envelope for a polygon.
pub(crate) fn envelope(polygon: &Polygon<f64>) -> AABB<[f64; 2]> {
    polygon.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}
