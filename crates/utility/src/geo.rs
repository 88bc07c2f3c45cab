use std::f64::consts::{FRAC_PI_2, PI};

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
pub const EARTH_RADIUS_KM: f64 = EARTH_RADIUS_METERS / 1000.0;

/// Outward padding of every bounding box edge, in degrees (roughly 0.1 m).
const BOX_PADDING_DEGREES: f64 = 1e-6;

/// Wraps a longitude (or longitude difference) into `[-180, 180)`.
pub fn normalize_longitude(degrees: f64) -> f64 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

/// Great-circle distance in meters between two WGS84 positions.
///
/// Uses the haversine formula on a sphere with the mean earth radius. The
/// longitude difference is normalized first, so positions on both sides of
/// the antimeridian are treated as neighbours.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = latitude_1.to_radians();
    let lat2_rad = latitude_2.to_radians();

    let dlat = (latitude_2 - latitude_1).to_radians();
    let dlon = normalize_longitude(longitude_2 - longitude_1).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    // rounding may push h marginally outside [0, 1] for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// A latitude/longitude rectangle in degrees.
///
/// If `min_lon > max_lon` the box crosses the antimeridian and covers the
/// longitudes `[min_lon, 180]` and `[-180, max_lon]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lon > self.max_lon
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        if latitude < self.min_lat || latitude > self.max_lat {
            return false;
        }
        if self.crosses_antimeridian() {
            longitude >= self.min_lon || longitude <= self.max_lon
        } else {
            longitude >= self.min_lon && longitude <= self.max_lon
        }
    }
}

/// Computes a rectangle containing every position within `radius_km` of the
/// given center.
///
/// A flat `radius_km / 111.32` degree estimate is not used: one degree on the
/// 6371 km sphere is only 111.195 km, and `1 / cos(lat)` understates the
/// longitude extent of a circle, so that estimate misses positions near the
/// edge of the radius.
///
/// The bounds are the exact extent of the spherical cap (latitude ± angular
/// radius, longitude bounded by the tangent meridians), padded slightly so
/// that no position inside the radius is ever excluded. If the cap contains a
/// pole, the longitude range spans the whole globe. Longitude bounds beyond
/// ±180° are wrapped, yielding a box that crosses the antimeridian.
pub fn calculate_bounding_box(
    latitude: f64,
    longitude: f64,
    radius_km: f64,
) -> BoundingBox {
    let angular_radius = radius_km.max(0.0) / EARTH_RADIUS_KM;
    let lat_rad = latitude.to_radians();

    let min_lat_rad = lat_rad - angular_radius;
    let max_lat_rad = lat_rad + angular_radius;

    let min_lat = (min_lat_rad.to_degrees() - BOX_PADDING_DEGREES).max(-90.0);
    let max_lat = (max_lat_rad.to_degrees() + BOX_PADDING_DEGREES).min(90.0);

    // pole inside the cap: every meridian passes through it
    if angular_radius >= PI || max_lat_rad >= FRAC_PI_2 || min_lat_rad <= -FRAC_PI_2 {
        return BoundingBox {
            min_lat,
            max_lat,
            min_lon: -180.0,
            max_lon: 180.0,
        };
    }

    let ratio = angular_radius.sin() / lat_rad.cos();
    if ratio >= 1.0 - 1e-12 {
        return BoundingBox {
            min_lat,
            max_lat,
            min_lon: -180.0,
            max_lon: 180.0,
        };
    }
    let delta_lon = ratio.asin().to_degrees() + BOX_PADDING_DEGREES;

    let mut min_lon = longitude - delta_lon;
    let mut max_lon = longitude + delta_lon;
    if max_lon - min_lon >= 360.0 {
        min_lon = -180.0;
        max_lon = 180.0;
    } else if min_lon < -180.0 {
        min_lon += 360.0;
    } else if max_lon > 180.0 {
        max_lon -= 360.0;
    }

    BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}
