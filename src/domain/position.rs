//! Sky positions stored as points in the WGS-84 reference system (SRID 4326).
//!
//! Positions are written as EWKT (`SRID=4326;POINT(lon lat)`), which PostGIS
//! accepts through `ST_GeogFromText`. A PostGIS geography column reads back
//! as hex EWKB; [`GeoPoint::parse_stored`] accepts either form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SRID_WGS84: u32 = 4326;

const WKB_POINT: u32 = 1;
const EWKB_SRID_FLAG: u32 = 0x2000_0000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(String),

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(String),

    #[error("unsupported SRID {0}, expected 4326")]
    UnsupportedSrid(u32),

    #[error("malformed point: {0}")]
    Malformed(String),
}

/// A validated point. Right ascension maps to longitude (wrapped into
/// [-180, 180]) and declination to latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoint", into = "RawPoint")]
pub struct GeoPoint {
    lon: f64,
    lat: f64,
}

#[derive(Serialize, Deserialize)]
struct RawPoint {
    lon: f64,
    lat: f64,
}

impl TryFrom<RawPoint> for GeoPoint {
    type Error = PositionError;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        Self::new(raw.lon, raw.lat)
    }
}

impl From<GeoPoint> for RawPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            lon: point.lon,
            lat: point.lat,
        }
    }
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Result<Self, PositionError> {
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(PositionError::LongitudeOutOfRange(lon.to_string()));
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(PositionError::LatitudeOutOfRange(lat.to_string()));
        }
        Ok(Self { lon, lat })
    }

    /// Builds a point from equatorial coordinates in degrees.
    pub fn from_equatorial(ra_deg: f64, dec_deg: f64) -> Result<Self, PositionError> {
        if !ra_deg.is_finite() {
            return Err(PositionError::LongitudeOutOfRange(ra_deg.to_string()));
        }
        let wrapped = ra_deg.rem_euclid(360.0);
        let lon = if wrapped > 180.0 {
            wrapped - 360.0
        } else {
            wrapped
        };
        Self::new(lon, dec_deg)
    }

    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.lon
    }

    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Right ascension in [0, 360).
    #[must_use]
    pub fn ra(&self) -> f64 {
        self.lon.rem_euclid(360.0)
    }

    #[must_use]
    pub const fn dec(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub fn to_ewkt(&self) -> String {
        format!("SRID={SRID_WGS84};POINT({} {})", self.lon, self.lat)
    }

    /// Parses EWKT, or plain WKT which is assumed to be SRID 4326.
    pub fn parse_ewkt(input: &str) -> Result<Self, PositionError> {
        let input = input.trim();

        let wkt = match input.split_once(';') {
            Some((srid, rest)) => {
                let srid = srid
                    .trim()
                    .strip_prefix("SRID=")
                    .ok_or_else(|| PositionError::Malformed(input.to_string()))?
                    .parse::<u32>()
                    .map_err(|_| PositionError::Malformed(input.to_string()))?;
                if srid != SRID_WGS84 {
                    return Err(PositionError::UnsupportedSrid(srid));
                }
                rest.trim()
            }
            None => input,
        };

        let body = wkt
            .strip_prefix("POINT")
            .map(str::trim_start)
            .and_then(|s| s.strip_prefix('('))
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| PositionError::Malformed(input.to_string()))?;

        let mut coords = body.split_whitespace().map(str::parse::<f64>);
        match (coords.next(), coords.next(), coords.next()) {
            (Some(Ok(lon)), Some(Ok(lat)), None) => Self::new(lon, lat),
            _ => Err(PositionError::Malformed(input.to_string())),
        }
    }
}

impl GeoPoint {
    /// Parses hex-encoded (E)WKB as printed by PostGIS for a 2D point.
    pub fn parse_ewkb_hex(input: &str) -> Result<Self, PositionError> {
        let malformed = || PositionError::Malformed(input.to_string());

        let bytes = hex::decode(input.trim()).map_err(|_| malformed())?;
        let (&order, body) = bytes.split_first().ok_or_else(malformed)?;
        let little_endian = match order {
            0 => false,
            1 => true,
            _ => return Err(malformed()),
        };
        let mut reader = WkbReader {
            bytes: body,
            little_endian,
        };

        let geometry_type = reader.u32().ok_or_else(malformed)?;
        if geometry_type & !EWKB_SRID_FLAG != WKB_POINT {
            return Err(malformed());
        }
        if geometry_type & EWKB_SRID_FLAG != 0 {
            let srid = reader.u32().ok_or_else(malformed)?;
            if srid != SRID_WGS84 {
                return Err(PositionError::UnsupportedSrid(srid));
            }
        }

        let lon = reader.f64().ok_or_else(malformed)?;
        let lat = reader.f64().ok_or_else(malformed)?;
        if !reader.bytes.is_empty() {
            return Err(malformed());
        }

        Self::new(lon, lat)
    }

    /// Parses a stored column value: hex EWKB from PostGIS, EWKT otherwise.
    pub fn parse_stored(input: &str) -> Result<Self, PositionError> {
        let trimmed = input.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            Self::parse_ewkb_hex(trimmed)
        } else {
            Self::parse_ewkt(trimmed)
        }
    }
}

struct WkbReader<'a> {
    bytes: &'a [u8],
    little_endian: bool,
}

impl WkbReader<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let (head, tail) = self.bytes.split_first_chunk::<N>()?;
        self.bytes = tail;
        Some(*head)
    }

    fn u32(&mut self) -> Option<u32> {
        let raw = self.take::<4>()?;
        Some(if self.little_endian {
            u32::from_le_bytes(raw)
        } else {
            u32::from_be_bytes(raw)
        })
    }

    fn f64(&mut self) -> Option<f64> {
        let raw = self.take::<8>()?;
        Some(if self.little_endian {
            f64::from_le_bytes(raw)
        } else {
            f64::from_be_bytes(raw)
        })
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ewkt())
    }
}

impl FromStr for GeoPoint {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_ewkt(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ewkt_round_trip() {
        let point = GeoPoint::new(-83.6, 22.01).unwrap();
        let text = point.to_ewkt();
        assert_eq!(text, "SRID=4326;POINT(-83.6 22.01)");
        assert_eq!(GeoPoint::parse_ewkt(&text).unwrap(), point);
    }

    #[test]
    fn test_parse_plain_wkt() {
        let point: GeoPoint = "POINT (10.5 -45)".parse().unwrap();
        assert!((point.lon() - 10.5).abs() < f64::EPSILON);
        assert!((point.lat() + 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_other_srid() {
        assert_eq!(
            GeoPoint::parse_ewkt("SRID=3857;POINT(1 2)").unwrap_err(),
            PositionError::UnsupportedSrid(3857)
        );
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(GeoPoint::parse_ewkt("POINT(1)").is_err());
        assert!(GeoPoint::parse_ewkt("POINT(1 2 3)").is_err());
        assert!(GeoPoint::parse_ewkt("LINESTRING(1 2, 3 4)").is_err());
        assert!(GeoPoint::parse_ewkt("SRID=abc;POINT(1 2)").is_err());
    }

    #[test]
    fn test_parse_postgis_ewkb() {
        // SRID=4326;POINT(1 2), little endian
        let point = GeoPoint::parse_ewkb_hex("0101000020E6100000000000000000F03F0000000000000040")
            .unwrap();
        assert_eq!(point, GeoPoint::new(1.0, 2.0).unwrap());

        // POINT(1 2), big endian, no SRID
        let point =
            GeoPoint::parse_ewkb_hex("00000000013FF00000000000004000000000000000").unwrap();
        assert_eq!(point, GeoPoint::new(1.0, 2.0).unwrap());
    }

    #[test]
    fn test_ewkb_rejections() {
        // SRID 3857
        assert_eq!(
            GeoPoint::parse_ewkb_hex("0101000020110F0000000000000000F03F0000000000000040")
                .unwrap_err(),
            PositionError::UnsupportedSrid(3857)
        );
        // LineString type
        assert!(GeoPoint::parse_ewkb_hex("0102000020E6100000").is_err());
        // Truncated
        assert!(GeoPoint::parse_ewkb_hex("0101000020E6100000000000000000F03F").is_err());
        assert!(GeoPoint::parse_ewkb_hex("zz").is_err());
    }

    #[test]
    fn test_parse_stored_accepts_both_forms() {
        let expected = GeoPoint::new(1.0, 2.0).unwrap();
        assert_eq!(
            GeoPoint::parse_stored("SRID=4326;POINT(1 2)").unwrap(),
            expected
        );
        assert_eq!(
            GeoPoint::parse_stored("0101000020E6100000000000000000F03F0000000000000040").unwrap(),
            expected
        );
        assert!(GeoPoint::parse_stored("").is_err());
    }

    #[test]
    fn test_range_validation() {
        assert!(GeoPoint::new(181.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -90.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_equatorial_wraps_right_ascension() {
        let point = GeoPoint::from_equatorial(270.0, 30.0).unwrap();
        assert!((point.lon() + 90.0).abs() < 1e-9);
        assert!((point.ra() - 270.0).abs() < 1e-9);
        assert!((point.dec() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_serde_validates() {
        let point: GeoPoint = serde_json::from_str(r#"{"lon": 12.0, "lat": 5.0}"#).unwrap();
        assert_eq!(point, GeoPoint::new(12.0, 5.0).unwrap());
        assert!(serde_json::from_str::<GeoPoint>(r#"{"lon": 12.0, "lat": 95.0}"#).is_err());
    }
}
