use serde::{Deserialize, Serialize};

use crate::errors::{HealthError, HealthResult};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> HealthResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(HealthError::Validation(format!(
                "Latitude must be between -90 and 90, got {}",
                lat
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(HealthError::Validation(format!(
                "Longitude must be between -180 and 180, got {}",
                lng
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Great-circle distance in kilometres (haversine).
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let latitudes = self.lat.to_radians().cos() * other.lat.to_radians().cos();
        let a = (d_lat / 2.0).sin().powi(2) + latitudes * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyHospital {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "doctorAvailability", default)]
    pub doctor_availability: bool,
}

impl NearbyHospital {
    pub fn position(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyHospitalsResponse {
    pub hospitals: Vec<NearbyHospital>,
}

/// Pairs each hospital with its distance from `origin`, nearest first.
pub fn nearest_first(
    origin: &Coordinates,
    hospitals: Vec<NearbyHospital>,
) -> Vec<(NearbyHospital, f64)> {
    let mut ranked: Vec<(NearbyHospital, f64)> = hospitals
        .into_iter()
        .map(|hospital| {
            let distance = origin.distance_km(&hospital.position());
            (hospital, distance)
        })
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked
}
