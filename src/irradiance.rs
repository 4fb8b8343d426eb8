//! Irradiance data and the provider seam.
//!
//! The remote geospatial service itself is not part of this crate. Providers
//! either read a pre-fetched payload or report unavailability, and the engine
//! falls back to the static orientation/shading tables.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Coordinates, Profile};

/// Yield statistics per installed kWp for one site, tilt and azimuth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrradianceData {
    /// Expected annual yield (kWh per kWp).
    pub annual_yield_kwh_per_kwp: f64,
    /// Expected monthly yields (kWh per kWp), January first.
    #[serde(default)]
    pub monthly_yield_kwh_per_kwp: Vec<f64>,
    /// Aggregate system loss assumed by the provider (%).
    #[serde(default)]
    pub system_loss_pct: f64,
    #[serde(default)]
    pub tilt_deg: f64,
    #[serde(default)]
    pub azimuth_deg: f64,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl IrradianceData {
    /// Whether the payload can drive the yield model.
    pub fn is_usable(&self) -> bool {
        self.annual_yield_kwh_per_kwp.is_finite() && self.annual_yield_kwh_per_kwp > 0.0
    }

    /// Annual yield per installed Wp (kWh/Wp).
    pub fn yield_kwh_per_wp(&self) -> f64 {
        self.annual_yield_kwh_per_kwp / 1000.0
    }

    /// Converts a PVGIS `PVcalc` JSON response.
    ///
    /// Totals are normalized by the requested peak power so the result is
    /// always per kWp.
    ///
    /// # Errors
    ///
    /// Returns `IrradianceError::Malformed` if the JSON does not have the
    /// expected shape or reports a non-positive peak power.
    pub fn from_pvgis_json(raw: &str) -> Result<Self, IrradianceError> {
        let resp: PvgisResponse =
            serde_json::from_str(raw).map_err(|e| IrradianceError::Malformed(e.to_string()))?;
        let peak_kw = resp.inputs.pv_module.peak_power;
        if !(peak_kw.is_finite() && peak_kw > 0.0) {
            return Err(IrradianceError::Malformed(format!(
                "peak_power must be > 0, got {peak_kw}"
            )));
        }

        let mut monthly: Vec<(u8, f64)> = resp
            .outputs
            .monthly
            .fixed
            .iter()
            .map(|m| (m.month, m.e_m / peak_kw))
            .collect();
        monthly.sort_by_key(|(month, _)| *month);

        Ok(Self {
            annual_yield_kwh_per_kwp: resp.outputs.totals.fixed.e_y / peak_kw,
            monthly_yield_kwh_per_kwp: monthly.into_iter().map(|(_, v)| v).collect(),
            system_loss_pct: resp.inputs.pv_module.system_loss,
            tilt_deg: resp.inputs.mounting_system.fixed.slope.value,
            azimuth_deg: resp.inputs.mounting_system.fixed.azimuth.value,
            coordinates: Some(Coordinates {
                lat: resp.inputs.location.latitude,
                lon: resp.inputs.location.longitude,
            }),
        })
    }
}

#[derive(Debug, Error)]
pub enum IrradianceError {
    #[error("irradiance data unavailable")]
    Unavailable,
    #[error("cannot read irradiance payload \"{path}\": {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed irradiance payload: {0}")]
    Malformed(String),
}

/// Source of site-specific yield data.
pub trait IrradianceProvider {
    /// Returns yield statistics for the given site and panel geometry.
    ///
    /// # Errors
    ///
    /// Implementations return an error whenever data cannot be supplied; the
    /// caller treats every error as "use static factors".
    fn yield_statistics(
        &self,
        location: Coordinates,
        tilt_deg: f64,
        azimuth_deg: f64,
    ) -> Result<IrradianceData, IrradianceError>;
}

/// Provider that never has data.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIrradiance;

impl IrradianceProvider for NoIrradiance {
    fn yield_statistics(
        &self,
        _location: Coordinates,
        _tilt_deg: f64,
        _azimuth_deg: f64,
    ) -> Result<IrradianceData, IrradianceError> {
        Err(IrradianceError::Unavailable)
    }
}

/// Provider backed by a pre-fetched JSON file.
///
/// Accepts either the native [`IrradianceData`] layout or a raw PVGIS
/// response.
#[derive(Debug, Clone)]
pub struct FileIrradiance {
    path: PathBuf,
}

impl FileIrradiance {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the payload regardless of site geometry.
    ///
    /// # Errors
    ///
    /// Returns `IrradianceError::Io` if the file cannot be read and
    /// `IrradianceError::Malformed` if it matches neither layout.
    pub fn load(&self) -> Result<IrradianceData, IrradianceError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| IrradianceError::Io {
            path: self.path.clone(),
            source,
        })?;
        match serde_json::from_str::<IrradianceData>(&raw) {
            Ok(data) => Ok(data),
            Err(_) => IrradianceData::from_pvgis_json(&raw),
        }
    }
}

impl IrradianceProvider for FileIrradiance {
    fn yield_statistics(
        &self,
        _location: Coordinates,
        _tilt_deg: f64,
        _azimuth_deg: f64,
    ) -> Result<IrradianceData, IrradianceError> {
        self.load()
    }
}

/// Fetches irradiance for the profile's site once, before any product is
/// evaluated.
///
/// Returns `None` when the profile has no coordinates, the provider fails or
/// the payload is unusable. Never fails the request.
pub fn resolve_irradiance(
    provider: &dyn IrradianceProvider,
    profile: &Profile,
) -> Option<IrradianceData> {
    let location = profile.coordinates?;
    let tilt = profile.mounting.tilt_deg();
    let azimuth = profile.orientation.azimuth_deg();

    match provider.yield_statistics(location, tilt, azimuth) {
        Ok(data) if data.is_usable() => {
            debug!(
                yield_kwh_per_kwp = data.annual_yield_kwh_per_kwp,
                tilt, azimuth, "irradiance data resolved"
            );
            Some(data)
        }
        Ok(data) => {
            warn!(
                yield_kwh_per_kwp = data.annual_yield_kwh_per_kwp,
                "irradiance payload unusable, using static factors"
            );
            None
        }
        Err(IrradianceError::Unavailable) => {
            debug!("no irradiance data, using static factors");
            None
        }
        Err(e) => {
            warn!("irradiance provider failed, using static factors: {e}");
            None
        }
    }
}

// PVGIS PVcalc wire format (subset).

#[derive(Debug, Deserialize)]
struct PvgisResponse {
    inputs: PvgisInputs,
    outputs: PvgisOutputs,
}

#[derive(Debug, Deserialize)]
struct PvgisInputs {
    location: PvgisLocation,
    mounting_system: PvgisMountingSystem,
    pv_module: PvgisModule,
}

#[derive(Debug, Deserialize)]
struct PvgisLocation {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct PvgisMountingSystem {
    fixed: PvgisFixedMounting,
}

#[derive(Debug, Deserialize)]
struct PvgisFixedMounting {
    slope: PvgisValue,
    azimuth: PvgisValue,
}

#[derive(Debug, Deserialize)]
struct PvgisValue {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct PvgisModule {
    peak_power: f64,
    #[serde(default)]
    system_loss: f64,
}

#[derive(Debug, Deserialize)]
struct PvgisOutputs {
    monthly: PvgisMonthly,
    totals: PvgisTotals,
}

#[derive(Debug, Deserialize)]
struct PvgisMonthly {
    fixed: Vec<PvgisMonth>,
}

#[derive(Debug, Deserialize)]
struct PvgisMonth {
    month: u8,
    #[serde(rename = "E_m")]
    e_m: f64,
}

#[derive(Debug, Deserialize)]
struct PvgisTotals {
    fixed: PvgisTotal,
}

#[derive(Debug, Deserialize)]
struct PvgisTotal {
    #[serde(rename = "E_y")]
    e_y: f64,
}
