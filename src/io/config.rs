/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::{ConfigError, ConfigRepr, InvalidConfigSnafu};
use crate::cosmic::{EarthRotation, EARTH_GM_M3_S2};
use crate::errors::SatDynError;
use crate::linalg::Vector3;
use crate::orbit::Orbit;
use crate::propagators::{
    CircularReference, EnckePropagation, EnckeSettings, GravityModel, KeplerPropagation,
    KeplerianElements, OrbitPropagator, PropagationMode, RelativeOrbitPropagation,
    Rk4Propagation, Rk4Settings, Sgp4Propagation, DEFAULT_RECTIFICATION_RATIO,
};
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;

fn default_true() -> bool {
    true
}

fn default_step_s() -> f64 {
    1.0
}

fn default_gm() -> f64 {
    EARTH_GM_M3_S2
}

fn default_ratio() -> f64 {
    DEFAULT_RECTIFICATION_RATIO
}

fn default_gravity_model() -> String {
    "wgs72".to_string()
}

/// Configuration of the orbit of one spacecraft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitConfig {
    /// When false, the orbit is built but never propagated
    #[serde(default = "default_true")]
    pub calculation: bool,
    pub propagation: PropagationConfig,
}

impl ConfigRepr for OrbitConfig {}

/// Strategy specific settings, selected by the `mode` key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PropagationConfig {
    Rk4(NumericalConfig),
    Sgp4(TleConfig),
    RelativeOrbit(RelativeOrbitConfig),
    Kepler(KeplerConfig),
    Encke(EnckeConfig),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NumericalConfig {
    #[serde(default = "default_step_s")]
    pub step_s: f64,
    #[serde(default = "default_gm")]
    pub gm_m3_s2: f64,
    pub position_i_m: [f64; 3],
    pub velocity_i_m_s: [f64; 3],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TleConfig {
    pub tle1: String,
    pub tle2: String,
    /// One of wgs72old, wgs72 or wgs84
    #[serde(default = "default_gravity_model")]
    pub gravity_model: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelativeOrbitConfig {
    pub reference: CircularReference,
    pub relative_position_lvlh_m: [f64; 3],
    #[serde(default)]
    pub relative_velocity_lvlh_m_s: [f64; 3],
    /// Epoch of the relative state, defaults to the construction date
    #[serde(default)]
    pub epoch_jd: Option<f64>,
}

/// Initial orbit of the Kepler strategy: either `elements`, or `position_i_m` and `velocity_i_m_s`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeplerConfig {
    #[serde(default)]
    pub elements: Option<KeplerianElements>,
    #[serde(default)]
    pub position_i_m: Option<[f64; 3]>,
    #[serde(default)]
    pub velocity_i_m_s: Option<[f64; 3]>,
    #[serde(default = "default_gm")]
    pub gm_m3_s2: f64,
    /// Epoch of the elements, defaults to the construction date
    #[serde(default)]
    pub epoch_jd: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnckeConfig {
    #[serde(default = "default_step_s")]
    pub step_s: f64,
    #[serde(default = "default_gm")]
    pub gm_m3_s2: f64,
    #[serde(default = "default_ratio")]
    pub rectification_ratio: f64,
    pub position_i_m: [f64; 3],
    pub velocity_i_m_s: [f64; 3],
}

impl PropagationConfig {
    pub fn mode(&self) -> PropagationMode {
        match self {
            Self::Rk4(_) => PropagationMode::Numerical,
            Self::Sgp4(_) => PropagationMode::AnalyticTle,
            Self::RelativeOrbit(_) => PropagationMode::RelativeOrbit,
            Self::Kepler(_) => PropagationMode::Kepler,
            Self::Encke(_) => PropagationMode::Encke,
        }
    }

    /// Builds the propagation strategy, the closed form ones being evaluated at `current_jd`.
    pub fn build(&self, current_jd: f64) -> Result<OrbitPropagator, SatDynError> {
        let propagator = match self {
            Self::Rk4(cfg) => OrbitPropagator::Rk4(Rk4Propagation::new(
                Rk4Settings::builder()
                    .step_s(cfg.step_s)
                    .gm_m3_s2(cfg.gm_m3_s2)
                    .build(),
                Vector3::from(cfg.position_i_m),
                Vector3::from(cfg.velocity_i_m_s),
            )?),
            Self::Sgp4(cfg) => OrbitPropagator::Sgp4(Box::new(Sgp4Propagation::new(
                &cfg.tle1,
                &cfg.tle2,
                cfg.gravity_model.parse::<GravityModel>()?,
                current_jd,
            )?)),
            Self::RelativeOrbit(cfg) => {
                OrbitPropagator::RelativeOrbit(RelativeOrbitPropagation::new(
                    cfg.reference,
                    Vector3::from(cfg.relative_position_lvlh_m),
                    Vector3::from(cfg.relative_velocity_lvlh_m_s),
                    cfg.epoch_jd.unwrap_or(current_jd),
                    current_jd,
                )?)
            }
            Self::Kepler(cfg) => {
                let epoch_jd = cfg.epoch_jd.unwrap_or(current_jd);
                let prop = match (cfg.elements, cfg.position_i_m, cfg.velocity_i_m_s) {
                    (Some(elements), None, None) => {
                        KeplerPropagation::new(elements, epoch_jd, current_jd)?
                    }
                    (None, Some(position), Some(velocity)) => {
                        let elements = KeplerianElements::from_cartesian(
                            &Vector3::from(position),
                            &Vector3::from(velocity),
                            cfg.gm_m3_s2,
                        )?;
                        KeplerPropagation::new(elements, epoch_jd, current_jd)?
                    }
                    _ => {
                        return Err(InvalidConfigSnafu {
                            msg: "kepler mode requires either `elements`, or both `position_i_m` and `velocity_i_m_s`",
                        }
                        .build()
                        .into())
                    }
                };
                OrbitPropagator::Kepler(prop)
            }
            Self::Encke(cfg) => {
                check_ratio(cfg.rectification_ratio)?;
                OrbitPropagator::Encke(EnckePropagation::new(
                    EnckeSettings::builder()
                        .step_s(cfg.step_s)
                        .gm_m3_s2(cfg.gm_m3_s2)
                        .rectification_ratio(cfg.rectification_ratio)
                        .build(),
                    Vector3::from(cfg.position_i_m),
                    Vector3::from(cfg.velocity_i_m_s),
                )?)
            }
        };
        Ok(propagator)
    }
}

fn check_ratio(ratio: f64) -> Result<(), ConfigError> {
    ensure!(
        ratio.is_finite() && ratio > 0.0,
        InvalidConfigSnafu {
            msg: format!("rectification ratio must be strictly positive, got {ratio}")
        }
    );
    Ok(())
}

impl OrbitConfig {
    /// Builds the orbit, deriving its Earth fixed and geodetic states at `current_jd`.
    pub fn build(
        &self,
        current_jd: f64,
        rotation: &dyn EarthRotation,
    ) -> Result<Orbit, SatDynError> {
        let propagator = self.propagation.build(current_jd)?;
        let mut orbit = Orbit::new(propagator, current_jd, rotation)?;
        orbit.set_calc_enabled(self.calculation);
        if !self.calculation {
            warn!(
                "{} orbit built with calculation disabled: it will not be propagated",
                self.propagation.mode()
            );
        }
        Ok(orbit)
    }
}
