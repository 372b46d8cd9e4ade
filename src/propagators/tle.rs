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

use super::{
    AnalyticModelDegradedSnafu, InertialState, InvalidTleSnafu, PropagationError,
    UnsupportedGravityModelSnafu,
};
use crate::cosmic::{EARTH_EQUATORIAL_RADIUS_M, EARTH_FLATTENING, SECONDS_PER_DAY};
use crate::linalg::Vector3;
use crate::time::JD_J2000;
use enum_iterator::Sequence;
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

/// Gravity constants used by SGP4.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Sequence)]
#[serde(rename_all = "lowercase")]
pub enum GravityModel {
    Wgs72Old,
    Wgs72,
    Wgs84,
}

impl GravityModel {
    pub fn geopotential(&self) -> sgp4::Geopotential {
        match self {
            // Not provided by the sgp4 crate; from the reference `getgravconst` (Vallado, 2006)
            Self::Wgs72Old => sgp4::Geopotential {
                ae: 6378.135,
                ke: 0.074_366_916_1,
                j2: 0.001_082_616,
                j3: -0.000_002_538_81,
                j4: -0.000_001_655_97,
            },
            Self::Wgs72 => sgp4::WGS72,
            Self::Wgs84 => sgp4::WGS84,
        }
    }
}

impl FromStr for GravityModel {
    type Err = PropagationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wgs72old" => Ok(Self::Wgs72Old),
            "wgs72" => Ok(Self::Wgs72),
            "wgs84" => Ok(Self::Wgs84),
            _ => UnsupportedGravityModelSnafu { name: s.to_string() }.fail(),
        }
    }
}

impl fmt::Display for GravityModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Wgs72Old => write!(f, "wgs72old"),
            Self::Wgs72 => write!(f, "wgs72"),
            Self::Wgs84 => write!(f, "wgs84"),
        }
    }
}

/// The SGP4 elements and initialized constants of a two line element set.
///
/// Built once from the two lines and never mutated afterwards.
pub struct OrbitalElementRecord {
    elements: sgp4::Elements,
    constants: sgp4::Constants,
    gravity_model: GravityModel,
    epoch_jd: f64,
}

impl OrbitalElementRecord {
    /// Parses the two lines and initializes SGP4 with the provided gravity model.
    pub fn from_tle(
        line1: &str,
        line2: &str,
        gravity_model: GravityModel,
    ) -> Result<Self, PropagationError> {
        ensure!(
            !line1.trim().is_empty() && !line2.trim().is_empty(),
            InvalidTleSnafu {
                details: "empty line"
            }
        );
        let elements = sgp4::Elements::from_tle(None, line1.trim().as_bytes(), line2.trim().as_bytes())
            .map_err(|e| PropagationError::InvalidTle {
                details: format!("{e:?}"),
            })?;

        let orbit_0 = sgp4::Orbit::from_kozai_elements(
            &gravity_model.geopotential(),
            elements.inclination.to_radians(),
            elements.right_ascension.to_radians(),
            elements.eccentricity,
            elements.argument_of_perigee.to_radians(),
            elements.mean_anomaly.to_radians(),
            // rev/day to rad/min
            elements.mean_motion * PI / 720.0,
        )
        .map_err(|e| PropagationError::InvalidTle {
            details: format!("{e:?}"),
        })?;

        let constants = sgp4::Constants::new(
            gravity_model.geopotential(),
            sgp4::iau_epoch_to_sidereal_time,
            elements.epoch(),
            elements.drag_term,
            orbit_0,
        )
        .map_err(|e| PropagationError::InvalidTle {
            details: format!("{e:?}"),
        })?;

        // The sgp4 epoch is counted in Julian years since J2000
        let epoch_jd = JD_J2000 + elements.epoch() * 365.25;

        Ok(Self {
            elements,
            constants,
            gravity_model,
            epoch_jd,
        })
    }

    /// Position (m) and velocity (m/s) in the TEME frame `minutes_since_epoch` after the TLE epoch.
    pub fn propagate_minutes(
        &self,
        minutes_since_epoch: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>), PropagationError> {
        let prediction = self.constants.propagate(minutes_since_epoch).map_err(|e| {
            error!("SGP4 failed {minutes_since_epoch:.3} min after epoch: {e:?}");
            PropagationError::AnalyticModelDegraded {
                minutes_since_epoch,
                details: format!("{e:?}"),
            }
        })?;
        let position_m = Vector3::from(prediction.position) * 1e3;
        let velocity_m_s = Vector3::from(prediction.velocity) * 1e3;

        // SGP4 may still return a state after the satellite has reentered
        let polar_radius_m = EARTH_EQUATORIAL_RADIUS_M * (1.0 - EARTH_FLATTENING);
        if !(position_m.norm() >= polar_radius_m) {
            error!(
                "SGP4 state {minutes_since_epoch:.3} min after epoch is below the surface ({:.3} km)",
                position_m.norm() * 1e-3
            );
            return AnalyticModelDegradedSnafu {
                minutes_since_epoch,
                details: format!("orbit decayed, radius is {:.3} km", position_m.norm() * 1e-3),
            }
            .fail();
        }
        Ok((position_m, velocity_m_s))
    }

    /// Julian day (UTC) of the TLE epoch.
    pub fn epoch_jd(&self) -> f64 {
        self.epoch_jd
    }

    pub fn gravity_model(&self) -> GravityModel {
        self.gravity_model
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    pub fn inclination_rad(&self) -> f64 {
        self.elements.inclination.to_radians()
    }

    pub fn raan_rad(&self) -> f64 {
        self.elements.right_ascension.to_radians()
    }

    pub fn eccentricity(&self) -> f64 {
        self.elements.eccentricity
    }

    /// Mean motion, in rad/s.
    pub fn mean_motion_rad_s(&self) -> f64 {
        self.elements.mean_motion * TAU / SECONDS_PER_DAY
    }
}

impl fmt::Debug for OrbitalElementRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("OrbitalElementRecord")
            .field("norad_id", &self.elements.norad_id)
            .field("epoch_jd", &self.epoch_jd)
            .field("gravity_model", &self.gravity_model)
            .field("inclination_deg", &self.elements.inclination)
            .field("raan_deg", &self.elements.right_ascension)
            .field("eccentricity", &self.elements.eccentricity)
            .field("mean_motion_rev_day", &self.elements.mean_motion)
            .finish()
    }
}

/// SGP4 propagation of a two line element set.
///
/// No integration happens: each call evaluates the analytic model at the requested date, so the cost
/// does not depend on the simulation step, and the output only depends on that date.
#[derive(Debug)]
pub struct Sgp4Propagation {
    record: OrbitalElementRecord,
    state: InertialState,
}

impl Sgp4Propagation {
    /// Initializes SGP4 from the two lines and evaluates it at `current_jd`.
    pub fn new(
        line1: &str,
        line2: &str,
        gravity_model: GravityModel,
        current_jd: f64,
    ) -> Result<Self, PropagationError> {
        let record = OrbitalElementRecord::from_tle(line1, line2, gravity_model)?;
        info!("SGP4 propagation of {record:?}");
        let mut me = Self {
            record,
            state: InertialState::default(),
        };
        me.propagate(current_jd)?;
        Ok(me)
    }

    pub fn propagate(&mut self, current_jd: f64) -> Result<InertialState, PropagationError> {
        let minutes_since_epoch = (current_jd - self.record.epoch_jd()) * 1_440.0;
        let (position_i_m, velocity_i_m_s) = self.record.propagate_minutes(minutes_since_epoch)?;
        self.state = InertialState::new(position_i_m, velocity_i_m_s);
        debug!("SGP4 propagation {minutes_since_epoch:.3} min after epoch");
        Ok(self.state)
    }

    pub fn state(&self) -> InertialState {
        self.state
    }

    pub fn record(&self) -> &OrbitalElementRecord {
        &self.record
    }

    /// Mean angular velocity of the orbit in the inertial frame, in rad/s: the mean motion along the orbit normal.
    pub fn mean_orbital_rate_i(&self) -> Vector3<f64> {
        let (sin_i, cos_i) = self.record.inclination_rad().sin_cos();
        let (sin_raan, cos_raan) = self.record.raan_rad().sin_cos();
        self.record.mean_motion_rad_s() * Vector3::new(sin_i * sin_raan, -sin_i * cos_raan, cos_i)
    }
}
