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

use crate::cosmic::AstroError;
use crate::dynamics::DynamicsError;
use crate::linalg::Vector3;
use enum_iterator::Sequence;
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fmt;

/// Fixed step Runge Kutta integration.
pub mod rk;
pub use self::rk::*;

mod elements;
pub use self::elements::*;

mod rk4;
pub use self::rk4::*;
mod kepler;
pub use self::kepler::*;
mod encke;
pub use self::encke::*;
mod relative;
pub use self::relative::*;
mod tle;
pub use self::tle::*;

/// The propagation strategy of an orbit, fixed at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Sequence)]
#[serde(rename_all = "snake_case")]
pub enum PropagationMode {
    /// Fixed step RK4 integration of two body gravity and the accumulated perturbations
    #[serde(rename = "rk4")]
    Numerical,
    /// SGP4 propagation of a two line element set
    #[serde(rename = "sgp4")]
    AnalyticTle,
    /// Hill-Clohessy-Wiltshire motion relative to a circular reference orbit
    RelativeOrbit,
    /// Closed form two body motion
    Kepler,
    /// Integration of the deviation from an osculating Keplerian reference
    Encke,
}

impl fmt::Display for PropagationMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Numerical => write!(f, "RK4"),
            Self::AnalyticTle => write!(f, "SGP4"),
            Self::RelativeOrbit => write!(f, "RELATIVE ORBIT"),
            Self::Kepler => write!(f, "KEPLER"),
            Self::Encke => write!(f, "ENCKE"),
        }
    }
}

/// Position and velocity in the inertial frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct InertialState {
    pub position_i_m: Vector3<f64>,
    pub velocity_i_m_s: Vector3<f64>,
}

impl InertialState {
    pub fn new(position_i_m: Vector3<f64>, velocity_i_m_s: Vector3<f64>) -> Self {
        Self {
            position_i_m,
            velocity_i_m_s,
        }
    }
}

impl fmt::Display for InertialState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "position = [{:.3}, {:.3}, {:.3}] m\tvelocity = [{:.6}, {:.6}, {:.6}] m/s",
            self.position_i_m[0],
            self.position_i_m[1],
            self.position_i_m[2],
            self.velocity_i_m_s[0],
            self.velocity_i_m_s[1],
            self.velocity_i_m_s[2]
        )
    }
}

/// The propagation strategies, each holding only the state it needs.
#[derive(Debug)]
pub enum OrbitPropagator {
    Rk4(Rk4Propagation),
    Sgp4(Box<Sgp4Propagation>),
    RelativeOrbit(RelativeOrbitPropagation),
    Kepler(KeplerPropagation),
    Encke(EnckePropagation),
}

impl OrbitPropagator {
    pub fn mode(&self) -> PropagationMode {
        match self {
            Self::Rk4(_) => PropagationMode::Numerical,
            Self::Sgp4(_) => PropagationMode::AnalyticTle,
            Self::RelativeOrbit(_) => PropagationMode::RelativeOrbit,
            Self::Kepler(_) => PropagationMode::Kepler,
            Self::Encke(_) => PropagationMode::Encke,
        }
    }

    /// Advances the strategy.
    ///
    /// The integrating strategies (RK4 and Encke) step until `end_time_s`, the elapsed simulation time,
    /// treating `acceleration_i_m_s2` as constant over the call. The closed form strategies evaluate
    /// their model at `current_jd` and ignore the acceleration.
    pub fn propagate(
        &mut self,
        end_time_s: f64,
        current_jd: f64,
        acceleration_i_m_s2: &Vector3<f64>,
    ) -> Result<InertialState, PropagationError> {
        ensure!(
            end_time_s.is_finite() && current_jd.is_finite(),
            NonFiniteTimeSnafu {
                end_time_s,
                current_jd
            }
        );
        match self {
            Self::Rk4(prop) => Ok(prop.propagate(end_time_s, acceleration_i_m_s2)),
            Self::Sgp4(prop) => prop.propagate(current_jd),
            Self::RelativeOrbit(prop) => prop.propagate(current_jd),
            Self::Kepler(prop) => prop.propagate(current_jd),
            Self::Encke(prop) => prop.propagate(end_time_s, acceleration_i_m_s2),
        }
    }

    /// The most recently computed inertial state.
    pub fn state(&self) -> InertialState {
        match self {
            Self::Rk4(prop) => prop.state(),
            Self::Sgp4(prop) => prop.state(),
            Self::RelativeOrbit(prop) => prop.state(),
            Self::Kepler(prop) => prop.state(),
            Self::Encke(prop) => prop.state(),
        }
    }

    /// Shifts the inertial position of the spacecraft. SGP4 cannot be shifted and ignores the offset.
    pub fn add_position_offset(
        &mut self,
        offset_i_m: &Vector3<f64>,
    ) -> Result<InertialState, PropagationError> {
        match self {
            Self::Rk4(prop) => prop.add_position_offset(offset_i_m),
            Self::Sgp4(prop) => {
                warn!("SGP4 propagation ignores the position offset of {offset_i_m} m");
                return Ok(prop.state());
            }
            Self::RelativeOrbit(prop) => prop.add_position_offset(offset_i_m)?,
            Self::Kepler(prop) => prop.add_position_offset(offset_i_m)?,
            Self::Encke(prop) => prop.add_position_offset(offset_i_m)?,
        }
        Ok(self.state())
    }
}

impl fmt::Display for OrbitPropagator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} propagation ({})", self.mode(), self.state())
    }
}

/// Errors raised when building or running a propagation strategy.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PropagationError {
    #[snafu(display("invalid two line element set: {details}"))]
    InvalidTle { details: String },
    #[snafu(display("unsupported gravity model `{name}` (expected wgs72old, wgs72 or wgs84)"))]
    UnsupportedGravityModel { name: String },
    #[snafu(display("analytic model degraded {minutes_since_epoch:.3} min after the TLE epoch: {details}"))]
    AnalyticModelDegraded {
        minutes_since_epoch: f64,
        details: String,
    },
    #[snafu(display("Kepler's equation did not converge after {iterations} iterations"))]
    KeplerNonConvergence { iterations: usize },
    #[snafu(display("integration step must be strictly positive and finite, got {step_s} s"))]
    InvalidStepSize { step_s: f64 },
    #[snafu(display("cannot propagate to {end_time_s} s (JD {current_jd}): times must be finite"))]
    NonFiniteTime { end_time_s: f64, current_jd: f64 },
    #[snafu(display("degenerate orbit: {details}"))]
    DegenerateOrbit { details: &'static str },
    #[snafu(display("propagation encountered an astro error: {source}"))]
    PropAstro { source: AstroError },
    #[snafu(display("propagation encountered a dynamics error: {source}"))]
    PropDynamics { source: DynamicsError },
}
