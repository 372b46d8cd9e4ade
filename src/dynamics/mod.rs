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

use crate::cosmic::{frames, AstroError};
use crate::linalg::{UnitQuaternion, Vector3};
use snafu::{ResultExt, Snafu};

use std::fmt;

/// The per-step acceleration buffer.
pub mod accumulator;
pub use self::accumulator::*;

/// Cartesian-based two-body orbital dynamics.
pub mod orbital;
pub use self::orbital::*;

/// Solar radiation pressure models.
pub mod solarpressure;
pub use self::solarpressure::*;

/// Everything a disturbance model may read about the spacecraft when computing its contribution.
///
/// The context is a snapshot: it is built right before the disturbances are evaluated and is never
/// updated by the propagation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DisturbanceContext {
    pub position_i_m: Vector3<f64>,
    pub velocity_i_m_s: Vector3<f64>,
    /// Attitude of the spacecraft, from the inertial frame to the body frame
    pub q_i2b: UnitQuaternion<f64>,
    pub mass_kg: f64,
    pub julian_day: f64,
}

impl DisturbanceContext {
    /// Expresses an inertial vector in the body frame.
    pub fn to_body(&self, v_i: &Vector3<f64>) -> Vector3<f64> {
        frames::rotate_to_frame(&self.q_i2b, v_i)
    }

    /// Quaternion from the inertial frame to the LVLH frame of the current orbit.
    pub fn quaternion_i2lvlh(&self) -> Result<UnitQuaternion<f64>, DynamicsError> {
        frames::quaternion_i2lvlh(&self.position_i_m, &self.velocity_i_m_s)
            .context(DynamicsAstroSnafu)
    }
}

/// A perturbation model (e.g. solar radiation pressure, drag) which contributes to the acceleration of a spacecraft.
///
/// Models only ever add to the accumulator: the propagation strategy owns the two-body term.
pub trait DisturbanceModel: Send + Sync + fmt::Display {
    /// Adds the contribution of this model, given the provided context, to the accumulator.
    fn contribute(
        &self,
        ctx: &DisturbanceContext,
        acc: &mut ForceAccumulator,
    ) -> Result<(), DynamicsError>;
}

/// Dynamical model errors.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DynamicsError {
    /// A force cannot be converted to an acceleration with this mass.
    #[snafu(display("cannot convert a force to an acceleration with a mass of {mass_kg} kg"))]
    InvalidMass { mass_kg: f64 },
    /// Astrodynamics error.
    #[snafu(display("dynamical model encountered an astro error: {source}"))]
    DynamicsAstro { source: AstroError },
}
