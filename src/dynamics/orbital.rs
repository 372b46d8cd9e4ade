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

use crate::cosmic::EARTH_GM_M3_S2;
use crate::linalg::{Vector3, Vector6};
use std::fmt;

/// `OrbitalDynamics` provides the equations of motion of a point mass orbiting the Earth,
/// with any additional perturbation provided as an inertial acceleration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrbitalDynamics {
    /// Gravitational parameter of the central body, in m^3/s^2
    pub gm_m3_s2: f64,
}

impl OrbitalDynamics {
    /// Two body dynamics around the Earth.
    pub fn two_body() -> Self {
        Self::new(EARTH_GM_M3_S2)
    }

    pub fn new(gm_m3_s2: f64) -> Self {
        Self { gm_m3_s2 }
    }

    /// Point mass gravity acceleration at the provided inertial position.
    pub fn acceleration(&self, position_i_m: &Vector3<f64>) -> Vector3<f64> {
        -self.gm_m3_s2 / position_i_m.norm().powi(3) * position_i_m
    }

    /// Time derivative of the [position, velocity] state vector.
    pub fn eom(&self, state: &Vector6<f64>, perturbation_i_m_s2: &Vector3<f64>) -> Vector6<f64> {
        let radius = state.fixed_rows::<3>(0).into_owned();
        let velocity = state.fixed_rows::<3>(3).into_owned();
        let body_acceleration = self.acceleration(&radius) + perturbation_i_m_s2;
        Vector6::from_iterator(velocity.iter().chain(body_acceleration.iter()).cloned())
    }
}

impl Default for OrbitalDynamics {
    fn default() -> Self {
        Self::two_body()
    }
}

impl fmt::Display for OrbitalDynamics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "two body dynamics (GM = {:e} m^3/s^2)", self.gm_m3_s2)
    }
}

/// Packs a position and velocity into a single state vector.
pub fn pack_state(position: &Vector3<f64>, velocity: &Vector3<f64>) -> Vector6<f64> {
    Vector6::from_iterator(position.iter().chain(velocity.iter()).cloned())
}

/// Splits a state vector into its position and velocity.
pub fn unpack_state(state: &Vector6<f64>) -> (Vector3<f64>, Vector3<f64>) {
    (
        state.fixed_rows::<3>(0).into_owned(),
        state.fixed_rows::<3>(3).into_owned(),
    )
}
