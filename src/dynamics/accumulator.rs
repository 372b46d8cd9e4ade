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

use super::{DynamicsError, InvalidMassSnafu};
use crate::cosmic::frames::rotate_from_frame;
use crate::linalg::{UnitQuaternion, Vector3};

/// Sum of every acceleration contribution applied to a spacecraft during the current step, in the inertial frame.
///
/// Contributions are plain vector additions, so the order in which the disturbance models
/// contribute has no effect on the net acceleration.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ForceAccumulator {
    acceleration_i: Vector3<f64>,
}

impl ForceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the accumulated acceleration.
    ///
    /// Reserved to the propagation strategies which seed the buffer; disturbance models must use [Self::add_acceleration_i].
    pub fn set_acceleration_i(&mut self, acceleration_i_m_s2: Vector3<f64>) {
        self.acceleration_i = acceleration_i_m_s2;
    }

    /// Adds an inertial acceleration, in m/s^2.
    pub fn add_acceleration_i(&mut self, acceleration_i_m_s2: Vector3<f64>) {
        self.acceleration_i += acceleration_i_m_s2;
    }

    /// Adds an inertial force, in N, applied to a spacecraft of the provided mass.
    pub fn add_force_i(
        &mut self,
        force_i_n: Vector3<f64>,
        mass_kg: f64,
    ) -> Result<(), DynamicsError> {
        check_mass(mass_kg)?;
        self.acceleration_i += force_i_n / mass_kg;
        Ok(())
    }

    /// Adds a force expressed in the body frame, in N, applied to a spacecraft of the provided mass and attitude.
    pub fn add_force_b(
        &mut self,
        force_b_n: Vector3<f64>,
        q_i2b: &UnitQuaternion<f64>,
        mass_kg: f64,
    ) -> Result<(), DynamicsError> {
        self.add_force_i(rotate_from_frame(q_i2b, &force_b_n), mass_kg)
    }

    /// Net accumulated inertial acceleration, in m/s^2.
    pub fn acceleration_i(&self) -> Vector3<f64> {
        self.acceleration_i
    }

    pub fn is_zero(&self) -> bool {
        self.acceleration_i == Vector3::zeros()
    }

    /// Returns the accumulated contributions and leaves this accumulator empty.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn clear(&mut self) {
        self.acceleration_i = Vector3::zeros();
    }
}

fn check_mass(mass_kg: f64) -> Result<(), DynamicsError> {
    if mass_kg.is_finite() && mass_kg > 0.0 {
        Ok(())
    } else {
        error!("refusing to apply a force to a spacecraft of {mass_kg} kg");
        InvalidMassSnafu { mass_kg }.fail()
    }
}
