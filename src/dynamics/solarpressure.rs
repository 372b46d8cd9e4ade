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

use super::{DisturbanceContext, DisturbanceModel, DynamicsError, ForceAccumulator};
use crate::cosmic::{in_earth_shadow, solar_pressure_n_m2, sun_position_i_m};
use crate::linalg::Vector3;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// A flat surface of the spacecraft exposed to the Sun.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub area_m2: f64,
    /// Fraction of the incoming photons which are reflected, in [0, 1]
    pub reflectivity: f64,
    /// Fraction of the reflected photons which are reflected specularly, in [0, 1]
    pub specularity: f64,
    /// Outward normal in the body frame
    pub normal_b: [f64; 3],
}

impl Surface {
    fn normal(&self) -> Vector3<f64> {
        Vector3::from(self.normal_b).normalize()
    }

    /// Force exerted on this surface, in the body frame, for the provided sun direction (body frame, unit vector).
    pub fn force_b(&self, sun_dir_b: &Vector3<f64>, pressure_n_m2: f64) -> Vector3<f64> {
        let normal = self.normal();
        let cos_theta = normal.dot(sun_dir_b);
        if cos_theta <= 0.0 {
            // Not lit
            return Vector3::zeros();
        }
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let (rho, nu) = (self.reflectivity, self.specularity);

        let normal_coef = self.area_m2
            * pressure_n_m2
            * ((1.0 + rho * nu) * cos_theta.powi(2) + 2.0 / 3.0 * rho * (1.0 - nu) * cos_theta);
        let tangential_coef =
            self.area_m2 * pressure_n_m2 * (1.0 - rho * nu) * cos_theta * sin_theta;

        let tangent = if sin_theta > f64::EPSILON {
            (sun_dir_b - cos_theta * normal) / sin_theta
        } else {
            Vector3::zeros()
        };

        -(normal_coef * normal + tangential_coef * tangent)
    }
}

/// Flat plate solar radiation pressure with a cylindrical Earth shadow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolarRadiationPressure {
    pub surfaces: Vec<Surface>,
}

impl SolarRadiationPressure {
    pub fn new(surfaces: Vec<Surface>) -> Self {
        Self { surfaces }
    }

    /// Total force on the spacecraft in the body frame.
    pub fn force_b(&self, sun_dir_b: &Vector3<f64>, pressure_n_m2: f64) -> Vector3<f64> {
        self.surfaces
            .iter()
            .map(|surface| surface.force_b(sun_dir_b, pressure_n_m2))
            .sum()
    }
}

impl DisturbanceModel for SolarRadiationPressure {
    fn contribute(
        &self,
        ctx: &DisturbanceContext,
        acc: &mut ForceAccumulator,
    ) -> Result<(), DynamicsError> {
        let sun_i = sun_position_i_m(ctx.julian_day);
        if in_earth_shadow(&ctx.position_i_m, &sun_i) {
            return Ok(());
        }
        let sc_to_sun_i = sun_i - ctx.position_i_m;
        let pressure = solar_pressure_n_m2(sc_to_sun_i.norm());
        let sun_dir_b = ctx.to_body(&sc_to_sun_i.normalize());
        acc.add_force_b(self.force_b(&sun_dir_b, pressure), &ctx.q_i2b, ctx.mass_kg)
    }
}

impl fmt::Display for SolarRadiationPressure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SRP with {} flat plate(s)", self.surfaces.len())
    }
}
