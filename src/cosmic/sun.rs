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

use super::{AU_M, EARTH_EQUATORIAL_RADIUS_M, SOLAR_FLUX_W_M2, SPEED_OF_LIGHT};
use crate::linalg::Vector3;
use crate::time::JD_J2000;

/// Returns the inertial position of the Sun with respect to the Earth, in meters.
///
/// Low precision (0.01 deg) series valid between 1950 and 2050.
/// Reference: Vallado, 4th Ed., Algorithm 29 page 279.
pub fn sun_position_i_m(julian_day: f64) -> Vector3<f64> {
    let t_ut1 = (julian_day - JD_J2000) / 36_525.0;
    let mean_longitude_deg = 280.460 + 36_000.771 * t_ut1;
    let mean_anomaly = (357.529_109_2 + 35_999.050_34 * t_ut1).to_radians();
    let ecliptic_longitude = (mean_longitude_deg
        + 1.914_666_471 * mean_anomaly.sin()
        + 0.019_994_643 * (2.0 * mean_anomaly).sin())
    .to_radians();
    let distance_au = 1.000_140_612
        - 0.016_708_617 * mean_anomaly.cos()
        - 0.000_139_589 * (2.0 * mean_anomaly).cos();
    let obliquity = (23.439_291 - 0.013_004_2 * t_ut1).to_radians();

    distance_au
        * AU_M
        * Vector3::new(
            ecliptic_longitude.cos(),
            obliquity.cos() * ecliptic_longitude.sin(),
            obliquity.sin() * ecliptic_longitude.sin(),
        )
}

/// Solar radiation pressure at the provided distance from the Sun, in N/m^2.
pub fn solar_pressure_n_m2(distance_to_sun_m: f64) -> f64 {
    SOLAR_FLUX_W_M2 / SPEED_OF_LIGHT * (AU_M / distance_to_sun_m).powi(2)
}

/// Returns whether the provided inertial position is in the cylindrical shadow of the Earth.
pub fn in_earth_shadow(position_i_m: &Vector3<f64>, sun_position_i_m: &Vector3<f64>) -> bool {
    let sun_hat = sun_position_i_m.normalize();
    let along = position_i_m.dot(&sun_hat);
    along < 0.0 && (position_i_m - along * sun_hat).norm() < EARTH_EQUATORIAL_RADIUS_M
}
