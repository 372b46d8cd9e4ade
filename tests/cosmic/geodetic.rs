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

extern crate pretty_env_logger as pel;

use approx::assert_abs_diff_eq;
use rstest::*;
use satdyn::cosmic::{
    AstroError, GeodeticPosition, EARTH_EQUATORIAL_RADIUS_M, EARTH_FLATTENING,
};
use satdyn::linalg::Vector3;
use std::f64::consts::FRAC_PI_2;

#[test]
fn equator_on_ellipsoid() {
    let _ = pel::try_init();
    let geo = GeodeticPosition::try_from_ecef(&Vector3::new(6_378_137.0, 0.0, 0.0)).unwrap();
    assert_abs_diff_eq!(geo.latitude_rad(), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(geo.longitude_rad(), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(geo.altitude_m(), 0.0, epsilon = 1e-6);
}

#[test]
fn north_pole() {
    let _ = pel::try_init();
    let geo = GeodeticPosition::try_from_ecef(&Vector3::new(0.0, 0.0, 6_356_752.0)).unwrap();
    assert_abs_diff_eq!(geo.latitude_rad(), FRAC_PI_2, epsilon = 1e-12);
    // Polar radius is 6356752.314 m
    let polar_radius_m = EARTH_EQUATORIAL_RADIUS_M * (1.0 - EARTH_FLATTENING);
    assert_abs_diff_eq!(geo.altitude_m(), 6_356_752.0 - polar_radius_m, epsilon = 1e-6);

    let south = GeodeticPosition::try_from_ecef(&Vector3::new(0.0, 0.0, -6_356_752.0)).unwrap();
    assert_abs_diff_eq!(south.latitude_rad(), -FRAC_PI_2, epsilon = 1e-12);
}

#[rstest]
#[case(0.0, 0.0, 0.0)]
#[case(0.5, 1.0, 408e3)]
#[case(-0.9, 3.5, 1_200e3)]
#[case(1.2, 5.9, -100.0)]
#[case(-1.5, 0.3, 35_786e3)]
#[case(1.569, 2.0, 550e3)]
#[case(0.3, 0.1, 1e3)]
#[case(-0.7, 4.4, 100e3)]
#[case(0.78, 1.7, 2_000e3)]
#[case(-1.1, 2.9, 5_000e3)]
#[case(1.4, 6.1, 20_200e3)]
#[case(-0.2, 3.3, 35_786e3)]
fn round_trip(#[case] latitude_rad: f64, #[case] longitude_rad: f64, #[case] altitude_m: f64) {
    let _ = pel::try_init();
    let geo = GeodeticPosition::new(latitude_rad, longitude_rad, altitude_m);
    let ecef = geo.to_ecef();
    let back = GeodeticPosition::try_from_ecef(&ecef).unwrap();

    assert_abs_diff_eq!(back.to_ecef(), ecef, epsilon = 1e-7);
    assert_abs_diff_eq!(back.latitude_rad(), latitude_rad, epsilon = 1e-12);
    assert_abs_diff_eq!(back.longitude_rad(), longitude_rad, epsilon = 1e-12);
    assert_abs_diff_eq!(back.altitude_m(), altitude_m, epsilon = 1e-7);
}

#[test]
fn geocenter_is_rejected() {
    let _ = pel::try_init();
    assert_eq!(
        GeodeticPosition::try_from_ecef(&Vector3::zeros()),
        Err(AstroError::DegeneratePosition { norm_m: 0.0 })
    );

    // A failed update leaves the previous value untouched
    let mut geo = GeodeticPosition::new(0.1, 0.2, 300.0);
    assert!(geo.update_from_ecef(&Vector3::new(f64::NAN, 0.0, 0.0)).is_err());
    assert_eq!(geo, GeodeticPosition::new(0.1, 0.2, 300.0));
}
