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
use satdyn::cosmic::frames::{
    dcm_i2lvlh, ecef_to_eci, ecef_to_geodetic, eci_to_ecef, quaternion_i2lvlh, rotate_to_frame,
};
use satdyn::cosmic::{
    gmst_rad, EarthRotation, FixedRotation, SiderealRotation, EARTH_MEAN_ANGULAR_VELOCITY_RAD_S,
};
use satdyn::linalg::Vector3;

use crate::{circular_state, TEST_JD};

#[test]
fn eci_ecef_round_trip() {
    let _ = pel::try_init();
    let (r, v) = circular_state(6_778e3);
    let rotation = SiderealRotation;
    for hours in [0.0, 3.0, 17.5] {
        let jd = TEST_JD + hours / 24.0;
        let (r_ecef, v_ecef) = eci_to_ecef(&r, &v, jd, &rotation);
        assert_abs_diff_eq!(r_ecef.norm(), r.norm(), epsilon = 1e-6);
        let (r_back, v_back) = ecef_to_eci(&r_ecef, &v_ecef, jd, &rotation);
        assert_abs_diff_eq!(r_back, r, epsilon = 1e-6);
        assert_abs_diff_eq!(v_back, v, epsilon = 1e-9);
    }
}

#[test]
fn geostationary_is_fixed_in_ecef() {
    let _ = pel::try_init();
    let radius_m = 42_164e3;
    let rotation = FixedRotation::uniform(0.3, TEST_JD);
    let omega = EARTH_MEAN_ANGULAR_VELOCITY_RAD_S;
    let (sin_a, cos_a) = 1.1_f64.sin_cos();
    let r = radius_m * Vector3::new(cos_a, sin_a, 0.0);
    let v = omega * radius_m * Vector3::new(-sin_a, cos_a, 0.0);

    let (r_ecef, v_ecef) = eci_to_ecef(&r, &v, TEST_JD, &rotation);
    assert_abs_diff_eq!(v_ecef, Vector3::zeros(), epsilon = 1e-9);
    let geo = ecef_to_geodetic(&r_ecef).unwrap();
    // Longitude is the inertial angle minus the rotation angle
    assert_abs_diff_eq!(geo.longitude_rad(), 0.8, epsilon = 1e-12);
    assert_abs_diff_eq!(geo.latitude_rad(), 0.0, epsilon = 1e-12);
}

#[test]
fn sidereal_rotation_uses_gmst() {
    let rotation = SiderealRotation;
    let dcm = rotation.dcm_i2ecef(TEST_JD);
    let gmst = gmst_rad(TEST_JD);
    // The Greenwich meridian, in inertial coordinates, maps onto the ECEF X axis
    let greenwich_i = Vector3::new(gmst.cos(), gmst.sin(), 0.0);
    assert_abs_diff_eq!(dcm * greenwich_i, Vector3::x(), epsilon = 1e-12);
    assert_abs_diff_eq!(
        rotation.angular_velocity_i(),
        Vector3::new(0.0, 0.0, EARTH_MEAN_ANGULAR_VELOCITY_RAD_S)
    );
}

#[test]
fn lvlh_frame() {
    let _ = pel::try_init();
    let (r, v) = circular_state(7_000e3);
    let q = quaternion_i2lvlh(&r, &v).unwrap();
    assert_abs_diff_eq!(rotate_to_frame(&q, &r), Vector3::new(r.norm(), 0.0, 0.0), epsilon = 1e-6);
    // Circular orbit: the velocity is along +Y
    assert_abs_diff_eq!(rotate_to_frame(&q, &v), Vector3::new(0.0, v.norm(), 0.0), epsilon = 1e-9);
    assert_abs_diff_eq!(dcm_i2lvlh(&r, &v).unwrap() * v, rotate_to_frame(&q, &v), epsilon = 1e-9);

    assert!(dcm_i2lvlh(&r, &(2.0 * r)).is_err());
}
