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
use satdyn::cosmic::{AstroError, EarthRotation, FixedRotation, SiderealRotation, SECONDS_PER_DAY};
use satdyn::dynamics::{DynamicsError, ForceAccumulator};
use satdyn::linalg::{Matrix3, UnitQuaternion, Vector3};
use satdyn::propagators::{
    EnckePropagation, EnckeSettings, KeplerPropagation, OrbitPropagator, PropagationError,
    Rk4Propagation, Rk4Settings,
};
use satdyn::Orbit;
use std::f64::consts::TAU;

use crate::{circular_state, TEST_JD};

/// Collapses every position onto the geocenter, so the geodetic conversion fails.
#[derive(Debug)]
struct CollapsedEarth;

impl EarthRotation for CollapsedEarth {
    fn dcm_i2ecef(&self, _julian_day: f64) -> Matrix3<f64> {
        Matrix3::zeros()
    }
}

#[fixture]
fn rk4_orbit() -> Orbit {
    let (r, v) = circular_state(6_878e3);
    let prop = Rk4Propagation::new(Rk4Settings::default(), r, v).unwrap();
    Orbit::new(OrbitPropagator::Rk4(prop), TEST_JD, &SiderealRotation).unwrap()
}

#[fixture]
fn encke_orbit() -> Orbit {
    let (r, v) = circular_state(6_878e3);
    let prop = EnckePropagation::new(EnckeSettings::default(), r, v).unwrap();
    Orbit::new(OrbitPropagator::Encke(prop), TEST_JD, &SiderealRotation).unwrap()
}

#[fixture]
fn kepler_orbit() -> Orbit {
    let (r, v) = circular_state(6_878e3);
    let prop = KeplerPropagation::from_cartesian(r, v, satdyn::cosmic::EARTH_GM_M3_S2, TEST_JD).unwrap();
    Orbit::new(OrbitPropagator::Kepler(prop), TEST_JD, &SiderealRotation).unwrap()
}

#[rstest]
#[case::rk4(rk4_orbit())]
#[case::encke(encke_orbit())]
#[case::kepler(kepler_orbit())]
fn accumulator_cleared_after_propagation(#[case] mut orbit: Orbit) {
    let _ = pel::try_init();
    let rotation = SiderealRotation;
    orbit.add_acceleration_i(Vector3::new(0.0, 1e-6, 0.0));
    orbit.add_force_i(Vector3::new(0.0, 0.0, 1e-3), 500.0).unwrap();
    assert!(!orbit.accumulator().is_zero());

    orbit.propagate(10.0, TEST_JD + 10.0 / SECONDS_PER_DAY, &rotation).unwrap();
    assert!(orbit.accumulator().is_zero());

    // Also on failure
    orbit.add_acceleration_i(Vector3::new(1e-3, 0.0, 0.0));
    let rslt = orbit.propagate(20.0, TEST_JD + 20.0 / SECONDS_PER_DAY, &CollapsedEarth);
    assert_eq!(
        rslt,
        Err(PropagationError::PropAstro {
            source: AstroError::DegeneratePosition { norm_m: 0.0 }
        })
    );
    assert!(orbit.accumulator().is_zero());
}

#[rstest]
#[case::rk4_infinite_end(rk4_orbit(), f64::INFINITY, TEST_JD)]
#[case::rk4_nan_end(rk4_orbit(), f64::NAN, TEST_JD)]
#[case::encke_infinite_end(encke_orbit(), f64::INFINITY, TEST_JD)]
#[case::kepler_nan_date(kepler_orbit(), 10.0, f64::NAN)]
#[case::kepler_infinite_date(kepler_orbit(), 10.0, f64::INFINITY)]
fn non_finite_times_are_rejected(
    #[case] mut orbit: Orbit,
    #[case] end_time_s: f64,
    #[case] current_jd: f64,
) {
    let _ = pel::try_init();
    let before = (orbit.position_i_m(), orbit.velocity_i_m_s());
    orbit.add_acceleration_i(Vector3::new(0.0, 1e-6, 0.0));

    let rslt = orbit.propagate(end_time_s, current_jd, &SiderealRotation);
    assert!(matches!(rslt, Err(PropagationError::NonFiniteTime { .. })));
    assert!(orbit.accumulator().is_zero());
    assert_eq!((orbit.position_i_m(), orbit.velocity_i_m_s()), before);

    // The orbit is still usable afterwards
    orbit
        .propagate(10.0, TEST_JD + 10.0 / SECONDS_PER_DAY, &SiderealRotation)
        .unwrap();
    assert_ne!(orbit.position_i_m(), before.0);
}

#[rstest]
fn invalid_mass(mut rk4_orbit: Orbit) {
    let _ = pel::try_init();
    for mass_kg in [0.0, -1.0, f64::NAN] {
        let err = rk4_orbit.add_force_i(Vector3::new(1.0, 0.0, 0.0), mass_kg);
        assert!(matches!(err, Err(DynamicsError::InvalidMass { .. })));
    }
    assert!(rk4_orbit.accumulator().is_zero());
}

#[test]
fn accumulation_order_is_irrelevant() {
    let _ = pel::try_init();
    let rotation = SiderealRotation;
    let a1 = Vector3::new(1.3e-6, -2.1e-7, 4.4e-7);
    let f2_b = Vector3::new(2e-4, 1e-4, -3e-4);
    let q_i2b = UnitQuaternion::from_euler_angles(0.1, -0.4, 1.3);
    let jd = TEST_JD + 60.0 / SECONDS_PER_DAY;

    let mut first = rk4_orbit();
    first.add_acceleration_i(a1);
    first.add_force_b(f2_b, &q_i2b, 100.0).unwrap();

    let mut second = rk4_orbit();
    second.add_force_b(f2_b, &q_i2b, 100.0).unwrap();
    second.add_acceleration_i(a1);

    assert_eq!(first.accumulator(), second.accumulator());
    first.propagate(60.0, jd, &rotation).unwrap();
    second.propagate(60.0, jd, &rotation).unwrap();
    assert_eq!(first.position_i_m(), second.position_i_m());
    assert_eq!(first.velocity_i_m_s(), second.velocity_i_m_s());

    // Propagating with an explicit set of contributions is equivalent
    let mut third = rk4_orbit();
    let mut contributions = ForceAccumulator::new();
    contributions.add_acceleration_i(a1);
    contributions.add_force_b(f2_b, &q_i2b, 100.0).unwrap();
    third.add_acceleration_i(Vector3::new(1.0, 1.0, 1.0));
    third.propagate_with(contributions, 60.0, jd, &rotation).unwrap();
    assert_eq!(first.position_i_m(), third.position_i_m());
    assert!(third.accumulator().is_zero());
}

#[rstest]
#[case(1.0, 1e-3)]
#[case(10.0, 1.0)]
fn circular_orbit_closes(#[case] step_s: f64, #[case] tolerance_m: f64) {
    let _ = pel::try_init();
    let rotation = SiderealRotation;
    let radius_m = 6_878e3;
    let (r0, v0) = circular_state(radius_m);
    let prop = Rk4Propagation::new(Rk4Settings::builder().step_s(step_s).build(), r0, v0).unwrap();
    let mut orbit = Orbit::new(OrbitPropagator::Rk4(prop), TEST_JD, &rotation).unwrap();

    let period_s = TAU * (radius_m.powi(3) / satdyn::cosmic::EARTH_GM_M3_S2).sqrt();
    // Propagate with a 60 second simulation tick, the last tick being partial
    let mut elapsed_s = 0.0;
    while elapsed_s < period_s {
        elapsed_s = (elapsed_s + 60.0).min(period_s);
        orbit
            .propagate(elapsed_s, TEST_JD + elapsed_s / SECONDS_PER_DAY, &rotation)
            .unwrap();
    }
    let err_m = (orbit.position_i_m() - r0).norm();
    println!("closure error with {step_s} s step: {err_m:.3e} m");
    assert!(err_m < tolerance_m);
    assert_abs_diff_eq!(orbit.velocity_i_m_s(), v0, epsilon = tolerance_m * 1e-2);
}

#[rstest]
fn calc_disabled_is_frozen(mut rk4_orbit: Orbit) {
    let _ = pel::try_init();
    let rotation = SiderealRotation;
    rk4_orbit.set_calc_enabled(false);
    let before = (
        rk4_orbit.position_i_m(),
        rk4_orbit.velocity_i_m_s(),
        rk4_orbit.position_ecef_m(),
        rk4_orbit.velocity_ecef_m_s(),
        rk4_orbit.velocity_b_m_s(),
        rk4_orbit.geodetic(),
        rk4_orbit.last_acceleration_i_m_s2(),
    );
    for tick in 1..=5 {
        let elapsed_s = 10.0 * f64::from(tick);
        rk4_orbit.add_acceleration_i(Vector3::new(0.0, 1.0, 0.0));
        rk4_orbit
            .propagate(elapsed_s, TEST_JD + elapsed_s / SECONDS_PER_DAY, &rotation)
            .unwrap();
        assert!(rk4_orbit.accumulator().is_zero());
    }
    let after = (
        rk4_orbit.position_i_m(),
        rk4_orbit.velocity_i_m_s(),
        rk4_orbit.position_ecef_m(),
        rk4_orbit.velocity_ecef_m_s(),
        rk4_orbit.velocity_b_m_s(),
        rk4_orbit.geodetic(),
        rk4_orbit.last_acceleration_i_m_s2(),
    );
    assert_eq!(before, after);
}

#[rstest]
#[case::rk4(rk4_orbit())]
#[case::encke(encke_orbit())]
#[case::kepler(kepler_orbit())]
fn position_offset(#[case] mut orbit: Orbit) {
    let _ = pel::try_init();
    let rotation = FixedRotation::aligned();
    let r0 = orbit.position_i_m();
    let v0 = orbit.velocity_i_m_s();
    let offset = Vector3::new(15.0, -3.0, 7.5);
    orbit.add_position_offset(&offset, TEST_JD, &rotation).unwrap();
    assert_abs_diff_eq!(orbit.position_i_m(), r0 + offset, epsilon = 1e-6);
    assert_abs_diff_eq!(orbit.velocity_i_m_s(), v0, epsilon = 1e-9);
    assert_abs_diff_eq!(orbit.position_ecef_m(), orbit.position_i_m(), epsilon = 1e-9);
}
