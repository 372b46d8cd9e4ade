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
use satdyn::cosmic::{FixedRotation, EARTH_GM_M3_S2, SECONDS_PER_DAY};
use satdyn::linalg::Vector3;
use satdyn::propagators::{
    CircularReference, EnckePropagation, EnckeSettings, KeplerPropagation, KeplerianElements,
    OrbitPropagator, PropagationError, PropagationMode, RelativeOrbitPropagation, Rk4Propagation,
    Rk4Settings,
};
use satdyn::Orbit;

use crate::TEST_JD;

fn eccentric_state() -> (Vector3<f64>, Vector3<f64>) {
    let elements = KeplerianElements {
        sma_m: 8_000e3,
        ecc: 0.1,
        inc_rad: 0.5,
        raan_rad: 1.2,
        aop_rad: 0.7,
        ma_rad: 0.0,
        gm_m3_s2: EARTH_GM_M3_S2,
    };
    elements.to_cartesian_after(0.0).unwrap()
}

/// Propagates both orbits with 60 s ticks for the provided duration, and returns the largest position difference.
fn max_difference(
    mut lhs: Orbit,
    mut rhs: Orbit,
    duration_s: f64,
    acceleration_i_m_s2: Vector3<f64>,
) -> f64 {
    let rotation = FixedRotation::uniform(0.0, TEST_JD);
    let mut max_err_m: f64 = 0.0;
    let mut elapsed_s = 0.0;
    while elapsed_s < duration_s {
        elapsed_s += 60.0;
        let jd = TEST_JD + elapsed_s / SECONDS_PER_DAY;
        lhs.add_acceleration_i(acceleration_i_m_s2);
        rhs.add_acceleration_i(acceleration_i_m_s2);
        lhs.propagate(elapsed_s, jd, &rotation).unwrap();
        rhs.propagate(elapsed_s, jd, &rotation).unwrap();
        max_err_m = max_err_m.max((lhs.position_i_m() - rhs.position_i_m()).norm());
    }
    max_err_m
}

fn build(propagator: OrbitPropagator) -> Orbit {
    Orbit::new(propagator, TEST_JD, &FixedRotation::uniform(0.0, TEST_JD)).unwrap()
}

#[test]
fn kepler_matches_rk4() {
    let _ = pel::try_init();
    let (r, v) = eccentric_state();
    let rk4 = build(OrbitPropagator::Rk4(
        Rk4Propagation::new(Rk4Settings::default(), r, v).unwrap(),
    ));
    let kepler = build(OrbitPropagator::Kepler(
        KeplerPropagation::from_cartesian(r, v, EARTH_GM_M3_S2, TEST_JD).unwrap(),
    ));
    assert_eq!(kepler.mode(), PropagationMode::Kepler);

    // The Julian day resolution limits the agreement to a fraction of a meter
    let err_m = max_difference(rk4, kepler, 7_200.0, Vector3::zeros());
    println!("Kepler vs RK4: {err_m:.3e} m");
    assert!(err_m < 1.0);
}

#[rstest]
#[case(Vector3::zeros())]
#[case(Vector3::new(1e-5, -2e-5, 5e-6))]
fn encke_matches_rk4(#[case] acceleration_i_m_s2: Vector3<f64>) {
    let _ = pel::try_init();
    let (r, v) = eccentric_state();
    let rk4 = build(OrbitPropagator::Rk4(
        Rk4Propagation::new(Rk4Settings::default(), r, v).unwrap(),
    ));
    let encke = build(OrbitPropagator::Encke(
        EnckePropagation::new(EnckeSettings::default(), r, v).unwrap(),
    ));

    let err_m = max_difference(rk4, encke, 7_200.0, acceleration_i_m_s2);
    println!("Encke vs RK4: {err_m:.3e} m");
    assert!(err_m < 0.1);
}

#[test]
fn encke_rectifies_under_thrust() {
    let _ = pel::try_init();
    let (r, v) = eccentric_state();
    let mut encke = build(OrbitPropagator::Encke(
        EnckePropagation::new(
            EnckeSettings::builder().step_s(5.0).rectification_ratio(1e-5).build(),
            r,
            v,
        )
        .unwrap(),
    ));
    let rotation = FixedRotation::uniform(0.0, TEST_JD);
    for minute in 1..=60 {
        let elapsed_s = 60.0 * f64::from(minute);
        let prograde = encke.velocity_i_m_s().normalize();
        encke.add_acceleration_i(1e-3 * prograde);
        encke
            .propagate(elapsed_s, TEST_JD + elapsed_s / SECONDS_PER_DAY, &rotation)
            .unwrap();
    }
    match encke.propagator() {
        OrbitPropagator::Encke(prop) => {
            assert!(prop.rectifications() > 0);
            // Prograde thrust raises the orbit
            assert!(prop.reference().sma_m > 8_000e3);
        }
        _ => unreachable!(),
    }
}

#[test]
fn relative_orbit_matches_rk4() {
    let _ = pel::try_init();
    let reference = CircularReference {
        radius_m: 6_878e3,
        inc_rad: 0.9,
        raan_rad: 2.0,
        arg_lat_rad: 0.4,
        gm_m3_s2: EARTH_GM_M3_S2,
    };
    let n = reference.mean_motion_rad_s();
    // Closed relative ellipse: 100 m radial, 200 m along-track amplitude
    let hcw = RelativeOrbitPropagation::new(
        reference,
        Vector3::new(100.0, 0.0, 20.0),
        Vector3::new(0.0, -2.0 * n * 100.0, 0.0),
        TEST_JD,
        TEST_JD,
    )
    .unwrap();
    let state = hcw.state();
    let (r_ref, _) = reference.state_after(0.0);
    assert_abs_diff_eq!(
        (state.position_i_m - r_ref).norm(),
        (100.0_f64.powi(2) + 20.0_f64.powi(2)).sqrt(),
        epsilon = 1e-6
    );

    let rk4 = build(OrbitPropagator::Rk4(
        Rk4Propagation::new(Rk4Settings::default(), state.position_i_m, state.velocity_i_m_s).unwrap(),
    ));
    let hcw = build(OrbitPropagator::RelativeOrbit(hcw));

    // Linearization error of the HCW equations at a few hundred meters
    let err_m = max_difference(rk4, hcw, 5_400.0, Vector3::zeros());
    println!("HCW vs RK4: {err_m:.3e} m");
    assert!(err_m < 2.0);
}

#[test]
fn invalid_construction() {
    let _ = pel::try_init();
    let (r, v) = eccentric_state();
    for step_s in [0.0, -1.0, f64::INFINITY] {
        assert_eq!(
            Rk4Propagation::new(Rk4Settings::builder().step_s(step_s).build(), r, v).unwrap_err(),
            PropagationError::InvalidStepSize { step_s }
        );
    }
    // Hyperbolic
    assert!(matches!(
        KeplerPropagation::from_cartesian(r, 2.0 * v, EARTH_GM_M3_S2, TEST_JD),
        Err(PropagationError::DegenerateOrbit { .. })
    ));
    assert!(matches!(
        RelativeOrbitPropagation::new(
            CircularReference {
                radius_m: 0.0,
                inc_rad: 0.0,
                raan_rad: 0.0,
                arg_lat_rad: 0.0,
                gm_m3_s2: EARTH_GM_M3_S2
            },
            Vector3::zeros(),
            Vector3::zeros(),
            TEST_JD,
            TEST_JD
        ),
        Err(PropagationError::DegenerateOrbit { .. })
    ));
}
