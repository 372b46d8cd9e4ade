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

use satdyn::cosmic::{SiderealRotation, EARTH_GM_M3_S2};
use satdyn::io::{ConfigRepr, OrbitConfig, PropagationConfig};
use satdyn::propagators::{PropagationError, PropagationMode};
use satdyn::SatDynError;
use std::path::PathBuf;

use crate::TEST_JD;

fn config_path() -> PathBuf {
    let manifest_dir =
        PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or(".".to_string()));
    manifest_dir.join("data/tests/config/orbits.yaml")
}

#[test]
fn load_every_mode() {
    let _ = pel::try_init();
    let configs = OrbitConfig::load_many(config_path()).unwrap();
    let modes: Vec<PropagationMode> = configs.iter().map(|cfg| cfg.propagation.mode()).collect();
    assert_eq!(
        modes,
        vec![
            PropagationMode::Numerical,
            PropagationMode::AnalyticTle,
            PropagationMode::RelativeOrbit,
            PropagationMode::Kepler,
            PropagationMode::Encke,
            PropagationMode::Kepler,
        ]
    );

    let rotation = SiderealRotation;
    for cfg in &configs {
        let orbit = cfg.build(TEST_JD, &rotation).unwrap();
        assert_eq!(orbit.mode(), cfg.propagation.mode());
        assert_eq!(orbit.is_calc_enabled(), cfg.calculation);
        assert!(orbit.altitude_m() > 200e3, "{orbit}");
    }
    assert!(!configs[4].calculation);

    match &configs[0].propagation {
        PropagationConfig::Rk4(rk4) => {
            assert_eq!(rk4.step_s, 0.5);
            assert_eq!(rk4.gm_m3_s2, EARTH_GM_M3_S2);
        }
        _ => unreachable!(),
    }
}

#[test]
fn invalid_documents() {
    let _ = pel::try_init();
    let rotation = SiderealRotation;

    let unknown_model = OrbitConfig::loads(&format!(
        "propagation:\n  mode: sgp4\n  tle1: \"{}\"\n  tle2: \"{}\"\n  gravity_model: egm2008\n",
        crate::ISS_L1,
        crate::ISS_L2
    ))
    .unwrap();
    assert_eq!(
        unknown_model.build(TEST_JD, &rotation).unwrap_err(),
        SatDynError::Propagation {
            source: PropagationError::UnsupportedGravityModel {
                name: "egm2008".to_string()
            }
        }
    );

    let empty_tle = OrbitConfig::loads("propagation:\n  mode: sgp4\n  tle1: \"\"\n  tle2: \"\"\n").unwrap();
    assert!(matches!(
        empty_tle.build(TEST_JD, &rotation),
        Err(SatDynError::Propagation {
            source: PropagationError::InvalidTle { .. }
        })
    ));

    let bad_ratio = OrbitConfig::loads(
        "propagation:\n  mode: encke\n  rectification_ratio: -1.0\n  position_i_m: [7.0e6, 0.0, 0.0]\n  velocity_i_m_s: [0.0, 7.5e3, 0.0]\n",
    )
    .unwrap();
    assert!(matches!(
        bad_ratio.build(TEST_JD, &rotation),
        Err(SatDynError::Config { .. })
    ));

    // Missing initial state
    assert!(OrbitConfig::loads("propagation:\n  mode: rk4\n  step_s: 1.0\n").is_err());
    assert!(OrbitConfig::load("data/tests/config/does_not_exist.yaml").is_err());
}
