use approx::assert_relative_eq;
use ballistics_core::GRAVITY;
use ballistics_models::drag_coefficient;
use ballistics_pointmass::*;

fn rifle() -> Projectile {
    Projectile::new(0.0095, 0.00782, DragModel::G7).unwrap()
}

fn mortar() -> Projectile {
    Projectile::new(3.2, 0.082, DragModel::Mortar).unwrap().with_kind(ProjectileKind::Mortar)
}

fn no_drag() -> Projectile {
    Projectile::new(1.0, 0.05, DragModel::Custom(DragCurve::new(vec![(0.0, 0.0), (2000.0, 0.0)]))).unwrap()
}

#[test]
fn first_sample_is_the_muzzle_state() {
    for (v0, angle) in [(830.0, 0.0), (150.0, 45.0), (300.0, 72.5)] {
        let traj = integrate(&rifle(), &Environment::standard(), &Launch::new(v0, angle));
        let s0 = traj.first().unwrap();
        let th = f64::to_radians(angle);
        assert_eq!((s0.x, s0.y, s0.t), (0.0, 0.0, 0.0));
        assert_relative_eq!(s0.vx, v0 * th.cos(), epsilon = 1e-12);
        assert_relative_eq!(s0.vy, v0 * th.sin(), epsilon = 1e-12);
        assert_relative_eq!(s0.speed, v0, epsilon = 1e-9);
    }
}

#[test]
fn drag_free_range_matches_vacuum_formula() {
    let (v0, angle) = (300.0_f64, 45.0_f64);
    let traj = integrate(&no_drag(), &Environment::standard(), &Launch::new(v0, angle));
    assert_eq!(traj.termination(), Termination::Impact);
    let expected = v0 * v0 * (2.0 * angle.to_radians()).sin() / GRAVITY;
    let distance = traj.last().unwrap().x;
    assert!((distance - expected).abs() / expected < 0.005, "{distance} vs {expected}");
}

#[test]
fn drag_table_breakpoints() {
    assert_eq!(drag_coefficient(&DragModel::G1, 343.0 * 1.5), 0.35);
    assert_eq!(drag_coefficient(&DragModel::G7, 343.0 * 1.5), 0.30);

    let custom = DragModel::Custom(DragCurve::new(vec![(100.0, 0.3), (300.0, 0.5)]));
    assert_relative_eq!(custom.drag_coefficient(200.0), 0.4, epsilon = 1e-12);
    assert_eq!(custom.drag_coefficient(50.0), 0.3);
    assert_eq!(custom.drag_coefficient(400.0), 0.5);
}

#[test]
fn thrust_curve_interpolates_and_cuts_off() {
    let profile = ThrustProfile::single_stage(1.2, vec![(0.0, 2000.0), (1.2, 0.0)], 0.5);
    assert_eq!(profile.thrust(0.6), 1000.0);
    assert_eq!(profile.thrust(1.3), 0.0);
}

#[test]
fn runs_respect_the_caps() {
    let env = Environment::standard();
    let cases = [
        (rifle(), Launch::new(830.0, 45.0)),
        (mortar(), Launch::new(150.0, 80.0)),
        (no_drag(), Launch::new(1000.0, 89.0)),
    ];
    for (p, launch) in cases {
        let traj = integrate(&p, &env, &launch);
        assert!(traj.len() <= 10_000);
        assert!(traj.last().unwrap().t <= 120.0);
    }
}

#[test]
fn identical_inputs_give_identical_trajectories() {
    let env = Environment::new(Conditions {
        wind_speed_mps: 4.0,
        wind_angle_deg: 30.0,
        coriolis: true,
        ..Conditions::default()
    });
    let launch = Launch::new(600.0, 20.0);
    assert_eq!(integrate(&rifle(), &env, &launch), integrate(&rifle(), &env, &launch));
}

#[test]
fn scenario_a_flat_rifle_shot() {
    let env = Environment::standard();
    let flat = integrate(&rifle(), &env, &Launch::new(830.0, 0.0));
    let lofted = integrate(&rifle(), &env, &Launch::new(830.0, 45.0));

    let flat_sum = rifle().summarize(&flat).unwrap();
    let lofted_sum = rifle().summarize(&lofted).unwrap();
    assert!(flat_sum.max_height < 1.0);
    assert!(lofted_sum.max_height > 100.0 * (flat_sum.max_height + 1.0));
    assert!(flat_sum.time_of_flight < lofted_sum.time_of_flight);
}

#[test]
fn scenario_b_mortar_is_reproducible() {
    let env = Environment::standard();
    let launch = Launch::new(150.0, 45.0);
    let a = integrate(&mortar(), &env, &launch);
    let b = integrate(&mortar(), &env, &launch);
    assert_eq!(a, b);
    assert_eq!(a.termination(), Termination::Impact);

    let sum = mortar().summarize(&a).unwrap();
    let vacuum = 150.0 * 150.0 / GRAVITY;
    assert!(sum.distance > 500.0 && sum.distance < vacuum, "{}", sum.distance);
    assert!(sum.max_height_range < sum.distance);
    assert!(sum.impact_velocity < 150.0);
}

#[test]
fn json_record_matches_hand_built_run() {
    let json = r#"{
        "mass_kg": 3.2,
        "diameter_m": 0.082,
        "drag_model": "mortar",
        "projectile_type": "mortar",
        "muzzle_velocity_mps": 150.0,
        "launch_angle_deg": 45.0
    }"#;
    let run = RunConfig::from_json(json).unwrap().build().unwrap();
    let from_json = run.integrate();
    let by_hand = integrate(&mortar(), &Environment::standard(), &Launch::new(150.0, 45.0));
    assert_eq!(from_json, by_hand);
}

#[test]
fn velocity_sweep_is_ordered_and_monotone() {
    let values = sweep_values(100.0, 300.0, 50.0).unwrap();
    let runs = run_sweep(
        &mortar(),
        &Environment::standard(),
        &Launch::new(150.0, 45.0),
        SweepParam::MuzzleVelocity,
        &values,
        &IntegrateOpts::default(),
    )
    .unwrap();
    assert_eq!(runs.iter().map(|r| r.value).collect::<Vec<_>>(), values);
    let d: Vec<f64> = runs.iter().map(|r| r.summary.unwrap().distance).collect();
    assert!(d.windows(2).all(|w| w[0] < w[1]), "{d:?}");
}

#[test]
fn monte_carlo_same_seed_same_report() {
    let cfg = MonteCarloConfig { runs: 32, seed: 42, ..MonteCarloConfig::default() };
    let env = Environment::standard();
    let launch = Launch::new(150.0, 45.0);
    let opts = IntegrateOpts::default();
    let a = run_monte_carlo(&mortar(), &env, &launch, &cfg, &opts).unwrap();
    let b = run_monte_carlo(&mortar(), &env, &launch, &cfg, &opts).unwrap();
    assert_eq!(a, b);

    let other = MonteCarloConfig { seed: 43, ..cfg };
    let c = run_monte_carlo(&mortar(), &env, &launch, &other, &opts).unwrap();
    assert_ne!(a.runs, c.runs);
}

#[test]
fn staged_rocket_outflies_the_same_airframe_coasting() {
    let airframe = || {
        Projectile::new(20.0, 0.12, DragModel::Rocket).unwrap().with_kind(ProjectileKind::Rocket)
    };
    let staged = airframe()
        .with_thrust(ThrustProfile::staged(vec![
            Stage::new(1.0, 3.0, ThrustCurve::constant(4000.0)),
            Stage::new(2.0, 2.0, vec![(0.0, 1500.0), (2.0, 500.0)]),
        ]))
        .unwrap();
    assert!(staged.is_powered());

    let env = Environment::standard();
    let launch = Launch::new(60.0, 45.0);
    let powered = integrate(&staged, &env, &launch);
    let coasting = integrate(&airframe(), &env, &launch);

    let p = staged.summarize(&powered).unwrap();
    let c = airframe().summarize(&coasting).unwrap();
    assert!(p.distance > c.distance, "{} vs {}", p.distance, c.distance);
    assert!(p.max_height > c.max_height);
    assert!(powered.len() <= 10_000);
    assert!(powered.last().unwrap().t <= 120.0);

    // Velocity keeps rising through both burns.
    let speed_at = |t: f64| powered.iter().take_while(|s| s.t <= t).last().unwrap().speed;
    assert!(speed_at(0.9) > 60.0);
    assert!(speed_at(2.9) > speed_at(0.9));
}

#[test]
fn isa_air_at_altitude_carries_farther() {
    let sea_level = Environment::standard();
    let mountain = Environment::try_new(Conditions {
        altitude_m: 3000.0,
        dynamic_air: true,
        ..Conditions::default()
    })
    .unwrap();
    assert!(mountain.air_density() < sea_level.air_density());

    let launch = Launch::new(150.0, 45.0);
    let low = mortar().summarize(&integrate(&mortar(), &sea_level, &launch)).unwrap();
    let high = mortar().summarize(&integrate(&mortar(), &mountain, &launch)).unwrap();
    assert!(high.distance > low.distance, "{} vs {}", high.distance, low.distance);
    assert!(high.impact_velocity > low.impact_velocity);
}
