use std::time::Duration;

use winit::event::{ElementState, VirtualKeyCode};

use vulkano_asteroids::{
    config::Config,
    game::{FixedStep, World},
    input::Controls,
    transform::{clip_position, DEFAULT_ASPECT_STRETCH},
};

const EPS: f32 = 1e-4;

#[test]
fn one_second_of_thrust_at_default_settings() {
    let config = Config::default();
    let mut world = World::new(&config);
    let mut controls = Controls::default();
    controls.handle_key(VirtualKeyCode::D, ElementState::Pressed);

    let mut clock = FixedStep::new(
        config.simulation.tick_rate,
        config.simulation.max_ticks_per_frame,
    );
    let mut ticks = 0;
    for _ in 0..60 {
        for _ in 0..clock.advance(Duration::from_secs(1) / 60) {
            world.tick(&controls);
            ticks += 1;
        }
    }
    assert!((59..=60).contains(&ticks));

    // v_n = n * thrust, straight up the screen
    let speed = -world.ship.body.velocity.y;
    assert!((speed - ticks as f32 * config.ship.thrust).abs() < EPS);
    assert!(world.ship.body.velocity.x.abs() < EPS);
    assert!(world.ship.body.position.y < 0.5);
}

#[test]
fn ship_nose_vertex_points_where_the_ship_moves() {
    let config = Config::default();
    let mut world = World::new(&config);
    let controls = Controls {
        turn_right: true,
        thrust: true,
        ..Default::default()
    };
    for _ in 0..9 {
        world.tick(&controls);
    }
    assert!((world.ship.body.angle - 45.0).abs() < EPS);

    // nose in clip space relative to the ship centre, aspect left out
    let instance = world.ship_instances()[0];
    let nose = clip_position([0.0, -1.0], &instance, [1.0, 1.0]);
    let centre = glam::Vec2::from(instance.pos_offset);
    let nose_dir = (glam::Vec2::new(nose.x, nose.y) - centre).normalize();
    assert!((nose_dir - world.ship.forward()).length() < EPS);
}

#[test]
fn asteroids_stay_on_the_playfield() {
    let config = Config::from_ron_str(
        "(asteroids: [
            (position: (0.9, 0.9), velocity: (0.013, 0.021), spin: 3.0),
            (position: (-0.9, 0.0), velocity: (-0.017, 0.0)),
        ])",
    )
    .unwrap();
    let mut world = World::new(&config);
    for _ in 0..1000 {
        world.tick(&Controls::default());
        for a in &world.asteroids {
            assert!(a.body.position.x.abs() <= 1.0);
            assert!(a.body.position.y.abs() <= 1.0);
            assert!((0.0..360.0).contains(&a.body.angle));
        }
    }
    assert_eq!(world.asteroid_instances().len(), 2);
}

#[test]
fn default_instances_match_the_vertex_stage_contract() {
    let world = World::new(&Config::default());
    let asteroid = world.asteroid_instances()[0];
    let out = clip_position([1.0, 0.0], &asteroid, DEFAULT_ASPECT_STRETCH);
    assert!((out.x - 0.1).abs() < EPS);
    assert!(out.y.abs() < EPS);
    assert_eq!((out.z, out.w), (0.0, 1.0));
}
