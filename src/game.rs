//! World state and the fixed-rate simulation step.
//!
//! The playfield is clip space: both axes run from -1.0 to 1.0 and anything
//! leaving one edge comes back on the opposite one. Vulkan's clip space has
//! +y pointing down, so a positive angle turns an instance clockwise on
//! screen.

use std::time::Duration;

use glam::Vec2;

use crate::config::{AsteroidSpawn, Config, ShipConfig};
use crate::input::{Controls, Turn};
use crate::transform;
use crate::vertex::InstanceData;

/// Nose direction of the ship mesh before rotation.
const SHIP_NOSE: Vec2 = Vec2::new(0.0, -1.0);

/// Slowest tick rate a `FixedStep` runs at, in Hz.
pub const MIN_TICK_RATE: f32 = 1.0;

/// Angles this close to a full turn are treated as 0.
const ANGLE_SNAP: f32 = 1e-4;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Degrees.
    pub angle: f32,
}

impl Body {
    fn integrate(&mut self) {
        self.position += self.velocity;
        self.position = Vec2::new(wrap(self.position.x), wrap(self.position.y));
    }

    fn instance(&self, scale: f32) -> InstanceData {
        InstanceData {
            pos_offset: self.position.to_array(),
            angle: self.angle,
            scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub body: Body,
    pub scale: f32,
}

impl Ship {
    /// Unit vector the nose points along.
    pub fn forward(&self) -> Vec2 {
        transform::rotate(SHIP_NOSE, self.body.angle)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub body: Body,
    /// Degrees per tick.
    pub spin: f32,
    pub scale: f32,
}

impl From<&AsteroidSpawn> for Asteroid {
    fn from(spawn: &AsteroidSpawn) -> Self {
        Self {
            body: Body {
                position: Vec2::from(spawn.position),
                velocity: Vec2::from(spawn.velocity),
                angle: spawn.angle,
            },
            spin: spawn.spin,
            scale: spawn.scale,
        }
    }
}

#[derive(Debug, Clone)]
pub struct World {
    pub ship: Ship,
    pub asteroids: Vec<Asteroid>,
    ship_config: ShipConfig,
}

impl World {
    pub fn new(config: &Config) -> Self {
        let ship = Ship {
            body: Body {
                position: Vec2::from(config.ship.spawn),
                ..Default::default()
            },
            scale: config.ship.scale,
        };
        Self {
            ship,
            asteroids: config.asteroids.iter().map(Asteroid::from).collect(),
            ship_config: config.ship.clone(),
        }
    }

    pub fn tick(&mut self, controls: &Controls) {
        let ship = &mut self.ship;
        match controls.turn() {
            Turn::Left => ship.body.angle -= self.ship_config.turn_rate,
            Turn::Right => ship.body.angle += self.ship_config.turn_rate,
            Turn::None => {}
        }
        ship.body.angle = normalize_angle(ship.body.angle);

        if controls.thrust {
            let forward = ship.forward();
            ship.body.velocity += forward * self.ship_config.thrust;
        }
        ship.body.integrate();

        for asteroid in &mut self.asteroids {
            asteroid.body.angle = normalize_angle(asteroid.body.angle + asteroid.spin);
            asteroid.body.integrate();
        }
    }

    pub fn ship_instances(&self) -> Vec<InstanceData> {
        vec![self.ship.body.instance(self.ship.scale)]
    }

    pub fn asteroid_instances(&self) -> Vec<InstanceData> {
        self.asteroids
            .iter()
            .map(|a| a.body.instance(a.scale))
            .collect()
    }
}

/// Brings a coordinate that left [-1, 1] back in from the opposite edge.
pub fn wrap(v: f32) -> f32 {
    if v > 1.0 {
        v - 2.0
    } else if v < -1.0 {
        v + 2.0
    } else {
        v
    }
}

/// Maps `degrees` into [0, 360). Float remainders left next to either end of
/// the range snap to 0.
pub fn normalize_angle(degrees: f32) -> f32 {
    let r = degrees.rem_euclid(360.0);
    if r < ANGLE_SNAP || 360.0 - r < ANGLE_SNAP {
        0.0
    } else {
        r
    }
}

/// Converts wall-clock frame time into a whole number of simulation ticks.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: Duration,
    accumulated: Duration,
    max_ticks: u32,
}

impl FixedStep {
    /// Rates below [`MIN_TICK_RATE`], and non-finite rates, run at
    /// `MIN_TICK_RATE`.
    pub fn new(tick_rate: f32, max_ticks: u32) -> Self {
        let tick_rate = if tick_rate.is_finite() {
            tick_rate.max(MIN_TICK_RATE)
        } else {
            MIN_TICK_RATE
        };
        Self {
            step: Duration::from_secs_f64(1.0 / f64::from(tick_rate)),
            accumulated: Duration::ZERO,
            max_ticks,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Adds `elapsed` and returns how many ticks are due. A backlog larger
    /// than `max_ticks` is dropped.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;
        let mut ticks = 0;
        while self.accumulated >= self.step {
            if ticks == self.max_ticks {
                log::warn!(
                    "Simulation fell behind, dropping {:?} of backlog",
                    self.accumulated
                );
                self.accumulated = Duration::ZERO;
                break;
            }
            self.accumulated -= self.step;
            ticks += 1;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn empty_world() -> World {
        World::new(&Config {
            asteroids: vec![],
            ..Default::default()
        })
    }

    #[test]
    fn wrap_moves_across_the_edge() {
        assert!((wrap(1.25) - (-0.75)).abs() < EPS);
        assert!((wrap(-1.5) - 0.5).abs() < EPS);
        assert_eq!(wrap(1.0), 1.0);
        assert_eq!(wrap(-0.3), -0.3);
    }

    #[test]
    fn turning_changes_angle_by_turn_rate() {
        let mut world = empty_world();
        let controls = Controls {
            turn_right: true,
            ..Default::default()
        };
        world.tick(&controls);
        world.tick(&controls);
        assert!((world.ship.body.angle - 10.0).abs() < EPS);

        let controls = Controls {
            turn_left: true,
            ..Default::default()
        };
        for _ in 0..3 {
            world.tick(&controls);
        }
        assert!((world.ship.body.angle - 355.0).abs() < EPS);
    }

    #[test]
    fn idle_ship_does_not_move() {
        let mut world = empty_world();
        world.tick(&Controls::default());
        assert_eq!(world.ship.body.position, Vec2::new(0.5, 0.5));
        assert_eq!(world.ship.body.velocity, Vec2::ZERO);
    }

    #[test]
    fn thrust_pushes_along_the_nose() {
        let mut world = empty_world();
        let controls = Controls {
            thrust: true,
            ..Default::default()
        };
        world.tick(&controls);
        assert!(world.ship.body.velocity.x.abs() < EPS);
        assert!((world.ship.body.velocity.y + 0.0005).abs() < EPS);
        assert!((world.ship.body.position.y - (0.5 - 0.0005)).abs() < EPS);

        world.ship.body.velocity = Vec2::ZERO;
        world.ship.body.angle = 90.0;
        world.tick(&controls);
        assert!((world.ship.body.velocity.x - 0.0005).abs() < EPS);
        assert!(world.ship.body.velocity.y.abs() < EPS);
    }

    #[test]
    fn asteroids_drift_spin_and_wrap() {
        let mut world = World::new(&Config {
            asteroids: vec![AsteroidSpawn {
                position: [0.99, 0.0],
                velocity: [0.02, -0.01],
                angle: 359.0,
                spin: 2.0,
                scale: 0.1,
            }],
            ..Default::default()
        });
        world.tick(&Controls::default());
        let body = world.asteroids[0].body;
        assert!((body.position.x - (-0.99)).abs() < EPS);
        assert!((body.position.y - (-0.01)).abs() < EPS);
        assert!((body.angle - 1.0).abs() < EPS);
    }

    #[test]
    fn instances_mirror_world_state() {
        let world = World::new(&Config::default());
        let ships = world.ship_instances();
        assert_eq!(
            ships,
            vec![InstanceData {
                pos_offset: [0.5, 0.5],
                angle: 0.0,
                scale: 0.05,
            }]
        );
        let asteroids = world.asteroid_instances();
        assert_eq!(asteroids.len(), 1);
        assert_eq!(asteroids[0].scale, 0.1);
    }

    #[test]
    fn fixed_step_accumulates_partial_frames() {
        let mut clock = FixedStep::new(10.0, 5);
        assert_eq!(clock.advance(Duration::from_millis(50)), 0);
        assert_eq!(clock.advance(Duration::from_millis(60)), 1);
        assert_eq!(clock.advance(Duration::from_millis(190)), 2);
    }

    #[test]
    fn fixed_step_drops_backlog_past_cap() {
        let mut clock = FixedStep::new(10.0, 3);
        assert_eq!(clock.advance(Duration::from_secs(2)), 3);
        assert_eq!(clock.advance(Duration::ZERO), 0);
    }

    #[test]
    fn fixed_step_survives_degenerate_rates() {
        assert_eq!(FixedStep::new(1e-20, 1).step(), Duration::from_secs(1));
        assert_eq!(FixedStep::new(0.0, 1).step(), Duration::from_secs(1));
        assert_eq!(FixedStep::new(f32::NAN, 1).step(), Duration::from_secs(1));
        assert_eq!(FixedStep::new(f32::INFINITY, 1).step(), Duration::from_secs(1));
        assert_eq!(FixedStep::new(4.0, 1).step(), Duration::from_millis(250));
    }

    #[test]
    fn normalize_angle_snaps_rounding_residue() {
        assert_eq!(normalize_angle(1.49e-8), 0.0);
        assert_eq!(normalize_angle(-1e-9), 0.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert!((normalize_angle(-90.0) - 270.0).abs() < EPS);
        assert!((normalize_angle(725.0) - 5.0).abs() < EPS);
    }

    #[test]
    fn spins_that_cancel_land_on_zero() {
        let mut world = World::new(&Config {
            asteroids: vec![AsteroidSpawn {
                spin: 0.3,
                ..Default::default()
            }],
            ..Default::default()
        });
        world.tick(&Controls::default());
        world.asteroids[0].spin = -0.1;
        for _ in 0..3 {
            world.tick(&Controls::default());
        }
        assert_eq!(world.asteroids[0].body.angle, 0.0);
    }
}
