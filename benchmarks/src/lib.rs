//! Scenario builders shared by the collision benchmarks.

use std::f64::consts::PI;

use glam::DVec2;
use postcrash::collision::footprint;
use postcrash::{spawn_agent, AgentSnapshot, CollisionEvent, CollisionOpponent};

pub const LENGTH: f64 = 4.5;
pub const WIDTH: f64 = 1.8;
pub const MASS: f64 = 1500.0;

/// Two cars driving into each other, overlapping by `overlap` metres.
pub fn head_on(overlap: f64, speed: f64) -> (AgentSnapshot, AgentSnapshot) {
    let a = AgentSnapshot::centered(DVec2::ZERO, 0.0, LENGTH, WIDTH, MASS).with_speed(speed);
    let b = AgentSnapshot::centered(DVec2::new(LENGTH - overlap, 0.0), PI, LENGTH, WIDTH, MASS)
        .with_speed(speed);
    (a, b)
}

/// Car 1 striking the left flank of car 2 at an angle.
pub fn oblique(angle: f64, speed: f64) -> (AgentSnapshot, AgentSnapshot) {
    let a = AgentSnapshot::centered(DVec2::ZERO, 0.0, LENGTH, WIDTH, MASS).with_speed(speed);
    let b = AgentSnapshot::centered(DVec2::new(3.0, 0.4), angle, LENGTH, WIDTH, MASS)
        .with_speed(speed);
    (a, b)
}

/// Footprint vertices of both agents.
pub fn footprints(a: &AgentSnapshot, b: &AgentSnapshot) -> (Vec<DVec2>, Vec<DVec2>) {
    (
        footprint(a).into_vertices(),
        footprint(b).into_vertices(),
    )
}

/// `n` head-on pairs spread along the y axis, with one collision event per
/// pair.
pub fn setup_pair_world(n: usize) -> (hecs::World, Vec<CollisionEvent>) {
    let mut world = hecs::World::new();
    let mut events = Vec::with_capacity(n);
    for i in 0..n {
        let offset = DVec2::new(0.0, 10.0 * i as f64);
        let (mut a, mut b) = head_on(0.4, 10.0);
        a.position += offset;
        b.position += offset;
        let agent = spawn_agent(&mut world, a);
        let opponent = spawn_agent(&mut world, b);
        events.push(CollisionEvent {
            agent,
            opponent: CollisionOpponent::Agent(opponent),
        });
    }
    (world, events)
}
