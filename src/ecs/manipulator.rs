//! Applies collision events to the world.
//!
//! Collision partners are transitive: when two agents collide, each inherits
//! the other's partners, so a pile-up is one connected set. Agent–agent
//! collisions additionally run the post-crash computation and leave the
//! resulting [`PostCrashVelocity`] on both agents.

use hecs::{Entity, World};
use tracing::{info, warn};

use crate::collision::{CollisionDetectionPostCrash, PostCrashConfig};
use crate::report::CrashReport;
use crate::response::PostCrashVelocity;

use super::components::{Agent, CollisionPartner, CollisionPartners};

/// What an agent collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOpponent {
    Agent(Entity),
    Object(u64),
}

/// A collision reported by the world for the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub agent: Entity,
    pub opponent: CollisionOpponent,
}

fn partners_of(world: &World, entity: Entity) -> Vec<CollisionPartner> {
    world
        .get::<&CollisionPartners>(entity)
        .map(|partners| partners.iter().copied().collect())
        .unwrap_or_default()
}

fn add_partner(world: &mut World, entity: Entity, partner: CollisionPartner) {
    let added = match world.get::<&mut CollisionPartners>(entity) {
        Ok(mut partners) => {
            partners.insert(partner);
            true
        }
        Err(_) => false,
    };
    if !added {
        let mut partners = CollisionPartners::default();
        partners.insert(partner);
        if world.insert_one(entity, partners).is_err() {
            warn!(?entity, "collision partner added to missing entity");
        }
    }
}

/// Link two agents and propagate each one's partners to the other.
fn link_agents(world: &mut World, agent: Entity, opponent: Entity) {
    if agent == opponent || !world.contains(agent) || !world.contains(opponent) {
        return;
    }
    if partners_of(world, agent).contains(&CollisionPartner::Agent(opponent)) {
        return;
    }

    add_partner(world, agent, CollisionPartner::Agent(opponent));
    add_partner(world, opponent, CollisionPartner::Agent(agent));

    for partner in partners_of(world, agent) {
        match partner {
            CollisionPartner::Object(id) => {
                add_partner(world, opponent, CollisionPartner::Object(id))
            }
            CollisionPartner::Agent(other) => link_agents(world, other, opponent),
        }
    }
    for partner in partners_of(world, opponent) {
        match partner {
            CollisionPartner::Object(id) => add_partner(world, agent, CollisionPartner::Object(id)),
            CollisionPartner::Agent(other) => link_agents(world, other, agent),
        }
    }
}

/// Record a collision with a static object on the agent and on every agent
/// it already collided with.
fn link_object(world: &mut World, agent: Entity, object: u64) {
    let partner = CollisionPartner::Object(object);
    for existing in partners_of(world, agent) {
        if let CollisionPartner::Agent(other) = existing {
            add_partner(world, other, partner);
        }
    }
    add_partner(world, agent, partner);
}

/// Consumes collision events and computes crash responses.
///
/// Several agent–agent events in one cycle are resolved pairwise in event
/// order against the same snapshots; an agent involved in more than one
/// keeps the post-crash velocity of the last pair.
#[derive(Debug, Default)]
pub struct CollisionManipulator {
    detection: CollisionDetectionPostCrash,
}

impl CollisionManipulator {
    pub fn new(config: PostCrashConfig) -> Self {
        Self {
            detection: CollisionDetectionPostCrash::new(config),
        }
    }

    /// Apply this cycle's collision events. Returns one crash report per
    /// successfully computed agent–agent collision.
    pub fn trigger(&mut self, world: &mut World, events: &[CollisionEvent]) -> Vec<CrashReport> {
        let mut reports = Vec::new();
        for event in events {
            match event.opponent {
                CollisionOpponent::Agent(opponent) => {
                    link_agents(world, event.agent, opponent);
                    if let Some(report) = self.calculate_crash(world, event.agent, opponent) {
                        reports.push(report);
                    }
                }
                CollisionOpponent::Object(object) => link_object(world, event.agent, object),
            }
        }
        reports
    }

    fn calculate_crash(
        &mut self,
        world: &mut World,
        agent: Entity,
        opponent: Entity,
    ) -> Option<CrashReport> {
        let snapshot = |entity: Entity| world.get::<&Agent>(entity).map(|a| a.0).ok();
        let (Some(agent1), Some(agent2)) = (snapshot(agent), snapshot(opponent)) else {
            warn!(?agent, ?opponent, "collision event for entity without agent snapshot");
            return None;
        };

        let outcome = match self.detection.create_post_crash_dynamics(&agent1, &agent2) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(?agent, ?opponent, %err, "post-crash calculation failed");
                return None;
            }
        };

        for (entity, dynamic) in [(agent, &outcome.agent1), (opponent, &outcome.agent2)] {
            let velocity = PostCrashVelocity::from(dynamic);
            let stored = match world.get::<&mut PostCrashVelocity>(entity) {
                Ok(mut current) => {
                    if current.is_active {
                        info!(?entity, "replacing pending post-crash velocity");
                    }
                    *current = velocity;
                    true
                }
                Err(_) => false,
            };
            if !stored && world.insert_one(entity, velocity).is_err() {
                warn!(?entity, "post-crash velocity for missing entity");
            }
        }

        Some(CrashReport::new(&outcome, &self.detection.collision_angles()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentSnapshot;
    use crate::ecs::components::spawn_agent;
    use crate::report::ReportValue;
    use glam::DVec2;
    use std::f64::consts::PI;

    fn car(x: f64, yaw: f64) -> AgentSnapshot {
        AgentSnapshot::centered(DVec2::new(x, 0.0), yaw, 4.5, 1.8, 1500.0).with_speed(10.0)
    }

    #[test]
    fn test_agent_collision_sets_post_crash_velocity() {
        let mut world = World::new();
        let a = spawn_agent(&mut world, car(0.0, 0.0));
        let b = spawn_agent(&mut world, car(4.1, PI));

        let mut manipulator = CollisionManipulator::default();
        let reports = manipulator.trigger(
            &mut world,
            &[CollisionEvent {
                agent: a,
                opponent: CollisionOpponent::Agent(b),
            }],
        );

        assert_eq!(reports.len(), 1);
        let Some(ReportValue::Number(velocity)) = reports[0].get("OpponentVelocity") else {
            panic!("missing opponent velocity");
        };
        assert!((velocity - 2.0).abs() < 1e-9);
        for entity in [a, b] {
            let velocity = *world.get::<&PostCrashVelocity>(entity).unwrap();
            assert!(velocity.is_active);
            assert!((velocity.velocity_absolute - 2.0).abs() < 1e-9);
        }
        assert_eq!(partners_of(&world, a), vec![CollisionPartner::Agent(b)]);
        assert_eq!(partners_of(&world, b), vec![CollisionPartner::Agent(a)]);
    }

    #[test]
    fn test_failed_calculation_leaves_velocity_inactive() {
        let mut world = World::new();
        let a = spawn_agent(&mut world, car(0.0, 0.0));
        let b = spawn_agent(&mut world, car(20.0, PI));

        let mut manipulator = CollisionManipulator::default();
        let reports = manipulator.trigger(
            &mut world,
            &[CollisionEvent {
                agent: a,
                opponent: CollisionOpponent::Agent(b),
            }],
        );
        assert!(reports.is_empty());
        assert!(!world.get::<&PostCrashVelocity>(a).unwrap().is_active);
        // Partners are linked regardless.
        assert_eq!(partners_of(&world, a), vec![CollisionPartner::Agent(b)]);
    }

    #[test]
    fn test_post_crash_velocity_inserted_when_absent() {
        let mut world = World::new();
        let a = world.spawn((Agent(car(0.0, 0.0)),));
        let b = world.spawn((Agent(car(4.1, PI)),));

        let mut manipulator = CollisionManipulator::default();
        let reports = manipulator.trigger(
            &mut world,
            &[CollisionEvent {
                agent: a,
                opponent: CollisionOpponent::Agent(b),
            }],
        );
        assert_eq!(reports.len(), 1);
        for entity in [a, b] {
            let velocity = *world.get::<&PostCrashVelocity>(entity).unwrap();
            assert!(velocity.is_active);
            assert!((velocity.velocity_absolute - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_partners_are_transitive() {
        let mut world = World::new();
        let a = spawn_agent(&mut world, car(0.0, 0.0));
        let b = spawn_agent(&mut world, car(50.0, 0.0));
        let c = spawn_agent(&mut world, car(100.0, 0.0));

        link_object(&mut world, a, 42);
        link_agents(&mut world, a, b);
        link_agents(&mut world, b, c);

        for (entity, others) in [(a, [b, c]), (b, [a, c]), (c, [a, b])] {
            let p = partners_of(&world, entity);
            for other in others {
                assert!(p.contains(&CollisionPartner::Agent(other)), "{entity:?}");
            }
            assert!(!p.contains(&CollisionPartner::Agent(entity)));
            assert!(p.contains(&CollisionPartner::Object(42)));
        }
    }

    #[test]
    fn test_object_collision_reaches_partners() {
        let mut world = World::new();
        let a = spawn_agent(&mut world, car(0.0, 0.0));
        let b = spawn_agent(&mut world, car(50.0, 0.0));

        let mut manipulator = CollisionManipulator::default();
        manipulator.trigger(
            &mut world,
            &[
                CollisionEvent {
                    agent: a,
                    opponent: CollisionOpponent::Agent(b),
                },
                CollisionEvent {
                    agent: a,
                    opponent: CollisionOpponent::Object(7),
                },
            ],
        );
        assert!(partners_of(&world, a).contains(&CollisionPartner::Object(7)));
        assert!(partners_of(&world, b).contains(&CollisionPartner::Object(7)));
        assert_eq!(partners_of(&world, b).len(), 2);
    }

    #[test]
    fn test_self_collision_is_ignored() {
        let mut world = World::new();
        let a = spawn_agent(&mut world, car(0.0, 0.0));
        link_agents(&mut world, a, a);
        assert!(partners_of(&world, a).is_empty());
    }
}
