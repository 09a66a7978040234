//! Search for the moment of first contact between two agents.
//!
//! Agent state is only sampled once per scheduling cycle, so by the time two
//! agents are flagged as colliding their footprints already overlap. The
//! search walks both footprints back along their constant-velocity
//! trajectories until they separate, then bisects down to one millisecond.

use tracing::trace;

use crate::agent::AgentSnapshot;
use crate::error::{CollisionError, CollisionResult};
use crate::geometry::intersection_points;

use super::footprint::{displacement, footprint};
use super::PostCrashConfig;

/// Relative speeds below this never bring the footprints apart [m/s].
const MIN_RELATIVE_SPEED: f64 = 1e-5;

/// Signed offset in milliseconds of the first overlap of both footprints,
/// relative to the snapshot time (zero or negative).
pub fn first_contact(
    agent1: &AgentSnapshot,
    agent2: &AgentSnapshot,
    config: &PostCrashConfig,
) -> CollisionResult<i32> {
    let relative_speed = (agent1.velocity - agent2.velocity).length();
    if relative_speed < MIN_RELATIVE_SPEED {
        return Err(CollisionError::NoConvergence { relative_speed });
    }

    let polygon1 = footprint(agent1);
    let polygon2 = footprint(agent2);
    let intersects_at = |time_ms: i32| {
        let p1 = polygon1.translated(displacement(agent1, time_ms));
        let p2 = polygon2.translated(displacement(agent2, time_ms));
        !intersection_points(p1.vertices(), p2.vertices()).is_empty()
    };

    // Coarse phase: step back one cycle at a time until contact is lost.
    let mut time_first_contact;
    let mut last_time_no_contact: i32 = 0;
    let mut cycles = 0;
    loop {
        time_first_contact = last_time_no_contact;
        last_time_no_contact = last_time_no_contact
            .checked_sub(config.cycle_time_ms)
            .ok_or(CollisionError::NoConvergence { relative_speed })?;
        if !intersects_at(last_time_no_contact) {
            break;
        }
        cycles += 1;
        if cycles >= config.max_backward_cycles {
            return Err(CollisionError::NoConvergence { relative_speed });
        }
    }

    // Fine phase: bisect the bracket down to one millisecond.
    let mut ever_intersected = false;
    while (time_first_contact - last_time_no_contact).abs() > 1 {
        let next_time = last_time_no_contact - (last_time_no_contact - time_first_contact) / 2;
        if intersects_at(next_time) {
            time_first_contact = next_time;
            ever_intersected = true;
        } else {
            last_time_no_contact = next_time;
        }
    }

    trace!(
        time_first_contact,
        last_time_no_contact,
        cycles,
        "first contact search finished"
    );

    if !ever_intersected {
        return Err(CollisionError::NoContactFound);
    }
    Ok(time_first_contact)
}
