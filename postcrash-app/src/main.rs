use anyhow::{ensure, Context};
use clap::Parser;
use glam::DVec2;
use tracing::info;

use postcrash::{
    spawn_agent, AgentSnapshot, CollisionEvent, CollisionManipulator, CollisionOpponent,
    CollisionResponseState, PostCrashConfig, PostCrashResponse, PreCrashYawRate, ResponseConfig,
};

/// Run a two-vehicle collision and print the crash report and the
/// post-crash motion of both vehicles.
#[derive(Parser, Debug)]
struct Args {
    /// Speed of the first vehicle [m/s].
    #[arg(long, default_value_t = 10.0)]
    speed1: f64,
    /// Speed of the second vehicle [m/s].
    #[arg(long, default_value_t = 10.0)]
    speed2: f64,
    /// Position of the second vehicle relative to the first [m].
    #[arg(long, default_value_t = 4.1)]
    x: f64,
    #[arg(long, default_value_t = 0.0)]
    y: f64,
    /// Heading of the second vehicle [deg].
    #[arg(long, default_value_t = 180.0)]
    heading: f64,
    /// Vehicle mass [kg].
    #[arg(long, default_value_t = 1500.0)]
    mass: f64,
    #[arg(long, default_value_t = 0.2)]
    restitution: f64,
    #[arg(long, default_value_t = 0.2)]
    friction: f64,
    /// Use the vehicles' yaw rates in the momentum solve.
    #[arg(long)]
    with_yaw_rate: bool,
    /// Simulation cycle time [ms].
    #[arg(long, default_value_t = 100)]
    cycle_time: i32,
    /// Cycles to simulate after the impact.
    #[arg(long, default_value_t = 10)]
    cycles: u32,
}

/// Log filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "info,postcrash=info";

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();
    ensure!(args.cycle_time > 0, "cycle time must be positive");

    let config = PostCrashConfig {
        coefficient_of_restitution: args.restitution,
        inter_friction: args.friction,
        cycle_time_ms: args.cycle_time,
        pre_crash_yaw_rate: if args.with_yaw_rate {
            PreCrashYawRate::FromAgent
        } else {
            PreCrashYawRate::Zero
        },
        ..PostCrashConfig::default()
    };
    config.validate().context("invalid collision parameters")?;

    let mut world = hecs::World::new();
    let host = spawn_agent(
        &mut world,
        AgentSnapshot::centered(DVec2::ZERO, 0.0, 4.5, 1.8, args.mass).with_speed(args.speed1),
    );
    let opponent = spawn_agent(
        &mut world,
        AgentSnapshot::centered(
            DVec2::new(args.x, args.y),
            args.heading.to_radians(),
            4.5,
            1.8,
            args.mass,
        )
        .with_speed(args.speed2),
    );

    let mut manipulator = CollisionManipulator::new(config);
    let reports = manipulator.trigger(
        &mut world,
        &[CollisionEvent {
            agent: host,
            opponent: CollisionOpponent::Agent(opponent),
        }],
    );
    let report = reports
        .first()
        .context("no post-crash dynamics for this configuration")?;
    info!("{report}");

    let response = PostCrashResponse::new(ResponseConfig::default());
    for cycle in 0..args.cycles {
        for (entity, signal) in
            postcrash::post_crash_response_system(&mut world, &response, args.cycle_time)
        {
            let role = if entity == host { "host" } else { "opponent" };
            info!(
                cycle,
                role,
                x = signal.position_x,
                y = signal.position_y,
                velocity = signal.velocity,
                yaw_rate = signal.yaw_rate,
                "post-crash motion"
            );

            // Feed the signal back as next cycle's snapshot.
            let direction = world
                .get::<&CollisionResponseState>(entity)
                .context("agent without collision state")?
                .moving_direction;
            let mut agent = world
                .get::<&mut postcrash::Agent>(entity)
                .context("agent vanished from the world")?;
            let snapshot = &mut agent.0;
            snapshot.position = DVec2::new(signal.position_x, signal.position_y);
            snapshot.yaw = signal.yaw;
            snapshot.yaw_rate = signal.yaw_rate;
            snapshot.yaw_acceleration = signal.yaw_acceleration;
            snapshot.velocity = DVec2::new(direction.cos(), direction.sin()) * signal.velocity;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["postcrash-app"]);
        assert_eq!(args.cycle_time, 100);
        assert!((args.x - 4.1).abs() < 1e-12);
        assert!(!args.with_yaw_rate);
    }
}
