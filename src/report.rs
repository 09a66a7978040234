//! Flat crash report combining both agents' post-crash dynamics and the
//! collision angles, in the key order downstream log consumers expect.

use std::fmt;

use crate::collision::{CollisionAngles, PostCrashDynamic, PostCrashOutcome};

/// Name under which crash reports are published.
pub const CRASH_REPORT_NAME: &str = "ExtendedCollisionInformation";

/// Value of a single report entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportValue {
    Number(f64),
    Flag(bool),
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportValue::Number(value) => write!(f, "{value}"),
            ReportValue::Flag(value) => write!(f, "{value}"),
        }
    }
}

/// Ordered key/value record of one agent–agent collision.
#[derive(Debug, Clone, PartialEq)]
pub struct CrashReport {
    pub name: &'static str,
    pub parameters: Vec<(String, ReportValue)>,
}

fn push_dynamic(parameters: &mut Vec<(String, ReportValue)>, prefix: &str, d: &PostCrashDynamic) {
    let entries = [
        ("Velocity", ReportValue::Number(d.velocity)),
        ("VelocityChange", ReportValue::Number(d.velocity_change)),
        ("VelocityDirection", ReportValue::Number(d.velocity_direction)),
        ("YawVelocity", ReportValue::Number(d.yaw_velocity)),
        ("PointOfContactLocalX", ReportValue::Number(d.point_of_contact_local.x)),
        ("PointOfContactLocalY", ReportValue::Number(d.point_of_contact_local.y)),
        ("CollisionVelocity", ReportValue::Number(d.collision_velocity)),
        ("Sliding", ReportValue::Flag(d.sliding)),
    ];
    parameters.extend(
        entries
            .into_iter()
            .map(|(key, value)| (format!("{prefix}{key}"), value)),
    );
}

impl CrashReport {
    pub fn new(outcome: &PostCrashOutcome, angles: &CollisionAngles) -> Self {
        let mut parameters = Vec::with_capacity(21);
        push_dynamic(&mut parameters, "", &outcome.agent1);
        push_dynamic(&mut parameters, "Opponent", &outcome.agent2);
        parameters.extend([
            ("OYA".to_string(), ReportValue::Number(angles.oya)),
            ("HCPAo".to_string(), ReportValue::Number(angles.hcpa_o)),
            ("OCPAo".to_string(), ReportValue::Number(angles.ocpa_o)),
            ("HCPA".to_string(), ReportValue::Number(angles.hcpa)),
            ("OCPA".to_string(), ReportValue::Number(angles.ocpa)),
        ]);
        Self {
            name: CRASH_REPORT_NAME,
            parameters,
        }
    }

    /// Look up an entry by key.
    pub fn get(&self, key: &str) -> Option<ReportValue> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| *value)
    }
}

impl fmt::Display for CrashReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (key, value) in &self.parameters {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}
