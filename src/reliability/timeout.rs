//! A bare wall-clock deadline attached to a single task attempt or workflow.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A deadline, in wall-clock terms, for a single unit of work.
///
/// Unlike the teacher's original `TimeoutManager`, this carries no
/// persistence-store coupling: it is just a `Duration` with named
/// constructors, applied by [`crate::workflow::timeout::Timeout`] or a
/// [`crate::task::TaskDescriptor`]'s per-attempt timeout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeoutPolicy {
    #[serde(with = "duration_millis")]
    duration: Duration,
}

impl TimeoutPolicy {
    pub fn of_millis(millis: u64) -> Self {
        Self { duration: Duration::from_millis(millis) }
    }

    pub fn of_secs(secs: u64) -> Self {
        Self { duration: Duration::from_secs(secs) }
    }

    pub fn of_minutes(minutes: u64) -> Self {
        Self { duration: Duration::from_secs(minutes * 60) }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
