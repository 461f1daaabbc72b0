//! Closed status enumerations for `status`-labelled metrics.
//!
//! Every variant of every enum here is materialized as an empty series when
//! [`HubMetrics`](super::catalog::HubMetrics) initializes, so a dashboard can
//! tell "no failures yet" from "metric missing".

use std::fmt;

/// A closed set of values for one metric's `status` label.
pub trait StatusLabel: Copy + fmt::Debug + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// Label value as exposed to scrapers.
    fn as_str(&self) -> &'static str;
}

/// Outcome of a server spawn.
///
/// Label for `jupyterhub_server_spawn_duration_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerSpawnStatus {
    Success,
    Failure,
    AlreadyPending,
    Throttled,
    TooManyUsers,
}

impl StatusLabel for ServerSpawnStatus {
    const ALL: &'static [Self] = &[
        Self::Success,
        Self::Failure,
        Self::AlreadyPending,
        Self::Throttled,
        Self::TooManyUsers,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::AlreadyPending => "already-pending",
            Self::Throttled => "throttled",
            Self::TooManyUsers => "too-many-users",
        }
    }
}

/// Outcome of adding a user route to the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyAddStatus {
    Success,
    Failure,
}

impl StatusLabel for ProxyAddStatus {
    const ALL: &'static [Self] = &[Self::Success, Self::Failure];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Result of polling a single-user server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerPollStatus {
    Running,
    Stopped,
}

impl ServerPollStatus {
    /// Classify a spawner poll result.
    ///
    /// A poll yields no status while the process is alive; any status at all
    /// (an exit code, even `0`) means it stopped.
    pub fn from_status<T>(status: Option<T>) -> Self {
        match status {
            None => Self::Running,
            Some(_) => Self::Stopped,
        }
    }
}

impl StatusLabel for ServerPollStatus {
    const ALL: &'static [Self] = &[Self::Running, Self::Stopped];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }
}

/// Outcome of stopping a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerStopStatus {
    Success,
    Failure,
}

impl StatusLabel for ServerStopStatus {
    const ALL: &'static [Self] = &[Self::Success, Self::Failure];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Outcome of deleting a user route from the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyDeleteStatus {
    Success,
    Failure,
}

impl StatusLabel for ProxyDeleteStatus {
    const ALL: &'static [Self] = &[Self::Success, Self::Failure];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for ServerSpawnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ProxyAddStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ServerPollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ServerStopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ProxyDeleteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<S: StatusLabel>() -> Vec<&'static str> {
        S::ALL.iter().map(StatusLabel::as_str).collect()
    }

    #[test]
    fn test_server_spawn_values() {
        assert_eq!(
            values::<ServerSpawnStatus>(),
            vec![
                "success",
                "failure",
                "already-pending",
                "throttled",
                "too-many-users"
            ]
        );
    }

    #[test]
    fn test_two_outcome_values() {
        assert_eq!(values::<ProxyAddStatus>(), vec!["success", "failure"]);
        assert_eq!(values::<ServerStopStatus>(), vec!["success", "failure"]);
        assert_eq!(values::<ProxyDeleteStatus>(), vec!["success", "failure"]);
        assert_eq!(values::<ServerPollStatus>(), vec!["running", "stopped"]);
    }

    #[test]
    fn test_display_matches_label_value() {
        assert_eq!(ServerSpawnStatus::AlreadyPending.to_string(), "already-pending");
        assert_eq!(ServerSpawnStatus::TooManyUsers.to_string(), "too-many-users");
        assert_eq!(ProxyAddStatus::Failure.to_string(), "failure");
        assert_eq!(ServerPollStatus::Running.to_string(), "running");
        assert_eq!(ServerStopStatus::Success.to_string(), "success");
        assert_eq!(ProxyDeleteStatus::Success.to_string(), "success");
    }

    #[test]
    fn test_poll_status_from_none_is_running() {
        assert_eq!(
            ServerPollStatus::from_status(None::<i32>),
            ServerPollStatus::Running
        );
    }

    #[test]
    fn test_poll_status_from_any_value_is_stopped() {
        assert_eq!(ServerPollStatus::from_status(Some(0)), ServerPollStatus::Stopped);
        assert_eq!(ServerPollStatus::from_status(Some(1)), ServerPollStatus::Stopped);
        assert_eq!(ServerPollStatus::from_status(Some(-9)), ServerPollStatus::Stopped);
        assert_eq!(
            ServerPollStatus::from_status(Some("exited")),
            ServerPollStatus::Stopped
        );
    }

    #[test]
    fn test_enums_are_non_empty() {
        assert!(!ServerSpawnStatus::ALL.is_empty());
        assert!(!ProxyAddStatus::ALL.is_empty());
        assert!(!ServerPollStatus::ALL.is_empty());
        assert!(!ServerStopStatus::ALL.is_empty());
        assert!(!ProxyDeleteStatus::ALL.is_empty());
    }
}
