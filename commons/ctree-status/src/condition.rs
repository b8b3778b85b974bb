use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Condition type that carries the readiness summary of an object.
pub const READY_CONDITION: &str = "Ready";

#[derive(
    Deserialize,
    Serialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[serde(rename_all = "PascalCase")]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl ConditionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionStatus::True => "True",
            ConditionStatus::False => "False",
            ConditionStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a non-True condition. An empty severity on the wire maps to
/// `None`.
#[derive(
    Deserialize,
    Serialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
)]
pub enum ConditionSeverity {
    Error,
    Warning,
    Info,
    #[default]
    #[serde(rename = "")]
    None,
}

impl ConditionSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionSeverity::Error => "Error",
            ConditionSeverity::Warning => "Warning",
            ConditionSeverity::Info => "Info",
            ConditionSeverity::None => "",
        }
    }
}

impl fmt::Display for ConditionSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cluster API style condition.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: ConditionStatus,
    #[serde(default)]
    pub severity: ConditionSeverity,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
    #[serde(
        rename = "lastTransitionTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_transition_time: Option<DateTime<Utc>>,
}

impl Condition {
    pub fn new(type_: impl Into<String>, status: ConditionStatus) -> Self {
        Self {
            type_: type_.into(),
            status,
            severity: ConditionSeverity::None,
            reason: String::new(),
            message: String::new(),
            last_transition_time: None,
        }
    }

    pub fn ready_true() -> Self {
        Self::new(READY_CONDITION, ConditionStatus::True)
    }

    pub fn ready_false(
        reason: impl Into<String>,
        severity: ConditionSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            reason: reason.into(),
            severity,
            message: message.into(),
            ..Self::new(READY_CONDITION, ConditionStatus::False)
        }
    }

    pub fn with_transition(mut self, at: DateTime<Utc>) -> Self {
        self.last_transition_time = Some(at);
        self
    }

    pub fn is_ready_type(&self) -> bool {
        self.type_ == READY_CONDITION
    }
}

/// Semantic class of a condition; the presentation layer picks colors by it.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadinessClass {
    Ok,
    Error,
    Warning,
    Neutral,
    Unknown,
}

/// Equivalent for grouping: status, severity and reason match.
/// Two absent conditions are equivalent, one absent and one present are not.
pub fn equivalent(a: Option<&Condition>, b: Option<&Condition>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.status == b.status
                && a.severity == b.severity
                && a.reason == b.reason
        }
        _ => false,
    }
}

/// Earliest transition time among the present conditions.
pub fn earliest_transition(
    a: Option<&Condition>,
    b: Option<&Condition>,
) -> Option<DateTime<Utc>> {
    let a = a.and_then(|c| c.last_transition_time);
    let b = b.and_then(|c| c.last_transition_time);
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

pub fn classify(condition: Option<&Condition>) -> ReadinessClass {
    let Some(c) = condition else {
        return ReadinessClass::Unknown;
    };
    match c.status {
        ConditionStatus::True => ReadinessClass::Ok,
        ConditionStatus::False | ConditionStatus::Unknown => match c.severity {
            ConditionSeverity::Error => ReadinessClass::Error,
            ConditionSeverity::Warning => ReadinessClass::Warning,
            _ => ReadinessClass::Neutral,
        },
    }
}
