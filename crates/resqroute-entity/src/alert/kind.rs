//! Alert classification enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use resqroute_core::AppError;

/// Kind of emergency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Fire,
    Medical,
    Accident,
    Traffic,
    Police,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Medical => "medical",
            Self::Accident => "accident",
            Self::Traffic => "traffic",
            Self::Police => "police",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fire" => Ok(Self::Fire),
            "medical" => Ok(Self::Medical),
            "accident" => Ok(Self::Accident),
            "traffic" => Ok(Self::Traffic),
            "police" => Ok(Self::Police),
            _ => Err(AppError::validation(format!(
                "Invalid alert type: '{s}'. Expected one of: fire, medical, accident, traffic, police"
            ))),
        }
    }
}

/// Urgency of an alert.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "alert_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    Low,
    Medium,
    #[default]
    High,
    Critical,
}

impl AlertPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertPriority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(AppError::validation(format!(
                "Invalid priority: '{s}'. Expected one of: low, medium, high, critical"
            ))),
        }
    }
}

/// Lifecycle state of an alert.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "alert_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Active,
    Resolved,
    Cancelled,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "resolved" => Ok(Self::Resolved),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(AppError::validation("Invalid status")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(AlertPriority::default(), AlertPriority::High);
        assert_eq!(AlertStatus::default(), AlertStatus::Active);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("FIRE".parse::<AlertType>().unwrap(), AlertType::Fire);
        assert_eq!("Critical".parse::<AlertPriority>().unwrap(), AlertPriority::Critical);
        assert_eq!("resolved".parse::<AlertStatus>().unwrap(), AlertStatus::Resolved);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("flood".parse::<AlertType>().is_err());
        assert!("urgent".parse::<AlertPriority>().is_err());
        let err = "closed".parse::<AlertStatus>().unwrap_err();
        assert_eq!(err.message, "Invalid status");
    }
}
