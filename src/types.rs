use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// loan created and being repaid
    Active,
    /// fully settled
    Completed,
    /// borrower failed to repay
    Defaulted,
    /// withdrawn before completion
    Cancelled,
}

impl LoanStatus {
    /// terminal states accept no further commands
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoanStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Completed => "completed",
            LoanStatus::Defaulted => "defaulted",
            LoanStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// kind of lifecycle command, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    MarkCompleted,
    MarkDefaulted,
    Cancel,
    RecordPayment,
    EditTerms,
}

impl CommandKind {
    pub const ALL: [CommandKind; 5] = [
        CommandKind::MarkCompleted,
        CommandKind::MarkDefaulted,
        CommandKind::Cancel,
        CommandKind::RecordPayment,
        CommandKind::EditTerms,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::MarkCompleted => "mark_completed",
            CommandKind::MarkDefaulted => "mark_defaulted",
            CommandKind::Cancel => "cancel",
            CommandKind::RecordPayment => "record_payment",
            CommandKind::EditTerms => "edit_terms",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// rounding applied when amounts are reduced to whole currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// .5 rounds away from zero
    #[default]
    HalfUp,
    /// .5 rounds to the even neighbour (banker's rounding)
    HalfEven,
}

impl RoundingMode {
    pub fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!LoanStatus::Active.is_terminal());
        assert!(LoanStatus::Completed.is_terminal());
        assert!(LoanStatus::Defaulted.is_terminal());
        assert!(LoanStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&LoanStatus::Defaulted).unwrap();
        assert_eq!(json, "\"defaulted\"");

        let status: LoanStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, LoanStatus::Cancelled);
    }

    #[test]
    fn test_command_kind_names_match_serde() {
        for kind in CommandKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
