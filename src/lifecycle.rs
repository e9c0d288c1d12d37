use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::LoanTerms;
use crate::decimal::Money;
use crate::errors::{LifecycleError, Result};
use crate::types::{CommandKind, LoanStatus};

/// externally issued command against a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum LoanCommand {
    MarkCompleted,
    MarkDefaulted,
    Cancel,
    RecordPayment { amount: Money },
    EditTerms { terms: LoanTerms },
}

impl LoanCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            LoanCommand::MarkCompleted => CommandKind::MarkCompleted,
            LoanCommand::MarkDefaulted => CommandKind::MarkDefaulted,
            LoanCommand::Cancel => CommandKind::Cancel,
            LoanCommand::RecordPayment { .. } => CommandKind::RecordPayment,
            LoanCommand::EditTerms { .. } => CommandKind::EditTerms,
        }
    }
}

/// commands accepted in the given status
pub fn allowed_commands(status: LoanStatus) -> BTreeSet<CommandKind> {
    match status {
        LoanStatus::Active => CommandKind::ALL.into_iter().collect(),
        LoanStatus::Completed | LoanStatus::Defaulted | LoanStatus::Cancelled => BTreeSet::new(),
    }
}

pub fn is_allowed(status: LoanStatus, command: CommandKind) -> bool {
    allowed_commands(status).contains(&command)
}

/// status after applying `command` in `status`; balance-only commands keep the status
pub fn next_status(status: LoanStatus, command: CommandKind) -> Result<LoanStatus> {
    if !is_allowed(status, command) {
        return Err(LifecycleError::InvalidTransition { status, command });
    }

    Ok(match command {
        CommandKind::MarkCompleted => LoanStatus::Completed,
        CommandKind::MarkDefaulted => LoanStatus::Defaulted,
        CommandKind::Cancel => LoanStatus::Cancelled,
        CommandKind::RecordPayment | CommandKind::EditTerms => status,
    })
}
