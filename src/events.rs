use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amortization::AmortizationSummary;
use crate::config::LoanTerms;
use crate::decimal::Money;
use crate::types::{CommandKind, LoanId, LoanStatus};

/// all events that can be emitted by a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanEvent {
    LoanOriginated {
        loan_id: LoanId,
        terms: LoanTerms,
        summary: AmortizationSummary,
        timestamp: DateTime<Utc>,
    },
    PaymentRecorded {
        loan_id: LoanId,
        amount: Money,
        paid_amount: Money,
        remaining_amount: Money,
        timestamp: DateTime<Utc>,
    },
    TermsEdited {
        loan_id: LoanId,
        old_terms: LoanTerms,
        new_terms: LoanTerms,
        old_summary: AmortizationSummary,
        new_summary: AmortizationSummary,
        timestamp: DateTime<Utc>,
    },
    StatusChanged {
        loan_id: LoanId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        command: CommandKind,
        timestamp: DateTime<Utc>,
    },
}

impl LoanEvent {
    pub fn loan_id(&self) -> LoanId {
        match self {
            LoanEvent::LoanOriginated { loan_id, .. }
            | LoanEvent::PaymentRecorded { loan_id, .. }
            | LoanEvent::TermsEdited { loan_id, .. }
            | LoanEvent::StatusChanged { loan_id, .. } => *loan_id,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<LoanEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: LoanEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<LoanEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[LoanEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
