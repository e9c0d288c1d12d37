use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{LoanId, LoanStatus};

/// mutable loan state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanState {
    pub loan_id: LoanId,

    // balances
    pub paid_amount: Money,
    pub remaining_amount: Money,

    // payment tracking
    pub payment_count: u32,
    pub last_payment_amount: Option<Money>,
    pub last_payment_date: Option<DateTime<Utc>>,

    // dates
    pub originated_at: DateTime<Utc>,
    pub last_status_change: DateTime<Utc>,
    pub last_terms_change: Option<DateTime<Utc>>,

    pub status: LoanStatus,
}

impl LoanState {
    /// fresh active state owing the full payable amount
    pub fn new(loan_id: LoanId, total_payable: Money, originated_at: DateTime<Utc>) -> Self {
        Self {
            loan_id,
            paid_amount: Money::ZERO,
            remaining_amount: total_payable,
            payment_count: 0,
            last_payment_amount: None,
            last_payment_date: None,
            originated_at,
            last_status_change: originated_at,
            last_terms_change: None,
            status: LoanStatus::Active,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.remaining_amount.is_zero()
    }

    pub fn update_status(&mut self, new_status: LoanStatus, timestamp: DateTime<Utc>) {
        self.status = new_status;
        self.last_status_change = timestamp;
    }

    /// record payment; caller has checked the amount against the balance
    pub fn record_payment(&mut self, amount: Money, total_payable: Money, timestamp: DateTime<Utc>) {
        self.paid_amount += amount;
        self.remaining_amount = total_payable - self.paid_amount;
        self.payment_count += 1;
        self.last_payment_amount = Some(amount);
        self.last_payment_date = Some(timestamp);
    }

    /// rebase the balance on a new payable total, keeping what was paid
    pub fn rebase(&mut self, total_payable: Money, timestamp: DateTime<Utc>) {
        self.remaining_amount = total_payable - self.paid_amount;
        self.last_terms_change = Some(timestamp);
    }
}

/// state snapshot for audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub snapshot_id: Uuid,
    pub loan_id: LoanId,
    pub timestamp: DateTime<Utc>,
    pub state: LoanState,
    pub trigger: String,
}

impl StateSnapshot {
    pub fn capture(state: &LoanState, trigger: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            snapshot_id: Uuid::new_v4(),
            loan_id: state.loan_id,
            timestamp,
            state: state.clone(),
            trigger,
        }
    }
}
