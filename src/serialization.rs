/// serialization support for loans
use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use crate::decimal::Money;
use crate::types::{CommandKind, LoanId, LoanStatus};
use crate::loan::Loan;

/// serializable view of a loan, keyed by the payload field names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub borrower: String,
    pub principal_amount: Money,
    /// annual rate in percent
    pub interest_rate: Decimal,
    pub term_months: u32,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_amount: Money,
    pub paid_amount: Money,
    pub remaining_amount: Money,
    pub status: LoanStatus,
    pub allowed_commands: BTreeSet<CommandKind>,
    pub payments: PaymentView,
    pub originated_at: DateTime<Utc>,
    pub last_status_change: DateTime<Utc>,
    pub last_terms_change: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentView {
    pub payment_count: u32,
    pub last_payment_amount: Option<Money>,
    pub last_payment_date: Option<DateTime<Utc>>,
}

impl LoanView {
    pub fn from_loan(loan: &Loan) -> Self {
        let terms = loan.terms();
        let summary = loan.summary();
        let state = loan.state();

        LoanView {
            id: loan.id(),
            borrower: loan.borrower().to_string(),
            principal_amount: terms.principal,
            interest_rate: terms.annual_rate.as_percentage().normalize(),
            term_months: terms.term_months,
            monthly_payment: summary.monthly_payment,
            total_interest: summary.total_interest,
            total_amount: summary.total_payable,
            paid_amount: state.paid_amount,
            remaining_amount: state.remaining_amount,
            status: state.status,
            allowed_commands: loan.allowed_commands(),
            payments: PaymentView {
                payment_count: state.payment_count,
                last_payment_amount: state.last_payment_amount,
                last_payment_date: state.last_payment_date,
            },
            originated_at: state.originated_at,
            last_status_change: state.last_status_change,
            last_terms_change: state.last_terms_change,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Loan {
    pub fn to_view(&self) -> LoanView {
        LoanView::from_loan(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        self.to_view().to_json_pretty()
    }
}
