use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::{CommandKind, LoanId, LoanStatus};

/// malformed loan terms, raised by the amortization calculator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidLoanTerms {
    #[error("invalid loan terms: principal must be positive, got {principal}")]
    NonPositivePrincipal {
        principal: Money,
    },

    #[error("invalid loan terms: term must be at least one month, got {term_months}")]
    NonPositiveTerm {
        term_months: u32,
    },

    #[error("invalid loan terms: interest rate must not be negative, got {rate}")]
    NegativeRate {
        rate: Rate,
    },

    #[error("invalid loan terms: term of {term_months} months exceeds maximum {max_term_months}")]
    TermTooLong {
        term_months: u32,
        max_term_months: u32,
    },

    #[error("invalid loan terms: payment calculation overflowed for rate {rate} over {term_months} months")]
    CalculationOverflow {
        rate: Rate,
        term_months: u32,
    },
}

/// rejected lifecycle command; the loan is left unchanged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("invalid transition: cannot {command} a loan in status {status}")]
    InvalidTransition {
        status: LoanStatus,
        command: CommandKind,
    },

    #[error("overpayment: payment {amount} must be positive and at most remaining {remaining}")]
    Overpayment {
        amount: Money,
        remaining: Money,
    },

    #[error("paid amount {paid} exceeds new total payable {total_payable}")]
    PaidExceedsTotal {
        paid: Money,
        total_payable: Money,
    },

    #[error(transparent)]
    InvalidTerms(#[from] InvalidLoanTerms),
}

/// errors raised by the loan book
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("portfolio totals overflowed after {loan_count} loans")]
    TotalsOverflow {
        loan_count: usize,
    },

    #[error(transparent)]
    InvalidTerms(#[from] InvalidLoanTerms),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

pub type Result<T, E = LifecycleError> = std::result::Result<T, E>;
