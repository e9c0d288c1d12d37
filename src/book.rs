use hourglass_rs::{SafeTimeProvider, TimeSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::amortization::AmortizationCalculator;
use crate::config::{LedgerConfig, LoanTerms};
use crate::decimal::Money;
use crate::errors::BookError;
use crate::lifecycle::LoanCommand;
use crate::loan::Loan;
use crate::types::{LoanId, LoanStatus};

/// in-memory store of loans sharing one configuration and clock
pub struct LoanBook {
    loans: BTreeMap<LoanId, Loan>,
    calculator: AmortizationCalculator,
    time_provider: SafeTimeProvider,
}

/// aggregate figures across the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub loan_count: usize,
    pub active_count: usize,
    pub total_principal: Money,
    pub total_payable: Money,
    pub total_paid: Money,
    /// remaining balance on active loans only
    pub total_outstanding: Money,
}

impl LoanBook {
    pub fn new(config: LedgerConfig, time_provider: SafeTimeProvider) -> Self {
        Self {
            loans: BTreeMap::new(),
            calculator: AmortizationCalculator::new(config),
            time_provider,
        }
    }

    pub fn with_system_time(config: LedgerConfig) -> Self {
        Self::new(config, SafeTimeProvider::new(TimeSource::System))
    }

    pub fn time_provider(&self) -> &SafeTimeProvider {
        &self.time_provider
    }

    pub fn config(&self) -> &LedgerConfig {
        self.calculator.config()
    }

    /// originate a loan and store it
    pub fn originate(&mut self, borrower: impl Into<String>, terms: LoanTerms) -> Result<LoanId, BookError> {
        let loan = Loan::originate(borrower.into(), terms, self.calculator, &self.time_provider)?;
        let id = loan.id();
        self.loans.insert(id, loan);
        Ok(id)
    }

    pub fn get(&self, id: LoanId) -> Result<&Loan, BookError> {
        self.loans.get(&id).ok_or(BookError::LoanNotFound { id })
    }

    /// apply a command to a stored loan
    pub fn apply(&mut self, id: LoanId, command: LoanCommand) -> Result<&Loan, BookError> {
        let loan = self
            .loans
            .get_mut(&id)
            .ok_or(BookError::LoanNotFound { id })?;
        loan.apply(command, &self.time_provider)?;
        Ok(loan)
    }

    /// remove a loan regardless of status
    pub fn delete(&mut self, id: LoanId) -> Result<Loan, BookError> {
        let loan = self.loans.remove(&id).ok_or(BookError::LoanNotFound { id })?;
        info!(loan_id = %id, status = %loan.status(), "loan deleted");
        Ok(loan)
    }

    pub fn loans(&self) -> impl Iterator<Item = &Loan> {
        self.loans.values()
    }

    pub fn loans_with_status(&self, status: LoanStatus) -> impl Iterator<Item = &Loan> {
        self.loans.values().filter(move |loan| loan.status() == status)
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    /// totals across every stored loan
    pub fn portfolio_summary(&self) -> Result<PortfolioSummary, BookError> {
        let mut acc = PortfolioSummary::default();
        for loan in self.loans.values() {
            let overflow = BookError::TotalsOverflow { loan_count: acc.loan_count };
            acc.loan_count += 1;
            acc.total_principal = acc
                .total_principal
                .checked_add(loan.terms().principal)
                .ok_or_else(|| overflow.clone())?;
            acc.total_payable = acc
                .total_payable
                .checked_add(loan.summary().total_payable)
                .ok_or_else(|| overflow.clone())?;
            acc.total_paid = acc
                .total_paid
                .checked_add(loan.paid_amount())
                .ok_or_else(|| overflow.clone())?;
            if loan.status() == LoanStatus::Active {
                acc.active_count += 1;
                acc.total_outstanding = acc
                    .total_outstanding
                    .checked_add(loan.remaining_amount())
                    .ok_or(overflow)?;
            }
        }
        Ok(acc)
    }
}
