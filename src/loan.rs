use chrono::{DateTime, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::amortization::{AmortizationCalculator, AmortizationSchedule, AmortizationSummary};
use crate::config::{LedgerConfig, LoanTerms};
use crate::decimal::{Money, Rate};
use crate::errors::{InvalidLoanTerms, LifecycleError, Result};
use crate::events::{EventStore, LoanEvent};
use crate::lifecycle::{self, LoanCommand};
use crate::state::{LoanState, StateSnapshot};
use crate::types::{CommandKind, LoanId, LoanStatus};

/// loan record; lifecycle commands are its only mutators
#[derive(Debug, Clone)]
pub struct Loan {
    id: LoanId,
    borrower: String,
    terms: LoanTerms,
    summary: AmortizationSummary,
    state: LoanState,
    events: EventStore,
    snapshots: Vec<StateSnapshot>,
    calculator: AmortizationCalculator,
}

impl Loan {
    /// builder for creating loans
    pub fn builder() -> LoanBuilder {
        LoanBuilder::new()
    }

    /// originate an active loan with nothing paid
    pub fn originate(
        borrower: String,
        terms: LoanTerms,
        calculator: AmortizationCalculator,
        time_provider: &SafeTimeProvider,
    ) -> std::result::Result<Self, InvalidLoanTerms> {
        let summary = calculator.summarize(&terms)?;
        let id = Uuid::new_v4();
        let now = time_provider.now();

        let mut loan = Self {
            id,
            borrower,
            terms,
            summary,
            state: LoanState::new(id, summary.total_payable, now),
            events: EventStore::new(),
            snapshots: Vec::new(),
            calculator,
        };

        loan.events.emit(LoanEvent::LoanOriginated {
            loan_id: id,
            terms,
            summary,
            timestamp: now,
        });
        loan.snapshots
            .push(StateSnapshot::capture(&loan.state, "origination".to_string(), now));

        info!(
            loan_id = %id,
            borrower = %loan.borrower,
            principal = %terms.principal,
            total_payable = %summary.total_payable,
            "loan originated"
        );

        Ok(loan)
    }

    /// apply a lifecycle command; on error the loan is left untouched
    pub fn apply(&mut self, command: LoanCommand, time_provider: &SafeTimeProvider) -> Result<()> {
        let result = self.try_apply(command, time_provider);
        if let Err(error) = &result {
            warn!(
                loan_id = %self.id,
                status = %self.state.status,
                command = %command.kind(),
                %error,
                "loan command rejected"
            );
        }
        result
    }

    fn try_apply(&mut self, command: LoanCommand, time_provider: &SafeTimeProvider) -> Result<()> {
        let kind = command.kind();
        let next = lifecycle::next_status(self.state.status, kind)?;
        let now = time_provider.now();

        match command {
            LoanCommand::RecordPayment { amount } => self.apply_payment(amount, now)?,
            LoanCommand::EditTerms { terms } => self.apply_terms(terms, now)?,
            LoanCommand::MarkCompleted | LoanCommand::MarkDefaulted | LoanCommand::Cancel => {
                self.apply_status(next, kind, now)
            }
        }

        self.snapshots
            .push(StateSnapshot::capture(&self.state, kind.to_string(), now));
        Ok(())
    }

    fn apply_payment(&mut self, amount: Money, now: DateTime<Utc>) -> Result<()> {
        let remaining = self.state.remaining_amount;
        if !amount.is_positive() || amount > remaining {
            return Err(LifecycleError::Overpayment { amount, remaining });
        }

        self.state.record_payment(amount, self.summary.total_payable, now);

        self.events.emit(LoanEvent::PaymentRecorded {
            loan_id: self.id,
            amount,
            paid_amount: self.state.paid_amount,
            remaining_amount: self.state.remaining_amount,
            timestamp: now,
        });

        debug!(
            loan_id = %self.id,
            %amount,
            remaining = %self.state.remaining_amount,
            "payment recorded"
        );
        if self.state.is_settled() {
            info!(loan_id = %self.id, "loan fully paid");
        }

        Ok(())
    }

    fn apply_terms(&mut self, terms: LoanTerms, now: DateTime<Utc>) -> Result<()> {
        let summary = self.calculator.summarize(&terms)?;
        if summary.total_payable < self.state.paid_amount {
            return Err(LifecycleError::PaidExceedsTotal {
                paid: self.state.paid_amount,
                total_payable: summary.total_payable,
            });
        }

        self.events.emit(LoanEvent::TermsEdited {
            loan_id: self.id,
            old_terms: self.terms,
            new_terms: terms,
            old_summary: self.summary,
            new_summary: summary,
            timestamp: now,
        });

        self.terms = terms;
        self.summary = summary;
        self.state.rebase(summary.total_payable, now);

        info!(
            loan_id = %self.id,
            term_months = terms.term_months,
            total_payable = %summary.total_payable,
            "loan terms edited"
        );

        Ok(())
    }

    fn apply_status(&mut self, new_status: LoanStatus, command: CommandKind, now: DateTime<Utc>) {
        let old_status = self.state.status;
        self.state.update_status(new_status, now);

        self.events.emit(LoanEvent::StatusChanged {
            loan_id: self.id,
            old_status,
            new_status,
            command,
            timestamp: now,
        });

        info!(loan_id = %self.id, %old_status, %new_status, "loan status changed");
    }

    /// mark completed with system time
    pub fn mark_completed(&mut self) -> Result<()> {
        self.apply(LoanCommand::MarkCompleted, &system_time())
    }

    /// mark defaulted with system time
    pub fn mark_defaulted(&mut self) -> Result<()> {
        self.apply(LoanCommand::MarkDefaulted, &system_time())
    }

    /// cancel with system time
    pub fn cancel(&mut self) -> Result<()> {
        self.apply(LoanCommand::Cancel, &system_time())
    }

    /// record payment with system time
    pub fn record_payment(&mut self, amount: Money) -> Result<()> {
        self.apply(LoanCommand::RecordPayment { amount }, &system_time())
    }

    /// edit terms with system time
    pub fn edit_terms(&mut self, terms: LoanTerms) -> Result<()> {
        self.apply(LoanCommand::EditTerms { terms }, &system_time())
    }

    pub fn id(&self) -> LoanId {
        self.id
    }

    pub fn borrower(&self) -> &str {
        &self.borrower
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    pub fn summary(&self) -> &AmortizationSummary {
        &self.summary
    }

    pub fn state(&self) -> &LoanState {
        &self.state
    }

    pub fn status(&self) -> LoanStatus {
        self.state.status
    }

    pub fn paid_amount(&self) -> Money {
        self.state.paid_amount
    }

    pub fn remaining_amount(&self) -> Money {
        self.state.remaining_amount
    }

    /// commands the loan accepts in its current status
    pub fn allowed_commands(&self) -> BTreeSet<CommandKind> {
        lifecycle::allowed_commands(self.state.status)
    }

    /// amount due on the last installment; every earlier one is `monthly_payment`
    pub fn final_installment(&self) -> Money {
        self.summary.final_installment(self.terms.term_months)
    }

    /// month-by-month schedule starting from origination.
    ///
    /// The schedule splits the unrounded level payment (to the cent) into interest
    /// and principal; it is a breakdown, not the billed amounts. Borrowers pay
    /// `summary().monthly_payment`, that payment rounded to whole units, and
    /// `final_installment()` on the last month.
    pub fn schedule(&self) -> std::result::Result<AmortizationSchedule, InvalidLoanTerms> {
        AmortizationSchedule::generate(&self.calculator, &self.terms, self.state.originated_at)
    }

    pub fn events(&self) -> &[LoanEvent] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<LoanEvent> {
        self.events.take_events()
    }

    pub fn snapshots(&self) -> &[StateSnapshot] {
        &self.snapshots
    }
}

fn system_time() -> SafeTimeProvider {
    SafeTimeProvider::new(TimeSource::System)
}

/// builder for loans
#[derive(Debug, Clone, Default)]
pub struct LoanBuilder {
    borrower: Option<String>,
    principal: Option<Money>,
    rate: Option<Rate>,
    term_months: Option<u32>,
    config: LedgerConfig,
}

impl LoanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn borrower(mut self, borrower: impl Into<String>) -> Self {
        self.borrower = Some(borrower.into());
        self
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    /// annual rate; loans without one are interest-free
    pub fn rate(mut self, rate: Rate) -> Self {
        self.rate = Some(rate);
        self
    }

    /// annual rate in percent (5.5 for 5.5%)
    pub fn rate_percent(self, percent: Decimal) -> Self {
        self.rate(Rate::from_percentage(percent))
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = Some(months);
        self
    }

    pub fn config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    /// build with system time
    pub fn build(self) -> std::result::Result<Loan, InvalidLoanTerms> {
        self.build_with_time(&system_time())
    }

    /// build with explicit time provider
    pub fn build_with_time(
        self,
        time_provider: &SafeTimeProvider,
    ) -> std::result::Result<Loan, InvalidLoanTerms> {
        let terms = LoanTerms::new(
            self.principal.unwrap_or(Money::ZERO),
            self.rate.unwrap_or(Rate::ZERO),
            self.term_months.unwrap_or(0),
        );

        let borrower = self.borrower.unwrap_or_else(|| {
            format!("BRW-{}", Uuid::new_v4().to_string()[..8].to_uppercase())
        });

        Loan::originate(borrower, terms, AmortizationCalculator::new(self.config), time_provider)
    }
}
