use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::config::LoanTerms;
use crate::decimal::Money;
use crate::errors::InvalidLoanTerms;

use super::AmortizationCalculator;

/// scheduled payment in amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    pub payment_number: u32,
    pub payment_date: DateTime<Utc>,
    pub beginning_balance: Money,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub ending_balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

/// month-by-month breakdown of an equal-installment loan, in minor units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub terms: LoanTerms,
    pub start_date: DateTime<Utc>,
    pub payments: Vec<ScheduledPayment>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl AmortizationSchedule {
    /// generate payment schedule; the first payment falls one month after `start_date`
    pub fn generate(
        calculator: &AmortizationCalculator,
        terms: &LoanTerms,
        start_date: DateTime<Utc>,
    ) -> Result<Self, InvalidLoanTerms> {
        terms.validate(calculator.config())?;

        let monthly_rate = terms.annual_rate.monthly_rate().as_decimal();
        let installment = Money::from_decimal(calculator.exact_monthly_payment(terms)?);

        let mut payments = Vec::with_capacity(terms.term_months as usize);
        let mut balance = terms.principal;
        let mut cumulative_interest = Money::ZERO;
        let mut cumulative_principal = Money::ZERO;

        for i in 1..=terms.term_months {
            let payment_date = start_date
                .checked_add_months(Months::new(i))
                .ok_or(InvalidLoanTerms::TermTooLong {
                    term_months: terms.term_months,
                    max_term_months: i - 1,
                })?;

            let interest_portion = balance * monthly_rate;
            let mut principal_portion = installment - interest_portion;

            // last installment absorbs the rounding residual
            if i == terms.term_months || principal_portion >= balance {
                principal_portion = balance;
            }
            let payment_amount = principal_portion + interest_portion;
            let ending_balance = balance - principal_portion;

            cumulative_interest += interest_portion;
            cumulative_principal += principal_portion;

            payments.push(ScheduledPayment {
                payment_number: i,
                payment_date,
                beginning_balance: balance,
                payment_amount,
                principal_portion,
                interest_portion,
                ending_balance,
                cumulative_interest,
                cumulative_principal,
            });

            balance = ending_balance;
            if balance.is_zero() {
                break;
            }
        }

        let total_payment = payments
            .iter()
            .map(|p| p.payment_amount)
            .fold(Money::ZERO, |acc, x| acc + x);

        Ok(Self {
            terms: *terms,
            start_date,
            payments,
            total_interest: cumulative_interest,
            total_payment,
        })
    }

    /// get payment for specific period (1-based)
    pub fn get_payment(&self, payment_number: u32) -> Option<&ScheduledPayment> {
        let index = payment_number.checked_sub(1)?;
        self.payments.get(index as usize)
    }

    /// remaining principal after the given payment; principal before the first
    pub fn balance_after_payment(&self, payment_number: u32) -> Money {
        self.get_payment(payment_number)
            .map(|p| p.ending_balance)
            .unwrap_or(self.terms.principal)
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};
    use rust_decimal_macros::dec;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_equal_installments_schedule() {
        let terms = LoanTerms::from_percent(Money::from_major(100_000), dec!(12), 12);
        let schedule =
            AmortizationSchedule::generate(&AmortizationCalculator::default(), &terms, start()).unwrap();

        assert_eq!(schedule.len(), 12);

        let first = schedule.get_payment(1).unwrap();
        assert_eq!(first.beginning_balance, terms.principal);
        assert_eq!(first.interest_portion, Money::from_major(1_000));
        assert_eq!(first.payment_amount, Money::from_decimal(dec!(8884.88)));

        // interest declines as the balance is repaid
        for pair in schedule.payments.windows(2) {
            assert!(pair[1].interest_portion < pair[0].interest_portion);
        }

        let last = schedule.get_payment(12).unwrap();
        assert_eq!(last.ending_balance, Money::ZERO);
        assert_eq!(last.cumulative_principal, terms.principal);
        assert!((last.payment_amount - first.payment_amount).abs() < Money::from_major(1));

        assert_eq!(schedule.total_payment - schedule.total_interest, terms.principal);
    }

    #[test]
    fn test_interest_free_schedule_absorbs_residual() {
        let terms = LoanTerms::interest_free(Money::from_major(10_000), 12);
        let schedule =
            AmortizationSchedule::generate(&AmortizationCalculator::default(), &terms, start()).unwrap();

        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule.total_interest, Money::ZERO);
        assert_eq!(schedule.total_payment, Money::from_major(10_000));

        let first = schedule.get_payment(1).unwrap();
        assert_eq!(first.payment_amount, Money::from_decimal(dec!(833.33)));

        let last = schedule.get_payment(12).unwrap();
        assert_eq!(last.payment_amount, Money::from_decimal(dec!(833.37)));
        assert_eq!(last.ending_balance, Money::ZERO);
    }

    #[test]
    fn test_payment_dates_follow_calendar_months() {
        let terms = LoanTerms::from_percent(Money::from_major(5_000), dec!(6), 3);
        let schedule =
            AmortizationSchedule::generate(&AmortizationCalculator::default(), &terms, start()).unwrap();

        let dates: Vec<(u32, u32)> = schedule
            .payments
            .iter()
            .map(|p| (p.payment_date.month(), p.payment_date.day()))
            .collect();

        // month-end start clamps to the last day of shorter months
        assert_eq!(dates, vec![(2, 29), (3, 31), (4, 30)]);
    }

    #[test]
    fn test_balance_lookup() {
        let terms = LoanTerms::from_percent(Money::from_major(24_000), dec!(5.5), 24);
        let schedule =
            AmortizationSchedule::generate(&AmortizationCalculator::default(), &terms, start()).unwrap();

        assert_eq!(schedule.balance_after_payment(0), terms.principal);
        assert!(schedule.balance_after_payment(6) < terms.principal);
        assert_eq!(schedule.balance_after_payment(24), Money::ZERO);
        assert!(schedule.get_payment(25).is_none());
    }

    #[test]
    fn test_invalid_terms_rejected() {
        let terms = LoanTerms::interest_free(Money::from_major(1_000), 0);
        let result = AmortizationSchedule::generate(&AmortizationCalculator::default(), &terms, start());
        assert_eq!(result, Err(InvalidLoanTerms::NonPositiveTerm { term_months: 0 }));
    }
}
