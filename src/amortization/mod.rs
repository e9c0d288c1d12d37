pub mod schedule;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{LedgerConfig, LoanTerms};
use crate::decimal::{Money, Rate};
use crate::errors::InvalidLoanTerms;

pub use schedule::{AmortizationSchedule, ScheduledPayment};

/// payment figures derived once from a set of loan terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSummary {
    pub monthly_payment: Money,
    pub total_payable: Money,
    pub total_interest: Money,
}

/// fixed-rate, fixed-term amortization calculator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmortizationCalculator {
    config: LedgerConfig,
}

impl AmortizationCalculator {
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// compute the summary for validated terms.
    ///
    /// The monthly payment is rounded to whole units and total payable is that
    /// rounded payment times the term. When rounding the payment down would leave
    /// the total short of principal (interest-free and near-zero rates) the total
    /// is raised to principal, so interest is never negative.
    pub fn summarize(&self, terms: &LoanTerms) -> Result<AmortizationSummary, InvalidLoanTerms> {
        terms.validate(&self.config)?;

        let payment = self.exact_monthly_payment(terms)?;
        let principal = terms.principal;
        let monthly_payment = Money::whole_units(payment, self.config.rounding);
        let total = monthly_payment
            .as_decimal()
            .checked_mul(Decimal::from(terms.term_months))
            .ok_or_else(|| overflow(terms))?;

        let total_payable = Money::from_decimal(total).max(principal);
        let total_interest = total_payable - principal;

        debug!(
            principal = %principal,
            rate = %terms.annual_rate,
            term_months = terms.term_months,
            monthly_payment = %monthly_payment,
            total_payable = %total_payable,
            "computed amortization summary"
        );

        Ok(AmortizationSummary {
            monthly_payment,
            total_payable,
            total_interest,
        })
    }

    /// unrounded level payment for the terms
    pub(crate) fn exact_monthly_payment(&self, terms: &LoanTerms) -> Result<Decimal, InvalidLoanTerms> {
        let principal = terms.principal.as_decimal();
        let months = Decimal::from(terms.term_months);
        let r = terms.annual_rate.monthly_rate().as_decimal();

        if r.is_zero() {
            return Ok(principal / months);
        }

        // payment = P * r * (1 + r)^n / ((1 + r)^n - 1)
        let base = Decimal::ONE + r;
        let mut compound = Decimal::ONE;
        for _ in 0..terms.term_months {
            compound = compound.checked_mul(base).ok_or_else(|| overflow(terms))?;
        }

        let denominator = compound - Decimal::ONE;
        if denominator.is_zero() {
            // rate too small to register over the term
            return Ok(principal / months);
        }

        principal
            .checked_mul(r)
            .and_then(|v| v.checked_mul(compound))
            .and_then(|v| v.checked_div(denominator))
            .ok_or_else(|| overflow(terms))
    }
}

impl AmortizationSummary {
    /// amount due on the last installment; absorbs any shortfall of
    /// `monthly_payment * term_months` against `total_payable`
    pub fn final_installment(&self, term_months: u32) -> Money {
        let earlier = self.monthly_payment * Decimal::from(term_months.saturating_sub(1));
        self.total_payable - earlier
    }
}

fn overflow(terms: &LoanTerms) -> InvalidLoanTerms {
    InvalidLoanTerms::CalculationOverflow {
        rate: terms.annual_rate,
        term_months: terms.term_months,
    }
}

/// compute the amortization summary with the default ledger configuration
pub fn compute_amortization(
    principal: Money,
    annual_rate_percent: Decimal,
    term_months: u32,
) -> Result<AmortizationSummary, InvalidLoanTerms> {
    let terms = LoanTerms::new(principal, Rate::from_percentage(annual_rate_percent), term_months);
    AmortizationCalculator::default().summarize(&terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoundingMode;
    use rust_decimal_macros::dec;

    #[test]
    fn test_standard_loan() {
        let summary = compute_amortization(Money::from_major(50_000), dec!(5.5), 24).unwrap();

        assert_eq!(summary.monthly_payment, Money::from_major(2_205));
        assert_eq!(summary.total_payable, Money::from_major(52_920));
        assert_eq!(summary.total_interest, Money::from_major(2_920));
        assert_eq!(summary.final_installment(24), summary.monthly_payment);

        // within a few units of the figures shown on the loans page
        assert!((summary.monthly_payment - Money::from_major(2_208)).abs() <= Money::from_major(5));
    }

    #[test]
    fn test_interest_free_loan() {
        let summary = compute_amortization(Money::from_major(10_000), dec!(0), 12).unwrap();

        assert_eq!(summary.monthly_payment, Money::from_major(833));
        assert_eq!(summary.total_interest, Money::ZERO);
        assert_eq!(summary.total_payable, Money::from_major(10_000));
        // 833 * 12 falls short of principal; the last installment covers the gap
        assert_eq!(summary.final_installment(12), Money::from_major(837));

        // rounding the payment up carries into the total
        let summary = compute_amortization(Money::from_major(10_000), dec!(0), 24).unwrap();
        assert_eq!(summary.monthly_payment, Money::from_major(417));
        assert_eq!(summary.total_payable, Money::from_major(10_008));
        assert_eq!(summary.total_interest, Money::from_major(8));
    }

    #[test]
    fn test_known_schedules() {
        let summary = compute_amortization(Money::from_major(100_000), dec!(12), 12).unwrap();
        assert_eq!(summary.monthly_payment, Money::from_major(8_885));
        assert_eq!(summary.total_payable, Money::from_major(106_620));
        assert_eq!(summary.total_interest, Money::from_major(6_620));

        let summary = compute_amortization(Money::from_major(1_000), dec!(10), 3).unwrap();
        assert_eq!(summary.monthly_payment, Money::from_major(339));
        assert_eq!(summary.total_payable, Money::from_major(1_017));
    }

    #[test]
    fn test_totals_never_below_principal() {
        let principals = [dec!(1), dec!(999), dec!(10000), dec!(123456.78)];
        let rates = [dec!(0), dec!(0.01), dec!(5.5), dec!(12), dec!(36), dec!(99.99)];
        let terms = [1, 2, 12, 60, 360];

        for principal in principals {
            for rate in rates {
                for months in terms {
                    let principal = Money::from_decimal(principal);
                    let summary = compute_amortization(principal, rate, months).unwrap();

                    assert!(summary.total_payable >= principal, "{principal} {rate} {months}");
                    assert!(!summary.total_interest.is_negative(), "{principal} {rate} {months}");
                    assert_eq!(summary.total_payable - summary.total_interest, principal);

                    let installments =
                        summary.monthly_payment * Decimal::from(months);
                    assert_eq!(summary.total_payable, installments.max(principal));
                }
            }
        }
    }

    #[test]
    fn test_zero_rate_payment_is_rounded_quotient() {
        for months in [1, 3, 7, 12, 35, 120] {
            let principal = Money::from_major(12_345);
            let summary = compute_amortization(principal, dec!(0), months).unwrap();
            let expected = Money::whole_units(
                principal.as_decimal() / Decimal::from(months),
                RoundingMode::HalfUp,
            );

            assert_eq!(summary.monthly_payment, expected);
            // interest only from rounding, at most half a unit per month
            let bound = Money::from_decimal(Decimal::from(months) / Decimal::TWO);
            assert!(summary.total_interest <= bound, "{months}");
        }
    }

    #[test]
    fn test_same_input_same_output() {
        let first = compute_amortization(Money::from_major(75_000), dec!(7.25), 48).unwrap();
        let second = compute_amortization(Money::from_major(75_000), dec!(7.25), 48).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rounding_mode_at_midpoint() {
        let terms = LoanTerms::interest_free(Money::from_major(1_001), 2);

        let half_up = AmortizationCalculator::default().summarize(&terms).unwrap();
        assert_eq!(half_up.monthly_payment, Money::from_major(501));
        assert_eq!(half_up.total_payable, Money::from_major(1_002));

        let config = LedgerConfig::default().with_rounding(RoundingMode::HalfEven);
        let half_even = AmortizationCalculator::new(config).summarize(&terms).unwrap();
        assert_eq!(half_even.monthly_payment, Money::from_major(500));
        assert_eq!(half_even.total_payable, Money::from_major(1_001));
    }

    #[test]
    fn test_invalid_terms() {
        assert!(matches!(
            compute_amortization(Money::ZERO, dec!(5), 12),
            Err(InvalidLoanTerms::NonPositivePrincipal { .. })
        ));
        assert!(matches!(
            compute_amortization(Money::from_major(-5), dec!(5), 12),
            Err(InvalidLoanTerms::NonPositivePrincipal { .. })
        ));
        assert!(matches!(
            compute_amortization(Money::from_major(1_000), dec!(5), 0),
            Err(InvalidLoanTerms::NonPositiveTerm { .. })
        ));
        assert!(matches!(
            compute_amortization(Money::from_major(1_000), dec!(-1), 12),
            Err(InvalidLoanTerms::NegativeRate { .. })
        ));
    }

    #[test]
    fn test_installments_sum_to_total() {
        let cases = [
            (Money::from_major(50_000), dec!(5.5), 24),
            (Money::from_major(10_000), dec!(0), 12),
            (Money::from_major(100_000), dec!(12), 12),
        ];

        for (principal, rate, months) in cases {
            let summary = compute_amortization(principal, rate, months).unwrap();
            let earlier = summary.monthly_payment * Decimal::from(months - 1);
            assert_eq!(earlier + summary.final_installment(months), summary.total_payable);
            assert!(summary.final_installment(months) >= summary.monthly_payment);
        }
    }

    #[test]
    fn test_extreme_rate_reports_overflow() {
        let result = compute_amortization(Money::from_major(1_000), dec!(10000), 1200);
        assert!(matches!(result, Err(InvalidLoanTerms::CalculationOverflow { .. })));
    }
}
