use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::InvalidLoanTerms;
use crate::types::RoundingMode;

/// longest term accepted by default (100 years)
pub const DEFAULT_MAX_TERM_MONTHS: u32 = 1200;

/// loan terms as submitted by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate: Rate, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
        }
    }

    /// terms from an annual rate given in percent (5.5 for 5.5%)
    pub fn from_percent(principal: Money, annual_rate_percent: Decimal, term_months: u32) -> Self {
        Self::new(principal, Rate::from_percentage(annual_rate_percent), term_months)
    }

    /// interest-free loan
    pub fn interest_free(principal: Money, term_months: u32) -> Self {
        Self::new(principal, Rate::ZERO, term_months)
    }

    /// check terms against the ledger configuration
    pub fn validate(&self, config: &LedgerConfig) -> Result<(), InvalidLoanTerms> {
        if !self.principal.is_positive() {
            return Err(InvalidLoanTerms::NonPositivePrincipal {
                principal: self.principal,
            });
        }

        if self.term_months == 0 {
            return Err(InvalidLoanTerms::NonPositiveTerm {
                term_months: self.term_months,
            });
        }

        if self.annual_rate.is_negative() {
            return Err(InvalidLoanTerms::NegativeRate {
                rate: self.annual_rate,
            });
        }

        if self.term_months > config.max_term_months {
            return Err(InvalidLoanTerms::TermTooLong {
                term_months: self.term_months,
                max_term_months: config.max_term_months,
            });
        }

        Ok(())
    }
}

/// ledger-wide calculation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub rounding: RoundingMode,
    pub max_term_months: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rounding: RoundingMode::HalfUp,
            max_term_months: DEFAULT_MAX_TERM_MONTHS,
        }
    }
}

impl LedgerConfig {
    /// load from json; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_max_term_months(mut self, months: u32) -> Self {
        self.max_term_months = months;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validation_rejects_each_bad_field() {
        let config = LedgerConfig::default();

        let zero_principal = LoanTerms::from_percent(Money::ZERO, dec!(5), 12);
        assert!(matches!(
            zero_principal.validate(&config),
            Err(InvalidLoanTerms::NonPositivePrincipal { .. })
        ));

        let negative_principal = LoanTerms::from_percent(Money::from_major(-100), dec!(5), 12);
        assert!(matches!(
            negative_principal.validate(&config),
            Err(InvalidLoanTerms::NonPositivePrincipal { .. })
        ));

        let zero_term = LoanTerms::from_percent(Money::from_major(1000), dec!(5), 0);
        assert_eq!(
            zero_term.validate(&config),
            Err(InvalidLoanTerms::NonPositiveTerm { term_months: 0 })
        );

        let negative_rate = LoanTerms::from_percent(Money::from_major(1000), dec!(-0.5), 12);
        assert!(matches!(
            negative_rate.validate(&config),
            Err(InvalidLoanTerms::NegativeRate { .. })
        ));

        let too_long = LoanTerms::interest_free(Money::from_major(1000), 1201);
        assert!(matches!(
            too_long.validate(&config),
            Err(InvalidLoanTerms::TermTooLong { max_term_months: 1200, .. })
        ));
    }

    #[test]
    fn test_custom_term_limit() {
        let config = LedgerConfig::default().with_max_term_months(360);
        let terms = LoanTerms::from_percent(Money::from_major(250_000), dec!(4), 480);

        assert_eq!(
            terms.validate(&config),
            Err(InvalidLoanTerms::TermTooLong { term_months: 480, max_term_months: 360 })
        );
        assert!(terms.validate(&LedgerConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_rate_is_valid() {
        let terms = LoanTerms::interest_free(Money::from_major(10_000), 12);
        assert!(terms.validate(&LedgerConfig::default()).is_ok());
    }

    #[test]
    fn test_config_from_json() {
        let config = LedgerConfig::from_json_str(r#"{ "rounding": "half_even" }"#).unwrap();
        assert_eq!(config.rounding, RoundingMode::HalfEven);
        assert_eq!(config.max_term_months, DEFAULT_MAX_TERM_MONTHS);

        let config = LedgerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, LedgerConfig::default());

        assert!(LedgerConfig::from_json_str(r#"{ "rounding": "up" }"#).is_err());
    }
}
