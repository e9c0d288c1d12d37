/// loan book - several loans under one configuration and clock
use loan_lifecycle_rs::{
    LedgerConfig, LoanBook, LoanCommand, LoanStatus, LoanTerms, Money, RoundingMode,
    SafeTimeProvider, TimeSource,
};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== loan book ===\n");

    let config = LedgerConfig::from_json_str(r#"{ "rounding": "half_even" }"#)?;
    assert_eq!(config.rounding, RoundingMode::HalfEven);

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let mut book = LoanBook::new(config, time);

    let car = book.originate("car dealer", LoanTerms::from_percent(Money::from_major(18_000), dec!(7.25), 36))?;
    let staff = book.originate("staff advance", LoanTerms::interest_free(Money::from_major(2_400), 6))?;
    let supplier = book.originate("supplier", LoanTerms::from_percent(Money::from_major(75_000), dec!(11), 60))?;

    if let Err(e) = book.originate("typo", LoanTerms::interest_free(Money::from_major(1_000), 0)) {
        println!("rejected origination: {}", e);
    }

    book.time_provider().test_control().unwrap().advance(Duration::days(30));
    for id in [car, staff, supplier] {
        let installment = book.get(id)?.summary().monthly_payment;
        book.apply(id, LoanCommand::RecordPayment { amount: installment })?;
    }

    book.apply(supplier, LoanCommand::MarkDefaulted)?;

    println!("\nloans:");
    for loan in book.loans() {
        println!("  {:<14} {:>10} {:>10} {}",
            loan.borrower(), loan.summary().total_payable, loan.remaining_amount(), loan.status());
    }

    let summary = book.portfolio_summary()?;
    println!("\nportfolio:");
    println!("  loans: {} ({} active)", summary.loan_count, summary.active_count);
    println!("  principal: ${}", summary.total_principal);
    println!("  paid: ${}", summary.total_paid);
    println!("  outstanding: ${}", summary.total_outstanding);

    let defaulted: Vec<_> = book.loans_with_status(LoanStatus::Defaulted).map(|l| l.id()).collect();
    println!("\ndefaulted: {:?}", defaulted);

    let removed = book.delete(staff)?;
    println!("deleted {} ({} left)", removed.borrower(), book.len());

    println!("\n{}", book.get(car)?.to_json_pretty()?);

    Ok(())
}
