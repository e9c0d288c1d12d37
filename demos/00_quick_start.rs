/// quick start - minimal example to get started
use loan_lifecycle_rs::{compute_amortization, Loan, Money};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // what would a $50,000 loan at 5.5% over two years cost?
    let summary = compute_amortization(Money::from_major(50_000), dec!(5.5), 24)?;
    println!("monthly payment: ${}", summary.monthly_payment);
    println!("total interest:  ${}", summary.total_interest);
    println!("total payable:   ${}", summary.total_payable);

    // originate it and record the first installment
    let mut loan = Loan::builder()
        .borrower("ACME Ltd")
        .principal(Money::from_major(50_000))
        .rate_percent(dec!(5.5))
        .term_months(24)
        .build()?;

    loan.record_payment(summary.monthly_payment)?;

    // print current state
    println!("{}", loan.to_json_pretty()?);

    Ok(())
}
