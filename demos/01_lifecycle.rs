/// lifecycle - payments, a term edit and closing a loan under a controlled clock
use loan_lifecycle_rs::{LoanCommand, LoanTerms, Loan, Money, SafeTimeProvider, TimeSource};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== loan lifecycle ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let mut loan = Loan::builder()
        .borrower("Jane Doe")
        .principal(Money::from_major(12_000))
        .rate_percent(dec!(9))
        .term_months(12)
        .build_with_time(&time)?;

    // 1. origination
    println!("1. origination");
    println!("--------------");
    println!("  date: {}", time.now().format("%Y-%m-%d"));
    println!("  status: {}", loan.status());
    println!("  monthly payment: ${}", loan.summary().monthly_payment);
    println!("  total payable: ${}", loan.summary().total_payable);

    // 2. servicing
    println!("\n2. servicing");
    println!("------------");
    let installment = loan.summary().monthly_payment;
    for month in 1..=3 {
        controller.advance(Duration::days(30));
        loan.apply(LoanCommand::RecordPayment { amount: installment }, &time)?;
        println!("  month {}: {} paid ${}, remaining ${}",
            month, time.now().format("%Y-%m-%d"), installment, loan.remaining_amount());
    }

    // 3. borrower asks for a longer term
    println!("\n3. term edit");
    println!("------------");
    let terms = LoanTerms::from_percent(Money::from_major(12_000), dec!(9), 24);
    loan.apply(LoanCommand::EditTerms { terms }, &time)?;
    println!("  new monthly payment: ${}", loan.summary().monthly_payment);
    println!("  paid so far: ${}", loan.paid_amount());
    println!("  remaining: ${}", loan.remaining_amount());

    // 4. overpayment is refused
    println!("\n4. guards");
    println!("---------");
    let too_much = loan.remaining_amount() + Money::from_major(1);
    if let Err(e) = loan.apply(LoanCommand::RecordPayment { amount: too_much }, &time) {
        println!("  ✗ {}", e);
    }

    // 5. settle and close
    println!("\n5. settlement");
    println!("-------------");
    controller.advance(Duration::days(30));
    let rest = loan.remaining_amount();
    loan.apply(LoanCommand::RecordPayment { amount: rest }, &time)?;
    println!("  remaining: ${} (status still {})", loan.remaining_amount(), loan.status());

    loan.apply(LoanCommand::MarkCompleted, &time)?;
    println!("  ✓ status: {}", loan.status());

    if let Err(e) = loan.apply(LoanCommand::Cancel, &time) {
        println!("  ✗ {}", e);
    }

    println!("\n=== audit trail ===");
    for event in loan.events() {
        println!("  {:?}", event);
    }

    Ok(())
}
