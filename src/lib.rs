pub mod amortization;
pub mod book;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod lifecycle;
pub mod loan;
pub mod serialization;
pub mod state;
pub mod types;

// re-export key types
pub use amortization::{
    compute_amortization, AmortizationCalculator, AmortizationSchedule, AmortizationSummary,
    ScheduledPayment,
};
pub use book::{LoanBook, PortfolioSummary};
pub use config::{LedgerConfig, LoanTerms};
pub use decimal::{Money, Rate};
pub use errors::{BookError, InvalidLoanTerms, LifecycleError, Result};
pub use events::{EventStore, LoanEvent};
pub use lifecycle::{allowed_commands, LoanCommand};
pub use loan::{Loan, LoanBuilder};
pub use serialization::LoanView;
pub use state::{LoanState, StateSnapshot};
pub use types::{CommandKind, LoanId, LoanStatus, RoundingMode};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
