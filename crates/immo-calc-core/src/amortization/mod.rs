//! Loan amortization: monthly-stepped approximate annuities, yearly exact
//! annuities, and capped special repayments at year end.

pub mod payment;
pub mod schedule;
pub mod stepper;

pub use payment::{annual_debt_service_factor, annuity_factor};
pub use schedule::{compute_amortization_schedule, AmortizationSchedule, LoanTerms};
pub use stepper::{AnnualRow, LoanStepper, PaymentFrequency};
