#![cfg(feature = "amortization")]

use immo_calc_core::amortization::{
    annuity_factor, compute_amortization_schedule, LoanTerms, PaymentFrequency,
};
use immo_calc_core::deal::{RepaymentPolicy, SpecialRepaymentAmount, SpecialRepaymentPlan};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn approximate(principal: Decimal, rate: Decimal, amortization: Decimal) -> LoanTerms {
    LoanTerms {
        principal,
        annual_rate: rate,
        policy: RepaymentPolicy::ApproximateAnnuity {
            initial_amortization_rate: amortization,
        },
        special_repayments: None,
        start_year: 2025,
    }
}

/// 280k at 3.8% with 2% initial repayment
fn reference_loan() -> LoanTerms {
    approximate(dec!(280000), dec!(0.038), dec!(0.02))
}

// ===========================================================================
// Approximate annuity (monthly stepping)
// ===========================================================================

#[test]
fn test_typical_german_mortgage_first_year() {
    // 280k at 3.8% with 2% initial repayment:
    // instalment = 280,000 * 5.8% / 12 = 1,353.33 per month, 16,240 a year
    let schedule = compute_amortization_schedule(&reference_loan(), 30);
    let year1 = &schedule.rows[0];

    assert_eq!(schedule.payment_frequency, PaymentFrequency::Monthly);
    assert!((year1.scheduled_debt_service - dec!(16240)).abs() < dec!(0.01));
    // Interest a little below 280,000 * 3.8% = 10,640 as the balance falls
    assert!(
        year1.interest > dec!(10500) && year1.interest < dec!(10640),
        "Year-1 interest {} outside expected band",
        year1.interest
    );
    let split = year1.interest + year1.scheduled_principal;
    assert!((split - year1.scheduled_debt_service).abs() < dec!(0.0001));
    assert_eq!(year1.calendar_year, 2025);
}

#[test]
fn test_typical_german_mortgage_pays_off_before_year_30() {
    let schedule = compute_amortization_schedule(&reference_loan(), 35);

    assert!(
        matches!(schedule.payoff_year, Some(28..=29)),
        "Expected payoff around year 29, got {:?}",
        schedule.payoff_year
    );
    assert!(schedule.remaining_balance.is_zero());
    assert!((schedule.total_principal - dec!(280000)).abs() < dec!(0.01));

    // Rows after payoff are zero-filled
    let payoff = schedule.payoff_year.unwrap() as usize;
    for row in &schedule.rows[payoff..] {
        assert!(row.debt_service.is_zero());
        assert!(row.outstanding.is_zero());
    }
}

#[test]
fn test_balance_is_monotone_non_increasing() {
    let mut terms = approximate(dec!(450000), dec!(0.041), dec!(0.03));
    terms.special_repayments = Some(SpecialRepaymentPlan {
        amount: SpecialRepaymentAmount::PercentOfPrincipal(dec!(0.05)),
        start_year: 2,
        end_year: 10,
        lender_cap: None,
    });
    let schedule = compute_amortization_schedule(&terms, 40);

    let mut previous = terms.principal;
    for row in &schedule.rows {
        assert!(row.outstanding <= previous, "Balance rose in year {}", row.year_index);
        assert!(row.outstanding >= Decimal::ZERO);
        previous = row.outstanding;
    }
}

#[test]
fn test_special_repayments_shorten_the_loan() {
    let plain = approximate(dec!(300000), dec!(0.035), dec!(0.02));
    let mut extra = plain.clone();
    extra.special_repayments = Some(SpecialRepaymentPlan {
        amount: SpecialRepaymentAmount::Fixed(dec!(10000)),
        start_year: 1,
        end_year: 10,
        lender_cap: Some(dec!(0.05)),
    });

    let a = compute_amortization_schedule(&plain, 40);
    let b = compute_amortization_schedule(&extra, 40);

    assert!(b.payoff_year.unwrap() < a.payoff_year.unwrap());
    assert!(b.total_interest < a.total_interest);
    assert!((b.total_special - dec!(100000)).abs() < dec!(0.01));
}

#[test]
fn test_lender_cap_limits_special_repayment() {
    let mut terms = approximate(dec!(200000), dec!(0.04), dec!(0.02));
    terms.special_repayments = Some(SpecialRepaymentPlan {
        amount: SpecialRepaymentAmount::Fixed(dec!(50000)),
        start_year: 1,
        end_year: 1,
        lender_cap: Some(dec!(0.05)),
    });
    let schedule = compute_amortization_schedule(&terms, 5);

    // Cap is 5% of the original principal
    assert_eq!(schedule.rows[0].special_repayment, dec!(10000));
    assert!(schedule.rows[1].special_repayment.is_zero());
}

#[test]
fn test_zero_principal_yields_zero_rows() {
    let terms = approximate(Decimal::ZERO, dec!(0.04), dec!(0.02));
    let schedule = compute_amortization_schedule(&terms, 10);
    assert_eq!(schedule.rows.len(), 10);
    assert!(schedule.rows.iter().all(|r| r.debt_service.is_zero()));
    assert!(schedule.total_interest.is_zero());
}

// ===========================================================================
// Exact annuity (annual stepping)
// ===========================================================================

#[test]
fn test_exact_annuity_retires_loan_at_term() {
    let terms = LoanTerms {
        principal: dec!(100000),
        annual_rate: dec!(0.05),
        policy: RepaymentPolicy::ExactAnnuity { term_years: 20 },
        special_repayments: None,
        start_year: 1,
    };
    let schedule = compute_amortization_schedule(&terms, 25);

    assert_eq!(schedule.payment_frequency, PaymentFrequency::Annual);
    // Textbook annuity: 100,000 * 0.080243 = 8,024.26
    assert!((schedule.periodic_payment - dec!(8024.26)).abs() < dec!(0.01));
    assert_eq!(schedule.payoff_year, Some(20));
    assert!(schedule.rows[19].outstanding.is_zero());
    assert!(schedule.rows[20].debt_service.is_zero());
}

#[test]
fn test_annuity_factor_edge_cases() {
    assert!(annuity_factor(dec!(0.05), 0).is_zero());
    assert_eq!(annuity_factor(Decimal::ZERO, 10), dec!(0.1));
}
