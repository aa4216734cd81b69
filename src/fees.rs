//! Fee and discount arithmetic.
//!
//! Every function here is pure. Negative or non-finite money inputs are clamped
//! to zero before anything is computed, so results are never negative.

use std::fmt;

use crate::model::{DiscountType, FeeItem, FeePayment, FeeStructure};

fn money(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

pub fn compute_final_amount(base_fee: f64, discount_type: DiscountType, discount_value: f64) -> f64 {
    let base = money(base_fee);
    let value = money(discount_value);
    if value <= 0.0 {
        return base;
    }
    match discount_type {
        DiscountType::None => base,
        DiscountType::Percentage => (base - base * value / 100.0).max(0.0),
        DiscountType::Amount => (base - value).max(0.0),
    }
}

/// Terms below 1 are floored at 1.
pub fn compute_per_term(total_amount: f64, number_of_terms: i64) -> f64 {
    money(total_amount) / number_of_terms.max(1) as f64
}

pub fn total_amount(items: &[FeeItem]) -> f64 {
    items.iter().map(|item| money(item.amount)).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
}

impl fmt::Display for TermStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            TermStatus::Unpaid => "Unpaid",
            TermStatus::PartiallyPaid => "Partially Paid",
            TermStatus::Paid => "Paid",
        })
    }
}

pub fn term_status(paid: f64, due: f64) -> TermStatus {
    let paid = money(paid);
    if paid <= 0.0 {
        TermStatus::Unpaid
    } else if paid + 0.005 >= money(due) {
        TermStatus::Paid
    } else {
        TermStatus::PartiallyPaid
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TermLine {
    pub term: i64,
    pub due: f64,
    pub paid: f64,
    pub status: TermStatus,
}

impl TermLine {
    pub fn balance(&self) -> f64 {
        (self.due - self.paid).max(0.0)
    }
}

/// One line per term of `structure`, with the payments of that term summed.
pub fn term_schedule(structure: &FeeStructure, payments: &[FeePayment]) -> Vec<TermLine> {
    let due = compute_per_term(total_amount(&structure.fee_items), structure.number_of_terms);
    (1..=structure.number_of_terms.max(1))
        .map(|term| {
            let paid: f64 = payments
                .iter()
                .filter(|p| p.term == term)
                .map(|p| money(p.amount))
                .sum();
            TermLine { term, due, paid, status: term_status(paid, due) }
        })
        .collect()
}

pub fn outstanding(structure: &FeeStructure, payments: &[FeePayment]) -> f64 {
    term_schedule(structure, payments).iter().map(TermLine::balance).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Lookup;

    fn item(amount: f64) -> FeeItem {
        FeeItem {
            id: 1,
            name: "School Fee".into(),
            amount,
            fee_type: Lookup::new(1, "School Fee"),
            description: None,
            is_required: true,
        }
    }

    fn payment(term: i64, amount: f64) -> FeePayment {
        FeePayment { id: 0, student_id: 1, term, amount, mode: "Cash".into(), paid_on: "2024-06-01".into() }
    }

    #[test]
    fn discounts() {
        assert_eq!(compute_final_amount(1000.0, DiscountType::Percentage, 10.0), 900.0);
        assert_eq!(compute_final_amount(1000.0, DiscountType::Amount, 200.0), 800.0);
        assert_eq!(compute_final_amount(1000.0, DiscountType::None, 0.0), 1000.0);
        assert_eq!(compute_final_amount(1000.0, DiscountType::None, 50.0), 1000.0);
    }

    #[test]
    fn discount_never_goes_negative() {
        assert_eq!(compute_final_amount(100.0, DiscountType::Amount, 500.0), 0.0);
        assert_eq!(compute_final_amount(100.0, DiscountType::Percentage, 150.0), 0.0);
    }

    #[test]
    fn negative_inputs_clamp_to_zero() {
        assert_eq!(compute_final_amount(-100.0, DiscountType::Amount, 10.0), 0.0);
        assert_eq!(compute_final_amount(1000.0, DiscountType::Amount, -200.0), 1000.0);
        assert_eq!(compute_final_amount(f64::NAN, DiscountType::Percentage, 10.0), 0.0);
    }

    #[test]
    fn per_term_floors_terms_at_one() {
        assert_eq!(compute_per_term(9000.0, 3), 3000.0);
        assert_eq!(compute_per_term(9000.0, 0), 9000.0);
        assert_eq!(compute_per_term(9000.0, -2), 9000.0);
    }

    #[test]
    fn schedule_tracks_partial_payments() {
        let structure = FeeStructure {
            fee_items: vec![item(9000.0), item(3000.0)],
            number_of_terms: 3,
            ..Default::default()
        };
        let lines = term_schedule(&structure, &[payment(1, 4000.0), payment(2, 1500.0)]);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].status, TermStatus::Paid);
        assert_eq!(lines[1].status, TermStatus::PartiallyPaid);
        assert_eq!(lines[2].status, TermStatus::Unpaid);
        assert_eq!(outstanding(&structure, &[payment(1, 4000.0), payment(2, 1500.0)]), 6500.0);
    }
}
