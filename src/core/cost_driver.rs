//! Identifies the dominant expense category.
use crate::core::error::{HedgeError, HedgeResult};
use crate::core::records::ExpenseRecord;
use std::collections::BTreeMap;
use tracing::debug;

/// The expense category with the largest total spend.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryCost {
    pub category: String,
    pub total: f64,
}

/// Sums expenses per category and returns the largest.
///
/// Categories sharing the maximal total resolve to the lexicographically
/// smallest name.
pub fn select_primary_cost(expenses: &[ExpenseRecord]) -> HedgeResult<PrimaryCost> {
    if expenses.is_empty() {
        return Err(HedgeError::EmptyInput { table: "expenses" });
    }

    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }
    debug!("Expense totals by category: {totals:?}");

    // BTreeMap iterates in name order, so keeping the first maximum breaks ties
    let mut best: Option<(&str, f64)> = None;
    for (category, total) in totals {
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((category, total)),
        }
    }

    let (category, total) = best.ok_or(HedgeError::EmptyInput { table: "expenses" })?;
    Ok(PrimaryCost {
        category: category.to_string(),
        total,
    })
}
