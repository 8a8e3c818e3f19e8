//! Slot model — the decision variables the solver searches over.
//!
//! One categorical decision per (day, meal) slot, ranging over the
//! variants admissible at that slot's meal. Slots are laid out day-major,
//! so the slot for (day d, meal m) lives at index `d * meals + m` and the
//! previous day's same meal is always assigned first.

use super::error::{PlanError, Report};
use super::types::Catalog;
use super::variants::Variant;

/// A (day, meal) position, as indices into the rules' week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub day: usize,
    pub meal: usize,
}

/// The decision model over the expanded variant space.
#[derive(Debug)]
pub struct SlotModel {
    pub variants: Vec<Variant>,
    /// Day-major slot grid
    pub slots: Vec<Slot>,
    /// Per meal index, the variant indices admissible at that meal
    pub admissible: Vec<Vec<usize>>,
}

impl SlotModel {
    /// Slot index of (day, meal).
    pub fn slot_index(&self, day: usize, meal: usize) -> usize {
        day * self.admissible.len() + meal
    }
}

/// Build the slot grid and admissible sets. A meal with no admissible
/// variant makes every slot of that meal unfillable, which is a data
/// error, not a solver outcome.
pub fn build(catalog: &Catalog, variants: Vec<Variant>) -> Result<SlotModel, PlanError> {
    let days = catalog.rules.week.days.len();
    let meals = &catalog.rules.week.meals;

    let mut slots = Vec::with_capacity(days * meals.len());
    for day in 0..days {
        for meal in 0..meals.len() {
            slots.push(Slot { day, meal });
        }
    }

    let mut report = Report::new();
    let mut admissible = Vec::with_capacity(meals.len());
    for meal in meals {
        let set: Vec<usize> = variants
            .iter()
            .enumerate()
            .filter(|(_, v)| &v.meal == meal)
            .map(|(i, _)| i)
            .collect();
        if set.is_empty() {
            report.error(
                "recipes",
                format!("no recipe variant is admissible at meal '{}'", meal),
            );
        }
        admissible.push(set);
    }

    if report.has_errors() {
        return Err(PlanError::Validation(report));
    }

    Ok(SlotModel {
        variants,
        slots,
        admissible,
    })
}
