//! Shopping aggregation — weekly ingredient totals grouped by section.
//!
//! Aggregation key is (ingredient id, unit). Pantry ingredients are
//! excluded, sections with nothing left are omitted, and entries within a
//! section sort by display name (codepoint order).

use super::resolve::SlotRecord;
use super::types::{Catalog, Section, Unit, PROTEIN_KINDS, SECTIONS};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashSet};

/// One line of the shopping list.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingItem {
    pub item: String,
    pub display: String,
    pub quantity: f64,
    pub unit: Unit,
}

/// The categorized list, sections in declaration order, empty ones absent.
#[derive(Debug, Clone, Default)]
pub struct ShoppingList {
    pub sections: Vec<(Section, Vec<ShoppingItem>)>,
}

/// Sum resolved quantities across the week and group what survives the
/// pantry exclusion.
pub fn aggregate(catalog: &Catalog, slots: &[SlotRecord]) -> ShoppingList {
    let mut totals: IndexMap<(String, Unit), f64> = IndexMap::new();
    for slot in slots {
        for line in &slot.lines {
            *totals.entry((line.item.clone(), line.unit)).or_insert(0.0) += line.qty;
        }
    }

    let pantry: HashSet<&str> = catalog.pantry.iter().map(String::as_str).collect();

    let mut by_section: IndexMap<Section, Vec<ShoppingItem>> =
        SECTIONS.iter().map(|&s| (s, Vec::new())).collect();
    for ((item, unit), quantity) in totals {
        if pantry.contains(item.as_str()) || quantity <= 0.0 {
            continue;
        }
        let ingredient = &catalog.ingredients[&item];
        by_section[&ingredient.section].push(ShoppingItem {
            item,
            display: ingredient.display.clone(),
            quantity: round2(quantity),
            unit,
        });
    }

    let mut sections = Vec::new();
    for (section, mut items) in by_section {
        if items.is_empty() {
            continue;
        }
        items.sort_by(|a, b| a.display.cmp(&b.display).then_with(|| a.item.cmp(&b.item)));
        sections.push((section, items));
    }

    ShoppingList { sections }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derived plan summaries: per-protein counts (every kind, declaration
/// order) and per-carb counts (used carbs only, sorted by id).
pub fn derived_counts(slots: &[SlotRecord]) -> (IndexMap<String, u32>, IndexMap<String, u32>) {
    let mut protein_counts: IndexMap<String, u32> = PROTEIN_KINDS
        .iter()
        .map(|kind| (kind.to_string(), 0))
        .collect();
    for slot in slots {
        if let Some(count) = protein_counts.get_mut(&slot.protein.to_string()) {
            *count += 1;
        }
    }

    let mut carb_counts: BTreeMap<String, u32> = BTreeMap::new();
    for slot in slots {
        if let Some(ref carb) = slot.carb {
            *carb_counts.entry(carb.clone()).or_insert(0) += 1;
        }
    }

    (protein_counts, carb_counts.into_iter().collect())
}
