//! Portion resolution — lowers the solver's assignment into slot records
//! with concrete ingredient quantities.
//!
//! Pure function of (catalog, model, assignment): the protein line's
//! portion comes from `rules.protein_portions`, the chosen carb's quantity
//! from `rules.carb_portions` (override first, then the meal default), and
//! carb-kind lines other than the chosen carb are dropped.

use super::model::SlotModel;
use super::types::{Catalog, IngredientKind, ProteinKind, Quantity, Role, Unit};

/// A fully resolved ingredient line of an assigned slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLine {
    pub item: String,
    pub display: String,
    pub qty: f64,
    pub unit: Unit,
    pub role: Role,
}

/// One assigned slot with portions resolved, in output order.
#[derive(Debug, Clone)]
pub struct SlotRecord {
    pub day: String,
    pub meal: String,
    pub recipe_id: String,
    pub recipe_name: String,
    pub protein: ProteinKind,
    pub protein_qty: f64,
    pub carb: Option<String>,
    pub carb_qty: Option<f64>,
    pub lines: Vec<ResolvedLine>,
}

/// Resolve every assigned slot, in slot (day-major) order.
pub fn resolve_plan(catalog: &Catalog, model: &SlotModel, assignment: &[usize]) -> Vec<SlotRecord> {
    model
        .slots
        .iter()
        .zip(assignment)
        .map(|(slot, &v)| resolve_slot(catalog, &model.variants[v], slot.day, slot.meal))
        .collect()
}

fn resolve_slot(
    catalog: &Catalog,
    variant: &super::variants::Variant,
    day: usize,
    meal: usize,
) -> SlotRecord {
    let rules = &catalog.rules;
    let day = rules.week.days[day].clone();
    let meal = rules.week.meals[meal].clone();
    let recipe = &catalog.recipes[&variant.recipe];

    let protein_qty = rules.protein_portions[&variant.protein][&meal];
    let carb_qty = variant
        .carb
        .as_deref()
        .and_then(|c| catalog.carb_qty(c, &meal));

    let mut lines = Vec::with_capacity(recipe.lines.len() + 1);
    let mut carb_placed = false;

    for line in &recipe.lines {
        let ingredient = &catalog.ingredients[&line.item];

        if ingredient.kind == IngredientKind::Carb {
            // Only the chosen carb survives, substituted in place with the
            // global portion; every other carb line is dropped.
            if variant.carb.as_deref() == Some(line.item.as_str()) {
                lines.push(ResolvedLine {
                    item: line.item.clone(),
                    display: ingredient.display.clone(),
                    qty: carb_qty.unwrap_or(0.0),
                    unit: ingredient.unit,
                    role: Role::Carb,
                });
                carb_placed = true;
            }
            continue;
        }

        let qty = match line.quantity {
            Quantity::Portion => protein_qty,
            Quantity::Literal { value, .. } => value,
        };
        lines.push(ResolvedLine {
            item: line.item.clone(),
            display: ingredient.display.clone(),
            qty,
            unit: ingredient.unit,
            role: line.role,
        });
    }

    if let Some(ref carb) = variant.carb {
        if !carb_placed {
            let ingredient = &catalog.ingredients[carb];
            lines.push(ResolvedLine {
                item: carb.clone(),
                display: ingredient.display.clone(),
                qty: carb_qty.unwrap_or(0.0),
                unit: ingredient.unit,
                role: Role::Carb,
            });
        }
    }

    SlotRecord {
        day,
        meal,
        recipe_id: recipe.id.clone(),
        recipe_name: recipe.name.clone(),
        protein: variant.protein,
        protein_qty,
        carb: variant.carb.clone(),
        carb_qty,
        lines,
    }
}
