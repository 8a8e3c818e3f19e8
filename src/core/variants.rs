//! Variant expansion — recipes become atomic per-meal slot choices.
//!
//! A variant is a base recipe pinned to a meal and a concrete carb
//! selection (or none). The solver only ever picks among variants, so
//! every choice it makes is fully specified.

use super::types::{CarbStrategy, Catalog, ProteinKind, Recipe};

/// An atomic slot choice.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// Base recipe id
    pub recipe: String,
    /// Meal tag this variant serves
    pub meal: String,
    /// Primary protein of the base recipe
    pub protein: ProteinKind,
    /// Chosen carb ingredient, None for a carb-free rendition
    pub carb: Option<String>,
}

impl Variant {
    /// Stable identifier, useful in diagnostics and tests.
    pub fn id(&self) -> String {
        format!(
            "{}__{}__{}",
            self.recipe,
            self.meal,
            self.carb.as_deref().unwrap_or("none")
        )
    }
}

/// Expand every recipe into its slot variants, in catalog order.
pub fn expand(catalog: &Catalog) -> Vec<Variant> {
    let mut variants = Vec::new();
    for recipe in catalog.recipes.values() {
        for meal in &recipe.meal_types {
            expand_for_meal(catalog, recipe, meal, &mut variants);
        }
    }
    variants
}

fn expand_for_meal(catalog: &Catalog, recipe: &Recipe, meal: &str, out: &mut Vec<Variant>) {
    let base = |carb: Option<String>| Variant {
        recipe: recipe.id.clone(),
        meal: meal.to_string(),
        protein: recipe.primary_protein,
        carb,
    };

    // A carb-forbidding meal collapses every strategy to the bare variant.
    if !catalog.allows_carbs(meal) {
        out.push(base(None));
        return;
    }

    match recipe.strategy {
        CarbStrategy::None => out.push(base(None)),
        CarbStrategy::Fixed => {
            if let Some(ref carb) = recipe.default_carb {
                out.push(base(Some(carb.clone())));
            }
        }
        CarbStrategy::Optional => {
            for carb in &recipe.allowed_carbs {
                out.push(base(Some(carb.clone())));
            }
            // The carb-free rendition stays selectable; "optional" means
            // the solver may skip the carb when frequency caps bite.
            out.push(base(None));
        }
    }
}
