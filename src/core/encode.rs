//! Constraint encoding — lowers the rules and catalog into integer tables
//! over the variant indicators.
//!
//! Per-variant lookup tables play the role of the indicator variables: the
//! protein, carb, and base-recipe of variant `v` are `protein_of[v]`,
//! `carb_of[v]`, `recipe_of[v]`. The solver enforces the seven hard
//! constraints as budget checks against these tables.

use super::model::SlotModel;
use super::types::{Catalog, IngredientKind, ProteinKind, PROTEIN_KINDS};
use std::collections::HashMap;

/// The meal tag the fish-dinner constraints apply to.
pub const DINNER: &str = "dinner";

/// The seven hard constraints in solver-ready form.
#[derive(Debug)]
pub struct Encoded {
    /// Per variant: index into [`PROTEIN_KINDS`]
    pub protein_of: Vec<usize>,
    /// Per variant: index into `carb_ids`, None for the carb-free variant
    pub carb_of: Vec<Option<usize>>,
    /// Per variant: index into `recipe_ids`
    pub recipe_of: Vec<usize>,

    /// Constraint 1: required weekly count per protein kind; kinds missing
    /// from the rules default to 0
    pub protein_targets: Vec<u32>,
    /// Constraint 2 toggle (per-meal scope)
    pub no_consecutive: bool,
    /// Constraint 3: cap on fish dinners per week
    pub fish_dinner_cap: u32,
    /// Constraint 4: longest permitted run of consecutive fish dinners
    pub fish_dinner_run_cap: u32,
    /// Constraint 5: per meal index, whether carb variants are admissible
    pub carb_allowed_meal: Vec<bool>,
    /// Constraint 6: per carb id, floored weekly cap (None = uncapped)
    pub carb_caps: Vec<Option<u32>>,
    /// Constraint 7: cap on uses of any one base recipe
    pub recipe_cap: u32,

    /// Carb-kind ingredient ids, catalog order
    pub carb_ids: Vec<String>,
    /// Base recipe ids, catalog order
    pub recipe_ids: Vec<String>,
    /// Meal index of `dinner`, if the week has one
    pub dinner_meal: Option<usize>,
    /// Protein index of fish
    pub fish: usize,
}

fn protein_index(kind: ProteinKind) -> usize {
    PROTEIN_KINDS.iter().position(|&k| k == kind).unwrap_or(0)
}

/// Lower the constraints onto the model's variant space.
pub fn encode(catalog: &Catalog, model: &SlotModel) -> Encoded {
    let rules = &catalog.rules;

    let carb_ids: Vec<String> = catalog
        .ingredients
        .values()
        .filter(|i| i.kind == IngredientKind::Carb)
        .map(|i| i.id.clone())
        .collect();
    let carb_index: HashMap<&str, usize> = carb_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();
    let carb_caps: Vec<Option<u32>> = carb_ids
        .iter()
        .map(|id| {
            catalog.ingredients[id]
                .max_times_week
                // Fractional caps floor: 0.5 means zero uses in any one week
                .map(|m| m.floor() as u32)
        })
        .collect();

    let recipe_ids: Vec<String> = catalog.recipes.keys().cloned().collect();
    let recipe_index: HashMap<&str, usize> = recipe_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let mut protein_of = Vec::with_capacity(model.variants.len());
    let mut carb_of = Vec::with_capacity(model.variants.len());
    let mut recipe_of = Vec::with_capacity(model.variants.len());
    for variant in &model.variants {
        protein_of.push(protein_index(variant.protein));
        carb_of.push(
            variant
                .carb
                .as_deref()
                .and_then(|c| carb_index.get(c).copied()),
        );
        recipe_of.push(recipe_index.get(variant.recipe.as_str()).copied().unwrap_or(0));
    }

    let mut protein_targets = vec![0u32; PROTEIN_KINDS.len()];
    for (kind, count) in &rules.constraints.weekly_protein_counts {
        protein_targets[protein_index(*kind)] = *count;
    }

    let carb_allowed_meal: Vec<bool> = rules
        .week
        .meals
        .iter()
        .map(|m| catalog.allows_carbs(m))
        .collect();

    Encoded {
        protein_of,
        carb_of,
        recipe_of,
        protein_targets,
        no_consecutive: rules.constraints.no_consecutive_same_protein,
        fish_dinner_cap: rules.constraints.fish_dinner_max_per_week,
        fish_dinner_run_cap: rules.constraints.fish_dinner_max_consecutive,
        carb_allowed_meal,
        carb_caps,
        recipe_cap: rules.constraints.max_recipe_uses_per_week,
        carb_ids,
        recipe_ids,
        dinner_meal: rules.week.meals.iter().position(|m| m == DINNER),
        fish: protein_index(ProteinKind::Fish),
    }
}

impl Encoded {
    /// One-line description of the applied constraints, for the
    /// infeasibility diagnostic.
    pub fn summary(&self) -> String {
        let targets: Vec<String> = PROTEIN_KINDS
            .iter()
            .zip(&self.protein_targets)
            .map(|(kind, count)| format!("{}={}", kind, count))
            .collect();
        let caps: Vec<String> = self
            .carb_ids
            .iter()
            .zip(&self.carb_caps)
            .filter_map(|(id, cap)| cap.map(|c| format!("{}<={}", id, c)))
            .collect();
        format!(
            "weekly protein counts [{}], no_consecutive_same_protein={}, \
             fish dinners <= {} per week and <= {} consecutive, \
             carb frequency [{}], recipe uses <= {}",
            targets.join(", "),
            self.no_consecutive,
            self.fish_dinner_cap,
            self.fish_dinner_run_cap,
            caps.join(", "),
            self.recipe_cap
        )
    }
}
