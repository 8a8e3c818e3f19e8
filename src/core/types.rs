//! YAML schema types for the four data inputs plus the frozen in-memory
//! catalog the rest of the pipeline works from.
//!
//! Wire structs mirror the on-disk YAML exactly and reject unknown keys.
//! The catalog types are what the loader produces after validation; in
//! particular the `@portion` string sentinel only exists on the wire and
//! becomes `Quantity::Portion` before anything downstream sees it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Enums
// ============================================================================

/// The closed set of protein kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProteinKind {
    Chicken,
    Beef,
    Pork,
    Fish,
    Egg,
}

/// Every protein kind, in declaration order. Drives derived-count output
/// order and the zero-defaulting of missing `weekly_protein_counts` entries.
pub const PROTEIN_KINDS: [ProteinKind; 5] = [
    ProteinKind::Chicken,
    ProteinKind::Beef,
    ProteinKind::Pork,
    ProteinKind::Fish,
    ProteinKind::Egg,
];

impl fmt::Display for ProteinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chicken => write!(f, "chicken"),
            Self::Beef => write!(f, "beef"),
            Self::Pork => write!(f, "pork"),
            Self::Fish => write!(f, "fish"),
            Self::Egg => write!(f, "egg"),
        }
    }
}

/// Ingredient classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientKind {
    Protein,
    Carb,
    Other,
}

impl fmt::Display for IngredientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protein => write!(f, "protein"),
            Self::Carb => write!(f, "carb"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Shopping-list section an ingredient belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Protein,
    Carb,
    Vegetable,
    Dairy,
    Fat,
    Condiment,
    Spice,
    Other,
}

/// Every section, in the order sections appear in shopping_list.json.
pub const SECTIONS: [Section; 8] = [
    Section::Protein,
    Section::Carb,
    Section::Vegetable,
    Section::Dairy,
    Section::Fat,
    Section::Condiment,
    Section::Spice,
    Section::Other,
];

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protein => write!(f, "protein"),
            Self::Carb => write!(f, "carb"),
            Self::Vegetable => write!(f, "vegetable"),
            Self::Dairy => write!(f, "dairy"),
            Self::Fat => write!(f, "fat"),
            Self::Condiment => write!(f, "condiment"),
            Self::Spice => write!(f, "spice"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Measurement unit. Short forms on output; long spellings accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "g", alias = "grams")]
    Grams,
    #[serde(rename = "ml", alias = "milliliters")]
    Milliliters,
    #[serde(rename = "units")]
    Units,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grams => write!(f, "g"),
            Self::Milliliters => write!(f, "ml"),
            Self::Units => write!(f, "units"),
        }
    }
}

/// How a recipe relates to carbohydrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarbStrategy {
    None,
    Fixed,
    Optional,
}

impl fmt::Display for CarbStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Fixed => write!(f, "fixed"),
            Self::Optional => write!(f, "optional"),
        }
    }
}

/// Role of an ingredient line within a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Protein,
    Carb,
    Veg,
    Fat,
    Dairy,
    Condiment,
    Spice,
    Other,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protein => write!(f, "protein"),
            Self::Carb => write!(f, "carb"),
            Self::Veg => write!(f, "veg"),
            Self::Fat => write!(f, "fat"),
            Self::Dairy => write!(f, "dairy"),
            Self::Condiment => write!(f, "condiment"),
            Self::Spice => write!(f, "spice"),
            Self::Other => write!(f, "other"),
        }
    }
}

// ============================================================================
// ingredients.yml
// ============================================================================

/// One entry in ingredients.yml, keyed by canonical id in the root mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngredientSpec {
    /// Display name for plan and shopping output
    pub display: String,

    /// Measurement unit for every quantity of this ingredient
    pub unit: Unit,

    /// Shopping-list section
    pub section: Section,

    /// Classification (protein/carb/other)
    pub kind: IngredientKind,

    /// Carb-only: suggested per-meal quantity (informational)
    #[serde(default)]
    pub default_qty: Option<f64>,

    /// Carb-only: weekly frequency cap; fractions are floored
    #[serde(default)]
    pub max_times_week: Option<f64>,

    /// Free-text notes, never emitted in artifacts
    #[serde(default)]
    pub notes: Option<String>,
}

// ============================================================================
// rules.yml
// ============================================================================

/// Root of rules.yml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rules {
    /// Week structure (ordered days and meals)
    pub week: Week,

    /// Per-meal rules, one entry for every meal in `week.meals`
    pub meal_rules: IndexMap<String, MealRule>,

    /// Protein kind -> meal -> quantity (grams, or units for eggs)
    pub protein_portions: IndexMap<ProteinKind, IndexMap<String, f64>>,

    /// Carb portion defaults and per-ingredient overrides
    pub carb_portions: CarbPortions,

    /// The hard planning constraints
    pub constraints: Constraints,
}

/// Ordered week structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Week {
    pub days: Vec<String>,
    pub meals: Vec<String>,
}

/// Per-meal rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MealRule {
    pub allow_carbs: bool,
}

/// Carb portion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CarbPortions {
    /// Meal -> quantity, required for every carb-allowing meal
    pub default_per_meal: IndexMap<String, f64>,

    /// Carb ingredient id -> quantity, takes precedence over the default
    #[serde(default)]
    pub overrides: IndexMap<String, f64>,
}

/// The hard planning constraint parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Constraints {
    /// Protein kind -> slots per week; must sum to days × meals
    pub weekly_protein_counts: IndexMap<ProteinKind, u32>,

    /// Forbid the same protein on adjacent days of the same meal
    pub no_consecutive_same_protein: bool,

    /// Cap on fish dinners per week
    pub fish_dinner_max_per_week: u32,

    /// Longest permitted run of consecutive fish dinners
    pub fish_dinner_max_consecutive: u32,

    /// Cap on uses of any single base recipe per week
    pub max_recipe_uses_per_week: u32,
}

// ============================================================================
// recipes/*.yml
// ============================================================================

/// Root of a recipe file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeSpec {
    pub id: String,
    pub name: String,
    pub meal_types: Vec<String>,
    pub tags: RecipeTags,
    pub carbs: CarbSpec,
    pub ingredients: Vec<RecipeLineSpec>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Recipe tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeTags {
    pub primary_protein: ProteinKind,
}

/// Recipe carb configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CarbSpec {
    pub strategy: CarbStrategy,

    /// Required iff strategy = optional
    #[serde(default)]
    pub allowed: Vec<String>,

    /// Required iff strategy = fixed or optional
    #[serde(default)]
    pub default: Option<String>,
}

/// One ingredient line as written in a recipe file. Exactly one of the
/// quantity fields must be set: `qty: "@portion"` on the protein line, or
/// the `qty_*` field matching the ingredient's unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeLineSpec {
    pub item: String,
    pub role: Role,

    #[serde(default)]
    pub qty: Option<String>,
    #[serde(default)]
    pub qty_g: Option<f64>,
    #[serde(default)]
    pub qty_ml: Option<f64>,
    #[serde(default)]
    pub qty_units: Option<f64>,

    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

// ============================================================================
// Catalog — the frozen, validated model
// ============================================================================

/// Quantity of a recipe ingredient line after parsing. The `@portion`
/// sentinel is only legal on the protein line and resolves against
/// `rules.protein_portions` once the slot's meal is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantity {
    Portion,
    Literal { value: f64, unit: Unit },
}

/// A validated catalog ingredient.
#[derive(Debug, Clone)]
pub struct Ingredient {
    pub id: String,
    pub display: String,
    pub unit: Unit,
    pub section: Section,
    pub kind: IngredientKind,
    pub default_qty: Option<f64>,
    pub max_times_week: Option<f64>,
}

/// A validated recipe ingredient line.
#[derive(Debug, Clone)]
pub struct RecipeLine {
    pub item: String,
    pub role: Role,
    pub quantity: Quantity,
    pub optional: bool,
}

/// A validated recipe.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub meal_types: Vec<String>,
    pub primary_protein: ProteinKind,
    pub strategy: CarbStrategy,
    pub allowed_carbs: Vec<String>,
    pub default_carb: Option<String>,
    pub lines: Vec<RecipeLine>,
}

/// The frozen data model every later stage reads from. Built once by the
/// loader; satisfies every catalog invariant on construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub rules: Rules,
    pub ingredients: IndexMap<String, Ingredient>,
    pub recipes: IndexMap<String, Recipe>,
    pub pantry: Vec<String>,
}

impl Catalog {
    /// Total number of slots in the week.
    pub fn slot_count(&self) -> usize {
        self.rules.week.days.len() * self.rules.week.meals.len()
    }

    /// Whether carbs are permitted at the named meal.
    pub fn allows_carbs(&self, meal: &str) -> bool {
        self.rules
            .meal_rules
            .get(meal)
            .map(|r| r.allow_carbs)
            .unwrap_or(false)
    }

    /// Resolved carb quantity for a carb id at a meal: override first,
    /// then the meal default.
    pub fn carb_qty(&self, carb: &str, meal: &str) -> Option<f64> {
        self.rules
            .carb_portions
            .overrides
            .get(carb)
            .or_else(|| self.rules.carb_portions.default_per_meal.get(meal))
            .copied()
    }
}

// ============================================================================
// Tests
// ============================================================================
