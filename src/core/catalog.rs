//! Catalog loading and validation.
//!
//! Parses rules.yml, ingredients.yml, pantry.yml, and recipes/*.yml into
//! the frozen [`Catalog`] model. Validation is one-pass: every violation
//! found lands in the report, nothing aborts early. On success the catalog
//! satisfies every invariant; on failure nothing but the report escapes.

use super::error::{Diagnostic, PlanError, Report};
use super::types::*;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;

const RULES_FILE: &str = "rules.yml";
const INGREDIENTS_FILE: &str = "ingredients.yml";
const PANTRY_FILE: &str = "pantry.yml";
const RECIPES_DIR: &str = "recipes";

/// The sentinel a recipe's protein line carries on the wire.
pub const PORTION_SENTINEL: &str = "@portion";

/// A successfully loaded catalog plus any non-fatal warnings.
#[derive(Debug)]
pub struct Loaded {
    pub catalog: Catalog,
    pub warnings: Vec<Diagnostic>,
}

/// Load and validate all data files under `data_dir`.
pub fn load_catalog(data_dir: &Path) -> Result<Loaded, PlanError> {
    let mut report = Report::new();

    let rules: Option<Rules> = parse_file(data_dir, RULES_FILE, &mut report)?;
    let ingredient_specs: Option<IndexMap<String, IngredientSpec>> =
        parse_file(data_dir, INGREDIENTS_FILE, &mut report)?;
    let pantry: Option<Vec<String>> = parse_file(data_dir, PANTRY_FILE, &mut report)?;
    let recipe_specs = load_recipe_specs(data_dir, &mut report)?;

    // Cross-validation needs all four inputs parsed.
    let (Some(rules), Some(ingredient_specs), Some(pantry)) = (rules, ingredient_specs, pantry)
    else {
        return Err(PlanError::Validation(report));
    };

    validate_rules(&rules, &mut report);
    let ingredients = validate_ingredients(&ingredient_specs, &mut report);
    validate_pantry(&pantry, &ingredients, &mut report);
    let recipes = validate_recipes(&recipe_specs, &rules, &ingredients, &mut report);
    validate_carb_overrides(&rules, &ingredients, &mut report);

    if report.has_errors() {
        return Err(PlanError::Validation(report));
    }

    Ok(Loaded {
        catalog: Catalog {
            rules,
            ingredients,
            recipes,
            pantry,
        },
        warnings: report.diagnostics,
    })
}

/// Read and parse one YAML file. Read failures are fatal I/O errors; parse
/// failures become diagnostics so the pass can continue with other files.
fn parse_file<T: DeserializeOwned>(
    data_dir: &Path,
    name: &str,
    report: &mut Report,
) -> Result<Option<T>, PlanError> {
    let path = data_dir.join(name);
    let content = std::fs::read_to_string(&path).map_err(|e| PlanError::io(&path, e))?;
    match serde_yaml_ng::from_str(&content) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            report.error(name, e.to_string());
            Ok(None)
        }
    }
}

/// Load every recipes/*.yml, sorted by file name for deterministic
/// diagnostic and catalog order.
fn load_recipe_specs(
    data_dir: &Path,
    report: &mut Report,
) -> Result<Vec<(String, RecipeSpec)>, PlanError> {
    let dir = data_dir.join(RECIPES_DIR);
    let entries = std::fs::read_dir(&dir).map_err(|e| PlanError::io(&dir, e))?;

    let mut files: Vec<std::path::PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "yml"))
        .collect();
    files.sort();

    let mut specs = Vec::new();
    for path in files {
        let rel = format!(
            "{}/{}",
            RECIPES_DIR,
            path.file_name().unwrap_or_default().to_string_lossy()
        );
        let content = std::fs::read_to_string(&path).map_err(|e| PlanError::io(&path, e))?;
        match serde_yaml_ng::from_str::<RecipeSpec>(&content) {
            Ok(spec) => specs.push((rel, spec)),
            Err(e) => report.error(&rel, e.to_string()),
        }
    }

    if specs.is_empty() && !report.has_errors() {
        report.error(RECIPES_DIR, "no recipe files found");
    }

    Ok(specs)
}

fn validate_rules(rules: &Rules, report: &mut Report) {
    check_unique(&rules.week.days, "day", report);
    check_unique(&rules.week.meals, "meal", report);

    let meals: HashSet<&str> = rules.week.meals.iter().map(String::as_str).collect();

    // meal_rules must cover week.meals exactly
    for meal in &rules.week.meals {
        if !rules.meal_rules.contains_key(meal) {
            report.error(RULES_FILE, format!("meal_rules missing entry for '{}'", meal));
        }
    }
    for meal in rules.meal_rules.keys() {
        if !meals.contains(meal.as_str()) {
            report.error(
                RULES_FILE,
                format!("meal_rules entry '{}' is not in week.meals", meal),
            );
        }
    }

    // Every carb-allowing meal needs a default carb portion
    for (meal, rule) in &rules.meal_rules {
        if rule.allow_carbs && !rules.carb_portions.default_per_meal.contains_key(meal) {
            report.error(
                RULES_FILE,
                format!("carb_portions.default_per_meal missing entry for '{}'", meal),
            );
        }
    }
    for meal in rules.carb_portions.default_per_meal.keys() {
        if !meals.contains(meal.as_str()) {
            report.error(
                RULES_FILE,
                format!("carb_portions.default_per_meal entry '{}' is not in week.meals", meal),
            );
        }
    }
    for (protein, portions) in &rules.protein_portions {
        for meal in portions.keys() {
            if !meals.contains(meal.as_str()) {
                report.error(
                    RULES_FILE,
                    format!(
                        "protein_portions.{} entry '{}' is not in week.meals",
                        protein, meal
                    ),
                );
            }
        }
    }

    // Protein counts must cover the whole week exactly
    let total_slots = rules.week.days.len() * rules.week.meals.len();
    let protein_sum: u32 = rules.constraints.weekly_protein_counts.values().sum();
    if protein_sum as usize != total_slots {
        report.error(
            RULES_FILE,
            format!(
                "weekly_protein_counts sum to {} but the week has {} slots ({} days × {} meals)",
                protein_sum,
                total_slots,
                rules.week.days.len(),
                rules.week.meals.len()
            ),
        );
    }
}

fn check_unique(tags: &[String], what: &str, report: &mut Report) {
    let mut seen = HashSet::new();
    for tag in tags {
        if !seen.insert(tag.as_str()) {
            report.error(RULES_FILE, format!("duplicate {} tag '{}'", what, tag));
        }
    }
}

fn validate_ingredients(
    specs: &IndexMap<String, IngredientSpec>,
    report: &mut Report,
) -> IndexMap<String, Ingredient> {
    let mut ingredients = IndexMap::new();

    for (id, spec) in specs {
        if spec.kind != IngredientKind::Carb {
            if spec.default_qty.is_some() {
                report.error(
                    INGREDIENTS_FILE,
                    format!("'{}': default_qty is only valid for carb ingredients", id),
                );
            }
            if spec.max_times_week.is_some() {
                report.error(
                    INGREDIENTS_FILE,
                    format!("'{}': max_times_week is only valid for carb ingredients", id),
                );
            }
        }

        if let Some(max) = spec.max_times_week {
            if max < 0.0 {
                report.error(
                    INGREDIENTS_FILE,
                    format!("'{}': max_times_week must be >= 0, got {}", id, max),
                );
            } else if max.fract() != 0.0 {
                // Fractional caps floor to a whole weekly count; the data
                // owner must confirm that is what they meant.
                report.warning(
                    INGREDIENTS_FILE,
                    format!(
                        "'{}': fractional max_times_week {} is applied as at most {} time(s) per week",
                        id,
                        max,
                        max.floor() as u32
                    ),
                );
            }
        }

        ingredients.insert(
            id.clone(),
            Ingredient {
                id: id.clone(),
                display: spec.display.clone(),
                unit: spec.unit,
                section: spec.section,
                kind: spec.kind,
                default_qty: spec.default_qty,
                max_times_week: spec.max_times_week,
            },
        );
    }

    ingredients
}

fn validate_pantry(
    pantry: &[String],
    ingredients: &IndexMap<String, Ingredient>,
    report: &mut Report,
) {
    for id in pantry {
        if !ingredients.contains_key(id) {
            report.error(PANTRY_FILE, format!("unknown ingredient '{}'", id));
        }
    }
}

fn validate_carb_overrides(
    rules: &Rules,
    ingredients: &IndexMap<String, Ingredient>,
    report: &mut Report,
) {
    for id in rules.carb_portions.overrides.keys() {
        match ingredients.get(id) {
            None => report.error(
                RULES_FILE,
                format!("carb_portions.overrides references unknown ingredient '{}'", id),
            ),
            Some(ing) if ing.kind != IngredientKind::Carb => report.error(
                RULES_FILE,
                format!("carb_portions.overrides entry '{}' is not a carb", id),
            ),
            Some(_) => {}
        }
    }
}

fn validate_recipes(
    specs: &[(String, RecipeSpec)],
    rules: &Rules,
    ingredients: &IndexMap<String, Ingredient>,
    report: &mut Report,
) -> IndexMap<String, Recipe> {
    let mut recipes = IndexMap::new();

    for (file, spec) in specs {
        if recipes.contains_key(&spec.id) {
            report.error(file, format!("duplicate recipe id '{}'", spec.id));
            continue;
        }

        validate_meal_types(file, spec, rules, report);
        let lines = validate_lines(file, spec, ingredients, report);
        validate_carb_config(file, spec, &lines, ingredients, report);
        validate_portions_defined(file, spec, rules, report);

        recipes.insert(
            spec.id.clone(),
            Recipe {
                id: spec.id.clone(),
                name: spec.name.clone(),
                meal_types: spec.meal_types.clone(),
                primary_protein: spec.tags.primary_protein,
                strategy: spec.carbs.strategy,
                allowed_carbs: spec.carbs.allowed.clone(),
                default_carb: spec.carbs.default.clone(),
                lines,
            },
        );
    }

    recipes
}

fn validate_meal_types(file: &str, spec: &RecipeSpec, rules: &Rules, report: &mut Report) {
    if spec.meal_types.is_empty() {
        report.error(file, "meal_types must not be empty");
    }
    let mut seen = HashSet::new();
    for meal in &spec.meal_types {
        if !rules.week.meals.contains(meal) {
            report.error(file, format!("meal type '{}' is not in week.meals", meal));
        }
        if !seen.insert(meal.as_str()) {
            report.error(file, format!("duplicate meal type '{}'", meal));
        }
    }
}

/// Validate each ingredient line and lower its quantity into the typed
/// [`Quantity`]; also enforce the exactly-one-protein-line invariant.
fn validate_lines(
    file: &str,
    spec: &RecipeSpec,
    ingredients: &IndexMap<String, Ingredient>,
    report: &mut Report,
) -> Vec<RecipeLine> {
    let mut lines = Vec::new();
    let mut protein_lines = 0u32;

    for raw in &spec.ingredients {
        let Some(ing) = ingredients.get(&raw.item) else {
            report.error(file, format!("unknown ingredient '{}'", raw.item));
            continue;
        };

        let Some(quantity) = lower_quantity(file, raw, ing, report) else {
            continue;
        };

        match quantity {
            Quantity::Portion => {
                if raw.role != Role::Protein {
                    report.error(
                        file,
                        format!("'{}': {} is only valid on the protein line", raw.item, PORTION_SENTINEL),
                    );
                }
                if ing.kind != IngredientKind::Protein {
                    report.error(
                        file,
                        format!(
                            "'{}': {} requires a protein ingredient, but '{}' is {}",
                            raw.item, PORTION_SENTINEL, ing.id, ing.kind
                        ),
                    );
                }
            }
            Quantity::Literal { .. } => {
                if raw.role == Role::Protein {
                    report.error(
                        file,
                        format!("protein line '{}' must use qty: \"{}\"", raw.item, PORTION_SENTINEL),
                    );
                }
            }
        }

        if raw.role == Role::Protein {
            protein_lines += 1;
        }

        lines.push(RecipeLine {
            item: raw.item.clone(),
            role: raw.role,
            quantity,
            optional: raw.optional,
        });
    }

    if protein_lines != 1 {
        report.error(
            file,
            format!("exactly one ingredient must have role: protein, found {}", protein_lines),
        );
    }

    lines
}

/// Lower a line's quantity fields into [`Quantity`]. Exactly one of
/// qty/qty_g/qty_ml/qty_units must be present, and a literal field must
/// match the ingredient's unit.
fn lower_quantity(
    file: &str,
    raw: &RecipeLineSpec,
    ing: &Ingredient,
    report: &mut Report,
) -> Option<Quantity> {
    let mut literals = Vec::new();
    if let Some(v) = raw.qty_g {
        literals.push((Unit::Grams, v));
    }
    if let Some(v) = raw.qty_ml {
        literals.push((Unit::Milliliters, v));
    }
    if let Some(v) = raw.qty_units {
        literals.push((Unit::Units, v));
    }

    let set_fields = literals.len() + usize::from(raw.qty.is_some());
    if set_fields != 1 {
        report.error(
            file,
            format!(
                "'{}': exactly one quantity field is required (qty, qty_g, qty_ml, or qty_units), found {}",
                raw.item, set_fields
            ),
        );
        return None;
    }

    if let Some(ref sentinel) = raw.qty {
        if sentinel != PORTION_SENTINEL {
            report.error(
                file,
                format!("'{}': qty must be \"{}\", got \"{}\"", raw.item, PORTION_SENTINEL, sentinel),
            );
            return None;
        }
        return Some(Quantity::Portion);
    }

    let (unit, value) = literals[0];
    if unit != ing.unit {
        report.error(
            file,
            format!(
                "'{}': quantity given in {} but the ingredient is measured in {}",
                raw.item, unit, ing.unit
            ),
        );
        return None;
    }

    Some(Quantity::Literal { value, unit })
}

fn validate_carb_config(
    file: &str,
    spec: &RecipeSpec,
    lines: &[RecipeLine],
    ingredients: &IndexMap<String, Ingredient>,
    report: &mut Report,
) {
    let carbs = &spec.carbs;
    let inline_carbs: Vec<&str> = lines
        .iter()
        .filter(|l| {
            ingredients
                .get(&l.item)
                .is_some_and(|i| i.kind == IngredientKind::Carb)
        })
        .map(|l| l.item.as_str())
        .collect();

    let check_carb_ref = |what: &str, id: &str, report: &mut Report| match ingredients.get(id) {
        None => report.error(file, format!("{} references unknown ingredient '{}'", what, id)),
        Some(ing) if ing.kind != IngredientKind::Carb => {
            report.error(file, format!("{} '{}' is not a carb", what, id));
        }
        Some(_) => {}
    };

    match carbs.strategy {
        CarbStrategy::None => {
            if !carbs.allowed.is_empty() {
                report.error(file, "carbs.allowed is not valid with strategy 'none'");
            }
            if carbs.default.is_some() {
                report.error(file, "carbs.default is not valid with strategy 'none'");
            }
            for carb in &inline_carbs {
                report.error(
                    file,
                    format!("strategy 'none' forbids carb ingredient '{}' in the recipe", carb),
                );
            }
        }
        CarbStrategy::Fixed => {
            if !carbs.allowed.is_empty() {
                report.error(file, "carbs.allowed is not valid with strategy 'fixed'");
            }
            match carbs.default {
                None => report.error(file, "strategy 'fixed' requires carbs.default"),
                Some(ref default) => {
                    check_carb_ref("carbs.default", default, report);
                    for carb in &inline_carbs {
                        if carb != default {
                            report.error(
                                file,
                                format!(
                                    "strategy 'fixed' only permits the default carb inline, found '{}'",
                                    carb
                                ),
                            );
                        }
                    }
                }
            }
        }
        CarbStrategy::Optional => {
            if carbs.allowed.is_empty() {
                report.error(file, "strategy 'optional' requires a non-empty carbs.allowed");
            }
            for id in &carbs.allowed {
                check_carb_ref("carbs.allowed", id, report);
            }
            match carbs.default {
                None => report.error(file, "strategy 'optional' requires carbs.default"),
                Some(ref default) => {
                    if !carbs.allowed.contains(default) {
                        report.error(
                            file,
                            format!("carbs.default '{}' must be in carbs.allowed", default),
                        );
                    }
                }
            }
            for carb in &inline_carbs {
                if !carbs.allowed.iter().any(|a| a == carb) {
                    report.error(
                        file,
                        format!("inline carb '{}' is not in carbs.allowed", carb),
                    );
                }
            }
        }
    }
}

/// Every meal the recipe can serve needs a portion for its protein.
fn validate_portions_defined(file: &str, spec: &RecipeSpec, rules: &Rules, report: &mut Report) {
    let protein = spec.tags.primary_protein;
    let Some(portions) = rules.protein_portions.get(&protein) else {
        report.error(
            file,
            format!("no protein_portions defined for '{}'", protein),
        );
        return;
    };
    for meal in &spec.meal_types {
        if rules.week.meals.contains(meal) && !portions.contains_key(meal) {
            report.error(
                file,
                format!("no portion defined for '{}' at '{}'", protein, meal),
            );
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn load_fixture() -> Loaded {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        load_catalog(dir.path()).unwrap()
    }

    fn expect_errors(dir: &Path) -> Report {
        match load_catalog(dir) {
            Err(PlanError::Validation(report)) => report,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_load_valid_catalog() {
        let loaded = load_fixture();
        let catalog = loaded.catalog;
        assert_eq!(catalog.ingredients.len(), 12);
        assert_eq!(catalog.recipes.len(), 11);
        assert_eq!(catalog.pantry, vec!["olive_oil", "salt"]);
        assert_eq!(catalog.slot_count(), 14);
        assert!(loaded.warnings.is_empty());

        // Sentinel became a typed quantity on the protein line
        let pollo = &catalog.recipes["pollo_1"];
        assert_eq!(pollo.lines[0].quantity, Quantity::Portion);
        assert_eq!(
            pollo.lines[2].quantity,
            Quantity::Literal {
                value: 15.0,
                unit: Unit::Milliliters
            }
        );
    }

    #[test]
    fn test_recipes_load_in_file_name_order() {
        let loaded = load_fixture();
        let ids: Vec<&String> = loaded.catalog.recipes.keys().collect();
        assert_eq!(ids[0], "cerdo_1");
        assert_eq!(ids[ids.len() - 1], "tortilla");
    }

    #[test]
    fn test_missing_rules_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        std::fs::remove_file(dir.path().join("rules.yml")).unwrap();
        match load_catalog(dir.path()) {
            Err(PlanError::Io { path, .. }) => {
                assert!(path.ends_with("rules.yml"));
            }
            other => panic!("expected I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        let mut ingredients = fixture::INGREDIENTS.to_string();
        ingredients.push_str("weird: { display: W, unit: g, section: other, kind: other, brand: acme }\n");
        std::fs::write(dir.path().join("ingredients.yml"), ingredients).unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.file == "ingredients.yml" && d.message.contains("brand")));
    }

    #[test]
    fn test_parse_errors_aggregate_across_files() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        std::fs::write(dir.path().join("rules.yml"), "week: [not: {{").unwrap();
        std::fs::write(dir.path().join("pantry.yml"), "{bad").unwrap();

        let report = expect_errors(dir.path());
        assert!(report.errors().any(|d| d.file == "rules.yml"));
        assert!(report.errors().any(|d| d.file == "pantry.yml"));
    }

    #[test]
    fn test_unknown_recipe_ingredient() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        std::fs::write(
            dir.path().join("recipes").join("zz_ghost.yml"),
            r#"
id: ghost
name: Ghost
meal_types: [lunch]
tags: { primary_protein: chicken }
carbs: { strategy: none }
ingredients:
  - { item: chicken_breast, role: protein, qty: "@portion" }
  - { item: unicorn, role: veg, qty_g: 100 }
"#,
        )
        .unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.file == "recipes/zz_ghost.yml" && d.message.contains("unicorn")));
    }

    #[test]
    fn test_duplicate_recipe_id() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        let original = std::fs::read_to_string(dir.path().join("recipes").join("tortilla.yml")).unwrap();
        std::fs::write(dir.path().join("recipes").join("zz_copy.yml"), original).unwrap();

        let report = expect_errors(dir.path());
        assert!(report.errors().any(|d| d.message.contains("duplicate recipe id 'tortilla'")));
    }

    #[test]
    fn test_two_protein_roles_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        std::fs::write(
            dir.path().join("recipes").join("zz_double.yml"),
            r#"
id: double
name: Double
meal_types: [lunch]
tags: { primary_protein: chicken }
carbs: { strategy: none }
ingredients:
  - { item: chicken_breast, role: protein, qty: "@portion" }
  - { item: salmon, role: protein, qty: "@portion" }
"#,
        )
        .unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("exactly one ingredient must have role: protein, found 2")));
    }

    #[test]
    fn test_portion_sentinel_outside_protein_role() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        std::fs::write(
            dir.path().join("recipes").join("zz_misuse.yml"),
            r#"
id: misuse
name: Misuse
meal_types: [lunch]
tags: { primary_protein: chicken }
carbs: { strategy: none }
ingredients:
  - { item: chicken_breast, role: protein, qty: "@portion" }
  - { item: zucchini, role: veg, qty: "@portion" }
"#,
        )
        .unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("@portion is only valid on the protein line")));
        assert!(report
            .errors()
            .any(|d| d.message.contains("requires a protein ingredient")));
    }

    #[test]
    fn test_protein_line_with_literal_qty_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        std::fs::write(
            dir.path().join("recipes").join("zz_literal.yml"),
            r#"
id: literal
name: Literal
meal_types: [lunch]
tags: { primary_protein: chicken }
carbs: { strategy: none }
ingredients:
  - { item: chicken_breast, role: protein, qty_g: 200 }
"#,
        )
        .unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("must use qty: \"@portion\"")));
    }

    #[test]
    fn test_quantity_unit_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        std::fs::write(
            dir.path().join("recipes").join("zz_units.yml"),
            r#"
id: units
name: Units
meal_types: [lunch]
tags: { primary_protein: chicken }
carbs: { strategy: none }
ingredients:
  - { item: chicken_breast, role: protein, qty: "@portion" }
  - { item: olive_oil, role: fat, qty_g: 15 }
"#,
        )
        .unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("quantity given in g but the ingredient is measured in ml")));
    }

    #[test]
    fn test_two_quantity_fields_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        std::fs::write(
            dir.path().join("recipes").join("zz_twoqty.yml"),
            r#"
id: twoqty
name: Twoqty
meal_types: [lunch]
tags: { primary_protein: chicken }
carbs: { strategy: none }
ingredients:
  - { item: chicken_breast, role: protein, qty: "@portion" }
  - { item: zucchini, role: veg, qty_g: 100, qty_ml: 100 }
"#,
        )
        .unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("exactly one quantity field is required")));
    }

    #[test]
    fn test_strategy_none_with_inline_carb() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        std::fs::write(
            dir.path().join("recipes").join("zz_nocarb.yml"),
            r#"
id: nocarb
name: Nocarb
meal_types: [lunch]
tags: { primary_protein: chicken }
carbs: { strategy: none }
ingredients:
  - { item: chicken_breast, role: protein, qty: "@portion" }
  - { item: rice, role: carb, qty_g: 90 }
"#,
        )
        .unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("strategy 'none' forbids carb ingredient 'rice'")));
    }

    #[test]
    fn test_strategy_fixed_requires_default() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        std::fs::write(
            dir.path().join("recipes").join("zz_fixed.yml"),
            r#"
id: fixed
name: Fixed
meal_types: [lunch]
tags: { primary_protein: chicken }
carbs: { strategy: fixed }
ingredients:
  - { item: chicken_breast, role: protein, qty: "@portion" }
"#,
        )
        .unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("strategy 'fixed' requires carbs.default")));
    }

    #[test]
    fn test_strategy_fixed_default_must_be_carb() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        std::fs::write(
            dir.path().join("recipes").join("zz_fixed2.yml"),
            r#"
id: fixed2
name: Fixed2
meal_types: [lunch]
tags: { primary_protein: chicken }
carbs: { strategy: fixed, default: zucchini }
ingredients:
  - { item: chicken_breast, role: protein, qty: "@portion" }
"#,
        )
        .unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("carbs.default 'zucchini' is not a carb")));
    }

    #[test]
    fn test_strategy_optional_default_outside_allowed() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        std::fs::write(
            dir.path().join("recipes").join("zz_opt.yml"),
            r#"
id: opt
name: Opt
meal_types: [lunch]
tags: { primary_protein: chicken }
carbs: { strategy: optional, allowed: [rice], default: quinoa }
ingredients:
  - { item: chicken_breast, role: protein, qty: "@portion" }
"#,
        )
        .unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("carbs.default 'quinoa' must be in carbs.allowed")));
    }

    #[test]
    fn test_protein_count_sum_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        let rules = fixture::RULES.replace("chicken: 7, fish: 3", "chicken: 7, fish: 2");
        std::fs::write(dir.path().join("rules.yml"), rules).unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("weekly_protein_counts sum to 13")));
    }

    #[test]
    fn test_meal_rules_must_cover_meals() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        let rules = fixture::RULES.replace("  dinner: { allow_carbs: false }\n", "");
        std::fs::write(dir.path().join("rules.yml"), rules).unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("meal_rules missing entry for 'dinner'")));
    }

    #[test]
    fn test_missing_protein_portion_for_meal() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        let rules = fixture::RULES.replace(
            "egg: { lunch: 3, dinner: 2 }",
            "egg: { lunch: 3 }",
        );
        std::fs::write(dir.path().join("rules.yml"), rules).unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("no portion defined for 'egg' at 'dinner'")));
    }

    #[test]
    fn test_unknown_pantry_ingredient() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        std::fs::write(dir.path().join("pantry.yml"), "[olive_oil, phantom]\n").unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.file == "pantry.yml" && d.message.contains("phantom")));
    }

    #[test]
    fn test_carb_fields_on_non_carb_ingredient() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        let mut ingredients = fixture::INGREDIENTS.to_string();
        ingredients = ingredients.replace(
            "zucchini: { display: \"Calabacín\", unit: g, section: vegetable, kind: other }",
            "zucchini: { display: \"Calabacín\", unit: g, section: vegetable, kind: other, max_times_week: 2 }",
        );
        std::fs::write(dir.path().join("ingredients.yml"), ingredients).unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("max_times_week is only valid for carb ingredients")));
    }

    #[test]
    fn test_fractional_cap_warns_but_loads() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        let mut ingredients = fixture::INGREDIENTS.to_string();
        ingredients.push_str(
            "platano_maduro: { display: \"Plátano maduro\", unit: g, section: carb, kind: carb, max_times_week: 0.5 }\n",
        );
        std::fs::write(dir.path().join("ingredients.yml"), ingredients).unwrap();

        let loaded = load_catalog(dir.path()).unwrap();
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0]
            .message
            .contains("fractional max_times_week 0.5 is applied as at most 0 time(s) per week"));
    }

    #[test]
    fn test_carb_override_must_reference_carb() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        let rules = fixture::RULES.replace(
            "overrides: { couscous: 70 }",
            "overrides: { olive_oil: 70 }",
        );
        std::fs::write(dir.path().join("rules.yml"), rules).unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("carb_portions.overrides entry 'olive_oil' is not a carb")));
    }

    #[test]
    fn test_meal_type_outside_week() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        std::fs::write(
            dir.path().join("recipes").join("zz_meal.yml"),
            r#"
id: brunchy
name: Brunchy
meal_types: [brunch]
tags: { primary_protein: chicken }
carbs: { strategy: none }
ingredients:
  - { item: chicken_breast, role: protein, qty: "@portion" }
"#,
        )
        .unwrap();

        let report = expect_errors(dir.path());
        assert!(report
            .errors()
            .any(|d| d.message.contains("meal type 'brunch' is not in week.meals")));
    }

    #[test]
    fn test_empty_recipes_dir_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write(dir.path());
        let recipes_dir = dir.path().join("recipes");
        std::fs::remove_dir_all(&recipes_dir).unwrap();
        std::fs::create_dir_all(&recipes_dir).unwrap();

        let report = expect_errors(dir.path());
        assert!(report.errors().any(|d| d.message.contains("no recipe files found")));
    }
}
