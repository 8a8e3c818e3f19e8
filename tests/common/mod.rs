//! Shared fixture for the end-to-end CLI tests: a complete data directory
//! whose default rules are satisfiable.

use std::path::Path;

pub const RULES: &str = r#"
week:
  days: [mon, tue, wed, thu, fri, sat, sun]
  meals: [lunch, dinner]
meal_rules:
  lunch: { allow_carbs: true }
  dinner: { allow_carbs: false }
protein_portions:
  chicken: { lunch: 210, dinner: 180 }
  beef: { lunch: 200, dinner: 170 }
  pork: { lunch: 200, dinner: 170 }
  fish: { lunch: 200, dinner: 170 }
  egg: { lunch: 3, dinner: 2 }
carb_portions:
  default_per_meal: { lunch: 90 }
  overrides: { couscous: 70 }
constraints:
  weekly_protein_counts: { chicken: 7, fish: 3, beef: 2, pork: 1, egg: 1 }
  no_consecutive_same_protein: true
  fish_dinner_max_per_week: 2
  fish_dinner_max_consecutive: 1
  max_recipe_uses_per_week: 2
"#;

pub const INGREDIENTS: &str = r#"
chicken_breast: { display: Pechuga de pollo, unit: g, section: protein, kind: protein }
beef_steak: { display: Filete de res, unit: g, section: protein, kind: protein }
pork_loin: { display: Lomo de cerdo, unit: g, section: protein, kind: protein }
salmon: { display: "Salmón", unit: g, section: protein, kind: protein }
egg: { display: Huevo, unit: units, section: protein, kind: protein }
rice: { display: Arroz, unit: g, section: carb, kind: carb, default_qty: 90, max_times_week: 4 }
quinoa: { display: Quinoa, unit: g, section: carb, kind: carb, max_times_week: 3 }
couscous: { display: "Cuscús", unit: g, section: carb, kind: carb, max_times_week: 2 }
zucchini: { display: "Calabacín", unit: g, section: vegetable, kind: other }
tomato: { display: Tomate, unit: g, section: vegetable, kind: other }
olive_oil: { display: Aceite de oliva, unit: ml, section: fat, kind: other }
salt: { display: Sal, unit: g, section: spice, kind: other }
"#;

pub const PANTRY: &str = "[olive_oil, salt]\n";

pub fn recipes() -> Vec<(String, String)> {
    let mut files = Vec::new();
    for i in 1..=5 {
        files.push((
            format!("pollo_{}.yml", i),
            format!(
                r#"
id: pollo_{i}
name: Pollo {i}
meal_types: [lunch, dinner]
tags: {{ primary_protein: chicken }}
carbs:
  strategy: optional
  allowed: [rice, quinoa]
  default: rice
ingredients:
  - {{ item: chicken_breast, role: protein, qty: "@portion" }}
  - {{ item: zucchini, role: veg, qty_g: 150 }}
  - {{ item: olive_oil, role: fat, qty_ml: 15 }}
"#
            ),
        ));
    }
    for i in 1..=3 {
        files.push((
            format!("pescado_{}.yml", i),
            format!(
                r#"
id: pescado_{i}
name: Pescado {i}
meal_types: [lunch, dinner]
tags: {{ primary_protein: fish }}
carbs: {{ strategy: none }}
ingredients:
  - {{ item: salmon, role: protein, qty: "@portion" }}
  - {{ item: tomato, role: veg, qty_g: 120 }}
"#
            ),
        ));
    }
    for i in 1..=2 {
        files.push((
            format!("res_{}.yml", i),
            format!(
                r#"
id: res_{i}
name: Res {i}
meal_types: [lunch, dinner]
tags: {{ primary_protein: beef }}
carbs:
  strategy: fixed
  default: couscous
ingredients:
  - {{ item: beef_steak, role: protein, qty: "@portion" }}
  - {{ item: salt, role: spice, qty_g: 2 }}
"#
            ),
        ));
    }
    files.push((
        "cerdo_1.yml".to_string(),
        r#"
id: cerdo_1
name: Cerdo 1
meal_types: [lunch, dinner]
tags: { primary_protein: pork }
carbs: { strategy: none }
ingredients:
  - { item: pork_loin, role: protein, qty: "@portion" }
"#
        .to_string(),
    ));
    files.push((
        "tortilla.yml".to_string(),
        r#"
id: tortilla
name: Tortilla
meal_types: [lunch, dinner]
tags: { primary_protein: egg }
carbs: { strategy: none }
ingredients:
  - { item: egg, role: protein, qty: "@portion" }
  - { item: olive_oil, role: fat, qty_ml: 10 }
"#
        .to_string(),
    ));
    files
}

pub fn write_data(dir: &Path) {
    write_data_with(dir, RULES, INGREDIENTS, PANTRY);
}

pub fn write_data_with(dir: &Path, rules: &str, ingredients: &str, pantry: &str) {
    std::fs::write(dir.join("rules.yml"), rules).unwrap();
    std::fs::write(dir.join("ingredients.yml"), ingredients).unwrap();
    std::fs::write(dir.join("pantry.yml"), pantry).unwrap();
    let recipes_dir = dir.join("recipes");
    std::fs::create_dir_all(&recipes_dir).unwrap();
    for (name, content) in recipes() {
        std::fs::write(recipes_dir.join(name), content).unwrap();
    }
}
