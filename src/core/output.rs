//! Artifact output — plan.json and shopping_list.json.
//!
//! Serialization order is fixed so identical runs produce identical bytes:
//! struct field order, protein kinds in declaration order, carbs sorted by
//! id, sections in declaration order. Writes are atomic (temp + rename).

use super::error::PlanError;
use super::resolve::SlotRecord;
use super::shopping::{derived_counts, ShoppingList};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

/// JSON number that renders integral values without a fractional part
/// (210, not 210.0), matching the artifact contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Qty(pub f64);

impl Serialize for Qty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 && self.0.abs() < 9e15 {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanJson {
    pub seed: u64,
    pub slots: Vec<SlotJson>,
    pub derived: DerivedJson,
}

#[derive(Debug, Serialize)]
pub struct SlotJson {
    pub day: String,
    pub meal: String,
    #[serde(rename = "recipeId")]
    pub recipe_id: String,
    #[serde(rename = "recipeName")]
    pub recipe_name: String,
    pub protein: String,
    #[serde(rename = "proteinQty")]
    pub protein_qty: Qty,
    /// Carb id, or the literal "none"
    pub carb: String,
    #[serde(rename = "carbQty")]
    pub carb_qty: Option<Qty>,
    pub ingredients: Vec<LineJson>,
}

#[derive(Debug, Serialize)]
pub struct LineJson {
    pub item: String,
    pub display: String,
    pub qty: Qty,
    pub unit: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct DerivedJson {
    pub protein_counts: IndexMap<String, u32>,
    pub carb_counts: IndexMap<String, u32>,
}

#[derive(Debug, Serialize)]
pub struct ShoppingJson {
    pub sections: IndexMap<String, Vec<ShoppingItemJson>>,
}

#[derive(Debug, Serialize)]
pub struct ShoppingItemJson {
    pub item: String,
    pub display: String,
    pub quantity: Qty,
    pub unit: String,
}

/// Build the plan document from resolved slot records.
pub fn plan_json(slots: &[SlotRecord], seed: u64) -> PlanJson {
    let (protein_counts, carb_counts) = derived_counts(slots);
    PlanJson {
        seed,
        slots: slots
            .iter()
            .map(|record| SlotJson {
                day: record.day.clone(),
                meal: record.meal.clone(),
                recipe_id: record.recipe_id.clone(),
                recipe_name: record.recipe_name.clone(),
                protein: record.protein.to_string(),
                protein_qty: Qty(record.protein_qty),
                carb: record.carb.clone().unwrap_or_else(|| "none".to_string()),
                carb_qty: record.carb_qty.map(Qty),
                ingredients: record
                    .lines
                    .iter()
                    .map(|line| LineJson {
                        item: line.item.clone(),
                        display: line.display.clone(),
                        qty: Qty(line.qty),
                        unit: line.unit.to_string(),
                        role: line.role.to_string(),
                    })
                    .collect(),
            })
            .collect(),
        derived: DerivedJson {
            protein_counts,
            carb_counts,
        },
    }
}

/// Build the shopping document.
pub fn shopping_json(list: &ShoppingList) -> ShoppingJson {
    ShoppingJson {
        sections: list
            .sections
            .iter()
            .map(|(section, items)| {
                (
                    section.to_string(),
                    items
                        .iter()
                        .map(|item| ShoppingItemJson {
                            item: item.item.clone(),
                            display: item.display.clone(),
                            quantity: Qty(item.quantity),
                            unit: item.unit.to_string(),
                        })
                        .collect(),
                )
            })
            .collect(),
    }
}

/// Serialize `value` as pretty JSON and write it atomically under
/// `out_dir/name` (write to temp, then rename).
pub fn write_artifact<T: Serialize>(
    out_dir: &Path,
    name: &str,
    value: &T,
) -> Result<PathBuf, PlanError> {
    std::fs::create_dir_all(out_dir).map_err(|e| PlanError::io(out_dir, e))?;

    let mut json = serde_json::to_string_pretty(value).map_err(|e| PlanError::Serialize {
        what: "artifact",
        source: e,
    })?;
    json.push('\n');

    let path = out_dir.join(name);
    let tmp = out_dir.join(format!("{}.tmp", name));
    std::fs::write(&tmp, &json).map_err(|e| PlanError::io(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| PlanError::io(&path, e))?;

    Ok(path)
}
