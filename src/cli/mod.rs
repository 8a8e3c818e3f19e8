//! CLI subcommands — validate-data, generate-plan.

use crate::core::error::PlanError;
use crate::core::{catalog, encode, model, output, resolve, shopping, solver, variants};
use clap::Subcommand;
use std::path::Path;
use std::time::Duration;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the data directory without planning
    ValidateData {
        /// Directory holding rules.yml, ingredients.yml, pantry.yml, recipes/
        data_dir: std::path::PathBuf,
    },

    /// Generate plan.json and shopping_list.json
    GeneratePlan {
        /// Directory holding rules.yml, ingredients.yml, pantry.yml, recipes/
        data_dir: std::path::PathBuf,

        /// Directory the two JSON artifacts are written to
        out_dir: std::path::PathBuf,

        /// Solver seed; identical data and seed produce identical bytes
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Wall-clock bound for the solver, in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

/// Dispatch a CLI command. Validation diagnostics are printed here so
/// every subcommand reports them the same way.
pub fn dispatch(cmd: Commands) -> Result<(), PlanError> {
    let result = match cmd {
        Commands::ValidateData { data_dir } => cmd_validate_data(&data_dir),
        Commands::GeneratePlan {
            data_dir,
            out_dir,
            seed,
            timeout,
        } => cmd_generate_plan(&data_dir, &out_dir, seed, timeout),
    };

    if let Err(PlanError::Validation(ref report)) = result {
        for diagnostic in &report.diagnostics {
            eprintln!("  {}", diagnostic);
        }
    }
    result
}

/// Load the catalog, printing any warnings on success.
fn load_catalog(data_dir: &Path) -> Result<catalog::Loaded, PlanError> {
    println!("Loading data from {}...", data_dir.display());
    let loaded = catalog::load_catalog(data_dir)?;
    for warning in &loaded.warnings {
        eprintln!("  {}", warning);
    }
    Ok(loaded)
}

fn cmd_validate_data(data_dir: &Path) -> Result<(), PlanError> {
    let loaded = load_catalog(data_dir)?;
    let c = &loaded.catalog;
    println!(
        "OK: {} ingredients, {} recipes, {} days x {} meals, {} pantry items",
        c.ingredients.len(),
        c.recipes.len(),
        c.rules.week.days.len(),
        c.rules.week.meals.len(),
        c.pantry.len()
    );
    Ok(())
}

fn cmd_generate_plan(
    data_dir: &Path,
    out_dir: &Path,
    seed: u64,
    timeout: Option<u64>,
) -> Result<(), PlanError> {
    let loaded = load_catalog(data_dir)?;
    let catalog = &loaded.catalog;

    let variants = variants::expand(catalog);
    let slot_model = model::build(catalog, variants)?;
    let encoded = encode::encode(catalog, &slot_model);

    println!(
        "Solving {} slots over {} variants with seed {}...",
        slot_model.slots.len(),
        slot_model.variants.len(),
        seed
    );
    let options = solver::SolverOptions {
        seed,
        timeout: timeout.map(Duration::from_secs),
    };
    let assignment = match solver::solve(&slot_model, &encoded, &options) {
        solver::Outcome::Feasible(assignment) => assignment,
        solver::Outcome::Infeasible => {
            return Err(PlanError::Infeasible {
                applied: encoded.summary(),
            })
        }
        solver::Outcome::Timeout => {
            return Err(PlanError::Timeout {
                limit_secs: timeout.unwrap_or(0),
            })
        }
    };

    let slots = resolve::resolve_plan(catalog, &slot_model, &assignment);
    let list = shopping::aggregate(catalog, &slots);

    let plan_path = output::write_artifact(out_dir, "plan.json", &output::plan_json(&slots, seed))?;
    let shopping_path =
        output::write_artifact(out_dir, "shopping_list.json", &output::shopping_json(&list))?;

    let (protein_counts, carb_counts) = shopping::derived_counts(&slots);
    println!("Plan: {} slots assigned.", slots.len());
    println!(
        "Proteins: {}",
        protein_counts
            .iter()
            .map(|(kind, count)| format!("{} {}", kind, count))
            .collect::<Vec<_>>()
            .join(", ")
    );
    if !carb_counts.is_empty() {
        println!(
            "Carbs: {}",
            carb_counts
                .iter()
                .map(|(carb, count)| format!("{} {}", carb, count))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    println!("Wrote {}", plan_path.display());
    println!("Wrote {}", shopping_path.display());
    Ok(())
}
