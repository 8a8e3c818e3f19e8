//! Solver driver — deterministic satisfaction search over the slot model.
//!
//! Chronological backtracking with forward pruning against the encoded
//! budget tables. Candidate order per slot is shuffled once with an
//! `StdRng` seeded from the CLI seed, so two runs with the same inputs and
//! seed walk the same tree and return the same assignment. Single-threaded
//! by construction; the optional wall-clock bound is checked inside the
//! search loop.

use super::encode::Encoded;
use super::model::SlotModel;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// Solver configuration.
#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    pub seed: u64,
    pub timeout: Option<Duration>,
}

/// Terminal solver verdict. Only `Feasible` carries an assignment: one
/// variant index per slot, in slot order.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Feasible(Vec<usize>),
    Infeasible,
    Timeout,
}

/// Sentinel for an unassigned slot.
const UNASSIGNED: usize = usize::MAX;

/// Run the search.
pub fn solve(model: &SlotModel, enc: &Encoded, opts: &SolverOptions) -> Outcome {
    // Recipe capacity bound: each protein's demand must fit in
    // recipe_cap uses of each of its base recipes.
    let mut capacity = vec![0u32; enc.protein_targets.len()];
    let mut recipe_protein = vec![None; enc.recipe_ids.len()];
    for v in 0..enc.protein_of.len() {
        recipe_protein[enc.recipe_of[v]] = Some(enc.protein_of[v]);
    }
    for protein in recipe_protein.into_iter().flatten() {
        capacity[protein] = capacity[protein].saturating_add(enc.recipe_cap);
    }
    if capacity
        .iter()
        .zip(&enc.protein_targets)
        .any(|(cap, target)| cap < target)
    {
        return Outcome::Infeasible;
    }

    // Per meal, which proteins have at least one admissible variant;
    // drives the demand-versus-remaining-slots prune.
    let meal_admits: Vec<Vec<bool>> = model
        .admissible
        .iter()
        .map(|set| {
            let mut admits = vec![false; enc.protein_targets.len()];
            for &v in set {
                admits[enc.protein_of[v]] = true;
            }
            admits
        })
        .collect();

    // Suffix counts: slots at index >= i per meal.
    let meals = model.admissible.len();
    let mut remaining = vec![vec![0u32; meals]; model.slots.len() + 1];
    for i in (0..model.slots.len()).rev() {
        remaining[i] = remaining[i + 1].clone();
        remaining[i][model.slots[i].meal] += 1;
    }

    let mut rng = StdRng::seed_from_u64(opts.seed);
    let mut candidates: Vec<Vec<usize>> = model
        .slots
        .iter()
        .map(|slot| model.admissible[slot.meal].clone())
        .collect();
    for list in &mut candidates {
        list.shuffle(&mut rng);
    }

    let mut search = Search {
        model,
        enc,
        candidates,
        meal_admits,
        remaining,
        deadline: opts.timeout.map(|t| Instant::now() + t),
        assignment: vec![UNASSIGNED; model.slots.len()],
        protein_used: vec![0; enc.protein_targets.len()],
        carb_used: vec![0; enc.carb_ids.len()],
        recipe_used: vec![0; enc.recipe_ids.len()],
        fish_dinners: 0,
        meals,
    };

    match search.assign(0) {
        Ok(true) => Outcome::Feasible(search.assignment),
        Ok(false) => Outcome::Infeasible,
        Err(TimedOut) => Outcome::Timeout,
    }
}

struct TimedOut;

struct Search<'a> {
    model: &'a SlotModel,
    enc: &'a Encoded,
    candidates: Vec<Vec<usize>>,
    /// Per meal: proteins with an admissible variant there
    meal_admits: Vec<Vec<bool>>,
    /// Per slot index: unassigned slots at or after it, per meal
    remaining: Vec<Vec<u32>>,
    deadline: Option<Instant>,
    assignment: Vec<usize>,
    protein_used: Vec<u32>,
    carb_used: Vec<u32>,
    recipe_used: Vec<u32>,
    fish_dinners: u32,
    meals: usize,
}

impl Search<'_> {
    fn assign(&mut self, slot: usize) -> Result<bool, TimedOut> {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(TimedOut);
            }
        }
        if self.demand_exceeds_room(slot) {
            return Ok(false);
        }
        if slot == self.model.slots.len() {
            // Redundant with the loader's sum invariant: every protein
            // budget must be spent exactly.
            return Ok(self
                .protein_used
                .iter()
                .zip(&self.enc.protein_targets)
                .all(|(used, target)| used == target));
        }

        for k in 0..self.candidates[slot].len() {
            let variant = self.candidates[slot][k];
            if !self.admits(slot, variant) {
                continue;
            }
            self.place(slot, variant);
            if self.assign(slot + 1)? {
                return Ok(true);
            }
            self.unplace(slot, variant);
        }
        Ok(false)
    }

    /// All seven constraints as incremental checks against the budgets.
    fn admits(&self, slot: usize, variant: usize) -> bool {
        let enc = self.enc;
        let position = self.model.slots[slot];
        let protein = enc.protein_of[variant];

        // 1. Weekly protein counts
        if self.protein_used[protein] >= enc.protein_targets[protein] {
            return false;
        }

        // 2. No consecutive same protein, per meal scope (not circular)
        if enc.no_consecutive && position.day > 0 {
            let prev = self.assignment[slot - self.meals];
            if prev != UNASSIGNED && enc.protein_of[prev] == protein {
                return false;
            }
        }

        // 3 & 4. Fish dinner caps
        if Some(position.meal) == enc.dinner_meal && protein == enc.fish {
            if self.fish_dinners >= enc.fish_dinner_cap {
                return false;
            }
            if self.fish_dinner_run(position.day) + 1 > enc.fish_dinner_run_cap {
                return false;
            }
        }

        if let Some(carb) = enc.carb_of[variant] {
            // 5. Meal carb gating (structural in the expander; enforced
            // again here as a safety net)
            if !enc.carb_allowed_meal[position.meal] {
                return false;
            }
            // 6. Carb frequency
            if let Some(cap) = enc.carb_caps[carb] {
                if self.carb_used[carb] >= cap {
                    return false;
                }
            }
        }

        // 7. Max uses per base recipe
        if self.recipe_used[enc.recipe_of[variant]] >= enc.recipe_cap {
            return false;
        }

        true
    }

    /// True when some protein's outstanding demand cannot fit in the
    /// unassigned slots whose meal still admits it.
    fn demand_exceeds_room(&self, slot: usize) -> bool {
        for (protein, (&used, &target)) in self
            .protein_used
            .iter()
            .zip(&self.enc.protein_targets)
            .enumerate()
        {
            let demand = target - used;
            if demand == 0 {
                continue;
            }
            let room: u32 = (0..self.meals)
                .filter(|&m| self.meal_admits[m][protein])
                .map(|m| self.remaining[slot][m])
                .sum();
            if demand > room {
                return true;
            }
        }
        false
    }

    /// Length of the fish-dinner run ending the day before `day`.
    fn fish_dinner_run(&self, day: usize) -> u32 {
        let Some(dinner) = self.enc.dinner_meal else {
            return 0;
        };
        let mut run = 0;
        let mut d = day;
        while d > 0 {
            d -= 1;
            let assigned = self.assignment[d * self.meals + dinner];
            if assigned != UNASSIGNED && self.enc.protein_of[assigned] == self.enc.fish {
                run += 1;
            } else {
                break;
            }
        }
        run
    }

    fn place(&mut self, slot: usize, variant: usize) {
        self.assignment[slot] = variant;
        self.protein_used[self.enc.protein_of[variant]] += 1;
        if let Some(carb) = self.enc.carb_of[variant] {
            self.carb_used[carb] += 1;
        }
        self.recipe_used[self.enc.recipe_of[variant]] += 1;
        if self.is_fish_dinner(slot, variant) {
            self.fish_dinners += 1;
        }
    }

    fn unplace(&mut self, slot: usize, variant: usize) {
        self.assignment[slot] = UNASSIGNED;
        self.protein_used[self.enc.protein_of[variant]] -= 1;
        if let Some(carb) = self.enc.carb_of[variant] {
            self.carb_used[carb] -= 1;
        }
        self.recipe_used[self.enc.recipe_of[variant]] -= 1;
        if self.is_fish_dinner(slot, variant) {
            self.fish_dinners -= 1;
        }
    }

    fn is_fish_dinner(&self, slot: usize, variant: usize) -> bool {
        Some(self.model.slots[slot].meal) == self.enc.dinner_meal
            && self.enc.protein_of[variant] == self.enc.fish
    }
}
