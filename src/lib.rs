//! Semana — constraint-based weekly meal scheduling.
//!
//! Declarative YAML in (rules, ingredient catalog, pantry, recipes),
//! two JSON artifacts out (assigned plan, aggregated shopping list).
//! Deterministic: identical inputs and seed produce identical bytes.

pub mod cli;
pub mod core;
