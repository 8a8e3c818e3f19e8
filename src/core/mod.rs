//! Core pipeline — catalog loading, variant expansion, slot model,
//! constraint encoding, solving, portion resolution, shopping aggregation,
//! artifact output.

pub mod catalog;
pub mod encode;
pub mod error;
pub mod model;
pub mod output;
pub mod resolve;
pub mod shopping;
pub mod solver;
pub mod types;
pub mod variants;
