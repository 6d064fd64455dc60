//! Core engine: fetch quotes, evaluate venue pairs, hand off execution.

pub mod evaluator;
pub mod executor;
pub mod scan_loop;
pub mod scanner;
