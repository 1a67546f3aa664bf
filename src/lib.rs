//! A constraint solver for zebra-style logic puzzles.
//!
//! A puzzle assigns N positions a unique item from each of several
//! categories, subject to declarative clues written in the ZBC format.
//! The solver finds every consistent assignment.
//!
//! # Core Concepts
//!
//! - **[`Matrix`]**: a boolean possibility grid with one row per
//!   `category.item`, one column per position. Solving only ever narrows
//!   it: cells flip from possible to impossible, never back.
//! - **Propagation**: each clue's operator carries a sound narrowing rule
//!   that eliminates impossible cells, complemented by a generalised
//!   subset elimination inside each category.
//! - **Search**: quiescent but ambiguous states split on the most
//!   constrained cell and wait on a FIFO work stack, bounded by an
//!   iteration budget. A run that exhausts its budget returns its open
//!   stack; feeding it back resumes the search exactly where it stopped.
//!
//! [`Matrix`]: solver::matrix::Matrix
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use zebra_solver::puzzle::parser::parse_source;
//! use zebra_solver::solver::engine::SolverEngine;
//! use zebra_solver::solver::matrix::RowTable;
//!
//! let source = "
//! [categories]
//! name: ana, bo
//! color: red, blue
//!
//! [clues]
//! ana = red
//! ";
//!
//! let parsed = parse_source(source).unwrap();
//! let table = Arc::new(RowTable::build(parsed.categories).unwrap());
//! let engine = SolverEngine::new(table, parsed.clues);
//! let report = engine.solve(50, None).unwrap();
//!
//! // Ana's house may be either of the two, but it is always the red one.
//! assert!(report.done);
//! assert_eq!(report.solutions.len(), 2);
//! ```

pub mod error;
pub mod examples;
pub mod puzzle;
pub mod solver;
