//! The search engine.
//!
//! Each branch of the search owns a matrix and a solved-clue memo. A
//! branch is driven to a fixed point (propagate every clue, then subset
//! elimination, until quiescent), validated, verified against every clue,
//! and then either recorded as a solution, discarded, or split on the
//! most constrained undecided cell.
//!
//! Open branches wait in a FIFO work stack: children join behind the
//! states already waiting, so a run that stops on its iteration budget
//! leaves a stack whose resumption replays the uncut run exactly.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::puzzle::ast::Expr;
use crate::solver::check::{check_clue, SolvedMemo};
use crate::solver::combinations::Combinations;
use crate::solver::eliminate::eliminate;
use crate::solver::matrix::{Matrix, RowTable};
use crate::solver::propagate::propagate_clue;
use crate::solver::stats::SearchStats;

/// One open branch: a matrix plus the clue conclusions drawn on the way
/// here. Forking a branch clones both; the memo is persistent, so the
/// clone is cheap and the copies diverge safely.
#[derive(Debug, Clone)]
pub struct BranchState {
    pub matrix: Matrix,
    pub solved: SolvedMemo,
}

impl BranchState {
    fn initial(table: Arc<RowTable>) -> BranchState {
        BranchState {
            matrix: Matrix::new(table),
            solved: SolvedMemo::new(),
        }
    }
}

/// The result of one `solve` call.
#[derive(Debug)]
pub struct SolveReport {
    /// The work stack drained completely; no further solutions exist.
    pub done: bool,
    /// Open branches remaining when the iteration budget ran out. Feed
    /// them back into [`SolverEngine::solve`] to continue the search.
    pub stack: VecDeque<BranchState>,
    /// Every fully determined matrix found during this call.
    pub solutions: Vec<Matrix>,
    pub stats: SearchStats,
}

enum Outcome {
    /// Fully determined and verified.
    Solved,
    /// Quiescent but still ambiguous.
    Open,
    /// A strict row lost its last cell, or a column ran out of candidates.
    DeadStructure,
    /// Some clue checked definitely false.
    Refuted,
}

pub struct SolverEngine {
    table: Arc<RowTable>,
    clues: Arc<Vec<Expr>>,
    combos: Combinations,
}

impl SolverEngine {
    pub fn new(table: Arc<RowTable>, clues: Vec<Expr>) -> SolverEngine {
        let combos = Combinations::for_positions(table.positions());
        SolverEngine {
            table,
            clues: Arc::new(clues),
            combos,
        }
    }

    pub fn table(&self) -> &Arc<RowTable> {
        &self.table
    }

    pub fn clues(&self) -> &[Expr] {
        &self.clues
    }

    /// Runs the search for at most `max_iterations` consumed states.
    ///
    /// A `resume` stack, taken from a previous report, *replaces* the
    /// initial state entirely; splitting one budget across several calls
    /// yields exactly the same solutions in the same order.
    pub fn solve(
        &self,
        max_iterations: u64,
        resume: Option<VecDeque<BranchState>>,
    ) -> Result<SolveReport> {
        let mut stack = resume.unwrap_or_else(|| {
            VecDeque::from([BranchState::initial(self.table.clone())])
        });
        let mut stats = SearchStats::default();
        let mut solutions = Vec::new();

        while stats.iterations < max_iterations {
            let Some(mut state) = stack.pop_front() else {
                break;
            };
            stats.iterations += 1;

            match self.solve_option(&mut state, &mut stats)? {
                Outcome::Solved => solutions.push(state.matrix),
                Outcome::Open => {
                    let children = self.fork(&state);
                    if children.is_empty() {
                        stats.dead_ends += 1;
                    } else {
                        stats.options += children.len() as u64;
                        stack.extend(children);
                    }
                }
                Outcome::DeadStructure => stats.dead_ends += 1,
                Outcome::Refuted => stats.refuted += 1,
            }
        }

        let done = stack.is_empty();
        debug!(
            iterations = stats.iterations,
            options = stats.options,
            solutions = solutions.len(),
            done,
            "solve call finished"
        );
        Ok(SolveReport {
            done,
            stack,
            solutions,
            stats,
        })
    }

    /// Drives one branch to a fixed point and classifies it.
    fn solve_option(&self, state: &mut BranchState, stats: &mut SearchStats) -> Result<Outcome> {
        loop {
            let snapshot = state.matrix.snapshot();
            for (index, clue) in self.clues.iter().enumerate() {
                let clue_stats = stats.clue_stats.entry(index).or_default();
                let start_time = std::time::Instant::now();
                clue_stats.revisions += 1;
                let pruned =
                    propagate_clue(clue, &mut state.matrix, &self.combos, &mut state.solved)?;
                if pruned {
                    clue_stats.prunings += 1;
                }
                clue_stats.time_spent_micros += start_time.elapsed().as_micros() as u64;
            }
            eliminate(&mut state.matrix, &self.combos);
            if state.matrix.rows() == snapshot.as_slice() {
                break;
            }
        }

        let BranchState { matrix, solved } = state;

        // Structural validity: strict items still need a home, and every
        // column must remain coverable by every category.
        for (ci, cat) in self.table.categories().iter().enumerate() {
            if cat.strict {
                for row in self.table.rows_of(ci) {
                    if matrix.row(row).is_empty() {
                        return Ok(Outcome::DeadStructure);
                    }
                }
            }
            for p in 0..self.table.positions() {
                if matrix.candidates(ci, p).next().is_none() {
                    return Ok(Outcome::DeadStructure);
                }
            }
        }

        for clue in self.clues.iter() {
            if !check_clue(clue, matrix, solved)? {
                return Ok(Outcome::Refuted);
            }
        }

        let determined = (0..self.table.row_count()).all(|row| matrix.row(row).len() <= 1);
        if determined {
            Ok(Outcome::Solved)
        } else {
            Ok(Outcome::Open)
        }
    }

    /// Splits a quiescent branch on the most constrained undecided cell:
    /// the (category, column) with the fewest remaining candidates, ties
    /// broken by category declaration order, then column order. One child
    /// per candidate, with the column forced to it.
    fn fork(&self, state: &BranchState) -> Vec<BranchState> {
        let m = &state.matrix;
        let mut best: Option<(usize, usize, usize)> = None;
        for ci in 0..self.table.category_count() {
            for p in 0..self.table.positions() {
                let count = m.candidate_count(ci, p);
                if count >= 2 && best.map_or(true, |(c, _, _)| count < c) {
                    best = Some((count, ci, p));
                }
            }
        }
        let Some((count, cat, col)) = best else {
            return Vec::new();
        };
        debug!(category = cat, column = col, count, "branching");

        let mut children = Vec::new();
        for chosen in m.candidates(cat, col) {
            let mut child = state.clone();
            for other in self.table.rows_of(cat) {
                if other != chosen {
                    child.matrix.clear(other, col);
                }
            }
            children.push(child);
        }
        children
    }
}
