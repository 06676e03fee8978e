use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use itertools::Itertools;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{grid::Grid, puzzle::Puzzle, word::{normalize_word_list, Direction, Placement, Position, WordEntry}};

/// Error type for problems with the supplied word list
#[derive(Error, Debug)]
pub enum GenerateError
{
    #[error("no usable words remain after normalization")]
    InvalidInput,
}

/// Represents all settings for a [generator](PuzzleGenerator)
///
/// Both bounds have sane defaults, so `GeneratorSettings::default()` is usable as is.
#[derive(Clone, Eq, PartialEq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct GeneratorSettings
{
    /// Width and height the grid will allow, in cells.
    pub max_grid_dimension: u16,
    /// How many candidate applications one run may spend before settling for the best
    /// partial layout found so far.
    pub max_placement_attempts: u32,
    /// Optional wall-clock limit, checked at the same points as the attempt bound.
    pub max_run_time: Option<Duration>,
}

impl Default for GeneratorSettings
{
    fn default() -> Self
    {
        GeneratorSettings
        {
            max_grid_dimension: 32,
            max_placement_attempts: 10_000,
            max_run_time: None,
        }
    }
}

/// # Assembles a crossword layout from a list of words
///
/// One call to [`generate`](PuzzleGenerator::generate) is one self-contained run: it
/// normalizes and orders the words, drives a score-ordered backtracking search over a
/// [grid](Grid) it owns exclusively, and freezes the outcome into a [puzzle](Puzzle).
/// Identical input and settings always produce an identical puzzle.
///
/// The search degrades rather than fails: if no fully connected layout is found within
/// the attempt bound, the best partial layout observed is returned and the words that
/// did not fit are reported in the puzzle's `unplaced` list.
///
/// # Example
/// ```
/// use crossword_layout::generator::{GeneratorSettings, PuzzleGenerator};
///
/// let generator = PuzzleGenerator::new(
///     vec!["hello".to_owned(), "world".to_owned()],
///     GeneratorSettings::default(),
/// );
///
/// let puzzle = generator.generate().unwrap();
/// assert!(puzzle.unplaced().is_empty());
/// assert_eq!(puzzle.entries().len(), 2);
/// ```
#[derive(Clone, Eq, PartialEq, PartialOrd, Ord, Default, Debug, Serialize, Deserialize)]
pub struct PuzzleGenerator
{
    pub words: Vec<String>,
    pub settings: GeneratorSettings,
}

impl PuzzleGenerator
{
    pub fn new(words: Vec<String>, settings: GeneratorSettings) -> PuzzleGenerator
    {
        PuzzleGenerator { words, settings }
    }

    /// Runs one full search and returns the finished [puzzle](Puzzle)
    ///
    /// Fails only when the word list is empty (or entirely unusable) after
    /// normalization; every other outcome, including not fitting some words within the
    /// search bounds, is reported through the puzzle's `unplaced` list.
    pub fn generate(&self) -> Result<Puzzle, GenerateError>
    {
        let words = normalize_word_list(&self.words);
        if words.is_empty() { return Err(GenerateError::InvalidInput); }

        let mut search = Search
        {
            grid: Grid::new(self.settings.max_grid_dimension),
            words: &words,
            attempts: 0,
            budget: self.settings.max_placement_attempts,
            deadline: self.settings.max_run_time.map(|limit| Instant::now() + limit),
            placed: Vec::new(),
            best: Vec::new(),
        };
        let solved = search.run();
        debug!(
            "search finished: solved={}, attempts={}, placed {}/{} words",
            solved, search.attempts, search.best.len(), words.len()
        );

        // On failure or budget exhaustion, replay the deepest state observed.
        let (grid, placements) = if solved
        {
            (search.grid, search.placed)
        }
        else
        {
            let mut grid = Grid::new(self.settings.max_grid_dimension);
            for (id, placement) in &search.best
            {
                grid.apply(*id, &words[*id], placement);
            }
            (grid, search.best)
        };

        let mut entries: Vec<WordEntry> = words.into_iter().map(WordEntry::new).collect();
        for (id, placement) in placements
        {
            entries[id].placement = Some(placement);
        }

        Ok(Puzzle::from_result(&grid, entries))
    }
}

/// The mutable state of one run: the grid, the attempt budget, the committed placements
/// of the current branch and a snapshot of the deepest branch seen.
struct Search<'a>
{
    grid: Grid,
    words: &'a [String],
    attempts: u32,
    budget: u32,
    deadline: Option<Instant>,
    placed: Vec<(usize, Placement)>,
    best: Vec<(usize, Placement)>,
}

impl Search<'_>
{
    fn run(&mut self) -> bool
    {
        let dimension = self.grid.dimension() as usize;
        let (usable, oversized): (Vec<usize>, Vec<usize>) = (0..self.words.len())
            .partition(|&id| self.words[id].chars().count() <= dimension);
        for id in oversized
        {
            debug!("word {:?} cannot fit a {}-cell grid", self.words[id], dimension);
        }

        let Some((&anchor, rest)) = usable.split_first() else { return false };

        // The anchor establishes the origin and is exempt from the intersection rule.
        let placement = self.grid.center_placement(&self.words[anchor], Direction::Horizontal);
        self.commit(anchor, &placement);
        trace!("anchored {:?} at {:?}", self.words[anchor], placement.position);

        self.place_remaining(rest)
    }

    /// Chronological backtracking over the words still to place, in list order
    ///
    /// Returns true once the end of the list is reached. A word with no legal candidate
    /// fails the branch, like a word whose candidates all fail deeper down; the caller
    /// then tries its own next candidate, which may unblock the stuck word. Only full
    /// exhaustion falls back to the best partial layout.
    fn place_remaining(&mut self, rest: &[usize]) -> bool
    {
        let Some((&id, tail)) = rest.split_first() else { return true };
        if self.out_of_budget() { return false; }

        let word = &self.words[id];
        let candidates = self.candidates(word);
        if candidates.is_empty()
        {
            trace!("no candidate placement for {:?} in this branch", word);
            return false;
        }

        for (score, placement) in candidates
        {
            if self.out_of_budget() { return false; }

            trace!("trying {:?} at {:?} (score {})", word, placement, score);
            self.commit(id, &placement);
            if self.place_remaining(tail) { return true; }

            self.placed.pop();
            self.grid.revert(id, word, &placement);
        }

        false
    }

    /// Every legal placement for `word` against the current grid, highest score first;
    /// ties fall back to row-major position order so runs are reproducible.
    ///
    /// Candidates are derived from occupied cells sharing a letter with the word, so each
    /// one intersects the existing layout at least once.
    fn candidates(&self, word: &str) -> Vec<(usize, Placement)>
    {
        let mut found = BTreeSet::new();
        let directions = [Direction::Horizontal, Direction::Vertical];
        for ((offset, ch), direction) in word.chars().enumerate().cartesian_product(directions)
        {
            for Position { row, col } in self.grid.letter_positions(ch)
            {
                let placement = match direction
                {
                    Direction::Horizontal => Placement::new(row, col - offset as i16, direction),
                    Direction::Vertical => Placement::new(row - offset as i16, col, direction),
                };
                if self.grid.can_place(word, &placement) { found.insert(placement); }
            }
        }

        found.into_iter()
            .map(|placement| (self.grid.score(word, &placement), placement))
            .sorted_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)))
            .collect()
    }

    fn commit(&mut self, id: usize, placement: &Placement)
    {
        self.attempts += 1;
        self.grid.apply(id, &self.words[id], placement);
        self.placed.push((id, placement.clone()));
        if self.placed.len() > self.best.len()
        {
            self.best = self.placed.clone();
        }
    }

    fn out_of_budget(&self) -> bool
    {
        self.attempts >= self.budget
            || self.deadline.map_or(false, |deadline| Instant::now() >= deadline)
    }
}
