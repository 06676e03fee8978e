use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{grid::Grid, word::{Direction, Position, WordEntry}};

/// One placed word in a finished [puzzle](Puzzle): its clue number, text, start cell and
/// direction
///
/// Coordinates are relative to the puzzle's letter matrix, i.e. already shifted so the
/// top-left occupied cell of the layout is `(0, 0)`.
#[derive(Clone, Eq, PartialEq, PartialOrd, Ord, Default, Debug, Serialize, Deserialize)]
pub struct PlacedEntry
{
    pub number: u16,
    pub text: String,
    #[serde(flatten)]
    pub position: Position,
    pub direction: Direction,
}

impl PlacedEntry
{
    pub fn len(&self) -> usize
    {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool
    {
        self.text.is_empty()
    }

    /// Whether this word occupies the matrix cell `(row, col)`.
    pub fn covers(&self, row: i16, col: i16) -> bool
    {
        let len = self.len() as i16;
        match self.direction
        {
            Direction::Horizontal =>
                row == self.position.row && (self.position.col..self.position.col + len).contains(&col),
            Direction::Vertical =>
                col == self.position.col && (self.position.row..self.position.row + len).contains(&row),
        }
    }
}

/// # The finished, immutable artifact of one generation run
///
/// Holds the letter matrix trimmed to the layout's bounding box, the numbered word
/// entries, and the words the search could not fit. This is the sole surface consumed by
/// rendering and export; the puzzle performs no further validation or mutation.
///
/// Clue numbers are assigned to word-start cells in reading order (top-to-bottom, then
/// left-to-right); two words starting on the same cell share a number.
#[derive(Clone, Eq, PartialEq, PartialOrd, Ord, Default, Debug, Serialize, Deserialize)]
pub struct Puzzle
{
    rows: Vec<Vec<Option<char>>>,
    entries: Vec<PlacedEntry>,
    unplaced: Vec<String>,
}

impl Puzzle
{
    /// Freezes the outcome of a search: the grid's final state plus one
    /// [entry](WordEntry) per word, placed or not.
    pub fn from_result(grid: &Grid, entries: Vec<WordEntry>) -> Puzzle
    {
        let (min, max) = grid.bounding_box()
            .unwrap_or((Position::default(), Position { row: -1, col: -1 }));

        let rows = (min.row..=max.row)
            .map(|row| (min.col..=max.col).map(|col| grid.letter(Position { row, col })).collect())
            .collect();

        let translate = |pos: Position| Position { row: pos.row - min.row, col: pos.col - min.col };

        let starts: BTreeSet<Position> = entries.iter()
            .filter_map(|e| e.placement.as_ref())
            .map(|p| translate(p.position))
            .collect();
        let numbers: BTreeMap<Position, u16> = starts.into_iter()
            .zip(1..)
            .map(|(pos, number)| (pos, number))
            .collect();

        let mut placed: Vec<PlacedEntry> = entries.iter()
            .filter_map(|e| e.placement.as_ref().map(|p| {
                let position = translate(p.position);
                PlacedEntry
                {
                    number: numbers[&position],
                    text: e.text.clone(),
                    position,
                    direction: p.direction,
                }
            }))
            .collect();
        placed.sort_by_key(|e| (e.number, e.direction));

        let unplaced = entries.into_iter()
            .filter(|e| e.placement.is_none())
            .map(|e| e.text)
            .collect();

        Puzzle { rows, entries: placed, unplaced }
    }

    /// The letter matrix, one `Vec` per row; `None` marks an empty cell.
    pub fn rows(&self) -> &[Vec<Option<char>>]
    {
        &self.rows
    }

    pub fn height(&self) -> usize
    {
        self.rows.len()
    }

    pub fn width(&self) -> usize
    {
        self.rows.first().map_or(0, Vec::len)
    }

    /// The letter at matrix cell `(row, col)`, if occupied and in range.
    pub fn letter(&self, row: i16, col: i16) -> Option<char>
    {
        if row < 0 || col < 0 { return None; }
        *self.rows.get(row as usize)?.get(col as usize)?
    }

    /// The clue number shown on `(row, col)`, if a word starts there.
    pub fn number_at(&self, row: i16, col: i16) -> Option<u16>
    {
        self.entries.iter()
            .find(|e| e.position == Position { row, col })
            .map(|e| e.number)
    }

    /// The placed words, ordered by clue number with across before down.
    pub fn entries(&self) -> &[PlacedEntry]
    {
        &self.entries
    }

    /// Words the search could not fit, in attempt order.
    pub fn unplaced(&self) -> &[String]
    {
        &self.unplaced
    }
}

impl fmt::Display for Puzzle
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        for row in &self.rows
        {
            for (i, cell) in row.iter().enumerate()
            {
                if i > 0 { write!(f, " ")?; }
                write!(f, "{}", cell.unwrap_or('-'))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
