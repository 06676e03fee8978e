use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Represents the coordinate of a single cell in a [grid](crate::grid::Grid)
///
/// The derived ordering is row-major (top-to-bottom, then left-to-right), which is the
/// reading order used for clue numbering and for deterministic tie-breaks in the search.
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Default, Debug, Serialize, Deserialize)]
pub struct Position
{
    pub row: i16,
    pub col: i16,
}

/// Represents the direction of a [word](crate::placed_word::PlacedWord) placed in a [grid](crate::grid::Grid)
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction
{
    #[default]
    Horizontal,
    Vertical,
}

impl Direction
{
    pub fn opposite(&self) -> Direction
    {
        match *self
        {
            Direction::Horizontal => Direction::Vertical,
            Direction::Vertical => Direction::Horizontal,
        }
    }
}

/// A binding of a word to a start [position](Position) and [direction](Direction)
///
/// The derived ordering (position first, then direction) is the stable secondary key
/// used when two candidate placements have the same score.
#[derive(Clone, Eq, PartialEq, PartialOrd, Ord, Default, Debug, Serialize, Deserialize)]
pub struct Placement
{
    pub position: Position,
    pub direction: Direction,
}

impl Placement
{
    pub fn new(row: i16, col: i16, direction: Direction) -> Placement
    {
        Placement { position: Position { row, col }, direction }
    }

    /// The cell occupied by the letter at `offset` from the start of the word.
    pub fn cell(&self, offset: i16) -> Position
    {
        match self.direction
        {
            Direction::Horizontal => Position { row: self.position.row, col: self.position.col + offset },
            Direction::Vertical => Position { row: self.position.row + offset, col: self.position.col },
        }
    }

    /// All cells a word of length `len` occupies under this placement, in word order.
    pub fn cells(&self, len: usize) -> impl Iterator<Item = Position>
    {
        let p = self.clone();
        (0..len as i16).map(move |i| p.cell(i))
    }
}

/// A word participating in one generation run: its normalized text and, once the
/// search has accepted it, its [placement](Placement)
///
/// The placement reverts to `None` if a backtrack undoes the branch that placed the word.
#[derive(Clone, Eq, PartialEq, PartialOrd, Ord, Default, Debug, Serialize, Deserialize)]
pub struct WordEntry
{
    pub text: String,
    pub placement: Option<Placement>,
}

impl WordEntry
{
    pub fn new(text: impl Into<String>) -> WordEntry
    {
        WordEntry { text: text.into(), placement: None }
    }

    pub fn len(&self) -> usize
    {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool
    {
        self.text.is_empty()
    }
}

/// Case-folds and trims one raw word, returning `None` if nothing usable remains
///
/// Words with non-letter characters are rejected here as well; the caller is expected
/// to have validated its input already, so this is a defensive second pass.
pub(crate) fn normalize_word(raw: &str) -> Option<String>
{
    let text = raw.trim().to_lowercase();
    if text.is_empty() || !text.chars().all(char::is_alphabetic) { return None; }
    Some(text)
}

/// Normalizes, deduplicates and orders a raw word list into the attempt order of one run
///
/// Words are sorted by descending length, then by descending letter commonality (the sum,
/// over the word's letters, of how often that letter occurs across the whole list), then
/// lexicographically. Longer, more intersectable words are attempted first; the final
/// key makes the order total so identical input always produces identical output.
pub(crate) fn normalize_word_list(words: &[String]) -> Vec<String>
{
    let normalized: Vec<String> = words.iter()
        .filter_map(|w| {
            let n = normalize_word(w);
            if n.is_none() { log::debug!("dropping unusable word {:?}", w); }
            n
        })
        .unique()
        .collect();

    let mut letter_counts: BTreeMap<char, u32> = BTreeMap::new();
    for word in &normalized
    {
        for ch in word.chars() { *letter_counts.entry(ch).or_default() += 1; }
    }
    let commonality = |w: &str| w.chars().map(|ch| letter_counts[&ch]).sum::<u32>();

    normalized.into_iter()
        .sorted_by(|a, b| b.chars().count().cmp(&a.chars().count())
            .then_with(|| commonality(b).cmp(&commonality(a)))
            .then_with(|| a.cmp(b)))
        .collect()
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_normalize_word_folds_case_and_trims()
    {
        assert_eq!(normalize_word("  CaT "), Some("cat".to_owned()));
        assert_eq!(normalize_word("   "), None);
        assert_eq!(normalize_word("d0g"), None);
        assert_eq!(normalize_word("two words"), None);
    }

    #[test]
    fn test_normalize_word_list_orders_and_dedupes()
    {
        let words: Vec<String> = ["dog", "CAT", "planet", " cat ", "lantern"]
            .iter().map(|s| s.to_string()).collect();

        // "lantern" (7) before "planet" (6); "cat" and "dog" tie on length but the
        // letters of "cat" are more common in this list than the letters of "dog".
        assert_eq!(normalize_word_list(&words), vec!["lantern", "planet", "cat", "dog"]);
    }

    #[test]
    fn test_placement_cells()
    {
        let p = Placement::new(2, 3, Direction::Vertical);
        assert_eq!(p.cells(3).collect::<Vec<_>>(), vec![
            Position { row: 2, col: 3 },
            Position { row: 3, col: 3 },
            Position { row: 4, col: 3 },
        ]);
    }
}
