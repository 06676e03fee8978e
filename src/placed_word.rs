use serde::{Deserialize, Serialize};

use crate::word::{Placement, Position};

/// A word that has been committed to a [grid](crate::grid::Grid): its normalized text
/// and the accepted [placement](Placement)
///
/// A placed word is either fully present in the grid or fully absent; partial placements
/// never survive a backtrack.
#[derive(Clone, Eq, PartialEq, PartialOrd, Ord, Default, Debug, Serialize, Deserialize)]
pub struct PlacedWord
{
    pub text: String,
    pub placement: Placement,
}

impl PlacedWord
{
    pub fn new(text: impl Into<String>, placement: Placement) -> PlacedWord
    {
        PlacedWord { text: text.into(), placement }
    }

    pub fn len(&self) -> usize
    {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool
    {
        self.text.is_empty()
    }

    /// The cell holding the first letter.
    pub fn start(&self) -> Position
    {
        self.placement.position
    }

    /// The cell holding the last letter.
    pub fn end(&self) -> Position
    {
        self.placement.cell(self.len() as i16 - 1)
    }

    /// Every `(cell, letter)` pair of this word, in word order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, char)> + '_
    {
        self.placement.cells(self.len()).zip(self.text.chars())
    }
}

#[cfg(test)]
mod tests
{
    use crate::word::Direction;

    use super::*;

    #[test]
    fn test_cells_follow_direction()
    {
        let w = PlacedWord::new("cat", Placement::new(1, 2, Direction::Horizontal));
        assert_eq!(w.cells().collect::<Vec<_>>(), vec![
            (Position { row: 1, col: 2 }, 'c'),
            (Position { row: 1, col: 3 }, 'a'),
            (Position { row: 1, col: 4 }, 't'),
        ]);
        assert_eq!(w.start(), Position { row: 1, col: 2 });
        assert_eq!(w.end(), Position { row: 1, col: 4 });
    }
}
