use std::collections::{BTreeMap, BTreeSet};

use crate::{placed_word::PlacedWord, word::{Direction, Placement, Position}};

/// One occupied cell: its letter and the id of every placed word claiming it
///
/// A cell claimed by one word is a plain letter; a cell claimed by two is an
/// intersection. The stored letter is consistent across every claimant.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Cell
{
    letter: char,
    claims: Vec<usize>,
}

impl Cell
{
    pub fn letter(&self) -> char
    {
        self.letter
    }

    pub fn claims(&self) -> &[usize]
    {
        &self.claims
    }
}

/// # The placement surface of one generation run
///
/// The grid is the single source of truth for cell occupancy: every legality check lives
/// here, and the generator never inspects raw cell state directly. Cells live in a sparse
/// map bounded by a square `dimension`; a letter index supports candidate enumeration.
///
/// The grid is mutated only through [`apply`](Grid::apply) and [`revert`](Grid::revert),
/// so at any point its occupied cells exactly reflect the currently committed words.
///
/// # Example
///
/// ```
/// use crossword_layout::grid::Grid;
/// use crossword_layout::word::{Direction, Placement};
///
/// let mut grid = Grid::new(9);
/// grid.apply(0, "hello", &Placement::new(3, 1, Direction::Horizontal));
///
/// // "local" crosses "hello" at its first 'l'
/// assert!(grid.can_place("local", &Placement::new(3, 3, Direction::Vertical)));
/// // a parallel word directly underneath would touch "hello" on every cell
/// assert!(!grid.can_place("ooze", &Placement::new(4, 1, Direction::Horizontal)));
/// ```
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Grid
{
    dimension: i16,
    cells: BTreeMap<Position, Cell>,
    letter_index: BTreeMap<char, BTreeSet<Position>>,
    placed: BTreeMap<usize, PlacedWord>,
}

impl Grid
{
    /// Creates an empty square grid allowing coordinates in `0..dimension` on both axes.
    pub fn new(dimension: u16) -> Grid
    {
        Grid
        {
            dimension: dimension.min(i16::MAX as u16) as i16,
            cells: BTreeMap::new(),
            letter_index: BTreeMap::new(),
            placed: BTreeMap::new(),
        }
    }

    pub fn dimension(&self) -> u16
    {
        self.dimension as u16
    }

    /// The letter at `pos`, if the cell is occupied.
    pub fn letter(&self, pos: Position) -> Option<char>
    {
        self.cells.get(&pos).map(Cell::letter)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell>
    {
        self.cells.get(&pos)
    }

    /// Every occupied cell currently holding `letter`, in row-major order.
    pub fn letter_positions(&self, letter: char) -> impl Iterator<Item = Position> + '_
    {
        self.letter_index.get(&letter).into_iter().flatten().copied()
    }

    /// The placement that centers `word` on the grid, used for the anchor word.
    pub fn center_placement(&self, word: &str, direction: Direction) -> Placement
    {
        let len = word.chars().count() as i16;
        let center = self.dimension / 2;
        match direction
        {
            Direction::Horizontal => Placement::new(center, center - len / 2, direction),
            Direction::Vertical => Placement::new(center - len / 2, center, direction),
        }
    }

    /// Checks, without mutating, whether `word` may legally be committed at `placement`
    ///
    /// A placement is legal when:
    /// - every cell lies inside the grid bounds;
    /// - every occupied cell it crosses already holds the identical letter;
    /// - every cell it would newly occupy has unoccupied neighbours perpendicular to the
    ///   word, so no unrelated parallel word is silently touched;
    /// - the cells just before its start and just after its end are unoccupied, unless
    ///   the word lies entirely inside the span of one already-placed word of the same
    ///   direction (a substring riding on its host, e.g. "art" over the tail of "cart");
    /// - it is not an exact duplicate of an already-placed word.
    ///
    /// Repeated calls with no intervening [`apply`](Grid::apply)/[`revert`](Grid::revert)
    /// always return the same answer.
    pub fn can_place(&self, word: &str, placement: &Placement) -> bool
    {
        let len = word.chars().count() as i16;
        if len == 0 { return false; }

        let start = placement.position;
        let end = placement.cell(len - 1);
        if start.row < 0 || start.col < 0 || end.row >= self.dimension || end.col >= self.dimension
        {
            return false;
        }

        if self.placed.values().any(|pw| pw.placement == *placement && pw.text == word)
        {
            return false;
        }

        let mut crosses_same_direction = false;
        for (pos, ch) in placement.cells(len as usize).zip(word.chars())
        {
            match self.cells.get(&pos)
            {
                Some(cell) =>
                {
                    if cell.letter() != ch { return false; }
                    crosses_same_direction |= cell.claims().iter()
                        .any(|id| self.placed[id].placement.direction == placement.direction);
                }
                None =>
                {
                    let (a, b) = perpendicular_neighbors(pos, placement.direction);
                    if self.is_occupied(a) || self.is_occupied(b) { return false; }
                }
            }
        }

        // Sharing a cell with a same-direction word, or touching an occupied cell end to
        // end, is legal only for a substring riding entirely inside one host word.
        if crosses_same_direction
            || self.is_occupied(step(start, placement.direction, -1))
            || self.is_occupied(step(end, placement.direction, 1))
        {
            return self.lies_within_placed_run(len, placement);
        }

        true
    }

    /// The number of already-occupied cells `word` would cross at `placement`
    ///
    /// Assumes [`can_place`](Grid::can_place) held, so every occupied cell is a letter
    /// match. The anchor word is the only placement ever accepted with score 0.
    pub fn score(&self, word: &str, placement: &Placement) -> usize
    {
        placement.cells(word.chars().count()).filter(|pos| self.is_occupied(*pos)).count()
    }

    /// Commits `word` to the grid under the generator-assigned `id`
    ///
    /// Calling this on a placement that was not first validated with
    /// [`can_place`](Grid::can_place) is a contract violation, not a recoverable error.
    pub fn apply(&mut self, id: usize, word: &str, placement: &Placement)
    {
        debug_assert!(self.can_place(word, placement), "apply called on an unvalidated placement");
        debug_assert!(!self.placed.contains_key(&id), "word id {} applied twice", id);

        for (pos, ch) in placement.cells(word.chars().count()).zip(word.chars())
        {
            match self.cells.get_mut(&pos)
            {
                Some(cell) => cell.claims.push(id),
                None =>
                {
                    self.cells.insert(pos, Cell { letter: ch, claims: vec![id] });
                    self.letter_index.entry(ch).or_default().insert(pos);
                }
            }
        }
        self.placed.insert(id, PlacedWord::new(word, placement.clone()));
    }

    /// Removes the word's claim from each of its cells
    ///
    /// A cell shared with another still-placed word keeps its letter; a cell claimed only
    /// by this word becomes empty again, leaving the grid cell-for-cell identical to its
    /// state before the matching [`apply`](Grid::apply).
    pub fn revert(&mut self, id: usize, word: &str, placement: &Placement)
    {
        let Some(pw) = self.placed.remove(&id) else { return };
        debug_assert!(
            pw.text == word && pw.placement == *placement,
            "revert does not match the applied placement for id {}", id
        );

        for (pos, letter) in pw.cells()
        {
            let Some(cell) = self.cells.get_mut(&pos) else { continue };
            cell.claims.retain(|&claim| claim != id);
            if cell.claims.is_empty()
            {
                self.cells.remove(&pos);
                if let Some(positions) = self.letter_index.get_mut(&letter)
                {
                    positions.remove(&pos);
                    if positions.is_empty() { self.letter_index.remove(&letter); }
                }
            }
        }
    }

    /// The minimal rectangle containing all occupied cells, as `(min, max)` corners.
    pub fn bounding_box(&self) -> Option<(Position, Position)>
    {
        let mut corners: Option<(Position, Position)> = None;
        for pos in self.cells.keys()
        {
            let (min, max) = corners.get_or_insert((*pos, *pos));
            min.row = min.row.min(pos.row);
            min.col = min.col.min(pos.col);
            max.row = max.row.max(pos.row);
            max.col = max.col.max(pos.col);
        }
        corners
    }

    fn is_occupied(&self, pos: Position) -> bool
    {
        self.cells.contains_key(&pos)
    }

    /// True if the maximal occupied run along the placement's axis, after hypothetically
    /// committing the word, is exactly the span of one already-placed word. Any other
    /// endpoint contact would concatenate into a string not present in the input.
    fn lies_within_placed_run(&self, len: i16, placement: &Placement) -> bool
    {
        let dir = placement.direction;

        let mut run_start = placement.position;
        loop
        {
            let prev = step(run_start, dir, -1);
            if self.is_occupied(prev) { run_start = prev; } else { break; }
        }

        let mut run_end = placement.cell(len - 1);
        loop
        {
            let next = step(run_end, dir, 1);
            if self.is_occupied(next) { run_end = next; } else { break; }
        }

        self.placed.values().any(|pw| pw.placement.direction == dir
            && pw.start() == run_start
            && pw.end() == run_end)
    }
}

fn step(pos: Position, direction: Direction, delta: i16) -> Position
{
    match direction
    {
        Direction::Horizontal => Position { row: pos.row, col: pos.col + delta },
        Direction::Vertical => Position { row: pos.row + delta, col: pos.col },
    }
}

fn perpendicular_neighbors(pos: Position, direction: Direction) -> (Position, Position)
{
    let cross = direction.opposite();
    (step(pos, cross, -1), step(pos, cross, 1))
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn h(row: i16, col: i16) -> Placement { Placement::new(row, col, Direction::Horizontal) }
    fn v(row: i16, col: i16) -> Placement { Placement::new(row, col, Direction::Vertical) }

    #[test]
    fn test_can_place_respects_bounds()
    {
        let grid = Grid::new(4);
        assert!(grid.can_place("word", &h(0, 0)));
        assert!(!grid.can_place("word", &h(0, 1)));
        assert!(grid.can_place("word", &v(0, 3)));
        assert!(!grid.can_place("word", &v(1, 3)));
        assert!(!grid.can_place("word", &h(0, -1)));
    }

    #[test]
    fn test_can_place_rejects_letter_conflicts()
    {
        let mut grid = Grid::new(7);
        grid.apply(0, "cat", &h(2, 1));

        // "mop" would put 'm' on the 't' cell
        assert!(!grid.can_place("mop", &v(2, 3)));
        // "tap" starts on the matching 't'
        assert!(grid.can_place("tap", &v(2, 3)));
    }

    #[test]
    fn test_can_place_rejects_parallel_adjacency()
    {
        let mut grid = Grid::new(9);
        grid.apply(0, "cat", &h(2, 1));

        assert!(!grid.can_place("dog", &h(3, 1)));
        assert!(!grid.can_place("dog", &h(1, 1)));
        // one row further away is fine (though disconnected placements are the
        // generator's business to forbid)
        assert!(grid.can_place("dog", &h(4, 1)));
    }

    #[test]
    fn test_can_place_rejects_end_to_end_concatenation()
    {
        let mut grid = Grid::new(12);
        grid.apply(0, "cat", &h(2, 1));

        // "catdog" is not a word anyone asked for
        assert!(!grid.can_place("dog", &h(2, 4)));
        // with one empty cell between them the words stay distinct
        assert!(grid.can_place("dog", &h(2, 5)));
    }

    #[test]
    fn test_substring_rides_on_its_host_word()
    {
        let mut grid = Grid::new(9);
        grid.apply(0, "cart", &h(4, 2));

        // "art" shares the a-r-t cells of "cart" exactly
        let overlay = h(4, 3);
        assert!(grid.can_place("art", &overlay));
        assert_eq!(grid.score("art", &overlay), 3);

        // anything sticking out past the host is a concatenation, not a substring
        assert!(!grid.can_place("arts", &h(4, 3)));
        assert!(!grid.can_place("scart", &h(4, 1)));
    }

    #[test]
    fn test_can_place_rejects_exact_duplicate()
    {
        let mut grid = Grid::new(9);
        grid.apply(0, "cat", &h(2, 1));
        assert!(!grid.can_place("cat", &h(2, 1)));
    }

    #[test]
    fn test_can_place_is_idempotent()
    {
        let mut grid = Grid::new(9);
        grid.apply(0, "cat", &h(2, 1));

        let crossing = v(2, 3);
        let first = grid.can_place("tap", &crossing);
        assert_eq!(grid.can_place("tap", &crossing), first);
        assert_eq!(grid.can_place("tap", &crossing), first);
    }

    #[test]
    fn test_score_counts_intersections()
    {
        let mut grid = Grid::new(9);
        grid.apply(0, "hello", &h(3, 1));

        assert_eq!(grid.score("local", &v(3, 3)), 1);
        assert_eq!(grid.score("hello", &h(5, 1)), 0);
    }

    #[test]
    fn test_revert_restores_previous_state()
    {
        let mut grid = Grid::new(9);
        grid.apply(0, "hello", &h(3, 1));

        let before = grid.clone();
        let crossing = v(3, 3);
        grid.apply(1, "local", &crossing);
        assert_ne!(grid, before);

        grid.revert(1, "local", &crossing);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_revert_keeps_shared_cells()
    {
        let mut grid = Grid::new(9);
        grid.apply(0, "hello", &h(3, 1));
        let crossing = v(3, 3);
        grid.apply(1, "local", &crossing);

        grid.revert(0, "hello", &h(3, 1));

        // the intersection cell still belongs to "local"
        assert_eq!(grid.letter(Position { row: 3, col: 3 }), Some('l'));
        assert_eq!(grid.cell(Position { row: 3, col: 3 }).unwrap().claims(), &[1]);
        // the rest of "hello" is gone
        assert_eq!(grid.letter(Position { row: 3, col: 1 }), None);
        assert_eq!(grid.letter(Position { row: 3, col: 5 }), None);
    }

    #[test]
    fn test_bounding_box()
    {
        let mut grid = Grid::new(9);
        assert_eq!(grid.bounding_box(), None);

        grid.apply(0, "hello", &h(3, 1));
        grid.apply(1, "local", &v(3, 3));
        assert_eq!(grid.bounding_box(), Some((
            Position { row: 3, col: 1 },
            Position { row: 7, col: 5 },
        )));
    }

    #[test]
    fn test_letter_positions_track_occupancy()
    {
        let mut grid = Grid::new(9);
        grid.apply(0, "hello", &h(3, 1));

        assert_eq!(grid.letter_positions('l').collect::<Vec<_>>(), vec![
            Position { row: 3, col: 3 },
            Position { row: 3, col: 4 },
        ]);

        grid.revert(0, "hello", &h(3, 1));
        assert_eq!(grid.letter_positions('l').count(), 0);
    }
}
