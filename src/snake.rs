use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use Direction::*;

/// One square of the board, in board units (multiples of the cell size).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn step(self, direction: Direction, size: i32) -> Self {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx * size, self.y + dy * size)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell::new(x, y)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Unit offset on the grid. Up decreases `y`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

/// The snake's body, head first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Lays `len` cells out from `head`, each one `size` units behind the
    /// previous one relative to `direction`.
    pub fn new(head: Cell, len: usize, direction: Direction, size: i32) -> Self {
        let back = direction.opposite();
        let body = std::iter::successors(Some(head), |cell| Some(cell.step(back, size)))
            .take(len)
            .collect();
        Snake { body }
    }

    pub fn from_cells<I: IntoIterator<Item = Cell>>(cells: I) -> Self {
        Snake { body: cells.into_iter().collect() }
    }

    /// # Panics
    ///
    /// Panics if the snake has no cells, which only [`Snake::from_cells`]
    /// can produce.
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn cells(&self) -> impl ExactSizeIterator<Item = &Cell> + '_ {
        self.body.iter()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.body.contains(cell)
    }

    /// True if `cell` overlaps any segment other than the head.
    pub fn hits_body(&self, cell: &Cell) -> bool {
        self.body.iter().skip(1).any(|c| c == cell)
    }

    /// Pushes a new head. Unless `grow` is set, the tail is dropped and
    /// returned.
    pub fn advance(&mut self, new_head: Cell, grow: bool) -> Option<Cell> {
        self.body.push_front(new_head);

        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites() {
        assert!(Up.is_opposite(Down));
        assert!(Down.is_opposite(Up));
        assert!(Left.is_opposite(Right));
        assert!(Right.is_opposite(Left));

        assert!(!Up.is_opposite(Left));
        assert!(!Right.is_opposite(Right));
    }

    #[test]
    fn test_step_scales_by_cell_size() {
        let c = Cell::new(300, 300);
        assert_eq!(c.step(Up, 15), Cell::new(300, 285));
        assert_eq!(c.step(Down, 15), Cell::new(300, 315));
        assert_eq!(c.step(Left, 15), Cell::new(285, 300));
        assert_eq!(c.step(Right, 15), Cell::new(315, 300));
    }

    #[test]
    fn test_new_lays_body_behind_head() {
        let snake = Snake::new(Cell::new(300, 300), 3, Right, 15);
        let cells: Vec<Cell> = snake.cells().copied().collect();
        assert_eq!(cells, vec![Cell::new(300, 300), Cell::new(285, 300), Cell::new(270, 300)]);
        assert_eq!(snake.head(), Cell::new(300, 300));
        assert_eq!(snake.tail(), Cell::new(270, 300));
    }

    #[test]
    fn test_advance() {
        let mut snake = Snake::new(Cell::new(2, 0), 3, Right, 1);

        let dropped = snake.advance(Cell::new(3, 0), false);
        assert_eq!(dropped, Some(Cell::new(0, 0)));
        assert_eq!(snake.len(), 3);

        let dropped = snake.advance(Cell::new(4, 0), true);
        assert_eq!(dropped, None);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Cell::new(4, 0));
    }

    #[test]
    fn test_hits_body_ignores_head() {
        let snake = Snake::new(Cell::new(5, 5), 3, Right, 1);
        assert!(!snake.hits_body(&Cell::new(5, 5)));
        assert!(snake.hits_body(&Cell::new(4, 5)));
        assert!(!snake.hits_body(&Cell::new(9, 9)));
    }
}
