use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::GridSize;
use crate::input::{Direction, direction_change_is_valid};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        bounds.contains(self)
    }

    /// Returns the neighbouring cell one step in `direction`.
    ///
    /// The result may lie outside any grid; callers check bounds.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Snake body plus its committed and pending headings.
///
/// The head is stored apart from the trailing segments so a snake can never
/// be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    head: Position,
    trailing: VecDeque<Position>,
    direction: Direction,
    pending_direction: Option<Direction>,
}

impl Snake {
    /// Creates a one-cell snake at `start` with the provided direction.
    #[must_use]
    pub fn new(start: Position, direction: Direction) -> Self {
        Self {
            head: start,
            trailing: VecDeque::new(),
            direction,
            pending_direction: None,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// Returns `None` for an empty segment list.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Option<Self> {
        let mut trailing = VecDeque::from(segments);
        let head = trailing.pop_front()?;

        Some(Self {
            head,
            trailing,
            direction,
            pending_direction: None,
        })
    }

    /// Queues `direction` for the next tick unless it reverses the committed
    /// direction. Returns whether the request was accepted.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.direction, direction) {
            return false;
        }

        self.pending_direction = Some(direction);
        true
    }

    /// Promotes the pending direction to the committed one and returns it.
    pub fn commit_direction(&mut self) -> Direction {
        if let Some(pending) = self.pending_direction.take() {
            self.direction = pending;
        }
        self.direction
    }

    /// Returns the head position one step along the committed direction.
    #[must_use]
    pub fn next_head_position(&self) -> Position {
        self.head.step(self.direction)
    }

    /// Returns true when moving the head onto `position` would hit the body.
    ///
    /// The tail is exempt unless the snake is growing this tick, because it
    /// vacates the cell in the same step.
    #[must_use]
    pub fn collides_with_body(&self, position: Position, growing: bool) -> bool {
        if position == self.head {
            return true;
        }

        let checked = if growing {
            self.trailing.len()
        } else {
            self.trailing.len().saturating_sub(1)
        };

        self.trailing.iter().take(checked).any(|segment| *segment == position)
    }

    /// Pushes a new head; drops the tail unless `grow` is set.
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.trailing.push_front(self.head);
        self.head = new_head;
        if !grow {
            let _ = self.trailing.pop_back();
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.head
    }

    /// Returns the current tail position (the head for a one-cell snake).
    #[must_use]
    pub fn tail(&self) -> Position {
        self.trailing.back().copied().unwrap_or(self.head)
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.head == position || self.trailing.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trailing.len() + 1
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the committed movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the direction queued for the next tick, if any.
    #[must_use]
    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        std::iter::once(&self.head).chain(self.trailing.iter())
    }
}

#[cfg(test)]
mod tests {
    use crate::input::Direction;

    use super::{Position, Snake};

    fn line_snake() -> Snake {
        Snake::from_segments(
            vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
            Direction::Right,
        )
        .expect("segments are non-empty")
    }

    #[test]
    fn empty_segments_are_rejected() {
        assert!(Snake::from_segments(Vec::new(), Direction::Right).is_none());
    }

    #[test]
    fn step_moves_one_cell() {
        let origin = Position::new(5, 5);

        assert_eq!(origin.step(Direction::Up), Position::new(5, 4));
        assert_eq!(origin.step(Direction::Down), Position::new(5, 6));
        assert_eq!(origin.step(Direction::Left), Position::new(4, 5));
        assert_eq!(origin.step(Direction::Right), Position::new(6, 5));
    }

    #[test]
    fn snake_moves_one_cell_per_advance() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right);

        let next = snake.next_head_position();
        snake.advance(next, false);

        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn snake_growth_keeps_previous_tail() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right);

        let next = snake.next_head_position();
        snake.advance(next, true);

        assert_eq!(snake.len(), 2);
        assert_eq!(snake.tail(), Position::new(5, 5));
    }

    #[test]
    fn reversal_request_is_dropped() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Up);

        assert!(!snake.request_direction(Direction::Down));
        assert_eq!(snake.pending_direction(), None);
        assert_eq!(snake.commit_direction(), Direction::Up);
    }

    #[test]
    fn last_accepted_request_wins() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right);

        assert!(snake.request_direction(Direction::Up));
        assert!(snake.request_direction(Direction::Down));
        // Checked against the committed direction, not the pending one.
        assert!(!snake.request_direction(Direction::Left));

        assert_eq!(snake.commit_direction(), Direction::Down);
        assert_eq!(snake.pending_direction(), None);
    }

    #[test]
    fn tail_is_exempt_only_when_not_growing() {
        let snake = line_snake();

        assert!(!snake.collides_with_body(Position::new(3, 5), false));
        assert!(snake.collides_with_body(Position::new(3, 5), true));
        assert!(snake.collides_with_body(Position::new(4, 5), false));
        assert!(!snake.collides_with_body(Position::new(5, 6), false));
    }

    #[test]
    fn segments_iterate_head_first() {
        let snake = line_snake();
        let cells: Vec<Position> = snake.segments().copied().collect();

        assert_eq!(
            cells,
            vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)]
        );
        assert_eq!(snake.tail(), Position::new(3, 5));
        assert!(snake.occupies(Position::new(4, 5)));
        assert!(!snake.occupies(Position::new(6, 5)));
    }
}
