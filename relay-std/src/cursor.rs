//! Forward-only position over a dispatch's snapshotted steps.

use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Before,
    At(usize),
    Exhausted,
}

/// A forward-only cursor over an immutable sequence of steps.
///
/// A fresh cursor sits before the first element; [`advance`](Self::advance)
/// must be called once before [`current`](Self::current) yields anything.
/// Once advanced past the end the cursor stays exhausted.
#[derive(Debug)]
pub struct HandlerCursor<T> {
    steps: Arc<[T]>,
    position: Position,
}

impl<T> HandlerCursor<T> {
    /// Create a cursor over a snapshot of steps.
    pub fn new(steps: impl Into<Arc<[T]>>) -> Self {
        Self {
            steps: steps.into(),
            position: Position::Before,
        }
    }

    /// Move to the next step, or become exhausted past the end.
    pub fn advance(&mut self) {
        self.position = match self.position {
            Position::Before if !self.steps.is_empty() => Position::At(0),
            Position::At(i) if i + 1 < self.steps.len() => Position::At(i + 1),
            _ => Position::Exhausted,
        };
    }

    /// The step at the current position.
    ///
    /// `None` before the first advance and once exhausted.
    pub fn current(&self) -> Option<&T> {
        match self.position {
            Position::At(i) => self.steps.get(i),
            Position::Before | Position::Exhausted => None,
        }
    }

    /// Whether [`current`](Self::current) yields a step.
    pub fn is_valid(&self) -> bool {
        matches!(self.position, Position::At(_))
    }

    /// Whether the cursor moved past the last step.
    pub fn is_exhausted(&self) -> bool {
        self.position == Position::Exhausted
    }

    /// Index of the current step.
    pub fn position(&self) -> Option<usize> {
        match self.position {
            Position::At(i) => Some(i),
            Position::Before | Position::Exhausted => None,
        }
    }

    /// Number of steps in the snapshot.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the snapshot has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<T> Default for HandlerCursor<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_every_step_once() {
        let mut cursor = HandlerCursor::new(vec!['a', 'b', 'c']);
        assert!(!cursor.is_valid());
        assert_eq!(cursor.current(), None);

        let mut seen = Vec::new();
        cursor.advance();
        while let Some(step) = cursor.current() {
            seen.push(*step);
            cursor.advance();
        }
        assert_eq!(seen, ['a', 'b', 'c']);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn empty_snapshot_exhausts_on_first_advance() {
        let mut cursor = HandlerCursor::<u8>::default();
        assert!(cursor.is_empty());
        cursor.advance();
        assert!(!cursor.is_valid());
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn exhausted_cursor_stays_exhausted() {
        let mut cursor = HandlerCursor::new(vec![1]);
        cursor.advance();
        assert_eq!(cursor.position(), Some(0));
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.position(), None);
        assert_eq!(cursor.len(), 1);
    }
}
