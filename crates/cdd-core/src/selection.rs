//! Selected container index

/// Tracks which row of the container list is selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionController {
    selected: Option<usize>,
    count: usize,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Move up, wrapping from the first row to the last
    pub fn up(&mut self) {
        if self.count == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => i.checked_sub(1).unwrap_or(self.count - 1),
            None => self.count - 1,
        });
    }

    /// Move down, wrapping from the last row to the first
    pub fn down(&mut self) {
        if self.count == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % self.count,
            None => 0,
        });
    }

    /// Keep the index valid after the list was replaced with `count` entries
    pub fn on_list_replaced(&mut self, count: usize) {
        self.count = count;
        self.selected = match (self.selected, count) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), n) => Some(i.min(n - 1)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_count(count: usize) -> SelectionController {
        let mut s = SelectionController::new();
        s.on_list_replaced(count);
        s
    }

    #[test]
    fn test_wraps_both_ways() {
        let mut s = with_count(3);
        assert_eq!(s.selected(), Some(0));
        s.up();
        assert_eq!(s.selected(), Some(2));
        s.down();
        assert_eq!(s.selected(), Some(0));
        s.down();
        s.down();
        assert_eq!(s.selected(), Some(2));
        s.down();
        assert_eq!(s.selected(), Some(0));
    }

    #[test]
    fn test_empty_list_is_noop() {
        let mut s = with_count(0);
        s.up();
        s.down();
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn test_clamps_when_list_shrinks() {
        let mut s = with_count(5);
        s.up();
        assert_eq!(s.selected(), Some(4));

        s.on_list_replaced(2);
        assert_eq!(s.selected(), Some(1));

        s.on_list_replaced(0);
        assert_eq!(s.selected(), None);

        s.on_list_replaced(3);
        assert_eq!(s.selected(), Some(0));
    }

    #[test]
    fn test_growing_list_keeps_index() {
        let mut s = with_count(2);
        s.down();
        s.on_list_replaced(6);
        assert_eq!(s.selected(), Some(1));
    }
}
