use crate::joke::Joke;

pub const RESULTS_PER_BATCH: usize = 5;

/// Pending search results and how many of them have been rendered.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    results: Vec<Joke>,
    visible: usize,
}

impl SearchSession {
    /// A fresh search starts with nothing rendered.
    pub fn new(results: Vec<Joke>) -> Self {
        Self {
            results,
            visible: 0,
        }
    }

    /// Advance the cursor by one batch, returning the newly exposed slice
    /// and the index of its first item.
    pub fn next_batch(&mut self) -> (usize, &[Joke]) {
        let start = self.visible;
        let end = (start + RESULTS_PER_BATCH).min(self.results.len());
        self.visible = end;
        (start, &self.results[start..end])
    }

    pub fn has_more(&self) -> bool {
        self.visible < self.results.len()
    }

    pub fn visible(&self) -> usize {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jokes(n: usize) -> Vec<Joke> {
        (0..n).map(|i| Joke::new(format!("joke {}", i), None)).collect()
    }

    #[test]
    fn test_twelve_results_in_three_batches() {
        let mut session = SearchSession::new(jokes(12));

        let (start, batch) = session.next_batch();
        assert_eq!((start, batch.len()), (0, 5));
        assert_eq!(session.visible(), 5);
        assert!(session.has_more());

        let (start, batch) = session.next_batch();
        assert_eq!((start, batch.len()), (5, 5));
        assert_eq!(batch[0].joke_text, "joke 5");
        assert!(session.has_more());

        let (start, batch) = session.next_batch();
        assert_eq!((start, batch.len()), (10, 2));
        assert_eq!(session.visible(), 12);
        assert!(!session.has_more());
    }

    #[test]
    fn test_visible_is_min_of_batches_and_total() {
        for n in [0, 1, 4, 5, 6, 10, 23] {
            let mut session = SearchSession::new(jokes(n));
            for k in 1..=6 {
                session.next_batch();
                assert_eq!(session.visible(), (RESULTS_PER_BATCH * k).min(n));
                assert_eq!(session.has_more(), session.visible() < n);
            }
        }
    }

    #[test]
    fn test_exhausted_batch_is_empty() {
        let mut session = SearchSession::new(jokes(3));
        session.next_batch();
        let (start, batch) = session.next_batch();
        assert_eq!(start, 3);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_new_search_resets_cursor() {
        let mut session = SearchSession::new(jokes(8));
        session.next_batch();
        session.next_batch();
        assert_eq!(session.visible(), 8);

        session = SearchSession::new(jokes(8));
        assert_eq!(session.visible(), 0);
        assert!(session.has_more());
    }
}
