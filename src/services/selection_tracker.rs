use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::errors::{AppError, AppResult};

pub type SelectCallback = Box<dyn FnMut(usize, &str) + Send>;

/// A single option index whose rendering is stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshSignal(pub usize);

/// Single-choice state over a rendered list of options.
///
/// Every operation emits exactly one [`RefreshSignal`] per index whose
/// selected/unselected look changed, never a whole-list refresh.
pub struct SelectionTracker {
    options: Vec<String>,
    selected: Option<usize>,
    on_select: SelectCallback,
    subscribers: Vec<UnboundedSender<RefreshSignal>>,
}

impl SelectionTracker {
    pub fn new(options: Vec<String>, on_select: impl FnMut(usize, &str) + Send + 'static) -> Self {
        Self {
            options,
            selected: None,
            on_select: Box::new(on_select),
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<RefreshSignal> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn select(&mut self, index: usize) -> AppResult<()> {
        if index >= self.options.len() {
            return Err(AppError::InvalidSelection {
                index,
                count: self.options.len(),
            });
        }

        let previous = self.selected.replace(index);
        (self.on_select)(index, &self.options[index]);

        if let Some(previous) = previous.filter(|p| *p != index) {
            self.refresh(previous);
        }
        self.refresh(index);
        Ok(())
    }

    pub fn reset(&mut self) {
        if let Some(previous) = self.selected.take() {
            self.refresh(previous);
        }
    }

    pub fn count(&self) -> usize {
        self.options.len()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selected.map(|i| self.options[i].as_str())
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    fn refresh(&mut self, index: usize) {
        // Dropped receivers unsubscribe themselves.
        self.subscribers
            .retain(|tx| tx.send(RefreshSignal(index)).is_ok());
    }
}

impl std::fmt::Debug for SelectionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionTracker")
            .field("options", &self.options)
            .field("selected", &self.selected)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn drain(rx: &mut UnboundedReceiver<RefreshSignal>) -> Vec<usize> {
        let mut indices = Vec::new();
        while let Ok(RefreshSignal(i)) = rx.try_recv() {
            indices.push(i);
        }
        indices
    }

    fn tracker_with_log() -> (SelectionTracker, Arc<Mutex<Vec<(usize, String)>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let tracker = SelectionTracker::new(
            vec!["1".into(), "2".into(), "3".into(), "4".into()],
            move |i, text| sink.lock().unwrap().push((i, text.to_string())),
        );
        (tracker, log)
    }

    #[test]
    fn test_first_select_refreshes_only_new_index() {
        let (mut tracker, log) = tracker_with_log();
        let mut rx = tracker.subscribe();

        tracker.select(2).unwrap();

        assert_eq!(tracker.selected_index(), Some(2));
        assert_eq!(tracker.selected_text(), Some("3"));
        assert_eq!(drain(&mut rx), vec![2]);
        assert_eq!(*log.lock().unwrap(), vec![(2, "3".to_string())]);
    }

    #[test]
    fn test_switching_selection_refreshes_old_and_new() {
        let (mut tracker, log) = tracker_with_log();
        let mut rx = tracker.subscribe();

        tracker.select(0).unwrap();
        drain(&mut rx);
        tracker.select(3).unwrap();

        assert_eq!(tracker.selected_index(), Some(3));
        let mut refreshed = drain(&mut rx);
        refreshed.sort_unstable();
        assert_eq!(refreshed, vec![0, 3]);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_reselecting_same_index_refreshes_it_once() {
        let (mut tracker, _) = tracker_with_log();
        let mut rx = tracker.subscribe();

        tracker.select(1).unwrap();
        drain(&mut rx);
        tracker.select(1).unwrap();

        assert_eq!(drain(&mut rx), vec![1]);
    }

    #[test]
    fn test_reset_refreshes_previous_only() {
        let (mut tracker, _) = tracker_with_log();
        let mut rx = tracker.subscribe();

        tracker.reset();
        assert!(drain(&mut rx).is_empty());

        tracker.select(1).unwrap();
        drain(&mut rx);
        tracker.reset();

        assert_eq!(tracker.selected_index(), None);
        assert_eq!(drain(&mut rx), vec![1]);
    }

    #[test]
    fn test_out_of_range_select_changes_nothing() {
        let (mut tracker, log) = tracker_with_log();
        let mut rx = tracker.subscribe();
        tracker.select(0).unwrap();
        drain(&mut rx);

        let err = tracker.select(4).unwrap_err();

        assert_eq!(err, AppError::InvalidSelection { index: 4, count: 4 });
        assert_eq!(tracker.selected_index(), Some(0));
        assert!(drain(&mut rx).is_empty());
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_dropped_subscriber_does_not_block_others() {
        let (mut tracker, _) = tracker_with_log();
        let dropped = tracker.subscribe();
        let mut kept = tracker.subscribe();
        drop(dropped);

        tracker.select(2).unwrap();

        assert_eq!(drain(&mut kept), vec![2]);
        assert_eq!(tracker.count(), 4);
    }
}
