use std::collections::VecDeque;

/// In-order queue of change notifications.
///
/// Mutators push events as they happen; the host drains them synchronously
/// and forwards them to rendering, solid rebuild or UI listeners. Draining
/// preserves emission order exactly.
#[derive(Debug, Clone)]
pub struct EventQueue<E> {
    pending: VecDeque<E>,
    muted: bool,
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            muted: false,
        }
    }

    pub fn push(&mut self, event: E) {
        if !self.muted {
            self.pending.push_back(event);
        }
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<E> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Stop (or resume) recording. Used while bulk-loading state.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
