//! Dirty-flag bookkeeping for derived path data.

/// State of one derived quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheState {
    Clean,
    #[default]
    Dirty,
}

/// Anything holding derived geometry that must be recomputed after an edit.
pub trait InvalidateCache {
    /// Mark every derived quantity dirty. Storage may be kept for reuse.
    fn invalidate_cache(&mut self);
}

impl<T: InvalidateCache + ?Sized> InvalidateCache for Box<T> {
    #[inline]
    fn invalidate_cache(&mut self) {
        (**self).invalidate_cache();
    }
}
