// batcher - splits records into deck-sized slices


use log::debug;

use crate::config::BatchSize;

pub struct Batcher {
    pub batch_size: BatchSize,
}

impl Batcher {
    pub fn new(batch_size: BatchSize) -> Self {
        Self { batch_size }
    }

    /// Consecutive slices covering `items` exactly, in order.
    /// Empty input produces no slices.
    pub fn split<'a, T>(&self, items: &'a [T]) -> Vec<&'a [T]> {
        let batches: Vec<&[T]> = match self.batch_size {
            _ if items.is_empty() => Vec::new(),
            BatchSize::Unbounded => vec![items],
            BatchSize::Max(n) => items.chunks(n.get()).collect(),
        };
        debug!(
            "[batcher] {} items -> {} batches ({:?})",
            items.len(),
            batches.len(),
            self.batch_size
        );
        batches
    }

    /// Number of slices [`Batcher::split`] yields for `len` items
    pub fn batch_count(&self, len: usize) -> usize {
        match self.batch_size {
            _ if len == 0 => 0,
            BatchSize::Unbounded => 1,
            BatchSize::Max(n) => len.div_ceil(n.get()),
        }
    }
}
