use std::collections::VecDeque;

use super::{class_counts, Float, Instance, NCLASSES};

/// Bounded per-class history of the stream
///
/// Every label has its own FIFO window holding at most `chunk_size / 2` instances. Inserting
/// into a full window evicts its oldest element, the window of the other class is untouched.
/// The windows persist across chunk boundaries and feed the balancer.
#[derive(Debug, Clone)]
pub struct ClassWindows<F> {
    windows: [VecDeque<Instance<F>>; NCLASSES],
    capacity: usize,
}

impl<F: Float> ClassWindows<F> {
    /// Create empty windows sized for the given chunk size
    pub fn new(chunk_size: usize) -> Self {
        let capacity = chunk_size / 2;
        ClassWindows {
            windows: [
                VecDeque::with_capacity(capacity + 1),
                VecDeque::with_capacity(capacity + 1),
            ],
            capacity,
        }
    }

    /// Append an instance to the window of its class
    ///
    /// # Panics
    ///
    /// If the target of the instance is not a valid class index.
    pub fn push(&mut self, instance: Instance<F>) {
        let window = &mut self.windows[instance.target()];
        window.push_back(instance);
        if window.len() > self.capacity {
            window.pop_front();
        }
    }

    pub fn window(&self, class: usize) -> &VecDeque<Instance<F>> {
        &self.windows[class]
    }

    /// Current length of both windows
    pub fn lens(&self) -> [usize; NCLASSES] {
        [self.windows[0].len(), self.windows[1].len()]
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.windows.iter_mut().for_each(VecDeque::clear);
    }
}

/// Collects raw instances until a chunk is complete
#[derive(Debug, Clone)]
pub struct ChunkAccumulator<F> {
    chunk: Vec<Instance<F>>,
    chunk_size: usize,
}

impl<F: Float> ChunkAccumulator<F> {
    pub fn new(chunk_size: usize) -> Self {
        ChunkAccumulator {
            chunk: Vec::with_capacity(chunk_size),
            chunk_size,
        }
    }

    /// Append an instance and report whether the chunk is complete
    pub fn push(&mut self, instance: Instance<F>) -> bool {
        self.chunk.push(instance);
        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.chunk.len() >= self.chunk_size
    }

    /// Take all collected instances, leaving the accumulator empty
    pub fn drain(&mut self) -> Vec<Instance<F>> {
        std::mem::replace(&mut self.chunk, Vec::with_capacity(self.chunk_size))
    }

    pub fn class_counts(&self) -> [usize; NCLASSES] {
        class_counts(&self.chunk)
    }

    pub fn len(&self) -> usize {
        self.chunk.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunk.is_empty()
    }

    pub fn clear(&mut self) {
        self.chunk.clear();
    }
}
