//! Fixed-capacity ring buffer
//!
//! Indices wrap with a mask, so the capacity must be a power of two. One
//! slot is always kept free: `head == tail` means empty, and a buffer of
//! `N` slots holds at most `N - 1` items.

/// Ring buffer of `N` slots (at most `N - 1` queued items)
///
/// This is the unsynchronized flavour: it needs `&mut self`, so it is only
/// usable where access is already exclusive (inside an interrupt handler,
/// under a critical section, or in purely foreground code). Use
/// [`SharedQueue`](super::SharedQueue) to share a queue between interrupt
/// and foreground code.
#[derive(Debug, Clone)]
pub struct Queue<T, const N: usize> {
    /// Slot storage; `None` only in free slots
    buffer: [Option<T>; N],
    /// Next slot to pop
    head: usize,
    /// Next slot to push
    tail: usize,
    /// Pushes refused because the buffer was full
    overflows: u16,
}

impl<T: Copy, const N: usize> Queue<T, N> {
    const CAPACITY_CHECK: () = assert!(
        N >= 2 && N.is_power_of_two(),
        "queue size must be a power of 2 (and at least 2)"
    );

    const MASK: usize = N - 1;

    /// Create an empty queue
    ///
    /// Fails to compile if `N` is not a power of two.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_CHECK;
        Self {
            buffer: [None; N],
            head: 0,
            tail: 0,
            overflows: 0,
        }
    }

    /// Append an item
    ///
    /// Returns `false` and leaves the queue untouched if it is full.
    pub fn push(&mut self, item: T) -> bool {
        if self.free() == 0 {
            self.overflows = self.overflows.saturating_add(1);
            return false;
        }
        self.buffer[self.tail] = Some(item);
        self.tail = (self.tail + 1) & Self::MASK;
        true
    }

    /// Remove the oldest item
    ///
    /// Returns `None` and leaves the queue untouched if it is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.buffer[self.head].take();
        self.head = (self.head + 1) & Self::MASK;
        item
    }

    /// Copy the oldest item without removing it
    pub fn peek(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.buffer[self.head]
    }

    /// Copy up to `out.len()` items, oldest first, without removing them
    ///
    /// Returns the number of items copied.
    pub fn peek_into(&self, out: &mut [T]) -> usize {
        let count = out.len().min(self.len());
        for (i, slot) in out.iter_mut().take(count).enumerate() {
            if let Some(item) = self.buffer[(self.head + i) & Self::MASK] {
                *slot = item;
            }
        }
        count
    }

    /// Number of queued items
    pub fn len(&self) -> usize {
        self.tail.wrapping_sub(self.head) & Self::MASK
    }

    /// Number of items that can still be pushed
    pub fn free(&self) -> usize {
        self.head.wrapping_sub(self.tail).wrapping_sub(1) & Self::MASK
    }

    /// Check if there is nothing to pop
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Check if the next push would be refused
    pub fn is_full(&self) -> bool {
        self.free() == 0
    }

    /// Maximum number of queued items (`N - 1`)
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Drop all queued items
    pub fn clear(&mut self) {
        self.buffer = [None; N];
        self.head = 0;
        self.tail = 0;
    }

    /// Number of refused pushes since creation or the last reset
    pub fn overflows(&self) -> u16 {
        self.overflows
    }

    /// Reset the refused-push counter
    pub fn reset_overflows(&mut self) {
        self.overflows = 0;
    }

    /// Slot index of the next pop
    pub fn head(&self) -> usize {
        self.head
    }

    /// Slot index of the next push
    pub fn tail(&self) -> usize {
        self.tail
    }
}

impl<T: Copy, const N: usize> Default for Queue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
