/// A simple slab allocator.
///
/// A `Slab` stores values of type `T` in a contiguous vector of slots and
/// hands out small integer keys that stay valid until the value is
/// removed. Freed keys are reused by later insertions.
///
/// The runtime uses it to hold spawned tasks: the key doubles as the task
/// id carried by the task's waker.
pub(crate) struct Slab<T> {
    /// Slot storage; `None` marks a free slot.
    entries: Vec<Option<T>>,
    /// Stack of free keys that can be reused.
    free: Vec<usize>,
    /// Number of occupied slots.
    len: usize,
}

impl<T> Slab<T> {
    /// Creates a new `Slab` with `capacity` pre-allocated free slots.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let slab = Slab::<i32>::with_capacity(16);
    /// ```
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let entries = (0..capacity).map(|_| None).collect();
        let free = (0..capacity).rev().collect();

        Self {
            entries,
            free,
            len: 0,
        }
    }

    /// Inserts a value and returns its key.
    ///
    /// The most recently freed slot is reused first; the slab grows by one
    /// slot when none is free.
    pub(crate) fn insert(&mut self, item: T) -> usize {
        let key = match self.free.pop() {
            Some(key) => key,
            None => {
                self.entries.push(None);
                self.entries.len() - 1
            }
        };

        self.entries[key] = Some(item);
        self.len += 1;

        key
    }

    /// Key the next call to [`insert`](Self::insert) will return.
    pub(crate) fn next_key(&self) -> usize {
        self.free.last().copied().unwrap_or(self.entries.len())
    }

    /// Removes and returns the value stored under `key`.
    ///
    /// Returns `None` if `key` is out of range or its slot is free.
    pub(crate) fn remove(&mut self, key: usize) -> Option<T> {
        let item = self.entries.get_mut(key)?.take()?;

        self.free.push(key);
        self.len -= 1;

        Some(item)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub(crate) fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        self.entries.get_mut(key)?.as_mut()
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.len
    }
}
