//! Generation-checked handles and the pool that issues them.

use std::marker::PhantomData;

/// Typed handle into a [`Pool`].
///
/// A handle remembers the generation of the slot it was issued for, so a
/// handle to a removed value is rejected even if the slot gets reused.
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

// Manual impls so `Handle<T>` is Copy/Eq regardless of `T`.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("index", &self.index)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot map that owns values and issues generation-checked handles.
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Insert a value and return its handle.
    pub fn insert(&mut self, value: T) -> Handle<T> {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            Handle {
                index,
                generation: slot.generation,
                _marker: PhantomData,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            Handle {
                index,
                generation: 0,
                _marker: PhantomData,
            }
        }
    }

    /// Remove a value, invalidating its handle. Returns `None` if the handle
    /// is stale or was never issued by this pool.
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation || slot.value.is_none() {
            return None;
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        slot.value.take()
    }

    /// Get a reference to the value behind `handle`.
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Get a mutable reference to the value behind `handle`.
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Whether `handle` still refers to a live value.
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the pool holds no live values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut pool = Pool::new();
        let a = pool.insert("alpha");
        let b = pool.insert("beta");
        assert_eq!(pool.get(a), Some(&"alpha"));
        assert_eq!(pool.get(b), Some(&"beta"));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut pool = Pool::new();
        let a = pool.insert(1);
        assert_eq!(pool.remove(a), Some(1));
        assert!(!pool.contains(a));
        assert_eq!(pool.remove(a), None);

        // Slot reuse must not resurrect the old handle.
        let b = pool.insert(2);
        assert!(pool.get(a).is_none());
        assert_eq!(pool.get(b), Some(&2));
    }

    #[test]
    fn test_get_mut() {
        let mut pool = Pool::new();
        let a = pool.insert(10);
        *pool.get_mut(a).unwrap() += 5;
        assert_eq!(pool.get(a), Some(&15));
    }

    #[test]
    fn test_empty() {
        let mut pool: Pool<u32> = Pool::new();
        assert!(pool.is_empty());
        let a = pool.insert(0);
        assert!(!pool.is_empty());
        pool.remove(a);
        assert!(pool.is_empty());
    }
}
