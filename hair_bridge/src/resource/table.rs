/// Slot-recycling resource table.
///
/// A table maps a small integer handle to a slot. Slots are never removed:
/// the table only grows, so a handle keeps naming the same slot for the whole
/// lifetime of the table. A slot that is no longer live can be recycled for a
/// new resource, which then reuses its index.
///
/// # Example
///
/// ```ignore
/// let mut table = ResourceTable::<ShaderResource>::new();
/// let a = table.acquire_slot();  // 0
/// let b = table.acquire_slot();  // 1 (slot 0 is still not live)
/// ```

/// Resource stored in a table slot
pub trait Slot: Default {
    /// Whether the slot currently holds a resource
    fn is_live(&self) -> bool;
}

pub struct ResourceTable<T: Slot> {
    slots: Vec<T>,
}

impl<T: Slot> ResourceTable<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Return the index of the first non-live slot, or append a new one
    ///
    /// The returned slot is reset to its default (non-live) state. It only
    /// becomes live once the caller fills it.
    pub fn acquire_slot(&mut self) -> usize {
        let index = match self.slots.iter().position(|slot| !slot.is_live()) {
            Some(index) => index,
            None => {
                self.slots.push(T::default());
                self.slots.len() - 1
            }
        };
        self.slots[index] = T::default();
        index
    }

    /// First live slot matching `predicate`
    pub fn find<P: Fn(&T) -> bool>(&self, predicate: P) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_live() && predicate(slot))
    }

    /// Slot at `index` (live or not), None when out of range
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    /// Live slot at `index`
    pub fn live(&self, index: usize) -> Option<&T> {
        self.slots.get(index).filter(|slot| slot.is_live())
    }

    pub fn live_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).filter(|slot| slot.is_live())
    }

    /// Number of slots ever created (live or not)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of live slots
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_live()).count()
    }

    /// Indices of every live slot
    pub fn live_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_live())
            .map(|(index, _)| index)
            .collect()
    }
}

impl<T: Slot> Default for ResourceTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
