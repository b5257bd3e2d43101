//! State slot storage.
//!
//! One store per mounted root. Slot `i` belongs to the `i`-th hook call of
//! every render pass; it is created lazily on first read and lives as long
//! as the root. Values are type-erased, and reading a slot as a different
//! type than it was created with is an error rather than a silent coercion.

use std::any::{type_name, Any};

use parking_lot::RwLock;

use crate::error::{Error, Result};

type Cell = Box<dyn Any + Send + Sync>;

/// Ordered, type-erased state cells.
#[derive(Default)]
pub struct SlotStore {
    cells: RwLock<Vec<Option<Cell>>>,
}

impl SlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots that hold a value.
    pub fn len(&self) -> usize {
        self.cells.read().iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read slot `index`. `Ok(None)` if it has not been created yet.
    pub fn read<T>(&self, index: usize) -> Result<Option<T>>
    where
        T: Clone + 'static,
    {
        let cells = self.cells.read();
        match cells.get(index).and_then(Option::as_ref) {
            None => Ok(None),
            Some(cell) => cell
                .downcast_ref::<T>()
                .cloned()
                .map(Some)
                .ok_or_else(|| mismatch::<T>(index)),
        }
    }

    /// Write slot `index`, creating it if needed.
    ///
    /// An existing slot only accepts values of the type it was created with.
    pub fn write<T>(&self, index: usize, value: T) -> Result<()>
    where
        T: Send + Sync + 'static,
    {
        let mut cells = self.cells.write();
        if cells.len() <= index {
            cells.resize_with(index + 1, || None);
        }
        let cell = &mut cells[index];
        if let Some(existing) = cell {
            if !existing.is::<T>() {
                return Err(mismatch::<T>(index));
            }
        }
        *cell = Some(Box::new(value));
        Ok(())
    }
}

fn mismatch<T>(index: usize) -> Error {
    Error::SlotTypeMismatch {
        slot: index,
        expected: type_name::<T>(),
    }
}

impl std::fmt::Debug for SlotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotStore").field("len", &self.len()).finish()
    }
}
