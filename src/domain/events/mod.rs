//! Domain events
use crate::domain::value_objects::{CategoryId, Level};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    Selected { level: Level, id: CategoryId },
    /// The parent slot was empty, so the id was not stored.
    Refused { level: Level, id: CategoryId },
    Cleared { level: Level },
    Reset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogEvent {
    Installed { token: u64, categories: [usize; 4], excluded: usize, products: usize },
    /// A refresh finished after a newer one had already been installed.
    Discarded { token: u64, current: u64 },
}
