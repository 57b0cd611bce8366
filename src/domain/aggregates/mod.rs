//! Aggregates module
pub mod category;
pub mod hierarchy;
pub mod selection;
pub mod product;

pub use category::{flatten, sanitize, Category};
pub use hierarchy::{children_of, CategoryHierarchy, LevelSets};
pub use selection::{Selection, SelectionTuple};
pub use product::Product;
