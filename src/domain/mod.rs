//! Catalog domain: category hierarchy, selection cascade and product filtering
pub mod aggregates;
pub mod events;
pub mod filter;
pub mod value_objects;

pub use aggregates::{Category, CategoryHierarchy, Product, Selection};
pub use filter::{matches, CategoryFilter, NameSelection, ProductQuery, Resolved};
pub use value_objects::{CategoryId, Level};
