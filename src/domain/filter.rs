//! Product filtering by category and free text
//!
//! The product list filters each level on its own: a pick at level three constrains
//! `thirdSubCatId` whether or not level two is picked. That is why the filter has its
//! own slots instead of reusing the form's cascading [`Selection`].

use serde::Deserialize;
use crate::domain::aggregates::{CategoryHierarchy, Product, Selection};
use crate::domain::value_objects::{CategoryId, Level};

/// One optional category id per level, with no cascade between the slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryFilter([Option<CategoryId>; 4]);

impl CategoryFilter {
    pub fn new() -> Self { Self::default() }

    /// Blank ids count as absent.
    pub fn from_ids(ids: [Option<CategoryId>; 4]) -> Self { Self(ids.map(|id| id.filter(|id| !id.is_blank()))) }

    pub fn with(mut self, level: Level, id: impl Into<CategoryId>) -> Self {
        let id: CategoryId = id.into();
        self.0[level.index()] = (!id.is_blank()).then_some(id);
        self
    }

    pub fn get(&self, level: Level) -> Option<&CategoryId> { self.0[level.index()].as_ref() }
    pub fn is_empty(&self) -> bool { self.0.iter().all(Option::is_none) }
    /// Filled slots, shallowest first. Gaps are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (Level, &CategoryId)> + '_ {
        Level::ALL.into_iter().filter_map(move |l| self.get(l).map(|id| (l, id)))
    }
}

impl From<&Selection> for CategoryFilter {
    fn from(selection: &Selection) -> Self { Self(selection.slots().clone()) }
}

/// A product passes when every filled slot resolves in its own level set and equals
/// the product's foreign key for that level. Empty slots constrain nothing.
///
/// An id that does not resolve (stale after a refresh, or never valid) matches no
/// product, so a stale filter yields an empty list rather than falling back to
/// "unconstrained".
pub fn matches(product: &Product, filter: &CategoryFilter, hierarchy: &CategoryHierarchy) -> bool {
    filter.iter().all(|(level, id)| {
        hierarchy
            .resolve(level, id)
            .is_some_and(|category| product.category_key(level) == Some(&category.id))
    })
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub categories: CategoryFilter,
    search: Option<String>,
}

impl ProductQuery {
    pub fn new(categories: CategoryFilter) -> Self { Self { categories, search: None } }

    /// Case-insensitive substring over name, brand and id. Blank text is no constraint.
    pub fn with_search(mut self, text: impl AsRef<str>) -> Self {
        let text = text.as_ref().trim();
        self.search = (!text.is_empty()).then(|| text.to_lowercase());
        self
    }

    pub fn search(&self) -> Option<&str> { self.search.as_deref() }

    pub fn matches(&self, product: &Product, hierarchy: &CategoryHierarchy) -> bool {
        self.search.as_deref().map_or(true, |needle| product.mentions(needle))
            && matches(product, &self.categories, hierarchy)
    }

    /// Matching products in their original order.
    pub fn apply<'a>(&self, products: &'a [Product], hierarchy: &CategoryHierarchy) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p, hierarchy)).collect()
    }
}

/// Category picks made by display name, as the product list's filter panel sends them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameSelection {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub third_category: Option<String>,
    pub fourth_category: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolved {
    Filter(CategoryFilter),
    /// A picked name has no category under the picked ancestors; nothing can match.
    NoMatch { level: Level, name: String },
}

impl NameSelection {
    pub fn is_empty(&self) -> bool { self.names().iter().all(Option::is_none) }

    fn names(&self) -> [Option<&str>; 4] {
        [&self.category, &self.sub_category, &self.third_category, &self.fourth_category]
            .map(|n| n.as_deref().map(str::trim).filter(|n| !n.is_empty()))
    }

    /// Turns names into ids level by level. Each lookup is scoped to the descendants of
    /// the deepest category already resolved above it, which need not be the direct
    /// parent when a level in between was left empty.
    pub fn resolve(&self, hierarchy: &CategoryHierarchy) -> Resolved {
        let mut filter = CategoryFilter::new();
        let mut ancestor: Option<(Level, CategoryId)> = None;
        for (level, name) in Level::ALL.into_iter().zip(self.names()) {
            let Some(name) = name else { continue };
            let scope = ancestor.as_ref().map(|(at, id)| (*at, id));
            let Some(category) = hierarchy.resolve_name(level, scope, name) else {
                return Resolved::NoMatch { level, name: name.to_string() };
            };
            filter = filter.with(level, category.id.clone());
            ancestor = Some((level, category.id.clone()));
        }
        Resolved::Filter(filter)
    }
}
