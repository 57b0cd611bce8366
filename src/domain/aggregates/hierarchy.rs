//! Category Hierarchy
//!
//! Partitions a flat (or flattened) category payload into the four level sets the
//! admin screens cascade through. Level membership always comes from `parentId`;
//! nesting in the payload is only a delivery format.

use std::collections::HashMap;
use serde::Serialize;
use crate::domain::aggregates::category::{flatten, Category};
use crate::domain::aggregates::selection::Selection;
use crate::domain::value_objects::{CategoryId, Level};

#[derive(Clone, Debug, Default)]
pub struct CategoryHierarchy {
    levels: [Vec<Category>; 4],
    index: [HashMap<CategoryId, usize>; 4],
    excluded: usize,
}

/// Borrowed view of the four level sets, shaped for the console's JSON.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSets<'a> {
    pub roots: &'a [Category],
    pub level2: &'a [Category],
    pub level3: &'a [Category],
    pub level4: &'a [Category],
}

impl CategoryHierarchy {
    pub fn from_payload(payload: Vec<Category>) -> Self {
        let mut hierarchy = Self::default();
        let mut pending = flatten(payload);
        for level in Level::ALL {
            let (members, rest): (Vec<Category>, Vec<Category>) = pending.into_iter().partition(|c| match level.parent() {
                None => c.is_root(),
                Some(parent_level) => c.parent_id.as_ref().is_some_and(|p| hierarchy.index[parent_level.index()].contains_key(p)),
            });
            let index = &mut hierarchy.index[level.index()];
            for (pos, category) in members.iter().enumerate() {
                index.entry(category.id.clone()).or_insert(pos);
            }
            hierarchy.levels[level.index()] = members;
            pending = rest;
        }
        hierarchy.excluded = pending.len();
        if !pending.is_empty() {
            tracing::debug!(excluded = pending.len(), "categories unreachable from a root were left out of every level");
        }
        hierarchy
    }

    pub fn level(&self, level: Level) -> &[Category] { &self.levels[level.index()] }
    pub fn roots(&self) -> &[Category] { self.level(Level::One) }
    pub fn counts(&self) -> [usize; 4] { Level::ALL.map(|l| self.levels[l.index()].len()) }
    pub fn len(&self) -> usize { self.levels.iter().map(Vec::len).sum() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
    /// Records dropped because their parent chain never reached a root within four levels.
    pub fn excluded(&self) -> usize { self.excluded }

    pub fn level_sets(&self) -> LevelSets<'_> {
        LevelSets { roots: self.level(Level::One), level2: self.level(Level::Two), level3: self.level(Level::Three), level4: self.level(Level::Four) }
    }

    pub fn resolve(&self, level: Level, id: &CategoryId) -> Option<&Category> {
        self.index[level.index()].get(id).map(|&pos| &self.levels[level.index()][pos])
    }

    pub fn contains(&self, level: Level, id: &CategoryId) -> bool { self.index[level.index()].contains_key(id) }

    /// Direct children of `parent` inside the given level set.
    pub fn children_at(&self, level: Level, parent: Option<&CategoryId>) -> Vec<&Category> {
        children_of(self.level(level), parent)
    }

    /// The category at level `at` that `id` (a member of `level`) descends from, or the
    /// category itself when `at == level`. None if `at` is deeper than `level`.
    pub fn ancestor_at(&self, level: Level, id: &CategoryId, at: Level) -> Option<&Category> {
        let mut current = self.resolve(level, id)?;
        let mut depth = level;
        while depth > at {
            let parent_level = depth.parent()?;
            current = self.resolve(parent_level, current.parent_id.as_ref()?)?;
            depth = parent_level;
        }
        (depth == at).then_some(current)
    }

    /// Name lookup inside one level set. Display names repeat across branches, so a
    /// picked ancestor `(level, id)` narrows the candidates to its descendants; with no
    /// ancestor the whole level is searched. The first match in level order wins.
    pub fn resolve_name(&self, level: Level, ancestor: Option<(Level, &CategoryId)>, name: &str) -> Option<&Category> {
        let name = name.trim();
        if name.is_empty() { return None; }
        self.level(level).iter().find(|c| {
            c.name.trim() == name
                && ancestor.map_or(true, |(at, id)| at < level && self.ancestor_at(level, &c.id, at).is_some_and(|a| &a.id == id))
        })
    }

    /// Option lists for a cascading form: roots, then the children of each selected slot.
    pub fn options(&self, selection: &Selection) -> [Vec<&Category>; 4] {
        Level::ALL.map(|level| match level.parent() {
            None => self.roots().iter().collect::<Vec<_>>(),
            Some(parent) => self.children_at(level, selection.get(parent)),
        })
    }

    /// Root-first chain of categories ending at `id`; empty if `id` is not in any level.
    pub fn path(&self, id: &CategoryId) -> Vec<&Category> {
        let Some(mut level) = Level::ALL.into_iter().find(|&l| self.contains(l, id)) else { return vec![] };
        let mut chain = Vec::with_capacity(level.depth() as usize);
        let mut current = self.resolve(level, id);
        while let Some(category) = current {
            chain.push(category);
            current = match (level.parent(), &category.parent_id) {
                (Some(parent_level), Some(parent_id)) => { level = parent_level; self.resolve(parent_level, parent_id) }
                _ => None,
            };
        }
        chain.reverse();
        chain
    }
}

/// Stable filter of `level_set` down to the records whose parent is `parent`.
pub fn children_of<'a>(level_set: &'a [Category], parent: Option<&CategoryId>) -> Vec<&'a Category> {
    match parent {
        Some(parent) if !parent.is_blank() => level_set.iter().filter(|c| c.parent_id.as_ref() == Some(parent)).collect(),
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cat(id: &str, name: &str, parent: Option<&str>) -> Category { Category::new(id, name, parent.map(CategoryId::from)) }
    fn ids(records: &[Category]) -> Vec<&str> { records.iter().map(|c| c.id.as_str()).collect() }
    fn ref_ids(records: &[&Category]) -> Vec<String> { records.iter().map(|c| c.id.to_string()).collect() }

    fn catalog() -> CategoryHierarchy {
        CategoryHierarchy::from_payload(vec![
            cat("1", "Clothing", None),
            cat("2", "Men", Some("1")),
            cat("3", "Shirts", Some("2")),
            cat("4", "Formal", Some("3")),
            cat("5", "Electronics", None),
            cat("6", "Women", Some("1")),
            cat("7", "Shirts", Some("6")),
            cat("8", "Men", Some("5")),
            cat("9", "Accessories", Some("1")),
        ])
    }

    #[test]
    fn test_three_level_chain() {
        let h = CategoryHierarchy::from_payload(vec![cat("1", "Clothing", None), cat("2", "Men", Some("1")), cat("3", "Shirts", Some("2"))]);
        assert_eq!(ids(h.roots()), vec!["1"]);
        assert_eq!(ids(h.level(Level::Two)), vec!["2"]);
        assert_eq!(ids(h.level(Level::Three)), vec!["3"]);
        assert!(h.level(Level::Four).is_empty());
    }
    #[test]
    fn test_ghost_parent_is_excluded() {
        let h = CategoryHierarchy::from_payload(vec![cat("1", "Clothing", None), cat("2", "Lost", Some("ghost")), cat("3", "Below lost", Some("2"))]);
        assert_eq!(h.counts(), [1, 0, 0, 0]);
        assert_eq!(h.excluded(), 2);
    }
    #[test]
    fn test_cycles_and_fifth_level_are_excluded() {
        let h = CategoryHierarchy::from_payload(vec![
            cat("a", "A", Some("b")), cat("b", "B", Some("a")), cat("self", "Self", Some("self")),
            cat("1", "L1", None), cat("2", "L2", Some("1")), cat("3", "L3", Some("2")), cat("4", "L4", Some("3")), cat("5", "L5", Some("4")),
        ]);
        assert_eq!(h.counts(), [1, 1, 1, 1]);
        assert_eq!(h.excluded(), 4);
        let reachable: Vec<&str> = Level::ALL.iter().flat_map(|&l| ids(h.level(l))).collect();
        assert_eq!(reachable, vec!["1", "2", "3", "4"]);
    }
    #[test]
    fn test_parent_id_wins_over_nesting() {
        let payload = vec![
            cat("1", "Clothing", None).with_children(vec![cat("x", "Misfiled", Some("5"))]),
            cat("5", "Electronics", None),
        ];
        let h = CategoryHierarchy::from_payload(payload);
        assert_eq!(h.path(&"x".into()).iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["Electronics", "Misfiled"]);
    }
    #[test]
    fn test_children_of_keeps_order() {
        let h = catalog();
        assert_eq!(ref_ids(&children_of(h.level(Level::Two), Some(&"1".into()))), vec!["2", "6", "9"]);
        assert!(children_of(h.level(Level::Two), Some(&"".into())).is_empty());
        assert!(children_of(h.level(Level::Two), None).is_empty());
        assert!(h.children_at(Level::Two, Some(&"nope".into())).is_empty());
    }
    #[test]
    fn test_resolve_name_is_scoped_to_ancestor() {
        let h = catalog();
        let one = CategoryId::from("1");
        assert_eq!(h.resolve_name(Level::Two, Some((Level::One, &"5".into())), "Men").map(|c| c.id.as_str()), Some("8"));
        assert_eq!(h.resolve_name(Level::Two, Some((Level::One, &one)), "Men").map(|c| c.id.as_str()), Some("2"));
        assert_eq!(h.resolve_name(Level::Three, Some((Level::Two, &"6".into())), " Shirts ").map(|c| c.id.as_str()), Some("7"));
        assert_eq!(h.resolve_name(Level::Four, Some((Level::One, &one)), "Formal").map(|c| c.id.as_str()), Some("4"));
        assert!(h.resolve_name(Level::Four, Some((Level::One, &"5".into())), "Formal").is_none());
        assert_eq!(h.resolve_name(Level::Two, None, "Men").map(|c| c.id.as_str()), Some("2"));
        assert!(h.resolve_name(Level::Two, Some((Level::Two, &"2".into())), "Men").is_none());
        assert_eq!(h.resolve_name(Level::One, None, "Electronics").map(|c| c.id.as_str()), Some("5"));
    }
    #[test]
    fn test_ancestor_at() {
        let h = catalog();
        let four = CategoryId::from("4");
        assert_eq!(h.ancestor_at(Level::Four, &four, Level::One).map(|c| c.id.as_str()), Some("1"));
        assert_eq!(h.ancestor_at(Level::Four, &four, Level::Four).map(|c| c.id.as_str()), Some("4"));
        assert!(h.ancestor_at(Level::Two, &"2".into(), Level::Three).is_none());
        assert!(h.ancestor_at(Level::Three, &four, Level::One).is_none());
    }
    #[test]
    fn test_options_follow_selection() {
        let h = catalog();
        let mut selection = Selection::default();
        selection.select_level1("1".into());
        selection.select_level2("2".into());
        let [l1, l2, l3, l4] = h.options(&selection);
        assert_eq!(ref_ids(&l1), vec!["1", "5"]);
        assert_eq!(ref_ids(&l2), vec!["2", "6", "9"]);
        assert_eq!(ref_ids(&l3), vec!["3"]);
        assert!(l4.is_empty());
    }
    #[test]
    fn test_path() {
        let h = catalog();
        let names: Vec<&str> = h.path(&"4".into()).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Clothing", "Men", "Shirts", "Formal"]);
        assert!(h.path(&"ghost".into()).is_empty());
    }

    /// Depth reached by walking parent links, or None for ghosts, cycles and anything past level four.
    fn walk_depth(parents: &[Option<usize>], mut node: usize) -> Option<u8> {
        let mut depth = 1;
        loop {
            match parents[node] {
                None => return Some(depth),
                Some(p) if p < parents.len() && depth < 4 => { node = p; depth += 1; }
                _ => return None,
            }
        }
    }

    proptest! {
        #[test]
        fn levels_hold_exactly_the_reachable_records(parents in proptest::collection::vec(proptest::option::of(0usize..48), 1..40)) {
            let payload = parents.iter().enumerate()
                .map(|(i, p)| cat(&i.to_string(), "n", p.map(|p| p.to_string()).as_deref()))
                .collect();
            let h = CategoryHierarchy::from_payload(payload);
            for (i, _) in parents.iter().enumerate() {
                let id = CategoryId::from(i.to_string());
                let found = Level::ALL.into_iter().find(|&l| h.contains(l, &id)).map(Level::depth);
                prop_assert_eq!(found, walk_depth(&parents, i), "node {}", i);
            }
            prop_assert_eq!(h.len() + h.excluded(), parents.len());
        }
    }
}
