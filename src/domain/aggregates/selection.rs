//! Selection Cascade Aggregate
//!
//! Four slots, one per hierarchy level. Every setter clears all deeper slots, and a
//! slot can only hold an id while its parent slot does, so an empty slot never has a
//! filled slot below it.

use serde::{Deserialize, Serialize};
use crate::domain::events::SelectionEvent;
use crate::domain::value_objects::{CategoryId, Level};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "SelectionTuple", into = "SelectionTuple")]
pub struct Selection {
    slots: [Option<CategoryId>; 4],
    events: Vec<SelectionEvent>,
}

/// Wire shape of the tuple. Decoding replays it through the transitions, so a
/// request can never smuggle in an inconsistent state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionTuple {
    #[serde(default, deserialize_with = "crate::domain::value_objects::optional_id")]
    pub category_id: Option<CategoryId>,
    #[serde(default, deserialize_with = "crate::domain::value_objects::optional_id")]
    pub sub_category_id: Option<CategoryId>,
    #[serde(default, deserialize_with = "crate::domain::value_objects::optional_id")]
    pub third_id: Option<CategoryId>,
    #[serde(default, deserialize_with = "crate::domain::value_objects::optional_id")]
    pub fourth_id: Option<CategoryId>,
}

impl Selection {
    pub fn new() -> Self { Self::default() }

    /// Builds a selection by selecting each level in order.
    pub fn from_ids(ids: [Option<CategoryId>; 4]) -> Self {
        let mut selection = Self::new();
        for (level, id) in Level::ALL.into_iter().zip(ids) {
            if id.is_some() { selection.select(level, id); }
        }
        selection.events.clear();
        selection
    }

    pub fn get(&self, level: Level) -> Option<&CategoryId> { self.slots[level.index()].as_ref() }
    pub fn slots(&self) -> &[Option<CategoryId>; 4] { &self.slots }
    pub fn is_empty(&self) -> bool { self.slots[0].is_none() }
    /// Filled slots, shallowest first.
    pub fn iter(&self) -> impl Iterator<Item = (Level, &CategoryId)> + '_ {
        Level::ALL.into_iter().filter_map(move |l| self.get(l).map(|id| (l, id)))
    }

    /// Sets `level` to `id` (or clears it for `None`) and empties every deeper slot.
    /// Returns false when a value was refused because the parent slot is empty; the
    /// deeper slots are cleared either way.
    pub fn select(&mut self, level: Level, id: Option<CategoryId>) -> bool {
        let id = id.filter(|id| !id.is_blank());
        let parent_empty = level.parent().is_some_and(|p| self.slots[p.index()].is_none());
        let accepted = id.is_none() || !parent_empty;
        let event = match (&id, accepted) {
            (Some(id), true) => SelectionEvent::Selected { level, id: id.clone() },
            (Some(id), false) => SelectionEvent::Refused { level, id: id.clone() },
            (None, _) => SelectionEvent::Cleared { level },
        };
        self.slots[level.index()] = if accepted { id } else { None };
        for deeper in level.deeper() { self.slots[deeper.index()] = None; }
        self.raise_event(event);
        accepted
    }

    pub fn select_level1(&mut self, id: CategoryId) -> bool { self.select(Level::One, Some(id)) }
    pub fn select_level2(&mut self, id: CategoryId) -> bool { self.select(Level::Two, Some(id)) }
    pub fn select_level3(&mut self, id: CategoryId) -> bool { self.select(Level::Three, Some(id)) }
    pub fn select_level4(&mut self, id: CategoryId) -> bool { self.select(Level::Four, Some(id)) }
    pub fn clear_level(&mut self, level: Level) { self.select(level, None); }

    /// Back to all-empty, e.g. when a form is reopened for a fresh entry.
    pub fn reset(&mut self) {
        self.slots = Default::default();
        self.raise_event(SelectionEvent::Reset);
    }

    pub fn is_consistent(&self) -> bool {
        self.slots.windows(2).all(|pair| pair[0].is_some() || pair[1].is_none())
    }

    pub fn take_events(&mut self) -> Vec<SelectionEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: SelectionEvent) { self.events.push(e); }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool { self.slots == other.slots }
}
impl Eq for Selection {}

impl From<SelectionTuple> for Selection {
    fn from(t: SelectionTuple) -> Self { Self::from_ids([t.category_id, t.sub_category_id, t.third_id, t.fourth_id]) }
}

impl From<Selection> for SelectionTuple {
    fn from(s: Selection) -> Self {
        let [category_id, sub_category_id, third_id, fourth_id] = s.slots;
        Self { category_id, sub_category_id, third_id, fourth_id }
    }
}
