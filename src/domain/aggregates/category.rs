//! Category record as delivered by the commerce API

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::domain::value_objects::{optional_id, CategoryId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(alias = "_id")]
    #[validate(custom = "validate_id")]
    pub id: CategoryId,
    #[validate(custom = "validate_name")]
    pub name: String,
    #[serde(default, deserialize_with = "optional_id", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    /// Only present in the tree-shaped payload; `flatten` strips it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Category>>,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, parent_id: Option<CategoryId>) -> Self {
        Self { id: id.into(), name: name.into(), parent_id, children: None }
    }

    pub fn with_children(mut self, children: Vec<Category>) -> Self { self.children = Some(children); self }
    pub fn is_root(&self) -> bool { self.parent_id.is_none() }
}

fn validate_id(id: &CategoryId) -> Result<(), ValidationError> {
    if id.is_blank() { return Err(ValidationError::new("blank_id")); }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() { return Err(ValidationError::new("blank_name")); }
    Ok(())
}

/// Pre-order walk of a possibly nested payload. Every emitted record has `children: None`.
pub fn flatten(payload: Vec<Category>) -> Vec<Category> {
    fn walk(nodes: Vec<Category>, out: &mut Vec<Category>) {
        for mut node in nodes {
            let children = node.children.take();
            out.push(node);
            if let Some(children) = children { walk(children, out); }
        }
    }
    let mut flat = Vec::with_capacity(payload.len());
    walk(payload, &mut flat);
    flat
}

/// Drops records without a usable id or name, together with anything nested under them.
pub fn sanitize(payload: Vec<Category>) -> Vec<Category> {
    payload
        .into_iter()
        .filter_map(|mut node| {
            if let Err(errors) = node.validate() {
                tracing::warn!(id = %node.id, %errors, "dropping malformed category record");
                return None;
            }
            node.children = node.children.take().map(sanitize);
            Some(node)
        })
        .collect()
}
