//! Product row as listed by the commerce API
//!
//! Read-only here: the console only filters these. Fields the filter does not
//! look at are kept verbatim in `extra` so list screens still get the whole row.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::domain::value_objects::{optional_id, CategoryId, Level};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "optional_id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, deserialize_with = "optional_id", skip_serializing_if = "Option::is_none")]
    pub sub_cat_id: Option<CategoryId>,
    #[serde(default, deserialize_with = "optional_id", skip_serializing_if = "Option::is_none")]
    pub third_sub_cat_id: Option<CategoryId>,
    #[serde(default, deserialize_with = "optional_id", skip_serializing_if = "Option::is_none")]
    pub fourth_sub_cat_id: Option<CategoryId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(), name: name.into(), brand: None,
            category_id: None, sub_cat_id: None, third_sub_cat_id: None, fourth_sub_cat_id: None,
            extra: Map::new(),
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self { self.brand = Some(brand.into()); self }

    /// Assigns the foreign keys shallowest first; missing entries leave the key unset.
    pub fn in_categories<I, T>(mut self, ids: I) -> Self
    where I: IntoIterator<Item = T>, T: Into<CategoryId> {
        for (level, id) in Level::ALL.into_iter().zip(ids) {
            *self.category_slot(level) = Some(id.into()).filter(|id: &CategoryId| !id.is_blank());
        }
        self
    }

    /// Foreign key pointing into the given level set.
    pub fn category_key(&self, level: Level) -> Option<&CategoryId> {
        match level {
            Level::One => self.category_id.as_ref(),
            Level::Two => self.sub_cat_id.as_ref(),
            Level::Three => self.third_sub_cat_id.as_ref(),
            Level::Four => self.fourth_sub_cat_id.as_ref(),
        }
    }

    fn category_slot(&mut self, level: Level) -> &mut Option<CategoryId> {
        match level {
            Level::One => &mut self.category_id,
            Level::Two => &mut self.sub_cat_id,
            Level::Three => &mut self.third_sub_cat_id,
            Level::Four => &mut self.fourth_sub_cat_id,
        }
    }

    /// `needle` must already be lowercased.
    pub fn mentions(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.brand.as_deref().is_some_and(|b| b.to_lowercase().contains(needle))
            || self.id.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_row_keeps_unknown_fields() {
        let body = r#"{"_id": "p1", "name": "Oxford", "brand": "Acme", "categoryId": 1, "subCatId": "", "price": 1999, "countInStock": 3}"#;
        let p: Product = serde_json::from_str(body).unwrap();
        assert_eq!(p.category_key(Level::One), Some(&CategoryId::from("1")));
        assert_eq!(p.category_key(Level::Two), None);
        assert_eq!(p.extra["price"], 1999);
        let back = serde_json::to_value(&p).unwrap();
        assert_eq!(back["countInStock"], 3);
        assert_eq!(back["id"], "p1");
    }
    #[test]
    fn test_mentions() {
        let p = Product::new("SKU-42", "Linen Shirt").with_brand("NorthWay");
        assert!(p.mentions("linen"));
        assert!(p.mentions("northway"));
        assert!(p.mentions("sku-4"));
        assert!(!p.mentions("wool"));
    }
    #[test]
    fn test_in_categories() {
        let p = Product::new("p", "P").in_categories(["1", "2", ""]);
        assert_eq!(p.category_key(Level::Two), Some(&CategoryId::from("2")));
        assert_eq!(p.category_key(Level::Three), None);
    }
}
