//! Product schema
//!
//! Covers the writable product fields plus the read-only ones worth reading
//! back. Empty strings, empty lists and `None` are left out when serializing,
//! so a partially filled product only sends what it sets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::WooItem;
use super::attribute::Attribute;
use super::category::Category;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date_created_gmt: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date_modified_gmt: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub src: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slug: String,
}

/// Length, width and height as the store formats them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub length: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub width: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub height: String,
}

impl Dimensions {
    fn is_empty(&self) -> bool {
        self.length.is_empty() && self.width.is_empty() && self.height.is_empty()
    }
}

/// Per-currency price override from the multilingual/multicurrency plugin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomPrice {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub regular_price: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sale_price: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Assigned by the backend; must be absent on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sku: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(default, skip_serializing)]
    pub permalink: String,
    #[serde(default, skip_serializing)]
    pub date_created_gmt: String,
    #[serde(default, skip_serializing)]
    pub date_modified_gmt: String,
    /// simple, grouped, external or variable
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default)]
    pub featured: bool,
    /// visible, catalog, search or hidden
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub catalog_visibility: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub short_description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub regular_price: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sale_price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_on_sale_from_gmt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_on_sale_to_gmt: Option<String>,
    #[serde(default, skip_serializing)]
    pub on_sale: bool,
    #[serde(default, skip_serializing)]
    pub total_sales: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub external_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub button_text: String,
    /// taxable, shipping or none
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tax_status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tax_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    /// instock, outofstock or onbackorder
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stock_status: String,
    #[serde(default)]
    pub sold_individually: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub weight: String,
    #[serde(default, skip_serializing_if = "Dimensions::is_empty")]
    pub dimensions: Dimensions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_allowed: Option<bool>,
    #[serde(default, skip_serializing)]
    pub average_rating: String,
    #[serde(default, skip_serializing)]
    pub rating_count: u64,
    #[serde(default, skip_serializing)]
    pub related_ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upsell_ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cross_sell_ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_attributes: Vec<Value>,
    #[serde(default, skip_serializing)]
    pub variations: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grouped_products: Vec<u64>,
    #[serde(default)]
    pub menu_order: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta_data: Vec<Value>,
    /// Language code used by multilingual plugins; omitted otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// e.g. `{"EUR": {"regular_price": "100", "sale_price": "99"}}`
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom_prices: HashMap<String, CustomPrice>,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attach an image by URL; `alt` is shown when the image cannot load
    pub fn add_image(&mut self, src: impl Into<String>, name: impl Into<String>, alt: impl Into<String>) {
        self.images.push(Image {
            src: src.into(),
            name: name.into(),
            alt: alt.into(),
            ..Default::default()
        });
    }
}

impl WooItem for Product {
    fn id(&self) -> Option<u64> {
        self.id.filter(|id| *id != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_image() {
        let mut product = Product::new("Mug");
        product.add_image("https://cdn.example.com/mug.png", "mug", "A white mug");

        assert_eq!(product.images.len(), 1);
        assert_eq!(product.images[0].src, "https://cdn.example.com/mug.png");
        assert_eq!(product.images[0].alt, "A white mug");
        assert_eq!(product.images[0].id, None);
    }

    #[test]
    fn test_serialization_skips_empty_and_read_only_fields() {
        let mut product = Product::new("Mug");
        product.regular_price = "9.99".into();
        product.permalink = "https://example.com/mug".into();
        product.total_sales = 40;

        let json = serde_json::to_value(&product).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj["name"], "Mug");
        assert_eq!(obj["regular_price"], "9.99");
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("permalink"));
        assert!(!obj.contains_key("total_sales"));
        assert!(!obj.contains_key("dimensions"));
        assert!(!obj.contains_key("custom_prices"));
    }

    #[test]
    fn test_decodes_backend_product() {
        let raw = r#"{
            "id": 794,
            "name": "Premium Quality",
            "type": "simple",
            "status": "publish",
            "regular_price": "21.99",
            "stock_quantity": null,
            "dimensions": {"length": "", "width": "", "height": ""},
            "categories": [{"id": 9, "name": "Clothing", "slug": "clothing"}],
            "images": [{"id": 792, "src": "https://example.com/T_2_front.jpg", "name": "", "alt": ""}],
            "related_ids": [53, 40],
            "meta_data": [],
            "_links": {"self": [{"href": "https://example.com/wp-json/wc/v3/products/794"}]}
        }"#;

        let product: Product = serde_json::from_str(raw).unwrap();

        assert_eq!(product.id(), Some(794));
        assert_eq!(product.kind, "simple");
        assert_eq!(product.categories[0].id(), Some(9));
        assert_eq!(product.related_ids, vec![53, 40]);
        assert_eq!(product.stock_quantity, None);
    }

    #[test]
    fn test_zero_id_counts_as_absent() {
        let product = Product {
            id: Some(0),
            ..Product::new("Ghost")
        };
        assert_eq!(product.id(), None);
    }
}
