use serde::{Deserialize, Serialize};

use crate::api::web::dto::{ProductCreateReqDto, ProductDto};

// catalog entry, read-only from the cart / checkout point of view. The
// struct doubles as the persisted document shape, `id_` maps to the
// document key of the collection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProductModel {
    #[serde(rename = "_id")]
    pub id_: String,
    pub name: String,
    pub price: u32,
    pub image: String,
    pub rating: u8,
}

impl From<(String, ProductCreateReqDto)> for ProductModel {
    fn from(value: (String, ProductCreateReqDto)) -> Self {
        let (id_, d) = value;
        Self {
            id_,
            name: d.name,
            price: d.price,
            image: d.image,
            rating: d.rating,
        }
    }
}

impl Into<ProductDto> for ProductModel {
    fn into(self) -> ProductDto {
        ProductDto {
            id: self.id_,
            name: self.name,
            price: self.price,
            image: self.image,
            rating: self.rating,
        }
    }
}

impl ProductModel {
    pub fn name_matches(&self, keyword: &str) -> bool {
        let name = self.name.to_lowercase();
        name.contains(keyword.to_lowercase().as_str())
    }
}
