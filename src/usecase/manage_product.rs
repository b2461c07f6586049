use std::boxed::Box;

use crate::api::web::dto::{ProductCreateReqDto, ProductCreateRespDto, ProductDto};
use crate::error::AppError;
use crate::model::ProductModel;
use crate::repository::{generate_object_id, AbsProductRepo};

pub struct AddProductUseCase {
    pub repo: Box<dyn AbsProductRepo>,
}

pub struct ListProductsUseCase {
    pub repo: Box<dyn AbsProductRepo>,
}

pub struct SearchProductsUseCase {
    pub repo: Box<dyn AbsProductRepo>,
}

pub enum AddProductUcResult {
    Success(ProductCreateRespDto),
    InvalidName,
    ServerError(AppError),
}

pub enum ListProductsUcResult {
    Success(Vec<ProductDto>),
    ServerError(AppError),
}

pub enum SearchProductsUcResult {
    Success(Vec<ProductDto>),
    EmptyKeyword,
    ServerError(AppError),
}

impl AddProductUseCase {
    pub async fn execute(self, data: ProductCreateReqDto) -> AddProductUcResult {
        if data.name.trim().is_empty() {
            return AddProductUcResult::InvalidName;
        }
        let id_ = generate_object_id();
        let item = ProductModel::from((id_.clone(), data));
        match self.repo.create(item).await {
            Ok(()) => AddProductUcResult::Success(ProductCreateRespDto { product_id: id_ }),
            Err(e) => AddProductUcResult::ServerError(e),
        }
    }
}

impl ListProductsUseCase {
    pub async fn execute(self) -> ListProductsUcResult {
        match self.repo.fetch_all().await {
            Ok(ms) => {
                let out = ms.into_iter().map(ProductModel::into).collect::<Vec<_>>();
                ListProductsUcResult::Success(out)
            }
            Err(e) => ListProductsUcResult::ServerError(e),
        }
    }
}

impl SearchProductsUseCase {
    pub async fn execute(self, keyword: String) -> SearchProductsUcResult {
        let keyword = keyword.trim().to_string();
        if keyword.is_empty() {
            return SearchProductsUcResult::EmptyKeyword;
        }
        match self.repo.search(keyword.as_str()).await {
            // no match is an empty listing, not an error
            Ok(ms) => {
                let out = ms.into_iter().map(ProductModel::into).collect::<Vec<_>>();
                SearchProductsUcResult::Success(out)
            }
            Err(e) => SearchProductsUcResult::ServerError(e),
        }
    }
}
