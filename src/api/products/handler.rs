//! Products API Handlers
//!
//! The public listing enriches every product with its resolved discount so
//! the storefront can render sale badges without a second request. Prices
//! shown here are display hints only; checkout always recomputes.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use chrono::Utc;
use serde::Serialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Discount, Product, ProductCreate, ProductFilter, ProductUpdate};
use crate::db::repository::{DiscountRepository, ProductRepository};
use crate::pricing::calculator::discounted_unit_price;
use crate::pricing::resolver::{MatchPolicy, resolve};
use crate::utils::{AppError, AppResponse, AppResult};

/// A catalog product with its resolved discount folded in
#[derive(Debug, Serialize)]
pub struct EnrichedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub discount_percent: u32,
    pub is_discount_active: bool,
    /// Unit price after the active discount, equal to `price` when none
    pub final_price: i64,
}

fn enrich(product: Product, discounts: &[Discount], now: chrono::DateTime<Utc>) -> EnrichedProduct {
    let resolved = resolve(&product.title, discounts, now, MatchPolicy::Exact);
    let final_price = discounted_unit_price(product.price, resolved.percent);
    EnrichedProduct {
        product,
        discount_percent: resolved.percent,
        is_discount_active: resolved.is_active,
        final_price,
    }
}

/// GET /api/products - filtered catalog, newest first
pub async fn list_products(
    State(state): State<ServerState>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<Vec<EnrichedProduct>>> {
    let products = ProductRepository::new(state.get_db())
        .find_filtered(&filter)
        .await?;
    let discounts = DiscountRepository::new(state.get_db()).find_all().await?;

    let now = Utc::now();
    let enriched = products
        .into_iter()
        .map(|p| enrich(p, &discounts, now))
        .collect();
    Ok(Json(enriched))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<EnrichedProduct>> {
    let product = ProductRepository::new(state.get_db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;
    let discounts = DiscountRepository::new(state.get_db()).find_all().await?;
    Ok(Json(enrich(product, &discounts, Utc::now())))
}

/// GET /api/products/titles - distinct titles for the discount form
pub async fn list_titles(State(state): State<ServerState>) -> AppResult<Json<Vec<String>>> {
    let titles = ProductRepository::new(state.get_db())
        .distinct_titles()
        .await?;
    Ok(Json(titles))
}

/// POST /api/admin/products - multipart form with fields and image files
pub async fn create_product(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<AppResponse<Product>>> {
    let mut data = ProductCreate::default();
    let mut images: Vec<String> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => data.name = field.text().await?,
            "studio" => data.studio = field.text().await?,
            "title" => data.title = field.text().await?,
            "scale" => data.scale = field.text().await?,
            "description" => data.description = field.text().await?,
            "price" => {
                data.price = field
                    .text()
                    .await?
                    .parse()
                    .map_err(|_| AppError::validation("price must be a whole number"))?;
            }
            "stock" => {
                data.stock = field
                    .text()
                    .await?
                    .parse()
                    .map_err(|_| AppError::validation("stock must be a whole number"))?;
            }
            "images" => {
                let bytes = field.bytes().await?;
                let filename = state.storage.save_product_image(&bytes).await?;
                images.push(format!("/uploads/{}", filename));
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown product field");
            }
        }
    }

    data.validate()?;

    let product = ProductRepository::new(state.get_db())
        .create(data, images)
        .await?;
    tracing::info!(product = %product.id_string(), "Product created");
    Ok(Json(AppResponse::success(product)))
}

/// PATCH /api/admin/products/{id} - partial update
pub async fn update_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = ProductRepository::new(state.get_db())
        .update(&id, payload)
        .await?;
    Ok(Json(AppResponse::success(product)))
}

/// DELETE /api/admin/products/{id}
pub async fn delete_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let deleted = ProductRepository::new(state.get_db()).delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Product {} not found", id)));
    }
    tracing::info!(product = %id, "Product deleted");
    Ok(Json(AppResponse::message("Product deleted")))
}
