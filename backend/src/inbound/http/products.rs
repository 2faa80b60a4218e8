//! Catalog handlers scoped to the signed-in tenant.
//!
//! ```text
//! GET    /api/v1/products?page=0&search=mug
//! POST   /api/v1/products {"name":"Mug","sku":"MUG-1","price":9.5}
//! PUT    /api/v1/products/{id}
//! DELETE /api/v1/products/{id}?confirm=true
//! POST   /api/v1/products/import   (text/csv)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CATALOG_PAGE_SIZE, Confirmed, ListNavigation, Product, ProductDraft, ProductId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::authenticate;
use crate::inbound::http::listing::{ConfirmParams, ListParams, PageMetaResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_product_validation_error;

const CATALOG_LIST_KEY: &str = "products";

/// Product fields accepted on create and update.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sku: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
}

impl TryFrom<&ProductRequest> for ProductDraft {
    type Error = crate::domain::Error;

    fn try_from(value: &ProductRequest) -> Result<Self, Self::Error> {
        ProductDraft::try_new(
            &value.name,
            &value.description,
            &value.sku,
            value.price,
            &value.category,
        )
        .map_err(map_product_validation_error)
    }
}

/// Stored product.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub sku: String,
    pub price: f64,
    pub category: String,
    pub created_at: String,
}

impl From<Product> for ProductResponse {
    fn from(value: Product) -> Self {
        Self {
            id: value.id.get(),
            name: value.draft.name().to_owned(),
            description: value.draft.description().to_owned(),
            sku: value.draft.sku().to_owned(),
            price: value.draft.price(),
            category: value.draft.category().to_owned(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// One page of products.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPageResponse {
    pub products: Vec<ProductResponse>,
    pub meta: PageMetaResponse,
}

/// Result of a CSV import.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub imported: usize,
}

/// List the caller's products, newest first, twenty per page.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ListParams),
    responses(
        (status = 200, description = "Product page", body = ProductPageResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Product store unavailable", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "listProducts"
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<ListParams>,
) -> ApiResult<web::Json<ProductPageResponse>> {
    let identity = authenticate(&session, &state).await?;
    let mut list = session.list_state(CATALOG_LIST_KEY, CATALOG_PAGE_SIZE)?;
    ListNavigation::from(params.into_inner()).apply(&mut list);
    let page = state.catalog.list(&identity.id, &mut list).await?;
    session.store_list_state(CATALOG_LIST_KEY, &list)?;
    let meta = page.meta().into();
    Ok(web::Json(ProductPageResponse {
        products: page.into_rows().into_iter().map(Into::into).collect(),
        meta,
    }))
}

/// Add a product.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Created product", body = ProductResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "createProduct"
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProductRequest>,
) -> ApiResult<HttpResponse> {
    let identity = authenticate(&session, &state).await?;
    let draft = ProductDraft::try_from(&*payload)?;
    let product = state.catalog.create(&identity.id, &draft).await?;
    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// Replace a product's fields.
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "updateProduct"
)]
#[put("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<ProductRequest>,
) -> ApiResult<web::Json<ProductResponse>> {
    let identity = authenticate(&session, &state).await?;
    let draft = ProductDraft::try_from(&*payload)?;
    let product = state
        .catalog
        .update(&identity.id, ProductId::new(path.into_inner()), &draft)
        .await?;
    Ok(web::Json(product.into()))
}

/// Delete a product. Requires `confirm=true`.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id"), ConfirmParams),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Confirmation missing", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "deleteProduct"
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    params: web::Query<ConfirmParams>,
) -> ApiResult<HttpResponse> {
    let identity = authenticate(&session, &state).await?;
    let confirmed = Confirmed::check(params.confirm)?;
    state
        .catalog
        .delete(&identity.id, ProductId::new(path.into_inner()), confirmed)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Import products from CSV text: `Name, Description, SKU, Price, Category`.
#[utoipa::path(
    post,
    path = "/api/v1/products/import",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Rows imported", body = ImportResponse),
        (status = 400, description = "No product rows", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "importProducts"
)]
#[post("/products/import")]
pub async fn import_products(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: String,
) -> ApiResult<web::Json<ImportResponse>> {
    let identity = authenticate(&session, &state).await?;
    let imported = state.catalog.import_csv(&identity.id, &body).await?;
    Ok(web::Json(ImportResponse { imported }))
}
