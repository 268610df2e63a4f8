//! Expense group handlers
//!
//! Request bodies are extracted as `Option<Json<_>>`: a missing, `null` or
//! malformed body yields `None` and is answered with 400.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use core_kernel::ExpenseGroupId;
use domain_expense::{
    ExpenseGroup, ExpenseGroupQuery, ExpenseGroupStatus, RepositoryActionResult,
    RepositoryActionStatus, SortOrder,
};

use crate::dto::{ExpenseDto, ExpenseGroupDto};
use crate::error::ApiError;
use crate::pagination::{LinkParams, PageRequest, PaginationHeader, PAGINATION_HEADER};
use crate::patch::{self, PatchError, PatchOperation};
use crate::AppState;

/// Query parameters of the list endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub sort: Option<String>,
    pub status: Option<String>,
    pub user_id: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Lists expense groups, one page at a time
///
/// Pagination metadata is returned in the `X-Pagination` header.
pub async fn list_expense_groups(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let sort = params.sort.as_deref().unwrap_or("id");
    let query = ExpenseGroupQuery::new(SortOrder::parse(sort)?)
        // Unrecognised status names leave the list unfiltered
        .with_status(params.status.as_deref().and_then(ExpenseGroupStatus::from_name))
        .with_user_id(params.user_id.clone());

    let page = page_request(&params, &state)?;

    let groups = state.expense_groups.find_expense_groups(&query).await?;
    let total_count = groups.len();

    let list_url = format!("{}{}", base_url(&state, &headers, &uri), uri.path());
    let link_params = LinkParams {
        sort,
        status: params.status.as_deref(),
        user_id: params.user_id.as_deref(),
    };
    let pagination = PaginationHeader::new(page, total_count, &list_url, &link_params)
        .map_err(|e| ApiError::Internal(format!("page link encoding failed: {}", e)))?;
    let pagination = serde_json::to_string(&pagination)
        .ok()
        .and_then(|json| HeaderValue::from_str(&json).ok())
        .ok_or_else(|| ApiError::Internal("pagination header is not a valid header value".into()))?;

    let body: Vec<ExpenseGroupDto> = page
        .slice(groups)
        .into_iter()
        .map(ExpenseGroupDto::from)
        .collect();

    Ok((
        [(HeaderName::from_static(PAGINATION_HEADER), pagination)],
        Json(body),
    ))
}

/// Gets an expense group by id
pub async fn get_expense_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ExpenseGroupDto>, ApiError> {
    let group = find_existing(&state, id).await?;
    Ok(Json(group.into()))
}

/// Creates an expense group
///
/// Responds 201 with an absolute `Location` header pointing at the new resource.
pub async fn create_expense_group(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Option<Json<ExpenseGroupDto>>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(dto) = body.ok_or_else(missing_body)?;

    let result = state
        .expense_groups
        .insert_expense_group(ExpenseGroup::from(dto))
        .await?;

    let created = expect_entity(result, RepositoryActionStatus::Created)?;
    let location = format!(
        "{}{}/{}",
        base_url(&state, &headers, &uri),
        uri.path().trim_end_matches('/'),
        created.id
    );
    info!(expense_group_id = %created.id, "Expense group created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ExpenseGroupDto::from(created)),
    ))
}

/// Replaces the mutable fields of an expense group
///
/// A body id of 0 (or none) takes the path id; any other mismatch is rejected.
/// An empty `expenses` list leaves the stored expenses alone; a non-empty one
/// must equal them.
pub async fn replace_expense_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Option<Json<ExpenseGroupDto>>,
) -> Result<Json<ExpenseGroupDto>, ApiError> {
    let Json(mut dto) = body.ok_or_else(missing_body)?;

    if dto.id == 0 {
        dto.id = id;
    } else if dto.id != id {
        return Err(ApiError::BadRequest(format!(
            "body id {} does not match path id {}",
            dto.id, id
        )));
    }

    if !dto.expenses.is_empty() {
        let existing = ExpenseGroupDto::from(find_existing(&state, id).await?);
        ensure_expenses_unchanged(&existing.expenses, &dto.expenses)?;
    }

    let result = state
        .expense_groups
        .update_expense_group(ExpenseGroup::from(dto))
        .await?;

    updated_response(result, id)
}

/// Applies a JSON patch document to an expense group
///
/// The patch runs against the DTO representation; nothing is persisted
/// unless every operation succeeds.
pub async fn patch_expense_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Option<Json<Vec<PatchOperation>>>,
) -> Result<Json<ExpenseGroupDto>, ApiError> {
    let Json(operations) = body.ok_or_else(missing_body)?;

    let existing = ExpenseGroupDto::from(find_existing(&state, id).await?);

    let document = serde_json::to_value(&existing).map_err(PatchError::from)?;
    let patched = patch::apply_patch(&document, &operations)?;
    let dto: ExpenseGroupDto = serde_json::from_value(patched).map_err(PatchError::from)?;

    if dto.id != id || dto.user_id != existing.user_id {
        return Err(ApiError::BadRequest("id and userId cannot be patched".into()));
    }
    ensure_expenses_unchanged(&existing.expenses, &dto.expenses)?;

    let result = state
        .expense_groups
        .update_expense_group(ExpenseGroup::from(dto))
        .await?;

    updated_response(result, id)
}

/// Deletes an expense group
pub async fn delete_expense_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = state
        .expense_groups
        .delete_expense_group(ExpenseGroupId::new(id))
        .await?;

    match result.status() {
        RepositoryActionStatus::Deleted => {
            info!(expense_group_id = id, "Expense group deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        RepositoryActionStatus::NotFound => Err(not_found(id)),
        other => Err(rejected(other, result.message())),
    }
}

// ============================================================================
// Helpers
// ============================================================================

async fn find_existing(state: &AppState, id: i32) -> Result<ExpenseGroup, ApiError> {
    state
        .expense_groups
        .get_expense_group(ExpenseGroupId::new(id))
        .await?
        .ok_or_else(|| not_found(id))
}

fn page_request(params: &ListParams, state: &AppState) -> Result<PageRequest, ApiError> {
    let page = params.page.unwrap_or(1);
    let page_size = params
        .page_size
        .unwrap_or(i64::from(state.config.default_page_size));

    if page < 1 || page_size < 1 {
        return Err(ApiError::BadRequest(format!(
            "page ({}) and pageSize ({}) must be at least 1",
            page, page_size
        )));
    }

    let page = u32::try_from(page)
        .map_err(|_| ApiError::BadRequest(format!("page {} is out of range", page)))?;
    let page_size = u32::try_from(page_size)
        .unwrap_or(u32::MAX)
        .min(state.config.max_page_size.max(1));

    PageRequest::new(page, page_size)
        .ok_or_else(|| ApiError::BadRequest("invalid page request".into()))
}

/// Scheme and authority used for absolute page links
fn base_url(state: &AppState, headers: &HeaderMap, uri: &Uri) -> String {
    if let Some(base) = &state.config.public_base_url {
        return base.trim_end_matches('/').to_string();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_else(|| "localhost".to_string());

    format!("http://{}", host)
}

/// Expenses are only written on create
fn ensure_expenses_unchanged(
    stored: &[ExpenseDto],
    submitted: &[ExpenseDto],
) -> Result<(), ApiError> {
    if stored != submitted {
        return Err(ApiError::BadRequest(
            "expenses cannot be changed through an expense group update".into(),
        ));
    }
    Ok(())
}

fn updated_response(
    result: RepositoryActionResult<ExpenseGroup>,
    id: i32,
) -> Result<Json<ExpenseGroupDto>, ApiError> {
    if result.status() == RepositoryActionStatus::NotFound {
        return Err(not_found(id));
    }
    let updated = expect_entity(result, RepositoryActionStatus::Updated)?;
    info!(expense_group_id = id, "Expense group updated");
    Ok(Json(updated.into()))
}

fn expect_entity(
    result: RepositoryActionResult<ExpenseGroup>,
    expected: RepositoryActionStatus,
) -> Result<ExpenseGroup, ApiError> {
    let status = result.status();
    if status != expected {
        return Err(rejected(status, result.message()));
    }
    result
        .into_entity()
        .ok_or_else(|| ApiError::Internal(format!("{:?} result without an entity", status)))
}

fn rejected(status: RepositoryActionStatus, message: Option<&str>) -> ApiError {
    warn!(?status, reason = message, "Repository rejected the change");
    ApiError::BadRequest(message.unwrap_or("change rejected").to_string())
}

fn missing_body() -> ApiError {
    ApiError::BadRequest("request body is missing or not valid JSON".into())
}

fn not_found(id: i32) -> ApiError {
    ApiError::NotFound(format!("expense group {}", id))
}
