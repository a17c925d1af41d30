//! REST API module.
//!
//! One handler per dashboard page. Each handler runs the page's controller
//! and answers with the page data, or with a redirect to the login entry
//! point when the session is missing or not a supervisor.

mod analytics;
mod assets;
mod critical_problems;
mod dashboard;
mod reports;
mod session;

pub use analytics::*;
pub use assets::*;
pub use critical_problems::*;
pub use dashboard::*;
pub use reports::*;
pub use session::*;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::SessionToken;
use crate::errors::AppError;
use crate::view::{Page, PageError};
use crate::AppState;

/// Longest period a page may ask the backend for.
pub const MAX_PERIOD_DAYS: u32 = 365;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Either an error envelope or a redirect to sign in.
#[derive(Debug)]
pub enum ApiError {
    Redirect(String),
    App(AppError),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::App(err)
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::Redirect(location) => ApiError::Redirect(location),
            PageError::Failed(e) => ApiError::App(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // 303 See Other
            ApiError::Redirect(location) => Redirect::to(&location).into_response(),
            ApiError::App(e) => e.into_response(),
        }
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// `?days=` shared by every analytics page.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    #[serde(default)]
    pub days: Option<u32>,
}

impl PeriodQuery {
    pub fn days_or(&self, default: u32) -> Result<u32, AppError> {
        period(self.days, default)
    }
}

pub(crate) fn period(days: Option<u32>, default: u32) -> Result<u32, AppError> {
    match days {
        None => Ok(default),
        Some(d) if (1..=MAX_PERIOD_DAYS).contains(&d) => Ok(d),
        Some(d) => Err(AppError::Validation(format!(
            "days must be between 1 and {}, got {}",
            MAX_PERIOD_DAYS, d
        ))),
    }
}

/// Mount a page for this request and answer with its data.
///
/// `filters` runs only after the session is accepted.
pub(crate) async fn render<P, F>(
    state: &AppState,
    page: P,
    token: &SessionToken,
    filters: F,
) -> ApiResult<P::Data>
where
    P: Page,
    P::Data: Serialize,
    F: FnOnce() -> Result<P::Filters, AppError>,
{
    let mut controller = state.page(page);
    controller.authorize(token.as_deref()).await?;
    let filters = filters()?;
    controller.reload(&filters).await?;
    let data = controller
        .into_data()
        .ok_or_else(|| AppError::Internal(format!("Page {} produced no data", P::NAME)))?;
    success(data)
}

// Extractors are taken as `Result` so their rejections surface only after
// the session check.

pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|e| AppError::Validation(e.body_text()))
}

pub(crate) fn path_param<T>(path: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    path.map(|Path(value)| value)
        .map_err(|e| AppError::Validation(e.body_text()))
}

pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|e| AppError::Validation(e.body_text()))
}
