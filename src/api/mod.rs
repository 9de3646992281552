//! REST API module.
//!
//! Contains all API routes and handlers. Success bodies are raw JSON; errors
//! use the envelope from [`crate::errors::ErrorResponse`].

mod activity;
mod inventory;
mod missions;
mod operators;
mod requests;

pub use activity::*;
pub use inventory::*;
pub use missions::*;
pub use operators::*;
pub use requests::*;

use axum::{
    extract::FromRequest,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<T, AppError>;

/// JSON body extractor whose rejections use the error envelope (400).
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// A newly created resource, answered with 201.
#[derive(Debug)]
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}
