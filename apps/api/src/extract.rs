//! Request extractors whose rejections render through `AppError`, so a
//! malformed body or query string still gets the `{error, code}` JSON reply.

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;

use crate::errors::AppError;

/// `axum::Json` with rejections mapped to a 400 validation error.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Query` with rejections mapped to a 400 validation error.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
