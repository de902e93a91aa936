//! Extractor - Wrapper di `Json` e `Path` che restituiscono gli errori come `AppError`
//!
//! Così anche un body malformato o un id non numerico producono il body JSON
//! `{error, status, details}` invece del testo semplice di axum.

use crate::core::AppError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum_macros::{FromRequest, FromRequestParts};
use tracing::warn;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected JSON body: {}", rejection.body_text());
        // lo status resta quello di axum (422 per campi mancanti, 400 per JSON malformato)
        Self::new(rejection.status(), "Invalid request body").with_details(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        warn!("Rejected path parameters: {}", rejection.body_text());
        Self::new(rejection.status(), "Invalid path parameter").with_details(rejection.body_text())
    }
}
