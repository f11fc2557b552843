use axum::extract::FromRequest;

use crate::error::WebError;

/// `axum::Json` with rejections reported as 400 in the API's error shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(WebError))]
pub struct ApiJson<T>(pub T);
