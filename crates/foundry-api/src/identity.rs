//! Identity extractors.
//!
//! The acting founder or coach arrives in request headers set by the
//! authenticating proxy. Handlers receive it as a typed parameter and pass
//! it on to the workflow explicitly.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use foundry_models::{FacultyId, FounderId};

use crate::error::ApiError;

pub const FOUNDER_HEADER: &str = "x-founder-id";
pub const FACULTY_HEADER: &str = "x-faculty-id";

fn header_value(parts: &Parts, name: &str) -> Result<Option<String>, ApiError> {
    let Some(value) = parts.headers.get(name) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| ApiError::BadRequest(format!("invalid {} header", name)))?
        .trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

/// The founder acting on the request. Required.
#[derive(Debug, Clone)]
pub struct CurrentFounder(pub FounderId);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentFounder {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_value(parts, FOUNDER_HEADER)?
            .map(|id| CurrentFounder(FounderId::from(id)))
            .ok_or_else(|| ApiError::BadRequest(format!("missing {} header", FOUNDER_HEADER)))
    }
}

/// The founder viewing a page, if signed in.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<FounderId>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Viewer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Viewer(header_value(parts, FOUNDER_HEADER)?.map(FounderId::from)))
    }
}

/// The coach acting on the request, if any.
#[derive(Debug, Clone, Default)]
pub struct CurrentFaculty(pub Option<FacultyId>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentFaculty {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentFaculty(header_value(parts, FACULTY_HEADER)?.map(FacultyId::from)))
    }
}
