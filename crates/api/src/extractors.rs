//! Request extractors: validated JSON bodies and role guards.

use std::marker::PhantomData;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use fxcalc_core::auth::Role;
use fxcalc_shared::{AppError, Claims};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that has passed `validator` checks.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// A role a route requires.
pub trait RequiredRole: Send + Sync + 'static {
    /// The role checked against the token's tags.
    const ROLE: Role;
}

/// Marker for editor-only routes.
#[derive(Debug, Clone, Copy)]
pub struct Editor;

impl RequiredRole for Editor {
    const ROLE: Role = Role::Editor;
}

/// Marker for viewer routes.
#[derive(Debug, Clone, Copy)]
pub struct Viewer;

impl RequiredRole for Viewer {
    const ROLE: Role = Role::Viewer;
}

/// Claims of an authenticated caller holding role `R`.
///
/// Requires the authentication middleware to have run on the route.
#[derive(Debug, Clone)]
pub struct Authorized<R: RequiredRole> {
    claims: Claims,
    _role: PhantomData<R>,
}

impl<R: RequiredRole> Authorized<R> {
    /// Returns the verified claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.claims
    }
}

impl<R, S> FromRequestParts<S> for Authorized<R>
where
    R: RequiredRole,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("No token provided.".to_string()))?;

        if !R::ROLE.is_granted_to(&claims.roles) {
            return Err(AppError::Forbidden(format!(
                "{} permissions required. Access denied.",
                R::ROLE.title()
            ))
            .into());
        }

        Ok(Self {
            claims,
            _role: PhantomData,
        })
    }
}
