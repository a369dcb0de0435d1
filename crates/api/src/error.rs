//! Mapping of domain errors onto HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fxcalc_core::auth::AuthError;
use fxcalc_core::currency::CurrencyError;
use fxcalc_core::token::TokenError;
use fxcalc_shared::AppError;
use tracing::error;
use validator::ValidationErrors;

use crate::response::{self, FieldError};

/// Error returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    /// A classified application error.
    App(AppError),
    /// The body parsed but failed field validation.
    Invalid(Vec<FieldError>),
    /// The body was not well-formed JSON.
    BadRequest,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::App(err) => {
                if err.is_internal() {
                    error!(error = %err, code = err.error_code(), "Request failed");
                }
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                response::error(status, err.public_message())
            }
            Self::Invalid(errors) => response::validation_failed(errors),
            Self::BadRequest => response::error(StatusCode::BAD_REQUEST, "Bad request."),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::App(err.into())
    }
}

impl From<CurrencyError> for ApiError {
    fn from(err: CurrencyError) -> Self {
        Self::App(err.into())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Self::App(err.into())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    path: field.to_string(),
                    msg: e
                        .message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), ToString::to_string),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.path.cmp(&b.path));
        Self::Invalid(fields)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON of the wrong shape: missing field, non-numeric rate.
            JsonRejection::JsonDataError(e) => Self::Invalid(vec![FieldError {
                path: "body".to_string(),
                msg: e.body_text(),
            }]),
            _ => Self::BadRequest,
        }
    }
}
