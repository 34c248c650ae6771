use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::token::Claims;
use crate::error::AppError;

/// The identity resolved by `AuthMiddleware`, extracted from request
/// extensions as a typed value.
///
/// Handlers take this as an argument and thread `id` explicitly into every
/// task-service call; no task operation reads identity from ambient request
/// state. If the claims are absent (middleware not applied or it failed to
/// insert them) extraction fails with `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError; // AppError converts into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(AuthenticatedUser {
                id: claims.sub,
                email: claims.email,
            })),
            None => {
                let err = AppError::Unauthorized(
                    "Identity not found in request. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
