use crate::{config::Config, error::ApiError, model::role::Role, models::Claims};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};
use jsonwebtoken::decode;
use jsonwebtoken::{DecodingKey, Validation};

/// Pull the session token out of a request: the `jwt` cookie is the primary
/// carrier, an `Authorization: Bearer` header is accepted as a fallback.
pub fn token_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie("jwt") {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

pub struct AuthUser {
    pub id: u64,
    pub email: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match token_from_request(req) {
            Some(t) => t,
            None => return ready(Err(ApiError::Unauthenticated.into())),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(
                    actix_web::error::ErrorInternalServerError("Config missing"),
                ))
            }
        };

        let data = match decode::<Claims>(
            &token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(d) => d,
            Err(_) => return ready(Err(ApiError::InvalidToken.into())),
        };

        let role = match Role::from_id(data.claims.role) {
            Some(r) => r,
            None => return ready(Err(ApiError::InvalidToken.into())),
        };

        ready(Ok(AuthUser {
            id: data.claims.id,
            email: data.claims.sub,
            role,
        }))
    }
}

impl AuthUser {
    pub fn require_admin(&self) -> actix_web::Result<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Admin only"))
        }
    }

    /// Employees may only act on their own records; admins on anyone's.
    pub fn require_self_or_admin(&self, employee_id: u64) -> actix_web::Result<()> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Employee if self.id == employee_id => Ok(()),
            _ => Err(actix_web::error::ErrorForbidden("Not your record")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, id: u64) -> AuthUser {
        AuthUser {
            id,
            email: "x@x.com".to_string(),
            role,
        }
    }

    #[test]
    fn admin_passes_both_policies() {
        let admin = user(Role::Admin, 1);
        assert!(admin.require_admin().is_ok());
        assert!(admin.require_self_or_admin(99).is_ok());
    }

    #[test]
    fn employee_restricted_to_own_records() {
        let emp = user(Role::Employee, 7);
        assert!(emp.require_admin().is_err());
        assert!(emp.require_self_or_admin(7).is_ok());
        assert!(emp.require_self_or_admin(8).is_err());
    }
}
