use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::Claims;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

/// Issue a session token. Pure function of the identity, the signing secret
/// and the current time; the server keeps no record of issued tokens.
pub fn generate_session_token(
    id: u64,
    email: String,
    role: u8,
    secret: &str,
    ttl: usize,
) -> String {
    let claims = Claims {
        id,
        sub: email,
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_verifies_right_after_issuance() {
        let token = generate_session_token(
            7,
            "alice@x.com".to_string(),
            Role::Employee as u8,
            SECRET,
            86400,
        );

        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.sub, "alice@x.com");
        assert_eq!(Role::from_id(claims.role), Some(Role::Employee));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Build claims whose exp is already past the default 60s leeway.
        let claims = Claims {
            id: 1,
            sub: "alice@x.com".to_string(),
            role: Role::Employee as u8,
            exp: now() - 120,
            jti: "test".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token =
            generate_session_token(1, "alice@x.com".to_string(), Role::Admin as u8, SECRET, 3600);

        // Flip one byte anywhere in the token.
        let mut bytes = token.into_bytes();
        let i = bytes.len() / 2;
        bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(verify_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token =
            generate_session_token(1, "alice@x.com".to_string(), Role::Admin as u8, SECRET, 3600);
        assert!(verify_token(&token, "other-secret").is_err());
    }
}
