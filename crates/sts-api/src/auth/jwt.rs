use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::IdentityConfig};

/// Claims carried by an identity token.
///
/// `sub` is the external identity reference, matched against
/// `users.external_id`; it is not the internal user id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iss: String,
    pub exp: usize,
    pub iat: usize,
}

/// Issue a token for an external identity
pub fn issue_identity_token(
    external_id: &str,
    email: Option<&str>,
    identity: &IdentityConfig,
) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: external_id.to_string(),
        email: email.map(String::from),
        iss: identity.issuer.clone(),
        iat: now.timestamp() as usize,
        exp: (now + chrono::Duration::hours(identity.token_expiry_hours)).timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(identity.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("failed to sign identity token: {e}")))
}

/// Verify signature, expiry and issuer of an identity token
pub fn verify_identity_token(token: &str, identity: &IdentityConfig) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[identity.issuer.as_str()]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(identity.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    if token_data.claims.sub.is_empty() {
        return Err(ApiError::Unauthorized("Token has no subject".to_string()));
    }

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> IdentityConfig {
        IdentityConfig {
            jwt_secret: "test_jwt_secret_minimum_32_characters_long".to_string(),
            issuer: "studysync".to_string(),
            token_expiry_hours: 24,
        }
    }

    #[test]
    fn test_issue_and_verify_identity_token() {
        let identity = identity();
        let token = issue_identity_token("ext-123", Some("ada@example.com"), &identity)
            .expect("Failed to issue token");
        assert!(!token.is_empty());

        let claims = verify_identity_token(&token, &identity).expect("Failed to verify token");
        assert_eq!(claims.sub, "ext-123");
        assert_eq!(claims.email.as_deref(), Some("ada@example.com"));
        assert_eq!(claims.iss, "studysync");

        let lifetime = claims.exp - claims.iat;
        assert!(
            (86390..=86410).contains(&lifetime),
            "Token should expire in approximately 24 hours, got {lifetime} seconds"
        );
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let token = issue_identity_token("ext-123", None, &identity()).unwrap();
        let other = IdentityConfig {
            jwt_secret: "wrong_jwt_secret_minimum_32_characters_long".to_string(),
            ..identity()
        };

        match verify_identity_token(&token, &other) {
            Err(ApiError::Unauthorized(msg)) => assert!(msg.contains("Invalid or expired")),
            other => panic!("Expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_issuer_is_unauthorized() {
        let token = issue_identity_token("ext-123", None, &identity()).unwrap();
        let other = IdentityConfig {
            issuer: "someone-else".to_string(),
            ..identity()
        };

        assert!(matches!(
            verify_identity_token(&token, &other),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let identity = identity();
        let issued = Utc::now() - chrono::Duration::hours(3);
        let claims = Claims {
            sub: "ext-123".to_string(),
            email: None,
            iss: identity.issuer.clone(),
            iat: issued.timestamp() as usize,
            exp: (issued + chrono::Duration::hours(1)).timestamp() as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(identity.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            verify_identity_token(&token, &identity),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        assert!(matches!(
            verify_identity_token("invalid.jwt.token", &identity()),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
