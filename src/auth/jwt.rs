use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::SessionClaims;
use crate::error::AppError;

#[derive(Clone)]
pub struct SessionKeys {
    enc: EncodingKey,
    dec: DecodingKey,
}

impl SessionKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as usize)
        .unwrap_or_default()
}

pub fn make_session_claims(session_token: &str, user_id: &Uuid, ttl_hours: i64) -> SessionClaims {
    let iat = now_unix();
    let ttl_secs = ttl_hours.max(0) as usize * 3600;
    SessionClaims {
        sid: session_token.to_string(),
        sub: user_id.to_string(),
        iat,
        exp: iat + ttl_secs,
    }
}

pub fn encode_session(keys: &SessionKeys, claims: &SessionClaims) -> Result<String, AppError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AppError::internal_with_source("Session encoding failed", err))
}

/// Verifies signature and expiry only; the session row is checked separately.
pub fn decode_session(keys: &SessionKeys, token: &str) -> Result<SessionClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    decode::<SessionClaims>(token, &keys.dec, &validation)
        .map(|data| data.claims)
        .map_err(|err| {
            tracing::debug!(error = %err, "rejected session envelope");
            AppError::unauthorized("Invalid or expired session")
        })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{SessionKeys, decode_session, encode_session, make_session_claims};
    use crate::error::AppError;

    #[test]
    fn claims_carry_session_subject_and_ttl() {
        let user_id = Uuid::new_v4();
        let claims = make_session_claims("tok", &user_id, 2);

        assert_eq!(claims.sid, "tok");
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.exp.saturating_sub(claims.iat), 7200);
    }

    #[test]
    fn envelope_round_trips_with_same_secret() {
        let keys = SessionKeys::from_secret(b"unit-test-session-secret");
        let claims = make_session_claims("abc123", &Uuid::new_v4(), 1);
        let token = encode_session(&keys, &claims).expect("token should encode");

        let decoded = decode_session(&keys, &token).expect("token should decode");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn foreign_signature_is_unauthorized() {
        let ours = SessionKeys::from_secret(b"unit-test-session-secret");
        let theirs = SessionKeys::from_secret(b"some-other-secret-value");
        let token = encode_session(&theirs, &make_session_claims("abc", &Uuid::new_v4(), 1))
            .expect("token should encode");

        let err = decode_session(&ours, &token).expect_err("signature should not verify");
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn garbage_is_unauthorized() {
        let keys = SessionKeys::from_secret(b"unit-test-session-secret");
        let err = decode_session(&keys, "not-a-token").expect_err("decode should fail");
        assert_eq!(err.message(), "Invalid or expired session");
    }
}
