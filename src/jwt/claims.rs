use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Name of the claim carrying the expiration time.
pub const EXPIRY_CLAIM: &str = "exp";

/// Capability every claim set carried by a token must have.
pub trait Claim {
    /// Expiration time as seconds since the Unix epoch.
    fn expires_at(&self) -> i64;
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClaimsError {
    #[error("missing or non-integer `exp` claim")]
    InvalidExpiry,
    #[error("claims must be a JSON object")]
    NotAnObject,
    #[error("reserved claim `{0}`")]
    ReservedClaim(String),
    #[error("serializing claims: `{0}`")]
    Serialization(String),
    #[error("expiration time out of range")]
    ExpiryOutOfRange,
}

/// Registered claims from RFC 7519. Only `exp` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject (whom token refers to).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// JWT ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<Uuid>,
    /// Issued at (as UTC timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration time (as UTC timestamp).
    pub exp: i64,
}

impl RegisteredClaims {
    /// Claims carrying only an expiration time.
    pub fn new(exp: i64) -> Self {
        Self {
            iss: None,
            sub: None,
            aud: None,
            jti: None,
            iat: None,
            exp,
        }
    }

    /// Claims issued at `now` and valid for `ttl`, with a fresh, non-reusable JWT ID.
    pub fn issued_at(now: DateTime<Utc>, ttl: TimeDelta) -> Result<Self, ClaimsError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(ClaimsError::ExpiryOutOfRange)?;
        Ok(Self {
            jti: Some(Uuid::now_v7()),
            iat: Some(now.timestamp()),
            ..Self::new(expires_at.timestamp())
        })
    }

    /// Same as [RegisteredClaims::issued_at] using the current time.
    pub fn expiring_in(ttl: TimeDelta) -> Result<Self, ClaimsError> {
        Self::issued_at(Utc::now(), ttl)
    }

    pub fn with_issuer(self, iss: impl Into<String>) -> Self {
        Self {
            iss: Some(iss.into()),
            ..self
        }
    }

    pub fn with_subject(self, sub: impl Into<String>) -> Self {
        Self {
            sub: Some(sub.into()),
            ..self
        }
    }

    pub fn with_audience(self, aud: impl Into<String>) -> Self {
        Self {
            aud: Some(aud.into()),
            ..self
        }
    }

    pub fn with_jwt_id(self, jti: Uuid) -> Self {
        Self {
            jti: Some(jti),
            ..self
        }
    }
}

impl Claim for RegisteredClaims {
    fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// Claims with no fixed shape, for callers that cannot define a claim type at compile time.
///
/// The `exp` claim is always present and an integer: deserializing an object without it fails,
/// and [MapClaims::insert] refuses to touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct MapClaims(Map<String, Value>);

impl TryFrom<Map<String, Value>> for MapClaims {
    type Error = ClaimsError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        match map.get(EXPIRY_CLAIM).and_then(Value::as_i64) {
            Some(_) => Ok(Self(map)),
            None => Err(ClaimsError::InvalidExpiry),
        }
    }
}

impl TryFrom<Value> for MapClaims {
    type Error = ClaimsError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Self::try_from(map),
            _ => Err(ClaimsError::NotAnObject),
        }
    }
}

impl MapClaims {
    pub fn new(exp: i64) -> Self {
        let mut map = Map::new();
        map.insert(EXPIRY_CLAIM.to_string(), Value::from(exp));
        Self(map)
    }

    /// Converts any serializable claim set, which must contain an integer `exp`.
    pub fn from_claims<T: Serialize>(claims: &T) -> Result<Self, ClaimsError> {
        serde_json::to_value(claims)
            .map_err(|e| ClaimsError::Serialization(e.to_string()))
            .and_then(Self::try_from)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Inserts a claim, returning the previous value. `exp` is reserved, see [MapClaims::set_expires_at].
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, ClaimsError> {
        let key = key.into();
        if key == EXPIRY_CLAIM {
            return Err(ClaimsError::ReservedClaim(key));
        }
        Ok(self.0.insert(key, value.into()))
    }

    pub fn set_expires_at(&mut self, exp: i64) {
        self.0.insert(EXPIRY_CLAIM.to_string(), Value::from(exp));
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl Claim for MapClaims {
    fn expires_at(&self) -> i64 {
        // Construction guarantees an integer `exp`; anything else reads as already expired.
        self.0
            .get(EXPIRY_CLAIM)
            .and_then(Value::as_i64)
            .unwrap_or(i64::MIN)
    }
}
