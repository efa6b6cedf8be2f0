//! Password credential value object
//!
//! A [`Credential`] holds a bcrypt hash of a secret, never the secret itself.
//! `Absent` is what a database `NULL` decodes to (a password that was never
//! set). The hash has no external representation: `Display` renders nothing,
//! `Debug` is redacted and the type deliberately has no `Serialize` impl.

use std::fmt;

use bcrypt::HashParts;
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use sqlx::{Decode, Encode, Postgres, Type, TypeInfo, ValueRef};
use thiserror::Error;

/// bcrypt only looks at the first 72 bytes of its input
pub const MAX_SECRET_BYTES: usize = 72;

/// Lowest cost bcrypt accepts
pub const MIN_COST: u32 = 4;

/// Highest cost bcrypt accepts
pub const MAX_COST: u32 = 31;

/// Default work factor for new hashes
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

#[derive(Error, Debug)]
pub enum CredentialError {
    /// The hashing primitive rejected the input
    #[error("Failed to hash secret: {0}")]
    Hashing(String),

    /// A stored value is not a usable bcrypt hash
    #[error("Invalid stored credential: {0}")]
    InvalidEncoding(String),
}

/// Raw value read from storage
#[derive(Debug, Clone, Copy)]
pub enum RawCredential<'a> {
    Null,
    Text(&'a str),
    Bytes(&'a [u8]),
    /// Column of some other type, by name
    Unsupported(&'a str),
}

/// Hashed secret, or the absence of one
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Present(String),
    Absent,
}

impl Credential {
    /// Hash `secret` with a fresh salt and the default cost
    pub fn create(secret: &str) -> Result<Self, CredentialError> {
        Self::create_with_cost(secret, DEFAULT_COST)
    }

    /// Hash `secret` with a fresh salt and an explicit cost
    pub fn create_with_cost(secret: &str, cost: u32) -> Result<Self, CredentialError> {
        // Longer input would be silently truncated by bcrypt
        if secret.len() > MAX_SECRET_BYTES {
            return Err(CredentialError::Hashing(format!(
                "secret is {} bytes, the limit is {}",
                secret.len(),
                MAX_SECRET_BYTES
            )));
        }

        bcrypt::hash(secret, cost)
            .map(Self::Present)
            .map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    /// Wrap a previously computed hash without re-hashing it
    pub fn from_stored_hash(hash: impl Into<String>) -> Self {
        Self::Present(hash.into())
    }

    /// Check a candidate secret against the stored hash.
    ///
    /// Never errors: a mismatch, an absent credential, a malformed stored hash
    /// and an over-long candidate all yield `false`.
    pub fn verify(&self, candidate: &str) -> bool {
        let Self::Present(hash) = self else {
            return false;
        };
        if candidate.len() > MAX_SECRET_BYTES {
            return false;
        }
        match bcrypt::verify(candidate, hash) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!(error = %e, "Stored credential could not be verified");
                false
            }
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Value to persist: `None` maps to SQL `NULL`
    pub fn to_storage(&self) -> Option<&str> {
        match self {
            Self::Present(hash) => Some(hash),
            Self::Absent => None,
        }
    }

    /// Rebuild a credential from a stored value.
    ///
    /// `NULL` becomes `Absent`. Text and UTF-8 bytes must pass bcrypt's
    /// structural check (prefix, cost range, salt and digest layout).
    pub fn from_storage(raw: RawCredential<'_>) -> Result<Self, CredentialError> {
        let hash = match raw {
            RawCredential::Null => return Ok(Self::Absent),
            RawCredential::Text(text) => text,
            RawCredential::Bytes(bytes) => std::str::from_utf8(bytes).map_err(|_| {
                CredentialError::InvalidEncoding("binary value is not UTF-8".to_string())
            })?,
            RawCredential::Unsupported(type_name) => {
                return Err(CredentialError::InvalidEncoding(format!(
                    "unsupported column type {}",
                    type_name
                )));
            }
        };

        check_hash(hash)?;
        Ok(Self::Present(hash.to_string()))
    }
}

fn check_hash(hash: &str) -> Result<(), CredentialError> {
    let parts: HashParts = hash
        .parse()
        .map_err(|e: bcrypt::BcryptError| CredentialError::InvalidEncoding(e.to_string()))?;

    let cost = parts.get_cost();
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(CredentialError::InvalidEncoding(format!(
            "cost {} outside {}..={}",
            cost, MIN_COST, MAX_COST
        )));
    }
    Ok(())
}

impl fmt::Display for Credential {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(_) => f.write_str("Credential::Present(***)"),
            Self::Absent => f.write_str("Credential::Absent"),
        }
    }
}

// =============================================================================
// PostgreSQL mapping
// =============================================================================

impl Type<Postgres> for Credential {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty) || <Vec<u8> as Type<Postgres>>::compatible(ty)
    }
}

impl Encode<'_, Postgres> for Credential {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        match self.to_storage() {
            Some(hash) => <&str as Encode<Postgres>>::encode_by_ref(&hash, buf),
            None => Ok(IsNull::Yes),
        }
    }
}

impl<'r> Decode<'r, Postgres> for Credential {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        if value.is_null() {
            return Ok(Self::Absent);
        }

        let ty = value.type_info().into_owned();
        let credential = if <Vec<u8> as Type<Postgres>>::compatible(&ty) {
            let bytes = <&[u8] as Decode<Postgres>>::decode(value)?;
            Self::from_storage(RawCredential::Bytes(bytes))?
        } else if <String as Type<Postgres>>::compatible(&ty) {
            let text = <&str as Decode<Postgres>>::decode(value)?;
            Self::from_storage(RawCredential::Text(text))?
        } else {
            Self::from_storage(RawCredential::Unsupported(ty.name()))?
        };
        Ok(credential)
    }
}
