//! Bearer-token identity resolution.
//!
//! Tokens are held as SHA-256 hashes and compared in constant time.
//! The production identity service plugs in behind `AuthProvider`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Invalid token entry #{index}: {reason}")]
    InvalidEntry { index: usize, reason: String },

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Doctor,
    LabWorker,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::LabWorker => "lab_worker",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "lab_worker" | "labworker" | "lab-worker" => Ok(Role::LabWorker),
            "admin" => Ok(Role::Admin),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

/// Authenticated caller, injected into request extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub role: Role,
}

/// Resolves a bearer token into an identity (allows mocking).
pub trait AuthProvider {
    fn identify(&self, token: &str) -> Option<Identity>;
}

/// Hash a bearer token string using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Fixed token table loaded from configuration.
#[derive(Debug, Default)]
pub struct StaticTokenAuth {
    entries: Vec<([u8; 32], Identity)>,
}

impl StaticTokenAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str, identity: Identity) -> Self {
        self.entries.push((hash_token(token), identity));
        self
    }

    /// Parse `token:uid:email:role` entries separated by commas.
    pub fn from_config_str(raw: &str) -> Result<Self, AuthError> {
        let mut auth = Self::new();
        for (index, entry) in raw
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .enumerate()
        {
            let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
            let [token, uid, email, role] = parts.as_slice() else {
                return Err(AuthError::InvalidEntry {
                    index,
                    reason: "expected token:uid:email:role".into(),
                });
            };
            if token.is_empty() || uid.is_empty() {
                return Err(AuthError::InvalidEntry {
                    index,
                    reason: "token and uid must not be empty".into(),
                });
            }
            let role = role.parse::<Role>().map_err(|e| AuthError::InvalidEntry {
                index,
                reason: e.to_string(),
            })?;
            auth = auth.with_token(
                token,
                Identity {
                    uid: uid.to_string(),
                    email: email.to_string(),
                    role,
                },
            );
        }
        Ok(auth)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AuthProvider for StaticTokenAuth {
    fn identify(&self, token: &str) -> Option<Identity> {
        let presented = hash_token(token);
        let mut found = None;
        // Compare against every entry, no early exit.
        for (hash, identity) in &self.entries {
            if bool::from(hash[..].ct_eq(&presented[..])) && found.is_none() {
                found = Some(identity.clone());
            }
        }
        found
    }
}
