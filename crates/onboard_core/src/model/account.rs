//! Account records for the local login flow.
//!
//! # Invariants
//! - Passwords are stored as salted SHA-256 digests, never as plaintext.
//! - `SessionUser` carries no credential material.
//!
//! This is still not a real authentication system: digests are unstretched
//! and the store is readable by anyone with access to the data directory.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// Product a user logs into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Product {
    #[serde(rename = "THUB")]
    Thub,
    #[serde(rename = "VDV Performance")]
    VdvPerformance,
    #[serde(rename = "BPO financeiro")]
    BpoFinanceiro,
}

impl Product {
    pub const ALL: [Product; 3] = [Self::Thub, Self::VdvPerformance, Self::BpoFinanceiro];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thub => "THUB",
            Self::VdvPerformance => "VDV Performance",
            Self::BpoFinanceiro => "BPO financeiro",
        }
    }

    /// Where a successful login lands.
    pub fn landing_route(self) -> LandingRoute {
        match self {
            Self::Thub => LandingRoute::Dashboard,
            Self::VdvPerformance | Self::BpoFinanceiro => LandingRoute::ProductPlaceholder,
        }
    }
}

impl FromStr for Product {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingProduct);
        }
        Self::ALL
            .into_iter()
            .find(|product| product.as_str() == trimmed)
            .ok_or_else(|| ValidationError::UnknownProduct(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingRoute {
    Dashboard,
    ProductPlaceholder,
}

/// Registered account as stored under the `users` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub email: String,
    pub password_salt: String,
    pub password_digest: String,
    pub product: Product,
}

impl StoredUser {
    pub fn new(email: &str, password: &str, salt: String, product: Product) -> Self {
        let password_digest = password_digest(&salt, password);
        Self {
            email: email.to_string(),
            password_salt: salt,
            password_digest,
            product,
        }
    }

    pub fn matches(&self, email: &str, password: &str, product: Product) -> bool {
        self.email == email
            && self.product == product
            && self.password_digest == password_digest(&self.password_salt, password)
    }
}

/// Logged-in user as stored under `currentUser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    pub product: Product,
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
