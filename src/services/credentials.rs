// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password hashing with bcrypt.
//!
//! bcrypt is CPU-bound, so both directions run on the blocking pool to
//! keep the async workers free. Hashes are self-describing (`$2b$...`).

use crate::error::AppError;

/// Hash a password at the given bcrypt cost.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

/// Check a password against a stored hash. Malformed hashes never verify.
pub async fn verify_password(password: String, stored: String) -> bool {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &stored).unwrap_or(false))
        .await
        .unwrap_or(false)
}
