//! Customer Session Model
//!
//! A time-boxed anonymous identity created by the entry form. Expiry
//! policy (TTL, eviction scheduling) lives in the client engine; this
//! model only carries the data and the pure age checks.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entry-form validation failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Name must not be empty")]
    EmptyName,

    #[error("Phone must be 10 digits starting with 6-9")]
    InvalidPhone,
}

/// Time-boxed anonymous customer identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub name: String,
    pub phone: String,
    pub restaurant_id: i64,
    /// Epoch millis
    pub created_at: i64,
}

impl Session {
    /// Validate and create a session stamped with the current time.
    ///
    /// Nothing is persisted here; the caller owns storage.
    pub fn create(name: &str, phone: &str, restaurant_id: i64) -> Result<Self, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        if !is_valid_phone(phone) {
            return Err(SessionError::InvalidPhone);
        }
        Ok(Self {
            name: name.to_string(),
            phone: phone.to_string(),
            restaurant_id,
            created_at: crate::util::now_millis(),
        })
    }

    /// Age at `now_ms`, clamped to zero for clock skew.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        (now_ms - self.created_at).max(0)
    }

    /// A session is expired once its age reaches the TTL.
    pub fn is_expired(&self, now_ms: i64, ttl: Duration) -> bool {
        self.age_ms(now_ms) >= ttl.as_millis() as i64
    }

    /// Time left before expiry; zero when already expired.
    pub fn remaining(&self, now_ms: i64, ttl: Duration) -> Duration {
        let left = ttl.as_millis() as i64 - self.age_ms(now_ms);
        if left <= 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(left as u64)
        }
    }
}

/// Exactly 10 ASCII digits, first digit 6-9.
pub fn is_valid_phone(phone: &str) -> bool {
    let bytes = phone.as_bytes();
    bytes.len() == 10
        && bytes.iter().all(|b| b.is_ascii_digit())
        && matches!(bytes[0], b'6'..=b'9')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("9876543210"));
        assert!(is_valid_phone("6000000000"));

        assert!(!is_valid_phone("5876543210")); // bad prefix
        assert!(!is_valid_phone("987654321")); // too short
        assert!(!is_valid_phone("98765432101")); // too long
        assert!(!is_valid_phone("98765x3210")); // non-digit
        assert!(!is_valid_phone("")); // empty
    }

    #[test]
    fn test_create_rejects_bad_input() {
        assert_eq!(
            Session::create("  ", "9876543210", 1),
            Err(SessionError::EmptyName)
        );
        assert_eq!(
            Session::create("Asha", "12345", 1),
            Err(SessionError::InvalidPhone)
        );
    }

    #[test]
    fn test_create_trims_name() {
        let s = Session::create("  Asha ", "9876543210", 1).unwrap();
        assert_eq!(s.name, "Asha");
        assert!(s.created_at > 0);
    }

    #[test]
    fn test_ttl_boundary() {
        let ttl = Duration::from_secs(900);
        let s = Session {
            name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            restaurant_id: 1,
            created_at: 1_000_000,
        };
        let deadline = 1_000_000 + 900_000;

        assert!(!s.is_expired(deadline - 1, ttl));
        assert!(s.is_expired(deadline, ttl));
        assert!(s.is_expired(deadline + 1, ttl));
        assert_eq!(s.remaining(deadline - 1, ttl), Duration::from_millis(1));
        assert_eq!(s.remaining(deadline + 1, ttl), Duration::ZERO);
    }
}
