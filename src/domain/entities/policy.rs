//! Expiry and cache lifetime policy.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Cache lifetime used when the policy does not set one.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// TTL policy applied to newly created links and to cache population.
///
/// The all-zero value is the sentinel for "no policy row found yet"; it
/// behaves as "links never expire, default cache TTL".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Policy {
    /// Link lifetime in hours; `<= 0` means links never expire.
    pub ttl_hours: i32,
    /// Cache entry lifetime in minutes; `<= 0` means [`DEFAULT_CACHE_TTL`].
    pub cache_ttl_minutes: i32,
}

impl Policy {
    pub fn new(ttl_hours: i32, cache_ttl_minutes: i32) -> Self {
        Self {
            ttl_hours,
            cache_ttl_minutes,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Expiry timestamp for a link created at `now`.
    pub fn link_expiry(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.is_zero() || self.ttl_hours <= 0 {
            return None;
        }
        Some(now + ChronoDuration::hours(i64::from(self.ttl_hours)))
    }

    /// Lifetime of cache entries written under this policy.
    pub fn cache_ttl(&self) -> Duration {
        if self.cache_ttl_minutes > 0 {
            Duration::from_secs(u64::from(self.cache_ttl_minutes.unsigned_abs()) * 60)
        } else {
            DEFAULT_CACHE_TTL
        }
    }

    /// Serializes the policy into hash fields following [`POLICY_FIELDS`].
    pub fn to_hash_fields(&self) -> Vec<(String, String)> {
        POLICY_FIELDS
            .iter()
            .map(|field| (field.key.to_string(), (field.get)(self).to_string()))
            .collect()
    }

    /// Rebuilds a policy from hash fields following [`POLICY_FIELDS`].
    ///
    /// Keys not in the schema are ignored and missing keys leave the field
    /// at zero.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyDecodeError::InvalidValue`] when a known key holds a
    /// value that is not a 32-bit integer.
    pub fn from_hash_fields(fields: &HashMap<String, String>) -> Result<Self, PolicyDecodeError> {
        let mut policy = Self::default();

        for field in POLICY_FIELDS {
            let Some(raw) = fields.get(field.key) else {
                continue;
            };
            let Ok(value) = raw.trim().parse::<i32>() else {
                return Err(PolicyDecodeError::InvalidValue {
                    key: field.key,
                    value: raw.clone(),
                });
            };
            (field.set)(&mut policy, value);
        }

        Ok(policy)
    }
}

/// Errors decoding a policy hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyDecodeError {
    #[error("policy field '{key}' has non-integer value '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// One entry of the policy storage schema.
///
/// Every policy field is a 32-bit integer; `key` is its name in the cache
/// hash and `name` its name on [`Policy`].
pub struct PolicyField {
    pub name: &'static str,
    pub key: &'static str,
    get: fn(&Policy) -> i32,
    set: fn(&mut Policy, i32),
}

fn get_ttl_hours(p: &Policy) -> i32 {
    p.ttl_hours
}

fn set_ttl_hours(p: &mut Policy, v: i32) {
    p.ttl_hours = v;
}

fn get_cache_ttl_minutes(p: &Policy) -> i32 {
    p.cache_ttl_minutes
}

fn set_cache_ttl_minutes(p: &mut Policy, v: i32) {
    p.cache_ttl_minutes = v;
}

/// Storage schema of [`Policy`] in the cache hash.
pub const POLICY_FIELDS: &[PolicyField] = &[
    PolicyField {
        name: "ttl_hours",
        key: "ttl_hours",
        get: get_ttl_hours,
        set: set_ttl_hours,
    },
    PolicyField {
        name: "cache_ttl_minutes",
        key: "cache_ttl_minutes",
        get: get_cache_ttl_minutes,
        set: set_cache_ttl_minutes,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(Policy::default().is_zero());
        assert!(!Policy::new(0, 10).is_zero());
        assert!(!Policy::new(1, 0).is_zero());
    }

    #[test]
    fn test_link_expiry_disabled() {
        let now = Utc::now();
        assert_eq!(Policy::default().link_expiry(now), None);
        assert_eq!(Policy::new(0, 30).link_expiry(now), None);
        assert_eq!(Policy::new(-5, 30).link_expiry(now), None);
    }

    #[test]
    fn test_link_expiry_hours() {
        let now = Utc::now();
        let expiry = Policy::new(24, 0).link_expiry(now).unwrap();
        assert_eq!(expiry - now, ChronoDuration::hours(24));
    }

    #[test]
    fn test_cache_ttl() {
        assert_eq!(Policy::default().cache_ttl(), DEFAULT_CACHE_TTL);
        assert_eq!(Policy::new(1, -3).cache_ttl(), DEFAULT_CACHE_TTL);
        assert_eq!(Policy::new(0, 15).cache_ttl(), Duration::from_secs(900));
    }

    #[test]
    fn test_hash_fields_follow_schema() {
        let fields = Policy::new(48, 10).to_hash_fields();
        assert_eq!(
            fields,
            vec![
                ("ttl_hours".to_string(), "48".to_string()),
                ("cache_ttl_minutes".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_hash_fields() {
        let fields = hash(&[("ttl_hours", "48"), ("cache_ttl_minutes", " 10")]);
        let policy = Policy::from_hash_fields(&fields).unwrap();
        assert_eq!(policy, Policy::new(48, 10));
    }

    #[test]
    fn test_from_hash_fields_partial_and_unknown() {
        let fields = hash(&[("cache_ttl_minutes", "7"), ("legacy", "x")]);
        let policy = Policy::from_hash_fields(&fields).unwrap();
        assert_eq!(policy, Policy::new(0, 7));

        assert!(Policy::from_hash_fields(&HashMap::new()).unwrap().is_zero());
    }

    #[test]
    fn test_from_hash_fields_invalid_value() {
        let fields = hash(&[("ttl_hours", "forever")]);
        let err = Policy::from_hash_fields(&fields).unwrap_err();
        assert_eq!(
            err,
            PolicyDecodeError::InvalidValue {
                key: "ttl_hours",
                value: "forever".to_string(),
            }
        );
    }

    #[test]
    fn test_schema_names_unique() {
        let mut keys: Vec<_> = POLICY_FIELDS.iter().map(|f| f.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), POLICY_FIELDS.len());
        assert!(POLICY_FIELDS.iter().all(|f| !f.name.is_empty()));
    }
}
