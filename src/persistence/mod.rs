//! Durable position record.
//!
//! The record holds four integers: `position`, `max_limit`, `steps_per_rot`
//! and `speed`. Reads recover field by field, so one corrupt value does not
//! discard the others. Writes are reported to the caller as a `Result`, but
//! the controller only ever logs them.

mod file;
mod memory;

pub use file::FileStateStore;
pub use memory::MemoryStateStore;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::MotorDefaults;
use crate::error::PersistenceError;

/// Key of the persisted position.
pub const KEY_POSITION: &str = "position";
/// Key of the persisted travel limit.
pub const KEY_MAX_LIMIT: &str = "max_limit";
/// Key of the persisted steps per rotation.
pub const KEY_STEPS_PER_ROT: &str = "steps_per_rot";
/// Key of the persisted speed.
pub const KEY_SPEED: &str = "speed";

/// All record keys in write order.
pub const RECORD_KEYS: [&str; 4] = [KEY_POSITION, KEY_MAX_LIMIT, KEY_STEPS_PER_ROT, KEY_SPEED];

/// The four persisted integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Absolute position in steps.
    pub position: i64,
    /// Symmetric travel limit.
    pub max_limit: i64,
    /// Steps per output rotation (display only).
    pub steps_per_rot: i64,
    /// Operator speed setting.
    pub speed: i32,
}

impl PersistedState {
    /// Record used when nothing valid is stored.
    pub fn from_defaults(defaults: &MotorDefaults) -> Self {
        Self {
            position: 0,
            max_limit: defaults.limit().steps(),
            steps_per_rot: defaults.default_steps_per_rotation,
            speed: defaults.speed().value(),
        }
    }
}

/// Result of a load: the recovered record and which fields fell back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedState {
    /// Record to start from.
    pub state: PersistedState,
    /// Keys that were missing or invalid and took their default.
    pub defaulted: heapless::Vec<&'static str, 4>,
}

impl LoadedState {
    /// Every field came from the store.
    pub fn intact(state: PersistedState) -> Self {
        Self {
            state,
            defaulted: heapless::Vec::new(),
        }
    }

    /// Nothing usable was stored.
    pub fn defaults(defaults: &MotorDefaults) -> Self {
        let mut defaulted = heapless::Vec::new();
        for key in RECORD_KEYS {
            // capacity equals RECORD_KEYS.len()
            let _ = defaulted.push(key);
        }
        Self {
            state: PersistedState::from_defaults(defaults),
            defaulted,
        }
    }

    /// Whether no field needed a default.
    #[inline]
    pub fn is_intact(&self) -> bool {
        self.defaulted.is_empty()
    }
}

/// Durable backend for [`PersistedState`].
pub trait StateStore: Send + Sync {
    /// Read the record, falling back to defaults per missing/invalid field.
    ///
    /// Never fails; problems are logged as warnings.
    fn load(&self) -> LoadedState;

    /// Replace the record.
    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError>;
}

impl<T: StateStore + ?Sized> StateStore for std::sync::Arc<T> {
    fn load(&self) -> LoadedState {
        (**self).load()
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        (**self).save(state)
    }
}

/// Serialize a record as TOML.
pub fn encode_record(state: &PersistedState) -> Result<String, PersistenceError> {
    Ok(toml::to_string(state)?)
}

/// Parse a TOML record with per-field recovery.
///
/// A document that is not TOML at all yields all defaults.
pub fn decode_record(content: &str, defaults: &MotorDefaults) -> LoadedState {
    let table: toml::Table = match toml::from_str(content) {
        Ok(table) => table,
        Err(e) => {
            warn!("{}; using defaults", PersistenceError::Parse(e.message().to_string()));
            return LoadedState::defaults(defaults);
        }
    };

    let fallback = PersistedState::from_defaults(defaults);
    let mut loaded = LoadedState::intact(fallback);

    loaded.state.position = field(&table, KEY_POSITION, fallback.position, |_| true, &mut loaded);
    loaded.state.max_limit = field(&table, KEY_MAX_LIMIT, fallback.max_limit, |v| v >= 0, &mut loaded);
    loaded.state.steps_per_rot =
        field(&table, KEY_STEPS_PER_ROT, fallback.steps_per_rot, |v| v > 0, &mut loaded);
    loaded.state.speed = field(
        &table,
        KEY_SPEED,
        i64::from(fallback.speed),
        |v| i32::try_from(v).is_ok(),
        &mut loaded,
    ) as i32;

    loaded
}

fn field(
    table: &toml::Table,
    key: &'static str,
    default: i64,
    valid: impl Fn(i64) -> bool,
    loaded: &mut LoadedState,
) -> i64 {
    match table.get(key) {
        Some(toml::Value::Integer(v)) if valid(*v) => *v,
        Some(other) => {
            warn!(key, value = %other, default, "Invalid persisted field, using default");
            let _ = loaded.defaulted.push(key);
            default
        }
        None => {
            warn!(key, default, "Persisted field missing, using default");
            let _ = loaded.defaulted.push(key);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> MotorDefaults {
        MotorDefaults::default()
    }

    #[test]
    fn test_decode_complete_record() {
        let loaded = decode_record(
            "position = -120\nmax_limit = 500\nsteps_per_rot = 2048\nspeed = 75\n",
            &defaults(),
        );
        assert!(loaded.is_intact());
        assert_eq!(
            loaded.state,
            PersistedState {
                position: -120,
                max_limit: 500,
                steps_per_rot: 2048,
                speed: 75,
            }
        );
    }

    #[test]
    fn test_decode_missing_keys_fall_back_individually() {
        let loaded = decode_record("position = 42\n", &defaults());
        assert_eq!(loaded.state.position, 42);
        assert_eq!(loaded.state.max_limit, 20_000);
        assert_eq!(loaded.state.steps_per_rot, 4096);
        assert_eq!(loaded.state.speed, 250);
        assert_eq!(
            loaded.defaulted.as_slice(),
            &[KEY_MAX_LIMIT, KEY_STEPS_PER_ROT, KEY_SPEED]
        );
    }

    #[test]
    fn test_decode_corrupt_field_keeps_others() {
        let loaded = decode_record(
            "position = \"abc\"\nmax_limit = 300\nsteps_per_rot = -4\nspeed = 99999999999\n",
            &defaults(),
        );
        assert_eq!(loaded.state.position, 0);
        assert_eq!(loaded.state.max_limit, 300);
        assert_eq!(loaded.state.steps_per_rot, 4096);
        assert_eq!(loaded.state.speed, 250);
        assert_eq!(
            loaded.defaulted.as_slice(),
            &[KEY_POSITION, KEY_STEPS_PER_ROT, KEY_SPEED]
        );
    }

    #[test]
    fn test_decode_garbage_uses_all_defaults() {
        let loaded = decode_record("{{{ not toml", &defaults());
        assert_eq!(loaded, LoadedState::defaults(&defaults()));
        assert_eq!(loaded.defaulted.len(), 4);
    }

    #[test]
    fn test_out_of_range_position_is_kept() {
        // A legacy record may sit past the limit; the loop only refuses to go further out.
        let loaded = decode_record(
            "position = 900\nmax_limit = 100\nsteps_per_rot = 4096\nspeed = 250\n",
            &defaults(),
        );
        assert!(loaded.is_intact());
        assert_eq!(loaded.state.position, 900);
    }

    #[test]
    fn test_encode_then_decode() {
        let state = PersistedState {
            position: i64::from(i32::MIN) - 7,
            max_limit: 0,
            steps_per_rot: 1,
            speed: -5,
        };
        let text = encode_record(&state).unwrap();
        for key in RECORD_KEYS {
            assert!(text.contains(key), "{key} missing from {text}");
        }
        assert_eq!(decode_record(&text, &defaults()).state, state);
    }
}
