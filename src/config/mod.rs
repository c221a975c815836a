//! Level-structure constants shared with the compaction, write-throttling
//! and iteration layers.
//!
//! This crate only defines these values; the subsystems that consume them
//! live elsewhere. They are grouped in [`LevelConfig`] so a caller can
//! override them in one place and have the relationships between them
//! checked by [`LevelConfig::validate`].


use thiserror::Error;
use tracing::{error, info};

// ------------------------------------------------------------------------------------------------
// Constants
// ------------------------------------------------------------------------------------------------

/// Number of levels in the LSM tree.
pub const NUM_LEVELS: usize = 3;

/// Level-0 compaction starts at this many files.
pub const L0_COMPACTION_TRIGGER: usize = 400;

/// Soft limit on level-0 files; writes are slowed down past it.
pub const L0_SLOWDOWN_WRITES_TRIGGER: usize = 800;

/// Hard limit on level-0 files; writes stop past it.
pub const L0_STOP_WRITES_TRIGGER: usize = 1200;

/// Deepest level a freshly compacted memtable may be pushed to when it
/// overlaps nothing.
pub const MAX_MEM_COMPACT_LEVEL: usize = 2;

/// Approximate gap in bytes between read samples taken during iteration.
pub const READ_BYTES_PERIOD: usize = 1_048_576;

// ------------------------------------------------------------------------------------------------
// Error type
// ------------------------------------------------------------------------------------------------

/// Errors returned by [`LevelConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid configuration parameter.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

// ------------------------------------------------------------------------------------------------
// Configuration
// ------------------------------------------------------------------------------------------------

/// Level-structure parameters handed to downstream subsystems.
///
/// All fields default to the module constants.
///
/// # Example
///
/// ```rust
/// use mvkeyformat::config::LevelConfig;
///
/// let config = LevelConfig {
///     l0_compaction_trigger: 4,
///     l0_slowdown_writes_trigger: 8,
///     l0_stop_writes_trigger: 12,
///     ..LevelConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelConfig {
    /// Number of levels. Must be ≥ 1.
    pub num_levels: usize,

    /// Level-0 file count that triggers compaction. Must be ≥ 1.
    pub l0_compaction_trigger: usize,

    /// Level-0 file count at which writes are slowed down.
    /// Must be ≥ `l0_compaction_trigger`.
    pub l0_slowdown_writes_trigger: usize,

    /// Level-0 file count at which writes stop.
    /// Must be ≥ `l0_slowdown_writes_trigger`.
    pub l0_stop_writes_trigger: usize,

    /// Deepest level for memtable output. Must be < `num_levels`.
    pub max_mem_compact_level: usize,

    /// Bytes between read samples. Must be > 0.
    pub read_bytes_period: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            num_levels: NUM_LEVELS,
            l0_compaction_trigger: L0_COMPACTION_TRIGGER,
            l0_slowdown_writes_trigger: L0_SLOWDOWN_WRITES_TRIGGER,
            l0_stop_writes_trigger: L0_STOP_WRITES_TRIGGER,
            max_mem_compact_level: MAX_MEM_COMPACT_LEVEL,
            read_bytes_period: READ_BYTES_PERIOD,
        }
    }
}

impl LevelConfig {
    /// Validates all configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = self.check();
        match &result {
            Ok(()) => info!(
                num_levels = self.num_levels,
                l0_compaction_trigger = self.l0_compaction_trigger,
                "level config validated"
            ),
            Err(e) => error!("rejected level config: {e}"),
        }
        result
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.num_levels < 1 {
            return Err(ConfigError::InvalidConfig("num_levels must be >= 1".into()));
        }
        if self.l0_compaction_trigger < 1 {
            return Err(ConfigError::InvalidConfig("l0_compaction_trigger must be >= 1".into()));
        }
        if self.l0_slowdown_writes_trigger < self.l0_compaction_trigger {
            return Err(ConfigError::InvalidConfig(
                "l0_slowdown_writes_trigger must be >= l0_compaction_trigger".into(),
            ));
        }
        if self.l0_stop_writes_trigger < self.l0_slowdown_writes_trigger {
            return Err(ConfigError::InvalidConfig(
                "l0_stop_writes_trigger must be >= l0_slowdown_writes_trigger".into(),
            ));
        }
        if self.max_mem_compact_level >= self.num_levels {
            return Err(ConfigError::InvalidConfig(
                "max_mem_compact_level must be < num_levels".into(),
            ));
        }
        if self.read_bytes_period == 0 {
            return Err(ConfigError::InvalidConfig("read_bytes_period must be > 0".into()));
        }
        Ok(())
    }
}
