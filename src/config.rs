use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::search::eval::EvalConfig;
use crate::search::tt::DEFAULT_ENTRIES;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Transposition table slots, allocated once per engine.
    pub tt_entries: usize,
    /// A decision may spend `remaining / time_divisor`.
    pub time_divisor: u32,
    pub max_depth: u32,
    pub use_tt: bool,
    pub eval: EvalConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tt_entries: DEFAULT_ENTRIES,
            time_divisor: 30,
            max_depth: 50,
            use_tt: true,
            eval: EvalConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| Error::ConfigIo { path: path.to_path_buf(), source })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tt_entries == 0 { return Err(Error::InvalidConfig("tt_entries must be positive".into())); }
        if self.time_divisor == 0 { return Err(Error::InvalidConfig("time_divisor must be positive".into())); }
        if self.max_depth == 0 { return Err(Error::InvalidConfig("max_depth must be positive".into())); }
        Ok(())
    }
}
