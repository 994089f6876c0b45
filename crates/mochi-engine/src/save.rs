//! The save file: healing points and owned furniture, nothing else.
//!
//! The grid and the sleepiness gauge start over every session.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::shop::Placement;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveState {
    pub healing_points: u64,
    pub purchased_furniture: BTreeMap<String, Placement>,
}

impl SaveState {
    /// Read a save file. A missing file is a fresh start, not an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no save file at {}, starting fresh", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let state: Self = serde_json::from_slice(&bytes)?;
        Ok(state)
    }

    /// Write through a sibling temp file and rename, so a crash never leaves half a save.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, path) {
            warn!("could not move {} into place: {e}", tmp.display());
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!("saved {} healing points to {}", self.healing_points, path.display());
        Ok(())
    }
}
