//! Snapshot export.
//!
//! Writes a colony snapshot to pretty-printed JSON and reads it back, so a
//! finished run can be validated later without re-simulating.

use crate::colony::ColonySnapshot;
use soma_core::error::Result;
use std::path::Path;

/// Save a snapshot as JSON. Creates missing parent directories.
pub fn write_snapshot_json(snapshot: &ColonySnapshot, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a snapshot written by [`write_snapshot_json`].
pub fn read_snapshot_json(path: &Path) -> Result<ColonySnapshot> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soma_core::error::SomaError;
    use soma_core::types::*;

    fn snapshot() -> ColonySnapshot {
        ColonySnapshot {
            tick: 12,
            bounds: Bounds::default(),
            cells: vec![
                CellRecord::new(Position::new(1.0, 2.0, 3.0), CellType::POSITIVE),
                CellRecord::new(Position::new(4.5, 5.5, 6.5), CellType::NEGATIVE),
            ],
        }
    }

    #[test]
    fn snapshot_survives_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("final.json");

        write_snapshot_json(&snapshot(), &path).unwrap();
        let loaded = read_snapshot_json(&path).unwrap();
        assert_eq!(loaded, snapshot());
    }

    #[test]
    fn cell_types_are_plain_integers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");
        write_snapshot_json(&snapshot(), &path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["cells"][1]["cell_type"], serde_json::json!(-1));
        assert_eq!(raw["tick"], serde_json::json!(12));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_snapshot_json(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SomaError::Io(_)));
    }

    #[test]
    fn garbage_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_snapshot_json(&path), Err(SomaError::Serialization(_))));
    }
}
