use crate::core::SpeedingViolation;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// Reads violations from JSON files; a file holds either one violation object or an array of them.
pub fn load_violations<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SpeedingViolation>> {
    let mut violations = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let json: serde_json::Value = serde_json::from_slice(&data)?;

        match json {
            serde_json::Value::Array(items) => {
                for item in items {
                    violations.push(serde_json::from_value(item)?);
                }
            }
            single => violations.push(serde_json::from_value(single)?),
        }
        tracing::debug!("Loaded violations from {}", path.display());
    }

    Ok(violations)
}
