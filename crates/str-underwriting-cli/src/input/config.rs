use std::path::Path;

use str_underwriting_core::underwriting::assumptions::Assumptions;

use super::file;

/// Load assumptions from `--assumptions`, or the built-in defaults.
///
/// `.yaml`/`.yml` files are parsed as YAML, anything else as JSON. Keys left
/// out of the file keep their default values.
pub fn load_assumptions(path: Option<&str>) -> Result<Assumptions, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(Assumptions::default());
    };

    let (resolved, contents) = file::read_text(path)?;
    let assumptions = parse_assumptions(&resolved, &contents)
        .map_err(|e| format!("Failed to parse assumptions '{}': {}", resolved.display(), e))?;
    assumptions.validate()?;

    tracing::debug!(path = %resolved.display(), "loaded assumptions");
    Ok(assumptions)
}

fn parse_assumptions(
    path: &Path,
    contents: &str,
) -> Result<Assumptions, Box<dyn std::error::Error>> {
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        Ok(serde_yaml::from_str(contents)?)
    } else {
        Ok(serde_json::from_str(contents)?)
    }
}
