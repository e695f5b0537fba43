pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a typed document from `--input`, falling back to piped stdin.
/// `None` means neither source supplied anything.
pub fn load<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_document(path)?));
    }
    match stdin::read_stdin()? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}
