pub mod count;
pub mod doctor;
pub mod drag;
pub mod gateway;
pub mod onboard;
pub mod rewrite;
pub mod status;

use std::io::Read;
use std::path::Path;

/// Read the source text from `file`, or from stdin when absent.
pub fn read_source(file: Option<&Path>) -> Result<String, Box<dyn std::error::Error>> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()).into()),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
