use std::fs;

pub fn load(path: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read lookup document '{path}': {e}"))
}
