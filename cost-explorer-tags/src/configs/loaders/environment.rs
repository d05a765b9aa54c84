use std::{env, fmt::Display, str::FromStr};

pub fn optional_env(env_name: &str) -> Option<String> {
    env::var(env_name).ok()
}

pub fn env_or(env_name: &str, default: &str) -> String {
    optional_env(env_name).unwrap_or_else(|| default.to_string())
}

/// Parses the variable when set, an unparsable value is an error rather than
/// a silent fallback to `default`.
pub fn parse_env_or<T>(env_name: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    match optional_env(env_name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| format!("Invalid value for environment variable '{env_name}': {e}")),
        None => Ok(default),
    }
}
