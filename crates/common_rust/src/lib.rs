pub mod env {
    use std::{fmt::Display, str::FromStr};

    /// Required environment variable is not set (or is not valid unicode).
    /// Only the variable name is kept, never its value.
    #[derive(Debug, PartialEq, Eq)]
    pub struct MissingVar(pub String);

    impl Display for MissingVar {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "Environment variable {} not provided", self.0)
        }
    }

    impl std::error::Error for MissingVar {}

    pub fn get(key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    pub fn get_or<S: AsRef<str>>(key: &str, default: S) -> String {
        std::env::var(key).unwrap_or_else(|_| default.as_ref().to_owned())
    }

    pub fn get_parsed_or<T: FromStr>(key: &str, default: T) -> T {
        match std::env::var(key) {
            Ok(var) => var.parse::<T>().unwrap_or(default),
            Err(_) => default,
        }
    }

    /// Like [get], but blank values count as missing
    pub fn require(key: &str) -> Result<String, MissingVar> {
        get(key)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| MissingVar(key.to_owned()))
    }

}
