// src/config.rs
// Environment knobs shared by the CLI and the dev tools.

use std::{env, path::PathBuf};

use crate::highlight::PLAIN_TEXT;

/// Unset means `default`; `0` and `false` mean off, anything else on.
pub fn env_flag_true(var: &str, default: bool) -> bool {
    env::var(var)
        .map(|v| !(v == "0" || v.eq_ignore_ascii_case("false")))
        .unwrap_or(default)
}

pub fn env_usize(var: &str, default: usize) -> usize {
    env::var(var)
        .ok()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

pub fn env_u64(var: &str, default: u64) -> u64 {
    env::var(var)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `SYNHL_GRAMMAR_DIR`: extra grammar JSON files for the CLI.
    pub grammar_dir: Option<PathBuf>,
    /// `SYNHL_WRAP_PRE`: wrap CLI output in a `<pre>` block.
    pub wrap_pre: bool,
    /// `SYNHL_LANGUAGE`: language when neither an argument nor the file
    /// extension names one.
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grammar_dir: None,
            wrap_pre: false,
            language: PLAIN_TEXT.to_owned(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let grammar_dir = env::var_os("SYNHL_GRAMMAR_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let language = env::var("SYNHL_LANGUAGE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| PLAIN_TEXT.to_owned());
        Self {
            grammar_dir,
            wrap_pre: env_flag_true("SYNHL_WRAP_PRE", false),
            language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Variables are unique per test; tests in this module run in parallel.

    #[test]
    fn unset_variables_use_defaults() {
        assert!(env_flag_true("SYNHL_TEST_UNSET_FLAG", true));
        assert!(!env_flag_true("SYNHL_TEST_UNSET_FLAG", false));
        assert_eq!(env_usize("SYNHL_TEST_UNSET_USIZE", 7), 7);
        assert_eq!(env_u64("SYNHL_TEST_UNSET_U64", 9), 9);
    }

    #[test]
    fn flag_values() {
        for (v, want) in [("0", false), ("false", false), ("FALSE", false), ("1", true), ("yes", true)] {
            unsafe { env::set_var("SYNHL_TEST_FLAG", v) };
            assert_eq!(env_flag_true("SYNHL_TEST_FLAG", !want), want, "{v}");
        }
        unsafe { env::remove_var("SYNHL_TEST_FLAG") };
    }

    #[test]
    fn bad_numbers_fall_back() {
        unsafe { env::set_var("SYNHL_TEST_NUM", "lots") };
        assert_eq!(env_usize("SYNHL_TEST_NUM", 3), 3);
        unsafe { env::set_var("SYNHL_TEST_NUM", " 12 ") };
        assert_eq!(env_u64("SYNHL_TEST_NUM", 3), 12);
        unsafe { env::remove_var("SYNHL_TEST_NUM") };
    }

    #[test]
    fn default_settings() {
        let s = Settings::default();
        assert_eq!(s.language, "Plain Text");
        assert!(!s.wrap_pre);
        assert!(s.grammar_dir.is_none());
    }
}
