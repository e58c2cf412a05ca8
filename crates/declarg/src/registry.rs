use std::collections::HashMap;

use indexmap::IndexMap;
use thiserror::Error;

use crate::arg::Arg;

/// Registration-time failures.
///
/// A failed registration leaves the registry exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("argument --{0} is already registered")]
    DuplicateLongName(String),

    #[error("short flag -{0} is already registered")]
    DuplicateShortName(String),

    #[error("invalid argument name: '{0}'")]
    InvalidName(String),
}

/// Ordered set of argument definitions keyed by long name, plus the
/// short-name alias table.
#[derive(Debug, Default)]
pub struct Registry {
    args: IndexMap<String, Arg>,
    shorts: HashMap<String, String>,
}

fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('-') && !name.chars().any(char::is_whitespace)
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition.
    ///
    /// Fails if the long name or short name is already taken.
    pub fn register(&mut self, arg: Arg) -> Result<(), RegistryError> {
        if !valid_name(arg.long_name()) {
            return Err(RegistryError::InvalidName(arg.long_name().to_string()));
        }
        if self.args.contains_key(arg.long_name()) {
            return Err(RegistryError::DuplicateLongName(arg.long_name().to_string()));
        }
        if let Some(short) = arg.short_name() {
            if !valid_name(short) {
                return Err(RegistryError::InvalidName(short.to_string()));
            }
            if self.shorts.contains_key(short) {
                return Err(RegistryError::DuplicateShortName(short.to_string()));
            }
        }

        tracing::trace!(long = %arg.long_name(), short = ?arg.short_name(), "registered argument");
        self.insert(arg);
        Ok(())
    }

    /// Insert without the uniqueness checks. Only for the built-in entries a
    /// fresh registry starts with.
    pub(crate) fn insert(&mut self, arg: Arg) {
        if let Some(short) = arg.short_name() {
            self.shorts
                .insert(short.to_string(), arg.long_name().to_string());
        }
        self.args.insert(arg.long_name().to_string(), arg);
    }

    pub fn by_long_name(&self, long: &str) -> Option<&Arg> {
        self.args.get(long)
    }

    /// Long name registered for a short alias.
    pub fn by_short_name(&self, short: &str) -> Option<&str> {
        self.shorts.get(short).map(String::as_str)
    }

    pub fn contains(&self, long: &str) -> bool {
        self.args.contains_key(long)
    }

    /// Definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.args.values()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}
