use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::arg::ArgValue;

/// Arguments recorded during a parse, in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParsedArguments {
    values: IndexMap<String, ArgValue>,
}

impl ParsedArguments {
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// Value of a single-value argument.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_str)
    }

    /// Values of a multi-value or unbounded argument.
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(ArgValue::as_slice)
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn insert(&mut self, name: &str, value: ArgValue) {
        self.values.insert(name.to_string(), value);
    }
}

/// Per-parse state handed to callbacks.
///
/// Callbacks get their own copy; only the parser writes to the live context.
/// The token list is shared between copies, so cloning costs one
/// `ParsedArguments` copy.
#[derive(Debug, Clone)]
pub struct ParseContext {
    command: Arc<str>,
    all_args: Arc<[String]>,
    cursor: usize,
    parsed_arguments: ParsedArguments,
}

impl ParseContext {
    pub(crate) fn new(command: &str, args: Arc<[String]>) -> Self {
        Self {
            command: Arc::from(command),
            all_args: args,
            cursor: 0,
            parsed_arguments: ParsedArguments::default(),
        }
    }

    /// Display name of the CLI.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn all_args(&self) -> &[String] {
        &self.all_args
    }

    /// Tokens after the values of the argument most recently dispatched.
    pub fn remaining_args(&self) -> &[String] {
        self.all_args.get(self.cursor..).unwrap_or_default()
    }

    pub fn parsed_arguments(&self) -> &ParsedArguments {
        &self.parsed_arguments
    }

    pub(crate) fn record(&mut self, name: &str, value: ArgValue) {
        self.parsed_arguments.insert(name, value);
    }

    pub(crate) fn advance_to(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    pub(crate) fn into_parsed(self) -> ParsedArguments {
        self.parsed_arguments
    }
}

impl Serialize for ParseContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ParseContext", 4)?;
        state.serialize_field("command", self.command())?;
        state.serialize_field("allArgs", self.all_args())?;
        state.serialize_field("remainingArgs", self.remaining_args())?;
        state.serialize_field("parsedArguments", &self.parsed_arguments)?;
        state.end()
    }
}
