use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};
use serde::{Deserialize, Serialize};

use crate::context::ParseContext;

/// Future returned by an argument callback.
pub type CallbackFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Callback invoked with the collected value tokens and a snapshot of the
/// parse so far (including the value just recorded for this argument).
pub type Callback = Arc<dyn Fn(Vec<String>, ParseContext) -> CallbackFuture + Send + Sync>;

/// Number of value tokens an argument consumes.
///
/// Serialized as an integer: `0` for a flag, `N` for exactly `N` values and
/// `-1` for an unbounded list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Arity {
    /// No values; presence alone is the value.
    #[default]
    Flag,
    /// Exactly this many values.
    Exactly(usize),
    /// Every following token up to the next flag-like token.
    Unbounded,
}

impl Arity {
    /// Fixed arity of `n` values (`0` is a flag).
    pub fn values(n: usize) -> Self {
        if n == 0 { Self::Flag } else { Self::Exactly(n) }
    }

    /// Decode the integer form (`0`, `N > 0`, `-1`).
    pub fn from_count(count: i64) -> Option<Self> {
        match count {
            -1 => Some(Self::Unbounded),
            0 => Some(Self::Flag),
            n if n > 0 => usize::try_from(n).ok().map(Self::Exactly),
            _ => None,
        }
    }

    /// Integer form of this arity.
    pub fn count(self) -> i64 {
        match self {
            Self::Flag => 0,
            Self::Exactly(n) => i64::try_from(n).unwrap_or(i64::MAX),
            Self::Unbounded => -1,
        }
    }

    pub fn is_flag(self) -> bool {
        matches!(self, Self::Flag | Self::Exactly(0))
    }
}

impl TryFrom<i64> for Arity {
    type Error = String;

    fn try_from(count: i64) -> Result<Self, Self::Error> {
        Self::from_count(count)
            .ok_or_else(|| format!("invalid arity {count} (expected 0, a positive count or -1)"))
    }
}

impl From<Arity> for i64 {
    fn from(arity: Arity) -> Self {
        arity.count()
    }
}

/// A recorded argument value.
///
/// Flags record `true`, single-value arguments record the bare string and
/// everything else records the ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Flag(bool),
    Single(String),
    Multiple(Vec<String>),
}

impl ArgValue {
    /// Shape the collected tokens according to `arity`.
    pub fn normalize(arity: Arity, mut values: Vec<String>) -> Self {
        match arity {
            Arity::Flag | Arity::Exactly(0) => Self::Flag(true),
            Arity::Exactly(1) if values.len() == 1 => Self::Single(values.remove(0)),
            Arity::Exactly(_) | Arity::Unbounded => Self::Multiple(values),
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Single(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[String]> {
        match self {
            Self::Multiple(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Value tokens a callback receives for this value.
    pub fn to_tokens(&self) -> Vec<String> {
        match self {
            Self::Flag(_) => Vec::new(),
            Self::Single(s) => vec![s.clone()],
            Self::Multiple(v) => v.clone(),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{b}"),
            Self::Single(s) => f.write_str(s),
            Self::Multiple(v) => f.write_str(&v.join(" ")),
        }
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        Self::Single(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(v: Vec<String>) -> Self {
        Self::Multiple(v)
    }
}

impl From<Vec<&str>> for ArgValue {
    fn from(v: Vec<&str>) -> Self {
        Self::Multiple(v.into_iter().map(str::to_string).collect())
    }
}

#[derive(Clone)]
pub(crate) enum Action {
    Record,
    Callback(Callback),
    Help,
    Version,
}

/// Argument definition.
///
/// Built with the `Arg::new(..)` builder and handed to
/// [`Parser::register`](crate::Parser::register). Once registered it is never
/// modified.
#[derive(Clone)]
pub struct Arg {
    long_name: String,
    short_name: Option<String>,
    description: String,
    arity: Arity,
    required: bool,
    default_value: Option<ArgValue>,
    action: Action,
}

impl Arg {
    /// New flag argument matched by `--<long_name>`.
    pub fn new(long_name: impl Into<String>) -> Self {
        Self {
            long_name: long_name.into(),
            short_name: None,
            description: String::new(),
            arity: Arity::Flag,
            required: false,
            default_value: None,
            action: Action::Record,
        }
    }

    /// Single-token alias matched by `-<short>`.
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short_name = Some(short.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Value recorded when a required argument is never matched.
    pub fn default_value(mut self, value: impl Into<ArgValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Attach an async callback.
    ///
    /// The parser awaits the returned future before it looks at the next
    /// token, so callbacks never overlap.
    pub fn callback<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Vec<String>, ParseContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.action = Action::Callback(Arc::new(move |values: Vec<String>, ctx: ParseContext| {
            f(values, ctx).boxed()
        }));
        self
    }

    /// Attach a synchronous callback.
    pub fn on_match<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String], &ParseContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.action = Action::Callback(Arc::new(move |values: Vec<String>, ctx: ParseContext| {
            future::ready(f(&values, &ctx)).boxed()
        }));
        self
    }

    pub(crate) fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn get_arity(&self) -> Arity {
        self.arity
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn get_default_value(&self) -> Option<&ArgValue> {
        self.default_value.as_ref()
    }

    pub(crate) fn action(&self) -> &Action {
        &self.action
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            Action::Record => "record",
            Action::Callback(_) => "callback",
            Action::Help => "help",
            Action::Version => "version",
        };
        f.debug_struct("Arg")
            .field("long_name", &self.long_name)
            .field("short_name", &self.short_name)
            .field("description", &self.description)
            .field("arity", &self.arity)
            .field("required", &self.required)
            .field("default_value", &self.default_value)
            .field("action", &action)
            .finish()
    }
}
