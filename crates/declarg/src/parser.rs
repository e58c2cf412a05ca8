use std::ffi::OsString;
use std::sync::Arc;

use crate::arg::{Action, Arg, ArgValue};
use crate::arity::{self, Resolved};
use crate::config::ParserConfig;
use crate::context::{ParseContext, ParsedArguments};
use crate::error::ParseError;
use crate::help;
use crate::registry::{Registry, RegistryError};

const HELP_NAME: &str = "help";
const HELP_SHORT: &str = "h";
const VERSION_NAME: &str = "version";
const VERSION_SHORT: &str = "v";

/// Successful end of a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Every token was consumed and every required argument has a value.
    Matches(ParsedArguments),
    /// `--help` was seen; carries the rendered help text.
    Help(String),
    /// `--version` was seen; carries the rendered version text.
    Version(String),
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Matches(_))
    }

    pub fn help_requested(&self) -> bool {
        matches!(self, Self::Help(_))
    }

    pub fn version_requested(&self) -> bool {
        matches!(self, Self::Version(_))
    }

    pub fn matches(&self) -> Option<&ParsedArguments> {
        match self {
            Self::Matches(m) => Some(m),
            Self::Help(_) | Self::Version(_) => None,
        }
    }

    pub fn into_matches(self) -> Option<ParsedArguments> {
        match self {
            Self::Matches(m) => Some(m),
            Self::Help(_) | Self::Version(_) => None,
        }
    }
}

pub type ParseResult = Result<ParseOutcome, ParseError>;

/// Convert process arguments to tokens, failing on the first one that is not
/// valid UTF-8.
pub(crate) fn os_tokens<I>(args: I) -> Result<Vec<String>, ParseError>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string().map_err(|raw| {
                ParseError::InvalidEncoding(raw.to_string_lossy().into_owned())
            })
        })
        .collect()
}

/// Process arguments without the program name.
pub(crate) fn env_tokens() -> Result<Vec<String>, ParseError> {
    os_tokens(std::env::args_os().skip(1))
}

/// Argument registry plus the parse/dispatch engine.
///
/// A new parser already knows `--help`/`-h`, and `--version`/`-v` when the
/// config carries a version. Registering anything that collides with those
/// fails like any other duplicate.
#[derive(Debug)]
pub struct Parser {
    config: ParserConfig,
    registry: Registry,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        let mut registry = Registry::new();
        registry.insert(
            Arg::new(HELP_NAME)
                .short(HELP_SHORT)
                .description("Show help information")
                .with_action(Action::Help),
        );
        if config.version().is_some() {
            registry.insert(
                Arg::new(VERSION_NAME)
                    .short(VERSION_SHORT)
                    .description("Show version information")
                    .with_action(Action::Version),
            );
        }
        Self { config, registry }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register an argument. Chainable:
    ///
    /// ```
    /// # use declarg::{Arg, Arity, Parser, ParserConfig};
    /// let mut parser = Parser::new(ParserConfig::new("tool"));
    /// parser
    ///     .register(Arg::new("verbose").short("V"))?
    ///     .register(Arg::new("file").short("f").arity(Arity::Exactly(1)))?;
    /// # Ok::<(), declarg::RegistryError>(())
    /// ```
    pub fn register(&mut self, arg: Arg) -> Result<&mut Self, RegistryError> {
        self.registry.register(arg)?;
        Ok(self)
    }

    /// Rendered help document.
    pub fn help(&self) -> String {
        help::render_help(&self.config, &self.registry)
    }

    /// Rendered version line.
    pub fn version(&self) -> String {
        help::render_version(&self.config)
    }

    /// Parse the process arguments (without the program name).
    ///
    /// An argument that is not valid UTF-8 fails with
    /// [`ParseError::InvalidEncoding`] before anything is dispatched.
    pub async fn parse_env(&self) -> ParseResult {
        let tokens = env_tokens()?;
        self.parse(tokens).await
    }

    /// Walk `tokens` left to right, recording values and awaiting callbacks.
    ///
    /// Stops at the first unknown argument, short value list or failing
    /// callback. After the walk, required arguments that were never matched
    /// are filled from their defaults (their callbacks receive the default)
    /// or reported missing.
    pub async fn parse<I, S>(&self, tokens: I) -> ParseResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Arc<[String]> = tokens.into_iter().map(Into::into).collect();
        let mut ctx = ParseContext::new(self.config.name(), Arc::clone(&tokens));
        tracing::debug!(command = %self.config.name(), tokens = tokens.len(), "parsing arguments");

        let mut i = 0usize;
        while i < tokens.len() {
            let token = tokens[i].as_str();
            if token.is_empty() {
                i += 1;
                continue;
            }

            let Some(arg) = self.lookup(token)? else {
                tracing::debug!(token, "skipping bare token");
                i += 1;
                continue;
            };

            let Resolved { values, next } =
                arity::resolve(arg, &tokens, i + 1).map_err(|source| {
                    ParseError::InsufficientValues {
                        flag: arg.long_name().to_string(),
                        source,
                    }
                })?;

            tracing::debug!(flag = %arg.long_name(), values = values.len(), "matched argument");
            ctx.record(
                arg.long_name(),
                ArgValue::normalize(arg.get_arity(), values.clone()),
            );
            ctx.advance_to(next);

            if let Some(outcome) = self.dispatch(arg, values, &ctx).await? {
                return Ok(outcome);
            }
            i = next;
        }

        self.apply_required(&mut ctx).await?;
        Ok(ParseOutcome::Matches(ctx.into_parsed()))
    }

    /// Classify `token` by prefix. `Ok(None)` means a bare token.
    fn lookup(&self, token: &str) -> Result<Option<&Arg>, ParseError> {
        if let Some(long) = token.strip_prefix("--") {
            return self
                .registry
                .by_long_name(long)
                .map(Some)
                .ok_or_else(|| ParseError::UnknownArgument(token.to_string()));
        }

        let Some(short) = token.strip_prefix('-').filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let long = self
            .registry
            .by_short_name(short)
            .ok_or_else(|| ParseError::UnknownArgument(token.to_string()))?;
        self.registry.by_long_name(long).map(Some).ok_or_else(|| {
            ParseError::Internal(format!(
                "short flag -{short} maps to unregistered argument --{long}"
            ))
        })
    }

    /// Run the argument's action. Built-ins end the parse with their outcome.
    async fn dispatch(
        &self,
        arg: &Arg,
        values: Vec<String>,
        ctx: &ParseContext,
    ) -> Result<Option<ParseOutcome>, ParseError> {
        match arg.action() {
            Action::Record => Ok(None),
            Action::Help => Ok(Some(ParseOutcome::Help(self.help()))),
            Action::Version => Ok(Some(ParseOutcome::Version(self.version()))),
            Action::Callback(callback) => {
                callback(values, ctx.clone()).await.map_err(|err| {
                    tracing::warn!(flag = %arg.long_name(), error = %err, "argument callback failed");
                    ParseError::CallbackFailure {
                        flag: arg.long_name().to_string(),
                        message: format!("{err:#}"),
                    }
                })?;
                Ok(None)
            }
        }
    }

    /// Fill unmatched required arguments from their defaults.
    ///
    /// The first required argument (in registration order) with neither a
    /// value nor a default fails the parse before any default is applied.
    async fn apply_required(&self, ctx: &mut ParseContext) -> Result<(), ParseError> {
        let pending: Vec<&Arg> = self
            .registry
            .iter()
            .filter(|a| a.is_required() && !ctx.parsed_arguments().is_present(a.long_name()))
            .collect();

        if let Some(missing) = pending.iter().find(|a| a.get_default_value().is_none()) {
            return Err(ParseError::MissingRequiredArgument(
                missing.long_name().to_string(),
            ));
        }

        for arg in pending {
            let Some(default_value) = arg.get_default_value() else {
                continue;
            };
            tracing::debug!(flag = %arg.long_name(), "filling required argument from default");
            ctx.record(arg.long_name(), default_value.clone());
            self.dispatch(arg, default_value.to_tokens(), ctx).await?;
        }
        Ok(())
    }
}
