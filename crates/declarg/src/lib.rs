//! Declarative argument registration, parsing and callback dispatch.
//!
//! Register named arguments with an [`Arity`] and an optional async callback,
//! then hand the parser a flat list of string tokens:
//! - `--<long>` and `-<short>` are the only flag forms
//! - values follow their flag as separate tokens and never start with `-`
//! - callbacks run one at a time, in token order
//! - required arguments that never appear fall back to their default
//!
//! ```
//! use declarg::{Arg, Arity, Parser, ParserConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut parser = Parser::new(ParserConfig::new("tool").with_version("1.0.0"));
//! parser
//!     .register(Arg::new("verbose").description("Verbose output"))?
//!     .register(
//!         Arg::new("file")
//!             .short("f")
//!             .arity(Arity::Exactly(1))
//!             .callback(|values, _ctx| async move {
//!                 println!("file: {}", values[0]);
//!                 Ok(())
//!             }),
//!     )?;
//!
//! let outcome = parser.parse(["--file", "test.txt", "--verbose"]).await?;
//! let matches = outcome.matches().expect("no --help or --version given");
//! assert_eq!(matches.get_str("file"), Some("test.txt"));
//! # Ok(()) }
//! ```

mod arg;
pub mod arity;
mod config;
mod context;
mod error;
pub mod help;
mod parser;
mod registry;
mod run;

pub use arg::{Arg, ArgValue, Arity, Callback, CallbackFuture};
pub use config::ParserConfig;
pub use context::{ParseContext, ParsedArguments};
pub use error::ParseError;
pub use parser::{ParseOutcome, ParseResult, Parser};
pub use registry::{Registry, RegistryError};
pub use run::{HELP_HINT, report};
