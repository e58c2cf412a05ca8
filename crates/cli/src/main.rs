mod inspect;

use anyhow::{Context, Result};
use declarg::{Arg, Arity, ParseOutcome, Parser, ParserConfig};
use std::{io, path::PathBuf, process::ExitCode};
use tracing_subscriber::{EnvFilter, fmt};

use crate::inspect::{Inventory, inspect_file, parse_line_window};

/// Path to a JSON parser config replacing the built-in one.
const CONFIG_ENV: &str = "DECLARG_DEMO_CONFIG";
/// Prefix for per-field overrides (`DECLARG_DEMO_NAME`, `DECLARG_DEMO_VERSION`, ...).
const ENV_PREFIX: &str = "DECLARG_DEMO";

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run())
}

async fn run() -> Result<ExitCode> {
    let config = load_config()?;
    let inventory = Inventory::default();
    let parser = build_parser(config, &inventory)?;

    let result = parser.parse_env().await;
    let code = declarg::report(&result, &mut io::stdout().lock(), &mut io::stderr().lock())?;

    if let Ok(ParseOutcome::Matches(arguments)) = &result {
        tracing::debug!(arguments = arguments.len(), "parse finished");
        if !arguments.is_present("quiet") {
            print!("{}", inventory.summary(arguments).render()?);
        }
    }

    Ok(code)
}

fn load_config() -> Result<ParserConfig> {
    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => ParserConfig::from_file(PathBuf::from(path))?,
        None => ParserConfig::new("declarg-demo")
            .with_version(env!("CARGO_PKG_VERSION"))
            .with_description("Count lines and bytes of files.")
            .with_help_text(
                "Examples:\n  declarg-demo --input Cargo.toml src/main.rs --exclude target\n  declarg-demo -i notes.txt --format json",
            ),
    };
    let config = config.merge_env(ENV_PREFIX);
    config.validate().context("invalid parser config")?;
    Ok(config)
}

fn build_parser(config: ParserConfig, inventory: &Inventory) -> Result<Parser> {
    let mut parser = Parser::new(config);

    let files = inventory.clone();
    let formats = inventory.clone();
    let windows = inventory.clone();

    parser
        .register(
            Arg::new("input")
                .short("i")
                .arity(Arity::Unbounded)
                .description("Files to inspect")
                .callback(move |paths, _ctx| {
                    let files = files.clone();
                    async move {
                        for path in paths {
                            let entry = inspect_file(&path).await?;
                            tracing::debug!(path = %entry.path, bytes = entry.bytes, "inspected file");
                            files.add_file(entry);
                        }
                        anyhow::Ok(())
                    }
                }),
        )?
        .register(
            Arg::new("exclude")
                .short("e")
                .arity(Arity::Unbounded)
                .description("Skip files whose path contains any of these patterns"),
        )?
        .register(
            Arg::new("lines")
                .short("l")
                .arity(Arity::Exactly(2))
                .description("Only report files with <min>..=<max> lines")
                .on_match(move |values, _ctx| {
                    windows.set_line_window(parse_line_window(values)?);
                    Ok(())
                }),
        )?
        .register(
            Arg::new("format")
                .short("f")
                .arity(Arity::Exactly(1))
                .description("Output format: text or json")
                .required(true)
                .default_value("text")
                .on_match(move |values, _ctx| {
                    let raw = values.first().context("missing format value")?;
                    formats.set_format(raw.parse()?);
                    Ok(())
                }),
        )?
        .register(
            Arg::new("quiet")
                .short("q")
                .description("Parse and validate only; print nothing"),
        )?;

    Ok(parser)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
