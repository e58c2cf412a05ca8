//! Help and version text.

use crate::arg::{Arg, Arity};
use crate::config::ParserConfig;
use crate::registry::Registry;

fn value_indicator(arity: Arity) -> String {
    match arity {
        Arity::Flag | Arity::Exactly(0) => String::new(),
        Arity::Exactly(1) => "<value>".to_string(),
        Arity::Exactly(n) => (1..=n)
            .map(|i| format!("<value{i}>"))
            .collect::<Vec<_>>()
            .join(" "),
        Arity::Unbounded => "<values...>".to_string(),
    }
}

fn format_arg_help(arg: &Arg) -> String {
    let mut out = arg.get_description().trim().to_string();
    if arg.is_required() {
        if out.is_empty() {
            out.push_str("(required)");
        } else {
            out.push_str(" (required)");
        }
    }
    if let Some(default_value) = arg.get_default_value() {
        if out.is_empty() {
            out.push_str(&format!("[default: {default_value}]"));
        } else {
            out.push_str(&format!(" [default: {default_value}]"));
        }
    }
    out
}

/// Render the help document for `registry`.
///
/// The long-flag column is as wide as the longest registered long name.
pub fn render_help(config: &ParserConfig, registry: &Registry) -> String {
    let mut out = String::new();
    match config.version() {
        Some(version) => out.push_str(&format!("{} v{}\n", config.name(), version)),
        None => {
            out.push_str(config.name());
            out.push('\n');
        }
    }

    if let Some(description) = config.description() {
        out.push('\n');
        out.push_str(description);
        out.push('\n');
    }

    if let Some(author) = config.author() {
        out.push_str(&format!("\nAuthor: {author}\n"));
    }

    out.push_str(&format!("\nUsage: {} [options]\n", config.name()));

    if let Some(text) = config.help_text() {
        out.push('\n');
        out.push_str(text);
        out.push('\n');
    }

    if registry.is_empty() {
        return out;
    }

    out.push_str("\nOptions:\n");
    let long_width = registry
        .iter()
        .map(|a| a.long_name().len())
        .max()
        .unwrap_or(0);
    let rows: Vec<(String, String, String)> = registry
        .iter()
        .map(|a| {
            let short = a
                .short_name()
                .map(|s| format!("-{s}, "))
                .unwrap_or_default();
            (short, value_indicator(a.get_arity()), format_arg_help(a))
        })
        .collect();
    let short_width = rows.iter().map(|(s, _, _)| s.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, v, _)| v.len()).max().unwrap_or(0);

    for (arg, (short, values, help)) in registry.iter().zip(rows) {
        let line = format!(
            "  {short:short_width$}--{long:long_width$}  {values:value_width$}  {help}",
            long = arg.long_name(),
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

/// Render `name VERSION` (or just the name when no version is configured).
pub fn render_version(config: &ParserConfig) -> String {
    match config.version() {
        Some(version) => format!("{} {}\n", config.name(), version),
        None => format!("{}\n", config.name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(args: Vec<Arg>) -> Registry {
        let mut registry = Registry::new();
        for arg in args {
            registry.register(arg).unwrap();
        }
        registry
    }

    #[test]
    fn header_includes_metadata() {
        let config = ParserConfig::new("tool")
            .with_version("1.0.0")
            .with_description("Does things.")
            .with_author("Jane Doe")
            .with_help_text("Examples:\n  tool --verbose");
        let text = render_help(&config, &Registry::new());

        assert!(text.starts_with("tool v1.0.0\n"));
        assert!(text.contains("\nDoes things.\n"));
        assert!(text.contains("Author: Jane Doe"));
        assert!(text.contains("Usage: tool [options]"));
        assert!(text.contains("  tool --verbose"));
        assert!(!text.contains("Options:"));
    }

    #[test]
    fn rows_are_aligned_and_annotated() {
        let reg = registry(vec![
            Arg::new("verbose").short("V").description("Verbose output"),
            Arg::new("output-file")
                .arity(Arity::Exactly(1))
                .description("Where to write")
                .required(true)
                .default_value("out.txt"),
            Arg::new("range").short("r").arity(Arity::Exactly(2)),
            Arg::new("exclude").arity(Arity::Unbounded).required(true),
        ]);
        let text = render_help(&ParserConfig::new("tool"), &reg);
        let lines: Vec<&str> = text.lines().collect();

        let verbose = lines.iter().find(|l| l.contains("--verbose")).unwrap();
        let output = lines.iter().find(|l| l.contains("--output-file")).unwrap();
        let range = lines.iter().find(|l| l.contains("--range")).unwrap();
        let exclude = lines.iter().find(|l| l.contains("--exclude")).unwrap();

        assert!(verbose.starts_with("  -V, --verbose"));
        assert!(output.starts_with("      --output-file  <value>"));
        assert!(output.ends_with("Where to write (required) [default: out.txt]"));
        assert!(range.contains("<value1> <value2>"));
        assert!(exclude.contains("<values...>"));
        assert!(exclude.ends_with("(required)"));

        // Descriptions start in the same column.
        let col = |line: &str, needle: &str| line.find(needle).unwrap();
        assert_eq!(col(verbose, "Verbose"), col(output, "Where"));
    }

    #[test]
    fn version_text() {
        assert_eq!(
            render_version(&ParserConfig::new("tool").with_version("0.3.0")),
            "tool 0.3.0\n"
        );
        assert_eq!(render_version(&ParserConfig::new("tool")), "tool\n");
    }
}
