use anyhow::{Context, Result, bail};
use declarg::ParsedArguments;
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub path: String,
    pub bytes: u64,
    pub lines: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Json,
}

impl FromStr for Format {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unsupported format '{other}' (expected text or json)"),
        }
    }
}

pub async fn inspect_file(path: &str) -> Result<FileEntry> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {path}"))?;
    Ok(FileEntry {
        path: path.to_string(),
        bytes: bytes.len() as u64,
        lines: bytes.iter().filter(|&&b| b == b'\n').count(),
    })
}

/// Parse a `<min> <max>` line-count window.
pub fn parse_line_window(values: &[String]) -> Result<(usize, usize)> {
    let [min, max] = values else {
        bail!("expected <min> <max>, got {} value(s)", values.len());
    };
    let min: usize = min
        .parse()
        .with_context(|| format!("invalid line bound '{min}'"))?;
    let max: usize = max
        .parse()
        .with_context(|| format!("invalid line bound '{max}'"))?;
    if min > max {
        bail!("line window is empty: {min} > {max}");
    }
    Ok((min, max))
}

#[derive(Debug, Default)]
struct State {
    files: Vec<FileEntry>,
    format: Format,
    lines: Option<(usize, usize)>,
}

/// Collected by argument callbacks while parsing, read once parsing is done.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    state: Arc<Mutex<State>>,
}

impl Inventory {
    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    pub fn add_file(&self, entry: FileEntry) {
        self.with_state(|s| s.files.push(entry));
    }

    pub fn set_format(&self, format: Format) {
        self.with_state(|s| s.format = format);
    }

    pub fn set_line_window(&self, window: (usize, usize)) {
        self.with_state(|s| s.lines = Some(window));
    }

    /// Build the report from collected files, applying `--exclude` patterns
    /// and the line window.
    pub fn summary<'a>(&self, arguments: &'a ParsedArguments) -> Summary<'a> {
        let excludes: &[String] = arguments.get_all("exclude").unwrap_or_default();
        self.with_state(|s| {
            let files: Vec<FileEntry> = s
                .files
                .iter()
                .filter(|f| !excludes.iter().any(|p| f.path.contains(p.as_str())))
                .filter(|f| {
                    s.lines
                        .is_none_or(|(min, max)| (min..=max).contains(&f.lines))
                })
                .cloned()
                .collect();
            Summary {
                format: s.format,
                total_bytes: files.iter().map(|f| f.bytes).sum(),
                total_lines: files.iter().map(|f| f.lines).sum(),
                files,
                arguments,
            }
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary<'a> {
    #[serde(skip)]
    pub format: Format,
    pub files: Vec<FileEntry>,
    pub total_bytes: u64,
    pub total_lines: usize,
    pub arguments: &'a ParsedArguments,
}

impl Summary<'_> {
    pub fn render(&self) -> Result<String> {
        match self.format {
            Format::Json => {
                let mut out = serde_json::to_string_pretty(self)?;
                out.push('\n');
                Ok(out)
            }
            Format::Text => {
                let mut out = String::new();
                for f in &self.files {
                    writeln!(out, "{}: {} lines, {} bytes", f.path, f.lines, f.bytes)?;
                }
                writeln!(
                    out,
                    "total: {} file(s), {} lines, {} bytes",
                    self.files.len(),
                    self.total_lines,
                    self.total_bytes
                )?;
                Ok(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn entry(path: &str, lines: usize) -> FileEntry {
        FileEntry {
            path: path.to_string(),
            bytes: lines as u64 * 10,
            lines,
        }
    }

    #[test]
    fn format_parses_known_values() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        let err = "yaml".parse::<Format>().unwrap_err();
        assert!(err.to_string().contains("unsupported format 'yaml'"));
    }

    #[test]
    fn line_window_validation() {
        assert_eq!(parse_line_window(&strings(&["1", "10"])).unwrap(), (1, 10));
        assert!(parse_line_window(&strings(&["x", "10"])).is_err());
        assert!(parse_line_window(&strings(&["5", "1"])).is_err());
        assert!(parse_line_window(&strings(&["5"])).is_err());
    }

    #[test]
    fn summary_applies_filters() {
        let inventory = Inventory::default();
        inventory.add_file(entry("src/main.rs", 40));
        inventory.add_file(entry("target/out.rs", 20));
        inventory.add_file(entry("README.md", 2));
        inventory.set_line_window((10, 100));

        let arguments = ParsedArguments::default();
        let summary = inventory.summary(&arguments);
        assert_eq!(summary.files.len(), 2);
        assert_eq!(summary.total_lines, 60);

        let text = summary.render().unwrap();
        assert!(text.contains("src/main.rs: 40 lines, 400 bytes"));
        assert!(text.ends_with("total: 2 file(s), 60 lines, 600 bytes\n"));
    }

    #[tokio::test]
    async fn inspect_missing_file_fails_with_path() {
        let err = inspect_file("/definitely/not/here.txt").await.unwrap_err();
        assert!(err.to_string().contains("failed to read /definitely/not/here.txt"));
    }
}
