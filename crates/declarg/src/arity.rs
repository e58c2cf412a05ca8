//! Value collection for a matched argument.

use std::fmt;

use thiserror::Error;

use crate::arg::{Arg, Arity};

/// Why a fixed-arity argument came up short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortfall {
    EndOfInput,
    /// A flag-like token appeared where a value was expected.
    UnexpectedFlag(String),
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfInput => f.write_str("reached end of input"),
            Self::UnexpectedFlag(token) => write!(f, "unexpected flag '{token}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("requires {required} value(s), but got {found} ({cause})")]
pub struct InsufficientValues {
    pub required: usize,
    pub found: usize,
    pub cause: Shortfall,
}

/// Values collected for one argument and the index of the first token after them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub values: Vec<String>,
    pub next: usize,
}

fn is_flag_like(token: &str) -> bool {
    token.starts_with('-')
}

/// Collect the values `arg` needs from `tokens`, starting at `start`.
///
/// A token starting with `-` is never taken as a value. An empty token counts
/// as absent, the same as the end of input.
pub fn resolve(arg: &Arg, tokens: &[String], start: usize) -> Result<Resolved, InsufficientValues> {
    let rest = tokens.get(start..).unwrap_or_default();

    match arg.get_arity() {
        Arity::Flag | Arity::Exactly(0) => Ok(Resolved {
            values: Vec::new(),
            next: start,
        }),
        Arity::Unbounded => {
            let values: Vec<String> = rest
                .iter()
                .take_while(|t| !t.is_empty() && !is_flag_like(t))
                .cloned()
                .collect();
            tracing::trace!(flag = %arg.long_name(), count = values.len(), "collected unbounded values");
            Ok(Resolved {
                next: start + values.len(),
                values,
            })
        }
        Arity::Exactly(required) => {
            let mut values = Vec::with_capacity(required);
            for offset in 0..required {
                match rest.get(offset).filter(|t| !t.is_empty()) {
                    None => {
                        return Err(InsufficientValues {
                            required,
                            found: values.len(),
                            cause: Shortfall::EndOfInput,
                        });
                    }
                    Some(token) if is_flag_like(token) => {
                        return Err(InsufficientValues {
                            required,
                            found: values.len(),
                            cause: Shortfall::UnexpectedFlag(token.clone()),
                        });
                    }
                    Some(token) => values.push(token.clone()),
                }
            }
            Ok(Resolved {
                values,
                next: start + required,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flag_consumes_nothing() {
        let arg = Arg::new("verbose");
        let argv = tokens(&["--verbose", "file.txt"]);
        let r = resolve(&arg, &argv, 1).unwrap();
        assert!(r.values.is_empty());
        assert_eq!(r.next, 1);
    }

    #[test]
    fn fixed_arity_takes_exact_count() {
        let arg = Arg::new("files").arity(Arity::Exactly(2));
        let argv = tokens(&["--files", "a.txt", "b.txt", "c.txt"]);
        let r = resolve(&arg, &argv, 1).unwrap();
        assert_eq!(r.values, tokens(&["a.txt", "b.txt"]));
        assert_eq!(r.next, 3);
    }

    #[test]
    fn fixed_arity_reports_end_of_input() {
        let arg = Arg::new("files").arity(Arity::Exactly(3));
        let argv = tokens(&["--files", "a.txt"]);
        let err = resolve(&arg, &argv, 1).unwrap_err();
        assert_eq!(
            err,
            InsufficientValues {
                required: 3,
                found: 1,
                cause: Shortfall::EndOfInput,
            }
        );
        assert_eq!(
            err.to_string(),
            "requires 3 value(s), but got 1 (reached end of input)"
        );
    }

    #[test]
    fn fixed_arity_rejects_flag_like_value() {
        let arg = Arg::new("range").arity(Arity::Exactly(2));
        let argv = tokens(&["--range", "1", "-5"]);
        let err = resolve(&arg, &argv, 1).unwrap_err();
        assert_eq!(err.found, 1);
        assert_eq!(err.cause, Shortfall::UnexpectedFlag("-5".to_string()));
    }

    #[test]
    fn unbounded_stops_at_next_flag() {
        let arg = Arg::new("exclude").arity(Arity::Unbounded);
        let argv = tokens(&["--exclude", "a", "b", "--verbose", "c"]);
        let r = resolve(&arg, &argv, 1).unwrap();
        assert_eq!(r.values, tokens(&["a", "b"]));
        assert_eq!(r.next, 3);
    }

    #[test]
    fn empty_token_ends_the_values() {
        let arg = Arg::new("exclude").arity(Arity::Unbounded);
        let argv = tokens(&["--exclude", "a", "", "b"]);
        let r = resolve(&arg, &argv, 1).unwrap();
        assert_eq!(r.values, tokens(&["a"]));
        assert_eq!(r.next, 2);

        let arg = Arg::new("file").arity(Arity::Exactly(1));
        let err = resolve(&arg, &tokens(&["--file", "", "x.txt"]), 1).unwrap_err();
        assert_eq!(err.found, 0);
        assert_eq!(err.cause, Shortfall::EndOfInput);
    }

    #[test]
    fn unbounded_accepts_nothing_at_end() {
        let arg = Arg::new("exclude").arity(Arity::Unbounded);
        let argv = tokens(&["--exclude"]);
        let r = resolve(&arg, &argv, 1).unwrap();
        assert!(r.values.is_empty());
        assert_eq!(r.next, 1);
    }

    #[test]
    fn start_past_end_is_not_a_panic() {
        let arg = Arg::new("exclude").arity(Arity::Unbounded);
        let r = resolve(&arg, &[], 5).unwrap();
        assert!(r.values.is_empty());
        assert_eq!(r.next, 5);
    }
}
