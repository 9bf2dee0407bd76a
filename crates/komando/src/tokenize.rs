//! Low-level argv tokenizer.
//!
//! Splits raw tokens into positionals, named flag occurrences and the tail
//! after `--`. It knows nothing about commands or value types; the binder
//! configures it through [`TokenizerOptions`].

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::command::kebab_case;

/// Flag spellings accepted by the tokenizer.
#[derive(Debug, Clone, Default)]
pub struct TokenizerOptions {
    /// `--long`, `--kebab-long` and `-s` spellings mapped to the declared name.
    aliases: HashMap<String, String>,
    booleans: HashSet<String>,
}

impl TokenizerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `name` as `--name`, as its kebab-case form and as `-short`.
    pub fn flag(mut self, name: &str, short: Option<char>, boolean: bool) -> Self {
        self.aliases.insert(format!("--{name}"), name.to_string());
        let kebab = kebab_case(name);
        if kebab != name {
            self.aliases.insert(format!("--{kebab}"), name.to_string());
        }
        if let Some(short) = short {
            self.aliases.insert(format!("-{short}"), name.to_string());
        }
        if boolean {
            self.booleans.insert(name.to_string());
        }
        self
    }

    fn lookup(&self, token: &str) -> Option<&str> {
        self.aliases.get(token).map(String::as_str)
    }

    fn is_bool(&self, name: &str) -> bool {
        self.booleans.contains(name)
    }
}

/// Tokenizer output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    pub positionals: Vec<String>,
    /// Everything after the first `--`, verbatim.
    pub double_dash: Vec<String>,
    /// Raw occurrences per declared flag name, in input order.
    pub flags: IndexMap<String, Vec<String>>,
    /// Value-taking flags that had nothing to take.
    pub missing_values: Vec<String>,
}

impl Tokens {
    fn record(&mut self, name: &str, value: &str) {
        self.flags
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }
}

/// Tokenize `argv`.
///
/// `on_unknown(token, inline_value)` is called for every flag-like token that
/// no declared flag accepts. Returning `true` keeps the token as a positional.
/// An unknown flag never consumes the token after it.
pub fn tokenize<F>(argv: &[String], options: &TokenizerOptions, mut on_unknown: F) -> Tokens
where
    F: FnMut(&str, Option<&str>) -> bool,
{
    let mut out = Tokens::default();
    let mut i = 0usize;

    while i < argv.len() {
        let arg = argv[i].as_str();

        if arg == "--" {
            out.double_dash.extend(argv[i + 1..].iter().cloned());
            break;
        }

        if let Some(body) = arg.strip_prefix("--") {
            let (key, inline) = match body.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (body, None),
            };
            let token = format!("--{key}");

            if let Some(name) = options.lookup(&token) {
                if options.is_bool(name) {
                    out.record(name, inline.unwrap_or("true"));
                } else if let Some(value) = inline {
                    out.record(name, value);
                } else if let Some(next) = argv.get(i + 1).filter(|n| !looks_like_flag(n)) {
                    out.record(name, next);
                    i += 1;
                } else {
                    out.missing_values.push(token);
                }
                i += 1;
                continue;
            }

            // --no-<bool>
            if inline.is_none() {
                let negated = key
                    .strip_prefix("no-")
                    .and_then(|k| options.lookup(&format!("--{k}")))
                    .filter(|name| options.is_bool(name));
                if let Some(name) = negated {
                    out.record(name, "false");
                    i += 1;
                    continue;
                }
            }

            if on_unknown(&token, inline) {
                out.positionals.push(arg.to_string());
            }
            i += 1;
            continue;
        }

        if arg.len() > 1 && arg.starts_with('-') {
            let body = &arg[1..];
            let first = body.chars().next().map(|c| format!("-{c}"));
            let declared = first.as_deref().and_then(|t| options.lookup(t)).is_some();
            if is_number(body) && !declared {
                out.positionals.push(arg.to_string());
                i += 1;
                continue;
            }

            // Short flags: -v, -o value, -ovalue, -abc
            let mut consumed_next = false;
            for (offset, c) in body.char_indices() {
                let token = format!("-{c}");
                let Some(name) = options.lookup(&token) else {
                    if on_unknown(&token, None) {
                        out.positionals.push(token);
                    }
                    continue;
                };
                let rest = &body[offset + c.len_utf8()..];
                if options.is_bool(name) {
                    // -v=false ends the group.
                    if let Some(value) = rest.strip_prefix('=') {
                        out.record(name, value);
                        break;
                    }
                    out.record(name, "true");
                    continue;
                }

                let rest = rest.strip_prefix('=').unwrap_or(rest);
                if !rest.is_empty() {
                    out.record(name, rest);
                } else if let Some(next) = argv.get(i + 1).filter(|n| !looks_like_flag(n)) {
                    out.record(name, next);
                    consumed_next = true;
                } else {
                    out.missing_values.push(token);
                }
                break;
            }

            i += if consumed_next { 2 } else { 1 };
            continue;
        }

        out.positionals.push(arg.to_string());
        i += 1;
    }

    tracing::trace!(tokens = ?out, "tokenized argv");
    out
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.parse::<f64>().is_ok() && s.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn looks_like_flag(token: &str) -> bool {
    token == "--" || (token.len() > 1 && token.starts_with('-') && !is_number(&token[1..]))
}
