//! Turn the tokens left after resolution into typed positionals and flags.

use std::collections::VecDeque;

use indexmap::IndexMap;

use crate::command::{Arg, Flag, Nargs};
use crate::error::{ArityError, Error, Result, UnknownFlag, UnknownFlags};
use crate::resolve::Resolution;
use crate::tokenize::{TokenizerOptions, tokenize};
use crate::value::Value;

/// Bound positionals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    values: IndexMap<String, Value>,
    passthrough: Vec<String>,
    rest: Vec<String>,
}

impl ParsedArgs {
    /// `None` when the positional received nothing (`?`, or after a variadic).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Every string bound to `name`, scalar or list.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.get(name).map(Value::strs).unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Tokens after `--`, untouched.
    pub fn passthrough(&self) -> &[String] {
        &self.passthrough
    }

    /// Positionals no declaration consumed.
    pub fn rest(&self) -> &[String] {
        &self.rest
    }
}

/// Bound flags, keyed by declared name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFlags {
    values: IndexMap<String, Value>,
}

impl ParsedFlags {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// `false` when absent.
    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.get(name).map(Value::strs).unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Bind the remaining tokens of `resolution` against its command.
pub fn bind(resolution: &Resolution<'_>) -> Result<(ParsedArgs, ParsedFlags)> {
    bind_tokens(
        &resolution.command.args,
        &resolution.flags,
        &resolution.remaining,
    )
}

/// Bind `tokens` against explicit declarations.
///
/// Unknown flags are collected over the whole input and reported together.
pub fn bind_tokens(
    args: &IndexMap<String, Arg>,
    flags: &IndexMap<String, Flag>,
    tokens: &[String],
) -> Result<(ParsedArgs, ParsedFlags)> {
    let options = flags.iter().fold(TokenizerOptions::new(), |options, (name, flag)| {
        options.flag(name, flag.short, flag.ty.is_bool())
    });

    let mut unknown = Vec::new();
    let raw = tokenize(tokens, &options, |token, value| {
        unknown.push(UnknownFlag {
            token: token.to_string(),
            value: value.map(str::to_string),
        });
        false
    });

    if !unknown.is_empty() {
        return Err(UnknownFlags { flags: unknown }.into());
    }
    if let Some(flag) = raw.missing_values.first() {
        return Err(Error::MissingValue { flag: flag.clone() });
    }

    let parsed_flags = bind_flags(flags, &raw.flags)?;
    let parsed_args = bind_positionals(args, raw.positionals, raw.double_dash)?;
    tracing::debug!(
        args = parsed_args.values.len(),
        flags = parsed_flags.values.len(),
        "bound arguments"
    );
    Ok((parsed_args, parsed_flags))
}

fn bind_flags(
    flags: &IndexMap<String, Flag>,
    raw: &IndexMap<String, Vec<String>>,
) -> Result<ParsedFlags> {
    let mut values = IndexMap::new();
    for (name, flag) in flags {
        let value = match raw.get(name) {
            Some(occurrences) => flag.ty.coerce(occurrences).map_err(|message| Error::InvalidValue {
                flag: name.clone(),
                message,
            })?,
            None => match &flag.default {
                Some(default) => default.clone(),
                None if flag.ty.is_bool() => Value::Bool(false),
                None => continue,
            },
        };
        values.insert(name.clone(), value);
    }
    Ok(ParsedFlags { values })
}

fn bind_positionals(
    args: &IndexMap<String, Arg>,
    positionals: Vec<String>,
    passthrough: Vec<String>,
) -> Result<ParsedArgs> {
    let mut queue: VecDeque<String> = positionals.into();
    let mut values = IndexMap::new();

    for (name, arg) in args {
        match arg.arity() {
            Nargs::Optional => {
                if let Some(v) = queue.pop_front() {
                    values.insert(name.clone(), Value::Str(v));
                }
            }
            Nargs::Exactly(1) => {
                let v = queue.pop_front().ok_or_else(|| ArityError::Exactly {
                    arg: name.clone(),
                    expected: 1,
                })?;
                values.insert(name.clone(), Value::Str(v));
            }
            Nargs::Exactly(n) => {
                if queue.len() < n {
                    return Err(ArityError::Exactly {
                        arg: name.clone(),
                        expected: n,
                    }
                    .into());
                }
                let taken = queue.drain(..n).map(Value::Str).collect();
                values.insert(name.clone(), Value::List(taken));
            }
            Nargs::ZeroOrMore => {
                let taken = queue.drain(..).map(Value::Str).collect();
                values.insert(name.clone(), Value::List(taken));
                break;
            }
            Nargs::OneOrMore => {
                if queue.is_empty() {
                    return Err(ArityError::AtLeastOne { arg: name.clone() }.into());
                }
                let taken = queue.drain(..).map(Value::Str).collect();
                values.insert(name.clone(), Value::List(taken));
                break;
            }
        }
    }

    Ok(ParsedArgs {
        values,
        passthrough,
        rest: queue.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FlagType, convert};

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn args(decls: &[(&str, Nargs)]) -> IndexMap<String, Arg> {
        decls
            .iter()
            .map(|(name, nargs)| (name.to_string(), Arg::new(*nargs)))
            .collect()
    }

    fn bind_args(decls: &[(&str, Nargs)], input: &[&str]) -> Result<ParsedArgs> {
        bind_tokens(&args(decls), &IndexMap::new(), &argv(input)).map(|(a, _)| a)
    }

    #[test]
    fn optional_args_fill_in_order() {
        let decls = [("a", Nargs::Optional), ("b", Nargs::Optional)];
        let a = bind_args(&decls, &["x"]).unwrap();
        assert_eq!(a.get_str("a"), Some("x"));
        assert_eq!(a.get("b"), None);

        let a = bind_args(&decls, &["abc", "def", "ghi"]).unwrap();
        assert_eq!(a.get_str("a"), Some("abc"));
        assert_eq!(a.get_str("b"), Some("def"));
        assert_eq!(a.rest(), argv(&["ghi"]));
    }

    #[test]
    fn zero_or_more_binds_empty_list_and_stops() {
        let decls = [("a", Nargs::ZeroOrMore), ("b", Nargs::ZeroOrMore)];
        let a = bind_args(&decls, &[]).unwrap();
        assert_eq!(a.get("a"), Some(&Value::List(vec![])));
        assert_eq!(a.get("b"), None);

        let a = bind_args(&decls, &["abc", "def"]).unwrap();
        assert_eq!(a.get_all("a"), ["abc", "def"]);
        assert!(!a.contains("b"));
    }

    #[test]
    fn one_or_more_requires_a_value() {
        let decls = [("argA", Nargs::OneOrMore), ("argB", Nargs::OneOrMore)];
        let err = bind_args(&decls, &[]).unwrap_err();
        assert!(matches!(&err, Error::Arity(ArityError::AtLeastOne { arg }) if arg == "argA"));
        assert_eq!(err.to_string(), "argument \"argA\" expected at least one argument");

        let a = bind_args(&decls, &["abc", "def"]).unwrap();
        assert_eq!(a.get_all("argA"), ["abc", "def"]);
        assert_eq!(a.get("argB"), None);
    }

    #[test]
    fn fixed_arity_binds_scalar_for_one_list_otherwise() {
        let decls = [("a", Nargs::Exactly(1)), ("b", Nargs::Exactly(2))];
        let a = bind_args(&decls, &["abc", "def", "ghi", "klm", "nop"]).unwrap();
        assert_eq!(a.get("a"), Some(&Value::from("abc")));
        assert_eq!(a.get("b"), Some(&Value::from(vec!["def", "ghi"])));

        let decls = [("a", Nargs::Exactly(2)), ("b", Nargs::Exactly(2))];
        let a = bind_args(&decls, &["1", "2", "3", "4", "5"]).unwrap();
        assert_eq!(a.get_all("a"), ["1", "2"]);
        assert_eq!(a.get_all("b"), ["3", "4"]);
        assert_eq!(a.rest(), argv(&["5"]));
    }

    #[test]
    fn fixed_arity_reports_expected_count() {
        let err = bind_args(&[("a", Nargs::Optional), ("b", Nargs::Exactly(1))], &[]).unwrap_err();
        assert_eq!(err.to_string(), "argument \"b\" expected 1 argument(s)");

        let err = bind_args(&[("a", Nargs::Optional), ("b", Nargs::Exactly(2))], &["x", "y"]).unwrap_err();
        assert_eq!(err.to_string(), "argument \"b\" expected 2 argument(s)");
    }

    #[test]
    fn passthrough_keeps_tokens_after_double_dash() {
        let a = bind_args(&[("file", Nargs::Optional)], &["f", "--", "--raw", "x"]).unwrap();
        assert_eq!(a.get_str("file"), Some("f"));
        assert_eq!(a.passthrough(), argv(&["--raw", "x"]));
    }

    #[test]
    fn flags_are_coerced_and_defaulted() {
        let flags: IndexMap<String, Flag> = [
            ("count", Flag::new(FlagType::integer())),
            ("lines", Flag::new(FlagType::repeated(convert::string)).short('r')),
            ("wrap", Flag::new(FlagType::choice(&["auto", "never"])).default_value("auto")),
            ("plain", Flag::boolean().short('p')),
            ("theme", Flag::string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let (_, f) = bind_tokens(
            &IndexMap::new(),
            &flags,
            &argv(&["--count", "3", "-r", "1:2,5:6", "-r", "9:9"]),
        )
        .unwrap();
        assert_eq!(f.get_i64("count"), Some(3));
        assert_eq!(f.get_all("lines"), ["1:2", "5:6", "9:9"]);
        assert_eq!(f.get_str("wrap"), Some("auto"));
        assert!(!f.get_bool("plain"));
        assert!(f.contains("plain"));
        assert!(!f.contains("theme"));
    }

    #[test]
    fn invalid_values_name_the_flag() {
        let flags: IndexMap<String, Flag> =
            [("count".to_string(), Flag::new(FlagType::integer()))].into_iter().collect();
        let err = bind_tokens(&IndexMap::new(), &flags, &argv(&["--count", "many"])).unwrap_err();
        assert!(matches!(&err, Error::InvalidValue { flag, .. } if flag == "count"));
    }

    #[test]
    fn unknown_flags_are_collected_after_full_scan() {
        let flags: IndexMap<String, Flag> =
            [("known".to_string(), Flag::string())].into_iter().collect();
        let err = bind_tokens(
            &IndexMap::new(),
            &flags,
            &argv(&["--bogus", "--known", "k", "-x"]),
        )
        .unwrap_err();
        let Error::UnknownFlags(unknown) = err else {
            panic!("expected UnknownFlags, got: {err:?}");
        };
        assert_eq!(unknown.tokens().collect::<Vec<_>>(), ["--bogus", "-x"]);
    }

    #[test]
    fn missing_flag_value_is_an_error() {
        let flags: IndexMap<String, Flag> =
            [("output".to_string(), Flag::string().short('o'))].into_iter().collect();
        let err = bind_tokens(&IndexMap::new(), &flags, &argv(&["-o"])).unwrap_err();
        assert!(matches!(&err, Error::MissingValue { flag } if flag == "-o"));
    }
}
