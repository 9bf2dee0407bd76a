use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use komando::{
    Arg, ArityError, Command, DefinitionError, Dispatcher, Error, Flag, FlagType, Outcome,
    Recorder, Value, run_from,
};

fn argv(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Runs `root` against `input`, returning the outcome and what was printed.
fn dispatch(root: &Command, input: &[&str]) -> (komando::Result<Outcome>, Recorder) {
    let mut console = Recorder::new();
    let outcome = Dispatcher::new(root)
        .expect("valid definition")
        .columns(80)
        .dispatch(&argv(input), &mut console);
    (outcome, console)
}

#[test]
fn version_prints_name_at_version() {
    let root = Command::new("app").version("v1.0.0");
    for flag in ["-V", "--version"] {
        let (outcome, console) = dispatch(&root, &[flag]);
        assert_eq!(outcome.unwrap(), Outcome::Version);
        assert_eq!(console.stdout(), "app@v1.0.0");
    }
}

#[test]
fn version_is_found_after_subcommands() {
    let root = Command::new("app")
        .version("v1.0.0")
        .subcommand(Command::new("sub").run(|_, _| panic!("handler must not run")));
    let (outcome, console) = dispatch(&root, &["sub", "--version"]);
    assert_eq!(outcome.unwrap(), Outcome::Version);
    assert_eq!(console.stdout(), "app@v1.0.0");
}

#[test]
fn custom_version_formatter() {
    let root = Command::new("app")
        .version("1.2.3")
        .show_version(|name, version| format!("{name} version {version}"));
    let (_, console) = dispatch(&root, &["-V"]);
    assert_eq!(console.stdout(), "app version 1.2.3");
}

#[test]
fn version_flag_is_unknown_without_a_version() {
    let root = Command::new("app").run(|_, _| Ok(()));
    let (outcome, _) = dispatch(&root, &["-V"]);
    let Err(Error::UnknownFlags(unknown)) = outcome else {
        panic!("expected unknown flags, got {outcome:?}");
    };
    assert_eq!(unknown.tokens().collect::<Vec<_>>(), ["-V"]);
}

#[test]
fn help_short_circuits_the_handler() {
    let root = Command::new("app")
        .description("An app.")
        .run(|_, _| panic!("handler must not run"));
    let (outcome, console) = dispatch(&root, &["--help"]);
    assert_eq!(outcome.unwrap(), Outcome::Help);
    assert_eq!(
        console.stdout(),
        "\n  Description\n    An app.\n\n  Usage\n    $ app [flags]\n\n  Flags\n    -h, --help    Show this message"
    );
}

#[test]
fn help_after_separator_is_a_passthrough_token() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let root = Command::new("app").run(move |args, _| {
        sink.lock().unwrap().extend(args.passthrough().iter().cloned());
        Ok(())
    });
    let (outcome, _) = dispatch(&root, &["--", "--help"]);
    assert_eq!(outcome.unwrap(), Outcome::Ran);
    assert_eq!(*seen.lock().unwrap(), ["--help"]);
}

#[test]
fn command_without_handler_shows_help() {
    let root = Command::new("app").subcommand(Command::new("build").description("Build it"));
    let (outcome, console) = dispatch(&root, &[]);
    let outcome = outcome.unwrap();
    assert_eq!(outcome, Outcome::NoHandler);
    assert_eq!(outcome.exit_code(), 1);
    let stdout = console.stdout();
    assert!(stdout.contains("\n  Commands\n    build "), "{stdout}");
    assert!(stdout.contains("Build it"), "{stdout}");
}

#[test]
fn unknown_flag_does_not_run_the_handler() {
    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    let root = Command::new("app")
        .flag("known", Flag::boolean())
        .run(move |_, _| {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

    let (outcome, _) = dispatch(&root, &["--bogus", "--known", "-z"]);
    let Err(Error::UnknownFlags(unknown)) = outcome else {
        panic!("expected unknown flags, got {outcome:?}");
    };
    assert_eq!(unknown.tokens().collect::<Vec<_>>(), ["--bogus", "-z"]);
    assert!(!ran.load(Ordering::SeqCst));
}

#[test]
fn boolean_short_accepts_inline_false() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let root = Command::new("app")
        .flag("verbose", Flag::boolean().short('v'))
        .run(move |_, flags| {
            sink.lock().unwrap().push(flags.get_bool("verbose"));
            Ok(())
        });

    for input in ["-v=false", "-v=true"] {
        let (outcome, _) = dispatch(&root, &[input]);
        assert_eq!(outcome.unwrap(), Outcome::Ran);
    }
    assert_eq!(*seen.lock().unwrap(), [false, true]);
}

#[test]
fn flags_spelled_the_same_on_the_command_line_are_rejected() {
    let root = Command::new("app")
        .flag("fooBar", Flag::string())
        .flag("foo-bar", Flag::string())
        .run(|_, _| Ok(()));
    let err = Dispatcher::new(&root).unwrap_err();
    assert_eq!(
        err.to_string(),
        "flags --fooBar and --foo-bar in \"app\" are both spelled --foo-bar"
    );
}

#[test]
fn nested_subcommands_bind_inherited_flags() {
    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let root = Command::new("app")
        .flag("verbose", Flag::boolean().short('v').inherit())
        .subcommand(
            Command::new("sub1").subcommand(
                Command::new("sub2")
                    .alias("s2")
                    .flag("flag", Flag::string())
                    .run(move |_, flags| {
                        *sink.lock().unwrap() = Some((
                            flags.get_str("flag").map(str::to_string),
                            flags.get_bool("verbose"),
                        ));
                        Ok(())
                    }),
            ),
        );

    for input in [&["sub1", "sub2", "--flag", "v", "-v"][..], &["sub1", "s2", "-v", "--flag=v"][..]] {
        *seen.lock().unwrap() = None;
        let (outcome, _) = dispatch(&root, input);
        assert_eq!(outcome.unwrap(), Outcome::Ran);
        assert_eq!(*seen.lock().unwrap(), Some((Some("v".to_string()), true)));
    }
}

#[test]
fn camel_case_flags_accept_kebab_spelling() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let root = Command::new("bat")
        .flag(
            "highlightLine",
            Flag::new(FlagType::repeated(komando::value::convert::string)).short('H'),
        )
        .flag("tabs", Flag::new(FlagType::integer()).default_value(4i64))
        .run(move |_, flags| {
            let mut sink = sink.lock().unwrap();
            sink.extend(flags.get_all("highlightLine").into_iter().map(str::to_string));
            sink.push(flags.get_i64("tabs").unwrap_or_default().to_string());
            Ok(())
        });

    let (outcome, _) = dispatch(
        &root,
        &["--highlight-line", "1:2", "-H", "30", "--highlightLine=40"],
    );
    assert_eq!(outcome.unwrap(), Outcome::Ran);
    assert_eq!(*seen.lock().unwrap(), ["1:2", "30", "40", "4"]);
}

#[test]
fn invalid_flag_values_are_reported_with_the_flag() {
    let root = Command::new("bat")
        .flag("tabs", Flag::new(FlagType::integer()))
        .run(|_, _| Ok(()));
    let (outcome, _) = dispatch(&root, &["--tabs", "four"]);
    let Err(Error::InvalidValue { flag, message }) = outcome else {
        panic!("expected invalid value, got {outcome:?}");
    };
    assert_eq!(flag, "tabs");
    assert!(message.contains("four"), "{message}");
}

#[test]
fn positionals_bind_by_arity() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let root = Command::new("app")
        .arg("a", Arg::exactly(2))
        .arg("b", Arg::exactly(2))
        .run(move |args, _| {
            sink.lock().unwrap().push(args.get("a").cloned());
            sink.lock().unwrap().push(args.get("b").cloned());
            sink.lock().unwrap().push(Some(Value::List(
                args.rest().iter().cloned().map(Value::Str).collect(),
            )));
            Ok(())
        });

    let (outcome, _) = dispatch(&root, &["1", "2", "3", "4", "5"]);
    assert_eq!(outcome.unwrap(), Outcome::Ran);
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].as_ref().unwrap().strs(), ["1", "2"]);
    assert_eq!(seen[1].as_ref().unwrap().strs(), ["3", "4"]);
    assert_eq!(seen[2].as_ref().unwrap().strs(), ["5"]);
}

#[test]
fn missing_required_positional_is_an_arity_error() {
    let root = Command::new("app")
        .arg("file", Arg::one_or_more())
        .run(|_, _| Ok(()));
    let (outcome, _) = dispatch(&root, &[]);
    let Err(Error::Arity(err)) = outcome else {
        panic!("expected arity error, got {outcome:?}");
    };
    assert_eq!(err, ArityError::AtLeastOne { arg: "file".to_string() });
    assert_eq!(
        err.to_string(),
        "argument \"file\" expected at least one argument"
    );
}

#[test]
fn handler_errors_propagate_unchanged() {
    let root = Command::new("app").run(|_, _| anyhow::bail!("disk on fire"));
    let (outcome, _) = dispatch(&root, &[]);
    let Err(Error::Handler(err)) = outcome else {
        panic!("expected handler error, got {outcome:?}");
    };
    assert_eq!(err.to_string(), "disk on fire");
}

#[test]
fn conflicting_inherited_flag_is_a_definition_error() {
    let root = Command::new("app")
        .flag("color", Flag::string().inherit())
        .subcommand(Command::new("sub").flag("color", Flag::string()).run(|_, _| Ok(())));
    let (outcome, _) = dispatch(&root, &["sub"]);
    let Err(Error::Definition(DefinitionError::InheritedFlagConflict { command, flags })) = outcome
    else {
        panic!("expected inherited flag conflict, got {outcome:?}");
    };
    assert_eq!(command, "sub");
    assert_eq!(flags, ["color"]);
}

#[test]
fn root_aliases_are_rejected_up_front() {
    let root = Command::new("app").alias("a");
    assert!(matches!(
        Dispatcher::new(&root),
        Err(DefinitionError::RootAliases { .. })
    ));
}

#[test]
fn run_from_reports_unknown_flags_as_a_table() {
    let root = Command::new("app").run(|_, _| Ok(()));
    let mut console = Recorder::new();
    let code = run_from(&root, &argv(&["--bogus=1", "-x"]), &mut console);

    assert_eq!(code, std::process::ExitCode::FAILURE);
    assert!(console.out.is_empty());
    assert_eq!(
        console.stderr(),
        "flag     value\n\
         -------  -----\n\
         --bogus  1\n\
         -x       -\n\
         Error: Unknown flags found. See the above table.\n\
         Try --help for more info."
    );
}

#[test]
fn run_from_maps_outcomes_to_exit_codes() {
    let root = Command::new("app")
        .version("v1.0.0")
        .subcommand(Command::new("group"));
    let mut console = Recorder::new();
    assert_eq!(
        run_from(&root, &argv(&["-V"]), &mut console),
        std::process::ExitCode::SUCCESS
    );
    assert_eq!(
        run_from(&root, &argv(&["group"]), &mut console),
        std::process::ExitCode::from(1)
    );
}
