// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::str::FromStr;

use crate::core::options::Options;
use crate::infra::{fs, t};

/// Flags that take exactly one operand.
const OPERAND_FLAGS: &[&str] = &[
    "--verbosity",
    "--xunit-output",
    "--experimental-event-stream-output",
    "--experimental-event-stream-version",
    "--experimental-configuration-path",
    "--filter",
    "--skip",
    "--repetitions",
    "--repeat-until",
];

/// Builds the command-line interface. Help text is localized with the
/// current locale, so call [`crate::init`] first.
pub fn build_cli() -> Command {
    Command::new("suite-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about").to_string())
        .no_binary_name(true)
        .args_override_self(true)
        .arg(flag("list-tests", t!("cli.list_tests")))
        .arg(flag("no-parallel", t!("cli.no_parallel")))
        .arg(flag("verbose", t!("cli.verbose")).short('v'))
        .arg(flag("very-verbose", t!("cli.very_verbose")).alias("vv"))
        .arg(flag("quiet", t!("cli.quiet")).short('q'))
        .arg(operand("verbosity", "LEVEL", t!("cli.verbosity")))
        .arg(operand("xunit-output", "PATH", t!("cli.xunit_output")))
        .arg(operand(
            "experimental-event-stream-output",
            "PATH",
            t!("cli.event_stream_output"),
        ))
        .arg(operand(
            "experimental-event-stream-version",
            "VERSION",
            t!("cli.event_stream_version"),
        ))
        .arg(operand(
            "experimental-configuration-path",
            "PATH",
            t!("cli.configuration_path"),
        ))
        .arg(operand("filter", "PATTERN", t!("cli.filter")))
        .arg(operand("skip", "PATTERN", t!("cli.skip")))
        .arg(operand("repetitions", "COUNT", t!("cli.repetitions")))
        .arg(operand("repeat-until", "pass|fail", t!("cli.repeat_until")))
}

fn flag(name: &'static str, help: impl Into<String>) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help.into())
        .action(ArgAction::SetTrue)
}

/// Every occurrence is kept; single-operand flags read only the first.
fn operand(name: &'static str, value_name: &'static str, help: impl Into<String>) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help.into())
        .value_name(value_name)
        .allow_hyphen_values(true)
        .action(ArgAction::Append)
}

/// Parses raw arguments (without the program path) into an options record.
///
/// A configuration file named by `--experimental-configuration-path` is loaded
/// first and the remaining flags are applied on top of it.
pub fn parse_options(args: &[String]) -> Result<Options> {
    let matches = build_cli().try_get_matches_from(pair_operands(args))?;

    let mut options = match first(&matches, "experimental-configuration-path") {
        Some(path) => Options::from_file(&fs::expand_path(path))?,
        None => Options::default(),
    };

    if matches.get_flag("list-tests") {
        options.list_tests = true;
    }
    if matches.get_flag("no-parallel") {
        options.parallel = false;
    }
    if matches.get_flag("verbose") {
        options.verbose = true;
    }
    if matches.get_flag("very-verbose") {
        options.very_verbose = true;
    }
    if matches.get_flag("quiet") {
        options.quiet = true;
    }

    if let Some(verbosity) = number(&matches, "verbosity") {
        options.explicit_verbosity = Some(verbosity);
    }
    if let Some(path) = first(&matches, "xunit-output") {
        options.xunit_output = Some(path.to_string());
    }
    if let Some(path) = first(&matches, "experimental-event-stream-output") {
        options.event_stream_output_path = Some(path.to_string());
    }
    if let Some(version) = number(&matches, "experimental-event-stream-version") {
        options.event_stream_version = Some(version);
    }
    if let Some(count) = number(&matches, "repetitions") {
        options.repetitions = Some(count);
    }
    if let Some(keyword) = first(&matches, "repeat-until") {
        options.repeat_until = Some(keyword.to_string());
    }

    for (name, patterns) in [("filter", &mut options.filter), ("skip", &mut options.skip)] {
        if let Some(values) = matches.get_many::<String>(name) {
            patterns.get_or_insert_with(Vec::new).extend(values.cloned());
        }
    }

    Ok(options)
}

/// Pairs each operand flag with the token after it. A trailing operand flag
/// has nothing to pair with and is dropped.
fn pair_operands(args: &[String]) -> Vec<String> {
    let mut tokens = Vec::with_capacity(args.len());
    let mut args = args.iter();
    while let Some(token) = args.next() {
        if !OPERAND_FLAGS.contains(&token.as_str()) {
            tokens.push(token.clone());
            continue;
        }
        match args.next() {
            Some(value) => {
                tokens.push(token.clone());
                tokens.push(value.clone());
            }
            None => tracing::debug!(flag = %token, "ignoring a flag without an operand"),
        }
    }
    tokens
}

fn first<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches
        .get_many::<String>(name)
        .and_then(|mut values| values.next())
        .map(String::as_str)
}

/// The first operand of `name` as a number. A malformed value is ignored.
fn number<T: FromStr>(matches: &ArgMatches, name: &str) -> Option<T> {
    let value = first(matches, name)?;
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        tracing::debug!(flag = name, value, "ignoring a malformed numeric operand");
    }
    parsed
}
