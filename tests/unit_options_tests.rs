//! # Options Parser Unit Tests / 选项解析器单元测试
//!
//! Covers the command-line surface: flags, operands, configuration files and
//! the lenient handling of malformed or dangling operands.
//!
//! 覆盖命令行接口：标志、操作数、配置文件，以及对格式错误或悬空操作数的宽松处理。

use std::fs;
use suite_runner::Options;
use suite_runner::cli::parse_options;
use tempfile::tempdir;

fn parse(args: &[&str]) -> Options {
    let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
    parse_options(&args).unwrap()
}

#[cfg(test)]
mod flag_tests {
    use super::*;

    #[test]
    fn test_no_arguments_gives_defaults() {
        let options = parse(&[]);
        assert_eq!(options, Options::default());
        assert!(options.parallel);
        assert!(!options.list_tests);
    }

    #[test]
    fn test_boolean_flags() {
        let options = parse(&["--list-tests", "--no-parallel", "-v", "--vv", "-q"]);
        assert!(options.list_tests);
        assert!(!options.parallel);
        assert!(options.verbose);
        assert!(options.very_verbose);
        assert!(options.quiet);
    }

    #[test]
    fn test_repeated_boolean_flag_is_allowed() {
        let options = parse(&["--verbose", "--verbose"]);
        assert!(options.verbose);
    }

    #[test]
    fn test_filters_accumulate_in_order() {
        let options = parse(&["--filter", "a", "--skip", "b", "--filter", "c"]);
        assert_eq!(options.filter, Some(vec!["a".to_string(), "c".to_string()]));
        assert_eq!(options.skip, Some(vec!["b".to_string()]));
    }

    #[test]
    fn test_filter_operand_may_start_with_a_dash() {
        let options = parse(&["--filter", "-x"]);
        assert_eq!(options.filter, Some(vec!["-x".to_string()]));
    }

    #[test]
    fn test_first_occurrence_of_single_operand_flag_wins() {
        let options = parse(&["--xunit-output", "a.xml", "--xunit-output", "b.xml"]);
        assert_eq!(options.xunit_output.as_deref(), Some("a.xml"));
    }

    #[test]
    fn test_numeric_operands() {
        let options = parse(&[
            "--verbosity",
            "-1",
            "--repetitions",
            "5",
            "--experimental-event-stream-version",
            "0",
            "--repeat-until",
            "fail",
        ]);
        assert_eq!(options.explicit_verbosity, Some(-1));
        assert_eq!(options.repetitions, Some(5));
        assert_eq!(options.event_stream_version, Some(0));
        assert_eq!(options.repeat_until.as_deref(), Some("fail"));
    }

    #[test]
    fn test_malformed_numeric_operand_is_ignored() {
        let options = parse(&["--repetitions", "many", "--verbosity", "loud"]);
        assert_eq!(options.repetitions, None);
        assert_eq!(options.explicit_verbosity, None);
    }

    #[test]
    fn test_trailing_operand_flag_is_ignored() {
        let options = parse(&["--list-tests", "--xunit-output"]);
        assert!(options.list_tests);
        assert_eq!(options.xunit_output, None);
    }

    #[test]
    fn test_unknown_flag_is_an_error() {
        let args = vec!["--frobnicate".to_string()];
        assert!(parse_options(&args).is_err());
    }

    #[test]
    fn test_help_is_reported_as_a_clap_error() {
        let error = parse_options(&["--help".to_string()]).unwrap_err();
        let clap_error = error.downcast_ref::<clap::Error>().unwrap();
        assert_eq!(clap_error.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}

#[cfg(test)]
mod verbosity_tests {
    use super::*;

    #[test]
    fn test_resolved_verbosity() {
        assert_eq!(parse(&[]).resolved_verbosity(), 0);
        assert_eq!(parse(&["-q"]).resolved_verbosity(), -1);
        assert_eq!(parse(&["-v"]).resolved_verbosity(), 1);
        assert_eq!(parse(&["--vv"]).resolved_verbosity(), 2);
        assert_eq!(parse(&["-v", "-q"]).resolved_verbosity(), 1);
        assert_eq!(parse(&["--vv", "--verbosity", "-3"]).resolved_verbosity(), -3);
    }
}

#[cfg(test)]
mod configuration_file_tests {
    use super::*;

    #[test]
    fn test_flags_overlay_a_json_configuration_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("options.json");
        fs::write(
            &path,
            r#"{"verbosity": 2, "filter": ["Suite"], "repetitions": 3, "parallel": false}"#,
        )
        .unwrap();

        let options = parse(&[
            "--experimental-configuration-path",
            path.to_str().unwrap(),
            "--filter",
            "Other",
            "--repetitions",
            "bogus",
        ]);

        assert_eq!(options.explicit_verbosity, Some(2));
        assert_eq!(
            options.filter,
            Some(vec!["Suite".to_string(), "Other".to_string()])
        );
        assert_eq!(options.repetitions, Some(3));
        assert!(!options.parallel);
    }

    #[test]
    fn test_toml_configuration_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("options.toml");
        fs::write(&path, "listTests = true\nskip = [\"slow\"]\n").unwrap();

        let options = parse(&["--experimental-configuration-path", path.to_str().unwrap()]);
        assert!(options.list_tests);
        assert_eq!(options.skip, Some(vec!["slow".to_string()]));
        assert!(options.parallel);
    }

    #[test]
    fn test_missing_configuration_file_is_an_error() {
        let args = vec![
            "--experimental-configuration-path".to_string(),
            "/definitely/not/here.json".to_string(),
        ];
        assert!(parse_options(&args).is_err());
    }

    #[test]
    fn test_parsing_is_idempotent_through_serialization() {
        let options = parse(&[
            "--no-parallel",
            "--verbosity",
            "1",
            "--filter",
            "A",
            "--skip",
            "B",
            "--xunit-output",
            "out.xml",
            "--repeat-until",
            "pass",
        ]);

        let dir = tempdir().unwrap();
        let path = dir.path().join("round.json");
        fs::write(&path, options.to_json().unwrap()).unwrap();

        let reparsed = parse(&["--experimental-configuration-path", path.to_str().unwrap()]);
        assert_eq!(reparsed, options);
    }

    #[test]
    fn test_internal_field_names_are_not_serialized() {
        let options = Options {
            explicit_verbosity: Some(1),
            ..Options::default()
        };
        let json = options.to_json().unwrap();
        assert!(json.contains("\"verbosity\": 1"));
        assert!(!json.contains("explicit"));
        assert!(!json.contains("xunitOutput"));
    }
}
