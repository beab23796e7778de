//! # Test Listing Unit Tests / 测试列表单元测试
//!
//! This module tests the rendering of discovered tests for `--list-tests`:
//! suites and hidden tests are left out, unique names drop their source
//! location and ambiguous names keep it.
//!
//! 此模块测试 `--list-tests` 中已发现测试的渲染：测试套件和隐藏测试被排除，
//! 唯一名称去掉源代码位置，而有歧义的名称保留它。

use suite_runner::core::list_tests;
use suite_runner::{SourceLocation, Test, TestId};

fn located(path: &[&str], line: u32) -> TestId {
    TestId::new(path.iter().copied()).with_source_location(SourceLocation::new("f", line, 1))
}

#[cfg(test)]
mod listing_tests {
    use super::*;

    #[test]
    fn test_unique_and_ambiguous_names() {
        let tests = vec![
            Test::suite(TestId::new(["A"])),
            Test::function(located(&["A", "B"], 1)),
            Test::function(located(&["A", "C"], 2)),
            Test::function(located(&["A", "C"], 3)),
        ];

        assert_eq!(list_tests(&tests), vec!["A.B", "A.C/f:2:1", "A.C/f:3:1"]);
    }

    #[test]
    fn test_hidden_tests_are_left_out() {
        let tests = vec![
            Test::function(TestId::new(["A", "visible"])),
            Test::function(TestId::new(["A", "synthesized"])).hidden(),
        ];
        assert_eq!(list_tests(&tests), vec!["A.visible"]);
    }

    #[test]
    fn test_output_is_sorted_and_deterministic() {
        let tests = vec![
            Test::function(TestId::new(["Z", "last"])),
            Test::function(TestId::new(["A", "first"])),
            Test::function(TestId::new(["M", "middle"])),
        ];
        let mut reversed = tests.clone();
        reversed.reverse();

        let listed = list_tests(&tests);
        assert_eq!(listed, vec!["A.first", "M.middle", "Z.last"]);
        assert_eq!(listed, list_tests(&reversed));
    }

    #[test]
    fn test_identical_tests_are_listed_once() {
        let tests = vec![
            Test::function(located(&["A", "C"], 2)),
            Test::function(located(&["A", "C"], 2)),
        ];
        assert_eq!(list_tests(&tests), vec!["A.C/f:2:1"]);
    }

    #[test]
    fn test_bare_name_without_location_is_kept() {
        let tests = vec![Test::function(TestId::new(["top"]))];
        assert_eq!(list_tests(&tests), vec!["top"]);
    }

    #[test]
    fn test_empty_input() {
        let tests: Vec<Test> = Vec::new();
        assert!(list_tests(&tests).is_empty());
    }

    #[test]
    fn test_parent_of_identifier() {
        let id = located(&["A", "B"], 1);
        assert_eq!(id.parent(), Some(TestId::new(["A", "B"])));
        assert_eq!(TestId::new(["A", "B"]).parent(), Some(TestId::new(["A"])));
        assert_eq!(TestId::new(["A"]).parent(), None);
        assert_eq!(id.to_string(), "A.B/f:1:1");
    }
}
