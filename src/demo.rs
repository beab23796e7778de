//! # Demonstration Tests / 演示测试
//!
//! The tests this binary hosts. They exercise every kind of outcome the
//! runner reports: passing, known issues, duplicate names told apart by source
//! location, an exit test and a deliberate failure.
//!
//! 此二进制文件承载的测试。它们覆盖运行器报告的各种结果：通过、已知问题、
//! 通过源代码位置区分的重名测试、退出测试以及一个故意的失败。

use suite_runner::core::exit_test::ExitCondition;
use suite_runner::{LocalEngine, TestId, TestScope, source_location};

const SUITE: &str = "Demo";
const EXIT_CODE: i32 = 3;

fn id(name: &str) -> TestId {
    TestId::new([SUITE, name])
}

pub fn engine() -> LocalEngine {
    let arithmetic = id("arithmetic").with_source_location(source_location!());
    let known_flake = id("knownFlake").with_source_location(source_location!());
    let overflow = id("parameterized").with_source_location(source_location!());
    let absolute = id("parameterized").with_source_location(source_location!());
    let exits_with_code = id("exitsWithCode").with_source_location(source_location!());
    let deliberate_failure = id("deliberateFailure").with_source_location(source_location!());

    LocalEngine::new()
        .with_suite(TestId::new([SUITE]))
        .with_test(arithmetic, |scope: TestScope| async move {
            scope.expect(2 + 2 == 4, "2 + 2 == 4");
            scope.expect("suite".len() == 5, "\"suite\".len() == 5");
        })
        .with_test(known_flake, |scope: TestScope| async move {
            scope.known_issue("the clock source is coarse on some hosts");
        })
        .with_test(overflow, |scope: TestScope| async move {
            scope.expect(u8::MAX.checked_add(1).is_none(), "u8::MAX + 1 overflows");
        })
        .with_test(absolute, |scope: TestScope| async move {
            scope.expect(i8::MIN.checked_abs().is_none(), "i8::MIN has no absolute value");
        })
        .with_test(exits_with_code, |scope: TestScope| async move {
            scope
                .expect_exit("Demo.exitsWithCode.child", ExitCondition::Code(EXIT_CODE))
                .await;
        })
        .with_exit_test("Demo.exitsWithCode.child", || std::process::exit(EXIT_CODE))
        .with_test(deliberate_failure, |scope: TestScope| async move {
            let answer = 6 * 7;
            scope.expect(answer == 41, format!("expected 41, got {answer}"));
        })
        .with_hidden_test(id("__warmup"), |_scope: TestScope| async move {})
}
