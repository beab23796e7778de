//! # Test Filter Module / 测试过滤器模块
//!
//! A [`TestFilter`] built from a pattern list matches within one membership
//! (include or exclude) when *any* pattern matches. Filters are combined with
//! [`TestFilter::combining`], which requires *every* combined filter to let a
//! test through. An empty pattern list builds the unfiltered identity.
//!
//! 由模式列表构建的 [`TestFilter`] 在某一成员关系（包含或排除）内，只要*任一*模式匹配即视为匹配。
//! 过滤器通过 [`TestFilter::combining`] 组合，要求*每个*被组合的过滤器都放行该测试。
//! 空模式列表构建的是不做过滤的单位元。

use regex::Regex;

use crate::core::errors::EntryPointError;
use crate::core::models::TestId;

/// Whether a pattern list selects tests to run or tests to leave out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Membership {
    Including,
    Excluding,
}

#[derive(Clone, Debug)]
enum FilterKind {
    /// Lets every test through.
    Unfiltered,
    /// Any of the patterns decides membership.
    Patterns {
        membership: Membership,
        patterns: Vec<Regex>,
    },
    /// Every filter must let the test through.
    All(Vec<TestFilter>),
}

/// A composable inclusion/exclusion predicate over test identifiers.
#[derive(Clone, Debug)]
pub struct TestFilter {
    kind: FilterKind,
}

impl Default for TestFilter {
    fn default() -> Self {
        Self::unfiltered()
    }
}

impl TestFilter {
    pub fn unfiltered() -> Self {
        Self {
            kind: FilterKind::Unfiltered,
        }
    }

    /// Compiles `patterns` into a filter with the given membership.
    ///
    /// `flag` names the command-line flag the patterns came from, for error
    /// reporting. An empty slice yields [`TestFilter::unfiltered`].
    pub fn compile(
        patterns: &[String],
        membership: Membership,
        flag: &str,
    ) -> Result<Self, EntryPointError> {
        if patterns.is_empty() {
            return Ok(Self::unfiltered());
        }

        let patterns = patterns
            .iter()
            .map(|pattern| compile_pattern(pattern, flag))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            kind: FilterKind::Patterns {
                membership,
                patterns,
            },
        })
    }

    pub fn is_unfiltered(&self) -> bool {
        matches!(self.kind, FilterKind::Unfiltered)
    }

    /// Combines two filters so a test must pass both.
    ///
    /// The unfiltered filter is the identity, and nested combinations are
    /// flattened, so combining is associative.
    pub fn combining(self, other: TestFilter) -> TestFilter {
        match (self.kind, other.kind) {
            (FilterKind::Unfiltered, kind) | (kind, FilterKind::Unfiltered) => TestFilter { kind },
            (lhs, rhs) => {
                let mut filters = Vec::new();
                for kind in [lhs, rhs] {
                    match kind {
                        FilterKind::All(nested) => filters.extend(nested),
                        kind => filters.push(TestFilter { kind }),
                    }
                }
                TestFilter {
                    kind: FilterKind::All(filters),
                }
            }
        }
    }

    /// Whether the test with this identifier should run.
    ///
    /// Patterns are searched for in the identifier's name path (`A.B.c`), so a
    /// pattern naming a suite selects everything inside it.
    pub fn includes(&self, id: &TestId) -> bool {
        self.includes_name_path(&id.name_path())
    }

    fn includes_name_path(&self, name_path: &str) -> bool {
        match &self.kind {
            FilterKind::Unfiltered => true,
            FilterKind::Patterns {
                membership,
                patterns,
            } => {
                let matched = patterns.iter().any(|pattern| pattern.is_match(name_path));
                match membership {
                    Membership::Including => matched,
                    Membership::Excluding => !matched,
                }
            }
            FilterKind::All(filters) => filters
                .iter()
                .all(|filter| filter.includes_name_path(name_path)),
        }
    }
}

fn compile_pattern(pattern: &str, flag: &str) -> Result<Regex, EntryPointError> {
    Regex::new(pattern).map_err(|error| match error {
        regex::Error::CompiledTooBig(limit) => EntryPointError::feature_unavailable(
            format!("filtering with `{flag}`"),
            format!("the pattern '{pattern}' exceeds the regex size limit of {limit} bytes"),
        ),
        error => EntryPointError::invalid_argument(flag, error.to_string()),
    })
}
