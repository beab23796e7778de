//! # Test Listing Module / 测试列表模块
//!
//! Renders the discovered tests as a deterministic, deduplicated, sorted list of
//! identifiers for `--list-tests`.
//!
//! Tests are grouped by name path. A test whose name path is unique is listed
//! under its enclosing named scope (its source location dropped); tests sharing
//! a name path keep their source locations so each line stays distinguishable.
//!
//! 将已发现的测试渲染为确定性的、去重的、排序的标识符列表，用于 `--list-tests`。
//! 测试按名称路径分组。名称路径唯一的测试以其所在的命名作用域列出（去掉源代码位置）；
//! 共享名称路径的测试保留源代码位置，以便每一行都可以区分。

use std::collections::BTreeMap;

use crate::core::models::{Test, TestId};

/// Produces one display line per listed test, sorted lexicographically.
pub fn list_tests<'a, I>(tests: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Test>,
{
    let mut groups: BTreeMap<&[String], Vec<&TestId>> = BTreeMap::new();
    for test in tests {
        if test.is_suite || test.is_hidden {
            continue;
        }
        groups
            .entry(test.id.name_components())
            .or_default()
            .push(&test.id);
    }

    let mut lines: Vec<String> = groups
        .into_values()
        .flat_map(|ids| {
            let is_ambiguous = ids.len() > 1;
            ids.into_iter().map(move |id| {
                if !is_ambiguous && id.source_location().is_some() {
                    id.parent().unwrap_or_else(|| id.clone()).to_string()
                } else {
                    id.to_string()
                }
            })
        })
        .collect();

    // Identical tests discovered twice render identically; list them once.
    lines.sort();
    lines.dedup();
    lines
}
