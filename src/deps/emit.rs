//! Make-compatible dependency rule output.

use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::ResolvedDependency;

/// A Make rule listing the headers a translated artifact depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRule {
    target: String,
    dependencies: Vec<String>,
    emit_phony_targets: bool,
}

impl DependencyRule {
    /// Create a rule for `target`.
    ///
    /// Dependencies are deduplicated keeping the first occurrence, and the
    /// target itself is never listed as one of its own dependencies.
    ///
    /// Returns `None` for an empty target.
    pub fn new<I, S>(target: impl Into<String>, dependencies: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let target = target.into();
        if target.is_empty() {
            return None;
        }

        let mut seen = HashSet::new();
        let dependencies = dependencies
            .into_iter()
            .map(Into::into)
            .filter(|dep: &String| dep != &target && seen.insert(dep.clone()))
            .collect();

        Some(DependencyRule {
            target,
            dependencies,
            emit_phony_targets: false,
        })
    }

    /// Create a rule from resolved dependencies.
    pub fn from_resolved(target: impl Into<String>, deps: &[ResolvedDependency]) -> Option<Self> {
        Self::new(target, deps.iter().map(ResolvedDependency::display_path))
    }

    /// Also emit an empty rule per dependency, so Make does not fail when a
    /// header is later renamed or deleted.
    pub fn with_phony_targets(mut self, emit: bool) -> Self {
        self.emit_phony_targets = emit;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Write the rule to `path`.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        crate::util::fs::write_string(path, &self.to_string())
    }

    /// Write the rule to an output stream.
    pub fn write_to(&self, out: &mut dyn Write) -> Result<()> {
        out.write_all(self.to_string().as_bytes())
            .context("failed to write dependency rule")?;
        out.flush().context("failed to write dependency rule")
    }
}

impl fmt::Display for DependencyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} : {}", self.target, self.dependencies.join(" \\\n\t"))?;

        if self.emit_phony_targets {
            for dep in &self.dependencies {
                writeln!(f, "{}:", dep)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_dependency() {
        let rule = DependencyRule::new("main.pc", ["/abs/inc/foo.kl"]).unwrap();
        assert_eq!(rule.to_string(), "main.pc : /abs/inc/foo.kl\n");
    }

    #[test]
    fn test_continuation_lines() {
        let rule = DependencyRule::new("main.pc", ["/a/foo.kl", "/b/bar.kl", "gen.kl"]).unwrap();
        assert_eq!(
            rule.to_string(),
            "main.pc : /a/foo.kl \\\n\t/b/bar.kl \\\n\tgen.kl\n"
        );
    }

    #[test]
    fn test_no_dependencies() {
        let rule = DependencyRule::new("main.pc", Vec::<String>::new()).unwrap();
        assert_eq!(rule.to_string(), "main.pc : \n");
    }

    #[test]
    fn test_phony_targets() {
        let rule = DependencyRule::new("main.pc", ["/a/foo.kl", "/b/bar.kl"])
            .unwrap()
            .with_phony_targets(true);
        assert_eq!(
            rule.to_string(),
            "main.pc : /a/foo.kl \\\n\t/b/bar.kl\n/a/foo.kl:\n/b/bar.kl:\n"
        );
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let rule = DependencyRule::new("main.pc", ["b", "a", "b", "c", "a"]).unwrap();
        assert_eq!(rule.dependencies(), ["b", "a", "c"]);
    }

    #[test]
    fn test_target_never_depends_on_itself() {
        let rule = DependencyRule::new("main.pc", ["main.pc", "foo.kl"]).unwrap();
        assert_eq!(rule.dependencies(), ["foo.kl"]);
    }

    #[test]
    fn test_empty_target_rejected() {
        assert!(DependencyRule::new("", ["foo.kl"]).is_none());
    }

    #[test]
    fn test_emission_is_idempotent() {
        let rule = DependencyRule::new("main.pc", ["/a/foo.kl", "/b/bar.kl"])
            .unwrap()
            .with_phony_targets(true);

        let mut first = Vec::new();
        let mut second = Vec::new();
        rule.write_to(&mut first).unwrap();
        rule.write_to(&mut second).unwrap();
        assert_eq!(first, second);
    }
}
