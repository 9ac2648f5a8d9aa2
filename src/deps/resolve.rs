//! Include search-path resolution.

use crate::core::{HeaderReference, ResolvedDependency, SearchPathList};
use crate::deps::classify::SystemHeaders;
use crate::deps::errors::ResolveError;

/// Outcome of looking up a single header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ResolvedDependency),
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

/// Caller-supplied policy for headers that are system headers or missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvePolicy {
    /// Leave system headers out entirely (-MM)
    pub ignore_system_headers: bool,
    /// Keep missing headers under their unresolved name (-MG)
    pub tolerate_missing_headers: bool,
}

/// Maps header references onto files in an ordered list of directories.
///
/// The resolver keeps no state between lookups; every call hits the
/// filesystem again.
#[derive(Debug, Clone, Copy)]
pub struct IncludeResolver<'a> {
    search_paths: &'a SearchPathList,
    system_headers: &'a SystemHeaders,
}

impl<'a> IncludeResolver<'a> {
    pub fn new(search_paths: &'a SearchPathList, system_headers: &'a SystemHeaders) -> Self {
        IncludeResolver {
            search_paths,
            system_headers,
        }
    }

    /// Locate `reference`.
    ///
    /// Absolute references resolve to themselves. Relative ones resolve to
    /// the first search directory, in order, holding a file of that name.
    pub fn resolve(&self, reference: &HeaderReference) -> Resolution {
        let is_system = self.system_headers.is_system_header(reference.name());

        if reference.is_absolute() {
            let path = reference.as_path().to_path_buf();
            return Resolution::Found(ResolvedDependency::found(reference.clone(), path, is_system));
        }

        for dir in self.search_paths.iter() {
            let candidate = dir.join(reference.as_path());
            if candidate.is_file() {
                tracing::debug!("found {} in '{}'", reference, dir.display());
                return Resolution::Found(ResolvedDependency::found(
                    reference.clone(),
                    candidate,
                    is_system,
                ));
            }
        }

        Resolution::NotFound
    }

    /// Resolve every reference under `policy`, in order.
    ///
    /// System headers are dropped without a lookup when the policy says so.
    /// A missing header is fatal unless missing headers are tolerated, in
    /// which case it is kept under its unresolved name.
    pub fn collect<I>(
        &self,
        references: I,
        policy: ResolvePolicy,
    ) -> Result<Vec<ResolvedDependency>, ResolveError>
    where
        I: IntoIterator<Item = HeaderReference>,
    {
        let mut deps = Vec::new();

        for reference in references {
            let is_system = self.system_headers.is_system_header(reference.name());
            if policy.ignore_system_headers && is_system {
                tracing::debug!("ignoring system header '{}'", reference);
                continue;
            }

            match self.resolve(&reference) {
                Resolution::Found(dep) => {
                    tracing::debug!("adding {} to dependencies", dep.path.display());
                    deps.push(dep);
                }
                Resolution::NotFound if policy.tolerate_missing_headers => {
                    tracing::debug!("assuming '{}' is a generated header", reference);
                    deps.push(ResolvedDependency::assumed_generated(reference, is_system));
                }
                Resolution::NotFound => {
                    return Err(ResolveError::HeaderNotFound {
                        header: reference.name().to_string(),
                    });
                }
            }
        }

        Ok(deps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn dirs(tmp: &TempDir, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|n| {
                let d = tmp.path().join(n);
                fs::create_dir_all(&d).unwrap();
                d
            })
            .collect()
    }

    fn found_path(res: Resolution) -> PathBuf {
        match res {
            Resolution::Found(dep) => dep.path,
            Resolution::NotFound => panic!("expected header to resolve"),
        }
    }

    #[test]
    fn test_first_directory_wins() {
        let tmp = TempDir::new().unwrap();
        let d = dirs(&tmp, &["a", "b"]);
        fs::write(d[0].join("foo.kl"), "").unwrap();
        fs::write(d[1].join("foo.kl"), "").unwrap();
        let headers = SystemHeaders::default();
        let reference = HeaderReference::new("foo.kl");

        let forward = SearchPathList::from_absolute(vec![d[0].clone(), d[1].clone()]);
        let res = IncludeResolver::new(&forward, &headers).resolve(&reference);
        assert_eq!(found_path(res), d[0].join("foo.kl"));

        let reversed = SearchPathList::from_absolute(vec![d[1].clone(), d[0].clone()]);
        let res = IncludeResolver::new(&reversed, &headers).resolve(&reference);
        assert_eq!(found_path(res), d[1].join("foo.kl"));
    }

    #[test]
    fn test_no_state_between_lookups() {
        let tmp = TempDir::new().unwrap();
        let d = dirs(&tmp, &["a", "b"]);
        fs::write(d[0].join("foo.kl"), "").unwrap();
        let headers = SystemHeaders::default();
        let reference = HeaderReference::new("foo.kl");

        let with = SearchPathList::from_absolute(vec![d[0].clone(), d[1].clone()]);
        assert!(IncludeResolver::new(&with, &headers).resolve(&reference).is_found());

        let without = SearchPathList::from_absolute(vec![d[1].clone()]);
        assert_eq!(
            IncludeResolver::new(&without, &headers).resolve(&reference),
            Resolution::NotFound
        );
    }

    #[test]
    fn test_absolute_reference_skips_search() {
        let tmp = TempDir::new().unwrap();
        let abs = tmp.path().join("nowhere/foo.kl");
        let paths = SearchPathList::default();
        let headers = SystemHeaders::default();

        let reference = HeaderReference::new(abs.to_string_lossy());
        let res = IncludeResolver::new(&paths, &headers).resolve(&reference);
        assert_eq!(found_path(res), abs);
    }

    #[test]
    fn test_directories_do_not_match() {
        let tmp = TempDir::new().unwrap();
        let d = dirs(&tmp, &["a", "a/foo.kl"]);
        let paths = SearchPathList::from_absolute(vec![d[0].clone()]);
        let headers = SystemHeaders::default();

        let res = IncludeResolver::new(&paths, &headers).resolve(&"foo.kl".into());
        assert_eq!(res, Resolution::NotFound);
    }

    #[test]
    fn test_collect_ignores_system_headers() {
        let tmp = TempDir::new().unwrap();
        let d = dirs(&tmp, &["inc"]);
        fs::write(d[0].join("foo"), "").unwrap();
        let paths = SearchPathList::from_absolute(d.clone());
        let headers = SystemHeaders::new("test", ["bar"]);
        let policy = ResolvePolicy {
            ignore_system_headers: true,
            tolerate_missing_headers: false,
        };

        let deps = IncludeResolver::new(&paths, &headers)
            .collect(vec![HeaderReference::new("foo"), HeaderReference::new("bar")], policy)
            .unwrap();

        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].path, d[0].join("foo"));
        assert!(!deps[0].is_system);
    }

    #[test]
    fn test_collect_missing_header_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let d = dirs(&tmp, &["inc"]);
        fs::write(d[0].join("foo"), "").unwrap();
        let paths = SearchPathList::from_absolute(d);
        let headers = SystemHeaders::new("test", ["bar"]);

        let err = IncludeResolver::new(&paths, &headers)
            .collect(vec![HeaderReference::new("foo"), HeaderReference::new("bar")], ResolvePolicy::default())
            .unwrap_err();

        assert!(matches!(err, ResolveError::HeaderNotFound { ref header } if header == "bar"));
        assert_eq!(err.exit_code(), 65);
        assert!(err.to_string().contains("bar: No such file or directory"));
    }

    #[test]
    fn test_collect_tolerates_missing_header() {
        let paths = SearchPathList::default();
        let headers = SystemHeaders::default();
        let policy = ResolvePolicy {
            ignore_system_headers: false,
            tolerate_missing_headers: true,
        };

        let deps = IncludeResolver::new(&paths, &headers)
            .collect(vec![HeaderReference::new("generated.kl")], policy)
            .unwrap();

        assert_eq!(deps.len(), 1);
        assert!(deps[0].assumed_generated);
        assert_eq!(deps[0].display_path(), "generated.kl");
    }
}
