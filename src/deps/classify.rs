//! System header classification.
//!
//! The set of headers that ship with the translator differs per controller
//! software release, so the allow-list is data rather than logic. The
//! built-in list matches V7.70-1; a different list can be supplied through
//! the `[headers]` section of the configuration.

use std::collections::HashSet;

/// Release the built-in header list was taken from.
pub const DEFAULT_RELEASE: &str = "V7.70-1";

/// Headers shipped with ktrans V7.70-1.
pub const DEFAULT_SYSTEM_HEADERS: &[&str] = &[
    "iosetup.kl",
    "kldctptx.kl",
    "kldcutil.kl",
    "klersys.kl",
    "klerxmlf.kl",
    "klevaxdf.kl",
    "klevccdf.kl",
    "klevkeys.kl",
    "klevkmsk.kl",
    "klevksp.kl",
    "klevtpe.kl",
    "klevutil.kl",
    "kliosop.kl",
    "kliotyps.kl",
    "kliouop.kl",
    "klrdread.kl",
    "klrdutil.kl",
    "kluifdir.kl",
    "passcons.kl",
    "ppedef.kl",
    "runform.kl",
    "sledef.kl",
];

/// Allow-list of built-in headers for one translator release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemHeaders {
    release: String,
    names: HashSet<String>,
}

impl SystemHeaders {
    /// Create a header list for the given release.
    pub fn new<I, S>(release: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SystemHeaders {
            release: release.into(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The release this list belongs to.
    pub fn release(&self) -> &str {
        &self.release
    }

    /// Whether `header` is a system header. Case-sensitive, exact match.
    pub fn is_system_header(&self, header: &str) -> bool {
        self.names.contains(header)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for SystemHeaders {
    fn default() -> Self {
        SystemHeaders::new(DEFAULT_RELEASE, DEFAULT_SYSTEM_HEADERS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list() {
        let headers = SystemHeaders::default();
        assert_eq!(headers.release(), "V7.70-1");
        assert_eq!(headers.len(), 22);
        assert!(headers.is_system_header("kliotyps.kl"));
        assert!(headers.is_system_header("runform.kl"));
        assert!(!headers.is_system_header("myheader.kl"));
    }

    #[test]
    fn test_exact_case_sensitive_match() {
        let headers = SystemHeaders::default();
        assert!(!headers.is_system_header("KLIOTYPS.KL"));
        assert!(!headers.is_system_header("kliotyps"));
        assert!(!headers.is_system_header("inc/kliotyps.kl"));
    }

    #[test]
    fn test_custom_release() {
        let headers = SystemHeaders::new("V9.10", ["bar"]);
        assert!(headers.is_system_header("bar"));
        assert!(!headers.is_system_header("kliotyps.kl"));
    }
}
