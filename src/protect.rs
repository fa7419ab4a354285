//! Protected-process classification
//!
//! A process is protected when its joined, lowercased command line contains
//! any protected keyword as a plain substring. Matching is deliberately loose:
//! a false positive only leaves a process running.

/// Classifies command lines against a fixed keyword set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionClassifier {
    keywords: Vec<String>,
}

impl ProtectionClassifier {
    /// Create a classifier; keywords are matched lowercase
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// True if any keyword occurs in the command line
    pub fn is_protected(&self, cmdline: &[String]) -> bool {
        self.matched_keyword(cmdline).is_some()
    }

    /// First keyword (in declaration order) found in the command line
    pub fn matched_keyword(&self, cmdline: &[String]) -> Option<&str> {
        if cmdline.is_empty() {
            return None;
        }

        let text = cmdline.join(" ").to_lowercase();
        self.keywords
            .iter()
            .find(|k| text.contains(k.as_str()))
            .map(String::as_str)
    }

    /// Keywords in use
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}
