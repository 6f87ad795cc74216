//! Output aggregation
//!
//! Several scopes may write the same destination name. Their content is
//! concatenated in the order it arrives, while the import path stays the one
//! recorded by the first writer.

use std::collections::HashMap;

use tmplgen::tracing::prefix;
use tracing::debug;

/// One output file produced by a single encoder invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A generated file tagged with the import path of the input file whose
/// scope produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    pub content: String,
    pub import_path: String,
}

/// Merged output for one destination name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    pub name: String,
    pub content: String,
    /// Import path of the first fragment that wrote `name`
    pub import_path: String,
}

/// Destination for committed output.
pub trait EmissionSink {
    fn emit(&mut self, entry: OutputEntry);
}

impl EmissionSink for Vec<OutputEntry> {
    fn emit(&mut self, entry: OutputEntry) {
        self.push(entry);
    }
}

/// Output files keyed by destination name, kept in first-seen order.
#[derive(Debug, Default)]
pub struct OutputSet {
    entries: Vec<OutputEntry>,
    index: HashMap<String, usize>,
}

impl OutputSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one fragment in.
    pub fn add(&mut self, fragment: Fragment) {
        match self.index.get(&fragment.name) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                debug!(
                    "{} appending to {} (owned by {}, fragment from {})",
                    prefix::EMIT,
                    entry.name,
                    entry.import_path,
                    fragment.import_path
                );
                entry.content.push_str(&fragment.content);
            }
            None => {
                self.index.insert(fragment.name.clone(), self.entries.len());
                self.entries.push(OutputEntry {
                    name: fragment.name,
                    content: fragment.content,
                    import_path: fragment.import_path,
                });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&OutputEntry> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hand every entry to `sink`, once each. Returns how many were emitted.
    pub fn commit(self, sink: &mut impl EmissionSink) -> usize {
        let count = self.entries.len();
        for entry in self.entries {
            debug!("{} emitting {} ({})", prefix::EMIT, entry.name, entry.import_path);
            sink.emit(entry);
        }
        count
    }
}

impl Extend<Fragment> for OutputSet {
    fn extend<I: IntoIterator<Item = Fragment>>(&mut self, fragments: I) {
        for fragment in fragments {
            self.add(fragment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fragment(name: &str, content: &str, import_path: &str) -> Fragment {
        Fragment {
            name: name.to_string(),
            content: content.to_string(),
            import_path: import_path.to_string(),
        }
    }

    #[test]
    fn test_first_writer_keeps_import_path() {
        let mut output = OutputSet::new();
        output.add(fragment("routes.go", "// billing\n", "acme/billing"));
        output.add(fragment("routes.go", "// users\n", "acme/users"));

        let entry = output.get("routes.go").unwrap();
        assert_eq!(entry.content, "// billing\n// users\n");
        assert_eq!(entry.import_path, "acme/billing");
        assert_eq!(output.len(), 1);
    }

    #[test]
    fn test_commit_emits_each_name_once_in_first_seen_order() {
        let mut output = OutputSet::new();
        output.extend([
            fragment("b.txt", "1", "x"),
            fragment("a.txt", "2", "y"),
            fragment("b.txt", "3", "z"),
        ]);

        let mut sink = Vec::new();
        assert_eq!(output.commit(&mut sink), 2);
        assert_eq!(
            sink,
            vec![
                OutputEntry {
                    name: "b.txt".to_string(),
                    content: "13".to_string(),
                    import_path: "x".to_string(),
                },
                OutputEntry {
                    name: "a.txt".to_string(),
                    content: "2".to_string(),
                    import_path: "y".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_set_commits_nothing() {
        let output = OutputSet::new();
        assert!(output.is_empty());
        let mut sink: Vec<OutputEntry> = Vec::new();
        assert_eq!(output.commit(&mut sink), 0);
        assert!(sink.is_empty());
    }
}
