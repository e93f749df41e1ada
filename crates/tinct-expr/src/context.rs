//! Theme lookup for bare identifiers.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Resolves theme tokens such as `primary` to color strings.
///
/// The evaluator asks for category `"colors"`. Returning `None` is not an
/// error: the name is then handed to the color library as-is, so CSS named
/// colors keep working without a palette entry.
pub trait ThemeContext {
    fn resolve(&self, category: &str, name: &str) -> Option<String>;
}

impl<T: ThemeContext + ?Sized> ThemeContext for &T {
    fn resolve(&self, category: &str, name: &str) -> Option<String> {
        (**self).resolve(category, name)
    }
}

/// A flat palette; the category is ignored.
impl<S: BuildHasher> ThemeContext for HashMap<String, String, S> {
    fn resolve(&self, _category: &str, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// A flat palette; the category is ignored.
impl ThemeContext for BTreeMap<String, String> {
    fn resolve(&self, _category: &str, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// No palette at all: every token falls through to the color library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyContext;

impl ThemeContext for EmptyContext {
    fn resolve(&self, _category: &str, _name: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_resolve_by_name() {
        let mut hash = HashMap::new();
        hash.insert("primary".to_string(), "#3366ff".to_string());
        let tree: BTreeMap<_, _> = hash.clone().into_iter().collect();

        assert_eq!(hash.resolve("colors", "primary").as_deref(), Some("#3366ff"));
        assert_eq!(tree.resolve("anything", "primary").as_deref(), Some("#3366ff"));
        assert_eq!(tree.resolve("colors", "missing"), None);
    }

    #[test]
    fn empty_resolves_nothing() {
        assert_eq!(EmptyContext.resolve("colors", "primary"), None);
    }

    #[test]
    fn references_forward() {
        let tree = BTreeMap::from([("a".to_string(), "#fff".to_string())]);
        let by_ref: &dyn ThemeContext = &tree;
        assert_eq!((&by_ref).resolve("colors", "a").as_deref(), Some("#fff"));
    }
}
