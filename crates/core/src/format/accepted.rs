//! Policy for which declared upload types are accepted as conversion input.

use super::registry::FormatRegistry;

/// Set of MIME types an uploaded file may declare.
///
/// The default policy is derived from the output registry, so an image type
/// with no matching output format (e.g. `image/gif`) is rejected unless it is
/// listed explicitly in configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedInputTypes {
    types: Vec<String>,
}

impl AcceptedInputTypes {
    /// Builds a policy from an explicit list of MIME types.
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for t in types {
            let t = normalize(t.as_ref());
            if !t.is_empty() && !normalized.contains(&t) {
                normalized.push(t);
            }
        }
        Self { types: normalized }
    }

    /// Policy accepting exactly the output MIME types of the registry.
    pub fn from_registry(registry: &FormatRegistry) -> Self {
        Self::new(registry.mime_types())
    }

    /// True iff the declared type is an `image/` type present in the policy.
    pub fn is_acceptable(&self, declared_type: &str) -> bool {
        let declared = normalize(declared_type);
        declared.starts_with("image/") && self.types.iter().any(|t| *t == declared)
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }
}

impl Default for AcceptedInputTypes {
    fn default() -> Self {
        Self::from_registry(&FormatRegistry::new())
    }
}

/// Lowercases and strips parameters such as `; charset=...`.
fn normalize(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
