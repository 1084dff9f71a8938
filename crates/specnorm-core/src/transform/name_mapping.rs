use indexmap::IndexMap;

use super::name_normalizer::{decode_pointer_segment, normalize_schema_name};
use crate::config::CollisionPolicy;
use crate::error::NormalizeError;

/// Immutable table pairing original schema names with their normalized symbols.
///
/// Both the raw registry key and its JSON Pointer decoded form are keys, since
/// references in the wild use either.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameMapping {
    to_normalized: IndexMap<String, String>,
    to_original: IndexMap<String, String>,
}

impl NameMapping {
    /// Build the mapping from a snapshot of every registry name, in registry order.
    pub fn build<'a, I>(names: I, policy: CollisionPolicy) -> Result<Self, NormalizeError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::build_with_aliases(names, std::iter::empty(), policy)
    }

    /// Like [`NameMapping::build`], plus `(reference name, symbol)` aliases for
    /// references that point outside the registry at a definition added later.
    ///
    /// Aliases never override a registry name and never count as symbols.
    pub fn build_with_aliases<'a, I, A>(
        names: I,
        aliases: A,
        policy: CollisionPolicy,
    ) -> Result<Self, NormalizeError>
    where
        I: IntoIterator<Item = &'a str>,
        A: IntoIterator<Item = (String, String)>,
    {
        let mut mapping = Self::default();

        for name in names {
            let decoded = decode_pointer_segment(name);
            let mut normalized = normalize_schema_name(&decoded);

            // Registry keys are unique, so any earlier owner of the symbol
            // is a different schema.
            if let Some(first) = mapping.to_original.get(&normalized) {
                match policy {
                    CollisionPolicy::Reject => {
                        return Err(NormalizeError::NameCollision {
                            first: first.clone(),
                            second: name.to_string(),
                            normalized,
                        });
                    }
                    CollisionPolicy::Suffix => {
                        normalized = mapping.free_symbol(&normalized);
                        log::debug!("schema '{name}' renamed to '{normalized}' to avoid a collision");
                    }
                    CollisionPolicy::LastWins => {
                        log::warn!(
                            "schemas '{first}' and '{name}' both normalize to '{normalized}'; keeping '{name}'"
                        );
                    }
                }
            }

            // A raw registry key always maps to its own symbol. The decoded
            // form is only a lookup alias and never replaces a raw key.
            mapping
                .to_normalized
                .insert(name.to_string(), normalized.clone());
            mapping
                .to_normalized
                .entry(decoded)
                .or_insert_with(|| normalized.clone());
            mapping.to_original.insert(normalized, name.to_string());
        }

        for (reference, symbol) in aliases {
            let decoded = decode_pointer_segment(&reference);
            mapping
                .to_normalized
                .entry(decoded)
                .or_insert_with(|| symbol.clone());
            mapping.to_normalized.entry(reference).or_insert(symbol);
        }

        Ok(mapping)
    }

    /// First `<base>_<n>` (n >= 2) not yet used as a normalized symbol.
    fn free_symbol(&self, base: &str) -> String {
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.to_original.contains_key(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Normalized symbol for `original`, or `original` itself when it is not a
    /// registry name.
    pub fn resolve<'a>(&'a self, original: &'a str) -> &'a str {
        self.to_normalized
            .get(original)
            .map(String::as_str)
            .unwrap_or(original)
    }

    /// Normalized symbol for `original`, if it is a registry name.
    pub fn get(&self, original: &str) -> Option<&str> {
        self.to_normalized.get(original).map(String::as_str)
    }

    /// The registry name that produced `normalized`.
    pub fn original_of(&self, normalized: &str) -> Option<&str> {
        self.to_original.get(normalized).map(String::as_str)
    }

    /// `(normalized, original)` pairs, one per surviving symbol, in registry order.
    pub fn symbols(&self) -> impl Iterator<Item = (&str, &str)> {
        self.to_original
            .iter()
            .map(|(normalized, original)| (normalized.as_str(), original.as_str()))
    }

    /// Original → normalized table, suitable for persisting next to the output.
    pub fn to_table(&self) -> IndexMap<&str, &str> {
        self.to_original
            .iter()
            .map(|(normalized, original)| (original.as_str(), normalized.as_str()))
            .collect()
    }

    /// Number of distinct normalized symbols.
    pub fn len(&self) -> usize {
        self.to_original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_original.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(names: &[&str], policy: CollisionPolicy) -> Result<NameMapping, NormalizeError> {
        NameMapping::build(names.iter().copied(), policy)
    }

    #[test]
    fn test_raw_and_decoded_keys() {
        let m = build(&["a~1b~0c"], CollisionPolicy::Reject).unwrap();
        assert_eq!(m.resolve("a~1b~0c"), "a_b_c");
        assert_eq!(m.resolve("a/b~c"), "a_b_c");
        assert_eq!(m.original_of("a_b_c"), Some("a~1b~0c"));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_identity_fallback() {
        let m = build(&["metabase.api.User"], CollisionPolicy::Reject).unwrap();
        assert_eq!(m.resolve("external.Thing"), "external.Thing");
        assert_eq!(m.get("external.Thing"), None);
    }

    #[test]
    fn test_escaped_and_plain_keys_are_distinct_schemas() {
        let err = build(&["a~1b", "a/b"], CollisionPolicy::Reject).unwrap_err();
        assert!(matches!(err, NormalizeError::NameCollision { .. }));

        let m = build(&["a~1b", "a/b"], CollisionPolicy::Suffix).unwrap();
        assert_eq!(m.resolve("a~1b"), "a_b");
        assert_eq!(m.resolve("a/b"), "a_b_2");
    }

    #[test]
    fn test_plain_key_first_keeps_its_symbol() {
        let m = build(&["a/b", "a~1b"], CollisionPolicy::Suffix).unwrap();
        assert_eq!(m.resolve("a/b"), "a_b");
        assert_eq!(m.resolve("a~1b"), "a_b_2");
        assert_eq!(m.original_of("a_b"), Some("a/b"));
        assert_eq!(m.original_of("a_b_2"), Some("a~1b"));
    }

    #[test]
    fn test_escaped_tilde_decoded_twice() {
        // `x~01` decodes to `x~1`, which normalization decodes again to `x/`.
        let m = build(&["x~01"], CollisionPolicy::Reject).unwrap();
        assert_eq!(m.resolve("x~01"), "x");
        assert_eq!(m.resolve("x~1"), "x");
        assert_eq!(normalize_schema_name("x~01"), "x_1");
    }

    #[test]
    fn test_reject_collision() {
        let err = build(&["a.b", "a-b"], CollisionPolicy::Reject).unwrap_err();
        match err {
            NormalizeError::NameCollision {
                first,
                second,
                normalized,
            } => {
                assert_eq!(first, "a.b");
                assert_eq!(second, "a-b");
                assert_eq!(normalized, "a_b");
            }
        }
    }

    #[test]
    fn test_suffix_collision() {
        let m = build(&["a.b", "a-b", "a/b"], CollisionPolicy::Suffix).unwrap();
        assert_eq!(m.resolve("a.b"), "a_b");
        assert_eq!(m.resolve("a-b"), "a_b_2");
        assert_eq!(m.resolve("a/b"), "a_b_3");
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn test_suffix_skips_taken_symbols() {
        let m = build(&["a_b_2", "a.b", "a-b"], CollisionPolicy::Suffix).unwrap();
        assert_eq!(m.resolve("a_b_2"), "a_b_2");
        assert_eq!(m.resolve("a.b"), "a_b");
        assert_eq!(m.resolve("a-b"), "a_b_3");
    }

    #[test]
    fn test_last_wins_collision_loses_first_name() {
        // Both originals still resolve to the shared symbol, but only the
        // later one is remembered as its source.
        let m = build(&["a.b", "a-b"], CollisionPolicy::LastWins).unwrap();
        assert_eq!(m.resolve("a.b"), "a_b");
        assert_eq!(m.resolve("a-b"), "a_b");
        assert_eq!(m.original_of("a_b"), Some("a-b"));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_aliases_resolve_but_do_not_shadow() {
        let aliases = vec![
            (
                "metabase.util.cron~1ScheduleMap".to_string(),
                "metabase_util_cron_ScheduleMap".to_string(),
            ),
            ("User".to_string(), "Other".to_string()),
        ];
        let m = NameMapping::build_with_aliases(["User"], aliases, CollisionPolicy::Reject)
            .unwrap();
        assert_eq!(
            m.resolve("metabase.util.cron/ScheduleMap"),
            "metabase_util_cron_ScheduleMap"
        );
        assert_eq!(m.resolve("User"), "User");
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_table() {
        let m = build(&["x.Y", "z"], CollisionPolicy::Reject).unwrap();
        let table = m.to_table();
        assert_eq!(table["x.Y"], "x_Y");
        assert_eq!(table["z"], "z");
        let symbols: Vec<_> = m.symbols().collect();
        assert_eq!(symbols, vec![("x_Y", "x.Y"), ("z", "z")]);
    }
}
