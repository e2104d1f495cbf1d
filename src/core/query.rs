//! Query parameters and finder specifications

use crate::core::entity::Resource;
use crate::core::error::QueryError;
use crate::core::field::FieldValue;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

/// Query-string parameters, kept in insertion order
pub type Params = IndexMap<String, String>;

/// Separator between attribute names in a compound finder name
pub const FINDER_SEPARATOR: &str = "_and_";

/// Merge `overrides` on top of `defaults`; override values win
pub fn merge_params(defaults: &Params, overrides: &Params) -> Params {
    let mut merged = defaults.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// A conjunction of attribute conditions plus request parameters
///
/// # Example
///
/// ```rust
/// use ldclient::core::query::Finder;
///
/// let finder = Finder::by("group", "UMLS").and("category", "Anatomy");
/// assert_eq!(finder.attributes(), vec!["group", "category"]);
///
/// let parsed = Finder::parse("group_and_category", vec!["UMLS".into(), "Anatomy".into()]).unwrap();
/// assert_eq!(parsed.attributes(), finder.attributes());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Finder {
    conditions: Vec<(String, FieldValue)>,
    params: Params,
    extra_values: Vec<FieldValue>,
}

impl Finder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a finder with a single condition
    pub fn by(attribute: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new().and(attribute, value)
    }

    /// Add a condition
    pub fn and(mut self, attribute: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.conditions.push((attribute.into(), value.into()));
        self
    }

    /// Replace the request parameters
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Parse a compound attribute name such as `name_and_acronym`
    ///
    /// Values bind positionally. Values beyond the number of attributes are
    /// kept as [`Finder::extra_values`] and take no part in matching.
    pub fn parse(compound: &str, values: Vec<FieldValue>) -> Result<Self, QueryError> {
        let attributes: Vec<&str> = compound
            .split(FINDER_SEPARATOR)
            .filter(|a| !a.is_empty())
            .collect();
        Self::bind(compound, attributes, values)
    }

    /// Parse a finder method name
    ///
    /// Accepts `find_by_<a>_and_<b>` and `findBy<A>And<B>`; camel-case
    /// segments get their first letter lower-cased (`findByViewingRestriction`
    /// filters on `viewingRestriction`).
    pub fn from_method_name(name: &str, values: Vec<FieldValue>) -> Result<Self, QueryError> {
        static SNAKE: OnceLock<Regex> = OnceLock::new();
        static CAMEL: OnceLock<Regex> = OnceLock::new();

        let snake = SNAKE.get_or_init(|| Regex::new(r"^find_by_(.+)$").expect("valid regex"));
        let camel = CAMEL.get_or_init(|| Regex::new(r"^findBy([A-Z].*)$").expect("valid regex"));

        if let Some(caps) = snake.captures(name) {
            return Self::parse(&caps[1], values);
        }
        if let Some(caps) = camel.captures(name) {
            let attributes = split_camel(&caps[1]);
            let refs = attributes.iter().map(String::as_str).collect();
            return Self::bind(name, refs, values);
        }

        Err(QueryError::NotAFinder {
            name: name.to_string(),
        })
    }

    fn bind(finder: &str, attributes: Vec<&str>, values: Vec<FieldValue>) -> Result<Self, QueryError> {
        if attributes.is_empty() || values.len() < attributes.len() {
            return Err(QueryError::MissingValue {
                finder: finder.to_string(),
                expected: attributes.len().max(1),
                given: values.len(),
            });
        }

        let mut values = values.into_iter();
        let conditions = attributes
            .into_iter()
            .map(|attr| (attr.to_string(), values.next().unwrap_or_default()))
            .collect();

        Ok(Self {
            conditions,
            params: Params::new(),
            extra_values: values.collect(),
        })
    }

    /// Attribute names in declaration order
    pub fn attributes(&self) -> Vec<&str> {
        self.conditions.iter().map(|(a, _)| a.as_str()).collect()
    }

    pub fn conditions(&self) -> &[(String, FieldValue)] {
        &self.conditions
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Positional values that were not bound to an attribute
    pub fn extra_values(&self) -> &[FieldValue] {
        &self.extra_values
    }

    /// Check a resource against every condition
    ///
    /// Multi-valued attributes match when they contain the target, others by
    /// equality. Attributes the resource never received are skipped rather
    /// than counted as a mismatch. Always-present attributes exist on every
    /// instance of their type, so when the payload lacked one it holds null
    /// and is compared like any other value.
    pub fn matches(&self, resource: &Resource) -> bool {
        self.conditions.iter().all(|(attribute, target)| {
            if !resource.has(attribute) {
                return true;
            }
            let value = resource.get(attribute);
            if value.is_list() {
                value.contains(target)
            } else {
                value.matches(target)
            }
        })
    }
}

/// `NameAndAcronym` → `["name", "acronym"]`
fn split_camel(camel: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut rest = camel;

    while let Some(pos) = find_camel_and(rest) {
        segments.push(&rest[..pos]);
        rest = &rest[pos + 3..];
    }
    segments.push(rest);

    segments
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(lower_first)
        .collect()
}

/// Position of an `And` that separates two capitalised segments
fn find_camel_and(s: &str) -> Option<usize> {
    s.match_indices("And").map(|(i, _)| i).find(|&i| {
        i > 0
            && s[i + 3..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_uppercase())
    })
}

fn lower_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(pairs: &[(&str, FieldValue)]) -> Resource {
        let mut r = Resource::new();
        for (k, v) in pairs {
            r.set(*k, v.clone());
        }
        r
    }

    #[test]
    fn test_merge_params_override_wins() {
        let mut defaults = Params::new();
        defaults.insert("include".into(), "all".into());
        defaults.insert("page".into(), "1".into());
        let mut overrides = Params::new();
        overrides.insert("include".into(), "name".into());

        let merged = merge_params(&defaults, &overrides);
        assert_eq!(merged["include"], "name");
        assert_eq!(merged["page"], "1");
    }

    #[test]
    fn test_parse_compound_name() {
        let finder = Finder::parse("name_and_acronym", vec!["Bio".into(), "BRO".into()]).unwrap();
        assert_eq!(finder.attributes(), vec!["name", "acronym"]);
        assert!(finder.extra_values().is_empty());
    }

    #[test]
    fn test_parse_keeps_surplus_values_unbound() {
        let finder = Finder::parse("acronym", vec!["BRO".into(), "extra".into()]).unwrap();
        assert_eq!(finder.conditions().len(), 1);
        assert_eq!(finder.extra_values(), &[FieldValue::from("extra")]);
    }

    #[test]
    fn test_parse_rejects_missing_values() {
        let err = Finder::parse("name_and_acronym", vec!["Bio".into()]).unwrap_err();
        assert_eq!(
            err,
            QueryError::MissingValue {
                finder: "name_and_acronym".into(),
                expected: 2,
                given: 1,
            }
        );
    }

    #[test]
    fn test_method_names() {
        let snake = Finder::from_method_name("find_by_group_and_category", vec!["A".into(), "B".into()])
            .unwrap();
        assert_eq!(snake.attributes(), vec!["group", "category"]);

        let camel = Finder::from_method_name(
            "findByViewingRestrictionAndAcronym",
            vec!["private".into(), "BRO".into()],
        )
        .unwrap();
        assert_eq!(camel.attributes(), vec!["viewingRestriction", "acronym"]);

        let single = Finder::from_method_name("findByBrand", vec!["x".into()]).unwrap();
        assert_eq!(single.attributes(), vec!["brand"]);

        let err = Finder::from_method_name("all", vec![]).unwrap_err();
        assert!(matches!(err, QueryError::NotAFinder { .. }));
    }

    #[test]
    fn test_matches_scalar_and_list() {
        let finder = Finder::by("acronym", "BRO").and("group", "UMLS");

        let hit = resource(&[("acronym", "BRO".into()), ("group", vec!["OBO", "UMLS"].into())]);
        let miss = resource(&[("acronym", "BRO".into()), ("group", vec!["OBO"].into())]);

        assert!(finder.matches(&hit));
        assert!(!finder.matches(&miss));
    }

    #[test]
    fn test_absent_attribute_is_skipped() {
        let finder = Finder::by("acronym", "BRO").and("group", "UMLS");
        let partial = resource(&[("acronym", "BRO".into())]);
        assert!(finder.matches(&partial));

        let wrong = resource(&[("acronym", "NCIT".into())]);
        assert!(!finder.matches(&wrong));
    }

    #[test]
    fn test_null_attribute_is_compared() {
        let finder = Finder::by("acronym", "BRO");
        let null = resource(&[("acronym", FieldValue::Null)]);
        assert!(!finder.matches(&null));
    }

    #[test]
    fn test_always_present_attribute_is_compared() {
        use crate::core::descriptor::TypeDescriptor;

        let descriptor =
            TypeDescriptor::with_static("Thing", "application/thing").always_present(["group"]);
        let mut map = indexmap::IndexMap::new();
        map.insert("acronym".to_string(), FieldValue::from("BRO"));
        let thing = Resource::from_map_as(map, &descriptor);

        assert!(thing.has("group"));
        assert!(!Finder::by("acronym", "BRO").and("group", "UMLS").matches(&thing));
        assert!(Finder::by("acronym", "BRO").and("group", FieldValue::Null).matches(&thing));
    }
}
