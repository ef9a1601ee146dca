use indexmap::IndexMap;

use super::Scalar;

/// Messages of one domain (or a nested group inside it), in insertion order.
pub type MessageMap = IndexMap<String, CatalogValue>;

/// A value inside a translation catalog.
///
/// Persisted catalogs are hierarchical documents, so a value is either a
/// leaf, an ordered list, or a nested map.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogValue {
    Scalar(Scalar),
    Sequence(Vec<CatalogValue>),
    Map(MessageMap),
}

impl CatalogValue {
    pub fn str(value: impl Into<String>) -> Self {
        CatalogValue::Scalar(Scalar::Str(value.into()))
    }

    pub fn null() -> Self {
        CatalogValue::Scalar(Scalar::Null)
    }

    /// Whether this is a list or a map.
    pub fn is_container(&self) -> bool {
        !matches!(self, CatalogValue::Scalar(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CatalogValue::Scalar(s) => s.as_str(),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MessageMap> {
        match self {
            CatalogValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Turn any value into a map. Lists are keyed by position; a non-empty
    /// leaf becomes the single entry `"0"`.
    pub fn into_map(self) -> MessageMap {
        match self {
            CatalogValue::Map(map) => map,
            CatalogValue::Sequence(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            CatalogValue::Scalar(s) if s.is_empty() => MessageMap::new(),
            leaf => MessageMap::from([("0".to_string(), leaf)]),
        }
    }
}

impl From<&str> for CatalogValue {
    fn from(value: &str) -> Self {
        CatalogValue::str(value)
    }
}

impl From<Vec<CatalogValue>> for CatalogValue {
    fn from(items: Vec<CatalogValue>) -> Self {
        CatalogValue::Sequence(items)
    }
}

impl From<i64> for CatalogValue {
    fn from(value: i64) -> Self {
        CatalogValue::Scalar(Scalar::Int(value))
    }
}

impl From<Scalar> for CatalogValue {
    fn from(value: Scalar) -> Self {
        CatalogValue::Scalar(value)
    }
}

/// Translation messages grouped by domain.
///
/// Every domain maps to a [`MessageMap`]; domains keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageCatalog {
    domains: IndexMap<String, MessageMap>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(&self, domain: &str) -> Option<&MessageMap> {
        self.domains.get(domain)
    }

    /// Get a domain, creating it empty if absent.
    pub fn domain_mut(&mut self, domain: &str) -> &mut MessageMap {
        self.domains.entry(domain.to_string()).or_default()
    }

    pub fn insert_domain(&mut self, domain: impl Into<String>, messages: MessageMap) {
        self.domains.insert(domain.into(), messages);
    }

    /// Insert `message` into `domain` unless it is already there.
    ///
    /// Returns `true` if the message was added.
    pub fn insert_if_absent(
        &mut self,
        domain: &str,
        message: &str,
        value: impl Into<CatalogValue>,
    ) -> bool {
        let messages = self.domain_mut(domain);
        if messages.contains_key(message) {
            return false;
        }
        messages.insert(message.to_string(), value.into());
        true
    }

    pub fn domains(&self) -> impl Iterator<Item = (&String, &MessageMap)> {
        self.domains.iter()
    }

    pub fn domain_names(&self) -> impl Iterator<Item = &String> {
        self.domains.keys()
    }

    /// Number of domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Total number of top-level messages across all domains.
    pub fn message_count(&self) -> usize {
        self.domains.values().map(|m| m.len()).sum()
    }

    pub fn into_value(self) -> CatalogValue {
        CatalogValue::Map(
            self.domains
                .into_iter()
                .map(|(domain, messages)| (domain, CatalogValue::Map(messages)))
                .collect(),
        )
    }

    /// Rebuild a catalog from a merged value, forcing every domain to a map.
    pub fn from_value(value: CatalogValue) -> Self {
        Self {
            domains: value
                .into_map()
                .into_iter()
                .map(|(domain, messages)| (domain, messages.into_map()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MessageCatalog {
    type Item = (&'a String, &'a MessageMap);
    type IntoIter = indexmap::map::Iter<'a, String, MessageMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.domains.iter()
    }
}
