//! Label derivation for finished requests.

use std::collections::{BTreeMap, HashMap};

use promtracer_core::RequestContext;

pub const LABEL_METHOD: &str = "method";
pub const LABEL_STATUS_CODE: &str = "statusCode";
pub const LABEL_PATH: &str = "path";

/// Variable label names of both server metric families, in declaration order.
pub const LABEL_NAMES: [&str; 3] = [LABEL_METHOD, LABEL_STATUS_CODE, LABEL_PATH];

/// Value used when a request field is empty. The registry rejects missing label values.
pub const UNKNOWN_LABEL_VALUE: &str = "unknown";

/// Ordered label name -> value mapping for one observation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrowed view in the shape `prometheus` vectors look metrics up by.
    pub fn as_map(&self) -> HashMap<&str, &str> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Build method/statusCode/path labels for a finished request.
pub fn gen_labels(c: &RequestContext) -> Labels {
    let status = c.status_code().map(|s| s.to_string()).unwrap_or_default();

    Labels::from_iter([
        (LABEL_METHOD, default_if_empty(c.method(), UNKNOWN_LABEL_VALUE)),
        (LABEL_STATUS_CODE, default_if_empty(&status, UNKNOWN_LABEL_VALUE)),
        (LABEL_PATH, default_if_empty(c.full_path(), UNKNOWN_LABEL_VALUE)),
    ])
}

pub fn default_if_empty<'a>(val: &'a str, default: &'a str) -> &'a str {
    if val.is_empty() {
        default
    } else {
        val
    }
}
