use url::form_urlencoded;

/// Percent-encodes a single path segment or query value.
pub fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Query parameters in the Feathers style the remote API understands
/// (`$limit`, `$skip`, `$and[0][field]`, `$sort[field]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    pub fn limit(self, limit: u64) -> Self {
        self.param("$limit", limit)
    }

    pub fn skip(self, skip: u64) -> Self {
        self.param("$skip", skip)
    }

    pub fn and_eq(self, index: usize, field: &str, value: &str) -> Self {
        self.param(format!("$and[{}][{}]", index, field), value)
    }

    pub fn sort(self, field: &str, order: i64) -> Self {
        self.param(format!("$sort[{}]", field), order)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn encode(&self) -> String {
        serde_urlencoded::to_string(&self.pairs).unwrap_or_default()
    }
}

/// Listing options shared by the paginated list operations.
#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    pub limit: u64,
    pub skip: u64,
    pub sort_by: Option<String>,
    pub sort_order: i64,
}

impl ListOptions {
    pub fn apply(&self, query: QueryParams) -> QueryParams {
        query.limit(self.limit).skip(self.skip)
    }

    pub fn apply_sort(&self, query: QueryParams) -> QueryParams {
        match self.sort_by.as_deref() {
            Some(field) => query.sort(field, self.sort_order),
            None => query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_component_matches_uri_component_rules() {
        assert_eq!(encode_component("abc123"), "abc123");
        assert_eq!(encode_component("a b/c"), "a%20b%2Fc");
        assert_eq!(encode_component("x&y=z"), "x%26y%3Dz");
    }

    #[test]
    fn feathers_query_is_ordered() {
        let query = QueryParams::new()
            .limit(50)
            .skip(0)
            .and_eq(0, "groups.selection", "g1")
            .sort("createdAt", -1);
        assert_eq!(
            query.pairs(),
            &[
                ("$limit".to_string(), "50".to_string()),
                ("$skip".to_string(), "0".to_string()),
                ("$and[0][groups.selection]".to_string(), "g1".to_string()),
                ("$sort[createdAt]".to_string(), "-1".to_string()),
            ]
        );
        assert_eq!(
            query.encode(),
            "%24limit=50&%24skip=0&%24and%5B0%5D%5Bgroups.selection%5D=g1&%24sort%5BcreatedAt%5D=-1"
        );
    }

    #[test]
    fn sort_is_skipped_without_field() {
        let options = ListOptions {
            limit: 10,
            skip: 5,
            sort_by: None,
            sort_order: 1,
        };
        let query = options.apply_sort(options.apply(QueryParams::new()));
        assert_eq!(query.pairs().len(), 2);
    }
}
