//! Per-request description consumed by the transport adapter.

use http::Method;

/// Metadata for an individual HTTP request.
///
/// The path is relative to the configured API host. Query parameters keep
/// their insertion order so the encoded URL is deterministic.
#[derive(Debug, Clone)]
pub(crate) struct RequestMetadata {
    /// The HTTP method (GET, POST, etc.).
    pub method: Method,

    /// The request path (relative to the API host).
    pub path: String,

    /// Query parameters for this request.
    pub query_params: Vec<(String, String)>,
}

impl RequestMetadata {
    /// Creates a new `RequestMetadata` with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query_params: Vec::new(),
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Shorthand for a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }

    /// Adds multiple query parameters to the request.
    pub fn with_query_params(
        mut self,
        params: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.query_params.extend(params);
        self
    }

    /// Requests every measurement type the API can compute.
    pub fn all_measurement_types(self) -> Self {
        self.with_query_param("measurements_type", "all")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_keep_insertion_order() {
        let metadata = RequestMetadata::get("/measurements/mtm-widgets/")
            .with_query_param("page", "1")
            .with_query_params(vec![("page_size".to_string(), "20".to_string())])
            .with_query_param("is_archived", "false");

        let keys: Vec<&str> = metadata.query_params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["page", "page_size", "is_archived"]);
    }

    #[test]
    fn all_measurement_types_flag() {
        let metadata = RequestMetadata::post("/persons/").all_measurement_types();
        assert_eq!(metadata.method, Method::POST);
        assert_eq!(
            metadata.query_params,
            vec![("measurements_type".to_string(), "all".to_string())]
        );
    }
}
