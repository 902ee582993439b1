//! Search request envelope and response models

use crate::config::ResolverSettings;
use crate::params::{
    resolve_fields, resolve_filter, resolve_limit, resolve_optional_boolean,
    resolve_optional_number, resolve_required_string, resolve_trimmed_optional_string,
    whole_number, Parameter, ResolveError, Sources,
};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

/// Fully resolved and validated search request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRequest {
    /// Cortex Search service to query
    pub service_name: String,
    /// The search query string
    pub query: String,
    /// Maximum number of results (at least 1)
    pub limit: u32,
    /// Filter expression object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Map<String, Value>>,
    /// Columns to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    /// Result offset
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_number"
    )]
    pub offset: Option<f64>,
    /// Whether to return relevance scores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_scores: Option<bool>,
    /// Minimum relevance score
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_number"
    )]
    pub score_threshold: Option<f64>,
    /// Reranker name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reranker: Option<String>,
    /// Ranking profile name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking_profile: Option<String>,
}

/// Whole numbers go out as JSON integers (`10`, not `10.0`)
fn serialize_number<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match *value {
        Some(number) => match whole_number(number) {
            Some(whole) => serializer.serialize_i64(whole),
            None => serializer.serialize_f64(number),
        },
        None => serializer.serialize_none(),
    }
}

impl ParsedRequest {
    /// Resolve every parameter from the primary/fallback pair
    pub fn resolve(sources: &Sources<'_>, settings: &ResolverSettings) -> Result<Self, ResolveError> {
        let service_name = resolve_required_string(
            sources.primary(Parameter::ServiceName).as_deref(),
            sources.fallback(Parameter::ServiceName).as_deref(),
            &settings.missing_service_message,
        )?;
        let query = resolve_required_string(
            sources.primary(Parameter::Query).as_deref(),
            sources.fallback(Parameter::Query).as_deref(),
            &settings.missing_query_message,
        )?;

        let lookup = |param: Parameter| sources.lookup(param);

        let request = Self {
            service_name,
            query,
            limit: resolve_limit(lookup(Parameter::Limit).as_deref()),
            filter: resolve_filter(lookup(Parameter::Filter).as_deref())?,
            fields: resolve_fields(lookup(Parameter::Fields).as_deref())?,
            offset: resolve_optional_number(Parameter::Offset, lookup(Parameter::Offset).as_deref())?,
            include_scores: resolve_optional_boolean(lookup(Parameter::IncludeScores).as_deref()),
            score_threshold: resolve_optional_number(
                Parameter::ScoreThreshold,
                lookup(Parameter::ScoreThreshold).as_deref(),
            )?,
            reranker: resolve_trimmed_optional_string(lookup(Parameter::Reranker).as_deref()),
            ranking_profile: resolve_trimmed_optional_string(
                lookup(Parameter::RankingProfile).as_deref(),
            ),
        };

        debug!(
            service = %request.service_name,
            limit = request.limit,
            has_filter = request.filter.is_some(),
            fields = ?request.fields,
            "Resolved search request"
        );

        Ok(request)
    }

    /// Field list, only when non-empty
    pub fn non_empty_fields(&self) -> Option<&[String]> {
        self.fields.as_deref().filter(|fields| !fields.is_empty())
    }
}

/// Response returned by the search collaborator
///
/// Only `response` is read; any other keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    #[serde(default)]
    pub response: Value,
}

impl SearchResponse {
    pub fn new(response: Value) -> Self {
        Self { response }
    }
}

/// Payload reported on success: the query and the collaborator's response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultPayload {
    pub query: String,
    pub response: Value,
}

impl ResultPayload {
    pub fn new(query: impl Into<String>, response: SearchResponse) -> Self {
        Self {
            query: query.into(),
            response: response.response,
        }
    }

    /// Indented JSON for the console
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Single-line JSON for the output channel
    pub fn to_compact_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MapSource;
    use serde_json::json;

    fn resolve(primary: &MapSource, fallback: &MapSource) -> Result<ParsedRequest, ResolveError> {
        ParsedRequest::resolve(&Sources::new(primary, fallback), &ResolverSettings::default())
    }

    #[test]
    fn test_minimal_request() {
        let primary = MapSource::new()
            .with("service-name", "svc")
            .with("query", "hello")
            .with("limit", "2");
        let request = resolve(&primary, &MapSource::new()).unwrap();

        assert_eq!(
            request,
            ParsedRequest {
                service_name: "svc".to_string(),
                query: "hello".to_string(),
                limit: 2,
                filter: None,
                fields: None,
                offset: None,
                include_scores: None,
                score_threshold: None,
                reranker: None,
                ranking_profile: None,
            }
        );
    }

    #[test]
    fn test_env_fallback_for_every_parameter() {
        let fallback = MapSource::new()
            .with("SEARCH_SERVICE", "db.schema.svc")
            .with("SEARCH_QUERY", " refunds ")
            .with("SEARCH_LIMIT", "5")
            .with("SEARCH_FILTER", r#"{"@eq":{"region":"EU"}}"#)
            .with("SEARCH_FIELDS", "title, body")
            .with("SEARCH_OFFSET", "10")
            .with("SEARCH_INCLUDE_SCORES", "yes")
            .with("SEARCH_SCORE_THRESHOLD", "0.5")
            .with("SEARCH_RERANKER", " none ")
            .with("SEARCH_RANKING_PROFILE", "fast");
        let request = resolve(&MapSource::new(), &fallback).unwrap();

        assert_eq!(request.service_name, "db.schema.svc");
        assert_eq!(request.query, "refunds");
        assert_eq!(request.limit, 5);
        assert_eq!(
            request.filter.map(Value::Object),
            Some(json!({"@eq": {"region": "EU"}}))
        );
        assert_eq!(request.fields, Some(vec!["title".to_string(), "body".to_string()]));
        assert_eq!(request.offset, Some(10.0));
        assert_eq!(request.include_scores, Some(true));
        assert_eq!(request.score_threshold, Some(0.5));
        assert_eq!(request.reranker.as_deref(), Some("none"));
        assert_eq!(request.ranking_profile.as_deref(), Some("fast"));
    }

    #[test]
    fn test_primary_overrides_env() {
        let primary = MapSource::new()
            .with("service-name", "input-svc")
            .with("query", "q")
            .with("fields", "a");
        let fallback = MapSource::new()
            .with("SEARCH_SERVICE", "env-svc")
            .with("SEARCH_FIELDS", "b,c")
            .with("SEARCH_LIMIT", "7");
        let request = resolve(&primary, &fallback).unwrap();

        assert_eq!(request.service_name, "input-svc");
        assert_eq!(request.fields, Some(vec!["a".to_string()]));
        assert_eq!(request.limit, 7);
    }

    #[test]
    fn test_missing_service_message() {
        let primary = MapSource::new().with("query", "hello");
        let settings = ResolverSettings {
            missing_service_message: "service please".to_string(),
            ..Default::default()
        };
        let err = ParsedRequest::resolve(&Sources::new(&primary, &MapSource::new()), &settings)
            .unwrap_err();
        assert_eq!(err, ResolveError::MissingParameter("service please".to_string()));
    }

    #[test]
    fn test_invalid_values_surface() {
        let primary = MapSource::new()
            .with("service-name", "svc")
            .with("query", "q")
            .with("offset", "ten");
        let err = resolve(&primary, &MapSource::new()).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidNumber {
                parameter: Parameter::Offset,
                ..
            }
        ));

        let primary = MapSource::new()
            .with("service-name", "svc")
            .with("query", "q")
            .with("filter", "[1]");
        let err = resolve(&primary, &MapSource::new()).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidFilter(_)));
    }

    #[test]
    fn test_envelope_serialization_omits_absent() {
        let primary = MapSource::new()
            .with("service-name", "svc")
            .with("query", "hello")
            .with("include-scores", "false");
        let request = resolve(&primary, &MapSource::new()).unwrap();

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "serviceName": "svc",
                "query": "hello",
                "limit": 3,
                "includeScores": false
            })
        );
    }

    #[test]
    fn test_envelope_whole_numbers_as_integers() {
        let primary = MapSource::new()
            .with("service-name", "svc")
            .with("query", "hello")
            .with("offset", "10")
            .with("score-threshold", "0.5");
        let request = resolve(&primary, &MapSource::new()).unwrap();

        let text = serde_json::to_string(&request).unwrap();
        assert!(text.contains(r#""offset":10,"#), "{text}");
        assert!(text.contains(r#""scoreThreshold":0.5"#), "{text}");

        let round_trip: ParsedRequest = serde_json::from_str(&text).unwrap();
        assert_eq!(round_trip.offset, Some(10.0));
    }

    #[test]
    fn test_non_empty_fields() {
        let primary = MapSource::new()
            .with("service-name", "svc")
            .with("query", "q")
            .with("fields", " , ");
        let request = resolve(&primary, &MapSource::new()).unwrap();
        assert_eq!(request.fields, Some(vec![]));
        assert!(request.non_empty_fields().is_none());
    }

    #[test]
    fn test_payload_json() {
        let payload = ResultPayload::new("hello", SearchResponse::new(json!({"results": [1]})));
        assert_eq!(
            payload.to_compact_json().unwrap(),
            r#"{"query":"hello","response":{"results":[1]}}"#
        );
        assert!(payload.to_pretty_json().unwrap().contains("\n  \"query\": \"hello\""));
    }

    #[test]
    fn test_response_ignores_extra_keys() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"response": [1, 2], "request_id": "abc"}"#).unwrap();
        assert_eq!(response.response, json!([1, 2]));

        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.response, Value::Null);
    }
}
