//! Raw parameter sources and the primary/fallback lookup pair

use std::collections::HashMap;

/// A recognized request parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    ServiceName,
    Query,
    Limit,
    Filter,
    Fields,
    Offset,
    IncludeScores,
    ScoreThreshold,
    Reranker,
    RankingProfile,
}

impl Parameter {
    /// Key of the parameter in the action input set
    pub fn input_key(&self) -> &'static str {
        match self {
            Self::ServiceName => "service-name",
            Self::Query => "query",
            Self::Limit => "limit",
            Self::Filter => "filter",
            Self::Fields => "fields",
            Self::Offset => "offset",
            Self::IncludeScores => "include-scores",
            Self::ScoreThreshold => "score-threshold",
            Self::Reranker => "reranker",
            Self::RankingProfile => "ranking-profile",
        }
    }

    /// Key of the parameter in the process environment
    pub fn env_key(&self) -> &'static str {
        match self {
            Self::ServiceName => "SEARCH_SERVICE",
            Self::Query => "SEARCH_QUERY",
            Self::Limit => "SEARCH_LIMIT",
            Self::Filter => "SEARCH_FILTER",
            Self::Fields => "SEARCH_FIELDS",
            Self::Offset => "SEARCH_OFFSET",
            Self::IncludeScores => "SEARCH_INCLUDE_SCORES",
            Self::ScoreThreshold => "SEARCH_SCORE_THRESHOLD",
            Self::Reranker => "SEARCH_RERANKER",
            Self::RankingProfile => "SEARCH_RANKING_PROFILE",
        }
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.input_key())
    }
}

/// Read-only `key -> optional raw string` lookup
pub trait ParamSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ParamSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory source, used for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ParamSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// GitHub Actions inputs, exposed by the runner as `INPUT_<NAME>` variables
///
/// Values are trimmed on read, matching the runner toolkit.
#[derive(Debug, Clone, Default)]
pub struct ActionInputs<S> {
    env: S,
}

impl<S: ParamSource> ActionInputs<S> {
    pub fn new(env: S) -> Self {
        Self { env }
    }

    /// Environment variable name carrying the input `name`
    pub fn variable_name(name: &str) -> String {
        format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
    }
}

impl<S: ParamSource> ParamSource for ActionInputs<S> {
    fn get(&self, key: &str) -> Option<String> {
        self.env
            .get(&Self::variable_name(key))
            .map(|value| value.trim().to_string())
    }
}

/// Ordered pair of sources: primary takes precedence per parameter
pub struct Sources<'a> {
    primary: &'a dyn ParamSource,
    fallback: &'a dyn ParamSource,
}

impl<'a> Sources<'a> {
    pub fn new(primary: &'a dyn ParamSource, fallback: &'a dyn ParamSource) -> Self {
        Self { primary, fallback }
    }

    /// Raw value from the primary source, keyed by input name
    pub fn primary(&self, param: Parameter) -> Option<String> {
        self.primary.get(param.input_key())
    }

    /// Raw value from the fallback source, keyed by environment name
    pub fn fallback(&self, param: Parameter) -> Option<String> {
        self.fallback.get(param.env_key())
    }

    /// The primary value when non-blank, else the fallback value as-is
    pub fn lookup(&self, param: Parameter) -> Option<String> {
        match self.primary(param) {
            Some(value) if !value.trim().is_empty() => Some(value),
            _ => self.fallback(param),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_variable_name() {
        assert_eq!(
            ActionInputs::<EnvSource>::variable_name("service-name"),
            "INPUT_SERVICE-NAME"
        );
        assert_eq!(
            ActionInputs::<EnvSource>::variable_name("score threshold"),
            "INPUT_SCORE_THRESHOLD"
        );
    }

    #[test]
    fn test_action_inputs_trim() {
        let env = MapSource::new().with("INPUT_QUERY", "  hello  ");
        let inputs = ActionInputs::new(env);
        assert_eq!(inputs.get("query").as_deref(), Some("hello"));
        assert_eq!(inputs.get("limit"), None);
    }

    #[test]
    fn test_primary_wins() {
        let primary = MapSource::new().with("limit", "5");
        let fallback = MapSource::new().with("SEARCH_LIMIT", "9");
        let sources = Sources::new(&primary, &fallback);
        assert_eq!(sources.lookup(Parameter::Limit).as_deref(), Some("5"));
    }

    #[test]
    fn test_blank_primary_falls_back() {
        let primary = MapSource::new().with("reranker", "   ");
        let fallback = MapSource::new().with("SEARCH_RERANKER", " default ");
        let sources = Sources::new(&primary, &fallback);
        assert_eq!(
            sources.lookup(Parameter::Reranker).as_deref(),
            Some(" default ")
        );
        assert_eq!(sources.lookup(Parameter::RankingProfile), None);
    }

    #[test]
    fn test_keys_are_distinct() {
        let all = [
            Parameter::ServiceName,
            Parameter::Query,
            Parameter::Limit,
            Parameter::Filter,
            Parameter::Fields,
            Parameter::Offset,
            Parameter::IncludeScores,
            Parameter::ScoreThreshold,
            Parameter::Reranker,
            Parameter::RankingProfile,
        ];
        let inputs: std::collections::HashSet<_> = all.iter().map(|p| p.input_key()).collect();
        let envs: std::collections::HashSet<_> = all.iter().map(|p| p.env_key()).collect();
        assert_eq!(inputs.len(), all.len());
        assert_eq!(envs.len(), all.len());
        assert_eq!(Parameter::IncludeScores.to_string(), "include-scores");
    }
}
