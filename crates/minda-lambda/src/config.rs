use std::env;
use std::str::FromStr;
use std::time::Duration;

use eyre::{WrapErr, eyre};

use minda_insights::config::PipelineConfig;
use minda_search::corpus::CORPUS_KEY;

pub const DEFAULT_CHAT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-6";
pub const DEFAULT_EMBEDDING_MODEL_ID: &str = "amazon.titan-embed-text-v2:0";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1024;

/// Runtime configuration, read once at cold start.
#[derive(Debug, Clone)]
pub struct Config {
    pub bucket: String,
    pub corpus_key: String,
    pub region: Option<String>,
    pub chat_model_id: String,
    pub embedding_model_id: String,
    pub embedding_dimensions: usize,
    pub pipeline: PipelineConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Unset or blank variables take their
    /// defaults; values that fail to parse are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut pipeline = PipelineConfig::default();
        if let Some(secs) = parse::<u64>(&var, "MINDA_GENERATION_TIMEOUT_SECS")? {
            pipeline.generation_timeout = Duration::from_secs(secs);
        }
        if let Some(threshold) = parse::<f32>(&var, "MINDA_SIMILARITY_THRESHOLD")? {
            if !(-1.0..=1.0).contains(&threshold) {
                return Err(eyre!(
                    "MINDA_SIMILARITY_THRESHOLD must be within [-1, 1], got {threshold}"
                ));
            }
            pipeline.similarity_threshold = threshold;
        }

        Ok(Self {
            bucket: var("MINDA_BUCKET").unwrap_or_else(|| "minda".to_string()),
            corpus_key: var("MINDA_CORPUS_KEY").unwrap_or_else(|| CORPUS_KEY.to_string()),
            region: var("AWS_REGION"),
            chat_model_id: var("MINDA_CHAT_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL_ID.to_string()),
            embedding_model_id: var("MINDA_EMBEDDING_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL_ID.to_string()),
            embedding_dimensions: parse(&var, "MINDA_EMBEDDING_DIMENSIONS")?
                .unwrap_or(DEFAULT_EMBEDDING_DIMENSIONS),
            pipeline,
        })
    }
}

fn parse<T>(var: &impl Fn(&str) -> Option<String>, name: &str) -> eyre::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .wrap_err_with(|| format!("invalid {name}: {raw:?}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> eyre::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bucket, "minda");
        assert_eq!(config.corpus_key, "knowledge/corpus.json");
        assert_eq!(config.embedding_model_id, DEFAULT_EMBEDDING_MODEL_ID);
        assert_eq!(config.embedding_dimensions, 1024);
        assert_eq!(config.pipeline.generation_timeout, Duration::from_secs(30));
        assert_eq!(config.region, None);
    }

    #[test]
    fn overrides_are_applied() {
        let config = config(&[
            ("MINDA_BUCKET", "minda-prod"),
            ("MINDA_EMBEDDING_DIMENSIONS", "512"),
            ("MINDA_GENERATION_TIMEOUT_SECS", "12"),
            ("MINDA_SIMILARITY_THRESHOLD", "0.65"),
            ("AWS_REGION", "ap-southeast-1"),
        ])
        .unwrap();
        assert_eq!(config.bucket, "minda-prod");
        assert_eq!(config.embedding_dimensions, 512);
        assert_eq!(config.pipeline.generation_timeout, Duration::from_secs(12));
        assert!((config.pipeline.similarity_threshold - 0.65).abs() < f32::EPSILON);
        assert_eq!(config.region.as_deref(), Some("ap-southeast-1"));
    }

    #[test]
    fn blank_values_take_defaults() {
        let config = config(&[("MINDA_BUCKET", "  ")]).unwrap();
        assert_eq!(config.bucket, "minda");
    }

    #[test]
    fn unparsable_values_are_errors() {
        let err = config(&[("MINDA_EMBEDDING_DIMENSIONS", "lots")]).unwrap_err();
        assert!(err.to_string().contains("MINDA_EMBEDDING_DIMENSIONS"));
        assert!(config(&[("MINDA_SIMILARITY_THRESHOLD", "2.5")]).is_err());
    }
}
