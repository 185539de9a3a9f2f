use crate::error::ConfigError;

pub const SNS_TOPIC_ARN_ENV: &str = "SNS_TOPIC_ARN";

/// Settings for the region sweep. The topic is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    pub topic_arn: String,
}

impl SweepConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match non_blank(lookup(SNS_TOPIC_ARN_ENV)) {
            Some(topic_arn) => Ok(Self { topic_arn }),
            None => Err(ConfigError::Missing(SNS_TOPIC_ARN_ENV)),
        }
    }
}

/// Settings for the tag-triggered handler. Without a topic, notifications
/// are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSnapshotConfig {
    pub topic_arn: Option<String>,
}

impl TagSnapshotConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            topic_arn: non_blank(lookup(SNS_TOPIC_ARN_ENV)),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
