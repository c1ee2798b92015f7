use tracing::warn;

pub const BUCKET_NAME_VAR: &str = "BUCKET_NAME";
pub const BUCKET_ARN_VAR: &str = "BUCKET_ARN";

/// Process-wide settings, read once before the first invocation.
///
/// Missing variables are not fatal: they resolve to an empty string and
/// surface later as store errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub bucket_name: String,
    pub bucket_arn: String,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| match lookup(name) {
            Some(value) => value,
            None => {
                warn!(
                    component = "config",
                    variable = name,
                    "environment variable is not set, using empty value"
                );
                String::new()
            }
        };

        Self {
            bucket_name: read(BUCKET_NAME_VAR),
            bucket_arn: read(BUCKET_ARN_VAR),
        }
    }
}
