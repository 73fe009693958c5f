use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::extraction::PollPolicy;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL_ID: &str = "meta.llama3-8b-instruct-v1:0";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_MEDIA_DIR: &str = "/tmp/media_files";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub s3_bucket: String,
    pub aws_region: String,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub aws_session_token: Option<String>,
    pub bedrock_model_id: String,
    pub summary_temperature: f32,
    pub summary_max_gen_len: Option<u32>,
    pub poll_interval: Duration,
    pub poll_max_interval: Duration,
    pub extract_max_wait: Duration,
    pub request_timeout: Duration,
    pub media_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let s3_bucket = get("S3_BUCKET").ok_or_else(|| "S3_BUCKET: not set".to_string())?;

        let poll_interval_ms: u64 = parse_var(&get, "EXTRACT_POLL_INTERVAL_MS")?.unwrap_or(1_000);
        if poll_interval_ms == 0 {
            return Err("EXTRACT_POLL_INTERVAL_MS: invalid value \"0\": must be positive".to_string());
        }
        let poll_max_interval_ms: u64 =
            parse_var(&get, "EXTRACT_POLL_MAX_INTERVAL_MS")?.unwrap_or(5_000_u64.max(poll_interval_ms));
        if poll_max_interval_ms < poll_interval_ms {
            return Err(format!(
                "EXTRACT_POLL_MAX_INTERVAL_MS: invalid value \"{poll_max_interval_ms}\": \
                 must be at least EXTRACT_POLL_INTERVAL_MS ({poll_interval_ms})"
            ));
        }

        Ok(Self {
            s3_bucket,
            aws_region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            aws_access_key_id: get("AWS_ACCESS_KEY_ID").or_else(|| get("AWS_ACCESS_KEY")),
            aws_secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
            aws_session_token: get("AWS_SESSION_TOKEN"),
            bedrock_model_id: get("BEDROCK_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            summary_temperature: parse_var(&get, "SUMMARY_TEMPERATURE")?
                .unwrap_or(DEFAULT_TEMPERATURE),
            summary_max_gen_len: parse_var(&get, "SUMMARY_MAX_GEN_LEN")?,
            poll_interval: Duration::from_millis(poll_interval_ms),
            poll_max_interval: Duration::from_millis(poll_max_interval_ms),
            extract_max_wait: Duration::from_secs(
                parse_var(&get, "EXTRACT_MAX_WAIT_SECS")?.unwrap_or(300),
            ),
            request_timeout: Duration::from_secs(
                parse_var(&get, "REQUEST_TIMEOUT_SECS")?.unwrap_or(600),
            ),
            media_dir: get("MEDIA_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_MEDIA_DIR), PathBuf::from),
        })
    }

    #[must_use]
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: self.poll_interval,
            max_interval: self.poll_max_interval,
            max_wait: self.extract_max_wait,
        }
    }
}

fn parse_var<T, G>(get: &G, name: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    get(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| format!("{name}: invalid value {raw:?}: {e}"))
        })
        .transpose()
}
