//! Connection configuration for the S3 adapter
//!
//! The host hands over raw string-valued settings (empty string means
//! unset). They are decoded once into a typed [`ConnectionProfile`] when
//! the adapter is constructed; the profile is immutable afterwards and
//! the live client is derived from it exactly once.

use std::time::Duration;

use aws_sdk_s3::types::ChecksumAlgorithm;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Region used when none is configured
pub const DEFAULT_REGION: &str = "aws-global";

/// Raw host-provided settings, all string-valued.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct S3StorageSettings {
    /// Store endpoint URL, e.g. "http://minio.internal:9000"
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    /// Template for minted keys, e.g. "{YYYY}/{MM}/{DD}/{UUID}"
    pub default_path: String,
    /// Fixed prefix prepended to every minted key
    pub base_path: String,
    /// Site code substituted for "{code}" in path templates
    pub site_code: String,
    /// "true" for path-style addressing; empty defaults to true
    pub force_path_style: String,
    pub region: String,
    pub checksum_algorithm: String,
    /// Proxy endpoint URL; applied only when username and password are
    /// also set
    pub proxy_host: String,
    pub proxy_username: String,
    pub proxy_password: String,
    /// Comma-separated hostname patterns that bypass the proxy
    pub no_proxy: String,
    /// Per-attempt timeout in seconds; 0 or empty keeps the store default
    pub request_timeout: String,
    /// Total call timeout in seconds; 0 or empty keeps the store default
    pub connection_timeout: String,
}

/// Proxy settings, present in the profile only when host, username and
/// password were all configured.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxySettings {
    pub host: String,
    pub username: String,
    pub password: String,
}

/// Typed connection profile the client is built from.
#[derive(Debug, Clone)]
pub struct ConnectionProfile {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub default_path: String,
    pub base_path: String,
    pub site_code: String,
    pub force_path_style: bool,
    pub region: String,
    pub checksum_algorithm: ChecksumAlgorithm,
    pub proxy: Option<ProxySettings>,
    pub no_proxy: Vec<String>,
    pub request_timeout: Option<Duration>,
    pub connection_timeout: Option<Duration>,
}

impl From<S3StorageSettings> for ConnectionProfile {
    fn from(input: S3StorageSettings) -> Self {
        // Partial proxy configuration is treated as "no proxy".
        let proxy = if !input.proxy_host.is_empty()
            && !input.proxy_username.is_empty()
            && !input.proxy_password.is_empty()
        {
            Some(ProxySettings {
                host: input.proxy_host,
                username: input.proxy_username,
                password: input.proxy_password,
            })
        } else {
            None
        };

        Self {
            force_path_style: if input.force_path_style.is_empty() {
                true
            } else {
                parse_flag(&input.force_path_style)
            },
            region: if input.region.is_empty() {
                DEFAULT_REGION.to_string()
            } else {
                input.region
            },
            checksum_algorithm: parse_checksum(&input.checksum_algorithm),
            no_proxy: input
                .no_proxy
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect(),
            request_timeout: parse_timeout("request_timeout", &input.request_timeout),
            connection_timeout: parse_timeout("connection_timeout", &input.connection_timeout),
            proxy,
            endpoint: input.endpoint,
            bucket: input.bucket,
            access_key: input.access_key,
            secret_key: input.secret_key,
            default_path: input.default_path,
            base_path: input.base_path,
            site_code: input.site_code,
        }
    }
}

/// Booleans parse from the case-sensitive literal "true" only.
fn parse_flag(value: &str) -> bool {
    value == "true"
}

fn parse_timeout(name: &str, value: &str) -> Option<Duration> {
    if value.is_empty() {
        return None;
    }
    match value.parse::<u64>() {
        Ok(0) => None,
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => {
            warn!("ignoring unparseable {name} value '{value}'");
            None
        }
    }
}

fn parse_checksum(value: &str) -> ChecksumAlgorithm {
    match value.to_ascii_uppercase().as_str() {
        "" | "CRC32" => ChecksumAlgorithm::Crc32,
        "CRC32C" => ChecksumAlgorithm::Crc32C,
        "CRC64NVME" => ChecksumAlgorithm::Crc64Nvme,
        "SHA1" => ChecksumAlgorithm::Sha1,
        "SHA256" => ChecksumAlgorithm::Sha256,
        other => {
            warn!("unrecognized checksum algorithm '{other}', using CRC32");
            ChecksumAlgorithm::Crc32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_settings() {
        let profile = ConnectionProfile::from(S3StorageSettings::default());
        assert!(profile.force_path_style);
        assert_eq!(profile.region, DEFAULT_REGION);
        assert_eq!(profile.checksum_algorithm, ChecksumAlgorithm::Crc32);
        assert!(profile.proxy.is_none());
        assert!(profile.no_proxy.is_empty());
        assert!(profile.request_timeout.is_none());
        assert!(profile.connection_timeout.is_none());
    }

    #[test]
    fn test_flags_parse_from_literal_true_only() {
        assert!(parse_flag("true"));
        assert!(!parse_flag("TRUE"));
        assert!(!parse_flag("True"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag("1"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_force_path_style_explicit_values() {
        let settings = S3StorageSettings {
            force_path_style: "false".to_string(),
            ..Default::default()
        };
        assert!(!ConnectionProfile::from(settings).force_path_style);

        let settings = S3StorageSettings {
            force_path_style: "true".to_string(),
            ..Default::default()
        };
        assert!(ConnectionProfile::from(settings).force_path_style);
    }

    #[test]
    fn test_partial_proxy_config_means_no_proxy() {
        for (host, user, pass) in [
            ("http://proxy:3128", "", ""),
            ("http://proxy:3128", "user", ""),
            ("", "user", "secret"),
            ("http://proxy:3128", "", "secret"),
        ] {
            let settings = S3StorageSettings {
                proxy_host: host.to_string(),
                proxy_username: user.to_string(),
                proxy_password: pass.to_string(),
                ..Default::default()
            };
            assert!(
                ConnectionProfile::from(settings).proxy.is_none(),
                "expected no proxy for ({host:?}, {user:?}, {pass:?})"
            );
        }
    }

    #[test]
    fn test_complete_proxy_config_is_kept() {
        let settings = S3StorageSettings {
            proxy_host: "http://proxy:3128".to_string(),
            proxy_username: "user".to_string(),
            proxy_password: "secret".to_string(),
            ..Default::default()
        };
        let profile = ConnectionProfile::from(settings);
        assert_eq!(
            profile.proxy,
            Some(ProxySettings {
                host: "http://proxy:3128".to_string(),
                username: "user".to_string(),
                password: "secret".to_string(),
            })
        );
    }

    #[test]
    fn test_no_proxy_list_splits_and_trims() {
        let settings = S3StorageSettings {
            no_proxy: "localhost, *.internal,,10.0.0.?".to_string(),
            ..Default::default()
        };
        let profile = ConnectionProfile::from(settings);
        assert_eq!(profile.no_proxy, vec!["localhost", "*.internal", "10.0.0.?"]);
    }

    #[test]
    fn test_timeouts_parse_seconds() {
        let settings = S3StorageSettings {
            request_timeout: "30".to_string(),
            connection_timeout: "0".to_string(),
            ..Default::default()
        };
        let profile = ConnectionProfile::from(settings);
        assert_eq!(profile.request_timeout, Some(Duration::from_secs(30)));
        assert!(profile.connection_timeout.is_none());
    }

    #[test]
    fn test_unparseable_timeout_keeps_store_default() {
        let settings = S3StorageSettings {
            request_timeout: "soon".to_string(),
            ..Default::default()
        };
        assert!(ConnectionProfile::from(settings).request_timeout.is_none());
    }

    #[test]
    fn test_checksum_names() {
        assert_eq!(parse_checksum(""), ChecksumAlgorithm::Crc32);
        assert_eq!(parse_checksum("crc32"), ChecksumAlgorithm::Crc32);
        assert_eq!(parse_checksum("CRC32C"), ChecksumAlgorithm::Crc32C);
        assert_eq!(parse_checksum("sha256"), ChecksumAlgorithm::Sha256);
        assert_eq!(parse_checksum("md5"), ChecksumAlgorithm::Crc32);
    }

    #[test]
    fn test_settings_decode_from_host_config() {
        let settings: S3StorageSettings = serde_json::from_str(
            r#"{
                "endpoint": "http://minio.internal:9000",
                "bucket": "documents",
                "access_key": "AKIA",
                "secret_key": "secret",
                "default_path": "{YYYY}/{MM}/{UUID}",
                "region": "eu-west-3"
            }"#,
        )
        .expect("partial settings decode with defaults");

        assert_eq!(settings.endpoint, "http://minio.internal:9000");
        assert_eq!(settings.force_path_style, "");

        let profile = ConnectionProfile::from(settings);
        assert_eq!(profile.region, "eu-west-3");
        assert!(profile.force_path_style);
        assert_eq!(profile.bucket, "documents");
    }
}
