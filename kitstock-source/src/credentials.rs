use std::path::PathBuf;

use crate::error::SourceError;

/// Credentials for the Cloudinary Admin API.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Where a credential field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each credential field.
#[derive(Debug)]
pub struct CredentialSources {
    pub cloud_name: CredentialSource,
    pub api_key: CredentialSource,
    pub api_secret: CredentialSource,
}

/// TOML config file format.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    cloudinary: Option<CloudinaryConfig>,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct CloudinaryConfig {
    cloud_name: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
}

impl Credentials {
    /// Load credentials from environment variables or the config file.
    ///
    /// Priority: env vars > config file. All three fields are required.
    pub fn load() -> Result<Self, SourceError> {
        let config = load_config_file();

        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME")
            .ok()
            .or_else(|| config.as_ref().and_then(|c| c.cloud_name.clone()))
            .ok_or_else(|| {
                SourceError::Config(
                    "Missing cloud_name. Set CLOUDINARY_CLOUD_NAME env var or add to config file"
                        .to_string(),
                )
            })?;

        let api_key = std::env::var("CLOUDINARY_API_KEY")
            .ok()
            .or_else(|| config.as_ref().and_then(|c| c.api_key.clone()))
            .ok_or_else(|| {
                SourceError::Config(
                    "Missing api_key. Set CLOUDINARY_API_KEY env var or add to config file"
                        .to_string(),
                )
            })?;

        let api_secret = std::env::var("CLOUDINARY_API_SECRET")
            .ok()
            .or_else(|| config.as_ref().and_then(|c| c.api_secret.clone()))
            .ok_or_else(|| {
                SourceError::Config(
                    "Missing api_secret. Set CLOUDINARY_API_SECRET env var or add to config file"
                        .to_string(),
                )
            })?;

        Ok(Self {
            cloud_name,
            api_key,
            api_secret,
        })
    }
}

/// Return the path to the credentials config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kitstock").join("credentials.toml"))
}

/// Determine where each credential field is coming from.
pub fn credential_sources() -> CredentialSources {
    let config = load_config_file();

    let from = |var: &'static str, in_config: bool| {
        if std::env::var(var).is_ok() {
            CredentialSource::EnvVar(var)
        } else if in_config {
            CredentialSource::ConfigFile
        } else {
            CredentialSource::Missing
        }
    };

    CredentialSources {
        cloud_name: from(
            "CLOUDINARY_CLOUD_NAME",
            config.as_ref().is_some_and(|c| c.cloud_name.is_some()),
        ),
        api_key: from(
            "CLOUDINARY_API_KEY",
            config.as_ref().is_some_and(|c| c.api_key.is_some()),
        ),
        api_secret: from(
            "CLOUDINARY_API_SECRET",
            config.as_ref().is_some_and(|c| c.api_secret.is_some()),
        ),
    }
}

fn load_config_file() -> Option<CloudinaryConfig> {
    let path = config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    let config: ConfigFile = toml::from_str(&content).ok()?;
    config.cloudinary
}
