use crate::domain::model::ApiToken;
use crate::utils::error::{DeleteError, Result};
use crate::utils::validation::{validate_path, validate_url, Validate};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;

/// Optional configuration file, e.g.
///
/// ```toml
/// [omni]
/// api_token = "${OMNI_API_TOKEN}"
/// org_domain = "myorg.omniapp.co"
///
/// [input]
/// file = "users.csv"
///
/// [output]
/// path = "./reports"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub omni: OmniConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OmniConfig {
    #[serde(default)]
    pub api_token: ApiToken,
    #[serde(default)]
    pub org_domain: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub file: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub report_file: Option<String>,
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|source| DeleteError::Input {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DeleteError::InvalidConfigValue {
            field: "config".to_string(),
            value: "<toml>".to_string(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay
    /// as written and are rejected by validation.
    fn substitute_env_vars(content: &str) -> String {
        placeholder_regex()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    fn unresolved_placeholder(value: &str) -> Option<String> {
        placeholder_regex()
            .captures(value)
            .map(|caps| caps[1].to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        let fields = [
            ("omni.api_token", self.omni.api_token.expose()),
            ("omni.org_domain", self.omni.org_domain.as_str()),
            ("input.file", self.input.file.as_str()),
        ];
        for (field, value) in fields {
            if let Some(var_name) = Self::unresolved_placeholder(value) {
                return Err(DeleteError::InvalidConfigValue {
                    field: field.to_string(),
                    value: format!("${{{}}}", var_name),
                    reason: format!("environment variable {} is not set", var_name),
                });
            }
        }

        if let Some(base_url) = &self.omni.base_url {
            validate_url("omni.base_url", base_url)?;
        }
        if let Some(path) = &self.output.path {
            validate_path("output.path", path)?;
        }
        if let Some(report_file) = &self.output.report_file {
            validate_path("output.report_file", report_file)?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
