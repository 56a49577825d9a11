pub mod cli;
pub mod toml_config;

use crate::app::reporter::DEFAULT_REPORT_FILE;
use crate::core::ConfigProvider;
use crate::domain::model::{ApiToken, Credentials};
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, validate_path, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use toml_config::TomlConfig;

const USAGE: &str = "\
CSV format:
  A header row with a column named 'user_id' holding the Omni user IDs to
  delete. Other columns are ignored.

    user_id
    9e8719d9-276a-4964-9395-a493189a247c
    86b31265-3724-4e6a-ad7a-901aa06af7f3

Notes:
  - Deletion is irreversible. Use --dry-run to review the rows first.
  - The API token needs permission to manage embed users.
  - Failed deletions are written to failed_deletions.csv in --output-path.";

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "omni-bulk-delete"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Bulk delete embed users from an Omni instance", after_help = USAGE)
)]
pub struct CliConfig {
    /// Omni API token
    #[cfg_attr(
        feature = "cli",
        arg(long, env = "OMNI_API_TOKEN", hide_env_values = true, default_value = "", hide_default_value = true)
    )]
    pub api_token: ApiToken,

    /// Organization domain, e.g. myorg.omniapp.co
    #[cfg_attr(feature = "cli", arg(long, env = "OMNI_ORG_DOMAIN", default_value = "", hide_default_value = true))]
    pub org_domain: String,

    /// CSV file with a user_id column
    #[cfg_attr(feature = "cli", arg(short, long, default_value = "", hide_default_value = true))]
    pub input: String,

    /// Directory the failure report is written to [default: .]
    #[cfg_attr(feature = "cli", arg(long))]
    pub output_path: Option<String>,

    /// File name of the failure report [default: failed_deletions.csv]
    #[cfg_attr(feature = "cli", arg(long))]
    pub report_file: Option<String>,

    /// Send requests here instead of https://{org_domain}
    #[cfg_attr(feature = "cli", arg(long))]
    pub base_url: Option<String>,

    /// TOML configuration file; command-line values take precedence
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub config: Option<String>,

    /// Validate and preview the input without deleting anything
    #[cfg_attr(feature = "cli", arg(long))]
    pub dry_run: bool,

    /// Enable verbose output
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[cfg_attr(feature = "cli", arg(long))]
    pub log_json: bool,
}

impl CliConfig {
    /// Fills values left empty on the command line from a configuration file.
    pub fn merge_file(&mut self, file: TomlConfig) {
        if self.api_token.is_blank() {
            self.api_token = file.omni.api_token;
        }
        if self.org_domain.trim().is_empty() {
            self.org_domain = file.omni.org_domain;
        }
        if self.input.trim().is_empty() {
            self.input = file.input.file;
        }
        self.output_path = self.output_path.take().or(file.output.path);
        self.report_file = self.report_file.take().or(file.output.report_file);
        self.base_url = self.base_url.take().or(file.omni.base_url);
    }

    pub fn credentials(&self) -> Result<Credentials> {
        Credentials::new(self.api_token.clone(), self.org_domain.clone())
    }
}

/// Warning for a `.env` load that failed; a missing file is not worth one.
#[cfg(feature = "cli")]
pub fn dotenv_warning(result: &dotenvy::Result<std::path::PathBuf>) -> Option<String> {
    match result {
        Err(e) if !e.not_found() => Some(format!("Ignoring .env file: {}", e)),
        _ => None,
    }
}

impl ConfigProvider for CliConfig {
    fn api_token(&self) -> &ApiToken {
        &self.api_token
    }

    fn org_domain(&self) -> &str {
        &self.org_domain
    }

    fn input_file(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(".")
    }

    fn report_file(&self) -> &str {
        self.report_file.as_deref().unwrap_or(DEFAULT_REPORT_FILE)
    }

    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.credentials()?;

        validate_path("input", &self.input)?;
        validate_file_extension("input", &self.input, &["csv"])?;
        validate_path("output_path", self.output_path())?;
        validate_path("report_file", self.report_file())?;

        if let Some(base_url) = &self.base_url {
            validate_url("base_url", base_url)?;
        }

        Ok(())
    }
}
