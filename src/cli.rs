//! Command-line interface parsing for webq
//!
//! The positional query is either a literal URL or an `@name` template
//! invocation whose trailing positionals supply the template's parameter
//! values. Flags override the config-file defaults for one invocation.

use clap::Parser;
use thiserror::Error;

use crate::config::AppConfig;
use crate::request::RequestParams;
use crate::template::is_listing_request;

/// Errors raised while interpreting the parsed command line
#[derive(Debug, Error)]
pub enum CliError {
    /// Parameter values were supplied after a literal (non-template) query
    #[error("unexpected arguments after literal query: {0}")]
    UnexpectedValues(String),

    /// The query was a bare `@` with no template name
    #[error("missing template name after '@'")]
    EmptyTemplateName,
}

/// webq - fetch web queries through a local response cache
#[derive(Parser, Debug)]
#[command(name = "webq")]
#[command(about = "Fetch a URL or a named query shortcut, caching responses on disk")]
#[command(version)]
pub struct Cli {
    /// The query: a URL, or @name to invoke a template (@help lists them)
    pub query: String,

    /// Template parameter values, in the order the template declares them
    pub values: Vec<String>,

    /// Freshness window for cache reads, in minutes
    #[arg(short = 'm', long, value_name = "MINUTES")]
    pub max_age: Option<u64>,

    /// User-agent header to send (empty for the transport default)
    #[arg(short = 'A', long, value_name = "AGENT")]
    pub user_agent: Option<String>,

    /// Skip reading from the cache, forcing a fresh download
    #[arg(short = 'n', long)]
    pub no_cache: bool,

    /// Do not write the downloaded content back to the cache
    #[arg(long)]
    pub no_store: bool,

    /// Prefix prepended to a literal query before resolution
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Print a provenance diagnostic line to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// What the positional arguments ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `@help` / `@?`: print the template listing and exit
    Listing,
    /// `@name value…`: resolve a template
    Template { name: String, values: Vec<String> },
    /// A literal URL query
    Literal { query: String },
}

impl Cli {
    /// Classifies the positional arguments.
    ///
    /// `--prefix` applies to literal queries only; template patterns carry
    /// their own base URL.
    ///
    /// # Errors
    /// Returns [`CliError`] for parameter values after a literal query or a
    /// bare `@`.
    pub fn invocation(&self) -> Result<Invocation, CliError> {
        if let Some(name) = self.query.strip_prefix('@') {
            if name.is_empty() {
                return Err(CliError::EmptyTemplateName);
            }
            if is_listing_request(name) {
                return Ok(Invocation::Listing);
            }
            return Ok(Invocation::Template {
                name: name.to_string(),
                values: self.values.clone(),
            });
        }

        if !self.values.is_empty() {
            return Err(CliError::UnexpectedValues(self.values.join(" ")));
        }

        let query = match &self.prefix {
            Some(prefix) => format!("{prefix}{}", self.query),
            None => self.query.clone(),
        };
        Ok(Invocation::Literal { query })
    }

    /// Assembles request parameters from config defaults and flags.
    ///
    /// The query field starts empty; invocation handling fills it in. A
    /// template resolved later may still override user-agent, max-age and
    /// the cache-read flag.
    pub fn request_params(&self, config: &AppConfig) -> RequestParams {
        RequestParams {
            query: String::new(),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| config.user_agent.clone()),
            max_age_minutes: self.max_age.unwrap_or(config.max_age_minutes),
            cache_read: !self.no_cache,
            cache_write: !self.no_store,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            user_agent: "config-agent/1.0".to_string(),
            max_age_minutes: 120,
            templates: Vec::new(),
        }
    }

    #[test]
    fn test_parse_literal_query() {
        let cli = Cli::parse_from(["webq", "https://example.com"]);
        assert_eq!(cli.query, "https://example.com");
        assert!(cli.values.is_empty());
    }

    #[test]
    fn test_parse_template_with_values() {
        let cli = Cli::parse_from(["webq", "@weather", "tokyo"]);
        assert_eq!(cli.query, "@weather");
        assert_eq!(cli.values, vec!["tokyo".to_string()]);
    }

    #[test]
    fn test_invocation_literal() {
        let cli = Cli::parse_from(["webq", "https://example.com"]);
        assert_eq!(
            cli.invocation().expect("should classify"),
            Invocation::Literal {
                query: "https://example.com".to_string()
            }
        );
    }

    #[test]
    fn test_invocation_literal_applies_prefix() {
        let cli = Cli::parse_from(["webq", "--prefix", "https://cht.sh/", "rust/split"]);
        assert_eq!(
            cli.invocation().expect("should classify"),
            Invocation::Literal {
                query: "https://cht.sh/rust/split".to_string()
            }
        );
    }

    #[test]
    fn test_invocation_template() {
        let cli = Cli::parse_from(["webq", "@weather", "tokyo"]);
        assert_eq!(
            cli.invocation().expect("should classify"),
            Invocation::Template {
                name: "weather".to_string(),
                values: vec!["tokyo".to_string()]
            }
        );
    }

    #[test]
    fn test_invocation_template_ignores_prefix() {
        let cli = Cli::parse_from(["webq", "--prefix", "x", "@ip"]);
        assert_eq!(
            cli.invocation().expect("should classify"),
            Invocation::Template {
                name: "ip".to_string(),
                values: Vec::new()
            }
        );
    }

    #[test]
    fn test_invocation_help_aliases_are_listing_requests() {
        for query in ["@help", "@?"] {
            let cli = Cli::parse_from(["webq", query]);
            assert_eq!(cli.invocation().expect("should classify"), Invocation::Listing);
        }
    }

    #[test]
    fn test_invocation_rejects_values_after_literal_query() {
        let cli = Cli::parse_from(["webq", "https://example.com", "stray"]);
        let err = cli.invocation().expect_err("should fail");
        assert!(matches!(err, CliError::UnexpectedValues(_)));
    }

    #[test]
    fn test_invocation_rejects_bare_at_sign() {
        let cli = Cli::parse_from(["webq", "@"]);
        let err = cli.invocation().expect_err("should fail");
        assert!(matches!(err, CliError::EmptyTemplateName));
    }

    #[test]
    fn test_request_params_use_config_defaults() {
        let cli = Cli::parse_from(["webq", "https://example.com"]);
        let params = cli.request_params(&config());

        assert_eq!(params.user_agent, "config-agent/1.0");
        assert_eq!(params.max_age_minutes, 120);
        assert!(params.cache_read);
        assert!(params.cache_write);
        assert!(!params.verbose);
    }

    #[test]
    fn test_request_params_flags_override_config() {
        let cli = Cli::parse_from([
            "webq",
            "-m",
            "5",
            "-A",
            "cli-agent/2.0",
            "-n",
            "--no-store",
            "-v",
            "https://example.com",
        ]);
        let params = cli.request_params(&config());

        assert_eq!(params.user_agent, "cli-agent/2.0");
        assert_eq!(params.max_age_minutes, 5);
        assert!(!params.cache_read);
        assert!(!params.cache_write);
        assert!(params.verbose);
    }

    #[test]
    fn test_empty_user_agent_flag_means_transport_default() {
        let cli = Cli::parse_from(["webq", "-A", "", "https://example.com"]);
        let params = cli.request_params(&config());
        assert_eq!(params.user_agent, "");
    }
}
