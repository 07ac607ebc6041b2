//! Named query templates
//!
//! Templates map a short name (`@weather`, `@rust`) to a parameterized query
//! pattern plus optional per-template overrides. Each template is one
//! configuration line of the form `name[,CODE=value]*,pattern`, where CODE is
//! `M` (max-age minutes), `A` (user-agent) or `F` (force refresh). Blank
//! lines and `#`-prefixed lines are comments.

mod builtins;

pub use builtins::DEFAULT_TEMPLATES;

use thiserror::Error;
use tracing::warn;

use crate::pattern::{Pattern, PatternError};
use crate::request::RequestParams;

/// Errors produced while parsing template lines or resolving a template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A line has fewer than the two required fields (name and pattern)
    #[error("not a valid template: '{0}'")]
    InvalidLine(String),

    /// An interior field is not a recognized `CODE=value` override
    #[error("unknown configuration '{0}'")]
    UnknownOverride(String),

    /// An `M=` override value is not an integer
    #[error("invalid max-age '{0}'")]
    InvalidMaxAge(String),

    /// An `F=` override value is not a boolean
    #[error("invalid force-refresh value '{0}' (expected 1/true/0/false)")]
    InvalidBool(String),

    /// The embedded pattern is malformed
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// No template with the requested name exists
    #[error("template '{0}' not found")]
    NotFound(String),

    /// The name exists but never with the supplied parameter count
    #[error("template '{name}' found but takes {available:?} parameter(s), got {got}")]
    WrongArity {
        name: String,
        available: Vec<usize>,
        got: usize,
    },

    /// Multiple templates share the requested name and parameter count
    #[error("template '{name}' with {arity} parameter(s) is defined more than once")]
    Ambiguous { name: String, arity: usize },
}

/// A single per-template override
///
/// Values are validated when the template line is parsed, so applying an
/// override can no longer fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Override {
    /// `M=<minutes>`: freshness window for cache reads
    MaxAge(u64),
    /// `A=<agent>`: user-agent header; empty means the transport default
    UserAgent(String),
    /// `F=<bool>`: a truthy value disables cache reads for this template
    ForceRefresh(bool),
}

impl Override {
    /// Parses one interior `CODE=value` field.
    fn parse(field: &str) -> Result<Self, TemplateError> {
        let (code, value) = field
            .split_once('=')
            .ok_or_else(|| TemplateError::UnknownOverride(field.to_string()))?;

        match code {
            "M" => value
                .parse::<u64>()
                .map(Override::MaxAge)
                .map_err(|_| TemplateError::InvalidMaxAge(value.to_string())),
            "A" => Ok(Override::UserAgent(value.to_string())),
            "F" => match value.to_ascii_lowercase().as_str() {
                "1" | "true" => Ok(Override::ForceRefresh(true)),
                "0" | "false" => Ok(Override::ForceRefresh(false)),
                _ => Err(TemplateError::InvalidBool(value.to_string())),
            },
            _ => Err(TemplateError::UnknownOverride(field.to_string())),
        }
    }
}

/// A named, parameterized query shortcut
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    pattern: Pattern,
    overrides: Vec<Override>,
}

impl Template {
    /// Parses one template line: `name[,CODE=value]*,pattern`.
    ///
    /// Fields are whitespace-trimmed. A bare `name,pattern` line is valid and
    /// carries no overrides.
    ///
    /// # Errors
    /// Any malformed field invalidates the whole line.
    pub fn parse(line: &str) -> Result<Self, TemplateError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 2 {
            return Err(TemplateError::InvalidLine(line.to_string()));
        }

        let pattern = Pattern::parse(fields[fields.len() - 1])?;
        let overrides = fields[1..fields.len() - 1]
            .iter()
            .map(|field| Override::parse(field))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: fields[0].to_string(),
            pattern,
            overrides,
        })
    }

    /// The template's shortcut name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of parameters the template expects
    pub fn arity(&self) -> usize {
        self.pattern.arity()
    }

    /// Builds the concrete query from `values` and applies the template's
    /// overrides onto `params`.
    ///
    /// # Errors
    /// Returns the pattern's arity error if `values` does not match; callers
    /// going through [`TemplateSet::resolve`] have already matched it.
    pub fn apply(&self, values: &[String], params: &mut RequestParams) -> Result<(), TemplateError> {
        params.query = self.pattern.build(values)?;

        for entry in &self.overrides {
            match entry {
                Override::MaxAge(minutes) => params.max_age_minutes = *minutes,
                Override::UserAgent(agent) => params.user_agent = agent.clone(),
                Override::ForceRefresh(true) => params.cache_read = false,
                Override::ForceRefresh(false) => {}
            }
        }
        Ok(())
    }
}

/// Whether a shortcut name asks for the template listing instead of a fetch
pub fn is_listing_request(name: &str) -> bool {
    matches!(name, "help" | "?")
}

/// The full set of loaded templates
///
/// Duplicate name+arity pairs are allowed to load; they are rejected at
/// resolution time so that listing still shows the offending entries.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: Vec<Template>,
}

impl TemplateSet {
    /// Loads templates from configuration lines.
    ///
    /// Blank lines and `#` comments are skipped silently; invalid lines are
    /// skipped with a warning and never abort loading of the remaining lines.
    pub fn load<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut templates = Vec::new();
        for line in lines {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match Template::parse(line) {
                Ok(template) => templates.push(template),
                Err(err) => warn!("skipping invalid template '{line}': {err}"),
            }
        }
        Self { templates }
    }

    /// Number of loaded templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no templates loaded
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Finds the template matching `name` with exactly `arg_count` parameters.
    ///
    /// # Errors
    /// - [`TemplateError::NotFound`] if no template has the name,
    /// - [`TemplateError::WrongArity`] if the name exists only with other
    ///   parameter counts (the message reports which),
    /// - [`TemplateError::Ambiguous`] if more than one template matches both
    ///   name and parameter count; the set never silently picks one.
    pub fn resolve(&self, name: &str, arg_count: usize) -> Result<&Template, TemplateError> {
        let named: Vec<&Template> = self
            .templates
            .iter()
            .filter(|t| t.name == name)
            .collect();
        if named.is_empty() {
            return Err(TemplateError::NotFound(name.to_string()));
        }

        let matches: Vec<&Template> = named
            .iter()
            .copied()
            .filter(|t| t.arity() == arg_count)
            .collect();
        match matches.as_slice() {
            [] => {
                let mut available: Vec<usize> = named.iter().map(|t| t.arity()).collect();
                available.sort_unstable();
                available.dedup();
                Err(TemplateError::WrongArity {
                    name: name.to_string(),
                    available,
                    got: arg_count,
                })
            }
            [only] => Ok(only),
            _ => Err(TemplateError::Ambiguous {
                name: name.to_string(),
                arity: arg_count,
            }),
        }
    }

    /// Renders the `@help` listing: one line per template with its name and
    /// parameter list.
    pub fn render_listing(&self) -> String {
        let mut out = String::from("Valid templates are:\n");
        for template in &self.templates {
            out.push_str(&format!(
                "\t@{:<24}  [{}]\n",
                template.name,
                template.pattern.params().join(", ")
            ));
        }
        out
    }
}
