use crate::error::{Error, Result};
use crate::zone::render::OutputFormat;
use std::env;

pub const DOMAIN_VAR: &str = "ZONE_DOMAIN";
pub const TTL_VAR: &str = "ZONE_TTL";
pub const FORMAT_VAR: &str = "ZONE_FORMAT";

/// Settings the CLI can take from the environment. Anything left `None`
/// falls through to the plan file and then to the builder defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub domain: Option<String>,
    pub ttl: Option<u32>,
    pub format: Option<OutputFormat>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            domain: lookup(DOMAIN_VAR),
            ttl: lookup(TTL_VAR).map(|v| parse_ttl(&v)).transpose()?,
            format: lookup(FORMAT_VAR).map(|v| v.parse()).transpose()?,
        })
    }

    /// Combines the three sources the CLI reads:
    /// flags beat the plan, the plan beats the environment.
    pub fn resolve(env: Config, plan: Config, cli: Config) -> Config {
        env.merge(plan).merge(cli)
    }

    /// Layers `other` over `self`; values set in `other` win.
    pub fn merge(self, other: Config) -> Config {
        Config {
            domain: other.domain.or(self.domain),
            ttl: other.ttl.or(self.ttl),
            format: other.format.or(self.format),
        }
    }
}

/// Parses a textual TTL, rejecting negative and non-numeric values.
pub fn parse_ttl(value: &str) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|_| {
        Error::InvalidConfig(format!("ttl must be a non-negative integer: {value}"))
    })
}
