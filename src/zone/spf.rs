//! Deferred SPF policy.
//!
//! `add_spf` only stores an [`SpfParams`]; the TXT record is built by
//! [`synthesize`] once the rest of the zone is known, because the `mx` and `a`
//! mechanisms default to whatever the zone ends up containing and presets keep
//! contributing includes until render time.

use crate::error::{Error, Result};
use crate::zone::builder::validate_name;
use crate::zone::record::{Record, RecordType};
use serde::Deserialize;
use std::fmt;

/// The trailing `all` mechanism of the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SpfMode {
    #[default]
    #[serde(rename = "-all")]
    Fail,
    #[serde(rename = "~all")]
    SoftFail,
    #[serde(rename = "?all")]
    Neutral,
    #[serde(rename = "+all")]
    Pass,
}

impl SpfMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpfMode::Fail => "-all",
            SpfMode::SoftFail => "~all",
            SpfMode::Neutral => "?all",
            SpfMode::Pass => "+all",
        }
    }
}

impl fmt::Display for SpfMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SpfMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "-all" => Ok(SpfMode::Fail),
            "~all" => Ok(SpfMode::SoftFail),
            "?all" => Ok(SpfMode::Neutral),
            "+all" => Ok(SpfMode::Pass),
            _ => Err(Error::InvalidArgument(format!("unknown SPF mode: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpfParams {
    /// `None` means "only if the zone has an MX record".
    pub mx: Option<bool>,
    /// `None` means "only if the zone has an A or AAAA record".
    pub a: Option<bool>,
    pub includes: Vec<String>,
    pub mode: SpfMode,
    pub ttl: Option<u32>,
}

impl SpfParams {
    pub fn include(mut self, domain: impl Into<String>) -> Self {
        self.includes.push(domain.into());
        self
    }

    pub fn mode(mut self, mode: SpfMode) -> Self {
        self.mode = mode;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for include in &self.includes {
            validate_name("SPF include", include)?;
            if include.contains(['"', '\\']) || include.chars().any(char::is_control) {
                return Err(Error::InvalidArgument(format!(
                    "SPF include must be a plain domain: {include:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Builds the apex SPF TXT record from the stored parameters and the final
/// state of the zone.
pub fn synthesize(
    params: &SpfParams,
    preset_includes: &[String],
    records: &[Record],
    domain: &str,
    default_ttl: u32,
) -> Record {
    let has_type =
        |types: &[RecordType]| records.iter().any(|r| types.contains(&r.record_type));
    let mx = params.mx.unwrap_or_else(|| has_type(&[RecordType::MX]));
    let a = params
        .a
        .unwrap_or_else(|| has_type(&[RecordType::A, RecordType::AAAA]));

    let mut includes: Vec<&str> = Vec::new();
    for include in params.includes.iter().chain(preset_includes) {
        if !includes.contains(&include.as_str()) {
            includes.push(include);
        }
    }

    let mut policy = String::from("v=spf1 ");
    if mx {
        policy.push_str("mx ");
    }
    if a {
        policy.push_str("a ");
    }
    for include in &includes {
        policy.push_str("include:");
        policy.push_str(include);
        policy.push(' ');
    }
    policy.push_str(params.mode.as_str());

    Record::new(
        domain,
        params.ttl.unwrap_or(default_ttl),
        RecordType::TXT,
        format!("\"{policy}\""),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn zone_records() -> Vec<Record> {
        vec![
            Record::new("example.com.", 60, RecordType::MX, "10 mx.example.com."),
            Record::new("www", 60, RecordType::AAAA, "2001:db8::1"),
        ]
    }

    #[test]
    fn test_defaults_follow_zone_contents() {
        let rec = synthesize(&SpfParams::default(), &[], &zone_records(), "example.com.", 60);
        assert_eq!(rec.record_type, RecordType::TXT);
        assert_eq!(rec.name, "example.com.");
        assert_eq!(rec.data, "\"v=spf1 mx a -all\"");
    }

    #[test]
    fn test_empty_zone_has_no_mechanisms() {
        let rec = synthesize(&SpfParams::default(), &[], &[], "example.com.", 60);
        assert_eq!(rec.data, "\"v=spf1 -all\"");
    }

    #[test]
    fn test_explicit_flags_override_zone_contents() {
        let params = SpfParams {
            mx: Some(false),
            a: Some(false),
            ..Default::default()
        };
        let rec = synthesize(&params, &[], &zone_records(), "example.com.", 60);
        assert_eq!(rec.data, "\"v=spf1 -all\"");
    }

    #[test]
    fn test_includes_are_merged_in_first_seen_order() {
        let params = SpfParams::default()
            .include("b.example.net")
            .include("a.example.net")
            .mode(SpfMode::SoftFail);
        let presets = vec!["a.example.net".to_string(), "c.example.net".to_string()];
        let rec = synthesize(&params, &presets, &[], "example.com.", 60);
        assert_eq!(
            rec.data,
            "\"v=spf1 include:b.example.net include:a.example.net include:c.example.net ~all\""
        );
    }

    #[test]
    fn test_ttl_falls_back_to_default() {
        let rec = synthesize(&SpfParams::default(), &[], &[], "example.com.", 90);
        assert_eq!(rec.ttl, 90);

        let params = SpfParams {
            ttl: Some(3600),
            ..Default::default()
        };
        let rec = synthesize(&params, &[], &[], "example.com.", 90);
        assert_eq!(rec.ttl, 3600);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("~all".parse::<SpfMode>().unwrap(), SpfMode::SoftFail);
        assert_matches!("all".parse::<SpfMode>(), Err(Error::InvalidArgument(_)));
    }

    #[test]
    fn test_blank_include_is_rejected() {
        let params = SpfParams::default().include("  ");
        assert_matches!(params.validate(), Err(Error::InvalidArgument(_)));
    }

    #[test]
    fn test_include_cannot_break_out_of_policy() {
        for include in ["evil\" -all \"x", "two words", "back\\slash", "new\nline"] {
            let params = SpfParams::default().include(include);
            assert_matches!(params.validate(), Err(Error::InvalidArgument(_)));
        }
        assert!(SpfParams::default().include("_spf.example.net").validate().is_ok());
    }

    #[test]
    fn test_add_spf_rejects_bad_include_before_render() {
        let mut zone = crate::zone::builder::ZoneBuilder::default();
        let params = SpfParams::default().include("evil\" -all \"x");
        assert_matches!(zone.add_spf(params), Err(Error::InvalidArgument(_)));
        assert!(zone.finalized_records().is_empty());
    }
}
