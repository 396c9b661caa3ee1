//! JSON zone plans.
//!
//! A plan is a declarative description of a zone that the CLI replays onto a
//! [`ZoneBuilder`]: explicit records first (in file order), then web hosts,
//! then provider presets, then the SPF policy.

use crate::error::Result;
use crate::providers::{Fastmail, Mailgun};
use crate::zone::builder::{DEFAULT_WEB_SUBDOMAINS, ZoneBuilder};
use crate::zone::spf::SpfParams;
use serde::Deserialize;
use std::io::Read;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZonePlan {
    pub domain: Option<String>,
    pub ttl: Option<u32>,
    pub records: Vec<RecordSpec>,
    pub web: Option<WebHostSpec>,
    pub presets: Vec<PresetSpec>,
    pub spf: Option<SpfParams>,
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum RecordSpec {
    A {
        name: String,
        address: String,
        ttl: Option<u32>,
    },
    AAAA {
        name: String,
        address: String,
        ttl: Option<u32>,
    },
    #[serde(rename = "A+AAAA")]
    DualStack {
        name: String,
        ipv4: String,
        ipv6: String,
        ttl: Option<u32>,
    },
    CNAME {
        name: String,
        target: String,
        ttl: Option<u32>,
    },
    TXT {
        name: String,
        text: String,
        ttl: Option<u32>,
    },
    SRV {
        service: String,
        protocol: String,
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
        ttl: Option<u32>,
    },
    MX {
        name: String,
        priority: u16,
        server: String,
        ttl: Option<u32>,
    },
    NS {
        nameserver: String,
        ttl: Option<u32>,
    },
}

/// A single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebHostSpec {
    pub ipv4: OneOrMany,
    pub ipv6: OneOrMany,
    /// Defaults to `www` when absent.
    pub subdomains: Option<OneOrMany>,
    pub ttl: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum PresetSpec {
    Fastmail(Fastmail),
    Mailgun(Mailgun),
}

impl ZonePlan {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn build(&self) -> Result<ZoneBuilder> {
        let mut zone = ZoneBuilder::with_options(self.domain.as_deref(), self.ttl)?;

        for spec in &self.records {
            debug!(?spec, "replaying record");
            apply_record(&mut zone, spec)?;
        }

        if let Some(web) = &self.web {
            let subdomains = match &web.subdomains {
                Some(subs) => subs.clone().into_vec(),
                None => DEFAULT_WEB_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
            };
            zone.add_web_host(
                web.ipv4.clone().into_vec(),
                web.ipv6.clone().into_vec(),
                subdomains.as_slice(),
                web.ttl,
            )?;
        }

        for preset in &self.presets {
            match preset {
                PresetSpec::Fastmail(fastmail) => zone.apply_preset(fastmail)?,
                PresetSpec::Mailgun(mailgun) => zone.apply_preset(mailgun)?,
            };
        }

        if let Some(spf) = &self.spf {
            zone.add_spf(spf.clone())?;
        }

        Ok(zone)
    }
}

fn apply_record(zone: &mut ZoneBuilder, spec: &RecordSpec) -> Result<()> {
    match spec {
        RecordSpec::A { name, address, ttl } => zone.add_a(name, address, *ttl)?,
        RecordSpec::AAAA { name, address, ttl } => zone.add_aaaa(name, address, *ttl)?,
        RecordSpec::DualStack {
            name,
            ipv4,
            ipv6,
            ttl,
        } => zone.add_dual_stack(name, ipv4, ipv6, *ttl)?,
        RecordSpec::CNAME { name, target, ttl } => zone.add_cname(name, target, *ttl)?,
        RecordSpec::TXT { name, text, ttl } => zone.add_txt(name, text, *ttl)?,
        RecordSpec::SRV {
            service,
            protocol,
            priority,
            weight,
            port,
            target,
            ttl,
        } => zone.add_srv(service, protocol, *priority, *weight, *port, target, *ttl)?,
        RecordSpec::MX {
            name,
            priority,
            server,
            ttl,
        } => zone.add_mx(name, *priority, server, *ttl)?,
        RecordSpec::NS { nameserver, ttl } => zone.add_ns(nameserver, *ttl)?,
    };
    Ok(())
}
