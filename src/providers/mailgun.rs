use crate::error::Error;
use crate::zone::builder::ZoneBuilder;
use crate::zone::provider::ProviderPreset;
use serde::Deserialize;

pub const SPF_INCLUDE: &str = "mailgun.org";
pub const DEFAULT_SUBDOMAIN: &str = "outgoing-mail";

/// Mailgun sending domain delegated to a subdomain of the zone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Mailgun {
    /// Selector Mailgun assigns for DKIM, e.g. `smtp` or `k1`.
    pub dkim_hostname: Option<String>,
    pub dkim_key: Option<String>,
    pub subdomain: String,
    pub ttl: Option<u32>,
}

impl Default for Mailgun {
    fn default() -> Self {
        Mailgun {
            dkim_hostname: None,
            dkim_key: None,
            subdomain: DEFAULT_SUBDOMAIN.to_string(),
            ttl: None,
        }
    }
}

impl Mailgun {
    pub fn with_dkim(mut self, hostname: impl Into<String>, key: impl Into<String>) -> Self {
        self.dkim_hostname = Some(hostname.into());
        self.dkim_key = Some(key.into());
        self
    }
}

impl ProviderPreset for Mailgun {
    fn name(&self) -> &str {
        "mailgun"
    }

    fn apply(&self, zone: &mut ZoneBuilder) -> Result<(), Error> {
        let sub = self.subdomain.as_str();
        let ttl = self.ttl;

        zone.add_mx(sub, 10, "mxa.mailgun.org.", ttl)?
            .add_mx(sub, 10, "mxb.mailgun.org.", ttl)?
            .add_cname(&format!("email.{sub}"), "mailgun.org.", ttl)?;

        // DKIM only when both halves were supplied
        if let (Some(host), Some(key)) = (&self.dkim_hostname, &self.dkim_key) {
            zone.add_txt(&format!("{host}.{sub}"), key, ttl)?;
        }

        // The subdomain carries its own policy; the apex gets the include.
        zone.add_txt(sub, &format!("v=spf1 include:{SPF_INCLUDE} ~all"), ttl)?
            .register_spf_include(SPF_INCLUDE)?;

        Ok(())
    }
}
