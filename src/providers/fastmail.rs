use crate::error::Error;
use crate::zone::builder::ZoneBuilder;
use crate::zone::provider::ProviderPreset;
use serde::Deserialize;

pub const SPF_INCLUDE: &str = "spf.messagingengine.com";

const MX_HOSTS: [(u16, &str); 2] = [
    (10, "in1-smtp.messagingengine.com."),
    (20, "in2-smtp.messagingengine.com."),
];
const WEBMAIL_ADDRS: [&str; 2] = ["66.111.4.147", "66.111.4.148"];
// (service, priority, weight, port, target)
const SRV_RECORDS: [(&str, u16, u16, u16, &str); 6] = [
    ("submission", 0, 1, 587, "smtp.fastmail.com."),
    ("imaps", 0, 1, 993, "imap.fastmail.com."),
    ("pop3s", 10, 1, 995, "pop.fastmail.com."),
    ("jmap", 0, 1, 443, "jmap.fastmail.com."),
    ("carddavs", 0, 1, 443, "carddav.fastmail.com."),
    ("caldavs", 0, 1, 443, "caldav.fastmail.com."),
];

/// Fastmail hosted mail for the whole zone: apex MX, DKIM, webmail and
/// client autodiscovery SRV records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Fastmail {
    pub ttl: Option<u32>,
}

impl ProviderPreset for Fastmail {
    fn name(&self) -> &str {
        "fastmail"
    }

    fn apply(&self, zone: &mut ZoneBuilder) -> Result<(), Error> {
        let apex = zone.domain().to_string();
        let ttl = self.ttl;

        for (priority, host) in MX_HOSTS {
            zone.add_mx(&apex, priority, host, ttl)?;
        }

        for i in 1..=3 {
            zone.add_cname(
                &format!("fm{i}._domainkey"),
                &format!("fm{i}.{apex}dkim.fmhosted.com."),
                ttl,
            )?;
        }

        zone.register_spf_include(SPF_INCLUDE)?;

        for addr in WEBMAIL_ADDRS {
            zone.add_a("mail", addr, ttl)?;
        }

        for (service, priority, weight, port, target) in SRV_RECORDS {
            zone.add_srv(service, "tcp", priority, weight, port, target, ttl)?;
        }

        Ok(())
    }
}
