use crate::error::{Error, Result};
use crate::zone::provider::ProviderPreset;
use crate::zone::record::{Record, RecordType};
use crate::zone::render::{self, OutputFormat};
use crate::zone::spf::{self, SpfParams};
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::{debug, info};

pub const DEFAULT_DOMAIN: &str = "example.com.";
pub const DEFAULT_TTL: u32 = 60;
/// RFC 2181 section 8: TTLs are unsigned 31 bit values.
pub const MAX_TTL: u32 = 2_147_483_647;
pub const DEFAULT_WEB_SUBDOMAINS: &[&str] = &["www"];

/// Accumulates records for a single zone and renders them.
///
/// Adders return `&mut Self` so calls can be chained with `?`:
///
/// ```
/// use zonefile_builder::{OutputFormat, SpfParams, ZoneBuilder};
///
/// let mut zone = ZoneBuilder::new("example.org.", 300)?;
/// zone.add_a("host", "192.0.2.10", None)?
///     .add_mx("example.org.", 10, "mx.example.org.", None)?
///     .add_spf(SpfParams::default())?;
/// let text = zone.render(OutputFormat::Text)?;
/// assert!(text.starts_with("$ORIGIN example.org.\n"));
/// # Ok::<(), zonefile_builder::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ZoneBuilder {
    domain: String,
    default_ttl: u32,
    records: Vec<Record>,
    spf: Option<SpfParams>,
    spf_includes: Vec<String>,
}

impl Default for ZoneBuilder {
    fn default() -> Self {
        ZoneBuilder {
            domain: DEFAULT_DOMAIN.to_string(),
            default_ttl: DEFAULT_TTL,
            records: Vec::new(),
            spf: None,
            spf_includes: Vec::new(),
        }
    }
}

impl ZoneBuilder {
    pub fn new(domain: &str, default_ttl: u32) -> Result<Self> {
        Self::with_options(Some(domain), Some(default_ttl))
    }

    /// Like [`ZoneBuilder::new`], falling back to `example.com.` / 60 for
    /// whatever is `None`.
    pub fn with_options(domain: Option<&str>, default_ttl: Option<u32>) -> Result<Self> {
        let mut zone = ZoneBuilder::default();

        if let Some(domain) = domain {
            let domain = domain.trim();
            if domain.is_empty() {
                return Err(Error::InvalidConfig("domain cannot be blank".to_string()));
            }
            if !domain.ends_with('.') {
                return Err(Error::InvalidConfig(format!(
                    "domain must end with a period: {domain}"
                )));
            }
            zone.domain = domain.to_string();
        }

        if let Some(ttl) = default_ttl {
            if ttl > MAX_TTL {
                return Err(Error::InvalidConfig(format!(
                    "ttl {ttl} exceeds maximum of {MAX_TTL}"
                )));
            }
            zone.default_ttl = ttl;
        }

        Ok(zone)
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn default_ttl(&self) -> u32 {
        self.default_ttl
    }

    /// Records added so far, without the SPF record.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn spf_includes(&self) -> &[String] {
        &self.spf_includes
    }

    fn resolve_ttl(&self, ttl: Option<u32>) -> Result<u32> {
        match ttl {
            Some(ttl) if ttl > MAX_TTL => Err(Error::InvalidArgument(format!(
                "ttl {ttl} exceeds maximum of {MAX_TTL}"
            ))),
            Some(ttl) => Ok(ttl),
            None => Ok(self.default_ttl),
        }
    }

    fn push(&mut self, name: &str, ttl: u32, record_type: RecordType, data: String) {
        debug!(owner = name, ttl, %record_type, %data, "adding record");
        self.records.push(Record::new(name, ttl, record_type, data));
    }

    pub fn add_a(&mut self, name: &str, ipv4: &str, ttl: Option<u32>) -> Result<&mut Self> {
        validate_name("name", name)?;
        let addr = parse_ipv4(ipv4)?;
        let ttl = self.resolve_ttl(ttl)?;
        self.push(name, ttl, RecordType::A, addr.to_string());
        Ok(self)
    }

    pub fn add_aaaa(&mut self, name: &str, ipv6: &str, ttl: Option<u32>) -> Result<&mut Self> {
        validate_name("name", name)?;
        let addr = parse_ipv6(ipv6)?;
        let ttl = self.resolve_ttl(ttl)?;
        self.push(name, ttl, RecordType::AAAA, addr.to_string());
        Ok(self)
    }

    /// Adds an A and an AAAA record for the same name.
    pub fn add_dual_stack(
        &mut self,
        name: &str,
        ipv4: &str,
        ipv6: &str,
        ttl: Option<u32>,
    ) -> Result<&mut Self> {
        // both addresses are checked before either record lands
        parse_ipv4(ipv4)?;
        parse_ipv6(ipv6)?;
        self.add_a(name, ipv4, ttl)?.add_aaaa(name, ipv6, ttl)
    }

    pub fn add_cname(&mut self, name: &str, target: &str, ttl: Option<u32>) -> Result<&mut Self> {
        validate_name("name", name)?;
        validate_name("target", target)?;
        let ttl = self.resolve_ttl(ttl)?;
        self.push(name, ttl, RecordType::CNAME, target.to_string());
        Ok(self)
    }

    pub fn add_txt(&mut self, name: &str, text: &str, ttl: Option<u32>) -> Result<&mut Self> {
        validate_name("name", name)?;
        validate_txt(text)?;
        let ttl = self.resolve_ttl(ttl)?;
        self.push(name, ttl, RecordType::TXT, format!("\"{text}\""));
        Ok(self)
    }

    /// Adds `_service._protocol.<domain>` pointing at `target`, which must be
    /// fully qualified (`.` alone means "service not available").
    #[allow(clippy::too_many_arguments)]
    pub fn add_srv(
        &mut self,
        service: &str,
        protocol: &str,
        priority: u16,
        weight: u16,
        port: u16,
        target: &str,
        ttl: Option<u32>,
    ) -> Result<&mut Self> {
        validate_name("service", service)?;
        validate_name("protocol", protocol)?;
        if !target.ends_with('.') {
            return Err(Error::InvalidArgument(format!(
                "SRV target must end in a period: {target}"
            )));
        }
        let ttl = self.resolve_ttl(ttl)?;
        let name = format!("_{service}._{protocol}.{}", self.domain);
        self.push(
            &name,
            ttl,
            RecordType::SRV,
            format!("{priority} {weight} {port} {target}"),
        );
        Ok(self)
    }

    pub fn add_mx(
        &mut self,
        name: &str,
        priority: u16,
        server: &str,
        ttl: Option<u32>,
    ) -> Result<&mut Self> {
        validate_name("name", name)?;
        validate_name("server", server)?;
        let ttl = self.resolve_ttl(ttl)?;
        self.push(name, ttl, RecordType::MX, format!("{priority} {server}"));
        Ok(self)
    }

    /// Adds an NS record at the zone apex.
    pub fn add_ns(&mut self, nameserver: &str, ttl: Option<u32>) -> Result<&mut Self> {
        validate_name("nameserver", nameserver)?;
        let ttl = self.resolve_ttl(ttl)?;
        let apex = self.domain.clone();
        self.push(&apex, ttl, RecordType::NS, nameserver.to_string());
        Ok(self)
    }

    /// Points the apex and every subdomain at each address.
    ///
    /// Pass `Some(addr)` for a single address, `None::<&str>` for none, or any
    /// slice/vec for several. All records for IPv4 come before IPv6.
    pub fn add_web_host<V4, V6, S>(
        &mut self,
        ipv4s: V4,
        ipv6s: V6,
        subdomains: &[S],
        ttl: Option<u32>,
    ) -> Result<&mut Self>
    where
        V4: IntoIterator,
        V4::Item: AsRef<str>,
        V6: IntoIterator,
        V6::Item: AsRef<str>,
        S: AsRef<str>,
    {
        let ipv4s = ipv4s
            .into_iter()
            .map(|a| parse_ipv4(a.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let ipv6s = ipv6s
            .into_iter()
            .map(|a| parse_ipv6(a.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        for sub in subdomains {
            validate_name("subdomain", sub.as_ref())?;
        }
        let ttl = self.resolve_ttl(ttl)?;
        let apex = self.domain.clone();

        for addr in ipv4s {
            self.push(&apex, ttl, RecordType::A, addr.to_string());
            for sub in subdomains {
                self.push(sub.as_ref(), ttl, RecordType::A, addr.to_string());
            }
        }
        for addr in ipv6s {
            self.push(&apex, ttl, RecordType::AAAA, addr.to_string());
            for sub in subdomains {
                self.push(sub.as_ref(), ttl, RecordType::AAAA, addr.to_string());
            }
        }
        Ok(self)
    }

    /// Stores the SPF policy; the record itself is built at render time.
    /// Calling this again replaces the previous parameters.
    pub fn add_spf(&mut self, params: SpfParams) -> Result<&mut Self> {
        params.validate()?;
        self.resolve_ttl(params.ttl)?;
        self.spf = Some(params);
        Ok(self)
    }

    /// Registers an include for the SPF record without requesting one.
    pub fn register_spf_include(&mut self, domain: &str) -> Result<&mut Self> {
        validate_name("SPF include", domain)?;
        self.spf_includes.push(domain.to_string());
        Ok(self)
    }

    pub fn apply_preset(&mut self, preset: &dyn ProviderPreset) -> Result<&mut Self> {
        info!(provider = preset.name(), domain = %self.domain, "applying preset");
        preset.apply(self)?;
        Ok(self)
    }

    /// All records in output order, including the synthesized SPF record.
    ///
    /// The SPF record is derived on every call and never stored, so this can
    /// be called any number of times.
    pub fn finalized_records(&self) -> Vec<Record> {
        let mut records = self.records.clone();
        if let Some(params) = &self.spf {
            let record = spf::synthesize(
                params,
                &self.spf_includes,
                &self.records,
                &self.domain,
                self.default_ttl,
            );
            info!(data = %record.data, "synthesized SPF record");
            records.push(record);
        }
        records
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        let records = self.finalized_records();
        match format {
            OutputFormat::Json => render::render_json(&records),
            OutputFormat::Text => Ok(render::render_text(
                &self.domain,
                self.default_ttl,
                &records,
            )),
        }
    }
}

pub(crate) fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidArgument(format!("{field} cannot be blank")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(Error::InvalidArgument(format!(
            "{field} cannot contain whitespace: {value:?}"
        )));
    }
    Ok(())
}

fn parse_ipv4(addr: &str) -> Result<Ipv4Addr> {
    addr.trim()
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("invalid IPv4 address: {addr}")))
}

fn parse_ipv6(addr: &str) -> Result<Ipv6Addr> {
    addr.trim()
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("invalid IPv6 address: {addr}")))
}

/// TXT data is emitted between a single pair of quotes on one line.
fn validate_txt(text: &str) -> Result<()> {
    if text.chars().any(char::is_control) {
        return Err(Error::InvalidArgument(format!(
            "TXT data cannot contain control characters: {text:?}"
        )));
    }
    let mut escaped = false;
    for c in text.chars() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => {
                return Err(Error::InvalidArgument(format!(
                    "TXT data contains an unescaped quote: {text}"
                )));
            }
            _ => escaped = false,
        }
    }
    // a dangling backslash would escape the closing quote
    if escaped {
        return Err(Error::InvalidArgument(format!(
            "TXT data ends with a lone backslash: {text}"
        )));
    }
    Ok(())
}
