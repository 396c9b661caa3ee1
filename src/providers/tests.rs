use super::*;
use crate::zone::provider::ProviderPreset;
use crate::zone::record::RecordType;
use crate::zone::render::OutputFormat;
use crate::zone::spf::SpfParams;

fn zone() -> ZoneBuilder {
    ZoneBuilder::new("example.com.", 300).unwrap()
}

fn count(zone: &ZoneBuilder, record_type: RecordType) -> usize {
    zone.records()
        .iter()
        .filter(|r| r.record_type == record_type)
        .count()
}

// --- Fastmail ---
#[test]
fn test_fastmail_bundle() {
    let mut zone = zone();
    zone.add_fastmail(Some(3600)).unwrap();

    assert_eq!(count(&zone, RecordType::MX), 2);
    assert_eq!(count(&zone, RecordType::CNAME), 3);
    assert_eq!(count(&zone, RecordType::A), 2);
    assert_eq!(count(&zone, RecordType::SRV), 6);
    assert_eq!(count(&zone, RecordType::TXT), 0);
    assert!(zone.records().iter().all(|r| r.ttl == 3600));

    let mx = &zone.records()[0];
    assert_eq!(mx.name, "example.com.");
    assert_eq!(mx.data, "10 in1-smtp.messagingengine.com.");

    let dkim = &zone.records()[2];
    assert_eq!(dkim.name, "fm1._domainkey");
    assert_eq!(dkim.data, "fm1.example.com.dkim.fmhosted.com.");

    let srv = zone
        .records()
        .iter()
        .find(|r| r.name == "_pop3s._tcp.example.com.")
        .unwrap();
    assert_eq!(srv.data, "10 1 995 pop.fastmail.com.");

    assert_eq!(zone.spf_includes(), ["spf.messagingengine.com"]);
}

#[test]
fn test_fastmail_webmail_records_follow_preset_ttl() {
    // the `mail` A records use the preset TTL like the rest of the bundle,
    // not the zone default
    let mut zone = zone();
    zone.add_fastmail(Some(3600)).unwrap();
    let webmail: Vec<_> = zone
        .records()
        .iter()
        .filter(|r| r.name == "mail" && r.record_type == RecordType::A)
        .collect();
    assert_eq!(webmail.len(), 2);
    assert!(webmail.iter().all(|r| r.ttl == 3600));
}

#[test]
fn test_fastmail_defaults_to_zone_ttl() {
    let mut zone = zone();
    zone.add_fastmail(None).unwrap();
    assert!(zone.records().iter().all(|r| r.ttl == 300));
}

// --- Mailgun ---
#[test]
fn test_mailgun_without_dkim() {
    let mut zone = zone();
    zone.add_mailgun(&Mailgun::default()).unwrap();

    let summary: Vec<(&str, RecordType, &str)> = zone
        .records()
        .iter()
        .map(|r| (r.name.as_str(), r.record_type, r.data.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("outgoing-mail", RecordType::MX, "10 mxa.mailgun.org."),
            ("outgoing-mail", RecordType::MX, "10 mxb.mailgun.org."),
            ("email.outgoing-mail", RecordType::CNAME, "mailgun.org."),
            (
                "outgoing-mail",
                RecordType::TXT,
                "\"v=spf1 include:mailgun.org ~all\""
            ),
        ]
    );
    assert_eq!(zone.spf_includes(), ["mailgun.org"]);
}

#[test]
fn test_mailgun_with_dkim() {
    let mut zone = zone();
    let preset = Mailgun {
        subdomain: "mg".to_string(),
        ..Default::default()
    }
    .with_dkim("smtp._domainkey", "k=rsa; p=MIGfMA0");
    zone.add_mailgun(&preset).unwrap();

    let dkim = zone
        .records()
        .iter()
        .find(|r| r.name == "smtp._domainkey.mg")
        .unwrap();
    assert_eq!(dkim.record_type, RecordType::TXT);
    assert_eq!(dkim.data, "\"k=rsa; p=MIGfMA0\"");
}

#[test]
fn test_mailgun_needs_both_dkim_parts() {
    let mut zone = zone();
    let preset = Mailgun {
        dkim_hostname: Some("smtp._domainkey".to_string()),
        ..Default::default()
    };
    zone.add_mailgun(&preset).unwrap();
    assert_eq!(count(&zone, RecordType::TXT), 1);
}

// --- Merged SPF ---
#[test]
fn test_presets_merge_into_one_spf_record() {
    let mut zone = zone();
    zone.add_spf(SpfParams::default())
        .unwrap()
        .add_mailgun(&Mailgun::default())
        .unwrap()
        .add_fastmail(None)
        .unwrap();

    let records = zone.finalized_records();
    let spf = records.last().unwrap();
    assert_eq!(spf.name, "example.com.");
    assert_eq!(
        spf.data,
        "\"v=spf1 mx a include:mailgun.org include:spf.messagingengine.com -all\""
    );
}

#[test]
fn test_duplicate_preset_includes_appear_once() {
    let mut zone = zone();
    zone.add_fastmail(None)
        .unwrap()
        .add_fastmail(None)
        .unwrap()
        .add_spf(SpfParams::default().include("spf.messagingengine.com"))
        .unwrap();

    let text = zone.render(OutputFormat::Text).unwrap();
    assert_eq!(text.matches("include:spf.messagingengine.com").count(), 1);
}

#[test]
fn test_preset_include_without_spf_request() {
    let mut zone = zone();
    zone.add_mailgun(&Mailgun::default()).unwrap();
    let records = zone.finalized_records();
    assert_eq!(records.len(), zone.records().len());
    assert!(records.iter().all(|r| r.name != "example.com."));
}

#[test]
fn test_custom_preset_through_trait() {
    struct Verification;

    impl ProviderPreset for Verification {
        fn name(&self) -> &str {
            "verification"
        }

        fn apply(&self, zone: &mut ZoneBuilder) -> Result<(), Error> {
            let apex = zone.domain().to_string();
            zone.add_txt(&apex, "site-verification=abc123", None)?;
            Ok(())
        }
    }

    let mut zone = zone();
    zone.apply_preset(&Verification).unwrap();
    assert_eq!(zone.records()[0].data, "\"site-verification=abc123\"");
}
