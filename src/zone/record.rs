use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordClass {
    IN,
}

impl RecordClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordClass::IN => "IN",
        }
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    TXT,
    SRV,
    MX,
    NS,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CNAME => "CNAME",
            RecordType::TXT => "TXT",
            RecordType::SRV => "SRV",
            RecordType::MX => "MX",
            RecordType::NS => "NS",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resource record as it will appear in the zone.
///
/// `data` is already formatted for its type (quoted for TXT, `<pri> <host>`
/// for MX and so on).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Record {
    pub name: String,
    pub ttl: u32,
    pub class: RecordClass,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub data: String,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        ttl: u32,
        record_type: RecordType,
        data: impl Into<String>,
    ) -> Self {
        Record {
            name: name.into(),
            ttl,
            class: RecordClass::IN,
            record_type,
            data: data.into(),
        }
    }
}
