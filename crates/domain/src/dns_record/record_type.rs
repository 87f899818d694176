use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    MX,
    TXT,
    PTR,

    SRV,
    SOA,
    NS,
    NAPTR,
    DS,
    DNSKEY,
    SVCB,
    HTTPS,

    CAA,
    TLSA,
    SSHFP,
    DNAME,

    RRSIG,
    NSEC,
    NSEC3,
    NSEC3PARAM,

    CDS,
    CDNSKEY,

    OPT,

    NULL,
    HINFO,
    IPSECKEY,
    OPENPGPKEY,
    ZONEMD,

    ANY,

    /// Any other code, carried opaquely (RFC 3597).
    Unknown(u16),
}

impl RecordType {
    /// Mnemonic for named types; `None` for [`RecordType::Unknown`].
    pub fn as_str(&self) -> Option<&'static str> {
        let name = match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CNAME => "CNAME",
            RecordType::MX => "MX",
            RecordType::TXT => "TXT",
            RecordType::PTR => "PTR",
            RecordType::SRV => "SRV",
            RecordType::SOA => "SOA",
            RecordType::NS => "NS",
            RecordType::NAPTR => "NAPTR",
            RecordType::DS => "DS",
            RecordType::DNSKEY => "DNSKEY",
            RecordType::SVCB => "SVCB",
            RecordType::HTTPS => "HTTPS",
            RecordType::CAA => "CAA",
            RecordType::TLSA => "TLSA",
            RecordType::SSHFP => "SSHFP",
            RecordType::DNAME => "DNAME",
            RecordType::RRSIG => "RRSIG",
            RecordType::NSEC => "NSEC",
            RecordType::NSEC3 => "NSEC3",
            RecordType::NSEC3PARAM => "NSEC3PARAM",
            RecordType::CDS => "CDS",
            RecordType::CDNSKEY => "CDNSKEY",
            RecordType::OPT => "OPT",
            RecordType::NULL => "NULL",
            RecordType::HINFO => "HINFO",
            RecordType::IPSECKEY => "IPSECKEY",
            RecordType::OPENPGPKEY => "OPENPGPKEY",
            RecordType::ZONEMD => "ZONEMD",
            RecordType::ANY => "ANY",
            RecordType::Unknown(_) => return None,
        };
        Some(name)
    }

    pub fn to_u16(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::NULL => 10,
            RecordType::PTR => 12,
            RecordType::HINFO => 13,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::SRV => 33,
            RecordType::NAPTR => 35,
            RecordType::DNAME => 39,
            RecordType::OPT => 41,
            RecordType::DS => 43,
            RecordType::SSHFP => 44,
            RecordType::IPSECKEY => 45,
            RecordType::RRSIG => 46,
            RecordType::NSEC => 47,
            RecordType::DNSKEY => 48,
            RecordType::NSEC3 => 50,
            RecordType::NSEC3PARAM => 51,
            RecordType::TLSA => 52,
            RecordType::CDS => 59,
            RecordType::CDNSKEY => 60,
            RecordType::OPENPGPKEY => 61,
            RecordType::ZONEMD => 63,
            RecordType::SVCB => 64,
            RecordType::HTTPS => 65,
            RecordType::ANY => 255,
            RecordType::CAA => 257,
            RecordType::Unknown(code) => *code,
        }
    }

    /// Total mapping: codes without a named variant become `Unknown(code)`,
    /// so `from_u16(rt.to_u16()) == rt` for every value built this way.
    pub fn from_u16(code: u16) -> Self {
        match code {
            1 => RecordType::A,
            2 => RecordType::NS,
            5 => RecordType::CNAME,
            6 => RecordType::SOA,
            10 => RecordType::NULL,
            12 => RecordType::PTR,
            13 => RecordType::HINFO,
            15 => RecordType::MX,
            16 => RecordType::TXT,
            28 => RecordType::AAAA,
            33 => RecordType::SRV,
            35 => RecordType::NAPTR,
            39 => RecordType::DNAME,
            41 => RecordType::OPT,
            43 => RecordType::DS,
            44 => RecordType::SSHFP,
            45 => RecordType::IPSECKEY,
            46 => RecordType::RRSIG,
            47 => RecordType::NSEC,
            48 => RecordType::DNSKEY,
            50 => RecordType::NSEC3,
            51 => RecordType::NSEC3PARAM,
            52 => RecordType::TLSA,
            59 => RecordType::CDS,
            60 => RecordType::CDNSKEY,
            61 => RecordType::OPENPGPKEY,
            63 => RecordType::ZONEMD,
            64 => RecordType::SVCB,
            65 => RecordType::HTTPS,
            255 => RecordType::ANY,
            257 => RecordType::CAA,
            other => RecordType::Unknown(other),
        }
    }

    /// OPT is a pseudo-record that lives in the additional section and can
    /// never be asked for in a question.
    pub fn is_queryable(&self) -> bool {
        !matches!(self, RecordType::OPT)
    }

    /// Parses a raw QTYPE as received from a caller.
    ///
    /// Refuses 0, the reserved 65535, OPT and the meta range 128..=254
    /// (TKEY, TSIG, zone transfers, MAILA/MAILB). Everything else, named or
    /// not, is a valid question type.
    pub fn from_qtype(qtype: u16) -> Option<Self> {
        match qtype {
            0 | 65535 | 128..=254 => None,
            code => Some(Self::from_u16(code)).filter(RecordType::is_queryable),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(name) => f.write_str(name),
            None => write!(f, "TYPE{}", self.to_u16()),
        }
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        match upper.as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::AAAA),
            "CNAME" => Ok(RecordType::CNAME),
            "MX" => Ok(RecordType::MX),
            "TXT" => Ok(RecordType::TXT),
            "PTR" => Ok(RecordType::PTR),
            "SRV" => Ok(RecordType::SRV),
            "SOA" => Ok(RecordType::SOA),
            "NS" => Ok(RecordType::NS),
            "NAPTR" => Ok(RecordType::NAPTR),
            "DS" => Ok(RecordType::DS),
            "DNSKEY" => Ok(RecordType::DNSKEY),
            "SVCB" => Ok(RecordType::SVCB),
            "HTTPS" => Ok(RecordType::HTTPS),
            "CAA" => Ok(RecordType::CAA),
            "TLSA" => Ok(RecordType::TLSA),
            "SSHFP" => Ok(RecordType::SSHFP),
            "DNAME" => Ok(RecordType::DNAME),
            "RRSIG" => Ok(RecordType::RRSIG),
            "NSEC" => Ok(RecordType::NSEC),
            "NSEC3" => Ok(RecordType::NSEC3),
            "NSEC3PARAM" => Ok(RecordType::NSEC3PARAM),
            "CDS" => Ok(RecordType::CDS),
            "CDNSKEY" => Ok(RecordType::CDNSKEY),
            "OPT" => Ok(RecordType::OPT),
            "NULL" => Ok(RecordType::NULL),
            "HINFO" => Ok(RecordType::HINFO),
            "IPSECKEY" => Ok(RecordType::IPSECKEY),
            "OPENPGPKEY" => Ok(RecordType::OPENPGPKEY),
            "ZONEMD" => Ok(RecordType::ZONEMD),
            "ANY" => Ok(RecordType::ANY),
            other => other
                .strip_prefix("TYPE")
                .and_then(|code| code.parse::<u16>().ok())
                .map(RecordType::from_u16)
                .ok_or_else(|| format!("Unknown record type: {}", s)),
        }
    }
}

impl TryFrom<u16> for RecordType {
    type Error = crate::DomainError;

    fn try_from(qtype: u16) -> Result<Self, Self::Error> {
        Self::from_qtype(qtype).ok_or(crate::DomainError::InvalidRecordType(qtype))
    }
}
