//! Mapping between `ferrous_stub_domain::RecordType` and `hickory_proto::rr::RecordType`.

use ferrous_stub_domain::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

/// Bidirectional mapper between domain and hickory record types
pub struct RecordTypeMapper;

impl RecordTypeMapper {
    /// Convert domain RecordType → hickory RecordType (for building queries)
    pub fn to_hickory(record_type: &RecordType) -> HickoryRecordType {
        match record_type {
            // Basic records
            RecordType::A => HickoryRecordType::A,
            RecordType::AAAA => HickoryRecordType::AAAA,
            RecordType::CNAME => HickoryRecordType::CNAME,
            RecordType::MX => HickoryRecordType::MX,
            RecordType::TXT => HickoryRecordType::TXT,
            RecordType::PTR => HickoryRecordType::PTR,

            // Advanced records
            RecordType::SRV => HickoryRecordType::SRV,
            RecordType::SOA => HickoryRecordType::SOA,
            RecordType::NS => HickoryRecordType::NS,
            RecordType::NAPTR => HickoryRecordType::NAPTR,
            RecordType::DS => HickoryRecordType::DS,
            RecordType::DNSKEY => HickoryRecordType::DNSKEY,
            RecordType::SVCB => HickoryRecordType::SVCB,
            RecordType::HTTPS => HickoryRecordType::HTTPS,

            // Security & modern records
            RecordType::CAA => HickoryRecordType::CAA,
            RecordType::TLSA => HickoryRecordType::TLSA,
            RecordType::SSHFP => HickoryRecordType::SSHFP,
            RecordType::CDS => HickoryRecordType::CDS,
            RecordType::CDNSKEY => HickoryRecordType::CDNSKEY,

            // DNSSEC records
            RecordType::RRSIG => HickoryRecordType::RRSIG,
            RecordType::NSEC => HickoryRecordType::NSEC,
            RecordType::NSEC3 => HickoryRecordType::NSEC3,
            RecordType::NSEC3PARAM => HickoryRecordType::NSEC3PARAM,

            // Meta and legacy
            RecordType::OPT => HickoryRecordType::OPT,
            RecordType::NULL => HickoryRecordType::NULL,
            RecordType::HINFO => HickoryRecordType::HINFO,
            RecordType::ANY => HickoryRecordType::ANY,

            // Everything else goes by code; hickory keeps what it has no
            // name for as `Unknown(n)` on the wire.
            RecordType::DNAME
            | RecordType::IPSECKEY
            | RecordType::OPENPGPKEY
            | RecordType::ZONEMD
            | RecordType::Unknown(_) => HickoryRecordType::from(record_type.to_u16()),
        }
    }

    /// Convert hickory RecordType → domain RecordType (for decoded responses)
    ///
    /// Goes through the numeric code so that types hickory only knows as
    /// `Unknown(n)` still map when the domain model has them.
    pub fn from_hickory(hickory_type: HickoryRecordType) -> RecordType {
        RecordType::from_u16(u16::from(hickory_type))
    }
}
