use ferrous_stub_domain::DomainError;

/// Source of DNS message identifiers. Production implementations must be
/// unpredictable to an off-path attacker, and fail rather than fall back
/// to a weaker generator.
pub trait QueryIdSource {
    fn next_id(&self) -> Result<u16, DomainError>;
}
