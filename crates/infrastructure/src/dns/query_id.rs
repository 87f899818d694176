use ferrous_stub_application::ports::QueryIdSource;
use ferrous_stub_domain::DomainError;
use ring::rand::{SecureRandom, SystemRandom};

/// Query ids from the operating system CSPRNG.
#[derive(Debug, Clone)]
pub struct SystemRandomIdSource {
    rng: SystemRandom,
}

impl SystemRandomIdSource {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for SystemRandomIdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryIdSource for SystemRandomIdSource {
    fn next_id(&self) -> Result<u16, DomainError> {
        let mut bytes = [0u8; 2];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| DomainError::RandomSource("SystemRandom::fill failed".into()))?;
        Ok(u16::from_be_bytes(bytes))
    }
}
