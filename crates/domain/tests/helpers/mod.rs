mod builders;

pub use builders::DnsResponseBuilder;
