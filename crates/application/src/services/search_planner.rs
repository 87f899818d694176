use ferrous_stub_domain::hostname::{count_dots, fits_wire_format, is_fully_qualified};
use ferrous_stub_domain::{CandidateName, ResolverConfig};
use tracing::debug;

/// Expands a hostname into the ordered names to query.
pub struct SearchPlanner;

impl SearchPlanner {
    /// Fully-qualified names (trailing dot) yield exactly themselves.
    /// Otherwise the bare name goes first when it has at least `ndots`
    /// dots, last when it has fewer, with every search suffix in between
    /// in configured order. Names too long for the wire are dropped, as
    /// are case-insensitive duplicates.
    pub fn plan(hostname: &str, config: &ResolverConfig) -> Vec<CandidateName> {
        if is_fully_qualified(hostname) {
            let name = hostname.trim_end_matches('.');
            return if fits_wire_format(name) {
                vec![CandidateName::bare(name, 0)]
            } else {
                vec![]
            };
        }

        let suffixed = config
            .normalized_search()
            .into_iter()
            .map(|suffix| CandidateName::with_suffix(hostname, &suffix, 0));
        let bare = std::iter::once(CandidateName::bare(hostname, 0));

        let bare_first = count_dots(hostname) >= config.ndots;
        let ordered: Vec<CandidateName> = if bare_first {
            bare.chain(suffixed).collect()
        } else {
            suffixed.chain(bare).collect()
        };

        let mut plan: Vec<CandidateName> = Vec::with_capacity(ordered.len());
        for mut candidate in ordered {
            if !fits_wire_format(&candidate.name) {
                debug!(candidate = %candidate.name, "Dropping candidate exceeding wire limits");
                continue;
            }
            if plan
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(&candidate.name))
            {
                continue;
            }
            candidate.rank = plan.len();
            plan.push(candidate);
        }
        plan
    }
}
