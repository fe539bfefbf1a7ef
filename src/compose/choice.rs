use rand::prelude::SliceRandom;
use rand::rngs::StdRng;

use crate::catalog::Candidate;

pub const RANDOM_TOKEN: &str = "random";
pub const DISABLED_TOKEN: &str = "disabled";

pub fn is_sentinel(value: &str) -> bool {
    value.eq_ignore_ascii_case(RANDOM_TOKEN) || value.eq_ignore_ascii_case(DISABLED_TOKEN)
}

/// Resolves a requested value against a candidate list. "disabled" yields
/// nothing, "random" draws uniformly from the non-sentinel candidate names,
/// and anything else passes through verbatim without validation.
///
/// The draw uses the supplied generator when one is given so that callers
/// resolving several fields share one deterministic stream; without one it
/// falls back to the thread-local generator.
pub fn resolve_choice(
    requested: &str,
    candidates: &[Candidate],
    rng: Option<&mut StdRng>,
) -> String {
    if requested.eq_ignore_ascii_case(DISABLED_TOKEN) {
        return String::new();
    }

    if requested.eq_ignore_ascii_case(RANDOM_TOKEN) {
        let pool: Vec<&str> = candidates
            .iter()
            .map(Candidate::name)
            .filter(|name| !is_sentinel(name))
            .collect();
        let picked = match rng {
            Some(rng) => pool.choose(rng),
            None => pool.choose(&mut rand::thread_rng()),
        };
        return picked.map(|name| (*name).to_string()).unwrap_or_default();
    }

    requested.to_string()
}
