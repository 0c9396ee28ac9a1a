//! Utility selection
//!
//! Narrows the discovered registry to the working set for one run.

use crate::error::HarnessError;
use crate::registry::{Utility, UtilityName, UtilityRegistry};

/// Maximum edit distance for a "did you mean" suggestion.
const SUGGESTION_DISTANCE: usize = 2;

/// Pick the utilities to run.
///
/// With no name every registered utility is selected, in registration order.
/// With a name, exactly one utility is selected by case-insensitive match and the
/// discovered casing is kept.
pub fn select<'a>(registry: &'a UtilityRegistry, requested: Option<&str>) -> Result<Vec<&'a Utility>, HarnessError> {
    let Some(requested) = requested else {
        return Ok(registry.iter().collect());
    };

    match registry.get_ignore_case(requested) {
        Some(utility) => Ok(vec![utility]),
        None => {
            let available = registry.names();
            let suggestion = closest_name(requested, &available);
            Err(HarnessError::not_found(requested, available, suggestion))
        }
    }
}

fn closest_name(requested: &str, available: &[UtilityName]) -> Option<UtilityName> {
    let requested = requested.to_lowercase();
    available
        .iter()
        .map(|name| (levenshtein_distance(&requested, &name.as_str().to_lowercase()), name))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name.clone())
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j] + cost).min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
