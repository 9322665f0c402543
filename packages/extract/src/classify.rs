//! Sorts debt records into buckets by their category label.

use sitfis_extract_models::CategoryBucket;

/// Classifies a category label. Case-insensitive; the first matching rule
/// wins:
///
/// 1. contains both `SIMPLES` and `NAC` → [`CategoryBucket::SimplifiedRegime`]
/// 2. contains `CP` → [`CategoryBucket::SocialSecurityContribution`]
/// 3. anything else → [`CategoryBucket::Other`]
///
/// Matching is plain substring containment, so `CP` also matches inside a
/// longer word.
#[must_use]
pub fn classify(label: &str) -> CategoryBucket {
    let upper = label.to_uppercase();

    if upper.contains("SIMPLES") && upper.contains("NAC") {
        CategoryBucket::SimplifiedRegime
    } else if upper.contains("CP") {
        CategoryBucket::SocialSecurityContribution
    } else {
        CategoryBucket::Other
    }
}
