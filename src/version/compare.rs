//! Version predicates used by the resolver and exposed to templates.

use super::{PrereleasePolicy, Version};

/// True when `actual` satisfies the `minimum` requirement.
///
/// The requirement is parsed with [`PrereleasePolicy::Lowest`], so an
/// unqualified minimum such as `2.2` is met by any prerelease of `2.2`.
pub fn is_minimum(minimum: &str, actual: &str) -> bool {
    let minimum = Version::parse(minimum, PrereleasePolicy::Lowest);
    let actual = Version::parse(actual, PrereleasePolicy::Highest);

    actual >= minimum
}

/// True when both versions share major and minor numbers.
pub fn is_same_minor(a: &str, b: &str) -> bool {
    let a = Version::parse(a, PrereleasePolicy::Highest);
    let b = Version::parse(b, PrereleasePolicy::Highest);

    a.major() == b.major() && a.minor() == b.minor()
}

/// True when `actual` is at least `minimum` *within the same minor line*.
///
/// `is_minimum_patch("2.2.5", "2.3.0")` is false even though `2.3.0` is
/// newer: the patch requirement only speaks about the `2.2` series.
pub fn is_minimum_patch(minimum: &str, actual: &str) -> bool {
    is_same_minor(minimum, actual) && is_minimum(minimum, actual)
}
