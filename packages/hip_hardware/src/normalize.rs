//! Collapses per-revision architecture names onto the canonical family names that kernel
//! selection is keyed on.

use tracing::debug;

use crate::{BoundedName, RawDeviceProperties};

const GFX1030: &str = "gfx1030";
const GFX1010: &str = "gfx1010";
const GFX900: &str = "gfx900";

/// Revision markers after "gfx90" that belong to the gfx900 family.
///
/// Other markers (e.g. the '6' in gfx906 or the 'a' in gfx90a) identify distinct kernel
/// targets and are left alone.
const GFX900_REVISION_MARKERS: [char; 3] = ['2', '9', 'c'];

/// Returns the canonical family name for an architecture name as reported by the runtime.
///
/// The rules are evaluated in order and only the first matching one applies:
///
/// 1. Any name containing "gfx103" becomes "gfx1030".
/// 2. Any name containing "gfx101" becomes "gfx1010".
/// 3. Any name containing "gfx90" immediately followed by '2', '9' or 'c' becomes "gfx900".
/// 4. Any other name is already canonical and is returned unchanged.
///
/// A replacement always replaces the entire name, including any target feature suffixes.
///
/// # Example
///
/// ```
/// use hip_hardware::normalize_arch_name;
///
/// assert_eq!(normalize_arch_name("gfx1031"), "gfx1030");
/// assert_eq!(normalize_arch_name("gfx90c:xnack-"), "gfx900");
/// assert_eq!(normalize_arch_name("gfx906:sramecc+:xnack-"), "gfx906:sramecc+:xnack-");
/// ```
#[must_use]
pub fn normalize_arch_name(arch_name: &str) -> &str {
    family_name(arch_name).unwrap_or(arch_name)
}

fn family_name(arch_name: &str) -> Option<&'static str> {
    if arch_name.contains("gfx103") {
        return Some(GFX1030);
    }

    if arch_name.contains("gfx101") {
        return Some(GFX1010);
    }

    let (_, after_gfx90) = arch_name.split_once("gfx90")?;

    after_gfx90
        .chars()
        .next()
        .filter(|marker| GFX900_REVISION_MARKERS.contains(marker))
        .map(|_| GFX900)
}

/// Rewrites the architecture name of a property block to its canonical family name.
///
/// All other fields are returned unchanged. See [`normalize_arch_name()`] for the rules.
#[must_use]
pub fn normalize(mut properties: RawDeviceProperties) -> RawDeviceProperties {
    if let Some(family) = family_name(properties.arch_name().as_str()) {
        if properties.arch_name() != family {
            debug!(
                reported = properties.arch_name().as_str(),
                family,
                "collapsing architecture name onto its family"
            );

            properties.set_arch_name(BoundedName::from_static(family));
        }
    }

    properties
}
