use std::fmt::{self, Display};

/// An architecture name split into its processor and target feature settings.
///
/// The HIP runtime reports architectures as target identifiers such as `gfx90a:sramecc+:xnack-`:
/// the processor first, followed by colon-separated features, each suffixed with `+` when
/// enabled or `-` when disabled. A feature without a suffix is treated as "any".
///
/// # Example
///
/// ```
/// use hip_hardware::{FeatureSetting, TargetId};
///
/// let target = TargetId::parse("gfx90a:sramecc+:xnack-");
///
/// assert_eq!(target.processor(), "gfx90a");
/// assert_eq!(target.feature("sramecc"), Some(FeatureSetting::Enabled));
/// assert_eq!(target.feature("xnack"), Some(FeatureSetting::Disabled));
/// assert_eq!(target.feature("tgsplit"), None);
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TargetId {
    processor: String,
    features: Vec<TargetFeature>,
}

/// One feature of a [`TargetId`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TargetFeature {
    name: String,
    setting: FeatureSetting,
}

/// How a target feature is configured.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "mirrors the three states expressible in a target identifier"
)]
pub enum FeatureSetting {
    /// No suffix: code for this target works with the feature either on or off.
    Any,

    /// `+` suffix.
    Enabled,

    /// `-` suffix.
    Disabled,
}

impl TargetId {
    /// Parses an architecture name. Parsing never fails; empty segments are skipped.
    #[must_use]
    pub fn parse(arch_name: &str) -> Self {
        let mut segments = arch_name.split(':');

        let processor = segments.next().unwrap_or_default().to_owned();

        let features = segments
            .filter(|segment| !segment.is_empty())
            .map(TargetFeature::parse)
            .collect();

        Self {
            processor,
            features,
        }
    }

    /// The processor token, e.g. `gfx90a`.
    #[must_use]
    pub fn processor(&self) -> &str {
        &self.processor
    }

    /// The target features in the order they were listed.
    #[must_use]
    pub fn features(&self) -> &[TargetFeature] {
        &self.features
    }

    /// The setting of the named feature, if the feature is listed.
    #[must_use]
    pub fn feature(&self, name: &str) -> Option<FeatureSetting> {
        self.features
            .iter()
            .find(|feature| feature.name == name)
            .map(|feature| feature.setting)
    }
}

impl Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.processor)?;

        for feature in &self.features {
            write!(f, ":{feature}")?;
        }

        Ok(())
    }
}

impl TargetFeature {
    fn parse(segment: &str) -> Self {
        if let Some(name) = segment.strip_suffix('+') {
            Self {
                name: name.to_owned(),
                setting: FeatureSetting::Enabled,
            }
        } else if let Some(name) = segment.strip_suffix('-') {
            Self {
                name: name.to_owned(),
                setting: FeatureSetting::Disabled,
            }
        } else {
            Self {
                name: segment.to_owned(),
                setting: FeatureSetting::Any,
            }
        }
    }

    /// Name of the feature without its suffix, e.g. `xnack`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How the feature is configured.
    #[must_use]
    pub fn setting(&self) -> FeatureSetting {
        self.setting
    }
}

impl Display for TargetFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.setting {
            FeatureSetting::Any => f.write_str(&self.name),
            FeatureSetting::Enabled => write!(f, "{}+", self.name),
            FeatureSetting::Disabled => write!(f, "{}-", self.name),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn plain_processor_has_no_features() {
        let target = TargetId::parse("gfx1030");

        assert_eq!(target.processor(), "gfx1030");
        assert!(target.features().is_empty());
    }

    #[test]
    fn features_keep_their_order_and_setting() {
        let target = TargetId::parse("gfx90a:sramecc+:xnack-:tgsplit");

        let features: Vec<_> = target
            .features()
            .iter()
            .map(|f| (f.name(), f.setting()))
            .collect();

        assert_eq!(
            features,
            [
                ("sramecc", FeatureSetting::Enabled),
                ("xnack", FeatureSetting::Disabled),
                ("tgsplit", FeatureSetting::Any),
            ]
        );
    }

    #[test]
    fn empty_segments_are_skipped() {
        let target = TargetId::parse("gfx906::xnack+:");

        assert_eq!(target.features().len(), 1);
        assert_eq!(target.feature("xnack"), Some(FeatureSetting::Enabled));
    }

    #[test]
    fn empty_name_parses_to_empty_processor() {
        let target = TargetId::parse("");

        assert_eq!(target.processor(), "");
        assert!(target.features().is_empty());
    }

    #[test]
    fn display_restores_canonical_form() {
        assert_eq!(
            TargetId::parse("gfx90a:sramecc+:xnack-").to_string(),
            "gfx90a:sramecc+:xnack-"
        );
    }
}
