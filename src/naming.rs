use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Axis slot of the naming convention. Lights authored by the panel always
/// sit on the center axis.
pub const NAME_AXIS: char = 'C';
pub const ROOT_GROUP_NAME: &str = "light_C_001_GRUP";
/// Largest index the three-digit field can carry. Searching past it means the
/// basename/function/suffix combination is exhausted and creation fails.
pub const MAX_NAME_INDEX: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LightType {
    Point,
    Spot,
    Area,
    Directional,
    IrisArea,
    IrisSkyDome,
}

impl LightType {
    pub const ALL: [LightType; 6] = [
        LightType::Point,
        LightType::Spot,
        LightType::Area,
        LightType::Directional,
        LightType::IrisArea,
        LightType::IrisSkyDome,
    ];

    /// Node-type string, also the fallback basename when the field is empty.
    pub fn type_name(self) -> &'static str {
        match self {
            LightType::Point => "pointLight",
            LightType::Spot => "spotLight",
            LightType::Area => "areaLight",
            LightType::Directional => "directionalLight",
            LightType::IrisArea => "irisAreaLight",
            LightType::IrisSkyDome => "irisSkyDomeLight",
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            LightType::Point => "POIT",
            LightType::Spot => "SPTL",
            LightType::Area => "ARLT",
            LightType::Directional => "DIRL",
            LightType::IrisArea => "AIRL",
            LightType::IrisSkyDome => "AISD",
        }
    }

    /// Kinds provided by the optional iris renderer plugin.
    pub fn is_vendor(self) -> bool {
        matches!(self, LightType::IrisArea | LightType::IrisSkyDome)
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|light_type| light_type.type_name() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            LightType::Point => "Point",
            LightType::Spot => "Spot",
            LightType::Area => "Area",
            LightType::Directional => "Directional",
            LightType::IrisArea => "Iris Area",
            LightType::IrisSkyDome => "Iris Sky Dome",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionTag {
    Key,
    Fill,
    Rim,
    Kicker,
    Bounce,
    Specular,
}

impl FunctionTag {
    pub const ALL: [FunctionTag; 6] = [
        FunctionTag::Key,
        FunctionTag::Fill,
        FunctionTag::Rim,
        FunctionTag::Kicker,
        FunctionTag::Bounce,
        FunctionTag::Specular,
    ];

    /// Three-letter code embedded in light names.
    pub fn tag(self) -> &'static str {
        match self {
            FunctionTag::Key => "key",
            FunctionTag::Fill => "fil",
            FunctionTag::Rim => "rim",
            FunctionTag::Kicker => "kck",
            FunctionTag::Bounce => "bnc",
            FunctionTag::Specular => "spl",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|function| function.tag() == tag)
    }

    pub fn label(self) -> &'static str {
        match self {
            FunctionTag::Key => "Key",
            FunctionTag::Fill => "Fill",
            FunctionTag::Rim => "Rim",
            FunctionTag::Kicker => "Kicker",
            FunctionTag::Bounce => "Bounce",
            FunctionTag::Specular => "Specular",
        }
    }
}

impl Default for FunctionTag {
    fn default() -> Self {
        FunctionTag::Key
    }
}

pub fn compose(basename: &str, function: FunctionTag, index: u32, light_type: LightType) -> String {
    format!("{basename}_{}_{NAME_AXIS}_{index:03}_{}", function.tag(), light_type.suffix())
}

/// Walks indices upward from 1 until a free name is found. The search is
/// bounded by [`MAX_NAME_INDEX`]; past that the index field can no longer hold
/// the value and the name space counts as exhausted.
pub fn resolve_unique(
    basename: &str,
    function: FunctionTag,
    light_type: LightType,
    exists: impl Fn(&str) -> bool,
) -> Result<String> {
    for index in 1..=MAX_NAME_INDEX {
        let candidate = compose(basename, function, index, light_type);
        if !exists(&candidate) {
            return Ok(candidate);
        }
    }
    bail!(
        "light name space exhausted for '{basename}_{}_{NAME_AXIS}_***_{}': all {MAX_NAME_INDEX} indices are taken",
        function.tag(),
        light_type.suffix()
    );
}

/// Checks a name against `^[A-Za-z0-9]+_[a-z]{3}_[A-Z]_[0-9]{3}_[A-Z]{4}$`.
pub fn matches_convention(name: &str) -> bool {
    let fields: Vec<&str> = name.split('_').collect();
    let [basename, function, axis, index, suffix] = fields.as_slice() else {
        return false;
    };
    !basename.is_empty()
        && basename.chars().all(|c| c.is_ascii_alphanumeric())
        && function.len() == 3
        && function.chars().all(|c| c.is_ascii_lowercase())
        && axis.len() == 1
        && axis.chars().all(|c| c.is_ascii_uppercase())
        && index.len() == 3
        && index.chars().all(|c| c.is_ascii_digit())
        && suffix.len() == 4
        && suffix.chars().all(|c| c.is_ascii_uppercase())
}

/// Startup check: every light kind has a well-formed, distinct suffix. The
/// mapping itself is an exhaustive `match`, so a new enum member without a
/// suffix fails to compile; this guards the shape of the codes.
pub fn validate_suffix_table() -> Result<()> {
    let mut seen = BTreeSet::new();
    for light_type in LightType::ALL {
        let suffix = light_type.suffix();
        if suffix.len() != 4 || !suffix.chars().all(|c| c.is_ascii_uppercase()) {
            bail!("suffix '{suffix}' for {} is not four uppercase letters", light_type.type_name());
        }
        if !seen.insert(suffix) {
            bail!("suffix '{suffix}' is assigned to more than one light kind");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_point_key_names() {
        assert_eq!(compose("foo", FunctionTag::Key, 1, LightType::Point), "foo_key_C_001_POIT");
    }

    #[test]
    fn every_kind_produces_a_convention_name() {
        for light_type in LightType::ALL {
            let name = compose("rig01", FunctionTag::Bounce, 7, light_type);
            assert!(matches_convention(&name), "{name} violates the convention");
        }
    }

    #[test]
    fn resolve_skips_taken_indices() {
        let taken = ["foo_key_C_001_POIT", "foo_key_C_002_POIT"];
        let resolved = resolve_unique("foo", FunctionTag::Key, LightType::Point, |name| {
            taken.contains(&name)
        })
        .expect("resolve");
        assert_eq!(resolved, "foo_key_C_003_POIT");
    }

    #[test]
    fn resolve_fails_past_the_bound() {
        let err = resolve_unique("foo", FunctionTag::Key, LightType::Point, |_| true)
            .expect_err("exhausted name space must fail");
        assert!(err.to_string().contains("exhausted"));
    }

    #[test]
    fn convention_rejects_malformed_names() {
        for name in ["foo_key_C_01_POIT", "foo_key_c_001_POIT", "foo_bar_key_C_001_POIT", "", "foo"] {
            assert!(!matches_convention(name), "{name:?} should not match");
        }
    }

    #[test]
    fn suffix_table_is_valid() {
        validate_suffix_table().expect("suffix table");
    }
}
