//! Version specifiers, core versions and precision-aware comparison.
//!
//! Hugo changed its tagging scheme after `v0.53`: releases up to and
//! including `0.53` were tagged `v0.MINOR` (with the occasional `v0.MINOR.PATCH`
//! bugfix), later releases are always tagged `v0.MINOR.PATCH`. Everything that
//! depends on that boundary goes through [`CoreVersion::is_legacy_epoch`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{ResolveError, Result};

/// Highest minor version of the two-component tagging epoch.
pub const LEGACY_EPOCH_LAST_MINOR: u32 = 53;

const EXTENDED_SUFFIX: &str = "extended";

/// How many numeric components of a specifier were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precision {
    Major = 1,
    Minor = 2,
    Patch = 3,
}

impl Precision {
    fn from_components(count: usize) -> Option<Self> {
        match count {
            1 => Some(Precision::Major),
            2 => Some(Precision::Minor),
            3 => Some(Precision::Patch),
            _ => None,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Precision::Major => "major",
            Precision::Minor => "minor",
            Precision::Patch => "patch",
        };
        f.write_str(name)
    }
}

/// Numeric identity of a release, independent of the extended build variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CoreVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl CoreVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a release tag such as `v0.73.1` or `v0.53`.
    ///
    /// Components missing from the tag are zero.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag.parse::<VersionSpec>()? {
            VersionSpec::Partial { core, .. } => Ok(core),
            VersionSpec::Latest { .. } => Err(ResolveError::InvalidSpecFormat {
                input: tag.to_string(),
            }),
        }
    }

    /// Compare the components up to `precision`, coarser components first.
    pub fn compare(&self, other: &Self, precision: Precision) -> Ordering {
        let ordering = self.major.cmp(&other.major);
        if precision == Precision::Major || ordering != Ordering::Equal {
            return ordering;
        }
        let ordering = self.minor.cmp(&other.minor);
        if precision == Precision::Minor || ordering != Ordering::Equal {
            return ordering;
        }
        self.patch.cmp(&other.patch)
    }

    pub fn matches(&self, other: &Self, precision: Precision) -> bool {
        self.compare(other, precision) == Ordering::Equal
    }

    pub fn is_higher_or_equal(&self, other: &Self, precision: Precision) -> bool {
        self.compare(other, precision) != Ordering::Less
    }

    pub fn is_legacy_epoch(&self) -> bool {
        self.major == 0 && self.minor <= LEGACY_EPOCH_LAST_MINOR
    }

    /// Version as it appears in tags and asset names, without the `v` prefix.
    ///
    /// Legacy releases with a zero patch drop it: `0.53`, but `0.53.1` and `0.73.0`.
    pub fn label(&self) -> String {
        if self.is_legacy_epoch() && self.patch == 0 {
            format!("{}.{}", self.major, self.minor)
        } else {
            format!("{}.{}.{}", self.major, self.minor, self.patch)
        }
    }

    pub fn release_tag(&self) -> String {
        format!("v{}", self.label())
    }

    /// The components pinned at `precision`, e.g. `0.72` at minor precision.
    pub fn prefix(&self, precision: Precision) -> String {
        match precision {
            Precision::Major => self.major.to_string(),
            Precision::Minor => format!("{}.{}", self.major, self.minor),
            Precision::Patch => format!("{}.{}.{}", self.major, self.minor, self.patch),
        }
    }
}

impl fmt::Display for CoreVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Legacy-epoch precision override.
///
/// A `0.MINOR` specifier with `MINOR <= 53` already names one release (`v0.MINOR`),
/// so it is resolved as if every component had been given and no lookup is needed.
/// Kept apart from [`CoreVersion::compare`] so the epoch boundary stays visible.
pub fn pins_legacy_release(core: &CoreVersion, precision: Precision) -> bool {
    precision == Precision::Minor && core.is_legacy_epoch()
}

/// A parsed, not yet resolved, version request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSpec {
    Latest {
        extended: bool,
    },
    Partial {
        core: CoreVersion,
        precision: Precision,
        extended: bool,
    },
}

impl VersionSpec {
    pub fn extended(&self) -> bool {
        match self {
            VersionSpec::Latest { extended } | VersionSpec::Partial { extended, .. } => *extended,
        }
    }
}

impl FromStr for VersionSpec {
    type Err = ResolveError;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = || ResolveError::InvalidSpecFormat {
            input: input.to_string(),
        };

        let (version, extended) = match input.split_once('-') {
            Some((version, EXTENDED_SUFFIX)) => (version, true),
            Some(_) => return Err(invalid()),
            None => (input, false),
        };

        if version == "latest" {
            return Ok(VersionSpec::Latest { extended });
        }

        let version = version.strip_prefix('v').unwrap_or(version);
        let components = version
            .split('.')
            .map(parse_component)
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(invalid)?;
        let precision = Precision::from_components(components.len()).ok_or_else(invalid)?;

        let component = |index: usize| components.get(index).copied().unwrap_or(0);
        Ok(VersionSpec::Partial {
            core: CoreVersion::new(component(0), component(1), component(2)),
            precision,
            extended,
        })
    }
}

fn parse_component(component: &str) -> Option<u32> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    component.parse().ok()
}

/// A fully resolved version, ready to be turned into an asset name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedVersion {
    core: CoreVersion,
    extended: bool,
}

impl ResolvedVersion {
    pub fn new(core: CoreVersion, extended: bool) -> Self {
        Self { core, extended }
    }

    pub fn core(&self) -> &CoreVersion {
        &self.core
    }

    pub fn extended(&self) -> bool {
        self.extended
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.core)?;
        if self.extended {
            write!(f, "-{EXTENDED_SUFFIX}")?;
        }
        Ok(())
    }
}
