//! Typed container identity for board columns.
//!
//! # Responsibility
//! - Name every bucket a pitch can occupy: the unsorted pool, the priority
//!   tiers and the interest buckets.
//! - Convert between typed identity and the droppable-id strings used by
//!   drag libraries and persisted rows.
//!
//! # Invariants
//! - The wire string round-trips: `id.to_string().parse() == Ok(id)`.
//! - Container identity is the comparison boundary for order keys; keys are
//!   never compared across containers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static DROPPABLE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(priority|interest)-([a-z][a-z-]*)$").expect("valid droppable id regex"));

const UNSORTED_ID: &str = "unsorted";

/// Priority tier a pitch can be ranked into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityTier {
    Highest,
    High,
    Medium,
    Low,
}

impl PriorityTier {
    /// All tiers in display order, highest first.
    pub const ALL: [PriorityTier; 4] = [Self::Highest, Self::High, Self::Medium, Self::Low];

    fn slug(self) -> &'static str {
        match self {
            Self::Highest => "highest-priority",
            Self::High => "high-priority",
            Self::Medium => "medium-priority",
            Self::Low => "low-priority",
        }
    }

    fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.slug() == slug)
    }
}

/// Interest bucket a pitch can be voted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterestBucket {
    VeryInterested,
    Interested,
    NotInterested,
}

impl InterestBucket {
    /// All buckets in display order, most interested first.
    pub const ALL: [InterestBucket; 3] = [Self::VeryInterested, Self::Interested, Self::NotInterested];

    fn slug(self) -> &'static str {
        match self {
            Self::VeryInterested => "very-interested",
            Self::Interested => "interested",
            Self::NotInterested => "not-interested",
        }
    }

    fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.slug() == slug)
    }
}

/// Identity of one board column.
///
/// Carried as a typed value end to end; the droppable-id string form exists
/// only at the drag-library boundary and in persisted rows, where containers
/// stay opaque identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ContainerId {
    /// Default pool for pitches that have not been placed yet.
    Unsorted,
    /// One of the ranked priority tiers.
    Tier(PriorityTier),
    /// One of the interest vote buckets.
    Bucket(InterestBucket),
}

impl ContainerId {
    /// Every container of a full board, in export/display order.
    pub fn all() -> Vec<ContainerId> {
        let mut containers = vec![Self::Unsorted];
        containers.extend(PriorityTier::ALL.into_iter().map(Self::Tier));
        containers.extend(InterestBucket::ALL.into_iter().map(Self::Bucket));
        containers
    }
}

impl Display for ContainerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsorted => write!(f, "{UNSORTED_ID}"),
            Self::Tier(tier) => write!(f, "priority-{}", tier.slug()),
            Self::Bucket(bucket) => write!(f, "interest-{}", bucket.slug()),
        }
    }
}

impl FromStr for ContainerId {
    type Err = ContainerParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == UNSORTED_ID {
            return Ok(Self::Unsorted);
        }

        let captures = DROPPABLE_ID_RE
            .captures(value)
            .ok_or_else(|| ContainerParseError::MalformedId(value.to_string()))?;
        let slug = &captures[2];
        match &captures[1] {
            "priority" => PriorityTier::from_slug(slug)
                .map(Self::Tier)
                .ok_or_else(|| ContainerParseError::UnknownTier(slug.to_string())),
            "interest" => InterestBucket::from_slug(slug)
                .map(Self::Bucket)
                .ok_or_else(|| ContainerParseError::UnknownBucket(slug.to_string())),
            _ => Err(ContainerParseError::MalformedId(value.to_string())),
        }
    }
}

impl From<ContainerId> for String {
    fn from(value: ContainerId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ContainerId {
    type Error = ContainerParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Errors from parsing a droppable-id string into a [`ContainerId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerParseError {
    /// The string does not match any known column id shape.
    MalformedId(String),
    /// The priority segment names no known tier.
    UnknownTier(String),
    /// The interest segment names no known bucket.
    UnknownBucket(String),
}

impl Display for ContainerParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedId(value) => write!(f, "malformed container id `{value}`"),
            Self::UnknownTier(slug) => write!(f, "unknown priority tier `{slug}`"),
            Self::UnknownBucket(slug) => write!(f, "unknown interest bucket `{slug}`"),
        }
    }
}

impl Error for ContainerParseError {}
