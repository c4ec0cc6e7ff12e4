use serde::{Deserialize, Serialize};

/// Interest categories users can track. Kept as a fixed table so validation
/// and cohort grouping agree on the same vocabulary.
pub const INTEREST_CATEGORIES: &[&str] = &[
    "fitness",
    "music",
    "academics",
    "arts",
    "technology",
    "sports",
    "languages",
    "outdoors",
];

pub fn is_known_category(category: &str) -> bool {
    INTEREST_CATEGORIES.contains(&category)
}

/// Self-assessed skill level within an interest category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Novice,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub const ALL: &'static [SkillLevel] = &[
        SkillLevel::Beginner,
        SkillLevel::Novice,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Novice => "novice",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Expert => "expert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.as_str() == s)
    }

    /// Ordinal rank used for percentile math (1 = beginner).
    pub fn rank(&self) -> i32 {
        match self {
            SkillLevel::Beginner => 1,
            SkillLevel::Novice => 2,
            SkillLevel::Intermediate => 3,
            SkillLevel::Advanced => 4,
            SkillLevel::Expert => 5,
        }
    }
}

/// Commitment depth a user declares for an interest. Cohorts are grouped by
/// this so casual users are not compared against competitive ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentLevel {
    Casual,
    Dedicated,
    Competitive,
}

impl IntentLevel {
    pub const ALL: &'static [IntentLevel] = &[
        IntentLevel::Casual,
        IntentLevel::Dedicated,
        IntentLevel::Competitive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLevel::Casual => "casual",
            IntentLevel::Dedicated => "dedicated",
            IntentLevel::Competitive => "competitive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Skill,
    Habit,
    Project,
    Competition,
}

impl GoalType {
    pub const ALL: &'static [GoalType] = &[
        GoalType::Skill,
        GoalType::Habit,
        GoalType::Project,
        GoalType::Competition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Skill => "skill",
            GoalType::Habit => "habit",
            GoalType::Project => "project",
            GoalType::Competition => "competition",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

/// Goal lifecycle. Transitions are direct writes; the only rule enforced is
/// membership in this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    Paused,
    Cancelled,
}

impl GoalStatus {
    pub const ALL: &'static [GoalStatus] = &[
        GoalStatus::Active,
        GoalStatus::Completed,
        GoalStatus::Paused,
        GoalStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Paused => "paused",
            GoalStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s2| s2.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl Timeframe {
    pub const ALL: &'static [Timeframe] = &[
        Timeframe::OneMonth,
        Timeframe::ThreeMonths,
        Timeframe::SixMonths,
        Timeframe::OneYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneMonth => "one_month",
            Timeframe::ThreeMonths => "three_months",
            Timeframe::SixMonths => "six_months",
            Timeframe::OneYear => "one_year",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetroType {
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl RetroType {
    pub const ALL: &'static [RetroType] = &[
        RetroType::Weekly,
        RetroType::Monthly,
        RetroType::Quarterly,
        RetroType::Annual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RetroType::Weekly => "weekly",
            RetroType::Monthly => "monthly",
            RetroType::Quarterly => "quarterly",
            RetroType::Annual => "annual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Parent,
    Guardian,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Parent => "parent",
            RelationshipType::Guardian => "guardian",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "parent" => Some(RelationshipType::Parent),
            "guardian" => Some(RelationshipType::Guardian),
            _ => None,
        }
    }
}

/// User-declared age range, e.g. "15-17". Users give a range rather than an
/// exact age; authorization rules key on the range minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    pub min: i32,
    pub max: i32,
}

impl AgeRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Parse "MIN-MAX". Rejects reversed or out-of-bounds ranges.
    pub fn parse(s: &str) -> Option<Self> {
        let (min_s, max_s) = s.split_once('-')?;
        let min: i32 = min_s.trim().parse().ok()?;
        let max: i32 = max_s.trim().parse().ok()?;
        if min > max || min < 5 || max > 120 {
            return None;
        }
        Some(Self { min, max })
    }

    pub fn is_minor(&self) -> bool {
        self.min < 18
    }

    pub fn requires_parental_consent(&self) -> bool {
        self.min < 13
    }
}

impl std::fmt::Display for AgeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}
