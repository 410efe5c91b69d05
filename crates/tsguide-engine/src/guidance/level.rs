use crate::models::UserLevel;

/// How much guidance a user level gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProfile {
    /// Level this profile describes
    pub level: UserLevel,
    /// Maximum specifications listed in any section
    pub max_specifications: usize,
    /// Maximum related topics returned
    pub max_related_topics: usize,
    /// Include plain-language concept descriptions
    pub descriptions: bool,
    /// Include research-pattern tips
    pub tips: bool,
    /// Include specification dependencies
    pub dependencies: bool,
    /// Include protocol procedures and layers
    pub procedures: bool,
    /// Append a glossary section
    pub glossary: bool,
    /// Append a technical details section
    pub technical_details: bool,
}

impl LevelProfile {
    /// Profile for a level
    pub fn for_level(level: UserLevel) -> Self {
        match level {
            UserLevel::Beginner => Self {
                level,
                max_specifications: 3,
                max_related_topics: 4,
                descriptions: true,
                tips: true,
                dependencies: false,
                procedures: false,
                glossary: true,
                technical_details: false,
            },
            UserLevel::Intermediate => Self {
                level,
                max_specifications: 5,
                max_related_topics: 5,
                descriptions: true,
                tips: false,
                dependencies: true,
                procedures: false,
                glossary: true,
                technical_details: true,
            },
            UserLevel::Expert => Self {
                level,
                max_specifications: 8,
                max_related_topics: 6,
                descriptions: false,
                tips: false,
                dependencies: true,
                procedures: true,
                glossary: false,
                technical_details: true,
            },
        }
    }
}

impl From<UserLevel> for LevelProfile {
    fn from(level: UserLevel) -> Self {
        Self::for_level(level)
    }
}
