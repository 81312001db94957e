//! @ai:module:intent Catalogue of the fixed analysis sections
//! @ai:module:layer domain
//! @ai:module:public_api SectionId
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent One of the eight fixed analysis sections, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    ProjectOverview,
    TechnicalRequirements,
    MarketAnalysis,
    FinancialAnalysis,
    ImplementationChallenges,
    MarketingStrategy,
    RiskAssessment,
    OverallScore,
}

impl SectionId {
    pub const ALL: [SectionId; 8] = [
        SectionId::ProjectOverview,
        SectionId::TechnicalRequirements,
        SectionId::MarketAnalysis,
        SectionId::FinancialAnalysis,
        SectionId::ImplementationChallenges,
        SectionId::MarketingStrategy,
        SectionId::RiskAssessment,
        SectionId::OverallScore,
    ];

    /// 1-based position in the report
    pub fn number(&self) -> u8 {
        match self {
            SectionId::ProjectOverview => 1,
            SectionId::TechnicalRequirements => 2,
            SectionId::MarketAnalysis => 3,
            SectionId::FinancialAnalysis => 4,
            SectionId::ImplementationChallenges => 5,
            SectionId::MarketingStrategy => 6,
            SectionId::RiskAssessment => 7,
            SectionId::OverallScore => 8,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionId::ProjectOverview => "Project Overview",
            SectionId::TechnicalRequirements => "Technical Requirements",
            SectionId::MarketAnalysis => "Market Analysis",
            SectionId::FinancialAnalysis => "Financial Analysis",
            SectionId::ImplementationChallenges => "Implementation Challenges",
            SectionId::MarketingStrategy => "Marketing Strategy",
            SectionId::RiskAssessment => "Risk Assessment",
            SectionId::OverallScore => "Overall Score",
        }
    }

    /// Sub-points the model is asked to cover inside the section
    pub fn prompts(&self) -> &'static [&'static str] {
        match self {
            SectionId::ProjectOverview => &["Core concept", "Key features", "Value proposition"],
            SectionId::TechnicalRequirements => &["Technology stack", "Infrastructure", "Required expertise"],
            SectionId::MarketAnalysis => &["Target audience", "Competition", "Market size"],
            SectionId::FinancialAnalysis => &[
                "Initial setup costs",
                "Monthly maintenance costs",
                "Potential revenue streams",
            ],
            SectionId::ImplementationChallenges => &["Key obstacles", "Timeline considerations"],
            SectionId::MarketingStrategy => &["Key channels", "USP (Unique Selling Proposition)"],
            SectionId::RiskAssessment => &["Major risks", "Mitigation strategies"],
            SectionId::OverallScore => &["Score (1-10) with justification", "Final recommendation"],
        }
    }

    pub fn from_number(number: u8) -> Option<SectionId> {
        SectionId::ALL.into_iter().find(|s| s.number() == number)
    }

    /// @ai:intent Resolve a heading title to a section, tolerating decoration and case
    /// @ai:effects pure
    pub fn from_title(title: &str) -> Option<SectionId> {
        let lower = title.to_lowercase();
        SectionId::ALL
            .into_iter()
            .find(|s| lower.contains(&s.title().to_lowercase()))
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}
