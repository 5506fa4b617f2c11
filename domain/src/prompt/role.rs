//! Role categories for question tailoring
//!
//! An expert's free-text role label is mapped onto a closed set of
//! categories via a declarative keyword table. Roles matching nothing fall
//! into the explicit [`RoleCategory::Uncategorized`] variant rather than an
//! implicit fallthrough, keeping the state space closed and testable.

/// Closed set of role categories recognized by the prompt builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCategory {
    Business,
    Technical,
    Seo,
    Content,
    Social,
    Uncategorized,
}

/// Keyword table: first category whose keyword appears in the role wins
const CATEGORY_KEYWORDS: &[(RoleCategory, &[&str])] = &[
    (
        RoleCategory::Business,
        &["business", "strategy", "strategist", "marketing", "growth"],
    ),
    (
        RoleCategory::Technical,
        &["technical", "engineering", "engineer", "developer", "architect"],
    ),
    (RoleCategory::Seo, &["seo", "search"]),
    (
        RoleCategory::Content,
        &["content", "editorial", "editor", "copywriter", "writer"],
    ),
    (RoleCategory::Social, &["social", "community"]),
];

impl RoleCategory {
    /// Categorize a role label by case-insensitive substring match
    pub fn from_role(role: &str) -> Self {
        let role = role.to_lowercase();
        for (category, keywords) in CATEGORY_KEYWORDS {
            if keywords.iter().any(|kw| role.contains(kw)) {
                return *category;
            }
        }
        RoleCategory::Uncategorized
    }

    /// Role-tailored deep-dive question for rounds >= 2
    pub fn deep_dive_question(&self) -> &'static str {
        match self {
            RoleCategory::Business => {
                "Dig into the business case: what does this mean for positioning, \
                 revenue and return on investment, and where are the commercial risks?"
            }
            RoleCategory::Technical => {
                "Dig into feasibility: how would this actually be built, what are the \
                 architectural trade-offs, and which technical risks worry you most?"
            }
            RoleCategory::Seo => {
                "Dig into discoverability: how does this play with search intent, \
                 rankings and organic visibility, and what would you change to improve them?"
            }
            RoleCategory::Content => {
                "Dig into the messaging: what story should be told, to which audience, \
                 and where does the current framing fall flat?"
            }
            RoleCategory::Social => {
                "Dig into the community angle: how will people react, what drives \
                 engagement here, and what backlash should be anticipated?"
            }
            RoleCategory::Uncategorized => {
                "Dig deeper from your own area of expertise: what has the discussion \
                 missed so far that you are uniquely placed to see?"
            }
        }
    }
}
