//! Personality-trait career matching.
//!
//! Users pick traits from five categories; every trait maps to a fixed set
//! of careers and each hit counts one point towards that career.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Maximum number of matches returned by [`match_careers`].
pub const MAX_MATCHES: usize = crate::config::DEFAULT_MATCH_LIMIT;

/// A named group of selectable traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraitCategory {
    pub name: &'static str,
    pub traits: &'static [&'static str],
}

const CATALOG: [TraitCategory; 5] = [
    TraitCategory {
        name: "Work Style",
        traits: &[
            "Analytical",
            "Creative",
            "Detail-oriented",
            "Independent",
            "Collaborative",
            "Leadership-oriented",
            "Supportive",
        ],
    },
    TraitCategory {
        name: "Work Environment",
        traits: &[
            "Fast-paced",
            "Structured",
            "Flexible",
            "Competitive",
            "Collaborative",
            "Remote-friendly",
            "Office-based",
        ],
    },
    TraitCategory {
        name: "Communication Style",
        traits: &["Direct", "Diplomatic", "Expressive", "Reserved", "Written", "Verbal"],
    },
    TraitCategory {
        name: "Decision Making",
        traits: &["Data-driven", "Intuitive", "Consultative", "Decisive", "Cautious", "Risk-taking"],
    },
    TraitCategory {
        name: "Values",
        traits: &[
            "Work-life balance",
            "Career advancement",
            "Helping others",
            "Innovation",
            "Stability",
            "Recognition",
            "Autonomy",
        ],
    },
];

/// The five trait categories, in display order.
pub fn trait_catalog() -> &'static [TraitCategory] {
    &CATALOG
}

/// Looks up a category by name, ignoring case.
pub fn find_category(name: &str) -> Option<&'static TraitCategory> {
    CATALOG.iter().find(|c| c.name.eq_ignore_ascii_case(name.trim()))
}

/// Careers associated with a trait. Unknown traits map to nothing.
pub fn careers_for_trait(name: &str) -> &'static [&'static str] {
    match name {
        // Work style
        "Analytical" => &["Data Scientist", "Financial Analyst", "Research Scientist", "Cybersecurity Specialist"],
        "Creative" => &["UX/UI Designer", "Content Creator", "Graphic Designer", "Marketing Specialist"],
        "Detail-oriented" => &["Software Engineer", "Accountant", "Quality Assurance Specialist", "Project Manager"],
        "Independent" => &["Freelance Writer", "Consultant", "Researcher", "Entrepreneur"],
        "Leadership-oriented" => &["Project Manager", "Executive", "Department Head", "Business Owner"],
        "Supportive" => &["Nurse Practitioner", "Teacher", "Human Resources Specialist", "Customer Support Manager"],

        // Work environment
        "Fast-paced" => &["Digital Marketer", "Journalist", "Emergency Medical Technician", "Startup Employee"],
        "Structured" => &["Accountant", "Civil Engineer", "Legal Professional", "Operations Manager"],
        "Flexible" => &["Freelancer", "Remote Worker", "Content Creator", "Consultant"],
        "Competitive" => &["Sales Representative", "Investment Banker", "Management Consultant", "Business Development"],
        "Collaborative" => &["Team Manager", "Agile Coach", "Educational Administrator", "Non-profit Coordinator"],
        "Remote-friendly" => &["Software Developer", "Digital Marketer", "Virtual Assistant", "Online Teacher"],
        "Office-based" => &["Administrative Assistant", "Executive", "Corporate Lawyer", "Human Resources Manager"],

        // Communication style
        "Direct" => &["Sales Manager", "Executive", "Project Manager", "Emergency Services"],
        "Diplomatic" => &["Human Resources", "Mediator", "Public Relations", "Customer Success Manager"],
        "Expressive" => &["Marketing Manager", "Teacher", "Sales Representative", "Public Speaker"],
        "Reserved" => &["Data Analyst", "Researcher", "Accountant", "Software Developer"],
        "Written" => &["Content Writer", "Editor", "Technical Writer", "Legal Professional"],
        "Verbal" => &["Sales Representative", "Counselor", "Public Relations", "Teacher"],

        // Decision making
        "Data-driven" => &["Data Scientist", "Business Analyst", "Research Scientist", "Financial Analyst"],
        "Intuitive" => &["Entrepreneur", "Creative Director", "Executive", "Counselor"],
        "Consultative" => &["Management Consultant", "Counselor", "Team Leader", "Project Manager"],
        "Decisive" => &["Emergency Medical Professional", "Executive", "Military Officer", "Project Manager"],
        "Cautious" => &["Quality Assurance Specialist", "Risk Analyst", "Safety Officer", "Compliance Manager"],
        "Risk-taking" => &["Entrepreneur", "Venture Capitalist", "Startup Founder", "Investment Banker"],

        // Values
        "Work-life balance" => &["Government Employee", "Teacher", "Corporate Positions with flex time", "Remote Worker"],
        "Career advancement" => &["Management Consultant", "Corporate Executive", "Sales Representative", "Tech Industry Professional"],
        "Helping others" => &["Nurse Practitioner", "Social Worker", "Teacher", "Non-profit Employee"],
        "Innovation" => &["Research Scientist", "Product Manager", "Software Engineer", "Startup Employee"],
        "Stability" => &["Government Employee", "Accountant", "Healthcare Professional", "Engineer"],
        "Recognition" => &["Sales Representative", "Performer", "Public Relations", "Marketing"],
        "Autonomy" => &["Freelancer", "Consultant", "Research Scientist", "Entrepreneur"],

        _ => &[],
    }
}

/// Traits picked within one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitSelection {
    pub category: String,
    pub traits: Vec<String>,
}

impl TraitSelection {
    pub fn new(category: impl Into<String>, traits: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            category: category.into(),
            traits: traits.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerMatch {
    pub career: String,
    pub match_strength: usize,
    /// One `"Trait (Category)"` entry per contributing trait.
    pub reasons: Vec<String>,
}

/// Ranks careers by how many selected traits point at them.
///
/// Ties keep the order in which careers were first reached. At most
/// [`MAX_MATCHES`] results are returned.
pub fn match_careers(selections: &[TraitSelection]) -> Vec<CareerMatch> {
    let mut matches: Vec<CareerMatch> = Vec::new();
    let mut index: HashMap<&'static str, usize> = HashMap::new();

    for selection in selections {
        for name in &selection.traits {
            for &career in careers_for_trait(name) {
                let slot = *index.entry(career).or_insert_with(|| {
                    matches.push(CareerMatch {
                        career: career.to_string(),
                        match_strength: 0,
                        reasons: Vec::new(),
                    });
                    matches.len() - 1
                });
                let entry = &mut matches[slot];
                entry.match_strength += 1;
                entry.reasons.push(format!("{} ({})", name, selection.category));
            }
        }
    }

    // sort_by is stable
    matches.sort_by(|a, b| b.match_strength.cmp(&a.match_strength));
    matches.truncate(MAX_MATCHES);

    tracing::debug!(selected = selections.len(), matched = matches.len(), "assessment.match");
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order() {
        let names: Vec<&str> = trait_catalog().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["Work Style", "Work Environment", "Communication Style", "Decision Making", "Values"]
        );
        assert!(find_category("values").is_some());
    }

    #[test]
    fn test_every_catalog_trait_maps_to_careers() {
        for category in trait_catalog() {
            for name in category.traits {
                assert_eq!(careers_for_trait(name).len(), 4, "{name}");
            }
        }
    }

    #[test]
    fn test_collaborative_uses_environment_careers() {
        assert_eq!(careers_for_trait("Collaborative")[0], "Team Manager");
    }

    #[test]
    fn test_match_counts_and_reasons() {
        let matches = match_careers(&[
            TraitSelection::new("Work Style", ["Analytical"]),
            TraitSelection::new("Decision Making", ["Data-driven"]),
        ]);

        assert_eq!(matches[0].career, "Data Scientist");
        assert_eq!(matches[0].match_strength, 2);
        assert_eq!(matches[0].reasons, vec!["Analytical (Work Style)", "Data-driven (Decision Making)"]);
        assert_eq!(matches[1].career, "Financial Analyst");
        assert_eq!(matches[2].career, "Research Scientist");
        assert_eq!(matches[3].career, "Cybersecurity Specialist");
        assert_eq!(matches[3].match_strength, 1);
    }

    #[test]
    fn test_match_limit_and_unknown_traits() {
        let matches = match_careers(&[TraitSelection::new(
            "Values",
            ["Stability", "Autonomy", "Innovation", "Recognition", "Nonsense"],
        )]);
        assert_eq!(matches.len(), MAX_MATCHES);
        assert!(match_careers(&[]).is_empty());
    }
}
