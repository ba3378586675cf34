/// Score handed to every result when no industry narrows the search.
pub const NEUTRAL_RELEVANCE: u8 = 5;
pub const MAX_RELEVANCE: u8 = 10;
const KEYWORD_HIT_POINTS: u8 = 2;

pub const MATCH_ALL_TAG: &str = "all";
pub const DEFAULT_INDUSTRY_TAG: &str = "general";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Industry {
    Technology,
    Healthcare,
    Finance,
    Education,
    Manufacturing,
    Retail,
    RealEstate,
    Energy,
    Recruitment,
}

impl Industry {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "technology" => Some(Industry::Technology),
            "healthcare" => Some(Industry::Healthcare),
            "finance" => Some(Industry::Finance),
            "education" => Some(Industry::Education),
            "manufacturing" => Some(Industry::Manufacturing),
            "retail" => Some(Industry::Retail),
            "real_estate" => Some(Industry::RealEstate),
            "energy" => Some(Industry::Energy),
            "recruitment" => Some(Industry::Recruitment),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Industry::Technology => "technology",
            Industry::Healthcare => "healthcare",
            Industry::Finance => "finance",
            Industry::Education => "education",
            Industry::Manufacturing => "manufacturing",
            Industry::Retail => "retail",
            Industry::RealEstate => "real_estate",
            Industry::Energy => "energy",
            Industry::Recruitment => "recruitment",
        }
    }

    /// Job titles typical for the industry, most representative first.
    pub fn role_keywords(&self) -> &'static [&'static str] {
        match self {
            Industry::Technology => &[
                "Software Engineer",
                "Developer",
                "Data Scientist",
                "Product Manager",
                "CTO",
                "Software Architect",
                "DevOps Engineer",
                "Machine Learning Engineer",
                "Cloud Architect",
            ],
            Industry::Healthcare => &[
                "Doctor",
                "Physician",
                "Surgeon",
                "Medical Director",
                "Healthcare Manager",
                "Nurse Practitioner",
                "Pharmacist",
                "Hospital Administrator",
            ],
            Industry::Finance => &[
                "Financial Analyst",
                "Investment Banker",
                "Portfolio Manager",
                "CFO",
                "Accountant",
                "Financial Advisor",
                "Risk Manager",
            ],
            Industry::Education => &[
                "Professor",
                "Teacher",
                "Educator",
                "Academic Dean",
                "School Principal",
                "Curriculum Developer",
            ],
            Industry::Manufacturing => &[
                "Production Manager",
                "Operations Manager",
                "Quality Engineer",
                "Supply Chain Manager",
                "Plant Manager",
            ],
            Industry::Retail => &[
                "Store Manager",
                "Retail Manager",
                "Sales Manager",
                "Merchandising Manager",
                "E-commerce Manager",
            ],
            Industry::RealEstate => &[
                "Real Estate Agent",
                "Property Manager",
                "Real Estate Broker",
                "Real Estate Developer",
                "Leasing Agent",
            ],
            Industry::Energy => &[
                "Energy Engineer",
                "Renewable Energy Specialist",
                "Oil and Gas Engineer",
                "Sustainability Manager",
                "Power Systems Engineer",
            ],
            Industry::Recruitment => &[
                "Recruiter",
                "Talent Acquisition Specialist",
                "Technical Recruiter",
                "Executive Recruiter",
                "Headhunter",
                "Staffing Manager",
            ],
        }
    }

    /// Lowercase fragments searched for in a result's title and snippet.
    pub fn relevance_keywords(&self) -> &'static [&'static str] {
        match self {
            Industry::Technology => &[
                "software",
                "tech",
                "developer",
                "engineer",
                "data",
                "cloud",
                "ai",
                "machine learning",
            ],
            Industry::Healthcare => &[
                "health", "medical", "hospital", "doctor", "patient", "clinical", "pharma",
            ],
            Industry::Finance => &[
                "finance",
                "bank",
                "investment",
                "financial",
                "wealth",
                "accounting",
                "tax",
            ],
            Industry::Education => &[
                "education",
                "university",
                "school",
                "teacher",
                "professor",
                "academic",
            ],
            Industry::Manufacturing => &[
                "manufacturing",
                "production",
                "factory",
                "supply chain",
                "operations",
            ],
            Industry::Retail => &[
                "retail",
                "store",
                "sales",
                "merchandise",
                "e-commerce",
                "customer",
            ],
            Industry::RealEstate => &["real estate", "property", "realtor", "broker", "commercial"],
            Industry::Energy => &["energy", "renewable", "solar", "wind", "oil", "gas", "power"],
            Industry::Recruitment => &[
                "recruit", "talent", "staffing", "hiring", "headhunt", "sourcing",
            ],
        }
    }
}

/// How the requested industry tag narrows a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndustryFilter<'a> {
    All,
    Known(Industry),
    Unlisted(&'a str),
}

impl<'a> IndustryFilter<'a> {
    pub fn from_tag(tag: Option<&'a str>) -> Self {
        match tag.map(str::trim) {
            None | Some("") => IndustryFilter::All,
            Some(t) if t.eq_ignore_ascii_case(MATCH_ALL_TAG) => IndustryFilter::All,
            Some(t) => match Industry::from_tag(t) {
                Some(industry) => IndustryFilter::Known(industry),
                None => IndustryFilter::Unlisted(t),
            },
        }
    }

    pub fn role_keywords(&self) -> &'static [&'static str] {
        match self {
            IndustryFilter::Known(industry) => industry.role_keywords(),
            _ => &[],
        }
    }
}

pub fn relevance_score(filter: IndustryFilter, title: &str, snippet: &str) -> u8 {
    let keywords = match filter {
        IndustryFilter::All => return NEUTRAL_RELEVANCE,
        IndustryFilter::Known(industry) => industry.relevance_keywords(),
        IndustryFilter::Unlisted(_) => &[],
    };

    let text = format!("{} {}", title, snippet).to_lowercase();
    let hits = keywords.iter().filter(|k| text.contains(*k)).count();

    hits.saturating_mul(KEYWORD_HIT_POINTS as usize)
        .min(MAX_RELEVANCE as usize) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_all_and_missing_tags_are_neutral() {
        for tag in [None, Some("all"), Some("ALL"), Some("  ")] {
            let filter = IndustryFilter::from_tag(tag);
            assert_eq!(filter, IndustryFilter::All);
            assert_eq!(
                relevance_score(filter, "Cloud data engineer", "software tech"),
                NEUTRAL_RELEVANCE
            );
        }
    }

    #[test]
    fn keyword_hits_add_two_points_each() {
        let filter = IndustryFilter::from_tag(Some("healthcare"));
        assert_eq!(
            relevance_score(filter, "Jane Doe - Doctor | LinkedIn", "Works at a hospital"),
            4
        );
        assert_eq!(relevance_score(filter, "Jane Doe", "Plays the cello"), 0);
    }

    #[test]
    fn score_is_capped() {
        let filter = IndustryFilter::from_tag(Some("technology"));
        let score = relevance_score(
            filter,
            "Software developer and data engineer",
            "cloud tech, AI and machine learning",
        );
        assert_eq!(score, MAX_RELEVANCE);
    }

    #[test]
    fn unlisted_industry_scores_zero() {
        let filter = IndustryFilter::from_tag(Some("aerospace"));
        assert_eq!(filter, IndustryFilter::Unlisted("aerospace"));
        assert!(filter.role_keywords().is_empty());
        assert_eq!(relevance_score(filter, "Rocket engineer", "space"), 0);
    }

    #[test]
    fn tags_round_trip() {
        for industry in [
            Industry::Technology,
            Industry::Healthcare,
            Industry::Finance,
            Industry::Education,
            Industry::Manufacturing,
            Industry::Retail,
            Industry::RealEstate,
            Industry::Energy,
            Industry::Recruitment,
        ] {
            assert_eq!(Industry::from_tag(industry.tag()), Some(industry));
            assert!(industry.role_keywords().len() >= 3);
        }
    }
}
