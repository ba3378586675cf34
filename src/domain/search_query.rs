use itertools::Itertools;

use super::industry::IndustryFilter;

pub const PROFILE_SITE: &str = "linkedin.com/in";
const MAX_ROLE_TERMS: usize = 3;

/// What the caller asked for; copied onto every extracted profile.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub designation: String,
    pub location: String,
    pub industry: Option<String>,
}

impl SearchCriteria {
    pub fn industry_filter(&self) -> IndustryFilter<'_> {
        IndustryFilter::from_tag(self.industry.as_deref())
    }
}

pub fn build_search_query(criteria: &SearchCriteria) -> String {
    let base_query = format!(
        r#"site:{} "{}" "{}""#,
        PROFILE_SITE, criteria.designation, criteria.location
    );

    let role_terms = criteria
        .industry_filter()
        .role_keywords()
        .iter()
        .take(MAX_ROLE_TERMS)
        .map(|role| format!(r#""{}""#, role))
        .join(" OR ");

    match role_terms.is_empty() {
        true => base_query,
        false => format!("{} ({})", base_query, role_terms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(industry: Option<&str>) -> SearchCriteria {
        SearchCriteria {
            designation: "CEO".to_string(),
            location: "Austin".to_string(),
            industry: industry.map(str::to_string),
        }
    }

    #[test]
    fn plain_query_without_industry() {
        assert_eq!(
            build_search_query(&criteria(None)),
            r#"site:linkedin.com/in "CEO" "Austin""#
        );
        assert_eq!(
            build_search_query(&criteria(Some("all"))),
            r#"site:linkedin.com/in "CEO" "Austin""#
        );
    }

    #[test]
    fn industry_adds_three_role_terms() {
        assert_eq!(
            build_search_query(&criteria(Some("technology"))),
            r#"site:linkedin.com/in "CEO" "Austin" ("Software Engineer" OR "Developer" OR "Data Scientist")"#
        );
    }

    #[test]
    fn unlisted_industry_is_not_an_error() {
        assert_eq!(
            build_search_query(&criteria(Some("underwater basket weaving"))),
            r#"site:linkedin.com/in "CEO" "Austin""#
        );
    }
}
