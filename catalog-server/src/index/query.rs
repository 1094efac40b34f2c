//! Typed ranking query builder
//!
//! Pure translation from [`SearchParams`] to a [`SearchRequest`]: tagged
//! clauses instead of a stringly query body, so ranking logic stays testable
//! independent of any engine's native query language.
//!
//! Scoring model: the text clause contributes the weighted sum of matched
//! field weights (0 without a text clause), and the popularity boosts
//! `0.3 * ln(1 + buys)` and `0.1 * ln(1 + views)` are **added** on top.
//! With an empty query the base score is constant, so relevance ordering
//! degenerates to popularity ordering.

use shared::{SearchParams, SortBy};

/// Default window size when the caller sends a non-positive page size
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Field weights for the multi-field text match
pub const TEXT_FIELDS: [(TextField, f64); 4] = [
    (TextField::Name, 3.0),
    (TextField::Description, 2.0),
    (TextField::Category, 1.0),
    (TextField::Tags, 1.0),
];

/// Log1p boost factors (buys weigh conversions, views weigh interest)
pub const BUYS_BOOST_FACTOR: f64 = 0.3;
pub const VIEWS_BOOST_FACTOR: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Description,
    Category,
    Tags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Category,
    Brand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostField {
    Views,
    Buys,
}

/// A required (AND) clause of the overall query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryClause {
    /// Case-insensitive multi-field best-effort match: a document must match
    /// at least one field; its base score is the sum of matched field weights
    TextMatch {
        query: String,
        fields: Vec<(TextField, f64)>,
    },
    /// Exact-match membership, OR across the provided values
    TermsFilter {
        field: FilterField,
        values: Vec<String>,
    },
}

/// Additive popularity boost: `factor * ln(1 + field)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBoost {
    pub field: BoostField,
    pub factor: f64,
}

/// Sort directive, always descending on the primary key
///
/// `Composite` carries the deterministic tie chain (views desc, buys desc,
/// id asc) required for stable pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortSpec {
    /// Composite score desc, then views desc, buys desc, id asc
    Composite,
    /// Pure view counter desc, id asc tiebreak
    Views,
    /// Pure buy counter desc, id asc tiebreak
    Buys,
}

/// Ranked query request: clauses ANDed together, boosts added to base score
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub clauses: Vec<QueryClause>,
    pub boosts: Vec<ScoreBoost>,
    pub sort: SortSpec,
    /// Result window offset, never negative
    pub from: usize,
    /// Result window size
    pub size: usize,
}

/// Build the ranked query for the given search parameters
pub fn build_request(params: &SearchParams) -> SearchRequest {
    let mut clauses = Vec::new();

    let query = params.query.trim().to_lowercase();
    if !query.is_empty() {
        clauses.push(QueryClause::TextMatch {
            query,
            fields: TEXT_FIELDS.to_vec(),
        });
    }

    if !params.categories.is_empty() {
        clauses.push(QueryClause::TermsFilter {
            field: FilterField::Category,
            values: params.categories.iter().map(|v| v.trim().to_string()).collect(),
        });
    }

    if !params.brands.is_empty() {
        clauses.push(QueryClause::TermsFilter {
            field: FilterField::Brand,
            values: params.brands.iter().map(|v| v.trim().to_string()).collect(),
        });
    }

    let boosts = vec![
        ScoreBoost {
            field: BoostField::Buys,
            factor: BUYS_BOOST_FACTOR,
        },
        ScoreBoost {
            field: BoostField::Views,
            factor: VIEWS_BOOST_FACTOR,
        },
    ];

    let sort = match params.sort_by {
        SortBy::Relevance => SortSpec::Composite,
        SortBy::Views => SortSpec::Views,
        SortBy::Buys => SortSpec::Buys,
    };

    let page = params.page.max(1);
    let size = if params.page_size < 1 {
        DEFAULT_PAGE_SIZE
    } else {
        params.page_size
    };
    // page and size are caller-controlled; an absurd page must saturate to an
    // empty window, not overflow the multiply
    let from = (page - 1).saturating_mul(size);

    SearchRequest {
        clauses,
        boosts,
        sort,
        from: usize::try_from(from).unwrap_or(usize::MAX),
        size: size as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SearchParams {
        SearchParams {
            query: String::new(),
            categories: vec![],
            brands: vec![],
            sort_by: SortBy::Relevance,
            page: 1,
            page_size: 10,
        }
    }

    #[test]
    fn empty_query_builds_no_text_clause() {
        let request = build_request(&params());
        assert!(request.clauses.is_empty());
        assert_eq!(request.sort, SortSpec::Composite);
        // Boosts are always present, even for browse traffic
        assert_eq!(request.boosts.len(), 2);
    }

    #[test]
    fn text_clause_is_lowercased_with_weighted_fields() {
        let mut p = params();
        p.query = "  Trail SHOE ".into();
        let request = build_request(&p);

        assert_eq!(
            request.clauses,
            vec![QueryClause::TextMatch {
                query: "trail shoe".into(),
                fields: TEXT_FIELDS.to_vec(),
            }]
        );
    }

    #[test]
    fn filters_become_required_terms_clauses() {
        let mut p = params();
        p.query = "shoe".into();
        p.categories = vec!["Clothing".into(), "Sports".into()];
        p.brands = vec!["Acme".into()];
        let request = build_request(&p);

        assert_eq!(request.clauses.len(), 3);
        assert!(request.clauses.contains(&QueryClause::TermsFilter {
            field: FilterField::Category,
            values: vec!["Clothing".into(), "Sports".into()],
        }));
        assert!(request.clauses.contains(&QueryClause::TermsFilter {
            field: FilterField::Brand,
            values: vec!["Acme".into()],
        }));
    }

    #[test]
    fn counter_sort_modes_override_composite() {
        let mut p = params();
        p.sort_by = SortBy::Views;
        assert_eq!(build_request(&p).sort, SortSpec::Views);
        p.sort_by = SortBy::Buys;
        assert_eq!(build_request(&p).sort, SortSpec::Buys);
    }

    #[test]
    fn page_below_one_clamps_to_first_window() {
        let mut p = params();
        p.page = 0;
        let request = build_request(&p);
        assert_eq!(request.from, 0);
        assert_eq!(request.size, 10);

        p.page = -3;
        assert_eq!(build_request(&p).from, 0);
    }

    #[test]
    fn non_positive_page_size_falls_back_to_default() {
        let mut p = params();
        p.page_size = -5;
        let request = build_request(&p);
        assert_eq!(request.size, DEFAULT_PAGE_SIZE as usize);

        p.page_size = 0;
        assert_eq!(build_request(&p).size, DEFAULT_PAGE_SIZE as usize);
    }

    #[test]
    fn offset_is_page_minus_one_times_size() {
        let mut p = params();
        p.page = 3;
        p.page_size = 20;
        let request = build_request(&p);
        assert_eq!(request.from, 40);
        assert_eq!(request.size, 20);
    }

    #[test]
    fn absurd_page_saturates_instead_of_overflowing() {
        let mut p = params();
        p.page = i64::MAX;
        p.page_size = 10;
        let request = build_request(&p);
        assert_eq!(request.from, i64::MAX as usize);
        assert_eq!(request.size, 10);

        p.page = i64::MAX;
        p.page_size = i64::MAX;
        assert_eq!(build_request(&p).from, i64::MAX as usize);
    }
}
