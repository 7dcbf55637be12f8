use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE: i32 = 1;
pub const DEFAULT_PER_PAGE_NUM: i32 = 10;
pub const MAX_PER_PAGE_NUM: i32 = 100;

/// Page number and page size of a listing. Out-of-range values are reset to
/// the defaults instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Criteria {
    page: i32,
    per_page_num: i32,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page_num: DEFAULT_PER_PAGE_NUM,
        }
    }
}

impl Criteria {
    pub fn new(page: i32, per_page_num: i32) -> Self {
        let mut criteria = Self::default();
        criteria.set_page(page);
        criteria.set_per_page_num(per_page_num);
        criteria
    }

    pub fn set_page(&mut self, page: i32) {
        self.page = if page <= 0 { DEFAULT_PAGE } else { page };
    }

    pub fn set_per_page_num(&mut self, per_page_num: i32) {
        self.per_page_num = if per_page_num <= 0 || per_page_num > MAX_PER_PAGE_NUM {
            DEFAULT_PER_PAGE_NUM
        } else {
            per_page_num
        };
    }

    pub fn page(&self) -> i32 {
        self.page
    }

    pub fn per_page_num(&self) -> i32 {
        self.per_page_num
    }

    /// Row offset of the first item on the current page.
    pub fn page_start(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.per_page_num)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SearchType {
    /// product name
    N,
    /// publisher
    P,
    /// name or publisher
    NP,
}

impl SearchType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "N" => Some(SearchType::N),
            "P" => Some(SearchType::P),
            "NP" => Some(SearchType::NP),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::N => "N",
            SearchType::P => "P",
            SearchType::NP => "NP",
        }
    }
}

/// Raw listing parameters exactly as they arrive on the query string.
///
/// Every field is kept as text so malformed numbers fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CriteriaParams {
    pub page: Option<String>,
    #[serde(rename = "perPageNum")]
    pub per_page_num: Option<String>,
    #[serde(rename = "searchType")]
    pub search_type: Option<String>,
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    pub criteria: Criteria,
    pub search_type: Option<SearchType>,
    pub keyword: Option<String>,
}

impl SearchCriteria {
    pub fn new(criteria: Criteria, search_type: Option<SearchType>, keyword: Option<String>) -> Self {
        let keyword = keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Self {
            criteria,
            search_type,
            keyword,
        }
    }

    /// Search type and keyword, only when both are present.
    pub fn search(&self) -> Option<(SearchType, &str)> {
        match (self.search_type, self.keyword.as_deref()) {
            (Some(search_type), Some(keyword)) => Some((search_type, keyword)),
            _ => None,
        }
    }

    /// Query string that reproduces this listing, used when redirecting back
    /// to the product list.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer
            .append_pair("page", &self.criteria.page().to_string())
            .append_pair("perPageNum", &self.criteria.per_page_num().to_string());

        if let Some(search_type) = self.search_type {
            serializer.append_pair("searchType", search_type.as_str());
        }
        if let Some(keyword) = &self.keyword {
            serializer.append_pair("keyword", keyword);
        }

        serializer.finish()
    }
}

fn parse_number(raw: Option<&str>) -> i32 {
    raw.and_then(|v| v.trim().parse::<i32>().ok()).unwrap_or(0)
}

impl From<CriteriaParams> for SearchCriteria {
    fn from(params: CriteriaParams) -> Self {
        let criteria = Criteria::new(
            parse_number(params.page.as_deref()),
            parse_number(params.per_page_num.as_deref()),
        );
        let search_type = params.search_type.as_deref().and_then(SearchType::parse);

        SearchCriteria::new(criteria, search_type, params.keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_first_page_of_ten() {
        let cri = Criteria::default();
        assert_eq!(cri.page(), 1);
        assert_eq!(cri.per_page_num(), 10);
        assert_eq!(cri.page_start(), 0);
    }

    #[test]
    fn page_start_is_offset_of_first_row() {
        assert_eq!(Criteria::new(1, 10).page_start(), 0);
        assert_eq!(Criteria::new(2, 10).page_start(), 10);
        assert_eq!(Criteria::new(3, 25).page_start(), 50);
        assert_eq!(Criteria::new(5, 100).page_start(), 400);
        assert_eq!(Criteria::new(2, 1).page_start(), 1);
    }

    #[test]
    fn non_positive_page_resets_to_one() {
        assert_eq!(Criteria::new(0, 10).page(), 1);
        assert_eq!(Criteria::new(-7, 10).page(), 1);
    }

    #[test]
    fn out_of_range_page_size_resets_to_ten() {
        assert_eq!(Criteria::new(1, 0).per_page_num(), 10);
        assert_eq!(Criteria::new(1, -1).per_page_num(), 10);
        assert_eq!(Criteria::new(1, 101).per_page_num(), 10);
        assert_eq!(Criteria::new(1, 100).per_page_num(), 100);
        assert_eq!(Criteria::new(1, 1).per_page_num(), 1);
    }

    #[test]
    fn setters_clamp_after_construction() {
        let mut cri = Criteria::new(4, 20);
        cri.set_page(-1);
        cri.set_per_page_num(1000);
        assert_eq!(cri, Criteria::default());
    }

    #[test]
    fn garbage_params_fall_back_to_defaults() {
        let cri = SearchCriteria::from(CriteriaParams {
            page: Some("abc".into()),
            per_page_num: Some("".into()),
            search_type: Some("X".into()),
            keyword: Some("   ".into()),
        });

        assert_eq!(cri.criteria, Criteria::default());
        assert_eq!(cri.search_type, None);
        assert_eq!(cri.keyword, None);
        assert!(cri.search().is_none());
    }

    #[test]
    fn search_needs_both_type_and_keyword() {
        let only_type = SearchCriteria::new(Criteria::default(), Some(SearchType::N), None);
        assert!(only_type.search().is_none());

        let both = SearchCriteria::new(
            Criteria::default(),
            Some(SearchType::NP),
            Some(" rust ".into()),
        );
        assert_eq!(both.search(), Some((SearchType::NP, "rust")));
    }

    #[test]
    fn query_string_keeps_listing_state() {
        let cri = SearchCriteria::new(
            Criteria::new(3, 20),
            Some(SearchType::P),
            Some("O'Reilly & Sons".into()),
        );

        assert_eq!(
            cri.to_query_string(),
            "page=3&perPageNum=20&searchType=P&keyword=O%27Reilly+%26+Sons"
        );
    }
}
