use std::fmt::Display;

use feedmix::RowRange;
use itertools::Itertools;
use url::Url;

/// Filters and modifiers of one table request, in PostgREST query syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: &'static str,
    params: Vec<(String, String)>,
}

impl Query {
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            params: Vec::new(),
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.table
    }

    pub fn select(self, columns: &str) -> Self {
        self.param("select", columns)
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("eq.{value}"))
    }

    pub fn neq(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("neq.{value}"))
    }

    /// Case-insensitive substring match.
    pub fn ilike(self, column: &str, term: &str) -> Self {
        self.param(column, format!("ilike.*{}*", escape_like(term)))
    }

    pub fn is_in(self, column: &str, values: &[i64]) -> Self {
        self.param(column, format!("in.({})", values.iter().join(",")))
    }

    pub fn order(self, column: &str, descending: bool) -> Self {
        let direction = if descending { "desc" } else { "asc" };
        self.param("order", format!("{column}.{direction}"))
    }

    pub fn limit(self, limit: usize) -> Self {
        self.param("limit", limit.to_string())
    }

    pub fn range(self, range: RowRange) -> Self {
        self.param("offset", range.offset().to_string())
            .limit(range.limit())
    }

    fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    pub fn apply(&self, url: &mut Url) {
        if self.params.is_empty() {
            return;
        }
        url.query_pairs_mut().extend_pairs(&self.params);
    }
}

// `*` is the PostgREST wildcard and has no escape; LIKE metacharacters are
// escaped so the term only ever matches literally.
fn escape_like(term: &str) -> String {
    term.trim()
        .chars()
        .filter(|c| *c != '*')
        .fold(String::new(), |mut out, c| {
            if matches!(c, '%' | '_' | '\\') {
                out.push('\\');
            }
            out.push(c);
            out
        })
}

/// Total row count from a `Content-Range` header such as `0-5/13` or `*/0`.
pub fn parse_content_range(header: &str) -> Option<usize> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rendered(query: &Query) -> String {
        let mut url = Url::parse("http://store.test/rest/v1/posts").unwrap();
        query.apply(&mut url);
        url.query().unwrap_or_default().to_string()
    }

    #[test]
    fn test_listing_query() {
        let q = Query::table("posts")
            .select("*")
            .eq("status", "published")
            .ilike("title", "rust")
            .order("created_at", true)
            .range(RowRange { start: 6, end: 11 });
        assert_eq!(
            rendered(&q),
            "select=*&status=eq.published&title=ilike.*rust*&order=created_at.desc&offset=6&limit=6"
        );
    }

    #[test]
    fn test_in_filter() {
        let q = Query::table("advertisements").is_in("id", &[1, 2, 5]);
        assert_eq!(rendered(&q), "id=in.%281%2C2%2C5%29");
    }

    #[test]
    fn test_no_params_leaves_url_untouched() {
        let mut url = Url::parse("http://store.test/rest/v1/posts").unwrap();
        Query::table("posts").apply(&mut url);
        assert_eq!(url.as_str(), "http://store.test/rest/v1/posts");
    }

    #[rstest]
    #[case("rust", "rust")]
    #[case("  rust ", "rust")]
    #[case("100%", "100\\%")]
    #[case("snake_case", "snake\\_case")]
    #[case("a*b", "ab")]
    fn test_escape_like(#[case] term: &str, #[case] escaped: &str) {
        assert_eq!(escape_like(term), escaped);
    }

    #[rstest]
    #[case("0-5/13", Some(13))]
    #[case("*/0", Some(0))]
    #[case("*/13", Some(13))]
    #[case("12-17/*", None)]
    #[case("garbage", None)]
    fn test_parse_content_range(#[case] header: &str, #[case] total: Option<usize>) {
        assert_eq!(parse_content_range(header), total);
    }
}
