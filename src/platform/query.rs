//! Query string parsing and result URL building

use std::borrow::Cow;

/// Decoded `name=value` pairs of a query string, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parses `search` the way `URLSearchParams` does: a leading `?` is
    /// ignored, `+` means space, and malformed escapes are kept verbatim.
    #[must_use]
    pub fn parse(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        let pairs = search
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        Self { pairs }
    }

    /// First value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// First non-empty value for `name`.
    #[must_use]
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).unwrap_or(Cow::Borrowed(spaced.as_str())).into_owned()
}

/// Builds `page?name=value&...` with percent-encoded values.
#[must_use]
pub fn build_url(page: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .map(|(name, value)| format!("{}={}", urlencoding::encode(name), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    if query.is_empty() { page.to_string() } else { format!("{page}?{query}") }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn parse_reads_pairs_with_and_without_question_mark() {
        let with = QueryParams::parse("?id=a-b-c-d&lang=ja");
        let without = QueryParams::parse("id=a-b-c-d&lang=ja");

        assert_that!(with.get("id"), some(eq("a-b-c-d")));
        assert_that!(with.get("lang"), some(eq("ja")));
        assert_that!(with, eq(&without));
    }

    #[rstest]
    fn parse_decodes_percent_escapes_and_plus() {
        let params = QueryParams::parse("id=%E7%81%AB-b+c&x=%ZZ");

        assert_that!(params.get("id"), some(eq("火-b c")));
        assert_that!(params.get("x"), some(eq("%ZZ")));
    }

    #[rstest]
    fn get_returns_first_occurrence() {
        let params = QueryParams::parse("lang=ja&lang=en");

        assert_that!(params.get("lang"), some(eq("ja")));
    }

    #[rstest]
    #[case("", None)]
    #[case("?", None)]
    #[case("?lang", None)]
    #[case("?lang=", None)]
    #[case("?lang=fr", Some("fr"))]
    fn get_non_empty_skips_blank_values(#[case] search: &str, #[case] expected: Option<&str>) {
        assert_eq!(QueryParams::parse(search).get_non_empty("lang"), expected);
    }

    #[rstest]
    fn build_url_encodes_values() {
        let url = build_url("result.html", &[("id", "a-b-c-d"), ("lang", "ja")]);
        let spaced = build_url("result.html", &[("id", "a b&c")]);

        assert_that!(url, eq("result.html?id=a-b-c-d&lang=ja"));
        assert_that!(spaced, eq("result.html?id=a%20b%26c"));
    }

    #[rstest]
    fn build_url_without_params_is_page() {
        assert_that!(build_url("result.html", &[]), eq("result.html"));
    }
}
