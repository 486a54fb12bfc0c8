//! Search query construction.

/// Build the ordered list of query strings for a movie, most specific
/// first.
///
/// 1. `"{title} {year}"` when the year is known.
/// 2. A cleaned variant (colons and hyphens replaced by spaces,
///    whitespace collapsed) with year, only if it differs.
/// 3. For titles starting with "The ", the stripped title with year.
/// 4. The bare title, as fallback, when fewer than 3 queries exist.
pub fn build_search_queries(title: &str, year: Option<i32>) -> Vec<String> {
    let base_title = title.trim();
    let mut queries = Vec::new();

    if let Some(year) = year {
        queries.push(format!("{} {}", base_title, year));
    }

    let clean_title = collapse_spaces(&base_title.replace([':', '-'], " "));
    if clean_title != base_title {
        if let Some(year) = year {
            queries.push(format!("{} {}", clean_title, year));
        }
    }

    if base_title.to_uppercase().starts_with("THE ") {
        let without_the = base_title[4..].trim();
        if let Some(year) = year {
            queries.push(format!("{} {}", without_the, year));
        }
    }

    if queries.len() < 3 {
        queries.push(base_title.to_string());
    }

    queries
}

fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
