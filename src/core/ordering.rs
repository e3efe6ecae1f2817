use crate::domain::model::{Article, SortDirection, SortKind, SortSpec};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;

/// 比較兩篇文章，等價於 `direction * (b.field - a.field)`
///
/// Descending 時較新（或票數較多）的排前面；沒有發佈時間的文章視為最舊。
pub fn compare(spec: SortSpec, a: &Article, b: &Article) -> Ordering {
    let descending = match spec.kind {
        SortKind::Time => b.published_at.cmp(&a.published_at),
        SortKind::Votes => b.votes.cmp(&a.votes),
    };

    match spec.direction {
        SortDirection::Descending => descending,
        SortDirection::Ascending => descending.reverse(),
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    All,
    Pattern(Regex),
    // 無法編譯成正規表達式時改用字面比對
    Literal(String),
}

/// 以不分大小寫的正規表達式比對標題
#[derive(Debug, Clone)]
pub struct ArticleFilter {
    text: String,
    matcher: Matcher,
}

impl ArticleFilter {
    pub fn new(text: &str) -> Self {
        let matcher = if text.is_empty() {
            Matcher::All
        } else {
            match RegexBuilder::new(text).case_insensitive(true).build() {
                Ok(re) => Matcher::Pattern(re),
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Filter '{}' is not a valid pattern ({}), matching literally",
                        text,
                        e
                    );
                    Matcher::Literal(text.to_lowercase())
                }
            }
        };

        Self {
            text: text.to_string(),
            matcher,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn matches(&self, article: &Article) -> bool {
        match &self.matcher {
            Matcher::All => true,
            Matcher::Pattern(re) => re.is_match(&article.title),
            Matcher::Literal(needle) => article.title.to_lowercase().contains(needle),
        }
    }
}

impl Default for ArticleFilter {
    fn default() -> Self {
        Self::new("")
    }
}

/// 先過濾再排序；排序是穩定的，同分時保留 API 回傳順序
pub fn order_articles(articles: &[Article], filter: &ArticleFilter, spec: SortSpec) -> Vec<Article> {
    let mut ordered: Vec<Article> = articles
        .iter()
        .filter(|a| filter.matches(a))
        .cloned()
        .collect();
    ordered.sort_by(|a, b| compare(spec, a, b));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn article(title: &str, day: u32, votes: i64) -> Article {
        Article::new(
            title,
            Some(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()),
            votes,
        )
    }

    fn titles(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.title.as_str()).collect()
    }

    fn sample() -> Vec<Article> {
        vec![
            article("Old but loved", 1, 50),
            article("Newest story", 20, 5),
            article("Middle of the road", 10, 1),
        ]
    }

    #[test]
    fn test_time_descending_puts_most_recent_first() {
        let spec = SortSpec {
            kind: SortKind::Time,
            direction: SortDirection::Descending,
        };
        let ordered = order_articles(&sample(), &ArticleFilter::default(), spec);
        assert_eq!(
            titles(&ordered),
            vec!["Newest story", "Middle of the road", "Old but loved"]
        );
    }

    #[test]
    fn test_votes_ascending_puts_lowest_first() {
        let spec = SortSpec {
            kind: SortKind::Votes,
            direction: SortDirection::from_sign(-1),
        };
        let ordered = order_articles(&sample(), &ArticleFilter::default(), spec);
        assert_eq!(
            titles(&ordered),
            vec!["Middle of the road", "Newest story", "Old but loved"]
        );
    }

    #[test]
    fn test_missing_publish_time_sorts_as_oldest() {
        let mut articles = sample();
        articles.push(Article::new("Undated", None, 0));

        let ordered = order_articles(&articles, &ArticleFilter::default(), SortSpec::default());
        assert_eq!(ordered.last().unwrap().title, "Undated");
    }

    #[test]
    fn test_ties_keep_original_order() {
        let articles = vec![article("a", 1, 3), article("b", 2, 3), article("c", 3, 3)];
        let spec = SortSpec {
            kind: SortKind::Votes,
            direction: SortDirection::Descending,
        };
        let ordered = order_articles(&articles, &ArticleFilter::default(), spec);
        assert_eq!(titles(&ordered), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let articles = vec![
            article("CATastrophic floods", 1, 0),
            article("Dog days", 2, 0),
            article("A cat and a hat", 3, 0),
        ];
        let ordered = order_articles(&articles, &ArticleFilter::new("cat"), SortSpec::default());
        assert_eq!(titles(&ordered), vec!["A cat and a hat", "CATastrophic floods"]);
    }

    #[test]
    fn test_filter_supports_patterns() {
        let filter = ArticleFilter::new("^dog|hat$");
        assert!(filter.matches(&article("Dog days", 1, 0)));
        assert!(filter.matches(&article("A cat and a hat", 1, 0)));
        assert!(!filter.matches(&article("Hot dog stand", 1, 0)));
    }

    #[test]
    fn test_invalid_pattern_matches_literally() {
        let filter = ArticleFilter::new("c++ (");
        assert_eq!(filter.text(), "c++ (");
        assert!(filter.matches(&article("Why C++ (still) matters", 1, 0)));
        assert!(!filter.matches(&article("Rust is fine", 1, 0)));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ArticleFilter::new("");
        assert!(sample().iter().all(|a| filter.matches(a)));
    }
}
