//! Preference profile of a user, built from their favorite movies

use crate::models::FavoriteMovie;

/// Favorites a user needs before recommendations are considered meaningful
pub const MIN_FAVORITES_FOR_RECOMMENDATIONS: usize = 4;

/// Fallback text when a user has no genre counts to show
pub const NO_FAVORITE_GENRES: &str = "No favorite genres available.";

/// Occurrence counts of normalized terms, kept in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermCounts {
    entries: Vec<(String, usize)>,
}

impl TermCounts {
    /// Adds every term of a comma separated list.
    ///
    /// Terms are trimmed and lowercased; empty terms are skipped.
    pub fn add_list(&mut self, list: &str) {
        for term in list.split(',') {
            let term = term.trim().to_lowercase();
            if term.is_empty() {
                continue;
            }
            match self.entries.iter_mut().find(|(t, _)| *t == term) {
                Some((_, count)) => *count += 1,
                None => self.entries.push((term, 1)),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, term: &str) -> usize {
        self.entries
            .iter()
            .find(|(t, _)| t == term)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// Terms by descending count; equal counts keep first-seen order
    pub fn ranked(&self) -> Vec<(String, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The `n` most frequent terms
    pub fn top(&self, n: usize) -> Vec<String> {
        self.ranked().into_iter().take(n).map(|(t, _)| t).collect()
    }

    /// Renders `term (count)` pairs in first-seen order, joined by ", "
    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .map(|(term, count)| format!("{} ({})", term, count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Genre, tag and keyword counts across a user's favorites
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceProfile {
    pub genres: TermCounts,
    pub tags: TermCounts,
    pub keywords: TermCounts,
    pub favorite_ids: Vec<i32>,
}

impl PreferenceProfile {
    pub fn from_favorites(favorites: &[FavoriteMovie]) -> Self {
        let mut profile = Self::default();
        for movie in favorites {
            profile.genres.add_list(&movie.genres);
            profile.tags.add_list(&movie.tags);
            profile.keywords.add_list(&movie.keywords);
            profile.favorite_ids.push(movie.id);
        }
        profile
    }

    /// The two genres recommendations are based on
    pub fn top_genres(&self) -> Vec<String> {
        self.genres.top(2)
    }

    pub fn all_genres(&self) -> String {
        if self.genres.is_empty() {
            NO_FAVORITE_GENRES.to_string()
        } else {
            self.genres.summary()
        }
    }
}

/// Message shown next to the favorites list on the preferences page
pub fn favorites_message(favorite_count: usize) -> String {
    match favorite_count {
        0 => format!(
            "You have no favorite movies. Please add at least {} favorite movies to get recommendations.",
            MIN_FAVORITES_FOR_RECOMMENDATIONS
        ),
        n if n < MIN_FAVORITES_FOR_RECOMMENDATIONS => format!(
            "You need at least {} favorite movies to get recommendations. You have {}.",
            MIN_FAVORITES_FOR_RECOMMENDATIONS, n
        ),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn favorite(id: i32, genres: &str, tags: &str) -> FavoriteMovie {
        FavoriteMovie {
            id,
            title: format!("Movie {}", id),
            genres: genres.to_string(),
            tags: tags.to_string(),
            keywords: "Quest".to_string(),
            description: "A film".to_string(),
            release_date: NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_terms_are_normalized_and_counted() {
        let mut counts = TermCounts::default();
        counts.add_list(" Action, drama ,, ACTION");
        assert_eq!(counts.count("action"), 2);
        assert_eq!(counts.count("drama"), 1);
        assert_eq!(counts.count(""), 0);
    }

    #[test]
    fn test_ranking_is_stable_for_ties() {
        let mut counts = TermCounts::default();
        counts.add_list("Comedy, Horror, Drama");
        counts.add_list("Drama, Horror");
        assert_eq!(counts.top(2), vec!["horror", "drama"]);
        assert_eq!(counts.top(5), vec!["horror", "drama", "comedy"]);
    }

    #[test]
    fn test_summary_keeps_first_seen_order() {
        let profile = PreferenceProfile::from_favorites(&[
            favorite(1, "Comedy, Drama", "Lighthearted"),
            favorite(2, "Drama", "Dark"),
        ]);
        assert_eq!(profile.all_genres(), "comedy (1), drama (2)");
        assert_eq!(profile.top_genres(), vec!["drama", "comedy"]);
        assert_eq!(profile.favorite_ids, vec![1, 2]);
        assert_eq!(profile.tags.count("dark"), 1);
        assert_eq!(profile.keywords.count("quest"), 2);
    }

    #[test]
    fn test_empty_genres_fallback() {
        let profile = PreferenceProfile::from_favorites(&[favorite(1, "", "")]);
        assert!(profile.genres.is_empty());
        assert!(profile.top_genres().is_empty());
        assert_eq!(profile.all_genres(), NO_FAVORITE_GENRES);
    }

    #[test]
    fn test_favorites_message() {
        assert_eq!(
            favorites_message(0),
            "You have no favorite movies. Please add at least 4 favorite movies to get recommendations."
        );
        assert_eq!(
            favorites_message(3),
            "You need at least 4 favorite movies to get recommendations. You have 3."
        );
        assert_eq!(favorites_message(4), "");
    }
}
