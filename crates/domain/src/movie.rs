use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::fmt::Write as _;

/// Normalized subset of a movie as returned by any provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub plot: String,
}

impl MovieRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year: None,
            poster_url: String::new(),
            rating: None,
            genres: Vec::new(),
            plot: String::new(),
        }
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_poster(mut self, raw: &str) -> Self {
        self.poster_url = Self::sanitize_poster(raw);
        self
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_plot(mut self, plot: impl Into<String>) -> Self {
        self.plot = plot.into();
        self
    }

    /// Clean an upstream poster string.
    ///
    /// Upstream data is known to carry posters with embedded line breaks, so all
    /// whitespace is removed. "N/A" and anything that is not an http(s) URL
    /// become empty.
    pub fn sanitize_poster(raw: &str) -> String {
        let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("n/a") {
            return String::new();
        }
        let lower = cleaned.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            cleaned
        } else {
            String::new()
        }
    }

    /// Parse a year out of strings like "1999", "2010–2014" or "2019-05-30".
    pub fn parse_year(raw: &str) -> Option<u16> {
        let digits: String = raw.trim().chars().take(4).collect();
        if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
            digits.parse().ok()
        } else {
            None
        }
    }

    pub fn has_poster(&self) -> bool {
        !self.poster_url.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Title,
    Year,
    Rating,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "title" => Some(Self::Title),
            "year" => Some(Self::Year),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Year => "year",
            Self::Rating => "rating",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" => Self::Descending,
            _ => Self::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Optional narrowing applied on top of a free-text search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub min_rating: Option<f32>,
    #[serde(default)]
    pub sort: Option<SortKey>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.genre.is_none() && self.year.is_none() && self.min_rating.is_none() && self.sort.is_none()
    }

    /// Filter then sort provider output. Records missing a field that a filter
    /// constrains are dropped; records missing the sort field go last.
    pub fn apply(&self, items: Vec<MovieRecord>) -> Vec<MovieRecord> {
        let genre = self
            .genre
            .as_deref()
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty());

        let mut filtered: Vec<MovieRecord> = items
            .into_iter()
            .filter(|m| match &genre {
                Some(g) => m.genres.iter().any(|mg| mg.to_lowercase().contains(g.as_str())),
                None => true,
            })
            .filter(|m| match self.year {
                Some(y) => m.year == Some(y),
                None => true,
            })
            .filter(|m| match self.min_rating {
                Some(min) => m.rating.is_some_and(|r| r >= min),
                None => true,
            })
            .collect();

        if let Some(key) = self.sort {
            let direction = self.direction;
            filtered.sort_by(|a, b| compare_by(key, direction, a, b));
        }

        filtered
    }

    fn canonical(&self) -> String {
        let mut out = String::new();
        if let Some(g) = &self.genre {
            let _ = write!(out, "genre={};", g.trim().to_lowercase());
        }
        if let Some(y) = self.year {
            let _ = write!(out, "year={};", y);
        }
        if let Some(r) = self.min_rating {
            let _ = write!(out, "min_rating={:.1};", r);
        }
        if let Some(s) = self.sort {
            let _ = write!(out, "sort={}:{};", s.as_str(), self.direction.as_str());
        }
        out
    }
}

fn compare_by(key: SortKey, direction: SortDirection, a: &MovieRecord, b: &MovieRecord) -> Ordering {
    let ordered = |ord: Ordering| match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    };

    match key {
        SortKey::Title => ordered(a.title.to_lowercase().cmp(&b.title.to_lowercase())),
        SortKey::Year => match (a.year, b.year) {
            (Some(x), Some(y)) => ordered(x.cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::Rating => match (a.rating, b.rating) {
            (Some(x), Some(y)) => ordered(x.partial_cmp(&y).unwrap_or(Ordering::Equal)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Free-text query plus filters, as received from the search entrypoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    #[serde(default)]
    pub filters: SearchFilters,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filters: SearchFilters::default(),
        }
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Trimmed, lowercased, whitespace-collapsed query text.
    pub fn normalized_text(&self) -> String {
        self.text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Stable cache key derived from the normalized text and filters.
    ///
    /// Queries differing only in case or spacing share a key.
    pub fn cache_key(&self) -> String {
        let canonical = format!("q={};{}", self.normalized_text(), self.filters.canonical());
        format!("search:{}", sha256_hex(canonical.as_bytes()))
    }
}

pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        let _ = write!(out, "{:02x}", b);
    }
    out
}
