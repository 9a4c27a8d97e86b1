use serde::{Deserialize, Serialize, Serializer};

use crate::{
    catalog::{MovieRow, MovieSummaryRow},
    validation::{format_budget, parse_leading_int},
};

/// Rows per page. Not client-configurable.
pub const PAGE_SIZE: u64 = 50;

/// One-based page number, always at least 1.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Page(u64);

impl Page {
    pub fn new(number: u64) -> Self {
        Self(number.max(1))
    }

    /// Reads the `page` query value. Missing, unparseable, zero and
    /// negative values all mean the first page.
    pub fn from_query(raw: Option<&str>) -> Self {
        let number = raw.and_then(parse_leading_int).unwrap_or(1);
        Self::new(u64::try_from(number).unwrap_or(1))
    }

    pub fn number(self) -> u64 {
        self.0
    }

    /// Row offset, capped to what SQLite accepts as a signed 64-bit value.
    pub fn offset(self) -> u64 {
        (self.0 - 1).saturating_mul(PAGE_SIZE).min(i64::MAX as u64)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Only the exact value `desc` sorts descending.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

impl From<SortOrder> for sea_orm::Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => sea_orm::Order::Asc,
            SortOrder::Desc => sea_orm::Order::Desc,
        }
    }
}

/// Query string pairs in request order.
///
/// Never rejects: a key given more than once reads as its values joined
/// with `,`, so `page=2&page=3` is page 2 and `sort=desc&sort=asc` is not
/// `desc`.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<String> {
        let values: Vec<&str> =
            self.0.iter().filter(|(k, _)| k == key).map(|(_, v)| v.as_str()).collect();
        (!values.is_empty()).then(|| values.join(","))
    }

    pub fn page(&self) -> Page {
        Page::from_query(self.get("page").as_deref())
    }

    pub fn sort(&self) -> SortOrder {
        SortOrder::from_query(self.get("sort").as_deref())
    }
}

/// List projection shared by the list, year and genre endpoints.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub imdb_id: String,
    pub title: String,
    pub genres: Option<String>,
    pub release_date: Option<String>,
    pub budget: String,
}

impl From<MovieSummaryRow> for MovieSummary {
    fn from(row: MovieSummaryRow) -> Self {
        Self {
            imdb_id: row.imdb_id,
            title: row.title,
            genres: row.genres,
            release_date: row.release_date,
            budget: format_budget(row.budget),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    pub movie_id: i64,
    pub imdb_id: String,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub budget: String,
    #[serde(serialize_with = "whole_when_integral")]
    pub runtime: Option<f64>,
    pub language: Option<String>,
    pub genres: Option<String>,
    pub production_companies: Option<String>,
    pub status: Option<String>,
    /// Mean rating to two decimals; serialized as `null` when unrated.
    pub rating: Option<f64>,
}

impl MovieDetails {
    pub fn new(movie: MovieRow, rating: Option<f64>) -> Self {
        Self {
            movie_id: movie.movie_id,
            imdb_id: movie.imdb_id,
            title: movie.title,
            overview: movie.overview,
            release_date: movie.release_date,
            budget: format_budget(movie.budget),
            runtime: movie.runtime,
            language: movie.language,
            genres: movie.genres,
            production_companies: movie.production_companies,
            status: movie.status,
            rating,
        }
    }
}

// Runtimes are read as REAL; integral values go back out as JSON integers.
fn whole_when_integral<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 9e15 => serializer.serialize_some(&(*v as i64)),
        _ => value.serialize(serializer),
    }
}
