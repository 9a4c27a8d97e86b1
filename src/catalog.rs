use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, Select,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};

use crate::{
    entities::movie,
    models::{PAGE_SIZE, Page, SortOrder},
};

/// The list projection as read from the store, before budget formatting.
#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct MovieSummaryRow {
    pub imdb_id: String,
    pub title: String,
    pub genres: Option<String>,
    pub release_date: Option<String>,
    pub budget: Option<f64>,
}

/// A full movie row as read from the store. Numeric columns are read
/// through `REAL` casts, so either storage class decodes.
#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct MovieRow {
    pub movie_id: i64,
    pub imdb_id: String,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub budget: Option<f64>,
    pub runtime: Option<f64>,
    pub language: Option<String>,
    pub genres: Option<String>,
    pub production_companies: Option<String>,
    pub status: Option<String>,
}

/// Read-only client for the movie catalog database.
#[derive(Clone)]
pub struct CatalogStore {
    db: DatabaseConnection,
}

impl CatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[cfg(test)]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// One page of movies in storage order.
    pub async fn list(&self, page: Page) -> Result<Vec<MovieSummaryRow>, DbErr> {
        paged(summaries(), page).into_model::<MovieSummaryRow>().all(&self.db).await
    }

    pub async fn find_by_id(&self, movie_id: i64) -> Result<Option<MovieRow>, DbErr> {
        movie::Entity::find()
            .select_only()
            .column_as(movie::Column::MovieId, "movie_id")
            .column_as(movie::Column::ImdbId, "imdb_id")
            .column_as(movie::Column::Title, "title")
            .column_as(movie::Column::Overview, "overview")
            .column_as(movie::Column::ReleaseDate, "release_date")
            .column_as(as_real(movie::Column::Budget), "budget")
            .column_as(as_real(movie::Column::Runtime), "runtime")
            .column_as(movie::Column::Language, "language")
            .column_as(movie::Column::Genres, "genres")
            .column_as(movie::Column::ProductionCompanies, "production_companies")
            .column_as(movie::Column::Status, "status")
            .filter(movie::Column::MovieId.eq(movie_id))
            .into_model::<MovieRow>()
            .one(&self.db)
            .await
    }

    /// Movies released within calendar `year` (inclusive on both ends),
    /// ordered by release date.
    pub async fn by_year(
        &self,
        year: &str,
        page: Page,
        order: SortOrder,
    ) -> Result<Vec<MovieSummaryRow>, DbErr> {
        let (first_day, last_day) = (format!("{year}-01-01"), format!("{year}-12-31"));
        let query = summaries()
            .filter(movie::Column::ReleaseDate.between(first_day, last_day))
            .order_by(movie::Column::ReleaseDate, order.into());

        paged(query, page).into_model::<MovieSummaryRow>().all(&self.db).await
    }

    /// Movies whose genre list contains `genre`, ignoring case.
    ///
    /// `%` and `_` in `genre` keep their `LIKE` meaning.
    pub async fn by_genre(&self, genre: &str, page: Page) -> Result<Vec<MovieSummaryRow>, DbErr> {
        let pattern = format!("%{}%", genre.to_lowercase());
        let genres = Expr::expr(Func::lower(Expr::col(movie::Column::Genres)));
        let query = summaries().filter(genres.like(pattern));

        paged(query, page).into_model::<MovieSummaryRow>().all(&self.db).await
    }
}

fn summaries() -> Select<movie::Entity> {
    movie::Entity::find()
        .select_only()
        .column_as(movie::Column::ImdbId, "imdb_id")
        .column_as(movie::Column::Title, "title")
        .column_as(movie::Column::Genres, "genres")
        .column_as(movie::Column::ReleaseDate, "release_date")
        .column_as(as_real(movie::Column::Budget), "budget")
}

// sqlx checks the declared storage class on decode; datasets keep money and
// durations as INTEGER or REAL interchangeably.
fn as_real(column: movie::Column) -> SimpleExpr {
    Expr::col(column).cast_as(Alias::new("REAL"))
}

fn paged(query: Select<movie::Entity>, page: Page) -> Select<movie::Entity> {
    query.limit(PAGE_SIZE).offset(page.offset())
}
