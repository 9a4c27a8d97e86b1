//! In-memory store fixtures for tests.
//!
//! Each call opens fresh `sqlite::memory:` databases and creates the schema
//! from the entity definitions, so tests never share rows.

use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, Schema,
};

use crate::{
    catalog::CatalogStore,
    entities::{movie, rating},
    ratings::RatingsStore,
};

pub async fn setup_stores() -> Result<(CatalogStore, RatingsStore), DbErr> {
    let movies = Database::connect("sqlite::memory:").await?;
    create_table(&movies, movie::Entity).await?;

    let ratings = Database::connect("sqlite::memory:").await?;
    create_table(&ratings, rating::Entity).await?;

    Ok((CatalogStore::new(movies), RatingsStore::new(ratings)))
}

/// Stores whose databases have no tables, so every query fails.
pub async fn broken_stores() -> Result<(CatalogStore, RatingsStore), DbErr> {
    let movies = Database::connect("sqlite::memory:").await?;
    let ratings = Database::connect("sqlite::memory:").await?;
    Ok((CatalogStore::new(movies), RatingsStore::new(ratings)))
}

/// A catalog whose `movies` table declares `budget INTEGER` and
/// `runtime REAL`, the reverse of the entity's column types.
pub async fn loosely_typed_catalog() -> Result<CatalogStore, DbErr> {
    let movies = Database::connect("sqlite::memory:").await?;
    movies
        .execute_unprepared(
            "CREATE TABLE movies (
                movieId INTEGER PRIMARY KEY,
                imdbId TEXT NOT NULL,
                title TEXT NOT NULL,
                overview TEXT,
                releaseDate TEXT,
                budget INTEGER,
                runtime REAL,
                language TEXT,
                genres TEXT,
                productionCompanies TEXT,
                status TEXT
            )",
        )
        .await?;
    Ok(CatalogStore::new(movies))
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(entity))).await?;
    Ok(())
}

/// A movie with predictable identifiers: `tt` + zero-padded id, title
/// `Movie <id>`.
pub fn movie_fixture(
    movie_id: i64,
    genres: &str,
    release_date: &str,
    budget: Option<f64>,
) -> movie::Model {
    movie::Model {
        movie_id,
        imdb_id: format!("tt{movie_id:07}"),
        title: format!("Movie {movie_id}"),
        overview: Some(format!("Overview of movie {movie_id}")),
        release_date: Some(release_date.to_string()),
        budget,
        runtime: Some(100),
        language: Some("en".to_string()),
        genres: Some(genres.to_string()),
        production_companies: Some("Studio".to_string()),
        status: Some("Released".to_string()),
    }
}

pub async fn insert_movies(
    db: &DatabaseConnection,
    movies: impl IntoIterator<Item = movie::Model>,
) -> Result<(), DbErr> {
    for movie in movies {
        movie::Entity::insert(movie.into_active_model()).exec_without_returning(db).await?;
    }
    Ok(())
}

/// Inserts `(user_id, movie_id, rating)` triples.
pub async fn insert_ratings(
    db: &DatabaseConnection,
    ratings: impl IntoIterator<Item = (i64, i64, f64)>,
) -> Result<(), DbErr> {
    for (user_id, movie_id, value) in ratings {
        let model = rating::Model { user_id, movie_id, rating: value, timestamp: None };
        rating::Entity::insert(model.into_active_model()).exec_without_returning(db).await?;
    }
    Ok(())
}
