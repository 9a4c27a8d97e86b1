use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Response,
    routing::get,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::debug;

use crate::{
    AppState,
    error::{self, AppError, AppResult},
    models::{MovieDetails, MovieSummary, QueryParams},
    rate_limit, security,
    validation::{is_numeric, movie_key, round_rating, validate_integer, validate_year},
};

pub const INVALID_MOVIE_ID: &str = "Invalid movieId. It should be a positive integer.";
pub const INVALID_YEAR: &str = "Invalid year. It should be a 4-digit number between 1900 and 2099.";
pub const INVALID_GENRE: &str = "Invalid genre. It should be a string.";
pub const MOVIE_NOT_FOUND: &str = "Movie not found";

pub fn router(state: Arc<AppState>) -> Router {
    let movies = Router::new()
        .route("/", get(list_movies))
        .route("/{movie_id}", get(movie_details))
        .route("/year/{year}", get(movies_by_year))
        .route("/genre/{genre}", get(movies_by_genre));

    let rate_limiter = state.rate_limiter.clone();
    let app = Router::new()
        .nest("/api/movies", movies)
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(rate_limiter, rate_limit::enforce))
        .layer(CatchPanicLayer::custom(error::handle_panic));

    security::with_security_headers(app).layer(TraceLayer::new_for_http())
}

pub async fn health() -> &'static str {
    "OK"
}

async fn not_found() -> Response {
    error::error_response(StatusCode::NOT_FOUND, "Not found")
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let page = params.page();
    debug!(page = page.number(), "listing movies");

    let rows = state.catalog.list(page).await?;
    debug!(page = page.number(), rows = rows.len(), "listed movies");

    Ok(Json(rows.into_iter().map(MovieSummary::from).collect()))
}

pub async fn movie_details(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<MovieDetails>> {
    if !validate_integer(&movie_id) {
        return Err(AppError::BadRequest(INVALID_MOVIE_ID));
    }
    let Some(id) = movie_key(&movie_id) else {
        return Err(AppError::NotFound(MOVIE_NOT_FOUND));
    };

    debug!(movie_id = id, "fetching movie");
    let Some(movie) = state.catalog.find_by_id(id).await? else {
        debug!(movie_id = id, "movie not found");
        return Err(AppError::NotFound(MOVIE_NOT_FOUND));
    };

    let rating = state.ratings.average_rating(id).await?.map(round_rating);
    debug!(movie_id = id, rating = ?rating, "fetched movie");

    Ok(Json(MovieDetails::new(movie, rating)))
}

pub async fn movies_by_year(
    State(state): State<Arc<AppState>>,
    Path(year): Path<String>,
    Query(params): Query<QueryParams>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    if !validate_year(&year) {
        return Err(AppError::BadRequest(INVALID_YEAR));
    }

    let page = params.page();
    let order = params.sort();
    debug!(year = %year, page = page.number(), order = ?order, "listing movies by year");

    let rows = state.catalog.by_year(&year, page, order).await?;
    Ok(Json(rows.into_iter().map(MovieSummary::from).collect()))
}

pub async fn movies_by_genre(
    State(state): State<Arc<AppState>>,
    Path(genre): Path<String>,
    Query(params): Query<QueryParams>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    if genre.is_empty() || is_numeric(&genre) {
        return Err(AppError::BadRequest(INVALID_GENRE));
    }

    let page = params.page();
    debug!(genre = %genre, page = page.number(), "listing movies by genre");

    let rows = state.catalog.by_genre(&genre, page).await?;
    Ok(Json(rows.into_iter().map(MovieSummary::from).collect()))
}
