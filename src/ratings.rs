use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter, QuerySelect,
    sea_query::{Expr, Func, SimpleExpr},
};

use crate::entities::rating;

#[derive(Debug, FromQueryResult)]
struct AverageRating {
    avg_rating: Option<f64>,
}

/// Read-only client for the ratings database.
#[derive(Clone)]
pub struct RatingsStore {
    db: DatabaseConnection,
}

impl RatingsStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[cfg(test)]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Arithmetic mean of every rating recorded for `movie_id`, or `None`
    /// when the movie has no ratings.
    pub async fn average_rating(&self, movie_id: i64) -> Result<Option<f64>, DbErr> {
        let avg: SimpleExpr = Func::avg(Expr::col(rating::Column::Rating)).into();

        let row = rating::Entity::find()
            .select_only()
            .column_as(avg, "avg_rating")
            .filter(rating::Column::MovieId.eq(movie_id))
            .into_model::<AverageRating>()
            .one(&self.db)
            .await?;

        Ok(row.and_then(|r| r.avg_rating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_ratings, setup_stores};

    #[tokio::test]
    async fn averages_only_the_requested_movie() -> Result<(), DbErr> {
        let (_, ratings) = setup_stores().await?;
        let rows = [(1, 10, 4.0), (2, 10, 3.0), (3, 10, 3.5), (1, 11, 1.0)];
        insert_ratings(ratings.db(), rows).await?;

        assert_eq!(ratings.average_rating(10).await?, Some(3.5));
        assert_eq!(ratings.average_rating(11).await?, Some(1.0));
        Ok(())
    }

    #[tokio::test]
    async fn unrated_movie_has_no_average() -> Result<(), DbErr> {
        let (_, ratings) = setup_stores().await?;
        insert_ratings(ratings.db(), [(1, 10, 4.0)]).await?;

        assert_eq!(ratings.average_rating(99).await?, None);
        Ok(())
    }
}
