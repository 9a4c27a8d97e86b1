use sea_orm::entity::prelude::*;

/// One user's rating of a movie. `movie_id` refers to `movies.movieId`, but
/// the two tables live in separate databases and nothing enforces it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ratings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "userId")]
    pub user_id: i64,
    #[sea_orm(primary_key, auto_increment = false, column_name = "movieId")]
    pub movie_id: i64,
    pub rating: f64,
    pub timestamp: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
