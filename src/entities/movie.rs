use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "movieId")]
    pub movie_id: i64,
    #[sea_orm(column_name = "imdbId")]
    pub imdb_id: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub overview: Option<String>,
    #[sea_orm(column_name = "releaseDate")]
    pub release_date: Option<String>,
    pub budget: Option<f64>,
    pub runtime: Option<i32>,
    pub language: Option<String>,
    pub genres: Option<String>,
    #[sea_orm(column_name = "productionCompanies")]
    pub production_companies: Option<String>,
    pub status: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
