use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::Genres;

pub const DEFAULT_SEEKING_DESCRIPTION: &str = "Looking for a place to perform!";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub genres: Genres,
    pub image_link: String,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::show::Entity")]
    Show,
}

impl Related<super::show::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Show.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
