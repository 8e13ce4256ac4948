use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::Genres;

pub const DEFAULT_SEEKING_DESCRIPTION: &str = "We are looking for artists to perform here!";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "venues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub genres: Genres,
    pub website: Option<String>,
    pub seeking_talent: bool,
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
