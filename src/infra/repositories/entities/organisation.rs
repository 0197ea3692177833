//! Organisation database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Organisation;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "organisations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Organisation {
    fn from(model: Model) -> Self {
        Organisation {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
        }
    }
}
