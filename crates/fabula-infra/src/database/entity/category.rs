//! Category entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub is_published: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for fabula_core::domain::Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            slug: model.slug,
            title: model.title,
            description: model.description,
            is_published: model.is_published,
            created_at: model.created_at.into(),
        }
    }
}

impl From<fabula_core::domain::Category> for ActiveModel {
    fn from(category: fabula_core::domain::Category) -> Self {
        Self {
            id: Set(category.id),
            slug: Set(category.slug),
            title: Set(category.title),
            description: Set(category.description),
            is_published: Set(category.is_published),
            created_at: Set(category.created_at.into()),
        }
    }
}
