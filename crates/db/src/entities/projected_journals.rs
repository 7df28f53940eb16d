//! `SeaORM` Entity for projected_journals table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "projected_journals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub date: DateTime,
    pub source_type: String,
    pub reference: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::projected_journal_lines::Entity")]
    ProjectedJournalLines,
}

impl Related<super::projected_journal_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectedJournalLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
