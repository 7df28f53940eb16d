//! `SeaORM` Entity for projected_journal_lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "projected_journal_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub projected_journal_id: Uuid,
    pub account_xero_id: String,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub net_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub gross_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub tax_amount: Decimal,
    pub tax_type: Option<String>,
    pub account_type: String,
    pub line_number: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projected_journals::Entity",
        from = "Column::ProjectedJournalId",
        to = "super::projected_journals::Column::Id",
        on_delete = "Cascade"
    )]
    ProjectedJournals,
}

impl Related<super::projected_journals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectedJournals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
