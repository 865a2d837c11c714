use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Report row created alongside each scan result. `pdf_path` stays
/// empty until a later reporting step fills it in.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Report)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub scan_result_id: String,
    pub pdf_path: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::scan_results::Entity",
        from = "Column::ScanResultId",
        to = "super::scan_results::Column::Id"
    )]
    ScanResults,
}

impl Related<super::scan_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScanResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
