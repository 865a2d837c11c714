use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One analyzed scan. `detections` holds the ordered detection list as
/// JSON; `diagnosis` and the condition flags are derived from it and
/// are never edited independently.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scan_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub patient_id: Option<String>,
    pub filename: String,
    pub detections: String,
    pub diagnosis: String,
    pub has_concha_bullosa: bool,
    pub has_deviation: bool,
    pub scan_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::patients::Entity",
        from = "Column::PatientId",
        to = "super::patients::Column::Id"
    )]
    Patients,
    #[sea_orm(has_many = "super::reports::Entity")]
    Reports,
}

impl Related<super::patients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patients.def()
    }
}

impl Related<super::reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
