use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A patient record keyed by the externally supplied business id.
/// Rows are write-once: repeat submissions with a known
/// `external_patient_id` never touch the stored fields.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Patient)]
#[sea_orm(table_name = "patients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub external_patient_id: String,
    pub name: String,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub referring_doctor: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::scan_results::Entity")]
    ScanResults,
}

impl Related<super::scan_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScanResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
