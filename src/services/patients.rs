use crate::entities::{patients, prelude::Patients};
use crate::models::PatientUpload;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

/// Find-or-create by external patient id. On a hit the supplied fields
/// are ignored; patient rows are write-once. The unique constraint on
/// `external_patient_id` is the arbiter under concurrency: a losing
/// insert is treated as "already exists" and re-read.
pub async fn find_or_create<C: ConnectionTrait>(
    conn: &C,
    upload: &PatientUpload,
) -> Result<String, DbErr> {
    if let Some(existing) = find_by_external_id(conn, &upload.patient_id).await? {
        return Ok(existing.id);
    }

    let patient = patients::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        external_patient_id: Set(upload.patient_id.clone()),
        name: Set(upload.name.clone()),
        age: Set(upload.age.clone()),
        gender: Set(upload.gender.clone()),
        referring_doctor: Set(upload.referring_doctor.clone()),
        notes: Set(upload.notes.clone()),
        created_at: Set(Utc::now()),
    };

    match patient.insert(conn).await {
        Ok(created) => Ok(created.id),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            // Lost the race to a concurrent request for the same id.
            find_by_external_id(conn, &upload.patient_id)
                .await?
                .map(|p| p.id)
                .ok_or(e)
        }
        Err(e) => Err(e),
    }
}

pub async fn find_by_external_id<C: ConnectionTrait>(
    conn: &C,
    external_patient_id: &str,
) -> Result<Option<patients::Model>, DbErr> {
    Patients::find()
        .filter(patients::Column::ExternalPatientId.eq(external_patient_id))
        .one(conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database;
    use sea_orm::{Database, EntityTrait, PaginatorTrait};

    fn upload(external_id: &str, name: &str) -> PatientUpload {
        PatientUpload {
            patient_id: external_id.to_string(),
            name: name.to_string(),
            age: Some("42".to_string()),
            gender: Some("F".to_string()),
            referring_doctor: Some("Dr. House".to_string()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        database::run_migrations(&db).await.unwrap();

        let first = find_or_create(&db, &upload("P-100", "Jane")).await.unwrap();
        let second = find_or_create(&db, &upload("P-100", "Someone Else"))
            .await
            .unwrap();
        assert_eq!(first, second);

        let count = Patients::find().count(&db).await.unwrap();
        assert_eq!(count, 1);

        // A hit never rewrites fields.
        let stored = find_by_external_id(&db, "P-100").await.unwrap().unwrap();
        assert_eq!(stored.name, "Jane");
    }

    #[tokio::test]
    async fn test_distinct_external_ids_get_distinct_rows() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        database::run_migrations(&db).await.unwrap();

        let a = find_or_create(&db, &upload("P-1", "Jane")).await.unwrap();
        let b = find_or_create(&db, &upload("P-2", "John")).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(Patients::find().count(&db).await.unwrap(), 2);
    }
}
