use crate::api::error::AppError;
use crate::entities::{prelude::*, reports, scan_results};
use crate::models::Detection;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Set,
    TransactionTrait,
};
use uuid::Uuid;

/// Insert one scan result row. The detection sequence is serialized to
/// JSON in the order received; diagnosis and flags must already be
/// derived from that same sequence.
pub async fn save<C: ConnectionTrait>(
    conn: &C,
    patient_id: Option<String>,
    filename: &str,
    detections: &[Detection],
    diagnosis: &str,
    has_concha_bullosa: bool,
    has_deviation: bool,
) -> Result<String, DbErr> {
    let serialized = serde_json::to_string(detections)
        .map_err(|e| DbErr::Custom(format!("detection serialization failed: {e}")))?;

    let scan = scan_results::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        patient_id: Set(patient_id),
        filename: Set(filename.to_string()),
        detections: Set(serialized),
        diagnosis: Set(diagnosis.to_string()),
        has_concha_bullosa: Set(has_concha_bullosa),
        has_deviation: Set(has_deviation),
        scan_date: Set(Utc::now()),
    };

    let created = scan.insert(conn).await?;
    Ok(created.id)
}

/// Attach a report to an existing scan result. `pdf_path` stays empty
/// until the out-of-band reporting step fills it.
pub async fn link_report<C: ConnectionTrait>(
    conn: &C,
    scan_result_id: &str,
    pdf_path: Option<String>,
) -> Result<String, AppError> {
    let scan = ScanResults::find_by_id(scan_result_id.to_string())
        .one(conn)
        .await?;
    if scan.is_none() {
        return Err(AppError::NotFound("Scan result not found".to_string()));
    }

    let report = reports::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        scan_result_id: Set(scan_result_id.to_string()),
        pdf_path: Set(pdf_path),
        created_at: Set(Utc::now()),
    };

    let created = report.insert(conn).await?;
    Ok(created.id)
}

/// Persist a scan result and its report as one unit. Both inserts run
/// in a single transaction so a failed report insert cannot leave an
/// orphaned scan result behind.
#[allow(clippy::too_many_arguments)]
pub async fn save_with_report(
    db: &DatabaseConnection,
    patient_id: Option<String>,
    filename: &str,
    detections: &[Detection],
    diagnosis: &str,
    has_concha_bullosa: bool,
    has_deviation: bool,
) -> Result<(String, String), AppError> {
    let txn = db.begin().await?;

    let scan_result_id = save(
        &txn,
        patient_id,
        filename,
        detections,
        diagnosis,
        has_concha_bullosa,
        has_deviation,
    )
    .await?;
    let report_id = link_report(&txn, &scan_result_id, None).await?;

    txn.commit().await?;
    Ok((scan_result_id, report_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database;
    use sea_orm::{ColumnTrait, Database, PaginatorTrait, QueryFilter};

    fn detections() -> Vec<Detection> {
        vec![Detection::new("Deviated_Septum_Left", 0.87, 150, 120, 350, 380)]
    }

    #[tokio::test]
    async fn test_save_round_trips_detections() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        database::run_migrations(&db).await.unwrap();

        let scan_id = save(
            &db,
            None,
            "abc_scan.jpg",
            &detections(),
            "Deviated Nasal Septum",
            false,
            true,
        )
        .await
        .unwrap();

        let stored = ScanResults::find_by_id(scan_id).one(&db).await.unwrap().unwrap();
        assert_eq!(stored.diagnosis, "Deviated Nasal Septum");
        assert!(stored.has_deviation);
        assert!(!stored.has_concha_bullosa);

        let parsed: Vec<Detection> = serde_json::from_str(&stored.detections).unwrap();
        assert_eq!(parsed, detections());
    }

    #[tokio::test]
    async fn test_link_report_requires_existing_scan() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        database::run_migrations(&db).await.unwrap();

        let err = link_report(&db, "no-such-scan", None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_save_with_report_creates_both_rows() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        database::run_migrations(&db).await.unwrap();

        let (scan_id, report_id) = save_with_report(
            &db,
            None,
            "abc_scan.jpg",
            &detections(),
            "Deviated Nasal Septum",
            false,
            true,
        )
        .await
        .unwrap();

        assert!(ScanResults::find_by_id(scan_id.clone()).one(&db).await.unwrap().is_some());

        let linked = Reports::find()
            .filter(reports::Column::ScanResultId.eq(scan_id))
            .count(&db)
            .await
            .unwrap();
        assert_eq!(linked, 1);

        let report = Reports::find_by_id(report_id).one(&db).await.unwrap().unwrap();
        assert!(report.pdf_path.is_none());
    }
}
