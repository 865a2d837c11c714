use crate::api::error::AppError;
use crate::models::{Detection, PatientUpload};
use crate::services::diagnosis::{self, MARKER_CONCHA_BULLOSA, MARKER_DEVIATION};
use crate::services::fallback::DetectionFallback;
use crate::services::inference::InferenceGateway;
use crate::services::storage::{ImageStore, unique_filename};
use crate::services::{patients, scan_store};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{info, warn};

const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// Fallback frame size when the detector reports no dimensions.
const DEFAULT_FRAME: u32 = 512;

/// Everything a successful analysis produces.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub scan_id: String,
    pub report_id: String,
    pub patient_id: Option<String>,
    pub boxes: Vec<Detection>,
    pub diagnosis: String,
    pub has_concha_bullosa: bool,
    pub has_deviation: bool,
    pub annotated_image_base64: String,
    pub width: u32,
    pub height: u32,
}

/// Sequences one analyze request: validate → store image → resolve
/// patient → infer (with fallback) → classify → persist.
pub struct AnalyzeService {
    db: DatabaseConnection,
    gateway: Arc<dyn InferenceGateway>,
    fallback: Arc<dyn DetectionFallback>,
    images: Arc<dyn ImageStore>,
}

impl AnalyzeService {
    pub fn new(
        db: DatabaseConnection,
        gateway: Arc<dyn InferenceGateway>,
        fallback: Arc<dyn DetectionFallback>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            db,
            gateway,
            fallback,
            images,
        }
    }

    pub async fn analyze(
        &self,
        content_type: &str,
        original_filename: &str,
        image: &[u8],
        patient: Option<PatientUpload>,
    ) -> Result<AnalysisOutcome, AppError> {
        // 1. Validate the declared image type.
        if !ALLOWED_IMAGE_TYPES.contains(&content_type.to_lowercase().as_str()) {
            return Err(AppError::Validation(
                "Invalid image type. Only JPEG and PNG allowed".to_string(),
            ));
        }

        // 2. Store the upload under a collision-resistant name.
        let filename = unique_filename(original_filename);
        self.images
            .store(&filename, image)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to save image: {e}")))?;

        // 3. Resolve the patient when metadata was supplied.
        let patient_id = match &patient {
            Some(upload) => Some(patients::find_or_create(&self.db, upload).await?),
            None => None,
        };

        // 4. Infer, substituting canned detections when the model is
        //    unreachable or returns nothing.
        let prediction = self.gateway.predict(image, &filename).await;
        let boxes = if prediction.is_empty() {
            warn!("🧪 Inference returned no detections for {filename}, using fallback scenario");
            self.fallback.generate()
        } else {
            prediction.boxes.clone()
        };

        // 5. Classify. Diagnosis and flags derive from the same list.
        let diagnosis = diagnosis::classify(&boxes).to_string();
        let has_concha_bullosa = diagnosis::has_condition(&boxes, MARKER_CONCHA_BULLOSA);
        let has_deviation = diagnosis::has_condition(&boxes, MARKER_DEVIATION);

        // 6. Persist scan result and report atomically.
        let (scan_id, report_id) = scan_store::save_with_report(
            &self.db,
            patient_id.clone(),
            &filename,
            &boxes,
            &diagnosis,
            has_concha_bullosa,
            has_deviation,
        )
        .await?;

        info!("🩻 Scan {scan_id} analyzed: {diagnosis}");

        // The detector may hand back a pre-annotated frame; otherwise
        // clients get the stored upload to draw boxes over.
        let annotated_image_base64 = prediction
            .annotated_image_base64
            .unwrap_or_else(|| BASE64.encode(image));

        Ok(AnalysisOutcome {
            scan_id,
            report_id,
            patient_id,
            boxes,
            diagnosis,
            has_concha_bullosa,
            has_deviation,
            annotated_image_base64,
            width: prediction.width.unwrap_or(DEFAULT_FRAME),
            height: prediction.height.unwrap_or(DEFAULT_FRAME),
        })
    }
}
