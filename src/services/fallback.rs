use crate::models::Detection;
use rand::seq::SliceRandom;

/// Source of substitute detections when the inference service returns
/// nothing. A strategy trait so tests can pin the choice.
pub trait DetectionFallback: Send + Sync {
    fn generate(&self) -> Vec<Detection>;
}

/// Picks one of a small fixed set of canned detection scenarios,
/// uniformly at random. A placeholder for an unavailable upstream
/// model, not a diagnostic tool.
pub struct CannedScenarios;

impl CannedScenarios {
    /// The full scenario set: normal, deviated septum, bilateral
    /// concha bullosa, mixed findings.
    pub fn scenarios() -> Vec<Vec<Detection>> {
        vec![
            vec![Detection::new("Normal", 0.95, 100, 100, 400, 400)],
            vec![Detection::new("Deviated_Septum_Left", 0.87, 150, 120, 350, 380)],
            vec![
                Detection::new("CB_Right", 0.92, 200, 150, 300, 250),
                Detection::new("CB_Left", 0.88, 220, 250, 320, 350),
            ],
            vec![
                Detection::new("CB_Left", 0.85, 180, 140, 280, 240),
                Detection::new("Deviated_Septum_Right", 0.79, 160, 130, 360, 390),
            ],
        ]
    }
}

impl DetectionFallback for CannedScenarios {
    fn generate(&self) -> Vec<Detection> {
        Self::scenarios()
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}
