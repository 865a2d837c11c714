use crate::models::Detection;

pub const DIAGNOSIS_DEVIATED: &str = "Deviated Nasal Septum";
pub const DIAGNOSIS_CONCHA_BULLOSA: &str = "Concha Bullosa";
pub const DIAGNOSIS_NORMAL: &str = "Normal Nasal Septum";

pub const MARKER_CONCHA_BULLOSA: &str = "CB";
pub const MARKER_DEVIATION: &str = "Deviated";

/// Derive the diagnosis label from a detection list. First matching
/// rule wins: any deviation marker outranks concha bullosa, which
/// outranks a normal finding. Existence-based, so input order is
/// irrelevant.
pub fn classify(detections: &[Detection]) -> &'static str {
    let mut concha_bullosa = false;
    for detection in detections {
        let cls = detection.cls.to_lowercase();
        if cls.contains("deviated") {
            return DIAGNOSIS_DEVIATED;
        }
        if cls.contains("cb") || cls.contains("concha") {
            concha_bullosa = true;
        }
    }

    if concha_bullosa {
        DIAGNOSIS_CONCHA_BULLOSA
    } else {
        DIAGNOSIS_NORMAL
    }
}

/// True iff any detection label contains `marker`, case-insensitively.
pub fn has_condition(detections: &[Detection], marker: &str) -> bool {
    let marker = marker.to_lowercase();
    detections
        .iter()
        .any(|d| d.cls.to_lowercase().contains(&marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(cls: &str) -> Detection {
        Detection::new(cls, 0.9, 0, 0, 100, 100)
    }

    #[test]
    fn test_deviated_septum() {
        let detections = vec![detection("Deviated_Septum_Left")];
        assert_eq!(classify(&detections), DIAGNOSIS_DEVIATED);
    }

    #[test]
    fn test_concha_bullosa() {
        let detections = vec![detection("CB_Right"), detection("CB_Left")];
        assert_eq!(classify(&detections), DIAGNOSIS_CONCHA_BULLOSA);
    }

    #[test]
    fn test_empty_is_normal() {
        assert_eq!(classify(&[]), DIAGNOSIS_NORMAL);
    }

    #[test]
    fn test_normal_label_is_normal() {
        let detections = vec![detection("Normal")];
        assert_eq!(classify(&detections), DIAGNOSIS_NORMAL);
    }

    #[test]
    fn test_deviation_outranks_concha_bullosa() {
        // Rule order, not input order, decides.
        let detections = vec![detection("CB_Left"), detection("Deviated_Septum_Right")];
        assert_eq!(classify(&detections), DIAGNOSIS_DEVIATED);

        let reversed = vec![detection("Deviated_Septum_Right"), detection("CB_Left")];
        assert_eq!(classify(&reversed), DIAGNOSIS_DEVIATED);
    }

    #[test]
    fn test_concha_spelled_out() {
        let detections = vec![detection("concha_bullosa_left")];
        assert_eq!(classify(&detections), DIAGNOSIS_CONCHA_BULLOSA);
    }

    #[test]
    fn test_has_condition_case_insensitive() {
        let detections = vec![detection("cb_left")];
        assert!(has_condition(&detections, MARKER_CONCHA_BULLOSA));
        assert!(!has_condition(&detections, MARKER_DEVIATION));
    }

    #[test]
    fn test_has_condition_empty() {
        assert!(!has_condition(&[], MARKER_CONCHA_BULLOSA));
    }
}
