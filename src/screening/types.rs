use crate::models::FundusClassifier;
use crate::utils::error::ScreenError;
use crate::Result;
use serde::Deserialize;
use std::fmt;

/// Cutoff on the calibrated confidence percentage: strictly above means a
/// normal reading. Inherited from the original calibration of the clinical
/// model; see DESIGN.md.
pub const CONFIDENCE_CUTOFF: f32 = 85.0;

/// Post-hoc transform applied to the clinical model's raw probability before
/// thresholding: amplify by 10, invert, express as a percentage.
pub fn confidence_percentage(raw_probability: f32) -> f32 {
    (1.0 - raw_probability * 10.0) * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnosis {
    Normal,
    Glaucoma,
}

impl Diagnosis {
    /// Diagnosis from the calibrated clinical confidence percentage.
    pub fn from_confidence(percentage: f32) -> Self {
        if percentage > CONFIDENCE_CUTOFF {
            Diagnosis::Normal
        } else {
            Diagnosis::Glaucoma
        }
    }

    /// Diagnosis from the fundus classifier's raw score. The boundary value
    /// maps to Normal.
    pub fn from_fundus_score(score: f32) -> Self {
        if score < FundusClassifier::GLAUCOMA_THRESHOLD {
            Diagnosis::Glaucoma
        } else {
            Diagnosis::Normal
        }
    }

    pub fn alert_class(&self) -> &'static str {
        match self {
            Diagnosis::Normal => "alert-success",
            Diagnosis::Glaucoma => "alert-danger",
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnosis::Normal => write!(f, "Normal"),
            Diagnosis::Glaucoma => write!(f, "Glaucoma"),
        }
    }
}

/// Raw clinical form submission. Fields stay strings so the page can echo
/// whatever the user typed, valid or not.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClinicalForm {
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub iop: String,
    #[serde(default)]
    pub cct: String,
    #[serde(default)]
    pub oct_rnfl: String,
    #[serde(default)]
    pub oct_rnfl1: String,
    #[serde(default)]
    pub oct_rnfl2: String,
    #[serde(default)]
    pub oct_rnfl3: String,
    #[serde(default)]
    pub oct_rnfl4: String,
    #[serde(default)]
    pub vf_mean: String,
    #[serde(default)]
    pub interval_years: String,
}

impl ClinicalForm {
    /// Validates every field and builds the typed record. The first missing
    /// or non-numeric field fails with an error naming it.
    pub fn to_record(&self) -> Result<ClinicalRecord> {
        Ok(ClinicalRecord {
            age: parse_field("age", &self.age)?,
            iop: parse_field("iop", &self.iop)?,
            cct: parse_field("cct", &self.cct)?,
            oct_rnfl: parse_field("oct_rnfl", &self.oct_rnfl)?,
            oct_rnfl1: parse_field("oct_rnfl1", &self.oct_rnfl1)?,
            oct_rnfl2: parse_field("oct_rnfl2", &self.oct_rnfl2)?,
            oct_rnfl3: parse_field("oct_rnfl3", &self.oct_rnfl3)?,
            oct_rnfl4: parse_field("oct_rnfl4", &self.oct_rnfl4)?,
            vf_mean: parse_field("vf_mean", &self.vf_mean)?,
            interval_years: parse_field("interval_years", &self.interval_years)?,
        })
    }
}

fn parse_field(name: &str, value: &str) -> Result<f32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ScreenError::InvalidInput(format!(
            "field '{}' is missing",
            name
        )));
    }

    trimmed.parse::<f32>().map_err(|_| {
        ScreenError::InvalidInput(format!("field '{}' is not a number: '{}'", name, trimmed))
    })
}

/// The ten clinical measurements in training-time feature order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClinicalRecord {
    pub age: f32,
    pub iop: f32,
    pub cct: f32,
    pub oct_rnfl: f32,
    pub oct_rnfl1: f32,
    pub oct_rnfl2: f32,
    pub oct_rnfl3: f32,
    pub oct_rnfl4: f32,
    pub vf_mean: f32,
    pub interval_years: f32,
}

impl ClinicalRecord {
    /// Feature order must match training exactly; do not reorder.
    pub fn feature_vector(&self) -> [f32; 10] {
        [
            self.age,
            self.iop,
            self.cct,
            self.oct_rnfl,
            self.oct_rnfl1,
            self.oct_rnfl2,
            self.oct_rnfl3,
            self.oct_rnfl4,
            self.vf_mean,
            self.interval_years,
        ]
    }
}

/// What a route renders after a prediction attempt.
#[derive(Debug, Clone)]
pub struct Screening {
    /// Prediction text; may contain `<br>` separators.
    pub prediction_text: String,

    /// Bootstrap alert class for the result block.
    pub alert_class: &'static str,

    /// Base64 `data:` echo of the uploaded image, when one was submitted.
    pub uploaded_image: Option<String>,
}

impl Screening {
    pub fn text_only(prediction_text: String, alert_class: &'static str) -> Self {
        Self {
            prediction_text,
            alert_class,
            uploaded_image: None,
        }
    }

    /// Error rendering used by every route: the message takes the place of
    /// the prediction, styled as a warning.
    pub fn error(message: String) -> Self {
        Self {
            prediction_text: message,
            alert_class: "alert-warning",
            uploaded_image: None,
        }
    }
}
