pub mod pipeline;
pub mod types;

pub use pipeline::ScreeningPipeline;
pub use types::{confidence_percentage, ClinicalForm, ClinicalRecord, Diagnosis, Screening};
