use crate::screening::{ClinicalForm, Screening};
use axum::response::Html;

const HOME_TEMPLATE: &str = include_str!("../../templates/home.html");
const CLINICAL_TEMPLATE: &str = include_str!("../../templates/clinical.html");
const CD_RATIO_TEMPLATE: &str = include_str!("../../templates/cd_ratio.html");
const CUSTOM_GLAUCOMA_TEMPLATE: &str = include_str!("../../templates/custom_glaucoma.html");

pub async fn home_page() -> Html<&'static str> {
    Html(HOME_TEMPLATE)
}

pub async fn clinical_page() -> Html<String> {
    Html(render_clinical(None, &ClinicalForm::default()))
}

pub async fn cd_ratio_page() -> Html<String> {
    Html(render_cd_ratio(None))
}

pub async fn custom_glaucoma_page() -> Html<String> {
    Html(render_custom_glaucoma(None))
}

/// Clinical page with the optional result block and the submitted values
/// echoed back into the form inputs.
pub fn render_clinical(result: Option<&Screening>, form: &ClinicalForm) -> String {
    CLINICAL_TEMPLATE
        .replace("{{prediction_block}}", &prediction_block(result))
        .replace("{{age}}", &escape_html(&form.age))
        .replace("{{iop}}", &escape_html(&form.iop))
        .replace("{{cct}}", &escape_html(&form.cct))
        .replace("{{oct_rnfl1}}", &escape_html(&form.oct_rnfl1))
        .replace("{{oct_rnfl2}}", &escape_html(&form.oct_rnfl2))
        .replace("{{oct_rnfl3}}", &escape_html(&form.oct_rnfl3))
        .replace("{{oct_rnfl4}}", &escape_html(&form.oct_rnfl4))
        .replace("{{oct_rnfl}}", &escape_html(&form.oct_rnfl))
        .replace("{{vf_mean}}", &escape_html(&form.vf_mean))
        .replace("{{interval_years}}", &escape_html(&form.interval_years))
}

pub fn render_cd_ratio(result: Option<&Screening>) -> String {
    render_upload_page(CD_RATIO_TEMPLATE, result)
}

pub fn render_custom_glaucoma(result: Option<&Screening>) -> String {
    render_upload_page(CUSTOM_GLAUCOMA_TEMPLATE, result)
}

fn render_upload_page(template: &str, result: Option<&Screening>) -> String {
    template
        .replace("{{prediction_block}}", &prediction_block(result))
        .replace("{{image_block}}", &image_block(result))
}

/// The alert div, or nothing on a plain GET. Prediction text is escaped
/// except for the `<br>` separators the pipelines emit.
fn prediction_block(result: Option<&Screening>) -> String {
    match result {
        Some(screening) => {
            let text = escape_html(&screening.prediction_text).replace("&lt;br&gt;", "<br>");
            format!(
                r#"<div class="alert {}" role="alert">{}</div>"#,
                screening.alert_class, text
            )
        }
        None => String::new(),
    }
}

fn image_block(result: Option<&Screening>) -> String {
    match result.and_then(|screening| screening.uploaded_image.as_deref()) {
        Some(src) => format!(
            r#"<img class="img-fluid rounded preview" src="{}" alt="Uploaded image">"#,
            src
        ),
        None => String::new(),
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_page_has_no_alert_block() {
        let page = render_clinical(None, &ClinicalForm::default());
        assert!(!page.contains("class=\"alert"));
        assert!(page.contains("name=\"interval_years\""));
    }

    #[test]
    fn result_block_carries_alert_class_and_text() {
        let screening = Screening::text_only(
            "Confidence Percentage: 80.00%<br>Diagnosis: Glaucoma".to_string(),
            "alert-danger",
        );
        let page = render_clinical(Some(&screening), &ClinicalForm::default());
        assert!(page.contains("alert-danger"));
        assert!(page.contains("Diagnosis: Glaucoma"));
        assert!(page.contains("<br>"));
    }

    #[test]
    fn submitted_values_are_echoed_and_escaped() {
        let mut form = ClinicalForm::default();
        form.age = "60".into();
        form.iop = "\"><script>".into();
        let page = render_clinical(None, &form);
        assert!(page.contains("value=\"60\""));
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn upload_page_embeds_image_echo() {
        let screening = Screening {
            prediction_text: "Predicted CD Ratio: 0.412".to_string(),
            alert_class: "alert-info",
            uploaded_image: Some("data:image/png;base64,QUJD".to_string()),
        };
        let page = render_cd_ratio(Some(&screening));
        assert!(page.contains("data:image/png;base64,QUJD"));
        assert!(page.contains("alert-info"));
    }

    #[test]
    fn error_result_renders_as_warning() {
        let screening = Screening::error("Error in prediction: field 'age' is missing".to_string());
        let page = render_custom_glaucoma(Some(&screening));
        assert!(page.contains("alert-warning"));
        assert!(page.contains("field &#39;age&#39; is missing"));
    }
}
