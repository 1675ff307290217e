//! Interactive Form Demo
//!
//! A single HTML page that collects the customer fields and renders the
//! prediction. Submissions go through the same aligner as the JSON route.

use axum::{extract::State, http::StatusCode, response::Html, Form};
use data_validator::ValidationError;
use feature_engine::CustomerRecord;
use inference_engine::ChurnPrediction;
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

const YES_NO: &[&str] = &["Yes", "No"];
const INTERNET_ADDON: &[&str] = &["No", "Yes", "No internet service"];

/// A select input: wire name and choices
struct Select {
    name: &'static str,
    choices: &'static [&'static str],
}

const SELECTS: &[Select] = &[
    Select { name: "gender", choices: &["Female", "Male"] },
    Select { name: "SeniorCitizen", choices: &["0", "1"] },
    Select { name: "Partner", choices: YES_NO },
    Select { name: "Dependents", choices: YES_NO },
    Select { name: "PhoneService", choices: YES_NO },
    Select { name: "MultipleLines", choices: &["No", "Yes", "No phone service"] },
    Select { name: "InternetService", choices: &["DSL", "Fiber optic", "No"] },
    Select { name: "OnlineSecurity", choices: INTERNET_ADDON },
    Select { name: "OnlineBackup", choices: INTERNET_ADDON },
    Select { name: "DeviceProtection", choices: INTERNET_ADDON },
    Select { name: "TechSupport", choices: INTERNET_ADDON },
    Select { name: "StreamingTV", choices: INTERNET_ADDON },
    Select { name: "StreamingMovies", choices: INTERNET_ADDON },
    Select { name: "Contract", choices: &["Month-to-month", "One year", "Two year"] },
    Select { name: "PaperlessBilling", choices: YES_NO },
    Select {
        name: "PaymentMethod",
        choices: &[
            "Electronic check",
            "Mailed check",
            "Bank transfer (automatic)",
            "Credit card (automatic)",
        ],
    },
];

/// Free-text numeric inputs
const NUMBERS: &[&str] = &["tenure", "MonthlyCharges", "TotalCharges"];

/// Urlencoded form body; every input arrives as text
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DemoForm {
    pub gender: String,
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: String,
    #[serde(rename = "Partner")]
    pub partner: String,
    #[serde(rename = "Dependents")]
    pub dependents: String,
    pub tenure: String,
    #[serde(rename = "PhoneService")]
    pub phone_service: String,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: String,
    #[serde(rename = "InternetService")]
    pub internet_service: String,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: String,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: String,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: String,
    #[serde(rename = "TechSupport")]
    pub tech_support: String,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: String,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: String,
    #[serde(rename = "Contract")]
    pub contract: String,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: String,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: String,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: String,
    #[serde(rename = "TotalCharges")]
    pub total_charges: String,
}

fn text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn number(field: &'static str, value: &str) -> Result<Option<f64>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| {
        ValidationError::InvalidFormat(format!("{} is not a number: {:?}", field, value))
    })
}

impl DemoForm {
    /// Convert text inputs into a typed record; blank inputs become absent
    pub fn into_record(self) -> Result<CustomerRecord, ValidationError> {
        let senior_citizen = match self.senior_citizen.trim() {
            "" => None,
            value => Some(value.parse::<u8>().map_err(|_| ValidationError::InvalidValue {
                field: "SeniorCitizen",
                value: value.to_string(),
                expected: "0 or 1",
            })?),
        };

        Ok(CustomerRecord {
            tenure: number("tenure", &self.tenure)?,
            monthly_charges: number("MonthlyCharges", &self.monthly_charges)?,
            total_charges: number("TotalCharges", &self.total_charges)?,
            senior_citizen,
            gender: text(self.gender),
            partner: text(self.partner),
            dependents: text(self.dependents),
            phone_service: text(self.phone_service),
            multiple_lines: text(self.multiple_lines),
            internet_service: text(self.internet_service),
            online_security: text(self.online_security),
            online_backup: text(self.online_backup),
            device_protection: text(self.device_protection),
            tech_support: text(self.tech_support),
            streaming_tv: text(self.streaming_tv),
            streaming_movies: text(self.streaming_movies),
            contract: text(self.contract),
            paperless_billing: text(self.paperless_billing),
            payment_method: text(self.payment_method),
        })
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Outcome block rendered under the form
enum Outcome {
    Prediction(ChurnPrediction),
    Error(String),
}

fn render(outcome: Option<&Outcome>) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
         <title>Customer Churn Prediction</title></head><body>\n\
         <h1>Customer Churn Prediction</h1>\n\
         <form method=\"post\" action=\"/demo\">\n",
    );

    for Select { name, choices } in SELECTS {
        let _ = write!(page, "<label>{name} <select name=\"{name}\">");
        for choice in choices.iter() {
            let choice = escape(choice);
            let _ = write!(page, "<option value=\"{choice}\">{choice}</option>");
        }
        page.push_str("</select></label><br>\n");
    }
    for name in NUMBERS {
        let _ = writeln!(
            page,
            "<label>{name} <input type=\"number\" step=\"any\" min=\"0\" name=\"{name}\"></label><br>"
        );
    }
    page.push_str("<button type=\"submit\">Predict</button>\n</form>\n");

    match outcome {
        Some(Outcome::Prediction(p)) => {
            let _ = write!(
                page,
                "<h2>Prediction</h2>\n<p>Predicted churn: {}</p>\n\
                 <p>Churn probability: {:.2}</p>\n<p>Suggested action: {}</p>\n",
                if p.predicted_churn == 1 { "Yes" } else { "No" },
                p.churn_probability,
                escape(&p.suggested_action)
            );
        }
        Some(Outcome::Error(message)) => {
            let _ = write!(page, "<h2>Error</h2>\n<p>{}</p>\n", escape(message));
        }
        None => {}
    }

    page.push_str("</body></html>\n");
    page
}

/// Show the empty form
pub async fn form_page() -> Html<String> {
    Html(render(None))
}

/// Score a submitted form and render the outcome
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DemoForm>,
) -> (StatusCode, Html<String>) {
    let scored = form
        .into_record()
        .map_err(ApiError::from)
        .and_then(|record| state.score(&record));

    match scored {
        Ok(result) => (
            StatusCode::OK,
            Html(render(Some(&Outcome::Prediction(result.prediction)))),
        ),
        Err(err) => (err.status(), Html(render(Some(&Outcome::Error(err.to_string()))))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> DemoForm {
        DemoForm {
            gender: "Male".into(),
            senior_citizen: "1".into(),
            partner: "No".into(),
            tenure: " 3 ".into(),
            internet_service: "Fiber optic".into(),
            monthly_charges: "89.5".into(),
            total_charges: "268.5".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_into_record() {
        let record = filled().into_record().unwrap();
        assert_eq!(record.senior_citizen, Some(1));
        assert_eq!(record.tenure, Some(3.0));
        assert_eq!(record.monthly_charges, Some(89.5));
        assert_eq!(record.internet_service.as_deref(), Some("Fiber optic"));
        assert_eq!(record.contract, None);
    }

    #[test]
    fn test_blank_numeric_is_missing() {
        let form = DemoForm {
            total_charges: "  ".into(),
            ..filled()
        };
        assert_eq!(form.into_record().unwrap().total_charges, None);
    }

    #[test]
    fn test_unparseable_numeric() {
        let form = DemoForm {
            tenure: "twelve".into(),
            ..filled()
        };
        assert!(matches!(
            form.into_record(),
            Err(ValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_render_escapes() {
        let page = render(Some(&Outcome::Error("<script>".into())));
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn test_form_lists_every_field() {
        let page = render(None);
        for select in SELECTS {
            let name = select.name;
            assert!(page.contains(&format!("name=\"{}\"", name)), "{}", name);
        }
        for name in NUMBERS {
            assert!(page.contains(&format!("name=\"{}\"", name)), "{}", name);
        }
        assert_eq!(SELECTS.len() + NUMBERS.len(), 19);
    }
}
