//! Raw Customer Record

use serde::{Deserialize, Serialize};

/// One customer as submitted for scoring.
///
/// Field names on the wire match the training data headers. Every field is
/// optional at this layer: absent categorical and binary fields encode to
/// zero, absent numeric fields are rejected by the aligner. Unknown fields
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerRecord {
    pub gender: Option<String>,
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: Option<u8>,
    #[serde(rename = "Partner")]
    pub partner: Option<String>,
    #[serde(rename = "Dependents")]
    pub dependents: Option<String>,
    /// Months as a customer
    pub tenure: Option<f64>,
    #[serde(rename = "PhoneService")]
    pub phone_service: Option<String>,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: Option<String>,
    #[serde(rename = "InternetService")]
    pub internet_service: Option<String>,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: Option<String>,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: Option<String>,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: Option<String>,
    #[serde(rename = "TechSupport")]
    pub tech_support: Option<String>,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: Option<String>,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: Option<String>,
    #[serde(rename = "Contract")]
    pub contract: Option<String>,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: Option<String>,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: Option<String>,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: Option<f64>,
    #[serde(rename = "TotalCharges")]
    pub total_charges: Option<f64>,
}

impl CustomerRecord {
    /// Binary fields paired with their wire names
    pub(crate) fn binary_fields(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("Partner", self.partner.as_deref()),
            ("Dependents", self.dependents.as_deref()),
            ("PhoneService", self.phone_service.as_deref()),
            ("PaperlessBilling", self.paperless_billing.as_deref()),
        ]
    }

    /// Categorical fields paired with their wire names
    pub(crate) fn categorical_fields(&self) -> [(&'static str, Option<&str>); 11] {
        [
            ("gender", self.gender.as_deref()),
            ("MultipleLines", self.multiple_lines.as_deref()),
            ("InternetService", self.internet_service.as_deref()),
            ("OnlineSecurity", self.online_security.as_deref()),
            ("OnlineBackup", self.online_backup.as_deref()),
            ("DeviceProtection", self.device_protection.as_deref()),
            ("TechSupport", self.tech_support.as_deref()),
            ("StreamingTV", self.streaming_tv.as_deref()),
            ("StreamingMovies", self.streaming_movies.as_deref()),
            ("Contract", self.contract.as_deref()),
            ("PaymentMethod", self.payment_method.as_deref()),
        ]
    }
}
