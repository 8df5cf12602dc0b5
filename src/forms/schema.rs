//! Entity records and the submission payloads they are built from.
//!
//! Payload fields are all optional so that a missing field surfaces as a
//! validation error instead of a deserialization failure. Scalar values
//! (numbers, booleans) are accepted as their text form, so a phone sent as
//! a JSON number still validates. Unknown fields (including any
//! client-supplied timestamp) are ignored.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::forms::validation::{
    check_email, check_min_len, check_one_of, check_phone, require, ValidationError,
};

/// A persisted entity kind.
pub trait Record: Serialize + Send + Sync {
    /// Collection holding this entity.
    const COLLECTION: &'static str;

    /// Name of the server-set creation timestamp field.
    const TIMESTAMP_FIELD: &'static str;

    /// Fields with a store-enforced uniqueness constraint.
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    fn timestamp(&self) -> DateTime<Utc>;
}

/// A client payload that validates into a [`Record`].
pub trait Submission: DeserializeOwned + Send {
    type Record: Record;

    /// Normalise, validate and stamp the record with `now`.
    fn into_record(self, now: DateTime<Utc>) -> Result<Self::Record, ValidationError>;
}

/// Trim, dropping values that are empty afterwards.
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_email(value: Option<String>) -> Option<String> {
    clean(value).map(|v| v.to_lowercase())
}

/// Deserialize any JSON scalar into its string form; `null` is absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(text) => text,
        Scalar::Signed(n) => n.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

// `require` has already run; an absent value here is unreachable.
fn take(value: Option<String>) -> String {
    value.unwrap_or_default()
}

/// Services offered on the main contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Service {
    Accounting,
    Taxation,
    Audit,
    Advisory,
    Other,
}

impl Service {
    pub const ALL: [Service; 5] = [
        Service::Accounting,
        Service::Taxation,
        Service::Audit,
        Service::Advisory,
        Service::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Accounting => "Accounting",
            Service::Taxation => "Taxation",
            Service::Audit => "Audit",
            Service::Advisory => "Advisory",
            Service::Other => "Other",
        }
    }

    /// Exact, case-sensitive match against [`Service::ALL`].
    fn parse(value: &str) -> Result<Self, ValidationError> {
        let allowed = Self::ALL.map(|service| service.as_str());
        check_one_of("services", value, &allowed)?;
        Ok(Self::ALL
            .into_iter()
            .find(|service| service.as_str() == value)
            .unwrap_or(Service::Other))
    }
}

// ---------------------------------------------------------------------------
// ContactForm
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub services: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub services: Service,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Record for ContactForm {
    const COLLECTION: &'static str = "contactforms";
    const TIMESTAMP_FIELD: &'static str = "createdAt";

    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Submission for ContactSubmission {
    type Record = ContactForm;

    fn into_record(self, now: DateTime<Utc>) -> Result<ContactForm, ValidationError> {
        let name = clean(self.name);
        let email = clean_email(self.email);
        let phone = clean(self.phone);
        let company = clean(self.company);
        let services = clean(self.services);
        let message = clean(self.message);

        require(&[
            ("name", &name),
            ("email", &email),
            ("phone", &phone),
            ("company", &company),
            ("services", &services),
            ("message", &message),
        ])?;

        let email = take(email);
        let phone = take(phone);
        let company = take(company);
        check_email(&email)?;
        check_phone(&phone)?;
        check_min_len("company", &company, 2)?;
        let services = Service::parse(&take(services))?;

        Ok(ContactForm {
            name: take(name),
            email,
            phone,
            company,
            services,
            message: take(message),
            created_at: now,
        })
    }
}

// ---------------------------------------------------------------------------
// CareerForm
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CareerSubmission {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub designation: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub experience: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub position: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub resume: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub designation: String,
    pub state: String,
    pub experience: String,
    pub position: String,
    /// Reference to the uploaded resume (URL or encoded file).
    pub resume: String,
    pub created_at: DateTime<Utc>,
}

impl Record for CareerForm {
    const COLLECTION: &'static str = "careers";
    const TIMESTAMP_FIELD: &'static str = "createdAt";

    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Submission for CareerSubmission {
    type Record = CareerForm;

    fn into_record(self, now: DateTime<Utc>) -> Result<CareerForm, ValidationError> {
        let name = clean(self.name);
        let email = clean_email(self.email);
        let phone = clean(self.phone);
        let designation = clean(self.designation);
        let state = clean(self.state);
        let experience = clean(self.experience);
        let position = clean(self.position);
        // The resume may be an encoded file; only emptiness is checked.
        let resume = self.resume.filter(|r| !r.trim().is_empty());

        require(&[
            ("name", &name),
            ("email", &email),
            ("phone", &phone),
            ("designation", &designation),
            ("state", &state),
            ("experience", &experience),
            ("position", &position),
            ("resume", &resume),
        ])?;

        let email = take(email);
        let phone = take(phone);
        check_email(&email)?;
        check_phone(&phone)?;

        Ok(CareerForm {
            name: take(name),
            email,
            phone,
            designation: take(designation),
            state: take(state),
            experience: take(experience),
            position: take(position),
            resume: take(resume),
            created_at: now,
        })
    }
}

// ---------------------------------------------------------------------------
// IconContactForm
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IconContactSubmission {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Record for IconContactForm {
    const COLLECTION: &'static str = "iconforms";
    const TIMESTAMP_FIELD: &'static str = "createdAt";

    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Submission for IconContactSubmission {
    type Record = IconContactForm;

    fn into_record(self, now: DateTime<Utc>) -> Result<IconContactForm, ValidationError> {
        let name = clean(self.name);
        let email = clean_email(self.email);
        let message = clean(self.message);

        require(&[("name", &name), ("email", &email), ("message", &message)])?;

        let email = take(email);
        check_email(&email)?;

        Ok(IconContactForm {
            name: take(name),
            email,
            message: take(message),
            created_at: now,
        })
    }
}

// ---------------------------------------------------------------------------
// Newsletter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewsletterSubmission {
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Newsletter {
    pub email: String,
    pub subscription_date: DateTime<Utc>,
}

impl Record for Newsletter {
    const COLLECTION: &'static str = "newsletters";
    const TIMESTAMP_FIELD: &'static str = "subscriptionDate";
    const UNIQUE_FIELDS: &'static [&'static str] = &["email"];

    fn timestamp(&self) -> DateTime<Utc> {
        self.subscription_date
    }
}

impl Submission for NewsletterSubmission {
    type Record = Newsletter;

    fn into_record(self, now: DateTime<Utc>) -> Result<Newsletter, ValidationError> {
        let email = clean_email(self.email).ok_or(ValidationError::EmailRequired)?;
        check_email(&email)?;

        Ok(Newsletter {
            email,
            subscription_date: now,
        })
    }
}

// ---------------------------------------------------------------------------
// ContactSection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactSectionSubmission {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub services: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSection {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    /// Free text, unlike [`ContactForm::services`].
    pub services: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Record for ContactSection {
    const COLLECTION: &'static str = "contactsections";
    const TIMESTAMP_FIELD: &'static str = "createdAt";

    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Submission for ContactSectionSubmission {
    type Record = ContactSection;

    fn into_record(self, now: DateTime<Utc>) -> Result<ContactSection, ValidationError> {
        let name = clean(self.name);
        let email = clean_email(self.email);
        let phone = clean(self.phone);
        let company = clean(self.company);
        let services = clean(self.services);
        let message = clean(self.message);

        require(&[
            ("name", &name),
            ("email", &email),
            ("phone", &phone),
            ("company", &company),
            ("services", &services),
            ("message", &message),
        ])?;

        let email = take(email);
        let phone = take(phone);
        check_email(&email)?;
        check_phone(&phone)?;

        Ok(ContactSection {
            name: take(name),
            email,
            phone,
            company: take(company),
            services: take(services),
            message: take(message),
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    fn contact() -> ContactSubmission {
        ContactSubmission {
            name: Some(" Priya Nair ".into()),
            email: Some(" Priya@Example.COM ".into()),
            phone: Some("+91 98765 43210".into()),
            company: Some("Nair & Co".into()),
            services: Some("Taxation".into()),
            message: Some("Need help with GST filing".into()),
        }
    }

    #[test]
    fn test_contact_normalises_and_stamps() {
        let record = contact().into_record(now()).unwrap();
        assert_eq!(record.name, "Priya Nair");
        assert_eq!(record.email, "priya@example.com");
        assert_eq!(record.services, Service::Taxation);
        assert_eq!(record.created_at, now());
    }

    #[test]
    fn test_contact_missing_services_is_not_defaulted() {
        let mut submission = contact();
        submission.services = None;
        let err = submission.into_record(now()).unwrap_err();
        assert_eq!(err, ValidationError::MissingFields(vec!["services"]));
    }

    #[test]
    fn test_contact_rejects_unknown_service() {
        for bad in ["Payroll", "taxation", "Accounting, Audit"] {
            let mut submission = contact();
            submission.services = Some(bad.into());
            assert!(matches!(
                submission.into_record(now()),
                Err(ValidationError::InvalidInput { field: "services", .. })
            ));
        }

        let mut submission = contact();
        submission.services = Some(" Other ".into());
        assert_eq!(submission.into_record(now()).unwrap().services, Service::Other);
    }

    #[test]
    fn test_contact_company_min_length() {
        let mut submission = contact();
        submission.company = Some("X".into());
        assert!(matches!(
            submission.into_record(now()),
            Err(ValidationError::InvalidInput { field: "company", .. })
        ));
    }

    #[test]
    fn test_client_timestamp_is_ignored() {
        let payload = serde_json::json!({
            "name": "A", "email": "a@b.co", "message": "hi",
            "createdAt": "1999-01-01T00:00:00Z"
        });
        let submission: IconContactSubmission = serde_json::from_value(payload).unwrap();
        let record = submission.into_record(now()).unwrap();
        assert_eq!(record.created_at, now());
    }

    #[test]
    fn test_career_requires_every_field() {
        let submission = CareerSubmission {
            name: Some("Ravi".into()),
            email: Some("ravi@example.com".into()),
            phone: Some("9876543210".into()),
            ..Default::default()
        };
        let err = submission.into_record(now()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec![
                "designation",
                "state",
                "experience",
                "position",
                "resume"
            ])
        );
    }

    #[test]
    fn test_career_checks_phone() {
        let submission = CareerSubmission {
            name: Some("Ravi".into()),
            email: Some("ravi@example.com".into()),
            phone: Some("123".into()),
            designation: Some("Article Assistant".into()),
            state: Some("Kerala".into()),
            experience: Some("2 years".into()),
            position: Some("Audit".into()),
            resume: Some("https://files.example.com/ravi.pdf".into()),
        };
        assert_eq!(submission.into_record(now()).unwrap_err(), ValidationError::InvalidPhone);
    }

    #[test]
    fn test_newsletter_messages() {
        let err = NewsletterSubmission { email: None }.into_record(now()).unwrap_err();
        assert_eq!(err.to_string(), "Email is required");

        let err = NewsletterSubmission { email: Some("not-an-email".into()) }
            .into_record(now())
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid email address");

        let record = NewsletterSubmission { email: Some("News@Example.com".into()) }
            .into_record(now())
            .unwrap();
        assert_eq!(record.email, "news@example.com");
        assert_eq!(record.subscription_date, now());
    }

    #[test]
    fn test_contact_section_accepts_free_text_services() {
        let submission = ContactSectionSubmission {
            name: Some("Lee".into()),
            email: Some("lee@example.com".into()),
            phone: Some("(555) 123-4567".into()),
            company: Some("L".into()),
            services: Some("Payroll and bookkeeping".into()),
            message: Some("Call me".into()),
        };
        let record = submission.into_record(now()).unwrap();
        assert_eq!(record.services, "Payroll and bookkeeping");
    }

    #[test]
    fn test_service_names_match_stored_form() {
        for service in Service::ALL {
            let value = serde_json::to_value(service).unwrap();
            assert_eq!(value, service.as_str());
            assert_eq!(Service::parse(service.as_str()).unwrap(), service);
        }
    }

    #[test]
    fn test_scalar_fields_accepted_as_text() {
        let payload = serde_json::json!({
            "name": "Ravi",
            "email": "ravi@example.com",
            "phone": 9876543210u64,
            "company": "RK Associates",
            "services": "Audit",
            "message": null,
        });
        let submission: ContactSubmission = serde_json::from_value(payload).unwrap();
        assert_eq!(submission.phone.as_deref(), Some("9876543210"));
        assert_eq!(submission.message, None);

        let err = submission.into_record(now()).unwrap_err();
        assert_eq!(err, ValidationError::MissingFields(vec!["message"]));

        let nested = serde_json::json!({ "email": { "$gt": "" } });
        assert!(serde_json::from_value::<NewsletterSubmission>(nested).is_err());
    }

    #[test]
    fn test_record_serialises_camel_case() {
        let record = contact().into_record(now()).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["services"], "Taxation");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
    }
}
