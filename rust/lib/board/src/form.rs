//! Employer posting form and job application form.
//!
//! Both validate everything up front and report all failing fields at once;
//! nothing is mutated or sent until validation passes.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ValidationErrors;
use crate::model::{Compensation, JobDraft, JobPosting, JobType, PostingStatus, RUPEES_PER_LAKH};
use crate::remote::parse_timestamp;

pub const DEFAULT_LOCATION: &str = "Remote";
pub const DEFAULT_EXPERIENCE: &str = "1-3 yr Exp";
pub const DRAFT_DESCRIPTION: &str = "Job description to be updated.";
pub const PLACEHOLDER_LOGO: &str = "/placeholder.svg";

/// Largest accepted resume upload.
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

const COMPANY_LOGOS: &[(&str, &str)] = &[
    ("amazon", "/amazon-logo.png"),
    ("tesla", "/tesla-logo.png"),
    ("swiggy", "/swiggy-logo-orange.jpg"),
    ("google", "/google-logo.svg"),
    ("meta", "/meta-logo.svg"),
    ("microsoft", "/microsoft-logo.svg"),
    ("apple", "/apple-logo.svg"),
    ("flipkart", "/flipkart-logo.svg"),
    ("adobe", "/adobe-logo.svg"),
    ("zomato", "/zomato-logo.svg"),
    ("paytm", "/paytm-logo.svg"),
    ("infosys", "/infosys-logo.svg"),
    ("hubspot", "/hubspot-logo.svg"),
    ("salesforce", "/salesforce-logo.svg"),
    ("goldman sachs", "/goldman-sachs-logo.svg"),
    ("uber", "/uber-logo.svg"),
    ("byju's", "/byjus-logo.svg"),
    ("ibm", "/ibm-logo.svg"),
    ("tcs", "/tcs-logo.svg"),
];

/// Logo path for a company name (case-insensitive), placeholder otherwise.
pub fn company_logo(company: &str) -> &'static str {
    let key = company.trim().to_lowercase();
    COMPANY_LOGOS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, logo)| *logo)
        .unwrap_or(PLACEHOLDER_LOGO)
}

// ── Posting form ────────────────────────────────────────────────────

/// Raw employer input. Salaries are annual rupee amounts as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobForm {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub salary_min: String,
    pub salary_max: String,
    /// `YYYY-MM-DD` or a full timestamp; blank for none.
    pub application_deadline: String,
    pub description: String,
    pub requirements: String,
    pub responsibilities: String,
}

impl JobForm {
    /// Validate for saving with `status` and build the draft.
    ///
    /// Drafts need a title and company; publishing also needs a description.
    pub fn to_draft(&self, status: PostingStatus) -> Result<JobDraft, ValidationErrors> {
        let mut errs = ValidationErrors::new();

        let title = self.title.trim();
        let company = self.company.trim();
        let description = self.description.trim();
        if title.is_empty() {
            errs.add("title", "Job title is required");
        }
        if company.is_empty() {
            errs.add("company", "Company name is required");
        }
        if status == PostingStatus::Published && description.is_empty() {
            errs.add("description", "Job description is required to publish");
        }

        let min = parse_rupees(&self.salary_min, "salary_min", &mut errs);
        let max = parse_rupees(&self.salary_max, "salary_max", &mut errs);
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                errs.add("salary_min", "Minimum salary cannot exceed maximum salary");
            }
        }

        let deadline = match self.application_deadline.trim() {
            "" => None,
            s => {
                let parsed = parse_deadline(s);
                if parsed.is_none() {
                    errs.add("application_deadline", "Deadline must be a date like 2025-01-31");
                }
                parsed
            }
        };

        errs.into_result()?;

        let compensation = match max {
            Some(hi) => Compensation::lpa(hi as f64 / RUPEES_PER_LAKH),
            None => Compensation::negotiable(),
        };

        Ok(JobDraft {
            title: title.to_string(),
            company: company.to_string(),
            logo: Some(company_logo(company).to_string()),
            description: if description.is_empty() {
                DRAFT_DESCRIPTION.to_string()
            } else {
                description.to_string()
            },
            location: non_blank(&self.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            experience: DEFAULT_EXPERIENCE.to_string(),
            job_type: non_blank(&self.job_type)
                .map(|t| JobType::parse(&t))
                .unwrap_or_default(),
            compensation,
            status: Some(status),
            application_deadline: deadline,
            requirements: non_blank(&self.requirements),
            responsibilities: non_blank(&self.responsibilities),
        })
    }
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Blank is `None`; digits with optional `,`/`_` separators otherwise.
fn parse_rupees(raw: &str, field: &'static str, errs: &mut ValidationErrors) -> Option<u64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            errs.add(field, "Salary must be a whole number of rupees");
            None
        }
    }
}

fn parse_deadline(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    parse_timestamp(s)
}

// ── Application form ────────────────────────────────────────────────

/// Resume attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resume {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Resume {
    /// Content type is derived from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Accepts PDF and Word documents.
    pub fn is_document(&self) -> bool {
        let ct = self.content_type.to_lowercase();
        ct.contains("pdf") || ct.contains("doc") || ct.contains("msword")
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub experience: String,
    pub current_company: String,
    pub current_role: String,
    pub notice_period: String,
    pub expected_salary: String,
    pub cover_letter: String,
    pub linkedin_profile: String,
    pub portfolio_website: String,
    pub why_interested: String,
    pub available_for_interview: String,
    pub resume: Option<Resume>,
}

impl ApplicationForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();

        if self.full_name.trim().is_empty() {
            errs.add("full_name", "Full name is required");
        }
        if self.email.trim().is_empty() {
            errs.add("email", "Email is required");
        } else if !looks_like_email(&self.email) {
            errs.add("email", "Email is invalid");
        }
        if self.phone.trim().is_empty() {
            errs.add("phone", "Phone number is required");
        } else if !looks_like_phone(&self.phone) {
            errs.add("phone", "Phone number is invalid");
        }
        if self.experience.trim().is_empty() {
            errs.add("experience", "Experience level is required");
        }
        if self.notice_period.trim().is_empty() {
            errs.add("notice_period", "Notice period is required");
        }
        if self.expected_salary.trim().is_empty() {
            errs.add("expected_salary", "Expected salary is required");
        }
        match &self.resume {
            None => errs.add("resume", "Resume is required"),
            Some(r) if r.bytes.len() > MAX_RESUME_BYTES => {
                errs.add("resume", "File size should be less than 5MB")
            }
            Some(r) if !r.is_document() => errs.add("resume", "Please upload PDF or DOC file only"),
            Some(_) => {}
        }
        if self.why_interested.trim().is_empty() {
            errs.add("why_interested", "Please tell us why you're interested");
        }
        if self.available_for_interview.trim().is_empty() {
            errs.add("available_for_interview", "Interview availability is required");
        }

        errs.into_result()
    }

    /// Validate and bind to `job`.
    pub fn into_application(self, job: &JobPosting) -> Result<Application, ValidationErrors> {
        self.validate()?;
        let Some(resume) = self.resume else {
            let mut errs = ValidationErrors::new();
            errs.add("resume", "Resume is required");
            return Err(errs);
        };
        Ok(Application {
            job_id: job.id.to_string(),
            job_title: job.title.clone(),
            company: job.company.clone(),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            experience: self.experience,
            current_company: self.current_company,
            current_role: self.current_role,
            notice_period: self.notice_period,
            expected_salary: self.expected_salary,
            cover_letter: self.cover_letter,
            linkedin_profile: self.linkedin_profile,
            portfolio_website: self.portfolio_website,
            why_interested: self.why_interested,
            available_for_interview: self.available_for_interview,
            resume,
        })
    }
}

/// Something`@`something`.`something, no whitespace.
fn looks_like_email(s: &str) -> bool {
    let s = s.trim();
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Digits, spaces, `-`, `(`, `)`, with an optional leading `+`.
fn looks_like_phone(s: &str) -> bool {
    let s = s.trim();
    let body = s.strip_prefix('+').unwrap_or(s);
    !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-' || c == '(' || c == ')')
}

/// A validated application bound to one posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub job_id: String,
    pub job_title: String,
    pub company: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub experience: String,
    pub current_company: String,
    pub current_role: String,
    pub notice_period: String,
    pub expected_salary: String,
    pub cover_letter: String,
    pub linkedin_profile: String,
    pub portfolio_website: String,
    pub why_interested: String,
    pub available_for_interview: String,
    pub resume: Resume,
}

impl Application {
    /// Text parts of the multipart submission, named as the backend expects.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("jobId", self.job_id.as_str()),
            ("jobTitle", self.job_title.as_str()),
            ("company", self.company.as_str()),
            ("fullName", self.full_name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("experience", self.experience.as_str()),
            ("currentCompany", self.current_company.as_str()),
            ("currentRole", self.current_role.as_str()),
            ("noticePeriod", self.notice_period.as_str()),
            ("expectedSalary", self.expected_salary.as_str()),
            ("coverLetter", self.cover_letter.as_str()),
            ("linkedinProfile", self.linkedin_profile.as_str()),
            ("portfolioWebsite", self.portfolio_website.as_str()),
            ("whyInterested", self.why_interested.as_str()),
            ("availableForInterview", self.available_for_interview.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterSpec, SalaryRange};
    use crate::model::JobId;

    fn form() -> JobForm {
        JobForm {
            title: "Backend Engineer".into(),
            company: "Acme".into(),
            ..Default::default()
        }
    }

    fn application() -> ApplicationForm {
        ApplicationForm {
            full_name: "Priya Sharma".into(),
            email: "priya@example.com".into(),
            phone: "+91 (98) 765-43210".into(),
            experience: "3-5".into(),
            notice_period: "30 days".into(),
            expected_salary: "18 LPA".into(),
            why_interested: "Great team".into(),
            available_for_interview: "yes".into(),
            resume: Some(Resume::new("cv.pdf", vec![0u8; 1024])),
            ..Default::default()
        }
    }

    // ========================================================================
    // Posting form
    // ========================================================================

    #[test]
    fn draft_needs_title_and_company() {
        let errs = JobForm::default().to_draft(PostingStatus::Draft).unwrap_err();
        assert_eq!(errs.get("title"), Some("Job title is required"));
        assert_eq!(errs.get("company"), Some("Company name is required"));
        assert!(errs.get("description").is_none());
    }

    #[test]
    fn publish_needs_description() {
        let errs = form().to_draft(PostingStatus::Published).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs.get("description").is_some());

        let ok = JobForm {
            description: "Build APIs".into(),
            ..form()
        }
        .to_draft(PostingStatus::Published)
        .unwrap();
        assert_eq!(ok.status, Some(PostingStatus::Published));
        assert_eq!(ok.description, "Build APIs");
    }

    #[test]
    fn draft_defaults() {
        let d = form().to_draft(PostingStatus::Draft).unwrap();
        assert_eq!(d.location, DEFAULT_LOCATION);
        assert_eq!(d.experience, DEFAULT_EXPERIENCE);
        assert_eq!(d.job_type, JobType::FullTime);
        assert_eq!(d.description, DRAFT_DESCRIPTION);
        assert_eq!(d.compensation.display(), "Negotiable");
        assert_eq!(d.compensation.value(), 0.0);
        assert_eq!(d.logo.as_deref(), Some(PLACEHOLDER_LOGO));
        assert!(d.requirements.is_none());
    }

    #[test]
    fn compensation_from_salary_max() {
        let d = JobForm {
            salary_min: "1,000,000".into(),
            salary_max: "1250000".into(),
            job_type: "contract".into(),
            company: "Google".into(),
            ..form()
        }
        .to_draft(PostingStatus::Draft)
        .unwrap();
        assert_eq!(d.compensation.value(), 12.5);
        assert_eq!(d.compensation.display(), "12.5 LPA");

        // What is shown is what the salary filter sees.
        let job = d.clone().into_posting(JobId::Local(1), Utc::now());
        let filter = |min: f64| FilterSpec {
            salary: SalaryRange::new(min, 50.0),
            ..Default::default()
        };
        assert!(filter(12.5).matches_salary(&job));
        assert!(!filter(13.0).matches_salary(&job));
        assert_eq!(d.job_type, JobType::Contract);
        assert_eq!(d.logo.as_deref(), Some("/google-logo.svg"));
    }

    #[test]
    fn bad_salary_and_deadline_rejected() {
        let errs = JobForm {
            salary_min: "lots".into(),
            salary_max: "".into(),
            application_deadline: "next week".into(),
            ..form()
        }
        .to_draft(PostingStatus::Draft)
        .unwrap_err();
        assert!(errs.get("salary_min").is_some());
        assert!(errs.get("application_deadline").is_some());

        let errs = JobForm {
            salary_min: "2000000".into(),
            salary_max: "1000000".into(),
            ..form()
        }
        .to_draft(PostingStatus::Draft)
        .unwrap_err();
        assert!(errs.get("salary_min").is_some());
    }

    #[test]
    fn deadline_date_parses() {
        let d = JobForm {
            application_deadline: "2025-01-31".into(),
            ..form()
        }
        .to_draft(PostingStatus::Draft)
        .unwrap();
        assert_eq!(
            d.application_deadline.map(|dt| dt.to_rfc3339()),
            Some("2025-01-31T00:00:00+00:00".to_string())
        );
    }

    // ========================================================================
    // Application form
    // ========================================================================

    #[test]
    fn valid_application_passes() {
        assert!(application().validate().is_ok());
    }

    #[test]
    fn empty_application_reports_every_required_field() {
        let errs = ApplicationForm::default().validate().unwrap_err();
        for field in [
            "full_name",
            "email",
            "phone",
            "experience",
            "notice_period",
            "expected_salary",
            "resume",
            "why_interested",
            "available_for_interview",
        ] {
            assert!(errs.get(field).is_some(), "missing {field}");
        }
        assert_eq!(errs.len(), 9);
    }

    #[test]
    fn email_shape() {
        for bad in ["priya", "priya@example", "@example.com", "pri ya@example.com", "priya@.com"] {
            let f = ApplicationForm {
                email: bad.into(),
                ..application()
            };
            assert_eq!(
                f.validate().unwrap_err().get("email"),
                Some("Email is invalid"),
                "{bad}"
            );
        }
    }

    #[test]
    fn phone_shape() {
        assert!(looks_like_phone("+1 (555) 010-9999"));
        assert!(looks_like_phone("9876543210"));
        assert!(!looks_like_phone("+"));
        assert!(!looks_like_phone("98765x3210"));
        assert!(!looks_like_phone("12+34"));
    }

    #[test]
    fn resume_limits() {
        let big = ApplicationForm {
            resume: Some(Resume::new("cv.pdf", vec![0u8; MAX_RESUME_BYTES + 1])),
            ..application()
        };
        assert_eq!(
            big.validate().unwrap_err().get("resume"),
            Some("File size should be less than 5MB")
        );

        let image = ApplicationForm {
            resume: Some(Resume::new("me.png", vec![1, 2, 3])),
            ..application()
        };
        assert_eq!(
            image.validate().unwrap_err().get("resume"),
            Some("Please upload PDF or DOC file only")
        );

        assert!(Resume::new("cv.DOCX", vec![]).is_document());
        assert!(Resume::new("cv.doc", vec![]).is_document());
    }

    #[test]
    fn application_binds_to_posting() {
        let job = form()
            .to_draft(PostingStatus::Draft)
            .unwrap()
            .into_posting(JobId::Remote("abc".into()), Utc::now());

        let app = application().into_application(&job).unwrap();
        assert_eq!(app.job_id, "abc");
        assert_eq!(app.job_title, "Backend Engineer");
        assert_eq!(app.company, "Acme");

        let fields = app.fields();
        assert!(fields.contains(&("fullName", "Priya Sharma")));
        assert!(fields.contains(&("jobId", "abc")));
        assert_eq!(fields.len(), 16);
    }
}
