//! Job posting model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker shown as `posted_time` for postings created in this session.
pub const JUST_NOW: &str = "Just now";

/// Rupees in one lakh; salaries are normalized to lakhs per annum (LPA).
pub const RUPEES_PER_LAKH: f64 = 100_000.0;

// ── Identity ────────────────────────────────────────────────────────

/// Posting identifier.
///
/// Postings created in this process get `Local` ids; postings loaded from the
/// backend keep the backend's `Remote` id. A record never changes scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "scheme", content = "value", rename_all = "snake_case")]
pub enum JobId {
    Local(u64),
    Remote(String),
}

impl JobId {
    /// Backend id, if this posting lives on the backend.
    pub fn as_remote(&self) -> Option<&str> {
        match self {
            JobId::Remote(id) => Some(id),
            JobId::Local(_) => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, JobId::Local(_))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Local(n) => write!(f, "{n}"),
            JobId::Remote(s) => f.write_str(s),
        }
    }
}

// ── Job type ────────────────────────────────────────────────────────

/// Employment type. Values outside the known vocabulary are kept verbatim
/// in `Other` so that imported data is never rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Remote,
    Internship,
    Other(String),
}

impl JobType {
    pub const KNOWN: [JobType; 5] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Remote,
        JobType::Internship,
    ];

    pub fn parse(s: &str) -> Self {
        let norm = s.trim().to_lowercase().replace(['_', ' '], "-");
        match norm.as_str() {
            "full-time" | "fulltime" => JobType::FullTime,
            "part-time" | "parttime" => JobType::PartTime,
            "contract" => JobType::Contract,
            "remote" => JobType::Remote,
            "internship" => JobType::Internship,
            _ => JobType::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Remote => "remote",
            JobType::Internship => "internship",
            JobType::Other(s) => s,
        }
    }
}

impl From<String> for JobType {
    fn from(s: String) -> Self {
        JobType::parse(&s)
    }
}

impl From<JobType> for String {
    fn from(t: JobType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Status ──────────────────────────────────────────────────────────

/// Only published postings appear in the public listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingStatus {
    Published,
    Draft,
}

impl PostingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostingStatus::Published => "published",
            PostingStatus::Draft => "draft",
        }
    }
}

impl fmt::Display for PostingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Compensation ────────────────────────────────────────────────────

/// Salary as shown to the user plus the normalized LPA value used by the
/// salary-range filter.
///
/// The two halves can only be set together, so an edit can never leave the
/// display text and the filter value disagreeing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compensation {
    display: String,
    value: f64,
}

impl Compensation {
    pub fn new(display: impl Into<String>, value: f64) -> Self {
        Self {
            display: display.into(),
            value: sanitize(value),
        }
    }

    /// `22.0` → `"22 LPA"`.
    pub fn lpa(value: f64) -> Self {
        let value = sanitize(value);
        Self {
            display: format!("{} LPA", format_lakhs(value)),
            value,
        }
    }

    /// Salary that is not disclosed; filters as zero.
    pub fn negotiable() -> Self {
        Self {
            display: "Negotiable".to_string(),
            value: 0.0,
        }
    }

    /// From an annual amount in rupees, as typed into the posting form.
    pub fn from_annual_rupees(rupees: u64) -> Self {
        Self::lpa(rupees as f64 / RUPEES_PER_LAKH)
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Default for Compensation {
    fn default() -> Self {
        Self::negotiable()
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Render a lakh amount without trailing zeros: `12.0` → `12`, `12.50` → `12.5`.
pub fn format_lakhs(value: f64) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

// ── Engagement ──────────────────────────────────────────────────────

/// Like flag and counter of a posting, as held locally or reported by the
/// backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub is_liked: bool,
    pub likes_count: u32,
}

// ── Posting ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub logo: Option<String>,
    pub description: String,
    pub location: String,
    pub experience: String,
    pub job_type: JobType,
    pub compensation: Compensation,
    pub status: PostingStatus,
    /// Relative display text ("2h Ago"), fixed when the record is created.
    pub posted_time: String,
    pub created_at: DateTime<Utc>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub is_liked: bool,
    pub likes_count: u32,
}

impl JobPosting {
    pub fn is_published(&self) -> bool {
        self.status == PostingStatus::Published
    }

    pub fn like_state(&self) -> LikeState {
        LikeState {
            is_liked: self.is_liked,
            likes_count: self.likes_count,
        }
    }
}

/// Fields supplied by the caller when adding a posting. The store assigns
/// id, creation time and `posted_time`; engagement starts at zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub logo: Option<String>,
    pub description: String,
    pub location: String,
    pub experience: String,
    pub job_type: JobType,
    pub compensation: Compensation,
    pub status: Option<PostingStatus>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
}

impl JobDraft {
    pub(crate) fn into_posting(self, id: JobId, now: DateTime<Utc>) -> JobPosting {
        JobPosting {
            id,
            title: self.title,
            company: self.company,
            logo: self.logo,
            description: self.description,
            location: self.location,
            experience: self.experience,
            job_type: self.job_type,
            compensation: self.compensation,
            status: self.status.unwrap_or(PostingStatus::Draft),
            posted_time: JUST_NOW.to_string(),
            created_at: now,
            application_deadline: self.application_deadline,
            requirements: self.requirements,
            responsibilities: self.responsibilities,
            is_liked: false,
            likes_count: 0,
        }
    }
}

/// Partial update. Identity, creation time, `posted_time` and engagement
/// are deliberately absent: they cannot be patched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub job_type: Option<JobType>,
    pub compensation: Option<Compensation>,
    pub status: Option<PostingStatus>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        *self == JobPatch::default()
    }

    pub fn apply_to(self, job: &mut JobPosting) {
        if let Some(v) = self.title {
            job.title = v;
        }
        if let Some(v) = self.company {
            job.company = v;
        }
        if let Some(v) = self.logo {
            job.logo = Some(v);
        }
        if let Some(v) = self.description {
            job.description = v;
        }
        if let Some(v) = self.location {
            job.location = v;
        }
        if let Some(v) = self.experience {
            job.experience = v;
        }
        if let Some(v) = self.job_type {
            job.job_type = v;
        }
        if let Some(v) = self.compensation {
            job.compensation = v;
        }
        if let Some(v) = self.status {
            job.status = v;
        }
        if let Some(v) = self.application_deadline {
            job.application_deadline = Some(v);
        }
        if let Some(v) = self.requirements {
            job.requirements = Some(v);
        }
        if let Some(v) = self.responsibilities {
            job.responsibilities = Some(v);
        }
    }
}
