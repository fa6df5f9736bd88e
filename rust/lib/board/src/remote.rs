//! Backend job records → [`JobPosting`].
//!
//! The backend's payloads are loosely shaped: envelopes vary, field names come
//! in snake_case and camelCase, numbers sometimes arrive as strings. Parsing
//! works on `serde_json::Value` and falls back field by field instead of
//! rejecting a whole page.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::error::BoardError;
use crate::form::company_logo;
use crate::model::{
    format_lakhs, Compensation, JobId, JobPosting, JobType, PostingStatus, JUST_NOW,
    RUPEES_PER_LAKH,
};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const DEFAULT_EXPERIENCE: &str = "2-5 yr Exp";
pub const COMPETITIVE_SALARY: &str = "Competitive Salary";

/// One page of raw job records plus pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RemotePage {
    pub records: Vec<Value>,
    pub total: usize,
    pub page: u32,
    pub total_pages: u32,
}

// ── Envelope ────────────────────────────────────────────────────────

/// Locate the job list in a list response.
///
/// Accepts a bare array, `{jobs}`, `{data: [...]}`, `{data: {jobs}}`,
/// `{items}` and `{results}`. Anything else is a shape error.
pub fn parse_job_page(body: &Value) -> Result<RemotePage, BoardError> {
    let (records, meta) = match body {
        Value::Array(items) => (items.clone(), None),
        Value::Object(_) => {
            let found = ["jobs", "data", "items", "results"]
                .iter()
                .find_map(|key| body.get(*key).and_then(Value::as_array).map(|a| (a, body)))
                .or_else(|| {
                    let data = body.get("data")?;
                    data.get("jobs").and_then(Value::as_array).map(|a| (a, data))
                });
            match found {
                Some((items, meta)) => (items.clone(), Some(meta)),
                None => return Err(BoardError::Shape("no job list in response".into())),
            }
        }
        _ => return Err(BoardError::Shape(format!("expected object or array, got {body}"))),
    };

    let len = records.len();
    let lookup = |names: &[&str]| meta.and_then(|m| number(m, names).or_else(|| number(body, names)));
    let total = lookup(&["total", "count", "totalCount"])
        .map(|n| n as usize)
        .unwrap_or(len);
    let page = lookup(&["page", "currentPage"])
        .map(|n| n as u32)
        .filter(|p| *p > 0)
        .unwrap_or(1);
    let total_pages = lookup(&["totalPages", "total_pages", "pages"])
        .map(|n| n as u32)
        .unwrap_or(1);

    Ok(RemotePage {
        records,
        total,
        page,
        total_pages,
    })
}

// ── Records ─────────────────────────────────────────────────────────

/// Transform every record of a page, skipping the ones without an id.
pub fn transform_page(page: &RemotePage, now: DateTime<Utc>) -> Vec<JobPosting> {
    page.records
        .iter()
        .filter_map(|rec| {
            let job = to_posting(rec, now);
            if job.is_none() {
                warn!(record = %rec, "skipping job record without id");
            }
            job
        })
        .collect()
}

/// Transform one backend record. `None` when the record has no usable id.
pub fn to_posting(rec: &Value, now: DateTime<Utc>) -> Option<JobPosting> {
    let id = match field(rec, &["id", "_id", "job_id"])? {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    let title = text(rec, &["title", "job_title"]).unwrap_or_else(|| UNKNOWN_TITLE.to_string());
    let company =
        text(rec, &["company", "company_name", "companyName"]).unwrap_or_else(|| UNKNOWN_COMPANY.to_string());
    let logo = text(rec, &["logo", "logo_url", "company_logo"]).unwrap_or_else(|| company_logo(&company).to_string());

    let created = text(rec, &["created_at", "createdAt", "posted_at"])
        .as_deref()
        .and_then(parse_timestamp);
    let (created_at, posted_time) = match created {
        Some(at) => (at, posted_time_since(at, now)),
        None => (now, JUST_NOW.to_string()),
    };

    let likes_count = number(rec, &["likes_count", "likesCount"])
        .map(|n| n.clamp(0.0, u32::MAX as f64) as u32)
        .unwrap_or(0);

    Some(JobPosting {
        id: JobId::Remote(id),
        title,
        logo: Some(logo),
        company,
        description: text(rec, &["description", "job_description"]).unwrap_or_default(),
        location: text(rec, &["location", "job_location"]).unwrap_or_else(|| "Not specified".to_string()),
        experience: text(rec, &["experience", "experience_level"])
            .unwrap_or_else(|| DEFAULT_EXPERIENCE.to_string()),
        job_type: text(rec, &["job_type", "jobType", "type"])
            .map(|t| JobType::parse(&t))
            .unwrap_or_default(),
        compensation: compensation(rec),
        status: status(rec),
        posted_time,
        created_at,
        application_deadline: text(rec, &["application_deadline", "applicationDeadline", "deadline"])
            .as_deref()
            .and_then(parse_timestamp),
        requirements: text(rec, &["requirements"]),
        responsibilities: text(rec, &["responsibilities"]),
        is_liked: flag(rec, &["is_liked", "isLiked"]).unwrap_or(false),
        likes_count,
    })
}

/// Remote record status: open/published/active are listed, a missing status
/// counts as published, anything else is a draft.
fn status(rec: &Value) -> PostingStatus {
    match text(rec, &["status"]) {
        None => PostingStatus::Published,
        Some(s) => match s.to_lowercase().as_str() {
            "open" | "published" | "active" => PostingStatus::Published,
            _ => PostingStatus::Draft,
        },
    }
}

fn compensation(rec: &Value) -> Compensation {
    let min = number(rec, &["salary_min", "salaryMin", "min_salary"]).filter(|n| *n > 0.0);
    let max = number(rec, &["salary_max", "salaryMax", "max_salary"]).filter(|n| *n > 0.0);

    let display = match rec.get("salary").and_then(Value::as_str).map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => salary_display(min, max),
    };

    let value = number(rec, &["salary_value", "salaryValue"])
        .or_else(|| min.map(|n| n / RUPEES_PER_LAKH))
        .or_else(|| max.map(|n| n / RUPEES_PER_LAKH))
        .or_else(|| leading_number(&display))
        .unwrap_or(0.0);

    Compensation::new(display, value)
}

/// Display text from rupee bounds.
pub fn salary_display(min: Option<f64>, max: Option<f64>) -> String {
    let lakhs = |n: f64| format_lakhs(n / RUPEES_PER_LAKH);
    match (min, max) {
        (Some(lo), Some(hi)) => format!("₹{}-{} LPA", lakhs(lo), lakhs(hi)),
        (Some(lo), None) => format!("₹{}+ LPA", lakhs(lo)),
        (None, Some(hi)) => format!("Up to ₹{} LPA", lakhs(hi)),
        (None, None) => COMPETITIVE_SALARY.to_string(),
    }
}

/// `"₹12-18 LPA"` → `12.0`.
fn leading_number(s: &str) -> Option<f64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

/// `"{h}h Ago"` under a day, `"{d}d Ago"` otherwise. Future timestamps
/// count as zero hours.
pub fn posted_time_since(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - created).num_hours().max(0);
    if hours < 24 {
        format!("{hours}h Ago")
    } else {
        format!("{}d Ago", hours / 24)
    }
}

/// RFC 3339, or a naive `YYYY-MM-DD HH:MM:SS` / ISO timestamp taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

// ── Field access ────────────────────────────────────────────────────

/// First present, non-null field among `names`.
fn field<'a>(rec: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|n| rec.get(*n).filter(|v| !v.is_null()))
}

/// Non-blank string (numbers are stringified).
fn text(rec: &Value, names: &[&str]) -> Option<String> {
    names.iter().find_map(|n| match rec.get(*n)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Finite number, accepting numeric strings.
fn number(rec: &Value, names: &[&str]) -> Option<f64> {
    names
        .iter()
        .find_map(|n| match rec.get(*n)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .filter(|n: &f64| n.is_finite())
}

fn flag(rec: &Value, names: &[&str]) -> Option<bool> {
    names.iter().find_map(|n| match rec.get(*n)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    // ========================================================================
    // Envelopes
    // ========================================================================

    #[test]
    fn accepts_known_envelopes() {
        let rec = json!({"id": 1, "title": "A"});
        let bodies = [
            json!([rec]),
            json!({"jobs": [rec], "total": 1, "page": 1, "totalPages": 1}),
            json!({"data": [rec]}),
            json!({"data": {"jobs": [rec], "total": 1}}),
            json!({"items": [rec]}),
            json!({"results": [rec]}),
        ];
        for body in bodies {
            let page = parse_job_page(&body).unwrap();
            assert_eq!(page.records.len(), 1, "{body}");
            assert_eq!(page.total, 1);
        }
    }

    #[test]
    fn pagination_metadata() {
        let body = json!({"jobs": [], "total": "120", "page": 3, "total_pages": 6});
        let page = parse_job_page(&body).unwrap();
        assert_eq!(page.total, 120);
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 6);

        let page = parse_job_page(&json!({"data": {"jobs": [], "count": 4}})).unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn unknown_envelope_is_shape_error() {
        for body in [json!({"message": "ok"}), json!("jobs"), json!(null), json!({"data": 3})] {
            assert!(matches!(parse_job_page(&body), Err(BoardError::Shape(_))), "{body}");
        }
    }

    // ========================================================================
    // Field aliases
    // ========================================================================

    #[test]
    fn job_title_alias_is_used() {
        let job = to_posting(&json!({"id": "7", "job_title": "Platform Engineer"}), now()).unwrap();
        assert_eq!(job.title, "Platform Engineer");
        assert_eq!(job.id, JobId::Remote("7".into()));
    }

    #[test]
    fn title_falls_back_only_when_both_absent() {
        let job = to_posting(&json!({"id": 1}), now()).unwrap();
        assert_eq!(job.title, UNKNOWN_TITLE);
        assert_eq!(job.company, UNKNOWN_COMPANY);

        let job = to_posting(&json!({"id": 1, "title": "  ", "job_title": "SRE"}), now()).unwrap();
        assert_eq!(job.title, "SRE");
    }

    #[test]
    fn company_name_alias_and_logo() {
        let job = to_posting(&json!({"id": 1, "company_name": "Google"}), now()).unwrap();
        assert_eq!(job.company, "Google");
        assert_eq!(job.logo.as_deref(), Some("/google-logo.svg"));
    }

    #[test]
    fn record_without_id_is_skipped() {
        let page = parse_job_page(&json!([
            {"title": "no id"},
            {"id": "", "title": "blank id"},
            {"id": 2, "title": "ok"}
        ]))
        .unwrap();
        let jobs = transform_page(&page, now());
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "ok");
    }

    #[test]
    fn engagement_fields() {
        let job = to_posting(&json!({"id": 1, "isLiked": true, "likesCount": "41"}), now()).unwrap();
        assert!(job.is_liked);
        assert_eq!(job.likes_count, 41);

        let job = to_posting(&json!({"id": 1, "likes_count": -5}), now()).unwrap();
        assert_eq!(job.likes_count, 0);
        assert!(!job.is_liked);
    }

    // ========================================================================
    // Status
    // ========================================================================

    #[test]
    fn status_mapping() {
        let st = |v: Value| to_posting(&v, now()).unwrap().status;
        assert_eq!(st(json!({"id": 1, "status": "open"})), PostingStatus::Published);
        assert_eq!(st(json!({"id": 1, "status": "Active"})), PostingStatus::Published);
        assert_eq!(st(json!({"id": 1})), PostingStatus::Published);
        assert_eq!(st(json!({"id": 1, "status": "closed"})), PostingStatus::Draft);
    }

    // ========================================================================
    // Salary
    // ========================================================================

    #[test]
    fn salary_from_min_and_max() {
        let job = to_posting(
            &json!({"id": 1, "salary_min": 1200000, "salary_max": 1800000}),
            now(),
        )
        .unwrap();
        assert_eq!(job.compensation.display(), "₹12-18 LPA");
        assert_eq!(job.compensation.value(), 12.0);
    }

    #[test]
    fn salary_display_variants() {
        assert_eq!(salary_display(Some(500000.0), None), "₹5+ LPA");
        assert_eq!(salary_display(None, Some(2500000.0)), "Up to ₹25 LPA");
        assert_eq!(salary_display(None, None), COMPETITIVE_SALARY);

        let job = to_posting(&json!({"id": 1, "salary_max": "2500000"}), now()).unwrap();
        assert_eq!(job.compensation.value(), 25.0);
    }

    #[test]
    fn preformatted_salary_wins() {
        let job = to_posting(&json!({"id": 1, "salary": "22 LPA"}), now()).unwrap();
        assert_eq!(job.compensation.display(), "22 LPA");
        assert_eq!(job.compensation.value(), 22.0);

        let job = to_posting(
            &json!({"id": 1, "salary": "₹10-15 LPA", "salaryValue": 15}),
            now(),
        )
        .unwrap();
        assert_eq!(job.compensation.value(), 15.0);
    }

    #[test]
    fn no_salary_filters_as_zero() {
        let job = to_posting(&json!({"id": 1}), now()).unwrap();
        assert_eq!(job.compensation.display(), COMPETITIVE_SALARY);
        assert_eq!(job.compensation.value(), 0.0);
    }

    // ========================================================================
    // Timestamps
    // ========================================================================

    #[test]
    fn posted_time_buckets() {
        let n = now();
        assert_eq!(posted_time_since(n - Duration::minutes(20), n), "0h Ago");
        assert_eq!(posted_time_since(n - Duration::hours(5), n), "5h Ago");
        assert_eq!(posted_time_since(n - Duration::hours(23), n), "23h Ago");
        assert_eq!(posted_time_since(n - Duration::hours(24), n), "1d Ago");
        assert_eq!(posted_time_since(n - Duration::days(9), n), "9d Ago");
        assert_eq!(posted_time_since(n + Duration::hours(3), n), "0h Ago");
    }

    #[test]
    fn created_at_formats() {
        let job = to_posting(&json!({"id": 1, "created_at": "2024-06-01T07:00:00Z"}), now()).unwrap();
        assert_eq!(job.posted_time, "5h Ago");

        let job = to_posting(&json!({"id": 1, "createdAt": "2024-05-29 12:00:00"}), now()).unwrap();
        assert_eq!(job.posted_time, "3d Ago");
    }

    #[test]
    fn missing_or_bad_created_at_is_just_now() {
        for rec in [json!({"id": 1}), json!({"id": 1, "created_at": "yesterday"})] {
            let job = to_posting(&rec, now()).unwrap();
            assert_eq!(job.posted_time, JUST_NOW);
            assert_eq!(job.created_at, now());
        }
    }

    #[test]
    fn defaults_for_missing_fields() {
        let job = to_posting(&json!({"id": 1, "job_type": "Contract"}), now()).unwrap();
        assert_eq!(job.experience, DEFAULT_EXPERIENCE);
        assert_eq!(job.job_type, JobType::Contract);
        assert_eq!(job.description, "");
    }
}
