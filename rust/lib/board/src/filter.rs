//! Filter engine: narrows the collection to the public listing.
//!
//! All predicates are total. A posting is listed when it is published and
//! passes search, location, job type and salary; order is preserved.

use serde::{Deserialize, Serialize};

use crate::model::{JobPosting, JobType};

/// Default upper bound of the salary slider, in LPA.
pub const DEFAULT_SALARY_MAX: f64 = 50.0;

/// Location filter. `All` bypasses; `Contains` holds a lowercased needle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationFilter {
    #[default]
    All,
    Contains(String),
}

impl LocationFilter {
    /// `"all"` (any case) or blank input means no filtering.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            LocationFilter::All
        } else {
            LocationFilter::Contains(s.to_lowercase())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobTypeFilter {
    #[default]
    All,
    Only(JobType),
}

impl JobTypeFilter {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            JobTypeFilter::All
        } else {
            JobTypeFilter::Only(JobType::parse(s))
        }
    }
}

/// Inclusive salary bounds in LPA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    min: f64,
    max: f64,
}

impl SalaryRange {
    /// Bounds given in either order are normalized to `min <= max`.
    pub fn new(a: f64, b: f64) -> Self {
        let a = finite_or(a, 0.0);
        let b = finite_or(b, DEFAULT_SALARY_MAX);
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for SalaryRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: DEFAULT_SALARY_MAX,
        }
    }
}

fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}

/// The user's current filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub search: String,
    pub location: LocationFilter,
    pub job_type: JobTypeFilter,
    pub salary: SalaryRange,
}

impl FilterSpec {
    pub fn matches_status(&self, job: &JobPosting) -> bool {
        job.is_published()
    }

    /// Case-insensitive substring against title or company. Surrounding
    /// whitespace in the query is ignored; an empty query matches all.
    pub fn matches_search(&self, job: &JobPosting) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        job.title.to_lowercase().contains(&needle) || job.company.to_lowercase().contains(&needle)
    }

    pub fn matches_location(&self, job: &JobPosting) -> bool {
        match &self.location {
            LocationFilter::All => true,
            LocationFilter::Contains(needle) => job.location.to_lowercase().contains(needle.as_str()),
        }
    }

    pub fn matches_job_type(&self, job: &JobPosting) -> bool {
        match &self.job_type {
            JobTypeFilter::All => true,
            JobTypeFilter::Only(t) => &job.job_type == t,
        }
    }

    pub fn matches_salary(&self, job: &JobPosting) -> bool {
        self.salary.contains(job.compensation.value())
    }

    pub fn matches(&self, job: &JobPosting) -> bool {
        self.matches_status(job)
            && self.matches_search(job)
            && self.matches_location(job)
            && self.matches_job_type(job)
            && self.matches_salary(job)
    }

    /// Listed subset of `jobs`, in collection order.
    pub fn apply(&self, jobs: &[JobPosting]) -> Vec<JobPosting> {
        jobs.iter().filter(|j| self.matches(j)).cloned().collect()
    }

    /// One-line result summary: `Showing 3 jobs for "rust"`.
    pub fn summary(&self, count: usize) -> String {
        let noun = if count == 1 { "job" } else { "jobs" };
        let query = self.search.trim();
        if query.is_empty() {
            format!("Showing {count} {noun}")
        } else {
            format!("Showing {count} {noun} for \"{query}\"")
        }
    }
}
