//! Job board core.
//!
//! - [`JobStore`]: the authoritative collection of postings with revision
//!   tracking and change subscriptions.
//! - [`FilterSpec`]: the pure filter engine behind the public listing.
//! - [`JobBoard`]: the state container a front end drives (filtering,
//!   backend sync, fallback cache, notices).
//! - [`JobBackend`]: the seam to the external HTTP backend.

pub mod backend;
pub mod board;
pub mod error;
pub mod filter;
pub mod form;
pub mod listing;
pub mod model;
pub mod remote;
pub mod sample;
pub mod store;

pub use backend::{ApplicationReceipt, JobBackend, JobQuery};
pub use board::{JobBoard, Notice, NoticeLevel, Restored, JOBS_SNAPSHOT};
pub use error::{BackendError, BoardError, ValidationErrors};
pub use filter::{FilterSpec, JobTypeFilter, LocationFilter, SalaryRange};
pub use form::{Application, ApplicationForm, JobForm, Resume};
pub use listing::Listing;
pub use model::{Compensation, JobDraft, JobId, JobPatch, JobPosting, JobType, LikeState, PostingStatus};
pub use store::{ChangeHandler, JobStore, StoreEvent, SubscriptionId, Toggled};
