//! Form submission subsystem.
//!
//! # Data Flow
//! ```text
//! JSON body
//!     → *Submission (all fields optional)
//!     → Submission::into_record (trim, lower-case email, validation.rs checks)
//!     → Record (server-stamped, ready for the persistence gateway)
//! ```
//!
//! # Design Decisions
//! - One canonical schema per entity
//! - Validation failures never reach the store
//! - Timestamps are always server-set

pub mod schema;
pub mod validation;

pub use schema::{
    CareerForm, CareerSubmission, ContactForm, ContactSection, ContactSectionSubmission,
    ContactSubmission, IconContactForm, IconContactSubmission, Newsletter, NewsletterSubmission,
    Record, Service, Submission,
};
pub use validation::ValidationError;
