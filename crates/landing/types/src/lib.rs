//! Landing Types - Core types for the coaching-application backend
//!
//! A visitor fills in the landing-page form; the daemon turns that raw
//! [`ContactForm`] into a [`ValidatedContact`], stamps it into a
//! [`NewSubmission`] and hands it to storage, which answers with a
//! [`StoredSubmission`] carrying its [`SubmissionId`].
//!
//! ## Key Concepts
//!
//! - **ContactForm**: Untrusted request body, every field optional
//! - **ValidatedContact**: Trimmed, normalized, enum-typed form data
//! - **Catalog**: Closed sets for specialization and experience level
//! - **Submission**: The record moving through validate → store → notify

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod catalog;
pub mod form;
pub mod ids;
pub mod submission;

pub use catalog::{ExperienceLevel, Specialization};
pub use form::{ContactForm, FieldError, FormField, ValidatedContact, ValidationErrors};
pub use ids::SubmissionId;
pub use submission::{NewSubmission, StoredSubmission, UNKNOWN_CLIENT_ADDRESS};
