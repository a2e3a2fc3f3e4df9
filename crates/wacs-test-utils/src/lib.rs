//! Shared test utilities for the wacs workspace.
//!
//! Dev-dependency only; never published.
//!
//! # Modules
//!
//! - [`git`] - bare remotes and repository inspection
//! - [`contributor`] - [`contributor::ContributorDir`] scratch checkouts
//! - [`mock_host`] - [`mock_host::MockHost`] fake hosting API

pub mod contributor;
pub mod git;
pub mod mock_host;

/// Commit signature used by fixtures.
///
/// # Panics
/// Panics if the signature cannot be built.
pub fn test_signature() -> git2::Signature<'static> {
    git2::Signature::now("Test User", "test@example.org").expect("test_signature")
}
