//! Certificate lifecycle
//!
//! Decides between renewing an existing certificate and issuing a new one,
//! with a single primary-only fallback when the full domain set fails.

mod manager;


pub use manager::{CertificateAction, CertificateManager, CertificateOutcome};
