//! Certbot ACME client
//!
//! Runs the certbot image as a short-lived container through the resolved
//! runtime capability. Standalone mode binds port 80 on the host for the
//! HTTP-01 challenge, so nothing else may hold that port while it runs.

use crate::config::{CertificateSettings, CONTAINER_CERT_ROOT, CONTAINER_WORK_DIR};
use crate::domain::entities::RuntimeCapability;
use crate::domain::ports::{AcmeClient, AcmeError, RenewalStatus};
use crate::domain::value_objects::DomainSet;

/// Printed by `certbot renew` when nothing was due
const NOT_DUE_MARKER: &str = "not yet due";

pub struct CertbotClient {
    settings: CertificateSettings,
}

impl CertbotClient {
    pub fn new(settings: CertificateSettings) -> Self {
        Self { settings }
    }

    /// `run --rm` prefix shared by every certbot invocation
    fn container_args(&self, publish_http: bool) -> Vec<String> {
        let mut args = vec!["run".to_string(), "--rm".to_string()];
        if publish_http {
            args.extend(["-p".to_string(), "80:80".to_string()]);
        }
        args.extend([
            "-v".to_string(),
            format!("{}:{}", self.settings.dir.display(), CONTAINER_CERT_ROOT),
            "-v".to_string(),
            format!("{}:{}", self.settings.work_dir.display(), CONTAINER_WORK_DIR),
        ]);
        args
    }

    fn issue_args(&self, domains: &DomainSet, email: &str) -> Vec<String> {
        let mut args = self.container_args(true);
        args.push(self.settings.image.clone());
        args.extend(
            [
                "certonly",
                "--standalone",
                "--non-interactive",
                "--agree-tos",
                "--email",
            ]
            .map(String::from),
        );
        args.push(email.to_string());
        // Lineage is always named after the primary so renewals find it
        args.extend(["--cert-name".to_string(), domains.primary().to_string()]);
        if self.settings.staging {
            args.push("--staging".to_string());
        }
        for domain in domains.iter() {
            args.extend(["-d".to_string(), domain.to_string()]);
        }
        args
    }

    fn renew_args(&self, primary: &str) -> Vec<String> {
        let mut args = self.container_args(true);
        args.push(self.settings.image.clone());
        args.extend(["renew", "--cert-name", primary, "--non-interactive"].map(String::from));
        if self.settings.staging {
            args.push("--staging".to_string());
        }
        args
    }
}

impl AcmeClient for CertbotClient {
    fn issue(
        &self,
        capability: &RuntimeCapability,
        domains: &DomainSet,
        email: &str,
    ) -> Result<(), AcmeError> {
        tracing::info!(domains = %domains, staging = self.settings.staging, "requesting certificate");
        let output = capability.run(self.issue_args(domains, email), self.settings.timeout)?;
        if output.success() {
            Ok(())
        } else {
            Err(AcmeError::Rejected(output.failure_reason()))
        }
    }

    fn renew(
        &self,
        capability: &RuntimeCapability,
        primary: &str,
    ) -> Result<RenewalStatus, AcmeError> {
        let output = capability.run(self.renew_args(primary), self.settings.timeout)?;
        if !output.success() {
            return Err(AcmeError::Rejected(output.failure_reason()));
        }
        Ok(parse_renewal_status(&output.stdout, &output.stderr))
    }

    fn covered_domains(
        &self,
        capability: &RuntimeCapability,
        primary: &str,
    ) -> Result<Option<Vec<String>>, AcmeError> {
        let mut args = self.container_args(false);
        args.push(self.settings.image.clone());
        args.extend(["certificates", "--cert-name", primary].map(String::from));

        let output = capability.run(args, self.settings.timeout)?;
        if !output.success() {
            return Err(AcmeError::Rejected(output.failure_reason()));
        }
        Ok(parse_certificate_domains(&output.stdout))
    }

    fn certificate_present(
        &self,
        capability: &RuntimeCapability,
        primary: &str,
    ) -> Result<bool, AcmeError> {
        let mut args = self.container_args(false);
        args.extend(["--entrypoint".to_string(), "test".to_string()]);
        args.push(self.settings.image.clone());
        args.push("-f".to_string());
        args.push(format!("{}/live/{}/fullchain.pem", CONTAINER_CERT_ROOT, primary));

        let output = capability.run(args, self.settings.timeout)?;
        match output.code {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(AcmeError::Rejected(output.failure_reason())),
        }
    }
}

/// Interpret `certbot renew` output
fn parse_renewal_status(stdout: &str, stderr: &str) -> RenewalStatus {
    let not_due = [stdout, stderr]
        .iter()
        .any(|text| text.to_ascii_lowercase().contains(NOT_DUE_MARKER));
    if not_due {
        RenewalStatus::NotDue
    } else {
        RenewalStatus::Renewed
    }
}

/// Extract the `Domains:` line from `certbot certificates` output
fn parse_certificate_domains(stdout: &str) -> Option<Vec<String>> {
    stdout
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("Domains:"))
        .map(|rest| rest.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .filter(|domains| !domains.is_empty())
}
