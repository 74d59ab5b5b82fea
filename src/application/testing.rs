//! In-memory test doubles for the application layer
//!
//! Every mock is a cheap handle over shared state, so a test can hand one
//! clone to the code under test and inspect another afterwards. All of them
//! append to a shared `CallLog` to make ordering assertions easy.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::{
    CertificateSettings, ProxyMode, ProxySettings, RuntimeSettings, TemplateSources,
};
use crate::domain::entities::RuntimeCapability;
use crate::domain::ports::{
    AcmeClient, AcmeError, AppStack, CommandOutput, CommandRunner, CommandSpec, DeployEvent,
    DeployEventSink, FileSystem, FsError, FsResult, PauseOutcome, ProcessError, ProxyController,
    ProxyError, ReloadOutcome, RenewalStatus, StackError, TeardownOutcome,
};
use crate::domain::value_objects::{AccessStrategy, DomainSet, StrategySelection};

/// Ordered record of collaborator calls
#[derive(Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.starts_with(prefix)).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

// ---------------------------------------------------------------------------
// File system
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct MockFs {
    files: Rc<RefCell<BTreeMap<PathBuf, String>>>,
    denied: Rc<RefCell<BTreeSet<PathBuf>>>,
    /// Files that exist but cannot be decoded as UTF-8
    undecodable: Rc<RefCell<BTreeSet<PathBuf>>>,
    writes: Rc<Cell<usize>>,
    log: CallLog,
}

impl MockFs {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: &str) {
        self.files
            .borrow_mut()
            .insert(path.into(), content.to_string());
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    /// Make every access at or below `path` fail with permission denied
    pub fn deny(&self, path: impl Into<PathBuf>) {
        self.denied.borrow_mut().insert(path.into());
    }

    /// Add a file whose content is not valid UTF-8
    pub fn insert_undecodable(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.insert(path.clone(), "");
        self.undecodable.borrow_mut().insert(path);
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    fn check_access(&self, path: &Path) -> FsResult<()> {
        if self.denied.borrow().iter().any(|d| path.starts_with(d)) {
            return Err(FsError::PermissionDenied(path.to_path_buf()));
        }
        Ok(())
    }
}

impl FileSystem for MockFs {
    fn read(&self, path: &Path) -> FsResult<String> {
        self.check_access(path)?;
        if self.undecodable.borrow().contains(path) {
            return Err(FsError::from_io(
                path,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "stream did not contain valid UTF-8",
                ),
            ));
        }
        self.get(path)
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        self.check_access(path)?;
        self.writes.set(self.writes.get() + 1);
        self.log.push(format!("fs.write {}", path.display()));
        self.insert(path, content);
        Ok(())
    }

    fn try_exists(&self, path: &Path) -> FsResult<bool> {
        self.check_access(path)?;
        Ok(self.contains(path))
    }

    fn remove(&self, path: &Path) -> FsResult<()> {
        self.check_access(path)?;
        self.log.push(format!("fs.remove {}", path.display()));
        self.files
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }

    fn list_files(&self, dir: &Path) -> FsResult<Vec<PathBuf>> {
        self.check_access(dir)?;
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// ACME client
// ---------------------------------------------------------------------------

/// Scripted ACME client; a successful issue creates the artifact in `fs`
#[derive(Clone)]
pub struct MockAcme {
    fs: MockFs,
    cert_dir: PathBuf,
    issue_results: Rc<RefCell<VecDeque<Result<(), String>>>>,
    renew_result: Rc<RefCell<Result<RenewalStatus, String>>>,
    /// Lineage listing; `None` makes the listing fail
    listing: Rc<RefCell<Option<Vec<String>>>>,
    issued: Rc<RefCell<Vec<Vec<String>>>>,
    log: CallLog,
}

impl MockAcme {
    pub fn new(fs: MockFs, cert_dir: impl Into<PathBuf>, log: CallLog) -> Self {
        Self {
            fs,
            cert_dir: cert_dir.into(),
            issue_results: Rc::default(),
            renew_result: Rc::new(RefCell::new(Ok(RenewalStatus::NotDue))),
            listing: Rc::default(),
            issued: Rc::default(),
            log,
        }
    }

    /// Queue issue outcomes; once exhausted, issuing succeeds
    pub fn script_issue(&self, results: Vec<Result<(), &str>>) {
        *self.issue_results.borrow_mut() = results
            .into_iter()
            .map(|r| r.map_err(str::to_string))
            .collect();
    }

    pub fn set_renewal(&self, result: Result<RenewalStatus, &str>) {
        *self.renew_result.borrow_mut() = result.map_err(str::to_string);
    }

    pub fn set_listing(&self, listing: Option<Vec<&str>>) {
        *self.listing.borrow_mut() =
            listing.map(|l| l.into_iter().map(str::to_string).collect());
    }

    /// Domain lists of every issuance request, in order
    pub fn issued(&self) -> Vec<Vec<String>> {
        self.issued.borrow().clone()
    }

    fn artifact(&self, primary: &str) -> PathBuf {
        self.cert_dir.join("live").join(primary).join("fullchain.pem")
    }
}

impl AcmeClient for MockAcme {
    fn issue(
        &self,
        _capability: &RuntimeCapability,
        domains: &DomainSet,
        _email: &str,
    ) -> Result<(), AcmeError> {
        self.log.push(format!("acme.issue {}", domains.server_names()));
        self.issued.borrow_mut().push(domains.to_vec());
        let result = self.issue_results.borrow_mut().pop_front().unwrap_or(Ok(()));
        match result {
            Ok(()) => {
                self.fs.insert(self.artifact(domains.primary()), "CERT");
                *self.listing.borrow_mut() = Some(domains.to_vec());
                Ok(())
            }
            Err(reason) => Err(AcmeError::Rejected(reason)),
        }
    }

    fn renew(
        &self,
        _capability: &RuntimeCapability,
        primary: &str,
    ) -> Result<RenewalStatus, AcmeError> {
        self.log.push(format!("acme.renew {}", primary));
        self.renew_result
            .borrow()
            .clone()
            .map_err(AcmeError::Rejected)
    }

    fn covered_domains(
        &self,
        _capability: &RuntimeCapability,
        _primary: &str,
    ) -> Result<Option<Vec<String>>, AcmeError> {
        self.listing
            .borrow()
            .clone()
            .map(Some)
            .ok_or_else(|| AcmeError::Rejected("listing unavailable".to_string()))
    }

    fn certificate_present(
        &self,
        _capability: &RuntimeCapability,
        primary: &str,
    ) -> Result<bool, AcmeError> {
        self.log.push("acme.present");
        Ok(self.fs.contains(&self.artifact(primary)))
    }
}

// ---------------------------------------------------------------------------
// Proxy controller
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct MockProxy {
    validate_results: Rc<RefCell<VecDeque<Result<(), String>>>>,
    reload_outcome: Rc<Cell<ReloadOutcome>>,
    pause_outcome: Rc<Cell<PauseOutcome>>,
    log: CallLog,
}

impl MockProxy {
    pub fn new(log: CallLog) -> Self {
        Self {
            validate_results: Rc::default(),
            reload_outcome: Rc::new(Cell::new(ReloadOutcome::Reloaded)),
            pause_outcome: Rc::new(Cell::new(PauseOutcome::NotHeld)),
            log,
        }
    }

    pub fn fail_next_validation(&self, output: &str) {
        self.validate_results
            .borrow_mut()
            .push_back(Err(output.to_string()));
    }

    pub fn set_reload_outcome(&self, outcome: ReloadOutcome) {
        self.reload_outcome.set(outcome);
    }

    pub fn set_pause_outcome(&self, outcome: PauseOutcome) {
        self.pause_outcome.set(outcome);
    }
}

impl ProxyController for MockProxy {
    fn validate(&self, _capability: &RuntimeCapability) -> Result<(), ProxyError> {
        self.log.push("proxy.validate");
        self.validate_results
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(()))
            .map_err(ProxyError::Invalid)
    }

    fn reload(&self, _capability: &RuntimeCapability) -> Result<ReloadOutcome, ProxyError> {
        self.log.push("proxy.reload");
        Ok(self.reload_outcome.get())
    }

    fn pause(&self, _capability: &RuntimeCapability) -> Result<PauseOutcome, ProxyError> {
        self.log.push("proxy.pause");
        Ok(self.pause_outcome.get())
    }

    fn resume(&self, _capability: &RuntimeCapability) -> Result<(), ProxyError> {
        self.log.push("proxy.resume");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Application stack
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct MockStack {
    running: Rc<Cell<bool>>,
    build_failure: Rc<RefCell<Option<String>>>,
    log: CallLog,
}

impl MockStack {
    pub fn new(log: CallLog) -> Self {
        Self {
            running: Rc::default(),
            build_failure: Rc::default(),
            log,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn fail_build(&self, reason: &str) {
        *self.build_failure.borrow_mut() = Some(reason.to_string());
    }
}

impl AppStack for MockStack {
    fn teardown(&self, _capability: &RuntimeCapability) -> Result<TeardownOutcome, StackError> {
        self.log.push("stack.teardown");
        if self.running.replace(false) {
            Ok(TeardownOutcome::Stopped)
        } else {
            Ok(TeardownOutcome::AlreadyStopped)
        }
    }

    fn build(&self, _capability: &RuntimeCapability) -> Result<(), StackError> {
        self.log.push("stack.build");
        match self.build_failure.borrow().clone() {
            Some(reason) => Err(StackError::Failed(reason)),
            None => Ok(()),
        }
    }

    fn start(&self, _capability: &RuntimeCapability) -> Result<(), StackError> {
        self.log.push("stack.start");
        self.running.set(true);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Process runner and events
// ---------------------------------------------------------------------------

/// Runner that answers every command with success, recording programs
#[derive(Default)]
pub struct OkRunner {
    pub programs: Mutex<Vec<String>>,
}

impl CommandRunner for OkRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        if let Ok(mut programs) = self.programs.lock() {
            programs.push(spec.program.clone());
        }
        Ok(CommandOutput {
            code: Some(0),
            stdout: "27.3.1\n".to_string(),
            stderr: String::new(),
        })
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: RefCell<Vec<DeployEvent>>,
}

impl DeployEventSink for RecordingSink {
    fn on_event(&self, event: DeployEvent) {
        self.events.borrow_mut().push(event);
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const CERT_DIR: &str = "/srv/app/certbot/conf";
pub const SITES_DIR: &str = "/srv/app/nginx/conf.d";

pub fn capability() -> RuntimeCapability {
    RuntimeCapability::new(
        AccessStrategy::Direct,
        "docker",
        "docker",
        Arc::new(OkRunner::default()),
    )
}

pub fn domains() -> DomainSet {
    DomainSet::new("example.com", ["www.example.com"]).unwrap_or_else(|e| panic!("{e}"))
}

pub fn runtime_settings() -> RuntimeSettings {
    RuntimeSettings {
        program: "docker".to_string(),
        group: "docker".to_string(),
        selection: StrategySelection::Auto,
        probe_timeout: Duration::from_secs(15),
    }
}

pub fn certificate_settings() -> CertificateSettings {
    CertificateSettings {
        dir: PathBuf::from(CERT_DIR),
        work_dir: PathBuf::from("/srv/app/certbot/work"),
        image: "certbot/certbot".to_string(),
        staging: false,
        timeout: Duration::from_secs(300),
    }
}

pub fn proxy_settings() -> ProxySettings {
    ProxySettings {
        mode: ProxyMode::Container,
        sites_dir: PathBuf::from(SITES_DIR),
        site_name: "example.com".to_string(),
        upstream: "app:8000".to_string(),
        certificate_root: "/etc/letsencrypt".to_string(),
        retire: vec!["default.conf".to_string()],
        templates: TemplateSources::default(),
        image: "nginx:alpine".to_string(),
        container: "proxy".to_string(),
        validate_command: vec!["nginx".to_string(), "-t".to_string()],
        reload_command: vec!["nginx".to_string(), "-s".to_string(), "reload".to_string()],
        stop_command: None,
        status_command: Vec::new(),
        start_command: None,
        timeout: Duration::from_secs(60),
    }
}
