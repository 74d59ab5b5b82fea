//! A shell script that answers the container runtime commands berth issues.
//!
//! The script appends every invocation to a log, keeps "stack running" state
//! in a marker file, and writes certificate artifacts into the directory
//! mounted at `/etc/letsencrypt` the way certbot would. `sg` and `sudo`
//! stand-ins log themselves and re-run the command with a marker variable.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Knobs for the fake runtime
#[derive(Debug, Clone, Default)]
pub struct RuntimeBehavior {
    /// `info` fails as if the socket were not accessible
    pub unreachable: bool,
    /// The socket is only accessible under the runtime's group (via `sg`)
    pub group_only: bool,
    /// Issuance for more than one name fails (aliases not pointed at the host)
    pub aliases_unresolvable: bool,
    /// Every issuance fails
    pub issuance_fails: bool,
    /// `compose build` fails
    pub build_fails: bool,
}

const SG_SCRIPT: &str = r#"#!/bin/sh
printf 'sg %s\n' "$*" >> '@LOG@'
shift 2
BERTH_FAKE_GROUP=1 exec /bin/sh -c "$1"
"#;

const SUDO_SCRIPT: &str = r#"#!/bin/sh
printf 'sudo %s\n' "$*" >> '@LOG@'
BERTH_FAKE_ROOT=1 exec "$@"
"#;

const SCRIPT: &str = r#"#!/bin/sh
LOG='@LOG@'
STATE='@STATE@'
printf '%s\n' "$*" >> "$LOG"

case "$1" in
  info)
    @PROBE@
    ;;
  inspect)
    echo true
    exit 0
    ;;
  exec)
    exit 0
    ;;
  compose)
    for a in "$@"; do
      case "$a" in
        ps)
          if [ -f "$STATE" ]; then echo 3f2a9c0d1e; fi
          exit 0
          ;;
        down)
          rm -f "$STATE"
          exit 0
          ;;
        build)
          @BUILD@
          exit 0
          ;;
        up)
          touch "$STATE"
          exit 0
          ;;
      esac
    done
    exit 0
    ;;
  run)
    prev=""; certdir=""; name=""; domains=""; count=0; mode=""
    for a in "$@"; do
      case "$prev" in
        -v) case "$a" in *:/etc/letsencrypt) certdir="${a%:/etc/letsencrypt}" ;; esac ;;
        --cert-name) name="$a" ;;
        -d) domains="$domains $a"; count=$((count + 1)) ;;
      esac
      case "$a" in certonly|renew|certificates) mode="$a" ;; esac
      prev="$a"
    done
    case "$mode" in
      certonly)
        @ISSUE@
        mkdir -p "$certdir/live/$name"
        echo cert > "$certdir/live/$name/fullchain.pem"
        echo key > "$certdir/live/$name/privkey.pem"
        echo "$domains" > "$certdir/live/$name/domains"
        echo "Successfully received certificate."
        exit 0
        ;;
      renew)
        echo "Certificate not yet due for renewal"
        exit 0
        ;;
      certificates)
        echo "Found the following certs:"
        echo "  Certificate Name: $name"
        echo "    Domains:$(cat "$certdir/live/$name/domains")"
        exit 0
        ;;
    esac
    # proxy syntax check
    echo "nginx: configuration file /etc/nginx/nginx.conf test is successful" >&2
    exit 0
    ;;
esac
exit 0
"#;

/// Write the fake runtime into `dir/bin/docker` and return its path
pub fn write_fake_runtime(dir: &Path, log: &Path, behavior: &RuntimeBehavior) -> PathBuf {
    let denied = "echo 'permission denied while trying to connect to the Docker daemon socket' >&2; exit 1";
    let probe = if behavior.unreachable {
        denied.to_string()
    } else if behavior.group_only {
        format!("if [ -z \"$BERTH_FAKE_GROUP\" ]; then {denied}; fi; echo 27.1.1; exit 0")
    } else {
        "echo 27.1.1; exit 0".to_string()
    };
    let build = if behavior.build_fails {
        "echo 'failed to solve: dockerfile parse error line 3' >&2; exit 1"
    } else {
        ":"
    };
    let issue = if behavior.issuance_fails {
        "echo 'Some challenges have failed.' >&2; exit 1"
    } else if behavior.aliases_unresolvable {
        "if [ \"$count\" -gt 1 ]; then echo 'DNS problem: NXDOMAIN looking up A for www' >&2; exit 1; fi"
    } else {
        ":"
    };

    let script = SCRIPT
        .replace("@LOG@", &log.display().to_string())
        .replace("@STATE@", &dir.join(".stack-running").display().to_string())
        .replace("@PROBE@", &probe)
        .replace("@BUILD@", build)
        .replace("@ISSUE@", issue);

    let bin = dir.join("bin");
    fs::create_dir_all(&bin).expect("Failed to create bin dir");
    let log = log.display().to_string();
    write_executable(&bin.join("sg"), &SG_SCRIPT.replace("@LOG@", &log));
    write_executable(&bin.join("sudo"), &SUDO_SCRIPT.replace("@LOG@", &log));

    let path = bin.join("docker");
    write_executable(&path, &script);
    path
}

fn write_executable(path: &Path, content: &str) {
    fs::write(path, content).expect("Failed to write fake program");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake program executable");
}
