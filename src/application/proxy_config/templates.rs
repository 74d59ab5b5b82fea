//! Proxy configuration templates
//!
//! Built-in nginx templates ship inside the binary; operators may point
//! either variant at their own file. Templates are read-only inputs.

use std::path::{Path, PathBuf};

use crate::config::{ProxySettings, TemplateSources};
use crate::domain::ports::FileSystem;
use crate::domain::services::{render, TemplateVars};
use crate::domain::value_objects::{DomainSet, ProxyVariant};
use crate::error::DeployError;

/// First line of every rendered configuration
pub const MANAGED_MARKER: &str =
    "# Managed by berth. Local changes are overwritten on the next deploy.";

/// Prefix used to recognise managed files from any berth version
pub const MANAGED_PREFIX: &str = "# Managed by berth";

const BUILTIN_PLAIN: &str = include_str!("../../templates/plain.conf");
const BUILTIN_SECURED: &str = include_str!("../../templates/secured.conf");

/// Whether `content` was written by berth
pub fn is_managed(content: &str) -> bool {
    content.starts_with(MANAGED_PREFIX)
}

/// Template text for one variant, with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub variant: ProxyVariant,
    pub origin: PathBuf,
    pub text: String,
}

impl Template {
    /// Load the template for `variant`, preferring an operator-supplied file
    pub fn load(
        fs: &dyn FileSystem,
        sources: &TemplateSources,
        variant: ProxyVariant,
    ) -> Result<Self, DeployError> {
        let custom = match variant {
            ProxyVariant::Plain => sources.plain.as_deref(),
            ProxyVariant::Secured => sources.secured.as_deref(),
        };

        match custom {
            Some(path) => {
                let text = fs.read(path).map_err(|e| DeployError::TemplateInvalid {
                    variant,
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(Self {
                    variant,
                    origin: path.to_path_buf(),
                    text,
                })
            }
            None => Ok(Self::builtin(variant)),
        }
    }

    pub fn builtin(variant: ProxyVariant) -> Self {
        let text = match variant {
            ProxyVariant::Plain => BUILTIN_PLAIN,
            ProxyVariant::Secured => BUILTIN_SECURED,
        };
        Self {
            variant,
            origin: Path::new("<built-in>").join(format!("{}.conf", variant)),
            text: text.to_string(),
        }
    }

    /// Render for `covered`, prefixed with the managed marker
    pub fn render(
        &self,
        covered: &DomainSet,
        settings: &ProxySettings,
    ) -> Result<String, DeployError> {
        let vars = variables(covered, settings, self.variant);
        let body = render(&self.text, &vars).map_err(|e| DeployError::TemplateInvalid {
            variant: self.variant,
            path: self.origin.clone(),
            message: e.to_string(),
        })?;

        let mut rendered = String::with_capacity(MANAGED_MARKER.len() + body.len() + 1);
        rendered.push_str(MANAGED_MARKER);
        rendered.push('\n');
        rendered.push_str(&body);
        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        Ok(rendered)
    }
}

fn variables(covered: &DomainSet, settings: &ProxySettings, variant: ProxyVariant) -> TemplateVars {
    let live = format!("{}/live/{}", settings.certificate_root, covered.primary());
    TemplateVars::new()
        .set("primary_domain", covered.primary())
        .set("server_names", covered.server_names())
        .set("upstream", settings.upstream.as_str())
        .set("certificate_path", format!("{}/fullchain.pem", live))
        .set("certificate_key_path", format!("{}/privkey.pem", live))
        .set("variant", variant.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{domains, proxy_settings, CallLog, MockFs};

    #[test]
    fn builtin_plain_listens_on_80_only() {
        let rendered = Template::builtin(ProxyVariant::Plain)
            .render(&domains(), &proxy_settings())
            .unwrap();

        assert!(rendered.starts_with(MANAGED_MARKER));
        assert!(rendered.contains("server_name example.com www.example.com;"));
        assert!(rendered.contains("proxy_pass http://app:8000;"));
        assert!(!rendered.contains("443"));
    }

    #[test]
    fn builtin_secured_points_at_certificate_root() {
        let rendered = Template::builtin(ProxyVariant::Secured)
            .render(&domains().primary_only(), &proxy_settings())
            .unwrap();

        assert!(rendered.contains("listen 443 ssl;"));
        assert!(rendered.contains("ssl_certificate /etc/letsencrypt/live/example.com/fullchain.pem;"));
        assert!(rendered.contains("ssl_certificate_key /etc/letsencrypt/live/example.com/privkey.pem;"));
        assert!(rendered.contains("server_name example.com;"));
    }

    #[test]
    fn custom_template_is_read_from_disk() {
        let fs = MockFs::new(CallLog::default());
        fs.insert("/srv/app/deploy/plain.conf", "server { server_name {{server_names}}; }");
        let sources = TemplateSources {
            plain: Some(PathBuf::from("/srv/app/deploy/plain.conf")),
            secured: None,
        };

        let template = Template::load(&fs, &sources, ProxyVariant::Plain).unwrap();
        let rendered = template.render(&domains(), &proxy_settings()).unwrap();

        assert_eq!(
            rendered,
            format!(
                "{}\nserver {{ server_name example.com www.example.com; }}\n",
                MANAGED_MARKER
            )
        );
        assert_eq!(
            Template::load(&fs, &sources, ProxyVariant::Secured)
                .unwrap()
                .origin,
            PathBuf::from("<built-in>/secured.conf")
        );
    }

    #[test]
    fn unknown_placeholder_names_template_file() {
        let fs = MockFs::new(CallLog::default());
        fs.insert("/srv/app/deploy/secured.conf", "ssl_certificate {{ cert_path }};\n");
        let sources = TemplateSources {
            plain: None,
            secured: Some(PathBuf::from("/srv/app/deploy/secured.conf")),
        };

        let err = Template::load(&fs, &sources, ProxyVariant::Secured)
            .unwrap()
            .render(&domains(), &proxy_settings())
            .unwrap_err();

        assert!(matches!(err, DeployError::TemplateInvalid { .. }));
        assert!(err.to_string().contains("/srv/app/deploy/secured.conf"));
        assert!(err.to_string().contains("cert_path"));
    }

    #[test]
    fn missing_custom_template_is_template_invalid() {
        let fs = MockFs::new(CallLog::default());
        let sources = TemplateSources {
            plain: Some(PathBuf::from("/srv/app/deploy/plain.conf")),
            secured: None,
        };

        let err = Template::load(&fs, &sources, ProxyVariant::Plain).unwrap_err();
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn managed_marker_detection() {
        assert!(is_managed(&format!("{}\nserver {{}}\n", MANAGED_MARKER)));
        assert!(is_managed("# Managed by berth 0.1\n"));
        assert!(!is_managed("server { listen 80; }\n"));
    }
}
