use berth::application::DeployReport;
use berth::config::ConfigWarning;
use berth::domain::value_objects::DeployStep;
use berth::error::StepFailure;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_deploy_summary(
    report: &DeployReport,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {} {}\n",
        Icon::Success.colored(supports_color, supports_unicode),
        ColoredText::success("Deployed").bold().render(supports_color),
        ColoredText::info(report.url.as_str()).render(supports_color)
    ));

    let mut line = |label: &str, value: String| {
        out.push_str(&format!(
            "  {} {}\n",
            ColoredText::dim(format!("{label}:")).render(supports_color),
            value
        ));
    };

    line("Runtime access", report.strategy.to_string());
    line("Certificate", report.covered.join(", "));
    if !report.uncovered.is_empty() {
        line("Not covered", report.uncovered.join(", "));
    }
    line("Proxy", report.variant.to_string());

    let executed = report.executed_count();
    let unchanged = report.steps.len() - executed;
    line(
        "Steps",
        format!("{executed} executed, {unchanged} already up to date"),
    );

    for warning in &report.warnings {
        out.push_str(&format!(
            "{} {}\n",
            Icon::Warning.colored(supports_color, supports_unicode),
            warning
        ));
    }

    out
}

pub fn render_failure(failure: &StepFailure, supports_color: bool, supports_unicode: bool) -> String {
    render_step_error(failure.step, &failure.error.to_string(), supports_color, supports_unicode)
}

pub fn render_step_error(
    step: DeployStep,
    message: &str,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    format!(
        "{} {}: {}\n",
        Icon::Error.colored(supports_color, supports_unicode),
        ColoredText::error(step.as_str()).bold().render(supports_color),
        message
    )
}

pub fn render_config_warning(
    warning: &ConfigWarning,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    format!(
        "{} {}\n",
        Icon::Warning.colored(supports_color, supports_unicode),
        ColoredText::warning(warning.to_string()).render(supports_color)
    )
}
