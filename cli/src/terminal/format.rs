use colored::*;

use orchestrate_common::fleet::outcome::ExecutionResult;
use orchestrate_common::fleet::target::Target;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn result_to_details(result: &ExecutionResult) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![status_detail(result)];

    if let Some(err) = &result.error {
        details.push(("Error".to_string(), err.to_string().color(colors::FAILURE)));
    }

    if result.output.is_empty() {
        details.push(("Output".to_string(), "none".dimmed()));
    } else {
        let lines: usize = result.output.lines().count();
        details.push((
            "Output".to_string(),
            format!("{lines} line(s)").color(colors::TEXT_DEFAULT),
        ));
    }

    details
}

fn status_detail(result: &ExecutionResult) -> Detail {
    let value = if result.succeeded() {
        "ok".color(colors::SUCCESS).bold()
    } else {
        "failed".color(colors::FAILURE).bold()
    };
    ("Status".to_string(), value)
}

/// Everything about a target that is safe to show. The password never is.
pub fn target_to_details(target: &Target) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![
        ("User".to_string(), target.user.color(colors::TEXT_DEFAULT)),
        ("IP".to_string(), target.ip.color(colors::ACCENT)),
    ];
    if target.escalation_password.is_some() {
        details.push(("Sudo".to_string(), "separate password".normal()));
    }
    details
}
