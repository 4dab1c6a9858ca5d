//! Turns [`Selection`] criteria into the ordered list of targets an invocation acts on.
//!
//! Criteria are applied in a fixed order (single, many, all) and their matches are
//! concatenated. Nothing is deduplicated: overlapping criteria, or a registry holding the
//! same IP twice, produce repeated targets.

use tracing::debug;

use orchestrate_common::fleet::registry::Registry;
use orchestrate_common::fleet::selection::Selection;
use orchestrate_common::fleet::target::Target;

pub fn resolve(registry: &Registry, selection: &Selection) -> Vec<Target> {
    let mut targets: Vec<Target> = Vec::new();

    if let Some(ip) = selection.single.as_deref().filter(|ip| !ip.is_empty()) {
        targets.extend(registry.iter().filter(|t| t.ip == ip).cloned());
    }

    let requested: Vec<&str> = selection.requested_ips();
    if !requested.is_empty() {
        for target in registry.iter() {
            for ip in &requested {
                if target.ip == *ip {
                    targets.push(target.clone());
                }
            }
        }
    }

    if selection.all {
        targets.extend(registry.iter().cloned());
    }

    debug!(
        "resolved {} of {} registered target(s)",
        targets.len(),
        registry.len()
    );
    targets
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
