use anyhow::Context;
use colored::*;

use orchestrate_common::config::Config;
use orchestrate_common::fleet::target::Target;
use orchestrate_common::success;
use orchestrate_core::batch::BatchRunner;
use orchestrate_core::fleet::FleetService;

use crate::commands::{ConfigArgs, fleet_service};
use crate::oprint;
use crate::terminal::{format, print};

pub fn config(args: ConfigArgs, cfg: &Config) -> anyhow::Result<()> {
    let fleet = fleet_service(cfg, BatchRunner::sequential());

    if let Some(spec) = args.add {
        return add(&fleet, &spec, args.sudo_password);
    }
    if let Some(ip) = args.remove {
        let target = fleet.remove_target(&ip)?;
        success!("Removed {} from {}", target.identity(), cfg.registry.display());
        return Ok(());
    }
    list(&fleet, cfg)
}

fn add(fleet: &FleetService, spec: &str, sudo_password: Option<String>) -> anyhow::Result<()> {
    let target = match sudo_password {
        Some(password) => {
            let target: Target = spec.parse()?;
            fleet.insert_target(target.with_escalation_password(password))?
        }
        None => fleet.add_target(spec)?,
    };
    success!("Registered {}", target.identity());
    Ok(())
}

fn list(fleet: &FleetService, cfg: &Config) -> anyhow::Result<()> {
    let registry = fleet
        .list_targets()
        .with_context(|| format!("listing targets of {}", cfg.registry.display()))?;

    print::header("Registered Targets", cfg.quiet);

    if registry.is_empty() {
        print::print_status(format!("{}", "no targets registered".dimmed()));
        return Ok(());
    }

    for (idx, target) in registry.iter().enumerate() {
        match cfg.quiet {
            0 => {
                print::tree_head(idx, &target.identity().to_string());
                print::as_tree_one_level(format::target_to_details(target));
                if idx + 1 != registry.len() {
                    oprint!();
                }
            }
            _ => print::print_status(target.identity().to_string()),
        }
    }

    print::end_of_program(cfg.quiet);
    Ok(())
}
