//! PoE port listing, per-switch budgets, and switch port actions.

use omada_core::{Controller, PoeBudget, PoePortState};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{GlobalOpts, OutputFormat, PortArgs, PortCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PoeRow {
    #[tabled(rename = "Switch")]
    switch: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "PoE")]
    enabled: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Power (W)")]
    power: String,
    #[tabled(rename = "Voltage (V)")]
    voltage: String,
    #[tabled(rename = "Current (mA)")]
    current: String,
    #[tabled(rename = "Class")]
    class: String,
}

fn poe_row(p: &PoePortState, color: bool) -> PoeRow {
    PoeRow {
        switch: p.switch_name.clone().unwrap_or_else(|| p.switch_mac.to_string()),
        port: format!("{} ({})", p.port, p.port_name),
        enabled: output::status(if p.poe_enabled { "on" } else { "off" }, p.poe_enabled, color),
        link: if p.connected { "up" } else { "down" }.into(),
        power: format!("{:.1}", p.power),
        voltage: format!("{:.1}", p.voltage),
        current: format!("{:.0}", p.current),
        class: output::opt(p.pd_class.as_deref()),
    }
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Switch")]
    switch: String,
    #[tabled(rename = "Ports")]
    ports: String,
    #[tabled(rename = "Used (W)")]
    used: String,
    #[tabled(rename = "Total (W)")]
    total: String,
    #[tabled(rename = "Remaining (W)")]
    remaining: String,
    #[tabled(rename = "Used %")]
    percent: String,
}

impl From<&PoeBudget> for BudgetRow {
    fn from(b: &PoeBudget) -> Self {
        Self {
            switch: b.name.clone().unwrap_or_else(|| b.switch_mac.to_string()),
            ports: output::opt(b.port_count),
            used: format!("{:.1}", b.used_power),
            total: format!("{:.1}", b.total_power),
            remaining: format!("{:.1}", b.remaining_power()),
            percent: format!("{:.1}", b.used_percent),
        }
    }
}

#[derive(Serialize)]
struct PoeReport<'a> {
    ports: Vec<&'a PoePortState>,
    budgets: Vec<&'a PoeBudget>,
}

pub async fn list(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let site = util::resolve_site(controller).await?;
    let snapshot = controller.site_snapshot(&site).await?;
    let ports: Vec<&PoePortState> = snapshot.poe_ports.values().collect();
    let budgets: Vec<&PoeBudget> = snapshot.poe_budget.values().collect();

    let out = match global.output {
        OutputFormat::Table => {
            let color = output::should_color(&global.color);
            let ports = output::render_list(&global.output, &ports, |p| poe_row(p, color), |_| String::new());
            let budgets = output::render_list(&global.output, &budgets, |b| BudgetRow::from(*b), |_| String::new());
            format!("{ports}\n{budgets}")
        }
        OutputFormat::Plain => ports
            .iter()
            .map(|p| format!("{}_{}", p.switch_mac, p.port))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => output::render_single(
            &global.output,
            &PoeReport { ports, budgets },
            |_| String::new(),
            |_| String::new(),
        ),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    controller: &Controller,
    args: PortArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let site = util::resolve_site(controller).await?;
    let (what, switch, port, state) = match args.command {
        PortCommand::Poe { switch, port, state } => {
            let switch = util::parse_mac(&switch)?;
            controller
                .set_port_poe(&site, &switch, port, state.enabled())
                .await?;
            ("PoE", switch, port, state)
        }
        PortCommand::ProfileOverride { switch, port, state } => {
            let switch = util::parse_mac(&switch)?;
            controller
                .set_port_profile_override(&site, &switch, port, state.enabled())
                .await?;
            ("Profile override", switch, port, state)
        }
    };
    util::done(
        &format!(
            "{what} {} on {switch} port {port}",
            if state.enabled() { "enabled" } else { "disabled" }
        ),
        global.quiet,
    );
    Ok(())
}
