use colored::Colorize;
use netcfg_core::{format_summary, format_text, DiffEntry, InstalledNeighbor};

use crate::safeguard::RemovalPlan;
use crate::xref::XrefFinding;

/// Render diff entries for terminal output.
pub fn render_diff(entries: &[DiffEntry]) -> String {
    let raw = format_text(entries);
    let mut out = Vec::new();

    for line in raw.lines() {
        let colored = if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else {
            line.to_string()
        };
        out.push(colored);
    }

    out.join("\n")
}

/// Render summary counts for terminal output.
pub fn render_summary(entries: &[DiffEntry]) -> String {
    format_summary(entries).cyan().to_string()
}

/// Render a removal plan, one session per line.
pub fn render_plan(plan: &RemovalPlan) -> String {
    let mut out = Vec::new();
    for neighbor in &plan.remove {
        out.push(format!("{} {}", "REMOVE".red(), describe(neighbor)));
    }
    for neighbor in &plan.keep {
        out.push(format!("{} {}", "KEEP".yellow(), describe(neighbor)));
    }
    out.push(format!(
        "result remove={} keep={}",
        plan.remove.len(),
        plan.keep.len()
    ));
    out.join("\n")
}

fn describe(neighbor: &InstalledNeighbor) -> String {
    let state = if neighbor.is_up() { "up" } else { "down" };
    format!(
        "{} state={state} peer_group={} description={}",
        neighbor.remote_address,
        neighbor.peer_group.as_deref().unwrap_or("-"),
        neighbor.description.as_deref().unwrap_or("-"),
    )
}

/// Render validation findings followed by a result line.
pub fn render_findings(findings: &[XrefFinding]) -> String {
    let mut out: Vec<String> = findings
        .iter()
        .map(|f| format!("{} code={} {}", "ERROR".red(), f.code, f.message))
        .collect();
    out.push(format!("result errors={}", findings.len()));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcfg_core::SessionState;

    #[test]
    fn plan_lists_removed_before_kept() {
        colored::control::set_override(false);
        let neighbor = |addr: &str, state| InstalledNeighbor {
            remote_address: addr.parse().expect("addr"),
            state,
            peer_group: Some("PG-TOR".to_string()),
            description: None,
            remote_as: None,
        };
        let plan = RemovalPlan {
            remove: vec![neighbor("192.0.2.7", SessionState::Down)],
            keep: vec![neighbor("192.0.2.8", SessionState::Up)],
        };

        let text = render_plan(&plan);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "REMOVE 192.0.2.7 state=down peer_group=PG-TOR description=-",
                "KEEP 192.0.2.8 state=up peer_group=PG-TOR description=-",
                "result remove=1 keep=1",
            ]
        );
    }
}
