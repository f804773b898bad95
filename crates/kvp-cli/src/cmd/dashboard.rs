use crate::output::{print_json, print_table};
use crate::RunContext;
use kvp_core::{progress, project::Project, role};

/// Print the roll-up for one project as text or JSON.
pub fn print(ctx: &RunContext, project: &Project) -> anyhow::Result<()> {
    let dashboard = progress::dashboard(project, ctx.today);

    if ctx.json {
        print_json(&serde_json::json!({
            "role": ctx.role,
            "can_edit": role::can_edit(ctx.role),
            "can_delete": role::can_delete(ctx.role),
            "today": ctx.today,
            "dashboard": dashboard,
        }))?;
        return Ok(());
    }

    let access = if role::can_edit(ctx.role) {
        "edit"
    } else {
        "read-only"
    };
    println!("Project: {}   [{}]", project.name, project.status);
    println!("Id: {}   Created: {}", project.id(), project.created_date());
    if let Some(desc) = &project.description {
        println!("{desc}");
    }
    println!("Role: {} ({access})", ctx.role);
    println!("Progress: {}%", dashboard.completion_percent);
    println!();

    let c = dashboard.tasks;
    println!(
        "TASKS\n  Total: {} | Completed: {} | In Progress: {} | Open: {} | Overdue: {}",
        c.total, c.completed, c.in_progress, c.open, c.overdue
    );
    if !project.tasks().is_empty() {
        println!();
        let rows = project
            .tasks()
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let late = if t.is_overdue(ctx.today) { "!" } else { "" };
                vec![
                    i.to_string(),
                    t.label.clone(),
                    t.responsible.clone(),
                    format!("{}{late}", t.due_date),
                    t.status.to_string(),
                    t.priority.to_string(),
                ]
            })
            .collect();
        print_table(
            &["#", "TASK", "RESPONSIBLE", "DUE", "STATUS", "PRIORITY"],
            rows,
        );
    }
    println!();

    if !dashboard.status_histogram.is_empty() {
        println!("STATUS DISTRIBUTION");
        for (status, count) in &dashboard.status_histogram {
            println!("  {:<12} {}", status.as_str(), count);
        }
        println!();
    }

    let m = dashboard.metrics;
    println!(
        "METRICS\n  Before: {}   After: {}   Improvement: {:.1}%",
        m.before, m.after, m.improvement_percent
    );
    Ok(())
}
