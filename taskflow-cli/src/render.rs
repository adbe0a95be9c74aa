//! Plain-text rendering for schedules and task lists.

use chrono_tz::Tz;
use std::fmt::Write;

use taskflow_core::time::format_local;
use taskflow_core::{ComparisonResult, ScheduleResult, Task};

pub fn schedule_text(r: &ScheduleResult, tz: Tz) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "# Schedule ({})\n", r.strategy);
    let _ = writeln!(
        s,
        "Total minutes: {} / {} per day{}",
        r.total_estimated_minutes,
        r.available_minutes_per_day,
        if r.overloaded { "  (OVERLOADED)" } else { "" }
    );
    let _ = writeln!(
        s,
        "On-time rate: {:.0}% | avg tardiness: {:.1} min | max tardiness: {:.1} min",
        r.on_time_rate * 100.0,
        r.average_tardiness_min,
        r.max_tardiness_min
    );
    if let Some(finish) = r.projected_finish {
        let _ = writeln!(s, "Projected finish: {}", format_local(finish, tz));
    }
    s.push('\n');

    if r.ordered_tasks.is_empty() {
        s.push_str("No tasks to schedule.\n");
        return s;
    }

    for (i, e) in r.ordered_tasks.iter().enumerate() {
        let status = if e.on_time {
            "on time".to_string()
        } else {
            format!("LATE {:.0} min", e.tardiness_minutes)
        };
        let _ = writeln!(
            s,
            "{:>2}. [{}] {} ({} min, prio {}, score {:.2})",
            i + 1,
            e.task.id,
            e.task.title,
            e.task.estimated_minutes,
            e.task.priority,
            e.score
        );
        let _ = writeln!(
            s,
            "    due {} | done {} | {} | {}",
            format_local(e.task.deadline, tz),
            format_local(e.projected_completion, tz),
            status,
            e.reason
        );
    }
    s
}

pub fn comparison_text(c: &ComparisonResult, tz: Tz) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "# Strategy comparison\n");
    let _ = writeln!(s, "{:<18} {:>10} {:>14} {:>6} {:>10}", "strategy", "on-time", "avg tardiness", "late", "overload");
    for r in [&c.edf, &c.weighted_greedy] {
        let _ = writeln!(
            s,
            "{:<18} {:>9.0}% {:>10.1} min {:>6} {:>10}",
            r.strategy.as_str(),
            r.on_time_rate * 100.0,
            r.average_tardiness_min,
            r.late_count(),
            if r.overloaded { "yes" } else { "no" }
        );
    }
    s.push('\n');
    s.push_str(&schedule_text(&c.edf, tz));
    s.push('\n');
    s.push_str(&schedule_text(&c.weighted_greedy, tz));
    s
}

pub fn tasks_text(tasks: &[Task], tz: Tz) -> String {
    if tasks.is_empty() {
        return "No tasks. Add one with: taskflow tasks add --title ... --deadline ...\n".to_string();
    }
    let mut s = String::new();
    for t in tasks {
        let _ = writeln!(
            s,
            "[{}] {:<11} {} | due {} | {} min | prio {}",
            t.id,
            t.status.as_str(),
            t.title,
            format_local(t.deadline, tz),
            t.estimated_minutes,
            t.priority
        );
        if let Some(d) = &t.description {
            let _ = writeln!(s, "      {d}");
        }
    }
    s
}
