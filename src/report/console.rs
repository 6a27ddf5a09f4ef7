use crate::component::component_model::Component;
use crate::report::report_model::ExtractionReport;
use crate::screen::screen_model::Screen;

// ============================================================================
// Console reporter: indented component outline per screen
// ============================================================================

/// Format an extraction report for terminal output.
///
/// Produces output like:
/// ```text
/// === Design: Shop App (abc123) ===
///
/// [authentication] Login Screen (375x812)
///   - Welcome (text) [20]
///     Text: "Welcome"
///   - Login Button (button) [90]
///
/// === Results: 1 screens, 2 components (high 1, medium 0, low 1, filtered 1) ===
/// ```
pub fn format_console_report(report: &ExtractionReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Design: {} ({}) ===\n",
        report.file_name, report.file_id
    ));

    for screen in &report.screens {
        out.push('\n');
        out.push_str(&format_screen(screen));

        if let Some(scenarios) = report.baseline.get(&screen.node_id) {
            let count: usize = scenarios
                .component_scenarios
                .iter()
                .map(|c| c.scenarios.len())
                .sum::<usize>()
                + scenarios.pattern_scenarios.len();
            out.push_str(&format!("  Baseline scenarios: {}\n", count));
        }
    }

    let d = &report.distribution;
    out.push_str(&format!(
        "\n=== Results: {} screens, {} components (high {}, medium {}, low {}, filtered {})",
        report.total_screens, report.total_components, d.high, d.medium, d.low, d.filtered
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}

/// Screen header plus its component outline.
pub fn format_screen(screen: &Screen) -> String {
    let mut out = format!("[{}] {}", screen.screen_type, screen.name);
    if let Some((width, height)) = screen.dimensions() {
        out.push_str(&format!(" ({}x{})", width, height));
    }
    out.push('\n');

    for component in &screen.components {
        format_component(component, 1, &mut out);
    }

    out
}

fn format_component(component: &Component, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);

    out.push_str(&format!(
        "{}- {} ({})",
        prefix, component.name, component.component_type
    ));
    if let Some(score) = component.relevance_score {
        out.push_str(&format!(" [{}]", score));
    }
    out.push('\n');

    if let Some(text) = component.properties.text.as_deref().filter(|t| !t.is_empty()) {
        out.push_str(&format!("{}  Text: \"{}\"\n", prefix, text));
    }
    if component.properties.is_interactive() {
        out.push_str(&format!("{}  Has interactions: Yes\n", prefix));
    }

    for child in &component.children {
        format_component(child, indent + 1, out);
    }
}
