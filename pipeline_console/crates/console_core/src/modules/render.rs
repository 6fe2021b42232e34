use crate::modules::diff::{diff_fields, DiffItem, DiffKind};
use crate::modules::formatter::{format_elapsed_micros, MessageSummary};
use crate::modules::protocol::Connection;
use crate::modules::simulator_view::SimulatorView;
use std::fmt;

pub const LOADING_TEXT: &str = "Loading...";
pub const DROPPED_TITLE: &str = "Message would be dropped";
pub const DROPPED_DETAIL: &str = "Processing the loaded message would drop it from the system. \
That means that the message would not be stored, and would not be available on searches, alerts, or dashboards.";
pub const ERROR_TITLE: &str = "Error simulating message processing";

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationPane {
    Loading,
    Dropped,
    Messages(Vec<MessageSummary>),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub title: &'static str,
    pub detail: String,
}

/// Side-by-side view of the loaded message and what the pipelines make of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsPanel {
    pub original: Option<MessageSummary>,
    pub status: String,
    pub error: Option<ErrorNotice>,
    pub simulation: SimulationPane,
    pub diff: Vec<DiffItem>,
}

pub fn results_panel(view: &SimulatorView) -> Option<ResultsPanel> {
    if view.message().is_none() && view.simulation().is_none() {
        return None;
    }

    let status = if view.is_loading() {
        "Simulating message processing, please wait a moment.".to_string()
    } else if let Some(sim) = view.simulation() {
        format!(
            "These are the results of processing the loaded message. Processing took {}.",
            format_elapsed_micros(sim.took_microseconds)
        )
    } else {
        "No simulation results are available for the loaded message.".to_string()
    };

    let error = view.error().map(|e| ErrorNotice {
        title: ERROR_TITLE,
        detail: format!(
            "Could not simulate processing of message {} in stream {}.\n\
             Please try loading the message again, or use another message for the simulation.\n({e})",
            view.message().map(|m| m.id.as_str()).unwrap_or("?"),
            view.stream().title
        ),
    });

    let simulation = match view.simulation() {
        _ if view.is_loading() => SimulationPane::Loading,
        Some(sim) if sim.is_dropped() => SimulationPane::Dropped,
        Some(sim) => SimulationPane::Messages(sim.messages.clone()),
        None => SimulationPane::Empty,
    };

    let diff = match (view.message(), view.simulation().and_then(|s| s.messages.first())) {
        (Some(original), Some(first)) => diff_fields(original, first),
        _ => Vec::new(),
    };

    Some(ResultsPanel {
        original: view.message().cloned(),
        status,
        error,
        simulation,
        diff,
    })
}

impl fmt::Display for ResultsPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Original message")?;
        writeln!(f, "This is the original message loaded from Graylog.")?;
        if let Some(m) = &self.original {
            write!(f, "{}", message_preview(m))?;
        }

        writeln!(f)?;
        writeln!(f, "== Simulation results")?;
        writeln!(f, "{}", self.status)?;
        if let Some(err) = &self.error {
            writeln!(f, "[error] {}", err.title)?;
            for line in err.detail.lines() {
                writeln!(f, "  {line}")?;
            }
        }
        match &self.simulation {
            SimulationPane::Loading => writeln!(f, "{LOADING_TEXT}")?,
            SimulationPane::Dropped => {
                writeln!(f, "[info] {DROPPED_TITLE}")?;
                writeln!(f, "  {DROPPED_DETAIL}")?;
            }
            SimulationPane::Messages(messages) => {
                for m in messages {
                    write!(f, "{}", message_preview(m))?;
                }
            }
            SimulationPane::Empty => {}
        }

        if !self.diff.is_empty() {
            writeln!(f)?;
            writeln!(f, "== Changes")?;
            for item in &self.diff {
                writeln!(f, "{}", diff_line(item))?;
            }
        }
        Ok(())
    }
}

pub fn message_preview(message: &MessageSummary) -> String {
    let mut out = format!(
        "-- {}",
        if message.id.is_empty() { "(no id)" } else { message.id.as_str() }
    );
    if let Some(index) = &message.index {
        out.push_str(&format!(" [{index}]"));
    }
    out.push('\n');
    if let Some(ts) = &message.timestamp {
        out.push_str(&format!("   received: {ts}\n"));
    }
    if !message.stream_ids.is_empty() {
        out.push_str(&format!("   streams: {}\n", message.stream_ids.join(", ")));
    }
    for (name, value) in &message.formatted_fields {
        if name == "timestamp" {
            continue;
        }
        out.push_str(&format!("   {name}: {value}\n"));
    }
    out
}

fn diff_line(item: &DiffItem) -> String {
    let old = item.old_value.as_deref().unwrap_or_default();
    let new = item.new_value.as_deref().unwrap_or_default();
    match item.kind() {
        DiffKind::Added => format!("+ {}: {new}", item.field),
        DiffKind::Removed => format!("- {}: {old}", item.field),
        DiffKind::Changed => format!("~ {}: {old} -> {new}", item.field),
    }
}

/// One line per stream with its pipelines. `None` means the list has not
/// been fetched yet.
pub fn connections_overview(connections: Option<&[Connection]>) -> String {
    let Some(connections) = connections else {
        return format!("{LOADING_TEXT}\n");
    };
    if connections.is_empty() {
        return "No pipeline connections.\n".to_string();
    }
    let mut out = String::new();
    for c in connections {
        let pipelines: Vec<&str> = c.pipeline_ids.iter().map(String::as_str).collect();
        let pipelines = if pipelines.is_empty() {
            "(none)".to_string()
        } else {
            pipelines.join(", ")
        };
        out.push_str(&format!("{} -> {pipelines}\n", c.stream_id));
    }
    out
}
