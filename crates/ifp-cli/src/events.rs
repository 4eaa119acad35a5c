use ifpkit::engine::events::{Event, EventCallback};
use tracing::{debug, info, warn};

/// Forwards pipeline events of one unit to the log.
pub fn logging_callback(unit: String) -> EventCallback<'static> {
    Box::new(move |event: Event| match event {
        Event::PhaseStart { name } => debug!(unit = %unit, "Phase started: {name}"),
        Event::PhaseFinish => debug!(unit = %unit, "Phase finished."),
        Event::CompoundPerceived { compound, groups } => {
            debug!(unit = %unit, "{compound}: {groups} groups perceived.")
        }
        Event::CompoundFailed { compound, reason } => {
            warn!(unit = %unit, "{compound} skipped: {reason}")
        }
        Event::TemplateSkipped {
            compound,
            atoms,
            missing,
        } => debug!(
            unit = %unit,
            "{compound}: template [{atoms}] skipped, missing {}",
            missing.join(",")
        ),
        Event::IslandsMerged {
            islands,
            interactions,
        } => info!(
            unit = %unit,
            "{islands} hydrophobic islands formed, {interactions} interactions lifted."
        ),
        Event::ShellsCreated { total, unique } => {
            info!(unit = %unit, "{total} shells created ({unique} unique identifiers).")
        }
        Event::Message(msg) => info!(unit = %unit, "{msg}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifpkit::engine::events::EventReporter;

    #[test]
    fn callback_accepts_every_event_kind() {
        let reporter = EventReporter::with_callback(logging_callback("unit".to_string()));
        for event in [
            Event::PhaseStart { name: "Perception" },
            Event::PhaseFinish,
            Event::CompoundPerceived {
                compound: "A/ALA1".to_string(),
                groups: 3,
            },
            Event::CompoundFailed {
                compound: "A/SER2".to_string(),
                reason: "missing atoms".to_string(),
            },
            Event::TemplateSkipped {
                compound: "A/GLY3".to_string(),
                atoms: "C,O,OXT".to_string(),
                missing: vec!["OXT".to_string()],
            },
            Event::IslandsMerged {
                islands: 2,
                interactions: 3,
            },
            Event::ShellsCreated {
                total: 10,
                unique: 8,
            },
            Event::Message("done".to_string()),
        ] {
            reporter.report(event);
        }
    }
}
