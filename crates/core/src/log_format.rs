//! Text layout of the persisted assignment log.
//!
//! ```text
//! Default schedule:
//! :::0<->0
//! 1<->0
//!
//! :::Static schedule, chunk=1:
//! :::0<->0
//! 1<->1
//! ```
//!
//! `:::` separates headers from event blocks. A segment containing the word
//! `schedule` is a header, everything else is a block of `<i><-><w>` lines.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::LogParseError;
use crate::event::AssignmentEvent;
use crate::policy::SchedulePolicy;

pub const SEGMENT_SEPARATOR: &str = ":::";
const HEADER_MARKER: &str = "schedule";

/// Header text written before a section's events.
pub fn section_header(policy: &SchedulePolicy, first: bool) -> String {
    if first {
        format!("{}:\n{}", policy.label(), SEGMENT_SEPARATOR)
    } else {
        format!(
            "\n{sep}{}:\n{sep}",
            policy.label(),
            sep = SEGMENT_SEPARATOR
        )
    }
}

/// One event line, newline included.
pub fn event_line(event: &AssignmentEvent) -> String {
    format!("{}\n", event)
}

/// Events logged under one policy header, in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub policy: SchedulePolicy,
    pub events: Vec<AssignmentEvent>,
}

/// Load distribution of one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionBalance {
    /// Iterations executed per worker id.
    pub iterations: BTreeMap<usize, usize>,
    /// Contiguous index runs per worker id, i.e. chunks as seen from the log.
    pub observed_chunks: BTreeMap<usize, usize>,
    /// `max / mean` iterations over the workers present; 1.0 is perfect.
    pub imbalance: f64,
}

impl Section {
    pub fn balance(&self) -> SectionBalance {
        let mut iterations: BTreeMap<usize, usize> = BTreeMap::new();
        for event in &self.events {
            *iterations.entry(event.worker).or_default() += 1;
        }

        let mut by_index = self.events.clone();
        by_index.sort_by_key(|e| e.iteration);
        let mut observed_chunks: BTreeMap<usize, usize> = BTreeMap::new();
        let mut prev: Option<AssignmentEvent> = None;
        for event in by_index {
            let continues = prev
                .map(|p| p.worker == event.worker && p.iteration + 1 == event.iteration)
                .unwrap_or(false);
            if !continues {
                *observed_chunks.entry(event.worker).or_default() += 1;
            }
            prev = Some(event);
        }

        let imbalance = if iterations.is_empty() {
            0.0
        } else {
            let max = iterations.values().copied().max().unwrap_or(0) as f64;
            let mean = self.events.len() as f64 / iterations.len() as f64;
            max / mean
        };

        SectionBalance {
            iterations,
            observed_chunks,
            imbalance,
        }
    }
}

/// Parse a full log back into its sections.
pub fn parse_log(text: &str) -> Result<Vec<Section>, LogParseError> {
    let mut sections: Vec<Section> = Vec::new();

    for segment in text.split(SEGMENT_SEPARATOR) {
        if segment.contains(HEADER_MARKER) {
            let policy = SchedulePolicy::from_label(segment)
                .ok_or_else(|| LogParseError::MalformedHeader(segment.trim().to_string()))?;
            sections.push(Section {
                policy,
                events: Vec::new(),
            });
            continue;
        }

        for line in segment.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let event: AssignmentEvent = line.parse()?;
            match sections.last_mut() {
                Some(section) => section.events.push(event),
                None => return Err(LogParseError::OrphanEvents),
            }
        }
    }

    Ok(sections)
}
