use std::fmt;
use std::time::Duration;

use crate::error::PlankError;
use crate::network::PlankAddress;

/// Pipeline stage that emitted a diagnostic or timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Sweep,
    Stack,
    Cutters,
    Intersect,
    Fabricate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sweep => "sweep",
            Self::Stack => "stack",
            Self::Cutters => "cutters",
            Self::Intersect => "intersect",
            Self::Fabricate => "fabricate",
        };
        f.write_str(name)
    }
}

/// Error class of a dropped record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Validation,
    Construction,
    Logic,
}

impl From<&PlankError> for DiagnosticKind {
    fn from(err: &PlankError) -> Self {
        match err {
            PlankError::Validation(_) => Self::Validation,
            PlankError::Construction(_) => Self::Construction,
            PlankError::Logic(_) => Self::Logic,
        }
    }
}

/// One address whose output was omitted, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub stage: Stage,
    /// Address of the omitted record; `None` for stage-wide events.
    pub address: Option<PlankAddress>,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    /// Records `err` as the reason `address` was dropped at `stage`.
    ///
    /// Also emits a `warn` event.
    #[must_use]
    pub fn dropped(stage: Stage, address: Option<PlankAddress>, err: &PlankError) -> Self {
        match address {
            Some(address) => tracing::warn!(%stage, %address, error = %err, "record dropped"),
            None => tracing::warn!(%stage, error = %err, "record dropped"),
        }
        Self {
            stage,
            address,
            kind: err.into(),
            message: err.to_string(),
        }
    }
}

/// Wall-clock time spent in one stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTiming {
    pub stage: Stage,
    pub elapsed: Duration,
}

/// Output of one stage together with what went wrong along the way.
#[derive(Debug, Clone)]
pub struct StageReport<T> {
    pub output: T,
    pub diagnostics: Vec<Diagnostic>,
    pub timings: Vec<PhaseTiming>,
}

impl<T> StageReport<T> {
    /// Wraps an output with no diagnostics.
    #[must_use]
    pub fn new(output: T) -> Self {
        Self {
            output,
            diagnostics: Vec::new(),
            timings: Vec::new(),
        }
    }

    /// Returns `true` if no record was dropped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Appends diagnostics and timings to the given vectors and returns the
    /// output.
    pub fn drain_into(self, diagnostics: &mut Vec<Diagnostic>, timings: &mut Vec<PhaseTiming>) -> T {
        diagnostics.extend(self.diagnostics);
        timings.extend(self.timings);
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConstructionError, LogicError};

    #[test]
    fn diagnostic_records_kind_and_message() {
        let address = PlankAddress::new(0, 1, 0, Some(0));
        let err = PlankError::from(LogicError::ParallelEdgeCount {
            segment: 2,
            found: 1,
        });
        let diag = Diagnostic::dropped(Stage::Intersect, Some(address), &err);
        assert_eq!(diag.kind, DiagnosticKind::Logic);
        assert_eq!(diag.address, Some(address));
        assert!(diag.message.contains("segment 2"));
    }

    #[test]
    fn report_drains_into_sinks() {
        let mut report = StageReport::new(7);
        report.diagnostics.push(Diagnostic::dropped(
            Stage::Stack,
            None,
            &ConstructionError::ZeroVector.into(),
        ));
        report.timings.push(PhaseTiming {
            stage: Stage::Stack,
            elapsed: Duration::from_millis(3),
        });
        assert!(!report.is_clean());
        let (mut diagnostics, mut timings) = (Vec::new(), Vec::new());
        assert_eq!(report.drain_into(&mut diagnostics, &mut timings), 7);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Construction);
        assert_eq!(timings.len(), 1);
        assert_eq!(Stage::Fabricate.to_string(), "fabricate");
    }
}
