// self
use crate::obs::{PhaseOutcome, RequestPhase};

/// Records a phase outcome via the global metrics recorder (when enabled).
pub fn record_phase_outcome(phase: RequestPhase, outcome: PhaseOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"silent_refresh_request_total",
			"phase" => phase.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (phase, outcome);
	}
}
