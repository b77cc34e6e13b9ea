use serde::{Deserialize, Serialize};
use statig::prelude::*;

/// Artifact-completion events fed to the pipeline flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineEvent {
    OfferGenerated,
    StructureGenerated,
    CopyGenerated,
}

/// How far along the linear chain the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Progress {
    Empty,
    OfferReady,
    StructureReady,
    CopyReady,
}

/// Linear progress through offer → structure → copy.
///
/// A new offer always rewinds to `OfferReady`. Structure and copy only move
/// forward; regenerating them later is absorbed in place.
#[derive(Debug, Default)]
pub struct PipelineFlow;

#[state_machine(initial = "State::empty()", state(derive(Debug, Clone, PartialEq, Eq)))]
impl PipelineFlow {
    #[state]
    fn empty(event: &PipelineEvent) -> Outcome<State> {
        match event {
            PipelineEvent::OfferGenerated => {
                tracing::debug!("Pipeline: empty -> offer_ready");
                Transition(State::offer_ready())
            }
            _ => Handled,
        }
    }

    #[state]
    fn offer_ready(event: &PipelineEvent) -> Outcome<State> {
        match event {
            PipelineEvent::OfferGenerated => Transition(State::offer_ready()),
            PipelineEvent::StructureGenerated => {
                tracing::debug!("Pipeline: offer_ready -> structure_ready");
                Transition(State::structure_ready())
            }
            PipelineEvent::CopyGenerated => {
                tracing::debug!("Pipeline: offer_ready -> copy_ready");
                Transition(State::copy_ready())
            }
        }
    }

    #[state]
    fn structure_ready(event: &PipelineEvent) -> Outcome<State> {
        match event {
            PipelineEvent::OfferGenerated => {
                tracing::debug!("Pipeline: structure_ready -> offer_ready");
                Transition(State::offer_ready())
            }
            PipelineEvent::StructureGenerated => Handled,
            PipelineEvent::CopyGenerated => {
                tracing::debug!("Pipeline: structure_ready -> copy_ready");
                Transition(State::copy_ready())
            }
        }
    }

    #[state]
    fn copy_ready(event: &PipelineEvent) -> Outcome<State> {
        match event {
            PipelineEvent::OfferGenerated => {
                tracing::debug!("Pipeline: copy_ready -> offer_ready");
                Transition(State::offer_ready())
            }
            _ => Handled,
        }
    }
}

/// Maps the generated state enum onto the public `Progress` ordering.
pub fn progress_of(state: &State) -> Progress {
    match state {
        State::Empty { .. } => Progress::Empty,
        State::OfferReady { .. } => Progress::OfferReady,
        State::StructureReady { .. } => Progress::StructureReady,
        State::CopyReady { .. } => Progress::CopyReady,
    }
}
