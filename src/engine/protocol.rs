use crate::engine::narration::NarrationError;

/// Sent from the reveal worker to the UI thread. `generation` identifies the
/// reveal that produced it; updates from older reveals are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealUpdate {
    pub generation: u64,
    pub step: RevealStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    Unit(char),
    ParagraphBreak,
    Finished,
}

/// Sent from a narration worker when its utterance ends on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrationEvent {
    Finished,
    Failed(NarrationError),
}
