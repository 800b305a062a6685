use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::engine::protocol::{RevealStep, RevealUpdate};
use crate::model::story::StoryText;

pub const PARAGRAPH_BREAK: &str = "\n\n";

/// Anything the typewriter can write into. Only ever touched on the UI thread.
pub trait DisplaySurface {
    fn clear(&mut self);
    fn append(&mut self, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Idle,
    Revealing,
    Completed,
    Cancelled,
}

/// Per-character delays of the typewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub sentence_end: Duration,
    pub clause: Duration,
    pub letter: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            sentence_end: Duration::from_millis(100),
            clause: Duration::from_millis(50),
            letter: Duration::from_millis(20),
        }
    }
}

impl Pacing {
    #[cfg(test)]
    pub const fn instant() -> Self {
        Self {
            sentence_end: Duration::ZERO,
            clause: Duration::ZERO,
            letter: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, unit: char) -> Duration {
        match unit {
            '.' | '!' | '?' => self.sentence_end,
            ',' | ';' | ':' => self.clause,
            _ => self.letter,
        }
    }
}

/// Typewriter reveal of the current story.
///
/// Pacing runs on a worker thread which only posts [`RevealUpdate`]s; the
/// UI thread applies them through [`RevealController::pump`]. Every reveal
/// gets a new generation, so updates still in flight from a cancelled reveal
/// are discarded instead of leaking into the new text.
pub struct RevealController {
    pacing: Pacing,
    state: RevealState,
    generation: u64,
    cancel: Option<Arc<AtomicBool>>,
    tx: Sender<RevealUpdate>,
    rx: Receiver<RevealUpdate>,
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new(Pacing::default())
    }
}

impl RevealController {
    pub fn new(pacing: Pacing) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            pacing,
            state: RevealState::Idle,
            generation: 0,
            cancel: None,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn is_revealing(&self) -> bool {
        self.state == RevealState::Revealing
    }

    pub fn start(&mut self, text: StoryText, surface: &mut dyn DisplaySurface) {
        self.cancel();

        self.generation += 1;
        surface.clear();

        let cancel = Arc::new(AtomicBool::new(false));
        self.cancel = Some(Arc::clone(&cancel));
        self.state = RevealState::Revealing;

        let tx = self.tx.clone();
        let pacing = self.pacing;
        let generation = self.generation;
        log::debug!("reveal #{generation} started ({} chars)", text.as_str().len());

        thread::spawn(move || type_out(&text, pacing, &cancel, &tx, generation));
    }

    /// Stops the running reveal. Does nothing unless a reveal is running.
    pub fn cancel(&mut self) {
        if self.state != RevealState::Revealing {
            return;
        }
        if let Some(flag) = self.cancel.take() {
            flag.store(true, Ordering::Release);
        }
        self.state = RevealState::Cancelled;
        log::debug!("reveal #{} cancelled", self.generation);
    }

    /// Applies pending updates of the current reveal. Returns whether the
    /// surface changed.
    pub fn pump(&mut self, surface: &mut dyn DisplaySurface) -> bool {
        let mut changed = false;

        while let Ok(update) = self.rx.try_recv() {
            if update.generation != self.generation || self.state != RevealState::Revealing {
                continue;
            }

            match update.step {
                RevealStep::Unit(unit) => {
                    let mut buf = [0u8; 4];
                    surface.append(unit.encode_utf8(&mut buf));
                    changed = true;
                }
                RevealStep::ParagraphBreak => {
                    surface.append(PARAGRAPH_BREAK);
                    changed = true;
                }
                RevealStep::Finished => {
                    self.cancel = None;
                    self.state = RevealState::Completed;
                    log::debug!("reveal #{} completed", self.generation);
                }
            }
        }

        changed
    }
}

impl Drop for RevealController {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn type_out(
    text: &StoryText,
    pacing: Pacing,
    cancel: &AtomicBool,
    tx: &Sender<RevealUpdate>,
    generation: u64,
) {
    let send = |step| {
        !cancel.load(Ordering::Acquire) && tx.send(RevealUpdate { generation, step }).is_ok()
    };

    let paragraphs: Vec<&str> = text.as_str().split(PARAGRAPH_BREAK).collect();
    let last = paragraphs.len().saturating_sub(1);

    for (i, paragraph) in paragraphs.iter().enumerate() {
        for unit in paragraph.chars() {
            if !send(RevealStep::Unit(unit)) {
                return;
            }
            thread::sleep(pacing.delay_for(unit));
        }

        if i < last && !send(RevealStep::ParagraphBreak) {
            return;
        }
    }

    send(RevealStep::Finished);
}
