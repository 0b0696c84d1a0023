//! Runtime training session: one learner working through one opening.
//!
//! Operations are driven one at a time by learner actions. Anything that
//! would be rejected (an illegal ply, a rewind past the start) leaves the
//! session exactly as it was.

use serde::{Deserialize, Serialize};
use shakmaty::Color;
use tracing::debug;

use crate::error::{ReplayError, SessionError};
use crate::navigator::{LineState, OpeningLine, Progress};
use crate::record::OpeningRecord;
use crate::replay::{replay_canonical, replay_position, PositionEngine};
use crate::transposition::TranspositionDetector;

/// Context of a learner leaving the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deviation {
    pub opening_name: String,
    /// Plies played before the deviating one.
    pub moves_completed: usize,
    pub played: String,
    pub expected: Option<String>,
    /// A different known opening reached by the deviating ply.
    pub transposition: Option<OpeningRecord>,
}

/// Notifications for whatever presents the session. The core only reports
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Deviated(Deviation),
    LineCompleted { opening_name: String, total_plies: usize },
    /// First ply past the end of a completed line. `expected` is always
    /// `None`; the transposition check runs as for a deviation.
    BeyondLine(Deviation),
    /// Undo brought a deviated session back onto the line.
    Rejoined { ply_index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyOutcome {
    pub ply: String,
    pub state: LineState,
    pub event: Option<SessionEvent>,
}

/// Persistable shape of a session, keyed by opening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub eco_code: String,
    pub opening_name: String,
    pub played_plies: Vec<String>,
}

pub struct RepertoireSession<'a, E: PositionEngine> {
    engine: &'a E,
    line: OpeningLine,
    played_plies: Vec<String>,
    position: E::Position,
    state: LineState,
    detector: Option<TranspositionDetector<'a>>,
}

impl<'a, E: PositionEngine> RepertoireSession<'a, E> {
    /// Start at the initial position. The line is respelled in the engine's
    /// canonical SAN so equivalent spellings of a book move stay in line.
    pub fn start(engine: &'a E, line: OpeningLine) -> Self {
        let line = line.with_canonical_plies(engine);
        let state = line.line_state::<String>(&[]);
        Self {
            engine,
            line,
            played_plies: Vec::new(),
            position: engine.start_position(),
            state,
            detector: None,
        }
    }

    /// Restore a saved session by replaying its plies.
    pub fn resume(
        engine: &'a E,
        line: OpeningLine,
        snapshot: &SessionSnapshot,
    ) -> Result<Self, SessionError> {
        let record = line.record();
        if snapshot.eco_code != record.eco_code.as_str() || snapshot.opening_name != record.name {
            return Err(SessionError::OpeningMismatch {
                expected: format!("{} {}", record.eco_code, record.name),
                found: format!("{} {}", snapshot.eco_code, snapshot.opening_name),
            });
        }

        let line = line.with_canonical_plies(engine);
        let (position, played_plies) =
            replay_canonical(engine, snapshot.played_plies.as_slice()).map_err(illegal_move)?;
        let state = line.line_state(played_plies.as_slice());
        Ok(Self {
            engine,
            line,
            played_plies,
            position,
            state,
            detector: None,
        })
    }

    /// Report transpositions into other known openings on deviation.
    pub fn with_transpositions(mut self, detector: TranspositionDetector<'a>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn line(&self) -> &OpeningLine {
        &self.line
    }

    pub fn user_color(&self) -> Color {
        self.line.user_color()
    }

    pub fn ply_index(&self) -> usize {
        self.played_plies.len()
    }

    pub fn played_plies(&self) -> &[String] {
        &self.played_plies
    }

    pub fn state(&self) -> LineState {
        self.state
    }

    pub fn position(&self) -> &E::Position {
        &self.position
    }

    pub fn position_string(&self) -> String {
        self.engine.position_string(&self.position)
    }

    pub fn progress(&self) -> Progress {
        self.line.progress(self.ply_index())
    }

    /// Next ply of the line, unless the learner has left it.
    pub fn expected_next_ply(&self) -> Option<&str> {
        match self.state {
            LineState::InLine => self.line.expected_ply(self.ply_index()),
            LineState::Deviated | LineState::EndOfLine => None,
        }
    }

    pub fn is_opponent_turn(&self) -> bool {
        self.line.is_opponent_turn(self.ply_index())
    }

    pub fn matches_mainline(&self) -> bool {
        self.line.matches_mainline(self.played_plies.as_slice())
    }

    /// Play one ply. Illegal plies are rejected without touching the session
    /// and are never counted as deviations. The ply is recorded in canonical
    /// SAN, so `Qh5` and `Qh5+` are the same move.
    pub fn play(&mut self, ply: &str) -> Result<PlyOutcome, SessionError> {
        let ply_index = self.ply_index();
        let (next, ply) = self
            .engine
            .apply(&self.position, ply)
            .ok_or_else(|| SessionError::IllegalMove {
                ply_index,
                token: ply.to_string(),
            })?;

        self.position = next;
        self.played_plies.push(ply.clone());

        let previous = self.state;
        self.state = self.line.line_state(self.played_plies.as_slice());

        let event = match (previous, self.state) {
            (LineState::InLine, LineState::Deviated) => {
                Some(SessionEvent::Deviated(self.deviation(ply_index, &ply)))
            }
            (LineState::EndOfLine, LineState::EndOfLine) if ply_index == self.line.len() => {
                Some(SessionEvent::BeyondLine(self.deviation(ply_index, &ply)))
            }
            (LineState::InLine, LineState::EndOfLine) => Some(SessionEvent::LineCompleted {
                opening_name: self.line.name().to_string(),
                total_plies: self.line.len(),
            }),
            _ => None,
        };

        debug!(ply = %ply, ply_index, state = ?self.state, "Played ply");

        Ok(PlyOutcome {
            ply,
            state: self.state,
            event,
        })
    }

    /// Auto-play the opponent's book reply when it is their turn on the line.
    pub fn play_opponent_reply(&mut self) -> Result<Option<PlyOutcome>, SessionError> {
        if self.state != LineState::InLine {
            return Ok(None);
        }
        let Some(reply) = self.line.opponent_next_ply(self.ply_index()) else {
            return Ok(None);
        };
        let reply = reply.to_string();
        self.play(&reply).map(Some)
    }

    /// Take back the last ply. A no-op at the start position.
    pub fn undo(&mut self) -> Result<Option<SessionEvent>, SessionError> {
        self.rewind_to(self.ply_index().saturating_sub(1))
    }

    /// Truncate history to `target` plies.
    pub fn rewind_to(&mut self, target: usize) -> Result<Option<SessionEvent>, SessionError> {
        let ply_index = self.ply_index();
        if target > ply_index {
            return Err(SessionError::RewindBeyondHistory { target, ply_index });
        }

        let position = replay_position(self.engine, self.played_plies.as_slice(), target)
            .map_err(illegal_move)?;
        self.position = position;
        self.played_plies.truncate(target);

        let previous = self.state;
        self.state = self.line.line_state(self.played_plies.as_slice());

        let event = (previous == LineState::Deviated && self.state != LineState::Deviated)
            .then_some(SessionEvent::Rejoined { ply_index: target });
        Ok(event)
    }

    /// Back to the start of the line.
    pub fn restart(&mut self) {
        self.position = self.engine.start_position();
        self.played_plies.clear();
        self.state = self.line.line_state::<String>(&[]);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let record = self.line.record();
        SessionSnapshot {
            eco_code: record.eco_code.to_string(),
            opening_name: record.name.clone(),
            played_plies: self.played_plies.clone(),
        }
    }

    fn deviation(&self, moves_completed: usize, played: &str) -> Deviation {
        let transposition = self.detector.and_then(|detector| {
            let position = self.engine.position_string(&self.position);
            detector.detect_other(&position, self.line.record()).cloned()
        });
        Deviation {
            opening_name: self.line.name().to_string(),
            moves_completed,
            played: played.to_string(),
            expected: self.line.expected_ply(moves_completed).map(str::to_string),
            transposition,
        }
    }
}

fn illegal_move(err: ReplayError) -> SessionError {
    match err {
        ReplayError::IllegalMove { index, token } => SessionError::IllegalMove {
            ply_index: index,
            token,
        },
        other => SessionError::Replay(other),
    }
}
