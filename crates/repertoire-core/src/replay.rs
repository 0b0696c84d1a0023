//! Deterministic replay of ply sequences through a position engine.

use shakmaty::{fen::Fen, san::SanPlus, CastlingMode, Chess, EnPassantMode, Position};

use crate::error::ReplayError;

/// Legal-move collaborator. The core never checks legality itself.
pub trait PositionEngine {
    type Position: Clone;

    /// Canonical initial position.
    fn start_position(&self) -> Self::Position;

    /// Apply one ply token, returning the new position and the ply's
    /// canonical spelling. `None` when the token is not a legal move here.
    ///
    /// Tokens naming the same move (`Qh5` and `Qh5+`, `Ngf3` and `Nf3`)
    /// must yield the same canonical spelling.
    fn apply(&self, position: &Self::Position, ply: &str) -> Option<(Self::Position, String)>;

    /// Canonical string form. Semantically identical positions must
    /// serialize identically.
    fn position_string(&self, position: &Self::Position) -> String;

    /// Bring a foreign position string into canonical form, if it parses.
    fn canonicalize(&self, position_string: &str) -> Option<String>;
}

/// `shakmaty`-backed engine speaking SAN and FEN.
///
/// Position strings are FEN without the move counters
/// (placement, side, castling, en passant).
#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyEngine;

impl ShakmatyEngine {
    fn normalized_fen(board: &Chess) -> String {
        let fen = Fen::from_position(board, EnPassantMode::Legal);
        let fen_str = fen.to_string();
        fen_str.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
    }
}

impl PositionEngine for ShakmatyEngine {
    type Position = Chess;

    fn start_position(&self) -> Chess {
        Chess::default()
    }

    fn apply(&self, position: &Chess, ply: &str) -> Option<(Chess, String)> {
        let san: SanPlus = ply.parse().ok()?;
        let mv = san.san.to_move(position).ok()?;
        let canonical = SanPlus::from_move(position.clone(), mv).to_string();
        let next = position.clone().play(mv).ok()?;
        Some((next, canonical))
    }

    fn position_string(&self, position: &Chess) -> String {
        Self::normalized_fen(position)
    }

    fn canonicalize(&self, position_string: &str) -> Option<String> {
        let fields = position_string.split_whitespace().count();
        let full = match fields {
            4 => format!("{position_string} 0 1"),
            6 => position_string.to_string(),
            _ => return None,
        };
        let fen: Fen = full.parse().ok()?;
        let pos: Chess = fen.into_position(CastlingMode::Standard).ok()?;
        Some(Self::normalized_fen(&pos))
    }
}

/// Replay `plies[..up_to]` from the start position and return the engine's
/// position. Fails on the first ply that does not apply.
pub fn replay_position<E, S>(
    engine: &E,
    plies: &[S],
    up_to: usize,
) -> Result<E::Position, ReplayError>
where
    E: PositionEngine,
    S: AsRef<str>,
{
    if up_to > plies.len() {
        return Err(ReplayError::OutOfRange {
            up_to,
            len: plies.len(),
        });
    }
    let (position, _) = replay_canonical(engine, &plies[..up_to])?;
    Ok(position)
}

/// Replay every ply, returning the final position and each ply in the
/// engine's canonical spelling.
pub fn replay_canonical<E, S>(
    engine: &E,
    plies: &[S],
) -> Result<(E::Position, Vec<String>), ReplayError>
where
    E: PositionEngine,
    S: AsRef<str>,
{
    let mut position = engine.start_position();
    let mut canonical = Vec::with_capacity(plies.len());
    for (index, ply) in plies.iter().enumerate() {
        let token = ply.as_ref();
        let (next, spelled) = engine
            .apply(&position, token)
            .ok_or_else(|| ReplayError::IllegalMove {
                index,
                token: token.to_string(),
            })?;
        position = next;
        canonical.push(spelled);
    }
    Ok((position, canonical))
}

/// Replay `plies[..up_to]` and serialize the resulting position.
pub fn replay<E, S>(engine: &E, plies: &[S], up_to: usize) -> Result<String, ReplayError>
where
    E: PositionEngine,
    S: AsRef<str>,
{
    let position = replay_position(engine, plies, up_to)?;
    Ok(engine.position_string(&position))
}
