/// Where a round is in its lifecycle.
///
/// `Loading -> Ready -> {Correct | WrongRetry | TimedOut | GameOver}`.
/// `WrongRetry` goes back to `Ready` once the wrong-answer feedback is
/// cleared. `GameOver` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    Loading,
    Ready,
    Correct,
    WrongRetry,
    /// Soundtrack countdown ran out with lives left.
    TimedOut,
    GameOver,
}

impl RoundPhase {
    pub fn accepts_guesses(&self) -> bool {
        matches!(self, RoundPhase::Ready)
    }

    /// The answer is shown and the player can move to the next round.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            RoundPhase::Correct | RoundPhase::TimedOut | RoundPhase::GameOver
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Wrong { lives_left: u32 },
    GameOver { final_score: u32 },
    /// The round was not accepting guesses (feedback still showing or the
    /// answer already revealed).
    Ignored,
}
