use rand::Rng;

/// Fixed guessing vocabulary. Rounds draw from it uniformly; the list is
/// a static collaborator of the round state machine, not game state.
pub const WORDS: &[&str] = &[
    "apple", "banana", "computer", "sun", "moon", "cat", "dog", "table", "chair",
];

pub fn pick() -> &'static str {
    WORDS[rand::thread_rng().gen_range(0..WORDS.len())]
}
