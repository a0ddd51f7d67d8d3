//! Random nickname generation for new accounts

use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "brave", "calm", "clever", "eager", "fancy", "gentle", "happy", "jolly", "kind", "lively",
    "nimble", "proud", "quick", "silly", "swift", "witty",
];

const NOUNS: &[&str] = &[
    "badger", "falcon", "fox", "heron", "koala", "lynx", "otter", "panda", "raven", "tiger",
    "walrus", "wombat",
];

/// Generate a nickname such as `swift_otter_42`
///
/// Output always satisfies [`crate::validation::validate_nickname`].
pub fn generate_nickname() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
    let number: u16 = rng.gen_range(0..1000);
    format!("{}_{}_{}", adjective, noun, number)
}
