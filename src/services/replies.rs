use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub const DEFAULT_REPLIES: &[&str] = &[
    "That's interesting! Tell me more.",
    "I see what you mean.",
    "Could you elaborate on that?",
    "Great question! Let me think about it.",
    "Here's a thought: try looking at it from another angle.",
    "I'm not sure, but it sounds promising.",
    "Thanks for sharing that with me.",
    "Absolutely, that makes sense.",
];

const FALLBACK_REPLY: &str = "...";

/// Where simulated assistant replies come from
pub trait ReplySource {
    fn next_reply(&mut self) -> String;
}

/// Uniform draw from a fixed reply set
pub struct RandomReplies {
    replies: Vec<String>,
    rng: StdRng,
}

impl RandomReplies {
    pub fn seeded(replies: Vec<String>, seed: u64) -> Self {
        Self {
            replies,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy(replies: Vec<String>) -> Self {
        Self {
            replies,
            rng: StdRng::from_entropy(),
        }
    }

    /// Built from config; an empty list falls back to the default set
    pub fn from_settings(replies: &[String], seed: Option<u64>) -> Self {
        let replies = if replies.is_empty() {
            DEFAULT_REPLIES.iter().map(|reply| (*reply).to_string()).collect()
        } else {
            replies.to_vec()
        };
        match seed {
            Some(seed) => Self::seeded(replies, seed),
            None => Self::from_entropy(replies),
        }
    }
}

impl ReplySource for RandomReplies {
    fn next_reply(&mut self) -> String {
        self.replies
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| FALLBACK_REPLY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        DEFAULT_REPLIES.iter().map(|reply| (*reply).to_string()).collect()
    }

    #[test]
    fn test_replies_come_from_the_set() {
        let mut source = RandomReplies::seeded(defaults(), 7);
        for _ in 0..50 {
            let reply = source.next_reply();
            assert!(DEFAULT_REPLIES.contains(&reply.as_str()));
        }
    }

    #[test]
    fn test_same_seed_gives_same_sequence() {
        let mut first = RandomReplies::seeded(defaults(), 42);
        let mut second = RandomReplies::seeded(defaults(), 42);
        let a: Vec<String> = (0..10).map(|_| first.next_reply()).collect();
        let b: Vec<String> = (0..10).map(|_| second.next_reply()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_set_falls_back() {
        let mut source = RandomReplies::seeded(Vec::new(), 1);
        assert_eq!(source.next_reply(), FALLBACK_REPLY);

        let mut configured = RandomReplies::from_settings(&[], Some(1));
        assert!(DEFAULT_REPLIES.contains(&configured.next_reply().as_str()));
    }
}
