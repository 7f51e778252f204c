//! Shared region id generation.

use std::collections::HashSet;

use uuid::Uuid;

use crate::config::IdStrategy;

const TOKEN_LEN: usize = 8;

/// Hands out region ids that are unique within one document.
#[derive(Debug, Clone)]
pub struct RegionIds {
    strategy: IdStrategy,
    counter: u64,
    issued: HashSet<String>,
}

impl RegionIds {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            counter: 0,
            issued: HashSet::new(),
        }
    }

    pub fn next_id(&mut self) -> String {
        loop {
            let candidate = match self.strategy {
                IdStrategy::Random => random_token(),
                IdStrategy::Sequential => {
                    self.counter += 1;
                    format!("{:0width$}", self.counter, width = TOKEN_LEN)
                }
            };
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    pub fn issued(&self) -> usize {
        self.issued.len()
    }
}

fn random_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(TOKEN_LEN);
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut ids = RegionIds::new(IdStrategy::Sequential);
        assert_eq!(ids.next_id(), "00000001");
        assert_eq!(ids.next_id(), "00000002");
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_random_ids_are_unique_tokens() {
        let mut ids = RegionIds::new(IdStrategy::Random);
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            let id = ids.next_id();
            assert_eq!(id.len(), TOKEN_LEN);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
            assert!(seen.insert(id));
        }
    }
}
