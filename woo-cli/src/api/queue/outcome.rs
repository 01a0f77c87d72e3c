//! Result of one dispatch pass

use crate::api::error::WooError;

/// Raw responses of a dispatch pass, positionally matching the queue
///
/// Slot `i` belongs to the `i`-th queued request regardless of which worker
/// ran it or when it finished. Failed slots are `None` and have an entry in
/// `failures`, sorted by position.
#[derive(Debug, Default)]
pub struct QueueOutcome {
    pub responses: Vec<Option<Vec<u8>>>,
    pub failures: Vec<(usize, WooError)>,
}

impl QueueOutcome {
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// True when every slot holds a response
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.responses.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn first_failure(&self) -> Option<&(usize, WooError)> {
        self.failures.first()
    }

    pub fn failure_at(&self, index: usize) -> Option<&WooError> {
        self.failures
            .iter()
            .find(|(position, _)| *position == index)
            .map(|(_, err)| err)
    }

    /// Successful responses in queue order, failed slots skipped
    pub fn successful(&self) -> impl Iterator<Item = &[u8]> {
        self.responses.iter().filter_map(|slot| slot.as_deref())
    }

    pub fn into_responses(self) -> Vec<Option<Vec<u8>>> {
        self.responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let outcome = QueueOutcome {
            responses: vec![Some(b"a".to_vec()), None, Some(b"c".to_vec())],
            failures: vec![(1, WooError::Cancelled)],
        };

        assert_eq!(outcome.len(), 3);
        assert_eq!(outcome.succeeded(), 2);
        assert_eq!(outcome.failed(), 1);
        assert!(!outcome.is_complete());
        assert!(matches!(outcome.failure_at(1), Some(WooError::Cancelled)));
        assert!(outcome.failure_at(0).is_none());
        let ok: Vec<&[u8]> = outcome.successful().collect();
        assert_eq!(ok, vec![b"a".as_slice(), b"c".as_slice()]);
    }
}
