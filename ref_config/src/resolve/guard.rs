//! Tracking of the references currently being followed.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{RefConfigError, RefResult};

/// Stack of active reference keys.
///
/// A key is a canonical file path followed by `#`, or `document#pointer`
/// for a back-reference. Entering a key that is already active is a cycle.
/// Keys are released on exit, so the same target may be referenced any
/// number of times side by side.
#[derive(Debug)]
pub(crate) struct ReferenceStack {
    visited: HashSet<String>,
    stack: Vec<String>,
    detect_cycles: bool,
    max_depth: usize,
}

impl ReferenceStack {
    pub(crate) fn new(detect_cycles: bool, max_depth: usize) -> Self {
        Self {
            visited: HashSet::new(),
            stack: Vec::new(),
            detect_cycles,
            max_depth,
        }
    }

    pub(crate) fn enter(&mut self, key: String) -> RefResult<()> {
        if self.stack.len() >= self.max_depth {
            return Err(Arc::new(RefConfigError::DepthExceeded {
                limit: self.max_depth,
                reference: key,
            }));
        }
        if self.detect_cycles && !self.visited.insert(key.clone()) {
            let mut cycle = self.stack.clone();
            cycle.push(key);
            return Err(Arc::new(RefConfigError::CyclicReference {
                cycle: cycle.join(" -> "),
            }));
        }
        self.stack.push(key);
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        if let Some(key) = self.stack.pop() {
            self.visited.remove(&key);
        }
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow, ensure};

    #[test]
    fn reentering_an_active_key_reports_the_chain() -> Result<()> {
        let mut refs = ReferenceStack::new(true, 8);
        refs.enter("a#".to_owned()).map_err(|e| anyhow!(e.to_string()))?;
        refs.enter("b#".to_owned()).map_err(|e| anyhow!(e.to_string()))?;
        let err = refs
            .enter("a#".to_owned())
            .err()
            .ok_or_else(|| anyhow!("expected a cycle"))?;
        ensure!(
            matches!(&*err, RefConfigError::CyclicReference { cycle } if cycle == "a# -> b# -> a#"),
            "unexpected error: {err}"
        );
        Ok(())
    }

    #[test]
    fn released_keys_can_be_entered_again() -> Result<()> {
        let mut refs = ReferenceStack::new(true, 8);
        refs.enter("a#".to_owned()).map_err(|e| anyhow!(e.to_string()))?;
        refs.leave();
        refs.enter("a#".to_owned()).map_err(|e| anyhow!(e.to_string()))?;
        ensure!(refs.depth() == 1, "unexpected depth {}", refs.depth());
        Ok(())
    }

    #[test]
    fn depth_limit_applies_without_cycle_detection() -> Result<()> {
        let mut refs = ReferenceStack::new(false, 2);
        refs.enter("a#".to_owned()).map_err(|e| anyhow!(e.to_string()))?;
        refs.enter("a#".to_owned()).map_err(|e| anyhow!(e.to_string()))?;
        let err = refs
            .enter("a#".to_owned())
            .err()
            .ok_or_else(|| anyhow!("expected depth error"))?;
        ensure!(
            matches!(&*err, RefConfigError::DepthExceeded { limit: 2, .. }),
            "unexpected error: {err}"
        );
        Ok(())
    }
}
