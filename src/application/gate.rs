//! Re-entrancy gate for operations that must not overlap

use std::cell::Cell;

/// Admits one caller at a time; a nested attempt is turned away
#[derive(Debug, Default)]
pub struct Gate {
    busy: Cell<bool>,
}

impl Gate {
    pub fn enter(&self) -> Option<GateGuard<'_>> {
        if self.busy.replace(true) {
            None
        } else {
            Some(GateGuard { gate: self })
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

pub struct GateGuard<'a> {
    gate: &'a Gate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_enter_is_refused_until_guard_drops() {
        let gate = Gate::default();
        let guard = gate.enter();
        assert!(guard.is_some());
        assert!(gate.enter().is_none());
        drop(guard);
        assert!(!gate.is_busy());
        assert!(gate.enter().is_some());
    }
}
