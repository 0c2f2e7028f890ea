/// Focus transition produced by an activation; both sides are focus-order
/// slots that the session redraws once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusChange {
    pub deactivated: Option<usize>,
    pub activated: Option<usize>,
}

impl FocusChange {
    pub fn is_noop(&self) -> bool {
        self.deactivated.is_none() && self.activated.is_none()
    }
}

/// Tracks which input (if any) holds focus.
///
/// Indices are positions in the session's focus-order list. The manager
/// enforces the at-most-one-active invariant: every activation first drops
/// the current holder.
#[derive(Debug, Default)]
pub struct FocusManager {
    active: Option<usize>,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub(crate) fn seed(&mut self, slot: Option<usize>) {
        self.active = slot;
    }

    /// Deactivate the current holder, then activate `target` if it is in
    /// range; out-of-range targets leave focus on none.
    pub fn activate(&mut self, target: Option<usize>, input_count: usize) -> FocusChange {
        let deactivated = self.active.take();
        let activated = target.filter(|slot| *slot < input_count);
        self.active = activated;
        FocusChange {
            deactivated,
            activated,
        }
    }

    /// Slot reached by moving focus forward: from none jump to the first
    /// input, otherwise wrap modulo the input count.
    pub fn next(&self, input_count: usize) -> Option<usize> {
        if input_count == 0 {
            return None;
        }
        Some(match self.active {
            None => 0,
            Some(slot) => (slot + 1) % input_count,
        })
    }

    /// Slot reached by moving focus backward: from none jump to the last
    /// input.
    pub fn prev(&self, input_count: usize) -> Option<usize> {
        if input_count == 0 {
            return None;
        }
        Some(match self.active {
            None => input_count - 1,
            Some(slot) => (slot + input_count - 1) % input_count,
        })
    }
}
