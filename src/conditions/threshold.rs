//! IfEqual / IfAbove / IfBelow evaluation
//!
//! thresholds are always single-shot: an action fires when its condition
//! starts holding and the flag is cleared as soon as it stops

use super::types::{Threshold, ThresholdSet};

fn step<T>(threshold: &mut Threshold<T>, holds: bool, fire: &mut impl FnMut(&str)) {
    if threshold.action.is_empty() {
        return;
    }

    if !holds {
        threshold.committed = false;
        return;
    }

    if !threshold.committed {
        // commit before firing: the action may trigger another update
        threshold.committed = true;
        fire(&threshold.action);
    }
}

/// evaluate equal, above, below in that order
pub fn evaluate_thresholds(set: &mut ThresholdSet, value: f64, mut fire: impl FnMut(&str)) {
    let holds = set.equal_holds(value);
    step(&mut set.equal, holds, &mut fire);

    let holds = set.above_holds(value);
    step(&mut set.above, holds, &mut fire);

    let holds = set.below_holds(value);
    step(&mut set.below, holds, &mut fire);
}

/// clear any flag whose condition does not hold for `value`; never sets a
/// flag and never fires
pub fn reset_thresholds(set: &mut ThresholdSet, value: f64) {
    if !set.equal_holds(value) {
        set.equal.committed = false;
    }
    if !set.above_holds(value) {
        set.above.committed = false;
    }
    if !set.below_holds(value) {
        set.below.committed = false;
    }
}
