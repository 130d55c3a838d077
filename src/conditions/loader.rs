//! reads threshold and list options from a config section
//!
//! lists grow through numbered keys: `IfCondition`, `IfCondition2`, ... and
//! the matching `IfTrueAction2` / `IfFalseAction2` keys. probing stops at the
//! first empty numbered source or at the first entry whose actions are both
//! empty

use super::types::{truncate, EntryList, ListKind, Threshold, ThresholdSet};
use crate::config::OptionReader;

/// read IfAbove / IfBelow / IfEqual settings
pub fn read_thresholds<R: OptionReader + ?Sized>(reader: &R, section: &str) -> ThresholdSet {
    ThresholdSet {
        above: Threshold::new(
            reader.read_float(section, "IfAboveValue", 0.0),
            reader.read_string(section, "IfAboveAction", "", false),
        ),
        below: Threshold::new(
            reader.read_float(section, "IfBelowValue", 0.0),
            reader.read_string(section, "IfBelowAction", "", false),
        ),
        equal: Threshold::new(
            truncate(reader.read_float(section, "IfEqualValue", 0.0)),
            reader.read_string(section, "IfEqualAction", "", false),
        ),
    }
}

fn read_actions<R: OptionReader + ?Sized>(
    reader: &R,
    section: &str,
    kind: ListKind,
    position: usize,
) -> (String, String) {
    let true_key = ListKind::numbered(kind.true_key(), position);
    let false_key = ListKind::numbered(kind.false_key(), position);
    (
        reader.read_string(section, &true_key, "", false),
        reader.read_string(section, &false_key, "", false),
    )
}

/// read the mode toggle and grow `list` in place
///
/// existing entries keep their firing state; entries past the last probed
/// position are left untouched
pub fn read_list<R: OptionReader + ?Sized>(reader: &R, section: &str, list: &mut EntryList) {
    let kind = list.kind;
    list.level_triggered = reader.read_bool(section, kind.mode_key(), false);

    let mut source = reader.read_string(section, kind.source_key(), "", true);
    if source.is_empty() {
        list.clear();
        return;
    }

    let (mut true_action, mut false_action) = read_actions(reader, section, kind, 1);
    if true_action.is_empty() && false_action.is_empty() {
        list.clear();
        return;
    }

    let mut index = 0;
    loop {
        list.upsert(index, source, true_action, false_action);
        index += 1;

        let position = index + 1;
        let key = ListKind::numbered(kind.source_key(), position);
        source = reader.read_string(section, &key, "", true);
        if source.is_empty() {
            break;
        }

        (true_action, false_action) = read_actions(reader, section, kind, position);
        if true_action.is_empty() && false_action.is_empty() {
            break;
        }
    }

    log::trace!(
        "[{}] {} entries probed: {}, held: {}",
        section,
        kind,
        index,
        list.len()
    );
}
