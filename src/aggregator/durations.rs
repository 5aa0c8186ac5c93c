//! Duration and self-time of a resolved frame.

use super::frame::{Child, Frame};

/// Recompute `duration` and `self_time` from the exit timestamp
///
/// Frames without an exit are left untouched. Only direct children are
/// subtracted, since a child's duration already covers its descendants.
/// Self-time may come out negative on malformed nesting; it is not clamped.
pub fn recalculate_durations(frame: &mut Frame) {
    let Some(exit) = frame.record.exit_timestamp else {
        return;
    };

    let duration = exit.saturating_sub(frame.record.timestamp);
    let nested: i64 = frame
        .children
        .iter()
        .filter_map(Child::duration)
        .fold(0, i64::saturating_add);

    frame.record.duration = Some(duration);
    frame.record.self_time = Some(duration.saturating_sub(nested));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::catalog::lookup;
    use crate::parser::record::Record;

    fn method(timestamp: i64, exit: Option<i64>, duration: Option<i64>) -> Frame {
        let mut record = Record::new(lookup("METHOD_ENTRY").unwrap(), timestamp, 0);
        record.exit_timestamp = exit;
        record.duration = duration;
        Frame::new(record)
    }

    #[test]
    fn test_self_time_subtracts_direct_children() {
        let mut parent = method(0, Some(100), None);
        parent.push_frame(method(10, Some(40), Some(30)));
        parent.push_frame(method(50, Some(70), Some(20)));

        recalculate_durations(&mut parent);
        assert_eq!(parent.record.duration, Some(100));
        assert_eq!(parent.record.self_time, Some(50));
    }

    #[test]
    fn test_negative_self_time_is_kept() {
        let mut parent = method(0, Some(10), None);
        parent.push_frame(method(0, Some(50), Some(50)));

        recalculate_durations(&mut parent);
        assert_eq!(parent.record.self_time, Some(-40));
    }

    #[test]
    fn test_no_exit_leaves_frame_alone() {
        let mut frame = method(0, None, None);
        recalculate_durations(&mut frame);
        assert_eq!(frame.record.duration, None);
        assert_eq!(frame.record.self_time, None);
    }
}
