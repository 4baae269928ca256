//! Finger counting from hand landmarks.
//!
//! A finger is considered extended when its tip lies beyond one of its own
//! joints:
//! - thumb: tip left of the IP joint (`tip.x < ip.x`), which assumes a
//!   mirrored frame showing a right hand
//! - other fingers: tip above the PIP joint (`tip.y < pip.y`)

use crate::{
    constants::MAX_FINGER_COUNT,
    landmarks::{index, LandmarkSet},
    Error, Result,
};
use std::fmt;

/// Fingertips of the four non-thumb fingers, paired with the PIP joint two
/// landmarks below each tip
const FINGER_TIPS: [(usize, usize); 4] = [
    (index::INDEX_FINGER_TIP, index::INDEX_FINGER_PIP),
    (index::MIDDLE_FINGER_TIP, index::MIDDLE_FINGER_PIP),
    (index::RING_FINGER_TIP, index::RING_FINGER_PIP),
    (index::PINKY_TIP, index::PINKY_PIP),
];

/// Number of extended fingers, always in `0..=5`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FingerCount(u8);

impl FingerCount {
    pub const ZERO: Self = Self(0);

    /// # Errors
    ///
    /// Returns an error if `value` is greater than 5.
    pub fn new(value: u8) -> Result<Self> {
        if value > MAX_FINGER_COUNT {
            return Err(Error::InvalidInput(format!(
                "Finger count {value} exceeds {MAX_FINGER_COUNT}"
            )));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<FingerCount> for i32 {
    fn from(count: FingerCount) -> Self {
        Self::from(count.0)
    }
}

impl fmt::Display for FingerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-finger extension tests in the order thumb, index, middle, ring, pinky
#[must_use]
pub fn finger_states(landmarks: &LandmarkSet) -> [bool; 5] {
    let mut states = [false; 5];
    states[0] = landmarks[index::THUMB_TIP].x < landmarks[index::THUMB_IP].x;
    for (state, &(tip, pip)) in states[1..].iter_mut().zip(FINGER_TIPS.iter()) {
        *state = landmarks[tip].y < landmarks[pip].y;
    }
    states
}

/// Count extended fingers; no hand counts as zero
#[must_use]
pub fn count_fingers(landmarks: Option<&LandmarkSet>) -> FingerCount {
    let Some(landmarks) = landmarks else {
        return FingerCount::ZERO;
    };
    #[allow(clippy::cast_possible_truncation)] // at most five states
    let extended = finger_states(landmarks).iter().filter(|&&up| up).count() as u8;
    FingerCount(extended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Landmark;

    /// A hand with every finger curled: tips below joints, thumb tip right of its joint
    fn closed_fist() -> [Landmark; 21] {
        let mut points = [Landmark::new(0.5, 0.5, 0.0); 21];
        points[index::THUMB_IP] = Landmark::new(0.40, 0.6, 0.0);
        points[index::THUMB_TIP] = Landmark::new(0.45, 0.6, 0.0);
        for (tip, pip) in FINGER_TIPS {
            points[pip] = Landmark::new(0.5, 0.4, 0.0);
            points[tip] = Landmark::new(0.5, 0.45, 0.0);
        }
        points
    }

    fn extend_finger(points: &mut [Landmark; 21], finger: usize) {
        if finger == 0 {
            points[index::THUMB_TIP].x = 0.30;
        } else {
            let (tip, _) = FINGER_TIPS[finger - 1];
            points[tip].y = 0.2;
        }
    }

    #[test]
    fn test_no_hand_counts_zero() {
        assert_eq!(count_fingers(None), FingerCount::ZERO);
    }

    #[test]
    fn test_closed_fist_counts_zero() {
        let set = LandmarkSet::from_array(closed_fist());
        assert_eq!(finger_states(&set), [false; 5]);
        assert_eq!(count_fingers(Some(&set)).get(), 0);
    }

    #[test]
    fn test_open_hand_counts_five() {
        let mut points = closed_fist();
        for finger in 0..5 {
            extend_finger(&mut points, finger);
        }
        let set = LandmarkSet::from_array(points);
        assert_eq!(finger_states(&set), [true; 5]);
        assert_eq!(count_fingers(Some(&set)).get(), 5);
    }

    #[test]
    fn test_each_finger_counted_individually() {
        for finger in 0..5 {
            let mut points = closed_fist();
            extend_finger(&mut points, finger);
            let set = LandmarkSet::from_array(points);
            let states = finger_states(&set);
            assert!(states[finger]);
            assert_eq!(count_fingers(Some(&set)).get(), 1, "finger {finger}");
        }
    }

    #[test]
    fn test_equal_coordinates_are_not_extended() {
        let set = LandmarkSet::from_array([Landmark::new(0.5, 0.5, 0.0); 21]);
        assert_eq!(count_fingers(Some(&set)).get(), 0);
    }

    #[test]
    fn test_thumb_ignores_vertical_position() {
        let mut points = closed_fist();
        points[index::THUMB_TIP].y = 0.0;
        let set = LandmarkSet::from_array(points);
        assert!(!finger_states(&set)[0]);
    }

    #[test]
    fn test_finger_count_bounds() {
        assert!(FingerCount::new(5).is_ok());
        assert!(FingerCount::new(6).is_err());
        assert!(FingerCount::new(0).unwrap().is_zero());
        assert_eq!(i32::from(FingerCount::new(3).unwrap()), 3);
    }
}
