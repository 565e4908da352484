use crate::common::*;

/// The number of keypoints on a hand.
pub const NUM_LANDMARKS: usize = 21;

/// The anatomical joint each landmark slot refers to.
///
/// The discriminant is the position of the joint in a landmark record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkIndex {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl LandmarkIndex {
    pub const ALL: [LandmarkIndex; NUM_LANDMARKS] = {
        use LandmarkIndex::*;
        [
            Wrist,
            ThumbCmc,
            ThumbMcp,
            ThumbIp,
            ThumbTip,
            IndexFingerMcp,
            IndexFingerPip,
            IndexFingerDip,
            IndexFingerTip,
            MiddleFingerMcp,
            MiddleFingerPip,
            MiddleFingerDip,
            MiddleFingerTip,
            RingFingerMcp,
            RingFingerPip,
            RingFingerDip,
            RingFingerTip,
            PinkyMcp,
            PinkyPip,
            PinkyDip,
            PinkyTip,
        ]
    };

    pub fn as_usize(self) -> usize {
        self as usize
    }

    pub fn from_usize(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_order_matches_slot_order() {
        for (slot, joint) in LandmarkIndex::ALL.iter().enumerate() {
            assert_eq!(joint.as_usize(), slot);
            assert_eq!(LandmarkIndex::from_usize(slot), Some(*joint));
        }
        assert_eq!(LandmarkIndex::PinkyTip.as_usize(), NUM_LANDMARKS - 1);
        assert_eq!(LandmarkIndex::from_usize(NUM_LANDMARKS), None);
    }
}
