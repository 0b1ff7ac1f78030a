use crate::state::SuccessLevel;

/// A resolved percentile test: a d100 roll against a target number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillTest {
    pub target: u32,
    pub roll: u32,
}

impl SkillTest {
    pub const fn new(target: u32, roll: u32) -> Self {
        Self { target, roll }
    }

    /// Tens digit of the target minus tens digit of the roll.
    pub const fn success_level(&self) -> SuccessLevel {
        SuccessLevel((self.target / 10) as i32 - (self.roll / 10) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_level_compares_tens_digits() {
        assert_eq!(SkillTest::new(45, 12).success_level(), SuccessLevel(3));
        assert_eq!(SkillTest::new(45, 45).success_level(), SuccessLevel(0));
        assert_eq!(SkillTest::new(31, 87).success_level(), SuccessLevel(-5));
        assert_eq!(SkillTest::new(40, 100).success_level(), SuccessLevel(-6));
    }
}
