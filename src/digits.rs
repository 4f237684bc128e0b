use std::fmt;

/// A set of candidate digits 1-9, packed into the low 9 bits of a `u16`.
///
/// Iteration is always in ascending digit order; the search relies on this
/// when it branches over a cell's candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigitSet(u16);

const MASK: u16 = 0b1_1111_1111;

impl DigitSet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self(MASK);

    pub fn single(digit: u8) -> Self {
        debug_assert!((1..=9).contains(&digit));
        Self(1 << (digit - 1))
    }

    pub fn contains(self, digit: u8) -> bool {
        debug_assert!((1..=9).contains(&digit));
        self.0 & (1 << (digit - 1)) != 0
    }

    pub fn with(self, digit: u8) -> Self {
        debug_assert!((1..=9).contains(&digit));
        Self(self.0 | (1 << (digit - 1)))
    }

    pub fn without(self, digit: u8) -> Self {
        debug_assert!((1..=9).contains(&digit));
        Self(self.0 & !(1 << (digit - 1)))
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The digit if the set is a singleton, `None` otherwise.
    pub fn as_single(self) -> Option<u8> {
        if self.0.count_ones() == 1 {
            Some(self.0.trailing_zeros() as u8 + 1)
        } else {
            None
        }
    }

    /// Digits in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (1..=9).filter(move |&d| self.contains(d))
    }
}

impl FromIterator<u8> for DigitSet {
    fn from_iter<T: IntoIterator<Item = u8>>(digits: T) -> Self {
        digits.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Display for DigitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.iter() {
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn basic_set_operations() {
        let set = DigitSet::from_iter([5, 2, 9, 2]);
        assert_eq!(set.len(), 3);
        assert!(set.contains(2));
        assert!(!set.contains(3));
        assert_eq!(set.without(2).len(), 2);
        assert_eq!(set.without(3), set);
        assert_eq!(set.with(3).len(), 4);
    }

    #[test]
    fn iteration_is_ascending() {
        let set = DigitSet::from_iter([7, 1, 4]);
        assert_eq!(set.iter().collect_vec(), vec![1, 4, 7]);
        assert_eq!(DigitSet::ALL.iter().collect_vec(), (1..=9).collect_vec());
    }

    #[test]
    fn singletons() {
        assert_eq!(DigitSet::single(6).as_single(), Some(6));
        assert_eq!(DigitSet::from_iter([1, 2]).as_single(), None);
        assert_eq!(DigitSet::EMPTY.as_single(), None);
        assert!(DigitSet::single(9).without(9).is_empty());
    }

    #[test]
    fn displays_as_digit_string() {
        assert_eq!(DigitSet::ALL.to_string(), "123456789");
        assert_eq!(DigitSet::from_iter([3, 2]).to_string(), "23");
        assert_eq!(DigitSet::EMPTY.to_string(), "");
    }
}
