/// Number of architecturally visible general-purpose registers.
pub const REGISTER_COUNT: usize = 16;

/// Index of one general-purpose register (`0..=15`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterIndex(u8);

impl RegisterIndex {
    /// Creates an index, rejecting values outside the register file.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(index: usize) -> Option<Self> {
        if index < REGISTER_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Returns the array index for this register.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the 1-based selector that addresses this register.
    #[must_use]
    pub const fn selector(self) -> u8 {
        self.0 + 1
    }
}

/// Meaning of an 8-bit, 1-based register selector field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterSelector {
    /// Selector 0: no operand.
    Disabled,
    /// Selectors 1..=16.
    Register(RegisterIndex),
    /// Selectors 17..=255 name no register.
    OutOfRange(u8),
}

impl RegisterSelector {
    /// Interprets a raw selector field.
    #[must_use]
    pub const fn from_field(field: u8) -> Self {
        if field == 0 {
            return Self::Disabled;
        }
        match RegisterIndex::new(field as usize - 1) {
            Some(index) => Self::Register(index),
            None => Self::OutOfRange(field),
        }
    }
}

/// Sixteen 32-bit unsigned general-purpose registers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    values: [u32; REGISTER_COUNT],
}

impl RegisterFile {
    /// Reads one register.
    #[must_use]
    pub const fn get(&self, reg: RegisterIndex) -> u32 {
        self.values[reg.index()]
    }

    /// Writes one register.
    pub fn set(&mut self, reg: RegisterIndex, value: u32) {
        self.values[reg.index()] = value;
    }

    /// Reads a register by 1-based selector; `None` for 0 or selectors > 16.
    #[must_use]
    pub const fn get_by_selector(&self, selector: u8) -> Option<u32> {
        match RegisterSelector::from_field(selector) {
            RegisterSelector::Register(reg) => Some(self.get(reg)),
            RegisterSelector::Disabled | RegisterSelector::OutOfRange(_) => None,
        }
    }

    /// Returns all register values in index order.
    #[must_use]
    pub const fn values(&self) -> &[u32; REGISTER_COUNT] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::{RegisterFile, RegisterIndex, RegisterSelector, REGISTER_COUNT};

    #[test]
    fn selector_zero_is_disabled() {
        assert_eq!(RegisterSelector::from_field(0), RegisterSelector::Disabled);
    }

    #[test]
    fn selectors_one_to_sixteen_are_a_bijection_onto_indices() {
        for selector in 1u8..=16 {
            let RegisterSelector::Register(reg) = RegisterSelector::from_field(selector) else {
                panic!("selector {selector} should name a register");
            };
            assert_eq!(reg.index(), usize::from(selector) - 1);
            assert_eq!(reg.selector(), selector);
        }
    }

    #[test]
    fn selectors_above_sixteen_are_out_of_range() {
        for selector in 17u8..=255 {
            assert_eq!(
                RegisterSelector::from_field(selector),
                RegisterSelector::OutOfRange(selector)
            );
        }
    }

    #[test]
    fn register_index_rejects_values_past_the_file() {
        assert!(RegisterIndex::new(REGISTER_COUNT - 1).is_some());
        assert!(RegisterIndex::new(REGISTER_COUNT).is_none());
    }

    #[test]
    fn register_file_tracks_each_register_independently() {
        let mut regs = RegisterFile::default();
        for index in 0..REGISTER_COUNT {
            let reg = RegisterIndex::new(index).expect("index in range");
            regs.set(reg, u32::try_from(index).expect("fits") * 0x0101_0101);
        }
        for index in 0..REGISTER_COUNT {
            let reg = RegisterIndex::new(index).expect("index in range");
            assert_eq!(
                regs.get(reg),
                u32::try_from(index).expect("fits") * 0x0101_0101
            );
        }
    }

    #[test]
    fn get_by_selector_uses_one_based_addressing() {
        let mut regs = RegisterFile::default();
        regs.set(RegisterIndex::new(0).expect("index in range"), 11);
        regs.set(RegisterIndex::new(15).expect("index in range"), 99);

        assert_eq!(regs.get_by_selector(0), None);
        assert_eq!(regs.get_by_selector(1), Some(11));
        assert_eq!(regs.get_by_selector(16), Some(99));
        assert_eq!(regs.get_by_selector(17), None);
    }
}
