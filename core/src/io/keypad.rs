use bitflags::*;

/// Size of a key-state datagram, the 16 bit mask in big endian.
pub const KEY_STATE_DATAGRAM_SIZE: usize = 2;

bitflags! {
    /// One bit per key of the hexadecimal key pad, key `0x0` in bit 0 up to key `0xF` in bit 15.
    #[derive(Default)]
    pub struct KeyFlags: u16 {
        const KEY_0 = 1 << 0x0;
        const KEY_1 = 1 << 0x1;
        const KEY_2 = 1 << 0x2;
        const KEY_3 = 1 << 0x3;
        const KEY_4 = 1 << 0x4;
        const KEY_5 = 1 << 0x5;
        const KEY_6 = 1 << 0x6;
        const KEY_7 = 1 << 0x7;
        const KEY_8 = 1 << 0x8;
        const KEY_9 = 1 << 0x9;
        const KEY_A = 1 << 0xA;
        const KEY_B = 1 << 0xB;
        const KEY_C = 1 << 0xC;
        const KEY_D = 1 << 0xD;
        const KEY_E = 1 << 0xE;
        const KEY_F = 1 << 0xF;
    }
}

impl KeyFlags {
    /// The flag for key pad position `key`, `None` if it's not in `0x0..=0xF`.
    pub fn key(key: u8) -> Option<KeyFlags> {
        if key <= 0xF {
            Some(KeyFlags::from_bits_truncate(1 << key))
        } else {
            None
        }
    }

    /// Keys currently held, lowest position first.
    pub fn held_keys(self) -> impl Iterator<Item = u8> {
        (0..=0xFu8).filter(move |key| self.bits() & (1u16 << *key) != 0)
    }
}

/// Tracks which key pad keys are held down and encodes that state for the emulator.
#[derive(Debug, Default, Copy, Clone)]
pub struct KeyPad {
    pressed: KeyFlags,
}

impl KeyPad {
    pub fn new() -> Self {
        KeyPad::default()
    }

    /// Marks `key` as held.
    ///
    /// # Returns
    /// `true` if the key wasn't held yet, and the new state should therefore be announced.
    pub fn press(&mut self, key: KeyFlags) -> bool {
        let changed = !self.pressed.contains(key);
        self.pressed.insert(key);
        changed
    }

    /// Marks `key` as released.
    ///
    /// A release is always worth announcing, a lost datagram would otherwise leave the key stuck.
    pub fn release(&mut self, key: KeyFlags) -> bool {
        self.pressed.remove(key);
        true
    }

    pub fn flags(&self) -> KeyFlags {
        self.pressed
    }

    pub fn to_datagram(&self) -> [u8; KEY_STATE_DATAGRAM_SIZE] {
        self.pressed.bits().to_be_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_press_only_reports_changes() {
        let mut keypad = KeyPad::new();

        assert!(keypad.press(KeyFlags::KEY_5));
        assert!(!keypad.press(KeyFlags::KEY_5));
        assert!(keypad.press(KeyFlags::KEY_F));
        assert_eq!(keypad.flags(), KeyFlags::KEY_5 | KeyFlags::KEY_F);

        assert!(keypad.release(KeyFlags::KEY_5));
        assert!(keypad.release(KeyFlags::KEY_5));
        assert_eq!(keypad.flags(), KeyFlags::KEY_F);
    }

    #[test]
    fn test_datagram_is_big_endian() {
        let mut keypad = KeyPad::new();
        keypad.press(KeyFlags::KEY_F);
        keypad.press(KeyFlags::KEY_1);

        assert_eq!(keypad.to_datagram(), [0x80, 0x02]);
        assert_eq!(keypad.to_datagram().len(), KEY_STATE_DATAGRAM_SIZE);
    }

    #[test]
    fn test_key_positions() {
        assert_eq!(KeyFlags::key(0x0), Some(KeyFlags::KEY_0));
        assert_eq!(KeyFlags::key(0xC), Some(KeyFlags::KEY_C));
        assert_eq!(KeyFlags::key(0x10), None);

        let held: Vec<u8> = (KeyFlags::KEY_3 | KeyFlags::KEY_A).held_keys().collect();
        assert_eq!(held, vec![0x3, 0xA]);
    }
}
