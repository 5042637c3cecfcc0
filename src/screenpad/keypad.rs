use screenpad_core::KeyFlags;
use sdl2::keyboard::Keycode;

/// Maps the left hand block of a QWERTY keyboard onto the hex keypad:
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// Q W E R  ->  4 5 6 D
/// A S D F      7 8 9 E
/// Z X C V      A 0 B F
/// ```
pub fn keycode_to_key(key: Keycode) -> Option<KeyFlags> {
    match key {
        Keycode::Num1 => Some(KeyFlags::KEY_1),
        Keycode::Num2 => Some(KeyFlags::KEY_2),
        Keycode::Num3 => Some(KeyFlags::KEY_3),
        Keycode::Num4 => Some(KeyFlags::KEY_C),
        Keycode::Q => Some(KeyFlags::KEY_4),
        Keycode::W => Some(KeyFlags::KEY_5),
        Keycode::E => Some(KeyFlags::KEY_6),
        Keycode::R => Some(KeyFlags::KEY_D),
        Keycode::A => Some(KeyFlags::KEY_7),
        Keycode::S => Some(KeyFlags::KEY_8),
        Keycode::D => Some(KeyFlags::KEY_9),
        Keycode::F => Some(KeyFlags::KEY_E),
        Keycode::Z => Some(KeyFlags::KEY_A),
        Keycode::X => Some(KeyFlags::KEY_0),
        Keycode::C => Some(KeyFlags::KEY_B),
        Keycode::V => Some(KeyFlags::KEY_F),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_hex_key_is_reachable_once() {
        let keys = [
            Keycode::Num1, Keycode::Num2, Keycode::Num3, Keycode::Num4,
            Keycode::Q, Keycode::W, Keycode::E, Keycode::R,
            Keycode::A, Keycode::S, Keycode::D, Keycode::F,
            Keycode::Z, Keycode::X, Keycode::C, Keycode::V,
        ];

        let all = keys
            .iter()
            .map(|key| keycode_to_key(*key).unwrap())
            .fold(KeyFlags::empty(), |acc, flag| {
                assert!(!acc.contains(flag));
                acc | flag
            });

        assert_eq!(all, KeyFlags::all());
    }

    #[test]
    fn three_maps_to_three() {
        assert_eq!(keycode_to_key(Keycode::Num3), Some(KeyFlags::KEY_3));
        assert_eq!(keycode_to_key(Keycode::Escape), None);
    }
}
