pub mod codec;
pub mod keypad;
