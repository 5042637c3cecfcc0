use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

use crate::error::MalformedUpdate;
use crate::io::keypad::KeyFlags;
use crate::peripherals::PeripheralUpdate;

/// Turns a received datagram into a typed update.
pub trait PayloadCodec {
    fn decode(&self, raw: &[u8]) -> Result<PeripheralUpdate, MalformedUpdate>;
}

/// The record the emulator core broadcasts, a MessagePack map keyed by field name.
///
/// Every field but `screen` is required and unknown keys are rejected, so stray datagrams on the
/// group can't pass for an update.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PeripheralStateMessage {
    sound: bool,
    keys: u16,
    #[serde(default)]
    screen: Option<ByteBuf>,
    #[serde(rename = "screenWidth")]
    screen_width: u32,
    #[serde(rename = "screenHeight")]
    screen_height: u32,
}

#[derive(Debug, Default, Copy, Clone)]
pub struct MsgPackCodec;

impl MsgPackCodec {
    pub fn encode(&self, update: &PeripheralUpdate) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        let message = PeripheralStateMessage {
            sound: update.sound,
            keys: update.keys.bits(),
            screen: update.screen.clone().map(ByteBuf::from),
            screen_width: update.screen_width,
            screen_height: update.screen_height,
        };

        rmp_serde::to_vec_named(&message)
    }
}

impl PayloadCodec for MsgPackCodec {
    /// Anything after the end of the record is ignored, receive buffers are fixed size.
    fn decode(&self, raw: &[u8]) -> Result<PeripheralUpdate, MalformedUpdate> {
        let message: PeripheralStateMessage =
            rmp_serde::from_slice(raw).map_err(|e| MalformedUpdate::Decode(e.to_string()))?;

        Ok(PeripheralUpdate {
            screen: message.screen.map(ByteBuf::into_vec),
            screen_width: message.screen_width,
            screen_height: message.screen_height,
            keys: KeyFlags::from_bits_truncate(message.keys),
            sound: message.sound,
        })
    }
}
