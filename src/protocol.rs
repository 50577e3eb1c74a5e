//! Framing of outbound commands and decoding of the inbound answer descriptor.

use crate::base::{Command, Error, Result};
use crate::checksum::Checksum;
use byteorder::{ByteOrder, LittleEndian};
use log::{error, trace};

const RPLIDAR_CMD_SYNC_BYTE: u8 = 0xA5;

const RPLIDAR_ANS_SYNC_BYTES: [u8; 2] = [0xA5, 0x5A];

const RPLIDAR_ANS_HEADER_SIZE_MASK: u32 = 0x3FFFFFFF;
const RPLIDAR_ANS_HEADER_SUBTYPE_SHIFT: u32 = 30;

/// Largest payload a single command frame can carry (the length field is one byte).
pub const RPLIDAR_CMD_MAX_PAYLOAD: usize = 255;

/// The size of the RPLIDAR answer descriptor, sync bytes included.
pub const RPLIDAR_DESCRIPTOR_LEN: usize = 7;

/// How many answer bodies follow a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMode {
    /// Exactly one body follows (device info, health).
    Single,
    /// Bodies keep coming until the device is stopped (scanning).
    Multiple,
}

impl SendMode {
    fn from_bits(bits: u8) -> SendMode {
        if bits == 0 {
            SendMode::Single
        } else {
            SendMode::Multiple
        }
    }
}

/// Answer header announcing the size, mode and type of the body that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Length of one answer body in bytes.
    pub response_size: usize,
    /// Single or continuous answer.
    pub send_mode: SendMode,
    /// Answer type tag (see `RPLIDAR_ANS_TYPE_*`).
    pub data_type: u8,
}

impl Descriptor {
    /// Checks the descriptor against what the issued command must produce.
    ///
    /// # Arguments
    ///
    /// * `response_size` - The body length the answer type has on the wire.
    /// * `send_mode` - Single for one-shot requests, multiple for scanning.
    /// * `data_type` - The expected answer type tag.
    pub fn validate(
        &self,
        response_size: usize,
        send_mode: SendMode,
        data_type: u8,
    ) -> Result<()> {
        if self.response_size != response_size {
            return Err(Error::protocol(format!(
                "wrong reply length for answer {:02X}: expected {}, got {}",
                data_type, response_size, self.response_size
            )));
        }
        if self.send_mode != send_mode {
            return Err(Error::protocol(match send_mode {
                SendMode::Single => "not a single response mode",
                SendMode::Multiple => "not a multiple response mode",
            }));
        }
        if self.data_type != data_type {
            return Err(Error::protocol(format!(
                "wrong response data type: expected {:02X}, got {:02X}",
                data_type, self.data_type
            )));
        }
        Ok(())
    }
}

/// Estimates the size needed to encode a command.
pub fn estimate_encoded_size(cmd: &Command) -> Result<usize> {
    if cmd.data.len() > RPLIDAR_CMD_MAX_PAYLOAD {
        return Err(Error::protocol(format!(
            "payload too big: {} bytes (max {})",
            cmd.data.len(),
            RPLIDAR_CMD_MAX_PAYLOAD
        )));
    }

    if cmd.has_payload() {
        Ok(4 + cmd.data.len()) // Sync + Cmd + Len + Data + Checksum
    } else {
        Ok(2) // Sync + Cmd
    }
}

/// Encodes a command into the provided byte buffer.
///
/// Plain commands are two bytes. Commands with a payload get a length byte after the
/// opcode and a trailing XOR checksum covering every byte before it.
///
/// Returns the number of bytes written to `bytes`.
pub fn encode_into(cmd: &Command, bytes: &mut [u8]) -> Result<usize> {
    let encoded_size = estimate_encoded_size(cmd)?;
    if encoded_size > bytes.len() {
        error!(
            "Buffer too small: required {}, available {}",
            encoded_size,
            bytes.len()
        );
        return Err(Error::BufferTooSmall);
    }

    bytes[0] = RPLIDAR_CMD_SYNC_BYTE;
    bytes[1] = cmd.cmd;

    if cmd.has_payload() {
        let payload_end = 3 + cmd.data.len();
        bytes[2] = cmd.data.len() as u8;
        bytes[3..payload_end].copy_from_slice(&cmd.data);
        bytes[payload_end] = Checksum::of(&bytes[0..payload_end]);
        trace!("Calculated checksum: {:02X}", bytes[payload_end]);
    }

    Ok(encoded_size)
}

/// Encodes a command into a freshly allocated frame.
pub fn encode(cmd: &Command) -> Result<Vec<u8>> {
    let mut buf = vec![0; estimate_encoded_size(cmd)?];
    let written = encode_into(cmd, &mut buf)?;
    buf.truncate(written);
    Ok(buf)
}

/// Decodes a 7-byte answer descriptor.
///
/// The first two bytes must be the answer sync bytes `A5 5A`. The next four bytes
/// form a little-endian word with the body length in the low 30 bits and the send
/// mode in the top two bits; the last byte is the answer type.
pub fn decode_descriptor(buf: &[u8]) -> Result<Descriptor> {
    if buf.len() != RPLIDAR_DESCRIPTOR_LEN {
        return Err(Error::protocol(format!(
            "descriptor length mismatch: expected {}, got {}",
            RPLIDAR_DESCRIPTOR_LEN,
            buf.len()
        )));
    }
    if buf[0..2] != RPLIDAR_ANS_SYNC_BYTES {
        error!("Incorrect descriptor starting bytes: {:02X?}", &buf[0..2]);
        return Err(Error::protocol("incorrect descriptor starting bytes"));
    }

    let size_q30_subtype = LittleEndian::read_u32(&buf[2..6]);
    let descriptor = Descriptor {
        response_size: (size_q30_subtype & RPLIDAR_ANS_HEADER_SIZE_MASK) as usize,
        send_mode: SendMode::from_bits(
            (size_q30_subtype >> RPLIDAR_ANS_HEADER_SUBTYPE_SHIFT) as u8,
        ),
        data_type: buf[6],
    };
    trace!("Decoded descriptor: {:?}", descriptor);
    Ok(descriptor)
}
