use serde::{Deserialize, Serialize};

use crate::constants::{
    TAPE_FLAG_BOSS, TAPE_FOOTER_SIZE, TAPE_HEADER_SIZE, TAPE_MAGIC, TAPE_PRESS_BIT, TAPE_VERSION,
};
use crate::error::TapeError;
use crate::sim::{SessionOutcome, SessionResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeHeader {
    pub magic: u32,
    pub version: u8,
    pub is_boss_fish: bool,
    pub seed: u32,
    pub tick_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TapeFooter {
    pub outcome: SessionOutcome,
    pub treasure_caught: bool,
    pub final_distance: f32,
    pub checksum: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TapeView<'a> {
    pub header: TapeHeader,
    pub presses: &'a [u8],
    pub footer: TapeFooter,
}

impl TapeView<'_> {
    pub fn press_flags(&self) -> Vec<bool> {
        self.presses.iter().map(|b| decode_press_byte(*b)).collect()
    }
}

#[inline]
pub fn encode_press_byte(pressed: bool) -> u8 {
    if pressed {
        TAPE_PRESS_BIT
    } else {
        0
    }
}

#[inline]
pub fn decode_press_byte(byte: u8) -> bool {
    (byte & TAPE_PRESS_BIT) != 0
}

pub fn parse_tape(bytes: &[u8], max_ticks: u32) -> Result<TapeView<'_>, TapeError> {
    let min_len = TAPE_HEADER_SIZE + TAPE_FOOTER_SIZE;
    if bytes.len() < min_len {
        return Err(TapeError::TapeTooShort {
            actual: bytes.len(),
            min: min_len,
        });
    }

    let magic = read_u32_le(bytes, 0);
    if magic != TAPE_MAGIC {
        return Err(TapeError::InvalidMagic { found: magic });
    }

    let version = bytes[4];
    if version != TAPE_VERSION {
        return Err(TapeError::UnsupportedVersion { found: version });
    }

    let flags = bytes[5];
    if flags & !TAPE_FLAG_BOSS != 0 {
        return Err(TapeError::UnknownFlags { found: flags });
    }
    if bytes[6] != 0 || bytes[7] != 0 {
        return Err(TapeError::HeaderReservedNonZero);
    }

    let seed = read_u32_le(bytes, 8);
    let tick_count = read_u32_le(bytes, 12);
    if tick_count == 0 || tick_count > max_ticks {
        return Err(TapeError::TickCountOutOfRange {
            tick_count,
            max_ticks,
        });
    }

    let expected_len = TAPE_HEADER_SIZE + tick_count as usize + TAPE_FOOTER_SIZE;
    if bytes.len() != expected_len {
        return Err(TapeError::TapeLengthMismatch {
            expected: expected_len,
            actual: bytes.len(),
        });
    }

    let body_start = TAPE_HEADER_SIZE;
    let body_end = body_start + tick_count as usize;

    let outcome_code = bytes[body_end];
    let outcome = SessionOutcome::from_code(outcome_code)
        .ok_or(TapeError::UnknownOutcome { found: outcome_code })?;
    let treasure_caught = bytes[body_end + 1] != 0;
    if bytes[body_end + 2] != 0 || bytes[body_end + 3] != 0 {
        return Err(TapeError::FooterReservedNonZero);
    }
    let final_distance = f32::from_bits(read_u32_le(bytes, body_end + 4));
    let checksum = read_u32_le(bytes, body_end + 8);

    let computed = crc32_and_validate_presses(bytes, body_start, body_end)?;
    if checksum != computed {
        return Err(TapeError::CrcMismatch {
            stored: checksum,
            computed,
        });
    }

    Ok(TapeView {
        header: TapeHeader {
            magic,
            version,
            is_boss_fish: flags & TAPE_FLAG_BOSS != 0,
            seed,
            tick_count,
        },
        presses: &bytes[body_start..body_end],
        footer: TapeFooter {
            outcome,
            treasure_caught,
            final_distance,
            checksum,
        },
    })
}

pub fn serialize_tape(presses: &[bool], result: &SessionResult) -> Vec<u8> {
    let total_len = TAPE_HEADER_SIZE + presses.len() + TAPE_FOOTER_SIZE;
    let mut data = vec![0u8; total_len];

    write_u32_le(&mut data, 0, TAPE_MAGIC);
    data[4] = TAPE_VERSION;
    data[5] = if result.is_boss_fish { TAPE_FLAG_BOSS } else { 0 };
    write_u32_le(&mut data, 8, result.seed);
    write_u32_le(&mut data, 12, presses.len() as u32);

    let body_start = TAPE_HEADER_SIZE;
    let body_end = body_start + presses.len();
    for (slot, pressed) in data[body_start..body_end].iter_mut().zip(presses) {
        *slot = encode_press_byte(*pressed);
    }

    data[body_end] = result.outcome.code();
    data[body_end + 1] = u8::from(result.treasure_caught);
    write_u32_le(&mut data, body_end + 4, result.final_distance.to_bits());

    // Checksum covers header and body only; the footer is recomputed on replay.
    let checksum = crc32(&data[..body_end]);
    write_u32_le(&mut data, body_end + 8, checksum);

    data
}

#[inline]
fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[inline]
fn write_u32_le(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

const CRC_TABLE: [u32; 256] = build_crc_table();

const fn build_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;

    while i < 256 {
        let mut c = i as u32;
        let mut j = 0;

        while j < 8 {
            c = if (c & 1) != 0 {
                0xEDB8_8320u32 ^ (c >> 1)
            } else {
                c >> 1
            };
            j += 1;
        }

        table[i] = c;
        i += 1;
    }

    table
}

pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;

    for byte in data {
        let idx = ((crc ^ (*byte as u32)) & 0xFF) as usize;
        crc = CRC_TABLE[idx] ^ (crc >> 8);
    }

    crc ^ 0xFFFF_FFFFu32
}

fn crc32_and_validate_presses(
    bytes: &[u8],
    body_start: usize,
    body_end: usize,
) -> Result<u32, TapeError> {
    for (offset, byte) in bytes[body_start..body_end].iter().enumerate() {
        if byte & !TAPE_PRESS_BIT != 0 {
            return Err(TapeError::ReservedPressBitsNonZero {
                tick: offset as u32,
                byte: *byte,
            });
        }
    }
    Ok(crc32(&bytes[..body_end]))
}
