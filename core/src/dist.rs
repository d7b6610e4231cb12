use std::io::{Read, Result, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Distribution a secret key was sampled from, carried along with the key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SecretDistribution {
    BinaryFixed(usize), // Binary with fixed Hamming weight
    BinaryProb(f64),    // Binary with probabilistic Hamming weight
    NONE,               // Unitialized
}

const TAG_BINARY_FIXED: u8 = 2;
const TAG_BINARY_PROB: u8 = 3;
const TAG_NONE: u8 = 6;

const PAYLOAD_MASK: u64 = 0x00FF_FFFF_FFFF_FFFF;
const PROB_SCALE: f64 = 4294967296.0;

impl SecretDistribution {
    /// Single word codec: tag in the top byte, payload below. Probabilities
    /// are stored as 32-bit fixed point.
    pub fn to_word(&self) -> u64 {
        match self {
            SecretDistribution::BinaryFixed(hw) => (TAG_BINARY_FIXED as u64) << 56 | (*hw as u64 & PAYLOAD_MASK),
            SecretDistribution::BinaryProb(p) => {
                (TAG_BINARY_PROB as u64) << 56 | ((p.clamp(0.0, 1.0) * PROB_SCALE).round() as u64)
            }
            SecretDistribution::NONE => (TAG_NONE as u64) << 56,
        }
    }

    pub fn from_word(word: u64) -> Result<Self> {
        let tag: u8 = (word >> 56) as u8;
        let payload: u64 = word & PAYLOAD_MASK;

        let dist: SecretDistribution = match tag {
            TAG_BINARY_FIXED => SecretDistribution::BinaryFixed(payload as usize),
            TAG_BINARY_PROB if payload <= PROB_SCALE as u64 => {
                SecretDistribution::BinaryProb(payload as f64 / PROB_SCALE)
            }
            TAG_NONE => SecretDistribution::NONE,
            _ => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "invalid distribution tag",
                ));
            }
        };
        Ok(dist)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<LittleEndian>(self.to_word())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        Self::from_word(reader.read_u64::<LittleEndian>()?)
    }
}
