//! Low-level components dedicated to bit manipulation for CAN buffers.
//!
//! Bits are numbered MSB-first: bit 0 is the most significant bit of byte 0,
//! bit 7 its least significant bit, bit 8 the most significant bit of byte 1,
//! and so on. Multi-bit fields are read and written big-endian, so the first
//! bit of a field is its most significant one.
use crate::error::{BitReaderError, BitWriterError};

/// Generic reader that extracts bit segments from a `&[u8]`
/// without extra allocation or copies.
pub struct BitReader<'a> {
    /// Shared source buffer (typically the received CAN payload).
    buffer: &'a [u8],
    /// Next bit to read; consecutive reads walk the buffer.
    bit_cursor: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned on `bit_position`.
    pub fn at(buffer: &'a [u8], bit_position: usize) -> Self {
        Self {
            buffer,
            bit_cursor: bit_position,
        }
    }

    /// Read `num_bits` bits starting at the current cursor and return a `u64`.
    /// `num_bits` must stay in the [1, 64] range.
    pub fn read_u64(&mut self, num_bits: u8) -> Result<u64, BitReaderError> {
        if !(1..=64).contains(&num_bits) {
            return Err(BitReaderError::TooLongForType {
                max: 64,
                asked: num_bits,
            });
        }

        let buffer_len_bits = self.buffer.len() * 8;
        let read_end_bit = self.bit_cursor + num_bits as usize;

        if read_end_bit > buffer_len_bits {
            return Err(BitReaderError::OutOfBounds {
                asked: num_bits as usize,
                available: buffer_len_bits.saturating_sub(self.bit_cursor),
            });
        }

        let mut result: u64 = 0;
        let mut bits_read = 0usize;

        while bits_read < num_bits as usize {
            let position = self.bit_cursor + bits_read;
            let byte = self.buffer[position / 8];
            let bit_offset = position % 8;

            // Bits still available in this byte, from `bit_offset` down to bit 7.
            let bits_this_iteration = (8 - bit_offset).min(num_bits as usize - bits_read);
            let shift = 8 - bit_offset - bits_this_iteration;
            let mask = ((1u16 << bits_this_iteration) - 1) as u8;

            result = (result << bits_this_iteration) | ((byte >> shift) & mask) as u64;
            bits_read += bits_this_iteration;
        }

        self.bit_cursor = read_end_bit;
        Ok(result)
    }

}
//==================================================================================BITWRITER

/// Writer laying bit segments into a `&mut [u8]` with the same MSB-first
/// numbering as [`BitReader`]. Bits outside the written fields are preserved.
pub struct BitWriter<'a> {
    /// Target buffer (typically a CAN payload under construction).
    buffer: &'a mut [u8],
    /// Current position expressed in bits.
    bit_cursor: usize,
}

impl<'a> BitWriter<'a> {
    /// Create a writer positioned on `bit_position`.
    pub fn at(buffer: &'a mut [u8], bit_position: usize) -> Self {
        Self {
            buffer,
            bit_cursor: bit_position,
        }
    }

    /// Write the `num_bits` least significant bits of `value`, most
    /// significant first.
    pub fn write_u64(&mut self, value: u64, num_bits: u8) -> Result<(), BitWriterError> {
        if !(1..=64).contains(&num_bits) {
            return Err(BitWriterError::TooLongForType {
                max: 64,
                asked: num_bits,
            });
        }

        let buffer_len_bits = self.buffer.len() * 8;
        let write_end_bit = self.bit_cursor + num_bits as usize;

        if write_end_bit > buffer_len_bits {
            return Err(BitWriterError::OutOfBounds {
                asked: num_bits as usize,
                available: buffer_len_bits.saturating_sub(self.bit_cursor),
            });
        }

        let mut bits_written = 0usize;

        while bits_written < num_bits as usize {
            let position = self.bit_cursor + bits_written;
            let byte_index = position / 8;
            let bit_offset = position % 8;

            let bits_this_iteration = (8 - bit_offset).min(num_bits as usize - bits_written);
            let shift = 8 - bit_offset - bits_this_iteration;
            let mask = ((1u16 << bits_this_iteration) - 1) as u8;

            // Next chunk, taken from the most significant remaining bits.
            let remaining_after = num_bits as usize - bits_written - bits_this_iteration;
            let chunk = (value >> remaining_after) as u8 & mask;

            self.buffer[byte_index] &= !(mask << shift);
            self.buffer[byte_index] |= chunk << shift;

            bits_written += bits_this_iteration;
        }

        self.bit_cursor = write_end_bit;

        Ok(())
    }
}
