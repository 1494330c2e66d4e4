//! MSB-first bit extraction across successive 32-bit draws.

use crate::source::RngSource;

/// Bit reader over a generator.
///
/// Bits are handed out most-significant first. Unused bits of the current
/// 32-bit draw are carried over to the next call, so asking for 8 bits four
/// times consumes exactly one draw.
pub struct BitStream<'a> {
    source: &'a mut dyn RngSource,
    buffer: u32,
    available: u32,
}

impl<'a> BitStream<'a> {
    pub fn new(source: &'a mut dyn RngSource) -> Self {
        Self {
            source,
            buffer: 0,
            available: 0,
        }
    }

    /// Read the next `n` bits (at most 32) as the low bits of a `u32`.
    ///
    /// The first bit read ends up as the most significant of the `n` bits.
    /// Asking for more than 32 bits is a caller bug: debug builds panic,
    /// release builds read 32 bits.
    pub fn next_bits(&mut self, n: u32) -> u32 {
        debug_assert!(n <= 32, "next_bits reads at most 32 bits, got {n}");
        let mut needed = n.min(32);
        let mut out: u64 = 0;
        while needed > 0 {
            if self.available == 0 {
                self.buffer = self.source.next_u32();
                self.available = 32;
            }
            let take = needed.min(self.available);
            let shift = self.available - take;
            let chunk = u64::from(self.buffer >> shift) & ((1u64 << take) - 1);
            out = (out << take) | chunk;
            self.available -= take;
            needed -= take;
        }
        out as u32
    }

    /// Read a single bit.
    pub fn next_bit(&mut self) -> bool {
        self.next_bits(1) == 1
    }

    /// Read eight bits.
    pub fn next_byte(&mut self) -> u8 {
        self.next_bits(8) as u8
    }

    /// Unpack the next `n` bits into a `Vec<u8>` of 0/1 values.
    pub fn take_bits(&mut self, n: usize) -> Vec<u8> {
        (0..n).map(|_| u8::from(self.next_bit())).collect()
    }

    /// Drop any bits left over from the current draw.
    pub fn discard_buffer(&mut self) {
        self.available = 0;
    }
}

/// Draw `n` bits from a fresh stream over `source`, MSB first.
pub fn get_bits(source: &mut dyn RngSource, n: usize) -> Vec<u8> {
    BitStream::new(source).take_bits(n)
}
