/// Seeded pseudo-random stream built on the PCG hash.
///
/// Every draw replaces the state with the hash of the previous state, so two
/// streams created from the same seed produce the same sequence. The stream is
/// passed explicitly to whatever needs randomness (fish spawning, the
/// auto-angler) instead of being shared globally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FishRng {
    state: u32,
}

/// One round of the PCG-RXS-M-XS hash
pub fn pcg_hash(input: u32) -> u32 {
    let state = input.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

impl FishRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn seed(&self) -> u32 {
        self.state
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = pcg_hash(self.state);
        self.state
    }

    /// Uniform float in [0.0, 1.0)
    pub fn next_f32(&mut self) -> f32 {
        // 24 bits fit the f32 mantissa exactly, so 1.0 is never produced
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform float in [min, max)
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform integer in [min, max). Returns `min` for an empty range.
    pub fn range_u32(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        min + self.next_u32() % (max - min)
    }
}

#[cfg(feature = "std")]
impl rand::RngCore for FishRng {
    fn next_u32(&mut self) -> u32 {
        FishRng::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let low = FishRng::next_u32(self) as u64;
        let high = FishRng::next_u32(self) as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = FishRng::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(feature = "std")]
impl rand::SeedableRng for FishRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
