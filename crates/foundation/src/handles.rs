/// Generational handle: `(index, generation)`.
///
/// Reusing a slot bumps the generation, so a stale handle never aliases the
/// value that replaced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(u32, u32);

impl Handle {
    pub fn new(index: u32, generation: u32) -> Self {
        Handle(index, generation)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    pub fn generation(&self) -> u32 {
        self.1
    }

    /// Packs into a single integer for hosts that cannot carry a struct (e.g. JS).
    pub fn to_bits(self) -> u64 {
        ((self.1 as u64) << 32) | self.0 as u64
    }

    pub fn from_bits(bits: u64) -> Self {
        Handle(bits as u32, (bits >> 32) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::Handle;

    #[test]
    fn bits_roundtrip_keeps_generation() {
        let h = Handle::new(7, 3);
        assert_eq!(Handle::from_bits(h.to_bits()), h);
        assert_ne!(Handle::new(7, 4).to_bits(), h.to_bits());
    }
}
