use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Length of an unfolded fingerprint: the full 32-bit index space.
pub const UNFOLDED_LENGTH: u64 = 1 << 32;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FingerprintError {
    #[error("Fingerprint length must be between 1 and 2^32, got {0}")]
    InvalidLength(u64),
    #[error("Index {index} is out of range for length {length}")]
    IndexOutOfRange { index: u32, length: u64 },
    #[error("Cannot fold a fingerprint of length {from} to {to}: the new length must divide the old one")]
    IncompatibleFold { from: u64, to: u64 },
}

fn check_length(length: u64) -> Result<u64, FingerprintError> {
    if length == 0 || length > UNFOLDED_LENGTH {
        Err(FingerprintError::InvalidLength(length))
    } else {
        Ok(length)
    }
}

fn check_fold(from: u64, to: u64) -> Result<u64, FingerprintError> {
    check_length(to)?;
    if to > from || from % to != 0 {
        return Err(FingerprintError::IncompatibleFold { from, to });
    }
    Ok(to)
}

/// Binary fingerprint: the set of on-bits of a fixed-length bit vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    length: u64,
    on_bits: BTreeSet<u32>,
}

impl Fingerprint {
    pub fn new(length: u64, on_bits: impl IntoIterator<Item = u32>) -> Result<Self, FingerprintError> {
        let length = check_length(length)?;
        let on_bits: BTreeSet<u32> = on_bits.into_iter().collect();
        if let Some(&index) = on_bits.iter().find(|&&i| u64::from(i) >= length) {
            return Err(FingerprintError::IndexOutOfRange { index, length });
        }
        Ok(Self { length, on_bits })
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn on_bits(&self) -> &BTreeSet<u32> {
        &self.on_bits
    }

    pub fn num_on_bits(&self) -> usize {
        self.on_bits.len()
    }

    /// Fraction of on-bits.
    pub fn density(&self) -> f64 {
        self.on_bits.len() as f64 / self.length as f64
    }

    /// Jaccard index of the on-bit sets. Two empty fingerprints are identical.
    pub fn tanimoto(&self, other: &Fingerprint) -> f64 {
        let shared = self.on_bits.intersection(&other.on_bits).count();
        let total = self.on_bits.len() + other.on_bits.len() - shared;
        if total == 0 {
            1.0
        } else {
            shared as f64 / total as f64
        }
    }

    /// Folds to `new_length` by reducing every index modulo the new length.
    pub fn fold(&self, new_length: u64) -> Result<Self, FingerprintError> {
        let length = check_fold(self.length, new_length)?;
        Ok(Self {
            length,
            on_bits: self
                .on_bits
                .iter()
                .map(|&i| (u64::from(i) % length) as u32)
                .collect(),
        })
    }
}

/// Count fingerprint: index to number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountFingerprint {
    length: u64,
    counts: BTreeMap<u32, u32>,
}

impl CountFingerprint {
    pub fn new(length: u64, counts: BTreeMap<u32, u32>) -> Result<Self, FingerprintError> {
        let length = check_length(length)?;
        if let Some(&index) = counts.keys().find(|&&i| u64::from(i) >= length) {
            return Err(FingerprintError::IndexOutOfRange { index, length });
        }
        let counts = counts.into_iter().filter(|&(_, c)| c > 0).collect();
        Ok(Self { length, counts })
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn counts(&self) -> &BTreeMap<u32, u32> {
        &self.counts
    }

    pub fn count(&self, index: u32) -> u32 {
        self.counts.get(&index).copied().unwrap_or(0)
    }

    pub fn on_bits(&self) -> BTreeSet<u32> {
        self.counts.keys().copied().collect()
    }

    pub fn num_on_bits(&self) -> usize {
        self.counts.len()
    }

    pub fn to_binary(&self) -> Fingerprint {
        Fingerprint {
            length: self.length,
            on_bits: self.on_bits(),
        }
    }

    /// Sum of the element-wise minima over the sum of the element-wise maxima.
    pub fn tanimoto(&self, other: &CountFingerprint) -> f64 {
        let indices: BTreeSet<u32> = self
            .counts
            .keys()
            .chain(other.counts.keys())
            .copied()
            .collect();
        let (mut shared, mut total) = (0u64, 0u64);
        for index in indices {
            let (a, b) = (self.count(index), other.count(index));
            shared += u64::from(a.min(b));
            total += u64::from(a.max(b));
        }
        if total == 0 {
            1.0
        } else {
            shared as f64 / total as f64
        }
    }

    /// Folds to `new_length`; counts of colliding indices are summed.
    pub fn fold(&self, new_length: u64) -> Result<Self, FingerprintError> {
        let length = check_fold(self.length, new_length)?;
        let mut counts = BTreeMap::new();
        for (&index, &count) in &self.counts {
            let folded = (u64::from(index) % length) as u32;
            let slot: &mut u32 = counts.entry(folded).or_insert(0);
            *slot = slot.saturating_add(count);
        }
        Ok(Self { length, counts })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FingerprintOutput {
    Binary(Fingerprint),
    Count(CountFingerprint),
}

impl FingerprintOutput {
    pub fn length(&self) -> u64 {
        match self {
            FingerprintOutput::Binary(fp) => fp.length(),
            FingerprintOutput::Count(fp) => fp.length(),
        }
    }

    /// `(index, value)` pairs in index order; binary entries have value 1.
    pub fn entries(&self) -> Vec<(u32, u32)> {
        match self {
            FingerprintOutput::Binary(fp) => fp.on_bits().iter().map(|&i| (i, 1)).collect(),
            FingerprintOutput::Count(fp) => fp.counts().iter().map(|(&i, &c)| (i, c)).collect(),
        }
    }

    pub fn to_binary(&self) -> Fingerprint {
        match self {
            FingerprintOutput::Binary(fp) => fp.clone(),
            FingerprintOutput::Count(fp) => fp.to_binary(),
        }
    }
}
