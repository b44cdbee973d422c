//! Morton (Z-order) encoding of points inside the unit cube.

use crate::math::{Point, Real};

/// An unsigned integer key on the Z-order space-filling curve.
///
/// A key is formed by quantizing each coordinate of a point normalized to
/// `[0, 1]` onto `BITS_PER_AXIS` bits and interleaving the per-axis bits, so
/// that bit `i * DIM + d` of the key is bit `i` of axis `d`. Comparing keys
/// compares positions along the curve. Distinct points may map to the same
/// key; consumers must tolerate duplicates.
pub trait MortonKey: Copy + Ord + Eq + Send + Sync + std::fmt::Debug {
    /// The total width of the key, in bits.
    const BITS: u32;
    /// The quantization resolution of each axis, in bits.
    const BITS_PER_AXIS: u32;

    /// Encodes a point of the unit cube.
    ///
    /// Coordinates are clamped to `[0, 1]` first, so any finite point yields
    /// a valid key.
    fn from_unit_point(point: &Point<Real>) -> Self;

    /// The length of the common binary prefix of `self` and `other`.
    ///
    /// Equal keys share all `BITS` bits.
    fn common_prefix_len(self, other: Self) -> u32;
}

#[inline]
fn quantize(coord: Real, bits_per_axis: u32) -> u32 {
    let cells = 1u64 << bits_per_axis;
    let scaled = (coord.clamp(0.0, 1.0) * cells as Real) as u64;
    scaled.min(cells - 1) as u32
}

// 10 bits per channel, 3 channels.
#[cfg(feature = "dim3")]
#[inline]
fn split_by_3_u32(a: u32) -> u32 {
    let mut x = a & 0x3ff;
    x = (x | x << 16) & 0xff00_00ff;
    x = (x | x << 8) & 0x0f00_f00f;
    x = (x | x << 4) & 0xc30c_30c3;
    x = (x | x << 2) & 0x4924_9249;
    x
}

// 21 bits per channel, 3 channels.
#[cfg(feature = "dim3")]
#[inline]
fn split_by_3_u64(a: u32) -> u64 {
    let mut x = a as u64 & 0x1f_ffff;
    x = (x | x << 32) & 0x001f_0000_0000_ffff;
    x = (x | x << 16) & 0x001f_0000_ff00_00ff;
    x = (x | x << 8) & 0x100f_00f0_0f00_f00f;
    x = (x | x << 4) & 0x10c3_0c30_c30c_30c3;
    x = (x | x << 2) & 0x1249_2492_4924_9249;
    x
}

// 16 bits per channel, 2 channels.
#[cfg(feature = "dim2")]
#[inline]
fn split_by_2_u32(a: u32) -> u32 {
    let mut x = a & 0xffff;
    x = (x | x << 8) & 0x00ff_00ff;
    x = (x | x << 4) & 0x0f0f_0f0f;
    x = (x | x << 2) & 0x3333_3333;
    x = (x | x << 1) & 0x5555_5555;
    x
}

// 32 bits per channel, 2 channels.
#[cfg(feature = "dim2")]
#[inline]
fn split_by_2_u64(a: u32) -> u64 {
    let mut x = a as u64;
    x = (x | x << 16) & 0x0000_ffff_0000_ffff;
    x = (x | x << 8) & 0x00ff_00ff_00ff_00ff;
    x = (x | x << 4) & 0x0f0f_0f0f_0f0f_0f0f;
    x = (x | x << 2) & 0x3333_3333_3333_3333;
    x = (x | x << 1) & 0x5555_5555_5555_5555;
    x
}

impl MortonKey for u32 {
    const BITS: u32 = 32;
    #[cfg(feature = "dim3")]
    const BITS_PER_AXIS: u32 = 10;
    #[cfg(feature = "dim2")]
    const BITS_PER_AXIS: u32 = 16;

    #[inline]
    fn from_unit_point(point: &Point<Real>) -> Self {
        #[cfg(feature = "dim3")]
        return split_by_3_u32(quantize(point.x, Self::BITS_PER_AXIS))
            | split_by_3_u32(quantize(point.y, Self::BITS_PER_AXIS)) << 1
            | split_by_3_u32(quantize(point.z, Self::BITS_PER_AXIS)) << 2;

        #[cfg(feature = "dim2")]
        return split_by_2_u32(quantize(point.x, Self::BITS_PER_AXIS))
            | split_by_2_u32(quantize(point.y, Self::BITS_PER_AXIS)) << 1;
    }

    #[inline]
    fn common_prefix_len(self, other: Self) -> u32 {
        (self ^ other).leading_zeros()
    }
}

impl MortonKey for u64 {
    const BITS: u32 = 64;
    #[cfg(feature = "dim3")]
    const BITS_PER_AXIS: u32 = 21;
    #[cfg(feature = "dim2")]
    const BITS_PER_AXIS: u32 = 32;

    #[inline]
    fn from_unit_point(point: &Point<Real>) -> Self {
        #[cfg(feature = "dim3")]
        return split_by_3_u64(quantize(point.x, Self::BITS_PER_AXIS))
            | split_by_3_u64(quantize(point.y, Self::BITS_PER_AXIS)) << 1
            | split_by_3_u64(quantize(point.z, Self::BITS_PER_AXIS)) << 2;

        #[cfg(feature = "dim2")]
        return split_by_2_u64(quantize(point.x, Self::BITS_PER_AXIS))
            | split_by_2_u64(quantize(point.y, Self::BITS_PER_AXIS)) << 1;
    }

    #[inline]
    fn common_prefix_len(self, other: Self) -> u32 {
        (self ^ other).leading_zeros()
    }
}
