// Copyright 2019 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

// Permission is hereby granted, free of charge, to any person obtaining a copy of this
// software and associated documentation files (the "Software"), to deal in the Software
// without restriction, including without limitation the rights to use, copy, modify,
// merge, publish, distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED,
// INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT
// HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Fixed-point color matrices shared by every conversion kernel.
//!
//! The forward matrix turns rgb into yuv with 7 fractional bits and never
//! saturates: its coefficients keep luma in `[0, 255]` and unbiased chroma in
//! `[-128, 127]` for any 8-bit input. The reverse matrix has 6 fractional bits
//! and saturates every channel, because boundary chroma values overshoot.

/// Number of fractional bits of [`ForwardMatrix`]
pub const FIX7: u32 = 7;
/// Number of fractional bits of [`ReverseMatrix`]
pub const FIX6: u32 = 6;
/// Bias added to the chroma components
pub const CHROMA_BIAS: i32 = 128;

/// Rgb to yuv weights, 7-bit fixed point
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ForwardMatrix {
    /// Red contribution to luma
    pub yr: i32,
    /// Green contribution to luma
    pub yg: i32,
    /// Blue contribution to luma
    pub yb: i32,
    /// Red contribution to U (subtracted)
    pub ur: i32,
    /// Green contribution to U (subtracted)
    pub ug: i32,
    /// Blue contribution to U
    pub ub: i32,
    /// Red contribution to V
    pub vr: i32,
    /// Green contribution to V (subtracted)
    pub vg: i32,
    /// Blue contribution to V (subtracted)
    pub vb: i32,
}

/// Yuv to rgb weights, 6-bit fixed point
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReverseMatrix {
    /// V contribution to red
    pub vr: i32,
    /// U contribution to green (subtracted)
    pub ug: i32,
    /// V contribution to green (subtracted)
    pub vg: i32,
    /// U contribution to blue
    pub ub: i32,
    /// Removes the chroma bias from red
    pub ofs_r: i32,
    /// Removes the chroma bias from green
    pub ofs_g: i32,
    /// Removes the chroma bias from blue
    pub ofs_b: i32,
}

/// The forward matrix used by all rgb to yuv conversions
pub const FORWARD_MATRIX: ForwardMatrix = ForwardMatrix {
    yr: 38,
    yg: 75,
    yb: 15,
    ur: 22,
    ug: 42,
    ub: 64,
    vr: 64,
    vg: 54,
    vb: 10,
};

/// The reverse matrix used by all yuv to rgb conversions
pub const REVERSE_MATRIX: ReverseMatrix = ReverseMatrix::new(90, 22, 46, 113);

impl ForwardMatrix {
    /// Luma of a pixel
    #[inline(always)]
    pub fn luma(&self, r: u8, g: u8, b: u8) -> i32 {
        (i32::from(r) * self.yr + i32::from(g) * self.yg + i32::from(b) * self.yb) >> FIX7
    }

    /// U of a pixel, without the chroma bias.
    ///
    /// The shift is arithmetic, so negative values round toward minus infinity.
    #[inline(always)]
    pub fn u(&self, r: u8, g: u8, b: u8) -> i32 {
        (i32::from(b) * self.ub - i32::from(r) * self.ur - i32::from(g) * self.ug) >> FIX7
    }

    /// V of a pixel, without the chroma bias
    #[inline(always)]
    pub fn v(&self, r: u8, g: u8, b: u8) -> i32 {
        (i32::from(r) * self.vr - i32::from(g) * self.vg - i32::from(b) * self.vb) >> FIX7
    }
}

impl ReverseMatrix {
    /// Builds the matrix and precomputes the chroma offsets
    pub const fn new(vr: i32, ug: i32, vg: i32, ub: i32) -> Self {
        ReverseMatrix {
            vr,
            ug,
            vg,
            ub,
            ofs_r: vr * CHROMA_BIAS,
            ofs_g: (ug + vg) * CHROMA_BIAS,
            ofs_b: ub * CHROMA_BIAS,
        }
    }

    /// Converts a yuv sample to rgb, saturating each channel
    #[inline(always)]
    pub fn rgb(&self, y: u8, u: u8, v: u8) -> (u8, u8, u8) {
        let y6 = i32::from(y) << FIX6;
        let u = i32::from(u);
        let v = i32::from(v);

        (
            fix_to_u8_sat(y6 + self.vr * v - self.ofs_r, FIX6),
            fix_to_u8_sat(y6 - self.ug * u - self.vg * v + self.ofs_g, FIX6),
            fix_to_u8_sat(y6 + self.ub * u - self.ofs_b, FIX6),
        )
    }
}

/// Drops the fractional bits of `fix` and clamps the result to `[0, 255]`
#[inline(always)]
pub fn fix_to_u8_sat(fix: i32, frac_bits: u32) -> u8 {
    let integer = fix >> frac_bits;
    if integer < 0 {
        0
    } else if integer > 255 {
        255
    } else {
        integer as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturation() {
        assert_eq!(fix_to_u8_sat(-1, FIX6), 0);
        assert_eq!(fix_to_u8_sat(63, FIX6), 0);
        assert_eq!(fix_to_u8_sat(64, FIX6), 1);
        assert_eq!(fix_to_u8_sat(255 << FIX6, FIX6), 255);
        assert_eq!(fix_to_u8_sat(256 << FIX6, FIX6), 255);
    }

    #[test]
    fn offsets() {
        assert_eq!(REVERSE_MATRIX.ofs_r, 90 * 128);
        assert_eq!(REVERSE_MATRIX.ofs_g, 68 * 128);
        assert_eq!(REVERSE_MATRIX.ofs_b, 113 * 128);
    }

    #[test]
    fn forward_range() {
        for (r, g, b) in [(0, 0, 0), (255, 255, 255), (255, 0, 0), (0, 0, 255), (0, 255, 0)] {
            let y = FORWARD_MATRIX.luma(r, g, b);
            let u = FORWARD_MATRIX.u(r, g, b);
            let v = FORWARD_MATRIX.v(r, g, b);
            assert!((0..=255).contains(&y));
            assert!((-128..=127).contains(&u));
            assert!((-128..=127).contains(&v));
        }

        assert_eq!(FORWARD_MATRIX.luma(255, 0, 0), 75);
        assert_eq!(FORWARD_MATRIX.u(255, 0, 0), -44);
        assert_eq!(FORWARD_MATRIX.v(255, 0, 0), 127);
    }

    #[test]
    fn neutral_chroma() {
        assert_eq!(REVERSE_MATRIX.rgb(0, 128, 128), (0, 0, 0));
        assert_eq!(REVERSE_MATRIX.rgb(128, 128, 128), (128, 128, 128));
        assert_eq!(REVERSE_MATRIX.rgb(255, 128, 128), (255, 255, 255));
    }
}
