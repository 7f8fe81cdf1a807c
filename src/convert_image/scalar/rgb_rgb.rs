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

use crate::color_matrix::FORWARD_MATRIX;
use crate::convert_image::common::*;
use crate::pixel_format::PixelFormat;

use paste::paste;

#[inline(always)]
fn reorder(
    width: u32,
    height: u32,
    src_buffer: &[u8],
    dst_buffer: &mut [u8],
    src_format: PixelFormat,
    dst_format: PixelFormat,
    input: Sampler,
    output: Sampler,
) -> bool {
    let Some((src_size, dst_size)) = buffers_fit(
        width, height, src_format, src_buffer, dst_format, dst_buffer,
    ) else {
        return false;
    };

    let src_buffer = &src_buffer[..src_size];
    let dst_buffer = &mut dst_buffer[..dst_size];
    if src_format == dst_format {
        dst_buffer.copy_from_slice(src_buffer);
    } else if output.is_gray() {
        for (y, pixel) in dst_buffer
            .iter_mut()
            .zip(src_buffer.chunks_exact(input.depth))
        {
            let (r, g, b) = input.unpack(pixel);
            *y = FORWARD_MATRIX.luma(r, g, b) as u8;
        }
    } else {
        for (out, pixel) in dst_buffer
            .chunks_exact_mut(output.depth)
            .zip(src_buffer.chunks_exact(input.depth))
        {
            let alpha = input.alpha.map_or(DEFAULT_ALPHA, |index| pixel[index]);
            output.pack(out, input.unpack(pixel), alpha);
        }
    }

    true
}

macro_rules! rgb_to_rgb {
    ($($src_pf:ident => $dst_pf:ident),* $(,)?) => {
        paste! {
            $(
                pub fn [<$src_pf:lower _ $dst_pf:lower>](
                    width: u32,
                    height: u32,
                    src_buffer: &[u8],
                    dst_buffer: &mut [u8],
                ) -> bool {
                    reorder(
                        width,
                        height,
                        src_buffer,
                        dst_buffer,
                        PixelFormat::$src_pf,
                        PixelFormat::$dst_pf,
                        [<$src_pf:upper>],
                        [<$dst_pf:upper>],
                    )
                }
            )*
        }
    };
}

rgb_to_rgb! {
    Gray => Gray, Gray => Rgba, Gray => Rgb, Gray => Bgra, Gray => Bgr,
    Rgba => Gray, Rgba => Rgba, Rgba => Rgb, Rgba => Bgra, Rgba => Bgr,
    Rgb => Gray, Rgb => Rgba, Rgb => Rgb, Rgb => Bgra, Rgb => Bgr,
    Bgra => Gray, Bgra => Rgba, Bgra => Rgb, Bgra => Bgra, Bgra => Bgr,
    Bgr => Gray, Bgr => Rgba, Bgr => Rgb, Bgr => Bgra, Bgr => Bgr,
}
