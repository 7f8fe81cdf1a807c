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

use crate::convert_image::common::*;
use crate::pixel_format::PixelFormat;

use paste::paste;

#[inline(always)]
fn rgb_to_packed(
    width: u32,
    height: u32,
    src_buffer: &[u8],
    dst_buffer: &mut [u8],
    src_format: PixelFormat,
    dst_format: PixelFormat,
    input: Sampler,
    output: PackedLayout,
) -> bool {
    let Some((src_size, dst_size)) = buffers_fit(
        width, height, src_format, src_buffer, dst_format, dst_buffer,
    ) else {
        return false;
    };

    // Width is even, so pairs never straddle two rows
    for (pair, group) in src_buffer[..src_size]
        .chunks_exact(2 * input.depth)
        .zip(dst_buffer[..dst_size].chunks_exact_mut(4))
    {
        let (first, second) = pair.split_at(input.depth);
        let (y0, u0, v0) = input.yuv(first);
        let (y1, u1, v1) = input.yuv(second);

        group[output.y0] = y0 as u8;
        group[output.y1] = y1 as u8;
        group[output.u] = chroma_to_u8((u0 + u1) >> 1);
        group[output.v] = chroma_to_u8((v0 + v1) >> 1);
    }

    true
}

#[inline(always)]
fn rgb_to_subsampled(
    width: u32,
    height: u32,
    src_buffer: &[u8],
    dst_buffer: &mut [u8],
    src_format: PixelFormat,
    dst_format: PixelFormat,
    input: Sampler,
    output: Subsampled,
) -> bool {
    let Some((src_size, dst_size)) = buffers_fit(
        width, height, src_format, src_buffer, dst_format, dst_buffer,
    ) else {
        return false;
    };

    let col_count = width as usize;
    let chroma_width = col_count / 2;
    let chroma_height = (height as usize) / 2;
    let src_stride = input.depth * col_count;
    let (y_plane, uv_plane) = dst_buffer[..dst_size].split_at_mut(pixel_count(width, height));

    for (cy, (rows, y_rows)) in src_buffer[..src_size]
        .chunks_exact(2 * src_stride)
        .zip(y_plane.chunks_exact_mut(2 * col_count))
        .enumerate()
    {
        let (top, bottom) = rows.split_at(src_stride);
        let (y_top, y_bottom) = y_rows.split_at_mut(col_count);

        for (cx, ((top, bottom), (y_top, y_bottom))) in top
            .chunks_exact(2 * input.depth)
            .zip(bottom.chunks_exact(2 * input.depth))
            .zip(y_top.chunks_exact_mut(2).zip(y_bottom.chunks_exact_mut(2)))
            .enumerate()
        {
            let (y00, u00, v00) = input.yuv(&top[..input.depth]);
            let (y01, u01, v01) = input.yuv(&top[input.depth..]);
            let (y10, u10, v10) = input.yuv(&bottom[..input.depth]);
            let (y11, u11, v11) = input.yuv(&bottom[input.depth..]);

            y_top[0] = y00 as u8;
            y_top[1] = y01 as u8;
            y_bottom[0] = y10 as u8;
            y_bottom[1] = y11 as u8;

            let (u_index, v_index) = output.offsets(cx, cy, chroma_width, chroma_height);
            uv_plane[u_index] = chroma_to_u8((u00 + u01 + u10 + u11) >> 2);
            uv_plane[v_index] = chroma_to_u8((v00 + v01 + v10 + v11) >> 2);
        }
    }

    true
}

macro_rules! rgb_to_packed {
    ($($src_pf:ident => $dst_pf:ident),* $(,)?) => {
        paste! {
            $(
                pub fn [<$src_pf:lower _ $dst_pf:lower>](
                    width: u32,
                    height: u32,
                    src_buffer: &[u8],
                    dst_buffer: &mut [u8],
                ) -> bool {
                    rgb_to_packed(
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

macro_rules! rgb_to_subsampled {
    ($($src_pf:ident => $dst_pf:ident),* $(,)?) => {
        paste! {
            $(
                pub fn [<$src_pf:lower _ $dst_pf:lower>](
                    width: u32,
                    height: u32,
                    src_buffer: &[u8],
                    dst_buffer: &mut [u8],
                ) -> bool {
                    rgb_to_subsampled(
                        width,
                        height,
                        src_buffer,
                        dst_buffer,
                        PixelFormat::$src_pf,
                        PixelFormat::$dst_pf,
                        [<$src_pf:upper>],
                        Subsampled::$dst_pf,
                    )
                }
            )*
        }
    };
}

rgb_to_packed! {
    Gray => Yuyv, Gray => Uyvy,
    Rgba => Yuyv, Rgba => Uyvy,
    Rgb => Yuyv, Rgb => Uyvy,
    Bgra => Yuyv, Bgra => Uyvy,
    Bgr => Yuyv, Bgr => Uyvy,
}

rgb_to_subsampled! {
    Gray => I420, Gray => Nv12, Gray => Nv21,
    Rgba => I420, Rgba => Nv12, Rgba => Nv21,
    Rgb => I420, Rgb => Nv12, Rgb => Nv21,
    Bgra => I420, Bgra => Nv12, Bgra => Nv21,
    Bgr => I420, Bgr => Nv12, Bgr => Nv21,
}
