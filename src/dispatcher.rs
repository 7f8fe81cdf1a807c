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

use crate::pixel_format::{PixelFormat, PIXEL_FORMAT_COUNT};
use crate::static_assert::static_assert;

const LO_RGB_PIXEL_FORMAT: usize = PixelFormat::Gray as usize;
const HI_RGB_PIXEL_FORMAT: usize = PixelFormat::Bgr as usize;
const LO_YUV_PIXEL_FORMAT: usize = PixelFormat::Yuyv as usize;
const HI_YUV_PIXEL_FORMAT: usize = PixelFormat::Nv21 as usize;
static_assert!(LO_RGB_PIXEL_FORMAT == 0);
static_assert!(HI_RGB_PIXEL_FORMAT + 1 == LO_YUV_PIXEL_FORMAT);
static_assert!(HI_YUV_PIXEL_FORMAT + 1 == PIXEL_FORMAT_COUNT);

pub const TABLE_SIZE: usize = PIXEL_FORMAT_COUNT * PIXEL_FORMAT_COUNT;

pub fn get_index(src_format: PixelFormat, dst_format: PixelFormat) -> usize {
    (src_format as usize) * PIXEL_FORMAT_COUNT + (dst_format as usize)
}
