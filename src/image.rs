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

use crate::pixel_format::PixelFormat;
use crate::ErrorKind;
use core::fmt;

enum Storage<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a mut [u8]),
}

/// A tightly packed image, which either owns its pixel buffer or borrows it
/// from the caller.
///
/// # Examples
/// ```
/// use pixel_convert::{Image, PixelFormat};
/// use std::error;
///
/// fn wrap() -> Result<(), Box<dyn error::Error>> {
///     let mut frame = vec![0u8; 640 * 480 * 3 / 2];
///
///     let owned = Image::new(480, 640, PixelFormat::Rgba)?;
///     assert!(owned.is_owned());
///     assert_eq!(owned.stride(), 4 * 640);
///
///     let borrowed = Image::from_buffer(480, 640, PixelFormat::Nv12, &mut frame)?;
///     assert!(!borrowed.is_owned());
///     assert_eq!(borrowed.size(), 640 * 480 * 3 / 2);
///
///     Ok(())
/// }
/// ```
pub struct Image<'a> {
    width: u32,
    height: u32,
    format: PixelFormat,
    storage: Storage<'a>,
}

impl Image<'static> {
    /// Allocates a zeroed image
    ///
    /// # Errors
    ///
    /// * [`InvalidDimension`] if `width` or `height` is zero, or the image size
    ///   does not fit in memory
    ///
    /// [`InvalidDimension`]: ./enum.ErrorKind.html#variant.InvalidDimension
    pub fn new(height: u32, width: u32, format: PixelFormat) -> Result<Self, ErrorKind> {
        let mut image = Image::default();
        image.create(height, width, format, None)?;
        Ok(image)
    }
}

impl<'a> Image<'a> {
    /// Wraps a caller-supplied buffer, only its first [`Image::size`] bytes are used
    ///
    /// # Errors
    ///
    /// * [`InvalidDimension`] if `width` or `height` is zero
    /// * [`NotEnoughData`] if `buffer` is shorter than the image size
    ///
    /// [`InvalidDimension`]: ./enum.ErrorKind.html#variant.InvalidDimension
    /// [`NotEnoughData`]: ./enum.ErrorKind.html#variant.NotEnoughData
    pub fn from_buffer(
        height: u32,
        width: u32,
        format: PixelFormat,
        buffer: &'a mut [u8],
    ) -> Result<Self, ErrorKind> {
        let mut image = Image::default();
        image.create(height, width, format, Some(buffer))?;
        Ok(image)
    }

    /// Gives the image its dimensions, format and buffer.
    ///
    /// Without an external buffer a zeroed one is allocated and owned by the
    /// image. On error the image is left unchanged.
    ///
    /// # Errors
    ///
    /// * [`InvalidDimension`] if `width` or `height` is zero, or the image size
    ///   does not fit in memory
    /// * [`NotEnoughData`] if `external` is shorter than the image size
    ///
    /// [`InvalidDimension`]: ./enum.ErrorKind.html#variant.InvalidDimension
    /// [`NotEnoughData`]: ./enum.ErrorKind.html#variant.NotEnoughData
    pub fn create(
        &mut self,
        height: u32,
        width: u32,
        format: PixelFormat,
        external: Option<&'a mut [u8]>,
    ) -> Result<(), ErrorKind> {
        if width == 0 || height == 0 {
            return Err(ErrorKind::InvalidDimension);
        }

        let size = format
            .checked_size(width, height)
            .ok_or(ErrorKind::InvalidDimension)?;

        let storage = match external {
            None => Storage::Owned(vec![0; size]),
            Some(buffer) => Storage::Borrowed(
                buffer
                    .get_mut(..size)
                    .ok_or(ErrorKind::NotEnoughData)?,
            ),
        };

        self.width = width;
        self.height = height;
        self.format = format;
        self.storage = storage;
        Ok(())
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Same as [`Image::width`]
    pub fn cols(&self) -> u32 {
        self.width
    }

    /// Same as [`Image::height`]
    pub fn rows(&self) -> u32 {
        self.height
    }

    /// Number of pixels, `width * height`
    pub fn pixels(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Pixel format
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per row, see [`PixelFormat::stride`]
    pub fn stride(&self) -> usize {
        self.format.stride(self.width)
    }

    /// Bytes of the whole image, see [`PixelFormat::size`]
    pub fn size(&self) -> usize {
        self.format.size(self.width, self.height)
    }

    /// True if the pixel buffer is released with the image
    pub fn is_owned(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    /// Pixel buffer, [`Image::size`] bytes long
    pub fn data(&self) -> &[u8] {
        match &self.storage {
            Storage::Owned(buffer) => buffer.as_slice(),
            Storage::Borrowed(buffer) => &buffer[..],
        }
    }

    /// Mutable pixel buffer, [`Image::size`] bytes long
    pub fn data_mut(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Storage::Owned(buffer) => buffer.as_mut_slice(),
            Storage::Borrowed(buffer) => &mut buffer[..],
        }
    }
}

impl Default for Image<'_> {
    /// An empty image: no pixels and no buffer
    fn default() -> Self {
        Image {
            width: 0,
            height: 0,
            format: PixelFormat::Gray,
            storage: Storage::Owned(Vec::new()),
        }
    }
}

impl Clone for Image<'_> {
    /// Deep copy, the clone always owns its buffer
    fn clone(&self) -> Self {
        Image {
            width: self.width,
            height: self.height,
            format: self.format,
            storage: Storage::Owned(self.data().to_vec()),
        }
    }
}

impl fmt::Debug for Image<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("owned", &self.is_owned())
            .finish()
    }
}
