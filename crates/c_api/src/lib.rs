#![allow(non_camel_case_types)]
#![allow(clippy::missing_safety_doc)]

use blend_fill::execute::ExecutionMode;
use blend_fill::{Color, FillDescriptor, FillEngine, FillError, PixelFormat};
use std::ptr;

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct bf_color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<bf_color> for Color {
    fn from(value: bf_color) -> Self {
        Color::new(value.r, value.g, value.b)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum bf_format {
    Argb8888,
    Rgb888,
    Rgb565,
    Al88,
    L8,
}

impl From<bf_format> for PixelFormat {
    fn from(value: bf_format) -> Self {
        match value {
            bf_format::Argb8888 => PixelFormat::Argb8888,
            bf_format::Rgb888 => PixelFormat::Rgb888,
            bf_format::Rgb565 => PixelFormat::Rgb565,
            bf_format::Al88 => PixelFormat::Al88,
            bf_format::L8 => PixelFormat::L8,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum bf_result {
    Ok = 0,
    /// The accelerated path was requested explicitly but can't take the rectangle.
    Unsupported = 1,
    /// The accelerated kernel reported a failure.
    KernelFailed = 2,
    /// The geometry is inconsistent, nothing was written.
    Invalid = 3,
}

impl From<Result<(), FillError>> for bf_result {
    fn from(value: Result<(), FillError>) -> Self {
        match value {
            Ok(()) => bf_result::Ok,
            Err(FillError::Unsupported(_)) => bf_result::Unsupported,
            Err(FillError::Kernel(_)) => bf_result::KernelFailed,
        }
    }
}

/// A fill as seen from C. `mask_buf` may be null.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct bf_fill_dsc {
    pub dest_buf: *mut u8,
    pub dest_w: u32,
    pub dest_h: u32,
    pub dest_stride: u32,
    pub color: bf_color,
    pub mask_buf: *const u8,
    pub mask_stride: u32,
    pub opa: u8,
    pub format: bf_format,
    pub use_accelerated: bool,
}

pub struct bf_engine(FillEngine<'static>);

#[no_mangle]
pub extern "C" fn bf_engine_create(accelerated: bool) -> *mut bf_engine {
    let mode = if accelerated {
        ExecutionMode::Auto
    } else {
        ExecutionMode::Scalar
    };

    Box::into_raw(Box::new(bf_engine(FillEngine::new_with_execution_mode(mode))))
}

#[no_mangle]
pub unsafe extern "C" fn bf_engine_destroy(engine: *mut bf_engine) {
    if !engine.is_null() {
        let _ = Box::from_raw(engine);
    }
}

#[no_mangle]
pub extern "C" fn bf_bytes_per_pixel(format: bf_format) -> u32 {
    PixelFormat::from(format).bytes_per_pixel() as u32
}

#[no_mangle]
pub unsafe extern "C" fn bf_fill(engine: *const bf_engine, dsc: *const bf_fill_dsc) -> bf_result {
    with_descriptor(dsc, |desc| (*engine).0.fill(desc).into())
}

#[no_mangle]
pub unsafe extern "C" fn bf_fill_portable(engine: *const bf_engine, dsc: *const bf_fill_dsc) -> bf_result {
    with_descriptor(dsc, |desc| {
        (*engine).0.fill_portable(desc);
        bf_result::Ok
    })
}

#[no_mangle]
pub unsafe extern "C" fn bf_try_fill_accelerated(
    engine: *const bf_engine,
    dsc: *const bf_fill_dsc,
) -> bf_result {
    with_descriptor(dsc, |desc| (*engine).0.try_fill_accelerated(desc).into())
}

/// Borrow the buffers of a C descriptor as slices.
///
/// The geometry is checked here, since a panic must not cross the C boundary.
unsafe fn with_descriptor(
    dsc: *const bf_fill_dsc,
    f: impl FnOnce(FillDescriptor<'_>) -> bf_result,
) -> bf_result {
    let dsc = *dsc;
    let format = PixelFormat::from(dsc.format);
    let (w, h) = (dsc.dest_w as usize, dsc.dest_h as usize);
    let (stride, mask_stride) = (dsc.dest_stride as usize, dsc.mask_stride as usize);

    let has_mask = !dsc.mask_buf.is_null();

    let (dest_len, mask_len) = if w == 0 || h == 0 {
        (0, 0)
    } else {
        let mask_stride = if mask_stride == 0 { w } else { mask_stride };

        // The mask stride only matters if there is a mask.
        if dsc.dest_buf.is_null() || (has_mask && mask_stride < w) {
            return bf_result::Invalid;
        }

        let Some(row_bytes) = w.checked_mul(format.bytes_per_pixel()) else {
            return bf_result::Invalid;
        };

        if stride < row_bytes {
            return bf_result::Invalid;
        }

        let dest_len = span(h, stride, row_bytes);
        let mask_len = if has_mask { span(h, mask_stride, w) } else { Some(0) };

        match (dest_len, mask_len) {
            (Some(dest_len), Some(mask_len)) => (dest_len, mask_len),
            _ => return bf_result::Invalid,
        }
    };

    let dest: &mut [u8] = if dest_len == 0 {
        &mut []
    } else {
        std::slice::from_raw_parts_mut(dsc.dest_buf, dest_len)
    };

    let mut desc = FillDescriptor::new(dest, format, w, h, stride, dsc.color.into())
        .with_opa(dsc.opa)
        .with_accelerated(dsc.use_accelerated);

    if has_mask && mask_len > 0 {
        desc = desc
            .with_mask(std::slice::from_raw_parts(dsc.mask_buf, mask_len))
            .with_mask_stride(mask_stride);
    }

    f(desc)
}

/// Bytes from the start of the first of `rows` rows to the end of the last one, or
/// `None` if that doesn't fit in the address space.
fn span(rows: usize, stride: usize, row_bytes: usize) -> Option<usize> {
    (rows - 1).checked_mul(stride)?.checked_add(row_bytes)
}

/// A descriptor for an opaque, unmasked fill.
#[no_mangle]
pub extern "C" fn bf_fill_dsc_init(
    dest_buf: *mut u8,
    format: bf_format,
    dest_w: u32,
    dest_h: u32,
    dest_stride: u32,
    color: bf_color,
) -> bf_fill_dsc {
    bf_fill_dsc {
        dest_buf,
        dest_w,
        dest_h,
        dest_stride,
        color,
        mask_buf: ptr::null(),
        mask_stride: 0,
        opa: 255,
        format,
        use_accelerated: true,
    }
}
