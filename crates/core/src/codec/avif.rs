//! AVIF input support: container parsing with `avif-parse`, AV1 decoding with rav1d.
//!
//! The `image` crate's `avif` feature only ships the rav1e encoder, so
//! decoding goes through rav1d's dav1d-compatible API. Only the primary
//! item is decoded; an alpha item, if present, is dropped.

use image::{DynamicImage, RgbImage};
use std::io::Cursor;
use std::ptr::NonNull;

use rav1d::include::dav1d::data::Dav1dData;
use rav1d::include::dav1d::dav1d::Dav1dSettings;
use rav1d::include::dav1d::headers::{
    DAV1D_PIXEL_LAYOUT_I400, DAV1D_PIXEL_LAYOUT_I420, DAV1D_PIXEL_LAYOUT_I422,
    DAV1D_PIXEL_LAYOUT_I444,
};
use rav1d::include::dav1d::picture::Dav1dPicture;

use super::error::CodecError;
use super::types::ImageInfo;

/// Reads AVIF dimensions from the container, without decoding pixels.
pub(super) fn inspect_avif(data: &[u8]) -> Result<ImageInfo, CodecError> {
    let avif = read_container(data)?;
    let meta = avif
        .primary_item_metadata()
        .map_err(|e| CodecError::decode_failed(format!("invalid AVIF metadata: {e:?}")))?;

    Ok(ImageInfo {
        format: "avif".to_string(),
        width: meta.max_frame_width.get(),
        height: meta.max_frame_height.get(),
    })
}

fn read_container(data: &[u8]) -> Result<avif_parse::AvifData, CodecError> {
    avif_parse::read_avif(&mut Cursor::new(data))
        .map_err(|e| CodecError::decode_failed(format!("invalid AVIF container: {e:?}")))
}

fn rav1d_failed(step: &str, code: i32) -> CodecError {
    CodecError::decode_failed(format!("rav1d {step} failed ({code})"))
}

/// Decodes the primary AV1 item of an AVIF buffer to 8-bit RGB.
pub(super) fn decode_avif(data: &[u8]) -> Result<DynamicImage, CodecError> {
    let avif = read_container(data)?;
    let av1_bytes: &[u8] = &avif.primary_item;
    if av1_bytes.is_empty() {
        return Err(CodecError::decode_failed("AVIF primary item is empty"));
    }

    let mut settings = std::mem::MaybeUninit::<Dav1dSettings>::uninit();
    let Some(settings_ptr) = NonNull::new(settings.as_mut_ptr()) else {
        return Err(rav1d_failed("settings", -1));
    };
    unsafe { rav1d::src::lib::dav1d_default_settings(settings_ptr) };
    let mut settings = unsafe { settings.assume_init() };
    // Decoding already runs on a blocking worker per file
    settings.n_threads = 1;
    settings.max_frame_delay = 1;

    let mut ctx = None;
    let rc =
        unsafe { rav1d::src::lib::dav1d_open(NonNull::new(&mut ctx), NonNull::new(&mut settings)) };
    if rc.0 != 0 {
        return Err(rav1d_failed("open", rc.0));
    }

    let mut input = Dav1dData::default();
    let buf_ptr =
        unsafe { rav1d::src::lib::dav1d_data_create(NonNull::new(&mut input), av1_bytes.len()) };
    if buf_ptr.is_null() {
        unsafe { rav1d::src::lib::dav1d_close(NonNull::new(&mut ctx)) };
        return Err(rav1d_failed("data_create", -1));
    }
    unsafe { std::ptr::copy_nonoverlapping(av1_bytes.as_ptr(), buf_ptr, av1_bytes.len()) };

    let rc = unsafe { rav1d::src::lib::dav1d_send_data(ctx, NonNull::new(&mut input)) };
    if rc.0 != 0 {
        unsafe {
            rav1d::src::lib::dav1d_data_unref(NonNull::new(&mut input));
            rav1d::src::lib::dav1d_close(NonNull::new(&mut ctx));
        }
        return Err(rav1d_failed("send_data", rc.0));
    }

    let mut pic: Dav1dPicture = unsafe { std::mem::zeroed() };
    let rc = unsafe { rav1d::src::lib::dav1d_get_picture(ctx, NonNull::new(&mut pic)) };
    if rc.0 != 0 {
        unsafe { rav1d::src::lib::dav1d_close(NonNull::new(&mut ctx)) };
        return Err(rav1d_failed("get_picture", rc.0));
    }

    let rgb = picture_to_rgb(&pic);

    unsafe {
        rav1d::src::lib::dav1d_picture_unref(NonNull::new(&mut pic));
        rav1d::src::lib::dav1d_close(NonNull::new(&mut ctx));
    }

    let (width, height, rgb) = rgb?;
    RgbImage::from_raw(width, height, rgb)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| CodecError::decode_failed("decoded AVIF planes do not match dimensions"))
}

/// Converts the planes of a decoded picture; the picture stays owned by the caller.
fn picture_to_rgb(pic: &Dav1dPicture) -> Result<(u32, u32, Vec<u8>), CodecError> {
    let width = pic.p.w as u32;
    let height = pic.p.h as u32;
    let layout = pic.p.layout;
    let y_ptr = match pic.data[0] {
        Some(plane) => plane.as_ptr() as *const u8,
        None => return Err(CodecError::decode_failed("AVIF picture has no luma plane")),
    };

    let mut planes = YuvPlanes {
        y_ptr,
        u_ptr: y_ptr,
        v_ptr: y_ptr,
        y_stride: pic.stride[0],
        uv_stride: 0,
        width,
        height,
        bpc: pic.p.bpc as u32,
        ss_x: false,
        ss_y: false,
        monochrome: true,
    };

    if layout != DAV1D_PIXEL_LAYOUT_I400 {
        let (ss_x, ss_y) = match layout {
            DAV1D_PIXEL_LAYOUT_I420 => (true, true),
            DAV1D_PIXEL_LAYOUT_I422 => (true, false),
            DAV1D_PIXEL_LAYOUT_I444 => (false, false),
            _ => {
                return Err(CodecError::unsupported(format!(
                    "AVIF pixel layout {layout} is not supported"
                )))
            }
        };
        let (Some(u), Some(v)) = (pic.data[1], pic.data[2]) else {
            return Err(CodecError::decode_failed("AVIF picture is missing chroma planes"));
        };
        planes.u_ptr = u.as_ptr() as *const u8;
        planes.v_ptr = v.as_ptr() as *const u8;
        planes.uv_stride = pic.stride[1];
        planes.ss_x = ss_x;
        planes.ss_y = ss_y;
        planes.monochrome = false;
    }

    Ok((width, height, planes.to_rgb()))
}

/// Borrowed YUV planes of a decoded picture.
struct YuvPlanes {
    y_ptr: *const u8,
    u_ptr: *const u8,
    v_ptr: *const u8,
    y_stride: isize,
    uv_stride: isize,
    width: u32,
    height: u32,
    bpc: u32,
    ss_x: bool,
    ss_y: bool,
    monochrome: bool,
}

impl YuvPlanes {
    /// BT.601 YCbCr to interleaved RGB8.
    fn to_rgb(&self) -> Vec<u8> {
        let max_val = ((1u32 << self.bpc) - 1) as f32;
        let center = (1u32 << (self.bpc - 1)) as f32;
        let scale = 255.0 / max_val;

        let mut rgb = vec![0u8; (self.width * self.height * 3) as usize];

        for row in 0..self.height {
            for col in 0..self.width {
                let y = read_sample(self.y_ptr, self.y_stride, col, row, self.bpc);

                let (r, g, b) = if self.monochrome {
                    let v = (y * scale).clamp(0.0, 255.0);
                    (v, v, v)
                } else {
                    let c_col = if self.ss_x { col / 2 } else { col };
                    let c_row = if self.ss_y { row / 2 } else { row };
                    let cb = read_sample(self.u_ptr, self.uv_stride, c_col, c_row, self.bpc) - center;
                    let cr = read_sample(self.v_ptr, self.uv_stride, c_col, c_row, self.bpc) - center;

                    (
                        ((y + 1.402 * cr) * scale).clamp(0.0, 255.0),
                        ((y - 0.344136 * cb - 0.714136 * cr) * scale).clamp(0.0, 255.0),
                        ((y + 1.772 * cb) * scale).clamp(0.0, 255.0),
                    )
                };

                let idx = ((row * self.width + col) * 3) as usize;
                rgb[idx] = r as u8;
                rgb[idx + 1] = g as u8;
                rgb[idx + 2] = b as u8;
            }
        }

        rgb
    }
}

/// 8-bit samples are bytes; 10- and 12-bit samples are stored as u16.
#[inline]
fn read_sample(ptr: *const u8, stride: isize, x: u32, y: u32, bpc: u32) -> f32 {
    if bpc <= 8 {
        (unsafe { *ptr.offset(y as isize * stride + x as isize) }) as f32
    } else {
        let byte_offset = y as isize * stride + x as isize * 2;
        (unsafe { *(ptr.offset(byte_offset) as *const u16) }) as f32
    }
}
