//! Animated GIF transforms.
//!
//! The most intricate part of the engine. Rounding an animation cannot be
//! done frame-by-frame on the raw deltas: GIF frames are partial updates
//! whose meaning depends on the previous frames and on each frame's
//! disposal mode, so the mask must be applied to the *composited* state a
//! viewer would actually see. The pipeline here decodes the full animation,
//! replays it through a [`compositor::Compositor`], masks each composited
//! snapshot, re-quantizes it to an indexed palette with a reserved
//! transparency entry ([`quantize`]), and re-encodes with the original
//! timing and loop metadata.
//!
//! The module owns its frame model instead of reusing `image::Frame`
//! because the transforms depend on disposal modes and per-frame palette
//! control, neither of which survives the `image` crate's frame API; the
//! codec is the `gif` crate, the same one `image` wraps.
//!
//! Resizing is the independent, simpler path: every frame delta is
//! resampled into a uniformly scaled bounding rectangle, with no compositor
//! involved. Frames are independent there, so they are processed in
//! parallel with `rayon`.

pub mod compositor;
pub mod quantize;

use crate::error::EngineError;
use crate::mask;
use crate::params::Dimensions;
use compositor::Compositor;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use serde::Serialize;
use std::borrow::Cow;
use std::io::Cursor;

/// What a viewer does with a frame's pixels before drawing the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposal {
    /// Leave the canvas as drawn.
    None,
    /// Repaint the frame's rectangle with the background color.
    Background,
    /// Restore the canvas to its state before this frame was drawn.
    Previous,
}

impl From<gif::DisposalMethod> for Disposal {
    fn from(method: gif::DisposalMethod) -> Self {
        match method {
            gif::DisposalMethod::Background => Disposal::Background,
            gif::DisposalMethod::Previous => Disposal::Previous,
            gif::DisposalMethod::Any | gif::DisposalMethod::Keep => Disposal::None,
        }
    }
}

impl From<Disposal> for gif::DisposalMethod {
    fn from(disposal: Disposal) -> Self {
        match disposal {
            Disposal::None => gif::DisposalMethod::Keep,
            Disposal::Background => gif::DisposalMethod::Background,
            Disposal::Previous => gif::DisposalMethod::Previous,
        }
    }
}

/// How many times the animation repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopCount {
    Infinite,
    Finite(u16),
}

impl From<gif::Repeat> for LoopCount {
    fn from(repeat: gif::Repeat) -> Self {
        match repeat {
            gif::Repeat::Infinite => LoopCount::Infinite,
            gif::Repeat::Finite(count) => LoopCount::Finite(count),
        }
    }
}

impl From<LoopCount> for gif::Repeat {
    fn from(count: LoopCount) -> Self {
        match count {
            LoopCount::Infinite => gif::Repeat::Infinite,
            LoopCount::Finite(count) => gif::Repeat::Finite(count),
        }
    }
}

/// One frame of an animation: an indexed pixel delta at a bounding
/// rectangle, plus the metadata a renderer needs to play it.
#[derive(Debug, Clone)]
pub struct AnimatedFrame {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    /// One palette index per pixel, row-major within the rectangle.
    pub indices: Vec<u8>,
    /// Local palette (RGB triples); falls back to the global palette.
    pub palette: Option<Vec<u8>>,
    /// Palette index rendered as fully transparent, if any.
    pub transparent: Option<u8>,
    pub disposal: Disposal,
    /// Display duration in centiseconds.
    pub delay_cs: u16,
}

impl AnimatedFrame {
    /// Resolve a palette index to a color; `None` for the transparent
    /// index. Out-of-palette indices resolve to opaque black rather than
    /// failing, matching what lenient renderers do with such files.
    fn color(&self, index: u8, global_palette: &[u8]) -> Option<Rgba<u8>> {
        if self.transparent == Some(index) {
            return None;
        }
        let palette = self.palette.as_deref().unwrap_or(global_palette);
        let offset = index as usize * 3;
        match palette.get(offset..offset + 3) {
            Some(rgb) => Some(Rgba([rgb[0], rgb[1], rgb[2], 255])),
            None => Some(Rgba([0, 0, 0, 255])),
        }
    }

    /// Expand the indexed delta to RGBA (transparent index → alpha 0).
    fn to_rgba(&self, global_palette: &[u8]) -> RgbaImage {
        let mut rgba = RgbaImage::new(self.width as u32, self.height as u32);
        for (offset, pixel) in rgba.pixels_mut().enumerate() {
            let color = self
                .indices
                .get(offset)
                .and_then(|&index| self.color(index, global_palette));
            *pixel = color.unwrap_or(Rgba([0, 0, 0, 0]));
        }
        rgba
    }
}

/// A decoded animation: canvas geometry, shared palette, loop metadata and
/// the ordered frame sequence. Always holds at least one frame.
#[derive(Debug, Clone)]
pub struct AnimatedImage {
    pub width: u16,
    pub height: u16,
    /// Global palette (RGB triples); may be empty.
    pub global_palette: Vec<u8>,
    /// Index into the global palette used as canvas background, if valid.
    pub background_index: Option<u8>,
    pub loop_count: LoopCount,
    pub frames: Vec<AnimatedFrame>,
}

impl AnimatedImage {
    /// The color the compositor canvas starts from: the background palette
    /// entry when present and in range, fully transparent otherwise.
    fn background_color(&self) -> Rgba<u8> {
        let Some(index) = self.background_index else {
            return Rgba([0, 0, 0, 0]);
        };
        let offset = index as usize * 3;
        match self.global_palette.get(offset..offset + 3) {
            Some(rgb) => Rgba([rgb[0], rgb[1], rgb[2], 255]),
            None => Rgba([0, 0, 0, 0]),
        }
    }

    /// Metadata summary for diagnostics and the `inspect` command.
    pub fn describe(&self) -> AnimationInfo {
        AnimationInfo {
            width: self.width,
            height: self.height,
            frame_count: self.frames.len(),
            loop_count: self.loop_count,
            background_index: self.background_index,
            frames: self
                .frames
                .iter()
                .map(|frame| FrameInfo {
                    left: frame.left,
                    top: frame.top,
                    width: frame.width,
                    height: frame.height,
                    delay_cs: frame.delay_cs,
                    disposal: frame.disposal,
                    local_palette: frame.palette.is_some(),
                    transparent: frame.transparent.is_some(),
                })
                .collect(),
        }
    }
}

/// Serializable animation metadata.
#[derive(Debug, Serialize)]
pub struct AnimationInfo {
    pub width: u16,
    pub height: u16,
    pub frame_count: usize,
    pub loop_count: LoopCount,
    pub background_index: Option<u8>,
    pub frames: Vec<FrameInfo>,
}

#[derive(Debug, Serialize)]
pub struct FrameInfo {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub delay_cs: u16,
    pub disposal: Disposal,
    pub local_palette: bool,
    pub transparent: bool,
}

/// Decode a GIF byte stream into the owned animation model.
pub fn decode_animation(source: &[u8]) -> Result<AnimatedImage, EngineError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options
        .read_info(Cursor::new(source))
        .map_err(|e| EngineError::Decode(e.to_string()))?;

    let width = decoder.width();
    let height = decoder.height();
    let global_palette = decoder.global_palette().map(<[u8]>::to_vec).unwrap_or_default();
    let background_index = decoder.bg_color().map(|index| index as u8);

    let mut frames = Vec::new();
    loop {
        let frame = decoder
            .read_next_frame()
            .map_err(|e| EngineError::Decode(e.to_string()).in_frame(frames.len()))?;
        let Some(frame) = frame else { break };
        frames.push(AnimatedFrame {
            left: frame.left,
            top: frame.top,
            width: frame.width,
            height: frame.height,
            indices: frame.buffer.to_vec(),
            palette: frame.palette.clone(),
            transparent: frame.transparent,
            disposal: frame.dispose.into(),
            delay_cs: frame.delay,
        });
    }

    if frames.is_empty() {
        return Err(EngineError::EmptyAnimation);
    }

    // The loop-count extension precedes the first frame in the stream, so
    // it is reliably known once the frames have been read.
    let loop_count = decoder.repeat().into();

    Ok(AnimatedImage {
        width,
        height,
        global_palette,
        background_index,
        loop_count,
        frames,
    })
}

/// Re-encode the animation model as GIF bytes, preserving per-frame delays
/// and the loop count.
pub fn encode_animation(animation: &AnimatedImage) -> Result<Vec<u8>, EngineError> {
    let mut data = Vec::new();
    {
        let mut encoder = gif::Encoder::new(
            &mut data,
            animation.width,
            animation.height,
            &animation.global_palette,
        )
        .map_err(|e| EngineError::Encode(e.to_string()))?;
        encoder
            .set_repeat(animation.loop_count.into())
            .map_err(|e| EngineError::Encode(e.to_string()))?;

        for frame in &animation.frames {
            let mut out = gif::Frame::default();
            out.left = frame.left;
            out.top = frame.top;
            out.width = frame.width;
            out.height = frame.height;
            out.delay = frame.delay_cs;
            out.dispose = frame.disposal.into();
            out.transparent = frame.transparent;
            out.palette = frame.palette.clone();
            out.buffer = Cow::Borrowed(&frame.indices);
            encoder
                .write_frame(&out)
                .map_err(|e| EngineError::Encode(e.to_string()))?;
        }
    }
    Ok(data)
}

/// Force alpha to zero outside the rounded region.
fn apply_mask(image: &mut RgbaImage, radius: u32) {
    let (width, height) = image.dimensions();
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        if !mask::in_rounded_region(x, y, width, height, radius) {
            pixel[3] = 0;
        }
    }
}

/// Round the animation's corners.
///
/// Replays the animation through the compositor so each output frame is the
/// masked version of what a viewer sees at that point, then re-quantizes.
/// Output frames are full-canvas snapshots with disposal `None`: prior
/// frames are already baked in, which is what lets masked transparency
/// compose correctly for downstream renderers.
pub fn round_animation(source: &AnimatedImage, radius: u32) -> Result<AnimatedImage, EngineError> {
    if source.frames.is_empty() {
        return Err(EngineError::EmptyAnimation);
    }
    let width = source.width as u32;
    let height = source.height as u32;
    if mask::clamp_radius(width, height, radius) == 0 {
        return Ok(source.clone());
    }

    let mut compositor = Compositor::new(width, height, source.background_color());
    let mut previous: Option<RgbaImage> = None;
    let mut frames = Vec::with_capacity(source.frames.len());

    for (frame_index, frame) in source.frames.iter().enumerate() {
        // Disposal `Previous` restores the canvas to its pre-draw state, so
        // that state has to be captured before drawing.
        if frame.disposal == Disposal::Previous {
            previous = Some(compositor.snapshot());
        }

        compositor.draw_over(frame, &source.global_palette);

        let mut composed = compositor.snapshot();
        apply_mask(&mut composed, radius);
        let quantized =
            quantize::quantize(&composed).map_err(|e| e.in_frame(frame_index))?;

        frames.push(AnimatedFrame {
            left: 0,
            top: 0,
            width: source.width,
            height: source.height,
            indices: quantized.indices,
            palette: Some(quantized.palette),
            transparent: Some(quantized.transparent),
            disposal: Disposal::None,
            delay_cs: frame.delay_cs,
        });

        // The original disposal still shapes what the *next* frame
        // composites over, even though the stored frames no longer carry it.
        match frame.disposal {
            Disposal::Background => {
                compositor.clear_rect(frame.left, frame.top, frame.width, frame.height)
            }
            Disposal::Previous => {
                if let Some(snapshot) = previous.take() {
                    compositor.restore(snapshot);
                }
            }
            Disposal::None => {}
        }
    }

    Ok(AnimatedImage {
        width: source.width,
        height: source.height,
        global_palette: source.global_palette.clone(),
        background_index: source.background_index,
        loop_count: source.loop_count,
        frames,
    })
}

/// Uniformly scale the animation to the target box, ignoring aspect ratio.
///
/// Resampling is frame-local — each delta is scaled into its scaled
/// bounding rectangle — so no compositor is needed and frames can be
/// processed in parallel. Disposal, delays and loop metadata pass through.
pub fn resize_animation(
    source: &AnimatedImage,
    target: Dimensions,
) -> Result<AnimatedImage, EngineError> {
    if source.frames.is_empty() {
        return Err(EngineError::EmptyAnimation);
    }
    let target_w = target.width.clamp(1, u16::MAX as u32);
    let target_h = target.height.clamp(1, u16::MAX as u32);

    let frames = source
        .frames
        .par_iter()
        .enumerate()
        .map(|(frame_index, frame)| {
            let (left, new_w) = scale_axis(frame.left, frame.width, source.width, target_w);
            let (top, new_h) = scale_axis(frame.top, frame.height, source.height, target_h);

            let mut resized = imageops::resize(
                &frame.to_rgba(&source.global_palette),
                new_w,
                new_h,
                FilterType::Lanczos3,
            );
            // Lanczos feathers the binary GIF alpha; snap it back so the
            // transparent region stays crisp and palette entries aren't
            // wasted on unrepresentable partial alpha.
            for pixel in resized.pixels_mut() {
                pixel[3] = if pixel[3] < 128 { 0 } else { 255 };
            }

            let quantized =
                quantize::quantize(&resized).map_err(|e| e.in_frame(frame_index))?;

            Ok(AnimatedFrame {
                left: left as u16,
                top: top as u16,
                width: new_w as u16,
                height: new_h as u16,
                indices: quantized.indices,
                palette: Some(quantized.palette),
                transparent: Some(quantized.transparent),
                disposal: frame.disposal,
                delay_cs: frame.delay_cs,
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    Ok(AnimatedImage {
        width: target_w as u16,
        height: target_h as u16,
        global_palette: source.global_palette.clone(),
        background_index: source.background_index,
        loop_count: source.loop_count,
        frames,
    })
}

/// Scale one axis of a frame rectangle into the target canvas: start floors,
/// end rounds outward, and the result is clamped to the canvas with a
/// minimum extent of one pixel.
fn scale_axis(start: u16, extent: u16, from: u16, to: u32) -> (u32, u32) {
    let from = from.max(1) as u64;
    let to = to as u64;
    let scaled_start = (start as u64 * to / from).min(to - 1);
    let scaled_end = ((start as u64 + extent as u64) * to)
        .div_ceil(from)
        .clamp(scaled_start + 1, to);
    (scaled_start as u32, (scaled_end - scaled_start) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Red full-canvas frame disposed to background, then a blue 8×8 patch
    /// in the top-left. Background is white.
    fn two_frame_animation() -> AnimatedImage {
        AnimatedImage {
            width: 16,
            height: 16,
            global_palette: vec![255, 0, 0, 0, 0, 255, 255, 255, 255],
            background_index: Some(2),
            loop_count: LoopCount::Infinite,
            frames: vec![
                AnimatedFrame {
                    left: 0,
                    top: 0,
                    width: 16,
                    height: 16,
                    indices: vec![0; 256],
                    palette: None,
                    transparent: None,
                    disposal: Disposal::Background,
                    delay_cs: 10,
                },
                AnimatedFrame {
                    left: 0,
                    top: 0,
                    width: 8,
                    height: 8,
                    indices: vec![1; 64],
                    palette: None,
                    transparent: None,
                    disposal: Disposal::None,
                    delay_cs: 20,
                },
            ],
        }
    }

    /// Resolve an output frame's pixel to RGBA through its own palette.
    fn pixel_of(frame: &AnimatedFrame, x: u32, y: u32) -> [u8; 4] {
        let index = frame.indices[(y * frame.width as u32 + x) as usize];
        if frame.transparent == Some(index) {
            return [0, 0, 0, 0];
        }
        let palette = frame.palette.as_deref().expect("output frames carry palettes");
        let offset = index as usize * 3;
        [palette[offset], palette[offset + 1], palette[offset + 2], 255]
    }

    // =========================================================================
    // Codec roundtrip
    // =========================================================================

    #[test]
    fn encode_decode_roundtrip_preserves_metadata() {
        let animation = two_frame_animation();
        let data = encode_animation(&animation).unwrap();
        let decoded = decode_animation(&data).unwrap();

        assert_eq!(decoded.width, 16);
        assert_eq!(decoded.height, 16);
        assert_eq!(decoded.loop_count, LoopCount::Infinite);
        assert_eq!(decoded.frames.len(), 2);
        assert_eq!(decoded.frames[0].delay_cs, 10);
        assert_eq!(decoded.frames[1].delay_cs, 20);
        assert_eq!(decoded.frames[0].disposal, Disposal::Background);
        assert_eq!(decoded.frames[1].disposal, Disposal::None);
        assert_eq!(decoded.frames[1].left, 0);
        assert_eq!(decoded.frames[1].width, 8);
        assert_eq!(decoded.frames[0].indices, animation.frames[0].indices);
        // The encoder may pad the palette to a power of two; the leading
        // entries must survive untouched.
        assert_eq!(&decoded.global_palette[..9], &animation.global_palette[..]);
    }

    #[test]
    fn finite_loop_count_roundtrips() {
        let mut animation = two_frame_animation();
        animation.loop_count = LoopCount::Finite(3);
        let data = encode_animation(&animation).unwrap();
        assert_eq!(decode_animation(&data).unwrap().loop_count, LoopCount::Finite(3));
    }

    #[test]
    fn decode_rejects_non_gif() {
        assert!(matches!(
            decode_animation(b"definitely not a gif"),
            Err(EngineError::Decode(_))
        ));
    }

    #[test]
    fn decode_rejects_zero_frame_gif() {
        // Header + logical screen descriptor + trailer, no image data.
        let mut data = b"GIF89a".to_vec();
        data.extend_from_slice(&4u16.to_le_bytes());
        data.extend_from_slice(&4u16.to_le_bytes());
        data.extend_from_slice(&[0, 0, 0]);
        data.push(0x3B);

        assert!(matches!(
            decode_animation(&data),
            Err(EngineError::EmptyAnimation)
        ));
    }

    // =========================================================================
    // Rounding
    // =========================================================================

    #[test]
    fn round_composites_through_background_disposal() {
        let rounded = round_animation(&two_frame_animation(), 4).unwrap();
        assert_eq!(rounded.frames.len(), 2);

        // Frame 1 redraws only an 8×8 patch; the rest of its composited
        // output must show the background (frame 0 was disposed to
        // background), not frame 0's red.
        let second = &rounded.frames[1];
        assert_eq!(pixel_of(second, 12, 12), [255, 255, 255, 255]);
        assert_eq!(pixel_of(second, 4, 4), [0, 0, 255, 255]);

        // Frame 0 is still red where it was drawn.
        assert_eq!(pixel_of(&rounded.frames[0], 8, 8), [255, 0, 0, 255]);
    }

    #[test]
    fn round_masks_every_frame() {
        let rounded = round_animation(&two_frame_animation(), 4).unwrap();
        for (i, frame) in rounded.frames.iter().enumerate() {
            for y in 0..16 {
                for x in 0..16 {
                    let visible = mask::in_rounded_region(x, y, 16, 16, 4);
                    let alpha = pixel_of(frame, x, y)[3];
                    // Everything this animation draws is opaque, so the
                    // mask alone decides visibility.
                    assert_eq!(alpha == 255, visible, "frame {i} pixel ({x},{y})");
                }
            }
        }
    }

    #[test]
    fn round_output_frames_are_full_canvas_none_disposal() {
        let rounded = round_animation(&two_frame_animation(), 4).unwrap();
        for frame in &rounded.frames {
            assert_eq!((frame.left, frame.top), (0, 0));
            assert_eq!((frame.width, frame.height), (16, 16));
            assert_eq!(frame.disposal, Disposal::None);
            assert!(frame.transparent.is_some());
        }
    }

    #[test]
    fn round_preserves_delays_and_loop() {
        let mut animation = two_frame_animation();
        animation.loop_count = LoopCount::Finite(5);
        let rounded = round_animation(&animation, 4).unwrap();
        assert_eq!(rounded.loop_count, LoopCount::Finite(5));
        assert_eq!(rounded.frames[0].delay_cs, 10);
        assert_eq!(rounded.frames[1].delay_cs, 20);
    }

    #[test]
    fn round_with_zero_effective_radius_is_identity() {
        let animation = two_frame_animation();
        let rounded = round_animation(&animation, 0).unwrap();
        assert_eq!(rounded.frames[0].indices, animation.frames[0].indices);
        assert_eq!(rounded.frames[0].disposal, Disposal::Background);
    }

    #[test]
    fn round_respects_previous_disposal() {
        // Frame 1 draws a patch and disposes to previous; frame 2 draws
        // nothing new (fully transparent patch). Frame 2's composited state
        // must show frame 0's red, not frame 1's blue.
        let animation = AnimatedImage {
            width: 8,
            height: 8,
            global_palette: vec![255, 0, 0, 0, 0, 255],
            background_index: None,
            loop_count: LoopCount::Infinite,
            frames: vec![
                AnimatedFrame {
                    left: 0,
                    top: 0,
                    width: 8,
                    height: 8,
                    indices: vec![0; 64],
                    palette: None,
                    transparent: None,
                    disposal: Disposal::None,
                    delay_cs: 5,
                },
                AnimatedFrame {
                    left: 2,
                    top: 2,
                    width: 4,
                    height: 4,
                    indices: vec![1; 16],
                    palette: None,
                    transparent: None,
                    disposal: Disposal::Previous,
                    delay_cs: 5,
                },
                AnimatedFrame {
                    left: 0,
                    top: 0,
                    width: 1,
                    height: 1,
                    indices: vec![0],
                    palette: Some(vec![0, 0, 0]),
                    transparent: Some(0),
                    disposal: Disposal::None,
                    delay_cs: 5,
                },
            ],
        };

        let rounded = round_animation(&animation, 2).unwrap();
        assert_eq!(pixel_of(&rounded.frames[1], 3, 3), [0, 0, 255, 255]);
        // After frame 1's disposal the patch is rolled back.
        assert_eq!(pixel_of(&rounded.frames[2], 3, 3), [255, 0, 0, 255]);
    }

    #[test]
    fn round_keeps_untouched_transparency_transparent() {
        // No background index: undrawn canvas stays transparent through
        // rounding, inside and outside the mask alike.
        let animation = AnimatedImage {
            width: 8,
            height: 8,
            global_palette: vec![0, 255, 0],
            background_index: None,
            loop_count: LoopCount::Infinite,
            frames: vec![AnimatedFrame {
                left: 0,
                top: 0,
                width: 4,
                height: 4,
                indices: vec![0; 16],
                palette: None,
                transparent: None,
                disposal: Disposal::None,
                delay_cs: 8,
            }],
        };

        let rounded = round_animation(&animation, 2).unwrap();
        let frame = &rounded.frames[0];
        assert_eq!(pixel_of(frame, 1, 1), [0, 255, 0, 255]);
        assert_eq!(pixel_of(frame, 6, 6)[3], 0, "undrawn area stays transparent");
    }

    // =========================================================================
    // Resizing
    // =========================================================================

    #[test]
    fn resize_scales_canvas_and_frame_rects() {
        let resized = resize_animation(&two_frame_animation(), Dimensions::square(8)).unwrap();
        assert_eq!((resized.width, resized.height), (8, 8));
        assert_eq!(resized.frames.len(), 2);

        let first = &resized.frames[0];
        assert_eq!((first.width, first.height), (8, 8));
        let second = &resized.frames[1];
        assert_eq!((second.left, second.top), (0, 0));
        assert_eq!((second.width, second.height), (4, 4));
    }

    #[test]
    fn resize_preserves_timing_and_disposal() {
        let mut animation = two_frame_animation();
        animation.loop_count = LoopCount::Finite(2);
        let resized = resize_animation(&animation, Dimensions::new(32, 24)).unwrap();

        assert_eq!(resized.loop_count, LoopCount::Finite(2));
        assert_eq!(resized.frames[0].delay_cs, 10);
        assert_eq!(resized.frames[0].disposal, Disposal::Background);
        assert_eq!(resized.frames[1].delay_cs, 20);
        assert_eq!(resized.frames[1].disposal, Disposal::None);
    }

    #[test]
    fn resize_of_flat_frame_keeps_color() {
        let resized = resize_animation(&two_frame_animation(), Dimensions::square(8)).unwrap();
        // Lanczos over a flat red field is still flat red.
        assert_eq!(pixel_of(&resized.frames[0], 4, 4), [255, 0, 0, 255]);
    }

    #[test]
    fn resize_ignores_aspect_ratio() {
        let resized = resize_animation(&two_frame_animation(), Dimensions::new(32, 4)).unwrap();
        assert_eq!((resized.width, resized.height), (32, 4));
    }

    // =========================================================================
    // Geometry helpers
    // =========================================================================

    #[test]
    fn scale_axis_maps_full_extent() {
        assert_eq!(scale_axis(0, 16, 16, 8), (0, 8));
        assert_eq!(scale_axis(0, 16, 16, 32), (0, 32));
    }

    #[test]
    fn scale_axis_keeps_rect_inside_canvas() {
        let (start, extent) = scale_axis(8, 8, 16, 7);
        assert!(start + extent <= 7);
        assert!(extent >= 1);
    }

    #[test]
    fn scale_axis_never_collapses_to_zero() {
        let (_, extent) = scale_axis(15, 1, 16, 4);
        assert_eq!(extent.max(1), extent);
    }

    #[test]
    fn describe_reports_frame_metadata() {
        let info = two_frame_animation().describe();
        assert_eq!(info.frame_count, 2);
        assert_eq!(info.frames[1].delay_cs, 20);
        assert_eq!(info.frames[0].disposal, Disposal::Background);
        assert!(!info.frames[0].local_palette);
    }
}
