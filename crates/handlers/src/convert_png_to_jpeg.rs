// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ConvertPngToJpeg` — decodes the handoff's input as PNG and re-encodes it
//! as JPEG at a configured quality into the handoff's output. Grounded on
//! the original `handler/convert_png_to_jpeg.go`, which used the Go stdlib
//! `image/png` + `image/jpeg` packages for the same transformation.

use std::io::{Read, Write};

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use pp_core::{ConfigError, FlowObject};
use pp_engine::{FileHandoff, Handler, HandlerError, HandlerFactory};
use serde_json::{Map, Value};

pub struct ConvertPngToJpegFactory;

impl HandlerFactory for ConvertPngToJpegFactory {
    fn kind_tag(&self) -> &'static str {
        "png_to_jpeg"
    }

    fn build(&self, id: String, config: &Map<String, Value>) -> Result<Box<dyn Handler>, ConfigError> {
        let quality = config.get("quality").and_then(Value::as_u64).map(|q| q as u8).unwrap_or(85);
        let remove_original = config.get("remove_original").and_then(Value::as_bool).unwrap_or(false);
        Ok(Box::new(ConvertPngToJpeg { id, quality, remove_original }))
    }
}

struct ConvertPngToJpeg {
    id: String,
    quality: u8,
    remove_original: bool,
}

impl Handler for ConvertPngToJpeg {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "ConvertPngToJpeg"
    }

    fn handle(&self, mut flow: FlowObject, handoff: &mut FileHandoff) -> Result<FlowObject, HandlerError> {
        let mut data = Vec::new();
        handoff.read()?.read_to_end(&mut data)?;

        let img = image::load_from_memory_with_format(&data, image::ImageFormat::Png)
            .map_err(|e| HandlerError::Other(format!("png decode failed: {e}")))?;
        let rgb = img.to_rgb8();

        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, self.quality)
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| HandlerError::Other(format!("jpeg encode failed: {e}")))?;

        let output_path = handoff.output_path().to_string_lossy().to_string();
        handoff.write()?.write_all(&encoded)?;

        // Recovery re-executing this handler re-decodes/re-encodes the same
        // bytes; idempotent save for the new random JPEG encoder's scan
        // ordering, which no downstream consumer depends on.
        if self.remove_original {
            if let Some(Value::String(source)) = flow.get("ReadFile.path") {
                let _ = std::fs::remove_file(source);
            }
        }

        flow.set("ConvertPngToJpeg.output_file", output_path);
        Ok(flow)
    }
}

#[cfg(test)]
#[path = "convert_png_to_jpeg_tests.rs"]
mod tests;
