// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete handler bodies (A4) shipped alongside the pipeline engine so the
//! registry is non-empty out of the box: `ReadFile`, `WriteFile`,
//! `RunExecutable`, `ConvertPngToJpeg`, `UploadHttp`. Grounded file-by-file
//! on the original `handler/*.go` package.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod convert_png_to_jpeg;
mod read_file;
mod run_executable;
mod upload_http;
mod write_file;

use pp_engine::Registry;

pub use convert_png_to_jpeg::ConvertPngToJpegFactory;
pub use read_file::ReadFileFactory;
pub use run_executable::RunExecutableFactory;
pub use upload_http::UploadHttpFactory;
pub use write_file::WriteFileFactory;

/// The registry the binary builds from at startup: every handler kind this
/// crate ships, registered under its configured name.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register("ReadFile", Box::new(ReadFileFactory));
    registry.register("WriteFile", Box::new(WriteFileFactory));
    registry.register("RunExecutable", Box::new(RunExecutableFactory));
    registry.register("ConvertPngToJpeg", Box::new(ConvertPngToJpegFactory));
    registry.register("UploadHttp", Box::new(UploadHttpFactory));
    registry
}
