//! Texture Converter - batch packaging of source images into `.texture` files
//!
//! This library turns a `texture_sources` tree of PNG/JPG/TGA/DDS images
//! into a mirrored `texture_library` tree of `.texture` packages, the
//! fixed-layout format the engine loads.
//!
//! # Pipeline
//!
//! ```text
//! texture_sources/foo/bar.png
//!        │
//!        ├─ png/jpg/tga ─► ContainerEncoder (nvcompress) ─┐
//!        └─ dds ─────────► passthrough copy ──────────────┤
//!                                                         ▼
//!                                                 ScratchContainer
//!                                                         │ read_dimensions
//!                                                         ▼
//!                        mapping::derive ─► TexturePackager
//!                                                         │
//!                                                         ▼
//!                                  texture_library/foo/bar.texture
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use texture_converter::batch::BatchWalker;
//! use texture_converter::config::ConverterConfig;
//! use texture_converter::preflight::check_requirements;
//!
//! let config = ConverterConfig::default();
//! check_requirements(&config).expect("missing encoder or source folder");
//!
//! let walker = BatchWalker::new(&config.base_dir, Arc::new(config.encoder.build()))
//!     .with_scratch_path(config.scratch_path());
//! let report = walker.run().unwrap();
//! println!("{}", report);
//! ```

pub mod batch;
pub mod config;
pub mod dds;
pub mod encoder;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod package;
pub mod preflight;

pub use error::{ConvertError, ConvertResult};
