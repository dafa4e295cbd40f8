// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Float comparison: picking math compares against exact thresholds
#![allow(clippy::float_cmp)]
#![allow(clippy::suboptimal_flops)]
// Geometry casts are intentional and safe
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Geometry math reads best with short names
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::redundant_pub_crate)]

//! Hit-testing and selection resolution for 3D CAD viewports.
//!
//! Cadpick answers one question: given a pointer position (or a drag
//! box) and a camera, which *logical* modeling entity — a face, an
//! edge, a curve, a control point, a planar region — is the user
//! pointing at? The renderer only knows about low-level drawables
//! (triangle meshes, polylines, point clouds); this crate casts a ray
//! against them, walks the scene-graph ownership hierarchy back up to
//! the entity each drawable tessellates, and orders coincident hits so
//! that the visually-intuitive candidate wins.
//!
//! # Key entry points
//!
//! - [`picking::GeometryPicker`] - the pick coordinator (point and box
//!   queries)
//! - [`picking::EntityResolver`] - drawable-to-entity resolution and
//!   pickability filtering
//! - [`scene::SceneGraph`] - the arena scene graph the editor populates
//! - [`options::PickOptions`] - proximity thresholds for thin
//!   primitives
//!
//! # Architecture
//!
//! Queries are synchronous and complete within a single input event:
//! ray construction → per-primitive intersection → coincidence
//! clustering → priority sort → entity resolution → deduplication.
//! The picker holds no scene state; it reads the caller's
//! [`scene::SceneGraph`] during the query and reuses internal scratch
//! buffers across calls so that hover-frequency queries stay
//! allocation-light.

pub mod camera;
pub mod error;
pub mod options;
pub mod picking;
pub mod raycast;
pub mod scene;
