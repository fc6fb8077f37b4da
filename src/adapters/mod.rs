//! Type-safe frame adapters for converting raw snapshots to strongly-typed structures.
//!
//! This module provides a dual-phase adapter system:
//! - **Subscribe-time validation**: Validates field mappings and builds extraction plans
//! - **Per-frame extraction**: Field reads through the pre-validated plan
//!
//! All field mapping errors surface when a subscription is created, never
//! while frames are flowing. Extraction goes through the [`VarData`](crate::VarData)
//! trait, so every read is type checked and bounds checked.
//!
//! [`TelemetryFrame`] is the ready-made adapter decoding the whole record.
//!
//! # Example Usage
//!
//! ```rust
//! use pcars_shm::{types::FramePacket, Result, SnapshotSchema, adapters::*};
//!
//! // Only the fields a dashboard needs
//! struct Dash {
//!     speed: f32,
//!     gear: i32,
//!     rpm: Option<f32>,
//! }
//!
//! impl FrameAdapter for Dash {
//!     fn validate_schema(schema: &SnapshotSchema) -> Result<AdapterValidation> {
//!         Ok(AdapterValidation::new(vec![
//!             FieldExtraction::required(schema, "mSpeed")?,
//!             FieldExtraction::required(schema, "mGear")?,
//!             FieldExtraction::optional(schema, "mRpm"),
//!         ]))
//!     }
//!
//!     fn adapt(packet: &FramePacket, validation: &AdapterValidation) -> Self {
//!         Self {
//!             speed: validation.fetch_or_default::<f32>(packet, "mSpeed"),
//!             gear: validation.fetch_or_default::<i32>(packet, "mGear"),
//!             rpm: validation.fetch::<f32>(packet, "mRpm").filter(|rpm| *rpm != 0.0),
//!         }
//!     }
//! }
//! ```

mod frame_adapter;
mod schema_provider;
mod telemetry_frame;
mod validation;

// Re-export all public types
pub use frame_adapter::FrameAdapter;
pub use schema_provider::SchemaProvider;
pub use telemetry_frame::{
    CarState, Damage, Identity, Motion, RaceInfo, TelemetryFrame, Timing, TyreState,
    UnfilteredInputs, Weather,
};
pub use validation::{AdapterValidation, FieldExtraction};
