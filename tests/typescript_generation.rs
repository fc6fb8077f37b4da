//! TypeScript Generation Tests
//!
//! Validates that the public value types can be exported to TypeScript
//! when the tauri feature is enabled.

#[cfg(feature = "tauri")]
#[test]
fn test_core_types_implement_specta_type() {
    use specta::Type;

    // If this compiles, all types are properly configured for TypeScript export.
    fn assert_type<T: Type>() {}

    assert_type::<pcars_shm::SessionInfo>();
    assert_type::<pcars_shm::UpdateRate>();
    assert_type::<pcars_shm::ReadConsistency>();
    assert_type::<pcars_shm::TelemetryFrame>();
    assert_type::<pcars_shm::TyreState>();
    assert_type::<pcars_shm::GameState>();
    assert_type::<pcars_shm::SessionState>();
    assert_type::<pcars_shm::Terrain>();
    assert_type::<pcars_shm::Vec3>();
    assert_type::<pcars_shm::PerTyre<f32>>();
    assert_type::<pcars_shm::Value>();
}

#[cfg(not(feature = "tauri"))]
#[test]
fn test_tauri_feature_disabled() {
    // Types still compile without specta::Type
    let _ = pcars_shm::UpdateRate::Native;
    let _ = pcars_shm::ReadConsistency::Stable;
}
