//! Domain entities: catalog products and household profiles.

/// Catalog product entity.
pub mod product;
/// Household profile and quiz answer normalization.
pub mod profile;

pub use product::{ManufacturingOrigin, MountingType, Product};
pub use profile::{
    Appliance, Budget, Coordinates, EcoImportance, HouseholdSize, HousingType, Orientation,
    Profile, ProfileError, QuizAnswers, Shading, SizeBucket,
};
